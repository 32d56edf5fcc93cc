use std::str::FromStr;

/// Slash commands understood by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    AddProduct,
    Cancel,
    Unknown,
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix('/').ok_or(())?;
        // Drop arguments and a `@botname` suffix.
        let name = name.split_whitespace().next().unwrap_or("");
        let name = name.split('@').next().unwrap_or("");
        match name.to_ascii_lowercase().as_str() {
            "start" => Ok(Command::Start),
            "help" | "h" => Ok(Command::Help),
            "add_product" | "addproduct" => Ok(Command::AddProduct),
            "cancel" => Ok(Command::Cancel),
            _ => Ok(Command::Unknown),
        }
    }
}

pub const HELP_TEXT: &str = "Tap \"Order\" under a product in the channel to place an order.\n\
/cancel stops the form you are filling in.\n\
/add_product publishes a new product (administrator only).";
