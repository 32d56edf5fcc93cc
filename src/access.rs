//! Privilege checks for wizard entry points.

use tracing::warn;

use crate::domain::UserId;
use crate::wizard::WizardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The single configured administrator.
    Admin,
    /// Anyone who can talk to the bot.
    Customer,
}

/// Decides whether a user may enter a wizard. Consulted once per wizard
/// start; a running session is not re-checked.
#[derive(Debug, Clone, Copy)]
pub struct AccessGuard {
    admin: UserId,
}

impl AccessGuard {
    pub fn new(admin: UserId) -> Self {
        Self { admin }
    }

    pub fn authorize(&self, user_id: UserId, required_role: Role) -> bool {
        match required_role {
            Role::Admin => user_id == self.admin,
            Role::Customer => true,
        }
    }

    /// Same as [`authorize`](Self::authorize) but as a `Result`, logging the rejection.
    pub fn require(&self, user_id: UserId, required_role: Role) -> Result<(), WizardError> {
        if self.authorize(user_id, required_role) {
            Ok(())
        } else {
            warn!(%user_id, ?required_role, "Unauthorized wizard entry");
            Err(WizardError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_configured_admin_is_admin() {
        let guard = AccessGuard::new(UserId(1));
        assert!(guard.authorize(UserId(1), Role::Admin));
        assert!(!guard.authorize(UserId(2), Role::Admin));
        assert_eq!(guard.require(UserId(2), Role::Admin), Err(WizardError::Unauthorized));
    }

    #[test]
    fn everyone_is_a_customer() {
        let guard = AccessGuard::new(UserId(1));
        assert!(guard.authorize(UserId(1), Role::Customer));
        assert!(guard.authorize(UserId(-100), Role::Customer));
    }
}
