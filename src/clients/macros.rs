/// Generates the traced `get_<entity>` lookup shared by every store client.
macro_rules! impl_get_method {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        paste::paste! {
            impl $client_name {
                // Generated for every store; the bot itself only reads stock.
                #[allow(dead_code)]
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](
                    &self,
                    id: <$entity as $crate::actor_framework::Entity>::Id,
                ) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.get(id).await
                }
            }
        }
    };
}

/// Constructor plus lookup, for clients that wrap nothing but a `ResourceClient`.
macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $error:ty, $entity_name_snake:ident) => {
        impl $client_name {
            pub fn new(inner: $crate::actor_framework::ResourceClient<$entity>) -> Self {
                Self { inner }
            }
        }

        impl_get_method!($client_name, $entity, $error, $entity_name_snake);
    };
}
