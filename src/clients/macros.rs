/// Generate users-API client methods addressing a single record by id.
///
/// Each generated method is instrumented, attaches the client's bearer token
/// and returns the raw [`ApiResponse`](crate::clients::ApiResponse).
macro_rules! user_request_method {
    ($client:ty => fn $method:ident(id) as $verb:ident) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(
                &self,
                id: u64,
            ) -> Result<$crate::clients::ApiResponse, $crate::error::ClientError> {
                tracing::debug!("Sending request");
                let request = self.http.$verb(self.user_url(id));
                self.send(request).await
            }
        }
    };
    ($client:ty => fn $method:ident(id, body) as $verb:ident) => {
        impl $client {
            #[tracing::instrument(skip(self, body))]
            pub async fn $method<B: serde::Serialize + ?Sized>(
                &self,
                id: u64,
                body: &B,
            ) -> Result<$crate::clients::ApiResponse, $crate::error::ClientError> {
                tracing::debug!("Sending request");
                let request = self.http.$verb(self.user_url(id)).json(body);
                self.send(request).await
            }
        }
    };
}
