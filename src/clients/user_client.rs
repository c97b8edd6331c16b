use std::fmt;
use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::clients::ApiResponse;
use crate::error::ClientError;

/// Client for the `/users` resource, bound to one base URL and one bearer
/// token.
#[derive(Clone)]
pub struct UsersClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl fmt::Debug for UsersClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsersClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl UsersClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Same base URL and connection pool, different credentials.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token: token.into(),
        }
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: u64) -> String {
        format!("{}/users/{}", self.base_url, id)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<ApiResponse, ClientError> {
        let response = request
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let response = ApiResponse::read(response).await?;
        debug!(status = %response.status, "Received response");
        Ok(response)
    }

    #[instrument(skip(self, body))]
    pub async fn create_user<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<ApiResponse, ClientError> {
        debug!("Sending request");
        let request = self.http.post(self.users_url()).json(body);
        self.send(request).await
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<ApiResponse, ClientError> {
        debug!("Sending request");
        let request = self.http.get(self.users_url());
        self.send(request).await
    }

    #[instrument(skip(self))]
    pub async fn list_users_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<ApiResponse, ClientError> {
        debug!("Sending request");
        let request = self
            .http
            .get(self.users_url())
            .query(&[("page", page), ("per_page", per_page)]);
        self.send(request).await
    }
}

user_request_method!(UsersClient => fn get_user(id) as get);
user_request_method!(UsersClient => fn delete_user(id) as delete);
user_request_method!(UsersClient => fn update_user(id, body) as patch);
