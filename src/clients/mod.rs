//! HTTP clients for the remote users resource.

#[macro_use]
mod macros;
mod response;
mod user_client;

pub use response::ApiResponse;
pub use user_client::UsersClient;
