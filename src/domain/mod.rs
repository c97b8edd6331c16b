pub mod api;
pub mod user;

pub use api::*;
pub use user::*;
