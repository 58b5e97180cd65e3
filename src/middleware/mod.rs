mod auth;
mod error_handler;

pub use auth::{AuthUser, MaybeUser};
pub use error_handler::log_errors;
