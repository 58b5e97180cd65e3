mod handler;
mod model;

pub use handler::{login, logout, me, profile, signup};
pub use model::{LoginRequest, ProfileResponse, SignupRequest, UserInfo};
