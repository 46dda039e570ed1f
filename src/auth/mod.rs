//! User accounts, sessions and the routes for registering, logging in and logging out.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod register;
mod token;
mod user;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use register::{get_register_page, register_user};
pub use user::{User, UserID, create_user_table};

#[cfg(test)]
pub(crate) use cookie::{COOKIE_TOKEN, set_auth_cookie};
#[cfg(test)]
pub(crate) use middleware::AuthState;
#[cfg(test)]
pub(crate) use user::create_user;
