//! Authentication and authorization for Bookshelf.
//!
//! - [`TokenCodec`] signs and verifies HS256 tokens carrying [`Claims`]
//! - [`Authenticator`] checks a submitted [`Credential`] against the configured
//!   [`Identity`] and mints a token
//! - [`AccessGuard`] verifies a token and admits only the admin role

mod authenticator;
mod error;
mod guard;
mod token;

pub use authenticator::{Authenticator, Credential, Identity};
pub use error::AuthError;
pub use guard::AccessGuard;
pub use token::{Claims, TokenCodec, ADMIN_ROLE};
