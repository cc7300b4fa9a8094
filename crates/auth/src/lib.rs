//! Credential issuance and verification.
//!
//! Argon2id password hashing and HS256 session tokens, plus the account
//! flows (registration, login) that consume them.
//!
//! ## Passwords
//!
//! - [`password`] — hash, verify, and staleness checks
//! - [`Record`] — self-describing encoded hash
//! - [`Params`] — cost policy for new hashes
//!
//! ## Sessions
//!
//! - [`Crypto`] — token issuance and validation
//! - [`Claims`] — token payload
//!
//! ## Accounts
//!
//! - [`Member`] — registered user
//! - [`account`] — registration and login
//! - [`AuthRepository`] — credential storage seam
mod claims;
mod crypto;
mod dto;
mod error;
mod member;
mod params;
mod record;
mod repository;
pub mod account;
pub mod password;

pub use claims::*;
pub use crypto::*;
pub use dto::*;
pub use error::*;
pub use member::*;
pub use params::*;
pub use record::*;
pub use repository::*;

#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod middleware;
#[cfg(feature = "server")]
pub use handlers::*;
#[cfg(feature = "server")]
pub use middleware::*;
