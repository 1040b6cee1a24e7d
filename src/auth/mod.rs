//! Request signing and credential lookup.
//!
//! [`signature`] builds the HMAC-SHA1 authorization header the service
//! expects; [`directory`] matches an incoming request's header against the
//! server credentials of every known database.

pub mod directory;
pub mod signature;

pub use directory::database_matching_server_keys;
pub use signature::{authorization_header, rfc_1123_date};
