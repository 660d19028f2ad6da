//! Identity claims
//!
//! Credential validation lives in the fronting auth layer; this service
//! receives already-validated claims as trusted `x-auth-*` headers and
//! never checks a password or token signature itself.

mod extractor;

pub use extractor::OptionalUser;

/// Validated identity claims of the current shopper
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub email: String,
}
