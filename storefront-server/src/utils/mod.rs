//! Utility module - shared helpers and types
//!
//! # Contents
//!
//! - [`AppError`] / [`AppResponse`] - application error and response types
//! - [`KeyedLocks`] - per-key async mutexes
//! - logging and time helpers

pub mod error;
pub mod keyed_lock;
pub mod logger;
pub mod time;

pub use error::{AppError, AppResponse, AppResult, ok};
pub use keyed_lock::KeyedLocks;
pub use time::now_millis;
