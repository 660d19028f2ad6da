//! Time helpers
//!
//! Timestamps are Unix milliseconds (`i64`) everywhere below the API
//! boundary; repositories never see date strings.

/// Current time as Unix milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
