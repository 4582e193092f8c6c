//! Contact storage adapters. Implement ContactRepoPort.

pub mod json_repo;
pub mod sqlite_repo;

pub use json_repo::JsonRepo;
pub use sqlite_repo::SqliteRepo;

use chrono::{DateTime, Utc};

/// Current time truncated to milliseconds, the precision both stores keep.
pub(crate) fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
