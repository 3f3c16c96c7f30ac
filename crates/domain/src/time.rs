//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp, e.g. the creation time embedded in a [`FoodId`](crate::id::FoodId).
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Seconds since the Unix epoch, saturated into the `u32` range.
#[must_use]
pub fn epoch_seconds(ts: Timestamp) -> u32 {
    u32::try_from(ts.timestamp().max(0)).unwrap_or(u32::MAX)
}
