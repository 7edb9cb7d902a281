//! Timestamp source
//!
//! All stamped fields (account timestamps, transaction and log entries) use
//! one formatted local-zone representation produced here.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Formatting pattern for every stamped field.
const STAMP_PATTERN: &str = "%d-%m-%y, %H:%M:%S";

/// Fixed display zone: IST (UTC+05:30).
const ZONE_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Clock producing formatted local timestamps and the current date.
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock;

impl Clock {
    fn zone() -> FixedOffset {
        FixedOffset::east_opt(ZONE_OFFSET_SECS).expect("Invalid ZONE_OFFSET_SECS constant")
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&Self::zone())
    }

    /// Current local time formatted as `dd-MM-yy, HH:mm:ss`.
    pub fn stamp(&self) -> String {
        self.now().format(STAMP_PATTERN).to_string()
    }

    /// Current local date, used for card expiry checks.
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
