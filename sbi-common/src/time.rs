//! Timestamp utilities

use chrono::{DateTime, Local, NaiveDate};

/// Format used in draft file names
pub const DRAFT_STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Get current local timestamp
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Today's local calendar date
pub fn today() -> NaiveDate {
    now().date_naive()
}

/// Timestamp component of a draft file name (e.g. `20240501-142233`)
pub fn draft_stamp(at: &DateTime<Local>) -> String {
    at.format(DRAFT_STAMP_FORMAT).to_string()
}
