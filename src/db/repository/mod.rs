pub mod patient;
pub mod scan;
pub mod diagnosis;
pub mod prognosis;
pub mod radiation_plan;
pub mod biomarker;
pub mod alert;

pub use patient::*;
pub use scan::*;
pub use diagnosis::*;
pub use prognosis::*;
pub use radiation_plan::*;
pub use biomarker::*;
pub use alert::*;

use chrono::NaiveDateTime;

/// Fixed-width microsecond timestamp format. Lexicographic ordering of
/// stored strings equals temporal ordering, which the latest-wins
/// queries rely on.
pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub fn fmt_ts(ts: &NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

/// Parse a stored timestamp column. A string that does not match the
/// fixed format is a corrupted row; it fails the row rather than
/// defaulting to the epoch, which the latest-wins ordering would
/// silently misrank.
pub fn parse_ts(idx: usize, s: &str) -> Result<NaiveDateTime, rusqlite::Error> {
    NaiveDateTime::parse_from_str(s, TS_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Deserialize a JSON text column. Corrupt JSON fails the row instead
/// of decaying into an empty list.
pub fn parse_json_col<T: serde::de::DeserializeOwned>(
    idx: usize,
    s: &str,
) -> Result<T, rusqlite::Error> {
    serde_json::from_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
