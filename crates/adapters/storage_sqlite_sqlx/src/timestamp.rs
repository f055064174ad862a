//! Text encoding of timestamps.

use chrono::{DateTime, SecondsFormat};
use verdant_domain::time::Timestamp;

/// `2024-06-10T12:00:00.000000Z`: fixed width, so lexical order is
/// chronological order.
pub(crate) fn encode(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode(value: &str) -> Result<Timestamp, sqlx::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.to_utc())
        .map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

pub(crate) fn decode_opt(value: Option<String>) -> Result<Option<Timestamp>, sqlx::Error> {
    value.as_deref().map(decode).transpose()
}
