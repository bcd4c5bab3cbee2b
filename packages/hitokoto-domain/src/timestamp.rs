//! Wire formats for the timestamps stored in records and run state.

use time::{
	Date, OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::well_known::Rfc3339,
	macros::format_description,
};

use crate::{Error, Result};

/// `YYYY-MM-DD HH:MM:SS`, used in ledger markers, summaries and publish logs.
pub fn format_log(ts: OffsetDateTime) -> String {
	ts.to_offset(UtcOffset::UTC)
		.format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
		.unwrap_or_default()
}

/// `YYYY-MM-DDTHH:MM:SSZ`, used for watermarks.
pub fn format_watermark(ts: OffsetDateTime) -> String {
	ts.to_offset(UtcOffset::UTC)
		.format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z"))
		.unwrap_or_default()
}

/// `YYYYMMDDHHMM`, the granularity of the search provider's date-range filter.
pub fn format_query(ts: OffsetDateTime) -> String {
	ts.to_offset(UtcOffset::UTC)
		.format(format_description!("[year][month][day][hour][minute]"))
		.unwrap_or_default()
}

/// Parses a watermark or user-supplied floor: RFC 3339, or a bare date meaning midnight UTC.
pub fn parse_since(raw: &str) -> Result<OffsetDateTime> {
	let raw = raw.trim();

	if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
		return Ok(ts);
	}

	Date::parse(raw, format_description!("[year]-[month]-[day]"))
		.map(|date| date.midnight().assume_utc())
		.map_err(|_| Error::InvalidTimestamp { value: raw.to_string() })
}

pub fn parse_log(raw: &str) -> Result<PrimitiveDateTime> {
	PrimitiveDateTime::parse(
		raw.trim(),
		format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
	)
	.map_err(|_| Error::InvalidTimestamp { value: raw.to_string() })
}
