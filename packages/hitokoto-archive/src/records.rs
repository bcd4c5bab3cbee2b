//! Normalized view of publish-log records, including records written by older releases.

use std::{collections::BTreeMap, path::Path, sync::LazyLock};

use regex::Regex;
use time::{Date, PrimitiveDateTime};

use crate::Result;
use hitokoto_domain::{
	records::{PublishLogRecord, PublishOutcome},
	timestamp,
};
use hitokoto_storage::publish_log;

pub const NO_SUMMARY: &str = "No summary available.";

const ABSTRACT_BASE: &str = "https://arxiv.org/abs/";
const POST_URL_BASE: &str = "https://twitter.com/user/status/";

static LEGACY_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"https://arxiv\.org/abs/(\d+\.\d+v\d+)").expect("valid legacy reference regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRecord {
	pub title: String,
	pub timestamp: PrimitiveDateTime,
	pub summary: String,
	pub arxiv_id: Option<String>,
	pub post_id: Option<String>,
	pub posted_units: usize,
	pub error: Option<String>,
}
impl ArchiveRecord {
	/// Normalizes one record. Only an unparsable timestamp is fatal; every other gap has a
	/// fallback.
	pub fn from_log(record: PublishLogRecord) -> Result<Self> {
		let timestamp = timestamp::parse_log(&record.timestamp)?;
		let arxiv_id = record
			.arxiv_id
			.clone()
			.filter(|id| !id.is_empty())
			.or_else(|| legacy_identifier(&record));
		let summary = record
			.summary
			.clone()
			.filter(|summary| !summary.trim().is_empty())
			.or_else(|| {
				record
					.tweets
					.iter()
					.find(|unit| unit.kind == "post" || unit.kind == "greeting")
					.and_then(|unit| unit.text.clone())
			})
			.unwrap_or_else(|| NO_SUMMARY.to_string());
		let post_id = record.tweets.iter().find_map(|unit| unit.id.clone());

		Ok(Self {
			title: record.title,
			timestamp,
			summary,
			arxiv_id,
			post_id,
			posted_units: record.tweets.len(),
			error: record.error,
		})
	}

	pub fn date(&self) -> Date {
		self.timestamp.date()
	}

	pub fn outcome(&self) -> PublishOutcome {
		if self.error.is_some() { PublishOutcome::Failure } else { PublishOutcome::Success }
	}

	pub fn reference_url(&self) -> Option<String> {
		self.arxiv_id.as_deref().map(|id| format!("{ABSTRACT_BASE}{id}"))
	}

	pub fn post_url(&self) -> Option<String> {
		self.post_id.as_deref().map(|id| format!("{POST_URL_BASE}{id}"))
	}
}

/// Loads every publish log in `dir`. Files that cannot be read or normalized are logged and
/// skipped.
pub fn load_dir(dir: &Path) -> Result<Vec<ArchiveRecord>> {
	let mut records = Vec::new();

	for path in publish_log::list(dir)? {
		let loaded = publish_log::read(&path)
			.map_err(crate::Error::from)
			.and_then(ArchiveRecord::from_log);

		match loaded {
			Ok(record) => records.push(record),
			Err(err) => {
				tracing::warn!(
					path = %path.display(),
					error = %err,
					"Skipping unreadable publish log."
				);
			},
		}
	}

	Ok(records)
}

/// Groups records by calendar date, newest record first within each day.
pub fn group_by_date(records: &[ArchiveRecord]) -> BTreeMap<Date, Vec<&ArchiveRecord>> {
	let mut groups: BTreeMap<Date, Vec<&ArchiveRecord>> = BTreeMap::new();

	for record in records {
		groups.entry(record.date()).or_default().push(record);
	}
	for day in groups.values_mut() {
		day.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
	}

	groups
}

fn legacy_identifier(record: &PublishLogRecord) -> Option<String> {
	let texts = record
		.tweets
		.iter()
		.filter_map(|unit| unit.text.as_deref())
		.chain(record.post_text.as_deref());

	texts
		.filter_map(|text| LEGACY_REFERENCE.captures(text))
		.find_map(|captures| captures.get(1).map(|id| id.as_str().to_string()))
}

#[cfg(test)]
mod tests {
	use time::macros::datetime;

	use super::*;

	fn legacy(raw: &str) -> PublishLogRecord {
		serde_json::from_str(raw).expect("Failed to parse fixture.")
	}

	#[test]
	fn legacy_record_recovers_identifier_and_summary_from_posts() {
		let record = legacy(
			r#"{
				"title": "Old paper",
				"timestamp": "2024-02-01 10:00:00",
				"tweets": [
					{"type": "greeting", "id": "111", "text": "Hello! A short digest."},
					{"type": "paper", "text": "https://arxiv.org/abs/2401.00042v3"}
				]
			}"#,
		);
		let normalized = ArchiveRecord::from_log(record).expect("Normalize failed.");

		assert_eq!(normalized.arxiv_id.as_deref(), Some("2401.00042v3"));
		assert_eq!(normalized.summary, "Hello! A short digest.");
		assert_eq!(normalized.post_url().as_deref(), Some("https://twitter.com/user/status/111"));
		assert_eq!(normalized.posted_units, 2);
		assert_eq!(normalized.timestamp, datetime!(2024-02-01 10:00:00));
	}

	#[test]
	fn identifier_falls_back_to_post_text() {
		let record = legacy(
			r#"{
				"title": "T",
				"timestamp": "2024-02-01 10:00:00",
				"post_text": "Hi!\n\nhttps://arxiv.org/abs/2401.00007v1"
			}"#,
		);
		let normalized = ArchiveRecord::from_log(record).expect("Normalize failed.");

		assert_eq!(normalized.arxiv_id.as_deref(), Some("2401.00007v1"));
		assert_eq!(normalized.summary, NO_SUMMARY);
		assert_eq!(normalized.post_url(), None);
	}

	#[test]
	fn legacy_reference_pattern_requires_a_version() {
		assert!(LEGACY_REFERENCE.is_match("see https://arxiv.org/abs/2401.00042v3 now"));
		assert!(!LEGACY_REFERENCE.is_match("https://arxiv.org/abs/2401.00042"));
	}

	#[test]
	fn failure_is_keyed_on_error() {
		let record = legacy(
			r#"{"title":"T","timestamp":"2024-02-01 10:00:00","summary":"S","error":"403"}"#,
		);
		let normalized = ArchiveRecord::from_log(record).expect("Normalize failed.");

		assert_eq!(normalized.outcome(), PublishOutcome::Failure);
	}

	#[test]
	fn bad_timestamp_is_rejected() {
		let record = legacy(r#"{"title":"T","timestamp":"yesterday"}"#);

		assert!(ArchiveRecord::from_log(record).is_err());
	}

	#[test]
	fn groups_by_day_newest_first() {
		let records = ["2024-02-01 09:00:00", "2024-02-01 18:00:00", "2024-02-03 08:00:00"]
			.into_iter()
			.map(|ts| {
				let raw = format!(r#"{{"title":"{ts}","timestamp":"{ts}"}}"#);

				ArchiveRecord::from_log(legacy(&raw)).expect("Normalize failed.")
			})
			.collect::<Vec<_>>();
		let groups = group_by_date(&records);
		let first_day = &groups[&time::macros::date!(2024-02-01)];

		assert_eq!(groups.len(), 2);
		assert_eq!(first_day[0].title, "2024-02-01 18:00:00");
	}
}
