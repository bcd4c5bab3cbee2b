//! Markdown statistics and CSV export over a publish-log directory.

use std::{collections::BTreeMap, fmt::Write};

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{Result, records::ArchiveRecord};
use hitokoto_domain::{records::PublishOutcome, timestamp};

const RECENT_RECORDS: usize = 10;
const TITLE_CHARS: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
	pub successes: usize,
	pub failures: usize,
	/// Successful records per day.
	pub daily: BTreeMap<Date, usize>,
}
impl Stats {
	pub fn collect(records: &[ArchiveRecord]) -> Self {
		let mut stats = Self::default();

		for record in records {
			match record.outcome() {
				PublishOutcome::Success => {
					stats.successes += 1;
					*stats.daily.entry(record.date()).or_default() += 1;
				},
				PublishOutcome::Failure => stats.failures += 1,
			}
		}

		stats
	}

	pub fn first_day(&self) -> Option<Date> {
		self.daily.keys().next().copied()
	}

	pub fn last_day(&self) -> Option<Date> {
		self.daily.keys().next_back().copied()
	}
}

pub fn markdown(records: &[ArchiveRecord], generated_at: OffsetDateTime) -> String {
	let stats = Stats::collect(records);
	let mut out = String::from("# Publish log report\n\n");
	let _ = writeln!(out, "Generated: {}\n", timestamp::format_log(generated_at));

	out.push_str("## Totals\n\n");

	let _ = writeln!(out, "- Successful posts: {}", stats.successes);
	let _ = writeln!(out, "- Failed attempts: {}", stats.failures);
	let _ = writeln!(out, "- Days with posts: {}", stats.daily.len());

	if let (Some(first), Some(last)) = (stats.first_day(), stats.last_day()) {
		let _ = writeln!(out, "- Period: {first} to {last}");
	}

	out.push_str("\n## Posts per day\n\n| Date | Posts |\n|---|---|\n");

	for (date, count) in stats.daily.iter().rev() {
		let _ = writeln!(out, "| {date} | {count} |");
	}

	out.push_str("\n## Recent records\n\n");
	out.push_str("| Timestamp | Title | Status | Posts |\n|---|---|---|---|\n");

	let mut recent = records.iter().collect::<Vec<_>>();

	recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

	for record in recent.into_iter().take(RECENT_RECORDS) {
		let status = match record.outcome() {
			PublishOutcome::Success => "success",
			PublishOutcome::Failure => "failed",
		};
		let _ = writeln!(
			out,
			"| {} | {} | {status} | {} |",
			timestamp::format_log(record.timestamp.assume_utc()),
			cell(&shorten(&record.title)),
			record.posted_units
		);
	}

	out
}

/// One exported record. Column order is the CSV header order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
	pub date: String,
	pub title: String,
	pub status: String,
	pub error: Option<String>,
	pub tweet_count: usize,
	pub timestamp: String,
}
impl From<&ArchiveRecord> for CsvRow {
	fn from(record: &ArchiveRecord) -> Self {
		let status = match record.outcome() {
			PublishOutcome::Success => "Success",
			PublishOutcome::Failure => "Failed",
		};

		Self {
			date: record.date().to_string(),
			title: record.title.clone(),
			status: status.to_string(),
			error: record.error.clone(),
			tweet_count: record.posted_units,
			timestamp: timestamp::format_log(record.timestamp.assume_utc()),
		}
	}
}

/// Encodes `records` as CSV with a header row, in the order given.
pub fn to_csv(records: &[ArchiveRecord]) -> Result<Vec<u8>> {
	let mut writer = csv::Writer::from_writer(Vec::new());

	for record in records {
		writer.serialize(CsvRow::from(record))?;
	}

	writer.into_inner().map_err(|err| crate::Error::Csv(err.into_error().into()))
}

fn shorten(title: &str) -> String {
	if title.chars().count() <= TITLE_CHARS {
		return title.to_string();
	}

	let mut out: String = title.chars().take(TITLE_CHARS).collect();

	out.push_str("...");

	out
}

/// Keeps a value inside its table cell.
fn cell(text: &str) -> String {
	text.replace('|', "\\|").replace('\n', " ")
}
