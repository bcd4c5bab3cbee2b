use std::{
	collections::BTreeSet,
	path::{Path, PathBuf},
};

use time::{Date, Month};

use crate::{
	Result,
	pages::{self, DayGroups},
	records,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
	/// Every daily, monthly and yearly page.
	All,
	/// Only the pages that contain `today`, plus the index.
	#[default]
	CurrentOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
	pub records: usize,
	pub pages: Vec<PathBuf>,
}

/// Renders the archive for one publish-log directory.
///
/// Reads the logs and writes HTML; nothing else on disk is touched. An empty log directory is
/// reported with a warning and leaves the output directory as it was.
pub fn render(
	log_dir: &Path,
	output_dir: &Path,
	mode: RenderMode,
	today: Date,
) -> Result<RenderSummary> {
	let all = records::load_dir(log_dir)?;

	if all.is_empty() {
		tracing::warn!(log_dir = %log_dir.display(), "No publish logs to render.");

		return Ok(RenderSummary::default());
	}

	let groups = records::group_by_date(&all);
	let mut writer = PageWriter { output_dir, pages: Vec::new() };

	match mode {
		RenderMode::All => {
			for (date, day) in &groups {
				writer.write(&pages::daily_file(*date), &pages::daily(*date, day, today))?;
			}
			for (year, month) in months(&groups) {
				writer.write(
					&pages::monthly_file(year, month),
					&pages::monthly(year, month, &groups, today),
				)?;
			}
			for year in years(&groups) {
				writer.write(&pages::yearly_file(year), &pages::yearly(year, &groups, today))?;
			}
		},
		RenderMode::CurrentOnly => {
			match groups.get(&today) {
				Some(day) => {
					writer.write(&pages::daily_file(today), &pages::daily(today, day, today))?;
				},
				None => {
					tracing::warn!(date = %today, "No publish logs for the current date.");
				},
			}

			if months(&groups).contains(&(today.year(), today.month())) {
				writer.write(
					&pages::monthly_file(today.year(), today.month()),
					&pages::monthly(today.year(), today.month(), &groups, today),
				)?;
			}
			if years(&groups).contains(&today.year()) {
				writer.write(
					&pages::yearly_file(today.year()),
					&pages::yearly(today.year(), &groups, today),
				)?;
			}
		},
	}

	writer.write(pages::INDEX_FILE, &pages::index(&groups, today))?;
	writer.write(pages::STYLE_PATH, pages::STYLE)?;
	writer.write(pages::SCRIPT_PATH, pages::SCRIPT)?;

	tracing::info!(
		output_dir = %output_dir.display(),
		records = all.len(),
		pages = writer.pages.len(),
		"Archive rendered."
	);

	Ok(RenderSummary { records: all.len(), pages: writer.pages })
}

struct PageWriter<'a> {
	output_dir: &'a Path,
	pages: Vec<PathBuf>,
}
impl PageWriter<'_> {
	fn write(&mut self, relative: &str, content: &str) -> Result<()> {
		let path = self.output_dir.join(relative);

		hitokoto_storage::write_atomic(&path, content.as_bytes())?;
		tracing::debug!(path = %path.display(), "Page written.");
		self.pages.push(path);

		Ok(())
	}
}

fn months(groups: &DayGroups<'_>) -> Vec<(i32, Month)> {
	let mut seen = BTreeSet::new();

	groups
		.keys()
		.filter(|date| seen.insert((date.year(), u8::from(date.month()))))
		.map(|date| (date.year(), date.month()))
		.collect()
}

fn years(groups: &DayGroups<'_>) -> BTreeSet<i32> {
	groups.keys().map(|date| date.year()).collect()
}

#[cfg(test)]
mod tests {
	use time::macros::date;

	use super::*;

	#[test]
	fn empty_log_dir_writes_nothing() {
		let logs = tempfile::tempdir().expect("Failed to create temp dir.");
		let site = tempfile::tempdir().expect("Failed to create temp dir.");
		let summary = render(logs.path(), site.path(), RenderMode::All, date!(2024-03-05))
			.expect("Render failed.");

		assert_eq!(summary, RenderSummary::default());
		assert!(!site.path().join("index.html").exists());
	}
}
