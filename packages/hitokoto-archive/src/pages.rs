//! HTML for the daily, monthly, yearly and index pages.
//!
//! Every page lives at the top of the output directory, so links and asset paths are relative to
//! it.

use std::{collections::BTreeMap, fmt::Write};

use time::{Date, Month};

use crate::records::ArchiveRecord;
use hitokoto_domain::records::PublishOutcome;

pub const STYLE: &str = include_str!("../assets/style.css");
pub const SCRIPT: &str = include_str!("../assets/script.js");

pub const STYLE_PATH: &str = "css/style.css";
pub const SCRIPT_PATH: &str = "js/script.js";
pub const INDEX_FILE: &str = "index.html";

/// Days that feed the index page.
pub const INDEX_DAYS: usize = 5;
/// Cards shown on the index page.
pub const INDEX_RECORDS: usize = 10;

pub type DayGroups<'a> = BTreeMap<Date, Vec<&'a ArchiveRecord>>;

pub fn daily_file(date: Date) -> String {
	format!("{}.html", date_label(date))
}

pub fn monthly_file(year: i32, month: Month) -> String {
	format!("{}.html", month_label(year, month))
}

pub fn yearly_file(year: i32) -> String {
	format!("{year:04}.html")
}

pub fn daily(date: Date, records: &[&ArchiveRecord], updated: Date) -> String {
	let crumbs = [
		Crumb::link("Home", INDEX_FILE),
		Crumb::link(&format!("{:04}", date.year()), &yearly_file(date.year())),
		Crumb::link(
			&month_label(date.year(), date.month()),
			&monthly_file(date.year(), date.month()),
		),
		Crumb::current(&date_label(date)),
	];
	let intro = format!("{} papers summarized on {}.", records.len(), date_label(date));

	layout(&format!("Papers of {}", date_label(date)), &crumbs, &intro, &cards(records), updated)
}

/// Month page: one link per day with its record count.
pub fn monthly(year: i32, month: Month, groups: &DayGroups<'_>, updated: Date) -> String {
	let days = groups
		.iter()
		.rev()
		.filter(|(date, _)| date.year() == year && date.month() == month)
		.collect::<Vec<_>>();
	let total: usize = days.iter().map(|(_, records)| records.len()).sum();
	let mut list = String::from("<ul class=\"date-list\">\n");

	for (date, records) in &days {
		let _ = writeln!(
			list,
			"<li><a href=\"{}\">{}</a> ({})</li>",
			daily_file(**date),
			date_label(**date),
			records.len()
		);
	}

	list.push_str("</ul>\n");

	let crumbs = [
		Crumb::link("Home", INDEX_FILE),
		Crumb::link(&format!("{year:04}"), &yearly_file(year)),
		Crumb::current(&month_label(year, month)),
	];
	let intro = format!("{total} papers across {} days.", days.len());

	layout(&format!("Papers of {}", month_label(year, month)), &crumbs, &intro, &list, updated)
}

/// Year page: one link per month with its record count.
pub fn yearly(year: i32, groups: &DayGroups<'_>, updated: Date) -> String {
	let months = month_counts(groups)
		.into_iter()
		.rev()
		.filter(|((y, _), _)| *y == year)
		.collect::<Vec<_>>();
	let total: usize = months.iter().map(|(_, count)| count).sum();
	let mut list = String::from("<ul class=\"month-list\">\n");

	for ((y, month), count) in &months {
		let _ = writeln!(
			list,
			"<li><a href=\"{}\">{}</a> ({count})</li>",
			monthly_file(*y, *month),
			month_label(*y, *month)
		);
	}

	list.push_str("</ul>\n");

	let crumbs = [Crumb::link("Home", INDEX_FILE), Crumb::current(&format!("{year:04}"))];
	let intro = format!("{total} papers in {year:04}.");

	layout(&format!("Papers of {year:04}"), &crumbs, &intro, &list, updated)
}

/// Landing page: the newest records from the latest days, then the archive tree.
pub fn index(groups: &DayGroups<'_>, updated: Date) -> String {
	let mut recent = groups
		.values()
		.rev()
		.take(INDEX_DAYS)
		.flat_map(|records| records.iter().copied())
		.collect::<Vec<_>>();

	recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
	recent.truncate(INDEX_RECORDS);

	let mut body = cards(&recent);

	body.push_str(&archive_tree(groups));

	let intro = format!("The {} most recent summaries.", recent.len());

	layout("Paper digest", &[Crumb::current("Home")], &intro, &body, updated)
}

pub fn escape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());

	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(c),
		}
	}

	out
}

struct Crumb {
	label: String,
	href: Option<String>,
}
impl Crumb {
	fn link(label: &str, href: &str) -> Self {
		Self { label: label.to_string(), href: Some(href.to_string()) }
	}

	fn current(label: &str) -> Self {
		Self { label: label.to_string(), href: None }
	}
}

fn layout(title: &str, crumbs: &[Crumb], intro: &str, body: &str, updated: Date) -> String {
	let mut nav = String::from("<ol class=\"breadcrumb\">");

	for crumb in crumbs {
		let _ = match &crumb.href {
			Some(href) =>
				write!(nav, "<li><a href=\"{}\">{}</a></li>", escape(href), escape(&crumb.label)),
			None => write!(nav, "<li aria-current=\"page\">{}</li>", escape(&crumb.label)),
		};
	}

	nav.push_str("</ol>");

	format!(
		"<!DOCTYPE html>
<html lang=\"en\">
<head>
<meta charset=\"utf-8\">
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">
<title>{title}</title>
<link rel=\"stylesheet\" href=\"{STYLE_PATH}\">
</head>
<body>
<div class=\"container\">
<header><h1>{title}</h1><span class=\"updated\">Updated {updated}</span></header>
<nav>{nav}</nav>
<p class=\"intro\">{intro}</p>
{body}
</div>
<div id=\"copy-toast\">Copied</div>
<script src=\"{SCRIPT_PATH}\"></script>
</body>
</html>
",
		title = escape(title),
		updated = date_label(updated),
		intro = escape(intro),
	)
}

fn cards(records: &[&ArchiveRecord]) -> String {
	if records.is_empty() {
		return "<p class=\"empty\">No papers.</p>\n".to_string();
	}

	let mut out = String::from("<div class=\"cards\">\n");

	for record in records {
		out.push_str(&card(record));
	}

	out.push_str("</div>\n");

	out
}

fn card(record: &ArchiveRecord) -> String {
	let mut out = String::from("<article class=\"paper-card\">\n");
	let _ = writeln!(out, "<h2 class=\"paper-title\">{}</h2>", escape(&record.title));
	let _ = writeln!(out, "<div class=\"paper-date\">{}</div>", escape(&date_time_label(record)));

	if record.outcome() == PublishOutcome::Failure {
		out.push_str("<span class=\"badge failed\">Failed</span>\n");

		if let Some(error) = &record.error {
			let _ = writeln!(out, "<p class=\"error-text\">{}</p>", escape(error));
		}
	}

	let _ = writeln!(out, "<p class=\"summary-text\">{}</p>", escape(&record.summary));

	out.push_str("<div class=\"links\">");

	if let Some(url) = record.reference_url() {
		let url = escape(&url);
		let _ = write!(
			out,
			"<a href=\"{url}\">arXiv</a><a href=\"#\" class=\"copy-url\" data-url=\"{url}\">Copy link</a>"
		);
	}
	if let Some(url) = record.post_url() {
		let _ = write!(out, "<a href=\"{}\" target=\"_blank\">Post</a>", escape(&url));
	}

	out.push_str("</div>\n</article>\n");

	out
}

fn archive_tree(groups: &DayGroups<'_>) -> String {
	let counts = month_counts(groups);
	let mut years: BTreeMap<i32, Vec<(Month, usize)>> = BTreeMap::new();

	for ((year, month), count) in counts {
		years.entry(year).or_default().push((month, count));
	}

	let mut out = String::from("<section class=\"archive\">\n<h2>Archive</h2>\n");

	for (year, months) in years.iter().rev() {
		let total: usize = months.iter().map(|(_, count)| count).sum();
		let _ = writeln!(
			out,
			"<h3><a href=\"{}\">{year:04}</a> ({total})</h3>",
			yearly_file(*year)
		);

		out.push_str("<ul>\n");

		for (month, count) in months.iter().rev() {
			let _ = writeln!(
				out,
				"<li><a href=\"{}\">{}</a> ({count})</li>",
				monthly_file(*year, *month),
				month_label(*year, *month)
			);
		}

		out.push_str("</ul>\n");
	}

	out.push_str("</section>\n");

	out
}

/// Record counts keyed by `(year, month)`, in calendar order.
fn month_counts(groups: &DayGroups<'_>) -> Vec<((i32, Month), usize)> {
	let mut counts: BTreeMap<(i32, u8), usize> = BTreeMap::new();

	for (date, records) in groups {
		*counts.entry((date.year(), u8::from(date.month()))).or_default() += records.len();
	}

	counts
		.into_iter()
		.filter_map(|((year, month), count)| {
			Month::try_from(month).ok().map(|month| ((year, month), count))
		})
		.collect()
}

fn date_label(date: Date) -> String {
	format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
}

fn month_label(year: i32, month: Month) -> String {
	format!("{year:04}-{:02}", u8::from(month))
}

fn date_time_label(record: &ArchiveRecord) -> String {
	let ts = record.timestamp;

	format!("{} {:02}:{:02}", date_label(ts.date()), ts.hour(), ts.minute())
}
