use std::fs;

use time::macros::date;

use hitokoto_archive::{RenderMode, render};
use hitokoto_domain::records::PublishLogRecord;
use hitokoto_storage::publish_log::PublishLog;

fn seed_logs(dir: &std::path::Path) {
	let log = PublishLog::new(dir);

	log.write(&PublishLogRecord::published(
		"Quantum paper",
		"2024-03-05 09:00:00".to_string(),
		"Quantum summary.",
		"Hi! Quantum summary.",
		"2403.00001v1",
		"1001".to_string(),
	))
	.expect("Write failed.");
	log.write(&PublishLogRecord::silent(
		"Older paper",
		"2024-02-20 09:00:00".to_string(),
		"Older summary.",
		"Hi! Older summary.",
		"2402.00001v1",
	))
	.expect("Write failed.");
	log.write(&PublishLogRecord::failed(
		"Failed paper",
		"2024-03-05 10:00:00".to_string(),
		"Failed summary.",
		"2403.00002v1",
		"403 Forbidden".to_string(),
	))
	.expect("Write failed.");
	fs::write(dir.join("broken_twitter_log.json"), "{not json")
		.expect("Failed to seed broken log.");
}

#[test]
fn renders_every_page_and_skips_broken_logs() {
	let logs = tempfile::tempdir().expect("Failed to create temp dir.");
	let site = tempfile::tempdir().expect("Failed to create temp dir.");

	seed_logs(logs.path());

	let summary = render(logs.path(), site.path(), RenderMode::All, date!(2024-03-06))
		.expect("Render failed.");

	assert_eq!(summary.records, 3);

	for page in [
		"2024-03-05.html",
		"2024-02-20.html",
		"2024-03.html",
		"2024-02.html",
		"2024.html",
		"index.html",
		"css/style.css",
		"js/script.js",
	] {
		assert!(site.path().join(page).is_file(), "Missing {page}.");
	}

	let day = fs::read_to_string(site.path().join("2024-03-05.html")).expect("Read failed.");

	assert!(day.contains("Quantum summary."));
	assert!(day.contains("403 Forbidden"));
	assert!(day.contains("https://twitter.com/user/status/1001"));
}

#[test]
fn current_only_renders_today_and_index() {
	let logs = tempfile::tempdir().expect("Failed to create temp dir.");
	let site = tempfile::tempdir().expect("Failed to create temp dir.");

	seed_logs(logs.path());

	render(logs.path(), site.path(), RenderMode::CurrentOnly, date!(2024-03-05))
		.expect("Render failed.");

	assert!(site.path().join("2024-03-05.html").is_file());
	assert!(site.path().join("2024-03.html").is_file());
	assert!(site.path().join("2024.html").is_file());
	assert!(site.path().join("index.html").is_file());
	assert!(!site.path().join("2024-02-20.html").exists());
	assert!(!site.path().join("2024-02.html").exists());
}

#[test]
fn rendering_leaves_logs_untouched() {
	let logs = tempfile::tempdir().expect("Failed to create temp dir.");
	let site = tempfile::tempdir().expect("Failed to create temp dir.");

	seed_logs(logs.path());

	let before = hitokoto_storage::publish_log::list(logs.path()).expect("List failed.");

	render(logs.path(), site.path(), RenderMode::All, date!(2024-03-06)).expect("Render failed.");

	assert_eq!(hitokoto_storage::publish_log::list(logs.path()).expect("List failed."), before);
}
