use hitokoto_domain::records::PublishOutcome;

use super::{Harness, options, papers};

#[tokio::test]
async fn five_candidates_are_recorded_and_only_the_last_is_posted() {
	let harness = Harness::new(papers(5));
	let report = harness.run_batch(&options(5)).await;
	let posts = harness.fakes.publisher.posts();

	assert_eq!(report.selected, 5);
	assert_eq!(report.newly_processed.len(), 5);
	assert!(report.published);
	assert_eq!(posts.len(), 1);
	assert!(posts[0].ends_with("https://arxiv.org/abs/2403.00001v1"));
	assert!(posts[0].starts_with("Hi! "));

	for paper in papers(5) {
		assert!(harness.is_recorded(&paper.id), "{} should be recorded.", paper.id);
	}

	let records = harness.log_records();
	let posted = records.iter().filter(|record| !record.tweets.is_empty()).collect::<Vec<_>>();

	assert_eq!(records.len(), 5);
	assert!(records.iter().all(|record| record.outcome() == PublishOutcome::Success));
	assert_eq!(posted.len(), 1);
	assert_eq!(posted[0].arxiv_id.as_deref(), Some("2403.00001v1"));
	assert_eq!(posted[0].tweets[0].text.as_deref(), Some(posts[0].as_str()));
}

#[tokio::test]
async fn cap_limits_selection_and_last_selected_publishes() {
	let harness = Harness::new(papers(5));
	let report = harness.run_batch(&options(2)).await;

	assert_eq!(report.newly_processed, vec!["2403.00005v1", "2403.00004v1"]);
	assert!(harness.fakes.publisher.posts()[0].ends_with("2403.00004v1"));
	assert!(!harness.is_recorded("2403.00003v1"));
	assert_eq!(harness.fakes.fetcher.calls(), 2);
}

#[tokio::test]
async fn test_mode_processes_a_single_paper() {
	let harness = Harness::new(papers(3));
	let report = harness.run_batch(&super::BatchOptions { test_mode: true, ..options(5) }).await;

	assert_eq!(report.newly_processed, vec!["2403.00003v1"]);
	assert_eq!(harness.fakes.publisher.posts().len(), 1);
}

#[tokio::test]
async fn skipped_publish_still_writes_success_records() {
	let harness = Harness::new(papers(2));
	let report =
		harness.run_batch(&super::BatchOptions { skip_publish: true, ..options(5) }).await;
	let records = harness.log_records();

	assert_eq!(report.newly_processed.len(), 2);
	assert!(!report.published);
	assert!(harness.fakes.publisher.posts().is_empty());
	assert_eq!(records.len(), 2);
	assert!(records.iter().all(|record| record.tweets.is_empty() && record.error.is_none()));
	assert!(records.iter().all(|record| record.post_text.is_some()));
}

#[tokio::test]
async fn summary_artifact_keeps_final_post_text() {
	let harness = Harness::new(papers(1));

	harness.run_batch(&options(1)).await;

	let artifact = hitokoto_storage::artifacts::ArtifactStore::new(&harness.layout())
		.read_summary("2403.00001v1")
		.expect("Failed to read summary.")
		.expect("Summary artifact missing.");

	assert_eq!(artifact.summary, "Synopsis 1.");
	assert_eq!(artifact.post_text, harness.fakes.publisher.posts()[0]);
	assert!(
		harness.layout().text_dir().join("2403.00001v1.txt").is_file(),
		"Extracted text should be kept."
	);
}
