use hitokoto_testkit::Attempt;

use super::{Harness, options, papers};

#[tokio::test]
async fn rerun_over_same_candidates_does_no_work() {
	let harness = Harness::new(papers(5));

	harness.run_batch(&options(5)).await;

	let fetches = harness.fakes.fetcher.calls();
	let summaries = harness.fakes.summarizer.calls();
	let rerun = harness.run_batch(&options(5)).await;

	assert_eq!(rerun.selected, 0);
	assert!(rerun.newly_processed.is_empty());
	assert!(!rerun.published);
	assert_eq!(harness.fakes.fetcher.calls(), fetches);
	assert_eq!(harness.fakes.summarizer.calls(), summaries);
	assert_eq!(harness.fakes.publisher.posts().len(), 1);
}

#[tokio::test]
async fn exhausted_summarizer_leaves_paper_unrecorded_until_next_run() {
	let harness = Harness::new(papers(1));

	harness.fakes.summarizer.push_script([Attempt::Fail, Attempt::Fail, Attempt::Fail]);

	let first = harness.run_batch(&options(1)).await;

	assert_eq!(first.failed, 1);
	assert!(first.newly_processed.is_empty());
	assert!(!harness.is_recorded("2403.00001v1"));
	assert!(harness.log_records().is_empty());
	assert_eq!(harness.fakes.summarizer.calls(), 3);

	let second = harness.run_batch(&options(1)).await;

	assert_eq!(second.newly_processed, vec!["2403.00001v1"]);
	assert!(harness.is_recorded("2403.00001v1"));
	assert_eq!(harness.fakes.fetcher.calls(), 1, "The download from the first run is reused.");
}

#[tokio::test]
async fn rate_limited_summary_is_retried() {
	let harness = Harness::new(papers(1));

	harness.fakes.summarizer.push_script([Attempt::RateLimit]);

	let report = harness.run_batch(&options(1)).await;

	assert_eq!(report.newly_processed.len(), 1);
	assert_eq!(harness.fakes.summarizer.calls(), 2);
}

#[tokio::test]
async fn forced_processing_reruns_a_recorded_paper() {
	let harness = Harness::new(papers(1));

	harness.run_batch(&options(1)).await;

	let forced = harness
		.run_batch(&super::BatchOptions { force_process: true, ..options(1) })
		.await;

	assert_eq!(forced.newly_processed, vec!["2403.00001v1"]);
	assert_eq!(harness.fakes.fetcher.calls(), 1);
	assert_eq!(harness.fakes.publisher.posts().len(), 2);
}
