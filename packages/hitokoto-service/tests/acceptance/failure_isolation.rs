use hitokoto_domain::records::PublishOutcome;

use super::{Harness, options, papers};

#[tokio::test]
async fn publish_failure_writes_failure_record_without_ledger_mark() {
	let harness = Harness::new(papers(2));

	harness.fakes.publisher.set_failing(true);

	let report = harness.run_batch(&options(2)).await;
	let records = harness.log_records();
	let failed = records
		.iter()
		.find(|record| record.outcome() == PublishOutcome::Failure)
		.expect("Failure record missing.");
	let error = failed.error.as_deref().unwrap_or_default();

	assert_eq!(report.newly_processed, vec!["2403.00002v1"]);
	assert_eq!(report.failed, 1);
	assert!(!report.published);
	assert!(harness.is_recorded("2403.00002v1"));
	assert!(!harness.is_recorded("2403.00001v1"));
	assert_eq!(records.len(), 2);
	assert_eq!(failed.arxiv_id.as_deref(), Some("2403.00001v1"));
	assert!(error.contains("403 Forbidden"));
	assert!(!error.contains("secret-token"));
}

#[tokio::test]
async fn failed_download_drops_candidate_and_keeps_the_rest() {
	let harness = Harness::new(papers(3));

	harness.fakes.fetcher.fail_for("http://arxiv.org/pdf/2403.00002v1");

	let report = harness.run_batch(&options(5)).await;

	assert_eq!(report.dropped, 1);
	assert_eq!(report.newly_processed, vec!["2403.00003v1", "2403.00001v1"]);
	assert!(!harness.is_recorded("2403.00002v1"));
}

#[tokio::test]
async fn extraction_failure_is_isolated_to_the_paper() {
	let harness = Harness::new(papers(2));

	harness.fakes.extractor.set_failing(true);

	let report = harness.run_batch(&options(2)).await;

	assert_eq!(report.failed, 2);
	assert!(report.newly_processed.is_empty());
	assert_eq!(harness.fakes.summarizer.calls(), 0);
	assert!(harness.fakes.publisher.posts().is_empty());
}
