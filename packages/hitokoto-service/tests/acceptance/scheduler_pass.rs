use time::{Duration, OffsetDateTime};

use hitokoto_domain::{keyword_set, timestamp};
use hitokoto_service::SetOutcome;
use hitokoto_testkit::Attempt;

use super::{Harness, papers};

#[tokio::test]
async fn pass_advances_watermark_and_shares_processed_ids_across_sets() {
	let harness = Harness::new(papers(5));
	let started = OffsetDateTime::now_utc() - Duration::seconds(1);
	let report = harness.orchestrator.run(&harness.cfg.search_sets).await.expect("Pass failed.");
	let finished = OffsetDateTime::now_utc();
	let state = harness.state.snapshot();
	let watermark = &state.watermarks["quantum_cryptography"];
	let floor = timestamp::parse_since(&watermark.timestamp).expect("Unreadable watermark.");

	assert_eq!(report.completed(), 2);
	assert_eq!(report.newly_processed(), 5, "The second set sees the first set's papers.");
	assert_eq!(state.processed_ids.len(), 5);
	assert!(state.watermarks.contains_key("large language model"));
	assert!(floor >= started && floor <= finished);
	assert_eq!(harness.state.save_count(), 1);

	let rerun = harness.orchestrator.run(&harness.cfg.search_sets).await.expect("Pass failed.");
	let queries = harness.fakes.search.queries();

	assert_eq!(rerun.newly_processed(), 0);
	assert_eq!(queries.len(), 4);
	assert_eq!(queries[2].since_timestamp, Some(floor));
	assert_eq!(harness.fakes.publisher.posts().len(), 1);
}

#[tokio::test]
async fn failed_set_keeps_its_watermark_and_does_not_block_others() {
	let harness = Harness::new(papers(3));

	harness.fakes.search.fail_for_keyword("quantum");

	let report = harness.orchestrator.run(&harness.cfg.search_sets).await.expect("Pass failed.");
	let state = harness.state.snapshot();

	assert!(matches!(report.sets[0].outcome, SetOutcome::Failed { .. }));
	assert!(matches!(report.sets[1].outcome, SetOutcome::Completed(_)));
	assert!(!state.watermarks.contains_key("quantum_cryptography"));
	assert!(state.watermarks.contains_key("large language model"));
	assert_eq!(state.processed_ids.len(), 3);
	assert!(harness.fakes.publisher.posts().is_empty(), "The surviving set has posting disabled.");
}

#[tokio::test]
async fn set_without_keywords_is_skipped() {
	let harness = Harness::new(papers(1));
	let mut empty = harness.cfg.search_sets[0].clone();

	empty.keywords.clear();

	let report = harness.orchestrator.run(&[empty]).await.expect("Pass failed.");

	assert!(matches!(report.sets[0].outcome, SetOutcome::Skipped { .. }));
	assert!(harness.fakes.search.queries().is_empty());
}

#[tokio::test]
async fn completed_set_renders_its_archive() {
	let harness = Harness::new(papers(2));

	harness.orchestrator.run(&harness.cfg.search_sets[..1]).await.expect("Pass failed.");

	let site = harness.root.path().join("site/quantum");

	assert!(site.join("index.html").is_file());
	assert!(site.join("css/style.css").is_file());
	assert!(!harness.root.path().join("site/llm").exists());
}

#[tokio::test]
async fn later_set_reuses_download_from_earlier_set() {
	let harness = Harness::new(papers(1));
	let id = "2403.00001v1";

	harness.fakes.summarizer.push_script([Attempt::Fail, Attempt::Fail, Attempt::Fail]);

	let report = harness.orchestrator.run(&harness.cfg.search_sets).await.expect("Pass failed.");
	let layout = harness.layout();
	let first = layout
		.download_dir(&keyword_set::download_partition(&harness.cfg.search_sets[0].keywords));
	let second = layout
		.download_dir(&keyword_set::download_partition(&harness.cfg.search_sets[1].keywords));
	let SetOutcome::Completed(first_batch) = &report.sets[0].outcome else {
		panic!("Expected the first set to complete.");
	};
	let SetOutcome::Completed(second_batch) = &report.sets[1].outcome else {
		panic!("Expected the second set to complete.");
	};

	assert_eq!(first_batch.failed, 1);
	assert!(first_batch.newly_processed.is_empty());
	assert_eq!(second_batch.newly_processed, vec![id]);
	assert_eq!(harness.fakes.fetcher.calls(), 1, "The second set must not fetch again.");
	assert_eq!(harness.fakes.summarizer.calls(), 4);
	assert!(first.join(format!("{id}.pdf")).is_file());
	assert_eq!(
		std::fs::read(second.join(format!("{id}.pdf"))).expect("Copied document missing."),
		format!("%PDF-fake http://arxiv.org/pdf/{id}").into_bytes()
	);
	assert!(harness.is_recorded(id));
}
