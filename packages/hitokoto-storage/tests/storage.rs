use std::collections::BTreeSet;

use hitokoto_domain::records::{LedgerEntry, WatermarkEntry};
use hitokoto_storage::{
	DataLayout,
	ledger::{self, FileLedger, Ledger},
	purge::{self, PurgeTargets},
	state::{FileStateStore, RunState, StateStore},
};

#[test]
fn file_ledger_marker_has_expected_shape() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let layout = DataLayout::new(dir.path());
	let ledger = FileLedger::new(layout.processed_dir());

	assert!(!ledger.contains("2401.00001v1").expect("Lookup failed."));

	ledger.mark("2401.00001v1", "Quantum keys").expect("Mark failed.");

	assert!(ledger::is_processed(&ledger, "2401.00001v1", None).expect("Lookup failed."));

	let raw = std::fs::read_to_string(layout.processed_dir().join("2401.00001v1.json"))
		.expect("Failed to read marker.");
	let entry: LedgerEntry = serde_json::from_str(&raw).expect("Marker is not JSON.");

	assert_eq!(entry.arxiv_id, "2401.00001v1");
	assert_eq!(entry.title, "Quantum keys");
	assert_eq!(entry.processed_at.len(), "YYYY-MM-DD HH:MM:SS".len());
}

#[test]
fn state_round_trips_through_files() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let layout = DataLayout::new(dir.path());
	let store = FileStateStore::from_layout(&layout);
	let mut state = RunState::default();

	state.watermarks.insert(
		"quantum_cryptography".to_string(),
		WatermarkEntry { timestamp: "2024-03-05T07:08:09Z".to_string(), last_paper_id: None },
	);
	state.processed_ids = BTreeSet::from(["2401.00001v1".to_string(), "2401.00002v1".to_string()]);
	store.save(&state).expect("Save failed.");

	assert_eq!(store.load().expect("Load failed."), state);

	let raw: serde_json::Value = serde_json::from_str(
		&std::fs::read_to_string(layout.watermark_file()).expect("Failed to read watermarks."),
	)
	.expect("Watermarks are not JSON.");

	assert_eq!(raw["quantum_cryptography"]["timestamp"], "2024-03-05T07:08:09Z");
	assert!(raw["quantum_cryptography"]["last_paper_id"].is_null());
	assert_eq!(
		std::fs::read_to_string(layout.processed_ids_file()).expect("Failed to read ids."),
		"2401.00001v1\n2401.00002v1\n"
	);
}

#[test]
fn purge_keeps_directories_and_drops_selected_content() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir.");
	let layout = DataLayout::new(dir.path());
	let ledger = FileLedger::new(layout.processed_dir());

	ledger.mark("2401.00001v1", "T").expect("Mark failed.");
	std::fs::create_dir_all(layout.text_dir()).expect("Failed to create text dir.");
	std::fs::write(layout.text_dir().join("2401.00001v1.txt"), "body")
		.expect("Failed to seed text.");
	std::fs::write(layout.processed_ids_file(), "2401.00001v1\n").expect("Failed to seed ids.");

	let report = purge::purge(&layout, PurgeTargets { processed: true, ..PurgeTargets::default() })
		.expect("Purge failed.");

	assert!(layout.processed_dir().is_dir());
	assert!(!ledger.contains("2401.00001v1").expect("Lookup failed."));
	assert!(!layout.processed_ids_file().exists());
	assert!(layout.text_dir().join("2401.00001v1.txt").exists());
	assert_eq!(report.cleared_dirs, vec![layout.processed_dir()]);
	assert!(PurgeTargets::default().is_empty());
	assert!(!PurgeTargets::all().is_empty());
}
