//! Cross-run state: per keyword-set watermarks and the shared processed-id set.
//!
//! Both are loaded once before a scheduler pass and saved once after it.

use std::{
	collections::{BTreeMap, BTreeSet},
	path::{Path, PathBuf},
	sync::{
		Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use crate::{DataLayout, Error, Result, fs};
use hitokoto_domain::records::WatermarkEntry;

pub type Watermarks = BTreeMap<String, WatermarkEntry>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunState {
	pub watermarks: Watermarks,
	pub processed_ids: BTreeSet<String>,
}

pub trait StateStore
where
	Self: Send + Sync,
{
	fn load(&self) -> Result<RunState>;

	/// Persists the processed-id set first, then the watermarks, each as a whole-file replace.
	fn save(&self, state: &RunState) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileStateStore {
	watermark_path: PathBuf,
	processed_ids_path: PathBuf,
}
impl FileStateStore {
	pub fn new(watermark_path: impl Into<PathBuf>, processed_ids_path: impl Into<PathBuf>) -> Self {
		Self {
			watermark_path: watermark_path.into(),
			processed_ids_path: processed_ids_path.into(),
		}
	}

	pub fn from_layout(layout: &DataLayout) -> Self {
		Self::new(layout.watermark_file(), layout.processed_ids_file())
	}

	pub fn watermark_path(&self) -> &Path {
		&self.watermark_path
	}

	pub fn processed_ids_path(&self) -> &Path {
		&self.processed_ids_path
	}
}
impl StateStore for FileStateStore {
	fn load(&self) -> Result<RunState> {
		let watermarks = fs::read_json(&self.watermark_path)?.unwrap_or_default();
		let processed_ids = read_id_list(&self.processed_ids_path)?;

		Ok(RunState { watermarks, processed_ids })
	}

	fn save(&self, state: &RunState) -> Result<()> {
		write_id_list(&self.processed_ids_path, &state.processed_ids)?;
		fs::write_json(&self.watermark_path, &state.watermarks)
	}
}

#[derive(Debug, Default)]
pub struct MemoryStateStore {
	state: Mutex<RunState>,
	saves: AtomicUsize,
}
impl MemoryStateStore {
	pub fn new(state: RunState) -> Self {
		Self { state: Mutex::new(state), saves: AtomicUsize::new(0) }
	}

	pub fn snapshot(&self) -> RunState {
		self.state.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn save_count(&self) -> usize {
		self.saves.load(Ordering::SeqCst)
	}
}
impl StateStore for MemoryStateStore {
	fn load(&self) -> Result<RunState> {
		Ok(self.snapshot())
	}

	fn save(&self, state: &RunState) -> Result<()> {
		*self.state.lock().unwrap_or_else(|err| err.into_inner()) = state.clone();

		self.saves.fetch_add(1, Ordering::SeqCst);

		Ok(())
	}
}

/// Reads a newline-separated identifier list. A missing file is an empty set.
pub fn read_id_list(path: &Path) -> Result<BTreeSet<String>> {
	let Some(bytes) = fs::read_optional(path)? else {
		return Ok(BTreeSet::new());
	};
	let text = String::from_utf8(bytes).map_err(|err| {
		Error::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, err))
	})?;

	Ok(text.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_string).collect())
}

pub fn write_id_list(path: &Path, ids: &BTreeSet<String>) -> Result<()> {
	let mut text = ids.iter().map(String::as_str).collect::<Vec<_>>().join("\n");

	if !text.is_empty() {
		text.push('\n');
	}

	fs::write_atomic(path, text.as_bytes())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_files_load_as_empty_state() {
		let dir = tempfile::tempdir().expect("Failed to create temp dir.");
		let store = FileStateStore::from_layout(&DataLayout::new(dir.path()));

		assert_eq!(store.load().expect("Load failed."), RunState::default());
	}

	#[test]
	fn id_list_ignores_blank_lines() {
		let dir = tempfile::tempdir().expect("Failed to create temp dir.");
		let path = dir.path().join("ids.txt");

		std::fs::write(&path, "2401.00002v1\n\n  2401.00001v1 \n").expect("Failed to seed ids.");

		let ids = read_id_list(&path).expect("Read failed.");

		assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec!["2401.00001v1", "2401.00002v1"]);
	}
}
