use std::path::PathBuf;

use crate::{DataLayout, Result, fs, ledger};
use hitokoto_domain::records::SummaryArtifact;

/// Per-paper extracted text and summary files.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
	text_dir: PathBuf,
	summary_dir: PathBuf,
}
impl ArtifactStore {
	pub fn new(layout: &DataLayout) -> Self {
		Self { text_dir: layout.text_dir(), summary_dir: layout.summary_dir() }
	}

	pub fn text_path(&self, id: &str) -> Result<PathBuf> {
		ledger::validate_id(id)?;

		Ok(self.text_dir.join(format!("{id}.txt")))
	}

	pub fn summary_path(&self, id: &str) -> Result<PathBuf> {
		ledger::validate_id(id)?;

		Ok(self.summary_dir.join(format!("{id}_summary.json")))
	}

	pub fn write_text(&self, id: &str, text: &str) -> Result<PathBuf> {
		let path = self.text_path(id)?;

		fs::write_atomic(&path, text.as_bytes())?;

		Ok(path)
	}

	pub fn write_summary(&self, artifact: &SummaryArtifact) -> Result<PathBuf> {
		let path = self.summary_path(&artifact.arxiv_id)?;

		fs::write_json(&path, artifact)?;

		Ok(path)
	}

	pub fn read_summary(&self, id: &str) -> Result<Option<SummaryArtifact>> {
		fs::read_json(&self.summary_path(id)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn summary_is_keyed_by_identifier() {
		let dir = tempfile::tempdir().expect("Failed to create temp dir.");
		let store = ArtifactStore::new(&DataLayout::new(dir.path()));
		let artifact = SummaryArtifact {
			title: "T".to_string(),
			timestamp: "2024-01-02 03:04:05".to_string(),
			summary: "S".to_string(),
			post_text: "Hi! S".to_string(),
			arxiv_id: "2401.00001v1".to_string(),
		};
		let path = store.write_summary(&artifact).expect("Write failed.");

		assert!(path.ends_with("summary/2401.00001v1_summary.json"));
		assert_eq!(store.read_summary("2401.00001v1").expect("Read failed."), Some(artifact));
	}
}
