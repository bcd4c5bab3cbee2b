use std::path::{Path, PathBuf};

/// On-disk layout below the data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
	root: PathBuf,
}
impl DataLayout {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn processed_dir(&self) -> PathBuf {
		self.root.join("processed")
	}

	pub fn text_dir(&self) -> PathBuf {
		self.root.join("text")
	}

	pub fn summary_dir(&self) -> PathBuf {
		self.root.join("summary")
	}

	pub fn pdf_root(&self) -> PathBuf {
		self.root.join("pdf")
	}

	pub fn download_dir(&self, partition: &str) -> PathBuf {
		self.pdf_root().join(partition)
	}

	pub fn logs_root(&self) -> PathBuf {
		self.root.join("logs")
	}

	pub fn log_dir(&self, partition: &str) -> PathBuf {
		self.logs_root().join(partition)
	}

	pub fn watermark_file(&self) -> PathBuf {
		self.root.join("last_run_timestamp.json")
	}

	pub fn processed_ids_file(&self) -> PathBuf {
		self.root.join("processed_paper_ids.txt")
	}
}
