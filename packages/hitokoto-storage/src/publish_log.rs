//! Write-once publish outcome records, read back only by the archive.

use std::{
	fs as std_fs,
	path::{Path, PathBuf},
};

use crate::{Error, Result, fs, ledger};
use hitokoto_domain::records::PublishLogRecord;

pub const FILE_SUFFIX: &str = "_twitter_log.json";

const TITLE_STEM_CHARS: usize = 30;

#[derive(Debug, Clone)]
pub struct PublishLog {
	dir: PathBuf,
}
impl PublishLog {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	pub fn path_for(&self, record: &PublishLogRecord) -> Result<PathBuf> {
		let stem = file_stem(record);

		ledger::validate_id(&stem)?;

		Ok(self.dir.join(format!("{stem}{FILE_SUFFIX}")))
	}

	/// Writes the record, replacing an earlier attempt for the same paper.
	pub fn write(&self, record: &PublishLogRecord) -> Result<PathBuf> {
		let path = self.path_for(record)?;

		fs::write_json(&path, record)?;

		Ok(path)
	}
}

/// The identifier when known, otherwise the title with spaces and separators replaced, cut to 30
/// characters.
pub fn file_stem(record: &PublishLogRecord) -> String {
	if let Some(id) = record.arxiv_id.as_deref().filter(|id| !id.is_empty()) {
		return id.to_string();
	}

	record
		.title
		.chars()
		.map(|c| if c == ' ' || c == '/' || c == '\\' { '_' } else { c })
		.take(TITLE_STEM_CHARS)
		.collect()
}

/// Lists every publish-log file in `dir`, sorted by name. A missing directory has no records.
pub fn list(dir: &Path) -> Result<Vec<PathBuf>> {
	let entries = match std_fs::read_dir(dir) {
		Ok(entries) => entries,
		Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
		Err(err) => return Err(Error::io(dir, err)),
	};
	let mut paths = Vec::new();

	for entry in entries {
		let path = entry.map_err(|err| Error::io(dir, err))?.path();
		let is_log = path
			.file_name()
			.and_then(|name| name.to_str())
			.is_some_and(|name| name.ends_with(FILE_SUFFIX));

		if is_log && path.is_file() {
			paths.push(path);
		}
	}

	paths.sort();

	Ok(paths)
}

pub fn read(path: &Path) -> Result<PublishLogRecord> {
	fs::read_json(path)?.ok_or_else(|| {
		Error::io(path, std::io::Error::new(std::io::ErrorKind::NotFound, "publish log vanished"))
	})
}
