//! Operator purge. The only code path that deletes ledger markers.

use std::{
	fs as std_fs,
	io::ErrorKind,
	path::{Path, PathBuf},
};

use crate::{DataLayout, Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeTargets {
	pub pdfs: bool,
	pub texts: bool,
	pub summaries: bool,
	pub processed: bool,
	pub logs: bool,
}
impl PurgeTargets {
	pub fn all() -> Self {
		Self { pdfs: true, texts: true, summaries: true, processed: true, logs: true }
	}

	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeReport {
	pub cleared_dirs: Vec<PathBuf>,
	pub removed: Vec<PathBuf>,
}

/// Empties each selected directory below the data root and keeps the directory itself.
///
/// Clearing `processed` also drops the shared processed-id list, otherwise the purged identifiers
/// would still count as processed on the next pass.
pub fn purge(layout: &DataLayout, targets: PurgeTargets) -> Result<PurgeReport> {
	let mut report = PurgeReport::default();
	let selected = [
		(targets.pdfs, layout.pdf_root()),
		(targets.texts, layout.text_dir()),
		(targets.summaries, layout.summary_dir()),
		(targets.processed, layout.processed_dir()),
		(targets.logs, layout.logs_root()),
	];

	for (enabled, dir) in selected {
		if !enabled {
			continue;
		}

		clear_dir(&dir, &mut report.removed)?;
		report.cleared_dirs.push(dir);
	}

	if targets.processed {
		let ids = layout.processed_ids_file();

		match std_fs::remove_file(&ids) {
			Ok(()) => report.removed.push(ids),
			Err(err) if err.kind() == ErrorKind::NotFound => {},
			Err(err) => return Err(Error::io(ids, err)),
		}
	}

	Ok(report)
}

fn clear_dir(dir: &Path, removed: &mut Vec<PathBuf>) -> Result<()> {
	let entries = match std_fs::read_dir(dir) {
		Ok(entries) => entries,
		Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
		Err(err) => return Err(Error::io(dir, err)),
	};

	for entry in entries {
		let path = entry.map_err(|err| Error::io(dir, err))?.path();

		if path.is_dir() {
			std_fs::remove_dir_all(&path).map_err(|err| Error::io(&path, err))?;
		} else {
			std_fs::remove_file(&path).map_err(|err| Error::io(&path, err))?;
		}

		removed.push(path);
	}

	Ok(())
}
