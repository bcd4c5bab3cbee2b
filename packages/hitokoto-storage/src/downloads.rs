//! Fetched paper bytes, one partition directory per keyword set below `<root>/pdf/`.

use std::{fs as std_fs, path::PathBuf};

use crate::{DataLayout, Error, Result, fs, ledger};

const FILE_EXTENSION: &str = "pdf";

#[derive(Debug, Clone)]
pub struct DownloadCache {
	pdf_root: PathBuf,
	partition: String,
}
impl DownloadCache {
	pub fn new(layout: &DataLayout, partition: &str) -> Self {
		Self { pdf_root: layout.pdf_root(), partition: partition.to_string() }
	}

	pub fn dir(&self) -> PathBuf {
		self.pdf_root.join(&self.partition)
	}

	pub fn path_for(&self, id: &str) -> Result<PathBuf> {
		ledger::validate_id(id)?;

		Ok(self.dir().join(file_name(id)))
	}

	pub fn contains(&self, id: &str) -> Result<bool> {
		Ok(self.path_for(id)?.is_file())
	}

	/// Returns the cached bytes, or `None` when this partition has no copy.
	pub fn read(&self, id: &str) -> Result<Option<Vec<u8>>> {
		fs::read_optional(&self.path_for(id)?)
	}

	pub fn store(&self, id: &str, bytes: &[u8]) -> Result<PathBuf> {
		let path = self.path_for(id)?;

		fs::write_atomic(&path, bytes)?;

		Ok(path)
	}

	/// Makes a copy from another partition available locally.
	///
	/// Returns the path the bytes came from (the local path when already present), or `None` when
	/// no partition has the file.
	pub fn copy_from_sibling(&self, id: &str) -> Result<Option<PathBuf>> {
		let target = self.path_for(id)?;

		if target.is_file() {
			return Ok(Some(target));
		}

		let Some(source) = self.find_sibling(id)? else {
			return Ok(None);
		};
		let bytes = std_fs::read(&source).map_err(|err| Error::io(&source, err))?;

		fs::write_atomic(&target, &bytes)?;

		Ok(Some(source))
	}

	fn find_sibling(&self, id: &str) -> Result<Option<PathBuf>> {
		let entries = match std_fs::read_dir(&self.pdf_root) {
			Ok(entries) => entries,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(err) => return Err(Error::io(&self.pdf_root, err)),
		};
		let mut partitions = Vec::new();

		for entry in entries {
			let entry = entry.map_err(|err| Error::io(&self.pdf_root, err))?;
			let path = entry.path();

			if path.is_dir() {
				partitions.push(path);
			}
		}

		partitions.sort();

		Ok(partitions
			.into_iter()
			.map(|dir| dir.join(file_name(id)))
			.find(|candidate| candidate.is_file()))
	}
}

fn file_name(id: &str) -> String {
	format!("{id}.{FILE_EXTENSION}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn copies_from_sibling_partition() {
		let dir = tempfile::tempdir().expect("Failed to create temp dir.");
		let layout = DataLayout::new(dir.path());
		let other = DownloadCache::new(&layout, "quantum");
		let mine = DownloadCache::new(&layout, "cryptography");

		other.store("2401.00001v1", b"%PDF-1.4").expect("Store failed.");

		let source = mine.copy_from_sibling("2401.00001v1").expect("Copy failed.");

		assert_eq!(source, Some(other.path_for("2401.00001v1").expect("Bad id.")));
		assert_eq!(
			mine.read("2401.00001v1").expect("Read failed."),
			Some(b"%PDF-1.4".to_vec())
		);
	}

	#[test]
	fn no_sibling_means_no_copy() {
		let dir = tempfile::tempdir().expect("Failed to create temp dir.");
		let mine = DownloadCache::new(&DataLayout::new(dir.path()), "quantum");

		assert_eq!(mine.copy_from_sibling("2401.00001v1").expect("Copy failed."), None);
		assert!(!mine.contains("2401.00001v1").expect("Lookup failed."));
	}
}
