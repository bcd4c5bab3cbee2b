//! Complete-or-absent file writes.

use std::{
	fs,
	io::{ErrorKind, Write},
	path::Path,
};

use serde::{Serialize, de::DeserializeOwned};
use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Writes `bytes` to a sibling temporary file, syncs it and renames it over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
	let parent = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};

	fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;

	let mut temp = NamedTempFile::new_in(parent).map_err(|err| Error::io(parent, err))?;

	temp.write_all(bytes).map_err(|err| Error::io(temp.path(), err))?;
	temp.as_file().sync_all().map_err(|err| Error::io(temp.path(), err))?;
	temp.persist(path).map_err(|err| Error::io(path, err.error))?;

	Ok(())
}

pub(crate) fn write_json<T>(path: &Path, value: &T) -> Result<()>
where
	T: Serialize,
{
	let mut bytes = serde_json::to_vec_pretty(value).map_err(|err| Error::json(path, err))?;

	bytes.push(b'\n');

	write_atomic(path, &bytes)
}

/// Reads and decodes a JSON file, returning `None` when it does not exist.
pub(crate) fn read_json<T>(path: &Path) -> Result<Option<T>>
where
	T: DeserializeOwned,
{
	let Some(bytes) = read_optional(path)? else {
		return Ok(None);
	};

	serde_json::from_slice(&bytes).map(Some).map_err(|err| Error::json(path, err))
}

pub(crate) fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
	match fs::read(path) {
		Ok(bytes) => Ok(Some(bytes)),
		Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
		Err(err) => Err(Error::io(path, err)),
	}
}
