//! Completed-processing markers keyed by canonical identifier.
//!
//! `contains` and `mark` are separate calls, so two processes sharing a data root can both see an
//! identifier as new and both process it. Markers are idempotent and last write wins.

use std::{
	collections::{BTreeMap, BTreeSet},
	path::{Path, PathBuf},
	sync::Mutex,
};

use time::OffsetDateTime;

use crate::{Error, Result, fs};
use hitokoto_domain::{records::LedgerEntry, timestamp};

pub trait Ledger
where
	Self: Send + Sync,
{
	fn contains(&self, id: &str) -> Result<bool>;

	fn mark(&self, id: &str, title: &str) -> Result<()>;
}

/// True if `id` is in `preloaded` or the ledger holds a marker for it.
pub fn is_processed(
	ledger: &dyn Ledger,
	id: &str,
	preloaded: Option<&BTreeSet<String>>,
) -> Result<bool> {
	if preloaded.is_some_and(|ids| ids.contains(id)) {
		return Ok(true);
	}

	ledger.contains(id)
}

/// One JSON marker per identifier under `<root>/processed/`.
#[derive(Debug, Clone)]
pub struct FileLedger {
	dir: PathBuf,
}
impl FileLedger {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	pub fn marker_path(&self, id: &str) -> Result<PathBuf> {
		validate_id(id)?;

		Ok(self.dir.join(format!("{id}.json")))
	}

	pub fn entry(&self, id: &str) -> Result<Option<LedgerEntry>> {
		fs::read_json(&self.marker_path(id)?)
	}
}
impl Ledger for FileLedger {
	fn contains(&self, id: &str) -> Result<bool> {
		Ok(self.marker_path(id)?.is_file())
	}

	fn mark(&self, id: &str, title: &str) -> Result<()> {
		let entry = LedgerEntry {
			arxiv_id: id.to_string(),
			title: title.to_string(),
			processed_at: timestamp::format_log(OffsetDateTime::now_utc()),
		};

		fs::write_json(&self.marker_path(id)?, &entry)
	}
}

#[derive(Debug, Default)]
pub struct MemoryLedger {
	entries: Mutex<BTreeMap<String, LedgerEntry>>,
}
impl MemoryLedger {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_ids<I, S>(ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let ledger = Self::new();

		{
			let mut entries = ledger.entries.lock().unwrap_or_else(|err| err.into_inner());

			for id in ids {
				let id = id.into();

				entries.insert(
					id.clone(),
					LedgerEntry { arxiv_id: id, title: String::new(), processed_at: String::new() },
				);
			}
		}

		ledger
	}

	pub fn ids(&self) -> Vec<String> {
		let entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.keys().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
impl Ledger for MemoryLedger {
	fn contains(&self, id: &str) -> Result<bool> {
		let entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		Ok(entries.contains_key(id))
	}

	fn mark(&self, id: &str, title: &str) -> Result<()> {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.insert(
			id.to_string(),
			LedgerEntry {
				arxiv_id: id.to_string(),
				title: title.to_string(),
				processed_at: timestamp::format_log(OffsetDateTime::now_utc()),
			},
		);

		Ok(())
	}
}

/// Identifiers become file names, so anything that could escape the directory is refused.
pub(crate) fn validate_id(id: &str) -> Result<()> {
	if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
		return Err(Error::InvalidArgument(format!("Identifier {id:?} is not a valid file stem.")));
	}

	Ok(())
}
