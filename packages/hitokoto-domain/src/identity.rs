use url::Url;

use crate::{Error, Result};

/// Format suffixes that are not part of a canonical identifier.
const FORMAT_EXTENSIONS: [&str; 1] = [".pdf"];

/// Derives the canonical identifier from a content locator.
///
/// The identifier is the last non-empty path segment with a known format extension removed, so
/// `https://arxiv.org/pdf/2401.01234v2.pdf` and `http://arxiv.org/pdf/2401.01234v2` both resolve
/// to `2401.01234v2`.
pub fn resolve(locator: &str) -> Result<String> {
	let url = Url::parse(locator.trim()).map_err(|err| Error::MalformedLocator {
		locator: locator.to_string(),
		reason: err.to_string(),
	})?;
	let segment = url
		.path_segments()
		.and_then(|segments| segments.filter(|segment| !segment.is_empty()).next_back())
		.ok_or_else(|| Error::MalformedLocator {
			locator: locator.to_string(),
			reason: "no path segments".to_string(),
		})?;
	let id = FORMAT_EXTENSIONS
		.iter()
		.find_map(|ext| segment.strip_suffix(ext))
		.unwrap_or(segment);

	if id.is_empty() {
		return Err(Error::MalformedLocator {
			locator: locator.to_string(),
			reason: "path segment is only a format extension".to_string(),
		});
	}

	Ok(id.to_string())
}

/// Public abstract page for an identifier.
pub fn reference_url(base: &str, id: &str) -> String {
	format!("{base}{id}")
}
