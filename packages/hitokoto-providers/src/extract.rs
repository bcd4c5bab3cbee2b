use lopdf::Document;

use crate::{Error, Result};

/// Extracts the text of every page. A document with no pages or no text is an error.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
	let document = Document::load_mem(bytes)?;
	let pages = document.get_pages();

	if pages.is_empty() {
		return Err(Error::UnexpectedContent { message: "Document has no pages.".to_string() });
	}

	let page_numbers = pages.keys().copied().collect::<Vec<u32>>();
	let text = document.extract_text(&page_numbers)?;

	if text.trim().is_empty() {
		return Err(Error::UnexpectedContent {
			message: "Document contains no extractable text.".to_string(),
		});
	}

	Ok(text)
}
