/// Watermark key for a keyword tuple.
pub fn set_id(keywords: &[String]) -> String {
	keywords.join("_")
}

/// Directory name, below `pdf/`, that holds one keyword set's downloads.
pub fn download_partition(keywords: &[String]) -> String {
	keywords.join("_")
}

/// Directory name, below `logs/`, that holds one keyword set's publish logs.
///
/// Anything outside ASCII alphanumerics becomes `_` so the name is safe on every filesystem.
pub fn log_partition(keywords: &[String]) -> String {
	keywords
		.iter()
		.map(|keyword| {
			keyword.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect()
		})
		.collect::<Vec<String>>()
		.join("_")
}
