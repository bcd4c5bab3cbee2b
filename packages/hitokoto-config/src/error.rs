pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read config file at {path:?}.")]
	ReadConfig { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to parse config file at {path:?}.")]
	ParseConfig { path: std::path::PathBuf, source: toml::de::Error },
	#[error("{message}")]
	Validation { message: String },
	/// A `[[search_sets]]` entry that can never produce a run.
	#[error("search_sets[{index}].{field} {reason}.")]
	InvalidSearchSet { index: usize, field: &'static str, reason: &'static str },
	#[error("prompt.template must contain the placeholder {placeholder}.")]
	MissingPlaceholder { placeholder: String },
}
