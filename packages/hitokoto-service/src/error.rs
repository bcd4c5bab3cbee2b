pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures of one keyword set or of the pass as a whole.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Keyword set {set_id} failed: {message}")]
	KeywordSetFailed { set_id: String, message: String },
	#[error("Configuration failed: {message}")]
	ConfigurationFailed { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
}
impl From<hitokoto_storage::Error> for Error {
	fn from(err: hitokoto_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<hitokoto_providers::Error> for Error {
	fn from(err: hitokoto_providers::Error) -> Self {
		match err {
			hitokoto_providers::Error::InvalidConfig { message } => {
				Self::ConfigurationFailed { message }
			},
			other => Self::Provider { message: other.to_string() },
		}
	}
}

impl From<hitokoto_config::Error> for Error {
	fn from(err: hitokoto_config::Error) -> Self {
		Self::ConfigurationFailed { message: err.to_string() }
	}
}

/// Per-paper failures. None of these leave the pipeline executor as an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaperError {
	#[error("Malformed locator: {message}")]
	MalformedLocator { message: String },
	#[error("Fetch failed: {message}")]
	FetchFailed { message: String },
	#[error("Extraction failed: {message}")]
	ExtractionFailed { message: String },
	#[error("Summarization failed: {message}")]
	SummarizationFailed { message: String },
	#[error("Publish failed: {message}")]
	PublishFailed { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl PaperError {
	pub fn stage(&self) -> &'static str {
		match self {
			Self::MalformedLocator { .. } => "resolve",
			Self::FetchFailed { .. } => "fetch",
			Self::ExtractionFailed { .. } => "extract",
			Self::SummarizationFailed { .. } => "summarize",
			Self::PublishFailed { .. } => "publish",
			Self::Storage { .. } => "record",
		}
	}
}

impl From<hitokoto_storage::Error> for PaperError {
	fn from(err: hitokoto_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<hitokoto_domain::Error> for PaperError {
	fn from(err: hitokoto_domain::Error) -> Self {
		Self::MalformedLocator { message: err.to_string() }
	}
}
