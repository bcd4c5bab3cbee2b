pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Malformed locator {locator:?}: {reason}")]
	MalformedLocator { locator: String, reason: String },
	#[error("Invalid timestamp {value:?}.")]
	InvalidTimestamp { value: String },
}
