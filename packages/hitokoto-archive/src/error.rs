pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Storage(#[from] hitokoto_storage::Error),
	#[error(transparent)]
	Domain(#[from] hitokoto_domain::Error),
	#[error("Failed to write CSV export.")]
	Csv(#[from] csv::Error),
}
