pub mod artifacts;
pub mod downloads;
pub mod layout;
pub mod ledger;
pub mod publish_log;
pub mod purge;
pub mod state;

mod error;
mod fs;

pub use error::{Error, Result};
pub use fs::write_atomic;
pub use layout::DataLayout;
