pub mod identity;
pub mod keyword_set;
pub mod post_text;
pub mod records;
pub mod timestamp;

mod error;

pub use error::{Error, Result};
