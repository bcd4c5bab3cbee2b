//! Static archive site and publish statistics, both read-only views over the publish logs.

pub mod pages;
pub mod records;
pub mod render;
pub mod report;

mod error;

pub use error::{Error, Result};
pub use render::{RenderMode, RenderSummary, render};
