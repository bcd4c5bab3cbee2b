use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One paper returned by a search, valid for a single orchestrator pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRecord {
	pub id: String,
	pub title: String,
	pub published: OffsetDateTime,
	pub locator: String,
}

/// Inputs to one search call.
///
/// `since_timestamp` is an inclusive floor on publication time, `since_id` an exclusive floor on
/// the canonical identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
	pub keywords: Vec<String>,
	pub max_results: u32,
	pub use_or: bool,
	pub since_timestamp: Option<OffsetDateTime>,
	pub since_id: Option<String>,
}
impl SearchQuery {
	/// True when `candidate` clears both floors.
	pub fn admits(&self, candidate: &CandidateRecord) -> bool {
		if self.since_timestamp.is_some_and(|floor| candidate.published < floor) {
			return false;
		}

		match self.since_id.as_deref() {
			Some(floor) => candidate.id.as_str() > floor,
			None => true,
		}
	}
}

/// Completed-processing marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
	pub arxiv_id: String,
	pub title: String,
	pub processed_at: String,
}

/// Per keyword-set search cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatermarkEntry {
	pub timestamp: String,
	#[serde(default)]
	pub last_paper_id: Option<String>,
}

/// Summarizer output persisted next to the paper's other artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryArtifact {
	pub title: String,
	pub timestamp: String,
	pub summary: String,
	pub post_text: String,
	pub arxiv_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
	Success,
	Failure,
}

/// One item placed on the social feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostedUnit {
	#[serde(rename = "type", default = "default_unit_kind")]
	pub kind: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub text: Option<String>,
}

/// Outcome of one publish attempt.
///
/// Failure is encoded by the presence of `error`, which is the shape the archive reads. Every
/// field past `timestamp` is optional on read so that records written by older releases still
/// load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishLogRecord {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub timestamp: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub summary: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub post_text: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub arxiv_id: Option<String>,
	#[serde(default)]
	pub tweets: Vec<PostedUnit>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}
impl PublishLogRecord {
	pub fn published(
		title: &str,
		timestamp: String,
		summary: &str,
		post_text: &str,
		arxiv_id: &str,
		post_id: String,
	) -> Self {
		Self {
			title: title.to_string(),
			timestamp,
			summary: Some(summary.to_string()),
			post_text: Some(post_text.to_string()),
			arxiv_id: Some(arxiv_id.to_string()),
			tweets: vec![PostedUnit {
				kind: default_unit_kind(),
				id: Some(post_id),
				text: Some(post_text.to_string()),
			}],
			error: None,
		}
	}

	/// Success record for a paper whose publish step was skipped by batch policy.
	pub fn silent(
		title: &str,
		timestamp: String,
		summary: &str,
		post_text: &str,
		arxiv_id: &str,
	) -> Self {
		Self {
			title: title.to_string(),
			timestamp,
			summary: Some(summary.to_string()),
			post_text: Some(post_text.to_string()),
			arxiv_id: Some(arxiv_id.to_string()),
			tweets: Vec::new(),
			error: None,
		}
	}

	pub fn failed(
		title: &str,
		timestamp: String,
		summary: &str,
		arxiv_id: &str,
		error: String,
	) -> Self {
		Self {
			title: title.to_string(),
			timestamp,
			summary: Some(summary.to_string()),
			post_text: None,
			arxiv_id: Some(arxiv_id.to_string()),
			tweets: Vec::new(),
			error: Some(error),
		}
	}

	pub fn outcome(&self) -> PublishOutcome {
		if self.error.is_some() { PublishOutcome::Failure } else { PublishOutcome::Success }
	}
}

fn default_unit_kind() -> String {
	"post".to_string()
}
