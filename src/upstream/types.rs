//! Upstream wire types and error definitions.

use serde::Deserialize;
use thiserror::Error;

use crate::feed::record::{parse_timestamp, ChallengeDetails, ChallengeRecord, RecordSource};
use crate::upstream::de::{opt_string, string_list};

/// Errors that can occur while talking to the upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered with a non-success status.
    #[error("HTTP error {status} from {url}")]
    Status { url: String, status: u16 },

    /// Connection, timeout, or body read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Body was not the expected JSON envelope.
    #[error("unexpected response body from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl UpstreamError {
    pub fn url(&self) -> &str {
        match self {
            UpstreamError::Status { url, .. }
            | UpstreamError::Transport { url, .. }
            | UpstreamError::Decode { url, .. } => url,
        }
    }

    pub(crate) fn outcome(&self) -> &'static str {
        match self {
            UpstreamError::Status { .. } => "status",
            UpstreamError::Transport { .. } => "transport",
            UpstreamError::Decode { .. } => "decode",
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Standard challenge after the summary and detail bodies are merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StandardChallenge {
    #[serde(deserialize_with = "opt_string")]
    pub challenge_id: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub challenge_name: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub challenge_community: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub challenge_type: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub detailed_requirements: Option<String>,
    #[serde(deserialize_with = "string_list")]
    pub platforms: Vec<String>,
    #[serde(deserialize_with = "string_list")]
    pub technologies: Vec<String>,
    #[serde(deserialize_with = "opt_string")]
    pub total_prize: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub first_place_prize: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub registration_start_date: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub registration_end_date: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub registration_open: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub submission_end_date: Option<String>,
}

impl From<StandardChallenge> for ChallengeRecord {
    fn from(c: StandardChallenge) -> Self {
        ChallengeRecord {
            name: c.challenge_name.unwrap_or_default(),
            source: RecordSource::Standard {
                challenge_id: c.challenge_id,
                community: c.challenge_community,
            },
            date: c.registration_start_date.as_deref().and_then(parse_timestamp),
            details: ChallengeDetails {
                requirements: c.detailed_requirements,
                platforms: c.platforms,
                technologies: c.technologies,
                total_prize: c.total_prize,
                first_place_prize: c.first_place_prize,
                registration_end: c.registration_end_date.as_deref().and_then(parse_timestamp),
                registration_open: c.registration_open,
                submission_end: c.submission_end_date.as_deref().and_then(parse_timestamp),
                challenge_type: c.challenge_type,
            },
        }
    }
}

/// Marathon match as returned by the data-science endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarathonChallenge {
    #[serde(deserialize_with = "opt_string")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub problem_id: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub round_id: Option<String>,
    #[serde(deserialize_with = "opt_string")]
    pub start_date: Option<String>,
}

impl From<MarathonChallenge> for ChallengeRecord {
    fn from(m: MarathonChallenge) -> Self {
        ChallengeRecord {
            name: m.full_name.unwrap_or_default(),
            source: RecordSource::Marathon {
                problem_id: m.problem_id,
                round_id: m.round_id,
            },
            date: m.start_date.as_deref().and_then(parse_timestamp),
            details: ChallengeDetails::default(),
        }
    }
}
