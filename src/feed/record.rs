//! Canonical challenge record consumed by the renderer.

use chrono::{DateTime, FixedOffset};

/// Where a record came from, with the identifiers that source provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    /// Design/develop challenge from the standard endpoint.
    Standard {
        challenge_id: Option<String>,
        community: Option<String>,
    },
    /// Marathon match from the data-science endpoint.
    Marathon {
        problem_id: Option<String>,
        round_id: Option<String>,
    },
}

/// Optional descriptive attributes. Absent values are left out of the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChallengeDetails {
    pub requirements: Option<String>,
    pub platforms: Vec<String>,
    pub technologies: Vec<String>,
    pub total_prize: Option<String>,
    pub first_place_prize: Option<String>,
    pub registration_end: Option<DateTime<FixedOffset>>,
    pub registration_open: Option<String>,
    pub submission_end: Option<DateTime<FixedOffset>>,
    pub challenge_type: Option<String>,
}

/// One challenge, normalized from either upstream schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRecord {
    pub name: String,
    pub source: RecordSource,
    /// Registration start (standard) or start date (marathon); used for sort and pubDate.
    pub date: Option<DateTime<FixedOffset>>,
    pub details: ChallengeDetails,
}

impl ChallengeRecord {
    /// Stable identifier: challenge id, else problem id.
    pub fn guid(&self) -> Option<&str> {
        match &self.source {
            RecordSource::Standard { challenge_id, .. } => challenge_id.as_deref(),
            RecordSource::Marathon { problem_id, .. } => problem_id.as_deref(),
        }
    }

    pub fn community(&self) -> Option<&str> {
        match &self.source {
            RecordSource::Standard { community, .. } => community.as_deref(),
            RecordSource::Marathon { .. } => None,
        }
    }
}

/// Parse the timestamp formats the upstream API emits.
///
/// Accepts RFC 3339 and the `2014-05-20T09:00:00.000-0400` form (offset without colon).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%z"))
        .map_err(|e| tracing::debug!(value = %raw, error = %e, "Unparseable upstream timestamp"))
        .ok()
}
