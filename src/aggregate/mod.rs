//! Aggregation of upstream challenge sources.
//!
//! # Data Flow
//! ```text
//! NormalizedQuery
//!     → FetchPlan::for_query (validate, pick sources; no I/O)
//!     → Aggregator::fetch
//!         ├─ Combined:    standard + data science, joined, concatenated
//!         ├─ DataScience: data science only
//!         └─ Standard:    standard only, filters forwarded
//!     → Vec<ChallengeRecord> (unordered; the renderer sorts)
//! ```
//!
//! # Design Decisions
//! - Validation happens while planning, so an invalid query never reaches upstream
//! - The combined branch fails as a unit; no partial feed is ever produced
//! - No dedup across sources
//! - Platform, technology and sub-type filters only narrow a single standard category

use crate::config::QueryConfig;
use crate::feed::ChallengeRecord;
use crate::query::normalize::DATA_CATEGORY;
use crate::query::{NormalizedQuery, QueryError};
use crate::upstream::{UpstreamClient, UpstreamResult};

/// Which upstream calls a query needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPlan {
    /// Every category: both endpoints, concatenated. Filters do not apply.
    Combined { list: String },
    /// Marathon matches only.
    DataScience { list: String },
    /// One standard category, with its filters.
    Standard {
        list: String,
        filters: Vec<(String, String)>,
    },
}

impl FetchPlan {
    /// Decide the calls for a query, rejecting values outside the configured sets.
    pub fn for_query(query: &NormalizedQuery, config: &QueryConfig) -> Result<Self, QueryError> {
        query.validate(config)?;
        let list = query.list().to_string();

        if query.is_all_categories() {
            return Ok(FetchPlan::Combined { list });
        }

        if query.category().as_single() == Some(DATA_CATEGORY) {
            return Ok(FetchPlan::DataScience { list });
        }

        Ok(FetchPlan::Standard {
            list,
            filters: query.filters(),
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            FetchPlan::Combined { .. } => "combined",
            FetchPlan::DataScience { .. } => "data_science",
            FetchPlan::Standard { .. } => "standard",
        }
    }
}

/// Runs fetch plans against the upstream client.
#[derive(Clone)]
pub struct Aggregator {
    client: UpstreamClient,
}

impl Aggregator {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    /// Execute a plan and collect every record it yields.
    pub async fn fetch(&self, plan: &FetchPlan) -> UpstreamResult<Vec<ChallengeRecord>> {
        match plan {
            FetchPlan::Combined { list } => {
                let (mut standard, data_science) = tokio::try_join!(
                    self.client.fetch_standard_challenges(list, &[]),
                    self.client.fetch_data_science_challenges(list),
                )?;
                tracing::debug!(
                    standard = standard.len(),
                    data_science = data_science.len(),
                    "Combining challenge sources"
                );
                standard.extend(data_science);
                Ok(standard)
            }
            FetchPlan::DataScience { list } => self.client.fetch_data_science_challenges(list).await,
            FetchPlan::Standard { list, filters } => {
                self.client.fetch_standard_challenges(list, filters).await
            }
        }
    }
}
