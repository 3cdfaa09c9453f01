use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod aggregate;
pub mod extract;
pub mod rank;

pub use extract::to_repository_result;
pub use rank::rank;

/// Per-author commit counts as reported by a single repository.
/// Author identities are opaque, case-sensitive strings; zero-count
/// authors must not appear.
pub type AuthorCounts = HashMap<String, u64>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryResult {
    pub name: String,
    pub source: String,
    pub author_counts: AuthorCounts,
    pub total_commits: u64,
    pub contributor_count: usize,
}

impl RepositoryResult {
    /// Busiest author of this repository; ties broken by identity so the
    /// answer does not depend on map iteration order.
    pub fn top_contributor(&self) -> Option<(&str, u64)> {
        self.author_counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(name, count)| (name.as_str(), *count))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateTally {
    pub author_totals: AuthorCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub identity: String,
    pub commits: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub successful: Vec<RepositoryResult>,
    pub failed: Vec<String>,
    pub tally: AggregateTally,
    pub generated_at: DateTime<Utc>,
}
