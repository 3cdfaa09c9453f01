use async_trait::async_trait;
use chrono::Duration;
use thiserror::Error;

pub mod discover;
pub mod git;

pub use git::GitSource;

use crate::engine::AuthorCounts;

/// Anything that can turn a repository identifier into a per-author commit
/// count listing. The only seam in the pipeline that touches external state;
/// everything downstream is pure.
#[async_trait]
pub trait AuthorshipSource: Send + Sync {
    /// Fetch one authorship listing. `since` restricts counting to commits
    /// authored within that window; `None` means all history. Authors with
    /// no matching commits are omitted, never present with a zero count.
    async fn fetch_authorship(
        &self,
        identifier: &str,
        since: Option<Duration>,
    ) -> Result<AuthorCounts, FetchError>;
}

/// Per-repository acquisition failure. Deliberately coarse: the orchestrator
/// only branches on success or failure, the variants exist for diagnostics.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to clone {identifier}: {reason}")]
    Clone { identifier: String, reason: String },

    #[error("cannot open repository: {0}")]
    Open(String),

    #[error("repository has no commits")]
    Empty,

    #[error("acquisition timed out")]
    Timeout,

    #[error(transparent)]
    Git(#[from] git2::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Display name for a repository identifier: the last path segment without
/// any `.git` suffix, covering URLs, scp-style remotes and local paths.
pub fn repo_name(identifier: &str) -> String {
    let trimmed = identifier.trim_end_matches('/');
    let tail = trimmed
        .rsplit(|c: char| c == '/' || c == ':')
        .next()
        .unwrap_or(trimmed);
    let tail = tail.strip_suffix(".git").unwrap_or(tail);

    if tail.is_empty() {
        trimmed.to_string()
    } else {
        tail.to_string()
    }
}
