use super::{AuthorCounts, RepositoryResult};

/// Build a `RepositoryResult` from a raw authorship listing. Total and
/// contributor count are derived here so they can never drift from the
/// per-author map. An empty listing is a valid result (a repository whose
/// history produced no matching commits), not an error.
pub fn to_repository_result(name: &str, source: &str, raw: AuthorCounts) -> RepositoryResult {
    let total_commits = raw.values().sum();
    let contributor_count = raw.len();

    RepositoryResult {
        name: name.to_string(),
        source: source.to_string(),
        author_counts: raw,
        total_commits,
        contributor_count,
    }
}
