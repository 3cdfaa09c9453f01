use super::{AuthorCounts, LeaderboardEntry};

/// Rank authors by commit count, descending. Ties break on identity
/// (lexicographic ascending) so the order is total and independent of map
/// iteration order. Percentages are of the full total even when `top_n`
/// truncates the list.
pub fn rank(counts: &AuthorCounts, top_n: Option<usize>) -> Vec<LeaderboardEntry> {
    rank_against(counts, top_n, counts.values().sum())
}

/// Same as `rank`, but percentages are computed against an externally
/// supplied total. Used for the human-only leaderboard, whose shares are
/// reported against all commits, automated ones included.
pub fn rank_against(counts: &AuthorCounts, top_n: Option<usize>, total: u64) -> Vec<LeaderboardEntry> {
    let mut ordered: Vec<(&String, u64)> = counts.iter().map(|(name, count)| (name, *count)).collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let mut entries: Vec<LeaderboardEntry> = ordered
        .into_iter()
        .enumerate()
        .map(|(position, (identity, commits))| LeaderboardEntry {
            rank: position + 1,
            identity: identity.clone(),
            commits,
            percentage: percentage_of(commits, total),
        })
        .collect();

    if let Some(limit) = top_n {
        entries.truncate(limit);
    }

    entries
}

/// Share of `total`, rounded to one decimal place. A zero total yields 0.0
/// rather than NaN.
pub fn percentage_of(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}
