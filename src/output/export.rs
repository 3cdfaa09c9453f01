use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify::Classifier;
use crate::engine::rank::{rank, rank_against};
use crate::engine::{BatchReport, LeaderboardEntry, RepositoryResult};

/// The shape handed to external serializers: summary figures, both
/// leaderboards, the per-repository breakdown in processing order, and the
/// identifiers that could not be analyzed.
#[derive(Debug, Clone, Serialize)]
pub struct ReportExport {
    pub analysis_date: DateTime<Utc>,
    pub summary: Summary,
    pub overall_top_contributors: Vec<LeaderboardEntry>,
    pub top_human_contributors: Vec<LeaderboardEntry>,
    pub repositories: Vec<RepositoryBreakdown>,
    pub failed_repositories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_repositories_processed: usize,
    pub successful_repositories: usize,
    pub failed_repositories: usize,
    pub total_commits: u64,
    pub unique_contributors: usize,
    pub overall_top_contributor: Option<TopContributor>,
    pub top_human_developer: Option<HumanDeveloper>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopContributor {
    pub name: String,
    pub commits: u64,
    pub percentage: f64,
    pub is_automated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HumanDeveloper {
    pub name: String,
    pub commits: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepositoryBreakdown {
    pub name: String,
    pub source: String,
    pub total_commits: u64,
    pub contributor_count: usize,
    pub top_contributor: Option<BreakdownAuthor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakdownAuthor {
    pub name: String,
    pub commits: u64,
}

fn breakdown(result: &RepositoryResult) -> RepositoryBreakdown {
    RepositoryBreakdown {
        name: result.name.clone(),
        source: result.source.clone(),
        total_commits: result.total_commits,
        contributor_count: result.contributor_count,
        top_contributor: result
            .top_contributor()
            .map(|(name, commits)| BreakdownAuthor {
                name: name.to_string(),
                commits,
            }),
    }
}

/// Derive the export from a finished batch. Both "top overall" and "top
/// human" are always computed, even when they name the same identity.
pub fn build_export(
    report: &BatchReport,
    classifier: &Classifier,
    overall_size: usize,
    human_size: usize,
) -> ReportExport {
    let total_commits = report.tally.total_commits();

    let overall = rank(&report.tally.author_totals, Some(overall_size));
    let humans = classifier.human_counts(&report.tally);
    let top_humans = rank_against(&humans, Some(human_size), total_commits);

    let overall_top_contributor = overall.first().map(|entry| TopContributor {
        name: entry.identity.clone(),
        commits: entry.commits,
        percentage: entry.percentage,
        is_automated: classifier.is_automated(&entry.identity),
    });

    let top_human_developer = top_humans.first().map(|entry| HumanDeveloper {
        name: entry.identity.clone(),
        commits: entry.commits,
        percentage: entry.percentage,
    });

    ReportExport {
        analysis_date: report.generated_at,
        summary: Summary {
            total_repositories_processed: report.successful.len() + report.failed.len(),
            successful_repositories: report.successful.len(),
            failed_repositories: report.failed.len(),
            total_commits,
            unique_contributors: report.tally.unique_contributors(),
            overall_top_contributor,
            top_human_developer,
        },
        overall_top_contributors: overall,
        top_human_contributors: top_humans,
        repositories: report.successful.iter().map(breakdown).collect(),
        failed_repositories: report.failed.clone(),
    }
}
