use colored::*;
use std::fmt::Write as _;

use crate::engine::LeaderboardEntry;
use crate::output::export::{ReportExport, RepositoryBreakdown};

/// Breakdown re-sorted by commit volume for display; the export itself
/// keeps processing order.
fn by_commit_volume(repositories: &[RepositoryBreakdown]) -> Vec<&RepositoryBreakdown> {
    let mut sorted: Vec<_> = repositories.iter().collect();
    sorted.sort_by(|a, b| {
        b.total_commits
            .cmp(&a.total_commits)
            .then_with(|| a.name.cmp(&b.name))
    });
    sorted
}

pub fn print_report(export: &ReportExport, entries: &[LeaderboardEntry]) {
    println!(
        "\n{}",
        "TOP CONTRIBUTORS ACROSS ALL REPOSITORIES"
            .bright_cyan()
            .bold()
    );
    if entries.is_empty() {
        println!("{}", "No contributors found.".yellow());
    }
    for entry in entries {
        println!(
            "{:>3}. {:<35} {:>7} commits  {:>5.1}%",
            entry.rank,
            entry.identity,
            entry.commits,
            entry.percentage
        );
    }

    let summary = &export.summary;
    println!("\n{}", "SUMMARY".bright_cyan().bold());
    println!(
        "{} of {} repositories analyzed, {} unique contributors, {} commits",
        summary.successful_repositories.to_string().bright_white(),
        summary.total_repositories_processed,
        summary.unique_contributors,
        summary.total_commits
    );

    if let Some(top) = &summary.overall_top_contributor {
        let marker = if top.is_automated {
            " (automated)".yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "Top contributor: {} with {} commits ({:.1}%){}",
            top.name.bright_white().bold(),
            top.commits,
            top.percentage,
            marker
        );

        match &summary.top_human_developer {
            Some(human) if top.is_automated => {
                println!(
                    "Top human developer: {} with {} commits ({:.1}%), {} behind the top automated account",
                    human.name.bright_white().bold(),
                    human.commits,
                    human.percentage,
                    top.commits - human.commits
                );
            }
            Some(_) => {}
            None => println!(
                "{}",
                "No human contributors identified (all matched automation rules)".yellow()
            ),
        }
    }

    if !export.repositories.is_empty() {
        println!("\n{}", "REPOSITORY BREAKDOWN".bright_cyan().bold());
        for repo in by_commit_volume(&export.repositories) {
            println!(
                "{} {} commits, {} contributors ({})",
                format!("{:<25}", repo.name).bright_white(),
                repo.total_commits,
                repo.contributor_count,
                repo.source
            );
            if let Some(top) = &repo.top_contributor {
                println!("{:<26}top contributor: {} ({} commits)", "", top.name, top.commits);
            }
        }
    }

    if !export.failed_repositories.is_empty() {
        println!(
            "\n{} {}",
            "Failed:".bright_red().bold(),
            export.failed_repositories.join(", ")
        );
    }
}

/// Plain rendering of the same report for `--format text` files.
pub fn format_text_report(export: &ReportExport) -> String {
    let mut out = String::new();
    let summary = &export.summary;

    let _ = writeln!(out, "Contributor analysis — {}", export.analysis_date);
    let _ = writeln!(
        out,
        "{} of {} repositories analyzed, {} unique contributors, {} commits",
        summary.successful_repositories,
        summary.total_repositories_processed,
        summary.unique_contributors,
        summary.total_commits
    );

    let _ = writeln!(out, "\nTop contributors:");
    for entry in &export.overall_top_contributors {
        let _ = writeln!(
            out,
            "{:>3}. {:<35} {:>7} commits  {:>5.1}%",
            entry.rank, entry.identity, entry.commits, entry.percentage
        );
    }

    let _ = writeln!(out, "\nTop human contributors:");
    for entry in &export.top_human_contributors {
        let _ = writeln!(
            out,
            "{:>3}. {:<35} {:>7} commits  {:>5.1}%",
            entry.rank, entry.identity, entry.commits, entry.percentage
        );
    }

    let _ = writeln!(out, "\nRepositories:");
    for repo in by_commit_volume(&export.repositories) {
        let _ = writeln!(
            out,
            "{:<25} {:>7} commits, {} contributors ({})",
            repo.name, repo.total_commits, repo.contributor_count, repo.source
        );
    }

    if !export.failed_repositories.is_empty() {
        let _ = writeln!(out, "\nFailed: {}", export.failed_repositories.join(", "));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::engine::{to_repository_result, AggregateTally, AuthorCounts, BatchReport};
    use crate::output::export::build_export;
    use chrono::Utc;

    fn sample_export() -> ReportExport {
        let results = vec![
            to_repository_result(
                "api",
                "https://github.com/acme/api",
                AuthorCounts::from([("Jane Doe".to_string(), 6), ("Sam".to_string(), 2)]),
            ),
            to_repository_result(
                "web",
                "https://github.com/acme/web",
                AuthorCounts::from([("Jane Doe".to_string(), 12)]),
            ),
        ];
        let tally = AggregateTally::fold_all(results.iter());
        let report = BatchReport {
            successful: results,
            failed: vec!["https://github.com/acme/gone".to_string()],
            tally,
            generated_at: Utc::now(),
        };
        build_export(&report, &Classifier::new().unwrap(), 20, 10)
    }

    #[test]
    fn text_report_lists_sections() {
        let text = format_text_report(&sample_export());

        assert!(text.contains("2 of 3 repositories analyzed"));
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Top human contributors:"));
        assert!(text.contains("Failed: https://github.com/acme/gone"));
    }

    #[test]
    fn breakdown_is_sorted_by_volume() {
        let export = sample_export();
        let sorted = by_commit_volume(&export.repositories);

        assert_eq!(sorted[0].name, "web");
        assert_eq!(sorted[1].name, "api");
    }
}
