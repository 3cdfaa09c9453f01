use super::{AuthorshipSource, FetchError};
use crate::batch::ConfigurationError;
use crate::engine::AuthorCounts;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use git2::Repository;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::{debug, info};

/// Authorship source backed by git itself: remote identifiers are cloned
/// bare into a temporary directory via the `git` CLI, local paths are opened
/// in place with libgit2. The temporary clone is removed when the fetch
/// finishes, successful or not.
pub struct GitSource;

impl GitSource {
    /// Verify the `git` executable up front so a missing installation is a
    /// whole-batch configuration error, not one FetchError per repository.
    pub fn new() -> Result<Self, ConfigurationError> {
        match std::process::Command::new("git")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) if status.success() => Ok(Self),
            _ => Err(ConfigurationError::GitUnavailable),
        }
    }

    async fn clone_quiet(&self, identifier: &str, target: &Path) -> Result<(), FetchError> {
        debug!("Cloning {} into {}", identifier, target.display());

        let mut cmd = tokio::process::Command::new("git");
        cmd.args(["clone", "--quiet", "--bare"])
            .arg(identifier)
            .arg(target)
            // never hang on a credential prompt
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = cmd.output().await?;
        if !output.status.success() {
            let reason = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(FetchError::Clone {
                identifier: identifier.to_string(),
                reason,
            });
        }

        info!("Cloned {}", identifier);
        Ok(())
    }
}

fn is_remote(identifier: &str) -> bool {
    identifier.starts_with("http://")
        || identifier.starts_with("https://")
        || identifier.starts_with("ssh://")
        || identifier.starts_with("git://")
        || identifier.starts_with("git@")
}

/// Walk every ref of the repository and count commits per author name,
/// exactly as recorded in the history (case-sensitive, lossy UTF-8). A
/// repository without any commits is a fetch failure; a repository whose
/// commits all fall outside the cutoff is an empty success.
fn count_authors(
    path: &Path,
    cutoff: Option<DateTime<Utc>>,
) -> Result<AuthorCounts, FetchError> {
    let repo = Repository::open(path).map_err(|e| FetchError::Open(e.message().to_string()))?;

    let mut revwalk = repo.revwalk()?;
    revwalk.push_glob("*")?;
    // covers a detached HEAD not reachable from any ref
    let _ = revwalk.push_head();

    let mut counts = AuthorCounts::new();
    let mut walked = 0usize;

    for oid in revwalk {
        let oid = oid?;
        let commit = repo.find_commit(oid)?;
        walked += 1;

        let author = commit.author();
        if let Some(cutoff) = cutoff {
            if author.when().seconds() < cutoff.timestamp() {
                continue;
            }
        }

        let name = String::from_utf8_lossy(author.name_bytes()).to_string();
        *counts.entry(name).or_insert(0) += 1;
    }

    if walked == 0 {
        return Err(FetchError::Empty);
    }

    Ok(counts)
}

#[async_trait]
impl AuthorshipSource for GitSource {
    async fn fetch_authorship(
        &self,
        identifier: &str,
        since: Option<Duration>,
    ) -> Result<AuthorCounts, FetchError> {
        if identifier.trim().is_empty() {
            return Err(FetchError::Open("empty repository identifier".to_string()));
        }

        let cutoff = since.map(|window| Utc::now() - window);

        if is_remote(identifier) {
            let workdir = tempfile::tempdir()?;
            let clone_path = workdir.path().join("clone.git");
            self.clone_quiet(identifier, &clone_path).await?;

            // libgit2 work is blocking; keep it off the async workers
            tokio::task::spawn_blocking(move || count_authors(&clone_path, cutoff))
                .await
                .map_err(|e| FetchError::Open(e.to_string()))?
        } else {
            let path = PathBuf::from(identifier);
            tokio::task::spawn_blocking(move || count_authors(&path, cutoff))
                .await
                .map_err(|e| FetchError::Open(e.to_string()))?
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use git2::{Signature, Time};
    use pretty_assertions::assert_eq;

    fn commit(repo: &Repository, author: &str, when: i64, message: &str) {
        let workdir = repo.workdir().unwrap();
        std::fs::write(workdir.join("file.txt"), message).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new("file.txt")).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();

        let sig = Signature::new(author, "author@example.com", &Time::new(when, 0)).unwrap();
        let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    #[test]
    fn counts_commits_per_author() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit(&repo, "Jane Doe", 1_600_000_000, "first");
        commit(&repo, "Jane Doe", 1_600_000_100, "second");
        commit(&repo, "Sam", 1_600_000_200, "third");

        let counts = count_authors(dir.path(), None).unwrap();

        assert_eq!(
            counts,
            AuthorCounts::from([("Jane Doe".to_string(), 2), ("Sam".to_string(), 1)])
        );
    }

    #[test]
    fn cutoff_filters_old_commits() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit(&repo, "Jane Doe", 1_600_000_000, "old");
        commit(&repo, "Sam", 1_700_000_000, "recent");

        let cutoff = Utc.timestamp_opt(1_650_000_000, 0).single().unwrap();
        let counts = count_authors(dir.path(), Some(cutoff)).unwrap();

        assert_eq!(counts, AuthorCounts::from([("Sam".to_string(), 1)]));
    }

    #[test]
    fn cutoff_past_all_commits_is_empty_success() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit(&repo, "Jane Doe", 1_600_000_000, "old");

        let cutoff = Utc.timestamp_opt(1_900_000_000, 0).single().unwrap();
        let counts = count_authors(dir.path(), Some(cutoff)).unwrap();

        assert!(counts.is_empty());
    }

    #[test]
    fn repository_without_commits_is_a_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();

        match count_authors(dir.path(), None) {
            Err(FetchError::Empty) => {}
            other => panic!("expected FetchError::Empty, got {other:?}"),
        }
    }

    #[test]
    fn missing_path_is_a_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        assert!(matches!(
            count_authors(&missing, None),
            Err(FetchError::Open(_))
        ));
    }

    #[test]
    fn remote_detection() {
        assert!(is_remote("https://github.com/acme/widgets"));
        assert!(is_remote("git@github.com:acme/widgets.git"));
        assert!(!is_remote("/srv/repos/widgets"));
        assert!(!is_remote("widgets"));
    }
}
