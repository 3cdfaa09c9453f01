use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Find git repositories under `root`, at most `max_depth` levels down. If
/// `root` itself is a repository it is the only hit. Repositories nested
/// inside another discovered repository (submodules, vendored checkouts)
/// are skipped.
pub fn find_repositories(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    if root.join(".git").exists() {
        return vec![root.to_path_buf()];
    }

    let walker = WalkBuilder::new(root)
        .max_depth(Some(max_depth))
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build();

    let mut found = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!("Skipping unreadable entry: {}", err);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
            continue;
        }

        let path = entry.path();
        if path == root {
            continue;
        }

        if path.join(".git").exists() {
            debug!("Found git repository at {}", path.display());
            found.push(path.to_path_buf());
        }
    }

    found.sort();

    // keep only top-level repositories
    let mut top_level: Vec<PathBuf> = Vec::new();
    for path in found {
        if top_level.iter().any(|kept| path.starts_with(kept)) {
            continue;
        }
        top_level.push(path);
    }

    top_level
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_repo(root: &Path, rel: &str) {
        std::fs::create_dir_all(root.join(rel).join(".git")).unwrap();
    }

    #[test]
    fn finds_repositories_up_to_depth() {
        let dir = tempfile::tempdir().unwrap();
        fake_repo(dir.path(), "a");
        fake_repo(dir.path(), "b/c");
        fake_repo(dir.path(), "deep/x/y/z");

        let repos = find_repositories(dir.path(), 3);

        assert_eq!(repos, vec![dir.path().join("a"), dir.path().join("b/c")]);
    }

    #[test]
    fn root_repository_short_circuits() {
        let dir = tempfile::tempdir().unwrap();
        fake_repo(dir.path(), "");
        fake_repo(dir.path(), "nested");

        let repos = find_repositories(dir.path(), 3);

        assert_eq!(repos, vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn nested_repositories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fake_repo(dir.path(), "outer");
        fake_repo(dir.path(), "outer/vendored");

        let repos = find_repositories(dir.path(), 3);

        assert_eq!(repos, vec![dir.path().join("outer")]);
    }

    #[test]
    fn empty_tree_finds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_repositories(dir.path(), 3).is_empty());
    }
}
