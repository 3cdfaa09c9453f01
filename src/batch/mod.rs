use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

pub mod orchestrator;

pub use orchestrator::Orchestrator;

/// Whole-batch failure, surfaced before any acquisition starts. Everything
/// else is a per-repository `FetchError` and never aborts the batch.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("repository list is empty")]
    EmptyRepositoryList,

    #[error("git executable not found on PATH")]
    GitUnavailable,
}

/// Cooperative cancellation flag. Checked before each repository's
/// acquisition starts; in-flight acquisitions run to completion or their
/// own timeout rather than being killed.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Observer contract for batch progress. How the host renders it (progress
/// bar, GUI, nothing) is not the engine's concern.
pub trait Progress: Send + Sync {
    fn on_fetch_start(&self, index: usize, total: usize, identifier: &str);
    fn on_fetch_end(&self, index: usize, total: usize, identifier: &str, succeeded: bool);
    fn on_batch_end(&self, succeeded: usize, failed: usize);
}

pub struct NoopProgress;

impl Progress for NoopProgress {
    fn on_fetch_start(&self, _index: usize, _total: usize, _identifier: &str) {}
    fn on_fetch_end(&self, _index: usize, _total: usize, _identifier: &str, _succeeded: bool) {}
    fn on_batch_end(&self, _succeeded: usize, _failed: usize) {}
}

pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} repositories {msg}",
            )
            .unwrap()
            .progress_chars("#>-"),
        );
        Self { bar }
    }
}

impl Progress for ProgressBarObserver {
    fn on_fetch_start(&self, _index: usize, _total: usize, identifier: &str) {
        self.bar.set_message(identifier.to_string());
    }

    fn on_fetch_end(&self, _index: usize, _total: usize, _identifier: &str, _succeeded: bool) {
        self.bar.inc(1);
    }

    fn on_batch_end(&self, succeeded: usize, failed: usize) {
        self.bar
            .finish_with_message(format!("{} analyzed, {} failed", succeeded, failed));
    }
}
