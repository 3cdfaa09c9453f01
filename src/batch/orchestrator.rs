use super::{CancelToken, ConfigurationError, Progress};
use crate::engine::{to_repository_result, AggregateTally, BatchReport, RepositoryResult};
use crate::source::{repo_name, AuthorshipSource, FetchError};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Drives the pipeline over a list of repository identifiers. Acquisitions
/// run concurrently under a permit cap; each one is independent, so a
/// failure only marks its own identifier and the batch carries on. Folding
/// into the tally happens at a single point, one result at a time.
pub struct Orchestrator<S> {
    source: Arc<S>,
    fetch_timeout: Duration,
    max_concurrent: usize,
}

enum Outcome {
    Succeeded(RepositoryResult),
    Failed,
    Skipped,
}

impl<S: AuthorshipSource + 'static> Orchestrator<S> {
    pub fn new(source: S, fetch_timeout: Duration, max_concurrent: usize) -> Self {
        Self {
            source: Arc::new(source),
            fetch_timeout,
            max_concurrent: max_concurrent.max(1),
        }
    }

    pub async fn run(
        &self,
        identifiers: &[String],
        since: Option<chrono::Duration>,
        cancel: CancelToken,
        progress: Arc<dyn Progress>,
    ) -> Result<BatchReport, ConfigurationError> {
        if identifiers.is_empty() {
            return Err(ConfigurationError::EmptyRepositoryList);
        }

        let total = identifiers.len();
        info!(
            "Analyzing {} repositories ({} concurrent fetches)",
            total, self.max_concurrent
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut join_set = JoinSet::new();

        for (index, identifier) in identifiers.iter().enumerate() {
            let identifier = identifier.clone();
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();
            let progress = Arc::clone(&progress);
            let fetch_timeout = self.fetch_timeout;

            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.unwrap();

                // Cancellation is checked before the acquisition starts;
                // repositories that never started are omitted, not failed.
                if cancel.is_cancelled() {
                    debug!("Skipping {} (cancelled)", identifier);
                    return (index, Outcome::Skipped);
                }

                progress.on_fetch_start(index, total, &identifier);

                let fetch = source.fetch_authorship(&identifier, since);
                let outcome = match tokio::time::timeout(fetch_timeout, fetch).await {
                    Ok(Ok(raw)) => {
                        let result = to_repository_result(&repo_name(&identifier), &identifier, raw);
                        debug!(
                            "{}: {} contributors, {} commits",
                            identifier, result.contributor_count, result.total_commits
                        );
                        Outcome::Succeeded(result)
                    }
                    Ok(Err(err)) => {
                        warn!("{}: {}", identifier, err);
                        Outcome::Failed
                    }
                    Err(_) => {
                        warn!("{}: {}", identifier, FetchError::Timeout);
                        Outcome::Failed
                    }
                };

                progress.on_fetch_end(
                    index,
                    total,
                    &identifier,
                    matches!(outcome, Outcome::Succeeded(_)),
                );
                (index, outcome)
            });
        }

        // Buffer each outcome by its request index; the report must follow
        // the requested order, not completion order.
        let mut slots: Vec<Option<Outcome>> = Vec::with_capacity(total);
        slots.resize_with(total, || None);
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(err) => debug!("Fetch task failed to join: {}", err),
            }
        }

        // Single aggregation point: fold sequentially, in request order.
        let mut tally = AggregateTally::default();
        let mut successful = Vec::new();
        let mut failed = Vec::new();
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(Outcome::Succeeded(result)) => {
                    tally.fold(&result);
                    successful.push(result);
                }
                // a panicked task never reported an outcome
                Some(Outcome::Failed) | None => failed.push(identifiers[index].clone()),
                Some(Outcome::Skipped) => {}
            }
        }

        progress.on_batch_end(successful.len(), failed.len());
        info!(
            "Batch complete: {} of {} repositories analyzed, {} failed",
            successful.len(),
            total,
            failed.len()
        );

        Ok(BatchReport {
            successful,
            failed,
            tally,
            generated_at: Utc::now(),
        })
    }
}
