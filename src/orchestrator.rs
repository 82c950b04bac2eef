//! One polling run: fetch every source, announce what is new, remember it.

use crate::catalog::Source;
use crate::compose::compose;
use crate::feed::FeedSource;
use crate::publish::{ChannelApi, PublishOutcome, Publisher};
use crate::select::select_new;
use crate::storage::{PersistError, PostedLinks};
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Failures that abort a run. Per-source and per-message failures never do.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to save posted links: {0}")]
    Persist(#[from] PersistError),
}

// ============================================================================
// Run Configuration and Summary
// ============================================================================

/// Everything a run needs besides its two collaborators.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Sources to poll, in order.
    pub sources: Vec<Source>,
    /// File holding already-announced links.
    pub posted_links_path: PathBuf,
}

/// Counters describing what a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub sources_checked: usize,
    pub sources_failed: usize,
    pub entries_selected: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Whether the posted-links file was rewritten.
    pub persisted: bool,
}

// ============================================================================
// Orchestrator
// ============================================================================

/// Drives a single run over all configured sources, strictly sequentially.
pub struct Orchestrator<F, A> {
    config: RunConfig,
    feeds: F,
    publisher: Publisher<A>,
}

impl<F: FeedSource, A: ChannelApi> Orchestrator<F, A> {
    pub fn new(config: RunConfig, feeds: F, api: A) -> Self {
        Self {
            config,
            feeds,
            publisher: Publisher::new(api),
        }
    }

    /// Executes one run.
    ///
    /// A source that cannot be fetched is skipped. Every selected link is
    /// recorded whether or not its announcement went out. The posted-links
    /// file is written only when something was selected, and a failure to
    /// write it is the only error returned.
    pub async fn run(&self) -> Result<RunSummary, RunError> {
        let path = &self.config.posted_links_path;
        let mut posted = PostedLinks::load(path);
        let mut summary = RunSummary::default();

        tracing::info!(
            sources = self.config.sources.len(),
            known_links = posted.len(),
            "Starting run"
        );

        for source in &self.config.sources {
            summary.sources_checked += 1;

            let entries = match self.feeds.fetch(&source.feed_url).await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        source = %source.name,
                        url = %source.feed_url,
                        error = %e,
                        "Failed to fetch feed, skipping source"
                    );
                    summary.sources_failed += 1;
                    continue;
                }
            };

            let selected = select_new(&entries, &mut posted);
            tracing::debug!(
                source = %source.name,
                entries = entries.len(),
                selected = selected.len(),
                "Checked source"
            );

            for entry in selected {
                summary.entries_selected += 1;
                let message = compose(entry, source);

                match self.publisher.publish(&message).await {
                    outcome @ (PublishOutcome::Delivered | PublishOutcome::DeliveredAsText { .. }) => {
                        tracing::info!(
                            source = %source.name,
                            link = %entry.link,
                            as_text = matches!(outcome, PublishOutcome::DeliveredAsText { .. }),
                            "Announced entry"
                        );
                        summary.delivered += 1;
                    }
                    PublishOutcome::Failed { error } => {
                        tracing::warn!(
                            source = %source.name,
                            link = %entry.link,
                            error = %error,
                            "Entry not announced, link stays recorded"
                        );
                        summary.failed += 1;
                    }
                }
            }
        }

        if summary.entries_selected == 0 {
            tracing::info!("No new posts found");
            return Ok(summary);
        }

        posted.persist(path)?;
        summary.persisted = true;

        tracing::info!(
            sources_checked = summary.sources_checked,
            sources_failed = summary.sources_failed,
            selected = summary.entries_selected,
            delivered = summary.delivered,
            failed = summary.failed,
            "Run complete"
        );
        Ok(summary)
    }
}

// ============================================================================
// Tests
// ============================================================================
