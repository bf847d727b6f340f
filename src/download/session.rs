//! Session loop and per-run counters.

use crate::download::dispatch::{Dispatcher, Flow, Outcome};
use crate::download::fetcher::Fetcher;
use crate::error::Result;
use crate::reddit::RedditClient;
use crate::redgifs::RedgifsClient;

/// Counters for one session run. Reset at the start of every run, mutated
/// only by the session loop's own thread, never persisted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionCounters {
    pub downloaded: u64,
    pub skipped: u64,
    pub failed: u64,
    pub ignored: u64,

    /// Items permanently removed upstream (410).
    pub upstream_deleted: u64,

    /// Length of the current unbroken run of skips; feeds the circuit
    /// breaker.
    pub consecutive_skips: u32,
}

impl SessionCounters {
    /// Record one unit of work.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Downloaded => {
                self.downloaded += 1;
                self.consecutive_skips = 0;
            }
            Outcome::Skipped => {
                self.skipped += 1;
                self.consecutive_skips += 1;
            }
            Outcome::Failed => {
                self.failed += 1;
                self.consecutive_skips = 0;
            }
            // Gone and Ignored are not download attempts, so neither extends
            // nor breaks a run of skips.
            Outcome::Gone => {
                self.upstream_deleted += 1;
            }
            Outcome::Ignored => {
                self.ignored += 1;
            }
        }
    }
}

/// Walk the whole saved-posts feed once, dispatching every post.
///
/// The feed is consumed lazily page by page from its start; there is no
/// checkpointing, the existence checks on disk make repeat work cheap.
/// Dispatch failures for a single post are swallowed by the dispatcher;
/// only feed-level errors propagate to the scheduler boundary.
pub async fn run_once(
    reddit: &mut RedditClient,
    redgifs: &mut RedgifsClient,
    fetcher: &Fetcher,
    skip_limit: u32,
) -> Result<SessionCounters> {
    let mut counters = SessionCounters::default();
    let mut dispatcher = Dispatcher::new(fetcher, redgifs, skip_limit);
    let mut after: Option<String> = None;

    loop {
        let page = reddit.saved_page(after.as_deref()).await?;

        for post in &page.posts {
            if dispatcher.dispatch_post(post, &mut counters).await == Flow::Stop {
                tracing::info!(
                    limit = skip_limit,
                    "consecutive skip limit reached, stopping session"
                );
                log_summary(&counters);
                return Ok(counters);
            }
        }

        match page.after {
            Some(next) => after = Some(next),
            None => break,
        }
    }

    log_summary(&counters);
    Ok(counters)
}

fn log_summary(counters: &SessionCounters) {
    if counters.upstream_deleted > 0 {
        tracing::info!(
            count = counters.upstream_deleted,
            "items were deleted upstream this session"
        );
    }
    tracing::info!(
        downloaded = counters.downloaded,
        skipped = counters.skipped,
        failed = counters.failed,
        ignored = counters.ignored,
        "session complete"
    );
}
