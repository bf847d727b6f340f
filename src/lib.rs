//! Reddit Saver - saved-posts media archiver
//!
//! This library periodically drains a user's saved-posts queue and downloads
//! the referenced media into a flat local directory.
//!
//! # Features
//!
//! - Direct images, image galleries, and RedGifs-hosted video clips
//! - Idempotent runs: existence on disk is the completion record
//! - Size-verified skips for video hosts whose encodings may change
//! - Lazy bearer-token lifecycle with transparent refresh on 401
//! - Consecutive-skip circuit breaker for long synchronized backlogs
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use reddit_saver::{run_once, Config, Fetcher, RedditClient, RedgifsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let http = reqwest::Client::new();
//!
//!     let mut reddit = RedditClient::new(http.clone(), config.reddit.clone());
//!     let mut redgifs = RedgifsClient::new(http.clone());
//!     let fetcher = Fetcher::new(http, config.options.download_directory.clone());
//!
//!     let counters = run_once(
//!         &mut reddit,
//!         &mut redgifs,
//!         &fetcher,
//!         config.options.consecutive_skip_limit,
//!     )
//!     .await?;
//!     println!("downloaded {} new files", counters.downloaded);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;
pub mod reddit;
pub mod redgifs;

// Re-exports for convenience
pub use config::{validate_config, Config};
pub use download::{run_once, FetchStatus, Fetcher, Outcome, SessionCounters};
pub use error::{Error, Result};
pub use media::{classify, DownloadTarget, PostKind, SavedPost};
pub use reddit::RedditClient;
pub use redgifs::{RedgifsClient, Resolution};
