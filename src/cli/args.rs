//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Reddit saved-posts media downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "reddit-saver",
    version,
    about = "Download media from saved Reddit posts",
    long_about = "Periodically drains your saved-posts queue and downloads the referenced\n\
                  images, galleries, and external video clips into a flat local directory,\n\
                  skipping anything already on disk."
)]
pub struct Args {
    /// Reddit application client ID.
    #[arg(long, env = "REDDIT_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Reddit application client secret.
    #[arg(long, env = "REDDIT_CLIENT_SECRET")]
    pub client_secret: Option<String>,

    /// Reddit account username.
    #[arg(short, long, env = "REDDIT_USERNAME")]
    pub username: Option<String>,

    /// Reddit account password.
    #[arg(short, long, env = "REDDIT_PASSWORD")]
    pub password: Option<String>,

    /// User-Agent string for feed requests.
    #[arg(short = 'a', long = "user-agent", env = "REDDIT_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Directory downloads are written into.
    #[arg(short = 'd', long = "directory", env = "DOWNLOAD_LOCATION")]
    pub download_directory: Option<PathBuf>,

    /// Stop a run after this many consecutive skips (0 disables).
    #[arg(long, env = "CONSECUTIVE_SKIP_LIMIT")]
    pub skip_limit: Option<u32>,

    /// Seconds between download cycles.
    #[arg(long, env = "TIME_BETWEEN_DOWNLOADS")]
    pub poll_interval: Option<u64>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Run a single download cycle and exit.
    #[arg(long)]
    pub once: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(client_id) = &self.client_id {
            config.reddit.client_id = client_id.clone();
        }

        if let Some(client_secret) = &self.client_secret {
            config.reddit.client_secret = client_secret.clone();
        }

        if let Some(username) = &self.username {
            config.reddit.username = username.clone();
        }

        if let Some(password) = &self.password {
            config.reddit.password = password.clone();
        }

        if let Some(user_agent) = &self.user_agent {
            config.reddit.user_agent = user_agent.clone();
        }

        if let Some(dir) = &self.download_directory {
            config.options.download_directory = dir.clone();
        }

        if let Some(limit) = self.skip_limit {
            config.options.consecutive_skip_limit = limit;
        }

        if let Some(interval) = self.poll_interval {
            config.options.poll_interval_seconds = interval;
        }
    }
}
