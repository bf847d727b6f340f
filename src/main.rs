//! Reddit Saver - CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use reddit_saver::{
    cli::Args,
    config::{validate_config, Config},
    download::{run_once, Fetcher},
    error::{exit_codes, Error, Result},
    output::{print_banner, print_config_summary, print_error, print_info, print_session_stats, print_warning},
    reddit::RedditClient,
    redgifs::RedgifsClient,
};

/// Delay before retrying a cycle that failed on a connection error.
const TRANSIENT_RETRY_DELAY: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::Authentication(_) | Error::Api(_) => {
                    ExitCode::from(exit_codes::API_ERROR as u8)
                }
                Error::Download(_) => ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Print banner
    print_banner();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            args.config.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    // Print configuration summary
    print_config_summary(
        &config.reddit.username,
        &config.options.download_directory.display().to_string(),
        config.options.consecutive_skip_limit,
        config.options.poll_interval_seconds,
    );

    // Ensure the download directory exists
    tokio::fs::create_dir_all(&config.options.download_directory).await?;

    // One HTTP client for everything: one connection pool, one retry budget.
    let http = reqwest::Client::builder()
        .user_agent(&config.reddit.user_agent)
        .build()?;

    let mut reddit = RedditClient::new(http.clone(), config.reddit.clone());
    let mut redgifs = RedgifsClient::new(http.clone());
    let fetcher = Fetcher::new(http, config.options.download_directory.clone());

    loop {
        tracing::info!("starting new download cycle");

        match run_once(
            &mut reddit,
            &mut redgifs,
            &fetcher,
            config.options.consecutive_skip_limit,
        )
        .await
        {
            Ok(counters) => print_session_stats(&counters),
            Err(e) if e.is_transient() => {
                tracing::error!(error = %e, "connection error during cycle");
                if args.once {
                    return Err(e);
                }
                tracing::info!(
                    delay_secs = TRANSIENT_RETRY_DELAY.as_secs(),
                    "will retry shortly"
                );
                tokio::time::sleep(TRANSIENT_RETRY_DELAY).await;
                continue;
            }
            Err(e) => {
                if args.once {
                    return Err(e);
                }
                tracing::error!(error = %e, "download cycle failed, will retry after the delay");
            }
        }

        if args.once {
            return Ok(());
        }

        tracing::info!(
            delay_secs = config.options.poll_interval_seconds,
            "download cycle finished, waiting for next run"
        );
        tokio::time::sleep(Duration::from_secs(config.options.poll_interval_seconds)).await;
    }
}
