use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use newsfetch::config::Config;
use newsfetch::feed::{ConsoleReporter, FeedClient};
use newsfetch::util::validate_url;

/// How a run ended, mapped to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// The user left the browser.
    Quit,
    /// Retries exhausted or the feed had no entries.
    FetchFailed,
    /// Bad URL, config file or client settings, before any request is made.
    Usage,
    /// Reading the prompt or writing to the terminal failed.
    TerminalIo,
}

impl Outcome {
    fn code(self) -> u8 {
        match self {
            Outcome::Quit => 0,
            Outcome::FetchFailed => 1,
            Outcome::Usage => 2,
            Outcome::TerminalIo => 3,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

/// Get the config file path (~/.config/newsfetch/config.toml)
fn get_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("newsfetch")
            .join("config.toml"),
    )
}

fn load_config() -> Result<Config> {
    match get_config_path() {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            tracing::debug!("HOME not set, using default configuration");
            Ok(Config::default())
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "newsfetch", version, about = "Fetch the latest news from an RSS feed")]
struct Args {
    /// RSS/Atom feed URL
    url: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Diagnostics go to stderr so they never interleave with the browser on stdout
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run(&args).await.into()
}

async fn run(args: &Args) -> Outcome {
    let url = match validate_url(&args.url) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Outcome::Usage;
        }
    };

    let client = match load_config().and_then(|config| {
        FeedClient::from_config(&config).context("Failed to build HTTP client")
    }) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return Outcome::Usage;
        }
    };
    tracing::debug!(url = %url, policy = ?client.policy(), "Fetching feed");

    let entries = match client.fetch(url.as_str(), &mut ConsoleReporter).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::info!(error = %e, "No entries to browse");
            return Outcome::FetchFailed;
        }
    };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    match newsfetch::ui::run(&entries, stdin.lock(), &mut stdout) {
        Ok(()) => Outcome::Quit,
        Err(e) => {
            eprintln!("Error: Terminal I/O failed: {}", e);
            Outcome::TerminalIo
        }
    }
}
