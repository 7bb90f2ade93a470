mod commands;
mod ingest;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use mailsense_config::{AppConfig, ConfigManager};
use mailsense_core::Notice;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "mailsense")]
#[command(about = "Suggest action items, meetings and follow-ups from mail", long_about = None)]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract action items and a meeting from an .eml file
    Extract {
        eml: PathBuf,

        /// Reference date for relative phrases (defaults to today in the configured timezone)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// List sent messages still waiting for a reply
    FollowUps {
        /// JSON array of messages
        #[arg(long)]
        mailbox: PathBuf,

        /// Address of the mailbox owner
        #[arg(long)]
        me: String,

        /// RFC 3339 timestamp to evaluate against
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },

    /// Confirm extracted action items and print them as JSON lines
    Tasks {
        eml: PathBuf,

        /// Comma-separated action item indexes; all items when omitted
        #[arg(long, value_delimiter = ',')]
        select: Option<Vec<usize>>,

        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Print a calendar link for the meeting found in an .eml file
    CalendarLink {
        eml: PathBuf,

        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

fn init_tracing(fallback_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<AppConfig> {
    let manager = match path {
        Some(path) => ConfigManager::at_path(path),
        None => ConfigManager::new(),
    }
    .context("failed to open config")?;
    manager
        .load()
        .with_context(|| format!("failed to load {}", manager.config_path().display()))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = load_config(cli.config);

    init_tracing(
        config
            .as_ref()
            .map(|config| config.logging.filter.as_str())
            .unwrap_or("info"),
    );

    let result = match config {
        Ok(config) => commands::run(&config, cli.cmd).await,
        Err(error) => Err(error),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let notice = Notice::from_failure(format!("{error:#}"));
            tracing::error!(
                reauthenticate = notice.requires_reauthentication(),
                "{}",
                notice.message()
            );
            match serde_json::to_string(&notice) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{}", notice.message()),
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_task_selection_and_global_config() {
        let cli = Cli::try_parse_from([
            "mailsense",
            "tasks",
            "mail.eml",
            "--select",
            "2,0",
            "--config",
            "custom.toml",
        ])
        .expect("arguments parse");

        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("custom.toml"))
        );
        match cli.cmd {
            Command::Tasks { select, today, .. } => {
                assert_eq!(select, Some(vec![2, 0]));
                assert!(today.is_none());
            }
            _ => panic!("expected tasks command"),
        }
    }

    #[test]
    fn parses_follow_up_arguments() {
        let cli = Cli::try_parse_from([
            "mailsense",
            "follow-ups",
            "--mailbox",
            "mailbox.json",
            "--me",
            "me@example.com",
            "--now",
            "2026-10-17T12:00:00Z",
        ])
        .expect("arguments parse");

        match cli.cmd {
            Command::FollowUps { me, now, .. } => {
                assert_eq!(me, "me@example.com");
                assert!(now.is_some());
            }
            _ => panic!("expected follow-ups command"),
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(Cli::try_parse_from(["mailsense", "extract", "a.eml", "--today", "14/10"]).is_err());
    }
}
