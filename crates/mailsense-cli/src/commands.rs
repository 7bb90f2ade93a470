use crate::ingest::read_eml;
use crate::Command;
use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use mailsense_config::AppConfig;
use mailsense_core::MailMessage;
use mailsense_extract::{
    calendar_compose_url, confirm_action_items, Extractor, JsonLinesTaskSink, MessageExtraction,
};
use mailsense_followup::{FollowUpDetector, SnapshotStore};
use serde::Serialize;
use std::path::Path;

pub(crate) async fn run(config: &AppConfig, command: Command) -> Result<()> {
    match command {
        Command::Extract { eml, today } => {
            let (_, extraction) = extract_file(config, &eml, today)?;
            print_json(&extraction)
        }

        Command::FollowUps { mailbox, me, now } => {
            let store = SnapshotStore::load(&mailbox)
                .with_context(|| format!("failed to load mailbox {}", mailbox.display()))?;
            let now = now.unwrap_or_else(Utc::now);
            let report = FollowUpDetector::new(config.follow_up.clone())
                .detect(&store, now, &me)
                .await
                .context("follow-up detection failed")?;
            print_json(&report)
        }

        Command::Tasks { eml, select, today } => {
            let (_, extraction) = extract_file(config, &eml, today)?;
            let selection =
                select.unwrap_or_else(|| (0..extraction.action_items.len()).collect());
            let sink = JsonLinesTaskSink::new(std::io::stdout());
            let confirmed = confirm_action_items(&sink, &extraction.action_items, &selection)
                .await
                .context("failed to confirm action items")?;
            tracing::debug!(count = confirmed.len(), "tasks written");
            Ok(())
        }

        Command::CalendarLink { eml, today } => {
            let (message, extraction) = extract_file(config, &eml, today)?;
            let meeting = extraction
                .meeting
                .ok_or_else(|| anyhow!("no meeting found in message {}", message.id))?;
            let url = calendar_compose_url(&meeting, config.calendar.default_duration_minutes)
                .context("failed to build calendar link")?;
            println!("{url}");
            Ok(())
        }
    }
}

fn extract_file(
    config: &AppConfig,
    eml: &Path,
    today: Option<NaiveDate>,
) -> Result<(MailMessage, MessageExtraction)> {
    let now = Utc::now();
    let today = match today {
        Some(today) => today,
        None => config.reference_date(now)?,
    };
    let message = read_eml(eml, now)?;
    let extractor = Extractor::new(&config.extraction).context("failed to build extractor")?;
    let extraction = extractor.extract_message(&message, today);
    Ok((message, extraction))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
