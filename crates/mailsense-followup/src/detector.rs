use crate::{FollowUpError, MessageStore};
use chrono::{DateTime, Duration, Utc};
use mailsense_config::FollowUpConfig;
use mailsense_core::{FollowUp, MailMessage, Urgency};
use serde::Serialize;

/// Follow-ups worth surfacing, plus the sent messages whose thread could not
/// be checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FollowUpReport {
    pub items: Vec<FollowUp>,
    pub skipped: Vec<String>,
}

impl FollowUpReport {
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Buckets elapsed days; later thresholds override earlier ones.
pub fn urgency_for(days_waiting: i64, config: &FollowUpConfig) -> Urgency {
    let mut urgency = Urgency::Gentle;
    if days_waiting >= config.firm_after_days {
        urgency = Urgency::Firm;
    }
    if days_waiting >= config.urgent_after_days {
        urgency = Urgency::Urgent;
    }
    urgency
}

pub struct FollowUpDetector {
    config: FollowUpConfig,
}

impl FollowUpDetector {
    pub fn new(config: FollowUpConfig) -> Self {
        Self { config }
    }

    /// Finds sent messages from `current_user` that no recipient has answered.
    ///
    /// Thread lookups run one at a time. A failed lookup skips that message
    /// and is reported in [`FollowUpReport::skipped`]; only a failure to list
    /// the sent folder fails the whole run.
    pub async fn detect(
        &self,
        store: &dyn MessageStore,
        now: DateTime<Utc>,
        current_user: &str,
    ) -> Result<FollowUpReport, FollowUpError> {
        let since = now - Duration::days(self.config.window_days);
        let sent = store.list_folder(&self.config.sent_folder, since).await?;

        let mut report = FollowUpReport::default();
        let mut considered = 0usize;

        for message in sent.iter().filter(|message| message.is_from(current_user)) {
            let sent_at = message.timestamp();
            if sent_at < since {
                continue;
            }
            let days_waiting = (now - sent_at).num_days();
            if days_waiting < self.config.grace_days {
                continue;
            }
            considered += 1;

            let thread = match store.list_thread(&message.thread_id).await {
                Ok(thread) => thread,
                Err(error) => {
                    tracing::warn!(
                        message_id = %message.id,
                        thread_id = %message.thread_id,
                        "skipping follow-up check: {error}"
                    );
                    report.skipped.push(message.id.clone());
                    continue;
                }
            };

            if has_recipient_reply(message, &thread) {
                continue;
            }

            report.items.push(FollowUp {
                message_id: message.id.clone(),
                thread_id: message.thread_id.clone(),
                subject: message.subject.clone(),
                recipients: message
                    .recipients()
                    .map(|recipient| recipient.address.clone())
                    .collect(),
                sent_at,
                days_waiting,
                urgency: urgency_for(days_waiting, &self.config),
            });
        }

        report
            .items
            .sort_by(|a, b| b.days_waiting.cmp(&a.days_waiting));
        let awaiting = report.items.len();
        report.items.truncate(self.config.max_results);

        tracing::info!(
            sent = sent.len(),
            considered,
            awaiting,
            returned = report.items.len(),
            skipped = report.skipped.len(),
            "follow-up detection finished"
        );
        Ok(report)
    }
}

fn has_recipient_reply(sent: &MailMessage, thread: &[MailMessage]) -> bool {
    let sent_at = sent.timestamp();
    thread.iter().any(|reply| {
        reply.id != sent.id
            && reply.timestamp() > sent_at
            && sent
                .recipients()
                .any(|recipient| reply.is_from(&recipient.address))
    })
}
