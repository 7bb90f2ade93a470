use crate::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mailsense_core::MailMessage;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Read access to a mailbox.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Messages in `folder` whose timestamp is at or after `since`.
    async fn list_folder(
        &self,
        folder: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MailMessage>, StoreError>;

    async fn list_thread(&self, thread_id: &str) -> Result<Vec<MailMessage>, StoreError>;
}

/// In-memory mailbox, typically loaded from a JSON array of messages.
/// Folder membership is a case-insensitive match on message labels.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    messages: Vec<MailMessage>,
}

impl SnapshotStore {
    pub fn from_messages(messages: Vec<MailMessage>) -> Self {
        Self { messages }
    }

    pub fn from_json_reader(reader: impl Read) -> Result<Self, StoreError> {
        let messages: Vec<MailMessage> = serde_json::from_reader(reader)?;
        Ok(Self::from_messages(messages))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let store = Self::from_json_reader(BufReader::new(File::open(path)?))?;
        tracing::debug!(
            path = %path.display(),
            messages = store.messages.len(),
            "loaded mailbox snapshot"
        );
        Ok(store)
    }

    pub fn messages(&self) -> &[MailMessage] {
        &self.messages
    }
}

#[async_trait]
impl MessageStore for SnapshotStore {
    async fn list_folder(
        &self,
        folder: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<MailMessage>, StoreError> {
        Ok(self
            .messages
            .iter()
            .filter(|message| {
                message
                    .labels
                    .iter()
                    .any(|label| label.eq_ignore_ascii_case(folder))
            })
            .filter(|message| message.timestamp() >= since)
            .cloned()
            .collect())
    }

    async fn list_thread(&self, thread_id: &str) -> Result<Vec<MailMessage>, StoreError> {
        Ok(self
            .messages
            .iter()
            .filter(|message| message.thread_id == thread_id)
            .cloned()
            .collect())
    }
}
