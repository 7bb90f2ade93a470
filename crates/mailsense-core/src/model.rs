use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MailAddress {
    #[serde(default)]
    pub name: Option<String>,
    pub address: String,
}

impl MailAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            name: None,
            address: address.into(),
        }
    }

    /// Case-insensitive address comparison; display names are ignored.
    pub fn matches(&self, address: &str) -> bool {
        self.address.trim().eq_ignore_ascii_case(address.trim())
    }
}

/// A message as handed over by the message store. Ids are opaque to us.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailMessage {
    pub id: String,
    pub thread_id: String,
    #[serde(default)]
    pub from: Vec<MailAddress>,
    #[serde(default)]
    pub to: Vec<MailAddress>,
    #[serde(default)]
    pub cc: Vec<MailAddress>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body_text: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    pub received_at: DateTime<Utc>,
}

impl MailMessage {
    /// Subject and plain-text body, the input of every extractor.
    pub fn extractable_text(&self) -> String {
        match self.body_text.as_deref() {
            Some(body) if !body.trim().is_empty() => format!("{}\n{}", self.subject, body),
            _ => self.subject.clone(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.sent_at.unwrap_or(self.received_at)
    }

    pub fn is_from(&self, address: &str) -> bool {
        self.from.iter().any(|from| from.matches(address))
    }

    /// Addresses in `to` and `cc`, in header order.
    pub fn recipients(&self) -> impl Iterator<Item = &MailAddress> {
        self.to.iter().chain(self.cc.iter())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Gentle,
    Firm,
    Urgent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionItem {
    pub text: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub source_message_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meeting {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub duration_minutes: Option<u32>,
    pub location: Option<String>,
    pub confidence: Confidence,
    pub source_message_id: String,
}

/// A sent message still waiting for an answer from one of its recipients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowUp {
    pub message_id: String,
    pub thread_id: String,
    pub subject: String,
    pub recipients: Vec<String>,
    pub sent_at: DateTime<Utc>,
    pub days_waiting: i64,
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractedItem {
    ActionItem(ActionItem),
    Meeting(Meeting),
    FollowUp(FollowUp),
}

impl ExtractedItem {
    pub fn source_message_id(&self) -> &str {
        match self {
            Self::ActionItem(item) => &item.source_message_id,
            Self::Meeting(meeting) => &meeting.source_message_id,
            Self::FollowUp(follow_up) => &follow_up.message_id,
        }
    }

    /// Stable identity used for dismissal: kind, provenance and normalized content.
    pub fn key(&self) -> String {
        let (kind, content) = match self {
            Self::ActionItem(item) => ("action_item", normalize_phrase(&item.text)),
            Self::Meeting(meeting) => ("meeting", normalize_phrase(&meeting.title)),
            Self::FollowUp(follow_up) => ("follow_up", normalize_phrase(&follow_up.subject)),
        };
        format!("{kind}:{}:{content}", self.source_message_id())
    }
}

impl From<ActionItem> for ExtractedItem {
    fn from(item: ActionItem) -> Self {
        Self::ActionItem(item)
    }
}

impl From<Meeting> for ExtractedItem {
    fn from(meeting: Meeting) -> Self {
        Self::Meeting(meeting)
    }
}

impl From<FollowUp> for ExtractedItem {
    fn from(follow_up: FollowUp) -> Self {
        Self::FollowUp(follow_up)
    }
}

/// Lower-cases, trims and collapses internal whitespace.
pub fn normalize_phrase(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
