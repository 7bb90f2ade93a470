use crate::{ActionItemExtractor, ExtractError, MeetingExtractor};
use chrono::NaiveDate;
use mailsense_config::ExtractionConfig;
use mailsense_core::{ActionItem, DismissedItems, ExtractedItem, MailMessage, Meeting};
use serde::Serialize;

/// Everything found in a single message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageExtraction {
    pub message_id: String,
    pub action_items: Vec<ActionItem>,
    pub meeting: Option<Meeting>,
}

impl MessageExtraction {
    pub fn is_empty(&self) -> bool {
        self.action_items.is_empty() && self.meeting.is_none()
    }

    pub fn into_items(self) -> Vec<ExtractedItem> {
        self.action_items
            .into_iter()
            .map(ExtractedItem::from)
            .chain(self.meeting.map(ExtractedItem::from))
            .collect()
    }
}

/// Runs every extractor over a message. Build once and share; construction is
/// the only fallible step.
pub struct Extractor {
    actions: ActionItemExtractor,
    meetings: MeetingExtractor,
}

impl Extractor {
    pub fn new(config: &ExtractionConfig) -> Result<Self, ExtractError> {
        Ok(Self {
            actions: ActionItemExtractor::new(config)?,
            meetings: MeetingExtractor::new()?,
        })
    }

    pub fn extract_message(&self, message: &MailMessage, today: NaiveDate) -> MessageExtraction {
        let action_items = self
            .actions
            .extract(&message.extractable_text(), &message.id, today);
        let meeting = self.meetings.extract(
            &message.subject,
            message.body_text.as_deref().unwrap_or_default(),
            &message.id,
            today,
        );

        tracing::debug!(
            message_id = %message.id,
            action_items = action_items.len(),
            meeting = meeting.is_some(),
            "message extracted"
        );

        MessageExtraction {
            message_id: message.id.clone(),
            action_items,
            meeting,
        }
    }

    /// Extracts from each message and drops items the user already dismissed.
    pub fn extract_visible(
        &self,
        messages: &[MailMessage],
        dismissed: &DismissedItems,
        today: NaiveDate,
    ) -> Vec<ExtractedItem> {
        let items = messages
            .iter()
            .flat_map(|message| self.extract_message(message, today).into_items())
            .collect::<Vec<_>>();
        dismissed.retain_visible(items)
    }
}

#[cfg(test)]
mod tests {
    use super::Extractor;
    use chrono::{NaiveDate, TimeZone, Utc};
    use mailsense_config::ExtractionConfig;
    use mailsense_core::{DismissedItems, ExtractedItem, MailAddress, MailMessage};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).expect("valid date")
    }

    fn message(id: &str, subject: &str, body: Option<&str>) -> MailMessage {
        MailMessage {
            id: id.to_string(),
            thread_id: format!("thread-{id}"),
            from: vec![MailAddress::new("lead@example.com")],
            to: vec![MailAddress::new("me@example.com")],
            cc: Vec::new(),
            subject: subject.to_string(),
            body_text: body.map(str::to_string),
            labels: vec!["INBOX".to_string()],
            sent_at: None,
            received_at: Utc
                .with_ymd_and_hms(2026, 10, 14, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    fn extractor() -> Extractor {
        Extractor::new(&ExtractionConfig::default()).expect("extractor builds")
    }

    #[test]
    fn extracts_actions_and_meeting_from_one_message() {
        let extraction = extractor().extract_message(
            &message(
                "m1",
                "Project sync",
                Some("Please send the agenda before the call. Meeting tomorrow at 9am."),
            ),
            today(),
        );

        assert_eq!(extraction.message_id, "m1");
        assert_eq!(extraction.action_items.len(), 1);
        assert_eq!(extraction.action_items[0].text, "send the agenda before the call");
        let meeting = extraction.meeting.expect("meeting detected");
        assert_eq!(meeting.title, "Project sync");
        assert_eq!(meeting.date, today().succ_opt());
        assert_eq!(meeting.source_message_id, "m1");
    }

    #[test]
    fn subject_only_message_is_scanned() {
        let extraction = extractor().extract_message(
            &message("m2", "Please renew the domain today", None),
            today(),
        );
        assert_eq!(extraction.action_items.len(), 1);
        assert_eq!(extraction.action_items[0].due_date, Some(today()));
        assert!(extraction.meeting.is_none());
    }

    #[test]
    fn empty_message_yields_nothing() {
        let extraction = extractor().extract_message(&message("m3", "", Some("  ")), today());
        assert!(extraction.is_empty());
        assert!(extraction.into_items().is_empty());
    }

    #[test]
    fn dismissed_items_are_hidden() {
        let extractor = extractor();
        let messages = vec![message(
            "m4",
            "Weekly call",
            Some("Kindly update the status page. See you Friday at 10am."),
        )];
        let mut dismissed = DismissedItems::new();

        let visible = extractor.extract_visible(&messages, &dismissed, today());
        assert_eq!(visible.len(), 2);
        let action = visible
            .iter()
            .find(|item| matches!(item, ExtractedItem::ActionItem(_)))
            .expect("action item present");

        assert!(dismissed.dismiss(action));
        let visible = extractor.extract_visible(&messages, &dismissed, today());
        assert_eq!(visible.len(), 1);
        assert!(matches!(visible[0], ExtractedItem::Meeting(_)));
    }
}
