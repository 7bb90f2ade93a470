use crate::SinkError;
use async_trait::async_trait;
use chrono::NaiveDate;
use mailsense_core::{ActionItem, Priority};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Mutex;
use uuid::Uuid;

/// An action item the user chose to keep, ready for the task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedTask {
    pub id: Uuid,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub source_message_id: String,
}

impl From<&ActionItem> for ConfirmedTask {
    fn from(item: &ActionItem) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: item.text.clone(),
            due_date: item.due_date,
            priority: item.priority,
            source_message_id: item.source_message_id.clone(),
        }
    }
}

/// Destination for confirmed tasks.
#[async_trait]
pub trait TaskSink: Send + Sync {
    async fn insert_task(&self, task: &ConfirmedTask) -> Result<(), SinkError>;
}

/// Inserts the selected items in selection order.
///
/// Every index is validated before anything is written; repeated indexes are
/// inserted once. The first sink failure stops the batch, and tasks inserted
/// before it stay inserted.
pub async fn confirm_action_items(
    sink: &dyn TaskSink,
    items: &[ActionItem],
    selection: &[usize],
) -> Result<Vec<ConfirmedTask>, SinkError> {
    if let Some(&index) = selection.iter().find(|index| **index >= items.len()) {
        return Err(SinkError::InvalidSelection {
            index,
            len: items.len(),
        });
    }

    let mut picked = Vec::with_capacity(selection.len());
    for &index in selection {
        if !picked.contains(&index) {
            picked.push(index);
        }
    }

    let mut confirmed = Vec::with_capacity(picked.len());
    for index in picked {
        let task = ConfirmedTask::from(&items[index]);
        if let Err(error) = sink.insert_task(&task).await {
            tracing::warn!(
                task = %task.title,
                inserted = confirmed.len(),
                "failed to insert confirmed task: {error}"
            );
            return Err(error);
        }
        confirmed.push(task);
    }

    tracing::info!(count = confirmed.len(), "confirmed action items");
    Ok(confirmed)
}

/// Writes one JSON object per line to any writer.
pub struct JsonLinesTaskSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesTaskSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|_| SinkError::Rejected("task writer lock poisoned".to_string()))
    }
}

#[async_trait]
impl<W: Write + Send> TaskSink for JsonLinesTaskSink<W> {
    async fn insert_task(&self, task: &ConfirmedTask) -> Result<(), SinkError> {
        let line = serde_json::to_string(task)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SinkError::Rejected("task writer lock poisoned".to_string()))?;
        writeln!(writer, "{line}")?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        titles: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    impl RecordingSink {
        fn titles(&self) -> Vec<String> {
            self.titles.lock().expect("sink lock").clone()
        }
    }

    #[async_trait]
    impl TaskSink for RecordingSink {
        async fn insert_task(&self, task: &ConfirmedTask) -> Result<(), SinkError> {
            if self.fail_on.as_deref() == Some(task.title.as_str()) {
                return Err(SinkError::Rejected("store unavailable".to_string()));
            }
            self.titles.lock().expect("sink lock").push(task.title.clone());
            Ok(())
        }
    }

    fn item(text: &str) -> ActionItem {
        ActionItem {
            text: text.to_string(),
            priority: Priority::Medium,
            due_date: NaiveDate::from_ymd_opt(2026, 10, 16),
            source_message_id: "m1".to_string(),
        }
    }

    fn items() -> Vec<ActionItem> {
        vec![
            item("review the report"),
            item("send the invoice"),
            item("book the venue"),
        ]
    }

    #[tokio::test]
    async fn inserts_selection_in_order_once() {
        let sink = RecordingSink::default();
        let confirmed = confirm_action_items(&sink, &items(), &[2, 0, 2])
            .await
            .expect("confirmed");

        assert_eq!(sink.titles(), vec!["book the venue", "review the report"]);
        assert_eq!(confirmed.len(), 2);
        assert_eq!(confirmed[0].due_date, NaiveDate::from_ymd_opt(2026, 10, 16));
        assert_eq!(confirmed[0].source_message_id, "m1");
        assert_ne!(confirmed[0].id, confirmed[1].id);
    }

    #[tokio::test]
    async fn out_of_range_selection_writes_nothing() {
        let sink = RecordingSink::default();
        let result = confirm_action_items(&sink, &items(), &[0, 3]).await;

        assert!(matches!(
            result,
            Err(SinkError::InvalidSelection { index: 3, len: 3 })
        ));
        assert!(sink.titles().is_empty());
    }

    #[tokio::test]
    async fn first_failure_aborts_the_batch() {
        let sink = RecordingSink {
            fail_on: Some("send the invoice".to_string()),
            ..RecordingSink::default()
        };
        let result = confirm_action_items(&sink, &items(), &[0, 1, 2]).await;

        assert!(matches!(result, Err(SinkError::Rejected(_))));
        assert_eq!(sink.titles(), vec!["review the report"]);
    }

    #[tokio::test]
    async fn empty_selection_is_a_no_op() {
        let sink = RecordingSink::default();
        let confirmed = confirm_action_items(&sink, &items(), &[])
            .await
            .expect("confirmed");
        assert!(confirmed.is_empty());
    }

    #[tokio::test]
    async fn json_lines_sink_writes_one_task_per_line() {
        let sink = JsonLinesTaskSink::new(Vec::new());
        confirm_action_items(&sink, &items(), &[0, 1])
            .await
            .expect("confirmed");

        let bytes = sink.into_inner().expect("writer");
        let output = String::from_utf8(bytes).expect("utf8");
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);

        let task: ConfirmedTask = serde_json::from_str(lines[1]).expect("task json");
        assert_eq!(task.title, "send the invoice");
        assert_eq!(task.priority, Priority::Medium);
        assert!(lines[0].contains("\"due_date\":\"2026-10-16\""));
    }
}
