mod action_items;
mod calendar;
mod classify;
mod confirm;
mod dedup;
mod error;
mod meetings;
mod resolve;
mod rules;
mod service;

pub use action_items::ActionItemExtractor;
pub use calendar::calendar_compose_url;
pub use classify::{classify_priority, confidence_for, HIGH_PRIORITY_KEYWORDS, LOW_PRIORITY_KEYWORDS};
pub use confirm::{confirm_action_items, ConfirmedTask, JsonLinesTaskSink, TaskSink};
pub use dedup::SeenPhrases;
pub use error::{CalendarLinkError, ExtractError, SinkError};
pub use meetings::{MeetingExtractor, MEETING_KEYWORDS};
pub use resolve::{next_friday, resolve_date, resolve_time};
pub use rules::{MatchSpan, Rule, RuleHit, RuleTable, Setter};
pub use service::{Extractor, MessageExtraction};
