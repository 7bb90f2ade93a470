use crate::classify::classify_priority;
use crate::dedup::SeenPhrases;
use crate::resolve::resolve_date;
use crate::rules::{group_text, RuleTable, Setter};
use crate::ExtractError;
use chrono::NaiveDate;
use mailsense_config::ExtractionConfig;
use mailsense_core::ActionItem;

/// Shortest run of text up to ` and `, a sentence terminator or the end.
const ACTION_TAIL: &str = r"([^.!?;\n]+?)(?:\s+and\s+|[.!?;\n]|$)";

const ACTION_PREFIXES: [(&str, &str); 5] = [
    ("polite_request", r"\b(?:please|kindly|pls)\s+"),
    (
        "reminder",
        r"\b(?:don[’']?t\s+forget\s+to|remember\s+to|make\s+sure\s+(?:to|you)|be\s+sure\s+to)\s+",
    ),
    (
        "question_request",
        r"\b(?:can|could|would|will)\s+you\s+(?:please\s+)?",
    ),
    (
        "obligation",
        r"\b(?:needs?\s+(?:you\s+)?to|have\s+to|must)\s+",
    ),
    (
        "labelled",
        r"\b(?:action\s+items?|to-?do|action\s+required)\s*:\s*",
    ),
];

const RELATIVE_PHRASE: &str = r"today|tonight|tomorrow|eod|end\s+of\s+(?:the\s+)?day|this\s+week|end\s+of\s+(?:the\s+)?week|eow|next\s+week|(?:next\s+)?(?:mon|tue|tues|wed|wednes|thu|thur|thurs|fri|sat|satur|sun)(?:day)?";

const ABSOLUTE_DATE: &str = r"\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}(?:/\d{2,4})?|(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+\d{1,2}(?:st|nd|rd|th)?(?:,?\s+\d{4})?";

fn action_patterns() -> Vec<(&'static str, String)> {
    ACTION_PREFIXES
        .iter()
        .map(|(name, prefix)| (*name, format!("{prefix}{ACTION_TAIL}")))
        .collect()
}

fn due_date_patterns() -> Vec<(&'static str, String)> {
    vec![
        (
            "due_relative",
            format!(r"\b(?:by|before|until|due(?:\s+(?:on|by))?)\s+({RELATIVE_PHRASE})\b"),
        ),
        (
            "due_absolute",
            format!(r"\b(?:by|before|due(?:\s+on)?)\s+({ABSOLUTE_DATE})\b"),
        ),
        (
            "bare_relative",
            r"\b(today|tonight|tomorrow|eod|end\s+of\s+(?:the\s+)?day|this\s+week|end\s+of\s+(?:the\s+)?week|next\s+week)\b".to_string(),
        ),
    ]
}

/// Extracts short imperative phrases and their due dates.
pub struct ActionItemExtractor {
    actions: RuleTable<String>,
    due_dates: RuleTable<String>,
    max_items: usize,
    min_chars: usize,
    max_chars: usize,
}

impl ActionItemExtractor {
    pub fn new(config: &ExtractionConfig) -> Result<Self, ExtractError> {
        if config.min_action_chars > config.max_action_chars {
            return Err(ExtractError::Config(format!(
                "min_action_chars ({}) exceeds max_action_chars ({})",
                config.min_action_chars, config.max_action_chars
            )));
        }

        Ok(Self {
            actions: compile_text_rules(&action_patterns())?,
            due_dates: compile_text_rules(&due_date_patterns())?,
            max_items: config.max_action_items,
            min_chars: config.min_action_chars,
            max_chars: config.max_action_chars,
        })
    }

    /// Candidates surface in pattern order, then match order, up to the cap.
    pub fn extract(&self, text: &str, source_message_id: &str, today: NaiveDate) -> Vec<ActionItem> {
        if text.trim().is_empty() {
            tracing::debug!(source_message_id, "no text to scan for action items");
            return Vec::new();
        }

        let mut seen = SeenPhrases::new();
        let mut items = Vec::new();

        for hit in self.actions.all_matches(text) {
            if items.len() >= self.max_items {
                break;
            }
            let Some(candidate) = hit.value.as_deref().map(clean_candidate) else {
                continue;
            };

            let length = candidate.chars().count();
            if length < self.min_chars || length > self.max_chars {
                continue;
            }
            if !seen.insert(candidate) {
                continue;
            }

            items.push(ActionItem {
                text: candidate.to_string(),
                priority: classify_priority(candidate),
                due_date: self.due_date(candidate, today),
                source_message_id: source_message_id.to_string(),
            });
        }

        tracing::debug!(source_message_id, count = items.len(), "action items extracted");
        items
    }

    fn due_date(&self, candidate: &str, today: NaiveDate) -> Option<NaiveDate> {
        self.due_dates
            .first_match(candidate)
            .and_then(|hit| hit.value)
            .and_then(|phrase| resolve_date(&phrase, today))
    }
}

fn compile_text_rules(
    patterns: &[(&'static str, String)],
) -> Result<RuleTable<String>, ExtractError> {
    let entries = patterns
        .iter()
        .map(|(name, pattern)| (*name, pattern.as_str(), group_text as Setter<String>))
        .collect::<Vec<_>>();
    RuleTable::compile(&entries)
}

fn clean_candidate(raw: &str) -> &str {
    raw.trim()
        .trim_matches(|c: char| matches!(c, '"' | '“' | '”'))
        .trim_end_matches(|c: char| matches!(c, ',' | ':' | '-'))
        .trim()
}
