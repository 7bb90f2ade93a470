use mailsense_core::{Confidence, Priority};

pub const HIGH_PRIORITY_KEYWORDS: [&str; 10] = [
    "urgent",
    "asap",
    "immediately",
    "critical",
    "important",
    "high priority",
    "right away",
    "eod",
    "end of day",
    "today",
];

pub const LOW_PRIORITY_KEYWORDS: [&str; 8] = [
    "when possible",
    "when you can",
    "whenever",
    "no rush",
    "low priority",
    "if possible",
    "at your convenience",
    "eventually",
];

/// High keywords are checked before low ones; no keyword means medium.
pub fn classify_priority(text: &str) -> Priority {
    let lowercase = text.to_lowercase();
    if HIGH_PRIORITY_KEYWORDS
        .iter()
        .any(|keyword| lowercase.contains(keyword))
    {
        Priority::High
    } else if LOW_PRIORITY_KEYWORDS
        .iter()
        .any(|keyword| lowercase.contains(keyword))
    {
        Priority::Low
    } else {
        Priority::Medium
    }
}

pub fn confidence_for(has_date: bool, has_time: bool) -> Confidence {
    match (has_date, has_time) {
        (true, true) => Confidence::High,
        (true, false) | (false, true) => Confidence::Medium,
        (false, false) => Confidence::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_keywords_win_over_low() {
        assert_eq!(
            classify_priority("Urgent: sign this when possible"),
            Priority::High
        );
        assert_eq!(classify_priority("send feedback ASAP"), Priority::High);
    }

    #[test]
    fn low_and_default_levels() {
        assert_eq!(
            classify_priority("update the wiki when you can"),
            Priority::Low
        );
        assert_eq!(
            classify_priority("review the attached report"),
            Priority::Medium
        );
    }

    #[test]
    fn confidence_counts_resolved_fields() {
        assert_eq!(confidence_for(true, true), Confidence::High);
        assert_eq!(confidence_for(true, false), Confidence::Medium);
        assert_eq!(confidence_for(false, true), Confidence::Medium);
        assert_eq!(confidence_for(false, false), Confidence::Low);
    }
}
