use crate::classify::confidence_for;
use crate::resolve::{resolve_date, resolve_time};
use crate::rules::{group_text, RuleTable};
use crate::ExtractError;
use chrono::{NaiveDate, NaiveTime};
use mailsense_core::Meeting;
use regex::{Captures, Regex, RegexBuilder};

/// At least one of these must appear before any field is extracted.
pub const MEETING_KEYWORDS: [&str; 17] = [
    "meeting",
    "meet",
    "call",
    "sync",
    "zoom",
    "teams",
    "conference",
    "appointment",
    "catch up",
    "catch-up",
    "standup",
    "stand-up",
    "1:1",
    "one-on-one",
    "interview",
    "webinar",
    "demo",
];

/// Keywords that only count as the exact word; the rest also match a plural `s`.
const VERB_KEYWORDS: [&str; 1] = ["meet"];

const MONTH_NAME: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

const REPLY_PREFIXES: [&str; 3] = ["re:", "fwd:", "fw:"];

const URL_TRAILING: &[char] = &['.', ',', ';', ':', ')', '!', '?', '\'', '"', '>'];

/// Finds at most one meeting per message; each field comes from the first
/// rule of its table that matches.
pub struct MeetingExtractor {
    gate: Regex,
    dates: RuleTable<String>,
    times: RuleTable<NaiveTime>,
    durations: RuleTable<u32>,
    locations: RuleTable<String>,
}

impl MeetingExtractor {
    pub fn new() -> Result<Self, ExtractError> {
        let month_day = format!(
            r"\b({MONTH_NAME}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+\d{{4}})?)\b"
        );

        let gate = RegexBuilder::new(&keyword_gate_pattern())
            .case_insensitive(true)
            .build()
            .map_err(|source| ExtractError::Pattern {
                name: "meeting_keyword",
                source,
            })?;

        Ok(Self {
            gate,
            dates: RuleTable::compile(&[
                ("relative_day", r"\b(today|tomorrow)\b", group_text),
                (
                    "weekday",
                    r"\b((?:next\s+)?(?:mon|tues|wednes|thurs|fri|satur|sun)day)\b",
                    group_text,
                ),
                ("iso_date", r"\b(\d{4}-\d{2}-\d{2})\b", group_text),
                ("numeric_date", r"\b(\d{1,2}/\d{1,2}(?:/\d{2,4})?)\b", group_text),
                ("month_day", month_day.as_str(), group_text),
            ])?,
            times: RuleTable::compile(&[
                ("clock_meridiem", r"\b(\d{1,2}:\d{2}\s*(?:am|pm))\b", time_value),
                ("hour_meridiem", r"\b(\d{1,2}\s*(?:am|pm))\b", time_value),
                ("clock_24h", r"\b((?:[01]?\d|2[0-3]):[0-5]\d)\b", time_value),
                ("named_time", r"\b(noon|midnight)\b", time_value),
            ])?,
            durations: RuleTable::compile(&[
                ("hours", r"\b(\d+(?:\.\d+)?)\s*(?:hours?|hrs?)\b", hours_value),
                ("minutes", r"\b(\d+)\s*(?:minutes?|mins?)\b", minutes_value),
                ("half_hour", r"\b(half\s+an\s+hour)\b", |_| Some(30)),
                ("an_hour", r"\b(an\s+hour)\b", |_| Some(60)),
            ])?,
            locations: RuleTable::compile(&[
                ("zoom_url", r"(https?://[\w.-]*zoom\.us/[^\s<>]+)", url_value),
                ("meet_url", r"(https?://meet\.google\.com/[^\s<>]+)", url_value),
                ("teams_url", r"(https?://teams\.microsoft\.com/[^\s<>]+)", url_value),
                (
                    "conference_app",
                    r"\b(?:via|on|over|using)\s+(zoom|microsoft\s+teams|teams|google\s+meet|skype|webex|phone)\b",
                    app_value,
                ),
                ("labelled", r"\blocation:\s*([^\n]+)", group_text),
                (
                    "named_place",
                    r"\b(?:in|at)\s+(?:the\s+)?([a-z0-9][\w' -]{0,40}?\s(?:room|office|building|cafe|hall|lobby))\b",
                    group_text,
                ),
            ])?,
        })
    }

    /// Returns `None` when no meeting keyword appears in subject or body.
    pub fn extract(
        &self,
        subject: &str,
        body: &str,
        source_message_id: &str,
        today: NaiveDate,
    ) -> Option<Meeting> {
        let text = format!("{subject}\n{body}");
        if text.trim().is_empty() {
            tracing::debug!(source_message_id, "no text to scan for meetings");
            return None;
        }

        if !self.gate.is_match(&text) {
            return None;
        }

        let date = self
            .dates
            .first_match(&text)
            .and_then(|hit| hit.value)
            .and_then(|phrase| resolve_date(&phrase, today));
        let time = self.times.first_match(&text).and_then(|hit| hit.value);
        let duration_minutes = self.durations.first_match(&text).and_then(|hit| hit.value);
        let location = self.locations.first_match(&text).and_then(|hit| hit.value);

        Some(Meeting {
            title: meeting_title(subject),
            date,
            time,
            duration_minutes,
            location,
            confidence: confidence_for(date.is_some(), time.is_some()),
            source_message_id: source_message_id.to_string(),
        })
    }
}

/// Whole-word match on any meeting keyword, so "locally" is not a call.
fn keyword_gate_pattern() -> String {
    let alternatives = MEETING_KEYWORDS
        .iter()
        .map(|keyword| {
            let escaped = regex::escape(keyword);
            if VERB_KEYWORDS.contains(keyword) {
                escaped
            } else {
                format!("{escaped}s?")
            }
        })
        .collect::<Vec<_>>()
        .join("|");
    format!(r"\b(?:{alternatives})\b")
}

fn meeting_title(subject: &str) -> String {
    let mut title = subject.trim();
    loop {
        let lowercase = title.to_ascii_lowercase();
        let Some(prefix_len) = REPLY_PREFIXES
            .iter()
            .find(|prefix| lowercase.starts_with(**prefix))
            .map(|prefix| prefix.len())
        else {
            break;
        };
        title = title[prefix_len..].trim_start();
    }

    if title.is_empty() {
        "Meeting".to_string()
    } else {
        title.to_string()
    }
}

fn time_value(caps: &Captures<'_>) -> Option<NaiveTime> {
    caps.get(1).and_then(|m| resolve_time(m.as_str()))
}

fn hours_value(caps: &Captures<'_>) -> Option<u32> {
    let hours = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let minutes = (hours * 60.0).round();
    (minutes >= 1.0 && minutes <= f64::from(u32::MAX)).then_some(minutes as u32)
}

fn minutes_value(caps: &Captures<'_>) -> Option<u32> {
    caps.get(1)?.as_str().parse::<u32>().ok().filter(|minutes| *minutes > 0)
}

fn url_value(caps: &Captures<'_>) -> Option<String> {
    caps.get(1)
        .map(|m| m.as_str().trim_end_matches(URL_TRAILING).to_string())
}

fn app_value(caps: &Captures<'_>) -> Option<String> {
    let app = caps.get(1)?.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
    let name = match app.to_lowercase().as_str() {
        "zoom" => "Zoom",
        "teams" | "microsoft teams" => "Microsoft Teams",
        "google meet" => "Google Meet",
        "skype" => "Skype",
        "webex" => "Webex",
        "phone" => "Phone",
        _ => return Some(app),
    };
    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::MeetingExtractor;
    use chrono::{NaiveDate, NaiveTime};
    use mailsense_core::Confidence;

    fn extractor() -> MeetingExtractor {
        MeetingExtractor::new().expect("patterns compile")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).expect("valid date")
    }

    #[test]
    fn quick_sync_example() {
        let meeting = extractor()
            .extract(
                "",
                "Let's have a quick sync tomorrow at 2:30pm via zoom: https://zoom.us/j/123",
                "m1",
                today(),
            )
            .expect("meeting detected");

        assert_eq!(meeting.confidence, Confidence::High);
        assert_eq!(meeting.date, today().succ_opt());
        assert_eq!(meeting.time, NaiveTime::from_hms_opt(14, 30, 0));
        assert!(meeting
            .location
            .as_deref()
            .is_some_and(|location| location.contains("https://zoom.us/j/123")));
        assert_eq!(meeting.title, "Meeting");
        assert_eq!(meeting.source_message_id, "m1");
    }

    #[test]
    fn no_keyword_means_no_meeting() {
        assert!(extractor()
            .extract("Invoice", "Attached is the invoice for October 20.", "m1", today())
            .is_none());
        assert!(extractor().extract("", "", "m1", today()).is_none());
    }

    #[test]
    fn keywords_inside_other_words_do_not_count() {
        let extractor = extractor();
        for body in [
            "Please store the backups locally.",
            "This is basically done.",
            "The async job failed.",
            "Our democratic process works.",
            "This meets expectations.",
        ] {
            assert!(
                extractor.extract("Status", body, "m1", today()).is_none(),
                "unexpected meeting in {body:?}"
            );
        }
    }

    #[test]
    fn plural_keywords_still_count() {
        let extractor = extractor();
        assert!(extractor
            .extract("Status", "Two more meetings on Friday.", "m1", today())
            .is_some());
        assert!(extractor
            .extract("Status", "Lots of CALLS lately.", "m1", today())
            .is_some());
        assert!(extractor
            .extract("", "Let's do a 1:1 tomorrow.", "m1", today())
            .is_some());
    }

    #[test]
    fn confidence_reflects_resolved_fields() {
        let extractor = extractor();
        let date_only = extractor
            .extract("Re: Planning call", "Are you free Thursday?", "m1", today())
            .expect("meeting");
        assert_eq!(date_only.confidence, Confidence::Medium);
        assert_eq!(date_only.date, NaiveDate::from_ymd_opt(2026, 10, 15));
        assert_eq!(date_only.title, "Planning call");

        let neither = extractor
            .extract("Fwd: RE: Interview", "Looking forward to it.", "m1", today())
            .expect("meeting");
        assert_eq!(neither.confidence, Confidence::Low);
        assert_eq!(neither.title, "Interview");
    }

    #[test]
    fn durations_and_named_locations() {
        let meeting = extractor()
            .extract(
                "Design review meeting",
                "Nov 3rd at 10am for 45 minutes in the Aurora conference room.",
                "m1",
                today(),
            )
            .expect("meeting");
        assert_eq!(meeting.date, NaiveDate::from_ymd_opt(2026, 11, 3));
        assert_eq!(meeting.time, NaiveTime::from_hms_opt(10, 0, 0));
        assert_eq!(meeting.duration_minutes, Some(45));
        assert_eq!(meeting.location.as_deref(), Some("Aurora conference room"));
    }

    #[test]
    fn conference_app_names_are_canonical() {
        let meeting = extractor()
            .extract(
                "Catch up",
                "Can we do half an hour over google meet at 16:00 next Monday?",
                "m1",
                today(),
            )
            .expect("meeting");
        assert_eq!(meeting.location.as_deref(), Some("Google Meet"));
        assert_eq!(meeting.duration_minutes, Some(30));
        assert_eq!(meeting.time, NaiveTime::from_hms_opt(16, 0, 0));
        assert_eq!(meeting.date, NaiveDate::from_ymd_opt(2026, 10, 19));
    }

    #[test]
    fn first_date_rule_wins_over_later_rules() {
        // "tomorrow" (first rule) beats the ISO date that appears earlier in the text.
        let meeting = extractor()
            .extract("Meeting", "Moved from 2026-10-20 to tomorrow.", "m1", today())
            .expect("meeting");
        assert_eq!(meeting.date, today().succ_opt());
    }
}
