//! Natural-language date and clock-time phrases.
//!
//! All functions take the reference date explicitly and return `None` for
//! anything they cannot resolve; none of them panic on user text.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};

const CONNECTORS: [&str; 5] = ["by", "before", "until", "due", "on"];
const FRIDAY: i64 = 5;

/// Resolves a relative or absolute date phrase against `today`.
///
/// Relative weekdays never resolve to `today` or a past date: a bare weekday
/// equal to or before today's rolls forward a week, and `next <weekday>` adds
/// a week to the raw difference. `this week` always means an upcoming Friday.
pub fn resolve_date(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    let normalized = normalize_date_phrase(phrase);
    match normalized.as_str() {
        "" => None,
        "today" | "tonight" | "eod" | "end of day" | "end of the day" => Some(today),
        "tomorrow" => today.succ_opt(),
        "this week" | "end of week" | "end of the week" | "eow" => Some(next_friday(today)),
        "next week" => Some(today + Duration::days(7)),
        other => match parse_weekday_phrase(other) {
            Some((weekday, next)) => Some(weekday_after(today, weekday, next)),
            None => parse_absolute(other, today),
        },
    }
}

/// The Friday after `today`; a Friday maps to the following week's.
pub fn next_friday(today: NaiveDate) -> NaiveDate {
    let current = i64::from(today.weekday().num_days_from_sunday());
    let offset = match (FRIDAY - current + 7) % 7 {
        0 => 7,
        days => days,
    };
    today + Duration::days(offset)
}

/// Parses `h[:mm] am|pm`, 24-hour `hh:mm`, `noon` and `midnight`.
pub fn resolve_time(phrase: &str) -> Option<NaiveTime> {
    let lowercase = phrase.trim().to_lowercase();
    match lowercase.as_str() {
        "noon" => return NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" => return NaiveTime::from_hms_opt(0, 0, 0),
        _ => {}
    }

    let (clock, pm) = if let Some(rest) = lowercase.strip_suffix("pm") {
        (rest.trim(), Some(true))
    } else if let Some(rest) = lowercase.strip_suffix("am") {
        (rest.trim(), Some(false))
    } else {
        (lowercase.as_str(), None)
    };

    let (hour, minute) = match clock.split_once(':') {
        Some((hour, minute)) => (hour.parse::<u32>().ok()?, minute.parse::<u32>().ok()?),
        None => (clock.parse::<u32>().ok()?, 0),
    };

    let hour = match pm {
        Some(_) if hour == 0 || hour > 12 => return None,
        Some(true) if hour == 12 => 12,
        Some(true) => hour + 12,
        Some(false) if hour == 12 => 0,
        Some(false) | None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn normalize_date_phrase(phrase: &str) -> String {
    let lowercase = phrase.to_lowercase();
    let trimmed = lowercase
        .trim()
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | ';' | ':'));

    let words = trimmed.split_whitespace().collect::<Vec<_>>();
    let leading = words
        .iter()
        .take_while(|word| CONNECTORS.contains(word))
        .count();
    words[leading..].join(" ")
}

fn parse_weekday_phrase(phrase: &str) -> Option<(Weekday, bool)> {
    let (next, name) = match phrase.strip_prefix("next ") {
        Some(rest) => (true, rest),
        None => (false, phrase.strip_prefix("this ").unwrap_or(phrase)),
    };
    let name = match name.trim() {
        "tues" => "tue",
        "thur" | "thurs" => "thu",
        other => other,
    };
    name.parse::<Weekday>().ok().map(|weekday| (weekday, next))
}

fn weekday_after(today: NaiveDate, target: Weekday, next: bool) -> NaiveDate {
    let mut offset = i64::from(target.num_days_from_sunday())
        - i64::from(today.weekday().num_days_from_sunday());
    if next || offset <= 0 {
        offset += 7;
    }
    today + Duration::days(offset)
}

fn parse_absolute(phrase: &str, today: NaiveDate) -> Option<NaiveDate> {
    let cleaned = phrase
        .replace([',', '.'], " ")
        .split_whitespace()
        .map(strip_ordinal)
        .collect::<Vec<_>>()
        .join(" ");

    if let Ok(date) = NaiveDate::parse_from_str(&cleaned, "%Y-%m-%d") {
        return Some(date);
    }
    if cleaned.contains('/') {
        return parse_numeric(&cleaned, today.year());
    }

    let with_year = format!("{cleaned} {}", today.year());
    for candidate in [cleaned.as_str(), with_year.as_str()] {
        for format in ["%B %d %Y", "%d %B %Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(candidate, format) {
                return Some(date);
            }
        }
    }
    None
}

/// US-style `m/d`, `m/d/yy` or `m/d/yyyy`.
fn parse_numeric(phrase: &str, reference_year: i32) -> Option<NaiveDate> {
    let parts = phrase.split('/').map(str::trim).collect::<Vec<_>>();
    let (month, day, year): (u32, u32, i32) = match parts.as_slice() {
        [month, day] => (month.parse().ok()?, day.parse().ok()?, reference_year),
        [month, day, year] => {
            let year = match year.len() {
                2 => 2000 + year.parse::<i32>().ok()?,
                4 => year.parse().ok()?,
                _ => return None,
            };
            (month.parse().ok()?, day.parse().ok()?, year)
        }
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn strip_ordinal(word: &str) -> &str {
    ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| {
            word.strip_suffix(suffix)
                .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        })
        .unwrap_or(word)
}
