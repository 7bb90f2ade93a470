use crate::CalendarLinkError;
use chrono::Duration;
use mailsense_core::Meeting;
use url::Url;

const CALENDAR_RENDER_URL: &str = "https://calendar.google.com/calendar/render";

/// Builds a prefilled "create event" link for a confirmed meeting.
///
/// Timed meetings use floating local times so the calendar applies the
/// user's own timezone; date-only meetings become all-day events.
pub fn calendar_compose_url(
    meeting: &Meeting,
    default_duration_minutes: u32,
) -> Result<Url, CalendarLinkError> {
    let date = meeting.date.ok_or(CalendarLinkError::MissingDate)?;

    let dates = match meeting.time {
        Some(time) => {
            let starts_at = date.and_time(time);
            let minutes = meeting.duration_minutes.unwrap_or(default_duration_minutes);
            let ends_at = starts_at + Duration::minutes(i64::from(minutes));
            format!(
                "{}/{}",
                starts_at.format("%Y%m%dT%H%M%S"),
                ends_at.format("%Y%m%dT%H%M%S")
            )
        }
        None => {
            let next_day = date.succ_opt().ok_or(CalendarLinkError::MissingDate)?;
            format!("{}/{}", date.format("%Y%m%d"), next_day.format("%Y%m%d"))
        }
    };

    let details = format!("Suggested from message {}", meeting.source_message_id);
    let mut params = vec![
        ("action", "TEMPLATE"),
        ("text", meeting.title.as_str()),
        ("dates", dates.as_str()),
        ("details", details.as_str()),
    ];
    if let Some(location) = meeting.location.as_deref() {
        params.push(("location", location));
    }

    Ok(Url::parse_with_params(CALENDAR_RENDER_URL, &params)?)
}
