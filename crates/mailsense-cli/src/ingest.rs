use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use mailparse::{parse_mail, ParsedMail};
use mailsense_core::{MailAddress, MailMessage};
use std::fs;
use std::path::Path;

/// Reads an RFC 822 file. The file stem stands in for a missing `Message-ID`.
pub fn read_eml(path: &Path, now: DateTime<Utc>) -> Result<MailMessage> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let fallback_id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "message".to_string());
    parse_eml(&raw, &fallback_id, now)
        .with_context(|| format!("failed to parse {}", path.display()))
}

pub fn parse_eml(raw: &[u8], fallback_id: &str, now: DateTime<Utc>) -> Result<MailMessage> {
    let parsed = parse_mail(raw)?;

    let id = header_value(&parsed, "Message-ID")
        .map(|value| trim_angles(&value))
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| fallback_id.to_string());
    let thread_id = header_value(&parsed, "References")
        .or_else(|| header_value(&parsed, "In-Reply-To"))
        .and_then(|value| value.split_whitespace().next().map(trim_angles))
        .unwrap_or_else(|| id.clone());

    let sent_at = header_value(&parsed, "Date")
        .and_then(|date| mailparse::dateparse(&date).ok())
        .and_then(|timestamp| Utc.timestamp_opt(timestamp, 0).single());

    Ok(MailMessage {
        id,
        thread_id,
        from: parse_address_list(header_value(&parsed, "From")),
        to: parse_address_list(header_value(&parsed, "To")),
        cc: parse_address_list(header_value(&parsed, "Cc")),
        subject: header_value(&parsed, "Subject").unwrap_or_default(),
        body_text: extract_text_body(&parsed),
        labels: Vec::new(),
        sent_at,
        received_at: sent_at.unwrap_or(now),
    })
}

fn header_value(mail: &ParsedMail<'_>, key: &str) -> Option<String> {
    mail.get_headers()
        .into_iter()
        .find(|header| header.get_key_ref().eq_ignore_ascii_case(key))
        .map(|header| header.get_value())
}

/// First `text/plain` leaf, depth first.
fn extract_text_body(mail: &ParsedMail<'_>) -> Option<String> {
    if mail.subparts.is_empty() {
        if mail.ctype.mimetype.eq_ignore_ascii_case("text/plain") {
            return mail.get_body().ok();
        }
        return None;
    }

    mail.subparts.iter().find_map(extract_text_body)
}

fn parse_address_list(raw: Option<String>) -> Vec<MailAddress> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.split(',')
        .filter_map(|segment| {
            let value = segment.trim();
            if value.is_empty() {
                return None;
            }

            if let (Some(lt), Some(gt)) = (value.rfind('<'), value.rfind('>')) {
                if lt < gt {
                    let name = value[..lt].trim().trim_matches('"').trim();
                    let address = value[lt + 1..gt].trim();
                    if address.is_empty() {
                        return None;
                    }
                    return Some(MailAddress {
                        name: (!name.is_empty()).then(|| name.to_string()),
                        address: address.to_string(),
                    });
                }
            }

            Some(MailAddress::new(value.trim_matches('"')))
        })
        .collect()
}

fn trim_angles(value: &str) -> String {
    value.trim().trim_start_matches('<').trim_end_matches('>').to_string()
}
