use chrono::{DateTime, Utc};

use crate::domain::chat::ChatSummary;
use crate::domain::email::{EmailAddress, EmailMessage, Recipient};

pub const NO_SUBJECT: &str = "(no subject)";
pub const UNKNOWN_SENDER: &str = "(unknown sender)";
pub const NO_RECIPIENTS: &str = "(no recipients)";
pub const NO_PREVIEW: &str = "(no preview)";
pub const UNKNOWN_DATE: &str = "(unknown date)";
pub const UNKNOWN_ID: &str = "(unknown id)";
pub const NO_TOPIC: &str = "(no topic)";
pub const UNKNOWN_CHAT_TYPE: &str = "(unknown type)";

pub const PREVIEW_MAX_CHARS: usize = 120;

fn present(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn format_date(d: Option<&DateTime<Utc>>) -> String {
    d.map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// `Name <address>`, or whichever half is present.
fn format_address(a: &EmailAddress) -> Option<String> {
    match (present(a.name.as_deref()), present(a.address.as_deref())) {
        (Some(name), Some(addr)) if name != addr => Some(format!("{name} <{addr}>")),
        (_, Some(addr)) => Some(addr.to_string()),
        (Some(name), None) => Some(name.to_string()),
        (None, None) => None,
    }
}

fn format_recipient(r: &Recipient) -> Option<String> {
    r.email_address.as_ref().and_then(format_address)
}

/// Collapse lines to one and cap the length, marking the cut with `...`.
pub fn normalize_preview(s: &str, max_chars: usize) -> String {
    let joined = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.chars().count() <= max_chars {
        return joined;
    }
    let mut out: String = joined.chars().take(max_chars).collect();
    out.truncate(out.trim_end().len());
    out.push_str("...");
    out
}

pub fn format_email(msg: &EmailMessage) -> String {
    let subject = present(msg.subject.as_deref()).unwrap_or(NO_SUBJECT);
    let from = msg
        .from
        .as_ref()
        .and_then(format_recipient)
        .unwrap_or_else(|| UNKNOWN_SENDER.to_string());

    let to: Vec<String> = msg
        .to_recipients
        .iter()
        .filter_map(format_recipient)
        .collect();
    let to = if to.is_empty() {
        NO_RECIPIENTS.to_string()
    } else {
        to.join(", ")
    };

    let preview = present(msg.body_preview.as_deref())
        .map(|p| normalize_preview(p, PREVIEW_MAX_CHARS))
        .unwrap_or_else(|| NO_PREVIEW.to_string());

    format!(
        "Subject: {subject}\nFrom: {from}\nTo: {to}\nReceived: {}\nPreview: {preview}",
        format_date(msg.received_date_time.as_ref())
    )
}

pub fn format_chat(chat: &ChatSummary) -> String {
    format!(
        "Chat Id: {}\nCreated: {}\nTopic: {}\nType: {}",
        present(chat.id.as_deref()).unwrap_or(UNKNOWN_ID),
        format_date(chat.created_date_time.as_ref()),
        present(chat.topic.as_deref()).unwrap_or(NO_TOPIC),
        present(chat.chat_type.as_deref()).unwrap_or(UNKNOWN_CHAT_TYPE),
    )
}
