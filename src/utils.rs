use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Format used for conversation rows, e.g. "Mar 1, 2024 10:00 AM".
pub const LIST_TIME_FORMAT: &str = "%b %-d, %Y %I:%M %p";
/// Format used for chat bubbles, e.g. "Mar 1, 10:00 AM".
pub const BUBBLE_TIME_FORMAT: &str = "%b %-d, %-I:%M %p";

/// Parses backend timestamps. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Formats `raw` in `tz`, or returns it untouched if it doesn't parse.
pub fn format_timestamp(raw: &str, tz: Tz, format: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.with_timezone(&tz).format(format).to_string(),
        None => raw.to_string(),
    }
}

fn char_count_to_byte_pos(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

/// Cuts `text` to at most `max_chars` characters on one line, marking the cut with "...".
pub fn truncate_line(text: &str, max_chars: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let keep = max_chars.saturating_sub(3);
    format!("{}...", &flat[..char_count_to_byte_pos(&flat, keep)])
}

/// Pads or cuts `text` to exactly `width` characters.
pub fn fit(text: &str, width: usize) -> String {
    let line = truncate_line(text, width);
    let pad = width.saturating_sub(line.chars().count());
    format!("{}{}", line, " ".repeat(pad))
}
