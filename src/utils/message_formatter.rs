use chrono::{DateTime, Utc};

pub struct MessageFormatter;

impl MessageFormatter {
    pub fn escape_html(text: &str) -> String {
        html_escape::encode_text(text).to_string()
    }

    /// compact timestamp for list rows, e.g. "07 Mar 14:05"
    pub fn short_date(date: &DateTime<Utc>) -> String {
        date.format("%d %b %H:%M").to_string()
    }

    /// timestamp for notifications and detail screens, e.g. "07 Mar 2025, 14:05 UTC"
    pub fn full_date(date: &DateTime<Utc>) -> String {
        date.format("%d %b %Y, %H:%M UTC").to_string()
    }

    /// "First Last" with empty parts dropped, escaped for HTML
    pub fn full_name(first_name: &str, last_name: &str) -> String {
        let name = [first_name, last_name]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        Self::escape_html(&name)
    }

    /// truncates to `max_chars` characters, appending an ellipsis when cut
    pub fn truncate(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
