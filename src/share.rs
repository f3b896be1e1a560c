use std::fmt::Write;

use chrono::NaiveDate;

use crate::db::models::ServiceRecord;

const SHARE_BASE_URL: &str = "https://wa.me/?text=";

/// Display format for dates in reports: `DD/MM/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Text block describing one service, ready for a messaging app.
pub fn share_message(title: &str, date: NaiveDate, description: &str, songs: &[String]) -> String {
    let mut message = format!("*{title} - {}*\n\n", format_date(date));
    if !description.trim().is_empty() {
        let _ = write!(message, "*Service:* {description}\n\n");
    }
    message.push_str("*Songs:*\n");
    for (i, song) in songs.iter().enumerate() {
        let _ = writeln!(message, "{}. {song}", i + 1);
    }
    message
}

pub fn record_message(title: &str, record: &ServiceRecord) -> String {
    share_message(title, record.date, &record.description, &record.songs)
}

/// Outbound link carrying the percent-encoded message.
pub fn share_link(message: &str) -> String {
    format!("{SHARE_BASE_URL}{}", urlencoding::encode(message))
}
