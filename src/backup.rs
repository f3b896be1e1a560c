use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

use crate::db::models::{AppData, ServiceRecord};

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Backup is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Backup must be a JSON object")]
    NotAnObject,
    #[error("Backup has no \"history\" array")]
    MissingHistory,
    #[error("Backup \"customSongs\" must be an array of strings")]
    InvalidCustomSongs,
    #[error("Backup contains a malformed service record: {0}")]
    InvalidRecord(#[source] serde_json::Error),
    #[error("Failed to serialize backup: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Build the backup document for the current state.
pub fn export(records: &[ServiceRecord], custom_songs: &[String]) -> AppData {
    AppData {
        history: records.to_vec(),
        custom_songs: custom_songs.to_vec(),
    }
}

/// Pretty-printed JSON (two-space indent), as written to backup files.
pub fn to_json(data: &AppData) -> Result<String, BackupError> {
    serde_json::to_string_pretty(data).map_err(BackupError::Serialize)
}

/// Parse and validate a backup document.
///
/// The document must be an object with a `history` array. A missing or null
/// `customSongs` means no custom songs. Any other shape rejects the whole
/// document; nothing is partially imported.
pub fn import(text: &str) -> Result<AppData, BackupError> {
    let value: Value = serde_json::from_str(text).map_err(BackupError::Parse)?;
    let Value::Object(mut doc) = value else {
        return Err(BackupError::NotAnObject);
    };

    let history = match doc.remove("history") {
        Some(history @ Value::Array(_)) => history,
        _ => return Err(BackupError::MissingHistory),
    };
    let history: Vec<ServiceRecord> =
        serde_json::from_value(history).map_err(BackupError::InvalidRecord)?;

    let custom_songs = match doc.remove("customSongs") {
        None | Some(Value::Null) => Vec::new(),
        Some(songs @ Value::Array(_)) => {
            serde_json::from_value(songs).map_err(|_| BackupError::InvalidCustomSongs)?
        }
        Some(_) => return Err(BackupError::InvalidCustomSongs),
    };

    log::info!(
        "Validated backup: {} services, {} custom songs",
        history.len(),
        custom_songs.len()
    );
    Ok(AppData {
        history,
        custom_songs,
    })
}

/// `backup_<context>_<YYYY-MM-DD>.json`
pub fn backup_filename(context: &str, date: NaiveDate) -> String {
    format!("backup_{context}_{}.json", date.format("%Y-%m-%d"))
}
