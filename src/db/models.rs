use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One completed service: when it happened, which period it was, and the songs
/// in the order they were sung. Dates serialize as fixed-width `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: String,
    pub date: NaiveDate,
    /// Free-text period label ("Morning", "Evening", "Special", ...).
    #[serde(default)]
    pub description: String,
    pub songs: Vec<String>,
}

/// Data for inserting or replacing a service record (no id yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewServiceRecord {
    pub date: NaiveDate,
    pub description: String,
    pub songs: Vec<String>,
}

impl NewServiceRecord {
    pub fn into_record(self, id: String) -> ServiceRecord {
        ServiceRecord {
            id,
            date: self.date,
            description: self.description,
            songs: self.songs,
        }
    }
}

/// Usage statistics for one song, derived from the service history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongStat {
    pub song: String,
    /// Every occurrence counts, including repeats within one service.
    pub count: usize,
    pub last_date: Option<NaiveDate>,
    /// Dates the song was sung, most recent first.
    pub history: Vec<NaiveDate>,
}

/// The full persisted state, and the shape of backup files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppData {
    pub history: Vec<ServiceRecord>,
    #[serde(rename = "customSongs", default)]
    pub custom_songs: Vec<String>,
}

impl AppData {
    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.custom_songs.is_empty()
    }
}
