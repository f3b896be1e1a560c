use chrono::NaiveDate;

use crate::catalog;
use crate::db::models::NewServiceRecord;
use crate::recency::{self, RecencyCheck};
use crate::stats::StatsMap;

/// A service being assembled before it is saved to the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDraft {
    pub date: NaiveDate,
    pub description: String,
    pub songs: Vec<String>,
}

/// What happened when a song was proposed for the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proposal {
    /// Blank name; nothing added.
    Empty,
    /// Added. `is_new` means the song is not in the catalog yet and the
    /// caller should register it.
    Added { song: String, is_new: bool },
    /// Sung too recently; not added until the operator confirms.
    NeedsConfirmation {
        song: String,
        is_new: bool,
        check: RecencyCheck,
    },
}

impl ServiceDraft {
    pub fn new(date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            date,
            description: description.into(),
            songs: Vec::new(),
        }
    }

    /// Try to add a song, holding it back if it was sung within
    /// `threshold_days` of `today`.
    pub fn propose(
        &mut self,
        name: &str,
        catalog: &[String],
        stats: &StatsMap,
        today: NaiveDate,
        threshold_days: i64,
    ) -> Proposal {
        let song = name.trim();
        if song.is_empty() {
            return Proposal::Empty;
        }
        let is_new = !catalog::contains(catalog, song);

        let check = recency::check(song, stats, today, threshold_days);
        if check.blocked {
            log::debug!("\"{song}\" held for confirmation ({:?} days)", check.days_since);
            return Proposal::NeedsConfirmation {
                song: song.to_string(),
                is_new,
                check,
            };
        }

        self.songs.push(song.to_string());
        Proposal::Added {
            song: song.to_string(),
            is_new,
        }
    }

    /// Add a song unconditionally (the operator overrode a recency warning).
    pub fn confirm(&mut self, song: &str) {
        let song = song.trim();
        if !song.is_empty() {
            self.songs.push(song.to_string());
        }
    }

    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        (index < self.songs.len()).then(|| self.songs.remove(index))
    }

    /// Turn the draft into a record payload. A draft without songs cannot be
    /// saved.
    pub fn finalize(self) -> Option<NewServiceRecord> {
        if self.songs.is_empty() {
            return None;
        }
        Some(NewServiceRecord {
            date: self.date,
            description: self.description,
            songs: self.songs,
        })
    }
}
