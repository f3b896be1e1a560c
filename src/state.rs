use std::cell::OnceCell;

use crate::catalog;
use crate::db::models::{AppData, NewServiceRecord, ServiceRecord};
use crate::records::RecordStore;
use crate::stats::{self, StatsMap};

/// Explicit owner of the application state: base catalog, custom songs,
/// and service history. The merged catalog is rebuilt whenever a song is
/// registered; song statistics are computed on demand and dropped on every
/// history change.
#[derive(Debug)]
pub struct AppState {
    marker: String,
    base_catalog: Vec<String>,
    custom_songs: Vec<String>,
    catalog: Vec<String>,
    records: RecordStore,
    stats: OnceCell<StatsMap>,
}

impl AppState {
    pub fn new(base_catalog: Vec<String>, data: AppData, marker: impl Into<String>) -> Self {
        let marker = marker.into();
        let catalog = catalog::build(&base_catalog, &data.custom_songs, &marker);
        Self {
            marker,
            base_catalog,
            custom_songs: data.custom_songs,
            catalog,
            records: RecordStore::from_records(data.history),
            stats: OnceCell::new(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Merged, ordered catalog.
    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    pub fn custom_songs(&self) -> &[String] {
        &self.custom_songs
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn stats(&self) -> &StatsMap {
        self.stats.get_or_init(|| stats::compute(self.records.all()))
    }

    /// Add a song to the custom catalog unless it is already known.
    pub fn register_song(&mut self, song: &str) -> bool {
        let song = song.trim();
        if song.is_empty() || catalog::contains(&self.catalog, song) {
            return false;
        }
        log::info!("Registering new song \"{song}\"");
        self.custom_songs.push(song.to_string());
        self.rebuild_catalog();
        true
    }

    pub fn add_record(&mut self, record: NewServiceRecord) -> String {
        self.invalidate();
        self.records.add(record)
    }

    pub fn update_record(&mut self, id: &str, record: NewServiceRecord) -> bool {
        self.invalidate();
        self.records.update(id, record)
    }

    pub fn remove_record(&mut self, id: &str) -> bool {
        self.invalidate();
        self.records.remove(id)
    }

    pub fn clear_records(&mut self) {
        self.invalidate();
        self.records.clear();
    }

    /// Replace history and custom songs wholesale (backup restore).
    pub fn restore(&mut self, data: AppData) {
        self.invalidate();
        self.records = RecordStore::from_records(data.history);
        self.custom_songs = data.custom_songs;
        self.rebuild_catalog();
    }

    /// Snapshot for persistence or export.
    pub fn to_data(&self) -> AppData {
        AppData {
            history: self.records.all().to_vec(),
            custom_songs: self.custom_songs.clone(),
        }
    }

    pub fn history(&self) -> &[ServiceRecord] {
        self.records.all()
    }

    fn rebuild_catalog(&mut self) {
        self.catalog = catalog::build(&self.base_catalog, &self.custom_songs, &self.marker);
    }

    fn invalidate(&mut self) {
        self.stats.take();
    }
}
