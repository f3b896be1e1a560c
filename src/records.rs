use uuid::Uuid;

use crate::db::models::{NewServiceRecord, ServiceRecord};

/// The service history: the system of record for what was sung when.
///
/// Newly added services go to the front. Lookups by id that miss are no-ops
/// reported through the `bool` return rather than as errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<ServiceRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing snapshot (e.g. loaded from storage or a backup).
    pub fn from_records(records: Vec<ServiceRecord>) -> Self {
        Self { records }
    }

    /// Store a new service under a fresh id and return that id.
    pub fn add(&mut self, record: NewServiceRecord) -> String {
        let id = Uuid::new_v4().to_string();
        log::debug!("Adding service {id} on {}", record.date);
        self.records.insert(0, record.into_record(id.clone()));
        id
    }

    /// Replace the record with this id, keeping its identity and position.
    pub fn update(&mut self, id: &str, record: NewServiceRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(existing) => {
                *existing = record.into_record(id.to_string());
                true
            }
            None => {
                log::debug!("Update ignored: no service with id {id}");
                false
            }
        }
    }

    /// Remove the record with this id. Removing an unknown id does nothing.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        if !removed {
            log::debug!("Remove ignored: no service with id {id}");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn all(&self) -> &[ServiceRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&ServiceRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Resolve a full id or a unique id prefix (as shown in listings).
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&ServiceRecord> {
        if let Some(exact) = self.get(prefix) {
            return Some(exact);
        }
        if prefix.is_empty() {
            return None;
        }
        let mut matches = self.records.iter().filter(|r| r.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<ServiceRecord> {
        self.records
    }

    /// Records most recent first. Services on the same day keep store order.
    pub fn sorted_by_date(&self) -> Vec<&ServiceRecord> {
        let mut sorted: Vec<&ServiceRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    /// Records whose date text, description, or any song contains `query`
    /// (case-insensitive), most recent first. A blank query matches all.
    pub fn search(&self, query: &str) -> Vec<&ServiceRecord> {
        let needle = query.trim().to_lowercase();
        let sorted = self.sorted_by_date();
        if needle.is_empty() {
            return sorted;
        }
        sorted
            .into_iter()
            .filter(|r| {
                r.date.to_string().contains(&needle)
                    || r.description.to_lowercase().contains(&needle)
                    || r.songs.iter().any(|s| s.to_lowercase().contains(&needle))
            })
            .collect()
    }
}
