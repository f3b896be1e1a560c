use super::models::AppData;
use super::{Database, Result, STATE_KEY};
use rusqlite::params;

impl Database {
    /// Store a document under `key`, replacing any previous value.
    pub fn put(&self, key: &str, document: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO documents (key, value, updated_at)
             VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')",
            params![key, document],
        )?;
        Ok(())
    }

    /// Fetch the document stored under `key`, if any.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM documents WHERE key = ?1",
            params![key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Load the application state. `None` on first run.
    pub fn load_state(&self) -> Result<Option<AppData>> {
        match self.get(STATE_KEY)? {
            Some(json) => {
                let data: AppData = serde_json::from_str(&json)?;
                log::debug!(
                    "Loaded {} services and {} custom songs",
                    data.history.len(),
                    data.custom_songs.len()
                );
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Persist the full application state.
    pub fn save_state(&self, data: &AppData) -> Result<()> {
        let json = serde_json::to_string(data)?;
        self.put(STATE_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ServiceRecord;
    use chrono::NaiveDate;

    fn sample_state() -> AppData {
        AppData {
            history: vec![ServiceRecord {
                id: "a1".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
                description: "Evening".to_string(),
                songs: vec!["12 Amazing Grace".to_string(), "(CIAS) 3 Jesus Loves Me".to_string()],
            }],
            custom_songs: vec!["New Song".to_string()],
        }
    }

    #[test]
    fn test_get_missing_key() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get("nope").unwrap(), None);
        assert!(db.load_state().unwrap().is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let db = Database::open_in_memory().unwrap();
        db.put("k", "first").unwrap();
        db.put("k", "second").unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("second"));

        let rows: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_state_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let state = sample_state();
        db.save_state(&state).unwrap();
        assert_eq!(db.load_state().unwrap(), Some(state));
    }

    #[test]
    fn test_state_stored_with_wire_field_names() {
        let db = Database::open_in_memory().unwrap();
        db.save_state(&sample_state()).unwrap();
        let raw = db.get(STATE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"history\""));
        assert!(raw.contains("\"customSongs\""));
        assert!(raw.contains("\"2024-02-05\""));
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        db.put(STATE_KEY, "{not json").unwrap();
        assert!(db.load_state().is_err());
    }
}
