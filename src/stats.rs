use std::collections::HashMap;

use crate::db::models::{ServiceRecord, SongStat};

/// Per-song statistics keyed by the exact song string.
pub type StatsMap = HashMap<String, SongStat>;

/// Default size of the most-sung ranking.
pub const RANKING_LIMIT: usize = 10;

/// Aggregate usage statistics over the whole history.
///
/// Every occurrence counts, so a song sung twice in one service adds two
/// entries. Songs that never appear are not materialized.
pub fn compute(records: &[ServiceRecord]) -> StatsMap {
    let mut stats: StatsMap = HashMap::new();

    for record in records {
        for song in &record.songs {
            let stat = stats.entry(song.clone()).or_insert_with(|| SongStat {
                song: song.clone(),
                count: 0,
                last_date: None,
                history: Vec::new(),
            });
            stat.count += 1;
            stat.history.push(record.date);
        }
    }

    for stat in stats.values_mut() {
        stat.history.sort_by(|a, b| b.cmp(a));
        stat.last_date = stat.history.first().copied();
    }

    log::debug!("Computed stats for {} songs over {} services", stats.len(), records.len());
    stats
}

/// Songs sung more than once, most frequent first. Ties go to the most
/// recently sung, then to the song name.
pub fn ranking(stats: &StatsMap, limit: usize) -> Vec<&SongStat> {
    let mut repeated: Vec<&SongStat> = stats.values().filter(|s| s.count > 1).collect();
    repeated.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| b.last_date.cmp(&a.last_date))
            .then_with(|| a.song.cmp(&b.song))
    });
    repeated.truncate(limit);
    repeated
}
