use std::collections::HashSet;

use crate::catalog::is_marked;
use crate::catalog::sections::{CatalogSection, SectionConfig, leading_number, section_index};
use crate::db::models::ServiceRecord;

/// Never-sung songs of one section, plus that section's own completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGroup {
    pub section: CatalogSection,
    /// Unplayed songs matching the filter, in catalog order.
    pub songs: Vec<String>,
    /// Unfiltered counts over every catalog song in this section.
    pub total: usize,
    pub unplayed: usize,
    pub percent_complete: u32,
}

/// Never-sung songs of one sub-collection (primary or marked).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionReport {
    /// Sub-collection size, independent of the text filter.
    pub total_all: usize,
    /// Never-sung songs in the sub-collection, independent of the text filter.
    pub total_unplayed: usize,
    pub percent_complete: u32,
    /// One group per configured section, in configured order.
    pub groups: Vec<SectionGroup>,
    /// Filtered unplayed songs with no leading number or outside every section.
    pub unsectioned: Vec<String>,
}

impl CollectionReport {
    /// Number of unplayed songs shown after filtering.
    pub fn shown(&self) -> usize {
        self.groups.iter().map(|g| g.songs.len()).sum::<usize>() + self.unsectioned.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategorizedResult {
    pub primary: CollectionReport,
    pub marked: CollectionReport,
}

/// `round(played / total * 100)`, zero for an empty collection.
pub fn percent_complete(total: usize, unplayed: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let played = total.saturating_sub(unplayed);
    // Half rounds up, in integers.
    ((played * 200 + total) / (2 * total)) as u32
}

/// Every song that appears in any record, trimmed.
fn played_songs(records: &[ServiceRecord]) -> HashSet<&str> {
    records
        .iter()
        .flat_map(|r| r.songs.iter())
        .map(|s| s.trim())
        .collect()
}

/// Group the never-sung catalog songs by section.
///
/// Completion figures always cover the whole sub-collection; `query` only
/// narrows which unplayed songs are listed.
pub fn categorize(
    catalog: &[String],
    records: &[ServiceRecord],
    sections: &SectionConfig,
    marker: &str,
    query: Option<&str>,
) -> CategorizedResult {
    let played = played_songs(records);
    let (marked, primary): (Vec<&String>, Vec<&String>) =
        catalog.iter().partition(|s| is_marked(s, marker));

    let needle = query.map(|q| q.trim().to_lowercase()).unwrap_or_default();

    CategorizedResult {
        primary: report(&primary, &played, &sections.primary, marker, &needle),
        marked: report(&marked, &played, &sections.marked, marker, &needle),
    }
}

fn report(
    songs: &[&String],
    played: &HashSet<&str>,
    sections: &[CatalogSection],
    marker: &str,
    needle: &str,
) -> CollectionReport {
    let mut groups: Vec<SectionGroup> = sections
        .iter()
        .map(|section| SectionGroup {
            section: section.clone(),
            songs: Vec::new(),
            total: 0,
            unplayed: 0,
            percent_complete: 0,
        })
        .collect();
    let mut unsectioned = Vec::new();
    let mut total_unplayed = 0;

    for song in songs {
        let is_unplayed = !played.contains(song.trim());
        let slot = leading_number(song, marker).and_then(|n| section_index(sections, n));

        if let Some(i) = slot {
            groups[i].total += 1;
            if is_unplayed {
                groups[i].unplayed += 1;
            }
        }
        if !is_unplayed {
            continue;
        }
        total_unplayed += 1;

        if !needle.is_empty() && !song.to_lowercase().contains(needle) {
            continue;
        }
        match slot {
            Some(i) => groups[i].songs.push(song.to_string()),
            None => unsectioned.push(song.to_string()),
        }
    }

    for group in &mut groups {
        group.percent_complete = percent_complete(group.total, group.unplayed);
    }

    CollectionReport {
        total_all: songs.len(),
        total_unplayed,
        percent_complete: percent_complete(songs.len(), total_unplayed),
        groups,
        unsectioned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DEFAULT_MARKER;
    use chrono::NaiveDate;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn record(songs: &[&str]) -> ServiceRecord {
        ServiceRecord {
            id: "r".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            description: String::new(),
            songs: strings(songs),
        }
    }

    fn one_section() -> SectionConfig {
        SectionConfig {
            primary: vec![CatalogSection::new("A", 1, 10)],
            marked: Vec::new(),
        }
    }

    #[test]
    fn test_sections_and_unsectioned() {
        let catalog = strings(&["3 Song X", "15 Song Y"]);
        let result = categorize(&catalog, &[], &one_section(), DEFAULT_MARKER, None);

        let primary = &result.primary;
        assert_eq!(primary.total_all, 2);
        assert_eq!(primary.total_unplayed, 2);
        assert_eq!(primary.percent_complete, 0);
        assert_eq!(primary.groups[0].section.name, "A");
        assert_eq!(primary.groups[0].songs, strings(&["3 Song X"]));
        assert_eq!(primary.unsectioned, strings(&["15 Song Y"]));
        assert_eq!(primary.shown(), 2);
    }

    #[test]
    fn test_played_songs_excluded_and_trimmed() {
        let catalog = strings(&["1 Alpha", "2 Beta", "3 Gamma", "4 Delta"]);
        let records = vec![record(&[" 1 Alpha ", "2 Beta", "2 Beta"])];
        let result = categorize(&catalog, &records, &one_section(), DEFAULT_MARKER, None);

        let primary = &result.primary;
        assert_eq!(primary.total_unplayed, 2);
        assert_eq!(primary.percent_complete, 50);
        assert_eq!(primary.groups[0].songs, strings(&["3 Gamma", "4 Delta"]));
        assert_eq!(primary.groups[0].total, 4);
        assert_eq!(primary.groups[0].unplayed, 2);
        assert_eq!(primary.groups[0].percent_complete, 50);
    }

    #[test]
    fn test_filter_does_not_change_totals() {
        let catalog = strings(&["1 Alpha", "2 Beta", "3 Gamma"]);
        let records = vec![record(&["1 Alpha"])];
        let result = categorize(&catalog, &records, &one_section(), DEFAULT_MARKER, Some("GAM"));

        let primary = &result.primary;
        assert_eq!(primary.groups[0].songs, strings(&["3 Gamma"]));
        assert_eq!(primary.total_all, 3);
        assert_eq!(primary.total_unplayed, 2);
        assert_eq!(primary.percent_complete, 33);
    }

    #[test]
    fn test_marked_partition_uses_own_sections() {
        let catalog = strings(&["5 Main", "(CIAS) 5 Kids", "(CIAS) 40 Teens", "(CIAS) Untitled"]);
        let sections = SectionConfig {
            primary: vec![CatalogSection::new("Main", 1, 100)],
            marked: vec![
                CatalogSection::new("Kids", 1, 20),
                CatalogSection::new("Teens", 21, 50),
            ],
        };
        let result = categorize(&catalog, &[], &sections, DEFAULT_MARKER, None);

        assert_eq!(result.primary.total_all, 1);
        assert_eq!(result.marked.total_all, 3);
        assert_eq!(result.marked.groups[0].songs, strings(&["(CIAS) 5 Kids"]));
        assert_eq!(result.marked.groups[1].songs, strings(&["(CIAS) 40 Teens"]));
        assert_eq!(result.marked.unsectioned, strings(&["(CIAS) Untitled"]));
    }

    #[test]
    fn test_empty_catalog_is_zero() {
        let result = categorize(&[], &[record(&["x"])], &one_section(), DEFAULT_MARKER, None);
        assert_eq!(result.primary.total_all, 0);
        assert_eq!(result.primary.percent_complete, 0);
        assert_eq!(result.primary.groups.len(), 1);
        assert_eq!(result.primary.groups[0].percent_complete, 0);
        assert_eq!(result.marked, CollectionReport::default());
    }

    #[test]
    fn test_everything_played_is_complete() {
        let catalog = strings(&["1 A", "2 B"]);
        let result = categorize(&catalog, &[record(&["1 A", "2 B"])], &one_section(), DEFAULT_MARKER, None);
        assert_eq!(result.primary.percent_complete, 100);
        assert_eq!(result.primary.shown(), 0);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent_complete(0, 0), 0);
        assert_eq!(percent_complete(3, 2), 33);
        assert_eq!(percent_complete(3, 1), 67);
        assert_eq!(percent_complete(8, 7), 13); // 12.5 rounds up
        assert_eq!(percent_complete(200, 199), 1); // 0.5 rounds up
    }
}
