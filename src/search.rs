use crate::catalog::is_marked;

/// Default number of suggestions returned for a non-empty query.
pub const DEFAULT_LIMIT: usize = 15;
/// Number of catalog entries shown when the query is blank.
pub const BROWSE_LIMIT: usize = 10;
/// Scanning stops after this many raw matches. On very large catalogs the
/// result is therefore drawn from the first matches in catalog order only.
pub const SCAN_CAP: usize = 40;

/// Rank catalog entries against a search query.
///
/// A blank query returns the first [`BROWSE_LIMIT`] entries unranked.
/// Otherwise matches fall into four tiers, each kept in catalog order:
/// unmarked prefix matches, unmarked substring matches, marked prefix
/// matches, marked substring matches.
pub fn suggest(catalog: &[String], query: &str, marker: &str, limit: usize) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return catalog.iter().take(BROWSE_LIMIT).cloned().collect();
    }

    // Tier order: [unmarked prefix, unmarked contains, marked prefix, marked contains]
    let mut tiers: [Vec<&String>; 4] = Default::default();
    let mut matched = 0;

    for song in catalog {
        let lower = song.to_lowercase();
        let offset = if is_marked(song, marker) { 2 } else { 0 };

        if lower.starts_with(&needle) {
            tiers[offset].push(song);
        } else if lower.contains(&needle) {
            tiers[offset + 1].push(song);
        } else {
            continue;
        }

        matched += 1;
        if matched >= SCAN_CAP {
            log::trace!("Suggestion scan capped at {SCAN_CAP} matches");
            break;
        }
    }

    tiers
        .into_iter()
        .flatten()
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, DEFAULT_MARKER};

    fn sample_catalog() -> Vec<String> {
        let base: Vec<String> = [
            "Amazing Grace",
            "Great Is Thy Faithfulness",
            "Grace Alone",
            "How Great Thou Art",
            "Holy Holy Holy",
            "(CIAS) Grace Song",
            "(CIAS) Jesus Loves Me",
            "(CIAS) My Great God",
            "Be Thou My Vision",
            "Blessed Assurance",
            "Come Thou Fount",
            "Crown Him",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        catalog::build(&base, &[], DEFAULT_MARKER)
    }

    fn tier(song: &str, needle: &str) -> usize {
        let lower = song.to_lowercase();
        let offset = if is_marked(song, DEFAULT_MARKER) { 2 } else { 0 };
        if lower.starts_with(needle) { offset } else { offset + 1 }
    }

    #[test]
    fn test_blank_query_browses() {
        let catalog = sample_catalog();
        let result = suggest(&catalog, "   ", DEFAULT_MARKER, DEFAULT_LIMIT);
        assert_eq!(result.len(), 10);
        assert_eq!(result[..], catalog[..10]);

        let small = vec!["Only".to_string()];
        assert_eq!(suggest(&small, "", DEFAULT_MARKER, DEFAULT_LIMIT), small);
    }

    #[test]
    fn test_tier_order() {
        let catalog = sample_catalog();
        let result = suggest(&catalog, "grace", DEFAULT_MARKER, DEFAULT_LIMIT);
        assert_eq!(result, vec!["Grace Alone", "Amazing Grace", "(CIAS) Grace Song"]);
    }

    #[test]
    fn test_results_contain_query_and_tiers_ascend() {
        let catalog = sample_catalog();
        let result = suggest(&catalog, "GREAT", DEFAULT_MARKER, DEFAULT_LIMIT);
        assert!(!result.is_empty());
        assert!(result.iter().all(|s| s.to_lowercase().contains("great")));
        let tiers: Vec<usize> = result.iter().map(|s| tier(s, "great")).collect();
        assert!(tiers.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(result.last().map(String::as_str), Some("(CIAS) My Great God"));
    }

    #[test]
    fn test_marked_prefix_matches_include_marker() {
        let catalog = sample_catalog();
        let result = suggest(&catalog, "(cias) j", DEFAULT_MARKER, DEFAULT_LIMIT);
        assert_eq!(result, vec!["(CIAS) Jesus Loves Me"]);
    }

    #[test]
    fn test_limit_truncates() {
        let catalog = sample_catalog();
        let result = suggest(&catalog, "o", DEFAULT_MARKER, 3);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_no_match() {
        let catalog = sample_catalog();
        assert!(suggest(&catalog, "zzz", DEFAULT_MARKER, DEFAULT_LIMIT).is_empty());
        assert!(suggest(&[], "a", DEFAULT_MARKER, DEFAULT_LIMIT).is_empty());
    }

    #[test]
    fn test_scan_cap() {
        let catalog: Vec<String> = (0..100).map(|i| format!("Song {i:03}")).collect();
        let result = suggest(&catalog, "song", DEFAULT_MARKER, 100);
        assert_eq!(result.len(), SCAN_CAP);
        assert_eq!(result[0], "Song 000");
        assert_eq!(result[SCAN_CAP - 1], "Song 039");
    }
}
