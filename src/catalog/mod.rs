pub mod sections;

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Default prefix identifying the secondary ("marked") sub-collection.
pub const DEFAULT_MARKER: &str = "(CIAS)";

/// True when `song` belongs to the marked sub-collection.
pub fn is_marked(song: &str, marker: &str) -> bool {
    !marker.is_empty() && song.starts_with(marker)
}

/// Case- and accent-folded key: "Ângelo" and "angelo" share a key.
fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Locale-style comparison, made total by falling back to the raw string.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Merge the base catalog with user-registered songs.
///
/// Exact duplicates collapse to one entry. Unmarked songs come first, then
/// marked ones, each group in collated order. Inputs are left untouched.
pub fn build(base: &[String], custom: &[String], marker: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut merged: Vec<(bool, String, &String)> = base
        .iter()
        .chain(custom)
        .filter(|song| seen.insert(song.as_str()))
        .map(|song| (is_marked(song, marker), collation_key(song), song))
        .collect();

    merged.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.cmp(b.2))
    });

    merged.into_iter().map(|(_, _, song)| song.clone()).collect()
}

/// Exact-string membership test.
pub fn contains(catalog: &[String], song: &str) -> bool {
    catalog.iter().any(|s| s == song)
}

/// Load the fixed base catalog: one song per line, blank lines and `#`
/// comments ignored, surrounding whitespace trimmed.
pub fn load_base_catalog(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
    let songs: Vec<String> = parse_catalog(&contents);
    log::info!("Loaded {} catalog songs from {}", songs.len(), path.display());
    Ok(songs)
}

fn parse_catalog(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_dedups_and_orders() {
        let base = strings(&["(CIAS) 2 Zebra", "10 Beta", "1 Alpha", "(CIAS) 1 Apple"]);
        let custom = strings(&["1 Alpha", "5 Gamma"]);
        let catalog = build(&base, &custom, DEFAULT_MARKER);
        assert_eq!(
            catalog,
            strings(&["1 Alpha", "10 Beta", "5 Gamma", "(CIAS) 1 Apple", "(CIAS) 2 Zebra"])
        );
    }

    #[test]
    fn test_marked_after_unmarked() {
        let base = strings(&["(CIAS) A", "Z", "(CIAS) B", "Y"]);
        let catalog = build(&base, &[], DEFAULT_MARKER);
        let first_marked = catalog.iter().position(|s| is_marked(s, DEFAULT_MARKER)).unwrap();
        assert!(catalog[..first_marked].iter().all(|s| !is_marked(s, DEFAULT_MARKER)));
        assert!(catalog[first_marked..].iter().all(|s| is_marked(s, DEFAULT_MARKER)));
    }

    #[test]
    fn test_accent_and_case_insensitive_order() {
        let base = strings(&["Ordem", "Ângelo", "amor", "Bênção"]);
        let catalog = build(&base, &[], DEFAULT_MARKER);
        assert_eq!(catalog, strings(&["amor", "Ângelo", "Bênção", "Ordem"]));
    }

    #[test]
    fn test_order_is_total() {
        // Same folded key, different bytes: both kept, deterministic order.
        let base = strings(&["gloria", "Gloria", "Glória"]);
        let catalog = build(&base, &[], DEFAULT_MARKER);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog, build(&strings(&["Glória", "gloria", "Gloria"]), &[], DEFAULT_MARKER));
    }

    #[test]
    fn test_whitespace_variants_are_distinct() {
        let catalog = build(&strings(&["Hymn", "Hymn "]), &[], DEFAULT_MARKER);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_build_is_idempotent() {
        let base = strings(&["b", "(CIAS) c", "a", "é"]);
        let custom = strings(&["d", "a"]);
        assert_eq!(build(&base, &custom, DEFAULT_MARKER), build(&base, &custom, DEFAULT_MARKER));
    }

    #[test]
    fn test_empty_marker_means_nothing_marked() {
        assert!(!is_marked("(CIAS) x", ""));
        assert!(is_marked("(CIAS) x", DEFAULT_MARKER));
    }

    #[test]
    fn test_parse_catalog() {
        let text = "# base hymnal\n1 Alpha\n\n  2 Beta  \n#skip\n(CIAS) 1 Kids\n";
        assert_eq!(parse_catalog(text), strings(&["1 Alpha", "2 Beta", "(CIAS) 1 Kids"]));
    }

    #[test]
    fn test_build_empty() {
        assert!(build(&[], &[], DEFAULT_MARKER).is_empty());
    }
}
