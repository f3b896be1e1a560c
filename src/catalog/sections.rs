use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// A named, inclusive range over the leading number of a song title.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogSection {
    pub name: String,
    pub min: u32,
    pub max: u32,
}

impl CatalogSection {
    pub fn new(name: impl Into<String>, min: u32, max: u32) -> Self {
        Self {
            name: name.into(),
            min,
            max,
        }
    }

    pub fn contains(&self, number: u32) -> bool {
        (self.min..=self.max).contains(&number)
    }
}

/// Section lists for the two sub-collections. Boundaries may differ between
/// them; order matters (first matching section wins).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    pub primary: Vec<CatalogSection>,
    pub marked: Vec<CatalogSection>,
}

// Leading number, allowing whitespace before it: "12 Amazing Grace", " 7. Title"
static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?P<num>\d+)").unwrap());

/// Extract the leading number of a song title. For marked songs the marker
/// prefix is stripped first, so "(CIAS) 15 Title" yields 15.
pub fn leading_number(song: &str, marker: &str) -> Option<u32> {
    let rest = if marker.is_empty() {
        song
    } else {
        song.strip_prefix(marker).unwrap_or(song)
    };
    LEADING_NUMBER_RE
        .captures(rest)
        .and_then(|caps| caps.name("num"))
        .and_then(|m| m.as_str().parse().ok())
}

/// Index of the first section containing `number`.
pub fn section_index(sections: &[CatalogSection], number: u32) -> Option<usize> {
    sections.iter().position(|s| s.contains(number))
}
