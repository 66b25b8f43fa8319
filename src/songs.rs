use std::collections::BTreeSet;

use serde::Serialize;

use crate::project::models::MarkerTable;

/// Song names available in a project: distinct, sorted, color-0 regions excluded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SongList {
    names: Vec<String>,
}

impl SongList {
    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Collect the songs of a table.
pub fn extract_songs(table: &MarkerTable) -> SongList {
    let names: BTreeSet<&str> = table
        .rows
        .iter()
        .filter(|r| r.is_song())
        .map(|r| r.name.as_str())
        .collect();

    let list = SongList {
        names: names.into_iter().map(str::to_string).collect(),
    };
    log::info!("{} songs found in project", list.len());
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{parse, strip_point_markers};

    const PROJECT: &str = "\
MARKER 1 0 Verse 1 5 1 R {A} 0
MARKER 1 10 \"\" 1
MARKER 2 10 \"Break Down\" 1 5 1 R {B} 0
MARKER 2 20 \"\" 1
MARKER 3 20 Tuning 1 0 1 R {C} 0
MARKER 3 30 \"\" 1
MARKER 4 30 Verse 1 7 1 R {D} 0
MARKER 4 40 \"\" 1
MARKER 5 35 Alone 0 5 1 B {E} 0
";

    #[test]
    fn test_songs_sorted_and_distinct() {
        let table = strip_point_markers(&parse(PROJECT).unwrap());
        let songs = extract_songs(&table);
        assert_eq!(songs.names(), &["Break Down".to_string(), "Verse".to_string()]);
    }

    #[test]
    fn test_color_zero_excluded() {
        let songs = extract_songs(&parse(PROJECT).unwrap());
        assert!(!songs.contains("Tuning"));
    }

    #[test]
    fn test_point_markers_are_not_songs() {
        // Even on an unstripped table, a point marker never becomes a song
        let songs = extract_songs(&parse(PROJECT).unwrap());
        assert!(!songs.contains("Alone"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let a = extract_songs(&strip_point_markers(&parse(PROJECT).unwrap()));
        let b = extract_songs(&strip_point_markers(&parse(PROJECT).unwrap()));
        assert_eq!(a, b);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let songs = extract_songs(&parse(PROJECT).unwrap());
        assert_eq!(
            serde_json::to_string(&songs).unwrap(),
            r#"["Break Down","Verse"]"#
        );
    }
}
