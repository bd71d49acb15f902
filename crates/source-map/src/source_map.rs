//! The published source map: sorted locations plus a reverse offset index.

use crate::{ByteOffset, Entry, Location};
use std::collections::BTreeMap;

/// Maps generated output offsets back to source locations.
///
/// `locations` is sorted by `(file, line, col)`. `correspondence` maps every offset
/// covered by some location to that location's index. Where entries overlap, the one
/// that sorts last wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceMap {
    locations: Vec<Entry>,
    correspondence: BTreeMap<ByteOffset, usize>,
}

impl SourceMap {
    /// Creates an empty source map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a source map from entries in absolute output coordinates.
    pub fn from_entries(mut entries: Vec<Entry>) -> Self {
        sort_by_location(&mut entries);

        let mut correspondence = BTreeMap::new();
        for (index, entry) in entries.iter().enumerate() {
            for offset in entry.offsets() {
                correspondence.insert(offset, index);
            }
        }

        Self {
            locations: entries,
            correspondence,
        }
    }

    /// Returns the number of locations.
    #[inline]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns true if there are no locations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// The sorted locations.
    #[inline]
    pub fn locations(&self) -> &[Entry] {
        &self.locations
    }

    /// The reverse index from output offset to location index.
    #[inline]
    pub fn correspondence(&self) -> &BTreeMap<ByteOffset, usize> {
        &self.correspondence
    }

    /// Index of the location responsible for `offset`.
    pub fn index_at(&self, offset: ByteOffset) -> Option<usize> {
        self.correspondence.get(&offset).copied()
    }

    /// The entry responsible for `offset`.
    pub fn entry_at(&self, offset: ByteOffset) -> Option<&Entry> {
        self.index_at(offset)
            .and_then(|index| self.locations.get(index))
    }

    /// The source location responsible for `offset`.
    pub fn location_at(&self, offset: ByteOffset) -> Option<&Location> {
        self.entry_at(offset).map(|entry| &entry.loc)
    }
}

/// Stably sorts entries by `(file, line, col)`; ties keep their current order.
pub(crate) fn sort_by_location(entries: &mut [Entry]) {
    entries.sort_by(|a, b| a.loc.cmp(&b.loc));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use text_size::TextSize;

    fn entry(file: &str, line: u32, start: u32, end: u32) -> Entry {
        Entry::new(Location::new(file, line, 0), start, end)
    }

    fn at(map: &SourceMap, offset: u32) -> Option<usize> {
        map.index_at(TextSize::from(offset))
    }

    #[test]
    fn test_empty_source_map() {
        let map = SourceMap::from_entries(Vec::new());
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert!(map.correspondence().is_empty());
        assert_eq!(map, SourceMap::new());
    }

    #[test]
    fn test_overlap_later_sorted_entry_wins() {
        // Inserted out of order; sorting puts line 1 first.
        let map = SourceMap::from_entries(vec![entry("a.tact", 2, 3, 8), entry("a.tact", 1, 0, 5)]);

        assert_eq!(map.locations()[0].loc.line, 1);
        assert_eq!(at(&map, 0), Some(0));
        assert_eq!(at(&map, 2), Some(0));
        assert_eq!(at(&map, 3), Some(1));
        assert_eq!(at(&map, 4), Some(1));
        assert_eq!(at(&map, 5), Some(1));
        assert_eq!(at(&map, 8), Some(1));
        assert_eq!(at(&map, 9), None);
    }

    #[test]
    fn test_overlap_ignores_range_width() {
        // A narrow range sorted first loses to a wide one sorted later.
        let map = SourceMap::from_entries(vec![entry("a.tact", 1, 4, 4), entry("b.tact", 1, 0, 9)]);
        assert_eq!(at(&map, 4), Some(1));
    }

    #[test]
    fn test_overlap_on_tie_uses_resolution_order() {
        let map = SourceMap::from_entries(vec![entry("a.tact", 1, 0, 3), entry("a.tact", 1, 2, 5)]);
        assert_eq!(map.locations()[0].start, TextSize::from(0));
        assert_eq!(at(&map, 2), Some(1));
        assert_eq!(at(&map, 1), Some(0));
    }

    #[test]
    fn test_disjoint_key_count() {
        let map = SourceMap::from_entries(vec![
            entry("a.tact", 1, 0, 4),
            entry("a.tact", 2, 10, 10),
            entry("b.tact", 1, 20, 22),
        ]);
        assert_eq!(map.correspondence().len(), 5 + 1 + 3);
    }

    #[test]
    fn test_inverted_entry_contributes_nothing() {
        let map = SourceMap::from_entries(vec![entry("a.tact", 1, 5, 2), entry("a.tact", 2, 0, 0)]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.correspondence().len(), 1);
        assert_eq!(at(&map, 0), Some(1));
        assert_eq!(at(&map, 3), None);
    }

    #[test]
    fn test_location_lookup() {
        let map = SourceMap::from_entries(vec![entry("m.tact", 3, 50, 52)]);
        assert_eq!(
            map.location_at(TextSize::from(51)),
            Some(&Location::new("m.tact", 3, 0))
        );
        assert_eq!(map.entry_at(TextSize::from(53)), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_shape() {
        let map = SourceMap::from_entries(vec![entry("m.tact", 3, 50, 51)]);
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "locations": [
                    { "loc": { "file": "m.tact", "line": 3, "col": 0 }, "start": 50, "end": 51 }
                ],
                "correspondence": { "50": 0, "51": 0 }
            })
        );

        let back: SourceMap = serde_json::from_value(json).unwrap();
        assert_eq!(back, map);
    }
}
