//! Per-fragment entry accumulation and resolution into absolute output offsets.

use crate::source_map::sort_by_location;
use crate::{ByteOffset, Entry, SourceMap};
use indexmap::IndexMap;
use smol_str::SmolStr;

/// Collects source map entries while fragments are generated.
///
/// Each fragment records entries relative to the start of its own emitted text. When
/// the fragment's placement in the final output is known, [`Mapper::resolve`] appends
/// shifted copies of those entries to the absolute collection. The absolute
/// collection is append-only: nothing is removed, merged, or deduplicated.
///
/// A mapper belongs to a single compilation unit and is consumed by
/// [`Mapper::build_source_map`].
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    relative: IndexMap<SmolStr, Vec<Entry>>,
    absolute: Vec<Entry>,
}

impl Mapper {
    /// Creates an empty mapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry for `fragment`, in fragment-local coordinates.
    pub fn add_entry(&mut self, fragment: impl Into<SmolStr>, entry: Entry) {
        self.relative.entry(fragment.into()).or_default().push(entry);
    }

    /// Shifts every entry recorded for `fragment` by `placement` and appends the
    /// results, in recording order, to the absolute collection.
    ///
    /// A fragment that never recorded an entry is ignored. Resolving the same
    /// fragment again appends its entries again.
    pub fn resolve(&mut self, fragment: &str, placement: ByteOffset) {
        let Some(entries) = self.relative.get(fragment) else {
            log::trace!("no entries recorded for fragment `{fragment}`");
            return;
        };

        log::trace!(
            "resolving {} entries of `{fragment}` at offset {}",
            entries.len(),
            u32::from(placement)
        );
        self.absolute
            .extend(entries.iter().map(|entry| entry.shifted(placement)));
    }

    /// Entries recorded for `fragment`, or an empty slice for unknown names.
    pub fn relative_entries(&self, fragment: &str) -> &[Entry] {
        self.relative
            .get(fragment)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Names of fragments that recorded entries, in first-use order.
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.relative.keys().map(SmolStr::as_str)
    }

    /// The absolute collection, in resolution order.
    #[inline]
    pub fn absolute_entries(&self) -> &[Entry] {
        &self.absolute
    }

    /// Returns a copy of the absolute collection sorted by source location.
    ///
    /// Entries with identical locations keep their resolution order.
    pub fn sorted(&self) -> Vec<Entry> {
        let mut entries = self.absolute.clone();
        sort_by_location(&mut entries);
        entries
    }

    /// Consumes the mapper and builds the final source map.
    pub fn build_source_map(self) -> SourceMap {
        SourceMap::from_entries(self.absolute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Location;
    use pretty_assertions::assert_eq;
    use text_size::TextSize;

    fn entry(file: &str, line: u32, col: u32, start: u32, end: u32) -> Entry {
        Entry::new(Location::new(file, line, col), start, end)
    }

    #[test]
    fn test_resolve_unknown_fragment_is_noop() {
        let mut mapper = Mapper::new();
        mapper.add_entry("f", entry("a.tact", 1, 0, 0, 1));
        mapper.resolve("f", TextSize::from(0));
        let before = mapper.absolute_entries().to_vec();

        mapper.resolve("missing", TextSize::from(42));
        assert_eq!(mapper.absolute_entries(), before.as_slice());
    }

    #[test]
    fn test_resolve_shifts_entries() {
        let mut mapper = Mapper::new();
        mapper.add_entry("f", entry("a.tact", 4, 2, 10, 12));
        mapper.resolve("f", TextSize::from(100));

        assert_eq!(
            mapper.absolute_entries(),
            &[entry("a.tact", 4, 2, 110, 112)]
        );
        // Relative entries are untouched.
        assert_eq!(mapper.relative_entries("f"), &[entry("a.tact", 4, 2, 10, 12)]);
    }

    #[test]
    fn test_resolve_preserves_recording_order() {
        let mut mapper = Mapper::new();
        mapper.add_entry("f", entry("z.tact", 9, 0, 5, 6));
        mapper.add_entry("f", entry("a.tact", 1, 0, 0, 2));
        mapper.resolve("f", TextSize::from(3));

        assert_eq!(
            mapper.absolute_entries(),
            &[entry("z.tact", 9, 0, 8, 9), entry("a.tact", 1, 0, 3, 5)]
        );
    }

    #[test]
    fn test_double_resolution_duplicates() {
        let mut mapper = Mapper::new();
        mapper.add_entry("f", entry("a.tact", 1, 0, 0, 1));
        mapper.add_entry("f", entry("a.tact", 2, 0, 2, 3));
        mapper.add_entry("g", entry("b.tact", 1, 0, 0, 0));

        mapper.resolve("f", TextSize::from(10));
        mapper.resolve("f", TextSize::from(10));
        mapper.resolve("g", TextSize::from(0));

        let from_f = mapper
            .absolute_entries()
            .iter()
            .filter(|e| e.loc.file == "a.tact")
            .count();
        assert_eq!(from_f, 4);
        assert_eq!(mapper.absolute_entries().len(), 5);
    }

    #[test]
    fn test_fragments_in_first_use_order() {
        let mut mapper = Mapper::new();
        mapper.add_entry("second", entry("a.tact", 1, 0, 0, 0));
        mapper.add_entry("first", entry("a.tact", 1, 0, 0, 0));
        mapper.add_entry("second", entry("a.tact", 2, 0, 1, 1));

        assert_eq!(mapper.fragments().collect::<Vec<_>>(), vec!["second", "first"]);
        assert_eq!(mapper.relative_entries("second").len(), 2);
        assert!(mapper.relative_entries("unknown").is_empty());
    }

    #[test]
    fn test_sorted_by_location() {
        let mut mapper = Mapper::new();
        mapper.add_entry("f", entry("b.tact", 2, 0, 0, 0));
        mapper.add_entry("f", entry("a.tact", 5, 0, 1, 1));
        mapper.add_entry("f", entry("a.tact", 1, 0, 2, 2));
        mapper.resolve("f", TextSize::from(0));

        let order: Vec<String> = mapper
            .sorted()
            .iter()
            .map(|e| format!("{}:{}", e.loc.file, e.loc.line))
            .collect();
        assert_eq!(order, vec!["a.tact:1", "a.tact:5", "b.tact:2"]);
    }

    #[test]
    fn test_sorted_columns_numeric() {
        let mut mapper = Mapper::new();
        mapper.add_entry("f", entry("a.tact", 1, 10, 0, 0));
        mapper.add_entry("f", entry("a.tact", 1, 9, 1, 1));
        mapper.resolve("f", TextSize::from(0));

        let cols: Vec<u32> = mapper.sorted().iter().map(|e| e.loc.col).collect();
        assert_eq!(cols, vec![9, 10]);
    }

    #[test]
    fn test_sorted_is_stable_on_ties() {
        let mut mapper = Mapper::new();
        mapper.add_entry("f", entry("a.tact", 3, 1, 40, 41));
        mapper.add_entry("f", entry("a.tact", 1, 0, 0, 0));
        mapper.add_entry("f", entry("a.tact", 3, 1, 10, 11));
        mapper.add_entry("f", entry("a.tact", 3, 1, 20, 21));
        mapper.resolve("f", TextSize::from(0));

        let starts: Vec<u32> = mapper.sorted().iter().map(|e| u32::from(e.start)).collect();
        assert_eq!(starts, vec![0, 40, 10, 20]);
    }

    #[test]
    fn test_sorted_returns_copy() {
        let mut mapper = Mapper::new();
        mapper.add_entry("f", entry("b.tact", 1, 0, 0, 0));
        mapper.add_entry("f", entry("a.tact", 1, 0, 1, 1));
        mapper.resolve("f", TextSize::from(0));

        let mut sorted = mapper.sorted();
        sorted.clear();
        assert_eq!(mapper.absolute_entries().len(), 2);
        assert_eq!(mapper.absolute_entries()[0].loc.file, "b.tact");
    }

    #[test]
    fn test_build_source_map_matches_sorted() {
        let mut mapper = Mapper::new();
        mapper.add_entry("f", entry("b.tact", 1, 0, 0, 1));
        mapper.add_entry("f", entry("a.tact", 2, 0, 2, 3));
        mapper.add_entry("f", entry("a.tact", 2, 0, 4, 5));
        mapper.resolve("f", TextSize::from(0));

        let sorted = mapper.sorted();
        let map = mapper.build_source_map();
        assert_eq!(map.locations(), sorted.as_slice());
    }

    #[test]
    fn test_empty_mapper() {
        let mapper = Mapper::new();
        assert!(mapper.sorted().is_empty());
        let map = mapper.build_source_map();
        assert!(map.is_empty());
        assert!(map.correspondence().is_empty());
    }

    #[test]
    fn test_end_to_end() {
        let mut mapper = Mapper::new();
        mapper.add_entry("fn1", entry("m.tact", 3, 0, 0, 2));
        mapper.resolve("fn1", TextSize::from(50));

        let map = mapper.build_source_map();
        assert_eq!(map.locations(), &[entry("m.tact", 3, 0, 50, 52)]);
        let correspondence: Vec<(u32, usize)> = map
            .correspondence()
            .iter()
            .map(|(offset, index)| (u32::from(*offset), *index))
            .collect();
        assert_eq!(correspondence, vec![(50, 0), (51, 0), (52, 0)]);
    }
}
