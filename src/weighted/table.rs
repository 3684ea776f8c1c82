use super::WeightedEntry;
use crate::common::{CollectiveWeight, Float, Int, Weight};
use crate::source::{RegularRandom, UniformSource};
use tracing::{debug, trace};

/// Rolls for a selection are drawn from `[0, ROLL_RANGE)`.
const ROLL_RANGE: Int = 100;

/// Counts mutations of a table's entries.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
struct Revision(u64);

/// The revision each derived value was last computed at.
#[derive(Debug, Default, Copy, Clone)]
struct Synced {
    collective_weight: Option<Revision>,
    percentages: Option<Revision>,
    order: Option<Revision>,
}

/// Picks entries at random, proportionally to their weights.
///
/// The collective weight, the percentages and the descending order of the
/// entries are all derived from the weights. They are recomputed lazily, the
/// first time they are needed after the entries changed.
///
/// ```
/// use extra_random::{WeightedEntry, WeightedTable};
///
/// let mut table = WeightedTable::with_seed(7);
/// table.add(WeightedEntry::new(3, "common"));
/// table.add(WeightedEntry::new(1, "rare"));
///
/// assert_eq!(table.collective_weight(), 4);
/// assert!(table.next().is_some());
/// assert_eq!(table.entries()[0].percentage(), 75.0);
/// ```
#[derive(Debug, Clone)]
pub struct WeightedTable<T, S = RegularRandom> {
    entries: Vec<WeightedEntry<T>>,
    collective_weight: CollectiveWeight,
    revision: Revision,
    synced: Synced,
    source: S,
}

impl<T> WeightedTable<T> {
    /// Creates an empty table rolling with an entropy-seeded generator.
    pub fn new() -> Self {
        Self::with_source(RegularRandom::new())
    }

    /// Creates an empty table whose rolls are fully determined by `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_source(RegularRandom::with_seed(seed))
    }

    pub fn from_entries(entries: Vec<WeightedEntry<T>>) -> Self {
        Self::with_source_and_entries(RegularRandom::new(), entries)
    }
}

impl<T> Default for WeightedTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S: UniformSource> WeightedTable<T, S> {
    pub fn with_source(source: S) -> Self {
        Self::with_source_and_entries(source, Vec::new())
    }

    pub fn with_source_and_entries(source: S, entries: Vec<WeightedEntry<T>>) -> Self {
        let collective_weight = sum_weights(&entries);
        Self {
            entries,
            collective_weight,
            revision: Revision::default(),
            synced: Synced {
                collective_weight: Some(Revision::default()),
                ..Synced::default()
            },
            source,
        }
    }

    /// Appends an entry, invalidating every derived value.
    pub fn add(&mut self, entry: WeightedEntry<T>) {
        self.collective_weight += CollectiveWeight::from(entry.weight);
        self.entries.push(entry);
        self.touch();
    }

    pub fn push(&mut self, weight: Weight, payload: T) {
        self.add(WeightedEntry::new(weight, payload))
    }

    /// The sum of every entry's weight. `0` for an empty table.
    pub fn collective_weight(&mut self) -> CollectiveWeight {
        if !self.is_synced(self.synced.collective_weight) {
            self.collective_weight = sum_weights(&self.entries);
            self.synced.collective_weight = Some(self.revision);
            debug!(collective_weight = self.collective_weight, "recomputed collective weight");
        }
        self.collective_weight
    }

    /// Brings every percentage up to date and returns the entries, most likely first.
    pub fn percentages(&mut self) -> &[WeightedEntry<T>] {
        self.refresh();
        &self.entries
    }

    /// Picks one entry with a single roll from the uniform source.
    ///
    /// Returns `None` when there is nothing to pick: the table is empty or all
    /// of its weights are zero. No randomness is consumed in that case.
    ///
    /// A roll landing exactly on the boundary between two entries selects the
    /// one that comes first.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&WeightedEntry<T>> {
        if self.collective_weight() == 0 {
            trace!("no weight to select from");
            return None;
        }
        self.refresh();

        let roll = self.source.next_int(0, ROLL_RANGE);
        trace!(roll, range = ROLL_RANGE, "rolled");
        self.select(roll as Float)
    }

    pub fn next_payload(&mut self) -> Option<&T> {
        self.next().map(|entry| &entry.payload)
    }

    /// Mutable access to the entries. Invalidates every derived value.
    pub fn entries_mut(&mut self) -> &mut [WeightedEntry<T>] {
        self.touch();
        &mut self.entries
    }

    /// Mutable access to one entry. Invalidates every derived value.
    ///
    /// Entries are reordered whenever the order is recomputed, so an index is
    /// only stable until the next call to [next](Self::next) or
    /// [percentages](Self::percentages).
    pub fn get_mut(&mut self, index: usize) -> Option<&mut WeightedEntry<T>> {
        self.touch();
        self.entries.get_mut(index)
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn refresh(&mut self) {
        self.update_percentages();
        self.update_order();
    }

    fn update_percentages(&mut self) {
        if self.is_synced(self.synced.percentages) {
            return;
        }
        let collective_weight = self.collective_weight();
        for entry in &mut self.entries {
            entry.percentage = if collective_weight == 0 {
                0.0
            } else {
                entry.weight as Float / collective_weight as Float * 100.0
            };
        }
        self.synced.percentages = Some(self.revision);
        debug!(entries = self.entries.len(), "recomputed percentages");
    }

    fn update_order(&mut self) {
        if self.is_synced(self.synced.order) {
            return;
        }
        // `sort_by` is stable, so entries with equal percentages keep their insertion order.
        self.entries
            .sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
        self.synced.order = Some(self.revision);
    }

    fn select(&self, roll: Float) -> Option<&WeightedEntry<T>> {
        let mut previous = 0.0;
        for entry in &self.entries {
            // Zero-weight entries can never be picked, even on a shared boundary.
            if entry.weight == 0 {
                continue;
            }
            let current = previous + entry.percentage;
            if (previous..=current).contains(&roll) {
                trace!(roll, start = previous, end = current, "roll fell in range");
                return Some(entry);
            }
            previous = current;
        }

        trace!(roll, end = previous, "roll fell outside every range");
        None
    }
}

impl<T, S> WeightedTable<T, S> {
    pub fn entries(&self) -> &[WeightedEntry<T>] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeightedEntry<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<WeightedEntry<T>> {
        self.entries
    }

    fn touch(&mut self) {
        self.revision.0 += 1;
    }

    fn is_synced(&self, at: Option<Revision>) -> bool {
        at == Some(self.revision)
    }
}

impl<T> FromIterator<WeightedEntry<T>> for WeightedTable<T> {
    fn from_iter<I: IntoIterator<Item = WeightedEntry<T>>>(iter: I) -> Self {
        Self::from_entries(iter.into_iter().collect())
    }
}

impl<T, S: UniformSource> Extend<WeightedEntry<T>> for WeightedTable<T, S> {
    fn extend<I: IntoIterator<Item = WeightedEntry<T>>>(&mut self, iter: I) {
        for entry in iter {
            self.add(entry);
        }
    }
}

fn sum_weights<T>(entries: &[WeightedEntry<T>]) -> CollectiveWeight {
    entries
        .iter()
        .map(|entry| CollectiveWeight::from(entry.weight))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biased::BiasedRandom;
    use crate::common::Bias;
    use crate::source::SequenceSource;
    use proptest::prelude::*;

    fn table_with_rolls(rolls: impl Into<Vec<Int>>) -> WeightedTable<&'static str, SequenceSource> {
        WeightedTable::with_source(SequenceSource::new(rolls))
    }

    fn percentage_sum<T, S: UniformSource>(table: &mut WeightedTable<T, S>) -> Float {
        table.percentages().iter().map(WeightedEntry::percentage).sum()
    }

    #[test]
    fn test_empty_table_selects_nothing() {
        let mut table = table_with_rolls([0]);
        assert_eq!(table.collective_weight(), 0);
        assert!(table.next().is_none());
        assert!(table.next_payload().is_none());
        assert_eq!(table.source_mut().calls(), 0);
    }

    #[test]
    fn test_zero_weights_select_nothing() {
        let mut table = table_with_rolls([0]);
        table.push(0, "a");
        table.push(0, "b");
        assert!(table.next().is_none());
        assert!(table.percentages().iter().all(|e| e.percentage() == 0.0));
        assert_eq!(table.source_mut().calls(), 0);
    }

    #[test]
    fn test_zero_weight_entry_is_never_selected() {
        let mut table = table_with_rolls((0..ROLL_RANGE).collect::<Vec<_>>());
        table.push(0, "never");
        table.push(5, "always");
        for _ in 0..ROLL_RANGE {
            assert_eq!(table.next_payload(), Some(&"always"));
        }
    }

    #[test]
    fn test_single_entry_always_selected() {
        let mut table = table_with_rolls((0..ROLL_RANGE).collect::<Vec<_>>());
        table.push(7, "only");
        for _ in 0..ROLL_RANGE {
            assert_eq!(table.next_payload(), Some(&"only"));
        }
        assert!(table
            .source_mut()
            .int_ranges
            .iter()
            .all(|&range| range == (0, ROLL_RANGE)));
    }

    #[test]
    fn test_boundary_goes_to_earlier_entry() {
        let mut table = table_with_rolls([50, 51, 0, 99]);
        table.push(1, "first");
        table.push(1, "second");

        assert_eq!(table.next_payload(), Some(&"first"));
        assert_eq!(table.next_payload(), Some(&"second"));
        assert_eq!(table.next_payload(), Some(&"first"));
        assert_eq!(table.next_payload(), Some(&"second"));
    }

    #[test]
    fn test_cumulative_ranges() {
        // After sorting: c = [0, 50], b = [50, 80], a = [80, 100].
        let mut table = table_with_rolls([10, 50, 51, 80, 81, 99]);
        table.push(2, "a");
        table.push(3, "b");
        table.push(5, "c");

        let picks: Vec<_> = (0..6).map(|_| *table.next_payload().unwrap()).collect();
        assert_eq!(picks, ["c", "c", "b", "b", "a", "a"]);
    }

    #[test]
    fn test_collective_weight_tracks_mutations() {
        let mut table = table_with_rolls([0]);
        table.push(4, "a");
        assert_eq!(table.collective_weight(), 4);
        table.add(WeightedEntry::new(6, "b"));
        assert_eq!(table.collective_weight(), 10);

        table.get_mut(0).unwrap().weight = 1;
        assert_eq!(table.collective_weight(), 7);

        for entry in table.entries_mut() {
            entry.weight = 0;
        }
        assert_eq!(table.collective_weight(), 0);
        assert!(table.next().is_none());
    }

    #[test]
    fn test_percentages_follow_edited_weights() {
        let mut table = table_with_rolls([0]);
        table.push(1, "a");
        table.push(1, "b");
        assert_eq!(table.percentages()[0].percentage(), 50.0);

        table.get_mut(1).unwrap().weight = 3;
        let entries = table.percentages();
        assert_eq!(entries[0].payload, "b");
        assert_eq!(entries[0].percentage(), 75.0);
        assert_eq!(entries[1].percentage(), 25.0);
    }

    #[test]
    fn test_percentages_are_recomputed_after_add() {
        let mut table = table_with_rolls([0]);
        table.push(1, "a");
        assert_eq!(table.percentages()[0].percentage(), 100.0);

        table.push(3, "b");
        let entries = table.percentages();
        assert_eq!(entries[0].payload, "b");
        assert_eq!(entries[0].percentage(), 75.0);
        assert_eq!(entries[1].percentage(), 25.0);
    }

    #[test]
    fn test_order_is_descending_and_stable() {
        let mut table = table_with_rolls([0]);
        table.push(1, "low");
        table.push(5, "tie-1");
        table.push(3, "mid");
        table.push(5, "tie-2");

        let order: Vec<_> = table.percentages().iter().map(|e| e.payload).collect();
        assert_eq!(order, ["tie-1", "tie-2", "mid", "low"]);
    }

    #[test]
    fn test_initial_entries() {
        let entries = vec![WeightedEntry::new(1, 'x'), WeightedEntry::new(3, 'y')];
        let mut table = WeightedTable::with_source_and_entries(SequenceSource::new([0]), entries);
        assert_eq!(table.len(), 2);
        assert_eq!(table.collective_weight(), 4);
        assert_eq!(table.next_payload(), Some(&'y'));

        let collected: WeightedTable<char> =
            [(2, 'p'), (2, 'q')].into_iter().map(|(w, c)| WeightedEntry::new(w, c)).collect();
        assert_eq!(collected.len(), 2);
        assert!(!collected.is_empty());
    }

    #[test]
    fn test_extend_adds_every_entry() {
        let mut table = table_with_rolls([0]);
        table.extend([WeightedEntry::new(2, "a"), WeightedEntry::new(8, "b")]);
        assert_eq!(table.collective_weight(), 10);
        assert_eq!(table.iter().count(), 2);
        assert_eq!(table.into_entries().len(), 2);
    }

    #[test]
    fn test_same_seed_same_selections() {
        let draw = |seed| {
            let mut table = WeightedTable::with_seed(seed);
            table.push(1, "a");
            table.push(2, "b");
            table.push(3, "c");
            let mut picks: Vec<&str> = (0..50).map(|_| *table.next_payload().unwrap()).collect();
            table.push(10, "d");
            picks.extend((0..50).map(|_| *table.next_payload().unwrap()));
            picks
        };
        assert_eq!(draw(1234), draw(1234));
    }

    #[test]
    fn test_even_split_frequency() {
        let mut table = WeightedTable::with_seed(2024);
        table.push(50, true);
        table.push(50, false);

        let draws = 10_000;
        let hits = (0..draws)
            .filter(|_| *table.next_payload().unwrap())
            .count();
        let share = hits as Float / draws as Float * 100.0;
        assert!((47.0..=53.0).contains(&share), "share was {share}%");
    }

    #[test]
    fn test_lower_bias_favors_likely_entries() {
        let source = BiasedRandom::with_seed(99, 3, Bias::Lower).unwrap();
        let mut table = WeightedTable::with_source(source);
        table.push(1, "likely");
        table.push(1, "unlikely");

        let draws = 2000;
        let hits = (0..draws)
            .filter(|_| table.next_payload() == Some(&"likely"))
            .count();
        // P(min of 3 rolls <= 50) is about 0.88.
        assert!(hits > draws * 3 / 4, "picked the first entry {hits} times");
    }

    #[test]
    fn test_shared_source_preserves_call_order() {
        let mut shared = RegularRandom::with_seed(5);
        let mut reference = RegularRandom::with_seed(5);

        let first = {
            let mut table = WeightedTable::with_source(&mut shared);
            table.push(1, 0);
            table.push(1, 1);
            *table.next_payload().unwrap()
        };

        let expected = if reference.next_int(0, ROLL_RANGE) <= 50 { 0 } else { 1 };
        assert_eq!(first, expected);
        assert_eq!(shared.next_int(0, 1000), reference.next_int(0, 1000));
    }

    proptest! {
        #[test]
        fn percentages_sum_to_one_hundred(weights in prop::collection::vec(1u32..10_000, 1..50)) {
            let mut table = table_with_rolls([0]);
            for (i, &weight) in weights.iter().enumerate() {
                table.push(weight, if i % 2 == 0 { "even" } else { "odd" });
            }
            prop_assert!((percentage_sum(&mut table) - 100.0).abs() < 1e-4);
        }

        #[test]
        fn collective_weight_matches_sum(weights in prop::collection::vec(0u32..u32::MAX, 0..30)) {
            let mut table = table_with_rolls([0]);
            let mut expected: CollectiveWeight = 0;
            for &weight in &weights {
                table.push(weight, "x");
                expected += CollectiveWeight::from(weight);
                prop_assert_eq!(table.collective_weight(), expected);
            }
            let eager: CollectiveWeight = table.entries().iter().map(|e| CollectiveWeight::from(e.weight)).sum();
            prop_assert_eq!(table.collective_weight(), eager);
        }

        #[test]
        fn selection_always_lands_with_positive_weight(
            weights in prop::collection::vec(1u32..1000, 1..20),
            roll in 0..ROLL_RANGE,
        ) {
            let mut table = table_with_rolls([roll]);
            for &weight in &weights {
                table.push(weight, "x");
            }
            prop_assert!(table.next().is_some());
        }
    }
}
