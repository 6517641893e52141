use std::collections::{HashMap, HashSet};

use multimap::MultiMap;

use crate::error::Result;
use crate::record::CosmicRecord;

/// An observed mutation event to be annotated.
pub trait MutationEvent {
    /// Identifier keying this event in the join result.
    fn event_id(&self) -> u64;
    /// Precomputed lookup keyword; empty when the caller has none.
    fn keyword(&self) -> &str;
}

/// Keyword-indexed access to stored annotations.
///
/// The join issues exactly one call per batch through this trait, never one
/// per event.
pub trait KeywordLookup {
    /// Fetch all records whose keyword is in the given set, grouped by
    /// keyword in storage scan order.
    fn records_by_keywords(
        &self,
        keywords: &HashSet<String>,
    ) -> Result<MultiMap<String, CosmicRecord>>;
}

/// Join a batch of mutation events with stored frequency annotations.
///
/// All distinct keywords across the batch are fetched with a single lookup
/// call. Each event whose keyword matched at least one record maps to an
/// amino-acid-change to frequency table built from its group; within that
/// table a duplicate amino-acid change is overwritten by the later record.
/// Events without a match are absent from the result.
pub fn frequencies_for_events<L, E>(
    lookup: &L,
    events: &[E],
) -> Result<HashMap<u64, HashMap<String, u32>>>
where
    L: KeywordLookup + ?Sized,
    E: MutationEvent,
{
    let mut frequencies = HashMap::new();
    if events.is_empty() {
        return Ok(frequencies);
    }

    let keywords: HashSet<String> =
        events.iter().map(|e| e.keyword().to_owned()).collect();

    let grouped = lookup.records_by_keywords(&keywords)?;

    for event in events {
        let records = match grouped.get_vec(event.keyword()) {
            Some(records) => records,
            None => continue, // no annotation under this keyword
        };

        // fresh table per event; events sharing a keyword must not alias
        let mut changes: HashMap<String, u32> = HashMap::new();
        for record in records {
            changes.insert(record.amino_acid_change.clone(), record.frequency);
        }
        frequencies.insert(event.event_id(), changes);
    }

    Ok(frequencies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Event {
        id: u64,
        keyword: String,
    }

    impl Event {
        fn new(id: u64, keyword: &str) -> Self {
            Event { id, keyword: keyword.to_owned() }
        }
    }

    impl MutationEvent for Event {
        fn event_id(&self) -> u64 {
            self.id
        }
        fn keyword(&self) -> &str {
            &self.keyword
        }
    }

    /// In-memory lookup that counts how often it is queried.
    struct FixtureLookup {
        records: MultiMap<String, CosmicRecord>,
        calls: Cell<usize>,
    }

    impl FixtureLookup {
        fn new(records: Vec<CosmicRecord>) -> Self {
            let mut grouped = MultiMap::new();
            for record in records {
                grouped.insert(record.keyword.clone(), record);
            }
            FixtureLookup { records: grouped, calls: Cell::new(0) }
        }
    }

    impl KeywordLookup for FixtureLookup {
        fn records_by_keywords(
            &self,
            keywords: &HashSet<String>,
        ) -> Result<MultiMap<String, CosmicRecord>> {
            self.calls.set(self.calls.get() + 1);
            let mut grouped = MultiMap::new();
            for keyword in keywords {
                if let Some(records) = self.records.get_vec(keyword) {
                    for record in records {
                        grouped.insert(keyword.clone(), record.clone());
                    }
                }
            }
            Ok(grouped)
        }
    }

    fn record(id: &str, keyword: &str, aa: &str, freq: u32) -> CosmicRecord {
        CosmicRecord {
            id: id.to_owned(),
            keyword: keyword.to_owned(),
            amino_acid_change: aa.to_owned(),
            frequency: freq,
            ..Default::default()
        }
    }

    #[test]
    fn test_join_groups_by_event() {
        let lookup = FixtureLookup::new(vec![
            record("C1", "BRAF_V600E", "V600E", 50),
            record("C2", "BRAF_V600E", "V600K", 3),
        ]);
        let events = [Event::new(1, "BRAF_V600E"), Event::new(2, "KRAS_G12D")];

        let result = frequencies_for_events(&lookup, &events)
            .ok().expect("Error joining events");

        assert_eq!(result.len(), 1);
        let changes = &result[&1];
        assert_eq!(changes.len(), 2);
        assert_eq!(changes["V600E"], 50);
        assert_eq!(changes["V600K"], 3);
        assert!(!result.contains_key(&2));
    }

    #[test]
    fn test_absent_keyword_has_no_entry() {
        let lookup = FixtureLookup::new(vec![record("C1", "TP53_R175H", "R175H", 12)]);
        let events = [Event::new(7, "EGFR_L858R")];

        let result = frequencies_for_events(&lookup, &events)
            .ok().expect("Error joining events");

        // absent means no entry at all, not an empty table
        assert!(result.is_empty());
    }

    #[test]
    fn test_single_lookup_per_batch() {
        let lookup = FixtureLookup::new(vec![
            record("C1", "BRAF_V600E", "V600E", 50),
            record("C3", "KRAS_G12D", "G12D", 120),
        ]);
        let events = [
            Event::new(1, "BRAF_V600E"),
            Event::new(2, "KRAS_G12D"),
            Event::new(3, "BRAF_V600E"),
            Event::new(4, "IDH1_R132H"),
        ];

        let result = frequencies_for_events(&lookup, &events)
            .ok().expect("Error joining events");

        assert_eq!(lookup.calls.get(), 1);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_empty_events_skip_lookup() {
        let lookup = FixtureLookup::new(vec![record("C1", "BRAF_V600E", "V600E", 50)]);
        let events: [Event; 0] = [];

        let result = frequencies_for_events(&lookup, &events)
            .ok().expect("Error joining events");

        assert!(result.is_empty());
        assert_eq!(lookup.calls.get(), 0);
    }

    #[test]
    fn test_duplicate_change_last_record_wins() {
        let lookup = FixtureLookup::new(vec![
            record("C1", "BRAF_V600E", "V600E", 50),
            record("C9", "BRAF_V600E", "V600E", 8),
        ]);
        let events = [Event::new(1, "BRAF_V600E")];

        let result = frequencies_for_events(&lookup, &events)
            .ok().expect("Error joining events");

        let changes = &result[&1];
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["V600E"], 8);
    }

    #[test]
    fn test_events_sharing_keyword() {
        let lookup = FixtureLookup::new(vec![record("C1", "BRAF_V600E", "V600E", 50)]);
        let events = [Event::new(1, "BRAF_V600E"), Event::new(2, "BRAF_V600E")];

        let result = frequencies_for_events(&lookup, &events)
            .ok().expect("Error joining events");

        assert_eq!(lookup.calls.get(), 1);
        assert_eq!(result[&1], result[&2]);
    }

    #[test]
    fn test_empty_keyword_is_ordinary() {
        let lookup = FixtureLookup::new(vec![record("C5", "", "", 4)]);
        let events = [Event::new(1, "")];

        let result = frequencies_for_events(&lookup, &events)
            .ok().expect("Error joining events");

        assert_eq!(result[&1][""], 4);
    }

    #[test]
    fn test_join_is_idempotent() {
        let lookup = FixtureLookup::new(vec![
            record("C1", "BRAF_V600E", "V600E", 50),
            record("C2", "BRAF_V600E", "V600K", 3),
        ]);
        let events = [Event::new(1, "BRAF_V600E")];

        let first = frequencies_for_events(&lookup, &events)
            .ok().expect("Error joining events");
        let second = frequencies_for_events(&lookup, &events)
            .ok().expect("Error joining events");

        assert_eq!(first, second);
    }
}
