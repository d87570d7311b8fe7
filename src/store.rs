//! The travel store: the single authority for selection, travel records and
//! saved status.
//!
//! The store is an explicit context object owned by the application and
//! passed by reference to whatever reads or mutates it. Every action runs
//! synchronously; subscribers are notified right after an action changes
//! state, so a callback always observes the post-mutation values.

use crate::types::{Country, CountryCode, TravelRecord};
use chrono::Utc;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

/// Describes which action changed the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    /// The selection was replaced
    SelectionChanged(Option<CountryCode>),
    /// A record was inserted or replaced through `upsert_record`
    RecordUpserted(CountryCode),
    /// A default record was materialized by `ensure_initialized`
    RecordInitialized(CountryCode),
    /// A country's planned flag was set
    CountryPlanned(CountryCode),
    /// A code was added to the saved set
    CountrySaved(CountryCode),
    /// Persisted records were loaded in bulk
    Hydrated(usize),
    /// A record and its saved status were removed
    RecordDiscarded(CountryCode),
    /// Every record was removed
    RecordsCleared,
}

/// Handle returned by [`TravelStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&TravelStore, &StoreChange)>;

/// In-memory state of the planner.
pub struct TravelStore {
    countries: Vec<Country>,
    selected: Option<CountryCode>,
    records: BTreeMap<CountryCode, TravelRecord>,
    saved: BTreeSet<CountryCode>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Default for TravelStore {
    fn default() -> Self {
        Self::new(crate::countries::reference_countries())
    }
}

impl std::fmt::Debug for TravelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TravelStore")
            .field("countries", &self.countries.len())
            .field("selected", &self.selected)
            .field("records", &self.records.keys().collect::<Vec<_>>())
            .field("saved", &self.saved)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl TravelStore {
    /// Creates an empty store over the given reference list.
    pub fn new(countries: Vec<Country>) -> Self {
        Self {
            countries,
            selected: None,
            records: BTreeMap::new(),
            saved: BTreeSet::new(),
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Replaces the current selection. Unknown codes are accepted as-is.
    pub fn select(&mut self, code: Option<&str>) {
        let code = code.map(str::to_string);
        log::debug!("selection changed to {:?}", code);
        self.selected = code.clone();
        self.notify(StoreChange::SelectionChanged(code));
    }

    /// Inserts or replaces the record for `code`, stamping the current time.
    pub fn upsert_record(&mut self, code: &str, mut record: TravelRecord) {
        record.last_updated = Utc::now();
        self.records.insert(code.to_string(), record);
        self.notify(StoreChange::RecordUpserted(code.to_string()));
    }

    /// Returns the stored record for `code`, or a fresh default one without
    /// storing it.
    ///
    /// # Returns
    ///
    /// `None` if there is no stored record and `code` is not a known country.
    pub fn get_record(&self, code: &str) -> Option<Cow<'_, TravelRecord>> {
        if let Some(record) = self.records.get(code) {
            return Some(Cow::Borrowed(record));
        }
        self.default_record(code).map(Cow::Owned)
    }

    /// Inserts a default record for `code` unless one already exists.
    ///
    /// Unknown codes are ignored.
    pub fn ensure_initialized(&mut self, code: &str) {
        if self.records.contains_key(code) {
            return;
        }
        if let Some(record) = self.default_record(code) {
            self.records.insert(code.to_string(), record);
            self.notify(StoreChange::RecordInitialized(code.to_string()));
        }
    }

    /// Sets the planned flag of the matching country. Unknown codes are ignored.
    pub fn mark_planned(&mut self, code: &str) {
        let Some(country) = self.countries.iter_mut().find(|c| c.code == code) else {
            return;
        };
        country.planned = true;
        self.notify(StoreChange::CountryPlanned(code.to_string()));
    }

    /// Adds `code` to the saved set.
    pub fn mark_saved(&mut self, code: &str) {
        if self.saved.insert(code.to_string()) {
            self.notify(StoreChange::CountrySaved(code.to_string()));
        }
    }

    /// Loads persisted records, keeping their stored timestamps.
    ///
    /// Every loaded code is marked planned and saved since it came from a
    /// confirmed save.
    pub fn hydrate(&mut self, records: BTreeMap<CountryCode, TravelRecord>) {
        let count = records.len();
        for (code, record) in records {
            if let Some(country) = self.countries.iter_mut().find(|c| c.code == code) {
                country.planned = true;
            }
            self.saved.insert(code.clone());
            self.records.insert(code, record);
        }
        log::info!("hydrated {} travel records", count);
        self.notify(StoreChange::Hydrated(count));
    }

    /// Removes the record for `code` along with its saved and planned status.
    pub fn discard_record(&mut self, code: &str) {
        let removed = self.records.remove(code).is_some();
        self.saved.remove(code);
        if let Some(country) = self.countries.iter_mut().find(|c| c.code == code) {
            country.planned = false;
        }
        if removed {
            self.notify(StoreChange::RecordDiscarded(code.to_string()));
        }
    }

    /// Removes every record and clears all saved and planned status.
    pub fn clear_records(&mut self) {
        self.records.clear();
        self.saved.clear();
        for country in &mut self.countries {
            country.planned = false;
        }
        self.notify(StoreChange::RecordsCleared);
    }

    /// Registers a callback invoked after every state-changing action.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&TravelStore, &StoreChange) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a callback. Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Currently selected country code.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The reference list, including planned flags.
    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    /// Looks up a country by code.
    pub fn country(&self, code: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.code == code)
    }

    /// All records currently held, including unsaved defaults.
    pub fn records(&self) -> &BTreeMap<CountryCode, TravelRecord> {
        &self.records
    }

    /// Codes whose plans were confirmed saved.
    pub fn saved(&self) -> &BTreeSet<CountryCode> {
        &self.saved
    }

    pub fn is_saved(&self, code: &str) -> bool {
        self.saved.contains(code)
    }

    /// Number of countries with a confirmed save.
    pub fn planned_count(&self) -> usize {
        self.saved.len()
    }

    fn default_record(&self, code: &str) -> Option<TravelRecord> {
        self.country(code)
            .map(|country| TravelRecord::empty(code, &country.name))
    }

    fn notify(&mut self, change: StoreChange) {
        // Callbacks only get `&TravelStore`, so they cannot touch the list while it is taken.
        let mut subscribers = std::mem::take(&mut self.subscribers);
        for (_, callback) in subscribers.iter_mut() {
            callback(self, &change);
        }
        self.subscribers = subscribers;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store() -> TravelStore {
        TravelStore::new(vec![
            Country::new("FR", "France", 46.2276, 2.2137),
            Country::new("JP", "Japan", 36.2048, 138.2529),
        ])
    }

    #[test]
    fn test_select_accepts_unknown_codes() {
        let mut store = store();
        store.select(Some("FR"));
        assert_eq!(store.selected(), Some("FR"));
        store.select(Some("XX"));
        assert_eq!(store.selected(), Some("XX"));
        store.select(None);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_upsert_then_get_round_trips_modulo_timestamp() {
        let mut store = store();
        let mut record = TravelRecord::empty("JP", "Japan");
        record.last_updated = chrono::DateTime::<Utc>::default();
        record.custom_details.attractions = vec!["Fushimi Inari".into()];
        record.standard_travel.flights.price = 850.0;

        store.upsert_record("JP", record.clone());
        let stored = store.get_record("JP").unwrap();

        assert!(stored.same_content(&record));
        assert!(stored.last_updated > record.last_updated);
        assert!(matches!(stored, Cow::Borrowed(_)));
    }

    #[test]
    fn test_get_record_synthesizes_without_inserting() {
        let store = store();
        let record = store.get_record("FR").unwrap();

        assert!(matches!(record, Cow::Owned(_)));
        assert_eq!(record.country_name, "France");
        assert_eq!(record.standard_travel.flights.price, 0.0);
        assert_eq!(record.standard_travel.accommodation.price, 0.0);
        assert_eq!(record.standard_travel.transportation.rental_car.price, 0.0);
        assert!(record.standard_travel.flights.departure.is_empty());
        assert!(record.custom_details.activities.is_empty());
        assert_eq!(record.custom_details.budget, 0.0);
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_get_record_unknown_code_is_none() {
        let store = store();
        assert!(store.get_record("XX").is_none());
    }

    #[test]
    fn test_ensure_initialized_is_idempotent() {
        let mut store = store();
        store.ensure_initialized("FR");
        let first = store.records()["FR"].clone();

        store.ensure_initialized("FR");
        assert_eq!(store.records().len(), 1);
        assert_eq!(store.records()["FR"], first);

        store.ensure_initialized("XX");
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn test_ensure_initialized_does_not_overwrite() {
        let mut store = store();
        let mut record = TravelRecord::empty("FR", "France");
        record.custom_details.notes = "keep me".into();
        store.upsert_record("FR", record);

        store.ensure_initialized("FR");
        assert_eq!(store.records()["FR"].custom_details.notes, "keep me");
    }

    #[test]
    fn test_mark_planned_sets_flag_and_ignores_unknown() {
        let mut store = store();
        store.mark_planned("JP");
        store.mark_planned("XX");
        assert!(store.country("JP").unwrap().planned);
        assert!(!store.country("FR").unwrap().planned);
    }

    #[test]
    fn test_mark_saved_is_idempotent() {
        let mut once = store();
        once.mark_saved("FR");

        let mut twice = store();
        twice.mark_saved("FR");
        twice.mark_saved("FR");

        assert_eq!(once.saved(), twice.saved());
        assert_eq!(twice.planned_count(), 1);
    }

    #[test]
    fn test_hydrate_marks_planned_and_saved_keeping_timestamps() {
        let mut store = store();
        let mut record = TravelRecord::empty("FR", "France");
        record.last_updated = chrono::DateTime::<Utc>::default();
        let mut records = BTreeMap::new();
        records.insert("FR".to_string(), record.clone());

        store.hydrate(records);

        assert_eq!(store.records()["FR"], record);
        assert!(store.is_saved("FR"));
        assert!(store.country("FR").unwrap().planned);
    }

    #[test]
    fn test_discard_record_clears_status() {
        let mut store = store();
        store.upsert_record("FR", TravelRecord::empty("FR", "France"));
        store.mark_planned("FR");
        store.mark_saved("FR");

        store.discard_record("FR");

        assert!(store.records().is_empty());
        assert!(!store.is_saved("FR"));
        assert!(!store.country("FR").unwrap().planned);
    }

    #[test]
    fn test_clear_records_resets_everything() {
        let mut store = store();
        for code in ["FR", "JP"] {
            store.ensure_initialized(code);
            store.mark_planned(code);
            store.mark_saved(code);
        }

        store.clear_records();

        assert!(store.records().is_empty());
        assert!(store.saved().is_empty());
        assert!(store.countries().iter().all(|c| !c.planned));
    }

    #[test]
    fn test_saved_set_stays_within_records() {
        let mut store = store();
        store.ensure_initialized("FR");
        store.mark_saved("FR");
        store.upsert_record("JP", TravelRecord::empty("JP", "Japan"));
        store.mark_saved("JP");
        store.discard_record("JP");

        assert!(store.saved().iter().all(|code| store.records().contains_key(code)));
    }

    #[test]
    fn test_subscribers_observe_post_mutation_state() {
        let mut store = store();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(move |store, change| {
            sink.borrow_mut()
                .push((change.clone(), store.selected().map(str::to_string)));
        });

        store.select(Some("JP"));
        store.mark_saved("JP");
        store.mark_saved("JP");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(
            seen[0],
            (StoreChange::SelectionChanged(Some("JP".into())), Some("JP".into()))
        );
        assert_eq!(seen[1].0, StoreChange::CountrySaved("JP".into()));
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut store = store();
        let count = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&count);
        let id = store.subscribe(move |_, _| *counter.borrow_mut() += 1);

        store.select(Some("FR"));
        assert!(store.unsubscribe(id));
        store.select(None);

        assert_eq!(*count.borrow(), 1);
        assert!(!store.unsubscribe(id));
    }
}
