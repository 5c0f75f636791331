//! In-memory tables held by the stores.
//!
//! [`EntityTable`] normalises records by identity: `entities` maps id to record and `ids` keeps
//! first-seen order for "select all". The two always hold the same set of ids. [`EntityList`] is
//! the simpler shape used for fees and the activity log, where the whole sequence is replaced.

use clinic_types::Entity;
use std::collections::HashMap;

// ============================================================================
// REQUEST FLAGS
// ============================================================================

/// Loading/error/freshness flags shared by every table shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestFlags {
    pub loading: bool,
    pub error: Option<String>,
    /// Milliseconds since epoch of the last successful fetch.
    pub last_fetched: Option<i64>,
}

impl RequestFlags {
    /// A request is starting: clears the previous error before raising `loading`.
    pub fn begin(&mut self) {
        self.error = None;
        self.loading = true;
    }

    /// The request finished without error.
    pub fn settle(&mut self) {
        self.loading = false;
    }

    /// The request failed.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }
}

// ============================================================================
// ENTITY TABLE
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct EntityTable<E> {
    entities: HashMap<i64, E>,
    ids: Vec<i64>,
    flags: RequestFlags,
}

impl<E> Default for EntityTable<E> {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
            ids: Vec::new(),
            flags: RequestFlags::default(),
        }
    }
}

impl<E: Entity> EntityTable<E> {
    /// Inserts or wholly replaces each record by identity and stamps `last_fetched`.
    ///
    /// Records without a usable identity are skipped. New ids are appended in the order they are
    /// first seen. Returns the number of records stored.
    pub fn upsert_many(&mut self, rows: impl IntoIterator<Item = E>, now_millis: i64) -> usize {
        let mut stored = 0;
        for row in rows {
            let Some(id) = row.id() else {
                tracing::debug!("skipping {} without a usable {}", E::SINGULAR, E::ID_FIELD);
                continue;
            };
            if self.entities.insert(id, row).is_none() {
                self.ids.push(id);
            }
            stored += 1;
        }
        self.flags.last_fetched = Some(now_millis);
        stored
    }

    pub fn upsert_one(&mut self, row: E, now_millis: i64) -> usize {
        self.upsert_many([row], now_millis)
    }
}

impl<E: Clone> EntityTable<E> {
    /// Every record in `ids` order.
    pub fn select_all(&self) -> Vec<E> {
        self.ids
            .iter()
            .filter_map(|id| self.entities.get(id).cloned())
            .collect()
    }
}

impl<E> EntityTable<E> {
    /// Removes `id` from both collections. Returns whether it was present.
    pub fn remove(&mut self, id: i64) -> bool {
        let removed = self.entities.remove(&id).is_some();
        self.ids.retain(|x| *x != id);
        removed
    }

    pub fn get(&self, id: i64) -> Option<&E> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_loading(&self) -> bool {
        self.flags.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.flags.error.as_deref()
    }

    pub fn last_fetched(&self) -> Option<i64> {
        self.flags.last_fetched
    }

    pub fn flags(&self) -> &RequestFlags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut RequestFlags {
        &mut self.flags
    }
}

// ============================================================================
// ENTITY LIST
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct EntityList<T> {
    data: Vec<T>,
    flags: RequestFlags,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            flags: RequestFlags::default(),
        }
    }
}

impl<T> EntityList<T> {
    /// Replaces the whole sequence and stamps `last_fetched`.
    pub fn replace(&mut self, data: Vec<T>, now_millis: i64) {
        self.data = data;
        self.flags.last_fetched = Some(now_millis);
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }

    pub fn is_loading(&self) -> bool {
        self.flags.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.flags.error.as_deref()
    }

    pub fn last_fetched(&self) -> Option<i64> {
        self.flags.last_fetched
    }

    pub fn flags(&self) -> &RequestFlags {
        &self.flags
    }

    pub fn flags_mut(&mut self) -> &mut RequestFlags {
        &mut self.flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_types::Doctor;

    fn doctor(id: Option<i64>, name: &str) -> Doctor {
        Doctor {
            doctor_id: id,
            doctor_name: name.into(),
            ..Doctor::default()
        }
    }

    fn assert_ids_match_entities(table: &EntityTable<Doctor>) {
        let mut ids = table.ids().to_vec();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), table.ids().len(), "ids must be duplicate-free");
        assert_eq!(ids.len(), table.entities.len());
        assert!(ids.iter().all(|id| table.contains(*id)));
    }

    #[test]
    fn test_upsert_keeps_first_seen_order() {
        let mut table = EntityTable::default();
        table.upsert_many([doctor(Some(2), "B"), doctor(Some(1), "A")], 10);

        assert_eq!(table.ids(), &[2, 1]);
        assert_eq!(table.last_fetched(), Some(10));
        assert_ids_match_entities(&table);
    }

    #[test]
    fn test_upsert_skips_records_without_identity() {
        let mut table = EntityTable::default();
        let stored = table.upsert_many([doctor(None, "Nobody"), doctor(Some(4), "D")], 1);

        assert_eq!(stored, 1);
        assert_eq!(table.count(), 1);
        assert_eq!(table.select_all()[0].doctor_name, "D");
    }

    #[test]
    fn test_upsert_replaces_existing_record_wholesale() {
        let mut table = EntityTable::default();
        let mut original = doctor(Some(1), "A");
        original.doctor_email = Some("a@clinic.test".into());
        table.upsert_one(original, 1);

        table.upsert_one(doctor(Some(1), "X"), 2);

        let stored = table.get(1).expect("doctor 1 should exist");
        assert_eq!(stored.doctor_name, "X");
        assert_eq!(stored.doctor_email, None, "no field-level merge");
        assert_eq!(table.ids(), &[1]);
        assert_ids_match_entities(&table);
    }

    #[test]
    fn test_remove_clears_both_collections() {
        let mut table = EntityTable::default();
        table.upsert_many([doctor(Some(1), "A"), doctor(Some(2), "B")], 1);

        assert!(table.remove(1));
        assert!(!table.remove(1));
        assert_eq!(table.ids(), &[2]);
        assert_ids_match_entities(&table);
    }

    #[test]
    fn test_flags_begin_clears_error() {
        let mut flags = RequestFlags::default();
        flags.fail("boom");
        assert_eq!(flags.error.as_deref(), Some("boom"));
        assert!(!flags.loading);

        flags.begin();
        assert!(flags.loading);
        assert_eq!(flags.error, None);
    }

    #[test]
    fn test_list_replace_stamps_fetch_time() {
        let mut list = EntityList::default();
        list.replace(vec![1, 2, 3], 99);
        list.replace(vec![4], 100);

        assert_eq!(list.data(), &[4]);
        assert_eq!(list.last_fetched(), Some(100));
    }
}
