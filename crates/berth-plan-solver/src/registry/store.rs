// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
use crate::registry::err::StoreError;
use berth_plan_model::prelude::{
    EntryDraft, EntryIdentifier, GenerationIdentifier, Placement, ScheduleEntry,
    ScheduleValidator, ValidationError,
};
use parking_lot::RwLock;
use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    ops::Bound,
    sync::atomic::{AtomicU64, Ordering},
};

/// Persistence of schedule generations.
///
/// A generation is written once by [`VersionStore::append_generation`] and
/// afterwards only changes through copy-based replacement: the replacing
/// row gets a fresh entry id and the replaced row stays readable, marked
/// as superseded.
pub trait VersionStore: Send + Sync {
    fn latest_generation_id(&self) -> Result<Option<GenerationIdentifier>, StoreError>;

    /// Current (not superseded) rows of `generation`, in entry id order.
    fn entries_for_generation(
        &self,
        generation: GenerationIdentifier,
    ) -> Result<Vec<ScheduleEntry>, StoreError>;

    /// Every row ever written for `generation`, superseded ones included.
    fn history_for_generation(
        &self,
        generation: GenerationIdentifier,
    ) -> Result<Vec<ScheduleEntry>, StoreError>;

    fn append_generation(&self, drafts: Vec<EntryDraft>)
    -> Result<GenerationIdentifier, StoreError>;

    fn get_entry(&self, id: EntryIdentifier) -> Result<Option<ScheduleEntry>, StoreError>;

    /// Replaces every listed row or none of them. The returned rows are the
    /// new versions, in batch order.
    fn replace_entries(
        &self,
        batch: &[(EntryIdentifier, EntryDraft)],
    ) -> Result<Vec<ScheduleEntry>, StoreError>;

    fn replace_entry(
        &self,
        id: EntryIdentifier,
        draft: EntryDraft,
    ) -> Result<ScheduleEntry, StoreError> {
        self.replace_entries(&[(id, draft)])?
            .into_iter()
            .next()
            .ok_or(StoreError::EntryNotFound(id))
    }

    /// Withdraws rows written by [`VersionStore::replace_entries`]: each listed
    /// row is removed and the row it replaced becomes current again. All or
    /// nothing; a listed row that has itself been replaced since fails the
    /// whole call.
    fn revert_replacements(&self, written: &[EntryIdentifier]) -> Result<(), StoreError>;

    /// Up to `limit` rows with an id strictly greater than `cursor`, in id
    /// order. `None` starts from the beginning.
    fn rows_after(
        &self,
        cursor: Option<EntryIdentifier>,
        limit: usize,
    ) -> Result<Vec<ScheduleEntry>, StoreError>;
}

#[derive(Debug, Default)]
struct Inner {
    rows: BTreeMap<EntryIdentifier, ScheduleEntry>,
    generations: BTreeMap<GenerationIdentifier, Vec<EntryIdentifier>>,
}

impl Inner {
    fn generation_rows(
        &self,
        generation: GenerationIdentifier,
    ) -> Result<impl Iterator<Item = &ScheduleEntry> + '_, StoreError> {
        let ids = self
            .generations
            .get(&generation)
            .ok_or(StoreError::GenerationNotFound(generation))?;
        Ok(ids.iter().filter_map(|id| self.rows.get(id)))
    }
}

/// Process-local [`VersionStore`].
///
/// Readers share the lock; writers take it exclusively. Generation and entry
/// ids are drawn from counters that are only advanced while the write lock is
/// held, so concurrent appends never observe or hand out the same id.
#[derive(Debug)]
pub struct InMemoryVersionStore {
    inner: RwLock<Inner>,
    next_generation: AtomicU64,
    next_entry: AtomicU64,
}

impl Default for InMemoryVersionStore {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            next_generation: AtomicU64::new(1),
            next_entry: AtomicU64::new(1),
        }
    }
}

impl InMemoryVersionStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.inner.read().rows.len()
    }

    #[inline]
    fn allocate_entry_id(&self) -> EntryIdentifier {
        EntryIdentifier::new(self.next_entry.fetch_add(1, Ordering::Relaxed))
    }

    fn check_generation<P: Placement>(rows: &[P]) -> Result<(), ValidationError> {
        ScheduleValidator::validate_intervals(rows)?;
        ScheduleValidator::validate_unique_vessels(rows)?;
        ScheduleValidator::validate_no_overlap(rows)?;
        Ok(())
    }
}

impl VersionStore for InMemoryVersionStore {
    fn latest_generation_id(&self) -> Result<Option<GenerationIdentifier>, StoreError> {
        Ok(self.inner.read().generations.keys().next_back().copied())
    }

    fn entries_for_generation(
        &self,
        generation: GenerationIdentifier,
    ) -> Result<Vec<ScheduleEntry>, StoreError> {
        let inner = self.inner.read();
        Ok(inner
            .generation_rows(generation)?
            .filter(|e| e.is_current())
            .copied()
            .collect())
    }

    fn history_for_generation(
        &self,
        generation: GenerationIdentifier,
    ) -> Result<Vec<ScheduleEntry>, StoreError> {
        let inner = self.inner.read();
        Ok(inner.generation_rows(generation)?.copied().collect())
    }

    #[tracing::instrument(level = "debug", skip(self, drafts), fields(rows = drafts.len()))]
    fn append_generation(
        &self,
        drafts: Vec<EntryDraft>,
    ) -> Result<GenerationIdentifier, StoreError> {
        Self::check_generation(&drafts)?;

        let mut inner = self.inner.write();
        let generation =
            GenerationIdentifier::new(self.next_generation.fetch_add(1, Ordering::Relaxed));
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = self.allocate_entry_id();
            inner
                .rows
                .insert(id, ScheduleEntry::from_draft(id, generation, draft));
            ids.push(id);
        }
        tracing::debug!(%generation, rows = ids.len(), "Generation appended");
        inner.generations.insert(generation, ids);
        Ok(generation)
    }

    fn get_entry(&self, id: EntryIdentifier) -> Result<Option<ScheduleEntry>, StoreError> {
        Ok(self.inner.read().rows.get(&id).copied())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(rows = batch.len()))]
    fn replace_entries(
        &self,
        batch: &[(EntryIdentifier, EntryDraft)],
    ) -> Result<Vec<ScheduleEntry>, StoreError> {
        let mut inner = self.inner.write();

        let mut seen = HashSet::with_capacity(batch.len());
        let mut touched = BTreeSet::new();
        for (id, _) in batch {
            if !seen.insert(*id) {
                return Err(StoreError::DuplicateReplacement(*id));
            }
            let row = inner.rows.get(id).ok_or(StoreError::EntryNotFound(*id))?;
            if !row.is_current() {
                return Err(StoreError::EntrySuperseded(*id));
            }
            touched.insert(row.generation());
        }

        // Post-write state of every touched generation, checked before any row moves.
        let replacement: BTreeMap<EntryIdentifier, &EntryDraft> =
            batch.iter().map(|(id, d)| (*id, d)).collect();
        for generation in &touched {
            let after: Vec<EntryDraft> = inner
                .generation_rows(*generation)?
                .filter(|e| e.is_current())
                .map(|e| {
                    replacement
                        .get(&e.id())
                        .map_or_else(|| e.to_draft(), |d| **d)
                })
                .collect();
            Self::check_generation(&after)?;
        }

        let mut written = Vec::with_capacity(batch.len());
        for (old_id, draft) in batch {
            let new_id = self.allocate_entry_id();
            let Some(old) = inner.rows.get_mut(old_id) else {
                return Err(StoreError::EntryNotFound(*old_id));
            };
            old.mark_superseded(new_id);
            let generation = old.generation();
            let row = ScheduleEntry::from_draft(new_id, generation, *draft);
            inner.rows.insert(new_id, row);
            inner.generations.entry(generation).or_default().push(new_id);
            tracing::trace!(old = %old_id, new = %new_id, "Entry replaced");
            written.push(row);
        }
        Ok(written)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(rows = written.len()))]
    fn revert_replacements(&self, written: &[EntryIdentifier]) -> Result<(), StoreError> {
        let mut inner = self.inner.write();

        let mut plan = Vec::with_capacity(written.len());
        for id in written {
            let row = inner.rows.get(id).ok_or(StoreError::EntryNotFound(*id))?;
            if !row.is_current() {
                return Err(StoreError::EntrySuperseded(*id));
            }
            let generation = row.generation();
            let predecessor = inner
                .generation_rows(generation)?
                .find(|e| e.superseded_by() == Some(*id))
                .map(|e| e.id())
                .ok_or(StoreError::NotAReplacement(*id))?;
            plan.push((*id, generation, predecessor));
        }

        for (id, generation, predecessor) in plan {
            inner.rows.remove(&id);
            if let Some(ids) = inner.generations.get_mut(&generation) {
                ids.retain(|e| *e != id);
            }
            if let Some(row) = inner.rows.get_mut(&predecessor) {
                row.clear_superseded();
            }
            tracing::trace!(withdrawn = %id, restored = %predecessor, "Replacement reverted");
        }
        Ok(())
    }

    fn rows_after(
        &self,
        cursor: Option<EntryIdentifier>,
        limit: usize,
    ) -> Result<Vec<ScheduleEntry>, StoreError> {
        let inner = self.inner.read();
        let lower = cursor.map_or(Bound::Unbounded, Bound::Excluded);
        Ok(inner
            .rows
            .range((lower, Bound::Unbounded))
            .take(limit)
            .map(|(_, row)| *row)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use berth_plan_core::prelude::{TimeInterval, TimePoint};
    use berth_plan_model::prelude::{BerthIdentifier, VesselIdentifier};
    use std::sync::Arc;

    #[inline]
    fn iv(a: i64, b: i64) -> TimeInterval<i64> {
        TimeInterval::new(TimePoint::new(a), TimePoint::new(b))
    }
    #[inline]
    fn draft(vessel: u64, berth: u32, a: i64, b: i64) -> EntryDraft {
        EntryDraft::new(VesselIdentifier::new(vessel), BerthIdentifier::new(berth), iv(a, b))
    }
    #[inline]
    fn gid(n: u64) -> GenerationIdentifier {
        GenerationIdentifier::new(n)
    }
    #[inline]
    fn eid(n: u64) -> EntryIdentifier {
        EntryIdentifier::new(n)
    }

    #[test]
    fn test_empty_store_has_no_generation() {
        let store = InMemoryVersionStore::new();
        assert_eq!(store.latest_generation_id().unwrap(), None);
        assert_eq!(
            store.entries_for_generation(gid(1)).unwrap_err(),
            StoreError::GenerationNotFound(gid(1))
        );
        assert!(store.get_entry(eid(1)).unwrap().is_none());
    }

    #[test]
    fn test_append_allocates_increasing_ids() {
        let store = InMemoryVersionStore::new();
        let g1 = store
            .append_generation(vec![draft(1, 1, 0, 10), draft(2, 1, 10, 20)])
            .unwrap();
        let g2 = store.append_generation(vec![draft(1, 2, 0, 10)]).unwrap();
        assert_eq!(g1, gid(1));
        assert_eq!(g2, gid(2));
        assert_eq!(store.latest_generation_id().unwrap(), Some(g2));

        let rows = store.entries_for_generation(g1).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.generation() == g1 && r.is_current()));
        assert_eq!(store.entries_for_generation(g2).unwrap()[0].id(), eid(3));
    }

    #[test]
    fn test_empty_generation_is_allowed() {
        let store = InMemoryVersionStore::new();
        let g = store.append_generation(Vec::new()).unwrap();
        assert!(store.entries_for_generation(g).unwrap().is_empty());
    }

    #[test]
    fn test_append_rejects_broken_generation_without_consuming_an_id() {
        let store = InMemoryVersionStore::new();
        let err = store
            .append_generation(vec![draft(1, 1, 0, 10), draft(2, 1, 5, 15)])
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(ValidationError::Overlap(_))));

        let err = store
            .append_generation(vec![draft(1, 1, 0, 10), draft(1, 2, 0, 10)])
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Rejected(ValidationError::DuplicateVessel(_))
        ));

        assert_eq!(store.append_generation(vec![draft(1, 1, 0, 10)]).unwrap(), gid(1));
        assert_eq!(store.row_count(), 1);
    }

    #[test]
    fn test_replace_keeps_old_row_as_superseded() {
        let store = InMemoryVersionStore::new();
        let g = store.append_generation(vec![draft(1, 1, 0, 10)]).unwrap();
        let old = store.entries_for_generation(g).unwrap()[0];

        let new = store.replace_entry(old.id(), draft(1, 2, 0, 10)).unwrap();
        assert_ne!(new.id(), old.id());
        assert_eq!(new.generation(), g);
        assert_eq!(new.berth(), BerthIdentifier::new(2));

        let kept = store.get_entry(old.id()).unwrap().unwrap();
        assert_eq!(kept.superseded_by(), Some(new.id()));
        assert_eq!(kept.berth(), BerthIdentifier::new(1));

        assert_eq!(store.entries_for_generation(g).unwrap(), vec![new]);
        assert_eq!(store.history_for_generation(g).unwrap().len(), 2);
    }

    #[test]
    fn test_superseded_row_cannot_be_replaced_again() {
        let store = InMemoryVersionStore::new();
        let g = store.append_generation(vec![draft(1, 1, 0, 10)]).unwrap();
        let old = store.entries_for_generation(g).unwrap()[0];
        store.replace_entry(old.id(), draft(1, 1, 5, 15)).unwrap();
        assert_eq!(
            store.replace_entry(old.id(), draft(1, 1, 20, 30)).unwrap_err(),
            StoreError::EntrySuperseded(old.id())
        );
    }

    #[test]
    fn test_batch_with_missing_row_changes_nothing() {
        let store = InMemoryVersionStore::new();
        let g = store
            .append_generation(vec![draft(1, 1, 0, 10), draft(2, 2, 0, 10)])
            .unwrap();
        let before = store.history_for_generation(g).unwrap();

        let err = store
            .replace_entries(&[(eid(1), draft(1, 3, 0, 10)), (eid(99), draft(2, 3, 20, 30))])
            .unwrap_err();
        assert_eq!(err, StoreError::EntryNotFound(eid(99)));
        assert_eq!(store.history_for_generation(g).unwrap(), before);
    }

    #[test]
    fn test_batch_naming_a_row_twice_is_rejected() {
        let store = InMemoryVersionStore::new();
        let _g = store.append_generation(vec![draft(1, 1, 0, 10)]).unwrap();
        let err = store
            .replace_entries(&[(eid(1), draft(1, 1, 0, 5)), (eid(1), draft(1, 1, 5, 10))])
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateReplacement(eid(1)));
    }

    #[test]
    fn test_replacement_creating_overlap_is_rejected() {
        let store = InMemoryVersionStore::new();
        let g = store
            .append_generation(vec![draft(1, 1, 0, 10), draft(2, 2, 0, 10)])
            .unwrap();
        let err = store.replace_entry(eid(2), draft(2, 1, 5, 12)).unwrap_err();
        assert!(matches!(err, StoreError::Rejected(ValidationError::Overlap(_))));
        assert_eq!(store.history_for_generation(g).unwrap().len(), 2);

        // Swapping both vessels in one batch is fine: the check sees the final state.
        let swapped = store
            .replace_entries(&[(eid(1), draft(1, 2, 0, 10)), (eid(2), draft(2, 1, 0, 10))])
            .unwrap();
        assert_eq!(swapped.len(), 2);
        assert_eq!(swapped[0].id(), eid(3));
        assert_eq!(swapped[1].id(), eid(4));
    }

    #[test]
    fn test_concurrent_appends_get_distinct_contiguous_ids() {
        const THREADS: u64 = 8;
        const PER_THREAD: u64 = 25;

        let store = Arc::new(InMemoryVersionStore::new());
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..PER_THREAD)
                        .map(|i| {
                            store
                                .append_generation(vec![draft(t * 100 + i, 1, 0, 10)])
                                .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .map(|g| g.into_inner())
            .collect();
        ids.sort_unstable();
        let expected: Vec<u64> = (1..=THREADS * PER_THREAD).collect();
        assert_eq!(ids, expected);
        assert_eq!(store.row_count(), (THREADS * PER_THREAD) as usize);
    }

    #[test]
    fn test_rows_after_pages_in_id_order() {
        let store = InMemoryVersionStore::new();
        let _g = store
            .append_generation(vec![draft(1, 1, 0, 10), draft(2, 1, 10, 20), draft(3, 1, 20, 30)])
            .unwrap();
        store.replace_entry(eid(2), draft(2, 2, 10, 20)).unwrap();

        let first = store.rows_after(None, 2).unwrap();
        assert_eq!(first.iter().map(|r| r.id()).collect::<Vec<_>>(), vec![eid(1), eid(2)]);
        let rest = store.rows_after(Some(eid(2)), 10).unwrap();
        assert_eq!(rest.iter().map(|r| r.id()).collect::<Vec<_>>(), vec![eid(3), eid(4)]);
        assert!(store.rows_after(Some(eid(4)), 10).unwrap().is_empty());
    }

    #[test]
    fn test_revert_restores_replaced_rows() {
        let store = InMemoryVersionStore::new();
        let g = store
            .append_generation(vec![draft(1, 1, 0, 10), draft(2, 2, 0, 10)])
            .unwrap();
        let before = store.entries_for_generation(g).unwrap();

        let written = store
            .replace_entries(&[(eid(1), draft(1, 2, 0, 10)), (eid(2), draft(2, 1, 0, 10))])
            .unwrap();
        let ids: Vec<_> = written.iter().map(|r| r.id()).collect();
        store.revert_replacements(&ids).unwrap();

        assert_eq!(store.entries_for_generation(g).unwrap(), before);
        assert_eq!(store.history_for_generation(g).unwrap(), before);
        assert_eq!(store.row_count(), 2);
        assert!(store.get_entry(ids[0]).unwrap().is_none());
    }

    #[test]
    fn test_revert_refuses_rows_that_are_not_replacements() {
        let store = InMemoryVersionStore::new();
        let _g = store.append_generation(vec![draft(1, 1, 0, 10)]).unwrap();
        let new = store.replace_entry(eid(1), draft(1, 1, 5, 15)).unwrap();
        let newer = store.replace_entry(new.id(), draft(1, 1, 10, 20)).unwrap();

        assert_eq!(
            store.revert_replacements(&[eid(1)]).unwrap_err(),
            StoreError::EntrySuperseded(eid(1))
        );
        assert_eq!(
            store.revert_replacements(&[newer.id(), new.id()]).unwrap_err(),
            StoreError::EntrySuperseded(new.id())
        );
        assert_eq!(
            store.revert_replacements(&[eid(42)]).unwrap_err(),
            StoreError::EntryNotFound(eid(42))
        );
        assert_eq!(store.row_count(), 3);
    }
}
