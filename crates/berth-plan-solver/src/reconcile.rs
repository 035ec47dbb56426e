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
use crate::{
    err::{ConcurrencyConflictError, InvalidInputError, NotFoundError, PlanError},
    feedback::{EntryPair, FeedbackLogger},
    registry::{err::StorageError, store::VersionStore},
};
use berth_plan_model::prelude::{
    EntryDraft, EntryIdentifier, FeedbackRecord, FieldChangeSet, FleetView,
    GenerationIdentifier, HumanFix, ScheduleEntry, ScheduleValidator, ValidationError,
    VesselScheduleEntry,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// Entry ids currently held by an in-flight reconciliation batch.
#[derive(Debug, Default)]
pub struct EntryLocks {
    held: Mutex<HashSet<EntryIdentifier>>,
}

impl EntryLocks {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims every id or none. Fails on the first id another lease holds.
    pub fn try_claim(
        &self,
        ids: &[EntryIdentifier],
    ) -> Result<EntryLease<'_>, ConcurrencyConflictError> {
        let mut held = self.held.lock();
        if let Some(taken) = ids.iter().find(|id| held.contains(*id)) {
            return Err(ConcurrencyConflictError::EntryLocked(*taken));
        }
        held.extend(ids.iter().copied());
        Ok(EntryLease {
            locks: self,
            ids: ids.to_vec(),
        })
    }

    #[inline]
    pub fn is_held(&self, id: EntryIdentifier) -> bool {
        self.held.lock().contains(&id)
    }
}

/// Releases its ids when dropped.
#[derive(Debug)]
pub struct EntryLease<'l> {
    locks: &'l EntryLocks,
    ids: Vec<EntryIdentifier>,
}

impl EntryLease<'_> {
    #[inline]
    pub fn ids(&self) -> &[EntryIdentifier] {
        &self.ids
    }
}

impl Drop for EntryLease<'_> {
    fn drop(&mut self) {
        let mut held = self.locks.held.lock();
        for id in &self.ids {
            held.remove(id);
        }
    }
}

/// What a successful batch did.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationOutcome {
    generation: GenerationIdentifier,
    pairs: Vec<EntryPair>,
    feedback: Option<FeedbackRecord>,
}

impl ReconciliationOutcome {
    #[inline]
    pub fn generation(&self) -> GenerationIdentifier {
        self.generation
    }

    #[inline]
    pub fn pairs(&self) -> &[EntryPair] {
        &self.pairs
    }

    /// `None` only for an empty batch.
    #[inline]
    pub fn feedback(&self) -> Option<&FeedbackRecord> {
        self.feedback.as_ref()
    }

    #[inline]
    pub fn replaced(&self) -> impl Iterator<Item = (&ScheduleEntry, &ScheduleEntry)> + '_ {
        self.pairs
            .iter()
            .map(|p| (p.old().entry(), p.new_side().entry()))
    }
}

/// Turns human corrections into new entry versions plus one feedback record.
///
/// A batch is validated completely before anything is written; the write
/// itself is a single all-or-nothing store call. Batches touching disjoint
/// entries may run in parallel on the same workflow, overlapping ones fail
/// fast with [`ConcurrencyConflictError::EntryLocked`].
#[derive(Debug)]
pub struct ReconciliationWorkflow<'a, S: ?Sized, F: ?Sized, L: ?Sized> {
    store: &'a S,
    fleet: &'a F,
    feedback: &'a L,
    locks: EntryLocks,
}

impl<'a, S, F, L> ReconciliationWorkflow<'a, S, F, L>
where
    S: VersionStore + ?Sized,
    F: FleetView + ?Sized,
    L: FeedbackLogger + ?Sized,
{
    #[inline]
    pub fn new(store: &'a S, fleet: &'a F, feedback: &'a L) -> Self {
        Self {
            store,
            fleet,
            feedback,
            locks: EntryLocks::new(),
        }
    }

    #[inline]
    pub fn locks(&self) -> &EntryLocks {
        &self.locks
    }

    #[tracing::instrument(level = "debug", skip(self, fixes), fields(fixes = fixes.len()))]
    pub fn apply_human_fixes(
        &self,
        generation: GenerationIdentifier,
        fixes: &[FieldChangeSet],
    ) -> Result<ReconciliationOutcome, PlanError> {
        if fixes.is_empty() {
            tracing::debug!(%generation, "Empty fix batch, nothing to do");
            return Ok(ReconciliationOutcome {
                generation,
                pairs: Vec::new(),
                feedback: None,
            });
        }

        let ids: Vec<EntryIdentifier> = fixes.iter().map(FieldChangeSet::entry).collect();
        let mut unique = HashSet::with_capacity(ids.len());
        if let Some(dup) = ids.iter().find(|id| !unique.insert(**id)) {
            return Err(InvalidInputError::DuplicateEntryInBatch(*dup).into());
        }
        let _lease = self.locks.try_claim(&ids)?;

        let staged = self.stage(generation, fixes)?;
        self.check_post_batch(generation, &staged)?;

        let old_views = staged
            .iter()
            .map(|(old, _)| VesselScheduleEntry::resolve(*old, self.fleet))
            .collect::<Result<Vec<_>, _>>()?;

        let batch: Vec<(EntryIdentifier, EntryDraft)> =
            staged.iter().map(|(old, new)| (old.id(), *new)).collect();
        let written = self.store.replace_entries(&batch)?;
        let written_ids: Vec<EntryIdentifier> = written.iter().map(ScheduleEntry::id).collect();

        let (pairs, record) = match self.record_feedback(generation, old_views, written) {
            Ok(done) => done,
            Err(e) => {
                tracing::warn!(%generation, error = %e, "Feedback not recorded, withdrawing fixes");
                if let Err(revert) = self.store.revert_replacements(&written_ids) {
                    tracing::error!(%generation, error = %revert, "Fixes could not be withdrawn");
                    return Err(StorageError::new(format!(
                        "feedback not recorded ({e}) and fixes could not be withdrawn: {revert}"
                    ))
                    .into());
                }
                return Err(e);
            }
        };

        tracing::info!(%generation, replaced = pairs.len(), error = record.error(), "Fixes applied");
        Ok(ReconciliationOutcome {
            generation,
            pairs,
            feedback: Some(record),
        })
    }

    fn record_feedback(
        &self,
        generation: GenerationIdentifier,
        old_views: Vec<VesselScheduleEntry>,
        written: Vec<ScheduleEntry>,
    ) -> Result<(Vec<EntryPair>, FeedbackRecord), PlanError> {
        let mut pairs = Vec::with_capacity(written.len());
        for (old, new) in old_views.into_iter().zip(written) {
            let new = VesselScheduleEntry::resolve(new, self.fleet)?;
            pairs.push(EntryPair::new(old, new));
        }
        let record = self.feedback.log_discrepancy(generation, &pairs)?;
        Ok((pairs, record))
    }

    /// Same as [`Self::apply_human_fixes`] but addressed by vessel: each fix
    /// targets the vessel's current entry in `generation`.
    pub fn apply_vessel_fixes(
        &self,
        generation: GenerationIdentifier,
        fixes: &[HumanFix],
    ) -> Result<ReconciliationOutcome, PlanError> {
        if let Some(fix) = fixes.iter().find(|f| f.generation() != generation) {
            return Err(InvalidInputError::FixGenerationMismatch {
                vessel: fix.vessel(),
                expected: generation,
                found: fix.generation(),
            }
            .into());
        }
        let current = self.store.entries_for_generation(generation)?;
        let sets = fixes
            .iter()
            .map(|f| f.resolve(&current))
            .collect::<Result<Vec<_>, _>>()?;
        self.apply_human_fixes(generation, &sets)
    }

    /// Loads every target and builds its new content. No writes.
    fn stage(
        &self,
        generation: GenerationIdentifier,
        fixes: &[FieldChangeSet],
    ) -> Result<Vec<(ScheduleEntry, EntryDraft)>, PlanError> {
        let mut staged = Vec::with_capacity(fixes.len());
        for fix in fixes {
            let old = self
                .store
                .get_entry(fix.entry())?
                .ok_or(NotFoundError::Entry(fix.entry()))?;
            if old.generation() != generation {
                return Err(InvalidInputError::GenerationMismatch {
                    entry: old.id(),
                    expected: generation,
                    found: old.generation(),
                }
                .into());
            }
            if !old.is_current() {
                return Err(InvalidInputError::StaleEntry(old.id()).into());
            }
            let new = fix.apply_to(&old)?;
            ScheduleValidator::validate_suitable([&new], self.fleet)?;
            staged.push((old, new));
        }
        Ok(staged)
    }

    fn check_post_batch(
        &self,
        generation: GenerationIdentifier,
        staged: &[(ScheduleEntry, EntryDraft)],
    ) -> Result<(), PlanError> {
        let replaced: HashMap<EntryIdentifier, &EntryDraft> =
            staged.iter().map(|(old, new)| (old.id(), new)).collect();
        let after: Vec<EntryDraft> = self
            .store
            .entries_for_generation(generation)?
            .iter()
            .map(|e| replaced.get(&e.id()).map_or_else(|| e.to_draft(), |d| **d))
            .collect();

        ScheduleValidator::validate_unique_vessels(&after).map_err(ValidationError::from)?;
        ScheduleValidator::validate_no_overlap(&after).map_err(ValidationError::from)?;
        Ok(())
    }
}
