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
    common::{BerthIdentifier, EntryIdentifier, GenerationIdentifier, VesselIdentifier},
    schedule::{
        entry::{EntryDraft, ScheduleEntry},
        err::{
            ChangeError, ChangeTargetMismatchError, EmptyChangeSetError, InvalidIntervalError,
            VesselNotScheduledError,
        },
    },
};
use berth_plan_core::prelude::{TimeInterval, TimePoint};

/// One settable field of a schedule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldChange {
    Berth(BerthIdentifier),
    PlannedStart(TimePoint<i64>),
    PlannedEnd(TimePoint<i64>),
    ActualArrival(TimePoint<i64>),
    ActualStart(TimePoint<i64>),
    ActualEnd(TimePoint<i64>),
}

impl std::fmt::Display for FieldChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldChange::Berth(b) => write!(f, "berth = {}", b),
            FieldChange::PlannedStart(t) => write!(f, "planned_start = {}", t),
            FieldChange::PlannedEnd(t) => write!(f, "planned_end = {}", t),
            FieldChange::ActualArrival(t) => write!(f, "actual_arrival = {}", t),
            FieldChange::ActualStart(t) => write!(f, "actual_start = {}", t),
            FieldChange::ActualEnd(t) => write!(f, "actual_end = {}", t),
        }
    }
}

/// Requested changes to a single entry. Later changes to the same field win.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldChangeSet {
    entry: EntryIdentifier,
    changes: Vec<FieldChange>,
}

impl FieldChangeSet {
    #[inline]
    pub fn new(entry: EntryIdentifier, changes: impl IntoIterator<Item = FieldChange>) -> Self {
        Self {
            entry,
            changes: changes.into_iter().collect(),
        }
    }

    #[inline]
    pub fn entry(&self) -> EntryIdentifier {
        self.entry
    }

    #[inline]
    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Builds the replacement content for `base`.
    ///
    /// Fails if the set is empty, targets another entry, or leaves the
    /// planned interval with `start >= end`.
    pub fn apply_to(&self, base: &ScheduleEntry) -> Result<EntryDraft, ChangeError> {
        if self.entry != base.id() {
            return Err(ChangeTargetMismatchError::new(self.entry, base.id()).into());
        }
        if self.changes.is_empty() {
            return Err(EmptyChangeSetError::new(self.entry).into());
        }

        let mut draft = base.to_draft();
        let (mut start, mut end) = draft.planned().into_inner();
        for change in &self.changes {
            match *change {
                FieldChange::Berth(b) => draft.set_berth(b),
                FieldChange::PlannedStart(t) => start = t,
                FieldChange::PlannedEnd(t) => end = t,
                FieldChange::ActualArrival(t) => draft.actual_mut().arrival = Some(t),
                FieldChange::ActualStart(t) => draft.actual_mut().start = Some(t),
                FieldChange::ActualEnd(t) => draft.actual_mut().end = Some(t),
            }
        }

        if start >= end {
            return Err(
                InvalidIntervalError::new(draft.vessel(), TimeInterval::new(start, end)).into(),
            );
        }
        draft.set_planned(TimeInterval::new(start, end));
        Ok(draft)
    }
}

/// A human override expressed by vessel instead of entry id: move `vessel`
/// to `berth` for `interval` within `generation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HumanFix {
    generation: GenerationIdentifier,
    vessel: VesselIdentifier,
    berth: BerthIdentifier,
    interval: TimeInterval<i64>,
}

impl HumanFix {
    #[inline]
    pub fn new(
        generation: GenerationIdentifier,
        vessel: VesselIdentifier,
        berth: BerthIdentifier,
        interval: TimeInterval<i64>,
    ) -> Self {
        Self {
            generation,
            vessel,
            berth,
            interval,
        }
    }

    #[inline]
    pub fn generation(&self) -> GenerationIdentifier {
        self.generation
    }

    #[inline]
    pub fn vessel(&self) -> VesselIdentifier {
        self.vessel
    }

    #[inline]
    pub fn berth(&self) -> BerthIdentifier {
        self.berth
    }

    #[inline]
    pub fn interval(&self) -> TimeInterval<i64> {
        self.interval
    }

    /// Translates the fix into a change set against the vessel's current
    /// entry among `entries`.
    pub fn resolve<'a, I>(&self, entries: I) -> Result<FieldChangeSet, VesselNotScheduledError>
    where
        I: IntoIterator<Item = &'a ScheduleEntry>,
    {
        let target = entries
            .into_iter()
            .find(|e| e.generation() == self.generation && e.vessel() == self.vessel && e.is_current())
            .ok_or_else(|| VesselNotScheduledError::new(self.generation, self.vessel))?;

        Ok(FieldChangeSet::new(
            target.id(),
            [
                FieldChange::Berth(self.berth),
                FieldChange::PlannedStart(self.interval.start()),
                FieldChange::PlannedEnd(self.interval.end()),
            ],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn tp(v: i64) -> TimePoint<i64> {
        TimePoint::new(v)
    }

    #[inline]
    fn iv(a: i64, b: i64) -> TimeInterval<i64> {
        TimeInterval::new(tp(a), tp(b))
    }

    #[inline]
    fn eid(n: u64) -> EntryIdentifier {
        EntryIdentifier::new(n)
    }

    fn entry(id: u64, vessel: u64) -> ScheduleEntry {
        ScheduleEntry::from_draft(
            eid(id),
            GenerationIdentifier::new(4),
            EntryDraft::new(VesselIdentifier::new(vessel), BerthIdentifier::new(1), iv(100, 200)),
        )
    }

    #[test]
    fn test_apply_overwrites_only_requested_fields() {
        let base = entry(1, 1);
        let set = FieldChangeSet::new(
            eid(1),
            [
                FieldChange::Berth(BerthIdentifier::new(2)),
                FieldChange::PlannedEnd(tp(250)),
                FieldChange::ActualArrival(tp(90)),
            ],
        );
        let d = set.apply_to(&base).unwrap();
        assert_eq!(d.berth(), BerthIdentifier::new(2));
        assert_eq!(d.planned(), iv(100, 250));
        assert_eq!(d.actual().arrival, Some(tp(90)));
        assert_eq!(d.actual().start, None);
        assert_eq!(d.vessel(), base.vessel());
    }

    #[test]
    fn test_last_change_to_a_field_wins() {
        let set = FieldChangeSet::new(
            eid(1),
            [FieldChange::PlannedStart(tp(120)), FieldChange::PlannedStart(tp(150))],
        );
        assert_eq!(set.apply_to(&entry(1, 1)).unwrap().planned(), iv(150, 200));
    }

    #[test]
    fn test_apply_rejects_malformed_sets() {
        let base = entry(1, 1);
        assert!(matches!(
            FieldChangeSet::new(eid(1), Vec::new()).apply_to(&base),
            Err(ChangeError::EmptyChangeSet(_))
        ));
        assert!(matches!(
            FieldChangeSet::new(eid(2), [FieldChange::PlannedEnd(tp(300))]).apply_to(&base),
            Err(ChangeError::TargetMismatch(_))
        ));
        assert!(matches!(
            FieldChangeSet::new(eid(1), [FieldChange::PlannedEnd(tp(100))]).apply_to(&base),
            Err(ChangeError::InvalidInterval(_))
        ));
    }

    #[test]
    fn test_human_fix_targets_current_entry_of_vessel() {
        let mut old = entry(1, 5);
        old.mark_superseded(eid(2));
        let current = entry(2, 5);
        let other = entry(3, 6);
        let rows = [old, current, other];

        let fix = HumanFix::new(
            GenerationIdentifier::new(4),
            VesselIdentifier::new(5),
            BerthIdentifier::new(3),
            iv(400, 500),
        );
        let set = fix.resolve(&rows).unwrap();
        assert_eq!(set.entry(), eid(2));
        let d = set.apply_to(&current).unwrap();
        assert_eq!(d.berth(), BerthIdentifier::new(3));
        assert_eq!(d.planned(), iv(400, 500));

        let missing = HumanFix::new(
            GenerationIdentifier::new(4),
            VesselIdentifier::new(99),
            BerthIdentifier::new(3),
            iv(400, 500),
        );
        assert!(missing.resolve(&rows).is_err());
    }
}
