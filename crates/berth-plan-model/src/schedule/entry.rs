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
    fleet::{berth::Berth, container::FleetView, vessel::Vessel},
    schedule::{
        Placement,
        err::{BerthNotFoundError, LookupError, VesselNotFoundError},
        plan::Assignment,
    },
};
use berth_plan_core::prelude::{TimeInterval, TimePoint};

/// Observed execution times, filled in once the port reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ActualTimes {
    pub arrival: Option<TimePoint<i64>>,
    pub start: Option<TimePoint<i64>>,
    pub end: Option<TimePoint<i64>>,
}

/// The content of an entry before the store has given it an id and a
/// generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryDraft {
    vessel: VesselIdentifier,
    berth: BerthIdentifier,
    planned: TimeInterval<i64>,
    actual: ActualTimes,
}

impl EntryDraft {
    #[inline]
    pub fn new(vessel: VesselIdentifier, berth: BerthIdentifier, planned: TimeInterval<i64>) -> Self {
        Self {
            vessel,
            berth,
            planned,
            actual: ActualTimes::default(),
        }
    }

    #[inline]
    pub fn with_actual(mut self, actual: ActualTimes) -> Self {
        self.actual = actual;
        self
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
    pub fn planned(&self) -> TimeInterval<i64> {
        self.planned
    }

    #[inline]
    pub fn actual(&self) -> &ActualTimes {
        &self.actual
    }

    #[inline]
    pub(crate) fn set_berth(&mut self, berth: BerthIdentifier) {
        self.berth = berth;
    }

    #[inline]
    pub(crate) fn set_planned(&mut self, planned: TimeInterval<i64>) {
        self.planned = planned;
    }

    #[inline]
    pub(crate) fn actual_mut(&mut self) -> &mut ActualTimes {
        &mut self.actual
    }
}

impl From<&Assignment> for EntryDraft {
    #[inline]
    fn from(a: &Assignment) -> Self {
        EntryDraft::new(a.vessel_id(), a.berth_id(), a.interval())
    }
}

impl From<Assignment> for EntryDraft {
    #[inline]
    fn from(a: Assignment) -> Self {
        EntryDraft::from(&a)
    }
}

impl Placement for EntryDraft {
    #[inline]
    fn vessel_id(&self) -> VesselIdentifier {
        self.vessel
    }

    #[inline]
    fn berth_id(&self) -> BerthIdentifier {
        self.berth
    }

    #[inline]
    fn interval(&self) -> TimeInterval<i64> {
        self.planned
    }
}

/// A persisted row of one generation.
///
/// Rows are never edited in place: a correction writes a fresh row and points
/// the old one at it through `superseded_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleEntry {
    id: EntryIdentifier,
    generation: GenerationIdentifier,
    draft: EntryDraft,
    superseded_by: Option<EntryIdentifier>,
}

impl ScheduleEntry {
    #[inline]
    pub fn from_draft(
        id: EntryIdentifier,
        generation: GenerationIdentifier,
        draft: EntryDraft,
    ) -> Self {
        Self {
            id,
            generation,
            draft,
            superseded_by: None,
        }
    }

    #[inline]
    pub fn id(&self) -> EntryIdentifier {
        self.id
    }

    #[inline]
    pub fn generation(&self) -> GenerationIdentifier {
        self.generation
    }

    #[inline]
    pub fn vessel(&self) -> VesselIdentifier {
        self.draft.vessel()
    }

    #[inline]
    pub fn berth(&self) -> BerthIdentifier {
        self.draft.berth()
    }

    #[inline]
    pub fn planned(&self) -> TimeInterval<i64> {
        self.draft.planned()
    }

    #[inline]
    pub fn actual(&self) -> &ActualTimes {
        self.draft.actual()
    }

    #[inline]
    pub fn superseded_by(&self) -> Option<EntryIdentifier> {
        self.superseded_by
    }

    #[inline]
    pub fn is_current(&self) -> bool {
        self.superseded_by.is_none()
    }

    #[inline]
    pub fn to_draft(&self) -> EntryDraft {
        self.draft
    }

    #[inline]
    pub fn mark_superseded(&mut self, by: EntryIdentifier) {
        self.superseded_by = Some(by);
    }

    /// Makes the row current again after its replacement was withdrawn.
    #[inline]
    pub fn clear_superseded(&mut self) {
        self.superseded_by = None;
    }
}

impl Placement for ScheduleEntry {
    #[inline]
    fn vessel_id(&self) -> VesselIdentifier {
        self.vessel()
    }

    #[inline]
    fn berth_id(&self) -> BerthIdentifier {
        self.berth()
    }

    #[inline]
    fn interval(&self) -> TimeInterval<i64> {
        self.planned()
    }
}

impl std::fmt::Display for ScheduleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} in {}: {} -> {} {}",
            self.id,
            self.generation,
            self.vessel(),
            self.berth(),
            self.planned()
        )?;
        if let Some(by) = self.superseded_by {
            write!(f, " (superseded by {})", by)?;
        }
        Ok(())
    }
}

/// An entry together with owned copies of the vessel and berth it references.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselScheduleEntry {
    entry: ScheduleEntry,
    vessel: Vessel,
    berth: Berth,
}

impl VesselScheduleEntry {
    pub fn resolve<F>(entry: ScheduleEntry, fleet: &F) -> Result<Self, LookupError>
    where
        F: FleetView + ?Sized,
    {
        let vessel = fleet
            .vessel(entry.vessel())
            .ok_or_else(|| VesselNotFoundError::new(entry.vessel()))?
            .clone();
        let berth = fleet
            .berth(entry.berth())
            .ok_or_else(|| BerthNotFoundError::new(entry.berth()))?
            .clone();
        Ok(Self {
            entry,
            vessel,
            berth,
        })
    }

    #[inline]
    pub fn entry(&self) -> &ScheduleEntry {
        &self.entry
    }

    #[inline]
    pub fn vessel(&self) -> &Vessel {
        &self.vessel
    }

    #[inline]
    pub fn berth(&self) -> &Berth {
        &self.berth
    }
}
