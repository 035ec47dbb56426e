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
pub mod err;

use crate::{
    common::{BerthIdentifier, VesselIdentifier},
    compat,
    fleet::container::FleetView,
    schedule::{
        Placement,
        err::{BerthNotFoundError, InvalidIntervalError, LookupError, VesselNotFoundError},
    },
    validation::err::{
        DuplicateVesselAssignmentError, PlacementOverlapError, UnsuitablePlacementError,
        ValidationError,
    },
};
use berth_plan_core::prelude::TimePoint;
use rangemap::RangeSet;
use std::collections::{BTreeMap, BTreeSet};

/// Checks the invariants every generation must hold.
#[derive(Debug, Clone)]
pub struct ScheduleValidator;

impl ScheduleValidator {
    #[inline]
    pub fn validate_intervals<I, P>(items: I) -> Result<(), InvalidIntervalError>
    where
        I: IntoIterator<Item = P>,
        P: Placement,
    {
        for p in items {
            let iv = p.interval();
            if iv.start() >= iv.end() {
                return Err(InvalidIntervalError::new(p.vessel_id(), iv));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn validate_unique_vessels<I, P>(items: I) -> Result<(), DuplicateVesselAssignmentError>
    where
        I: IntoIterator<Item = P>,
        P: Placement,
    {
        let mut seen: BTreeSet<VesselIdentifier> = BTreeSet::new();
        for p in items {
            if !seen.insert(p.vessel_id()) {
                return Err(DuplicateVesselAssignmentError::new(p.vessel_id()));
            }
        }
        Ok(())
    }

    /// Pairwise non-overlap of `[start, end)` per berth. Empty intervals
    /// occupy nothing and are ignored here.
    pub fn validate_no_overlap<I, P>(items: I) -> Result<(), PlacementOverlapError>
    where
        I: IntoIterator<Item = P>,
        P: Placement,
    {
        let mut per_berth: BTreeMap<BerthIdentifier, BerthLedger> = BTreeMap::new();

        for p in items {
            let iv = p.interval();
            if iv.is_empty() {
                continue;
            }
            let ledger = per_berth.entry(p.berth_id()).or_default();
            if let Some(existing) = ledger.conflict(iv.start(), iv.end()) {
                return Err(PlacementOverlapError::new(
                    p.berth_id(),
                    existing,
                    p.vessel_id(),
                ));
            }
            ledger.insert(iv.start(), iv.end(), p.vessel_id());
        }
        Ok(())
    }

    /// Every placement references a known vessel and berth, and the berth
    /// is physically suitable.
    pub fn validate_suitable<I, P, F>(items: I, fleet: &F) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = P>,
        P: Placement,
        F: FleetView + ?Sized,
    {
        for p in items {
            let vessel = fleet
                .vessel(p.vessel_id())
                .ok_or_else(|| LookupError::from(VesselNotFoundError::new(p.vessel_id())))?;
            let berth = fleet
                .berth(p.berth_id())
                .ok_or_else(|| LookupError::from(BerthNotFoundError::new(p.berth_id())))?;
            if let Some(v) = compat::first_violation(berth, vessel) {
                return Err(UnsuitablePlacementError::new(p.vessel_id(), p.berth_id(), v).into());
            }
        }
        Ok(())
    }

    /// Runs every check in order: intervals, uniqueness, overlap, suitability.
    pub fn validate<P, F>(items: &[P], fleet: &F) -> Result<(), ValidationError>
    where
        P: Placement,
        F: FleetView + ?Sized,
    {
        Self::validate_intervals(items)?;
        Self::validate_unique_vessels(items)?;
        Self::validate_no_overlap(items)?;
        Self::validate_suitable(items, fleet)
    }
}

#[derive(Debug, Clone, Default)]
struct BerthLedger {
    occupied: RangeSet<TimePoint<i64>>,
    starts: BTreeMap<TimePoint<i64>, (TimePoint<i64>, VesselIdentifier)>,
}

impl BerthLedger {
    fn conflict(&self, start: TimePoint<i64>, end: TimePoint<i64>) -> Option<VesselIdentifier> {
        if !self.occupied.overlaps(&(start..end)) {
            return None;
        }
        let pred = self
            .starts
            .range(..=start)
            .next_back()
            .filter(|(_, (e, _))| *e > start)
            .map(|(_, &(_, v))| v);
        pred.or_else(|| {
            self.starts
                .range(start..end)
                .next()
                .map(|(_, &(_, v))| v)
        })
    }

    fn insert(&mut self, start: TimePoint<i64>, end: TimePoint<i64>, vessel: VesselIdentifier) {
        self.occupied.insert(start..end);
        self.starts.insert(start, (end, vessel));
    }
}
