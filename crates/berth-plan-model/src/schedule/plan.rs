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
    common::{BerthIdentifier, VesselIdentifier},
    schedule::Placement,
};
use berth_plan_core::prelude::TimeInterval;

/// One vessel placed on one berth by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Assignment {
    vessel: VesselIdentifier,
    berth: BerthIdentifier,
    interval: TimeInterval<i64>,
}

impl Assignment {
    #[inline]
    pub fn new(vessel: VesselIdentifier, berth: BerthIdentifier, interval: TimeInterval<i64>) -> Self {
        Self {
            vessel,
            berth,
            interval,
        }
    }
}

impl Placement for Assignment {
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
        self.interval
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} {}", self.vessel, self.berth, self.interval)
    }
}

/// Scheduler output: assignments in vessel processing order, plus the
/// vessels that found no suitable free berth.
///
/// A vessel missing from `assignments` is unscheduled, never silently placed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    assignments: Vec<Assignment>,
    unscheduled: Vec<VesselIdentifier>,
}

impl Schedule {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            assignments: Vec::with_capacity(n),
            unscheduled: Vec::new(),
        }
    }

    #[inline]
    pub fn push(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    #[inline]
    pub fn mark_unscheduled(&mut self, vessel: VesselIdentifier) {
        self.unscheduled.push(vessel);
    }

    #[inline]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    #[inline]
    pub fn unscheduled(&self) -> &[VesselIdentifier] {
        &self.unscheduled
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Assignment> {
        self.assignments.iter()
    }

    #[inline]
    pub fn assignment_for(&self, vessel: VesselIdentifier) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.vessel == vessel)
    }

    #[inline]
    pub fn on_berth(&self, berth: BerthIdentifier) -> impl Iterator<Item = &Assignment> + '_ {
        self.assignments.iter().filter(move |a| a.berth == berth)
    }

    #[inline]
    pub fn is_scheduled(&self, vessel: VesselIdentifier) -> bool {
        self.assignment_for(vessel).is_some()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}
