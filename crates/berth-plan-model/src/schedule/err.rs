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
use crate::common::{BerthIdentifier, EntryIdentifier, GenerationIdentifier, VesselIdentifier};
use berth_plan_core::prelude::TimeInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmptyChangeSetError {
    entry: EntryIdentifier,
}

impl EmptyChangeSetError {
    #[inline]
    pub fn new(entry: EntryIdentifier) -> Self {
        Self { entry }
    }

    #[inline]
    pub fn entry(&self) -> EntryIdentifier {
        self.entry
    }
}

impl std::fmt::Display for EmptyChangeSetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Change set for entry {} contains no changes", self.entry)
    }
}

impl std::error::Error for EmptyChangeSetError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangeTargetMismatchError {
    expected: EntryIdentifier,
    found: EntryIdentifier,
}

impl ChangeTargetMismatchError {
    #[inline]
    pub fn new(expected: EntryIdentifier, found: EntryIdentifier) -> Self {
        Self { expected, found }
    }

    #[inline]
    pub fn expected(&self) -> EntryIdentifier {
        self.expected
    }

    #[inline]
    pub fn found(&self) -> EntryIdentifier {
        self.found
    }
}

impl std::fmt::Display for ChangeTargetMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Change set targets entry {} but was applied to entry {}",
            self.expected, self.found
        )
    }
}

impl std::error::Error for ChangeTargetMismatchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidIntervalError {
    vessel: VesselIdentifier,
    interval: TimeInterval<i64>,
}

impl InvalidIntervalError {
    #[inline]
    pub fn new(vessel: VesselIdentifier, interval: TimeInterval<i64>) -> Self {
        Self { vessel, interval }
    }

    #[inline]
    pub fn vessel(&self) -> VesselIdentifier {
        self.vessel
    }

    #[inline]
    pub fn interval(&self) -> TimeInterval<i64> {
        self.interval
    }
}

impl std::fmt::Display for InvalidIntervalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Planned interval {} for vessel {} must start before it ends",
            self.interval, self.vessel
        )
    }
}

impl std::error::Error for InvalidIntervalError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeError {
    EmptyChangeSet(EmptyChangeSetError),
    TargetMismatch(ChangeTargetMismatchError),
    InvalidInterval(InvalidIntervalError),
}

impl std::fmt::Display for ChangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeError::EmptyChangeSet(e) => write!(f, "{}", e),
            ChangeError::TargetMismatch(e) => write!(f, "{}", e),
            ChangeError::InvalidInterval(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ChangeError {}

impl From<EmptyChangeSetError> for ChangeError {
    fn from(err: EmptyChangeSetError) -> Self {
        ChangeError::EmptyChangeSet(err)
    }
}

impl From<ChangeTargetMismatchError> for ChangeError {
    fn from(err: ChangeTargetMismatchError) -> Self {
        ChangeError::TargetMismatch(err)
    }
}

impl From<InvalidIntervalError> for ChangeError {
    fn from(err: InvalidIntervalError) -> Self {
        ChangeError::InvalidInterval(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VesselNotFoundError {
    vessel: VesselIdentifier,
}

impl VesselNotFoundError {
    #[inline]
    pub fn new(vessel: VesselIdentifier) -> Self {
        Self { vessel }
    }

    #[inline]
    pub fn vessel(&self) -> VesselIdentifier {
        self.vessel
    }
}

impl std::fmt::Display for VesselNotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vessel {} is not known", self.vessel)
    }
}

impl std::error::Error for VesselNotFoundError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BerthNotFoundError {
    berth: BerthIdentifier,
}

impl BerthNotFoundError {
    #[inline]
    pub fn new(berth: BerthIdentifier) -> Self {
        Self { berth }
    }

    #[inline]
    pub fn berth(&self) -> BerthIdentifier {
        self.berth
    }
}

impl std::fmt::Display for BerthNotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Berth {} is not known", self.berth)
    }
}

impl std::error::Error for BerthNotFoundError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VesselNotScheduledError {
    generation: GenerationIdentifier,
    vessel: VesselIdentifier,
}

impl VesselNotScheduledError {
    #[inline]
    pub fn new(generation: GenerationIdentifier, vessel: VesselIdentifier) -> Self {
        Self { generation, vessel }
    }

    #[inline]
    pub fn generation(&self) -> GenerationIdentifier {
        self.generation
    }

    #[inline]
    pub fn vessel(&self) -> VesselIdentifier {
        self.vessel
    }
}

impl std::fmt::Display for VesselNotScheduledError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Vessel {} has no current entry in {}",
            self.vessel, self.generation
        )
    }
}

impl std::error::Error for VesselNotScheduledError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupError {
    VesselNotFound(VesselNotFoundError),
    BerthNotFound(BerthNotFoundError),
    VesselNotScheduled(VesselNotScheduledError),
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::VesselNotFound(e) => write!(f, "{}", e),
            LookupError::BerthNotFound(e) => write!(f, "{}", e),
            LookupError::VesselNotScheduled(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<VesselNotFoundError> for LookupError {
    fn from(err: VesselNotFoundError) -> Self {
        LookupError::VesselNotFound(err)
    }
}

impl From<BerthNotFoundError> for LookupError {
    fn from(err: BerthNotFoundError) -> Self {
        LookupError::BerthNotFound(err)
    }
}

impl From<VesselNotScheduledError> for LookupError {
    fn from(err: VesselNotScheduledError) -> Self {
        LookupError::VesselNotScheduled(err)
    }
}
