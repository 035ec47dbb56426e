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
    compat::SuitabilityViolation,
    schedule::err::{InvalidIntervalError, LookupError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuplicateVesselAssignmentError {
    vessel: VesselIdentifier,
}

impl DuplicateVesselAssignmentError {
    #[inline]
    pub fn new(vessel: VesselIdentifier) -> Self {
        Self { vessel }
    }

    #[inline]
    pub fn vessel(&self) -> VesselIdentifier {
        self.vessel
    }
}

impl std::fmt::Display for DuplicateVesselAssignmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vessel {} is assigned more than once", self.vessel)
    }
}

impl std::error::Error for DuplicateVesselAssignmentError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacementOverlapError {
    berth: BerthIdentifier,
    existing: VesselIdentifier,
    incoming: VesselIdentifier,
}

impl PlacementOverlapError {
    #[inline]
    pub fn new(berth: BerthIdentifier, existing: VesselIdentifier, incoming: VesselIdentifier) -> Self {
        Self {
            berth,
            existing,
            incoming,
        }
    }

    #[inline]
    pub fn berth(&self) -> BerthIdentifier {
        self.berth
    }

    #[inline]
    pub fn existing(&self) -> VesselIdentifier {
        self.existing
    }

    #[inline]
    pub fn incoming(&self) -> VesselIdentifier {
        self.incoming
    }
}

impl std::fmt::Display for PlacementOverlapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Vessel {} overlaps vessel {} on berth {}",
            self.incoming, self.existing, self.berth
        )
    }
}

impl std::error::Error for PlacementOverlapError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnsuitablePlacementError {
    vessel: VesselIdentifier,
    berth: BerthIdentifier,
    violation: SuitabilityViolation,
}

impl UnsuitablePlacementError {
    #[inline]
    pub fn new(
        vessel: VesselIdentifier,
        berth: BerthIdentifier,
        violation: SuitabilityViolation,
    ) -> Self {
        Self {
            vessel,
            berth,
            violation,
        }
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
    pub fn violation(&self) -> SuitabilityViolation {
        self.violation
    }
}

impl std::fmt::Display for UnsuitablePlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Berth {} cannot host vessel {}: {}",
            self.berth, self.vessel, self.violation
        )
    }
}

impl std::error::Error for UnsuitablePlacementError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationError {
    DuplicateVessel(DuplicateVesselAssignmentError),
    Overlap(PlacementOverlapError),
    InvalidInterval(InvalidIntervalError),
    Unsuitable(UnsuitablePlacementError),
    Lookup(LookupError),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::DuplicateVessel(e) => write!(f, "{}", e),
            ValidationError::Overlap(e) => write!(f, "{}", e),
            ValidationError::InvalidInterval(e) => write!(f, "{}", e),
            ValidationError::Unsuitable(e) => write!(f, "{}", e),
            ValidationError::Lookup(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<DuplicateVesselAssignmentError> for ValidationError {
    fn from(err: DuplicateVesselAssignmentError) -> Self {
        ValidationError::DuplicateVessel(err)
    }
}

impl From<PlacementOverlapError> for ValidationError {
    fn from(err: PlacementOverlapError) -> Self {
        ValidationError::Overlap(err)
    }
}

impl From<InvalidIntervalError> for ValidationError {
    fn from(err: InvalidIntervalError) -> Self {
        ValidationError::InvalidInterval(err)
    }
}

impl From<UnsuitablePlacementError> for ValidationError {
    fn from(err: UnsuitablePlacementError) -> Self {
        ValidationError::Unsuitable(err)
    }
}

impl From<LookupError> for ValidationError {
    fn from(err: LookupError) -> Self {
        ValidationError::Lookup(err)
    }
}
