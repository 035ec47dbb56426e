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
//! Physical compatibility between a berth and a vessel.
//!
//! A missing measurement is stored as `NaN`. Every comparison against `NaN`
//! is false, so an unreported dimension disqualifies the vessel everywhere.

use crate::fleet::{berth::Berth, vessel::Vessel};

/// The first constraint a vessel fails at a berth, in checking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuitabilityViolation {
    Length,
    Beam,
    Draft,
    CargoType,
}

impl std::fmt::Display for SuitabilityViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SuitabilityViolation::Length => "length overall exceeds berth limit",
            SuitabilityViolation::Beam => "beam exceeds berth limit",
            SuitabilityViolation::Draft => "draft exceeds berth limit",
            SuitabilityViolation::CargoType => "cargo type not accepted",
        };
        f.write_str(s)
    }
}

#[inline]
fn fits(limit: f64, value: f64) -> bool {
    limit >= value
}

pub fn first_violation(berth: &Berth, vessel: &Vessel) -> Option<SuitabilityViolation> {
    let env = berth.envelope();
    let dims = vessel.dimensions();

    if !fits(env.max_loa_m, dims.loa_m) {
        return Some(SuitabilityViolation::Length);
    }
    if !fits(env.max_beam_m, dims.beam_m) {
        return Some(SuitabilityViolation::Beam);
    }
    if !fits(env.max_draft_m, dims.draft_m) {
        return Some(SuitabilityViolation::Draft);
    }
    match vessel.cargo_type() {
        Some(t) if berth.accepts_type(t) => None,
        _ => Some(SuitabilityViolation::CargoType),
    }
}

/// True when the berth can physically host the vessel.
///
/// Deadweight is deliberately not part of this test; see
/// [`deadweight_headroom`].
#[inline]
pub fn is_suitable(berth: &Berth, vessel: &Vessel) -> bool {
    first_violation(berth, vessel).is_none()
}

/// Remaining deadweight capacity in tonnes (negative when exceeded), or
/// `None` if either side did not report it. Informational only.
#[inline]
pub fn deadweight_headroom(berth: &Berth, vessel: &Vessel) -> Option<f64> {
    let headroom = berth.envelope().max_deadweight_t - vessel.dimensions().deadweight_t;
    headroom.is_finite().then_some(headroom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::{BerthIdentifier, FleetIdentifier, VesselIdentifier},
        fleet::{
            berth::{BerthEnvelope, CargoType},
            vessel::VesselDimensions,
        },
    };
    use berth_plan_core::prelude::TimePoint;

    fn berth() -> Berth {
        Berth::new(
            BerthIdentifier::new(1),
            "A",
            BerthEnvelope::new(300.0, 40.0, 14.0, 80_000.0),
            ["bulk", "Tanker"],
        )
    }

    fn vessel(dims: VesselDimensions, cargo: Option<&str>) -> Vessel {
        Vessel::new(
            VesselIdentifier::new(1),
            FleetIdentifier::new(1),
            dims,
            cargo.map(CargoType::new),
            TimePoint::new(0),
        )
    }

    fn ok_dims() -> VesselDimensions {
        VesselDimensions::new(250.0, 35.0, 12.0, 60_000.0)
    }

    #[test]
    fn test_fitting_vessel_is_suitable() {
        assert!(is_suitable(&berth(), &vessel(ok_dims(), Some("BULK"))));
        // Limits are inclusive.
        let exact = VesselDimensions::new(300.0, 40.0, 14.0, 80_000.0);
        assert!(is_suitable(&berth(), &vessel(exact, Some(" tanker "))));
    }

    #[test]
    fn test_each_dimension_disqualifies_independently() {
        let b = berth();
        let mut d = ok_dims();
        d.loa_m = 300.5;
        assert_eq!(
            first_violation(&b, &vessel(d, Some("BULK"))),
            Some(SuitabilityViolation::Length)
        );

        let mut d = ok_dims();
        d.beam_m = 41.0;
        assert_eq!(
            first_violation(&b, &vessel(d, Some("BULK"))),
            Some(SuitabilityViolation::Beam)
        );

        let mut d = ok_dims();
        d.draft_m = 14.1;
        assert_eq!(
            first_violation(&b, &vessel(d, Some("BULK"))),
            Some(SuitabilityViolation::Draft)
        );

        assert_eq!(
            first_violation(&b, &vessel(ok_dims(), Some("CONTAINER"))),
            Some(SuitabilityViolation::CargoType)
        );
    }

    #[test]
    fn test_missing_fields_disqualify() {
        let b = berth();
        let mut d = ok_dims();
        d.draft_m = f64::NAN;
        assert!(!is_suitable(&b, &vessel(d, Some("BULK"))));
        assert!(!is_suitable(&b, &vessel(ok_dims(), None)));
        assert!(!is_suitable(&b, &vessel(ok_dims(), Some("   "))));
    }

    #[test]
    fn test_deadweight_is_not_checked() {
        let mut d = ok_dims();
        d.deadweight_t = 200_000.0;
        let v = vessel(d, Some("BULK"));
        assert!(is_suitable(&berth(), &v));
        assert_eq!(deadweight_headroom(&berth(), &v), Some(-120_000.0));

        d.deadweight_t = f64::NAN;
        assert_eq!(deadweight_headroom(&berth(), &vessel(d, Some("BULK"))), None);
    }
}
