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
    common::{FleetIdentifier, VesselIdentifier},
    fleet::berth::CargoType,
};
use berth_plan_core::prelude::{TimeDelta, TimePoint};

/// Physical particulars of a vessel in metres and metric tonnes.
/// Unknown values are `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VesselDimensions {
    pub loa_m: f64,
    pub beam_m: f64,
    pub draft_m: f64,
    pub deadweight_t: f64,
}

impl VesselDimensions {
    #[inline]
    pub const fn new(loa_m: f64, beam_m: f64, draft_m: f64, deadweight_t: f64) -> Self {
        Self {
            loa_m,
            beam_m,
            draft_m,
            deadweight_t,
        }
    }
}

/// One vessel call as ingested for a generation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Vessel {
    id: VesselIdentifier,
    fleet_id: FleetIdentifier,
    name: String,
    cargo_type: Option<CargoType>,
    dimensions: VesselDimensions,
    eta: TimePoint<i64>,
    estimated_duration: Option<TimeDelta<i64>>,
}

impl Vessel {
    #[inline]
    pub fn new(
        id: VesselIdentifier,
        fleet_id: FleetIdentifier,
        dimensions: VesselDimensions,
        cargo_type: Option<CargoType>,
        eta: TimePoint<i64>,
    ) -> Self {
        Self {
            id,
            fleet_id,
            name: String::new(),
            cargo_type: cargo_type.filter(|t| !t.is_blank()),
            dimensions,
            eta,
            estimated_duration: None,
        }
    }

    #[inline]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn with_estimated_duration(mut self, duration: TimeDelta<i64>) -> Self {
        self.estimated_duration = Some(duration);
        self
    }

    #[inline]
    pub fn id(&self) -> VesselIdentifier {
        self.id
    }

    #[inline]
    pub fn fleet_id(&self) -> FleetIdentifier {
        self.fleet_id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn cargo_type(&self) -> Option<&CargoType> {
        self.cargo_type.as_ref()
    }

    #[inline]
    pub fn dimensions(&self) -> &VesselDimensions {
        &self.dimensions
    }

    #[inline]
    pub fn eta(&self) -> TimePoint<i64> {
        self.eta
    }

    #[inline]
    pub fn estimated_duration(&self) -> Option<TimeDelta<i64>> {
        self.estimated_duration
    }
}

impl std::fmt::Display for Vessel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Vessel({}, {}, {:?}, eta={})",
            self.id, self.fleet_id, self.name, self.eta
        )
    }
}
