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
use crate::common::{
    BerthIdentifier, FleetIdentifier, GenerationIdentifier, MaintenanceIdentifier,
    VesselIdentifier,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateBerthError {
    id: BerthIdentifier,
    name: String,
}

impl DuplicateBerthError {
    pub fn new(id: BerthIdentifier, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> BerthIdentifier {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for DuplicateBerthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Berth {} ({:?}) clashes with an existing berth id or name",
            self.id, self.name
        )
    }
}

impl std::error::Error for DuplicateBerthError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DuplicateVesselError {
    id: VesselIdentifier,
    fleet_id: FleetIdentifier,
    generation: GenerationIdentifier,
}

impl DuplicateVesselError {
    pub fn new(
        id: VesselIdentifier,
        fleet_id: FleetIdentifier,
        generation: GenerationIdentifier,
    ) -> Self {
        Self {
            id,
            fleet_id,
            generation,
        }
    }

    pub fn id(&self) -> VesselIdentifier {
        self.id
    }

    pub fn fleet_id(&self) -> FleetIdentifier {
        self.fleet_id
    }

    pub fn generation(&self) -> GenerationIdentifier {
        self.generation
    }
}

impl std::fmt::Display for DuplicateVesselError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Vessel {} clashes with an existing record for {} in {}",
            self.id, self.fleet_id, self.generation
        )
    }
}

impl std::error::Error for DuplicateVesselError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnknownMaintenanceBerthError {
    record: MaintenanceIdentifier,
    berth: BerthIdentifier,
}

impl UnknownMaintenanceBerthError {
    pub fn new(record: MaintenanceIdentifier, berth: BerthIdentifier) -> Self {
        Self { record, berth }
    }

    pub fn record(&self) -> MaintenanceIdentifier {
        self.record
    }

    pub fn berth(&self) -> BerthIdentifier {
        self.berth
    }
}

impl std::fmt::Display for UnknownMaintenanceBerthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Maintenance record {} references unknown berth {}",
            self.record, self.berth
        )
    }
}

impl std::error::Error for UnknownMaintenanceBerthError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FleetError {
    DuplicateBerth(DuplicateBerthError),
    DuplicateVessel(DuplicateVesselError),
    UnknownMaintenanceBerth(UnknownMaintenanceBerthError),
}

impl std::fmt::Display for FleetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FleetError::DuplicateBerth(e) => write!(f, "{}", e),
            FleetError::DuplicateVessel(e) => write!(f, "{}", e),
            FleetError::UnknownMaintenanceBerth(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FleetError {}

impl From<DuplicateBerthError> for FleetError {
    fn from(err: DuplicateBerthError) -> Self {
        FleetError::DuplicateBerth(err)
    }
}

impl From<DuplicateVesselError> for FleetError {
    fn from(err: DuplicateVesselError) -> Self {
        FleetError::DuplicateVessel(err)
    }
}

impl From<UnknownMaintenanceBerthError> for FleetError {
    fn from(err: UnknownMaintenanceBerthError) -> Self {
        FleetError::UnknownMaintenanceBerth(err)
    }
}
