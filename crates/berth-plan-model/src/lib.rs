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
//! Domain model for berth planning: reference data, schedule entries and
//! generations, corrections, and the invariant checks every generation holds.

pub mod common;
pub mod compat;
pub mod fleet;
pub mod loader;
pub mod schedule;
pub mod validation;

pub mod prelude {
    pub use crate::common::{
        BerthIdentifier, EntryIdentifier, FleetIdentifier, GenerationIdentifier, Identifier,
        MaintenanceIdentifier, VesselIdentifier,
    };
    pub use crate::compat::{SuitabilityViolation, deadweight_headroom, first_violation, is_suitable};
    pub use crate::fleet::{
        berth::{Berth, BerthEnvelope, CargoType},
        container::{Fleet, FleetView},
        environment::{Condition, EnvironmentalSample, MaintenanceRecord, Readings},
        err::FleetError,
        vessel::{Vessel, VesselDimensions},
    };
    pub use crate::loader::{SnapshotLoader, err::SnapshotLoaderError, to_time_point, to_utc};
    pub use crate::schedule::{
        Placement,
        change::{FieldChange, FieldChangeSet, HumanFix},
        entry::{ActualTimes, EntryDraft, ScheduleEntry, VesselScheduleEntry},
        err::{ChangeError, LookupError},
        feedback::FeedbackRecord,
        plan::{Assignment, Schedule},
    };
    pub use crate::validation::{ScheduleValidator, err::ValidationError};
}
