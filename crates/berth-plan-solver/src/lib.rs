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
//! Building schedule generations and reconciling human corrections into them.

pub mod clock;
pub mod config;
pub mod err;
pub mod estimator;
pub mod feed;
pub mod feedback;
pub mod reconcile;
pub mod registry;
pub mod scheduling;

pub mod prelude {
    pub use crate::clock::{Clock, FixedClock, SystemClock};
    pub use crate::config::{
        ConfigError, EstimatorFallback, FeedbackConfig, PlanConfig, SchedulerConfig,
    };
    pub use crate::err::{
        ConcurrencyConflictError, InvalidInputError, NotFoundError, PlanError, PlanErrorKind,
    };
    pub use crate::estimator::{
        DurationEstimator, EstimatorError, EstimatorFailure, FlatEstimator, VesselHintEstimator,
        WeatherAdjusted,
    };
    pub use crate::feed::{
        EntryFeed, FeedControl, FeedExit, FeedSink, FeedSummary, stop::StopToken,
    };
    pub use crate::feedback::{
        DisplacementFeedbackLogger, EntryPair, FeedbackLogger, NoopTrigger, ReestimationTrigger,
    };
    pub use crate::reconcile::{EntryLocks, ReconciliationOutcome, ReconciliationWorkflow};
    pub use crate::registry::{
        err::{StorageError, StoreError},
        store::{InMemoryVersionStore, VersionStore},
    };
    pub use crate::scheduling::{
        budget::BudgetedEstimator, greedy::AllocationScheduler, occupancy::BerthOccupancy,
    };
}
