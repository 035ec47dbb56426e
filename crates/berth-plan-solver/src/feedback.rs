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
    clock::Clock,
    config::{ConfigError, FeedbackConfig},
    err::{InvalidInputError, PlanError},
};
use berth_plan_core::prelude::{Ewma, TimePoint};
use berth_plan_model::prelude::{
    FeedbackRecord, GenerationIdentifier, Placement, VesselScheduleEntry,
};
use parking_lot::Mutex;

/// The two sides of one reconciled entry, with full vessel and berth context.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryPair {
    old: VesselScheduleEntry,
    new: VesselScheduleEntry,
}

impl EntryPair {
    #[inline]
    pub fn new(old: VesselScheduleEntry, new: VesselScheduleEntry) -> Self {
        Self { old, new }
    }

    #[inline]
    pub fn old(&self) -> &VesselScheduleEntry {
        &self.old
    }

    #[inline]
    pub fn new_side(&self) -> &VesselScheduleEntry {
        &self.new
    }

    /// `|Δstart| + |Δend|` of the planned interval, in minutes.
    pub fn displacement_minutes(&self) -> f64 {
        let (o, n) = (self.old.entry(), self.new.entry());
        let shift = |a: TimePoint<i64>, b: TimePoint<i64>| {
            (i128::from(b.value()) - i128::from(a.value())).unsigned_abs()
        };
        let secs = shift(o.start(), n.start()) + shift(o.end(), n.end());
        secs as f64 / 60.0
    }

    #[inline]
    pub fn changed_berth(&self) -> bool {
        self.old.entry().berth() != self.new.entry().berth()
    }
}

/// Total displaced minutes over a batch.
#[inline]
pub fn batch_displacement_minutes(pairs: &[EntryPair]) -> f64 {
    pairs.iter().map(EntryPair::displacement_minutes).sum()
}

/// Sink for reconciliation discrepancies.
pub trait FeedbackLogger: Send + Sync {
    /// Computes one discrepancy for the batch and appends a record for it.
    fn log_discrepancy(
        &self,
        generation: GenerationIdentifier,
        pairs: &[EntryPair],
    ) -> Result<FeedbackRecord, PlanError>;

    /// Records logged at or after `cutoff`, oldest first.
    fn errors_since(&self, cutoff: TimePoint<i64>) -> Result<Vec<FeedbackRecord>, PlanError>;
}

impl<L: FeedbackLogger + ?Sized> FeedbackLogger for &L {
    #[inline]
    fn log_discrepancy(
        &self,
        generation: GenerationIdentifier,
        pairs: &[EntryPair],
    ) -> Result<FeedbackRecord, PlanError> {
        (**self).log_discrepancy(generation, pairs)
    }

    #[inline]
    fn errors_since(&self, cutoff: TimePoint<i64>) -> Result<Vec<FeedbackRecord>, PlanError> {
        (**self).errors_since(cutoff)
    }
}

/// Asked to re-estimate durations once feedback drifts too far.
pub trait ReestimationTrigger: Send + Sync {
    fn request(&self, generation: GenerationIdentifier, smoothed_minutes: f64);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTrigger;

impl ReestimationTrigger for NoopTrigger {
    #[inline]
    fn request(&self, _: GenerationIdentifier, _: f64) {}
}

#[derive(Debug)]
struct LoggerState {
    records: Vec<FeedbackRecord>,
    smoothed: Ewma<f64>,
}

/// In-memory [`FeedbackLogger`] scoring batches by total displaced minutes.
///
/// Each logged batch is folded into an EWMA; when the smoothed value reaches
/// `retrain_threshold_minutes` the trigger is asked to re-estimate.
#[derive(Debug)]
pub struct DisplacementFeedbackLogger<C, T = NoopTrigger> {
    clock: C,
    trigger: T,
    threshold: f64,
    state: Mutex<LoggerState>,
}

impl<C: Clock> DisplacementFeedbackLogger<C, NoopTrigger> {
    #[inline]
    pub fn new(clock: C, config: &FeedbackConfig) -> Result<Self, ConfigError> {
        Self::with_trigger(clock, NoopTrigger, config)
    }
}

impl<C: Clock, T: ReestimationTrigger> DisplacementFeedbackLogger<C, T> {
    pub fn with_trigger(clock: C, trigger: T, config: &FeedbackConfig) -> Result<Self, ConfigError> {
        let smoothed = Ewma::new(config.smoothing_alpha)
            .map_err(|e| ConfigError::InvalidSmoothingAlpha(e.value()))?;
        Ok(Self {
            clock,
            trigger,
            threshold: config.retrain_threshold_minutes,
            state: Mutex::new(LoggerState {
                records: Vec::new(),
                smoothed,
            }),
        })
    }

    #[inline]
    pub fn smoothed_error(&self) -> Option<f64> {
        self.state.lock().smoothed.value()
    }

    #[inline]
    pub fn record_count(&self) -> usize {
        self.state.lock().records.len()
    }

    #[inline]
    pub fn trigger(&self) -> &T {
        &self.trigger
    }
}

impl<C: Clock, T: ReestimationTrigger> FeedbackLogger for DisplacementFeedbackLogger<C, T> {
    #[tracing::instrument(level = "debug", skip(self, pairs), fields(pairs = pairs.len()))]
    fn log_discrepancy(
        &self,
        generation: GenerationIdentifier,
        pairs: &[EntryPair],
    ) -> Result<FeedbackRecord, PlanError> {
        for pair in pairs {
            for side in [pair.old(), pair.new_side()] {
                let entry = side.entry();
                if entry.generation() != generation {
                    return Err(InvalidInputError::GenerationMismatch {
                        entry: entry.id(),
                        expected: generation,
                        found: entry.generation(),
                    }
                    .into());
                }
            }
        }

        let error = batch_displacement_minutes(pairs);
        let record = FeedbackRecord::new(generation, self.clock.now(), error, pairs.len());

        let smoothed = {
            let mut state = self.state.lock();
            state.records.push(record);
            state.smoothed.observe(error)
        };
        tracing::info!(%generation, error, pairs = pairs.len(), "Discrepancy logged");

        if let Some(s) = smoothed
            && s >= self.threshold
        {
            tracing::info!(%generation, smoothed = s, threshold = self.threshold, "Requesting re-estimation");
            self.trigger.request(generation, s);
        }
        Ok(record)
    }

    fn errors_since(&self, cutoff: TimePoint<i64>) -> Result<Vec<FeedbackRecord>, PlanError> {
        let state = self.state.lock();
        Ok(state
            .records
            .iter()
            .filter(|r| r.recorded_at() >= cutoff)
            .copied()
            .collect())
    }
}
