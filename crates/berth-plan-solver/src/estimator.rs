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
//! The duration estimator seam.
//!
//! How durations are predicted (regression, lookup tables, trained models)
//! lives outside this crate; the scheduler only sees [`DurationEstimator`].

use berth_plan_core::prelude::TimeDelta;
use berth_plan_model::prelude::{
    Berth, BerthIdentifier, Condition, EnvironmentalSample, Vessel, VesselIdentifier,
};

/// Why an estimate could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EstimatorFailure {
    Unavailable(String),
    OverBudget { elapsed_ms: u64, budget_ms: u64 },
    NonPositive(i64),
}

impl std::fmt::Display for EstimatorFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimatorFailure::Unavailable(reason) => write!(f, "unavailable: {}", reason),
            EstimatorFailure::OverBudget {
                elapsed_ms,
                budget_ms,
            } => write!(f, "took {} ms, budget is {} ms", elapsed_ms, budget_ms),
            EstimatorFailure::NonPositive(secs) => {
                write!(f, "returned non-positive duration of {} s", secs)
            }
        }
    }
}

impl std::error::Error for EstimatorFailure {}

/// An estimator failure tied to the vessel/berth pair it was asked about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EstimatorError {
    vessel: VesselIdentifier,
    berth: BerthIdentifier,
    failure: EstimatorFailure,
}

impl EstimatorError {
    #[inline]
    pub fn new(vessel: VesselIdentifier, berth: BerthIdentifier, failure: EstimatorFailure) -> Self {
        Self {
            vessel,
            berth,
            failure,
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
    pub fn failure(&self) -> &EstimatorFailure {
        &self.failure
    }
}

impl std::fmt::Display for EstimatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Duration estimate for vessel {} at berth {} failed: {}",
            self.vessel, self.berth, self.failure
        )
    }
}

impl std::error::Error for EstimatorError {}

pub trait DurationEstimator: Send + Sync {
    #[inline]
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Expected occupancy of `berth` by `vessel` under `env`, if a sample is
    /// available.
    fn estimate(
        &self,
        vessel: &Vessel,
        berth: &Berth,
        env: Option<&EnvironmentalSample>,
    ) -> Result<TimeDelta<i64>, EstimatorFailure>;
}

impl<E: DurationEstimator + ?Sized> DurationEstimator for &E {
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn estimate(
        &self,
        vessel: &Vessel,
        berth: &Berth,
        env: Option<&EnvironmentalSample>,
    ) -> Result<TimeDelta<i64>, EstimatorFailure> {
        (**self).estimate(vessel, berth, env)
    }
}

/// Same duration for every pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatEstimator(TimeDelta<i64>);

impl FlatEstimator {
    #[inline]
    pub fn new(duration: TimeDelta<i64>) -> Self {
        Self(duration)
    }
}

impl DurationEstimator for FlatEstimator {
    #[inline]
    fn estimate(
        &self,
        _vessel: &Vessel,
        _berth: &Berth,
        _env: Option<&EnvironmentalSample>,
    ) -> Result<TimeDelta<i64>, EstimatorFailure> {
        Ok(self.0)
    }
}

/// Uses the vessel's own estimated duration when it carries one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VesselHintEstimator {
    fallback: TimeDelta<i64>,
}

impl VesselHintEstimator {
    #[inline]
    pub fn new(fallback: TimeDelta<i64>) -> Self {
        Self { fallback }
    }
}

impl DurationEstimator for VesselHintEstimator {
    #[inline]
    fn estimate(
        &self,
        vessel: &Vessel,
        _berth: &Berth,
        _env: Option<&EnvironmentalSample>,
    ) -> Result<TimeDelta<i64>, EstimatorFailure> {
        Ok(vessel.estimated_duration().unwrap_or(self.fallback))
    }
}

/// Stretches an inner estimate by a per-condition factor in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherAdjusted<E> {
    inner: E,
    rain_pct: i64,
    storm_pct: i64,
    fog_pct: i64,
}

impl<E> WeatherAdjusted<E> {
    #[inline]
    pub fn new(inner: E) -> Self {
        Self {
            inner,
            rain_pct: 110,
            storm_pct: 150,
            fog_pct: 120,
        }
    }

    #[inline]
    pub fn with_factors(mut self, rain_pct: i64, storm_pct: i64, fog_pct: i64) -> Self {
        self.rain_pct = rain_pct;
        self.storm_pct = storm_pct;
        self.fog_pct = fog_pct;
        self
    }

    fn factor_pct(&self, env: Option<&EnvironmentalSample>) -> i64 {
        match env.map(|s| s.condition()) {
            Some(Condition::Rain) => self.rain_pct,
            Some(Condition::Storm) => self.storm_pct,
            Some(Condition::Fog) => self.fog_pct,
            _ => 100,
        }
    }
}

impl<E: DurationEstimator> DurationEstimator for WeatherAdjusted<E> {
    fn estimate(
        &self,
        vessel: &Vessel,
        berth: &Berth,
        env: Option<&EnvironmentalSample>,
    ) -> Result<TimeDelta<i64>, EstimatorFailure> {
        let base = self.inner.estimate(vessel, berth, env)?;
        let pct = self.factor_pct(env);
        base.value()
            .checked_mul(pct)
            .map(|v| TimeDelta::seconds(v / 100))
            .ok_or_else(|| EstimatorFailure::Unavailable("weather adjustment overflowed".into()))
    }
}
