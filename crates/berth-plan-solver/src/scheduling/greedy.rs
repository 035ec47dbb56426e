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
    config::{EstimatorFallback, SchedulerConfig},
    err::{InvalidInputError, PlanError},
    estimator::{DurationEstimator, EstimatorError, EstimatorFailure},
    scheduling::{budget::BudgetedEstimator, occupancy::BerthOccupancy},
};
use berth_plan_core::prelude::{TimeDelta, TimeInterval, TimePoint};
use berth_plan_model::prelude::{
    Assignment, Berth, EnvironmentalSample, Fleet, FleetView, GenerationIdentifier, Schedule,
    Vessel, first_violation,
};
use std::{collections::HashSet, sync::Arc};

/// First-fit berth allocation.
///
/// Vessels are taken in the order given and each goes to the first berth, in
/// the order given, that is suitable and free for
/// `[max(eta, now), max(eta, now) + duration)`. A conflicting berth is
/// skipped and the scan continues. Vessels that fit nowhere are reported as
/// unscheduled.
///
/// Each estimator call gets `estimator_budget_ms`; a call still running at
/// the deadline is abandoned and counts as a failed estimate.
#[derive(Clone)]
pub struct AllocationScheduler<'a> {
    estimator: Option<Arc<dyn DurationEstimator>>,
    clock: &'a dyn Clock,
    config: &'a SchedulerConfig,
}

impl std::fmt::Debug for AllocationScheduler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllocationScheduler")
            .field("estimator", &self.estimator.as_ref().map(|e| e.name()))
            .field("config", self.config)
            .finish()
    }
}

impl<'a> AllocationScheduler<'a> {
    #[inline]
    pub fn new(clock: &'a dyn Clock, config: &'a SchedulerConfig) -> Self {
        Self {
            estimator: None,
            clock,
            config,
        }
    }

    #[inline]
    pub fn with_estimator(mut self, estimator: Arc<dyn DurationEstimator>) -> Self {
        self.estimator = Some(estimator);
        self
    }

    #[inline]
    pub fn config(&self) -> &SchedulerConfig {
        self.config
    }

    /// Plans `vessels` onto `berths` with one environmental snapshot for the
    /// whole pass.
    #[tracing::instrument(level = "debug", skip_all, fields(berths = berths.len()))]
    pub fn build_schedule<'v, I>(
        &self,
        berths: &[Berth],
        vessels: I,
        env: Option<&EnvironmentalSample>,
    ) -> Result<Schedule, PlanError>
    where
        I: IntoIterator<Item = &'v Vessel>,
    {
        self.run(berths, vessels, |_| env)
    }

    /// Plans one generation of `fleet`: vessels by arrival estimate, each
    /// estimated against the weather sample nearest its own arrival.
    #[tracing::instrument(level = "debug", skip(self, fleet))]
    pub fn build_for_generation(
        &self,
        fleet: &Fleet,
        generation: GenerationIdentifier,
    ) -> Result<Schedule, PlanError> {
        let vessels = fleet.vessels_in_generation(generation);
        self.run(fleet.berths(), vessels, |v| fleet.nearest_sample(v.eta()))
    }

    fn run<'v, 'e, I, F>(
        &self,
        berths: &[Berth],
        vessels: I,
        env_for: F,
    ) -> Result<Schedule, PlanError>
    where
        I: IntoIterator<Item = &'v Vessel>,
        F: Fn(&Vessel) -> Option<&'e EnvironmentalSample>,
    {
        let mut seen_berths = HashSet::with_capacity(berths.len());
        for b in berths {
            if !seen_berths.insert(b.id()) {
                return Err(InvalidInputError::DuplicateBerth(b.id()).into());
            }
        }

        let now = self.clock.now();
        let mut occupancy: Vec<BerthOccupancy<'_>> =
            berths.iter().map(BerthOccupancy::new).collect();
        let mut seen_vessels = HashSet::new();
        let mut schedule = Schedule::new();
        let mut estimator = self
            .estimator
            .as_ref()
            .map(|e| BudgetedEstimator::new(Arc::clone(e), self.config.estimator_budget()));

        for vessel in vessels {
            if !seen_vessels.insert(vessel.id()) {
                return Err(InvalidInputError::DuplicateVessel(vessel.id()).into());
            }
            let start = vessel.eta().max(now);
            match self.place(
                vessel,
                start,
                &mut occupancy,
                &mut estimator,
                env_for(vessel),
            )? {
                Some(a) => {
                    tracing::trace!(%a, "placed");
                    schedule.push(a);
                }
                None => {
                    tracing::debug!(vessel = %vessel.id(), "no suitable free berth, left unscheduled");
                    schedule.mark_unscheduled(vessel.id());
                }
            }
        }

        tracing::info!(
            scheduled = schedule.len(),
            unscheduled = schedule.unscheduled().len(),
            now = %now,
            "Schedule built"
        );
        Ok(schedule)
    }

    fn place(
        &self,
        vessel: &Vessel,
        start: TimePoint<i64>,
        occupancy: &mut [BerthOccupancy<'_>],
        estimator: &mut Option<BudgetedEstimator>,
        env: Option<&EnvironmentalSample>,
    ) -> Result<Option<Assignment>, PlanError> {
        for occ in occupancy.iter_mut() {
            let berth = occ.berth();
            if let Some(reason) = first_violation(berth, vessel) {
                tracing::trace!(vessel = %vessel.id(), berth = %berth.id(), %reason, "unsuitable");
                continue;
            }

            let duration = self.duration_for(estimator, vessel, berth, env)?;
            let end = start
                .checked_add(duration)
                .ok_or(InvalidInputError::TimeOverflow(vessel.id()))?;
            let interval = TimeInterval::new(start, end);

            if let Err(e) = occ.occupy(interval) {
                tracing::trace!(vessel = %vessel.id(), "{}", e);
                continue;
            }
            return Ok(Some(Assignment::new(vessel.id(), berth.id(), interval)));
        }
        Ok(None)
    }

    fn duration_for(
        &self,
        estimator: &mut Option<BudgetedEstimator>,
        vessel: &Vessel,
        berth: &Berth,
        env: Option<&EnvironmentalSample>,
    ) -> Result<TimeDelta<i64>, PlanError> {
        let Some(estimator) = estimator.as_mut() else {
            return Ok(self.config.default_duration());
        };

        let checked = estimator.estimate(vessel, berth, env).and_then(|d| {
            if d.is_positive() {
                Ok(d)
            } else {
                Err(EstimatorFailure::NonPositive(d.value()))
            }
        });

        match checked {
            Ok(d) => Ok(d),
            Err(failure) => match self.config.estimator_fallback {
                EstimatorFallback::Fail => {
                    Err(EstimatorError::new(vessel.id(), berth.id(), failure).into())
                }
                EstimatorFallback::UseDefault => {
                    tracing::warn!(
                        vessel = %vessel.id(),
                        berth = %berth.id(),
                        estimator = estimator.name(),
                        %failure,
                        "Estimator failed, using default duration"
                    );
                    Ok(self.config.default_duration())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::FixedClock,
        err::PlanErrorKind,
        estimator::{FlatEstimator, VesselHintEstimator},
    };
    use berth_plan_model::prelude::{
        BerthEnvelope, BerthIdentifier, CargoType, Condition, FleetIdentifier, Placement,
        Readings, ScheduleValidator, VesselDimensions, VesselIdentifier,
    };
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const T: i64 = 1_750_000_000;

    #[inline]
    fn tp(v: i64) -> TimePoint<i64> {
        TimePoint::new(v)
    }
    #[inline]
    fn iv(a: i64, b: i64) -> TimeInterval<i64> {
        TimeInterval::new(tp(a), tp(b))
    }
    #[inline]
    fn bid(n: u32) -> BerthIdentifier {
        BerthIdentifier::new(n)
    }
    #[inline]
    fn vid(n: u64) -> VesselIdentifier {
        VesselIdentifier::new(n)
    }

    fn berth(id: u32, name: &str, max_loa: f64, types: &[&str]) -> Berth {
        Berth::new(
            bid(id),
            name,
            BerthEnvelope::new(max_loa, 50.0, 16.0, 200_000.0),
            types.iter().copied(),
        )
    }

    fn vessel(id: u64, loa: f64, cargo: &str, eta: i64) -> Vessel {
        Vessel::new(
            vid(id),
            FleetIdentifier::new(id),
            VesselDimensions::new(loa, 30.0, 10.0, 50_000.0),
            Some(CargoType::new(cargo)),
            tp(eta),
        )
    }

    struct FailingEstimator;

    impl DurationEstimator for FailingEstimator {
        fn estimate(
            &self,
            _: &Vessel,
            _: &Berth,
            _: Option<&EnvironmentalSample>,
        ) -> Result<TimeDelta<i64>, EstimatorFailure> {
            Err(EstimatorFailure::Unavailable("model offline".into()))
        }
    }

    struct SlowEstimator;

    impl DurationEstimator for SlowEstimator {
        fn estimate(
            &self,
            _: &Vessel,
            _: &Berth,
            _: Option<&EnvironmentalSample>,
        ) -> Result<TimeDelta<i64>, EstimatorFailure> {
            std::thread::sleep(std::time::Duration::from_millis(30));
            Ok(TimeDelta::hours(1))
        }
    }

    /// Returns a duration that depends on the weather it is handed.
    struct ConditionEstimator;

    impl DurationEstimator for ConditionEstimator {
        fn estimate(
            &self,
            _: &Vessel,
            _: &Berth,
            env: Option<&EnvironmentalSample>,
        ) -> Result<TimeDelta<i64>, EstimatorFailure> {
            Ok(match env.map(|s| s.condition()) {
                Some(Condition::Storm) => TimeDelta::hours(5),
                _ => TimeDelta::hours(1),
            })
        }
    }

    struct CountingEstimator(AtomicUsize);

    impl DurationEstimator for CountingEstimator {
        fn estimate(
            &self,
            _: &Vessel,
            _: &Berth,
            _: Option<&EnvironmentalSample>,
        ) -> Result<TimeDelta<i64>, EstimatorFailure> {
            self.0.fetch_add(1, Ordering::Relaxed);
            Ok(TimeDelta::hours(1))
        }
    }

    #[test]
    fn test_assigns_to_first_suitable_berth() {
        let clock = FixedClock::new(tp(T - 3_600));
        let cfg = SchedulerConfig::default();
        let est = Arc::new(FlatEstimator::new(TimeDelta::hours(8)));
        let scheduler = AllocationScheduler::new(&clock, &cfg).with_estimator(est.clone());

        let berths = [
            berth(1, "A", 300.0, &["BULK"]),
            berth(2, "B", 200.0, &["CONTAINER"]),
        ];
        let v = vessel(1, 250.0, "BULK", T);
        let s = scheduler.build_schedule(&berths, [&v], None).unwrap();

        assert_eq!(s.len(), 1);
        let a = s.assignments()[0];
        assert_eq!(a.berth_id(), bid(1));
        assert_eq!(a.interval(), iv(T, T + 8 * 3_600));
        assert!(s.unscheduled().is_empty());
    }

    #[test]
    fn test_start_is_never_before_now() {
        let clock = FixedClock::new(tp(T + 600));
        let cfg = SchedulerConfig::default();
        let scheduler = AllocationScheduler::new(&clock, &cfg);

        let berths = [berth(1, "A", 300.0, &["BULK"])];
        let v = vessel(1, 250.0, "BULK", T);
        let s = scheduler.build_schedule(&berths, [&v], None).unwrap();
        // No estimator: the configured default duration applies.
        assert_eq!(
            s.assignments()[0].interval(),
            iv(T + 600, T + 600 + cfg.default_duration_secs)
        );
    }

    #[test]
    fn test_conflicting_vessel_is_unscheduled() {
        let clock = FixedClock::new(tp(0));
        let cfg = SchedulerConfig::default();
        let est = Arc::new(FlatEstimator::new(TimeDelta::hours(2)));
        let scheduler = AllocationScheduler::new(&clock, &cfg).with_estimator(est.clone());

        let berths = [berth(1, "A", 300.0, &["BULK"])];
        let v1 = vessel(1, 200.0, "BULK", T);
        let v2 = vessel(2, 210.0, "BULK", T);
        let s = scheduler.build_schedule(&berths, [&v1, &v2], None).unwrap();

        assert_eq!(s.len(), 1);
        assert!(s.is_scheduled(vid(1)));
        assert_eq!(s.unscheduled(), &[vid(2)]);
    }

    #[test]
    fn test_conflict_moves_on_to_next_berth() {
        let clock = FixedClock::new(tp(0));
        let cfg = SchedulerConfig::default();
        let est = Arc::new(FlatEstimator::new(TimeDelta::hours(2)));
        let scheduler = AllocationScheduler::new(&clock, &cfg).with_estimator(est.clone());

        let berths = [
            berth(1, "A", 300.0, &["BULK"]),
            berth(2, "B", 300.0, &["BULK"]),
        ];
        let v1 = vessel(1, 200.0, "BULK", T);
        let v2 = vessel(2, 200.0, "BULK", T + 60);
        let v3 = vessel(3, 200.0, "BULK", T + 2 * 3_600);
        let s = scheduler
            .build_schedule(&berths, [&v1, &v2, &v3], None)
            .unwrap();

        assert_eq!(s.assignment_for(vid(1)).unwrap().berth_id(), bid(1));
        assert_eq!(s.assignment_for(vid(2)).unwrap().berth_id(), bid(2));
        // Berth A is free again exactly when v1 leaves.
        assert_eq!(s.assignment_for(vid(3)).unwrap().berth_id(), bid(1));
    }

    #[test]
    fn test_no_berths_leaves_everything_unscheduled() {
        let clock = FixedClock::new(tp(0));
        let cfg = SchedulerConfig::default();
        let scheduler = AllocationScheduler::new(&clock, &cfg);
        let v1 = vessel(1, 200.0, "BULK", T);
        let v2 = vessel(2, 200.0, "TANKER", T);
        let s = scheduler.build_schedule(&[], [&v1, &v2], None).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.unscheduled(), &[vid(1), vid(2)]);
    }

    #[test]
    fn test_unsuitable_berths_are_not_estimated() {
        let clock = FixedClock::new(tp(0));
        let cfg = SchedulerConfig::default();
        let est = Arc::new(CountingEstimator(AtomicUsize::new(0)));
        let scheduler = AllocationScheduler::new(&clock, &cfg).with_estimator(est.clone());
        let berths = [
            berth(1, "A", 100.0, &["BULK"]),
            berth(2, "B", 300.0, &["CONTAINER"]),
            berth(3, "C", 300.0, &["BULK"]),
        ];
        let v = vessel(1, 200.0, "BULK", T);
        let s = scheduler.build_schedule(&berths, [&v], None).unwrap();
        assert_eq!(s.assignments()[0].berth_id(), bid(3));
        assert_eq!(est.0.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_duplicate_inputs_are_rejected() {
        let clock = FixedClock::new(tp(0));
        let cfg = SchedulerConfig::default();
        let scheduler = AllocationScheduler::new(&clock, &cfg);
        let berths = [berth(1, "A", 300.0, &["BULK"])];
        let v = vessel(1, 200.0, "BULK", T);
        let err = scheduler.build_schedule(&berths, [&v, &v], None).unwrap_err();
        assert_eq!(err.kind(), PlanErrorKind::InvalidInput);

        let twice = [berth(1, "A", 300.0, &["BULK"]), berth(1, "B", 300.0, &["BULK"])];
        let err = scheduler.build_schedule(&twice, [&v], None).unwrap_err();
        assert_eq!(err.kind(), PlanErrorKind::InvalidInput);
    }

    #[test]
    fn test_estimator_failure_aborts_build() {
        let clock = FixedClock::new(tp(0));
        let cfg = SchedulerConfig::default();
        let est = Arc::new(FailingEstimator);
        let scheduler = AllocationScheduler::new(&clock, &cfg).with_estimator(est.clone());
        let berths = [berth(1, "A", 300.0, &["BULK"])];
        let v = vessel(1, 200.0, "BULK", T);
        let err = scheduler.build_schedule(&berths, [&v], None).unwrap_err();
        assert_eq!(err.kind(), PlanErrorKind::EstimatorUnavailable);
    }

    #[test]
    fn test_estimator_failure_uses_default_when_configured() {
        let clock = FixedClock::new(tp(0));
        let cfg = SchedulerConfig {
            estimator_fallback: EstimatorFallback::UseDefault,
            default_duration_secs: 900,
            ..SchedulerConfig::default()
        };
        let est = Arc::new(FailingEstimator);
        let scheduler = AllocationScheduler::new(&clock, &cfg).with_estimator(est.clone());
        let berths = [berth(1, "A", 300.0, &["BULK"])];
        let v = vessel(1, 200.0, "BULK", T);
        let s = scheduler.build_schedule(&berths, [&v], None).unwrap();
        assert_eq!(s.assignments()[0].interval(), iv(T, T + 900));
    }

    #[test]
    fn test_slow_estimator_counts_as_unavailable() {
        let clock = FixedClock::new(tp(0));
        let cfg = SchedulerConfig {
            estimator_budget_ms: 5,
            ..SchedulerConfig::default()
        };
        let est = Arc::new(SlowEstimator);
        let scheduler = AllocationScheduler::new(&clock, &cfg).with_estimator(est.clone());
        let berths = [berth(1, "A", 300.0, &["BULK"])];
        let v = vessel(1, 200.0, "BULK", T);
        match scheduler.build_schedule(&berths, [&v], None) {
            Err(PlanError::EstimatorUnavailable(e)) => {
                assert!(matches!(e.failure(), EstimatorFailure::OverBudget { .. }));
            }
            other => panic!("expected EstimatorUnavailable, got {:?}", other),
        }
    }

    struct StuckEstimator;

    impl DurationEstimator for StuckEstimator {
        fn estimate(
            &self,
            _: &Vessel,
            _: &Berth,
            _: Option<&EnvironmentalSample>,
        ) -> Result<TimeDelta<i64>, EstimatorFailure> {
            std::thread::sleep(std::time::Duration::from_secs(3));
            Ok(TimeDelta::hours(1))
        }
    }

    #[test]
    fn test_stuck_estimator_fails_within_budget() {
        let clock = FixedClock::new(tp(0));
        let cfg = SchedulerConfig {
            estimator_budget_ms: 50,
            ..SchedulerConfig::default()
        };
        let est = Arc::new(StuckEstimator);
        let scheduler = AllocationScheduler::new(&clock, &cfg).with_estimator(est.clone());
        let berths = [berth(1, "A", 300.0, &["BULK"])];
        let v = vessel(1, 200.0, "BULK", T);

        let started = std::time::Instant::now();
        let result = scheduler.build_schedule(&berths, [&v], None);
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
        match result {
            Err(PlanError::EstimatorUnavailable(e)) => {
                assert!(matches!(
                    e.failure(),
                    EstimatorFailure::OverBudget { budget_ms: 50, .. }
                ));
            }
            other => panic!("expected EstimatorUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_stuck_estimator_falls_back_per_call() {
        let clock = FixedClock::new(tp(0));
        let cfg = SchedulerConfig {
            estimator_budget_ms: 50,
            estimator_fallback: EstimatorFallback::UseDefault,
            default_duration_secs: 600,
            ..SchedulerConfig::default()
        };
        let est = Arc::new(StuckEstimator);
        let scheduler = AllocationScheduler::new(&clock, &cfg).with_estimator(est.clone());
        let berths = [berth(1, "A", 300.0, &["BULK"])];
        let v1 = vessel(1, 200.0, "BULK", T);
        let v2 = vessel(2, 200.0, "BULK", T + 600);

        let started = std::time::Instant::now();
        let s = scheduler.build_schedule(&berths, [&v1, &v2], None).unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
        assert_eq!(s.assignment_for(vid(1)).unwrap().interval(), iv(T, T + 600));
        assert_eq!(
            s.assignment_for(vid(2)).unwrap().interval(),
            iv(T + 600, T + 1_200)
        );
    }

    #[test]
    fn test_non_positive_estimate_is_a_failure() {
        let clock = FixedClock::new(tp(0));
        let cfg = SchedulerConfig::default();
        let est = Arc::new(FlatEstimator::new(TimeDelta::zero()));
        let scheduler = AllocationScheduler::new(&clock, &cfg).with_estimator(est.clone());
        let berths = [berth(1, "A", 300.0, &["BULK"])];
        let v = vessel(1, 200.0, "BULK", T);
        assert!(matches!(
            scheduler.build_schedule(&berths, [&v], None),
            Err(PlanError::EstimatorUnavailable(_))
        ));
    }

    #[test]
    fn test_identical_inputs_give_identical_schedules() {
        let clock = FixedClock::new(tp(T));
        let cfg = SchedulerConfig::default();
        let est = Arc::new(VesselHintEstimator::new(TimeDelta::hours(3)));
        let scheduler = AllocationScheduler::new(&clock, &cfg).with_estimator(est.clone());
        let berths = [
            berth(1, "A", 300.0, &["BULK", "TANKER"]),
            berth(2, "B", 250.0, &["BULK"]),
        ];
        let vessels: Vec<Vessel> = (0..12)
            .map(|i| {
                vessel(i, 180.0 + i as f64 * 5.0, if i % 3 == 0 { "TANKER" } else { "BULK" }, T + (i as i64) * 1_800)
                    .with_estimated_duration(TimeDelta::minutes(90 + 10 * i as i64))
            })
            .collect();

        let a = scheduler.build_schedule(&berths, &vessels, None).unwrap();
        let b = scheduler.build_schedule(&berths, &vessels, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generation_build_uses_weather_nearest_each_arrival() {
        let mut fleet = Fleet::new();
        fleet.insert_berth(berth(1, "A", 300.0, &["BULK"])).unwrap();
        fleet.insert_berth(berth(2, "B", 300.0, &["BULK"])).unwrap();
        let g = GenerationIdentifier::new(1);
        // Inserted out of arrival order on purpose.
        fleet.insert_vessel(g, vessel(2, 200.0, "BULK", T + 10 * 3_600)).unwrap();
        fleet.insert_vessel(g, vessel(1, 200.0, "BULK", T)).unwrap();
        fleet.record_sample(EnvironmentalSample::calm_at(tp(T)));
        fleet.record_sample(EnvironmentalSample::new(
            tp(T + 10 * 3_600),
            Condition::Storm,
            Readings::default(),
        ));

        let clock = FixedClock::new(tp(0));
        let cfg = SchedulerConfig::default();
        let est = Arc::new(ConditionEstimator);
        let scheduler = AllocationScheduler::new(&clock, &cfg).with_estimator(est.clone());
        let s = scheduler.build_for_generation(&fleet, g).unwrap();

        let order: Vec<_> = s.iter().map(|a| a.vessel_id()).collect();
        assert_eq!(order, vec![vid(1), vid(2)]);
        assert_eq!(s.assignment_for(vid(1)).unwrap().interval(), iv(T, T + 3_600));
        assert_eq!(
            s.assignment_for(vid(2)).unwrap().interval(),
            iv(T + 10 * 3_600, T + 15 * 3_600)
        );
    }

    #[test]
    fn test_random_fleets_always_validate() {
        const TYPES: [&str; 3] = ["BULK", "CONTAINER", "TANKER"];

        for seed in 0..25u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut fleet = Fleet::new();
            let n_berths = rng.random_range(1..6u32);
            for b in 0..n_berths {
                let t1 = TYPES[rng.random_range(0..TYPES.len())];
                let t2 = TYPES[rng.random_range(0..TYPES.len())];
                fleet
                    .insert_berth(Berth::new(
                        bid(b + 1),
                        format!("B{b}"),
                        BerthEnvelope::new(
                            rng.random_range(150.0..350.0),
                            rng.random_range(25.0..50.0),
                            rng.random_range(8.0..16.0),
                            100_000.0,
                        ),
                        [t1, t2],
                    ))
                    .unwrap();
            }

            let g = GenerationIdentifier::new(1);
            let n_vessels = rng.random_range(5..60u64);
            for v in 0..n_vessels {
                let cargo = TYPES[rng.random_range(0..TYPES.len())];
                let vessel = Vessel::new(
                    vid(v + 1),
                    FleetIdentifier::new(v + 1),
                    VesselDimensions::new(
                        rng.random_range(80.0..330.0),
                        rng.random_range(15.0..48.0),
                        rng.random_range(5.0..15.0),
                        30_000.0,
                    ),
                    Some(CargoType::new(cargo)),
                    tp(T + rng.random_range(0..48 * 3_600)),
                )
                .with_estimated_duration(TimeDelta::minutes(rng.random_range(30..900)));
                fleet.insert_vessel(g, vessel).unwrap();
            }

            let now = T + rng.random_range(0..24 * 3_600);
            let clock = FixedClock::new(tp(now));
            let cfg = SchedulerConfig::default();
            let est = Arc::new(VesselHintEstimator::new(TimeDelta::hours(4)));
            let scheduler = AllocationScheduler::new(&clock, &cfg).with_estimator(est.clone());
            let s = scheduler.build_for_generation(&fleet, g).unwrap();

            ScheduleValidator::validate(s.assignments(), &fleet)
                .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
            assert_eq!(s.len() + s.unscheduled().len(), n_vessels as usize);
            for a in s.iter() {
                let v = fleet.vessel(a.vessel_id()).unwrap();
                assert_eq!(a.start(), v.eta().max(tp(now)), "seed {seed}");
                assert!(!s.unscheduled().contains(&a.vessel_id()));
            }
        }
    }
}
