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
use crate::estimator::{DurationEstimator, EstimatorFailure};
use berth_plan_core::prelude::TimeDelta;
use berth_plan_model::prelude::{Berth, EnvironmentalSample, Vessel};
use std::{
    sync::{
        Arc,
        mpsc::{self, RecvTimeoutError},
    },
    thread,
    time::{Duration, Instant},
};

type Reply = Result<TimeDelta<i64>, EstimatorFailure>;

struct Request {
    vessel: Vessel,
    berth: Berth,
    env: Option<EnvironmentalSample>,
}

struct Worker {
    requests: mpsc::Sender<Request>,
    replies: mpsc::Receiver<Reply>,
}

impl Worker {
    fn spawn(estimator: Arc<dyn DurationEstimator>) -> Result<Self, EstimatorFailure> {
        let (req_tx, req_rx) = mpsc::channel::<Request>();
        let (rep_tx, rep_rx) = mpsc::channel::<Reply>();
        thread::Builder::new()
            .name("duration-estimator".into())
            .spawn(move || {
                for req in req_rx {
                    let reply = estimator.estimate(&req.vessel, &req.berth, req.env.as_ref());
                    if rep_tx.send(reply).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| {
                EstimatorFailure::Unavailable(format!("cannot start estimator thread: {}", e))
            })?;
        Ok(Self {
            requests: req_tx,
            replies: rep_rx,
        })
    }
}

/// A [`DurationEstimator`] behind a per-call time budget.
///
/// Calls run on a helper thread and the caller waits at most `budget` for the
/// reply. A call that outlives the budget is abandoned: its thread is left to
/// finish on its own and the next call starts a fresh one. The helper thread
/// exits once the `BudgetedEstimator` is dropped.
pub struct BudgetedEstimator {
    estimator: Arc<dyn DurationEstimator>,
    budget: Duration,
    worker: Option<Worker>,
}

impl std::fmt::Debug for BudgetedEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetedEstimator")
            .field("estimator", &self.estimator.name())
            .field("budget", &self.budget)
            .field("running", &self.worker.is_some())
            .finish()
    }
}

impl BudgetedEstimator {
    #[inline]
    pub fn new(estimator: Arc<dyn DurationEstimator>, budget: Duration) -> Self {
        Self {
            estimator,
            budget,
            worker: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.estimator.name()
    }

    #[inline]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn estimate(
        &mut self,
        vessel: &Vessel,
        berth: &Berth,
        env: Option<&EnvironmentalSample>,
    ) -> Reply {
        let worker = match self.worker.take() {
            Some(w) => w,
            None => Worker::spawn(Arc::clone(&self.estimator))?,
        };

        let request = Request {
            vessel: vessel.clone(),
            berth: berth.clone(),
            env: env.cloned(),
        };
        let started = Instant::now();
        if worker.requests.send(request).is_err() {
            return Err(EstimatorFailure::Unavailable(
                "estimator thread stopped".into(),
            ));
        }

        match worker.replies.recv_timeout(self.budget) {
            Ok(reply) => {
                self.worker = Some(worker);
                reply
            }
            Err(RecvTimeoutError::Timeout) => {
                tracing::debug!(
                    estimator = self.estimator.name(),
                    vessel = %vessel.id(),
                    berth = %berth.id(),
                    "Abandoning estimate past its budget"
                );
                Err(EstimatorFailure::OverBudget {
                    elapsed_ms: started.elapsed().as_millis() as u64,
                    budget_ms: self.budget.as_millis() as u64,
                })
            }
            Err(RecvTimeoutError::Disconnected) => Err(EstimatorFailure::Unavailable(
                "estimator thread panicked".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::FlatEstimator;
    use berth_plan_core::prelude::TimePoint;
    use berth_plan_model::prelude::{
        BerthEnvelope, BerthIdentifier, CargoType, FleetIdentifier, VesselDimensions,
        VesselIdentifier,
    };
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    fn berth() -> Berth {
        Berth::new(
            BerthIdentifier::new(1),
            "A",
            BerthEnvelope::new(300.0, 50.0, 16.0, 200_000.0),
            ["BULK"],
        )
    }

    fn vessel() -> Vessel {
        Vessel::new(
            VesselIdentifier::new(1),
            FleetIdentifier::new(1),
            VesselDimensions::new(200.0, 30.0, 10.0, 50_000.0),
            Some(CargoType::new("BULK")),
            TimePoint::new(0),
        )
    }

    /// Blocks on its first call only.
    struct StuckOnce {
        stuck: AtomicBool,
        calls: AtomicUsize,
    }

    impl DurationEstimator for StuckOnce {
        fn estimate(
            &self,
            _: &Vessel,
            _: &Berth,
            _: Option<&EnvironmentalSample>,
        ) -> Result<TimeDelta<i64>, EstimatorFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.stuck.swap(false, Ordering::SeqCst) {
                thread::sleep(Duration::from_secs(3));
            }
            Ok(TimeDelta::hours(2))
        }
    }

    struct Panicking;

    impl DurationEstimator for Panicking {
        fn estimate(
            &self,
            _: &Vessel,
            _: &Berth,
            _: Option<&EnvironmentalSample>,
        ) -> Result<TimeDelta<i64>, EstimatorFailure> {
            panic!("model crashed")
        }
    }

    #[test]
    fn test_fast_estimate_passes_through() {
        let mut est = BudgetedEstimator::new(
            Arc::new(FlatEstimator::new(TimeDelta::hours(4))),
            Duration::from_secs(5),
        );
        let (v, b) = (vessel(), berth());
        assert_eq!(est.estimate(&v, &b, None), Ok(TimeDelta::hours(4)));
        assert_eq!(est.estimate(&v, &b, None), Ok(TimeDelta::hours(4)));
    }

    #[test]
    fn test_blocked_call_is_abandoned_at_budget() {
        let inner = Arc::new(StuckOnce {
            stuck: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        });
        let mut est = BudgetedEstimator::new(inner.clone(), Duration::from_millis(50));
        let (v, b) = (vessel(), berth());

        let started = Instant::now();
        let first = est.estimate(&v, &b, None);
        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(matches!(
            first,
            Err(EstimatorFailure::OverBudget { budget_ms: 50, .. })
        ));

        // A fresh thread serves the next call while the first one is still asleep.
        assert_eq!(est.estimate(&v, &b, None), Ok(TimeDelta::hours(2)));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_panicking_estimator_is_unavailable() {
        let mut est = BudgetedEstimator::new(Arc::new(Panicking), Duration::from_secs(5));
        let (v, b) = (vessel(), berth());
        assert!(matches!(
            est.estimate(&v, &b, None),
            Err(EstimatorFailure::Unavailable(_))
        ));
    }
}
