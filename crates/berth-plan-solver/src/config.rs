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
use berth_plan_core::prelude::TimeDelta;
use serde::Deserialize;
use std::{fs::File, io::BufReader, path::Path, time::Duration};

/// What to do when the duration estimator fails or overruns its budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorFallback {
    /// Abort the whole build with `EstimatorUnavailable`.
    #[default]
    Fail,
    /// Log a warning and use `default_duration_secs` for that pair.
    UseDefault,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Occupancy used when no estimator is supplied, or as the fallback.
    pub default_duration_secs: i64,
    /// Wall-clock budget for a single estimator call.
    pub estimator_budget_ms: u64,
    pub estimator_fallback: EstimatorFallback,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: 6 * 3_600,
            estimator_budget_ms: 250,
            estimator_fallback: EstimatorFallback::Fail,
        }
    }
}

impl SchedulerConfig {
    #[inline]
    pub fn default_duration(&self) -> TimeDelta<i64> {
        TimeDelta::seconds(self.default_duration_secs)
    }

    #[inline]
    pub fn estimator_budget(&self) -> Duration {
        Duration::from_millis(self.estimator_budget_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// EWMA smoothing factor over per-batch discrepancy, in `(0, 1]`.
    pub smoothing_alpha: f64,
    /// Smoothed discrepancy (minutes) at which re-estimation is requested.
    pub retrain_threshold_minutes: f64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.3,
            retrain_threshold_minutes: 120.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub scheduler: SchedulerConfig,
    pub feedback: FeedbackConfig,
    /// Pause between two polls of the entry feed.
    pub feed_poll_ms: u64,
    /// Maximum rows handed to the feed sink per poll.
    pub feed_batch_limit: usize,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            feedback: FeedbackConfig::default(),
            feed_poll_ms: 2_000,
            feed_batch_limit: 256,
        }
    }
}

impl PlanConfig {
    #[inline]
    pub fn feed_poll_interval(&self) -> Duration {
        Duration::from_millis(self.feed_poll_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.default_duration_secs <= 0 {
            return Err(ConfigError::NonPositiveDefaultDuration(
                self.scheduler.default_duration_secs,
            ));
        }
        let alpha = self.feedback.smoothing_alpha;
        if !(alpha.is_finite() && alpha > 0.0 && alpha <= 1.0) {
            return Err(ConfigError::InvalidSmoothingAlpha(alpha));
        }
        let threshold = self.feedback.retrain_threshold_minutes;
        if !(threshold.is_finite() && threshold >= 0.0) {
            return Err(ConfigError::InvalidRetrainThreshold(threshold));
        }
        if self.feed_poll_ms == 0 || self.feed_batch_limit == 0 {
            return Err(ConfigError::ZeroFeedSetting);
        }
        Ok(())
    }

    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: PlanConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let cfg: PlanConfig = serde_json::from_reader(BufReader::new(file))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    NonPositiveDefaultDuration(i64),
    InvalidSmoothingAlpha(f64),
    InvalidRetrainThreshold(f64),
    ZeroFeedSetting,
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ConfigError::*;
        match self {
            Io(e) => write!(f, "I/O error: {e}"),
            Json(e) => write!(f, "malformed config: {e}"),
            NonPositiveDefaultDuration(s) => {
                write!(f, "default_duration_secs must be positive, got {s}")
            }
            InvalidSmoothingAlpha(a) => write!(f, "smoothing_alpha must be in (0, 1], got {a}"),
            InvalidRetrainThreshold(t) => {
                write!(f, "retrain_threshold_minutes must be non-negative, got {t}")
            }
            ZeroFeedSetting => write!(f, "feed_poll_ms and feed_batch_limit must be non-zero"),
        }
    }
}

impl std::error::Error for ConfigError {}
