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
use crate::common::{BerthIdentifier, MaintenanceIdentifier};
use berth_plan_core::prelude::TimePoint;

/// Categorical weather state reported by the environmental feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    Calm,
    Rain,
    Storm,
    Fog,
    Other(String),
}

impl Condition {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "calm" | "clear" | "sunny" => Condition::Calm,
            "rain" | "rainy" => Condition::Rain,
            "storm" | "stormy" => Condition::Storm,
            "fog" | "foggy" => Condition::Fog,
            other => Condition::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Condition::Calm => "calm",
            Condition::Rain => "rain",
            Condition::Storm => "storm",
            Condition::Fog => "fog",
            Condition::Other(s) => s,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auxiliary numeric readings attached to a sample. `NaN` means not reported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readings {
    pub temperature_c: f64,
    pub wind_speed_knots: f64,
    pub tide_height_m: f64,
}

impl Default for Readings {
    fn default() -> Self {
        Self {
            temperature_c: f64::NAN,
            wind_speed_knots: f64::NAN,
            tide_height_m: f64::NAN,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentalSample {
    timestamp: TimePoint<i64>,
    condition: Condition,
    readings: Readings,
}

impl EnvironmentalSample {
    #[inline]
    pub fn new(timestamp: TimePoint<i64>, condition: Condition, readings: Readings) -> Self {
        Self {
            timestamp,
            condition,
            readings,
        }
    }

    /// A calm sample with no readings, used when no feed data exists.
    #[inline]
    pub fn calm_at(timestamp: TimePoint<i64>) -> Self {
        Self::new(timestamp, Condition::Calm, Readings::default())
    }

    #[inline]
    pub fn timestamp(&self) -> TimePoint<i64> {
        self.timestamp
    }

    #[inline]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    #[inline]
    pub fn readings(&self) -> &Readings {
        &self.readings
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceRecord {
    id: MaintenanceIdentifier,
    berth: BerthIdentifier,
    performed_at: TimePoint<i64>,
    note: String,
}

impl MaintenanceRecord {
    #[inline]
    pub fn new(
        id: MaintenanceIdentifier,
        berth: BerthIdentifier,
        performed_at: TimePoint<i64>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            id,
            berth,
            performed_at,
            note: note.into(),
        }
    }

    #[inline]
    pub fn id(&self) -> MaintenanceIdentifier {
        self.id
    }

    #[inline]
    pub fn berth(&self) -> BerthIdentifier {
        self.berth
    }

    #[inline]
    pub fn performed_at(&self) -> TimePoint<i64> {
        self.performed_at
    }

    #[inline]
    pub fn note(&self) -> &str {
        &self.note
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_parse_is_case_insensitive() {
        assert_eq!(Condition::parse("Calm"), Condition::Calm);
        assert_eq!(Condition::parse(" STORM "), Condition::Storm);
        assert_eq!(Condition::parse("rainy"), Condition::Rain);
        assert_eq!(
            Condition::parse("hail"),
            Condition::Other("hail".to_string())
        );
        assert_eq!(Condition::parse("hail").to_string(), "hail");
    }

    #[test]
    fn test_calm_sample_has_unreported_readings() {
        let s = EnvironmentalSample::calm_at(TimePoint::new(10));
        assert_eq!(s.condition(), &Condition::Calm);
        assert!(s.readings().wind_speed_knots.is_nan());
    }
}
