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
//! JSON fleet snapshots: berths, vessels per generation, weather and
//! maintenance history. Timestamps are RFC 3339; unreported measurements are
//! `null` or absent and become `NaN`.

pub mod err;

use crate::{
    common::{
        BerthIdentifier, FleetIdentifier, GenerationIdentifier, MaintenanceIdentifier,
        VesselIdentifier,
    },
    fleet::{
        berth::{Berth, BerthEnvelope, CargoType},
        container::Fleet,
        environment::{Condition, EnvironmentalSample, MaintenanceRecord, Readings},
        vessel::{Vessel, VesselDimensions},
    },
    loader::err::SnapshotLoaderError,
};
use berth_plan_core::prelude::{TimeDelta, TimePoint};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

#[inline]
pub fn to_time_point(dt: DateTime<Utc>) -> TimePoint<i64> {
    TimePoint::from_epoch_seconds(dt.timestamp())
}

#[inline]
pub fn to_utc(tp: TimePoint<i64>) -> Result<DateTime<Utc>, SnapshotLoaderError> {
    DateTime::from_timestamp(tp.epoch_seconds(), 0)
        .ok_or(SnapshotLoaderError::TimestampOutOfRange(tp.epoch_seconds()))
}

#[derive(Debug, Deserialize)]
struct SnapshotDto {
    #[serde(default)]
    berths: Vec<BerthDto>,
    #[serde(default)]
    vessels: Vec<VesselDto>,
    #[serde(default)]
    weather: Vec<WeatherDto>,
    #[serde(default)]
    maintenance: Vec<MaintenanceDto>,
}

#[derive(Debug, Deserialize)]
struct BerthDto {
    id: BerthIdentifier,
    name: String,
    max_loa_m: Option<f64>,
    max_beam_m: Option<f64>,
    max_draft_m: Option<f64>,
    max_deadweight_t: Option<f64>,
    depth_m: Option<f64>,
    #[serde(default)]
    accepted_types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VesselDto {
    id: VesselIdentifier,
    fleet_id: FleetIdentifier,
    generation: Option<GenerationIdentifier>,
    #[serde(default)]
    name: String,
    loa_m: Option<f64>,
    beam_m: Option<f64>,
    draft_m: Option<f64>,
    deadweight_t: Option<f64>,
    cargo_type: Option<String>,
    eta: DateTime<Utc>,
    estimated_duration_minutes: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WeatherDto {
    timestamp: DateTime<Utc>,
    condition: String,
    temperature_c: Option<f64>,
    wind_speed_knots: Option<f64>,
    tide_height_m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MaintenanceDto {
    id: MaintenanceIdentifier,
    berth: BerthIdentifier,
    performed_at: DateTime<Utc>,
    #[serde(default)]
    note: String,
}

#[inline]
fn measured(v: Option<f64>) -> f64 {
    v.unwrap_or(f64::NAN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotLoader {
    default_generation: GenerationIdentifier,
}

impl Default for SnapshotLoader {
    fn default() -> Self {
        Self {
            default_generation: GenerationIdentifier::new(1),
        }
    }
}

impl SnapshotLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation assigned to vessels that do not state one.
    #[inline]
    pub fn default_generation(mut self, generation: GenerationIdentifier) -> Self {
        self.default_generation = generation;
        self
    }

    pub fn from_reader<R: Read>(&self, r: R) -> Result<Fleet, SnapshotLoaderError> {
        let dto: SnapshotDto = serde_json::from_reader(BufReader::new(r))?;
        self.build(dto)
    }

    #[inline]
    pub fn from_path(&self, path: impl AsRef<Path>) -> Result<Fleet, SnapshotLoaderError> {
        let file = File::open(path)?;
        self.from_reader(file)
    }

    #[inline]
    pub fn from_str(&self, s: &str) -> Result<Fleet, SnapshotLoaderError> {
        let dto: SnapshotDto = serde_json::from_str(s)?;
        self.build(dto)
    }

    fn build(&self, dto: SnapshotDto) -> Result<Fleet, SnapshotLoaderError> {
        let mut fleet = Fleet::new();

        for b in dto.berths {
            let envelope = BerthEnvelope::new(
                measured(b.max_loa_m),
                measured(b.max_beam_m),
                measured(b.max_draft_m),
                measured(b.max_deadweight_t),
            );
            let mut berth = Berth::new(b.id, b.name, envelope, b.accepted_types);
            if let Some(depth) = b.depth_m {
                berth = berth.with_depth(depth);
            }
            fleet.insert_berth(berth)?;
        }

        for v in dto.vessels {
            let dims = VesselDimensions::new(
                measured(v.loa_m),
                measured(v.beam_m),
                measured(v.draft_m),
                measured(v.deadweight_t),
            );
            let mut vessel = Vessel::new(
                v.id,
                v.fleet_id,
                dims,
                v.cargo_type.map(CargoType::from),
                to_time_point(v.eta),
            )
            .with_name(v.name);
            if let Some(minutes) = v.estimated_duration_minutes {
                if minutes <= 0 {
                    return Err(SnapshotLoaderError::NonPositiveDuration(v.id, minutes));
                }
                let secs = minutes
                    .checked_mul(60)
                    .ok_or(SnapshotLoaderError::NonPositiveDuration(v.id, minutes))?;
                vessel = vessel.with_estimated_duration(TimeDelta::seconds(secs));
            }
            fleet.insert_vessel(v.generation.unwrap_or(self.default_generation), vessel)?;
        }

        for w in dto.weather {
            let readings = Readings {
                temperature_c: measured(w.temperature_c),
                wind_speed_knots: measured(w.wind_speed_knots),
                tide_height_m: measured(w.tide_height_m),
            };
            fleet.record_sample(EnvironmentalSample::new(
                to_time_point(w.timestamp),
                Condition::parse(&w.condition),
                readings,
            ));
        }

        for m in dto.maintenance {
            fleet.record_maintenance(MaintenanceRecord::new(
                m.id,
                m.berth,
                to_time_point(m.performed_at),
                m.note,
            ))?;
        }

        Ok(fleet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::{container::FleetView, err::FleetError};

    const SMALL: &str = r#"{
        "berths": [
            { "id": 1, "name": "North", "max_loa_m": 300, "max_beam_m": 45, "max_draft_m": 14,
              "max_deadweight_t": 90000, "accepted_types": ["bulk", " Tanker "] },
            { "id": 2, "name": "South", "max_loa_m": 200, "accepted_types": ["CONTAINER"] }
        ],
        "vessels": [
            { "id": 10, "fleet_id": 1, "generation": 3, "loa_m": 250, "beam_m": 30, "draft_m": 12,
              "cargo_type": "BULK", "eta": "2025-03-01T06:00:00Z", "estimated_duration_minutes": 90 },
            { "id": 11, "fleet_id": 2, "loa_m": 120, "cargo_type": "container",
              "eta": "2025-03-01T04:00:00Z" }
        ],
        "weather": [
            { "timestamp": "2025-03-01T00:00:00Z", "condition": "Calm", "wind_speed_knots": 4.5 },
            { "timestamp": "2025-03-01T06:30:00Z", "condition": "storm" }
        ],
        "maintenance": [
            { "id": 1, "berth": 1, "performed_at": "2025-02-20T00:00:00Z", "note": "fenders" }
        ]
    }"#;

    #[test]
    fn test_loads_small_snapshot() {
        let fleet = SnapshotLoader::new().from_str(SMALL).unwrap();

        assert_eq!(fleet.berths().len(), 2);
        let north = fleet.berth(BerthIdentifier::new(1)).unwrap();
        assert!(north.accepts_type(&CargoType::new("TANKER")));
        assert!(fleet.berth(BerthIdentifier::new(2)).unwrap().envelope().max_beam_m.is_nan());

        let g3 = fleet.vessels_in_generation(GenerationIdentifier::new(3));
        assert_eq!(g3.len(), 1);
        assert_eq!(g3[0].estimated_duration(), Some(TimeDelta::minutes(90)));
        // No generation given: falls back to the loader default.
        assert_eq!(fleet.vessels_in_generation(GenerationIdentifier::new(1)).len(), 1);
        let v11 = fleet.vessel(VesselIdentifier::new(11)).unwrap();
        assert!(v11.dimensions().draft_m.is_nan());

        let eta = g3[0].eta();
        let sample = fleet.nearest_sample(eta).unwrap();
        assert_eq!(sample.condition(), &Condition::Storm);
        assert!(fleet.latest_maintenance(BerthIdentifier::new(1)).is_some());
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let json = r#"{ "vessels": [ { "id": 1, "fleet_id": 1, "eta": "2025-03-01T00:00:00Z",
                        "estimated_duration_minutes": 0 } ] }"#;
        assert!(matches!(
            SnapshotLoader::new().from_str(json),
            Err(SnapshotLoaderError::NonPositiveDuration(_, 0))
        ));
    }

    #[test]
    fn test_rejects_maintenance_for_unknown_berth() {
        let json = r#"{ "maintenance": [ { "id": 1, "berth": 9, "performed_at": "2025-03-01T00:00:00Z" } ] }"#;
        assert!(matches!(
            SnapshotLoader::new().from_str(json),
            Err(SnapshotLoaderError::Fleet(FleetError::UnknownMaintenanceBerth(_)))
        ));
    }

    #[test]
    fn test_malformed_json_is_reported() {
        assert!(matches!(
            SnapshotLoader::new().from_str("{ \"berths\": 3 }"),
            Err(SnapshotLoaderError::Json(_))
        ));
    }

    #[test]
    fn test_time_conversions_agree() {
        let dt: DateTime<Utc> = "2025-03-01T06:00:00Z".parse().unwrap();
        let tp = to_time_point(dt);
        assert_eq!(tp.epoch_seconds(), dt.timestamp());
        assert_eq!(to_utc(tp).unwrap(), dt);
    }

    #[test]
    fn test_load_bundled_snapshots() {
        use std::path::{Path, PathBuf};

        fn find_snapshots_dir() -> Option<PathBuf> {
            let mut cur: Option<&Path> = Some(Path::new(env!("CARGO_MANIFEST_DIR")));
            while let Some(p) = cur {
                let cand = p.join("snapshots");
                if cand.is_dir() {
                    return Some(cand);
                }
                cur = p.parent();
            }
            None
        }

        let dir = find_snapshots_dir().expect("no `snapshots/` directory above the crate");
        let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
            .expect("read_dir(snapshots) failed")
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            // Fix files live in `snapshots/fixes/` and are not fleet snapshots.
            .filter(|p| p.is_file())
            .filter(|p| p.extension().map(|x| x == "json").unwrap_or(false))
            .collect();
        files.sort();
        assert!(!files.is_empty());

        for path in files {
            let fleet = SnapshotLoader::new()
                .from_path(&path)
                .unwrap_or_else(|e| panic!("Failed to load {}: {e}", path.display()));
            assert!(!fleet.berths().is_empty(), "no berths in {}", path.display());
            assert!(fleet.latest_generation().is_some(), "no vessels in {}", path.display());
        }
    }
}
