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
    common::{BerthIdentifier, FleetIdentifier, GenerationIdentifier, VesselIdentifier},
    fleet::{
        berth::Berth,
        environment::{EnvironmentalSample, MaintenanceRecord},
        err::{DuplicateBerthError, DuplicateVesselError, FleetError, UnknownMaintenanceBerthError},
        vessel::Vessel,
    },
};
use berth_plan_core::prelude::{TimeDelta, TimePoint};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Read access to the reference data the planner consumes.
///
/// Everything here is owned by upstream ingestion; planning code only ever
/// looks records up by id.
pub trait FleetView {
    fn vessel(&self, id: VesselIdentifier) -> Option<&Vessel>;

    fn berth(&self, id: BerthIdentifier) -> Option<&Berth>;

    /// The sample closest in time to `at`; ties go to the earlier sample.
    fn nearest_sample(&self, at: TimePoint<i64>) -> Option<&EnvironmentalSample>;

    fn latest_maintenance(&self, berth: BerthIdentifier) -> Option<&MaintenanceRecord>;

    /// Time elapsed between the berth's most recent maintenance and `at`.
    fn maintenance_recency(
        &self,
        berth: BerthIdentifier,
        at: TimePoint<i64>,
    ) -> Option<TimeDelta<i64>> {
        self.latest_maintenance(berth)
            .and_then(|r| at.checked_since(r.performed_at()))
    }
}

/// In-memory reference data: berths, vessels per generation, weather and
/// maintenance time series.
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    berths: Vec<Berth>,
    berth_index: HashMap<BerthIdentifier, usize>,
    berth_names: HashSet<String>,
    vessels: HashMap<VesselIdentifier, Vessel>,
    generations: BTreeMap<GenerationIdentifier, Vec<VesselIdentifier>>,
    fleet_keys: HashSet<(FleetIdentifier, GenerationIdentifier)>,
    samples: Vec<EnvironmentalSample>,
    maintenance: BTreeMap<BerthIdentifier, Vec<MaintenanceRecord>>,
}

impl Fleet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_berth(&mut self, berth: Berth) -> Result<(), FleetError> {
        if self.berth_index.contains_key(&berth.id()) || self.berth_names.contains(berth.name()) {
            return Err(DuplicateBerthError::new(berth.id(), berth.name()).into());
        }
        self.berth_names.insert(berth.name().to_string());
        self.berth_index.insert(berth.id(), self.berths.len());
        self.berths.push(berth);
        Ok(())
    }

    /// Registers `vessel` as part of `generation`. A fleet id may appear at
    /// most once per generation and vessel row ids are unique overall.
    pub fn insert_vessel(
        &mut self,
        generation: GenerationIdentifier,
        vessel: Vessel,
    ) -> Result<(), FleetError> {
        let key = (vessel.fleet_id(), generation);
        if self.vessels.contains_key(&vessel.id()) || self.fleet_keys.contains(&key) {
            return Err(
                DuplicateVesselError::new(vessel.id(), vessel.fleet_id(), generation).into(),
            );
        }
        self.fleet_keys.insert(key);
        self.generations
            .entry(generation)
            .or_default()
            .push(vessel.id());
        self.vessels.insert(vessel.id(), vessel);
        Ok(())
    }

    /// Appends a weather sample, keeping the series ordered by timestamp.
    pub fn record_sample(&mut self, sample: EnvironmentalSample) {
        let at = self
            .samples
            .partition_point(|s| s.timestamp() <= sample.timestamp());
        self.samples.insert(at, sample);
    }

    /// Appends a maintenance record. The berth's `last_maintenance` pointer
    /// follows the most recent record by `performed_at`.
    pub fn record_maintenance(&mut self, record: MaintenanceRecord) -> Result<(), FleetError> {
        let Some(&idx) = self.berth_index.get(&record.berth()) else {
            return Err(UnknownMaintenanceBerthError::new(record.id(), record.berth()).into());
        };

        let series = self.maintenance.entry(record.berth()).or_default();
        let at = series.partition_point(|r| r.performed_at() <= record.performed_at());
        series.insert(at, record);

        if let Some(latest) = series.last() {
            self.berths[idx].set_last_maintenance(latest.id());
        }
        Ok(())
    }

    /// Berths in insertion order; this is the scan order used for planning.
    #[inline]
    pub fn berths(&self) -> &[Berth] {
        &self.berths
    }

    #[inline]
    pub fn berth_by_name(&self, name: &str) -> Option<&Berth> {
        self.berths.iter().find(|b| b.name() == name)
    }

    #[inline]
    pub fn vessel_count(&self) -> usize {
        self.vessels.len()
    }

    #[inline]
    pub fn latest_generation(&self) -> Option<GenerationIdentifier> {
        self.generations.keys().next_back().copied()
    }

    #[inline]
    pub fn iter_generations(&self) -> impl Iterator<Item = GenerationIdentifier> + '_ {
        self.generations.keys().copied()
    }

    /// Vessels of `generation` ordered by arrival estimate, then id.
    pub fn vessels_in_generation(&self, generation: GenerationIdentifier) -> Vec<&Vessel> {
        let mut out: Vec<&Vessel> = self
            .generations
            .get(&generation)
            .into_iter()
            .flatten()
            .filter_map(|id| self.vessels.get(id))
            .collect();
        out.sort_by_key(|v| (v.eta(), v.id()));
        out
    }

    #[inline]
    pub fn samples(&self) -> &[EnvironmentalSample] {
        &self.samples
    }

    #[inline]
    pub fn maintenance_history(&self, berth: BerthIdentifier) -> &[MaintenanceRecord] {
        self.maintenance
            .get(&berth)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[inline]
fn distance(a: TimePoint<i64>, b: TimePoint<i64>) -> i128 {
    (a.value() as i128 - b.value() as i128).abs()
}

impl FleetView for Fleet {
    #[inline]
    fn vessel(&self, id: VesselIdentifier) -> Option<&Vessel> {
        self.vessels.get(&id)
    }

    #[inline]
    fn berth(&self, id: BerthIdentifier) -> Option<&Berth> {
        self.berth_index.get(&id).map(|&i| &self.berths[i])
    }

    fn nearest_sample(&self, at: TimePoint<i64>) -> Option<&EnvironmentalSample> {
        let split = self.samples.partition_point(|s| s.timestamp() < at);
        let before = split.checked_sub(1).and_then(|i| self.samples.get(i));
        let after = self.samples.get(split);
        match (before, after) {
            (Some(b), Some(a)) => {
                if distance(a.timestamp(), at) < distance(b.timestamp(), at) {
                    Some(a)
                } else {
                    Some(b)
                }
            }
            (Some(b), None) => Some(b),
            (None, a) => a,
        }
    }

    #[inline]
    fn latest_maintenance(&self, berth: BerthIdentifier) -> Option<&MaintenanceRecord> {
        self.maintenance.get(&berth).and_then(|s| s.last())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::MaintenanceIdentifier,
        fleet::{
            berth::{BerthEnvelope, CargoType},
            environment::{Condition, Readings},
            vessel::VesselDimensions,
        },
    };

    #[inline]
    fn tp(v: i64) -> TimePoint<i64> {
        TimePoint::new(v)
    }
    #[inline]
    fn bid(n: u32) -> BerthIdentifier {
        BerthIdentifier::new(n)
    }
    #[inline]
    fn gen_id(n: u64) -> GenerationIdentifier {
        GenerationIdentifier::new(n)
    }

    fn berth(id: u32, name: &str) -> Berth {
        Berth::new(
            bid(id),
            name,
            BerthEnvelope::new(300.0, 40.0, 14.0, 90_000.0),
            ["BULK"],
        )
    }

    fn vessel(id: u64, fleet: u64, eta: i64) -> Vessel {
        Vessel::new(
            VesselIdentifier::new(id),
            FleetIdentifier::new(fleet),
            VesselDimensions::new(200.0, 30.0, 10.0, 40_000.0),
            Some(CargoType::new("BULK")),
            tp(eta),
        )
    }

    fn sample(at: i64, condition: Condition) -> EnvironmentalSample {
        EnvironmentalSample::new(tp(at), condition, Readings::default())
    }

    #[test]
    fn test_berth_ids_and_names_are_unique() {
        let mut f = Fleet::new();
        f.insert_berth(berth(1, "A")).unwrap();
        assert!(matches!(
            f.insert_berth(berth(1, "Z")),
            Err(FleetError::DuplicateBerth(_))
        ));
        assert!(matches!(
            f.insert_berth(berth(2, "A")),
            Err(FleetError::DuplicateBerth(_))
        ));
        f.insert_berth(berth(2, "B")).unwrap();
        assert_eq!(f.berths().len(), 2);
        assert_eq!(f.berth(bid(2)).map(|b| b.name()), Some("B"));
        assert_eq!(f.berth_by_name("A").map(|b| b.id()), Some(bid(1)));
    }

    #[test]
    fn test_vessels_keyed_by_fleet_and_generation() {
        let mut f = Fleet::new();
        f.insert_vessel(gen_id(1), vessel(1, 10, 50)).unwrap();
        // Same ship in a later generation is a new record.
        f.insert_vessel(gen_id(2), vessel(2, 10, 60)).unwrap();
        // Same ship twice in one generation is rejected.
        assert!(matches!(
            f.insert_vessel(gen_id(2), vessel(3, 10, 70)),
            Err(FleetError::DuplicateVessel(_))
        ));
        // Reusing a row id is rejected.
        assert!(f.insert_vessel(gen_id(3), vessel(1, 11, 70)).is_err());
        assert_eq!(f.latest_generation(), Some(gen_id(2)));
        assert_eq!(f.vessel_count(), 2);
    }

    #[test]
    fn test_vessels_in_generation_sorted_by_eta() {
        let mut f = Fleet::new();
        f.insert_vessel(gen_id(1), vessel(1, 10, 300)).unwrap();
        f.insert_vessel(gen_id(1), vessel(2, 11, 100)).unwrap();
        f.insert_vessel(gen_id(1), vessel(3, 12, 200)).unwrap();
        let ids: Vec<u64> = f
            .vessels_in_generation(gen_id(1))
            .iter()
            .map(|v| v.id().into_inner())
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert!(f.vessels_in_generation(gen_id(9)).is_empty());
    }

    #[test]
    fn test_nearest_sample_picks_closest_and_prefers_earlier_on_tie() {
        let mut f = Fleet::new();
        assert!(f.nearest_sample(tp(0)).is_none());
        f.record_sample(sample(100, Condition::Rain));
        f.record_sample(sample(0, Condition::Calm));
        f.record_sample(sample(200, Condition::Storm));

        assert_eq!(f.nearest_sample(tp(-50)).unwrap().timestamp(), tp(0));
        assert_eq!(f.nearest_sample(tp(40)).unwrap().timestamp(), tp(0));
        assert_eq!(f.nearest_sample(tp(60)).unwrap().timestamp(), tp(100));
        // Equidistant between 100 and 200.
        assert_eq!(f.nearest_sample(tp(150)).unwrap().timestamp(), tp(100));
        assert_eq!(f.nearest_sample(tp(1_000)).unwrap().timestamp(), tp(200));
        assert_eq!(
            f.nearest_sample(tp(100)).unwrap().condition(),
            &Condition::Rain
        );
    }

    #[test]
    fn test_maintenance_tracks_most_recent_record() {
        let mut f = Fleet::new();
        f.insert_berth(berth(1, "A")).unwrap();
        let m = |id: u64, at: i64| {
            MaintenanceRecord::new(MaintenanceIdentifier::new(id), bid(1), tp(at), "dredging")
        };
        f.record_maintenance(m(1, 500)).unwrap();
        f.record_maintenance(m(2, 100)).unwrap();
        assert_eq!(
            f.latest_maintenance(bid(1)).map(|r| r.id()),
            Some(MaintenanceIdentifier::new(1))
        );
        assert_eq!(
            f.berth(bid(1)).unwrap().last_maintenance(),
            Some(MaintenanceIdentifier::new(1))
        );
        assert_eq!(
            f.maintenance_recency(bid(1), tp(800)),
            Some(TimeDelta::new(300))
        );
        assert_eq!(f.maintenance_history(bid(1)).len(), 2);

        let orphan = MaintenanceRecord::new(MaintenanceIdentifier::new(3), bid(9), tp(0), "");
        assert!(matches!(
            f.record_maintenance(orphan),
            Err(FleetError::UnknownMaintenanceBerth(_))
        ));
    }
}
