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
use berth_plan_core::prelude::{TimeDelta, TimeInterval, TimePoint};
use berth_plan_model::prelude::{Berth, BerthIdentifier};
use rangemap::RangeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotFreeError {
    berth: BerthIdentifier,
    interval: TimeInterval<i64>,
}

impl NotFreeError {
    #[inline]
    pub fn new(berth: BerthIdentifier, interval: TimeInterval<i64>) -> Self {
        Self { berth, interval }
    }

    #[inline]
    pub fn berth(&self) -> BerthIdentifier {
        self.berth
    }

    #[inline]
    pub fn interval(&self) -> TimeInterval<i64> {
        self.interval
    }
}

impl std::fmt::Display for NotFreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Interval {} on berth {} is already occupied",
            self.interval, self.berth
        )
    }
}

impl std::error::Error for NotFreeError {}

/// Occupied time on one berth during a single scheduling pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BerthOccupancy<'b> {
    berth: &'b Berth,
    occupied: RangeSet<TimePoint<i64>>,
}

impl<'b> BerthOccupancy<'b> {
    #[inline]
    pub fn new(berth: &'b Berth) -> Self {
        Self {
            berth,
            occupied: RangeSet::new(),
        }
    }

    #[inline]
    pub fn berth(&self) -> &'b Berth {
        self.berth
    }

    /// No existing placement intersects `[start, end)`. Touching is allowed.
    #[inline]
    pub fn is_free(&self, interval: TimeInterval<i64>) -> bool {
        if interval.is_empty() {
            return true;
        }
        !self.occupied.overlaps(&interval.into_range())
    }

    #[inline]
    pub fn is_occupied(&self, interval: TimeInterval<i64>) -> bool {
        !self.is_free(interval)
    }

    #[inline]
    pub fn occupy(&mut self, interval: TimeInterval<i64>) -> Result<(), NotFreeError> {
        if interval.is_empty() {
            return Ok(());
        }
        if self.is_occupied(interval) {
            return Err(NotFreeError::new(self.berth.id(), interval));
        }
        self.occupied.insert(interval.into_range());
        Ok(())
    }

    #[inline]
    pub fn release(&mut self, interval: TimeInterval<i64>) {
        if !interval.is_empty() {
            self.occupied.remove(interval.into_range());
        }
    }

    /// Occupied segments clipped to `window`, in time order.
    pub fn occupied_in(
        &self,
        window: TimeInterval<i64>,
    ) -> impl Iterator<Item = TimeInterval<i64>> + '_ {
        std::iter::once(window)
            .filter(|w| !w.is_empty())
            .flat_map(move |w| {
                let (b0, b1) = w.into_inner();
                self.occupied.overlapping(b0..b1).map(move |r| {
                    let s = if r.start < b0 { b0 } else { r.start };
                    let e = if r.end > b1 { b1 } else { r.end };
                    TimeInterval::new(s, e)
                })
            })
    }

    pub fn busy_time_in(&self, window: TimeInterval<i64>) -> TimeDelta<i64> {
        self.occupied_in(window)
            .filter_map(|seg| seg.checked_length())
            .sum()
    }

    /// Share of `window` that is occupied, in `[0, 1]`.
    pub fn utilization_in(&self, window: TimeInterval<i64>) -> f64 {
        let Some(total) = window.checked_length() else {
            return 0.0;
        };
        if total.value() <= 0 {
            return 0.0;
        }
        let busy = self.busy_time_in(window).value() as f64;
        (busy / total.value() as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use berth_plan_model::prelude::BerthEnvelope;

    #[inline]
    fn tp(v: i64) -> TimePoint<i64> {
        TimePoint::new(v)
    }
    #[inline]
    fn iv(a: i64, b: i64) -> TimeInterval<i64> {
        TimeInterval::new(tp(a), tp(b))
    }

    fn berth() -> Berth {
        Berth::new(
            BerthIdentifier::new(1),
            "A",
            BerthEnvelope::new(1.0, 1.0, 1.0, 1.0),
            ["BULK"],
        )
    }

    #[test]
    fn test_occupy_rejects_overlap_but_allows_touching() {
        let b = berth();
        let mut occ = BerthOccupancy::new(&b);
        occ.occupy(iv(10, 20)).unwrap();
        assert!(occ.occupy(iv(15, 25)).is_err());
        assert!(occ.occupy(iv(5, 11)).is_err());
        occ.occupy(iv(20, 30)).unwrap();
        occ.occupy(iv(0, 10)).unwrap();
        assert!(occ.is_occupied(iv(29, 31)));
        assert!(occ.is_free(iv(30, 40)));
        assert!(occ.is_free(iv(12, 12)));
    }

    #[test]
    fn test_release_frees_time() {
        let b = berth();
        let mut occ = BerthOccupancy::new(&b);
        occ.occupy(iv(0, 100)).unwrap();
        occ.release(iv(40, 60));
        assert!(occ.is_free(iv(40, 60)));
        assert!(occ.is_occupied(iv(39, 41)));
    }

    #[test]
    fn test_utilization_and_busy_time() {
        let b = berth();
        let mut occ = BerthOccupancy::new(&b);
        occ.occupy(iv(0, 10)).unwrap();
        occ.occupy(iv(20, 30)).unwrap();
        assert_eq!(occ.busy_time_in(iv(5, 25)), TimeDelta::new(10));
        assert!((occ.utilization_in(iv(0, 40)) - 0.5).abs() < 1e-12);
        assert_eq!(occ.utilization_in(iv(50, 50)), 0.0);
        let segs: Vec<_> = occ.occupied_in(iv(5, 25)).collect();
        assert_eq!(segs, vec![iv(5, 10), iv(20, 25)]);
    }

    #[test]
    fn test_cloned_occupancy_compares_by_state() {
        let b = berth();
        let mut occ = BerthOccupancy::new(&b);
        occ.occupy(iv(0, 10)).unwrap();
        let mut copy = occ.clone();
        assert_eq!(copy, occ);
        copy.occupy(iv(10, 20)).unwrap();
        assert_ne!(copy, occ);
        assert!(occ.is_free(iv(10, 20)));
    }
}
