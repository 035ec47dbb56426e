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
pub mod affine;
pub mod interval;

pub use affine::*;
pub use interval::Interval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeMarker;

impl MarkerName for TimeMarker {
    const NAME_POINT: &'static str = "TimePoint";
    const NAME_DELTA: &'static str = "TimeDelta";
}

pub type TimePoint<T> = Point<T, TimeMarker>;
pub type TimeDelta<T> = Delta<T, TimeMarker>;
pub type TimeInterval<T> = Interval<TimePoint<T>>;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 3_600;

/// Second-resolution helpers. All planning time is kept in epoch seconds.
impl TimeDelta<i64> {
    #[inline]
    pub const fn seconds(secs: i64) -> Self {
        Delta::new(secs)
    }

    #[inline]
    pub const fn minutes(mins: i64) -> Self {
        Delta::new(mins * SECONDS_PER_MINUTE)
    }

    #[inline]
    pub const fn hours(hours: i64) -> Self {
        Delta::new(hours * SECONDS_PER_HOUR)
    }

    #[inline]
    pub fn as_minutes_f64(self) -> f64 {
        self.value() as f64 / SECONDS_PER_MINUTE as f64
    }
}

impl TimePoint<i64> {
    #[inline]
    pub const fn from_epoch_seconds(secs: i64) -> Self {
        Point::new(secs)
    }

    #[inline]
    pub const fn epoch_seconds(self) -> i64 {
        self.value()
    }
}
