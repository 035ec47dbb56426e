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
use crate::primitives::{Delta, Point};
use num_traits::CheckedSub;

/// A half-open interval `[start, end)`.
///
/// Construction normalises nothing: an interval with `start >= end` is simply
/// empty and never intersects anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval<P> {
    start: P,
    end: P,
}

impl<P: Copy + Ord> Interval<P> {
    #[inline]
    pub const fn new(start: P, end: P) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn start(&self) -> P {
        self.start
    }

    #[inline]
    pub fn end(&self) -> P {
        self.end
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    #[inline]
    pub fn contains(&self, p: P) -> bool {
        self.start <= p && p < self.end
    }

    /// True when both intervals share at least one point. Touching ends do not count.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }

    #[inline]
    pub fn into_inner(self) -> (P, P) {
        (self.start, self.end)
    }

    #[inline]
    pub fn into_range(self) -> std::ops::Range<P> {
        self.start..self.end
    }
}

impl<T, U> Interval<Point<T, U>>
where
    T: Copy + Ord + CheckedSub,
    U: Copy,
{
    /// Length of the interval, `None` on overflow.
    #[inline]
    pub fn checked_length(&self) -> Option<Delta<T, U>> {
        self.end.checked_since(self.start)
    }
}

impl<P: std::fmt::Display> std::fmt::Display for Interval<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl<P> From<std::ops::Range<P>> for Interval<P> {
    #[inline]
    fn from(r: std::ops::Range<P>) -> Self {
        Self {
            start: r.start,
            end: r.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::primitives::{TimeDelta, TimeInterval, TimePoint};

    #[inline]
    fn tp(v: i64) -> TimePoint<i64> {
        TimePoint::new(v)
    }
    #[inline]
    fn iv(a: i64, b: i64) -> TimeInterval<i64> {
        TimeInterval::new(tp(a), tp(b))
    }

    #[test]
    fn test_intersects_is_half_open() {
        assert!(iv(0, 10).intersects(&iv(5, 15)));
        assert!(iv(5, 15).intersects(&iv(0, 10)));
        assert!(iv(0, 10).intersects(&iv(2, 3)));
        // Touching only.
        assert!(!iv(0, 10).intersects(&iv(10, 20)));
        assert!(!iv(10, 20).intersects(&iv(0, 10)));
        // Disjoint.
        assert!(!iv(0, 5).intersects(&iv(6, 9)));
    }

    #[test]
    fn test_contains_excludes_end() {
        let i = iv(3, 6);
        assert!(i.contains(tp(3)));
        assert!(i.contains(tp(5)));
        assert!(!i.contains(tp(6)));
        assert!(!i.contains(tp(2)));
    }

    #[test]
    fn test_empty_and_length() {
        assert!(iv(4, 4).is_empty());
        assert!(iv(5, 4).is_empty());
        assert!(!iv(4, 5).is_empty());
        assert_eq!(iv(2, 9).checked_length(), Some(TimeDelta::new(7)));
    }

    #[test]
    fn test_display_and_range_conversion() {
        let i = iv(1, 2);
        assert_eq!(i.to_string(), "[TimePoint(1), TimePoint(2))");
        let r = i.into_range();
        assert_eq!(r.start, tp(1));
        assert_eq!(r.end, tp(2));
    }
}
