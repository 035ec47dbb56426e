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
use berth_plan_core::prelude::{TimeDelta, TimePoint};
use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

/// Source of "now" in epoch seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> TimePoint<i64>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> TimePoint<i64> {
        TimePoint::from_epoch_seconds(chrono::Utc::now().timestamp())
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicI64);

impl FixedClock {
    #[inline]
    pub fn new(at: TimePoint<i64>) -> Self {
        Self(AtomicI64::new(at.epoch_seconds()))
    }

    #[inline]
    pub fn set(&self, at: TimePoint<i64>) {
        self.0.store(at.epoch_seconds(), Ordering::Release);
    }

    #[inline]
    pub fn advance(&self, by: TimeDelta<i64>) {
        self.0.fetch_add(by.value(), Ordering::AcqRel);
    }
}

impl Clock for FixedClock {
    #[inline]
    fn now(&self) -> TimePoint<i64> {
        TimePoint::from_epoch_seconds(self.0.load(Ordering::Acquire))
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now(&self) -> TimePoint<i64> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    #[inline]
    fn now(&self) -> TimePoint<i64> {
        (**self).now()
    }
}
