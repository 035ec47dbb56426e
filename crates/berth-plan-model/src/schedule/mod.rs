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
pub mod change;
pub mod entry;
pub mod err;
pub mod feedback;
pub mod plan;

use crate::common::{BerthIdentifier, VesselIdentifier};
use berth_plan_core::prelude::{TimeInterval, TimePoint};

/// Anything that pins a vessel to a berth for a half-open time interval.
///
/// Both freshly planned assignments and persisted entries implement this, so
/// the invariant checks in [`crate::validation`] work on either.
pub trait Placement {
    fn vessel_id(&self) -> VesselIdentifier;

    fn berth_id(&self) -> BerthIdentifier;

    fn interval(&self) -> TimeInterval<i64>;

    #[inline]
    fn start(&self) -> TimePoint<i64> {
        self.interval().start()
    }

    #[inline]
    fn end(&self) -> TimePoint<i64> {
        self.interval().end()
    }
}

impl<P: Placement + ?Sized> Placement for &P {
    #[inline]
    fn vessel_id(&self) -> VesselIdentifier {
        (**self).vessel_id()
    }

    #[inline]
    fn berth_id(&self) -> BerthIdentifier {
        (**self).berth_id()
    }

    #[inline]
    fn interval(&self) -> TimeInterval<i64> {
        (**self).interval()
    }
}
