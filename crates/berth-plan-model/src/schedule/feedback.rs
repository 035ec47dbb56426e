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
use crate::common::GenerationIdentifier;
use berth_plan_core::prelude::TimePoint;

/// One scalar discrepancy logged for a reconciliation batch of a generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackRecord {
    generation: GenerationIdentifier,
    recorded_at: TimePoint<i64>,
    error: f64,
    pairs: usize,
}

impl FeedbackRecord {
    #[inline]
    pub fn new(
        generation: GenerationIdentifier,
        recorded_at: TimePoint<i64>,
        error: f64,
        pairs: usize,
    ) -> Self {
        Self {
            generation,
            recorded_at,
            error,
            pairs,
        }
    }

    #[inline]
    pub fn generation(&self) -> GenerationIdentifier {
        self.generation
    }

    #[inline]
    pub fn recorded_at(&self) -> TimePoint<i64> {
        self.recorded_at
    }

    /// Discrepancy in minutes.
    #[inline]
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Number of old/new pairs the error was computed from.
    #[inline]
    pub fn pairs(&self) -> usize {
        self.pairs
    }
}

impl std::fmt::Display for FeedbackRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} @ {}: {:.2} min over {} pair(s)",
            self.generation, self.recorded_at, self.error, self.pairs
        )
    }
}
