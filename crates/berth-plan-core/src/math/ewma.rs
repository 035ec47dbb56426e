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
use num_traits::Float;
use std::fmt::Debug;

/// Exponentially weighted moving average over a float type.
///
/// The first observation seeds the average; later observations are blended
/// with weight `alpha`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ewma<F> {
    alpha: F,
    value: Option<F>,
    observations: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAlphaError<F> {
    value: F,
}

impl<F: Float + Debug> InvalidAlphaError<F> {
    pub fn new(value: F) -> Self {
        Self { value }
    }

    pub fn value(&self) -> F {
        self.value
    }
}

impl<F: Float + Debug> std::fmt::Display for InvalidAlphaError<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid alpha value {:?}. Allowed range is (0.0, 1.0].",
            self.value
        )
    }
}

impl<F: Float + Debug> std::error::Error for InvalidAlphaError<F> {}

impl<F: Float + Debug> Ewma<F> {
    #[inline]
    pub fn new(alpha: F) -> Result<Self, InvalidAlphaError<F>> {
        if !alpha.is_finite() || alpha <= F::zero() || alpha > F::one() {
            return Err(InvalidAlphaError::new(alpha));
        }
        Ok(Self {
            alpha,
            value: None,
            observations: 0,
        })
    }

    #[inline]
    pub fn alpha(&self) -> F {
        self.alpha
    }

    #[inline]
    pub fn value(&self) -> Option<F> {
        self.value
    }

    #[inline]
    pub fn observations(&self) -> u64 {
        self.observations
    }

    #[inline]
    pub fn reset(&mut self) {
        self.value = None;
        self.observations = 0;
    }

    /// Folds `x` into the average and returns the new value.
    /// Non-finite observations are ignored.
    pub fn observe(&mut self, x: F) -> Option<F> {
        if !x.is_finite() {
            return self.value;
        }
        let next = match self.value {
            None => x,
            Some(current) => x * self.alpha + current * (F::one() - self.alpha),
        };
        self.value = Some(next);
        self.observations += 1;
        self.value
    }
}
