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
use std::collections::BTreeSet;

/// A cargo-type tag such as `BULK` or `CONTAINER`.
///
/// Tags are trimmed and upper-cased on construction so that `"bulk "` and
/// `"BULK"` name the same type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CargoType(String);

impl CargoType {
    #[inline]
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().to_ascii_uppercase())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for CargoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CargoType {
    fn from(s: &str) -> Self {
        CargoType::new(s)
    }
}

impl From<String> for CargoType {
    fn from(s: String) -> Self {
        CargoType::new(s)
    }
}

/// The largest vessel a berth can physically take. Values are metres and
/// metric tonnes. A `NaN` limit admits nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BerthEnvelope {
    pub max_loa_m: f64,
    pub max_beam_m: f64,
    pub max_draft_m: f64,
    pub max_deadweight_t: f64,
}

impl BerthEnvelope {
    #[inline]
    pub const fn new(
        max_loa_m: f64,
        max_beam_m: f64,
        max_draft_m: f64,
        max_deadweight_t: f64,
    ) -> Self {
        Self {
            max_loa_m,
            max_beam_m,
            max_draft_m,
            max_deadweight_t,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Berth {
    id: BerthIdentifier,
    name: String,
    depth_m: Option<f64>,
    envelope: BerthEnvelope,
    accepted_types: BTreeSet<CargoType>,
    last_maintenance: Option<MaintenanceIdentifier>,
}

impl Berth {
    #[inline]
    pub fn new<I>(
        id: BerthIdentifier,
        name: impl Into<String>,
        envelope: BerthEnvelope,
        accepted_types: I,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<CargoType>,
    {
        Self {
            id,
            name: name.into(),
            depth_m: None,
            envelope,
            accepted_types: accepted_types
                .into_iter()
                .map(Into::into)
                .filter(|t: &CargoType| !t.is_blank())
                .collect(),
            last_maintenance: None,
        }
    }

    #[inline]
    pub fn with_depth(mut self, depth_m: f64) -> Self {
        self.depth_m = Some(depth_m);
        self
    }

    #[inline]
    pub fn with_last_maintenance(mut self, record: MaintenanceIdentifier) -> Self {
        self.last_maintenance = Some(record);
        self
    }

    #[inline]
    pub fn id(&self) -> BerthIdentifier {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn depth_m(&self) -> Option<f64> {
        self.depth_m
    }

    #[inline]
    pub fn envelope(&self) -> &BerthEnvelope {
        &self.envelope
    }

    #[inline]
    pub fn accepted_types(&self) -> &BTreeSet<CargoType> {
        &self.accepted_types
    }

    #[inline]
    pub fn accepts_type(&self, cargo_type: &CargoType) -> bool {
        self.accepted_types.contains(cargo_type)
    }

    #[inline]
    pub fn last_maintenance(&self) -> Option<MaintenanceIdentifier> {
        self.last_maintenance
    }

    #[inline]
    pub(crate) fn set_last_maintenance(&mut self, record: MaintenanceIdentifier) {
        self.last_maintenance = Some(record);
    }
}

impl std::fmt::Display for Berth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Berth({}, {:?}, loa<={}, beam<={}, draft<={})",
            self.id,
            self.name,
            self.envelope.max_loa_m,
            self.envelope.max_beam_m,
            self.envelope.max_draft_m
        )
    }
}
