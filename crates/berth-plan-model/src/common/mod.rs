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
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub trait IdentifierMarkerName: Copy {
    const NAME: &'static str;
}

/// A raw id tagged with the kind of entity it names, so a vessel id cannot be
/// passed where a berth id is expected.
#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier<I, U>(I, core::marker::PhantomData<U>);

impl<I, U> Identifier<I, U> {
    #[inline]
    pub const fn new(id: I) -> Self {
        Self(id, core::marker::PhantomData)
    }

    #[inline]
    pub fn value(&self) -> &I {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> I {
        self.0
    }
}

impl<I, U> std::fmt::Display for Identifier<I, U>
where
    I: std::fmt::Display,
    U: IdentifierMarkerName,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME, self.0)
    }
}

impl<I: Serialize, U> Serialize for Identifier<I, U> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, I: Deserialize<'de>, U> Deserialize<'de> for Identifier<I, U> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        I::deserialize(deserializer).map(Identifier::new)
    }
}

macro_rules! identifier {
    ($(#[$doc:meta])* $alias:ident, $marker:ident, $raw:ty, $name:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $marker;

        impl IdentifierMarkerName for $marker {
            const NAME: &'static str = $name;
        }

        $(#[$doc])*
        pub type $alias = Identifier<$raw, $marker>;
    };
}

identifier!(
    /// Row id of a vessel record; scoped to the generation it was ingested for.
    VesselIdentifier,
    VesselIdentifierMarker,
    u64,
    "VesselId"
);
identifier!(
    /// Stable identity of a ship across generations.
    FleetIdentifier,
    FleetIdentifierMarker,
    u64,
    "FleetId"
);
identifier!(BerthIdentifier, BerthIdentifierMarker, u32, "BerthId");
identifier!(EntryIdentifier, EntryIdentifierMarker, u64, "EntryId");
identifier!(
    MaintenanceIdentifier,
    MaintenanceIdentifierMarker,
    u64,
    "MaintenanceId"
);
identifier!(
    /// Monotonically increasing id of one full schedule snapshot.
    GenerationIdentifier,
    GenerationIdentifierMarker,
    u64,
    "Generation"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_marker_name() {
        assert_eq!(BerthIdentifier::new(3).to_string(), "BerthId(3)");
        assert_eq!(GenerationIdentifier::new(12).to_string(), "Generation(12)");
    }

    #[test]
    fn test_ordering_follows_raw_value() {
        assert!(EntryIdentifier::new(1) < EntryIdentifier::new(2));
        assert_eq!(*VesselIdentifier::new(7).value(), 7);
        assert_eq!(FleetIdentifier::new(9).into_inner(), 9);
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = BerthIdentifier::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let back: BerthIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
