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
use crate::{common::VesselIdentifier, fleet::err::FleetError};

#[derive(Debug)]
pub enum SnapshotLoaderError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Fleet(FleetError),
    NonPositiveDuration(VesselIdentifier, i64),
    TimestampOutOfRange(i64),
}

impl From<std::io::Error> for SnapshotLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SnapshotLoaderError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<FleetError> for SnapshotLoaderError {
    fn from(e: FleetError) -> Self {
        Self::Fleet(e)
    }
}

impl std::fmt::Display for SnapshotLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use SnapshotLoaderError::*;
        match self {
            Io(e) => write!(f, "I/O error: {e}"),
            Json(e) => write!(f, "malformed snapshot: {e}"),
            Fleet(e) => write!(f, "inconsistent snapshot: {e}"),
            NonPositiveDuration(id, m) => {
                write!(f, "vessel {id} has non-positive estimated duration {m} min")
            }
            TimestampOutOfRange(s) => write!(f, "timestamp {s} is out of range"),
        }
    }
}

impl std::error::Error for SnapshotLoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotLoaderError::Io(e) => Some(e),
            SnapshotLoaderError::Json(e) => Some(e),
            SnapshotLoaderError::Fleet(e) => Some(e),
            _ => None,
        }
    }
}
