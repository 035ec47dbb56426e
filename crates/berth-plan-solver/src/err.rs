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
use crate::{
    estimator::EstimatorError,
    registry::err::{StorageError, StoreError},
};
use berth_plan_model::prelude::{
    BerthIdentifier, ChangeError, EntryIdentifier, GenerationIdentifier, LookupError,
    ValidationError, VesselIdentifier,
};
use berth_plan_model::schedule::err::VesselNotScheduledError;

/// Coarse classification adapters use to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanErrorKind {
    NotFound,
    InvalidInput,
    EstimatorUnavailable,
    ConcurrencyConflict,
    Storage,
}

impl PlanErrorKind {
    /// HTTP-style status an adapter would typically answer with.
    #[inline]
    pub fn status_hint(self) -> u16 {
        match self {
            PlanErrorKind::NotFound => 404,
            PlanErrorKind::InvalidInput => 400,
            _ => 500,
        }
    }

    /// Whether repeating the whole operation may succeed.
    #[inline]
    pub fn is_retryable(self) -> bool {
        matches!(self, PlanErrorKind::ConcurrencyConflict)
    }
}

impl std::fmt::Display for PlanErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlanErrorKind::NotFound => "not found",
            PlanErrorKind::InvalidInput => "invalid input",
            PlanErrorKind::EstimatorUnavailable => "estimator unavailable",
            PlanErrorKind::ConcurrencyConflict => "concurrency conflict",
            PlanErrorKind::Storage => "storage",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NotFoundError {
    Entry(EntryIdentifier),
    Generation(GenerationIdentifier),
    Lookup(LookupError),
}

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotFoundError::Entry(id) => write!(f, "Entry {id} does not exist"),
            NotFoundError::Generation(g) => write!(f, "{g} does not exist"),
            NotFoundError::Lookup(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for NotFoundError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InvalidInputError {
    Change(ChangeError),
    Validation(ValidationError),
    DuplicateVessel(VesselIdentifier),
    DuplicateBerth(BerthIdentifier),
    DuplicateEntryInBatch(EntryIdentifier),
    GenerationMismatch {
        entry: EntryIdentifier,
        expected: GenerationIdentifier,
        found: GenerationIdentifier,
    },
    /// A vessel-addressed fix names another generation than the batch.
    FixGenerationMismatch {
        vessel: VesselIdentifier,
        expected: GenerationIdentifier,
        found: GenerationIdentifier,
    },
    StaleEntry(EntryIdentifier),
    TimeOverflow(VesselIdentifier),
}

impl std::fmt::Display for InvalidInputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use InvalidInputError::*;
        match self {
            Change(e) => write!(f, "{e}"),
            Validation(e) => write!(f, "{e}"),
            DuplicateVessel(v) => write!(f, "Vessel {v} is listed more than once"),
            DuplicateBerth(b) => write!(f, "Berth {b} is listed more than once"),
            DuplicateEntryInBatch(id) => write!(f, "Entry {id} is changed twice in one batch"),
            GenerationMismatch {
                entry,
                expected,
                found,
            } => write!(f, "Entry {entry} belongs to {found}, not {expected}"),
            FixGenerationMismatch {
                vessel,
                expected,
                found,
            } => write!(f, "Fix for vessel {vessel} targets {found}, not {expected}"),
            StaleEntry(id) => write!(f, "Entry {id} has been superseded; fix the current row"),
            TimeOverflow(v) => write!(f, "Interval for vessel {v} is out of the time range"),
        }
    }
}

impl std::error::Error for InvalidInputError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConcurrencyConflictError {
    /// Another batch currently holds this entry.
    EntryLocked(EntryIdentifier),
    /// The entry changed between validation and write.
    EntryChanged(EntryIdentifier),
}

impl std::fmt::Display for ConcurrencyConflictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConcurrencyConflictError::EntryLocked(id) => {
                write!(f, "Entry {id} is being reconciled by another batch")
            }
            ConcurrencyConflictError::EntryChanged(id) => {
                write!(f, "Entry {id} changed concurrently")
            }
        }
    }
}

impl std::error::Error for ConcurrencyConflictError {}

/// Every failure the planning operations report.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlanError {
    NotFound(NotFoundError),
    InvalidInput(InvalidInputError),
    EstimatorUnavailable(EstimatorError),
    ConcurrencyConflict(ConcurrencyConflictError),
    Storage(StorageError),
}

impl PlanError {
    #[inline]
    pub fn kind(&self) -> PlanErrorKind {
        match self {
            PlanError::NotFound(_) => PlanErrorKind::NotFound,
            PlanError::InvalidInput(_) => PlanErrorKind::InvalidInput,
            PlanError::EstimatorUnavailable(_) => PlanErrorKind::EstimatorUnavailable,
            PlanError::ConcurrencyConflict(_) => PlanErrorKind::ConcurrencyConflict,
            PlanError::Storage(_) => PlanErrorKind::Storage,
        }
    }
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::NotFound(e) => write!(f, "{}: {}", self.kind(), e),
            PlanError::InvalidInput(e) => write!(f, "{}: {}", self.kind(), e),
            PlanError::EstimatorUnavailable(e) => write!(f, "{}: {}", self.kind(), e),
            PlanError::ConcurrencyConflict(e) => write!(f, "{}: {}", self.kind(), e),
            PlanError::Storage(e) => write!(f, "{}: {}", self.kind(), e),
        }
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlanError::NotFound(e) => Some(e),
            PlanError::InvalidInput(e) => Some(e),
            PlanError::EstimatorUnavailable(e) => Some(e),
            PlanError::ConcurrencyConflict(e) => Some(e),
            PlanError::Storage(e) => Some(e),
        }
    }
}

impl From<NotFoundError> for PlanError {
    fn from(e: NotFoundError) -> Self {
        PlanError::NotFound(e)
    }
}

impl From<InvalidInputError> for PlanError {
    fn from(e: InvalidInputError) -> Self {
        PlanError::InvalidInput(e)
    }
}

impl From<EstimatorError> for PlanError {
    fn from(e: EstimatorError) -> Self {
        PlanError::EstimatorUnavailable(e)
    }
}

impl From<ConcurrencyConflictError> for PlanError {
    fn from(e: ConcurrencyConflictError) -> Self {
        PlanError::ConcurrencyConflict(e)
    }
}

impl From<StorageError> for PlanError {
    fn from(e: StorageError) -> Self {
        PlanError::Storage(e)
    }
}

impl From<LookupError> for PlanError {
    fn from(e: LookupError) -> Self {
        PlanError::NotFound(NotFoundError::Lookup(e))
    }
}

impl From<VesselNotScheduledError> for PlanError {
    fn from(e: VesselNotScheduledError) -> Self {
        LookupError::from(e).into()
    }
}

impl From<ChangeError> for PlanError {
    fn from(e: ChangeError) -> Self {
        PlanError::InvalidInput(InvalidInputError::Change(e))
    }
}

impl From<ValidationError> for PlanError {
    fn from(e: ValidationError) -> Self {
        match e {
            ValidationError::Lookup(l) => l.into(),
            other => PlanError::InvalidInput(InvalidInputError::Validation(other)),
        }
    }
}

impl From<StoreError> for PlanError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::EntryNotFound(id) => NotFoundError::Entry(id).into(),
            StoreError::GenerationNotFound(g) => NotFoundError::Generation(g).into(),
            StoreError::EntrySuperseded(id) => ConcurrencyConflictError::EntryChanged(id).into(),
            StoreError::DuplicateReplacement(id) => {
                InvalidInputError::DuplicateEntryInBatch(id).into()
            }
            e @ StoreError::NotAReplacement(_) => StorageError::new(e.to_string()).into(),
            StoreError::Rejected(v) => v.into(),
            StoreError::Storage(s) => s.into(),
        }
    }
}
