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
use berth_plan_model::prelude::{EntryIdentifier, GenerationIdentifier, ValidationError};

/// A failure inside the persistence backend itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageError {
    message: String,
}

impl StorageError {
    #[inline]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Storage failure: {}", self.message)
    }
}

impl std::error::Error for StorageError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreError {
    EntryNotFound(EntryIdentifier),
    GenerationNotFound(GenerationIdentifier),
    /// The row was already replaced by a newer version.
    EntrySuperseded(EntryIdentifier),
    /// The same row appears twice in one replacement batch.
    DuplicateReplacement(EntryIdentifier),
    /// The row did not replace anything, so there is nothing to revert.
    NotAReplacement(EntryIdentifier),
    /// The write would break a generation invariant.
    Rejected(ValidationError),
    Storage(StorageError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use StoreError::*;
        match self {
            EntryNotFound(id) => write!(f, "Entry {id} does not exist"),
            GenerationNotFound(g) => write!(f, "{g} does not exist"),
            EntrySuperseded(id) => write!(f, "Entry {id} has already been superseded"),
            DuplicateReplacement(id) => write!(f, "Entry {id} is replaced twice in one batch"),
            NotAReplacement(id) => write!(f, "Entry {id} does not replace another row"),
            Rejected(e) => write!(f, "Write rejected: {e}"),
            Storage(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StorageError> for StoreError {
    fn from(e: StorageError) -> Self {
        StoreError::Storage(e)
    }
}

impl From<ValidationError> for StoreError {
    fn from(e: ValidationError) -> Self {
        StoreError::Rejected(e)
    }
}
