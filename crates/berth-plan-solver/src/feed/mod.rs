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
//! Polling feed over newly written schedule rows.

pub mod stop;

use crate::{err::PlanError, feed::stop::StopToken, registry::store::VersionStore};
use berth_plan_model::prelude::{EntryIdentifier, ScheduleEntry};
use std::time::{Duration, Instant};

const STOP_CHECK_SLICE: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedControl {
    Continue,
    Stop,
}

/// Receives each polled batch. Returning [`FeedControl::Stop`] ends the loop,
/// e.g. when the downstream client has gone away.
pub trait FeedSink {
    fn deliver(&mut self, rows: &[ScheduleEntry]) -> FeedControl;
}

impl<F> FeedSink for F
where
    F: FnMut(&[ScheduleEntry]) -> FeedControl,
{
    #[inline]
    fn deliver(&mut self, rows: &[ScheduleEntry]) -> FeedControl {
        self(rows)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedExit {
    StopToken,
    SinkClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedSummary {
    pub polls: u64,
    pub delivered: u64,
    pub cursor: Option<EntryIdentifier>,
    pub exit: FeedExit,
}

/// Cursor-based reader of [`VersionStore::rows_after`].
///
/// Store locks are only taken inside a single poll, never while sleeping or
/// while the sink runs.
#[derive(Debug)]
pub struct EntryFeed<'s, S: ?Sized> {
    store: &'s S,
    poll_interval: Duration,
    batch_limit: usize,
    cursor: Option<EntryIdentifier>,
}

impl<'s, S: VersionStore + ?Sized> EntryFeed<'s, S> {
    #[inline]
    pub fn new(store: &'s S, poll_interval: Duration, batch_limit: usize) -> Self {
        Self {
            store,
            poll_interval,
            batch_limit: batch_limit.max(1),
            cursor: None,
        }
    }

    /// Skips everything up to and including `cursor`.
    #[inline]
    pub fn starting_after(mut self, cursor: EntryIdentifier) -> Self {
        self.cursor = Some(cursor);
        self
    }

    #[inline]
    pub fn cursor(&self) -> Option<EntryIdentifier> {
        self.cursor
    }

    /// Fetches the next batch and advances the cursor past it.
    pub fn poll_once(&mut self) -> Result<Vec<ScheduleEntry>, PlanError> {
        let rows = self.store.rows_after(self.cursor, self.batch_limit)?;
        if let Some(last) = rows.last() {
            self.cursor = Some(last.id());
        }
        Ok(rows)
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run<K: FeedSink + ?Sized>(
        &mut self,
        stop: &StopToken,
        sink: &mut K,
    ) -> Result<FeedSummary, PlanError> {
        let mut polls = 0u64;
        let mut delivered = 0u64;

        let exit = loop {
            if stop.is_set() {
                break FeedExit::StopToken;
            }
            let rows = self.poll_once()?;
            polls += 1;

            if !rows.is_empty() {
                delivered += rows.len() as u64;
                tracing::trace!(rows = rows.len(), cursor = ?self.cursor, "Feed batch");
                if sink.deliver(&rows) == FeedControl::Stop {
                    break FeedExit::SinkClosed;
                }
                // A full batch means more may be waiting.
                if rows.len() == self.batch_limit {
                    continue;
                }
            }

            if self.sleep_unless_stopped(stop) {
                break FeedExit::StopToken;
            }
        };

        tracing::debug!(polls, delivered, ?exit, "Feed stopped");
        Ok(FeedSummary {
            polls,
            delivered,
            cursor: self.cursor,
            exit,
        })
    }

    /// Returns `true` if the token was set while waiting.
    fn sleep_unless_stopped(&self, stop: &StopToken) -> bool {
        let deadline = Instant::now() + self.poll_interval;
        loop {
            if stop.is_set() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            std::thread::sleep(STOP_CHECK_SLICE.min(deadline - now));
        }
    }
}
