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

//! # Shared Incumbent (Best Sequence Holder)
//!
//! A concurrent container for the best sequence discovered so far by any
//! worker. It exposes a cheap, lock-free score hint through an atomic and keeps
//! the actual `Sequence` behind a `Mutex` as the source of truth.
//!
//! - `try_install(&Sequence) -> bool` installs a candidate if no sequence is
//!   held yet or if it strictly beats the held score.
//! - `score_hint()` is a relaxed read of the held score (`0` while empty); it
//!   never exceeds the true best score.
//! - `snapshot()` clones the held sequence.
//!
//! Equal scores never replace the holder, so the first installed sequence of a
//! given score wins.

use slideshow_model::{score::Score, sequence::Sequence};
use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

#[derive(Debug, Default)]
pub struct SharedIncumbent {
    /// Score of the held sequence; `0` while nothing is installed.
    score_hint: AtomicU64,
    installs: AtomicU64,
    sequence: Mutex<Option<Sequence>>,
}

impl std::fmt::Display for SharedIncumbent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Incumbent(score: {})", self.score_hint())
    }
}

impl SharedIncumbent {
    /// Creates a new shared incumbent with no sequence installed.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Relaxed read of the held score.
    #[inline]
    pub fn score_hint(&self) -> Score {
        self.score_hint.load(Ordering::Relaxed)
    }

    /// Number of successful installs so far.
    #[inline]
    pub fn num_installs(&self) -> u64 {
        self.installs.load(Ordering::Relaxed)
    }

    /// Returns the held score, or `None` when nothing is installed.
    pub fn best_score(&self) -> Option<Score> {
        self.lock().as_ref().map(Sequence::score)
    }

    /// Returns a snapshot of the held sequence, if any.
    pub fn snapshot(&self) -> Option<Sequence> {
        self.lock().clone()
    }

    /// Consumes the incumbent and returns the held sequence, if any.
    pub fn into_inner(self) -> Option<Sequence> {
        self.sequence
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Attempts to install `candidate`. Returns `true` if it was installed.
    pub fn try_install(&self, candidate: &Sequence) -> bool {
        // The hint lags behind the truth, never ahead of it.
        if candidate.score() < self.score_hint() {
            return false;
        }

        let mut guard = self.lock();
        // Another thread may have installed while we waited for the lock.
        if guard
            .as_ref()
            .is_some_and(|current| candidate.score() <= current.score())
        {
            return false;
        }

        *guard = Some(candidate.clone());
        self.score_hint.store(candidate.score(), Ordering::Relaxed);
        self.installs.fetch_add(1, Ordering::Relaxed);
        true
    }

    fn lock(&self) -> MutexGuard<'_, Option<Sequence>> {
        // A panicking worker cannot leave the slot half-written: it is a single assignment.
        self.sequence.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
