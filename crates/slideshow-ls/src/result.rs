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

//! Outcome of a single local search run.
//!
//! Bundles the best sequence discovered, the run statistics, and the reason
//! the run ended. Termination reasons are shared with the solver layer so a
//! worker's outcome can be forwarded without translation.

use slideshow_model::sequence::Sequence;
use slideshow_search::{result::TerminationReason, stats::LocalSearchStatistics};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSearchEngineOutcome {
    termination_reason: TerminationReason,
    sequence: Sequence,
    statistics: LocalSearchStatistics,
}

impl LocalSearchEngineOutcome {
    /// Creates a new local optimum outcome.
    #[inline]
    pub fn local_optimum(sequence: Sequence, statistics: LocalSearchStatistics) -> Self {
        Self {
            termination_reason: TerminationReason::LocalOptimum,
            sequence,
            statistics,
        }
    }

    /// Creates a new metaheuristic-initiated termination outcome.
    #[inline]
    pub fn metaheuristic<R>(sequence: Sequence, reason: R, statistics: LocalSearchStatistics) -> Self
    where
        R: Into<String>,
    {
        Self {
            termination_reason: TerminationReason::Metaheuristic(reason.into()),
            sequence,
            statistics,
        }
    }

    /// Creates a new aborted outcome.
    #[inline]
    pub fn aborted<R>(sequence: Sequence, reason: R, statistics: LocalSearchStatistics) -> Self
    where
        R: Into<String>,
    {
        Self {
            termination_reason: TerminationReason::Aborted(reason.into()),
            sequence,
            statistics,
        }
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the best sequence of the run.
    #[inline]
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    #[inline]
    pub fn statistics(&self) -> &LocalSearchStatistics {
        &self.statistics
    }

    #[inline]
    pub fn into_parts(self) -> (Sequence, TerminationReason, LocalSearchStatistics) {
        (self.sequence, self.termination_reason, self.statistics)
    }
}

impl std::fmt::Display for LocalSearchEngineOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LocalSearchEngineOutcome(score: {}, slides: {}, reason: {})",
            self.sequence.score(),
            self.sequence.len(),
            self.termination_reason
        )
    }
}
