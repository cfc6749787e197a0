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

use crate::stats::SolverStatistics;
use slideshow_model::{score::Score, sequence::Sequence};

/// Why a search run, or the whole solve, stopped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// No move of any neighborhood was accepted from the final sequence.
    LocalOptimum,
    /// The metaheuristic requested termination.
    Metaheuristic(String),
    /// A budget or external signal stopped the search (time, iterations,
    /// stagnation, interrupt). The string names the monitor's reason.
    Aborted(String),
}

impl TerminationReason {
    #[inline]
    pub fn is_local_optimum(&self) -> bool {
        matches!(self, Self::LocalOptimum)
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::LocalOptimum => write!(f, "Local Optimum Reached"),
            TerminationReason::Metaheuristic(msg) => {
                write!(f, "Metaheuristic Termination: {}", msg)
            }
            TerminationReason::Aborted(msg) => write!(f, "Aborted: {}", msg),
        }
    }
}

/// The final result of a solve: the best sequence, why the winning worker
/// stopped, and aggregate statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    sequence: Sequence,
    reason: TerminationReason,
    statistics: SolverStatistics,
    worker: Option<usize>,
}

impl SolverOutcome {
    #[inline]
    pub fn new(
        sequence: Sequence,
        reason: TerminationReason,
        statistics: SolverStatistics,
        worker: Option<usize>,
    ) -> Self {
        Self {
            sequence,
            reason,
            statistics,
            worker,
        }
    }

    #[inline]
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    #[inline]
    pub fn into_sequence(self) -> Sequence {
        self.sequence
    }

    #[inline]
    pub fn score(&self) -> Score {
        self.sequence.score()
    }

    #[inline]
    pub fn reason(&self) -> &TerminationReason {
        &self.reason
    }

    #[inline]
    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    /// Index of the worker whose sequence was selected; `None` if no worker ran.
    #[inline]
    pub fn worker(&self) -> Option<usize> {
        self.worker
    }
}

impl std::fmt::Display for SolverOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolverOutcome(score: {}, slides: {}, reason: {})",
            self.sequence.score(),
            self.sequence.len(),
            self.reason
        )
    }
}
