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
    incumbent::SharedIncumbent, monitor::search_monitor::SearchMonitor, result::TerminationReason,
    stats::LocalSearchStatistics,
};
use slideshow_model::{sequence::Sequence, slide::SlideSet};
use std::{sync::atomic::AtomicBool, time::Instant};

/// Everything a worker gets from the orchestrating solver.
pub struct PortfolioSolverContext<'a> {
    pub slides: &'a SlideSet,
    pub incumbent: &'a SharedIncumbent,
    pub monitor: &'a mut dyn SearchMonitor,
    /// Global deadline of the solve, if any.
    pub deadline: Option<Instant>,
    /// Flag raised when all workers must stop.
    pub stop_signal: Option<&'a AtomicBool>,
}

impl<'a> PortfolioSolverContext<'a> {
    #[inline(always)]
    pub fn new(
        slides: &'a SlideSet,
        incumbent: &'a SharedIncumbent,
        monitor: &'a mut dyn SearchMonitor,
    ) -> Self {
        Self {
            slides,
            incumbent,
            monitor,
            deadline: None,
            stop_signal: None,
        }
    }

    #[inline]
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    #[inline]
    pub fn with_stop_signal(mut self, stop_signal: &'a AtomicBool) -> Self {
        self.stop_signal = Some(stop_signal);
        self
    }
}

impl std::fmt::Debug for PortfolioSolverContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioSolverContext")
            .field("slides", &self.slides.len())
            .field("incumbent", &self.incumbent)
            .field("monitor", &self.monitor.name())
            .field("deadline", &self.deadline)
            .field("stop_signal", &self.stop_signal)
            .finish()
    }
}

impl std::fmt::Display for PortfolioSolverContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PortfolioSolverContext(slides: {}, monitor: {})",
            self.slides,
            self.monitor.name(),
        )
    }
}

/// What a single worker hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSolverResult {
    sequence: Sequence,
    termination_reason: TerminationReason,
    statistics: LocalSearchStatistics,
}

impl PortfolioSolverResult {
    #[inline]
    pub fn new(
        sequence: Sequence,
        termination_reason: TerminationReason,
        statistics: LocalSearchStatistics,
    ) -> Self {
        Self {
            sequence,
            termination_reason,
            statistics,
        }
    }

    #[inline]
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
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

impl std::fmt::Display for PortfolioSolverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PortfolioSolverResult(score: {}, termination_reason: {})",
            self.sequence.score(),
            self.termination_reason
        )
    }
}

/// A search strategy that can run as one worker of a multi-start solve.
pub trait PortfolioSolver {
    fn name(&self) -> &str;
    fn solve(&mut self, context: PortfolioSolverContext<'_>) -> PortfolioSolverResult;
}
