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
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    stats::LocalSearchStatistics,
};
use slideshow_model::{score::Score, sequence::Sequence};

/// Terminates the search once a fixed number of improvement iterations has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationLimitMonitor {
    limit: u64,
}

impl IterationLimitMonitor {
    #[inline]
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl SearchMonitor for IterationLimitMonitor {
    fn name(&self) -> &str {
        "IterationLimitMonitor"
    }

    fn on_start(&mut self, _initial: &Sequence) {}
    fn on_iteration(&mut self, _current_score: Score, _statistics: &LocalSearchStatistics) {}
    fn on_new_best(&mut self, _best: &Sequence, _statistics: &LocalSearchStatistics) {}
    fn on_end(&mut self, _best: &Sequence, _statistics: &LocalSearchStatistics) {}

    #[inline]
    fn search_command(&mut self, statistics: &LocalSearchStatistics) -> SearchCommand {
        if statistics.iterations >= self.limit {
            SearchCommand::Terminate(format!("iteration limit of {} reached", self.limit))
        } else {
            SearchCommand::Continue
        }
    }
}
