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

//! # Time Limit Monitor
//!
//! A lightweight monitor that enforces a wall-clock budget on the search. It
//! checks the clock only when `(iterations & clock_check_mask) == 0`, so the
//! cost in the hot loop is a single mask test. The default mask (`0x0FFF`)
//! checks roughly every 4096 iterations.
//!
//! The budget is either relative (`new`, measured from `on_start`) or an
//! absolute deadline shared by several workers (`until`). When a stop signal is
//! attached, the first monitor that observes the deadline raises it, so every
//! worker polling the same flag stops at the same time.
//!
//! ## Usage
//!
//! ```rust
//! use slideshow_search::monitor::time_limit::TimeLimitMonitor;
//! use slideshow_search::monitor::search_monitor::{SearchCommand, SearchMonitor};
//! use slideshow_search::stats::LocalSearchStatistics;
//! use std::time::Duration;
//!
//! let mut mon = TimeLimitMonitor::new(Duration::from_secs(5));
//! let stats = LocalSearchStatistics::default();
//! match mon.search_command(&stats) {
//!     SearchCommand::Continue => { /* keep searching */ }
//!     SearchCommand::Terminate(reason) => { /* stop: reason */ }
//! }
//! ```

use crate::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    stats::LocalSearchStatistics,
};
use slideshow_model::{score::Score, sequence::Sequence};
use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};

#[derive(Debug, Clone)]
pub struct TimeLimitMonitor<'a> {
    clock_check_mask: u64,
    /// Relative budget; `None` when the deadline is absolute.
    time_limit: Option<Duration>,
    deadline: Instant,
    stop_signal: Option<&'a AtomicBool>,
}

impl<'a> TimeLimitMonitor<'a> {
    /// Default mask: check every 4096 iterations.
    pub const DEFAULT_STEP_CLOCK_CHECK_MASK: u64 = 0x0FFF;

    /// A budget measured from the start of the run.
    #[inline]
    pub fn new(time_limit: Duration) -> Self {
        Self {
            clock_check_mask: Self::DEFAULT_STEP_CLOCK_CHECK_MASK,
            time_limit: Some(time_limit),
            deadline: Instant::now() + time_limit,
            stop_signal: None,
        }
    }

    /// A fixed deadline, independent of when the run starts.
    #[inline]
    pub fn until(deadline: Instant) -> Self {
        Self {
            clock_check_mask: Self::DEFAULT_STEP_CLOCK_CHECK_MASK,
            time_limit: None,
            deadline,
            stop_signal: None,
        }
    }

    /// Lower mask values check more often; `0` checks every iteration.
    #[inline]
    pub fn with_clock_check_mask(mut self, clock_check_mask: u64) -> Self {
        self.clock_check_mask = clock_check_mask;
        self
    }

    /// Raises `stop_signal` once the deadline has passed.
    #[inline]
    pub fn with_stop_signal(mut self, stop_signal: &'a AtomicBool) -> Self {
        self.stop_signal = Some(stop_signal);
        self
    }

    #[inline]
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

impl SearchMonitor for TimeLimitMonitor<'_> {
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_start(&mut self, _initial: &Sequence) {
        if let Some(limit) = self.time_limit {
            self.deadline = Instant::now() + limit;
        }
    }

    fn on_iteration(&mut self, _current_score: Score, _statistics: &LocalSearchStatistics) {}
    fn on_new_best(&mut self, _best: &Sequence, _statistics: &LocalSearchStatistics) {}
    fn on_end(&mut self, _best: &Sequence, _statistics: &LocalSearchStatistics) {}

    #[inline]
    fn search_command(&mut self, statistics: &LocalSearchStatistics) -> SearchCommand {
        if (statistics.iterations & self.clock_check_mask) == 0 && Instant::now() >= self.deadline
        {
            if let Some(stop) = self.stop_signal {
                stop.store(true, Ordering::Relaxed);
            }
            return SearchCommand::Terminate("time limit reached".to_string());
        }
        SearchCommand::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_at(iterations: u64) -> LocalSearchStatistics {
        LocalSearchStatistics {
            iterations,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_mask_is_power_of_two_minus_one() {
        assert_eq!(TimeLimitMonitor::DEFAULT_STEP_CLOCK_CHECK_MASK, 0x0FFF);
    }

    #[test]
    fn test_terminates_after_deadline_when_mask_condition_met() {
        let mut mon = TimeLimitMonitor::until(Instant::now() - Duration::from_millis(50));
        match mon.search_command(&stats_at(0)) {
            SearchCommand::Terminate(msg) => assert!(msg.contains("time limit")),
            other => panic!("expected Terminate, got {:?}", other),
        }
    }

    #[test]
    fn test_skips_clock_when_mask_condition_not_met() {
        let mut mon = TimeLimitMonitor::until(Instant::now() - Duration::from_millis(50));
        assert_eq!(mon.search_command(&stats_at(1)), SearchCommand::Continue);
    }

    #[test]
    fn test_mask_zero_always_checks() {
        let mut mon = TimeLimitMonitor::until(Instant::now() - Duration::from_millis(50))
            .with_clock_check_mask(0);
        assert!(matches!(
            mon.search_command(&stats_at(12345)),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_continues_before_deadline() {
        let mut mon = TimeLimitMonitor::new(Duration::from_secs(3600));
        mon.on_start(&Sequence::empty());
        for s in [0u64, 4096, 8192] {
            assert_eq!(mon.search_command(&stats_at(s)), SearchCommand::Continue);
        }
    }

    #[test]
    fn test_on_start_rearms_relative_budget_only() {
        let fixed = Instant::now() + Duration::from_secs(1);
        let mut absolute = TimeLimitMonitor::until(fixed);
        absolute.on_start(&Sequence::empty());
        assert_eq!(absolute.deadline(), fixed);

        let mut relative = TimeLimitMonitor::new(Duration::from_secs(60));
        let before = relative.deadline();
        std::thread::sleep(Duration::from_millis(2));
        relative.on_start(&Sequence::empty());
        assert!(relative.deadline() > before);
    }

    #[test]
    fn test_trips_shared_stop_signal() {
        let stop = AtomicBool::new(false);
        let mut mon = TimeLimitMonitor::until(Instant::now() - Duration::from_millis(1))
            .with_stop_signal(&stop);
        assert!(matches!(
            mon.search_command(&stats_at(0)),
            SearchCommand::Terminate(_)
        ));
        assert!(stop.load(Ordering::Relaxed));
    }
}
