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

//! Periodic progress logging through `tracing`.
//!
//! `LogMonitor` emits an `info` event when the run starts, a progress event
//! at most once per `log_interval` while improving, a `debug` event on every
//! new best, and a summary when the run ends. Clock reads are throttled with
//! the same iteration mask scheme as `TimeLimitMonitor`.

use crate::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    stats::LocalSearchStatistics,
};
use slideshow_model::{score::Score, sequence::Sequence};
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct LogMonitor {
    label: String,
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_score: Option<Score>,
    rows: u64,
}

impl LogMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            label: String::from("search"),
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            best_score: None,
            rows: 0,
        }
    }

    /// Tags every event with `label`, e.g. the worker name.
    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }

    /// Number of progress rows emitted so far.
    #[inline]
    pub fn rows(&self) -> u64 {
        self.rows
    }

    fn log_progress(&mut self, current_score: Score, stats: &LocalSearchStatistics) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.start_time).as_secs_f32();
        info!(
            worker = %self.label,
            elapsed = format_args!("{elapsed:.1}s"),
            iterations = stats.iterations,
            current = current_score,
            best = self.best_score.unwrap_or(current_score),
            accepted = stats.accepted_moves,
            stagnant = stats.iterations_since_improvement,
            "progress"
        );
        self.last_log_time = now;
        self.rows += 1;
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 0x0FFF)
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {:.3}s, clock_check_mask: {})",
            self.log_interval.as_secs_f64(),
            self.clock_check_mask
        )
    }
}

impl SearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_start(&mut self, initial: &Sequence) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_score = Some(initial.score());
        self.rows = 0;
        info!(
            worker = %self.label,
            slides = initial.len(),
            score = initial.score(),
            "initial sequence constructed"
        );
    }

    fn on_iteration(&mut self, current_score: Score, stats: &LocalSearchStatistics) {
        if (stats.iterations & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_progress(current_score, stats);
        }
    }

    fn on_new_best(&mut self, best: &Sequence, stats: &LocalSearchStatistics) {
        self.best_score = Some(best.score());
        debug!(
            worker = %self.label,
            iteration = stats.iterations,
            score = best.score(),
            slides = best.len(),
            "new best"
        );
    }

    fn on_end(&mut self, best: &Sequence, stats: &LocalSearchStatistics) {
        info!(
            worker = %self.label,
            iterations = stats.iterations,
            improvements = stats.improvements,
            score = best.score(),
            slides = best.len(),
            elapsed = ?stats.total_time,
            "search finished"
        );
    }

    fn search_command(&mut self, _statistics: &LocalSearchStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
}
