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

//! Statistics reporting for search runs.
//!
//! `LocalSearchStatistics` tracks the per-worker counters of a single
//! construction plus improvement run: iterations, evaluated and infeasible
//! moves, accepted moves, improvements of the best score, the length of the
//! current stagnation streak, and timings. Updates use saturating arithmetic so
//! the hot loop never traps on overflow. `SolverStatistics` aggregates a whole
//! multi-start solve and is assembled through `SolverStatisticsBuilder`.

use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LocalSearchStatistics {
    /// Number of improvement iterations (candidate moves drawn).
    pub iterations: u64,

    /// Number of candidate moves that were feasible and got a score delta.
    pub evaluated_moves: u64,

    /// Number of candidate moves rejected as infeasible.
    pub infeasible_moves: u64,

    /// Number of accepted moves.
    pub accepted_moves: u64,

    /// Number of times the best score strictly improved.
    pub improvements: u64,

    /// Iterations since the best score last improved.
    pub iterations_since_improvement: u64,

    /// Time spent in the construction phase.
    pub construction_time: Duration,

    /// Total time of the run, construction included.
    pub total_time: Duration,
}

impl LocalSearchStatistics {
    /// Called at each iteration of the improvement loop.
    #[inline]
    pub fn on_iteration(&mut self) {
        self.iterations = self.iterations.saturating_add(1);
        self.iterations_since_improvement = self.iterations_since_improvement.saturating_add(1);
    }

    /// Called when a candidate move is feasible and has been evaluated.
    #[inline]
    pub fn on_evaluated_move(&mut self) {
        self.evaluated_moves = self.evaluated_moves.saturating_add(1);
    }

    /// Called when a candidate move violates photo-disjointness.
    #[inline]
    pub fn on_infeasible_move(&mut self) {
        self.infeasible_moves = self.infeasible_moves.saturating_add(1);
    }

    /// Called when a move is accepted.
    #[inline]
    pub fn on_accepted_move(&mut self) {
        self.accepted_moves = self.accepted_moves.saturating_add(1);
    }

    /// Called when the best score strictly improves.
    #[inline]
    pub fn on_improvement(&mut self) {
        self.improvements = self.improvements.saturating_add(1);
        self.iterations_since_improvement = 0;
    }

    #[inline]
    pub fn set_construction_time(&mut self, duration: Duration) {
        self.construction_time = duration;
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.total_time = duration;
    }

    #[inline]
    pub fn rejected_moves(&self) -> u64 {
        self.evaluated_moves.saturating_sub(self.accepted_moves)
    }

    /// Rough confidence that the search has converged: the stagnation streak
    /// relative to `budget`, clamped to `[0, 1]`. A zero budget yields `0`.
    ///
    /// This is an informational estimate, not an optimality gap.
    pub fn confidence(&self, budget: u64) -> f64 {
        if budget == 0 {
            return 0.0;
        }
        (self.iterations_since_improvement as f64 / budget as f64).clamp(0.0, 1.0)
    }
}

impl std::fmt::Display for LocalSearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Local Search Statistics:")?;
        writeln!(f, "   Iterations:                {}", self.iterations)?;
        writeln!(f, "   Evaluated Moves:           {}", self.evaluated_moves)?;
        writeln!(f, "   Infeasible Moves:          {}", self.infeasible_moves)?;
        writeln!(f, "   Accepted Moves:            {}", self.accepted_moves)?;
        writeln!(f, "   Rejected Moves:            {}", self.rejected_moves())?;
        writeln!(f, "   Improvements:              {}", self.improvements)?;
        writeln!(
            f,
            "   Since Last Improvement:    {}",
            self.iterations_since_improvement
        )?;
        writeln!(f, "   Construction Time:         {:?}", self.construction_time)?;
        writeln!(f, "   Total Time:                {:?}", self.total_time)?;
        Ok(())
    }
}

/// Statistics collected over a whole multi-start solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverStatistics {
    /// Number of sequences installed into the shared incumbent.
    pub incumbent_updates: u64,
    /// Number of worker threads used.
    pub used_threads: usize,
    /// Sum of improvement iterations over all workers.
    pub total_iterations: u64,
    /// Convergence estimate of the winning worker, in `[0, 1]`.
    pub confidence: f64,
    /// Total duration of the solve.
    pub solve_duration: Duration,
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solver Statistics:")?;
        writeln!(f, "  Incumbent Updates: {}", self.incumbent_updates)?;
        writeln!(f, "  Used Threads: {}", self.used_threads)?;
        writeln!(f, "  Total Iterations: {}", self.total_iterations)?;
        writeln!(f, "  Confidence: {:.3}", self.confidence)?;
        writeln!(
            f,
            "  Solve Duration (secs): {:.3}",
            self.solve_duration.as_secs_f64()
        )
    }
}

/// Builder for `SolverStatistics`.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverStatisticsBuilder {
    incumbent_updates: u64,
    used_threads: usize,
    total_iterations: u64,
    confidence: f64,
    solve_duration: Duration,
}

impl Default for SolverStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverStatisticsBuilder {
    /// Creates a new `SolverStatisticsBuilder` with default values.
    #[inline]
    pub fn new() -> Self {
        Self {
            incumbent_updates: 0,
            used_threads: 1,
            total_iterations: 0,
            confidence: 0.0,
            solve_duration: Duration::ZERO,
        }
    }

    #[inline]
    pub fn incumbent_updates(mut self, incumbent_updates: u64) -> Self {
        self.incumbent_updates = incumbent_updates;
        self
    }

    #[inline]
    pub fn used_threads(mut self, used_threads: usize) -> Self {
        self.used_threads = used_threads;
        self
    }

    #[inline]
    pub fn total_iterations(mut self, total_iterations: u64) -> Self {
        self.total_iterations = total_iterations;
        self
    }

    /// Sets the confidence estimate; values outside `[0, 1]` are clamped.
    #[inline]
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    #[inline]
    pub fn solve_duration(mut self, solve_duration: Duration) -> Self {
        self.solve_duration = solve_duration;
        self
    }

    /// Builds the `SolverStatistics` instance.
    #[inline]
    pub fn build(self) -> SolverStatistics {
        SolverStatistics {
            incumbent_updates: self.incumbent_updates,
            used_threads: self.used_threads,
            total_iterations: self.total_iterations,
            confidence: self.confidence,
            solve_duration: self.solve_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_stagnation_streak() {
        let mut stats = LocalSearchStatistics::default();
        for _ in 0..5 {
            stats.on_iteration();
        }
        stats.on_evaluated_move();
        stats.on_evaluated_move();
        stats.on_infeasible_move();
        stats.on_accepted_move();

        assert_eq!(stats.iterations, 5);
        assert_eq!(stats.iterations_since_improvement, 5);
        assert_eq!(stats.rejected_moves(), 1);

        stats.on_improvement();
        assert_eq!(stats.improvements, 1);
        assert_eq!(stats.iterations_since_improvement, 0);

        stats.on_iteration();
        assert_eq!(stats.iterations, 6);
        assert_eq!(stats.iterations_since_improvement, 1);
    }

    #[test]
    fn test_counters_saturate() {
        let mut stats = LocalSearchStatistics {
            iterations: u64::MAX,
            iterations_since_improvement: u64::MAX,
            ..Default::default()
        };
        stats.on_iteration();
        assert_eq!(stats.iterations, u64::MAX);
        assert_eq!(stats.iterations_since_improvement, u64::MAX);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let mut stats = LocalSearchStatistics::default();
        assert_eq!(stats.confidence(100), 0.0);

        stats.iterations_since_improvement = 25;
        assert!((stats.confidence(100) - 0.25).abs() < 1e-12);

        stats.iterations_since_improvement = 500;
        assert_eq!(stats.confidence(100), 1.0);
        assert_eq!(stats.confidence(0), 0.0);
    }

    #[test]
    fn test_local_search_display_lists_counters() {
        let stats = LocalSearchStatistics {
            iterations: 42,
            accepted_moves: 7,
            evaluated_moves: 10,
            ..Default::default()
        };
        let rendered = stats.to_string();
        assert!(rendered.contains("Iterations:                42"));
        assert!(rendered.contains("Accepted Moves:            7"));
        assert!(rendered.contains("Rejected Moves:            3"));
    }

    #[test]
    fn test_builder_constructs_expected_struct() {
        let stats = SolverStatisticsBuilder::new()
            .incumbent_updates(3)
            .used_threads(8)
            .total_iterations(1_000)
            .confidence(1.7)
            .solve_duration(Duration::from_millis(1234))
            .build();

        assert_eq!(stats.incumbent_updates, 3);
        assert_eq!(stats.used_threads, 8);
        assert_eq!(stats.total_iterations, 1_000);
        assert_eq!(stats.confidence, 1.0);
        assert_eq!(stats.solve_duration, Duration::from_millis(1234));

        let rendered = stats.to_string();
        assert!(rendered.contains("Solver Statistics:"));
        assert!(rendered.contains("Used Threads: 8"));
        assert!(rendered.contains("Solve Duration (secs): 1.234"));
    }
}
