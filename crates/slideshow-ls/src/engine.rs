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

//! Construction followed by iterative local search.
//!
//! A run moves through `Idle -> Constructing -> Improving -> Finalized`.
//! Construction always completes and yields the first sequence the monitors
//! see. The improvement loop then asks the monitor and the metaheuristic
//! whether to continue, pulls the next move from the operator, evaluates it
//! incrementally, and lets the metaheuristic decide on acceptance. After an
//! accepted move the operator is prepared again for the new state; when the
//! operator runs dry the search sits at a local optimum. The outcome carries
//! the best sequence of the run, not the last accepted one.

use crate::{
    construction::{ConstructionBudget, GreedyConstruction},
    meta::metaheuristic::Metaheuristic,
    operator::LocalSearchOperator, result::LocalSearchEngineOutcome,
};
use rand::RngCore;
use slideshow_model::{score::Score, slide::SlideSet};
use slideshow_search::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    result::TerminationReason,
    stats::LocalSearchStatistics,
};
use std::time::Instant;

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Constructing,
    Improving,
    Finalized,
}

impl std::fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchPhase::Idle => write!(f, "Idle"),
            SearchPhase::Constructing => write!(f, "Constructing"),
            SearchPhase::Improving => write!(f, "Improving"),
            SearchPhase::Finalized => write!(f, "Finalized"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalSearchEngine {
    phase: SearchPhase,
}

impl LocalSearchEngine {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase of the current or last run.
    #[inline]
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    #[inline]
    fn enter(&mut self, phase: SearchPhase) {
        tracing::debug!(from = %self.phase, to = %phase, "search phase transition");
        self.phase = phase;
    }

    /// Builds a sequence over `slides` and improves it until a termination
    /// condition is met.
    ///
    /// Each call starts a fresh run from `Idle`. The RNG drives the start
    /// slide of the construction and the scan offsets of the operators.
    #[inline]
    pub fn run<O, M, SM, R>(
        &mut self,
        slides: &SlideSet,
        construction: &GreedyConstruction,
        operator: &mut O,
        metaheuristic: &mut M,
        monitor: &mut SM,
        rng: &mut R,
    ) -> LocalSearchEngineOutcome
    where
        O: LocalSearchOperator + ?Sized,
        M: Metaheuristic + ?Sized,
        SM: SearchMonitor + ?Sized,
        R: RngCore,
    {
        self.run_within(
            slides,
            construction,
            &ConstructionBudget::unlimited(),
            operator,
            metaheuristic,
            monitor,
            rng,
        )
    }

    /// Like `run`, with the construction bounded by `budget`.
    ///
    /// The monitors only take over once the construction has finished, so a
    /// budget matching their deadline keeps a slow construction from eating
    /// the whole run.
    #[allow(clippy::too_many_arguments)]
    pub fn run_within<O, M, SM, R>(
        &mut self,
        slides: &SlideSet,
        construction: &GreedyConstruction,
        budget: &ConstructionBudget<'_>,
        operator: &mut O,
        metaheuristic: &mut M,
        monitor: &mut SM,
        rng: &mut R,
    ) -> LocalSearchEngineOutcome
    where
        O: LocalSearchOperator + ?Sized,
        M: Metaheuristic + ?Sized,
        SM: SearchMonitor + ?Sized,
        R: RngCore,
    {
        self.phase = SearchPhase::Idle;
        let start_time = Instant::now();
        let mut stats = LocalSearchStatistics::default();

        self.enter(SearchPhase::Constructing);
        let mut state = construction.construct_within(slides, rng, budget);
        stats.set_construction_time(start_time.elapsed());

        debug_assert!(
            slides.is_empty() || !state.is_empty(),
            "called `LocalSearchEngine::run` and construction produced an empty sequence for {} slides",
            slides.len()
        );

        self.enter(SearchPhase::Improving);
        let mut best = state.to_sequence();
        tracing::debug!(
            score = best.score(),
            slides = best.len(),
            "construction finished"
        );

        monitor.on_start(&best);
        metaheuristic.on_start(&best);
        operator.prepare(&state, slides, rng);

        let termination_reason = loop {
            if let SearchCommand::Terminate(reason) = monitor.search_command(&stats) {
                break TerminationReason::Aborted(reason);
            }

            if let SearchCommand::Terminate(reason) =
                metaheuristic.search_command(stats.iterations, best.score())
            {
                break TerminationReason::Metaheuristic(reason);
            }

            stats.on_iteration();

            let Some(mv) = operator.next_neighbor(&state, slides) else {
                break TerminationReason::LocalOptimum;
            };

            let Some(delta) = state.evaluate(&mv, slides) else {
                stats.on_infeasible_move();
                monitor.on_iteration(state.score(), &stats);
                continue;
            };
            stats.on_evaluated_move();

            let current = state.score();
            let candidate = (current as i64 + delta) as Score;

            if metaheuristic.should_accept(current, candidate, best.score()) {
                state.apply(&mv, slides, delta);
                stats.on_accepted_move();
                metaheuristic.on_accept(candidate);

                if state.score() > best.score() {
                    best = state.to_sequence();
                    stats.on_improvement();
                    tracing::debug!(score = best.score(), %mv, "new best sequence");

                    metaheuristic.on_new_best(&best);
                    monitor.on_new_best(&best, &stats);
                }

                operator.prepare(&state, slides, rng);
            } else {
                metaheuristic.on_reject(candidate);
            }

            monitor.on_iteration(state.score(), &stats);
        };

        self.enter(SearchPhase::Finalized);
        stats.set_total_time(start_time.elapsed());
        monitor.on_end(&best, &stats);

        debug_assert!(
            best.validate(slides).is_ok(),
            "called `LocalSearchEngine::run` and the best sequence is infeasible"
        );

        match termination_reason {
            TerminationReason::LocalOptimum => LocalSearchEngineOutcome::local_optimum(best, stats),
            TerminationReason::Metaheuristic(msg) => {
                LocalSearchEngineOutcome::metaheuristic(best, msg, stats)
            }
            TerminationReason::Aborted(msg) => LocalSearchEngineOutcome::aborted(best, msg, stats),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        construction::StartStrategy,
        meta::{greedy_ascent::GreedyAscent, plateau_ascent::PlateauAscent},
        operator::{self, RoundRobinCompoundOperator, remove::RemoveOperator},
        state::{Move, SearchState},
    };
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use slideshow_model::{
        catalog::PhotoCatalogBuilder, generator::SlideGenerator, index::SlideIndex,
        photo::Orientation, sequence::Sequence,
    };
    use slideshow_search::monitor::{
        iteration_limit::IterationLimitMonitor, search_monitor::NoOpMonitor,
        stagnation::StagnationMonitor,
    };
    use std::sync::atomic::AtomicBool;

    fn horizontal(tags: &[&[&str]]) -> SlideSet {
        let mut builder = PhotoCatalogBuilder::new();
        for t in tags {
            builder.add_photo(Orientation::Horizontal, t.iter().copied());
        }
        SlideGenerator::default().generate(&builder.build())
    }

    fn run_with<SM: SearchMonitor>(
        slides: &SlideSet,
        start: StartStrategy,
        monitor: &mut SM,
        seed: u64,
    ) -> (LocalSearchEngine, LocalSearchEngineOutcome) {
        let mut engine = LocalSearchEngine::new();
        let mut op = operator::default_operator(slides);
        let mut mh = GreedyAscent::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let outcome = engine.run(
            slides,
            &GreedyConstruction::new(start),
            &mut op,
            &mut mh,
            monitor,
            &mut rng,
        );
        (engine, outcome)
    }

    /// Records every best score the engine reports.
    #[derive(Default)]
    struct BestTrace {
        initial: Option<Score>,
        bests: Vec<Score>,
        ended: bool,
    }

    impl SearchMonitor for BestTrace {
        fn name(&self) -> &str {
            "BestTrace"
        }
        fn on_start(&mut self, initial: &Sequence) {
            self.initial = Some(initial.score());
        }
        fn on_iteration(&mut self, _current_score: Score, _statistics: &LocalSearchStatistics) {}
        fn on_new_best(&mut self, best: &Sequence, _statistics: &LocalSearchStatistics) {
            self.bests.push(best.score());
        }
        fn on_end(&mut self, _best: &Sequence, _statistics: &LocalSearchStatistics) {
            self.ended = true;
        }
    }

    #[test]
    fn test_empty_slide_set_finishes_immediately() {
        let slides = horizontal(&[]);
        let (engine, outcome) = run_with(&slides, StartStrategy::Random, &mut NoOpMonitor, 0);
        assert_eq!(engine.phase(), SearchPhase::Finalized);
        assert!(outcome.sequence().is_empty());
        assert_eq!(outcome.sequence().score(), 0);
        assert!(outcome.termination_reason().is_local_optimum());
    }

    #[test]
    fn test_improves_a_poor_start_to_the_chain_optimum() {
        // Optimal order 0-1-2-3 scores 3.
        let slides = horizontal(&[&["a", "b"], &["b", "c"], &["c", "d"], &["d", "e"]]);
        let mut trace = BestTrace::default();
        let (_, outcome) = run_with(&slides, StartStrategy::Fixed(SlideIndex::new(1)), &mut trace, 7);

        assert!(trace.ended);
        assert_eq!(outcome.sequence().score(), 3);
        assert_eq!(outcome.sequence().len(), 4);
        assert!(outcome.termination_reason().is_local_optimum());
        assert!(outcome.sequence().validate(&slides).is_ok());

        // Reported bests strictly increase from the constructed score.
        let mut last = trace.initial.unwrap();
        for score in trace.bests {
            assert!(score > last);
            last = score;
        }
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let slides = horizontal(&[
            &["a", "b", "c"],
            &["c", "d"],
            &["a", "d", "e"],
            &["b", "e", "f"],
            &["f", "g", "a"],
            &["g", "c"],
        ]);
        let (_, a) = run_with(&slides, StartStrategy::Random, &mut NoOpMonitor, 42);
        let (_, b) = run_with(&slides, StartStrategy::Random, &mut NoOpMonitor, 42);
        assert_eq!(a.sequence(), b.sequence());
    }

    #[test]
    fn test_monitor_abort_keeps_constructed_sequence() {
        let slides = horizontal(&[&["a", "b"], &["b", "c"], &["c", "d"]]);
        let mut monitor = IterationLimitMonitor::new(0);
        let (_, outcome) = run_with(&slides, StartStrategy::Fixed(SlideIndex::new(0)), &mut monitor, 0);

        assert!(matches!(outcome.termination_reason(), TerminationReason::Aborted(_)));
        assert_eq!(outcome.statistics().iterations, 0);
        assert_eq!(outcome.sequence().score(), 2);
    }

    #[test]
    fn test_overlapping_slides_stay_photo_disjoint() {
        // Exhaustive pairing: six composites over four photos.
        let mut builder = PhotoCatalogBuilder::new();
        builder.add_photo(Orientation::Vertical, ["a", "b"]);
        builder.add_photo(Orientation::Vertical, ["x"]);
        builder.add_photo(Orientation::Vertical, ["b", "c"]);
        builder.add_photo(Orientation::Vertical, ["y"]);
        let slides = SlideGenerator::exhaustive().generate(&builder.build());

        let mut engine = LocalSearchEngine::new();
        let mut op = operator::default_operator(&slides);
        let mut mh = GreedyAscent::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let outcome = engine.run(
            &slides,
            &GreedyConstruction::new(StartStrategy::Fixed(SlideIndex::new(0))),
            &mut op,
            &mut mh,
            &mut NoOpMonitor,
            &mut rng,
        );
        assert!(outcome.sequence().validate(&slides).is_ok());
        assert!(outcome.termination_reason().is_local_optimum());
        assert!(outcome.sequence().score() >= 1);
    }

    #[test]
    fn test_plateau_ascent_stops_on_stagnation() {
        // All transitions score 0: every swap is a sideways move.
        let slides = horizontal(&[&["a"], &["b"], &["c"]]);
        let mut engine = LocalSearchEngine::new();
        let mut op = RoundRobinCompoundOperator::new(vec![Box::new(
            crate::operator::swap::SwapOperator::new(),
        )]);
        let mut mh = PlateauAscent::new();
        let mut monitor = StagnationMonitor::new(50);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let outcome = engine.run(
            &slides,
            &GreedyConstruction::default(),
            &mut op,
            &mut mh,
            &mut monitor,
            &mut rng,
        );

        assert!(matches!(outcome.termination_reason(), TerminationReason::Aborted(_)));
        assert_eq!(outcome.statistics().iterations, 50);
        assert!(mh.sideways_moves() > 0);
        assert_eq!(outcome.sequence().len(), 3);
    }

    /// Proposes an out-of-range removal a fixed number of times per state.
    struct InfeasibleOperator {
        per_state: usize,
        left: usize,
    }

    impl LocalSearchOperator for InfeasibleOperator {
        fn name(&self) -> &str {
            "InfeasibleOperator"
        }
        fn prepare(&mut self, _state: &SearchState, _slides: &SlideSet, _rng: &mut dyn RngCore) {
            self.left = self.per_state;
        }
        fn next_neighbor(&mut self, _state: &SearchState, _slides: &SlideSet) -> Option<Move> {
            self.left = self.left.checked_sub(1)?;
            Some(Move::Remove {
                position: usize::MAX,
            })
        }
        fn reset(&mut self) {
            self.left = self.per_state;
        }
    }

    #[derive(Default)]
    struct IterationCounter {
        calls: u64,
    }

    impl SearchMonitor for IterationCounter {
        fn name(&self) -> &str {
            "IterationCounter"
        }
        fn on_start(&mut self, _initial: &Sequence) {}
        fn on_iteration(&mut self, _current_score: Score, _statistics: &LocalSearchStatistics) {
            self.calls += 1;
        }
        fn on_new_best(&mut self, _best: &Sequence, _statistics: &LocalSearchStatistics) {}
        fn on_end(&mut self, _best: &Sequence, _statistics: &LocalSearchStatistics) {}
    }

    #[test]
    fn test_infeasible_moves_still_report_iterations() {
        let slides = horizontal(&[&["a", "b"], &["b", "c"]]);
        let mut engine = LocalSearchEngine::new();
        let mut op = InfeasibleOperator {
            per_state: 3,
            left: 0,
        };
        let mut mh = GreedyAscent::new();
        let mut monitor = IterationCounter::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let outcome = engine.run(
            &slides,
            &GreedyConstruction::default(),
            &mut op,
            &mut mh,
            &mut monitor,
            &mut rng,
        );

        assert!(outcome.termination_reason().is_local_optimum());
        assert_eq!(outcome.statistics().infeasible_moves, 3);
        // The fourth iteration finds the operator exhausted.
        assert_eq!(outcome.statistics().iterations, 4);
        assert_eq!(monitor.calls, 3);
    }

    #[test]
    fn test_exhausted_construction_budget_still_completes_the_run() {
        let slides = horizontal(&[&["a", "b"], &["c", "d"], &["b", "c"]]);
        let flag = AtomicBool::new(true);
        let budget = ConstructionBudget::unlimited().with_stop_signal(&flag);

        let mut engine = LocalSearchEngine::new();
        let mut op = operator::default_operator(&slides);
        let mut mh = GreedyAscent::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let outcome = engine.run_within(
            &slides,
            &GreedyConstruction::new(StartStrategy::Fixed(SlideIndex::new(0))),
            &budget,
            &mut op,
            &mut mh,
            &mut NoOpMonitor,
            &mut rng,
        );

        assert_eq!(engine.phase(), SearchPhase::Finalized);
        assert_eq!(outcome.sequence().len(), 3);
        assert_eq!(outcome.sequence().score(), 2);
    }

    #[test]
    fn test_remove_only_operator_drops_nothing_useful() {
        let slides = horizontal(&[&["a", "b"], &["b", "c"]]);
        let mut engine = LocalSearchEngine::new();
        let mut op = RemoveOperator::new();
        let mut mh = GreedyAscent::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let outcome = engine.run(
            &slides,
            &GreedyConstruction::new(StartStrategy::Fixed(SlideIndex::new(0))),
            &mut op,
            &mut mh,
            &mut NoOpMonitor,
            &mut rng,
        );
        assert_eq!(outcome.sequence().len(), 2);
        assert_eq!(outcome.statistics().accepted_moves, 0);
        assert_eq!(outcome.statistics().evaluated_moves, 2);
    }
}
