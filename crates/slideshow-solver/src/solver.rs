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

//! # Parallel Multi-Start Solver
//!
//! Runs `workers` independent local search workers on a shared, read-only slide
//! set. Worker `i` seeds its RNG with `seed + i`, builds its own sequence, and
//! improves it until its monitors stop it. Workers share two things:
//!
//! - a `SharedIncumbent` to which each worker proposes its best sequence;
//! - a stop signal polled at every iteration through an `InterruptMonitor`.
//!   The first time-limit monitor to observe the global deadline raises it, so
//!   all workers stop together.
//!
//! The final answer is the best worker result, ties broken by the lowest worker
//! index. With a fixed seed and termination that does not depend on the clock,
//! a solve is therefore reproducible regardless of thread timing.
//!
//! ## Usage
//!
//! ```rust
//! use slideshow_model::catalog::PhotoCatalogBuilder;
//! use slideshow_model::photo::Orientation;
//! use slideshow_solver::config::SolverConfig;
//! use slideshow_solver::solver::Solver;
//!
//! let catalog = PhotoCatalogBuilder::new()
//!     .photo(Orientation::Horizontal, ["a", "b"])
//!     .photo(Orientation::Horizontal, ["b", "c"])
//!     .build();
//! let solver = Solver::new(SolverConfig::new().with_workers(2)).unwrap();
//! let slides = solver.generate_slides(&catalog);
//! let outcome = solver.solve_slides(&catalog, &slides).unwrap();
//! assert_eq!(outcome.score(), 1);
//! ```

use crate::config::{ConfigError, SolverConfig};
use slideshow_ls::{construction::StartStrategy, portfolio::LocalSearchPortfolioSolver};
use slideshow_model::{
    catalog::PhotoCatalog, generator::SlideGenerator, sequence::Sequence, slide::SlideSet,
};
use slideshow_search::{
    incumbent::SharedIncumbent,
    monitor::{
        composite::CompositeMonitor, interrupt::InterruptMonitor,
        iteration_limit::IterationLimitMonitor, log::LogMonitor, stagnation::StagnationMonitor,
        time_limit::TimeLimitMonitor,
    },
    portfolio::{PortfolioSolver, PortfolioSolverContext, PortfolioSolverResult},
    result::{SolverOutcome, TerminationReason},
    stats::SolverStatisticsBuilder,
};
use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Instant,
};

#[derive(Debug)]
pub struct Solver {
    config: SolverConfig,
    /// Shared flag to signal all workers to stop.
    stop_signal: AtomicBool,
}

impl Solver {
    /// Creates a solver after validating `config`.
    pub fn new(config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            stop_signal: AtomicBool::new(false),
        })
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Asks every running worker to stop at its next iteration.
    #[inline]
    pub fn interrupt(&self) {
        self.stop_signal.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_interrupted(&self) -> bool {
        self.stop_signal.load(Ordering::Relaxed)
    }

    /// Builds the candidate slides of `catalog` with the configured pairing.
    pub fn generate_slides(&self, catalog: &PhotoCatalog) -> SlideSet {
        SlideGenerator::new(self.config.pairing()).generate(catalog)
    }

    /// Searches for the best sequence over `slides`.
    ///
    /// Fails before any search if `slides` does not fit `catalog` or the fixed
    /// start slide does not exist.
    pub fn solve_slides(
        &self,
        catalog: &PhotoCatalog,
        slides: &SlideSet,
    ) -> Result<SolverOutcome, ConfigError> {
        slides.validate(catalog)?;
        if let StartStrategy::Fixed(slide) = self.config.start() {
            if slide.get() >= slides.len() && !slides.is_empty() {
                return Err(ConfigError::StartOutOfRange {
                    slide,
                    num_slides: slides.len(),
                });
            }
        }
        let time_limit = self.config.time_limit()?;

        tracing::info!(
            photos = catalog.len(),
            slides = slides.len(),
            composites = slides.num_composite(),
            workers = self.config.workers(),
            seed = self.config.seed(),
            "starting solve"
        );

        let start_time = Instant::now();
        self.stop_signal.store(false, Ordering::Relaxed);
        let incumbent = SharedIncumbent::new();

        let results = self.run_workers(slides, &incumbent, start_time.checked_add(time_limit));
        let outcome = self.construct_outcome(start_time, &incumbent, results);

        tracing::info!(
            score = outcome.score(),
            slides = outcome.sequence().len(),
            reason = %outcome.reason(),
            elapsed = format_args!("{:.3}s", outcome.statistics().solve_duration.as_secs_f64()),
            "solve finished"
        );
        Ok(outcome)
    }

    /// Spawns one scoped thread per worker and collects results in worker order.
    fn run_workers(
        &self,
        slides: &SlideSet,
        incumbent: &SharedIncumbent,
        deadline: Option<Instant>,
    ) -> Vec<PortfolioSolverResult> {
        let config = &self.config;
        let stop_signal = &self.stop_signal;

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..config.workers())
                .map(|worker| {
                    scope.spawn(move || {
                        let mut monitor = CompositeMonitor::with_capacity(5);
                        monitor.add_monitor(InterruptMonitor::new(stop_signal));
                        if let Some(deadline) = deadline {
                            monitor.add_monitor(
                                TimeLimitMonitor::until(deadline).with_stop_signal(stop_signal),
                            );
                        }
                        if let Some(limit) = config.iteration_limit() {
                            monitor.add_monitor(IterationLimitMonitor::new(limit));
                        }
                        monitor.add_monitor(StagnationMonitor::new(config.stagnation_limit()));
                        if let Some(interval) = config.log_interval() {
                            monitor.add_monitor(
                                LogMonitor::new(interval, LOG_CLOCK_CHECK_MASK)
                                    .with_label(format!("worker-{worker}")),
                            );
                        }

                        let seed = config.seed().wrapping_add(worker as u64);
                        let mut solver = LocalSearchPortfolioSolver::new(seed)
                            .with_start(config.start())
                            .with_metaheuristic(config.metaheuristic());

                        tracing::trace!(worker, seed, monitors = %monitor, "worker started");
                        let ctx = PortfolioSolverContext::new(slides, incumbent, &mut monitor)
                            .with_deadline(deadline)
                            .with_stop_signal(stop_signal);
                        let result = solver.solve(ctx);
                        tracing::trace!(
                            worker,
                            score = result.sequence().score(),
                            reason = %result.termination_reason(),
                            "worker finished"
                        );
                        result
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        })
    }

    fn construct_outcome(
        &self,
        start_time: Instant,
        incumbent: &SharedIncumbent,
        results: Vec<PortfolioSolverResult>,
    ) -> SolverOutcome {
        let total_iterations = results.iter().map(|r| r.statistics().iterations).sum();
        let used_threads = results.len();

        // Strict comparison keeps the lowest worker index among equal scores.
        let mut best: Option<(usize, PortfolioSolverResult)> = None;
        for (worker, result) in results.into_iter().enumerate() {
            let better = best
                .as_ref()
                .is_none_or(|(_, b)| result.sequence().score() > b.sequence().score());
            if better {
                best = Some((worker, result));
            }
        }

        debug_assert_eq!(
            best.as_ref().map(|(_, r)| r.sequence().score()),
            incumbent.best_score(),
            "best worker result and shared incumbent disagree"
        );

        let confidence = best
            .as_ref()
            .map_or(0.0, |(_, r)| r.statistics().confidence(self.config.confidence_budget()));

        let statistics = SolverStatisticsBuilder::new()
            .incumbent_updates(incumbent.num_installs())
            .used_threads(used_threads)
            .total_iterations(total_iterations)
            .confidence(confidence)
            .solve_duration(start_time.elapsed())
            .build();

        match best {
            Some((worker, result)) => {
                let (sequence, reason, _) = result.into_parts();
                SolverOutcome::new(sequence, reason, statistics, Some(worker))
            }
            None => SolverOutcome::new(
                Sequence::empty(),
                TerminationReason::LocalOptimum,
                statistics,
                None,
            ),
        }
    }
}

/// Progress rows check the clock every 4096 iterations.
const LOG_CLOCK_CHECK_MASK: u64 = TimeLimitMonitor::DEFAULT_STEP_CLOCK_CHECK_MASK;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use slideshow_ls::meta::MetaheuristicKind;
    use slideshow_model::{
        catalog::PhotoCatalogBuilder,
        generator::PairingStrategy,
        index::{PhotoIndex, SlideIndex},
        photo::Orientation,
        report::SolutionReport,
        sequence,
    };
    use std::{collections::HashSet, time::Duration};

    fn quick_config() -> SolverConfig {
        SolverConfig::new().with_time_limit(Duration::from_secs(30))
    }

    fn solve(catalog: &PhotoCatalog, config: SolverConfig) -> (SlideSet, SolverOutcome) {
        let solver = Solver::new(config).unwrap();
        let slides = solver.generate_slides(catalog);
        let outcome = solver.solve_slides(catalog, &slides).unwrap();
        (slides, outcome)
    }

    fn assert_photo_disjoint(outcome: &SolverOutcome, slides: &SlideSet) {
        let mut seen = HashSet::new();
        for &s in outcome.sequence().slides() {
            for &p in slides.slide(s).photos() {
                assert!(seen.insert(p), "photo {p} used twice");
            }
        }
    }

    #[test]
    fn test_rejects_invalid_config_up_front() {
        let err = Solver::new(SolverConfig::new().with_workers(0)).unwrap_err();
        assert_eq!(err, ConfigError::ZeroWorkers);
    }

    #[test]
    fn test_empty_catalog_yields_empty_sequence() {
        let catalog = PhotoCatalogBuilder::new().build();
        let (_, outcome) = solve(&catalog, quick_config().with_workers(3));
        assert!(outcome.sequence().is_empty());
        assert_eq!(outcome.score(), 0);
        assert_eq!(outcome.statistics().used_threads, 3);
    }

    #[test]
    fn test_two_overlapping_photos_score_zero() {
        let catalog = PhotoCatalogBuilder::new()
            .photo(Orientation::Horizontal, ["cat"])
            .photo(Orientation::Horizontal, ["cat", "dog"])
            .build();
        let (_, outcome) = solve(&catalog, quick_config());
        assert_eq!(outcome.sequence().len(), 2);
        assert_eq!(outcome.score(), 0);
    }

    #[test]
    fn test_chain_of_three_scores_two() {
        let catalog = PhotoCatalogBuilder::new()
            .photo(Orientation::Horizontal, ["a", "b"])
            .photo(Orientation::Horizontal, ["b", "c"])
            .photo(Orientation::Horizontal, ["c", "d"])
            .build();
        let (slides, outcome) = solve(&catalog, quick_config().with_workers(2));
        assert_eq!(outcome.score(), 2);
        assert_eq!(outcome.sequence().len(), 3);
        assert!(outcome.reason().is_local_optimum());
        assert_eq!(SolutionReport::new(outcome.sequence(), &slides).total_score(), 2);
    }

    #[test]
    fn test_two_verticals_form_one_slide() {
        let catalog = PhotoCatalogBuilder::new()
            .photo(Orientation::Vertical, ["x"])
            .photo(Orientation::Vertical, ["y"])
            .build();
        let (slides, outcome) = solve(&catalog, quick_config());
        assert_eq!(outcome.sequence().len(), 1);
        assert_eq!(outcome.score(), 0);

        let report = SolutionReport::new(outcome.sequence(), &slides);
        assert_eq!(report.render(), "1\n0 1\n");
    }

    #[test]
    fn test_five_verticals_leave_one_unpaired() {
        let mut builder = PhotoCatalogBuilder::new();
        for tags in [["a", "b"], ["b", "c"], ["c", "d"], ["d", "e"], ["e", "f"]] {
            builder.add_photo(Orientation::Vertical, tags);
        }
        let catalog = builder.build();
        let (slides, outcome) = solve(&catalog, quick_config());

        assert_eq!(outcome.sequence().len(), 2);
        assert_photo_disjoint(&outcome, &slides);
        let used: usize = outcome
            .sequence()
            .slides()
            .iter()
            .map(|&s| slides.slide(s).photos().len())
            .sum();
        assert_eq!(used, 4);
    }

    #[test]
    fn test_same_seed_same_result_across_runs() {
        let mut builder = PhotoCatalogBuilder::new();
        for i in 0..40usize {
            let orientation = if i % 3 == 0 {
                Orientation::Vertical
            } else {
                Orientation::Horizontal
            };
            builder.add_photo(
                orientation,
                [format!("t{}", i % 7), format!("t{}", i % 5 + 7), format!("t{}", i % 11)],
            );
        }
        let catalog = builder.build();
        let config = quick_config().with_workers(4).with_seed(17);

        let (_, a) = solve(&catalog, config.clone());
        let (_, b) = solve(&catalog, config);
        assert_eq!(a.sequence(), b.sequence());
        assert_eq!(a.worker(), b.worker());
    }

    #[test]
    fn test_iteration_limit_aborts_workers() {
        let catalog = PhotoCatalogBuilder::new()
            .photo(Orientation::Horizontal, ["a"])
            .photo(Orientation::Horizontal, ["b"])
            .photo(Orientation::Horizontal, ["c"])
            .build();
        let config = quick_config()
            .with_metaheuristic(MetaheuristicKind::PlateauAscent)
            .with_iteration_limit(100);
        let (_, outcome) = solve(&catalog, config);

        assert!(matches!(outcome.reason(), TerminationReason::Aborted(_)));
        assert_eq!(outcome.statistics().total_iterations, 100);
        assert_eq!(outcome.statistics().confidence, 1.0);
    }

    #[test]
    fn test_rejects_slides_from_another_catalog() {
        let big = PhotoCatalogBuilder::new()
            .photo(Orientation::Horizontal, ["a"])
            .photo(Orientation::Horizontal, ["b"])
            .build();
        let small = PhotoCatalogBuilder::new()
            .photo(Orientation::Horizontal, ["a"])
            .build();
        let solver = Solver::new(quick_config()).unwrap();
        let slides = solver.generate_slides(&big);

        let err = solver.solve_slides(&small, &slides).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSlides(slideshow_model::slide::SlideError::UnknownPhoto {
                photo,
                ..
            }) if photo == PhotoIndex::new(1)
        ));
    }

    #[test]
    fn test_rejects_fixed_start_out_of_range() {
        let catalog = PhotoCatalogBuilder::new()
            .photo(Orientation::Horizontal, ["a"])
            .build();
        let solver =
            Solver::new(quick_config().with_start(StartStrategy::Fixed(SlideIndex::new(4)))).unwrap();
        let slides = solver.generate_slides(&catalog);
        assert_eq!(
            solver.solve_slides(&catalog, &slides).unwrap_err(),
            ConfigError::StartOutOfRange {
                slide: SlideIndex::new(4),
                num_slides: 1
            }
        );
    }

    #[test]
    fn test_pre_raised_interrupt_is_cleared_on_solve() {
        let catalog = PhotoCatalogBuilder::new()
            .photo(Orientation::Horizontal, ["a", "b"])
            .photo(Orientation::Horizontal, ["b", "c"])
            .build();
        let solver = Solver::new(quick_config()).unwrap();
        solver.interrupt();
        assert!(solver.is_interrupted());

        let slides = solver.generate_slides(&catalog);
        let outcome = solver.solve_slides(&catalog, &slides).unwrap();
        assert!(outcome.reason().is_local_optimum());
        assert!(!solver.is_interrupted());
    }

    fn assert_stopped_by_budget(outcome: &SolverOutcome) {
        match outcome.reason() {
            TerminationReason::Aborted(msg) => assert!(
                msg.contains("time limit") || msg.contains("Interrupt"),
                "unexpected abort reason: {msg}"
            ),
            other => panic!("expected Aborted, got {other:?}"),
        }
    }

    #[test]
    fn test_time_limit_stops_all_workers_together() {
        // Every transition scores 0, so plateau moves never run out.
        let mut builder = PhotoCatalogBuilder::new();
        for i in 0..12 {
            builder.add_photo(Orientation::Horizontal, [format!("t{i}")]);
        }
        let catalog = builder.build();
        let budget = Duration::from_millis(300);
        let config = SolverConfig::new()
            .with_time_limit(budget)
            .with_stagnation_limit(u64::MAX)
            .with_metaheuristic(MetaheuristicKind::PlateauAscent)
            .with_workers(3);

        let solver = Solver::new(config).unwrap();
        let slides = solver.generate_slides(&catalog);
        let outcome = solver.solve_slides(&catalog, &slides).unwrap();

        assert_stopped_by_budget(&outcome);
        assert!(solver.is_interrupted());
        let elapsed = outcome.statistics().solve_duration;
        assert!(elapsed >= budget, "stopped early after {elapsed:?}");
        assert!(elapsed < budget + Duration::from_secs(3), "overran: {elapsed:?}");
        assert_eq!(outcome.statistics().used_threads, 3);
        assert!(outcome.statistics().total_iterations > 0);
        assert_photo_disjoint(&outcome, &slides);
    }

    #[test]
    fn test_slow_construction_respects_time_limit() {
        // Dense tags: each of the 500 tags is shared by 400 photos.
        let photos = 20_000;
        let mut builder = PhotoCatalogBuilder::with_capacity(photos);
        for i in 0..photos {
            builder.add_photo(
                Orientation::Horizontal,
                (0..10).map(|k| format!("t{}", (i + k * 53) % 500)),
            );
        }
        let catalog = builder.build();
        let budget = Duration::from_millis(500);
        let config = SolverConfig::new().with_time_limit(budget).with_workers(2);

        let solver = Solver::new(config).unwrap();
        let slides = solver.generate_slides(&catalog);
        let outcome = solver.solve_slides(&catalog, &slides).unwrap();

        assert_stopped_by_budget(&outcome);
        let elapsed = outcome.statistics().solve_duration;
        assert!(elapsed < budget + Duration::from_secs(4), "overran: {elapsed:?}");
        // Construction still places every slide.
        assert_eq!(outcome.sequence().len(), photos);
        assert_photo_disjoint(&outcome, &slides);
    }

    fn arb_catalog() -> impl Strategy<Value = PhotoCatalog> {
        let photo = (any::<bool>(), proptest::collection::vec(0u8..10, 1..5));
        proptest::collection::vec(photo, 0..24).prop_map(|photos| {
            let mut builder = PhotoCatalogBuilder::new();
            for (vertical, tags) in photos {
                let orientation = if vertical {
                    Orientation::Vertical
                } else {
                    Orientation::Horizontal
                };
                builder.add_photo(orientation, tags.iter().map(|t| format!("t{t}")));
            }
            builder.build()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_solutions_are_feasible_and_scored(
            catalog in arb_catalog(),
            exhaustive in any::<bool>(),
            seed in any::<u64>(),
        ) {
            let pairing = if exhaustive {
                PairingStrategy::Exhaustive
            } else {
                PairingStrategy::Windowed { window: 3 }
            };
            let config = quick_config()
                .with_pairing(pairing)
                .with_seed(seed)
                .with_workers(2)
                .with_stagnation_limit(2_000);
            let (slides, outcome) = solve(&catalog, config);

            prop_assert!(outcome.sequence().validate(&slides).is_ok());
            prop_assert_eq!(outcome.score(), sequence::score_of(outcome.sequence().slides(), &slides));
            prop_assert_eq!(outcome.sequence().is_empty(), slides.is_empty());
        }
    }
}
