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
    construction::{ConstructionBudget, GreedyConstruction, StartStrategy},
    engine::LocalSearchEngine,
    meta::MetaheuristicKind,
    operator,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use slideshow_search::portfolio::{PortfolioSolver, PortfolioSolverContext, PortfolioSolverResult};

/// One worker of a multi-start solve: construction plus local search with its
/// own seeded RNG.
///
/// The worker proposes its best sequence to the shared incumbent once its run
/// has ended.
#[derive(Debug, Clone)]
pub struct LocalSearchPortfolioSolver {
    engine: LocalSearchEngine,
    seed: u64,
    construction: GreedyConstruction,
    metaheuristic: MetaheuristicKind,
}

impl LocalSearchPortfolioSolver {
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self {
            engine: LocalSearchEngine::new(),
            seed,
            construction: GreedyConstruction::default(),
            metaheuristic: MetaheuristicKind::default(),
        }
    }

    #[inline]
    pub fn with_start(mut self, start: StartStrategy) -> Self {
        self.construction = GreedyConstruction::new(start);
        self
    }

    #[inline]
    pub fn with_metaheuristic(mut self, metaheuristic: MetaheuristicKind) -> Self {
        self.metaheuristic = metaheuristic;
        self
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn engine(&self) -> &LocalSearchEngine {
        &self.engine
    }
}

impl PortfolioSolver for LocalSearchPortfolioSolver {
    fn name(&self) -> &str {
        "LocalSearchPortfolioSolver"
    }

    fn solve(&mut self, context: PortfolioSolverContext<'_>) -> PortfolioSolverResult {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut operator = operator::default_operator(context.slides);
        let mut metaheuristic = self.metaheuristic.build();

        let mut budget = ConstructionBudget::unlimited();
        if let Some(deadline) = context.deadline {
            budget = budget.with_deadline(deadline);
        }
        if let Some(stop_signal) = context.stop_signal {
            budget = budget.with_stop_signal(stop_signal);
        }

        let outcome = self.engine.run_within(
            context.slides,
            &self.construction,
            &budget,
            &mut operator,
            &mut metaheuristic,
            context.monitor,
            &mut rng,
        );

        if context.incumbent.try_install(outcome.sequence()) {
            tracing::trace!(
                seed = self.seed,
                score = outcome.sequence().score(),
                "installed new incumbent"
            );
        }

        let (sequence, reason, statistics) = outcome.into_parts();
        PortfolioSolverResult::new(sequence, reason, statistics)
    }
}
