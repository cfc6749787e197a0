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

//! Greedy ascent (first-improvement) metaheuristic.
//!
//! Moves to the first neighbor that strictly raises the score. The engine
//! commits to a move as soon as it is accepted, so this is a first-improvement
//! hill climber; it terminates naturally when the round-robin operator runs out
//! of neighbors, i.e. at a local optimum of the combined move set.
//!
//! Equal-score moves are rejected, so the search never walks a plateau and
//! needs no cycle detection.

use crate::meta::metaheuristic::Metaheuristic;
use slideshow_model::{score::Score, sequence::Sequence};
use slideshow_search::monitor::search_monitor::SearchCommand;

/// A Greedy Ascent metaheuristic (First Improvement).
///
/// # Attributes
/// * **Acceptance:** Strict improvement (`candidate > current`).
/// * **Termination:** Natural exhaustion (Local Optimum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GreedyAscent;

impl GreedyAscent {
    pub fn new() -> Self {
        Self
    }
}

impl Metaheuristic for GreedyAscent {
    fn name(&self) -> &str {
        "GreedyAscent"
    }

    fn on_start(&mut self, _initial: &Sequence) {}

    fn search_command(&mut self, _iteration: u64, _best_score: Score) -> SearchCommand {
        SearchCommand::Continue
    }

    fn should_accept(&mut self, current: Score, candidate: Score, _best: Score) -> bool {
        candidate > current
    }

    fn on_accept(&mut self, _new_current: Score) {}
    fn on_reject(&mut self, _rejected: Score) {}
    fn on_new_best(&mut self, _new_best: &Sequence) {}
}
