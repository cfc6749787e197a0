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

//! Metaheuristic interface for local search control.
//!
//! Separates move generation from acceptance policy and termination logic.
//! Scores are plain values: the engine evaluates moves incrementally and only
//! hands the metaheuristic the resulting numbers, which keeps the hot path free
//! of sequence clones.

use slideshow_model::{score::Score, sequence::Sequence};
use slideshow_search::monitor::search_monitor::SearchCommand;

/// A trait governing the acceptance logic and termination of the local search.
pub trait Metaheuristic: Send {
    /// Returns the name of the metaheuristic.
    fn name(&self) -> &str;

    /// Called once the constructed sequence is available.
    fn on_start(&mut self, initial: &Sequence);

    /// Determines if the search should proceed to the next iteration.
    fn search_command(&mut self, iteration: u64, best_score: Score) -> SearchCommand;

    /// Decides whether to move from `current` to a neighbor scoring `candidate`.
    ///
    /// `best` is the best score of the run, for aspiration-style rules.
    fn should_accept(&mut self, current: Score, candidate: Score, best: Score) -> bool;

    /// Called when a move is accepted.
    fn on_accept(&mut self, new_current: Score);

    /// Called when a move is rejected.
    fn on_reject(&mut self, rejected: Score);

    /// Called when a new best sequence is found.
    fn on_new_best(&mut self, new_best: &Sequence);
}

impl std::fmt::Debug for dyn Metaheuristic + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Metaheuristic {{ name: {} }}", self.name())
    }
}

impl std::fmt::Display for dyn Metaheuristic + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Metaheuristic: {}", self.name())
    }
}

impl<M> Metaheuristic for Box<M>
where
    M: Metaheuristic + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_start(&mut self, initial: &Sequence) {
        (**self).on_start(initial)
    }

    fn search_command(&mut self, iteration: u64, best_score: Score) -> SearchCommand {
        (**self).search_command(iteration, best_score)
    }

    fn should_accept(&mut self, current: Score, candidate: Score, best: Score) -> bool {
        (**self).should_accept(current, candidate, best)
    }

    fn on_accept(&mut self, new_current: Score) {
        (**self).on_accept(new_current)
    }

    fn on_reject(&mut self, rejected: Score) {
        (**self).on_reject(rejected)
    }

    fn on_new_best(&mut self, new_best: &Sequence) {
        (**self).on_new_best(new_best)
    }
}
