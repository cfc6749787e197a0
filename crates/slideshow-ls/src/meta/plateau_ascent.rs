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

//! Plateau ascent metaheuristic.
//!
//! Accepts every neighbor that does not fall below the best score of the run.
//! Since nothing below the best is ever accepted, the current score always
//! equals the best score, and the search wanders across equal-score sequences
//! looking for an exit upwards. Such a walk may never run out of neighbors, so
//! it relies on the stagnation, iteration or time limit to stop.

use crate::meta::metaheuristic::Metaheuristic;
use slideshow_model::{score::Score, sequence::Sequence};
use slideshow_search::monitor::search_monitor::SearchCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlateauAscent {
    sideways_moves: u64,
}

impl PlateauAscent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted moves that left the score unchanged.
    #[inline]
    pub fn sideways_moves(&self) -> u64 {
        self.sideways_moves
    }
}

impl Metaheuristic for PlateauAscent {
    fn name(&self) -> &str {
        "PlateauAscent"
    }

    fn on_start(&mut self, _initial: &Sequence) {
        self.sideways_moves = 0;
    }

    fn search_command(&mut self, _iteration: u64, _best_score: Score) -> SearchCommand {
        SearchCommand::Continue
    }

    fn should_accept(&mut self, current: Score, candidate: Score, best: Score) -> bool {
        debug_assert!(
            current <= best,
            "called `PlateauAscent::should_accept` with current {} above best {}",
            current,
            best
        );
        candidate >= best
    }

    fn on_accept(&mut self, _new_current: Score) {
        self.sideways_moves += 1;
    }

    fn on_reject(&mut self, _rejected: Score) {}

    fn on_new_best(&mut self, _new_best: &Sequence) {
        // The accept that led here was an improvement, not a sideways move.
        self.sideways_moves = self.sideways_moves.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_sideways_and_better_moves() {
        let mut mh = PlateauAscent::new();
        assert!(mh.should_accept(10, 10, 10));
        assert!(mh.should_accept(10, 12, 10));
        assert!(!mh.should_accept(10, 9, 10));
    }

    #[test]
    fn test_counts_sideways_moves_only() {
        let mut mh = PlateauAscent::new();
        mh.on_start(&Sequence::empty());
        mh.on_accept(10);
        mh.on_accept(10);
        mh.on_accept(11);
        mh.on_new_best(&Sequence::empty());
        assert_eq!(mh.sideways_moves(), 2);

        mh.on_start(&Sequence::empty());
        assert_eq!(mh.sideways_moves(), 0);
    }
}
