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

//! The reverse operator (2-opt).
//!
//! Reverses a segment `start..=end` of at least three slides. Transitions are
//! symmetric, so only the two boundary adjacencies change; two-slide segments
//! are left to the swap operator.

use crate::{
    operator::{LocalSearchOperator, RotatingCursor},
    state::{Move, SearchState},
};
use rand::RngCore;
use slideshow_model::slide::SlideSet;

#[derive(Debug, Clone, Default)]
pub struct ReverseOperator {
    start: RotatingCursor,
    end: usize,
    len: usize,
}

impl ReverseOperator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalSearchOperator for ReverseOperator {
    fn name(&self) -> &str {
        "ReverseOperator"
    }

    fn prepare(&mut self, state: &SearchState, _slides: &SlideSet, rng: &mut dyn RngCore) {
        self.len = state.len();
        self.start.prepare(self.len, rng);
        self.end = 0;
    }

    fn next_neighbor(&mut self, _state: &SearchState, _slides: &SlideSet) -> Option<Move> {
        while let Some(start) = self.start.current() {
            let end = (start + 2).max(self.end);
            if end < self.len {
                self.end = end + 1;
                return Some(Move::Reverse { start, end });
            }
            self.start.advance();
            self.end = 0;
        }
        None
    }

    fn reset(&mut self) {
        self.start.rewind();
        self.end = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::test_support::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_segments_span_at_least_three_slides() {
        let slides = horizontal(5);
        let state = state_of(&slides, &[0, 1, 2, 3, 4]);
        let mut op = ReverseOperator::new();
        op.prepare(&state, &slides, &mut ChaCha8Rng::seed_from_u64(6));

        let moves = drain(&mut op, &state, &slides);
        // (0,2) (0,3) (0,4) (1,3) (1,4) (2,4)
        assert_eq!(moves.len(), 6);
        assert!(moves.iter().all(|m| matches!(m, Move::Reverse { start, end } if end - start >= 2)));
    }

    #[test]
    fn test_reversal_of_chain_end_keeps_score_feasible() {
        let slides = horizontal(4);
        let state = state_of(&slides, &[2, 1, 0, 3]);
        let mv = Move::Reverse { start: 0, end: 2 };
        let delta = state.evaluate(&mv, &slides).unwrap();
        let mut next = state.clone();
        next.apply(&mv, &slides, delta);
        assert_eq!(next.score(), 3);
    }
}
