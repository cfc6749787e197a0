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

//! Neighborhood operators.
//!
//! An operator enumerates candidate moves around the current `SearchState`.
//! The engine calls `prepare` whenever the state changes (after an accepted
//! move) and then pulls moves with `next_neighbor` until one is accepted or
//! the operator is exhausted. Every operator visits its neighborhood
//! exhaustively in a fixed order; only the starting offset is drawn from the
//! RNG, so a run is reproducible for a given seed.

pub mod insert;
pub mod relocate;
pub mod remove;
pub mod replace;
pub mod reverse;
pub mod swap;

use crate::state::{Move, SearchState};
use rand::{Rng, RngCore};
use slideshow_model::slide::SlideSet;

pub trait LocalSearchOperator {
    /// Returns the name of the operator for logging and identification purposes.
    fn name(&self) -> &str;

    /// Prepares the operator to explore the neighborhood of `state`.
    ///
    /// Must rewind the cursor; the RNG picks where the scan starts.
    fn prepare(&mut self, state: &SearchState, slides: &SlideSet, rng: &mut dyn RngCore);

    /// Returns the next move of the neighborhood, or `None` once it is exhausted.
    ///
    /// The state is the one passed to the last `prepare`. Returned moves may
    /// still be rejected by `SearchState::evaluate` as infeasible.
    fn next_neighbor(&mut self, state: &SearchState, slides: &SlideSet) -> Option<Move>;

    /// Moves the cursor back to the first neighbor without re-analysing the state.
    fn reset(&mut self);
}

impl std::fmt::Debug for dyn LocalSearchOperator + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocalSearchOperator {{ name: {} }}", self.name())
    }
}

impl std::fmt::Display for dyn LocalSearchOperator + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Visits `0..len` exactly once, starting at a random offset and wrapping around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RotatingCursor {
    len: usize,
    offset: usize,
    step: usize,
}

impl RotatingCursor {
    #[inline]
    pub(crate) fn prepare(&mut self, len: usize, rng: &mut dyn RngCore) {
        self.len = len;
        self.offset = if len > 0 { rng.random_range(0..len) } else { 0 };
        self.step = 0;
    }

    #[inline]
    pub(crate) fn current(&self) -> Option<usize> {
        (self.step < self.len).then(|| (self.offset + self.step) % self.len)
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        self.step += 1;
    }

    #[inline]
    pub(crate) fn rewind(&mut self) {
        self.step = 0;
    }
}

/// A compound operator that iterates through sub-operators in a fixed sequential order.
///
/// It starts with the first sub-operator and lets it run until it is exhausted,
/// then switches to the next one. It is exhausted only when **all** sub-operators
/// are exhausted for the current state.
#[derive(Debug)]
pub struct RoundRobinCompoundOperator {
    operators: Vec<Box<dyn LocalSearchOperator>>,
    current_index: usize,
}

impl RoundRobinCompoundOperator {
    pub fn new(operators: Vec<Box<dyn LocalSearchOperator>>) -> Self {
        Self {
            operators,
            current_index: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.operators.iter().map(|op| op.name()).collect()
    }
}

impl LocalSearchOperator for RoundRobinCompoundOperator {
    fn name(&self) -> &str {
        "RoundRobinCompoundOperator"
    }

    fn prepare(&mut self, state: &SearchState, slides: &SlideSet, rng: &mut dyn RngCore) {
        self.current_index = 0;
        for op in self.operators.iter_mut() {
            op.prepare(state, slides, rng);
        }
    }

    fn next_neighbor(&mut self, state: &SearchState, slides: &SlideSet) -> Option<Move> {
        while let Some(op) = self.operators.get_mut(self.current_index) {
            if let Some(mv) = op.next_neighbor(state, slides) {
                return Some(mv);
            }
            self.current_index += 1;
        }
        None
    }

    fn reset(&mut self) {
        for op in self.operators.iter_mut() {
            op.reset();
        }
        self.current_index = 0;
    }
}

/// The default neighborhood: insert, replace, swap, relocate, reverse, remove.
pub fn default_operator(slides: &SlideSet) -> RoundRobinCompoundOperator {
    RoundRobinCompoundOperator::new(vec![
        Box::new(insert::InsertOperator::new()),
        Box::new(replace::ReplaceOperator::new(slides)),
        Box::new(swap::SwapOperator::new()),
        Box::new(relocate::RelocateOperator::new()),
        Box::new(reverse::ReverseOperator::new()),
        Box::new(remove::RemoveOperator::new()),
    ])
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rotating_cursor_visits_each_index_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut cursor = RotatingCursor::default();
        cursor.prepare(7, &mut rng);

        let mut seen = Vec::new();
        while let Some(i) = cursor.current() {
            seen.push(i);
            cursor.advance();
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..7).collect::<Vec<_>>());

        cursor.rewind();
        assert!(cursor.current().is_some());
    }

    #[test]
    fn test_rotating_cursor_empty_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut cursor = RotatingCursor::default();
        cursor.prepare(0, &mut rng);
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn test_round_robin_chains_sub_operators_in_order() {
        let slides = horizontal(3);
        let state = state_of(&slides, &[0, 1, 2]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let mut op = RoundRobinCompoundOperator::new(vec![
            Box::new(swap::SwapOperator::new()),
            Box::new(remove::RemoveOperator::new()),
        ]);
        op.prepare(&state, &slides, &mut rng);
        let moves = drain(&mut op, &state, &slides);

        // 3 swaps followed by 3 removals.
        assert_eq!(moves.len(), 6);
        assert!(moves[..3].iter().all(|m| matches!(m, Move::Swap { .. })));
        assert!(moves[3..].iter().all(|m| matches!(m, Move::Remove { .. })));
        assert_eq!(op.next_neighbor(&state, &slides), None);

        op.reset();
        assert_eq!(drain(&mut op, &state, &slides).len(), 6);
    }

    #[test]
    fn test_default_operator_names() {
        let slides = horizontal(2);
        let op = default_operator(&slides);
        assert_eq!(
            op.names(),
            vec![
                "InsertOperator",
                "ReplaceOperator",
                "SwapOperator",
                "RelocateOperator",
                "ReverseOperator",
                "RemoveOperator"
            ]
        );
        let dyn_op: &dyn LocalSearchOperator = &op;
        assert_eq!(dyn_op.to_string(), "RoundRobinCompoundOperator");
    }

    #[test]
    fn test_empty_compound_is_exhausted() {
        let slides = horizontal(2);
        let state = state_of(&slides, &[0, 1]);
        let mut op = RoundRobinCompoundOperator::new(Vec::new());
        assert!(op.is_empty());
        op.prepare(&state, &slides, &mut ChaCha8Rng::seed_from_u64(0));
        assert_eq!(op.next_neighbor(&state, &slides), None);
    }
}
