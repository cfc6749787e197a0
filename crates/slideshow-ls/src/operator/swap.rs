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

//! The swap operator.
//!
//! Exchanges the slides at two positions `i < j`. The first position rotates
//! from a random offset; the second scans `i + 1..len`.

use crate::{
    operator::{LocalSearchOperator, RotatingCursor},
    state::{Move, SearchState},
};
use rand::RngCore;
use slideshow_model::slide::SlideSet;

#[derive(Debug, Clone, Default)]
pub struct SwapOperator {
    first: RotatingCursor,
    second: usize,
    len: usize,
}

impl SwapOperator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalSearchOperator for SwapOperator {
    fn name(&self) -> &str {
        "SwapOperator"
    }

    fn prepare(&mut self, state: &SearchState, _slides: &SlideSet, rng: &mut dyn RngCore) {
        self.len = state.len();
        self.first.prepare(self.len, rng);
        self.second = 0;
    }

    fn next_neighbor(&mut self, _state: &SearchState, _slides: &SlideSet) -> Option<Move> {
        while let Some(first) = self.first.current() {
            let second = (first + 1).max(self.second);
            if second < self.len {
                self.second = second + 1;
                return Some(Move::Swap { first, second });
            }
            self.first.advance();
            self.second = 0;
        }
        None
    }

    fn reset(&mut self) {
        self.first.rewind();
        self.second = 0;
    }
}
