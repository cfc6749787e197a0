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

//! The relocate operator.
//!
//! Moves the slide at `from` so that it ends up at `to`, preserving the
//! relative order of all other slides.

use crate::{
    operator::{LocalSearchOperator, RotatingCursor},
    state::{Move, SearchState},
};
use rand::RngCore;
use slideshow_model::slide::SlideSet;

#[derive(Debug, Clone, Default)]
pub struct RelocateOperator {
    from: RotatingCursor,
    to: usize,
    len: usize,
}

impl RelocateOperator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalSearchOperator for RelocateOperator {
    fn name(&self) -> &str {
        "RelocateOperator"
    }

    fn prepare(&mut self, state: &SearchState, _slides: &SlideSet, rng: &mut dyn RngCore) {
        self.len = state.len();
        self.from.prepare(self.len, rng);
        self.to = 0;
    }

    fn next_neighbor(&mut self, _state: &SearchState, _slides: &SlideSet) -> Option<Move> {
        while let Some(from) = self.from.current() {
            // Moving by one position is an adjacent swap.
            while self.to < self.len && self.to.abs_diff(from) <= 1 {
                self.to += 1;
            }
            if self.to < self.len {
                let to = self.to;
                self.to += 1;
                return Some(Move::Relocate { from, to });
            }
            self.from.advance();
            self.to = 0;
        }
        None
    }

    fn reset(&mut self) {
        self.from.rewind();
        self.to = 0;
    }
}
