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

//! The remove operator: drops a single slide from the sequence.

use crate::{
    operator::{LocalSearchOperator, RotatingCursor},
    state::{Move, SearchState},
};
use rand::RngCore;
use slideshow_model::slide::SlideSet;

#[derive(Debug, Clone, Default)]
pub struct RemoveOperator {
    position: RotatingCursor,
}

impl RemoveOperator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalSearchOperator for RemoveOperator {
    fn name(&self) -> &str {
        "RemoveOperator"
    }

    fn prepare(&mut self, state: &SearchState, _slides: &SlideSet, rng: &mut dyn RngCore) {
        self.position.prepare(state.len(), rng);
    }

    fn next_neighbor(&mut self, _state: &SearchState, _slides: &SlideSet) -> Option<Move> {
        let position = self.position.current()?;
        self.position.advance();
        Some(Move::Remove { position })
    }

    fn reset(&mut self) {
        self.position.rewind();
    }
}
