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

//! The insert operator.
//!
//! Inserts an unused, photo-compatible slide at any position of the sequence,
//! including both ends. Slides rotate from a random offset; positions scan
//! `0..=len`. Slides that are not admissible are skipped without producing a
//! move.

use crate::{
    operator::{LocalSearchOperator, RotatingCursor},
    state::{Move, SearchState},
};
use rand::RngCore;
use slideshow_model::{index::SlideIndex, slide::SlideSet};

#[derive(Debug, Clone, Default)]
pub struct InsertOperator {
    slide: RotatingCursor,
    position: usize,
    len: usize,
}

impl InsertOperator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalSearchOperator for InsertOperator {
    fn name(&self) -> &str {
        "InsertOperator"
    }

    fn prepare(&mut self, state: &SearchState, slides: &SlideSet, rng: &mut dyn RngCore) {
        self.len = state.len();
        self.slide.prepare(slides.len(), rng);
        self.position = 0;
    }

    fn next_neighbor(&mut self, state: &SearchState, slides: &SlideSet) -> Option<Move> {
        while let Some(raw) = self.slide.current() {
            let slide = SlideIndex::new(raw);
            if self.position <= self.len && state.is_admissible(slide, slides) {
                let position = self.position;
                self.position += 1;
                return Some(Move::Insert { slide, position });
            }
            self.slide.advance();
            self.position = 0;
        }
        None
    }

    fn reset(&mut self) {
        self.slide.rewind();
        self.position = 0;
    }
}
