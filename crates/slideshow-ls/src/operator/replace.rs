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

//! The replace operator.
//!
//! Puts an unused slide in place of the slide at some position. Candidates
//! share at least one photo with the slide they replace, and every other photo
//! of theirs is free; a candidate with all photos free is an insertion and is
//! covered by the insert operator. With windowed pairing no two slides share a
//! photo, so this neighborhood is only populated for exhaustive pairing.

use crate::{
    operator::{LocalSearchOperator, RotatingCursor},
    state::{Move, SearchState},
};
use rand::RngCore;
use slideshow_model::{index::SlideIndex, slide::SlideSet};

#[derive(Debug, Clone)]
pub struct ReplaceOperator {
    /// Photo -> slides containing it.
    by_photo: Vec<Vec<SlideIndex>>,
    position: RotatingCursor,
    /// Candidates for the current position, filled on first visit.
    candidates: Vec<SlideIndex>,
    candidate: usize,
    loaded: bool,
}

impl ReplaceOperator {
    pub fn new(slides: &SlideSet) -> Self {
        let mut by_photo = vec![Vec::new(); slides.num_photos()];
        for slide in slides {
            for photo in slide.photos() {
                by_photo[photo.get()].push(slide.index());
            }
        }
        Self {
            by_photo,
            position: RotatingCursor::default(),
            candidates: Vec::new(),
            candidate: 0,
            loaded: false,
        }
    }

    fn load(&mut self, state: &SearchState, slides: &SlideSet, position: usize) {
        self.candidates.clear();
        self.candidate = 0;
        self.loaded = true;

        let current = state.sequence()[position];
        for photo in slides.slide(current).photos() {
            for &slide in &self.by_photo[photo.get()] {
                if !state.contains(slide) && state.photos_free(slide, slides, Some(current)) {
                    self.candidates.push(slide);
                }
            }
        }
        self.candidates.sort_unstable();
        self.candidates.dedup();
    }
}

impl LocalSearchOperator for ReplaceOperator {
    fn name(&self) -> &str {
        "ReplaceOperator"
    }

    fn prepare(&mut self, state: &SearchState, _slides: &SlideSet, rng: &mut dyn RngCore) {
        self.position.prepare(state.len(), rng);
        self.loaded = false;
    }

    fn next_neighbor(&mut self, state: &SearchState, slides: &SlideSet) -> Option<Move> {
        while let Some(position) = self.position.current() {
            if !self.loaded {
                self.load(state, slides, position);
            }
            if let Some(&slide) = self.candidates.get(self.candidate) {
                self.candidate += 1;
                return Some(Move::Replace { position, slide });
            }
            self.position.advance();
            self.loaded = false;
        }
        None
    }

    fn reset(&mut self) {
        self.position.rewind();
        self.loaded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::test_support::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use slideshow_model::{
        catalog::PhotoCatalogBuilder, generator::SlideGenerator, photo::Orientation,
    };

    fn si(i: usize) -> SlideIndex {
        SlideIndex::new(i)
    }

    #[test]
    fn test_no_candidates_for_disjoint_slides() {
        let slides = horizontal(3);
        let state = state_of(&slides, &[0, 1]);
        let mut op = ReplaceOperator::new(&slides);
        op.prepare(&state, &slides, &mut ChaCha8Rng::seed_from_u64(0));
        assert_eq!(op.next_neighbor(&state, &slides), None);
    }

    #[test]
    fn test_candidates_share_a_photo_and_are_feasible() {
        // Exhaustive over verticals 0..4: 0={0,1} 1={0,2} 2={0,3} 3={1,2} 4={1,3} 5={2,3}.
        let mut builder = PhotoCatalogBuilder::new();
        for tag in ["a", "b", "c", "d"] {
            builder.add_photo(Orientation::Vertical, [tag]);
        }
        let slides = SlideGenerator::exhaustive().generate(&builder.build());
        let state = state_of(&slides, &[0]);

        let mut op = ReplaceOperator::new(&slides);
        op.prepare(&state, &slides, &mut ChaCha8Rng::seed_from_u64(0));
        let moves = drain(&mut op, &state, &slides);

        // Slide 5 shares nothing with slide 0, so it is an insertion instead.
        let replaced: Vec<_> = moves
            .iter()
            .map(|m| match *m {
                Move::Replace { position: 0, slide } => slide,
                other => panic!("unexpected move {other}"),
            })
            .collect();
        assert_eq!(replaced, vec![si(1), si(2), si(3), si(4)]);
        assert!(moves.iter().all(|m| state.evaluate(m, &slides).is_some()));
    }

    #[test]
    fn test_candidates_respect_photos_used_elsewhere() {
        let mut builder = PhotoCatalogBuilder::new();
        for tag in ["a", "b", "c", "d"] {
            builder.add_photo(Orientation::Vertical, [tag]);
        }
        let slides = SlideGenerator::exhaustive().generate(&builder.build());
        // 0={0,1} and 5={2,3} use every photo.
        let state = state_of(&slides, &[0, 5]);

        let mut op = ReplaceOperator::new(&slides);
        op.prepare(&state, &slides, &mut ChaCha8Rng::seed_from_u64(0));
        assert_eq!(drain(&mut op, &state, &slides), Vec::new());
    }
}
