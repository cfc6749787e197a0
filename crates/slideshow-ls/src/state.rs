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

//! Working state of a single search run.
//!
//! `SearchState` owns the current slide order, a membership bit per slide, an
//! in-use bit per photo, and the current score. Moves are evaluated
//! incrementally: only the adjacencies a move touches are rescored, so the
//! cost of `evaluate` is a handful of transition scores regardless of the
//! sequence length. `evaluate` returns `None` for moves that would break
//! photo-disjointness; such moves are never applied.

use fixedbitset::FixedBitSet;
use slideshow_model::{
    index::SlideIndex,
    score::Score,
    sequence::{self, Sequence},
    slide::SlideSet,
};

/// A neighborhood move on the current sequence. Positions index the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Exchange the slides at two positions, `first < second`.
    Swap { first: usize, second: usize },
    /// Insert an unused slide before `position` (`position == len` appends).
    Insert { slide: SlideIndex, position: usize },
    /// Remove the slide at `from` and reinsert it so it ends up at `to`.
    Relocate { from: usize, to: usize },
    /// Reverse the segment `start..=end`, `start < end`.
    Reverse { start: usize, end: usize },
    /// Put an unused slide in place of the slide at `position`.
    Replace { position: usize, slide: SlideIndex },
    /// Drop the slide at `position`.
    Remove { position: usize },
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Move::Swap { first, second } => write!(f, "Swap({first}, {second})"),
            Move::Insert { slide, position } => write!(f, "Insert({} @ {position})", slide.get()),
            Move::Relocate { from, to } => write!(f, "Relocate({from} -> {to})"),
            Move::Reverse { start, end } => write!(f, "Reverse({start}..={end})"),
            Move::Replace { position, slide } => {
                write!(f, "Replace({position} := {})", slide.get())
            }
            Move::Remove { position } => write!(f, "Remove({position})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    sequence: Vec<SlideIndex>,
    in_sequence: FixedBitSet,
    photo_in_use: FixedBitSet,
    score: Score,
}

impl SearchState {
    /// An empty state sized for `slides`.
    pub fn new(slides: &SlideSet) -> Self {
        Self {
            sequence: Vec::new(),
            in_sequence: FixedBitSet::with_capacity(slides.len()),
            photo_in_use: FixedBitSet::with_capacity(slides.num_photos()),
            score: 0,
        }
    }

    /// Rebuilds the working state of a feasible `sequence`.
    pub fn from_sequence(sequence: &Sequence, slides: &SlideSet) -> Self {
        debug_assert!(
            sequence.validate(slides).is_ok(),
            "called `SearchState::from_sequence` with an infeasible sequence"
        );

        let mut state = Self::new(slides);
        for &slide in sequence.slides() {
            state.push(slide, slides);
        }
        state
    }

    #[inline]
    pub fn sequence(&self) -> &[SlideIndex] {
        &self.sequence
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    #[inline]
    pub fn score(&self) -> Score {
        self.score
    }

    #[inline]
    pub fn last(&self) -> Option<SlideIndex> {
        self.sequence.last().copied()
    }

    /// Returns `true` if `slide` is part of the sequence.
    #[inline]
    pub fn contains(&self, slide: SlideIndex) -> bool {
        self.in_sequence.contains(slide.get())
    }

    /// Returns `true` if no photo of `slide` is used by the sequence, ignoring
    /// the photos of `except`.
    #[inline]
    pub fn photos_free(&self, slide: SlideIndex, slides: &SlideSet, except: Option<SlideIndex>) -> bool {
        let except = except.map(|e| slides.slide(e));
        slides.slide(slide).photos().iter().all(|p| {
            !self.photo_in_use.contains(p.get()) || except.is_some_and(|e| e.photos().contains(p))
        })
    }

    /// Returns `true` if `slide` could be added without breaking feasibility.
    #[inline]
    pub fn is_admissible(&self, slide: SlideIndex, slides: &SlideSet) -> bool {
        !self.contains(slide) && self.photos_free(slide, slides, None)
    }

    /// Appends an admissible slide.
    pub fn push(&mut self, slide: SlideIndex, slides: &SlideSet) {
        debug_assert!(
            self.is_admissible(slide, slides),
            "called `SearchState::push` with an inadmissible slide: {}",
            slide
        );

        if let Some(last) = self.last() {
            self.score += slides.score(last, slide);
        }
        self.mark(slide, slides, true);
        self.sequence.push(slide);
    }

    /// Score change of applying `mv`, or `None` if the move is infeasible.
    pub fn evaluate(&self, mv: &Move, slides: &SlideSet) -> Option<i64> {
        let seq = &self.sequence;
        let n = seq.len();
        let edge = |a: Option<SlideIndex>, b: Option<SlideIndex>| -> i64 {
            match (a, b) {
                (Some(a), Some(b)) => slides.score(a, b) as i64,
                _ => 0,
            }
        };

        match *mv {
            Move::Swap { first, second } => {
                if first >= second || second >= n {
                    return None;
                }
                let (a, b) = (Some(seq[first]), Some(seq[second]));
                let prev = self.before(first);
                let next = seq.get(second + 1).copied();

                if second == first + 1 {
                    let old = edge(prev, a) + edge(b, next);
                    let new = edge(prev, b) + edge(a, next);
                    Some(new - old)
                } else {
                    let after_a = Some(seq[first + 1]);
                    let before_b = Some(seq[second - 1]);
                    let old = edge(prev, a) + edge(a, after_a) + edge(before_b, b) + edge(b, next);
                    let new = edge(prev, b) + edge(b, after_a) + edge(before_b, a) + edge(a, next);
                    Some(new - old)
                }
            }
            Move::Insert { slide, position } => {
                if position > n || !self.is_admissible(slide, slides) {
                    return None;
                }
                let x = Some(slide);
                let prev = self.before(position);
                let next = seq.get(position).copied();
                Some(edge(prev, x) + edge(x, next) - edge(prev, next))
            }
            Move::Remove { position } => {
                if position >= n {
                    return None;
                }
                Some(self.removal_delta(position, slides))
            }
            Move::Relocate { from, to } => {
                if from >= n || to >= n || from == to {
                    return None;
                }
                let a = Some(seq[from]);
                let prev = to.checked_sub(1).and_then(|k| self.without(k, from));
                let next = self.without(to, from);
                let reinsert = edge(prev, a) + edge(a, next) - edge(prev, next);
                Some(self.removal_delta(from, slides) + reinsert)
            }
            Move::Reverse { start, end } => {
                if start >= end || end >= n {
                    return None;
                }
                let (first, last) = (Some(seq[start]), Some(seq[end]));
                let prev = self.before(start);
                let next = seq.get(end + 1).copied();
                let old = edge(prev, first) + edge(last, next);
                let new = edge(prev, last) + edge(first, next);
                Some(new - old)
            }
            Move::Replace { position, slide } => {
                if position >= n || self.contains(slide) {
                    return None;
                }
                let current = seq[position];
                if !self.photos_free(slide, slides, Some(current)) {
                    return None;
                }
                let (a, x) = (Some(current), Some(slide));
                let prev = self.before(position);
                let next = seq.get(position + 1).copied();
                Some(edge(prev, x) + edge(x, next) - edge(prev, a) - edge(a, next))
            }
        }
    }

    /// Applies a feasible move whose score change `delta` came from `evaluate`.
    pub fn apply(&mut self, mv: &Move, slides: &SlideSet, delta: i64) {
        match *mv {
            Move::Swap { first, second } => self.sequence.swap(first, second),
            Move::Insert { slide, position } => {
                self.mark(slide, slides, true);
                self.sequence.insert(position, slide);
            }
            Move::Remove { position } => {
                let slide = self.sequence.remove(position);
                self.mark(slide, slides, false);
            }
            Move::Relocate { from, to } => {
                let slide = self.sequence.remove(from);
                self.sequence.insert(to, slide);
            }
            Move::Reverse { start, end } => self.sequence[start..=end].reverse(),
            Move::Replace { position, slide } => {
                let old = std::mem::replace(&mut self.sequence[position], slide);
                self.mark(old, slides, false);
                self.mark(slide, slides, true);
            }
        }

        let score = self.score as i64 + delta;
        debug_assert!(
            score >= 0,
            "called `SearchState::apply` with a delta that makes the score negative: {} + {}",
            self.score,
            delta
        );
        self.score = score as Score;

        debug_assert_eq!(
            self.score,
            sequence::score_of(&self.sequence, slides),
            "incremental score diverged after {}",
            mv
        );
    }

    /// Snapshot of the current sequence and score.
    pub fn to_sequence(&self) -> Sequence {
        Sequence::new(self.sequence.clone(), self.score)
    }

    #[inline]
    fn before(&self, position: usize) -> Option<SlideIndex> {
        position
            .checked_sub(1)
            .and_then(|k| self.sequence.get(k).copied())
    }

    /// Slide at `k` in the sequence with position `skip` removed.
    #[inline]
    fn without(&self, k: usize, skip: usize) -> Option<SlideIndex> {
        let k = if k < skip { k } else { k + 1 };
        self.sequence.get(k).copied()
    }

    fn removal_delta(&self, position: usize, slides: &SlideSet) -> i64 {
        let a = self.sequence[position];
        let prev = self.before(position);
        let next = self.sequence.get(position + 1).copied();
        let score = |x: SlideIndex, y: SlideIndex| slides.score(x, y) as i64;

        let mut delta = 0;
        if let Some(p) = prev {
            delta -= score(p, a);
        }
        if let Some(q) = next {
            delta -= score(a, q);
        }
        if let (Some(p), Some(q)) = (prev, next) {
            delta += score(p, q);
        }
        delta
    }

    fn mark(&mut self, slide: SlideIndex, slides: &SlideSet, used: bool) {
        self.in_sequence.set(slide.get(), used);
        for p in slides.slide(slide).photos() {
            self.photo_in_use.set(p.get(), used);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use slideshow_model::{
        catalog::PhotoCatalogBuilder, generator::SlideGenerator, photo::Orientation,
    };

    fn si(i: usize) -> SlideIndex {
        SlideIndex::new(i)
    }

    fn chain() -> SlideSet {
        // Consecutive photos share exactly one tag and each has one of its own.
        let catalog = PhotoCatalogBuilder::new()
            .photo(Orientation::Horizontal, ["a", "b"])
            .photo(Orientation::Horizontal, ["b", "c"])
            .photo(Orientation::Horizontal, ["c", "d"])
            .photo(Orientation::Horizontal, ["d", "e"])
            .build();
        SlideGenerator::default().generate(&catalog)
    }

    fn overlapping() -> SlideSet {
        // Exhaustive pairing: slides 0..6 are all pairs of four vertical photos.
        let catalog = PhotoCatalogBuilder::new()
            .photo(Orientation::Vertical, ["a", "b"])
            .photo(Orientation::Vertical, ["b", "c"])
            .photo(Orientation::Vertical, ["c", "d"])
            .photo(Orientation::Vertical, ["d", "a"])
            .build();
        SlideGenerator::exhaustive().generate(&catalog)
    }

    fn state_of(slides: &SlideSet, order: &[usize]) -> SearchState {
        let seq = Sequence::evaluate(order.iter().copied().map(si).collect(), slides).unwrap();
        SearchState::from_sequence(&seq, slides)
    }

    fn check(state: &SearchState, slides: &SlideSet, mv: Move) -> SearchState {
        let delta = state.evaluate(&mv, slides).expect("feasible move");
        let mut next = state.clone();
        next.apply(&mv, slides, delta);
        assert_eq!(next.score(), sequence::score_of(next.sequence(), slides));
        assert!(next.to_sequence().validate(slides).is_ok());
        next
    }

    #[test]
    fn test_push_accumulates_score() {
        let slides = chain();
        let state = state_of(&slides, &[0, 1, 2, 3]);
        assert_eq!(state.score(), 3);
        assert!(state.contains(si(2)));
        assert_eq!(state.last(), Some(si(3)));
    }

    #[test]
    fn test_swap_adjacent_and_distant() {
        let slides = chain();
        let state = state_of(&slides, &[0, 1, 2, 3]);

        let next = check(&state, &slides, Move::Swap { first: 1, second: 2 });
        assert_eq!(next.sequence(), &[si(0), si(2), si(1), si(3)]);

        let next = check(&state, &slides, Move::Swap { first: 0, second: 3 });
        assert_eq!(next.sequence(), &[si(3), si(1), si(2), si(0)]);
        assert_eq!(state.evaluate(&Move::Swap { first: 2, second: 2 }, &slides), None);
    }

    #[test]
    fn test_insert_remove_and_relocate() {
        let slides = chain();
        let state = state_of(&slides, &[0, 2]);
        assert_eq!(state.score(), 0);

        let next = check(&state, &slides, Move::Insert { slide: si(1), position: 1 });
        assert_eq!(next.score(), 2);
        assert_eq!(
            state.evaluate(&Move::Insert { slide: si(0), position: 0 }, &slides),
            None,
            "slide 0 is already used"
        );

        let removed = check(&next, &slides, Move::Remove { position: 1 });
        assert_eq!(removed.sequence(), &[si(0), si(2)]);
        assert!(!removed.contains(si(1)));

        let full = state_of(&slides, &[1, 0, 2, 3]);
        let moved = check(&full, &slides, Move::Relocate { from: 0, to: 1 });
        assert_eq!(moved.sequence(), &[si(0), si(1), si(2), si(3)]);
        assert_eq!(moved.score(), 3);
        let moved = check(&full, &slides, Move::Relocate { from: 2, to: 0 });
        assert_eq!(moved.sequence(), &[si(2), si(1), si(0), si(3)]);
    }

    #[test]
    fn test_reverse_segment() {
        let slides = chain();
        let state = state_of(&slides, &[0, 2, 1, 3]);
        let next = check(&state, &slides, Move::Reverse { start: 1, end: 2 });
        assert_eq!(next.sequence(), &[si(0), si(1), si(2), si(3)]);
        let next = check(&state, &slides, Move::Reverse { start: 0, end: 3 });
        assert_eq!(next.sequence(), &[si(3), si(1), si(2), si(0)]);
    }

    #[test]
    fn test_photo_conflicts_are_infeasible() {
        let slides = overlapping();
        // Slide 0 = {0, 1}, slide 5 = {2, 3}, slide 1 = {0, 2}.
        let state = state_of(&slides, &[0, 5]);
        assert_eq!(
            state.evaluate(&Move::Insert { slide: si(1), position: 1 }, &slides),
            None
        );
        assert!(!state.is_admissible(si(1), &slides));

        // Replacing slide 0 frees photos 0 and 1, but photo 2 stays taken by slide 5.
        assert_eq!(
            state.evaluate(&Move::Replace { position: 0, slide: si(1) }, &slides),
            None
        );

        // Slide 0 alone: replacing it with slide 1 = {0, 2} reuses its freed photo 0.
        let single = state_of(&slides, &[0]);
        let next = check(&single, &slides, Move::Replace { position: 0, slide: si(1) });
        assert_eq!(next.sequence(), &[si(1)]);
        assert!(!next.is_admissible(si(0), &slides));
        assert!(!next.contains(si(0)));
    }

    fn catalog_strategy() -> impl Strategy<Value = SlideSet> {
        let photo = (any::<bool>(), proptest::collection::vec(0u8..6, 0..4));
        proptest::collection::vec(photo, 2..9).prop_map(|photos| {
            let mut builder = PhotoCatalogBuilder::new();
            for (vertical, tags) in photos {
                let orientation = if vertical {
                    Orientation::Vertical
                } else {
                    Orientation::Horizontal
                };
                builder.add_photo(orientation, tags.iter().map(|t| format!("t{t}")));
            }
            SlideGenerator::exhaustive().generate(&builder.build())
        })
    }

    fn arbitrary_move(n: usize, m: usize, picks: [usize; 3]) -> Move {
        let len = n.max(1);
        let slide = SlideIndex::new(picks[2] % m.max(1));
        let (a, b) = (picks[0] % len, picks[1] % len);
        match picks[2] % 6 {
            0 => Move::Swap { first: a.min(b), second: a.max(b) },
            1 => Move::Insert { slide, position: picks[0] % (n + 1) },
            2 => Move::Relocate { from: a, to: b },
            3 => Move::Reverse { start: a.min(b), end: a.max(b) },
            4 => Move::Replace { position: a, slide },
            _ => Move::Remove { position: a },
        }
    }

    proptest! {
        #[test]
        fn prop_incremental_delta_matches_full_rescoring(
            slides in catalog_strategy(),
            seed_order in proptest::collection::vec(any::<usize>(), 0..12),
            moves in proptest::collection::vec(any::<[usize; 3]>(), 1..24),
        ) {
            // Greedily keep the admissible slides of a random order.
            let mut state = SearchState::new(&slides);
            if !slides.is_empty() {
                for pick in seed_order {
                    let s = SlideIndex::new(pick % slides.len());
                    if state.is_admissible(s, &slides) {
                        state.push(s, &slides);
                    }
                }
            }

            for picks in moves {
                let mv = arbitrary_move(state.len(), slides.len(), picks);
                if slides.is_empty() {
                    break;
                }
                if let Some(delta) = state.evaluate(&mv, &slides) {
                    let before = state.score() as i64;
                    state.apply(&mv, &slides, delta);
                    prop_assert_eq!(state.score() as i64, before + delta);
                    prop_assert_eq!(state.score(), sequence::score_of(state.sequence(), &slides));
                    prop_assert!(state.to_sequence().validate(&slides).is_ok());
                }
            }
        }
    }
}
