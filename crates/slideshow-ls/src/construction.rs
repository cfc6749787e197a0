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

//! Greedy nearest-neighbor construction.
//!
//! Starting from a slide picked by the `StartStrategy`, the construction keeps
//! appending the admissible slide with the highest transition score to the
//! current last slide, until no admissible slide remains. Ties resolve to the
//! lowest slide id.
//!
//! Only slides sharing a tag with the last slide can score above zero, so the
//! candidates are drawn from a tag -> slides posting index instead of scanning
//! the whole set. Once a slide becomes inadmissible it stays inadmissible for
//! the rest of the construction, which allows removing it from the postings
//! lazily. If no candidate scores above zero the lowest-id admissible slide is
//! appended; a monotone cursor finds it in amortized constant time.
//!
//! A `ConstructionBudget` bounds the time spent scoring. It is polled every
//! few appends; once it is exhausted the remaining admissible slides are
//! appended in id order, so the construction still completes with a feasible
//! sequence that leaves no admissible slide out.

use crate::state::SearchState;
use rand::{Rng, RngCore};
use slideshow_model::{index::SlideIndex, score::Score, slide::SlideSet};
use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Instant,
};

/// The budget is polled whenever the sequence length is a multiple of 64.
const BUDGET_CHECK_MASK: usize = 0x3F;

/// How the first slide of the sequence is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StartStrategy {
    /// Start at a given slide.
    Fixed(SlideIndex),
    /// Start at a slide drawn uniformly from the search RNG.
    #[default]
    Random,
    /// Start at the first endpoint of the best transition between two
    /// photo-disjoint slides.
    BestTransition,
}

impl std::fmt::Display for StartStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartStrategy::Fixed(slide) => write!(f, "Fixed({})", slide.get()),
            StartStrategy::Random => write!(f, "Random"),
            StartStrategy::BestTransition => write!(f, "BestTransition"),
        }
    }
}

/// Limits on the scoring work of a construction.
///
/// Exhaustion never aborts the construction; it only switches it to
/// appending the remaining admissible slides without scoring them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstructionBudget<'a> {
    deadline: Option<Instant>,
    stop_signal: Option<&'a AtomicBool>,
}

impl<'a> ConstructionBudget<'a> {
    /// A budget that is never exhausted.
    #[inline]
    pub const fn unlimited() -> Self {
        Self {
            deadline: None,
            stop_signal: None,
        }
    }

    #[inline]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[inline]
    pub fn with_stop_signal(mut self, stop_signal: &'a AtomicBool) -> Self {
        self.stop_signal = Some(stop_signal);
        self
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// `true` once the stop signal is raised or the deadline has passed.
    pub fn is_exhausted(&self) -> bool {
        self.stop_signal.is_some_and(|s| s.load(Ordering::Relaxed))
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GreedyConstruction {
    start: StartStrategy,
}

impl GreedyConstruction {
    #[inline]
    pub fn new(start: StartStrategy) -> Self {
        Self { start }
    }

    #[inline]
    pub fn start(&self) -> StartStrategy {
        self.start
    }

    /// Builds a feasible sequence over `slides`. Empty only if `slides` is empty.
    #[inline]
    pub fn construct<R>(&self, slides: &SlideSet, rng: &mut R) -> SearchState
    where
        R: RngCore + ?Sized,
    {
        self.construct_within(slides, rng, &ConstructionBudget::unlimited())
    }

    /// Like `construct`, but stops scoring candidates once `budget` is exhausted.
    pub fn construct_within<R>(
        &self,
        slides: &SlideSet,
        rng: &mut R,
        budget: &ConstructionBudget<'_>,
    ) -> SearchState
    where
        R: RngCore + ?Sized,
    {
        let mut state = SearchState::new(slides);
        if slides.is_empty() {
            return state;
        }

        let mut postings = Postings::new(slides);
        let first = self.first_slide(slides, &postings, budget, rng);
        state.push(first, slides);

        let mut exhausted = false;

        // Slides below the cursor are all inadmissible.
        let mut cursor = 0;
        // Deduplicates candidates reached through several shared tags.
        let mut seen_in_round = vec![usize::MAX; slides.len()];
        let mut round = 0;

        while let Some(last) = state.last() {
            if !exhausted && (state.len() & BUDGET_CHECK_MASK) == 0 && budget.is_exhausted() {
                exhausted = true;
                tracing::debug!(
                    appended = state.len(),
                    slides = slides.len(),
                    "construction budget exhausted, appending the rest by id"
                );
            }

            round += 1;
            let mut best: Option<(Score, SlideIndex)> = None;

            let tags = if exhausted { &[][..] } else { slides.slide(last).tags() };
            for &tag in tags {
                let posting = &mut postings.lists[tag.get()];
                let mut k = 0;
                while k < posting.len() {
                    let candidate = posting[k];
                    if !state.is_admissible(candidate, slides) {
                        posting.swap_remove(k);
                        continue;
                    }
                    k += 1;

                    if seen_in_round[candidate.get()] == round {
                        continue;
                    }
                    seen_in_round[candidate.get()] = round;

                    let score = slides.score(last, candidate);
                    let better = match best {
                        None => true,
                        Some((s, b)) => score > s || (score == s && candidate < b),
                    };
                    if better {
                        best = Some((score, candidate));
                    }
                }
            }

            let next = match best {
                Some((score, slide)) if score > 0 => Some(slide),
                _ => {
                    while cursor < slides.len()
                        && !state.is_admissible(SlideIndex::new(cursor), slides)
                    {
                        cursor += 1;
                    }
                    (cursor < slides.len()).then(|| SlideIndex::new(cursor))
                }
            };

            match next {
                Some(slide) => state.push(slide, slides),
                None => break,
            }
        }

        state
    }

    fn first_slide<R>(
        &self,
        slides: &SlideSet,
        postings: &Postings,
        budget: &ConstructionBudget<'_>,
        rng: &mut R,
    ) -> SlideIndex
    where
        R: RngCore + ?Sized,
    {
        match self.start {
            StartStrategy::Fixed(slide) => {
                debug_assert!(
                    slide.get() < slides.len(),
                    "called `GreedyConstruction::construct` with a fixed start out of bounds: the len is {} but the slide is {}",
                    slides.len(),
                    slide
                );
                if slide.get() < slides.len() {
                    slide
                } else {
                    SlideIndex::new(0)
                }
            }
            StartStrategy::Random => SlideIndex::new(rng.random_range(0..slides.len())),
            StartStrategy::BestTransition => postings
                .best_transition(slides, budget)
                .map_or(SlideIndex::new(0), |(a, _)| a),
        }
    }
}

/// Tag -> slides that carry the tag, in ascending slide order.
#[derive(Debug, Clone)]
struct Postings {
    lists: Vec<Vec<SlideIndex>>,
}

impl Postings {
    fn new(slides: &SlideSet) -> Self {
        let mut lists = vec![Vec::new(); slides.num_tags()];
        for slide in slides {
            for &tag in slide.tags() {
                lists[tag.get()].push(slide.index());
            }
        }
        Self { lists }
    }

    /// Lowest `(a, b)`, `a < b`, among photo-disjoint pairs with the highest
    /// positive transition score.
    ///
    /// Stops early once `budget` is exhausted and returns the best pair seen so far.
    fn best_transition(
        &self,
        slides: &SlideSet,
        budget: &ConstructionBudget<'_>,
    ) -> Option<(SlideIndex, SlideIndex)> {
        let mut best: Option<(Score, SlideIndex, SlideIndex)> = None;

        for a in slides {
            if (a.index().get() & BUDGET_CHECK_MASK) == 0 && budget.is_exhausted() {
                break;
            }
            for &tag in a.tags() {
                for &b in &self.lists[tag.get()] {
                    if b <= a.index() {
                        continue;
                    }
                    let other = slides.slide(b);
                    if a.shares_photo_with(other) {
                        continue;
                    }
                    let score = a.transition_score(other);
                    let better = match best {
                        None => score > 0,
                        Some((s, x, y)) => {
                            score > s || (score == s && (a.index(), b) < (x, y))
                        }
                    };
                    if better {
                        best = Some((score, a.index(), b));
                    }
                }
            }
        }

        best.map(|(_, a, b)| (a, b))
    }
}
