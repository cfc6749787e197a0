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

//! Slide candidate generation.
//!
//! Every horizontal photo becomes one simple slide. Vertical photos have to be
//! paired, and enumerating all pairs yields a quadratic number of candidates
//! that the optimizer then has to search through. The default
//! `PairingStrategy::Windowed` pairs greedily instead:
//!
//! 1. Sort vertical photos by ascending tag count (ties by photo index).
//! 2. Walk the sorted list; for each still-unpaired photo, look at the next
//!    `window` unpaired photos and pick the one that maximizes the size of the
//!    union of both tag sets (ties go to the earliest candidate).
//!
//! This yields `floor(v / 2)` composite slides for `v` vertical photos and
//! leaves at most one photo unpaired. `PairingStrategy::Exhaustive` keeps the
//! all-pairs enumeration for small instances; its candidates overlap on photos,
//! which the optimizer resolves.
//!
//! Slides are emitted simple-first in photo order, then composite in pairing
//! order; a slide's index is its position in that order.

use crate::{
    catalog::PhotoCatalog,
    index::{PhotoIndex, SlideIndex},
    slide::{Slide, SlideSet},
    tagset,
};

/// Default number of look-ahead candidates for windowed pairing.
pub const DEFAULT_PAIRING_WINDOW: usize = 8;

/// How vertical photos are combined into composite slides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PairingStrategy {
    /// Greedy pairing within a bounded look-ahead window. Linear number of slides.
    Windowed { window: usize },
    /// Every unordered pair of vertical photos. Quadratic number of slides.
    Exhaustive,
}

impl Default for PairingStrategy {
    fn default() -> Self {
        PairingStrategy::Windowed {
            window: DEFAULT_PAIRING_WINDOW,
        }
    }
}

impl std::fmt::Display for PairingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairingStrategy::Windowed { window } => write!(f, "Windowed(k={})", window),
            PairingStrategy::Exhaustive => write!(f, "Exhaustive"),
        }
    }
}

/// Derives the slide candidate set from a photo catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlideGenerator {
    strategy: PairingStrategy,
}

impl SlideGenerator {
    #[inline]
    pub fn new(strategy: PairingStrategy) -> Self {
        Self { strategy }
    }

    /// Windowed pairing with look-ahead `window`. A window of zero is treated as one.
    #[inline]
    pub fn windowed(window: usize) -> Self {
        Self::new(PairingStrategy::Windowed { window })
    }

    #[inline]
    pub fn exhaustive() -> Self {
        Self::new(PairingStrategy::Exhaustive)
    }

    #[inline]
    pub fn strategy(&self) -> PairingStrategy {
        self.strategy
    }

    /// Generates the full slide set for `catalog`.
    pub fn generate(&self, catalog: &PhotoCatalog) -> SlideSet {
        let mut slides: Vec<Slide> = Vec::with_capacity(catalog.len());
        let mut verticals: Vec<PhotoIndex> = Vec::new();

        for photo in catalog {
            if photo.is_vertical() {
                verticals.push(photo.index());
            } else {
                let index = SlideIndex::new(slides.len());
                slides.push(Slide::simple(index, photo.index(), photo.tags()));
            }
        }

        let pairs = match self.strategy {
            PairingStrategy::Windowed { window } => pair_windowed(catalog, verticals, window),
            PairingStrategy::Exhaustive => pair_exhaustive(&verticals),
        };

        slides.reserve(pairs.len());
        for (a, b) in pairs {
            let index = SlideIndex::new(slides.len());
            let (pa, pb) = (catalog.photo(a), catalog.photo(b));
            slides.push(Slide::composite(index, (a, pa.tags()), (b, pb.tags())));
        }

        SlideSet::from_generated(slides, catalog)
    }
}

fn pair_windowed(
    catalog: &PhotoCatalog,
    mut verticals: Vec<PhotoIndex>,
    window: usize,
) -> Vec<(PhotoIndex, PhotoIndex)> {
    debug_assert!(window > 0, "called `pair_windowed` with an empty window");
    let window = window.max(1);

    verticals.sort_by_key(|&p| (catalog.photo(p).num_tags(), p));

    let n = verticals.len();
    let mut paired = vec![false; n];
    let mut pairs = Vec::with_capacity(n / 2);

    for i in 0..n {
        if paired[i] {
            continue;
        }
        let tags_i = catalog.photo(verticals[i]).tags();

        let mut best: Option<(usize, usize)> = None; // (position, union size)
        let mut seen = 0;
        for (j, &candidate) in verticals.iter().enumerate().skip(i + 1) {
            if paired[j] {
                continue;
            }
            let union = tagset::union_len(tags_i, catalog.photo(candidate).tags());
            if best.is_none_or(|(_, u)| union > u) {
                best = Some((j, union));
            }
            seen += 1;
            if seen == window {
                break;
            }
        }

        if let Some((j, _)) = best {
            paired[i] = true;
            paired[j] = true;
            pairs.push((verticals[i], verticals[j]));
        }
    }

    pairs
}

fn pair_exhaustive(verticals: &[PhotoIndex]) -> Vec<(PhotoIndex, PhotoIndex)> {
    let n = verticals.len();
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for (i, &a) in verticals.iter().enumerate() {
        for &b in &verticals[i + 1..] {
            pairs.push((a, b));
        }
    }
    pairs
}
