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

//! Transition scoring between consecutive slides.
//!
//! The interest of showing slide `B` right after slide `A` is
//!
//! ```text
//! score(A, B) = min(|A ∩ B|, |A \ B|, |B \ A|)
//! ```
//!
//! over the slides' tag sets. It rewards transitions that share some tags but
//! also bring something new. The function is symmetric and bounded by
//! `min(|A|, |B|)`. Both set differences follow from the intersection size and
//! the precomputed set sizes, so a single intersection is all that is computed.

use crate::{index::TagId, slide::Slide, tagset};

/// Objective value type. Scores are non-negative by construction.
pub type Score = u64;

/// Interest score of two canonical tag sets.
#[inline]
pub fn interest(a: &[TagId], b: &[TagId]) -> Score {
    let common = tagset::intersection_len(a, b);
    let only_a = a.len() - common;
    let only_b = b.len() - common;
    common.min(only_a).min(only_b) as Score
}

/// Interest score of two slides.
#[inline]
pub fn transition_score(a: &Slide, b: &Slide) -> Score {
    // The score can never exceed the smaller set; skip the intersection when
    // one side is empty.
    if a.num_tags() == 0 || b.num_tags() == 0 {
        return 0;
    }
    interest(a.tags(), b.tags())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::PhotoCatalogBuilder, generator::SlideGenerator, photo::Orientation};
    use proptest::prelude::*;

    fn tags(ids: &[usize]) -> Vec<TagId> {
        let mut v: Vec<TagId> = ids.iter().copied().map(TagId::new).collect();
        tagset::canonicalize(&mut v);
        v
    }

    #[test]
    fn test_interest_examples() {
        // {cat} vs {cat, dog}: common 1, only_a 0, only_b 1.
        assert_eq!(interest(&tags(&[0]), &tags(&[0, 1])), 0);
        // {a, b} vs {b, c}: 1 each.
        assert_eq!(interest(&tags(&[0, 1]), &tags(&[1, 2])), 1);
        // identical sets share everything but differ in nothing.
        assert_eq!(interest(&tags(&[3, 4, 5]), &tags(&[3, 4, 5])), 0);
        // disjoint sets share nothing.
        assert_eq!(interest(&tags(&[1, 2]), &tags(&[3, 4])), 0);
        assert_eq!(interest(&tags(&[1, 2, 3, 4]), &tags(&[3, 4, 5, 6])), 2);
    }

    #[test]
    fn test_transition_score_between_slides() {
        let catalog = PhotoCatalogBuilder::new()
            .photo(Orientation::Horizontal, ["a", "b"])
            .photo(Orientation::Horizontal, ["b", "c"])
            .photo(Orientation::Horizontal, [] as [&str; 0])
            .build();
        let slides = SlideGenerator::default().generate(&catalog);
        let s0 = slides.slide(0.into());
        let s1 = slides.slide(1.into());
        let s2 = slides.slide(2.into());
        assert_eq!(transition_score(s0, s1), 1);
        assert_eq!(transition_score(s0, s2), 0);
    }

    fn tag_set() -> impl Strategy<Value = Vec<TagId>> {
        proptest::collection::vec(0usize..24, 0..16).prop_map(|ids| tags(&ids))
    }

    proptest! {
        #[test]
        fn prop_interest_is_symmetric_and_bounded(a in tag_set(), b in tag_set()) {
            let ab = interest(&a, &b);
            let ba = interest(&b, &a);
            prop_assert_eq!(ab, ba);
            prop_assert!(ab <= a.len().min(b.len()) as Score);
        }

        #[test]
        fn prop_interest_matches_naive_definition(a in tag_set(), b in tag_set()) {
            let common = a.iter().filter(|t| b.contains(t)).count();
            let only_a = a.iter().filter(|t| !b.contains(t)).count();
            let only_b = b.iter().filter(|t| !a.contains(t)).count();
            prop_assert_eq!(interest(&a, &b), common.min(only_a).min(only_b) as Score);
        }
    }
}
