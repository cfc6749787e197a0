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

use crate::{
    index::{PhotoIndex, SlideIndex},
    score::Score,
    slide::SlideSet,
};

/// Reasons a slide sequence is infeasible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// The sequence references a slide that is not in the slide set.
    UnknownSlide { position: usize, slide: SlideIndex },
    /// The same slide appears twice.
    DuplicateSlide { position: usize, slide: SlideIndex },
    /// Two slides in the sequence show the same photo.
    PhotoReused {
        photo: PhotoIndex,
        first: SlideIndex,
        second: SlideIndex,
    },
    /// The recorded score differs from the recomputed one.
    ScoreMismatch { recorded: Score, actual: Score },
}

impl std::fmt::Display for SequenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSlide { position, slide } => write!(
                f,
                "position {position} references unknown slide {}",
                slide.get()
            ),
            Self::DuplicateSlide { position, slide } => write!(
                f,
                "slide {} appears again at position {position}",
                slide.get()
            ),
            Self::PhotoReused {
                photo,
                first,
                second,
            } => write!(
                f,
                "photo {} is shown by both slide {} and slide {}",
                photo.get(),
                first.get(),
                second.get()
            ),
            Self::ScoreMismatch { recorded, actual } => write!(
                f,
                "recorded score {recorded} does not match actual score {actual}"
            ),
        }
    }
}

impl std::error::Error for SequenceError {}

/// An ordered, photo-disjoint selection of slides together with its score.
///
/// The score is the sum of transition scores over consecutive slides. A
/// sequence of length zero or one scores zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Sequence {
    slides: Vec<SlideIndex>,
    score: Score,
}

impl Sequence {
    /// Creates a sequence with a precomputed score. The caller vouches for feasibility.
    #[inline]
    pub fn new(slides: Vec<SlideIndex>, score: Score) -> Self {
        Self { slides, score }
    }

    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validates `slides` against `set` and computes the score.
    pub fn evaluate(slides: Vec<SlideIndex>, set: &SlideSet) -> Result<Self, SequenceError> {
        check_feasible(&slides, set)?;
        let score = score_of(&slides, set);
        Ok(Self { slides, score })
    }

    /// Checks feasibility against `set` and that the recorded score is exact.
    pub fn validate(&self, set: &SlideSet) -> Result<(), SequenceError> {
        check_feasible(&self.slides, set)?;
        let actual = score_of(&self.slides, set);
        if actual != self.score {
            return Err(SequenceError::ScoreMismatch {
                recorded: self.score,
                actual,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn slides(&self) -> &[SlideIndex] {
        &self.slides
    }

    #[inline]
    pub fn score(&self) -> Score {
        self.score
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    #[inline]
    pub fn into_slides(self) -> Vec<SlideIndex> {
        self.slides
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sequence(len: {}, score: {})", self.len(), self.score)
    }
}

/// Sum of transition scores over consecutive slides.
pub fn score_of(slides: &[SlideIndex], set: &SlideSet) -> Score {
    slides.windows(2).map(|w| set.score(w[0], w[1])).sum()
}

fn check_feasible(slides: &[SlideIndex], set: &SlideSet) -> Result<(), SequenceError> {
    let mut slide_seen = vec![false; set.len()];
    let mut photo_owner: Vec<Option<SlideIndex>> = vec![None; set.num_photos()];

    for (position, &slide) in slides.iter().enumerate() {
        let Some(s) = set.get(slide) else {
            return Err(SequenceError::UnknownSlide { position, slide });
        };
        if std::mem::replace(&mut slide_seen[slide.get()], true) {
            return Err(SequenceError::DuplicateSlide { position, slide });
        }
        for &photo in s.photos() {
            if let Some(first) = photo_owner[photo.get()] {
                return Err(SequenceError::PhotoReused {
                    photo,
                    first,
                    second: slide,
                });
            }
            photo_owner[photo.get()] = Some(slide);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::PhotoCatalogBuilder, generator::SlideGenerator, photo::Orientation};

    fn si(i: usize) -> SlideIndex {
        SlideIndex::new(i)
    }

    fn chain() -> SlideSet {
        let catalog = PhotoCatalogBuilder::new()
            .photo(Orientation::Horizontal, ["a", "b"])
            .photo(Orientation::Horizontal, ["b", "c"])
            .photo(Orientation::Horizontal, ["c", "d"])
            .build();
        SlideGenerator::default().generate(&catalog)
    }

    #[test]
    fn test_evaluate_scores_consecutive_pairs() {
        let set = chain();
        let seq = Sequence::evaluate(vec![si(0), si(1), si(2)], &set).unwrap();
        assert_eq!(seq.score(), 2);
        let seq = Sequence::evaluate(vec![si(0), si(2), si(1)], &set).unwrap();
        assert_eq!(seq.score(), 1);
    }

    #[test]
    fn test_short_sequences_score_zero() {
        let set = chain();
        assert_eq!(Sequence::evaluate(vec![], &set).unwrap().score(), 0);
        assert_eq!(Sequence::evaluate(vec![si(1)], &set).unwrap().score(), 0);
    }

    #[test]
    fn test_evaluate_rejects_unknown_and_duplicate_slides() {
        let set = chain();
        assert_eq!(
            Sequence::evaluate(vec![si(0), si(7)], &set),
            Err(SequenceError::UnknownSlide {
                position: 1,
                slide: si(7)
            })
        );
        assert_eq!(
            Sequence::evaluate(vec![si(0), si(1), si(0)], &set),
            Err(SequenceError::DuplicateSlide {
                position: 2,
                slide: si(0)
            })
        );
    }

    #[test]
    fn test_evaluate_rejects_photo_reuse() {
        let catalog = PhotoCatalogBuilder::new()
            .photo(Orientation::Vertical, ["a"])
            .photo(Orientation::Vertical, ["b"])
            .photo(Orientation::Vertical, ["c"])
            .build();
        let set = SlideGenerator::exhaustive().generate(&catalog);
        // Slides: 0 = {0, 1}, 1 = {0, 2}, 2 = {1, 2}.
        assert_eq!(
            Sequence::evaluate(vec![si(0), si(1)], &set),
            Err(SequenceError::PhotoReused {
                photo: PhotoIndex::new(0),
                first: si(0),
                second: si(1),
            })
        );
    }

    #[test]
    fn test_validate_detects_wrong_score() {
        let set = chain();
        let seq = Sequence::new(vec![si(0), si(1)], 5);
        assert_eq!(
            seq.validate(&set),
            Err(SequenceError::ScoreMismatch {
                recorded: 5,
                actual: 1
            })
        );
    }
}
