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

//! Slides and the slide candidate set.
//!
//! A slide shows either one horizontal photo ("simple") or two distinct
//! vertical photos ("composite"). Its tag set is the union of its photos' tag
//! sets and is computed once, when the slide is created. A `SlideSet` is the
//! immutable universe of candidates the optimizer chooses from; slide indices
//! are positions in this set and stay stable for the whole search.

use crate::{
    catalog::PhotoCatalog,
    index::{PhotoIndex, SlideIndex, TagId},
    score::{self, Score},
    tagset,
};
use smallvec::SmallVec;

/// Photo ids of a slide. Never allocates: a slide holds at most two photos.
pub type SlidePhotos = SmallVec<[PhotoIndex; 2]>;

/// A single presentation unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Slide {
    index: SlideIndex,
    photos: SlidePhotos,
    tags: Box<[TagId]>,
}

impl Slide {
    /// Creates a simple slide from a horizontal photo.
    pub(crate) fn simple(index: SlideIndex, photo: PhotoIndex, tags: &[TagId]) -> Self {
        let mut photos = SlidePhotos::new();
        photos.push(photo);
        Self {
            index,
            photos,
            tags: tags.into(),
        }
    }

    /// Creates a composite slide from two vertical photos.
    ///
    /// The photo ids are stored in ascending order.
    pub(crate) fn composite(
        index: SlideIndex,
        (first, first_tags): (PhotoIndex, &[TagId]),
        (second, second_tags): (PhotoIndex, &[TagId]),
    ) -> Self {
        debug_assert!(
            first != second,
            "called `Slide::composite` with the same photo twice: {}",
            first
        );

        let mut photos = SlidePhotos::new();
        if first < second {
            photos.push(first);
            photos.push(second);
        } else {
            photos.push(second);
            photos.push(first);
        }

        Self {
            index,
            photos,
            tags: tagset::union(first_tags, second_tags).into_boxed_slice(),
        }
    }

    #[inline]
    pub fn index(&self) -> SlideIndex {
        self.index
    }

    /// The photos shown on this slide (one or two).
    #[inline]
    pub fn photos(&self) -> &[PhotoIndex] {
        &self.photos
    }

    #[inline]
    pub fn is_simple(&self) -> bool {
        self.photos.len() == 1
    }

    #[inline]
    pub fn is_composite(&self) -> bool {
        self.photos.len() == 2
    }

    /// Returns `true` if both slides show at least one common photo.
    #[inline]
    pub fn shares_photo_with(&self, other: &Slide) -> bool {
        self.photos.iter().any(|p| other.photos.contains(p))
    }

    /// The canonical tag set of this slide.
    #[inline]
    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    #[inline]
    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }

    /// Interest score of showing `other` next to this slide.
    #[inline]
    pub fn transition_score(&self, other: &Slide) -> Score {
        score::transition_score(self, other)
    }
}

impl std::fmt::Display for Slide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Slide({}: [", self.index.get())?;
        for (i, p) in self.photos.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", p.get())?;
        }
        write!(f, "], {} tags)", self.tags.len())
    }
}

/// Reasons a hand-built slide is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideError {
    /// A slide must show at least one photo.
    EmptySlide { slide: usize },
    /// A slide shows at most two photos.
    TooManyPhotos { slide: usize, count: usize },
    /// The slide references a photo that is not in the catalog.
    UnknownPhoto { slide: usize, photo: PhotoIndex },
    /// A composite slide lists the same photo twice.
    DuplicatePhoto { slide: usize, photo: PhotoIndex },
    /// A composite slide contains a horizontal photo.
    HorizontalInComposite { slide: usize, photo: PhotoIndex },
    /// A vertical photo cannot be shown alone.
    LoneVertical { slide: usize, photo: PhotoIndex },
    /// The slide's tag set is not the union of its photos' tag sets.
    TagMismatch { slide: usize },
}

impl std::fmt::Display for SlideError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySlide { slide } => write!(f, "slide {slide} has no photos"),
            Self::TooManyPhotos { slide, count } => {
                write!(f, "slide {slide} has {count} photos, at most 2 are allowed")
            }
            Self::UnknownPhoto { slide, photo } => {
                write!(f, "slide {slide} references unknown photo {}", photo.get())
            }
            Self::DuplicatePhoto { slide, photo } => {
                write!(f, "slide {slide} lists photo {} twice", photo.get())
            }
            Self::HorizontalInComposite { slide, photo } => write!(
                f,
                "slide {slide} pairs horizontal photo {} with another photo",
                photo.get()
            ),
            Self::LoneVertical { slide, photo } => {
                write!(f, "slide {slide} shows vertical photo {} alone", photo.get())
            }
            Self::TagMismatch { slide } => write!(
                f,
                "slide {slide} carries a tag set that differs from its photos' tags"
            ),
        }
    }
}

impl std::error::Error for SlideError {}

/// The immutable universe of slide candidates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SlideSet {
    slides: Vec<Slide>,
    num_photos: usize,
    num_tags: usize,
}

impl SlideSet {
    /// Wraps slides produced by the generator. Slide `i` must carry index `i`.
    pub(crate) fn from_generated(slides: Vec<Slide>, catalog: &PhotoCatalog) -> Self {
        debug_assert!(
            slides.iter().enumerate().all(|(i, s)| s.index().get() == i),
            "called `SlideSet::from_generated` with slides out of index order"
        );
        Self {
            slides,
            num_photos: catalog.len(),
            num_tags: catalog.num_tags(),
        }
    }

    /// Builds a slide set from explicit photo groups, validating every group
    /// against `catalog`.
    ///
    /// Slide `i` is built from `groups[i]`. A group of one photo must be
    /// horizontal; a group of two must be two distinct vertical photos.
    pub fn from_groups<G, I>(catalog: &PhotoCatalog, groups: G) -> Result<Self, SlideError>
    where
        G: IntoIterator<Item = I>,
        I: AsRef<[PhotoIndex]>,
    {
        let mut slides = Vec::new();
        for (slide, group) in groups.into_iter().enumerate() {
            let group = group.as_ref();
            let index = SlideIndex::new(slide);

            for &photo in group {
                if !catalog.contains(photo) {
                    return Err(SlideError::UnknownPhoto { slide, photo });
                }
            }

            match *group {
                [] => return Err(SlideError::EmptySlide { slide }),
                [photo] => {
                    let p = catalog.photo(photo);
                    if p.is_vertical() {
                        return Err(SlideError::LoneVertical { slide, photo });
                    }
                    slides.push(Slide::simple(index, photo, p.tags()));
                }
                [first, second] => {
                    if first == second {
                        return Err(SlideError::DuplicatePhoto {
                            slide,
                            photo: first,
                        });
                    }
                    let (a, b) = (catalog.photo(first), catalog.photo(second));
                    if !a.is_vertical() {
                        return Err(SlideError::HorizontalInComposite {
                            slide,
                            photo: first,
                        });
                    }
                    if !b.is_vertical() {
                        return Err(SlideError::HorizontalInComposite {
                            slide,
                            photo: second,
                        });
                    }
                    slides.push(Slide::composite(
                        index,
                        (first, a.tags()),
                        (second, b.tags()),
                    ));
                }
                _ => {
                    return Err(SlideError::TooManyPhotos {
                        slide,
                        count: group.len(),
                    });
                }
            }
        }

        Ok(Self::from_generated(slides, catalog))
    }

    /// Checks that every slide is well formed with respect to `catalog`:
    /// known photos, valid orientation mix, and a tag set equal to the union of
    /// its photos' tags.
    pub fn validate(&self, catalog: &PhotoCatalog) -> Result<(), SlideError> {
        for s in &self.slides {
            let slide = s.index().get();
            let mut expected: Vec<TagId> = Vec::new();
            for &photo in s.photos() {
                let Some(p) = catalog.get(photo) else {
                    return Err(SlideError::UnknownPhoto { slide, photo });
                };
                if s.is_composite() && !p.is_vertical() {
                    return Err(SlideError::HorizontalInComposite { slide, photo });
                }
                if s.is_simple() && p.is_vertical() {
                    return Err(SlideError::LoneVertical { slide, photo });
                }
                expected = tagset::union(&expected, p.tags());
            }
            if expected.as_slice() != s.tags() {
                return Err(SlideError::TagMismatch { slide });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Returns the slide at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn slide(&self, index: SlideIndex) -> &Slide {
        debug_assert!(
            index.get() < self.slides.len(),
            "called `SlideSet::slide` with slide index out of bounds: the len is {} but the index is {}",
            self.slides.len(),
            index.get()
        );
        &self.slides[index.get()]
    }

    #[inline]
    pub fn get(&self, index: SlideIndex) -> Option<&Slide> {
        self.slides.get(index.get())
    }

    #[inline]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Slide> {
        self.slides.iter()
    }

    /// Number of photos in the catalog the slides were built from.
    #[inline]
    pub fn num_photos(&self) -> usize {
        self.num_photos
    }

    /// Number of distinct tags in the catalog the slides were built from.
    #[inline]
    pub fn num_tags(&self) -> usize {
        self.num_tags
    }

    pub fn num_simple(&self) -> usize {
        self.slides.iter().filter(|s| s.is_simple()).count()
    }

    pub fn num_composite(&self) -> usize {
        self.slides.iter().filter(|s| s.is_composite()).count()
    }

    /// Interest score of placing slides `a` and `b` next to each other.
    #[inline]
    pub fn score(&self, a: SlideIndex, b: SlideIndex) -> Score {
        score::transition_score(self.slide(a), self.slide(b))
    }
}

impl<'a> IntoIterator for &'a SlideSet {
    type Item = &'a Slide;
    type IntoIter = std::slice::Iter<'a, Slide>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.iter()
    }
}

impl std::fmt::Display for SlideSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SlideSet(slides: {}, simple: {}, composite: {})",
            self.len(),
            self.num_simple(),
            self.num_composite()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::PhotoCatalogBuilder, photo::Orientation};

    fn pi(i: usize) -> PhotoIndex {
        PhotoIndex::new(i)
    }

    fn catalog() -> PhotoCatalog {
        PhotoCatalogBuilder::new()
            .photo(Orientation::Horizontal, ["a", "b"])
            .photo(Orientation::Vertical, ["b", "c"])
            .photo(Orientation::Vertical, ["c", "d"])
            .build()
    }

    #[test]
    fn test_from_groups_builds_simple_and_composite_slides() {
        let catalog = catalog();
        let slides =
            SlideSet::from_groups(&catalog, [vec![pi(0)], vec![pi(2), pi(1)]]).expect("valid");

        assert_eq!(slides.len(), 2);
        assert!(slides.slide(SlideIndex::new(0)).is_simple());

        let composite = slides.slide(SlideIndex::new(1));
        assert!(composite.is_composite());
        assert_eq!(composite.photos(), &[pi(1), pi(2)]);
        assert_eq!(composite.num_tags(), 3);
        assert!(slides.validate(&catalog).is_ok());
        assert_eq!(slides.num_photos(), 3);
    }

    #[test]
    fn test_from_groups_rejects_malformed_groups() {
        let catalog = catalog();
        let cases: Vec<(Vec<PhotoIndex>, SlideError)> = vec![
            (vec![], SlideError::EmptySlide { slide: 0 }),
            (
                vec![pi(9)],
                SlideError::UnknownPhoto {
                    slide: 0,
                    photo: pi(9),
                },
            ),
            (
                vec![pi(1)],
                SlideError::LoneVertical {
                    slide: 0,
                    photo: pi(1),
                },
            ),
            (
                vec![pi(1), pi(1)],
                SlideError::DuplicatePhoto {
                    slide: 0,
                    photo: pi(1),
                },
            ),
            (
                vec![pi(0), pi(1)],
                SlideError::HorizontalInComposite {
                    slide: 0,
                    photo: pi(0),
                },
            ),
            (
                vec![pi(0), pi(1), pi(2)],
                SlideError::TooManyPhotos { slide: 0, count: 3 },
            ),
        ];

        for (group, expected) in cases {
            let res = SlideSet::from_groups(&catalog, [group]);
            assert_eq!(res, Err(expected));
        }
    }

    #[test]
    fn test_validate_rejects_slides_from_another_catalog() {
        let big = catalog();
        let slides = SlideSet::from_groups(&big, [vec![pi(1), pi(2)]]).expect("valid");

        let small = PhotoCatalogBuilder::new()
            .photo(Orientation::Horizontal, ["a"])
            .build();
        assert_eq!(
            slides.validate(&small),
            Err(SlideError::UnknownPhoto {
                slide: 0,
                photo: pi(1)
            })
        );
    }

    #[test]
    fn test_shares_photo_with() {
        let catalog = PhotoCatalogBuilder::new()
            .photo(Orientation::Vertical, ["a"])
            .photo(Orientation::Vertical, ["b"])
            .photo(Orientation::Vertical, ["c"])
            .build();
        let slides =
            SlideSet::from_groups(&catalog, [vec![pi(0), pi(1)], vec![pi(1), pi(2)]]).unwrap();
        let (a, b) = (slides.slide(0.into()), slides.slide(1.into()));
        assert!(a.shares_photo_with(b));
        assert_eq!(slides.score(0.into(), 1.into()), 1);
    }

    #[test]
    fn test_display() {
        let catalog = catalog();
        let slides = SlideSet::from_groups(&catalog, [vec![pi(1), pi(2)]]).unwrap();
        assert_eq!(
            format!("{}", slides.slide(0.into())),
            "Slide(0: [1 2], 3 tags)"
        );
        assert_eq!(
            format!("{}", slides),
            "SlideSet(slides: 1, simple: 0, composite: 1)"
        );
    }
}
