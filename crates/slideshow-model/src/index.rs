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

//! Strongly typed indices for photos, slides and tags.
//!
//! Every index space in the slideshow problem is a dense, zero-based range of
//! `usize`. `TypedIndex<T>` wraps the raw value with a phantom tag so that a
//! `PhotoIndex` can never be passed where a `SlideIndex` is expected. The
//! wrapper is `#[repr(transparent)]` and compiles down to a plain `usize`.
//!
//! ```rust
//! use slideshow_model::index::{PhotoIndex, SlideIndex};
//!
//! let photo = PhotoIndex::new(3);
//! let slide = SlideIndex::new(3);
//! assert_eq!(photo.get(), slide.get());
//! assert_eq!(format!("{}", photo), "PhotoIndex(3)");
//! ```

/// Gives a typed index a human-readable name for `Debug` and `Display`.
pub trait IndexTag: Clone {
    const NAME: &'static str;
}

/// A `usize` index tagged with the index space it belongs to.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedIndex<T> {
    /// Creates a new index from its raw value.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the raw value.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: IndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: IndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    #[inline(always)]
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    #[inline(always)]
    fn from(typed_index: TypedIndex<T>) -> Self {
        typed_index.index
    }
}

/// A tag type for photo indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PhotoIndexTag;

impl IndexTag for PhotoIndexTag {
    const NAME: &'static str = "PhotoIndex";
}

/// Position of a photo in the catalog (input order).
pub type PhotoIndex = TypedIndex<PhotoIndexTag>;

/// A tag type for slide indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SlideIndexTag;

impl IndexTag for SlideIndexTag {
    const NAME: &'static str = "SlideIndex";
}

/// Stable identifier of a generated slide.
pub type SlideIndex = TypedIndex<SlideIndexTag>;

/// A tag type for interned tag identifiers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TagIdTag;

impl IndexTag for TagIdTag {
    const NAME: &'static str = "TagId";
}

/// Interned tag string.
pub type TagId = TypedIndex<TagIdTag>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_spaces_format_with_their_names() {
        assert_eq!(format!("{}", PhotoIndex::new(7)), "PhotoIndex(7)");
        assert_eq!(format!("{:?}", SlideIndex::new(0)), "SlideIndex(0)");
        assert_eq!(format!("{}", TagId::new(12)), "TagId(12)");
    }

    #[test]
    fn test_conversions_round_trip_raw_value() {
        let slide: SlideIndex = 42.into();
        assert_eq!(slide.get(), 42);
        let raw: usize = slide.into();
        assert_eq!(raw, 42);
    }

    #[test]
    fn test_ordering_follows_raw_value() {
        let mut tags = vec![TagId::new(3), TagId::new(1), TagId::new(2)];
        tags.sort();
        assert_eq!(tags, vec![TagId::new(1), TagId::new(2), TagId::new(3)]);
    }
}
