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
    index::{PhotoIndex, TagId},
    tagset,
};

/// Orientation of a photograph.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Parses the single-letter marker used by the input format (`H` or `V`).
    #[inline]
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "H" => Some(Orientation::Horizontal),
            "V" => Some(Orientation::Vertical),
            _ => None,
        }
    }

    /// Returns the single-letter marker of this orientation.
    #[inline]
    pub const fn marker(self) -> char {
        match self {
            Orientation::Horizontal => 'H',
            Orientation::Vertical => 'V',
        }
    }

    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Orientation::Vertical)
    }

    #[inline]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Orientation::Horizontal)
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.marker())
    }
}

/// An immutable photo record.
///
/// The tag set is canonical: sorted by `TagId` with no duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Photo {
    index: PhotoIndex,
    orientation: Orientation,
    tags: Box<[TagId]>,
}

impl Photo {
    /// Creates a photo, canonicalizing `tags`.
    pub fn new(index: PhotoIndex, orientation: Orientation, mut tags: Vec<TagId>) -> Self {
        tagset::canonicalize(&mut tags);
        Self {
            index,
            orientation,
            tags: tags.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn index(&self) -> PhotoIndex {
        self.index
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.orientation.is_vertical()
    }

    /// The canonical tag set of this photo.
    #[inline]
    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    #[inline]
    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }
}

impl std::fmt::Display for Photo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Photo({}, {}, {} tags)",
            self.index.get(),
            self.orientation,
            self.tags.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_round_trip() {
        for o in [Orientation::Horizontal, Orientation::Vertical] {
            let marker = o.marker().to_string();
            assert_eq!(Orientation::from_marker(&marker), Some(o));
        }
        assert_eq!(Orientation::from_marker("h"), None);
        assert_eq!(Orientation::from_marker("X"), None);
    }

    #[test]
    fn test_photo_tags_are_canonical() {
        let photo = Photo::new(
            PhotoIndex::new(0),
            Orientation::Vertical,
            vec![TagId::new(4), TagId::new(1), TagId::new(4)],
        );
        assert_eq!(photo.tags(), &[TagId::new(1), TagId::new(4)]);
        assert_eq!(photo.num_tags(), 2);
        assert!(photo.is_vertical());
    }
}
