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

//! The photo catalog and its tag dictionary.
//!
//! A `PhotoCatalog` is built once, through `PhotoCatalogBuilder`, and is
//! immutable afterwards. Tag strings are interned into dense `TagId`s so that
//! everything downstream (slides, scoring, the optimizer's inverted index)
//! operates on integers. Photo indices are assigned in insertion order.

use crate::{
    index::{PhotoIndex, TagId},
    photo::{Orientation, Photo},
};
use rustc_hash::FxHashMap;

/// Bidirectional mapping between tag strings and `TagId`s.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagDictionary {
    ids: FxHashMap<String, TagId>,
    names: Vec<String>,
}

impl TagDictionary {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `name`, assigning the next free id on first sight.
    pub fn intern(&mut self, name: &str) -> TagId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = TagId::new(self.names.len());
        self.ids.insert(name.to_owned(), id);
        self.names.push(name.to_owned());
        id
    }

    /// Looks up the id of `name` without interning it.
    #[inline]
    pub fn get(&self, name: &str) -> Option<TagId> {
        self.ids.get(name).copied()
    }

    /// Returns the string behind `id`, if it was issued by this dictionary.
    #[inline]
    pub fn name(&self, id: TagId) -> Option<&str> {
        self.names.get(id.get()).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Immutable collection of photos indexed by `PhotoIndex`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhotoCatalog {
    photos: Vec<Photo>,
    tags: TagDictionary,
}

impl PhotoCatalog {
    /// Creates an empty catalog.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Returns the photo at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn photo(&self, index: PhotoIndex) -> &Photo {
        debug_assert!(
            index.get() < self.photos.len(),
            "called `PhotoCatalog::photo` with photo index out of bounds: the len is {} but the index is {}",
            self.photos.len(),
            index.get()
        );
        &self.photos[index.get()]
    }

    #[inline]
    pub fn get(&self, index: PhotoIndex) -> Option<&Photo> {
        self.photos.get(index.get())
    }

    #[inline]
    pub fn contains(&self, index: PhotoIndex) -> bool {
        index.get() < self.photos.len()
    }

    #[inline]
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Photo> {
        self.photos.iter()
    }

    #[inline]
    pub fn tags(&self) -> &TagDictionary {
        &self.tags
    }

    /// Number of distinct tags across all photos.
    #[inline]
    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }

    pub fn num_horizontal(&self) -> usize {
        self.photos.iter().filter(|p| !p.is_vertical()).count()
    }

    pub fn num_vertical(&self) -> usize {
        self.photos.iter().filter(|p| p.is_vertical()).count()
    }

    /// Resolves the tag names of a photo, in `TagId` order.
    pub fn tag_names(&self, index: PhotoIndex) -> Vec<&str> {
        self.photo(index)
            .tags()
            .iter()
            .filter_map(|&t| self.tags.name(t))
            .collect()
    }
}

impl<'a> IntoIterator for &'a PhotoCatalog {
    type Item = &'a Photo;
    type IntoIter = std::slice::Iter<'a, Photo>;

    fn into_iter(self) -> Self::IntoIter {
        self.photos.iter()
    }
}

impl std::fmt::Display for PhotoCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PhotoCatalog(photos: {}, horizontal: {}, vertical: {}, tags: {})",
            self.len(),
            self.num_horizontal(),
            self.num_vertical(),
            self.num_tags()
        )
    }
}

/// Mutable builder for a `PhotoCatalog`.
#[derive(Clone, Debug, Default)]
pub struct PhotoCatalogBuilder {
    photos: Vec<Photo>,
    tags: TagDictionary,
}

impl PhotoCatalogBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with room for `num_photos` photos.
    #[inline]
    pub fn with_capacity(num_photos: usize) -> Self {
        Self {
            photos: Vec::with_capacity(num_photos),
            tags: TagDictionary::new(),
        }
    }

    /// Appends a photo and returns its index. Repeated tags collapse into one.
    pub fn add_photo<I, S>(&mut self, orientation: Orientation, tags: I) -> PhotoIndex
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let index = PhotoIndex::new(self.photos.len());
        let ids = tags
            .into_iter()
            .map(|t| self.tags.intern(t.as_ref()))
            .collect();
        self.photos.push(Photo::new(index, orientation, ids));
        index
    }

    /// Chaining variant of `add_photo`.
    #[inline]
    pub fn photo<I, S>(mut self, orientation: Orientation, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_photo(orientation, tags);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    #[inline]
    pub fn build(self) -> PhotoCatalog {
        PhotoCatalog {
            photos: self.photos,
            tags: self.tags,
        }
    }
}
