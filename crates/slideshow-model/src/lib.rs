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

//! # Slideshow Model
//!
//! **The domain model of the slideshow optimizer.**
//!
//! This crate holds everything that describes a slideshow instance and its
//! solutions, independent of how the solution is searched for:
//!
//! * **`index`**: Strongly typed indices (`PhotoIndex`, `SlideIndex`, `TagId`).
//! * **`catalog`** and **`photo`**: The immutable photo catalog with interned tags.
//! * **`loading`**: `CatalogLoader`, parsing the line-based photo list.
//! * **`slide`** and **`generator`**: Slide candidates. Every horizontal photo
//!   becomes a simple slide; vertical photos are paired into composite slides.
//! * **`score`** and **`tagset`**: The transition score `min(|A ∩ B|, |A \ B|, |B \ A|)`
//!   on sorted tag sets.
//! * **`sequence`**: An ordered, photo-disjoint slide selection and its score.
//! * **`report`**: The solution report written to the output file.
//!
//! Catalogs and slide sets are built once and never mutated afterwards, so they
//! can be shared by reference across any number of search threads.

pub mod catalog;
pub mod generator;
pub mod index;
pub mod loading;
pub mod photo;
pub mod report;
pub mod score;
pub mod sequence;
pub mod slide;
pub mod tagset;
