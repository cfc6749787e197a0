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

//! Final solution reporting.
//!
//! `SolutionReport` turns the optimizer's sequence into the output contract:
//! the number of slides, the photo ids shown on each slide in sequence order,
//! and the total interest score (recomputed from the slides, not trusted from
//! the sequence). It renders the output file format:
//!
//! ```raw
//! M
//! <photo ids of slide 1>
//! ...
//! <photo ids of slide M>
//! ```

use crate::{
    index::PhotoIndex,
    score::Score,
    sequence::{self, Sequence},
    slide::{SlideSet, SlidePhotos},
};
use std::io::Write;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolutionReport {
    groups: Vec<SlidePhotos>,
    total_score: Score,
}

impl SolutionReport {
    /// Builds the report for `sequence` over `slides`.
    pub fn new(sequence: &Sequence, slides: &SlideSet) -> Self {
        let groups = sequence
            .slides()
            .iter()
            .map(|&s| slides.slide(s).photos().iter().copied().collect())
            .collect();
        let total_score = sequence::score_of(sequence.slides(), slides);

        debug_assert_eq!(
            total_score,
            sequence.score(),
            "called `SolutionReport::new` with a sequence whose recorded score is stale"
        );

        Self {
            groups,
            total_score,
        }
    }

    /// Number of slides in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Photo ids per slide, in sequence order.
    #[inline]
    pub fn groups(&self) -> &[SlidePhotos] {
        &self.groups
    }

    #[inline]
    pub fn total_score(&self) -> Score {
        self.total_score
    }

    /// Iterates the photo groups as plain slices.
    pub fn iter(&self) -> impl Iterator<Item = &[PhotoIndex]> {
        self.groups.iter().map(|g| g.as_slice())
    }

    /// Writes the output file format to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()
    }

    /// Renders the output file format into a string.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for SolutionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.groups.len())?;
        for group in &self.groups {
            for (i, photo) in group.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", photo.get())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
