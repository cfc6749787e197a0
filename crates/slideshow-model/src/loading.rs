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

//! Photo catalog loader.
//!
//! This module turns the line-oriented photo list into a `PhotoCatalog`. The
//! first non-blank line carries the photo count `N`; each of the following `N`
//! non-blank lines describes one photo:
//!
//! ```raw
//! N
//! <H|V> <tag count> <tag 1> ... <tag k>
//! ...
//! ```
//!
//! Photo ids are assigned in file order, starting at zero. Blank lines are
//! skipped everywhere, and every error reports the 1-based line it was found
//! on so malformed inputs can be fixed quickly. By default the declared tag
//! count must match the number of listed tags; `lenient_tag_count` relaxes
//! that check and trusts the listed tags instead.

use crate::{
    catalog::{PhotoCatalog, PhotoCatalogBuilder},
    photo::Orientation,
};
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

/// The error type for the catalog loading process.
#[derive(Debug)]
pub enum LoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input contains no photo count line.
    MissingHeader,
    /// The photo count is not a non-negative integer.
    InvalidPhotoCount { token: String },
    /// The input ended before all announced photos were read.
    UnexpectedEof { expected: usize, found: usize },
    /// The orientation marker is neither `H` nor `V`.
    InvalidOrientation { line: usize, token: String },
    /// The tag count is missing or not a non-negative integer.
    Parse { line: usize, token: String },
    /// The declared tag count differs from the number of listed tags.
    TagCountMismatch {
        line: usize,
        declared: usize,
        found: usize,
    },
    /// Non-blank content follows the last announced photo.
    TrailingData { line: usize },
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MissingHeader => write!(f, "Missing photo count on the first line"),
            Self::InvalidPhotoCount { token } => {
                write!(f, "Photo count '{token}' is not a non-negative integer")
            }
            Self::UnexpectedEof { expected, found } => write!(
                f,
                "Unexpected end of input: expected {expected} photos, found {found}"
            ),
            Self::InvalidOrientation { line, token } => write!(
                f,
                "Line {line}: invalid orientation '{token}', expected 'H' or 'V'"
            ),
            Self::Parse { line, token } => write!(
                f,
                "Line {line}: could not parse tag count from '{token}'"
            ),
            Self::TagCountMismatch {
                line,
                declared,
                found,
            } => write!(
                f,
                "Line {line}: declared {declared} tags but listed {found}"
            ),
            Self::TrailingData { line } => {
                write!(f, "Line {line}: unexpected data after the last photo")
            }
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// A configurable loader for photo catalogs.
///
/// # Configuration
/// * `lenient_tag_count`: If true, a declared tag count that differs from the
///   number of listed tags is accepted and the listed tags are used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogLoader {
    lenient_tag_count: bool,
}

impl CatalogLoader {
    /// Creates a new `CatalogLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether a tag count mismatch is tolerated.
    #[inline]
    pub fn lenient_tag_count(mut self, yes: bool) -> Self {
        self.lenient_tag_count = yes;
        self
    }

    /// Loads a catalog from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<PhotoCatalog, LoaderError> {
        let mut lines = LineReader::new(rdr);

        let Some((_, header)) = lines.next_content()? else {
            return Err(LoaderError::MissingHeader);
        };
        let header = header.trim();
        let expected: usize = header
            .parse()
            .map_err(|_| LoaderError::InvalidPhotoCount {
                token: header.to_owned(),
            })?;

        // The count is untrusted; do not reserve more than a sane amount up front.
        let mut builder = PhotoCatalogBuilder::with_capacity(expected.min(1 << 16));

        for found in 0..expected {
            let Some((line, content)) = lines.next_content()? else {
                return Err(LoaderError::UnexpectedEof { expected, found });
            };
            let (orientation, tags) = self.parse_photo(line, &content)?;
            builder.add_photo(orientation, tags);
        }

        if let Some((line, _)) = lines.next_content()? {
            return Err(LoaderError::TrailingData { line });
        }

        Ok(builder.build())
    }

    /// Loads a catalog from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<PhotoCatalog, LoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a catalog from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<PhotoCatalog, LoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a catalog from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<PhotoCatalog, LoaderError> {
        self.from_reader(s.as_bytes())
    }

    fn parse_photo<'a>(
        &self,
        line: usize,
        content: &'a str,
    ) -> Result<(Orientation, Vec<&'a str>), LoaderError> {
        let mut tokens = content.split_whitespace();

        // `next_content` never yields blank lines, so the marker is present.
        let marker = tokens.next().unwrap_or_default();
        let orientation =
            Orientation::from_marker(marker).ok_or_else(|| LoaderError::InvalidOrientation {
                line,
                token: marker.to_owned(),
            })?;

        let count_token = tokens.next().unwrap_or_default();
        let declared: usize = count_token.parse().map_err(|_| LoaderError::Parse {
            line,
            token: count_token.to_owned(),
        })?;

        let tags: Vec<&str> = tokens.collect();
        if !self.lenient_tag_count && tags.len() != declared {
            return Err(LoaderError::TagCountMismatch {
                line,
                declared,
                found: tags.len(),
            });
        }

        Ok((orientation, tags))
    }
}

/// Yields non-blank lines together with their 1-based line numbers.
struct LineReader<R> {
    rdr: R,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self { rdr, line: 0 }
    }

    fn next_content(&mut self) -> Result<Option<(usize, String)>, LoaderError> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.rdr.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            if !buf.trim().is_empty() {
                return Ok(Some((self.line, buf)));
            }
        }
    }
}
