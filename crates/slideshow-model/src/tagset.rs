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

//! Operations on sorted, deduplicated tag sets.
//!
//! Photos and slides store their tags as ascending `TagId` slices. Keeping the
//! slices sorted turns every set operation the solver needs into a merge or a
//! binary search, with no hashing on the hot path.

use crate::index::TagId;

/// Sorts and deduplicates `tags` in place, producing a canonical tag set.
#[inline]
pub fn canonicalize(tags: &mut Vec<TagId>) {
    tags.sort_unstable();
    tags.dedup();
}

/// Returns `true` if `tags` is strictly ascending.
#[inline]
pub fn is_canonical(tags: &[TagId]) -> bool {
    tags.windows(2).all(|w| w[0] < w[1])
}

/// Number of tags shared by two canonical tag sets.
///
/// Iterates the smaller set and binary searches the larger one, which costs
/// `O(min(|a|, |b|) * log(max(|a|, |b|)))`.
#[inline]
pub fn intersection_len(a: &[TagId], b: &[TagId]) -> usize {
    debug_assert!(is_canonical(a) && is_canonical(b));

    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if small.is_empty() {
        return 0;
    }

    // Disjoint ranges share nothing.
    if small[small.len() - 1] < large[0] || large[large.len() - 1] < small[0] {
        return 0;
    }

    small
        .iter()
        .filter(|tag| large.binary_search(tag).is_ok())
        .count()
}

/// Size of the union of two canonical tag sets.
#[inline]
pub fn union_len(a: &[TagId], b: &[TagId]) -> usize {
    a.len() + b.len() - intersection_len(a, b)
}

/// Merges two canonical tag sets into their canonical union.
pub fn union(a: &[TagId], b: &[TagId]) -> Vec<TagId> {
    debug_assert!(is_canonical(a) && is_canonical(b));

    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}
