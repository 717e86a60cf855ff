//! Helpers that cut a payload into fragments the way a token stream would.
//!
//! Every cut lands on a UTF-8 character boundary, so each fragment is a valid
//! `&str` that can be handed to [`Resolver::parse_chunk`](crate::Resolver::parse_chunk).

use alloc::vec::Vec;

/// Cuts `payload` at the given byte offsets.
///
/// Offsets are sorted, clamped to the payload length, and moved forward to
/// the next character boundary; empty fragments are dropped.
///
/// ```
/// use jsonresolve::split_at_offsets;
///
/// assert_eq!(split_at_offsets("[1,2]", &[3, 1, 99]), ["[", "1,", "2]"]);
/// ```
#[must_use]
pub fn split_at_offsets<'a>(payload: &'a str, offsets: &[usize]) -> Vec<&'a str> {
    let mut cuts: Vec<usize> = offsets
        .iter()
        .map(|&at| ceil_char_boundary(payload, at))
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut fragments = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for end in cuts.into_iter().chain([payload.len()]) {
        if end > start {
            fragments.push(&payload[start..end]);
            start = end;
        }
    }
    fragments
}

/// Split `payload` into `parts` fragments of roughly equal byte length.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &str, parts: usize) -> Vec<&str> {
    assert!(parts > 0, "parts must be positive");
    let size = payload.len().div_ceil(parts).max(1);
    let offsets: Vec<usize> = (1..parts).map(|i| i * size).collect();
    split_at_offsets(payload, &offsets)
}

/// The growing prefixes of `payload` after each of `parts` fragments.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_prefixes(payload: &str, parts: usize) -> Vec<&str> {
    let mut end = 0;
    produce_chunks(payload, parts)
        .into_iter()
        .map(|chunk| {
            end += chunk.len();
            &payload[..end]
        })
        .collect()
}

fn ceil_char_boundary(s: &str, mut at: usize) -> usize {
    if at >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(at) {
        at += 1;
    }
    at
}
