//! Embedding search: locating occurrences of one diagram inside another.
//!
//! An embedding is a coordinate path into a haystack of dimension `n`, of
//! length `n`. Its head is a regular height of the haystack; its tail embeds
//! into the regular slice at that height. A needle of equal dimension must
//! additionally match, cospan for cospan, the run of the haystack starting at
//! the head once its own cospans are relocated by the tail.
//!
//! # Complexity
//! The search is exhaustive and unmemoized: it tries every regular height at
//! every level, so its worst case is exponential in the number of regular
//! slices times the recursion depth. This is fine for interactively sized
//! diagrams and not safe for adversarial input sizes.
//!
//! # Citations
//! - Subgraph matching by backtracking: Ullmann, "An algorithm for subgraph isomorphism" (1976)
//! - Reutter & Vicary, "High-level methods for homotopy construction in associative n-categories", LICS (2019)

use crate::core::Height;
use crate::diagram::{Diagram, DiagramN};
use std::fmt;
use std::iter;
use tracing::trace;

/// A coordinate path locating a needle inside a haystack.
pub type Embedding = Vec<usize>;

/// Checks whether `needle` occurs in `haystack` at `embedding`.
pub fn check_embedding(embedding: &[usize], needle: &Diagram, haystack: &Diagram) -> bool {
    let haystack = match haystack {
        Diagram::Diagram0(h) => {
            return embedding.is_empty() && matches!(needle, Diagram::Diagram0(n) if n == h)
        }
        Diagram::DiagramN(h) => h,
    };
    if needle.dimension() > haystack.dimension() {
        return false;
    }
    let Some((&height, tail)) = embedding.split_first() else {
        return false;
    };
    let Some(slice) = haystack.slice(Height::Regular(height)) else {
        return false;
    };
    match needle {
        Diagram::DiagramN(needle) if needle.dimension() == haystack.dimension() => {
            cospans_match(needle, haystack, height, tail)
                && check_embedding(tail, needle.source(), &slice)
        }
        _ => check_embedding(tail, needle, &slice),
    }
}

/// Enumerates every embedding of `needle` into `haystack`.
///
/// Embeddings are produced lazily, in lexicographic order of their heights.
/// An empty iterator means there is no occurrence.
pub fn enumerate_embeddings(needle: &Diagram, haystack: &Diagram) -> Embeddings {
    Embeddings::new(needle.clone(), haystack.clone())
}

/// Whether `needle`'s cospans, relocated by `tail`, equal the run of
/// `haystack`'s cospans starting at `height`.
fn cospans_match(needle: &DiagramN, haystack: &DiagramN, height: usize, tail: &[usize]) -> bool {
    let end = height + needle.size();
    end <= haystack.size()
        && needle
            .cospans()
            .iter()
            .zip(&haystack.cospans()[height..end])
            .all(|(n, h)| n.pad(tail) == *h)
}

type EmbeddingIter = Box<dyn Iterator<Item = Embedding>>;

fn search(needle: Diagram, haystack: Diagram) -> EmbeddingIter {
    let haystack = match haystack {
        Diagram::Diagram0(h) => {
            return if matches!(needle, Diagram::Diagram0(n) if n == h) {
                Box::new(iter::once(Vec::new()))
            } else {
                Box::new(iter::empty())
            };
        }
        Diagram::DiagramN(h) => h,
    };
    if needle.dimension() > haystack.dimension() {
        return Box::new(iter::empty());
    }

    // For a needle of equal dimension, recurse on its source and keep only
    // placements whose cospans line up.
    let needle_n = needle
        .to_n()
        .filter(|n| n.dimension() == haystack.dimension())
        .cloned();
    let inner = match &needle_n {
        Some(n) => n.source().clone(),
        None => needle,
    };
    trace!(
        needle = inner.dimension(),
        haystack = haystack.dimension(),
        "searching regular slices"
    );

    let slices = haystack.slices().step_by(2).enumerate();
    Box::new(slices.flat_map(move |(height, slice)| -> EmbeddingIter {
        if let Some(n) = &needle_n {
            if height + n.size() > haystack.size() {
                return Box::new(iter::empty());
            }
        }
        let needle_n = needle_n.clone();
        let haystack = haystack.clone();
        Box::new(
            search(inner.clone(), slice)
                .filter(move |tail| {
                    needle_n
                        .as_ref()
                        .map_or(true, |n| cospans_match(n, &haystack, height, tail))
                })
                .map(move |tail| {
                    let mut embedding = Vec::with_capacity(tail.len() + 1);
                    embedding.push(height);
                    embedding.extend(tail);
                    embedding
                }),
        )
    }))
}

/// Lazy iterator over embeddings, see [`enumerate_embeddings`].
///
/// Owns its inputs; [`Embeddings::restart`] rewinds it to the first embedding.
pub struct Embeddings {
    needle: Diagram,
    haystack: Diagram,
    inner: EmbeddingIter,
}

impl Embeddings {
    /// Starts a search for `needle` in `haystack`.
    pub fn new(needle: Diagram, haystack: Diagram) -> Self {
        let inner = search(needle.clone(), haystack.clone());
        Self {
            needle,
            haystack,
            inner,
        }
    }

    /// Rewinds the search to its first embedding.
    pub fn restart(&mut self) {
        self.inner = search(self.needle.clone(), self.haystack.clone());
    }
}

impl Iterator for Embeddings {
    type Item = Embedding;

    fn next(&mut self) -> Option<Embedding> {
        self.inner.next()
    }
}

impl fmt::Debug for Embeddings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Embeddings")
            .field("needle", &self.needle)
            .field("haystack", &self.haystack)
            .finish_non_exhaustive()
    }
}
