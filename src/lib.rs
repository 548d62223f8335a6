//! nfold: higher-dimensional diagrammatic rewriting.
//!
//! This crate is the computational core for building and manipulating
//! diagrams in a strict n-category presented by generating cells:
//! - Construction from generators, with coherence validation.
//! - Slicing: cross-sections at any regular or singular height.
//! - Rewrite application, forward and backward, checked and unchecked.
//! - Embedding search: every occurrence of one diagram inside another.
//! - Attachment: gluing a diagram onto the source or target of another.
//!
//! # Mathematical Foundations
//!
//! An n-dimensional diagram is a source diagram of dimension `n - 1` followed
//! by a sequence of cospans. Each cospan rewrites a regular slice into a
//! singular slice and back out to the next regular slice. Rewrites between
//! n-dimensional diagrams are batches of cones, each collapsing a run of
//! cospans into one. Every value is immutable and structurally shared.
//!
//! # References
//!
//! - Dorn, Douglas, Vicary. "Associative n-categories" (2018)
//! - Reutter, Vicary. "High-level methods for homotopy construction in associative n-categories" (2019)
//! - Street, R. "The algebra of oriented simplexes" (1987)
//!
//! # Example
//!
//! ```
//! use nfold::prelude::*;
//!
//! let x = Generator::new(0, 0);
//! let f = DiagramN::from_generator(x, x, Generator::new(1, 1)).unwrap();
//! let ff = f.attach(&f, Boundary::Target, &[]).unwrap();
//! assert_eq!(ff.size(), 2);
//! assert_eq!(enumerate_embeddings(&f.into(), &ff.into()).count(), 2);
//! ```

pub mod attach;
pub mod boundary;
pub mod constants;
pub mod core;
pub mod diagram;
pub mod embedding;
pub mod fingerprint;
pub mod rewrite;

pub use crate::attach::{attach, AttachError};
pub use crate::boundary::Boundary;
pub use crate::core::{Generator, Height, SliceIndex};
pub use crate::diagram::{Diagram, DiagramError, DiagramN, Slices};
pub use crate::embedding::{check_embedding, enumerate_embeddings, Embedding, Embeddings};
pub use crate::fingerprint::{Fingerprint, HashValue};
pub use crate::rewrite::{Cone, Cospan, Rewrite, Rewrite0, RewriteError, RewriteN};

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::attach::{attach, AttachError};
    pub use crate::boundary::Boundary;
    pub use crate::core::{Generator, Height, SliceIndex};
    pub use crate::diagram::{Diagram, DiagramError, DiagramN};
    pub use crate::embedding::{check_embedding, enumerate_embeddings, Embedding};
    pub use crate::fingerprint::Fingerprint;
    pub use crate::rewrite::{Cone, Cospan, Rewrite, Rewrite0, RewriteN};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    /// Generators of the associator: a point, an endo-arrow, a
    /// multiplication 2-cell and the associator 3-cell.
    struct Signature {
        x: Generator,
        f: Generator,
        m: Generator,
        a: Generator,
    }

    fn signature() -> Signature {
        Signature {
            x: Generator::new(0, 0),
            f: Generator::new(1, 1),
            m: Generator::new(2, 2),
            a: Generator::new(3, 3),
        }
    }

    /// Builds every stage of the associator, returning `(m·(m⊗1), m·(1⊗m), α)`.
    fn associator() -> (DiagramN, DiagramN, DiagramN) {
        let s = signature();
        let f = DiagramN::from_generator(s.x, s.x, s.f).unwrap();
        let ff = attach(Boundary::Target, &[], &f, &f).unwrap();
        let m = DiagramN::from_generator(ff, f, s.m).unwrap();
        let left = attach(Boundary::Source, &[0], &m, &m).unwrap();
        let right = attach(Boundary::Source, &[1], &m, &m).unwrap();
        let alpha = DiagramN::from_generator(left.clone(), right.clone(), s.a).unwrap();
        (left, right, alpha)
    }

    /// Test the worked associator scenario end to end.
    #[test]
    fn associator_scenario() {
        let (left, right, alpha) = associator();
        assert_eq!(alpha.dimension(), 3);
        assert_eq!(alpha.size(), 1);
        assert_eq!(alpha.source(), &Diagram::from(left.clone()));
        assert_eq!(alpha.target(), Diagram::from(right.clone()));
        // Both sides are fff → ff → f.
        assert_eq!(left.source(), right.source());
        assert_eq!(left.target(), right.target());
        assert_ne!(left, right);
    }

    /// Test that every stage of the scenario passes the validating constructor.
    #[test]
    fn associator_stages_are_coherent() {
        let (left, right, alpha) = associator();
        for d in [&left, &right, &alpha] {
            let rebuilt = DiagramN::new(d.source().clone(), d.cospans().to_vec())
                .expect("stage must be coherent");
            assert_eq!(&rebuilt, d);
        }
    }

    /// Test the singular content of the associator's source.
    #[test]
    fn associator_singular_slices() {
        let s = signature();
        let (left, _, alpha) = associator();
        assert_eq!(alpha.singular_slices().len(), 1);
        let heights: Vec<Option<usize>> = left
            .singular_slices()
            .iter()
            .map(|slice| slice.to_n().map(DiagramN::size))
            .collect();
        // m acting on the first two strands leaves `m f`, then `m`.
        assert_eq!(heights, vec![Some(2), Some(1)]);
        let top = alpha
            .slice(Height::Singular(0))
            .and_then(|slice| slice.to_n().cloned())
            .expect("singular slice exists");
        assert_eq!(top.size(), 1);
        let bottom = top
            .slice(Height::Singular(0))
            .and_then(|slice| slice.to_n().cloned())
            .and_then(|slice| slice.slice(Height::Singular(0)))
            .and_then(|slice| slice.to_generator());
        assert_eq!(bottom, Some(s.a));
    }

    /// Test that the multiplication occurs in both sides exactly where it was glued.
    #[test]
    fn associator_embeddings() {
        let s = signature();
        let f = DiagramN::from_generator(s.x, s.x, s.f).unwrap();
        let ff = attach(Boundary::Target, &[], &f, &f).unwrap();
        let m = Diagram::from(DiagramN::from_generator(ff, f, s.m).unwrap());
        let (left, right, _) = associator();
        let in_left: Vec<_> = enumerate_embeddings(&m, &left.into()).collect();
        let in_right: Vec<_> = enumerate_embeddings(&m, &right.into()).collect();
        assert_eq!(in_left, vec![vec![0, 0], vec![1, 0]]);
        assert_eq!(in_right, vec![vec![0, 1], vec![1, 0]]);
    }

    /// Test that the 3-cell contains its own all-zero embedding and a point
    /// everywhere its deepest source has a regular slice.
    #[test]
    fn associator_self_embedding() {
        let s = signature();
        let (_, _, alpha) = associator();
        let alpha = Diagram::from(alpha);
        let found: Vec<_> = enumerate_embeddings(&alpha, &alpha).collect();
        assert!(found.contains(&vec![0, 0, 0]));
        assert!(check_embedding(&[0, 0, 0], &alpha, &alpha));
        let points = enumerate_embeddings(&s.x.into(), &alpha).count();
        assert!(points > 0);
    }

    /// Every coordinate path of length `len` with entries in `0..=bound`.
    fn paths(len: usize, bound: usize) -> Vec<Embedding> {
        (0..len).fold(vec![Vec::new()], |acc, _| {
            acc.into_iter()
                .flat_map(|prefix| {
                    (0..=bound).map(move |c| {
                        let mut path = prefix.clone();
                        path.push(c);
                        path
                    })
                })
                .collect()
        })
    }

    /// Test that `check_embedding` accepts exactly the enumerated embeddings,
    /// for every pair of associator stages and every short coordinate path.
    #[test]
    fn associator_check_agrees_with_enumeration() {
        let s = signature();
        let f = DiagramN::from_generator(s.x, s.x, s.f).unwrap();
        let ff = attach(Boundary::Target, &[], &f, &f).unwrap();
        let m = DiagramN::from_generator(ff.clone(), f.clone(), s.m).unwrap();
        let (left, right, alpha) = associator();
        let stages: Vec<Diagram> = vec![
            s.x.into(),
            f.into(),
            ff.into(),
            m.into(),
            left.into(),
            right.into(),
            alpha.into(),
        ];
        // No slice of any stage has more than three cospans.
        let bound = 4;

        for haystack in &stages {
            for needle in &stages {
                let found: Vec<Embedding> = enumerate_embeddings(needle, haystack).collect();
                for embedding in &found {
                    assert_eq!(embedding.len(), haystack.dimension());
                    assert!(embedding.iter().all(|&c| c < bound));
                }
                for len in 0..=haystack.dimension() + 1 {
                    for path in paths(len, bound) {
                        assert_eq!(
                            check_embedding(&path, needle, haystack),
                            found.contains(&path),
                            "{path:?} of {needle:?} in {haystack:?}"
                        );
                    }
                }
            }
        }
    }
}
