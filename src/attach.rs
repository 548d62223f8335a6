//! Attachment: gluing a diagram onto the boundary of a larger one.
//!
//! `attach(boundary, embedding, small, large)` places `small` against the
//! `boundary` end of `large`. When `small` has lower dimension than `large`,
//! the attachment happens inside `large`'s iterated source and every level in
//! between is rebuilt around the enlarged source.
//!
//! # Citations
//! - Pasting composition in globular categories: Leinster, "Higher Operads, Higher Categories", Definition 1.1.2 (2004)
//! - Whiskering: Reutter & Vicary, "High-level methods for homotopy construction in associative n-categories", LICS (2019)

use crate::boundary::Boundary;
use crate::diagram::DiagramN;
use crate::embedding::check_embedding;
use crate::rewrite::Cospan;
use thiserror::Error;
use tracing::{debug, trace};

/// Error type for attachment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AttachError {
    /// The attached diagram has higher dimension than its host.
    #[error("cannot attach a {small}-dimensional diagram onto a {large}-dimensional diagram")]
    DimensionTooHigh {
        /// Dimension of the attached diagram.
        small: usize,
        /// Dimension of the host diagram.
        large: usize,
    },
    /// The embedding does not place the attached diagram's facing boundary
    /// inside the host's boundary.
    #[error("embedding {embedding:?} does not place the attached diagram on the {boundary} boundary")]
    BoundaryMismatch {
        /// Boundary of the host being attached to.
        boundary: Boundary,
        /// The rejected embedding.
        embedding: Vec<usize>,
    },
}

/// Glues `small` onto the `boundary` end of `large`, positioned by `embedding`.
///
/// `embedding` locates `small`'s facing boundary (its target when attaching
/// to the source, its source when attaching to the target) inside the
/// corresponding boundary of `large`'s iterated source of the same dimension
/// as `small`.
pub fn attach(
    boundary: Boundary,
    embedding: &[usize],
    small: &DiagramN,
    large: &DiagramN,
) -> Result<DiagramN, AttachError> {
    let Some(depth) = large.dimension().checked_sub(small.dimension()) else {
        debug!(
            small = small.dimension(),
            large = large.dimension(),
            "rejected attachment of higher-dimensional diagram"
        );
        return Err(AttachError::DimensionTooHigh {
            small: small.dimension(),
            large: large.dimension(),
        });
    };

    match attach_at_depth(boundary, embedding, small, large, depth) {
        Ok(diagram) => {
            trace!(%boundary, depth, size = diagram.size(), "attached diagram");
            Ok(diagram)
        }
        Err(e) => {
            debug!(%boundary, depth, error = %e, "rejected attachment");
            Err(e)
        }
    }
}

fn attach_at_depth(
    boundary: Boundary,
    embedding: &[usize],
    small: &DiagramN,
    large: &DiagramN,
    depth: usize,
) -> Result<DiagramN, AttachError> {
    if depth == 0 {
        return attach_same_dimension(boundary, embedding, small, large);
    }

    let Some(large_source) = large.source().to_n() else {
        // Only reachable when `small` is itself 0-dimensional.
        return Err(AttachError::DimensionTooHigh {
            small: small.dimension(),
            large: large.dimension() - 1,
        });
    };
    let source = attach_at_depth(boundary, embedding, small, large_source, depth - 1)?;

    let cospans = match boundary {
        Boundary::Source => {
            // Everything in `large` now sits `small.size()` further along at
            // the level where `small` was inserted.
            let mut offset = vec![0; depth];
            offset[depth - 1] = small.size();
            large.cospans().iter().map(|c| c.pad(&offset)).collect()
        }
        Boundary::Target => large.cospans().to_vec(),
    };

    Ok(DiagramN::new_unchecked(source.into(), cospans))
}

fn attach_same_dimension(
    boundary: Boundary,
    embedding: &[usize],
    small: &DiagramN,
    large: &DiagramN,
) -> Result<DiagramN, AttachError> {
    let mismatch = || AttachError::BoundaryMismatch {
        boundary,
        embedding: embedding.to_vec(),
    };
    let padded: Vec<Cospan> = small.cospans().iter().map(|c| c.pad(embedding)).collect();

    match boundary {
        Boundary::Source => {
            if !check_embedding(embedding, &small.target(), large.source()) {
                return Err(mismatch());
            }
            // Walk the new cospans backwards from the old source to find the
            // new one.
            let source = padded
                .iter()
                .rev()
                .fold(large.source().clone(), |slice, cospan| cospan.flip().replay(&slice));
            let cospans = padded
                .into_iter()
                .chain(large.cospans().iter().cloned())
                .collect();
            Ok(DiagramN::new_unchecked(source, cospans))
        }
        Boundary::Target => {
            if !check_embedding(embedding, small.source(), &large.target()) {
                return Err(mismatch());
            }
            let cospans = large.cospans().iter().cloned().chain(padded).collect();
            Ok(DiagramN::new_unchecked(large.source().clone(), cospans))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Generator;
    use crate::diagram::Diagram;

    fn x() -> Generator {
        Generator::new(0, 0)
    }

    fn arrow() -> DiagramN {
        DiagramN::from_generator(x(), x(), Generator::new(1, 1)).unwrap()
    }

    /// `m : f·f → f`.
    fn multiplication() -> DiagramN {
        let ff = arrow().attach(&arrow(), Boundary::Target, &[]).unwrap();
        DiagramN::from_generator(ff, arrow(), Generator::new(2, 2)).unwrap()
    }

    /// `α : m·(m⊗1) → m·(1⊗m)`.
    fn associator() -> DiagramN {
        let m = multiplication();
        let left = attach(Boundary::Source, &[0], &m, &m).unwrap();
        let right = attach(Boundary::Source, &[1], &m, &m).unwrap();
        DiagramN::from_generator(left, right, Generator::new(3, 3)).unwrap()
    }

    fn assert_coherent(d: &DiagramN) {
        assert!(
            DiagramN::new(d.source().clone(), d.cospans().to_vec()).is_ok(),
            "attachment produced an incoherent diagram"
        );
    }

    #[test]
    fn compose_arrows_on_either_end() {
        let ff = attach(Boundary::Target, &[], &arrow(), &arrow()).unwrap();
        assert_eq!(ff.size(), 2);
        assert_coherent(&ff);
        let ff_source = attach(Boundary::Source, &[], &arrow(), &arrow()).unwrap();
        assert_eq!(ff_source, ff);
    }

    #[test]
    fn higher_dimensional_small_is_rejected() {
        let err = attach(Boundary::Target, &[0], &multiplication(), &arrow()).unwrap_err();
        assert_eq!(err, AttachError::DimensionTooHigh { small: 2, large: 1 });
    }

    #[test]
    fn mismatched_boundary_is_rejected() {
        let y = Generator::new(9, 0);
        let other = DiagramN::from_generator(y, y, Generator::new(3, 1)).unwrap();
        let err = attach(Boundary::Target, &[], &other, &arrow()).unwrap_err();
        assert!(matches!(err, AttachError::BoundaryMismatch { boundary: Boundary::Target, .. }));
    }

    #[test]
    fn embedding_past_the_boundary_dimension_is_rejected() {
        let err = attach(Boundary::Target, &[42, 9], &arrow(), &arrow()).unwrap_err();
        assert_eq!(
            err,
            AttachError::BoundaryMismatch {
                boundary: Boundary::Target,
                embedding: vec![42, 9],
            }
        );
        let err = attach(Boundary::Source, &[0, 0], &multiplication(), &multiplication());
        assert!(matches!(err, Err(AttachError::BoundaryMismatch { .. })));
    }

    #[test]
    fn source_attachment_recomputes_the_source() {
        let m = multiplication();
        // Precompose m with another m on the first two strands: fff → ff → f.
        let mm = attach(Boundary::Source, &[0], &m, &m).unwrap();
        assert_eq!(mm.size(), 2);
        assert_coherent(&mm);
        let fff = Diagram::from(
            arrow()
                .attach(&arrow(), Boundary::Target, &[])
                .and_then(|ff| ff.attach(&arrow(), Boundary::Target, &[]))
                .unwrap(),
        );
        assert_eq!(mm.source(), &fff);
        assert_eq!(mm.target(), Diagram::from(arrow()));
    }

    #[test]
    fn whiskering_on_the_source_shifts_existing_cones() {
        let m = multiplication();
        let whiskered = attach(Boundary::Source, &[], &arrow(), &m).unwrap();
        assert_eq!(whiskered.dimension(), 2);
        assert_eq!(whiskered.size(), 1);
        assert_eq!(whiskered.source().to_n().map(DiagramN::size), Some(3));
        assert_eq!(whiskered.target().to_n().map(DiagramN::size), Some(2));
        assert_coherent(&whiskered);
    }

    #[test]
    fn whiskering_on_the_target_leaves_cones_in_place() {
        let m = multiplication();
        let whiskered = attach(Boundary::Target, &[], &arrow(), &m).unwrap();
        assert_eq!(whiskered.cospans(), m.cospans());
        assert_eq!(whiskered.source().to_n().map(DiagramN::size), Some(3));
        assert_eq!(whiskered.target().to_n().map(DiagramN::size), Some(2));
        assert_coherent(&whiskered);
    }

    #[test]
    fn depth_two_whiskering_on_the_source() {
        let alpha = associator();
        let whiskered = attach(Boundary::Source, &[], &arrow(), &alpha).unwrap();
        assert_eq!(whiskered.dimension(), 3);
        assert_eq!(whiskered.size(), 1);
        assert_coherent(&whiskered);

        let source = whiskered.source().to_n().cloned().unwrap();
        assert_coherent(&source);
        assert_eq!(source.size(), 2);
        assert_eq!(source.source().to_n().map(DiagramN::size), Some(4));
        assert_eq!(source.target().to_n().map(DiagramN::size), Some(2));

        let target = whiskered.target().to_n().cloned().unwrap();
        assert_coherent(&target);
        assert_eq!(target.size(), 2);
        assert_eq!(target.source(), source.source());
    }

    #[test]
    fn depth_two_whiskering_on_the_target() {
        let alpha = associator();
        let left = alpha.source().to_n().cloned().unwrap();
        let right = alpha.target().to_n().cloned().unwrap();
        let whiskered = attach(Boundary::Target, &[], &arrow(), &alpha).unwrap();
        assert_eq!(whiskered.cospans(), alpha.cospans());
        assert_coherent(&whiskered);
        assert_eq!(
            whiskered.source(),
            &Diagram::from(attach(Boundary::Target, &[], &arrow(), &left).unwrap())
        );
        assert_eq!(
            whiskered.target(),
            Diagram::from(attach(Boundary::Target, &[], &arrow(), &right).unwrap())
        );
    }
}
