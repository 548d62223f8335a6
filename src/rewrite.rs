//! Rewrites between the top structure of diagrams.
//!
//! A rewrite transforms one diagram into another of the same dimension:
//! - `Rewrite0` substitutes one generator for another (dimension 0).
//! - `RewriteI` is the identity on 0-dimensional diagrams.
//! - `RewriteN` is a batch of non-overlapping, index-ordered [`Cone`]s, each
//!   collapsing a contiguous run of cospans into a single cospan.
//!
//! Rewrites can be applied forward (collapse) or backward (expand). Each
//! direction comes in two tiers: a checked variant that verifies every span it
//! splices, used by the validating diagram constructor, and an unchecked
//! crate-internal variant used once a diagram is known to be coherent.
//!
//! # Citations
//! - Dorn, Douglas, Vicary, "Associative n-categories" (2018) – zigzags and cones
//! - Reutter & Vicary, "High-level methods for homotopy construction in associative n-categories", LICS (2019)

use crate::constants;
use crate::core::Generator;
use crate::diagram::{Diagram, DiagramN};
use crate::fingerprint::{CanonicalBytes, Fingerprint, HashValue};
use std::sync::Arc;
use thiserror::Error;

/// Error type for checked rewrite application.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// The rewrite acts on diagrams of a different dimension.
    #[error("rewrite of dimension {rewrite} cannot act on a diagram of dimension {diagram}")]
    DimensionMismatch {
        /// Dimension the rewrite acts on.
        rewrite: usize,
        /// Dimension of the diagram it was applied to.
        diagram: usize,
    },
    /// A 0-dimensional substitution was applied to the wrong generator.
    #[error("expected generator {expected}, found {found}")]
    GeneratorMismatch {
        /// Generator the substitution consumes.
        expected: Generator,
        /// Generator actually present.
        found: Generator,
    },
    /// A cone reaches past the end of the cospan sequence.
    #[error("cone at index {index} spans cospans {start}..{end} of a diagram of size {size}")]
    ConeOutOfBounds {
        /// Stated index of the cone.
        index: usize,
        /// Start of the span after offset correction.
        start: usize,
        /// End of the span after offset correction.
        end: usize,
        /// Number of cospans available.
        size: usize,
    },
    /// The cospans a cone collapses differ from its declared source.
    #[error("cone at index {index} does not match the cospans it collapses")]
    ConeSourceMismatch {
        /// Stated index of the cone.
        index: usize,
    },
    /// The cospan a cone expands differs from its declared target.
    #[error("cone at index {index} does not match the cospan it expands")]
    ConeTargetMismatch {
        /// Stated index of the cone.
        index: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Check {
    Verify,
    Trust,
}

/// Substitution of one generator for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rewrite0 {
    /// Generator consumed when applied forward.
    pub source: Generator,
    /// Generator produced when applied forward.
    pub target: Generator,
}

impl Rewrite0 {
    /// Creates a substitution `source ↦ target`.
    #[inline]
    pub const fn new(source: Generator, target: Generator) -> Self {
        Self { source, target }
    }

    /// The substitution in the opposite direction.
    #[inline]
    pub const fn flip(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }
}

/// A rewrite between diagrams of equal dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// 0-dimensional substitution.
    Rewrite0(Rewrite0),
    /// Identity on 0-dimensional diagrams.
    RewriteI,
    /// n-dimensional rewrite, `n ≥ 1`.
    RewriteN(RewriteN),
}

/// An n-dimensional rewrite: index-ordered, non-overlapping cones.
///
/// The cone list is shared between clones.
#[derive(Debug, Clone)]
pub struct RewriteN(Arc<RewriteInternal>);

#[derive(Debug, PartialEq, Eq)]
struct RewriteInternal {
    dimension: usize,
    cones: Vec<Cone>,
}

/// A local rule replacing the run of `source` cospans starting at `index` with
/// the single `target` cospan.
///
/// `index` is stated in the coordinates of the rewrite's source sequence.
/// Forward application shifts it left by the runs collapsed before it;
/// backward application expands cones in order, so each one is found at its
/// stated `index` once the cones before it are expanded.
/// `slices[i]` rewrites the `i`-th singular slice of the run into the singular
/// slice of `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cone {
    /// Position of the run in the rewrite's source sequence.
    pub index: usize,
    /// The run being collapsed.
    pub source: Vec<Cospan>,
    /// The cospan it collapses into.
    pub target: Cospan,
    /// One rewrite per singular slice of the run.
    pub slices: Vec<Rewrite>,
}

/// A regular slice mapping into a singular slice and back out again.
///
/// `forward` takes the preceding regular slice into the singular slice;
/// `backward` takes the following regular slice into the same singular slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cospan {
    /// Rewrite from the preceding regular slice.
    pub forward: Rewrite,
    /// Rewrite from the following regular slice.
    pub backward: Rewrite,
}

impl Rewrite {
    /// The identity rewrite on diagrams of the given dimension.
    pub fn identity(dimension: usize) -> Self {
        if dimension == 0 {
            Rewrite::RewriteI
        } else {
            Rewrite::RewriteN(RewriteN::new(dimension, Vec::new()))
        }
    }

    /// Dimension of the diagrams this rewrite acts on.
    pub fn dimension(&self) -> usize {
        match self {
            Rewrite::Rewrite0(_) | Rewrite::RewriteI => 0,
            Rewrite::RewriteN(r) => r.dimension(),
        }
    }

    /// Whether applying this rewrite leaves every diagram unchanged.
    pub fn is_identity(&self) -> bool {
        match self {
            Rewrite::RewriteI => true,
            Rewrite::Rewrite0(r) => r.source == r.target,
            Rewrite::RewriteN(r) => r.cones().is_empty(),
        }
    }

    /// Relocates this rewrite to a deeper coordinate.
    ///
    /// The head of `embedding` shifts the index of every cone; the tail is
    /// applied recursively to the cones' cospans and slices. 0-dimensional
    /// rewrites carry no coordinates and are returned unchanged.
    pub fn pad(&self, embedding: &[usize]) -> Self {
        match self {
            Rewrite::RewriteN(r) => Rewrite::RewriteN(r.pad(embedding)),
            other => other.clone(),
        }
    }

    /// Applies this rewrite forward, verifying every span it collapses.
    pub fn try_rewrite_forward(&self, diagram: &Diagram) -> Result<Diagram, RewriteError> {
        self.apply(diagram, Direction::Forward, Check::Verify)
    }

    /// Applies this rewrite backward, verifying every cospan it expands.
    pub fn try_rewrite_backward(&self, diagram: &Diagram) -> Result<Diagram, RewriteError> {
        self.apply(diagram, Direction::Backward, Check::Verify)
    }

    /// Applies this rewrite forward to a diagram already known to be valid for it.
    pub(crate) fn rewrite_forward(&self, diagram: &Diagram) -> Diagram {
        self.apply(diagram, Direction::Forward, Check::Trust)
            .unwrap_or_else(|e| invariant_violated(&e))
    }

    /// Applies this rewrite backward to a diagram already known to be valid for it.
    pub(crate) fn rewrite_backward(&self, diagram: &Diagram) -> Diagram {
        self.apply(diagram, Direction::Backward, Check::Trust)
            .unwrap_or_else(|e| invariant_violated(&e))
    }

    fn apply(
        &self,
        diagram: &Diagram,
        direction: Direction,
        check: Check,
    ) -> Result<Diagram, RewriteError> {
        match (self, diagram) {
            (Rewrite::RewriteI, Diagram::Diagram0(_)) => Ok(diagram.clone()),
            (Rewrite::Rewrite0(r), Diagram::Diagram0(found)) => {
                let r = match direction {
                    Direction::Forward => *r,
                    Direction::Backward => r.flip(),
                };
                if check == Check::Verify && *found != r.source {
                    return Err(RewriteError::GeneratorMismatch {
                        expected: r.source,
                        found: *found,
                    });
                }
                Ok(Diagram::Diagram0(r.target))
            }
            (Rewrite::RewriteN(r), Diagram::DiagramN(d)) => {
                r.apply(d, direction, check).map(Diagram::DiagramN)
            }
            // Includes `RewriteI` reaching an n-dimensional diagram, which has
            // no defined meaning.
            _ => Err(RewriteError::DimensionMismatch {
                rewrite: self.dimension(),
                diagram: diagram.dimension(),
            }),
        }
    }
}

#[cold]
fn invariant_violated(error: &RewriteError) -> ! {
    panic!("internal invariant violated: unchecked rewrite on incoherent diagram: {error}")
}

impl From<Rewrite0> for Rewrite {
    fn from(r: Rewrite0) -> Self {
        Rewrite::Rewrite0(r)
    }
}

impl From<RewriteN> for Rewrite {
    fn from(r: RewriteN) -> Self {
        Rewrite::RewriteN(r)
    }
}

impl RewriteN {
    /// Assembles an n-dimensional rewrite from its cones.
    ///
    /// Cones must be ordered by index and must not overlap.
    pub fn new(dimension: usize, cones: Vec<Cone>) -> Self {
        debug_assert!(dimension > 0, "RewriteN acts on diagrams of dimension ≥ 1");
        debug_assert!(
            cones
                .windows(2)
                .all(|pair| pair[0].index + pair[0].len() <= pair[1].index),
            "cones must be index-ordered and non-overlapping"
        );
        Self(Arc::new(RewriteInternal { dimension, cones }))
    }

    /// Dimension of the diagrams this rewrite acts on.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.0.dimension
    }

    /// The cones of this rewrite, in index order.
    #[inline]
    pub fn cones(&self) -> &[Cone] {
        &self.0.cones
    }

    /// See [`Rewrite::pad`].
    pub fn pad(&self, embedding: &[usize]) -> Self {
        if embedding.is_empty() {
            return self.clone();
        }
        let cones = self.cones().iter().map(|cone| cone.pad(embedding)).collect();
        Self::new(self.dimension(), cones)
    }

    fn apply(
        &self,
        diagram: &DiagramN,
        direction: Direction,
        check: Check,
    ) -> Result<DiagramN, RewriteError> {
        if check == Check::Verify && self.dimension() != diagram.dimension() {
            return Err(RewriteError::DimensionMismatch {
                rewrite: self.dimension(),
                diagram: diagram.dimension(),
            });
        }

        let mut cospans = diagram.cospans().to_vec();
        match direction {
            Direction::Forward => {
                // Each collapse shortens the sequence by `len - 1`, shifting
                // every later cone to the left.
                let mut offset: isize = 0;
                for cone in self.cones() {
                    let start = usize::try_from(cone.index as isize + offset).unwrap_or(usize::MAX);
                    let end = start.saturating_add(cone.len());
                    if end > cospans.len() {
                        return Err(RewriteError::ConeOutOfBounds {
                            index: cone.index,
                            start,
                            end,
                            size: cospans.len(),
                        });
                    }
                    if check == Check::Verify && cospans[start..end] != cone.source[..] {
                        return Err(RewriteError::ConeSourceMismatch { index: cone.index });
                    }
                    cospans.splice(start..end, std::iter::once(cone.target.clone()));
                    offset -= cone.len() as isize - 1;
                }
            }
            Direction::Backward => {
                // Earlier cones are already expanded, so every cone sits at its
                // stated source index.
                for cone in self.cones() {
                    let start = cone.index;
                    if start >= cospans.len() {
                        return Err(RewriteError::ConeOutOfBounds {
                            index: cone.index,
                            start,
                            end: start + 1,
                            size: cospans.len(),
                        });
                    }
                    if check == Check::Verify && cospans[start] != cone.target {
                        return Err(RewriteError::ConeTargetMismatch { index: cone.index });
                    }
                    cospans.splice(start..start + 1, cone.source.iter().cloned());
                }
            }
        }

        Ok(DiagramN::new_unchecked(diagram.source().clone(), cospans))
    }
}

impl PartialEq for RewriteN {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for RewriteN {}

impl Cone {
    /// Creates a cone.
    pub fn new(index: usize, source: Vec<Cospan>, target: Cospan, slices: Vec<Rewrite>) -> Self {
        Self {
            index,
            source,
            target,
            slices,
        }
    }

    /// Number of cospans collapsed by this cone.
    #[inline]
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Whether this cone collapses an empty run (inserts a cospan).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// See [`Rewrite::pad`].
    pub fn pad(&self, embedding: &[usize]) -> Self {
        match embedding.split_first() {
            Some((offset, rest)) => Self {
                index: self.index + offset,
                source: self.source.iter().map(|c| c.pad(rest)).collect(),
                target: self.target.pad(rest),
                slices: self.slices.iter().map(|s| s.pad(rest)).collect(),
            },
            None => self.clone(),
        }
    }
}

impl Cospan {
    /// Creates a cospan from its two legs.
    #[inline]
    pub fn new(forward: Rewrite, backward: Rewrite) -> Self {
        Self { forward, backward }
    }

    /// Whether both legs are identities.
    pub fn is_identity(&self) -> bool {
        self.forward.is_identity() && self.backward.is_identity()
    }

    /// Relocates both legs, see [`Rewrite::pad`].
    pub fn pad(&self, embedding: &[usize]) -> Self {
        Self {
            forward: self.forward.pad(embedding),
            backward: self.backward.pad(embedding),
        }
    }

    /// The same cospan traversed in the opposite sense.
    pub fn flip(&self) -> Self {
        Self {
            forward: self.backward.clone(),
            backward: self.forward.clone(),
        }
    }

    /// Steps from the regular slice before this cospan to the one after it.
    pub(crate) fn replay(&self, slice: &Diagram) -> Diagram {
        self.backward
            .rewrite_backward(&self.forward.rewrite_forward(slice))
    }
}

impl Fingerprint for Rewrite {
    fn fingerprint(&self) -> HashValue {
        match self {
            Rewrite::Rewrite0(r) => CanonicalBytes::new()
                .raw(&r.source.to_canonical_bytes())
                .raw(&r.target.to_canonical_bytes())
                .finish(constants::DOMAIN_REWRITE_0_V0),
            Rewrite::RewriteI => CanonicalBytes::new().finish(constants::DOMAIN_REWRITE_I_V0),
            Rewrite::RewriteN(r) => r.fingerprint(),
        }
    }
}

impl Fingerprint for RewriteN {
    fn fingerprint(&self) -> HashValue {
        CanonicalBytes::new()
            .number(self.dimension())
            .sequence(self.cones().iter())
            .finish(constants::DOMAIN_REWRITE_N_V0)
    }
}

impl Fingerprint for Cone {
    fn fingerprint(&self) -> HashValue {
        CanonicalBytes::new()
            .number(self.index)
            .sequence(self.source.iter())
            .digest(self.target.fingerprint())
            .sequence(self.slices.iter())
            .finish(constants::DOMAIN_CONE_V0)
    }
}

impl Fingerprint for Cospan {
    fn fingerprint(&self) -> HashValue {
        CanonicalBytes::new()
            .digest(self.forward.fingerprint())
            .digest(self.backward.fingerprint())
            .finish(constants::DOMAIN_COSPAN_V0)
    }
}
