//! n-dimensional diagrams.
//!
//! A diagram is either a single generator (dimension 0) or a source diagram of
//! dimension `n - 1` together with a sequence of cospans. Replaying the
//! cospans from the source yields the diagram's alternating sequence of
//! regular and singular slices.
//!
//! Diagrams are immutable and structurally shared: cloning a diagram clones a
//! pointer, and sub-diagrams are reused by reference across parents.
//!
//! # Invariants
//! - `dimension(source) = dimension(self) - 1`.
//! - Every `DiagramN` reachable from outside the crate is coherent: replaying
//!   each cospan's `forward` then `backward` leg from the source succeeds.
//!   [`DiagramN::new`] is the only public way to supply raw cospans and it
//!   verifies this; the unchecked constructor is crate-private.
//!
//! # Citations
//! - Dorn, Douglas, Vicary, "Associative n-categories" (2018)
//! - Reutter & Vicary, "High-level methods for homotopy construction in associative n-categories", LICS (2019)
//! - Persistent data structures: Okasaki, "Purely Functional Data Structures" (1999)

use crate::attach::{self, AttachError};
use crate::boundary::Boundary;
use crate::constants;
use crate::core::{Generator, SliceIndex};
use crate::fingerprint::{CanonicalBytes, Fingerprint, HashValue};
use crate::rewrite::{Cone, Cospan, Rewrite, Rewrite0, RewriteError, RewriteN};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, trace};

/// Error type for the validating constructors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiagramError {
    /// A generating cell does not sit one dimension above its boundaries.
    #[error(
        "generator of dimension {generator} cannot span boundaries of dimension {source_dimension} and {target_dimension}"
    )]
    GeneratorDimension {
        /// Declared dimension of the generator.
        generator: usize,
        /// Dimension of the source boundary.
        source_dimension: usize,
        /// Dimension of the target boundary.
        target_dimension: usize,
    },
    /// The boundaries of a generating cell are not parallel.
    #[error("source and target diagrams have different {boundary} boundaries")]
    NotGlobular {
        /// The boundary on which they disagree.
        boundary: Boundary,
    },
    /// The forward leg of a cospan does not apply to the preceding regular slice.
    #[error("forward leg of cospan {cospan} does not apply to its regular slice")]
    IncoherentForward {
        /// Position of the offending cospan.
        cospan: usize,
        /// Why the rewrite failed.
        #[source]
        source: RewriteError,
    },
    /// The backward leg of a cospan does not reach the singular slice.
    #[error("backward leg of cospan {cospan} does not reach its singular slice")]
    IncoherentBackward {
        /// Position of the offending cospan.
        cospan: usize,
        /// Why the rewrite failed.
        #[source]
        source: RewriteError,
    },
}

/// A diagram of any dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Diagram {
    /// A single generator.
    Diagram0(Generator),
    /// A diagram of dimension `n ≥ 1`.
    DiagramN(DiagramN),
}

/// A diagram of dimension `n ≥ 1`.
#[derive(Clone)]
pub struct DiagramN(Arc<DiagramInternal>);

struct DiagramInternal {
    source: Diagram,
    cospans: Vec<Cospan>,
    /// Written at most once, on first request.
    fingerprint: OnceLock<HashValue>,
}

impl Diagram {
    /// Dimension of this diagram.
    pub fn dimension(&self) -> usize {
        match self {
            Diagram::Diagram0(_) => 0,
            Diagram::DiagramN(d) => d.dimension(),
        }
    }

    /// The degenerate diagram one dimension higher whose only slice is `self`.
    pub fn identity(&self) -> DiagramN {
        DiagramN::new_unchecked(self.clone(), Vec::new())
    }

    /// Returns the n-dimensional view of this diagram, if it has one.
    #[inline]
    pub fn to_n(&self) -> Option<&DiagramN> {
        match self {
            Diagram::DiagramN(d) => Some(d),
            Diagram::Diagram0(_) => None,
        }
    }

    /// Returns the generator of a 0-dimensional diagram.
    #[inline]
    pub fn to_generator(&self) -> Option<Generator> {
        match self {
            Diagram::Diagram0(g) => Some(*g),
            Diagram::DiagramN(_) => None,
        }
    }
}

impl From<Generator> for Diagram {
    fn from(generator: Generator) -> Self {
        Diagram::Diagram0(generator)
    }
}

impl From<DiagramN> for Diagram {
    fn from(diagram: DiagramN) -> Self {
        Diagram::DiagramN(diagram)
    }
}

impl Fingerprint for Diagram {
    fn fingerprint(&self) -> HashValue {
        match self {
            Diagram::Diagram0(g) => CanonicalBytes::new()
                .raw(&g.to_canonical_bytes())
                .finish(constants::DOMAIN_DIAGRAM_0_V0),
            Diagram::DiagramN(d) => d.fingerprint(),
        }
    }
}

impl DiagramN {
    /// Builds a diagram from raw cospans, verifying coherence.
    ///
    /// Each cospan's forward leg is applied to the current regular slice with
    /// every collapsed span checked, then its backward leg is applied in
    /// reverse with every expanded cospan checked. Fails on the first cospan
    /// that does not apply.
    pub fn new(source: Diagram, cospans: Vec<Cospan>) -> Result<Self, DiagramError> {
        let mut slice = source.clone();
        for (index, cospan) in cospans.iter().enumerate() {
            let singular = cospan.forward.try_rewrite_forward(&slice).map_err(|e| {
                debug!(cospan = index, error = %e, "rejected incoherent forward leg");
                DiagramError::IncoherentForward {
                    cospan: index,
                    source: e,
                }
            })?;
            slice = cospan.backward.try_rewrite_backward(&singular).map_err(|e| {
                debug!(cospan = index, error = %e, "rejected incoherent backward leg");
                DiagramError::IncoherentBackward {
                    cospan: index,
                    source: e,
                }
            })?;
        }
        let diagram = Self::new_unchecked(source, cospans);
        trace!(
            dimension = diagram.dimension(),
            size = diagram.size(),
            "constructed diagram"
        );
        Ok(diagram)
    }

    /// Builds a diagram without verifying coherence.
    ///
    /// Callers must already know the cospans replay from `source`.
    pub(crate) fn new_unchecked(source: Diagram, cospans: Vec<Cospan>) -> Self {
        Self(Arc::new(DiagramInternal {
            source,
            cospans,
            fingerprint: OnceLock::new(),
        }))
    }

    /// The diagram consisting of a single generating cell.
    ///
    /// `source` and `target` are the cell's boundaries. Both must have
    /// dimension `generator.dimension - 1` and, above dimension 0, share
    /// their own source and target.
    pub fn from_generator(
        source: impl Into<Diagram>,
        target: impl Into<Diagram>,
        generator: Generator,
    ) -> Result<Self, DiagramError> {
        let source = source.into();
        let target = target.into();
        if source.dimension() != target.dimension()
            || generator.dimension != source.dimension() + 1
        {
            return Err(DiagramError::GeneratorDimension {
                generator: generator.dimension,
                source_dimension: source.dimension(),
                target_dimension: target.dimension(),
            });
        }
        if let (Diagram::DiagramN(s), Diagram::DiagramN(t)) = (&source, &target) {
            let boundary = if s.source() != t.source() {
                Some(Boundary::Source)
            } else if s.target() != t.target() {
                Some(Boundary::Target)
            } else {
                None
            };
            if let Some(boundary) = boundary {
                debug!(%generator, %boundary, "rejected non-globular generating cell");
                return Err(DiagramError::NotGlobular { boundary });
            }
        }
        let cospan = Cospan::new(collapse(generator, &source), collapse(generator, &target));
        Ok(Self::new_unchecked(source, vec![cospan]))
    }

    /// Dimension of this diagram.
    pub fn dimension(&self) -> usize {
        self.0.source.dimension() + 1
    }

    /// Number of singular slices.
    #[inline]
    pub fn size(&self) -> usize {
        self.0.cospans.len()
    }

    /// The first regular slice.
    #[inline]
    pub fn source(&self) -> &Diagram {
        &self.0.source
    }

    /// The last regular slice.
    pub fn target(&self) -> Diagram {
        self.cospans()
            .iter()
            .fold(self.source().clone(), |slice, cospan| cospan.replay(&slice))
    }

    /// The cospans of this diagram, one per singular slice.
    #[inline]
    pub fn cospans(&self) -> &[Cospan] {
        &self.0.cospans
    }

    /// All slices, alternating regular and singular, from source to target.
    ///
    /// The iterator is lazy: slices are computed as they are reached.
    pub fn slices(&self) -> Slices {
        Slices {
            diagram: self.clone(),
            position: 0,
            regular: self.source().clone(),
            pending: Some(self.source().clone()),
        }
    }

    /// The `size + 1` regular slices, source and target included.
    pub fn regular_slices(&self) -> Vec<Diagram> {
        self.slices().step_by(2).collect()
    }

    /// The `size` singular slices.
    pub fn singular_slices(&self) -> Vec<Diagram> {
        self.slices().skip(1).step_by(2).collect()
    }

    /// The slice at `index`, or `None` if it lies outside this diagram.
    pub fn slice(&self, index: impl Into<SliceIndex>) -> Option<Diagram> {
        let height = index.into().normalize(self.size())?;
        self.slices().nth(height.to_int())
    }

    /// The same diagram read from target to source.
    pub fn inverse(&self) -> Self {
        let cospans = self.cospans().iter().rev().map(Cospan::flip).collect();
        Self::new_unchecked(self.target(), cospans)
    }

    /// Glues `small` onto the `boundary` end of `self`, see [`attach::attach`].
    pub fn attach(
        &self,
        small: &DiagramN,
        boundary: Boundary,
        embedding: &[usize],
    ) -> Result<DiagramN, AttachError> {
        attach::attach(boundary, embedding, small, self)
    }
}

/// The rewrite collapsing all of `diagram` onto the single cell `generator`.
fn collapse(generator: Generator, diagram: &Diagram) -> Rewrite {
    match diagram {
        Diagram::Diagram0(g) => Rewrite0::new(*g, generator).into(),
        Diagram::DiagramN(d) => {
            let target = Cospan::new(
                collapse(generator, d.source()),
                collapse(generator, &d.target()),
            );
            let slices = d
                .singular_slices()
                .iter()
                .map(|slice| collapse(generator, slice))
                .collect();
            let cone = Cone::new(0, d.cospans().to_vec(), target, slices);
            RewriteN::new(d.dimension(), vec![cone]).into()
        }
    }
}

impl PartialEq for DiagramN {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        if let (Some(a), Some(b)) = (self.0.fingerprint.get(), other.0.fingerprint.get()) {
            if a != b {
                return false;
            }
        }
        self.0.source == other.0.source && self.0.cospans == other.0.cospans
    }
}

impl Eq for DiagramN {}

impl Hash for DiagramN {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fingerprint().hash(state);
    }
}

impl Fingerprint for DiagramN {
    fn fingerprint(&self) -> HashValue {
        *self.0.fingerprint.get_or_init(|| {
            CanonicalBytes::new()
                .digest(self.0.source.fingerprint())
                .sequence(self.0.cospans.iter())
                .finish(constants::DOMAIN_DIAGRAM_N_V0)
        })
    }
}

impl fmt::Debug for DiagramN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagramN")
            .field("source", &self.0.source)
            .field("cospans", &self.0.cospans)
            .finish()
    }
}

/// Lazy iterator over the slices of a diagram, see [`DiagramN::slices`].
#[derive(Debug, Clone)]
pub struct Slices {
    diagram: DiagramN,
    /// Next cospan to replay.
    position: usize,
    /// Most recent regular slice.
    regular: Diagram,
    /// Regular slice computed but not yet yielded.
    pending: Option<Diagram>,
}

impl Iterator for Slices {
    type Item = Diagram;

    fn next(&mut self) -> Option<Diagram> {
        if let Some(regular) = self.pending.take() {
            return Some(regular);
        }
        let cospan = self.diagram.cospans().get(self.position)?;
        self.position += 1;
        let singular = cospan.forward.rewrite_forward(&self.regular);
        self.regular = cospan.backward.rewrite_backward(&singular);
        self.pending = Some(self.regular.clone());
        Some(singular)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.pending.is_some())
            + 2 * (self.diagram.size() - self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Slices {}
