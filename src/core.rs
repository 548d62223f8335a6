//! Shared vocabulary for n-dimensional diagrams.
//!
//! Closed, data-only types consumed by every other module: atomic generators,
//! heights inside a diagram's alternating slice sequence, and slice addresses.
//!
//! # Citations
//! - Dorn, Douglas, Vicary, "Associative n-categories" (2018) – regular/singular heights
//! - Reutter & Vicary, "High-level methods for homotopy construction in associative n-categories", LICS (2019)

use crate::boundary::Boundary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An atomic generating cell.
///
/// Generators are defined outside the core (by the surrounding signature) and
/// are compared by value: two generators are the same cell iff both their `id`
/// and their `dimension` agree.
///
/// # Invariant
/// - A generator of dimension `n` is only ever placed as the single cell of an
///   `n`-dimensional diagram built by [`DiagramN::from_generator`](crate::DiagramN::from_generator)
///   or as a 0-dimensional diagram when `n = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Generator {
    /// Identity of the cell within its signature.
    pub id: u64,
    /// Dimension of the cell (0 for objects, 1 for morphisms, 2 for 2-cells, etc.).
    pub dimension: usize,
}

impl Generator {
    /// Creates a generator with the given identity and dimension.
    #[inline]
    pub const fn new(id: u64, dimension: usize) -> Self {
        Self { id, dimension }
    }

    /// Canonical little-endian encoding used for fingerprinting.
    pub(crate) fn to_canonical_bytes(self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.id.to_le_bytes());
        out[8..].copy_from_slice(&(self.dimension as u64).to_le_bytes());
        out
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Generator({}, dim {})", self.id, self.dimension)
    }
}

/// A position within a diagram's alternating slice sequence.
///
/// A diagram of size `k` has regular heights `0..=k` and singular heights
/// `0..k`, interleaved as `R0 S0 R1 S1 … Sk-1 Rk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Height {
    /// Regular (boundary-like) slice.
    Regular(usize),
    /// Singular (content-bearing) slice.
    Singular(usize),
}

impl Height {
    /// Position of this height in the flattened slice sequence.
    ///
    /// `Regular(h) ↦ 2h`, `Singular(h) ↦ 2h + 1`.
    #[inline]
    pub const fn to_int(self) -> usize {
        match self {
            Height::Regular(h) => 2 * h,
            Height::Singular(h) => 2 * h + 1,
        }
    }

    /// Inverse of [`Height::to_int`].
    #[inline]
    pub const fn from_int(n: usize) -> Self {
        if n % 2 == 0 {
            Height::Regular(n / 2)
        } else {
            Height::Singular(n / 2)
        }
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Height::Regular(h) => write!(f, "R{}", h),
            Height::Singular(h) => write!(f, "S{}", h),
        }
    }
}

/// Address of a slice, relative to a diagram whose size the caller need not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SliceIndex {
    /// The source or target boundary.
    Boundary(Boundary),
    /// An interior height.
    Interior(Height),
}

impl SliceIndex {
    /// Resolves this index against a diagram of the given size.
    ///
    /// Returns `None` when an interior height lies outside the diagram.
    pub fn normalize(self, size: usize) -> Option<Height> {
        match self {
            SliceIndex::Boundary(Boundary::Source) => Some(Height::Regular(0)),
            SliceIndex::Boundary(Boundary::Target) => Some(Height::Regular(size)),
            SliceIndex::Interior(Height::Regular(h)) if h <= size => Some(Height::Regular(h)),
            SliceIndex::Interior(Height::Singular(h)) if h < size => Some(Height::Singular(h)),
            SliceIndex::Interior(_) => None,
        }
    }
}

impl From<Height> for SliceIndex {
    fn from(height: Height) -> Self {
        SliceIndex::Interior(height)
    }
}

impl From<Boundary> for SliceIndex {
    fn from(boundary: Boundary) -> Self {
        SliceIndex::Boundary(boundary)
    }
}

impl fmt::Display for SliceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SliceIndex::Boundary(boundary) => write!(f, "{}", boundary),
            SliceIndex::Interior(height) => write!(f, "{}", height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_int_roundtrip_matches_interleaving() {
        assert_eq!(Height::Regular(0).to_int(), 0);
        assert_eq!(Height::Singular(0).to_int(), 1);
        assert_eq!(Height::Regular(3).to_int(), 6);
        assert_eq!(Height::Singular(3).to_int(), 7);
        for n in 0..20 {
            assert_eq!(Height::from_int(n).to_int(), n);
        }
    }

    #[test]
    fn normalize_boundaries() {
        assert_eq!(
            SliceIndex::Boundary(Boundary::Source).normalize(4),
            Some(Height::Regular(0))
        );
        assert_eq!(
            SliceIndex::Boundary(Boundary::Target).normalize(4),
            Some(Height::Regular(4))
        );
        // An identity diagram has coinciding boundaries.
        assert_eq!(
            SliceIndex::Boundary(Boundary::Target).normalize(0),
            Some(Height::Regular(0))
        );
    }

    #[test]
    fn normalize_interior_bounds() {
        assert_eq!(
            SliceIndex::Interior(Height::Regular(2)).normalize(2),
            Some(Height::Regular(2))
        );
        assert_eq!(SliceIndex::Interior(Height::Regular(3)).normalize(2), None);
        assert_eq!(
            SliceIndex::Interior(Height::Singular(1)).normalize(2),
            Some(Height::Singular(1))
        );
        assert_eq!(SliceIndex::Interior(Height::Singular(2)).normalize(2), None);
        assert_eq!(SliceIndex::Interior(Height::Singular(0)).normalize(0), None);
    }

    #[test]
    fn generator_equality_is_by_value() {
        assert_eq!(Generator::new(1, 2), Generator::new(1, 2));
        assert_ne!(Generator::new(1, 2), Generator::new(1, 3));
        assert_ne!(Generator::new(1, 2), Generator::new(2, 2));
    }
}
