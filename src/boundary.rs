//! Boundary tags for n-dimensional diagrams.
//!
//! Every diagram of dimension `n ≥ 1` has a source and a target boundary of
//! dimension `n - 1`. Composition (attachment) glues a smaller diagram onto
//! one of these two ends.
//!
//! # Citations
//! - Globular sets: Street, "The algebra of oriented simplexes" (1987)
//! - Higher category boundaries: Leinster, "Higher Operads, Higher Categories", Chapter 1 (2004)

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two ends of a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Boundary {
    /// The first regular slice.
    Source,
    /// The last regular slice.
    Target,
}

impl Boundary {
    /// Returns the opposite boundary.
    #[inline]
    pub const fn flip(self) -> Self {
        match self {
            Boundary::Source => Boundary::Target,
            Boundary::Target => Boundary::Source,
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Source => write!(f, "source"),
            Boundary::Target => write!(f, "target"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_is_involutive() {
        assert_eq!(Boundary::Source.flip(), Boundary::Target);
        assert_eq!(Boundary::Target.flip(), Boundary::Source);
        assert_eq!(Boundary::Source.flip().flip(), Boundary::Source);
    }
}
