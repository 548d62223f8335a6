//! Centralized domain separation tags.
//!
//! All hash domains used for structural fingerprints must be defined here
//! to avoid accidental reuse and ensure consistent versioning.

/// Domain for 0-dimensional diagrams (v0).
pub const DOMAIN_DIAGRAM_0_V0: &[u8] = b"DIAGRAM_0_V0";

/// Domain for n-dimensional diagrams (v0).
pub const DOMAIN_DIAGRAM_N_V0: &[u8] = b"DIAGRAM_N_V0";

/// Domain for cospans (v0).
pub const DOMAIN_COSPAN_V0: &[u8] = b"COSPAN_V0";

/// Domain for cones (v0).
pub const DOMAIN_CONE_V0: &[u8] = b"CONE_V0";

/// Domain for 0-dimensional substitutions (v0).
pub const DOMAIN_REWRITE_0_V0: &[u8] = b"REWRITE_0_V0";

/// Domain for the 0-dimensional identity rewrite (v0).
pub const DOMAIN_REWRITE_I_V0: &[u8] = b"REWRITE_I_V0";

/// Domain for n-dimensional rewrites (v0).
pub const DOMAIN_REWRITE_N_V0: &[u8] = b"REWRITE_N_V0";
