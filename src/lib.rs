// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Sweep-line polygon tessellator in the SGI GLU lineage.
//
// Feed any set of contours (convex, concave, self-intersecting, with holes,
// in any winding) to a `Tess`, pick a winding rule, and get back triangles,
// convex polygons, or the boundary contours of the filled region.

pub mod arena;
pub mod dict;
pub mod geom;
pub mod mesh;
pub mod priorityq;
pub mod sweep;
pub mod tess;

pub use tess::{ContourOrientation, ElementType, Tess, TessError, WindingRule, UNDEF};

/// Package version string, as published.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Numeric library version. Tracks the major version of [`VERSION`].
pub const VERSION_NUMBER: f64 = 1.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_symbols_are_stable() {
        assert!(!VERSION.is_empty());
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert!(VERSION_NUMBER >= 1.0);
    }
}
