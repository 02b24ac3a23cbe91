// Copyright 2025 Lars Brubaker
// Shared utilities for the tessellation integration tests.

#![allow(dead_code)]

use polytess::{ElementType, Tess, WindingRule, UNDEF};

/// Route tessellator logs through the test harness. Safe to call from
/// every test; only the first call wins.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An axis-aligned square centered on the origin, CCW.
pub fn square_ccw(half: f32) -> Vec<[f32; 2]> {
    vec![
        [-half, -half],
        [half, -half],
        [half, half],
        [-half, half],
    ]
}

/// An axis-aligned square centered on the origin, CW.
pub fn square_cw(half: f32) -> Vec<[f32; 2]> {
    vec![
        [-half, -half],
        [-half, half],
        [half, half],
        [half, -half],
    ]
}

/// Signed area of a triangle in the xy plane.
pub fn triangle_area(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> f32 {
    0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]))
}

/// Total absolute area of a `Polygons` tessellation with `poly_size` 3.
pub fn total_area(tess: &Tess) -> f32 {
    let verts = tess.vertices();
    let mut total = 0.0f32;
    for tri in tess.elements().chunks(3) {
        total += triangle_area(verts[tri[0]], verts[tri[1]], verts[tri[2]]).abs();
    }
    total
}

/// Tessellate a set of 2D contours into triangles.
pub fn triangulate(contours: &[Vec<[f32; 2]>], rule: WindingRule) -> Tess {
    init_logging();
    let mut tess = Tess::new();
    for contour in contours {
        tess.add_contour_2d(contour, polytess::ContourOrientation::Original)
            .unwrap();
    }
    tess.tessellate(rule, ElementType::Polygons, 3).unwrap();
    tess
}

/// Structural checks that hold for any `Polygons` output with
/// `poly_size` 3: three live indices per element, all in range, and as
/// many index triples as elements.
pub fn verify_triangles(tess: &Tess) {
    assert_eq!(tess.elements().len(), tess.element_count() * 3);
    assert_eq!(tess.vertices().len(), tess.vertex_count());
    assert_eq!(tess.vertex_indices().len(), tess.vertex_count());
    for &i in tess.elements() {
        assert_ne!(i, UNDEF, "triangle output should not be padded");
        assert!(i < tess.vertex_count(), "vertex index {i} out of range");
    }
}
