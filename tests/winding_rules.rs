// Copyright 2025 Lars Brubaker
// Winding rule correctness, verified through exact filled areas.

mod helpers;

use approx::assert_relative_eq;
use polytess::WindingRule;

/// Nested squares 6x6 CCW, 4x4 CW, 2x2 CCW. Winding numbers from the
/// outside in: 0, 1, 0, 1. The filled area under the odd/nonzero/positive
/// rules is the outer ring (36 - 16) plus the inner square (4).
fn alternating_squares() -> Vec<Vec<[f32; 2]>> {
    vec![
        helpers::square_ccw(3.0),
        helpers::square_cw(2.0),
        helpers::square_ccw(1.0),
    ]
}

/// Nested squares, all CCW. Winding numbers from the outside in:
/// 0, 1, 2, 3.
fn stacked_squares() -> Vec<Vec<[f32; 2]>> {
    vec![
        helpers::square_ccw(3.0),
        helpers::square_ccw(2.0),
        helpers::square_ccw(1.0),
    ]
}

#[test]
fn even_odd_alternating_squares() {
    let tess = helpers::triangulate(&alternating_squares(), WindingRule::EvenOdd);
    helpers::verify_triangles(&tess);
    assert_relative_eq!(helpers::total_area(&tess), 24.0, epsilon = 1e-3);
}

#[test]
fn nonzero_alternating_squares() {
    let tess = helpers::triangulate(&alternating_squares(), WindingRule::NonZero);
    helpers::verify_triangles(&tess);
    assert_relative_eq!(helpers::total_area(&tess), 24.0, epsilon = 1e-3);
}

#[test]
fn positive_alternating_squares() {
    let tess = helpers::triangulate(&alternating_squares(), WindingRule::Positive);
    helpers::verify_triangles(&tess);
    assert_relative_eq!(helpers::total_area(&tess), 24.0, epsilon = 1e-3);
}

#[test]
fn negative_alternating_squares_is_empty() {
    let tess = helpers::triangulate(&alternating_squares(), WindingRule::Negative);
    assert_eq!(tess.element_count(), 0);
}

#[test]
fn even_odd_stacked_squares() {
    // Odd winding numbers: the 1-ring (36 - 16) and the 3-core (4).
    let tess = helpers::triangulate(&stacked_squares(), WindingRule::EvenOdd);
    helpers::verify_triangles(&tess);
    assert_relative_eq!(helpers::total_area(&tess), 24.0, epsilon = 1e-3);
}

#[test]
fn nonzero_stacked_squares() {
    let tess = helpers::triangulate(&stacked_squares(), WindingRule::NonZero);
    helpers::verify_triangles(&tess);
    assert_relative_eq!(helpers::total_area(&tess), 36.0, epsilon = 1e-3);
}

#[test]
fn abs_geq_two_stacked_squares() {
    // Winding reaches 2 inside the middle square.
    let tess = helpers::triangulate(&stacked_squares(), WindingRule::AbsGeqTwo);
    helpers::verify_triangles(&tess);
    assert_relative_eq!(helpers::total_area(&tess), 16.0, epsilon = 1e-3);
}

#[test]
fn negative_fills_clockwise_interior() {
    // A lone CW square with an explicit normal, so the projection cannot
    // flip it back to positive winding.
    let mut tess = polytess::Tess::new();
    tess.set_normal([0.0, 0.0, 1.0]);
    tess.add_contour_2d(&helpers::square_cw(2.0), polytess::ContourOrientation::Original)
        .unwrap();
    tess.tessellate(
        WindingRule::Negative,
        polytess::ElementType::Polygons,
        3,
    )
    .unwrap();
    helpers::verify_triangles(&tess);
    assert_relative_eq!(helpers::total_area(&tess), 16.0, epsilon = 1e-3);
}
