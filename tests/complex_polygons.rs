// Copyright 2025 Lars Brubaker
// Self-intersecting and overlapping inputs.

mod helpers;

use approx::assert_relative_eq;
use polytess::{ContourOrientation, ElementType, Tess, WindingRule, UNDEF};

fn overlapping_squares() -> Vec<Vec<[f32; 2]>> {
    vec![
        vec![[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]],
        vec![[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0]],
    ]
}

#[test]
fn overlapping_squares_even_odd_is_symmetric_difference() {
    let tess = helpers::triangulate(&overlapping_squares(), WindingRule::EvenOdd);
    helpers::verify_triangles(&tess);
    // 4 + 4 minus the doubly-covered 1x1 overlap counted twice.
    assert_relative_eq!(helpers::total_area(&tess), 6.0, epsilon = 1e-3);
}

#[test]
fn overlapping_squares_nonzero_is_union() {
    let tess = helpers::triangulate(&overlapping_squares(), WindingRule::NonZero);
    helpers::verify_triangles(&tess);
    assert_relative_eq!(helpers::total_area(&tess), 7.0, epsilon = 1e-3);
}

#[test]
fn bowtie_splits_at_the_crossing() {
    // Edges (0,0)-(2,2) and (2,0)-(0,2) cross at (1,1); the sweep must
    // introduce that vertex.
    let contour = vec![[0.0, 0.0], [2.0, 2.0], [2.0, 0.0], [0.0, 2.0]];
    let tess = helpers::triangulate(&[contour], WindingRule::EvenOdd);
    helpers::verify_triangles(&tess);

    assert_eq!(tess.vertex_count(), 5);
    assert_relative_eq!(helpers::total_area(&tess), 2.0, epsilon = 1e-3);

    // The crossing vertex maps to no input vertex.
    let generated: Vec<usize> = tess
        .vertex_indices()
        .iter()
        .copied()
        .filter(|&i| i == UNDEF)
        .collect();
    assert_eq!(generated.len(), 1);
    let crossing = tess
        .vertex_indices()
        .iter()
        .position(|&i| i == UNDEF)
        .unwrap();
    let pos = tess.vertices()[crossing];
    assert_relative_eq!(pos[0], 1.0, epsilon = 1e-4);
    assert_relative_eq!(pos[1], 1.0, epsilon = 1e-4);
}

#[test]
fn pentagram_rules_disagree_about_the_core() {
    // A five-point star drawn in one self-intersecting stroke. The core
    // pentagon has winding 2, so EvenOdd drops it and NonZero keeps it.
    let mut star = Vec::new();
    for k in 0..5 {
        let a = std::f32::consts::TAU * (2.0 * k as f32) / 5.0;
        star.push([a.cos(), a.sin()]);
    }
    let even_odd = helpers::triangulate(&[star.clone()], WindingRule::EvenOdd);
    let nonzero = helpers::triangulate(&[star], WindingRule::NonZero);
    helpers::verify_triangles(&even_odd);
    helpers::verify_triangles(&nonzero);

    let points_only = helpers::total_area(&even_odd);
    let full_star = helpers::total_area(&nonzero);
    assert!(points_only > 0.0);
    assert!(full_star > points_only + 1e-3);
}

#[test]
fn hole_corner_on_the_outer_edge_is_spliced_in() {
    // The hole's apex lies exactly on the outer slanted edge, so the
    // sweep must splice it into that edge and re-check the neighboring
    // regions instead of leaving the two boundaries crossing.
    let outer = vec![[0.0, 0.0], [6.0, 0.0], [0.0, 6.0]];
    let hole = vec![[3.0, 3.0], [1.0, 2.0], [2.0, 1.0]];
    let tess = helpers::triangulate(&[outer, hole], WindingRule::EvenOdd);
    helpers::verify_triangles(&tess);
    assert_relative_eq!(helpers::total_area(&tess), 18.0 - 1.5, epsilon = 1e-3);
}

#[test]
fn duplicate_and_collinear_vertices_are_tolerated() {
    let contour = vec![
        [0.0, 0.0],
        [2.0, 0.0],
        [2.0, 0.0],
        [4.0, 0.0],
        [4.0, 4.0],
        [0.0, 4.0],
    ];
    let tess = helpers::triangulate(&[contour], WindingRule::EvenOdd);
    helpers::verify_triangles(&tess);
    assert_relative_eq!(helpers::total_area(&tess), 16.0, epsilon = 1e-3);
}

#[test]
fn degenerate_contours_produce_nothing() {
    let mut tess = Tess::new();
    // Two points cannot enclose area; neither can a collinear run.
    tess.add_contour_2d(&[[0.0, 0.0], [1.0, 0.0]], ContourOrientation::Original)
        .unwrap();
    tess.add_contour_2d(
        &[[0.0, 1.0], [1.0, 1.0], [2.0, 1.0]],
        ContourOrientation::Original,
    )
    .unwrap();
    tess.tessellate(WindingRule::EvenOdd, ElementType::Polygons, 3)
        .unwrap();
    assert_eq!(tess.element_count(), 0);
}
