// Copyright 2025 Lars Brubaker
// Vertex index mapping and forced contour orientation.

mod helpers;

use approx::assert_relative_eq;
use polytess::{ContourOrientation, ElementType, Tess, WindingRule};

#[test]
fn vertex_indices_map_back_to_the_input() {
    let square = [[0.0, 0.0], [3.0, 0.0], [3.0, 3.0], [0.0, 3.0]];
    let mut tess = Tess::new();
    tess.add_contour_2d(&square, ContourOrientation::Original)
        .unwrap();
    tess.tessellate(WindingRule::EvenOdd, ElementType::Polygons, 3)
        .unwrap();

    assert_eq!(tess.vertex_count(), 4);
    let mut seen: Vec<usize> = tess.vertex_indices().to_vec();
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2, 3]);

    // Each output vertex carries the position of the input vertex it
    // points at.
    for (out, &idx) in tess.vertices().iter().zip(tess.vertex_indices()) {
        assert_relative_eq!(out[0], square[idx][0]);
        assert_relative_eq!(out[1], square[idx][1]);
    }
}

#[test]
fn vertex_indices_continue_across_contours() {
    let mut tess = Tess::new();
    tess.add_contour_2d(&helpers::square_ccw(5.0), ContourOrientation::Original)
        .unwrap();
    tess.add_contour_2d(&helpers::square_cw(2.0), ContourOrientation::Original)
        .unwrap();
    tess.tessellate(WindingRule::EvenOdd, ElementType::Polygons, 3)
        .unwrap();

    let mut seen: Vec<usize> = tess.vertex_indices().to_vec();
    seen.sort_unstable();
    assert_eq!(seen, (0..8).collect::<Vec<_>>());
}

#[test]
fn forced_orientation_turns_a_contour_into_a_hole() {
    // Orientation names follow the y-down convention: a positive-area
    // contour counts as clockwise, so requesting CounterClockwise
    // reverses the inner square and it cancels the outer winding under
    // NonZero.
    let mut tess = Tess::new();
    tess.set_normal([0.0, 0.0, 1.0]);
    tess.add_contour_2d(&helpers::square_ccw(5.0), ContourOrientation::Original)
        .unwrap();
    tess.add_contour_2d(&helpers::square_ccw(2.0), ContourOrientation::CounterClockwise)
        .unwrap();
    tess.tessellate(WindingRule::NonZero, ElementType::Polygons, 3)
        .unwrap();

    helpers::verify_triangles(&tess);
    assert_relative_eq!(helpers::total_area(&tess), 100.0 - 16.0, epsilon = 1e-2);
}

#[test]
fn forced_orientation_leaves_matching_contours_alone() {
    // A positive-area contour already satisfies Clockwise, so it is kept
    // as given and still fills under the Positive rule.
    let mut tess = Tess::new();
    tess.set_normal([0.0, 0.0, 1.0]);
    tess.add_contour_2d(&helpers::square_ccw(2.0), ContourOrientation::Clockwise)
        .unwrap();
    tess.tessellate(WindingRule::Positive, ElementType::Polygons, 3)
        .unwrap();
    helpers::verify_triangles(&tess);
    assert_relative_eq!(helpers::total_area(&tess), 16.0, epsilon = 1e-3);
}

#[test]
fn triangles_inherit_contour_orientation() {
    // CCW input with a fixed normal comes out as CCW triangles.
    let tess = {
        let mut t = Tess::new();
        t.set_normal([0.0, 0.0, 1.0]);
        t.add_contour_2d(&helpers::square_ccw(1.0), ContourOrientation::Original)
            .unwrap();
        t.tessellate(WindingRule::EvenOdd, ElementType::Polygons, 3)
            .unwrap();
        t
    };
    let verts = tess.vertices();
    for tri in tess.elements().chunks(3) {
        let area = helpers::triangle_area(verts[tri[0]], verts[tri[1]], verts[tri[2]]);
        assert!(area > 0.0, "expected CCW triangle, signed area {area}");
    }
}
