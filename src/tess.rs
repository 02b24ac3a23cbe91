// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

//! Tessellator entry point.
//!
//! Feed contours with [`Tess::add_contour`], then call
//! [`Tess::tessellate`] to turn them into triangles, convex polygons, or
//! boundary contours under a chosen winding rule. Results are read back
//! with [`Tess::vertices`], [`Tess::elements`] and
//! [`Tess::vertex_indices`].

use log::debug;
use thiserror::Error;

use crate::arena::Pool;
use crate::dict::Dict;
use crate::geom::{edge_sign, vert_leq, Real, SweepCoord};
use crate::mesh::{EdgeId, FaceId, Mesh, VertId, F_HEAD, V_HEAD};
use crate::priorityq::PriorityQ;
use crate::sweep::ActiveRegion;

mod output;

/// Marker for "no value" in [`Tess::elements`] padding, neighbor slots of
/// connected polygons, and [`Tess::vertex_indices`] entries of vertices
/// created at edge intersections.
pub const UNDEF: usize = usize::MAX;

#[derive(Debug, Error)]
pub enum TessError {
    /// A contour vertex coordinate was NaN or infinite.
    #[error("contour coordinate is not finite")]
    NonFiniteCoordinate,
    /// `poly_size` passed to `tessellate` was less than 3.
    #[error("polygon size must be at least 3, got {0}")]
    InvalidPolySize(usize),
}

/// Classifies a region as interior by its winding number.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WindingRule {
    EvenOdd,
    NonZero,
    Positive,
    Negative,
    AbsGeqTwo,
}

impl WindingRule {
    pub(crate) fn is_inside(self, winding: i32) -> bool {
        match self {
            WindingRule::EvenOdd => winding & 1 != 0,
            WindingRule::NonZero => winding != 0,
            WindingRule::Positive => winding > 0,
            WindingRule::Negative => winding < 0,
            WindingRule::AbsGeqTwo => winding >= 2 || winding <= -2,
        }
    }
}

/// Shape of the tessellation output.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ElementType {
    /// `poly_size` vertex indices per element, `UNDEF`-padded.
    Polygons,
    /// Like `Polygons`, followed by `poly_size` neighbor element indices.
    ConnectedPolygons,
    /// `(start_vertex, vertex_count)` pairs per boundary loop.
    BoundaryContours,
}

/// Whether `add_contour` may flip a contour to force its orientation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ContourOrientation {
    Original,
    Clockwise,
    CounterClockwise,
}

/// Polygon tessellator. One instance can be reused; each `tessellate`
/// call consumes the contours added since the previous one.
pub struct Tess {
    pub(crate) mesh: Mesh,
    pub(crate) dict: Dict,
    pub(crate) pq: PriorityQ,
    pub(crate) regions: Pool<ActiveRegion>,
    /// Current sweep event, for the active-edge ordering.
    pub(crate) event: VertId,
    pub(crate) winding_rule: WindingRule,

    /// Plane normal; zero means "compute from the input".
    normal: [Real; 3],
    s_unit: [Real; 3],
    t_unit: [Real; 3],

    /// Skip zero-area polygons when writing output.
    pub no_empty_polygons: bool,

    vertex_index_counter: u32,
    pub(crate) out_verts: Vec<[Real; 3]>,
    pub(crate) out_vertex_indices: Vec<usize>,
    pub(crate) out_elements: Vec<usize>,
    pub(crate) element_count: usize,
}

/// Twice the signed area of the contour, projected on the xy plane.
fn signed_area(vertices: &[[Real; 3]]) -> Real {
    let mut area = 0.0;
    for (i, v0) in vertices.iter().enumerate() {
        let v1 = vertices[(i + 1) % vertices.len()];
        area += v0[0] * v1[1] - v0[1] * v1[0];
    }
    0.5 * area
}

fn dot(a: [Real; 3], b: [Real; 3]) -> Real {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn long_axis(v: [Real; 3]) -> usize {
    let mut i = 0;
    if v[1].abs() > v[0].abs() {
        i = 1;
    }
    if v[2].abs() > v[i].abs() {
        i = 2;
    }
    i
}

fn short_axis(v: [Real; 3]) -> usize {
    let mut i = 0;
    if v[1].abs() < v[0].abs() {
        i = 1;
    }
    if v[2].abs() < v[i].abs() {
        i = 2;
    }
    i
}

impl Tess {
    pub fn new() -> Self {
        Tess {
            mesh: Mesh::new(),
            dict: Dict::new(),
            pq: PriorityQ::new(),
            regions: Pool::new(),
            event: VertId::NONE,
            winding_rule: WindingRule::EvenOdd,
            normal: [0.0; 3],
            s_unit: [0.0; 3],
            t_unit: [0.0; 3],
            no_empty_polygons: false,
            vertex_index_counter: 0,
            out_verts: Vec::new(),
            out_vertex_indices: Vec::new(),
            out_elements: Vec::new(),
            element_count: 0,
        }
    }

    /// Fix the plane normal instead of estimating it from the input.
    /// Useful when contours are near-degenerate or when the projection
    /// must match between runs.
    pub fn set_normal(&mut self, normal: [Real; 3]) {
        self.normal = normal;
    }

    /// Add a closed contour. With [`ContourOrientation::Original`] the
    /// winding is taken as given. Otherwise the contour may be reversed:
    /// the orientation names follow a y-down convention, so `Clockwise`
    /// reverses contours whose xy signed area is negative and
    /// `CounterClockwise` those whose signed area is positive.
    pub fn add_contour(
        &mut self,
        vertices: &[[Real; 3]],
        orientation: ContourOrientation,
    ) -> Result<(), TessError> {
        for v in vertices {
            if !v.iter().all(|c| c.is_finite()) {
                return Err(TessError::NonFiniteCoordinate);
            }
        }
        if vertices.is_empty() {
            return Ok(());
        }

        let reverse = match orientation {
            ContourOrientation::Original => false,
            _ => {
                let area = signed_area(vertices);
                (orientation == ContourOrientation::Clockwise && area < 0.0)
                    || (orientation == ContourOrientation::CounterClockwise && area > 0.0)
            }
        };

        let base = self.vertex_index_counter;
        let mut e = EdgeId::NONE;
        for i in 0..vertices.len() {
            if e == EdgeId::NONE {
                e = self.mesh.make_edge();
                self.mesh.splice(e, e.sym());
            } else {
                // New vertex immediately following e on the contour.
                self.mesh.split_edge(e);
                e = self.mesh[e].lnext;
            }
            let index = if reverse { vertices.len() - 1 - i } else { i };
            let org = self.mesh[e].org;
            self.mesh[org].coords = vertices[index];
            self.mesh[org].idx = base + index as u32;

            // A CCW contour adds +1 to the winding number of the region
            // it encloses.
            self.mesh[e].winding = 1;
            self.mesh[e.sym()].winding = -1;
        }
        self.vertex_index_counter = base + vertices.len() as u32;
        Ok(())
    }

    /// `add_contour` for planar input; z is taken as 0.
    pub fn add_contour_2d(
        &mut self,
        vertices: &[[Real; 2]],
        orientation: ContourOrientation,
    ) -> Result<(), TessError> {
        let lifted: Vec<[Real; 3]> = vertices.iter().map(|v| [v[0], v[1], 0.0]).collect();
        self.add_contour(&lifted, orientation)
    }

    /// Tessellate the contours added so far. `poly_size` is the maximum
    /// number of vertices per output polygon and must be at least 3; it
    /// is ignored for [`ElementType::BoundaryContours`].
    pub fn tessellate(
        &mut self,
        winding_rule: WindingRule,
        element_type: ElementType,
        poly_size: usize,
    ) -> Result<(), TessError> {
        if poly_size < 3 {
            return Err(TessError::InvalidPolySize(poly_size));
        }
        self.out_verts.clear();
        self.out_vertex_indices.clear();
        self.out_elements.clear();
        self.element_count = 0;
        self.winding_rule = winding_rule;

        if self.mesh[V_HEAD].next == V_HEAD {
            // Nothing was added; the result is empty.
            self.reset();
            return Ok(());
        }
        debug!("tessellate {winding_rule:?} {element_type:?} poly_size={poly_size}");

        // Project onto a sweep plane, then compute the planar arrangement
        // with faces labeled interior or exterior.
        self.project_polygon();
        self.compute_interior();

        if element_type == ElementType::BoundaryContours {
            self.mesh.set_winding_number(1, true);
        } else {
            self.tessellate_interior();
        }
        self.mesh.check();

        if element_type == ElementType::BoundaryContours {
            self.output_contours();
        } else {
            self.output_polymesh(element_type, poly_size);
        }
        debug!(
            "output {} vertices, {} elements",
            self.out_verts.len(),
            self.element_count
        );

        self.reset();
        Ok(())
    }

    /// Positions of the output vertices.
    pub fn vertices(&self) -> &[[Real; 3]] {
        &self.out_verts
    }

    /// For each output vertex, the index of the input vertex it came
    /// from (in order of the `add_contour` calls), or [`UNDEF`] for
    /// vertices created at edge intersections.
    pub fn vertex_indices(&self) -> &[usize] {
        &self.out_vertex_indices
    }

    /// Element data; layout depends on the [`ElementType`] tessellated.
    pub fn elements(&self) -> &[usize] {
        &self.out_elements
    }

    pub fn vertex_count(&self) -> usize {
        self.out_verts.len()
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }

    fn reset(&mut self) {
        self.mesh = Mesh::new();
        self.dict.clear();
        self.regions.clear();
        self.event = VertId::NONE;
        self.vertex_index_counter = 0;
    }

    /// Estimate the polygon normal. Picks the two vertices furthest
    /// apart on the widest axis, then the third vertex forming the
    /// largest triangle with them.
    fn compute_normal(&self) -> [Real; 3] {
        let first = self.mesh[V_HEAD].next;
        let mut min_val = self.mesh[first].coords;
        let mut max_val = min_val;
        let mut min_vert = [first; 3];
        let mut max_vert = [first; 3];

        let mut v = first;
        while v != V_HEAD {
            let c = self.mesh[v].coords;
            for i in 0..3 {
                if c[i] < min_val[i] {
                    min_val[i] = c[i];
                    min_vert[i] = v;
                }
                if c[i] > max_val[i] {
                    max_val[i] = c[i];
                    max_vert[i] = v;
                }
            }
            v = self.mesh[v].next;
        }

        let mut i = 0;
        if max_val[1] - min_val[1] > max_val[0] - min_val[0] {
            i = 1;
        }
        if max_val[2] - min_val[2] > max_val[i] - min_val[i] {
            i = 2;
        }
        if min_val[i] >= max_val[i] {
            // All vertices coincide; any normal will do.
            return [0.0, 0.0, 1.0];
        }

        let c1 = self.mesh[min_vert[i]].coords;
        let c2 = self.mesh[max_vert[i]].coords;
        let d1 = [c1[0] - c2[0], c1[1] - c2[1], c1[2] - c2[2]];
        let mut norm = [0.0; 3];
        let mut max_len2 = 0.0;
        let mut v = first;
        while v != V_HEAD {
            let c = self.mesh[v].coords;
            let d2 = [c[0] - c2[0], c[1] - c2[1], c[2] - c2[2]];
            let t = [
                d1[1] * d2[2] - d1[2] * d2[1],
                d1[2] * d2[0] - d1[0] * d2[2],
                d1[0] * d2[1] - d1[1] * d2[0],
            ];
            let len2 = dot(t, t);
            if len2 > max_len2 {
                max_len2 = len2;
                norm = t;
            }
            v = self.mesh[v].next;
        }

        if max_len2 <= 0.0 {
            // Collinear input; any direction perpendicular to the line.
            norm = [0.0; 3];
            norm[short_axis(d1)] = 1.0;
        }
        norm
    }

    /// Project the vertices onto the sweep plane perpendicular to the
    /// longest axis of the normal.
    fn project_polygon(&mut self) {
        let mut norm = self.normal;
        let mut computed = false;
        if norm == [0.0; 3] {
            norm = self.compute_normal();
            computed = true;
        }

        let i = long_axis(norm);
        self.s_unit = [0.0; 3];
        self.t_unit = [0.0; 3];
        self.s_unit[(i + 1) % 3] = 1.0;
        self.t_unit[(i + 2) % 3] = if norm[i] > 0.0 { 1.0 } else { -1.0 };

        let mut v = self.mesh[V_HEAD].next;
        while v != V_HEAD {
            let c = self.mesh[v].coords;
            self.mesh[v].st = SweepCoord::new(dot(c, self.s_unit), dot(c, self.t_unit));
            v = self.mesh[v].next;
        }

        if computed {
            self.check_orientation();
        }
    }

    /// When the normal was estimated, its sign is arbitrary. Flip the t
    /// axis if needed so the sum of the input contour areas comes out
    /// non-negative, keeping interior winding numbers positive.
    fn check_orientation(&mut self) {
        let mut area = 0.0;
        let mut f = self.mesh[F_HEAD].next;
        while f != F_HEAD {
            let start = self.mesh[f].an_edge;
            if self.mesh[start].winding > 0 {
                let mut e = start;
                loop {
                    let o = self.mesh[self.mesh[e].org].st;
                    let d = self.mesh[self.mesh.dst(e)].st;
                    area += (o.s - d.s) * (o.t + d.t);
                    e = self.mesh[e].lnext;
                    if e == start {
                        break;
                    }
                }
            }
            f = self.mesh[f].next;
        }

        if area < 0.0 {
            let mut v = self.mesh[V_HEAD].next;
            while v != V_HEAD {
                self.mesh[v].st.t = -self.mesh[v].st.t;
                v = self.mesh[v].next;
            }
            for t in &mut self.t_unit {
                *t = -*t;
            }
        }
    }

    /// Triangulate one monotone face by walking its upper and lower
    /// chains from right to left and fanning out diagonals while the
    /// current chain stays convex.
    fn tessellate_mono_region(&mut self, face: FaceId) {
        let mut up = self.mesh[face].an_edge;
        debug_assert!(self.mesh[up].lnext != up && self.mesh[self.mesh[up].lnext].lnext != up);

        // Find the rightmost vertex; up is then the edge leaving it on
        // the upper chain.
        while vert_leq(
            self.mesh[self.mesh.dst(up)].st,
            self.mesh[self.mesh[up].org].st,
        ) {
            up = self.mesh.lprev(up);
        }
        while vert_leq(
            self.mesh[self.mesh[up].org].st,
            self.mesh[self.mesh.dst(up)].st,
        ) {
            up = self.mesh[up].lnext;
        }
        let mut lo = self.mesh.lprev(up);

        while self.mesh[up].lnext != lo {
            if vert_leq(
                self.mesh[self.mesh.dst(up)].st,
                self.mesh[self.mesh[lo].org].st,
            ) {
                // up.dst is the next vertex to sweep; cut diagonals from
                // lo.org while the lower chain turns the right way.
                while self.mesh[lo].lnext != up
                    && (self.mesh.edge_goes_left(self.mesh[lo].lnext)
                        || edge_sign(
                            self.mesh[self.mesh[lo].org].st,
                            self.mesh[self.mesh.dst(lo)].st,
                            self.mesh[self.mesh.dst(self.mesh[lo].lnext)].st,
                        ) <= 0.0)
                {
                    let lnext = self.mesh[lo].lnext;
                    lo = self.mesh.connect(lnext, lo).sym();
                }
                lo = self.mesh.lprev(lo);
            } else {
                while self.mesh[lo].lnext != up
                    && (self.mesh.edge_goes_right(self.mesh.lprev(up))
                        || edge_sign(
                            self.mesh[self.mesh.dst(up)].st,
                            self.mesh[self.mesh[up].org].st,
                            self.mesh[self.mesh[self.mesh.lprev(up)].org].st,
                        ) >= 0.0)
                {
                    let lprev = self.mesh.lprev(up);
                    up = self.mesh.connect(up, lprev).sym();
                }
                up = self.mesh[up].lnext;
            }
        }

        // lo.org is the leftmost vertex; fan out the remainder from it.
        debug_assert!(self.mesh[lo].lnext != up);
        while self.mesh[self.mesh[lo].lnext].lnext != up {
            let lnext = self.mesh[lo].lnext;
            lo = self.mesh.connect(lnext, lo).sym();
        }
    }

    /// Triangulate every interior face.
    fn tessellate_interior(&mut self) {
        let mut f = self.mesh[F_HEAD].next;
        while f != F_HEAD {
            let next = self.mesh[f].next;
            if self.mesh[f].inside {
                self.tessellate_mono_region(f);
            }
            f = next;
        }
    }
}

impl Default for Tess {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winding_rule_classification() {
        assert!(WindingRule::EvenOdd.is_inside(1));
        assert!(!WindingRule::EvenOdd.is_inside(2));
        assert!(WindingRule::EvenOdd.is_inside(-3));
        assert!(WindingRule::NonZero.is_inside(-1));
        assert!(!WindingRule::NonZero.is_inside(0));
        assert!(WindingRule::Positive.is_inside(1));
        assert!(!WindingRule::Positive.is_inside(-1));
        assert!(WindingRule::Negative.is_inside(-1));
        assert!(!WindingRule::Negative.is_inside(1));
        assert!(WindingRule::AbsGeqTwo.is_inside(2));
        assert!(WindingRule::AbsGeqTwo.is_inside(-2));
        assert!(!WindingRule::AbsGeqTwo.is_inside(1));
    }

    #[test]
    fn signed_area_orientation() {
        let ccw = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]];
        let cw = [[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]];
        assert!(signed_area(&ccw) > 0.0);
        assert!(signed_area(&cw) < 0.0);
    }

    #[test]
    fn non_finite_contour_is_rejected() {
        let mut tess = Tess::new();
        let err = tess
            .add_contour(
                &[[0.0, 0.0, 0.0], [f32::NAN, 0.0, 0.0], [1.0, 1.0, 0.0]],
                ContourOrientation::Original,
            )
            .unwrap_err();
        assert!(matches!(err, TessError::NonFiniteCoordinate));
    }

    #[test]
    fn poly_size_below_three_is_rejected() {
        let mut tess = Tess::new();
        tess.add_contour_2d(
            &[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            ContourOrientation::Original,
        )
        .unwrap();
        let err = tess
            .tessellate(WindingRule::EvenOdd, ElementType::Polygons, 2)
            .unwrap_err();
        assert!(matches!(err, TessError::InvalidPolySize(2)));
    }

    #[test]
    fn empty_input_tessellates_to_nothing() {
        let mut tess = Tess::new();
        tess.tessellate(WindingRule::EvenOdd, ElementType::Polygons, 3)
            .unwrap();
        assert_eq!(tess.vertex_count(), 0);
        assert_eq!(tess.element_count(), 0);
        assert!(tess.elements().is_empty());
    }

    #[test]
    fn single_triangle() {
        let mut tess = Tess::new();
        tess.add_contour_2d(
            &[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            ContourOrientation::Original,
        )
        .unwrap();
        tess.tessellate(WindingRule::EvenOdd, ElementType::Polygons, 3)
            .unwrap();
        assert_eq!(tess.vertex_count(), 3);
        assert_eq!(tess.element_count(), 1);
        assert_eq!(tess.elements().len(), 3);
        assert!(tess.elements().iter().all(|&i| i < 3));
        assert!(tess.vertex_indices().iter().all(|&i| i < 3));
    }

    #[test]
    fn tessellator_is_reusable() {
        let mut tess = Tess::new();
        for _ in 0..2 {
            tess.add_contour_2d(
                &[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]],
                ContourOrientation::Original,
            )
            .unwrap();
            tess.tessellate(WindingRule::EvenOdd, ElementType::Polygons, 3)
                .unwrap();
            assert_eq!(tess.vertex_count(), 4);
            assert_eq!(tess.element_count(), 2);
        }
    }
}
