// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

//! Flattening of the tessellated mesh into the output arrays.

use crate::geom::Real;
use crate::mesh::{EdgeId, FaceId, F_HEAD, V_HEAD};
use crate::tess::{ElementType, Tess, UNDEF};

/// Rounds to the smallest positive `f32`; a face whose doubled area is
/// below this is empty for the purpose of `no_empty_polygons`.
const EMPTY_FACE_AREA: Real = 1.0e-45;

impl Tess {
    /// Element index of the face on the other side of `e`, or [`UNDEF`]
    /// when that face is exterior.
    fn neighbour_face(&self, e: EdgeId) -> usize {
        let rf = self.mesh.rface(e);
        if !self.mesh[rf].inside || self.mesh[rf].n == u32::MAX {
            return UNDEF;
        }
        self.mesh[rf].n as usize
    }

    fn skip_face(&self, f: FaceId) -> bool {
        if !self.mesh[f].inside {
            return true;
        }
        self.no_empty_polygons && self.mesh.face_area(f).abs() < EMPTY_FACE_AREA
    }

    /// Write [`ElementType::Polygons`] or
    /// [`ElementType::ConnectedPolygons`] output. Faces larger than a
    /// triangle are produced by merging adjacent triangles while the
    /// result stays convex and within `poly_size`.
    pub(crate) fn output_polymesh(&mut self, element_type: ElementType, poly_size: usize) {
        if poly_size > 3 {
            self.mesh.merge_convex_faces(poly_size);
        }

        let mut v = self.mesh[V_HEAD].next;
        while v != V_HEAD {
            self.mesh[v].n = u32::MAX;
            v = self.mesh[v].next;
        }

        // Number the interior faces and the vertices they touch.
        let mut face_count = 0usize;
        let mut vertex_count = 0usize;
        let mut f = self.mesh[F_HEAD].next;
        while f != F_HEAD {
            self.mesh[f].n = u32::MAX;
            if !self.skip_face(f) {
                let start = self.mesh[f].an_edge;
                let mut e = start;
                let mut face_verts = 0usize;
                loop {
                    let v = self.mesh[e].org;
                    if self.mesh[v].n == u32::MAX {
                        self.mesh[v].n = vertex_count as u32;
                        vertex_count += 1;
                    }
                    face_verts += 1;
                    e = self.mesh[e].lnext;
                    if e == start {
                        break;
                    }
                }
                debug_assert!(face_verts <= poly_size);
                self.mesh[f].n = face_count as u32;
                face_count += 1;
            }
            f = self.mesh[f].next;
        }

        self.element_count = face_count;
        let slots = match element_type {
            ElementType::ConnectedPolygons => face_count * 2,
            _ => face_count,
        };

        self.out_verts = vec![[0.0; 3]; vertex_count];
        self.out_vertex_indices = vec![UNDEF; vertex_count];
        let mut v = self.mesh[V_HEAD].next;
        while v != V_HEAD {
            let n = self.mesh[v].n;
            if n != u32::MAX {
                self.out_verts[n as usize] = self.mesh[v].coords;
                if self.mesh[v].idx != u32::MAX {
                    self.out_vertex_indices[n as usize] = self.mesh[v].idx as usize;
                }
            }
            v = self.mesh[v].next;
        }

        let mut elements = Vec::with_capacity(slots * poly_size);
        let mut f = self.mesh[F_HEAD].next;
        while f != F_HEAD {
            if !self.skip_face(f) {
                let start = self.mesh[f].an_edge;
                let mut e = start;
                let mut face_verts = 0usize;
                loop {
                    elements.push(self.mesh[self.mesh[e].org].n as usize);
                    face_verts += 1;
                    e = self.mesh[e].lnext;
                    if e == start {
                        break;
                    }
                }
                for _ in face_verts..poly_size {
                    elements.push(UNDEF);
                }

                if element_type == ElementType::ConnectedPolygons {
                    let mut e = start;
                    loop {
                        elements.push(self.neighbour_face(e));
                        e = self.mesh[e].lnext;
                        if e == start {
                            break;
                        }
                    }
                    for _ in face_verts..poly_size {
                        elements.push(UNDEF);
                    }
                }
            }
            f = self.mesh[f].next;
        }
        self.out_elements = elements;
    }

    /// Write [`ElementType::BoundaryContours`] output: each element is a
    /// `(start_vertex, vertex_count)` pair describing one loop.
    pub(crate) fn output_contours(&mut self) {
        let mut verts = Vec::new();
        let mut vertex_indices = Vec::new();
        let mut elements = Vec::new();
        let mut element_count = 0usize;

        let mut f = self.mesh[F_HEAD].next;
        while f != F_HEAD {
            if self.mesh[f].inside {
                let start_vert = verts.len();
                let start = self.mesh[f].an_edge;
                let mut e = start;
                loop {
                    let v = self.mesh[e].org;
                    verts.push(self.mesh[v].coords);
                    vertex_indices.push(if self.mesh[v].idx == u32::MAX {
                        UNDEF
                    } else {
                        self.mesh[v].idx as usize
                    });
                    e = self.mesh[e].lnext;
                    if e == start {
                        break;
                    }
                }
                elements.push(start_vert);
                elements.push(verts.len() - start_vert);
                element_count += 1;
            }
            f = self.mesh[f].next;
        }

        self.out_verts = verts;
        self.out_vertex_indices = vertex_indices;
        self.out_elements = elements;
        self.element_count = element_count;
    }
}
