// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Half-edge mesh, the Guibas/Stolfi quad-edge variant the SGI tessellator
// is built on.
//
// Records live in slot pools and refer to each other through typed ids.
// Half-edges are allocated in pairs at indices (2k, 2k+1), so the symmetric
// half is always `id ^ 1`. Slot 0 of each store is the head of a circular
// doubly-linked list over the live records; the head is never a real
// vertex, face, or edge.
//
// The global edge list links pair bases: the even half's `next` points to
// the next pair's even half, and the odd half's `next` points back to the
// previous pair's even half.

use crate::arena::Pool;
use crate::geom::{vert_ccw, vert_leq, Real, SweepCoord};
use crate::priorityq::PqHandle;
use crate::sweep::RegionId;

/// Index of a vertex slot in the mesh.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct VertId(pub(crate) u32);

/// Index of a face slot in the mesh.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FaceId(pub(crate) u32);

/// Index of a half-edge slot in the mesh.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EdgeId(pub(crate) u32);

impl VertId {
    pub const NONE: VertId = VertId(u32::MAX);
}

impl FaceId {
    pub const NONE: FaceId = FaceId(u32::MAX);
}

impl EdgeId {
    pub const NONE: EdgeId = EdgeId(u32::MAX);

    /// The other half of the pair.
    #[inline]
    pub fn sym(self) -> EdgeId {
        EdgeId(self.0 ^ 1)
    }

    /// True for the even half, which anchors the pair in the edge list.
    #[inline]
    fn is_pair_base(self) -> bool {
        self.0 & 1 == 0
    }
}

/// Head sentinels, fixed at slot 0.
pub const V_HEAD: VertId = VertId(0);
pub const F_HEAD: FaceId = FaceId(0);
pub const E_HEAD: EdgeId = EdgeId(0);

#[derive(Clone, Debug)]
pub struct Vertex {
    pub next: VertId,
    pub prev: VertId,
    pub an_edge: EdgeId,
    /// Original 3D position.
    pub coords: [Real; 3],
    /// Projected sweep-plane position.
    pub st: SweepCoord,
    pub pq_handle: PqHandle,
    /// Output vertex number, assigned during output generation.
    pub n: u32,
    /// Input vertex index, or `u32::MAX` for vertices the sweep created.
    pub idx: u32,
}

impl Default for Vertex {
    fn default() -> Self {
        Vertex {
            next: VertId::NONE,
            prev: VertId::NONE,
            an_edge: EdgeId::NONE,
            coords: [0.0; 3],
            st: SweepCoord::default(),
            pq_handle: PqHandle::NONE,
            n: u32::MAX,
            idx: u32::MAX,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Face {
    pub next: FaceId,
    pub prev: FaceId,
    pub an_edge: EdgeId,
    /// Output face number.
    pub n: u32,
    /// Interior under the active winding rule.
    pub inside: bool,
}

impl Default for Face {
    fn default() -> Self {
        Face {
            next: FaceId::NONE,
            prev: FaceId::NONE,
            an_edge: EdgeId::NONE,
            n: u32::MAX,
            inside: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HalfEdge {
    /// Global edge list link (pair bases only carry forward links).
    pub next: EdgeId,
    /// Next edge CCW around the origin.
    pub onext: EdgeId,
    /// Next edge CCW around the left face.
    pub lnext: EdgeId,
    pub org: VertId,
    pub lface: FaceId,
    /// Active region above this edge during the sweep.
    pub region: RegionId,
    pub winding: i32,
}

impl Default for HalfEdge {
    fn default() -> Self {
        HalfEdge {
            next: EdgeId::NONE,
            onext: EdgeId::NONE,
            lnext: EdgeId::NONE,
            org: VertId::NONE,
            lface: FaceId::NONE,
            region: RegionId::NONE,
            winding: 0,
        }
    }
}

pub struct Mesh {
    pub(crate) verts: Pool<Vertex>,
    pub(crate) faces: Pool<Face>,
    pub(crate) edges: Vec<HalfEdge>,
    free_pairs: Vec<u32>,
}

impl std::ops::Index<VertId> for Mesh {
    type Output = Vertex;
    #[inline]
    fn index(&self, id: VertId) -> &Vertex {
        &self.verts[id.0]
    }
}

impl std::ops::IndexMut<VertId> for Mesh {
    #[inline]
    fn index_mut(&mut self, id: VertId) -> &mut Vertex {
        &mut self.verts[id.0]
    }
}

impl std::ops::Index<FaceId> for Mesh {
    type Output = Face;
    #[inline]
    fn index(&self, id: FaceId) -> &Face {
        &self.faces[id.0]
    }
}

impl std::ops::IndexMut<FaceId> for Mesh {
    #[inline]
    fn index_mut(&mut self, id: FaceId) -> &mut Face {
        &mut self.faces[id.0]
    }
}

impl std::ops::Index<EdgeId> for Mesh {
    type Output = HalfEdge;
    #[inline]
    fn index(&self, id: EdgeId) -> &HalfEdge {
        &self.edges[id.0 as usize]
    }
}

impl std::ops::IndexMut<EdgeId> for Mesh {
    #[inline]
    fn index_mut(&mut self, id: EdgeId) -> &mut HalfEdge {
        &mut self.edges[id.0 as usize]
    }
}

impl Mesh {
    pub fn new() -> Self {
        let mut mesh = Mesh {
            verts: Pool::new(),
            faces: Pool::new(),
            edges: Vec::new(),
            free_pairs: Vec::new(),
        };

        let vh = mesh.verts.alloc();
        debug_assert_eq!(vh, V_HEAD.0);
        mesh.verts[vh].next = V_HEAD;
        mesh.verts[vh].prev = V_HEAD;

        let fh = mesh.faces.alloc();
        debug_assert_eq!(fh, F_HEAD.0);
        mesh.faces[fh].next = F_HEAD;
        mesh.faces[fh].prev = F_HEAD;

        mesh.edges.push(HalfEdge {
            next: E_HEAD,
            ..HalfEdge::default()
        });
        mesh.edges.push(HalfEdge {
            next: E_HEAD,
            ..HalfEdge::default()
        });

        mesh
    }

    // --- derived navigation -------------------------------------------------

    #[inline]
    pub fn dst(&self, e: EdgeId) -> VertId {
        self[e.sym()].org
    }

    #[inline]
    pub fn rface(&self, e: EdgeId) -> FaceId {
        self[e.sym()].lface
    }

    /// Previous edge CCW around the origin: `sym.lnext`.
    #[inline]
    pub fn oprev(&self, e: EdgeId) -> EdgeId {
        self[e.sym()].lnext
    }

    /// Previous edge CCW around the left face: `onext.sym`.
    #[inline]
    pub fn lprev(&self, e: EdgeId) -> EdgeId {
        self[e].onext.sym()
    }

    /// Previous edge CCW around the destination: `lnext.sym`.
    #[inline]
    pub fn dprev(&self, e: EdgeId) -> EdgeId {
        self[e].lnext.sym()
    }

    /// Previous edge CW around the right face: `sym.onext`.
    #[inline]
    pub fn rprev(&self, e: EdgeId) -> EdgeId {
        self[e.sym()].onext
    }

    /// Next edge CCW around the destination.
    #[inline]
    pub fn dnext(&self, e: EdgeId) -> EdgeId {
        self.rprev(e).sym()
    }

    /// Next edge CCW around the right face.
    #[inline]
    pub fn rnext(&self, e: EdgeId) -> EdgeId {
        self.oprev(e).sym()
    }

    /// Destination precedes origin in sweep order.
    #[inline]
    pub fn edge_goes_left(&self, e: EdgeId) -> bool {
        vert_leq(self[self.dst(e)].st, self[self[e].org].st)
    }

    /// Origin precedes destination in sweep order.
    #[inline]
    pub fn edge_goes_right(&self, e: EdgeId) -> bool {
        vert_leq(self[self[e].org].st, self[self.dst(e)].st)
    }

    /// Both adjacent faces exist and are interior.
    #[inline]
    pub fn edge_is_internal(&self, e: EdgeId) -> bool {
        let rf = self.rface(e);
        rf != FaceId::NONE && self[rf].inside
    }

    // --- raw constructors and destructors ----------------------------------

    fn new_pair(&mut self) -> EdgeId {
        match self.free_pairs.pop() {
            Some(base) => {
                self.edges[base as usize] = HalfEdge::default();
                self.edges[base as usize + 1] = HalfEdge::default();
                EdgeId(base)
            }
            None => {
                let base = self.edges.len() as u32;
                self.edges.push(HalfEdge::default());
                self.edges.push(HalfEdge::default());
                EdgeId(base)
            }
        }
    }

    /// Allocate an isolated edge pair and link it into the global edge list
    /// before `e_next`'s pair.
    fn make_edge_pair(&mut self, e_next: EdgeId) -> EdgeId {
        let e = self.new_pair();
        let es = e.sym();

        let e_next = if e_next.is_pair_base() {
            e_next
        } else {
            e_next.sym()
        };
        let e_prev = self[e_next.sym()].next;
        self[es].next = e_prev;
        self[e_prev].next = e;
        self[e].next = e_next;
        self[e_next.sym()].next = e;

        self[e].onext = e;
        self[e].lnext = es;
        self[es].onext = es;
        self[es].lnext = e;
        e
    }

    fn kill_edge(&mut self, e: EdgeId) {
        let e = if e.is_pair_base() { e } else { e.sym() };
        let e_next = self[e].next;
        let e_prev = self[e.sym()].next;
        self[e_next.sym()].next = e_prev;
        self[e_prev].next = e_next;
        self.free_pairs.push(e.0);
    }

    /// Allocate a vertex, attach it as the origin of every edge in
    /// `e_orig`'s onext ring, and link it into the vertex list before
    /// `v_next`.
    fn make_vertex(&mut self, e_orig: EdgeId, v_next: VertId) -> VertId {
        let v = VertId(self.verts.alloc());
        let v_prev = self[v_next].prev;
        self[v].prev = v_prev;
        self[v_prev].next = v;
        self[v].next = v_next;
        self[v_next].prev = v;

        self[v].an_edge = e_orig;
        let mut e = e_orig;
        loop {
            self[e].org = v;
            e = self[e].onext;
            if e == e_orig {
                break;
            }
        }
        v
    }

    /// Allocate a face for `e_orig`'s lnext ring, linked before `f_next`.
    /// The new face inherits `f_next`'s inside flag so faces split during
    /// the sweep stay consistently classified.
    fn make_face(&mut self, e_orig: EdgeId, f_next: FaceId) -> FaceId {
        let f = FaceId(self.faces.alloc());
        let f_prev = self[f_next].prev;
        self[f].prev = f_prev;
        self[f_prev].next = f;
        self[f].next = f_next;
        self[f_next].prev = f;

        self[f].an_edge = e_orig;
        self[f].inside = self[f_next].inside;
        let mut e = e_orig;
        loop {
            self[e].lface = f;
            e = self[e].lnext;
            if e == e_orig {
                break;
            }
        }
        f
    }

    /// Unlink and free a vertex, repointing its ring to `new_org`
    /// (possibly `NONE`).
    fn kill_vertex(&mut self, v: VertId, new_org: VertId) {
        let e_start = self[v].an_edge;
        let mut e = e_start;
        loop {
            self[e].org = new_org;
            e = self[e].onext;
            if e == e_start {
                break;
            }
        }
        let prev = self[v].prev;
        let next = self[v].next;
        self[next].prev = prev;
        self[prev].next = next;
        self.verts.release(v.0);
    }

    /// Unlink and free a face, repointing its ring to `new_lface`
    /// (possibly `NONE`).
    fn kill_face(&mut self, f: FaceId, new_lface: FaceId) {
        let e_start = self[f].an_edge;
        let mut e = e_start;
        loop {
            self[e].lface = new_lface;
            e = self[e].lnext;
            if e == e_start {
                break;
            }
        }
        let prev = self[f].prev;
        let next = self[f].next;
        self[next].prev = prev;
        self[prev].next = next;
        self.faces.release(f.0);
    }

    /// The splice primitive: exchange `a.onext` and `b.onext`, patching the
    /// lnext pointers that mirror them. Everything else in this module is
    /// built from this one operation.
    fn raw_splice(&mut self, a: EdgeId, b: EdgeId) {
        let a_onext = self[a].onext;
        let b_onext = self[b].onext;
        self[a_onext.sym()].lnext = b;
        self[b_onext.sym()].lnext = a;
        self[a].onext = b_onext;
        self[b].onext = a_onext;
    }

    // --- public operators ---------------------------------------------------

    /// Create an isolated edge with its own two vertices and face.
    pub fn make_edge(&mut self) -> EdgeId {
        let e = self.make_edge_pair(E_HEAD);
        self.make_vertex(e, V_HEAD);
        self.make_vertex(e.sym(), V_HEAD);
        self.make_face(e, F_HEAD);
        e
    }

    /// The basic topology operator. If `a.org != b.org` the two vertex
    /// rings are merged; if they are equal the ring is split and a new
    /// vertex created for `b`'s part. Likewise the left faces are merged
    /// when distinct and split when shared. Exactly one of each pair of
    /// effects happens per call.
    pub fn splice(&mut self, a: EdgeId, b: EdgeId) {
        if a == b {
            return;
        }

        let mut joining_vertices = false;
        if self[b].org != self[a].org {
            joining_vertices = true;
            let a_org = self[a].org;
            let b_org = self[b].org;
            self.kill_vertex(b_org, a_org);
        }
        let mut joining_loops = false;
        if self[b].lface != self[a].lface {
            joining_loops = true;
            let a_lface = self[a].lface;
            let b_lface = self[b].lface;
            self.kill_face(b_lface, a_lface);
        }

        self.raw_splice(b, a);

        if !joining_vertices {
            let a_org = self[a].org;
            self.make_vertex(b, a_org);
            self[a_org].an_edge = a;
        }
        if !joining_loops {
            let a_lface = self[a].lface;
            self.make_face(b, a_lface);
            self[a_lface].an_edge = a;
        }
    }

    /// Remove an edge. The adjacent faces are joined when distinct; when
    /// the edge was a face diagonal of itself the face is split instead.
    /// Endpoints with no remaining edges are destroyed.
    pub fn delete_edge(&mut self, e_del: EdgeId) {
        let e_del_sym = e_del.sym();

        let mut joining_loops = false;
        if self[e_del].lface != self.rface(e_del) {
            joining_loops = true;
            let lf = self[e_del].lface;
            let rf = self.rface(e_del);
            self.kill_face(lf, rf);
        }

        if self[e_del].onext == e_del {
            let org = self[e_del].org;
            self.kill_vertex(org, VertId::NONE);
        } else {
            let rf = self.rface(e_del);
            self[rf].an_edge = self.oprev(e_del);
            let org = self[e_del].org;
            self[org].an_edge = self[e_del].onext;
            let oprev = self.oprev(e_del);
            self.raw_splice(e_del, oprev);
            if !joining_loops {
                let lf = self[e_del].lface;
                self.make_face(e_del, lf);
            }
        }

        if self[e_del_sym].onext == e_del_sym {
            let org = self[e_del_sym].org;
            self.kill_vertex(org, VertId::NONE);
            let lf = self[e_del_sym].lface;
            self.kill_face(lf, FaceId::NONE);
        } else {
            let lf = self[e_del].lface;
            self[lf].an_edge = self.oprev(e_del_sym);
            let org = self[e_del_sym].org;
            self[org].an_edge = self[e_del_sym].onext;
            let oprev = self.oprev(e_del_sym);
            self.raw_splice(e_del_sym, oprev);
        }

        self.kill_edge(e_del);
    }

    /// Add a new edge after `e_org` around its left face, ending at a fresh
    /// vertex. Returns the new edge, whose origin is `e_org.dst`.
    pub fn add_edge_vertex(&mut self, e_org: EdgeId) -> EdgeId {
        let e_new = self.make_edge_pair(e_org);
        let e_new_sym = e_new.sym();

        let lnext = self[e_org].lnext;
        self.raw_splice(e_new, lnext);

        let dst = self.dst(e_org);
        self[e_new].org = dst;
        self.make_vertex(e_new_sym, dst);

        let lf = self[e_org].lface;
        self[e_new].lface = lf;
        self[e_new_sym].lface = lf;
        e_new
    }

    /// Split `e_org` at a new vertex. `e_org` keeps its origin; the
    /// returned edge runs from the new vertex to the old destination and
    /// inherits the winding of both halves.
    pub fn split_edge(&mut self, e_org: EdgeId) -> EdgeId {
        let temp = self.add_edge_vertex(e_org);
        let e_new = temp.sym();

        // Disconnect e_org from its destination and reconnect to e_new.org.
        let oprev = self.oprev(e_org.sym());
        self.raw_splice(e_org.sym(), oprev);
        self.raw_splice(e_org.sym(), e_new);

        let new_org = self[e_new].org;
        self[e_org.sym()].org = new_org;
        let e_new_dst = self.dst(e_new);
        self[e_new_dst].an_edge = e_new.sym();
        let rf = self.rface(e_org);
        self[e_new.sym()].lface = rf;
        self[e_new].winding = self[e_org].winding;
        self[e_new.sym()].winding = self[e_org.sym()].winding;
        e_new
    }

    /// Connect `a.dst` to `b.org` with a new edge, splitting `a`'s left
    /// face (or joining the two faces when they differ). Returns the new
    /// edge; its left face is `a`'s.
    pub fn connect(&mut self, a: EdgeId, b: EdgeId) -> EdgeId {
        let e_new = self.make_edge_pair(a);
        let e_new_sym = e_new.sym();

        let mut joining_loops = false;
        if self[b].lface != self[a].lface {
            joining_loops = true;
            let a_lface = self[a].lface;
            let b_lface = self[b].lface;
            self.kill_face(b_lface, a_lface);
        }

        let lnext = self[a].lnext;
        self.raw_splice(e_new, lnext);
        self.raw_splice(e_new_sym, b);

        let a_dst = self.dst(a);
        self[e_new].org = a_dst;
        let b_org = self[b].org;
        self[e_new_sym].org = b_org;
        let a_lface = self[a].lface;
        self[e_new].lface = a_lface;
        self[e_new_sym].lface = a_lface;
        self[a_lface].an_edge = e_new_sym;

        if !joining_loops {
            self.make_face(e_new, a_lface);
        }
        e_new
    }

    /// Destroy a face and turn its boundary into exterior edges
    /// (`lface == NONE`). Edges that end up with no face on either side
    /// are deleted along with any orphaned vertices.
    pub fn zap_face(&mut self, f_zap: FaceId) {
        let e_start = self[f_zap].an_edge;

        let mut e_next = self[e_start].lnext;
        loop {
            let e = e_next;
            e_next = self[e].lnext;

            self[e].lface = FaceId::NONE;
            if self.rface(e) == FaceId::NONE {
                if self[e].onext == e {
                    let org = self[e].org;
                    self.kill_vertex(org, VertId::NONE);
                } else {
                    let org = self[e].org;
                    self[org].an_edge = self[e].onext;
                    let oprev = self.oprev(e);
                    self.raw_splice(e, oprev);
                }
                let es = e.sym();
                if self[es].onext == es {
                    let org = self[es].org;
                    self.kill_vertex(org, VertId::NONE);
                } else {
                    let org = self[es].org;
                    self[org].an_edge = self[es].onext;
                    let oprev = self.oprev(es);
                    self.raw_splice(es, oprev);
                }
                self.kill_edge(e);
            }

            if e == e_start {
                break;
            }
        }

        let prev = self[f_zap].prev;
        let next = self[f_zap].next;
        self[next].prev = prev;
        self[prev].next = next;
        self.faces.release(f_zap.0);
    }

    /// Reset edge windings for output. Boundary edges (interior on exactly
    /// one side) get `value` oriented toward the interior; other edges are
    /// zeroed, or deleted entirely when `keep_only_boundary` is set.
    pub fn set_winding_number(&mut self, value: i32, keep_only_boundary: bool) {
        let mut e = self[E_HEAD].next;
        while e != E_HEAD {
            let e_next = self[e].next;
            let rf = self.rface(e);
            let lf = self[e].lface;
            if self[rf].inside != self[lf].inside {
                self[e].winding = if self[lf].inside { value } else { -value };
            } else if !keep_only_boundary {
                self[e].winding = 0;
            } else {
                self.delete_edge(e);
            }
            e = e_next;
        }
    }

    pub fn count_face_verts(&self, f: FaceId) -> usize {
        let e_start = self[f].an_edge;
        let mut e = e_start;
        let mut n = 0;
        loop {
            n += 1;
            e = self[e].lnext;
            if e == e_start {
                break;
            }
        }
        n
    }

    /// Doubled signed area of a face in the sweep plane.
    pub fn face_area(&self, f: FaceId) -> Real {
        let e_start = self[f].an_edge;
        let mut e = e_start;
        let mut area = 0.0;
        loop {
            let org = self[self[e].org].st;
            let dst = self[self.dst(e)].st;
            area += (org.s - dst.s) * (org.t + dst.t);
            e = self[e].lnext;
            if e == e_start {
                break;
            }
        }
        area
    }

    /// Merge pairs of adjacent interior faces whose union is convex and
    /// within `max_verts` corners. Used for polygon output sizes above 3.
    pub fn merge_convex_faces(&mut self, max_verts: usize) {
        let mut f = self[F_HEAD].next;
        while f != F_HEAD {
            if self[f].inside {
                let mut e_cur = self[f].an_edge;
                let v_start = self[e_cur].org;

                loop {
                    let mut e_next = self[e_cur].lnext;
                    let e_sym = e_cur.sym();
                    let mut merged = false;

                    if self[e_sym].lface != FaceId::NONE && self[self[e_sym].lface].inside {
                        let cur_nv = self.count_face_verts(f);
                        let sym_nv = self.count_face_verts(self[e_sym].lface);
                        if cur_nv + sym_nv - 2 <= max_verts {
                            // The union is convex iff both corners at the
                            // shared edge stay convex once it is removed.
                            let a = self[self[self.lprev(e_cur)].org].st;
                            let b = self[self[e_cur].org].st;
                            let c = self[self[self[self[e_sym].lnext].lnext].org].st;
                            let d = self[self[self.lprev(e_sym)].org].st;
                            let e2 = self[self[e_sym].org].st;
                            let f2 = self[self[self[self[e_cur].lnext].lnext].org].st;
                            if vert_ccw(a, b, c) && vert_ccw(d, e2, f2) {
                                e_next = self[e_sym].lnext;
                                self.delete_edge(e_sym);
                                merged = true;
                            }
                        }
                    }

                    if !merged && self[self[e_cur].lnext].org == v_start {
                        break;
                    }
                    e_cur = e_next;
                }
            }

            // Merging can delete the neighbor face, so the successor is
            // re-read only after the face is fully processed.
            f = self[f].next;
        }
    }

    /// Structural consistency walk. Debug builds assert every invariant of
    /// the face, vertex, and edge lists; release builds are a no-op.
    pub fn check(&self) {
        if cfg!(not(debug_assertions)) {
            return;
        }

        // Face list and lnext rings.
        let mut f_prev = F_HEAD;
        let mut f = self[F_HEAD].next;
        while f != F_HEAD {
            debug_assert_eq!(self[f].prev, f_prev);
            let e_start = self[f].an_edge;
            let mut e = e_start;
            loop {
                debug_assert!(self[e.sym()].org != VertId::NONE);
                debug_assert_eq!(self[e].lface, f);
                debug_assert_eq!(self[self[e].lnext].onext.sym(), e);
                e = self[e].lnext;
                if e == e_start {
                    break;
                }
            }
            f_prev = f;
            f = self[f].next;
        }
        debug_assert_eq!(self[F_HEAD].prev, f_prev);

        // Vertex list and onext rings.
        let mut v_prev = V_HEAD;
        let mut v = self[V_HEAD].next;
        while v != V_HEAD {
            debug_assert_eq!(self[v].prev, v_prev);
            let e_start = self[v].an_edge;
            let mut e = e_start;
            loop {
                debug_assert_eq!(self[e].org, v);
                debug_assert_eq!(self.oprev(self[e].onext), e);
                e = self[e].onext;
                if e == e_start {
                    break;
                }
            }
            v_prev = v;
            v = self[v].next;
        }
        debug_assert_eq!(self[V_HEAD].prev, v_prev);

        // Global edge list.
        let mut e = self[E_HEAD].next;
        while e != E_HEAD {
            debug_assert!(self[e].org != VertId::NONE);
            debug_assert!(self[e.sym()].org != VertId::NONE);
            e = self[e].next;
        }
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::SweepCoord;

    fn vert_count(mesh: &Mesh) -> usize {
        let mut n = 0;
        let mut v = mesh[V_HEAD].next;
        while v != V_HEAD {
            n += 1;
            v = mesh[v].next;
        }
        n
    }

    fn face_count(mesh: &Mesh) -> usize {
        let mut n = 0;
        let mut f = mesh[F_HEAD].next;
        while f != F_HEAD {
            n += 1;
            f = mesh[f].next;
        }
        n
    }

    fn edge_pair_count(mesh: &Mesh) -> usize {
        let mut n = 0;
        let mut e = mesh[E_HEAD].next;
        while e != E_HEAD {
            n += 1;
            e = mesh[e].next;
        }
        n
    }

    #[test]
    fn edge_list_links_every_pair() {
        let mut mesh = Mesh::new();
        let e1 = mesh.make_edge();
        let e2 = mesh.make_edge();
        assert_eq!(edge_pair_count(&mesh), 2);

        // Forward and backward links agree on the neighbors.
        assert_eq!(mesh[mesh[e1].next].next, E_HEAD);
        assert_eq!(mesh[E_HEAD.sym()].next, e2);

        mesh.delete_edge(e1);
        assert_eq!(edge_pair_count(&mesh), 1);
        assert_eq!(mesh[E_HEAD].next, e2);
        assert_eq!(mesh[e2].next, E_HEAD);
        mesh.check();
    }

    #[test]
    fn make_edge_builds_isolated_loop() {
        let mut mesh = Mesh::new();
        let e = mesh.make_edge();
        assert_eq!(mesh[e].lnext, e.sym());
        assert_eq!(mesh[e].onext, e);
        assert_ne!(mesh[e].org, mesh.dst(e));
        assert_eq!(vert_count(&mesh), 2);
        assert_eq!(face_count(&mesh), 1);
        mesh.check();
    }

    #[test]
    fn splice_then_connect_makes_triangle() {
        // Two edges spliced at a shared vertex, closed with connect.
        let mut mesh = Mesh::new();
        let e1 = mesh.make_edge();
        let e2 = mesh.make_edge();
        mesh.splice(e1.sym(), e2);
        assert_eq!(mesh.dst(e1), mesh[e2].org);
        assert_eq!(vert_count(&mesh), 3);

        let e3 = mesh.connect(e2, e1);
        assert_eq!(mesh[e3].org, mesh.dst(e2));
        assert_eq!(mesh.dst(e3), mesh[e1].org);
        assert_eq!(face_count(&mesh), 2);
        let f = mesh[e1].lface;
        assert_eq!(mesh.count_face_verts(f), 3);
        mesh.check();
    }

    #[test]
    fn split_edge_keeps_winding() {
        let mut mesh = Mesh::new();
        let e = mesh.make_edge();
        mesh[e].winding = 1;
        mesh[e.sym()].winding = -1;
        let dst = mesh.dst(e);

        let e_new = mesh.split_edge(e);
        assert_eq!(mesh[e_new].winding, 1);
        assert_eq!(mesh[e_new.sym()].winding, -1);
        assert_eq!(mesh.dst(e), mesh[e_new].org);
        assert_eq!(mesh.dst(e_new), dst);
        assert_eq!(vert_count(&mesh), 3);
        mesh.check();
    }

    #[test]
    fn delete_edge_rejoins_faces() {
        let mut mesh = Mesh::new();
        let e1 = mesh.make_edge();
        let e2 = mesh.make_edge();
        mesh.splice(e1.sym(), e2);
        let e3 = mesh.connect(e2, e1);
        assert_eq!(face_count(&mesh), 2);

        mesh.delete_edge(e3);
        assert_eq!(face_count(&mesh), 1);
        mesh.check();
    }

    #[test]
    fn zap_face_leaves_exterior_boundary() {
        let mut mesh = Mesh::new();
        let e1 = mesh.make_edge();
        let e2 = mesh.make_edge();
        mesh.splice(e1.sym(), e2);
        let e3 = mesh.connect(e2, e1);
        let inner = mesh[e3].lface;

        mesh.zap_face(inner);
        assert_eq!(face_count(&mesh), 1);
    }

    #[test]
    fn merge_convex_faces_joins_square_triangles() {
        // A unit square split along one diagonal: merging with max_verts 4
        // should fold the two triangles back into one quad.
        let mut mesh = Mesh::new();
        let e1 = mesh.make_edge();
        let e2 = mesh.make_edge();
        let e3 = mesh.make_edge();
        mesh.splice(e1.sym(), e2);
        mesh.splice(e2.sym(), e3);
        let e4 = mesh.connect(e3, e1);

        let corners = [
            (e1, SweepCoord::new(0.0, 0.0)),
            (e2, SweepCoord::new(1.0, 0.0)),
            (e3, SweepCoord::new(1.0, 1.0)),
            (e4, SweepCoord::new(0.0, 1.0)),
        ];
        for (e, st) in corners {
            let v = mesh[e].org;
            mesh[v].st = st;
        }

        // Split with a diagonal, mark both sides interior.
        let diag = mesh.connect(e2, e1);
        let fa = mesh[diag].lface;
        let fb = mesh.rface(diag);
        mesh[fa].inside = true;
        mesh[fb].inside = true;

        mesh.merge_convex_faces(4);
        let interior: Vec<FaceId> = {
            let mut out = Vec::new();
            let mut f = mesh[F_HEAD].next;
            while f != F_HEAD {
                if mesh[f].inside {
                    out.push(f);
                }
                f = mesh[f].next;
            }
            out
        };
        assert_eq!(interior.len(), 1);
        assert_eq!(mesh.count_face_verts(interior[0]), 4);
        mesh.check();
    }
}
