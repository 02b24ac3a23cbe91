// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// The sweep: computes the planar arrangement of the input contours and
// marks which faces are interior under the active winding rule.
//
// A vertical line sweeps left to right across the projected vertices
// (priorityq events). The edges crossing the sweep line are kept in the
// active-edge dictionary, partitioned into regions; each region knows its
// winding number. Crossing edges are split at a new vertex, coincident
// vertices are merged, and vertices with no left-going edges are tied to
// the processed part of the mesh with temporary "fixable" edges that are
// reconnected or discarded later.

use log::{debug, trace};

use crate::arena::Pool;
use crate::dict::{NodeIdx, DICT_HEAD};
use crate::geom::{
    edge_intersect, edge_sign, vert_eq, vert_l1_dist, vert_leq, SweepCoord, SENTINEL_COORD,
};
use crate::mesh::{EdgeId, Mesh, VertId, E_HEAD, F_HEAD, V_HEAD};
use crate::tess::Tess;

/// Index of an active region in the sweep's region pool.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RegionId(pub(crate) u32);

impl RegionId {
    pub const NONE: RegionId = RegionId(u32::MAX);
}

/// A region of the sweep line between two adjacent active edges. Only the
/// upper edge is stored; the lower edge belongs to the region below.
#[derive(Clone, Debug)]
pub struct ActiveRegion {
    /// Upper edge, oriented right to left.
    pub e_up: EdgeId,
    /// Dictionary node for this region.
    pub node_up: NodeIdx,
    /// Winding number just below `e_up`.
    pub winding_number: i32,
    pub inside: bool,
    /// Marks one of the two outermost regions.
    pub sentinel: bool,
    /// The upper or lower edge changed and the region needs its winding
    /// and splice invariants re-checked.
    pub dirty: bool,
    /// `e_up` is a temporary edge standing in for a vertex that had no
    /// right-going edges when it was swept.
    pub fix_upper_edge: bool,
}

impl Default for ActiveRegion {
    fn default() -> Self {
        ActiveRegion {
            e_up: EdgeId::NONE,
            node_up: DICT_HEAD,
            winding_number: 0,
            inside: false,
            sentinel: false,
            dirty: false,
            fix_upper_edge: false,
        }
    }
}

/// Sweep order over mesh vertices.
#[inline]
pub(crate) fn event_leq(mesh: &Mesh, a: VertId, b: VertId) -> bool {
    vert_leq(mesh[a].st, mesh[b].st)
}

/// Ordering of two active regions at the sweep position `event`. Both
/// upper edges touch or cross the sweep line, so each can be ranked by the
/// sign of the event against it; ties (edges ending exactly at the event)
/// fall back to comparing the left endpoints.
fn edge_leq(
    mesh: &Mesh,
    regions: &Pool<ActiveRegion>,
    event: VertId,
    reg1: RegionId,
    reg2: RegionId,
) -> bool {
    let e1 = regions[reg1.0].e_up;
    let e2 = regions[reg2.0].e_up;
    let ev = mesh[event].st;

    if mesh.dst(e1) == event {
        if mesh.dst(e2) == event {
            // Both edges end at the event; sort by their left endpoints.
            let org1 = mesh[mesh[e1].org].st;
            let org2 = mesh[mesh[e2].org].st;
            if vert_leq(org1, org2) {
                return edge_sign(mesh[mesh.dst(e2)].st, org1, org2) <= 0.0;
            }
            return edge_sign(mesh[mesh.dst(e1)].st, org2, org1) >= 0.0;
        }
        return edge_sign(mesh[mesh.dst(e2)].st, ev, mesh[mesh[e2].org].st) <= 0.0;
    }
    if mesh.dst(e2) == event {
        return edge_sign(mesh[mesh.dst(e1)].st, ev, mesh[mesh[e1].org].st) >= 0.0;
    }

    let t1 = crate::geom::edge_eval(mesh[mesh.dst(e1)].st, ev, mesh[mesh[e1].org].st);
    let t2 = crate::geom::edge_eval(mesh[mesh.dst(e2)].st, ev, mesh[mesh[e2].org].st);
    t1 >= t2
}

fn add_winding(mesh: &mut Mesh, e_dst: EdgeId, e_src: EdgeId) {
    mesh[e_dst].winding += mesh[e_src].winding;
    let w = mesh[e_src.sym()].winding;
    mesh[e_dst.sym()].winding += w;
}

/// Distribute half of the new vertex's coordinate weight across one
/// edge's endpoints, proportional to their sweep-plane distance from the
/// intersection.
fn vertex_weights(mesh: &mut Mesh, isect: VertId, org: VertId, dst: VertId) {
    let t1 = vert_l1_dist(mesh[org].st, mesh[isect].st);
    let t2 = vert_l1_dist(mesh[dst].st, mesh[isect].st);
    let (w0, w1) = if t1 + t2 > 0.0 {
        (0.5 * t2 / (t1 + t2), 0.5 * t1 / (t1 + t2))
    } else {
        (0.25, 0.25)
    };
    for i in 0..3 {
        let c = w0 * mesh[org].coords[i] + w1 * mesh[dst].coords[i];
        mesh[isect].coords[i] += c;
    }
}

/// Give an intersection vertex its 3D position: a weighted combination of
/// the four endpoints of the two edges that produced it. The vertex keeps
/// no input index.
fn get_intersect_data(
    mesh: &mut Mesh,
    isect: VertId,
    org_up: VertId,
    dst_up: VertId,
    org_lo: VertId,
    dst_lo: VertId,
) {
    mesh[isect].coords = [0.0; 3];
    mesh[isect].idx = u32::MAX;
    vertex_weights(mesh, isect, org_up, dst_up);
    vertex_weights(mesh, isect, org_lo, dst_lo);
}

impl Tess {
    #[inline]
    fn e_up(&self, reg: RegionId) -> EdgeId {
        self.regions[reg.0].e_up
    }

    fn region_below(&self, reg: RegionId) -> RegionId {
        self.dict.key(self.dict.pred(self.regions[reg.0].node_up))
    }

    fn region_above(&self, reg: RegionId) -> RegionId {
        self.dict.key(self.dict.succ(self.regions[reg.0].node_up))
    }

    fn delete_region(&mut self, reg: RegionId) {
        if self.regions[reg.0].fix_upper_edge {
            // A temporary edge is deleted with the region; it must not
            // have been merged with a real edge.
            debug_assert_eq!(self.mesh[self.regions[reg.0].e_up].winding, 0);
        }
        let e_up = self.regions[reg.0].e_up;
        let node = self.regions[reg.0].node_up;
        self.mesh[e_up].region = RegionId::NONE;
        self.dict.remove(node);
        self.regions.release(reg.0);
    }

    /// Replace a fixable region's temporary edge with a real one.
    fn fix_upper_edge(&mut self, reg: RegionId, new_edge: EdgeId) {
        debug_assert!(self.regions[reg.0].fix_upper_edge);
        let old = self.regions[reg.0].e_up;
        self.mesh.delete_edge(old);
        self.regions[reg.0].fix_upper_edge = false;
        self.regions[reg.0].e_up = new_edge;
        self.mesh[new_edge].region = reg;
    }

    fn top_left_region(&mut self, mut reg: RegionId) -> RegionId {
        let org = self.mesh[self.e_up(reg)].org;
        loop {
            reg = self.region_above(reg);
            if self.mesh[self.e_up(reg)].org != org {
                break;
            }
        }
        // If the region above is fixable, convert its temporary edge to a
        // real one ending at the shared origin.
        if self.regions[reg.0].fix_upper_edge {
            let below = self.region_below(reg);
            let a = self.e_up(below).sym();
            let b = self.mesh[self.e_up(reg)].lnext;
            let e = self.mesh.connect(a, b);
            self.fix_upper_edge(reg, e);
            reg = self.region_above(reg);
        }
        reg
    }

    fn top_right_region(&mut self, mut reg: RegionId) -> RegionId {
        let dst = self.mesh.dst(self.e_up(reg));
        loop {
            reg = self.region_above(reg);
            if self.mesh.dst(self.e_up(reg)) != dst {
                break;
            }
        }
        reg
    }

    /// Create a region whose upper edge is `e_new_up`, just below
    /// `reg_above` in the dictionary.
    fn add_region_below(&mut self, reg_above: RegionId, e_new_up: EdgeId) -> RegionId {
        let reg = RegionId(self.regions.alloc());
        self.regions[reg.0] = ActiveRegion {
            e_up: e_new_up,
            ..ActiveRegion::default()
        };
        let node_above = self.regions[reg_above.0].node_up;
        let (mesh, regions, event) = (&self.mesh, &self.regions, self.event);
        let node = self
            .dict
            .insert_before(node_above, reg, &|a, b| edge_leq(mesh, regions, event, a, b));
        self.regions[reg.0].node_up = node;
        self.mesh[e_new_up].region = reg;
        reg
    }

    fn compute_winding(&mut self, reg: RegionId) {
        let above = self.region_above(reg);
        let wn = self.regions[above.0].winding_number + self.mesh[self.e_up(reg)].winding;
        self.regions[reg.0].winding_number = wn;
        self.regions[reg.0].inside = self.winding_rule.is_inside(wn);
    }

    /// The upper and lower edges of the region are fully processed; mark
    /// its face and retire the region.
    fn finish_region(&mut self, reg: RegionId) {
        let e = self.e_up(reg);
        let f = self.mesh[e].lface;
        self.mesh[f].inside = self.regions[reg.0].inside;
        self.mesh[f].an_edge = e;
        self.delete_region(reg);
    }

    /// Finish a run of left-adjacent regions from `reg_first` down toward
    /// `reg_last` (exclusive; `RegionId::NONE` to run until the chain of
    /// shared origins breaks). Temporary edges along the way are replaced
    /// and contiguity of the left-going edges around the event is
    /// restored. Returns the lowermost left-going edge.
    fn finish_left_regions(&mut self, reg_first: RegionId, reg_last: RegionId) -> EdgeId {
        let mut reg_prev = reg_first;
        let mut e_prev = self.e_up(reg_first);

        while reg_prev != reg_last {
            self.regions[reg_prev.0].fix_upper_edge = false;
            let reg = self.region_below(reg_prev);
            let mut e = self.e_up(reg);

            if self.mesh[e].org != self.mesh[e_prev].org {
                if !self.regions[reg.0].fix_upper_edge {
                    self.finish_region(reg_prev);
                    break;
                }
                // A temporary edge; connect it to the chain for real.
                let a = self.mesh.lprev(e_prev);
                e = self.mesh.connect(a, e.sym());
                self.fix_upper_edge(reg, e);
            }

            if self.mesh[e_prev].onext != e {
                let oprev = self.mesh.oprev(e);
                self.mesh.splice(oprev, e);
                self.mesh.splice(e_prev, e);
            }

            self.finish_region(reg_prev);
            e_prev = self.e_up(reg);
            reg_prev = reg;
        }
        e_prev
    }

    /// Insert the right-going edges `e_first..e_last` (an onext run from
    /// the event) into the dictionary below `reg_up`, computing windings
    /// and merging coincident edges.
    fn add_right_edges(
        &mut self,
        reg_up: RegionId,
        e_first: EdgeId,
        e_last: EdgeId,
        e_top_left: EdgeId,
        clean_up: bool,
    ) {
        let mut e = e_first;
        loop {
            debug_assert!(self.mesh.edge_goes_right(e));
            self.add_region_below(reg_up, e.sym());
            e = self.mesh[e].onext;
            if e == e_last {
                break;
            }
        }

        let mut e_top_left = e_top_left;
        if e_top_left == EdgeId::NONE {
            let below = self.region_below(reg_up);
            e_top_left = self.mesh.rprev(self.e_up(below));
        }

        let mut reg_prev = reg_up;
        let mut e_prev = e_top_left;
        let mut first_time = true;
        let reg;
        loop {
            let r = self.region_below(reg_prev);
            let e = self.e_up(r).sym();
            if self.mesh[e].org != self.mesh[e_prev].org {
                reg = r;
                break;
            }

            if self.mesh[e].onext != e_prev {
                // Unlink e from its current origin ring and relink it
                // just below e_prev.
                let oprev = self.mesh.oprev(e);
                self.mesh.splice(oprev, e);
                let oprev = self.mesh.oprev(e_prev);
                self.mesh.splice(oprev, e);
            }

            let wn = self.regions[reg_prev.0].winding_number - self.mesh[e].winding;
            self.regions[r.0].winding_number = wn;
            self.regions[r.0].inside = self.winding_rule.is_inside(wn);

            self.regions[reg_prev.0].dirty = true;
            if !first_time && self.check_for_right_splice(reg_prev) {
                add_winding(&mut self.mesh, e, e_prev);
                self.delete_region(reg_prev);
                self.mesh.delete_edge(e_prev);
            }
            first_time = false;
            reg_prev = r;
            e_prev = e;
        }
        self.regions[reg_prev.0].dirty = true;
        debug_assert_eq!(
            self.regions[reg_prev.0].winding_number - self.mesh[self.e_up(reg).sym()].winding,
            self.regions[reg.0].winding_number
        );

        if clean_up {
            self.walk_dirty_regions(reg_prev);
        }
    }

    /// Merge two coincident vertices into one, keeping `e1`'s origin.
    fn splice_merge_vertices(&mut self, e1: EdgeId, e2: EdgeId) {
        trace!(
            "merging coincident vertices at ({}, {})",
            self.mesh[self.mesh[e1].org].st.s,
            self.mesh[self.mesh[e1].org].st.t
        );
        self.mesh.splice(e1, e2);
    }

    /// The upper and lower edges of `reg_up` are supposed to cross the
    /// sweep line in dictionary order at their origins. Restore the
    /// invariant by splicing or splitting when roundoff has broken it.
    fn check_for_right_splice(&mut self, reg_up: RegionId) -> bool {
        let reg_lo = self.region_below(reg_up);
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let org_up = self.mesh[e_up].org;
        let org_lo = self.mesh[e_lo].org;

        if vert_leq(self.mesh[org_up].st, self.mesh[org_lo].st) {
            if edge_sign(
                self.mesh[self.mesh.dst(e_lo)].st,
                self.mesh[org_up].st,
                self.mesh[org_lo].st,
            ) > 0.0
            {
                return false;
            }
            if !vert_eq(self.mesh[org_up].st, self.mesh[org_lo].st) {
                // Splice org_up into e_lo.
                self.mesh.split_edge(e_lo.sym());
                let oprev = self.mesh.oprev(e_lo);
                self.mesh.splice(e_up, oprev);
                self.regions[reg_up.0].dirty = true;
                self.regions[reg_lo.0].dirty = true;
            } else if org_up != org_lo {
                // Coincident but distinct vertices; merge them.
                let handle = self.mesh[org_up].pq_handle;
                let mesh = &self.mesh;
                self.pq.remove(handle, &|a, b| event_leq(mesh, a, b));
                let oprev = self.mesh.oprev(e_lo);
                self.splice_merge_vertices(oprev, e_up);
            }
        } else {
            if edge_sign(
                self.mesh[self.mesh.dst(e_up)].st,
                self.mesh[org_lo].st,
                self.mesh[org_up].st,
            ) < 0.0
            {
                return false;
            }
            // Splice org_lo into e_up.
            let above = self.region_above(reg_up);
            self.regions[above.0].dirty = true;
            self.regions[reg_up.0].dirty = true;
            self.mesh.split_edge(e_up.sym());
            let oprev = self.mesh.oprev(e_lo);
            self.mesh.splice(oprev, e_up);
        }
        true
    }

    /// Mirror of `check_for_right_splice` for the right (destination)
    /// endpoints of the two edges.
    fn check_for_left_splice(&mut self, reg_up: RegionId) -> bool {
        let reg_lo = self.region_below(reg_up);
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let dst_up = self.mesh.dst(e_up);
        let dst_lo = self.mesh.dst(e_lo);
        debug_assert!(!vert_eq(self.mesh[dst_up].st, self.mesh[dst_lo].st));

        if vert_leq(self.mesh[dst_up].st, self.mesh[dst_lo].st) {
            if edge_sign(
                self.mesh[dst_up].st,
                self.mesh[dst_lo].st,
                self.mesh[self.mesh[e_up].org].st,
            ) < 0.0
            {
                return false;
            }
            // dst_lo is above e_up; splice it into e_up. Splitting e_up
            // also disturbs the region above, which shares it.
            let above = self.region_above(reg_up);
            self.regions[above.0].dirty = true;
            self.regions[reg_up.0].dirty = true;
            let e = self.mesh.split_edge(e_up);
            self.mesh.splice(e_lo.sym(), e);
            let f = self.mesh[e].lface;
            let inside = self.regions[reg_up.0].inside;
            self.mesh[f].inside = inside;
        } else {
            if edge_sign(
                self.mesh[dst_lo].st,
                self.mesh[dst_up].st,
                self.mesh[self.mesh[e_lo].org].st,
            ) > 0.0
            {
                return false;
            }
            // dst_up is below e_lo; splice it into e_lo.
            self.regions[reg_up.0].dirty = true;
            self.regions[reg_lo.0].dirty = true;
            let e = self.mesh.split_edge(e_lo);
            let lnext = self.mesh[e_up].lnext;
            let oprev = self.mesh.oprev(e_lo);
            self.mesh.splice(lnext, oprev);
            let rf = self.mesh.rface(e);
            let inside = self.regions[reg_up.0].inside;
            self.mesh[rf].inside = inside;
        }
        true
    }

    /// Check whether the upper and lower edges of `reg_up` cross; if so,
    /// split both at a new vertex and queue it as an event. Returns true
    /// only when processing recursed and the caller's walk is already
    /// complete.
    fn check_for_intersect(&mut self, reg_up: RegionId) -> bool {
        let reg_lo = self.region_below(reg_up);
        let mut e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let org_up = self.mesh[e_up].org;
        let org_lo = self.mesh[e_lo].org;
        let dst_up = self.mesh.dst(e_up);
        let dst_lo = self.mesh.dst(e_lo);

        debug_assert!(!vert_eq(self.mesh[dst_lo].st, self.mesh[dst_up].st));
        debug_assert!(org_up != self.event && org_lo != self.event);
        debug_assert!(
            !self.regions[reg_up.0].fix_upper_edge && !self.regions[reg_lo.0].fix_upper_edge
        );

        if org_up == org_lo {
            // The edges share their left endpoint; nothing to intersect.
            return false;
        }

        let t_min_up = self.mesh[org_up].st.t.min(self.mesh[dst_up].st.t);
        let t_max_lo = self.mesh[org_lo].st.t.max(self.mesh[dst_lo].st.t);
        if t_min_up > t_max_lo {
            return false;
        }

        if vert_leq(self.mesh[org_up].st, self.mesh[org_lo].st) {
            if edge_sign(
                self.mesh[dst_lo].st,
                self.mesh[org_up].st,
                self.mesh[org_lo].st,
            ) > 0.0
            {
                return false;
            }
        } else if edge_sign(
            self.mesh[dst_up].st,
            self.mesh[org_lo].st,
            self.mesh[org_up].st,
        ) < 0.0
        {
            return false;
        }

        let mut isect = edge_intersect(
            self.mesh[dst_up].st,
            self.mesh[org_up].st,
            self.mesh[dst_lo].st,
            self.mesh[org_lo].st,
        );

        let event_st = self.mesh[self.event].st;
        if vert_leq(isect, event_st) {
            // Roundoff put the intersection left of the sweep line; clamp
            // it to the event so sweep order is preserved.
            isect = event_st;
        }
        let org_min = if vert_leq(self.mesh[org_up].st, self.mesh[org_lo].st) {
            org_up
        } else {
            org_lo
        };
        if vert_leq(self.mesh[org_min].st, isect) {
            isect = self.mesh[org_min].st;
        }

        if vert_eq(isect, self.mesh[org_up].st) || vert_eq(isect, self.mesh[org_lo].st) {
            // Intersection at one of the left endpoints; a splice is all
            // that is needed.
            self.check_for_right_splice(reg_up);
            return false;
        }

        let dst_up_bad =
            !vert_eq(self.mesh[dst_up].st, event_st) && edge_sign(self.mesh[dst_up].st, event_st, isect) >= 0.0;
        let dst_lo_bad =
            !vert_eq(self.mesh[dst_lo].st, event_st) && edge_sign(self.mesh[dst_lo].st, event_st, isect) <= 0.0;
        if dst_up_bad || dst_lo_bad {
            // The new edge would pass on the wrong side of the event.
            if dst_lo == self.event {
                // Splice dst_lo into e_up and reprocess the new regions.
                self.mesh.split_edge(e_up.sym());
                self.mesh.splice(e_lo.sym(), e_up);
                let reg_up = self.top_left_region(reg_up);
                e_up = self.e_up(self.region_below(reg_up));
                let below = self.region_below(reg_up);
                self.finish_left_regions(below, reg_lo);
                let oprev = self.mesh.oprev(e_up);
                self.add_right_edges(reg_up, oprev, e_up, e_up, true);
                return true;
            }
            if dst_up == self.event {
                // Splice dst_up into e_lo and reprocess.
                self.mesh.split_edge(e_lo.sym());
                let lnext = self.mesh[e_up].lnext;
                let oprev = self.mesh.oprev(e_lo);
                self.mesh.splice(lnext, oprev);
                let reg_lo2 = reg_up;
                let reg_up = self.top_right_region(reg_up);
                let e = self.mesh.rprev(self.e_up(self.region_below(reg_up)));
                self.regions[reg_lo2.0].e_up = self.mesh.oprev(e_lo);
                let e_lo2 = self.finish_left_regions(reg_lo2, RegionId::NONE);
                let onext = self.mesh[e_lo2].onext;
                let rprev = self.mesh.rprev(e_up);
                self.add_right_edges(reg_up, onext, rprev, e, true);
                return true;
            }
            // Split whichever edge strays past the event and leave the
            // rest for connect_right_vertex.
            if edge_sign(self.mesh[dst_up].st, event_st, isect) >= 0.0 {
                let above = self.region_above(reg_up);
                self.regions[above.0].dirty = true;
                self.regions[reg_up.0].dirty = true;
                self.mesh.split_edge(e_up.sym());
                let org = self.mesh[e_up].org;
                self.mesh[org].st = event_st;
            }
            if edge_sign(self.mesh[dst_lo].st, event_st, isect) <= 0.0 {
                self.regions[reg_up.0].dirty = true;
                self.regions[reg_lo.0].dirty = true;
                self.mesh.split_edge(e_lo.sym());
                let org = self.mesh[e_lo].org;
                self.mesh[org].st = event_st;
            }
            return false;
        }

        // General case: split both edges and splice them at a new vertex.
        trace!("edge intersection at ({}, {})", isect.s, isect.t);
        self.mesh.split_edge(e_up.sym());
        self.mesh.split_edge(e_lo.sym());
        let oprev = self.mesh.oprev(e_lo);
        self.mesh.splice(oprev, e_up);
        let v = self.mesh[e_up].org;
        self.mesh[v].st = isect;
        let handle = {
            let mesh = &self.mesh;
            self.pq.insert(v, &|a, b| event_leq(mesh, a, b))
        };
        self.mesh[v].pq_handle = handle;
        get_intersect_data(&mut self.mesh, v, org_up, dst_up, org_lo, dst_lo);
        let above = self.region_above(reg_up);
        self.regions[above.0].dirty = true;
        self.regions[reg_up.0].dirty = true;
        self.regions[reg_lo.0].dirty = true;
        false
    }

    /// Re-establish the dictionary invariants for every region marked
    /// dirty, walking outward from `reg_up`. Fixing one region can dirty
    /// its neighbors, so the walk loops until everything is clean.
    fn walk_dirty_regions(&mut self, mut reg_up: RegionId) {
        let mut reg_lo = self.region_below(reg_up);

        loop {
            // Find the lowest dirty region; dirt propagates downward.
            while reg_lo != RegionId::NONE && self.regions[reg_lo.0].dirty {
                reg_up = reg_lo;
                reg_lo = self.region_below(reg_lo);
            }
            if !self.regions[reg_up.0].dirty {
                reg_lo = reg_up;
                reg_up = self.region_above(reg_up);
                if reg_up == RegionId::NONE || !self.regions[reg_up.0].dirty {
                    return;
                }
            }
            self.regions[reg_up.0].dirty = false;
            let mut e_up = self.e_up(reg_up);
            let mut e_lo = self.e_up(reg_lo);

            if self.mesh.dst(e_up) != self.mesh.dst(e_lo) && self.check_for_left_splice(reg_up) {
                // A splice may strand a fixable region; drop it.
                if self.regions[reg_lo.0].fix_upper_edge {
                    self.delete_region(reg_lo);
                    self.mesh.delete_edge(e_lo);
                    reg_lo = self.region_below(reg_up);
                    e_lo = self.e_up(reg_lo);
                } else if self.regions[reg_up.0].fix_upper_edge {
                    self.delete_region(reg_up);
                    self.mesh.delete_edge(e_up);
                    reg_up = self.region_above(reg_lo);
                    e_up = self.e_up(reg_up);
                }
            }

            if self.mesh[e_up].org != self.mesh[e_lo].org {
                if self.mesh.dst(e_up) != self.mesh.dst(e_lo)
                    && !self.regions[reg_up.0].fix_upper_edge
                    && !self.regions[reg_lo.0].fix_upper_edge
                    && (self.mesh.dst(e_up) == self.event || self.mesh.dst(e_lo) == self.event)
                {
                    if self.check_for_intersect(reg_up) {
                        // Processing recursed; the walk is finished.
                        return;
                    }
                } else {
                    self.check_for_right_splice(reg_up);
                }
            }

            if self.mesh[e_up].org == self.mesh[e_lo].org
                && self.mesh.dst(e_up) == self.mesh.dst(e_lo)
            {
                // Two-edge degenerate loop; fold the windings and delete.
                add_winding(&mut self.mesh, e_lo, e_up);
                self.delete_region(reg_up);
                self.mesh.delete_edge(e_up);
                reg_up = self.region_above(reg_lo);
            }
        }
    }

    /// The event has only left-going edges. Connect its rightmost
    /// processed neighbor to it, either by recognizing a degeneracy or by
    /// adding a temporary fixable edge to the closer chain endpoint.
    fn connect_right_vertex(&mut self, mut reg_up: RegionId, mut e_bottom_left: EdgeId) {
        let mut e_top_left = self.mesh[e_bottom_left].onext;
        let reg_lo = self.region_below(reg_up);
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);
        let mut degenerate = false;

        if self.mesh.dst(e_up) != self.mesh.dst(e_lo) {
            self.check_for_intersect(reg_up);
        }

        // The upper or lower edge may now pass through the event.
        let event_st = self.mesh[self.event].st;
        if vert_eq(self.mesh[self.mesh[e_up].org].st, event_st) {
            let oprev = self.mesh.oprev(e_top_left);
            self.mesh.splice(oprev, e_up);
            reg_up = self.top_left_region(reg_up);
            let below = self.region_below(reg_up);
            e_top_left = self.e_up(below);
            self.finish_left_regions(below, reg_lo);
            degenerate = true;
        }
        if vert_eq(self.mesh[self.mesh[e_lo].org].st, event_st) {
            let oprev = self.mesh.oprev(e_lo);
            self.mesh.splice(e_bottom_left, oprev);
            e_bottom_left = self.finish_left_regions(reg_lo, RegionId::NONE);
            degenerate = true;
        }
        if degenerate {
            let onext = self.mesh[e_bottom_left].onext;
            self.add_right_edges(reg_up, onext, e_top_left, e_top_left, true);
            return;
        }

        // Connect a temporary edge to the closer of the two chain ends.
        let e_new = if vert_leq(
            self.mesh[self.mesh[e_lo].org].st,
            self.mesh[self.mesh[e_up].org].st,
        ) {
            self.mesh.oprev(e_lo)
        } else {
            e_up
        };
        let lprev = self.mesh.lprev(e_bottom_left);
        let e_new = self.mesh.connect(lprev, e_new);

        // Skip cleanup so the new region can be marked fixable before any
        // dirty-region processing deletes it.
        let onext = self.mesh[e_new].onext;
        self.add_right_edges(reg_up, e_new, onext, onext, false);
        let new_reg = self.mesh[e_new.sym()].region;
        self.regions[new_reg.0].fix_upper_edge = true;
        self.walk_dirty_regions(reg_up);
    }

    /// The event lies on, or coincides with, an edge already in the
    /// dictionary.
    fn connect_left_degenerate(&mut self, reg_up: RegionId, v_event: VertId) {
        let e = self.e_up(reg_up);
        let event_st = self.mesh[v_event].st;

        if vert_eq(self.mesh[self.mesh[e].org].st, event_st) {
            // The origin is an unprocessed vertex at the same position;
            // merge and let it come off the queue later.
            debug!("event coincides with unprocessed vertex; merging");
            let an_edge = self.mesh[v_event].an_edge;
            self.splice_merge_vertices(e, an_edge);
            return;
        }

        if !vert_eq(self.mesh[self.mesh.dst(e)].st, event_st) {
            // The event splits the edge.
            self.mesh.split_edge(e.sym());
            if self.regions[reg_up.0].fix_upper_edge {
                // The split half of a temporary edge is not needed.
                let onext = self.mesh[e].onext;
                self.mesh.delete_edge(onext);
                self.regions[reg_up.0].fix_upper_edge = false;
            }
            let an_edge = self.mesh[v_event].an_edge;
            self.mesh.splice(an_edge, e);
            self.sweep_event(v_event);
            return;
        }

        // The event coincides with the already-processed destination.
        debug!("event coincides with processed vertex; splicing");
        let reg_up = self.top_right_region(reg_up);
        let reg = self.region_below(reg_up);
        let mut e_top_right = self.e_up(reg).sym();
        let e_top_left = self.mesh[e_top_right].onext;
        let e_last = e_top_left;
        if self.regions[reg.0].fix_upper_edge {
            debug_assert!(e_top_left != e_top_right);
            self.delete_region(reg);
            self.mesh.delete_edge(e_top_right);
            e_top_right = self.mesh.oprev(e_top_left);
        }
        let an_edge = self.mesh[v_event].an_edge;
        self.mesh.splice(an_edge, e_top_right);
        let e_top_left = if self.mesh.edge_goes_left(e_top_left) {
            e_top_left
        } else {
            EdgeId::NONE
        };
        let onext = self.mesh[e_top_right].onext;
        self.add_right_edges(reg_up, onext, e_last, e_top_left, true);
    }

    /// The event's edges are all right-going: nothing about it is in the
    /// dictionary yet. Find the region containing it and either connect
    /// it leftward (if the region is interior or ends in a temporary
    /// edge) or start a fresh chain.
    fn connect_left_vertex(&mut self, v_event: VertId) {
        // Locate the containing region with a throwaway key.
        let tmp = RegionId(self.regions.alloc());
        self.regions[tmp.0] = ActiveRegion {
            e_up: self.mesh[v_event].an_edge.sym(),
            ..ActiveRegion::default()
        };
        let node = {
            let (mesh, regions, event) = (&self.mesh, &self.regions, self.event);
            self.dict
                .search(tmp, &|a, b| edge_leq(mesh, regions, event, a, b))
        };
        self.regions.release(tmp.0);
        let reg_up = self.dict.key(node);

        let reg_lo = self.region_below(reg_up);
        if reg_lo == RegionId::NONE {
            // Coplanar input can degenerate to an empty dictionary.
            return;
        }
        let e_up = self.e_up(reg_up);
        let e_lo = self.e_up(reg_lo);

        if edge_sign(
            self.mesh[self.mesh.dst(e_up)].st,
            self.mesh[v_event].st,
            self.mesh[self.mesh[e_up].org].st,
        ) == 0.0
        {
            self.connect_left_degenerate(reg_up, v_event);
            return;
        }

        // Connect to the rightmost processed vertex of either chain.
        let reg = if vert_leq(
            self.mesh[self.mesh.dst(e_lo)].st,
            self.mesh[self.mesh.dst(e_up)].st,
        ) {
            reg_up
        } else {
            reg_lo
        };

        if self.regions[reg_up.0].inside || self.regions[reg.0].fix_upper_edge {
            let e_new = if reg == reg_up {
                let a = self.mesh[v_event].an_edge.sym();
                let b = self.mesh[e_up].lnext;
                self.mesh.connect(a, b)
            } else {
                let a = self.mesh.dnext(e_lo);
                let b = self.mesh[v_event].an_edge;
                self.mesh.connect(a, b).sym()
            };
            if self.regions[reg.0].fix_upper_edge {
                self.fix_upper_edge(reg, e_new);
            } else {
                let r = self.add_region_below(reg_up, e_new);
                self.compute_winding(r);
            }
            self.sweep_event(v_event);
        } else {
            // The event sits in an exterior region; just start its own
            // right-going chain.
            let an_edge = self.mesh[v_event].an_edge;
            self.add_right_edges(reg_up, an_edge, an_edge, EdgeId::NONE, true);
        }
    }

    /// Process one sweep event.
    fn sweep_event(&mut self, v_event: VertId) {
        self.event = v_event;

        // If some incident edge is already active, the event is the right
        // endpoint of a processed chain.
        let an_edge = self.mesh[v_event].an_edge;
        let mut e = an_edge;
        while self.mesh[e].region == RegionId::NONE {
            e = self.mesh[e].onext;
            if e == an_edge {
                // All edges go right.
                self.connect_left_vertex(v_event);
                return;
            }
        }

        // Finish the regions whose upper and lower edges both end here,
        // then add the right-going edges.
        let reg_up = self.top_left_region(self.mesh[e].region);
        let reg = self.region_below(reg_up);
        let e_top_left = self.e_up(reg);
        let e_bottom_left = self.finish_left_regions(reg, RegionId::NONE);

        if self.mesh[e_bottom_left].onext == e_top_left {
            self.connect_right_vertex(reg_up, e_bottom_left);
        } else {
            let onext = self.mesh[e_bottom_left].onext;
            self.add_right_edges(reg_up, onext, e_top_left, e_top_left, true);
        }
    }

    /// Add one of the two sentinel regions bounding the dictionary, as an
    /// edge at `t` spanning the whole sweep range.
    fn add_sentinel(&mut self, t: crate::geom::Real) {
        let e = self.mesh.make_edge();
        let org = self.mesh[e].org;
        let dst = self.mesh.dst(e);
        self.mesh[org].st = SweepCoord::new(SENTINEL_COORD, t);
        self.mesh[dst].st = SweepCoord::new(-SENTINEL_COORD, t);
        self.event = dst;

        let reg = RegionId(self.regions.alloc());
        self.regions[reg.0] = ActiveRegion {
            e_up: e,
            sentinel: true,
            ..ActiveRegion::default()
        };
        let node = {
            let (mesh, regions, event) = (&self.mesh, &self.regions, self.event);
            self.dict
                .insert(reg, &|a, b| edge_leq(mesh, regions, event, a, b))
        };
        self.regions[reg.0].node_up = node;
        self.mesh[e].region = reg;
    }

    fn init_edge_dict(&mut self) {
        self.dict.clear();
        self.add_sentinel(-SENTINEL_COORD);
        self.add_sentinel(SENTINEL_COORD);
    }

    fn done_edge_dict(&mut self) {
        let mut fixed_edges = 0;
        loop {
            let node = self.dict.min();
            let reg = self.dict.key(node);
            if reg == RegionId::NONE {
                break;
            }
            if !self.regions[reg.0].sentinel {
                debug_assert!(self.regions[reg.0].fix_upper_edge);
                fixed_edges += 1;
                debug_assert!(fixed_edges == 1);
            }
            debug_assert_eq!(self.regions[reg.0].winding_number, 0);
            self.delete_region(reg);
        }
    }

    /// Remove zero-length edges and collapse the one- and two-edge
    /// contours this can produce.
    fn remove_degenerate_edges(&mut self) {
        let same_pair = |a: EdgeId, b: EdgeId| a == b || a == b.sym();

        let mut e = self.mesh[E_HEAD].next;
        while e != E_HEAD {
            let mut e_next = self.mesh[e].next;
            let mut e_lnext = self.mesh[e].lnext;

            let org = self.mesh[e].org;
            let dst = self.mesh.dst(e);
            if vert_eq(self.mesh[org].st, self.mesh[dst].st) && self.mesh[e_lnext].lnext != e {
                // Zero-length edge in a contour of three or more edges.
                self.splice_merge_vertices(e_lnext, e);
                self.mesh.delete_edge(e);
                e = e_lnext;
                e_lnext = self.mesh[e].lnext;
            }
            if self.mesh[e_lnext].lnext == e {
                // One- or two-edge contour.
                if e_lnext != e {
                    if same_pair(e_lnext, e_next) {
                        e_next = self.mesh[e_next].next;
                    }
                    self.mesh.delete_edge(e_lnext);
                }
                if same_pair(e, e_next) {
                    e_next = self.mesh[e_next].next;
                }
                self.mesh.delete_edge(e);
            }
            e = e_next;
        }
    }

    fn init_priority_q(&mut self) -> usize {
        let mut vertex_count = 0usize;
        let mut v = self.mesh[V_HEAD].next;
        while v != V_HEAD {
            vertex_count += 1;
            v = self.mesh[v].next;
        }
        // Slop for a few initial intersection events.
        self.pq = crate::priorityq::PriorityQ::with_capacity(vertex_count + 8);

        let mut v = self.mesh[V_HEAD].next;
        while v != V_HEAD {
            let handle = {
                let mesh = &self.mesh;
                self.pq.insert(v, &|a, b| event_leq(mesh, a, b))
            };
            self.mesh[v].pq_handle = handle;
            v = self.mesh[v].next;
        }
        let mesh = &self.mesh;
        self.pq.init(&|a, b| event_leq(mesh, a, b));
        vertex_count
    }

    /// Fold faces with only two edges into their neighbor, keeping the
    /// winding on the surviving edge.
    fn remove_degenerate_faces(&mut self) {
        let mut f = self.mesh[F_HEAD].next;
        while f != F_HEAD {
            let f_next = self.mesh[f].next;
            let e = self.mesh[f].an_edge;
            debug_assert!(self.mesh[e].lnext != e);
            if self.mesh[self.mesh[e].lnext].lnext == e {
                let onext = self.mesh[e].onext;
                add_winding(&mut self.mesh, onext, e);
                self.mesh.delete_edge(e);
            }
            f = f_next;
        }
    }

    /// Run the sweep: afterwards every face of the mesh is labeled inside
    /// or outside, every edge crossing has become a vertex, and coincident
    /// vertices are merged.
    pub(crate) fn compute_interior(&mut self) {
        self.remove_degenerate_edges();
        let queued = self.init_priority_q();
        self.init_edge_dict();
        debug!("sweep over {queued} queued events");

        loop {
            let v = {
                let mesh = &self.mesh;
                self.pq.extract_min(&|a, b| event_leq(mesh, a, b))
            };
            if v == VertId::NONE {
                break;
            }
            loop {
                let v_next = {
                    let mesh = &self.mesh;
                    self.pq.minimum(&|a, b| event_leq(mesh, a, b))
                };
                if v_next == VertId::NONE || !vert_eq(self.mesh[v_next].st, self.mesh[v].st) {
                    break;
                }
                let v_next = {
                    let mesh = &self.mesh;
                    self.pq.extract_min(&|a, b| event_leq(mesh, a, b))
                };
                let e1 = self.mesh[v].an_edge;
                let e2 = self.mesh[v_next].an_edge;
                self.splice_merge_vertices(e1, e2);
            }
            self.sweep_event(v);
        }

        self.done_edge_dict();
        self.remove_degenerate_faces();
        self.mesh.check();
    }
}
