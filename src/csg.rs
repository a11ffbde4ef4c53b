use crate::geometry::{Bounds3f, Ray, Transformable};
use crate::graph::{SceneGraph, ShapeId};
use crate::intersection::{Intersection, IntersectionList};

/// Boolean combination rule for a [`Csg`] node
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CsgOp {
    Union,
    Intersection,
    Difference,
}

impl CsgOp {
    /// Whether a crossing survives the combination. `in_left`/`in_right` is
    /// the interior state *before* the crossing toggles it.
    pub fn is_intersection_valid(self, left_hit: bool, in_left: bool, in_right: bool) -> bool {
        match self {
            CsgOp::Union => (left_hit && !in_right) || (!left_hit && !in_left),
            CsgOp::Intersection => (left_hit && in_right) || (!left_hit && in_left),
            CsgOp::Difference => (left_hit && !in_right) || (!left_hit && in_left),
        }
    }
}

/// Binary CSG node: two operand subtrees combined under one rule
pub struct Csg {
    op: CsgOp,
    left: ShapeId,
    right: ShapeId,
}

impl Csg {
    pub(crate) fn new(op: CsgOp, left: ShapeId, right: ShapeId) -> Self {
        Self { op, left, right }
    }

    pub fn op(&self) -> CsgOp {
        self.op
    }

    pub fn left(&self) -> ShapeId {
        self.left
    }

    pub fn right(&self) -> ShapeId {
        self.right
    }

    // TODO: give csg nodes a CompositeCore-style cached envelope; needs the
    // same invalidation walk groups get on structural change
    pub(crate) fn bounds(&self, graph: &SceneGraph) -> Bounds3f {
        let left = graph.bounds(self.left).transform(graph[self.left].transform());
        let right = graph.bounds(self.right).transform(graph[self.right].transform());
        left.join(&right)
    }

    // both operands get the unrestricted predicate: the interior toggles need
    // each operand's complete crossing list
    pub(crate) fn local_intersect(&self, graph: &SceneGraph, ray: &Ray) -> IntersectionList {
        let left_hits = graph.intersect_where(self.left, ray, |_, _| true);
        let right_hits = graph.intersect_where(self.right, ray, |_, _| true);
        self.filter_hits(&left_hits, &right_hits)
    }

    // merges the two ascending lists and sweeps once, toggling which operands
    // the ray is inside; the source list doubles as the operand tag
    fn filter_hits(
        &self,
        left_hits: &[Intersection],
        right_hits: &[Intersection],
    ) -> IntersectionList {
        let mut kept = IntersectionList::new();
        let mut in_left = false;
        let mut in_right = false;
        let (mut li, mut ri) = (0, 0);
        while li < left_hits.len() || ri < right_hits.len() {
            let take_left = match (left_hits.get(li), right_hits.get(ri)) {
                (Some(l), Some(r)) => l.t <= r.t,
                (Some(_), None) => true,
                (None, _) => false,
            };
            if take_left {
                let crossing = left_hits[li];
                li += 1;
                if self.op.is_intersection_valid(true, in_left, in_right) {
                    kept.push(crossing);
                }
                in_left = !in_left;
            } else {
                let crossing = right_hits[ri];
                ri += 1;
                if self.op.is_intersection_valid(false, in_left, in_right) {
                    kept.push(crossing);
                }
                in_right = !in_right;
            }
        }
        kept
    }
}
