use crate::graph::ShapeId;
use crate::Float;
use smallvec::SmallVec;
use std::cmp::Ordering;

/// A single ray crossing. Lists of these are kept ascending in `t`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    pub t: Float,
    pub shape: ShapeId,
}

impl Intersection {
    pub fn new(t: Float, shape: ShapeId) -> Self {
        Self { t, shape }
    }
}

/// Most rays cross only a handful of surfaces; keep those inline.
pub type IntersectionList = SmallVec<[Intersection; 8]>;

pub(crate) fn cmp_t(a: &Intersection, b: &Intersection) -> Ordering {
    a.t.partial_cmp(&b.t).expect("intersection parameter was NaN")
}

pub(crate) fn sort_by_t(hits: &mut IntersectionList) {
    hits.sort_unstable_by(cmp_t);
}

/// The visible hit: the nearest crossing with non-negative `t`.
pub fn hit(hits: &[Intersection]) -> Option<Intersection> {
    hits.iter()
        .copied()
        .filter(|i| i.t >= 0.0)
        .min_by(|a, b| cmp_t(a, b))
}
