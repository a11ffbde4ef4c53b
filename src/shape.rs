use crate::csg::Csg;
use crate::geometry::{Bounds3f, Ray, Transform, Transformable};
use crate::graph::{SceneGraph, ShapeId};
use crate::group::Group;
use crate::intersection::{sort_by_t, Intersection, IntersectionList};
use crate::primitive::Primitive;

pub enum ShapeKind {
    Primitive(Box<dyn Primitive>),
    Group(Group),
    Csg(Csg),
}

pub struct ShapeNode {
    // local-to-parent, fixed at insertion
    pub(crate) transform: Transform,
    pub(crate) parent: Option<ShapeId>,
    pub(crate) kind: ShapeKind,
}

impl ShapeNode {
    pub(crate) fn new(transform: Transform, kind: ShapeKind) -> Self {
        Self { transform, parent: None, kind }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn parent(&self) -> Option<ShapeId> {
        self.parent
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }
}

impl SceneGraph {
    /// Every surface crossing of `ray` against the subtree rooted at `id`,
    /// ascending in `t`. No hit is an empty list, not an error.
    pub fn intersect(&self, id: ShapeId, ray: &Ray) -> IntersectionList {
        self.intersect_where(id, ray, |_, _| true)
    }

    /// Like [`intersect`](Self::intersect) restricted to shapes accepted by
    /// `include`; a rejected node prunes its whole subtree.
    pub fn intersect_where<F>(&self, id: ShapeId, ray: &Ray, include: F) -> IntersectionList
    where
        F: Fn(ShapeId, &ShapeNode) -> bool + Copy,
    {
        let node = &self[id];
        if !include(id, node) {
            return IntersectionList::new();
        }
        let local = ray.transform(node.transform.inverse());
        self.local_intersect(id, &local, include)
    }

    pub(crate) fn local_intersect<F>(&self, id: ShapeId, ray: &Ray, include: F) -> IntersectionList
    where
        F: Fn(ShapeId, &ShapeNode) -> bool + Copy,
    {
        match &self[id].kind {
            ShapeKind::Primitive(prim) => {
                let mut hits: IntersectionList = prim
                    .local_intersect(ray)
                    .into_iter()
                    .map(|t| Intersection::new(t, id))
                    .collect();
                sort_by_t(&mut hits);
                hits
            }
            ShapeKind::Group(group) => group.core.local_intersect(self, ray, include),
            ShapeKind::Csg(csg) => csg.local_intersect(self, ray),
        }
    }

    /// The shape's extent in its own local space, before its transform.
    pub fn bounds(&self, id: ShapeId) -> Bounds3f {
        match &self[id].kind {
            ShapeKind::Primitive(prim) => prim.object_bound(),
            ShapeKind::Group(group) => group.core.bounds(self),
            ShapeKind::Csg(csg) => csg.bounds(self),
        }
    }

    /// Forces every container envelope in the subtree into its cache.
    pub fn warm_bounds(&self, id: ShapeId) {
        let span = tracing::debug_span!("warm_bounds");
        let _enter = span.enter();
        let warmed = self.warm_bounds_inner(id);
        tracing::debug!("cached {} container envelopes", warmed);
    }

    fn warm_bounds_inner(&self, id: ShapeId) -> usize {
        match &self[id].kind {
            ShapeKind::Primitive(_) => 0,
            ShapeKind::Group(group) => {
                group.core.bounds(self);
                1 + group
                    .core
                    .children()
                    .iter()
                    .map(|&child| self.warm_bounds_inner(child))
                    .sum::<usize>()
            }
            ShapeKind::Csg(csg) => {
                self.warm_bounds_inner(csg.left()) + self.warm_bounds_inner(csg.right())
            }
        }
    }
}
