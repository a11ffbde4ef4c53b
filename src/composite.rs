use crate::geometry::{Bounds3f, Ray, Transformable};
use crate::graph::{SceneGraph, ShapeId};
use crate::intersection::{sort_by_t, IntersectionList};
use crate::shape::ShapeNode;
use once_cell::sync::OnceCell;

/// Shared guts of container shapes: child list plus lazily cached envelope.
pub struct CompositeCore {
    pub(crate) children: Vec<ShapeId>,
    cached_bounds: OnceCell<Bounds3f>,
}

impl CompositeCore {
    pub(crate) fn new() -> Self {
        Self { children: Vec::new(), cached_bounds: OnceCell::new() }
    }

    pub fn children(&self) -> &[ShapeId] {
        &self.children
    }

    pub(crate) fn bounds(&self, graph: &SceneGraph) -> Bounds3f {
        *self.cached_bounds.get_or_init(|| self.compute_bounds(graph))
    }

    fn compute_bounds(&self, graph: &SceneGraph) -> Bounds3f {
        self.children.iter().fold(Bounds3f::empty(), |bb, &child| {
            let child_box = graph.bounds(child).transform(graph[child].transform());
            bb.join(&child_box)
        })
    }

    pub(crate) fn clear_cached_bounds(&mut self) {
        self.cached_bounds.take();
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self) -> bool {
        self.cached_bounds.get().is_some()
    }

    pub(crate) fn local_intersect<F>(
        &self,
        graph: &SceneGraph,
        ray: &Ray,
        include: F,
    ) -> IntersectionList
    where
        F: Fn(ShapeId, &ShapeNode) -> bool + Copy,
    {
        if !self.bounds(graph).intersect(ray) {
            return IntersectionList::new();
        }
        // no early exit: callers need the complete crossing list
        let mut all = IntersectionList::new();
        for &child in &self.children {
            all.extend(graph.intersect_where(child, ray, include));
        }
        sort_by_t(&mut all);
        all
    }
}
