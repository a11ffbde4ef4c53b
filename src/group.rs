use crate::composite::CompositeCore;
use crate::geometry::{Transform, Transformable};
use crate::graph::{GraphError, SceneGraph, ShapeId};
use crate::shape::ShapeKind;
use crate::Float;
use partition::partition;

/// Ordered collection of child shapes
pub struct Group {
    pub(crate) core: CompositeCore,
}

impl Group {
    pub(crate) fn new() -> Self {
        Self { core: CompositeCore::new() }
    }

    pub fn children(&self) -> &[ShapeId] {
        self.core.children()
    }
}

impl SceneGraph {
    /// Splits the children into two buckets along the envelope's longest
    /// axis. Midpoints strictly below the group midpoint go left, strictly
    /// above go right, ties stay put. Bucketed shapes come back detached.
    pub fn partition(&mut self, id: ShapeId) -> (Vec<ShapeId>, Vec<ShapeId>) {
        let group_bounds = self.bounds(id);
        let mut kids = match &mut self[id].kind {
            ShapeKind::Group(group) if group.core.children.len() >= 2 => {
                std::mem::take(&mut group.core.children)
            }
            _ => return (Vec::new(), Vec::new()),
        };

        let axis = group_bounds.maximum_extent() as usize;
        let mid = group_bounds.centroid()[axis];
        let child_mid = |graph: &SceneGraph, child: ShapeId| -> Float {
            let tf = graph[child].transform();
            graph.bounds(child).transform(tf).centroid()[axis]
        };

        let (left, rest) = partition(&mut kids, |&c| child_mid(self, c) < mid);
        let left = left.to_vec();
        let (right, remain) = partition(rest, |&c| child_mid(self, c) > mid);
        let right = right.to_vec();
        let remain = remain.to_vec();

        for &c in left.iter().chain(right.iter()) {
            self[c].parent = None;
        }
        if let ShapeKind::Group(group) = &mut self[id].kind {
            group.core.children = remain;
        }
        self.invalidate_bounds(id);
        (left, right)
    }

    /// Wraps a batch of detached shapes into one sub-group under `parent`.
    pub fn add_child_group(
        &mut self,
        parent: ShapeId,
        shapes: Vec<ShapeId>,
    ) -> Result<ShapeId, GraphError> {
        if !matches!(self[parent].kind, ShapeKind::Group(_)) {
            return Err(GraphError::NotAGroup(parent));
        }
        for &shape in &shapes {
            if self[shape].parent.is_some() {
                return Err(GraphError::AlreadyAttached(shape));
            }
        }
        let sub = self.insert_group(Transform::identity());
        for &shape in &shapes {
            // bucket members keep their own transforms; the wrapper adds none
            self[shape].parent = Some(sub);
        }
        if let ShapeKind::Group(group) = &mut self[sub].kind {
            group.core.children = shapes;
        }
        self.add_child(parent, sub)?;
        Ok(sub)
    }

    /// Rebuilds the subtree under `id` into a bounding-volume hierarchy.
    /// A one-sided partition is put back unchanged, so co-located children
    /// stop the recursion. Safe to call on an already flat group.
    pub fn divide(&mut self, id: ShapeId, threshold: usize) {
        let span = tracing::debug_span!("divide", threshold = threshold);
        let _enter = span.enter();
        self.divide_inner(id, threshold);
    }

    fn divide_inner(&mut self, id: ShapeId, threshold: usize) {
        if let ShapeKind::Csg(csg) = &self[id].kind {
            let (left, right) = (csg.left(), csg.right());
            self.divide_inner(left, threshold);
            self.divide_inner(right, threshold);
            return;
        }

        let child_count = match &self[id].kind {
            ShapeKind::Group(group) => group.core.children.len(),
            _ => return,
        };

        if child_count > threshold {
            let (left, right) = self.partition(id);
            if !left.is_empty() && !right.is_empty() {
                tracing::debug!(left = left.len(), right = right.len(), "split group");
                self.add_child_group(id, left).expect("bucket shapes are detached");
                self.add_child_group(id, right).expect("bucket shapes are detached");
            } else {
                // one-sided split: no subdivision is possible here, put the
                // bucket back unchanged
                let bucket = if left.is_empty() { right } else { left };
                for &shape in &bucket {
                    self[shape].parent = Some(id);
                }
                if let ShapeKind::Group(group) = &mut self[id].kind {
                    group.core.children.extend(bucket);
                }
            }
        }

        let children = match &self[id].kind {
            ShapeKind::Group(group) => group.core.children.clone(),
            _ => unreachable!(),
        };
        for child in children {
            self.divide_inner(child, threshold);
        }
    }
}
