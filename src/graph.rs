use crate::csg::{Csg, CsgOp};
use crate::geometry::{Transform, Transformable};
use crate::group::Group;
use crate::primitive::Primitive;
use crate::shape::{ShapeKind, ShapeNode};
use crate::Point3f;
use std::num::NonZeroU32;
use std::ops::{Index, IndexMut};
use thiserror::Error;

/// Handle to a shape owned by a [`SceneGraph`]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ShapeId(NonZeroU32);

impl ShapeId {
    pub(crate) fn from_index(idx: usize) -> Self {
        Self(NonZeroU32::new(idx as u32 + 1).expect("shape arena overflow"))
    }

    fn index(self) -> usize {
        self.0.get() as usize - 1
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("shape {0:?} is not a group")]
    NotAGroup(ShapeId),
    #[error("shape {0:?} already has a parent")]
    AlreadyAttached(ShapeId),
    #[error("attaching {child:?} under {parent:?} would close a cycle")]
    Cycle { parent: ShapeId, child: ShapeId },
    #[error("shape {child:?} is not a child of {parent:?}")]
    NotAChild { parent: ShapeId, child: ShapeId },
}

/// Arena owning every shape in one scene. Containers hold their children as
/// [`ShapeId`]s; a node's parent link is a non-owning handle.
pub struct SceneGraph {
    nodes: Vec<ShapeNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn insert(&mut self, node: ShapeNode) -> ShapeId {
        self.nodes.push(node);
        ShapeId::from_index(self.nodes.len() - 1)
    }

    pub fn insert_primitive(&mut self, transform: Transform, prim: Box<dyn Primitive>) -> ShapeId {
        self.insert(ShapeNode::new(transform, ShapeKind::Primitive(prim)))
    }

    pub fn insert_group(&mut self, transform: Transform) -> ShapeId {
        self.insert(ShapeNode::new(transform, ShapeKind::Group(Group::new())))
    }

    /// Builds a CSG node over two detached shapes, taking ownership of both.
    /// Operands must be solid or the crossing sweep's inside flags break.
    pub fn insert_csg(
        &mut self,
        op: CsgOp,
        transform: Transform,
        left: ShapeId,
        right: ShapeId,
    ) -> Result<ShapeId, GraphError> {
        if self[left].parent.is_some() {
            return Err(GraphError::AlreadyAttached(left));
        }
        if right == left || self[right].parent.is_some() {
            return Err(GraphError::AlreadyAttached(right));
        }
        assert!(
            self.is_solid(left) && self.is_solid(right),
            "csg operands must be solid shapes"
        );
        let id = self.insert(ShapeNode::new(transform, ShapeKind::Csg(Csg::new(op, left, right))));
        self[left].parent = Some(id);
        self[right].parent = Some(id);
        Ok(id)
    }

    /// Appends `child` to a group. A shape has at most one container at a
    /// time.
    pub fn add_child(&mut self, parent: ShapeId, child: ShapeId) -> Result<(), GraphError> {
        if !matches!(self[parent].kind, ShapeKind::Group(_)) {
            return Err(GraphError::NotAGroup(parent));
        }
        if self[child].parent.is_some() {
            return Err(GraphError::AlreadyAttached(child));
        }
        if self.contains(child, parent) {
            return Err(GraphError::Cycle { parent, child });
        }
        self[child].parent = Some(parent);
        if let ShapeKind::Group(group) = &mut self[parent].kind {
            group.core.children.push(child);
        }
        self.invalidate_bounds(parent);
        Ok(())
    }

    pub fn remove_child(&mut self, parent: ShapeId, child: ShapeId) -> Result<(), GraphError> {
        let pos = match &self[parent].kind {
            ShapeKind::Group(group) => group.core.children.iter().position(|&c| c == child),
            _ => return Err(GraphError::NotAGroup(parent)),
        };
        let pos = pos.ok_or(GraphError::NotAChild { parent, child })?;
        if let ShapeKind::Group(group) = &mut self[parent].kind {
            group.core.children.swap_remove(pos);
        }
        self[child].parent = None;
        self.invalidate_bounds(parent);
        Ok(())
    }

    pub fn parent(&self, id: ShapeId) -> Option<ShapeId> {
        self[id].parent
    }

    pub fn transform(&self, id: ShapeId) -> Transform {
        self[id].transform
    }

    pub fn children(&self, id: ShapeId) -> &[ShapeId] {
        match &self[id].kind {
            ShapeKind::Group(group) => group.core.children(),
            _ => &[],
        }
    }

    // an ancestor's envelope encloses this subtree, so a structural change
    // stales the whole chain up to the root
    pub(crate) fn invalidate_bounds(&mut self, from: ShapeId) {
        let mut cur = Some(from);
        while let Some(id) = cur {
            if let ShapeKind::Group(group) = &mut self[id].kind {
                group.core.clear_cached_bounds();
            }
            cur = self[id].parent;
        }
    }

    /// Whether `target` is reachable from `id`, itself included.
    pub fn contains(&self, id: ShapeId, target: ShapeId) -> bool {
        if id == target {
            return true;
        }
        match &self[id].kind {
            ShapeKind::Primitive(_) => false,
            ShapeKind::Group(group) => {
                group.core.children().iter().any(|&c| self.contains(c, target))
            }
            ShapeKind::Csg(csg) => {
                self.contains(csg.left(), target) || self.contains(csg.right(), target)
            }
        }
    }

    /// Whether every primitive reachable from `id` has a well-defined
    /// interior. An empty group is vacuously solid.
    pub fn is_solid(&self, id: ShapeId) -> bool {
        match &self[id].kind {
            ShapeKind::Primitive(prim) => prim.is_solid(),
            ShapeKind::Group(group) => group.core.children().iter().all(|&c| self.is_solid(c)),
            ShapeKind::Csg(csg) => self.is_solid(csg.left()) && self.is_solid(csg.right()),
        }
    }

    // walks the parent chain root-first, peeling one inverse transform per
    // ancestor, ending in `id`'s own local space
    pub fn to_object_space(&self, id: ShapeId, p: Point3f) -> Point3f {
        let p = match self[id].parent {
            Some(parent) => self.to_object_space(parent, p),
            None => p,
        };
        p.transform(self[id].transform.inverse())
    }

    pub fn to_world_space(&self, id: ShapeId, p: Point3f) -> Point3f {
        let p = p.transform(self[id].transform);
        match self[id].parent {
            Some(parent) => self.to_world_space(parent, p),
            None => p,
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<ShapeId> for SceneGraph {
    type Output = ShapeNode;

    fn index(&self, id: ShapeId) -> &ShapeNode {
        &self.nodes[id.index()]
    }
}

impl IndexMut<ShapeId> for SceneGraph {
    fn index_mut(&mut self, id: ShapeId) -> &mut ShapeNode {
        &mut self.nodes[id.index()]
    }
}
