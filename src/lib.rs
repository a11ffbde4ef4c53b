#[macro_use] pub mod macros; // must stay at the top
pub mod geometry;
pub mod primitive;
pub mod intersection;
pub mod graph;
pub mod shape;
pub mod composite;
pub mod group;
pub mod csg;

#[cfg(test)]
pub(crate) mod testutil;

pub use geometry::*;
pub use graph::{GraphError, SceneGraph, ShapeId};
pub use intersection::{hit, Intersection, IntersectionList};
pub use csg::CsgOp;
pub use primitive::Primitive;
pub use shape::{ShapeKind, ShapeNode};

use cgmath::{Point3, Vector3};

pub type Float = f32;

pub type Point3f = Point3<Float>;
pub type Vec3f = Vector3<Float>;
