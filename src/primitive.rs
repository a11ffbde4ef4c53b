use crate::geometry::{Bounds3f, Ray};
use crate::Float;
use smallvec::SmallVec;

/// Externally supplied geometry, intersected in its own local space.
pub trait Primitive: Send + Sync {
    /// All surface crossings as ray parameters, non-decreasing. Solid
    /// primitives report them in entry/exit pairs.
    fn local_intersect(&self, ray: &Ray) -> SmallVec<[Float; 4]>;

    fn object_bound(&self) -> Bounds3f;

    // open surfaces must override this; csg construction rejects them
    fn is_solid(&self) -> bool {
        true
    }
}
