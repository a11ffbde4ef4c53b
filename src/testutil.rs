//! Minimal analytic primitives for unit tests. Real primitive sets live with
//! the renderer; these exist so the composition machinery has something to
//! intersect.

use crate::geometry::{Bounds3f, Ray};
use crate::primitive::Primitive;
use crate::Float;
use cgmath::prelude::*;
use smallvec::SmallVec;

/// Unit sphere centered at the local origin.
pub(crate) struct UnitSphere;

impl Primitive for UnitSphere {
    fn local_intersect(&self, ray: &Ray) -> SmallVec<[Float; 4]> {
        let oc = ray.origin.to_vec();
        let a = ray.dir.magnitude2();
        let b = 2.0 * oc.dot(ray.dir);
        let c = oc.magnitude2() - 1.0;
        let discriminant = b * b - 4.0 * a * c;
        let mut hits = SmallVec::new();
        if discriminant >= 0.0 {
            let root = discriminant.sqrt();
            hits.push((-b - root) / (2.0 * a));
            hits.push((-b + root) / (2.0 * a));
        }
        hits
    }

    fn object_bound(&self) -> Bounds3f {
        bounds3f!(-1, -1, -1; 1, 1, 1)
    }
}

/// Open unit square in the xz plane at y = 0. Produces single (unpaired)
/// crossings, so it must report itself as not solid.
pub(crate) struct FlatPanel;

impl Primitive for FlatPanel {
    fn local_intersect(&self, ray: &Ray) -> SmallVec<[Float; 4]> {
        let mut hits = SmallVec::new();
        if ray.dir.y.abs() < 1e-6 {
            return hits;
        }
        let t = -ray.origin.y / ray.dir.y;
        let p = ray.at(t);
        if p.x.abs() <= 1.0 && p.z.abs() <= 1.0 {
            hits.push(t);
        }
        hits
    }

    fn object_bound(&self) -> Bounds3f {
        bounds3f!(-1, 0, -1; 1, 0, 1)
    }

    fn is_solid(&self) -> bool {
        false
    }
}
