use crate::geometry::{Ray, Transform, Transformable};
use crate::{Point3f, Vec3f};
use std::f32;

/// Axis-aligned bounding box in the shape's local space
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    pub min: Point3f,
    pub max: Point3f,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Bounds3f {
    pub fn with_bounds(min: Point3f, max: Point3f) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self::with_bounds(
            Point3f::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            Point3f::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn join(&self, other: &Bounds3f) -> Self {
        Self::with_bounds(
            Point3f::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            Point3f::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        )
    }

    pub fn join_point(&self, p: &Point3f) -> Self {
        Self::with_bounds(
            Point3f::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z)),
            Point3f::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z)),
        )
    }

    pub fn contains_point(&self, p: &Point3f) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn contains_box(&self, other: &Bounds3f) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    pub fn size(&self) -> Vec3f {
        self.max - self.min
    }

    pub fn centroid(&self) -> Point3f {
        self.min + (self.size() / 2.0)
    }

    pub fn maximum_extent(&self) -> Axis {
        let d = self.size();
        if d.x >= d.y && d.x >= d.z {
            Axis::X
        } else if d.y >= d.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    pub fn corners(&self) -> [Point3f; 8] {
        let (mn, mx) = (self.min, self.max);
        [
            Point3f::new(mn.x, mn.y, mn.z),
            Point3f::new(mx.x, mn.y, mn.z),
            Point3f::new(mn.x, mx.y, mn.z),
            Point3f::new(mn.x, mn.y, mx.z),
            Point3f::new(mx.x, mx.y, mn.z),
            Point3f::new(mx.x, mn.y, mx.z),
            Point3f::new(mn.x, mx.y, mx.z),
            Point3f::new(mx.x, mx.y, mx.z),
        ]
    }

    // a box entirely behind the origin still reports a hit: hit lists carry
    // negative parameters and the envelope must never exclude one
    pub fn intersect(&self, ray: &Ray) -> bool {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;
        for axis in 0..3 {
            let inv = 1.0 / ray.dir[axis];
            let mut t0 = (self.min[axis] - ray.origin[axis]) * inv;
            let mut t1 = (self.max[axis] - ray.origin[axis]) * inv;
            if inv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            // f32::max/min drop a NaN operand, so an origin sitting exactly on
            // a slab plane the ray runs parallel to stays inside the interval
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}

impl Transformable for Bounds3f {
    // envelope over all 8 transformed corners; translating min/max alone is
    // wrong as soon as the transform rotates or shears
    fn transform(&self, t: Transform) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        self.corners()
            .iter()
            .fold(Self::empty(), |bb, corner| bb.join_point(&corner.transform(t)))
    }
}
