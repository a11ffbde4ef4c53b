use crate::{Float, Point3f, Vec3f};
use cgmath::prelude::*;
use cgmath::{Matrix4, Rad, Transform as cgTransform};

pub mod bounds;

pub use bounds::*;

#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: Point3f,
    pub dir: Vec3f,
    // exposure time of the originating camera sample, passed through untouched
    pub time: Float,
}

impl Ray {
    pub fn new(origin: Point3f, dir: Vec3f) -> Self {
        Self { origin, dir, time: 0.0 }
    }

    pub fn at(&self, t: Float) -> Point3f {
        self.origin + (self.dir * t)
    }
}

/// An affine transform paired with its precomputed inverse
#[derive(Clone, Copy)]
pub struct Transform {
    pub t: Matrix4<Float>,
    pub invt: Matrix4<Float>,
}

impl Transform {
    pub fn from_mat(mat: Matrix4<Float>) -> Self {
        let m_inv = mat.invert().expect("Could not invert matrix");
        Self::new(mat, m_inv)
    }

    pub fn new(mat: Matrix4<Float>, mat_inv: Matrix4<Float>) -> Self {
        Self { t: mat, invt: mat_inv }
    }

    pub fn identity() -> Self {
        Self::new(Matrix4::identity(), Matrix4::identity())
    }

    pub fn translate(delta: Vec3f) -> Self {
        let m = Matrix4::from_translation(delta);
        let m_inv = Matrix4::from_translation(-delta);
        Self::new(m, m_inv)
    }

    pub fn scale(sx: Float, sy: Float, sz: Float) -> Self {
        let m = Matrix4::from_nonuniform_scale(sx, sy, sz);
        let m_inv = Matrix4::from_nonuniform_scale(1.0 / sx, 1.0 / sy, 1.0 / sz);
        Self::new(m, m_inv)
    }

    pub fn rotate_x(theta: Float) -> Self {
        Self::new(Matrix4::from_angle_x(Rad(theta)), Matrix4::from_angle_x(Rad(-theta)))
    }

    pub fn rotate_y(theta: Float) -> Self {
        Self::new(Matrix4::from_angle_y(Rad(theta)), Matrix4::from_angle_y(Rad(-theta)))
    }

    pub fn rotate_z(theta: Float) -> Self {
        Self::new(Matrix4::from_angle_z(Rad(theta)), Matrix4::from_angle_z(Rad(-theta)))
    }

    pub fn inverse(&self) -> Self {
        Self::new(self.invt, self.t)
    }
}

impl std::ops::Mul for Transform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.t * rhs.t, rhs.invt * self.invt)
    }
}

pub trait Transformable<O = Self> {
    fn transform(&self, t: Transform) -> O;
}

impl Transformable for Vec3f {
    fn transform(&self, t: Transform) -> Self {
        t.t.transform_vector(*self)
    }
}

impl Transformable for Point3f {
    fn transform(&self, t: Transform) -> Self {
        t.t.transform_point(*self)
    }
}

impl Transformable for Ray {
    fn transform(&self, t: Transform) -> Ray {
        Ray {
            origin: self.origin.transform(t),
            dir: self.dir.transform(t),
            time: self.time,
        }
    }
}
