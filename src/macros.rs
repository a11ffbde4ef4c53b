#[macro_export]
macro_rules! point3f {
    ($x:expr, $y:expr, $z:expr) => {
        $crate::Point3f::new(
            $x as $crate::Float,
            $y as $crate::Float,
            $z as $crate::Float,
        )
    };
}

#[macro_export]
macro_rules! vec3f {
    ($x:expr, $y:expr, $z:expr) => {
        $crate::Vec3f::new(
            $x as $crate::Float,
            $y as $crate::Float,
            $z as $crate::Float,
        )
    };
}

/// Box literal, min corner before the semicolon.
///
/// ```
/// use raygraph::{bounds3f, point3f};
/// let unit = bounds3f!(-1, -1, -1; 1, 1, 1);
/// assert_eq!(unit.min, point3f!(-1, -1, -1));
/// assert_eq!(unit.max, point3f!(1, 1, 1));
/// ```
#[macro_export]
macro_rules! bounds3f {
    ($x0:expr, $y0:expr, $z0:expr; $x1:expr, $y1:expr, $z1:expr) => {
        $crate::Bounds3f::with_bounds(
            $crate::point3f!($x0, $y0, $z0),
            $crate::point3f!($x1, $y1, $z1),
        )
    };
}
