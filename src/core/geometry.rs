//! Almost all nontrivial graphics programs are built on a foundation
//! of geometric classes. These classes represent mathematical
//! constructs like points, vectors, and rays.
//!
//! # Points
//!
//! A **point** is a zero-dimensional location in 3D space. Although
//! the same representation is used for vectors, the fact that a point
//! represents a position whereas a vector represents a direction
//! leads to differences in how they are combined: the difference of
//! two points is a vector, a point plus a vector is a point.
//!
//! ```rust
//! use rs_lineart::core::geometry::{Point3f, Vector3f};
//!
//!     let origin = Point3f::default();
//!     let p = origin + Vector3f::new(1.0, 2.0, 3.0);
//!     assert_eq!(p - origin, Vector3f::new(1.0, 2.0, 3.0));
//! ```
//!
//! # Bounding Boxes
//!
//! Many parts of the system operate on axis-aligned regions of
//! space. Ray intersection acceleration structures, the hidden-line
//! pass and the primitives themselves all report their extent as a
//! **Bounds3f**, a pair of minimum and maximum corners.
//!
//! # Paths
//!
//! A **Path** is an ordered polyline of points which ends up as a
//! stroke of the plotter. Every primitive emits a set of paths for its
//! visible edges.

// std
use std::ops;
use std::ops::{Index, IndexMut};
// others
use smallvec::SmallVec;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
// lineart
use crate::core::lineart::{gamma, Float, INFINITY};

#[derive(EnumIter, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum XYZEnum {
    X = 0,
    Y = 1,
    Z = 2,
}

impl XYZEnum {
    /// The two remaining axes, in cyclic order after this one.
    pub fn others(self) -> (XYZEnum, XYZEnum) {
        match self {
            XYZEnum::X => (XYZEnum::Y, XYZEnum::Z),
            XYZEnum::Y => (XYZEnum::X, XYZEnum::Z),
            XYZEnum::Z => (XYZEnum::X, XYZEnum::Y),
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Vector3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Vector3f { x, y, z }
    }
    pub fn abs(&self) -> Vector3f {
        Vector3f {
            x: self.x.abs(),
            y: self.y.abs(),
            z: self.z.abs(),
        }
    }
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    /// Compute a new vector pointing in the same direction but with unit
    /// length.
    pub fn normalize(&self) -> Vector3f {
        *self / self.length()
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Point3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Point3f { x, y, z }
    }
}

impl From<Point3f> for Vector3f {
    fn from(p: Point3f) -> Self {
        Vector3f {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl From<Vector3f> for Point3f {
    fn from(v: Vector3f) -> Self {
        Point3f {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl_op!(-|a: Vector3f| -> Vector3f {
    Vector3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});

impl_op_ex!(+|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

// component-wise, IEEE-754 rules apply to zero components of *b*
impl_op_ex!(/|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x / b.x,
        y: a.y / b.y,
        z: a.z / b.z,
    }
});

impl_op_ex!(*|a: &Vector3f, b: Float| -> Vector3f {
    Vector3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(/|a: &Vector3f, b: Float| -> Vector3f {
    let inv: Float = 1.0 / b;
    Vector3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl_op_ex!(+|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Point3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(+|a: &Point3f, b: &Point3f| -> Point3f {
    Point3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(*|a: &Point3f, b: Float| -> Point3f {
    Point3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl Index<XYZEnum> for Vector3f {
    type Output = Float;
    fn index(&self, index: XYZEnum) -> &Float {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            _ => &self.z,
        }
    }
}

impl IndexMut<XYZEnum> for Vector3f {
    fn index_mut(&mut self, index: XYZEnum) -> &mut Float {
        match index {
            XYZEnum::X => &mut self.x,
            XYZEnum::Y => &mut self.y,
            _ => &mut self.z,
        }
    }
}

impl Index<XYZEnum> for Point3f {
    type Output = Float;
    fn index(&self, index: XYZEnum) -> &Float {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            _ => &self.z,
        }
    }
}

impl IndexMut<XYZEnum> for Point3f {
    fn index_mut(&mut self, index: XYZEnum) -> &mut Float {
        match index {
            XYZEnum::X => &mut self.x,
            XYZEnum::Y => &mut self.y,
            _ => &mut self.z,
        }
    }
}

/// Product of the Euclidean magnitudes of the two vectors and the
/// cosine of the angle between them.
pub fn vec3_dot_vec3f(v1: &Vector3f, v2: &Vector3f) -> Float {
    v1.x * v2.x + v1.y * v2.y + v1.z * v2.z
}

/// Given two vectors in 3D, the cross product is a vector that is
/// perpendicular to both of them.
pub fn vec3_cross_vec3(v1: &Vector3f, v2: &Vector3f) -> Vector3f {
    Vector3f {
        x: (v1.y * v2.z) - (v1.z * v2.y),
        y: (v1.z * v2.x) - (v1.x * v2.z),
        z: (v1.x * v2.y) - (v1.y * v2.x),
    }
}

/// Return the largest coordinate value.
pub fn vec3_max_componentf(v: &Vector3f) -> Float {
    v.x.max(v.y.max(v.z))
}

/// Return the index of the component with the largest value.
pub fn vec3_max_dimensionf(v: &Vector3f) -> XYZEnum {
    if v.x > v.y {
        if v.x > v.z {
            XYZEnum::X
        } else {
            XYZEnum::Z
        }
    } else if v.y > v.z {
        XYZEnum::Y
    } else {
        XYZEnum::Z
    }
}

/// Permute the coordinate values according to the povided
/// permutation.
pub fn vec3_permutef(v: &Vector3f, x: XYZEnum, y: XYZEnum, z: XYZEnum) -> Vector3f {
    Vector3f {
        x: v[x],
        y: v[y],
        z: v[z],
    }
}

/// Permute the coordinate values according to the povided
/// permutation.
pub fn pnt3_permutef(p: &Point3f, x: XYZEnum, y: XYZEnum, z: XYZEnum) -> Point3f {
    Point3f {
        x: p[x],
        y: p[y],
        z: p[z],
    }
}

/// Component-wise minimum of two points.
pub fn pnt3_min(p1: &Point3f, p2: &Point3f) -> Point3f {
    Point3f {
        x: p1.x.min(p2.x),
        y: p1.y.min(p2.y),
        z: p1.z.min(p2.z),
    }
}

/// Component-wise maximum of two points.
pub fn pnt3_max(p1: &Point3f, p2: &Point3f) -> Point3f {
    Point3f {
        x: p1.x.max(p2.x),
        y: p1.y.max(p2.y),
        z: p1.z.max(p2.z),
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds3f {
    pub p_min: Point3f,
    pub p_max: Point3f,
}

// an empty box, any union replaces it
impl Default for Bounds3f {
    fn default() -> Bounds3f {
        Bounds3f {
            p_min: Point3f {
                x: INFINITY,
                y: INFINITY,
                z: INFINITY,
            },
            p_max: Point3f {
                x: -INFINITY,
                y: -INFINITY,
                z: -INFINITY,
            },
        }
    }
}

impl Bounds3f {
    /// Box spanned by two arbitrary corners; min and max are sorted
    /// per axis.
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Bounds3f {
            p_min: pnt3_min(&p1, &p2),
            p_max: pnt3_max(&p1, &p2),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }
    pub fn centroid(&self) -> Point3f {
        self.p_min * 0.5 + self.p_max * 0.5
    }
    pub fn surface_area(&self) -> Float {
        let d: Vector3f = self.diagonal();
        let r: Float = d.x * d.y + d.x * d.z + d.y * d.z;
        r + r // avoid '2 *'
    }
    pub fn maximum_extent(&self) -> XYZEnum {
        let d: Vector3f = self.diagonal();
        if d.x > d.y && d.x > d.z {
            XYZEnum::X
        } else if d.y > d.z {
            XYZEnum::Y
        } else {
            XYZEnum::Z
        }
    }
    /// Position of *p* relative to the corners, (0, 0, 0) at the
    /// minimum and (1, 1, 1) at the maximum corner.
    pub fn offset(&self, p: &Point3f) -> Vector3f {
        let mut o: Vector3f = p - self.p_min;
        for i in XYZEnum::iter() {
            if self.p_max[i] > self.p_min[i] {
                o[i] /= self.p_max[i] - self.p_min[i];
            }
        }
        o
    }
    /// Conservative slab test used while traversing acceleration
    /// structures. *inv_dir* and *dir_is_neg* are precomputed once per
    /// ray.
    pub fn intersect_p(
        &self,
        ray: &Ray,
        inv_dir: &Vector3f,
        dir_is_neg: &[bool; 3],
        t_max: Float,
    ) -> bool {
        let mut t0: Float = 0.0;
        let mut t1: Float = t_max;
        for (n, i) in XYZEnum::iter().enumerate() {
            let (near, far) = if dir_is_neg[n] {
                (self.p_max[i], self.p_min[i])
            } else {
                (self.p_min[i], self.p_max[i])
            };
            let mut t_near: Float = (near - ray.o[i]) * inv_dir[i];
            let mut t_far: Float = (far - ray.o[i]) * inv_dir[i];
            // 0 * inf, the ray runs inside the slab plane
            if t_near.is_nan() {
                t_near = -INFINITY;
            }
            if t_far.is_nan() {
                t_far = INFINITY;
            }
            // update _t_far_ to ensure robust ray--bounds intersection
            t_far *= 1.0 + 2.0 * gamma(3_i32);
            t0 = t0.max(t_near);
            t1 = t1.min(t_far);
            if t0 > t1 {
                return false;
            }
        }
        true
    }
}

/// Given a bounding box and a point, the **bnd3_union_pnt3f()**
/// function returns a new bounding box that encompasses that point as
/// well as the original box.
pub fn bnd3_union_pnt3f(b: &Bounds3f, p: &Point3f) -> Bounds3f {
    Bounds3f {
        p_min: pnt3_min(&b.p_min, p),
        p_max: pnt3_max(&b.p_max, p),
    }
}

/// Construct a new box that bounds the space encompassed by two other
/// bounding boxes.
pub fn bnd3_union_bnd3f(b1: &Bounds3f, b2: &Bounds3f) -> Bounds3f {
    Bounds3f {
        p_min: pnt3_min(&b1.p_min, &b2.p_min),
        p_max: pnt3_max(&b1.p_max, &b2.p_max),
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Ray {
    /// origin
    pub o: Point3f,
    /// direction, not necessarily normalized
    pub d: Vector3f,
}

impl Ray {
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Ray { o, d }
    }
    pub fn position(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
}

/// Connected polyline. Every primitive emits two or three points per
/// path, so those stay inline.
pub type Path = SmallVec<[Point3f; 3]>;
pub type Paths = Vec<Path>;
