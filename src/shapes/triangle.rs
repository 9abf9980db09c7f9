// std
use std::sync::Arc;
// others
use smallvec::smallvec;
use tracing::{debug, instrument};
// lineart
use crate::accelerators::bvh::{BVHAccel, DEFAULT_MAX_PRIMS_IN_NODE};
use crate::core::error::ShapeError;
use crate::core::geometry::{bnd3_union_bnd3f, bnd3_union_pnt3f, pnt3_permutef, vec3_permutef};
use crate::core::geometry::{vec3_cross_vec3, vec3_max_componentf, vec3_max_dimensionf};
use crate::core::geometry::{Bounds3f, Paths, Point3f, Ray, Vector3f, XYZEnum};
use crate::core::lineart::{gamma, Float};
use crate::core::shape::{Hit, Shape};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
    pub v1: Point3f,
    pub v2: Point3f,
    pub v3: Point3f,
    pub bounds: Bounds3f,
}

impl Triangle {
    pub fn new(v1: Point3f, v2: Point3f, v3: Point3f) -> Self {
        let bounds = bnd3_union_pnt3f(&Bounds3f::new(v1, v2), &v3);
        Triangle { v1, v2, v3, bounds }
    }
    /// Unit normal, following the right-hand rule over v1, v2, v3.
    pub fn normal(&self) -> Vector3f {
        vec3_cross_vec3(&(self.v2 - self.v1), &(self.v3 - self.v1)).normalize()
    }
    /// Watertight ray-triangle test. Returns the distance along the
    /// ray, which is conservatively greater than zero.
    fn intersect_t(&self, ray: &Ray) -> Option<Float> {
        // translate vertices based on ray origin
        let mut p0t: Point3f = Point3f::from(self.v1 - ray.o);
        let mut p1t: Point3f = Point3f::from(self.v2 - ray.o);
        let mut p2t: Point3f = Point3f::from(self.v3 - ray.o);
        // permute components of triangle vertices and ray direction
        let kz: XYZEnum = vec3_max_dimensionf(&ray.d.abs());
        let (kx, ky) = kz.others();
        // keep the permutation a rotation so the winding survives
        let (kx, ky) = if kz == XYZEnum::Y { (ky, kx) } else { (kx, ky) };
        let d: Vector3f = vec3_permutef(&ray.d, kx, ky, kz);
        if d.z == 0.0 {
            return None;
        }
        p0t = pnt3_permutef(&p0t, kx, ky, kz);
        p1t = pnt3_permutef(&p1t, kx, ky, kz);
        p2t = pnt3_permutef(&p2t, kx, ky, kz);
        // apply shear transformation to translated vertex positions
        let sx: Float = -d.x / d.z;
        let sy: Float = -d.y / d.z;
        let sz: Float = 1.0 / d.z;
        p0t.x += sx * p0t.z;
        p0t.y += sy * p0t.z;
        p1t.x += sx * p1t.z;
        p1t.y += sy * p1t.z;
        p2t.x += sx * p2t.z;
        p2t.y += sy * p2t.z;
        // compute edge function coefficients _e0_, _e1_, and _e2_
        let e0: Float = p1t.x * p2t.y - p1t.y * p2t.x;
        let e1: Float = p2t.x * p0t.y - p2t.y * p0t.x;
        let e2: Float = p0t.x * p1t.y - p0t.y * p1t.x;
        // perform triangle edge and determinant tests
        if (e0 < 0.0 || e1 < 0.0 || e2 < 0.0) && (e0 > 0.0 || e1 > 0.0 || e2 > 0.0) {
            return None;
        }
        let det: Float = e0 + e1 + e2;
        if det == 0.0 {
            return None;
        }
        // compute scaled hit distance to triangle and test against ray $t$ range
        p0t.z *= sz;
        p1t.z *= sz;
        p2t.z *= sz;
        let t_scaled: Float = e0 * p0t.z + e1 * p1t.z + e2 * p2t.z;
        if (det < 0.0 && t_scaled >= 0.0) || (det > 0.0 && t_scaled <= 0.0) {
            return None;
        }
        let inv_det: Float = 1.0 / det;
        let t: Float = t_scaled * inv_det;
        // ensure that computed triangle $t$ is conservatively greater than zero
        let max_zt: Float = vec3_max_componentf(&Vector3f::new(p0t.z, p1t.z, p2t.z).abs());
        let delta_z: Float = gamma(3_i32) * max_zt;
        let max_xt: Float = vec3_max_componentf(&Vector3f::new(p0t.x, p1t.x, p2t.x).abs());
        let max_yt: Float = vec3_max_componentf(&Vector3f::new(p0t.y, p1t.y, p2t.y).abs());
        let delta_x: Float = gamma(5) * (max_xt + max_zt);
        let delta_y: Float = gamma(5) * (max_yt + max_zt);
        let delta_e: Float =
            2.0 * (gamma(2) * max_xt * max_yt + delta_y * max_xt + delta_x * max_yt);
        let max_e: Float = vec3_max_componentf(&Vector3f::new(e0, e1, e2).abs());
        let delta_t: Float =
            3.0 * (gamma(3) * max_e * max_zt + delta_e * max_zt + delta_z * max_e) * inv_det.abs();
        if t <= delta_t {
            return None;
        }
        Some(t)
    }
}

impl Shape for Triangle {
    fn bounding_box(&self) -> Bounds3f {
        self.bounds
    }
    fn contains(&self, _p: &Point3f, _tolerance: Float) -> bool {
        false
    }
    fn intersect(&self, ray: &Ray) -> Hit<'_> {
        match self.intersect_t(ray) {
            Some(t) => Hit::new(self, t),
            None => Hit::none(),
        }
    }
    fn paths(&self) -> Paths {
        vec![
            smallvec![self.v1, self.v2],
            smallvec![self.v2, self.v3],
            smallvec![self.v3, self.v1],
        ]
    }
    fn compile(&mut self) {}
}

/// A set of triangles with a cached bounding box. Ray queries go
/// through a BVH once the mesh has been compiled.
#[derive(Debug)]
pub struct Mesh {
    pub bounds: Bounds3f,
    triangles: Vec<Arc<Triangle>>,
    accel: Option<BVHAccel>,
}

impl Mesh {
    pub fn new(triangles: Vec<Triangle>) -> Result<Self, ShapeError> {
        if triangles.is_empty() {
            return Err(ShapeError::EmptyMesh);
        }
        let bounds = triangles
            .iter()
            .fold(Bounds3f::default(), |b, t| bnd3_union_bnd3f(&b, &t.bounds));
        Ok(Mesh {
            bounds,
            triangles: triangles.into_iter().map(Arc::new).collect(),
            accel: None,
        })
    }
    pub fn triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.triangles.iter().map(|t| t.as_ref())
    }
    pub fn len(&self) -> usize {
        self.triangles.len()
    }
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
    pub fn is_compiled(&self) -> bool {
        self.accel.is_some()
    }
}

impl Shape for Mesh {
    fn bounding_box(&self) -> Bounds3f {
        self.bounds
    }
    fn contains(&self, _p: &Point3f, _tolerance: Float) -> bool {
        false
    }
    fn intersect(&self, ray: &Ray) -> Hit<'_> {
        match self.accel {
            Some(ref accel) => accel.intersect(ray),
            // not compiled yet, test every triangle
            None => self
                .triangles
                .iter()
                .fold(Hit::none(), |best, t| best.min(t.intersect(ray))),
        }
    }
    fn paths(&self) -> Paths {
        self.triangles.iter().flat_map(|t| t.paths()).collect()
    }
    #[instrument(skip(self), fields(triangles = self.triangles.len()))]
    fn compile(&mut self) {
        if self.accel.is_some() {
            return;
        }
        let shapes: Vec<Arc<dyn Shape>> = self
            .triangles
            .iter()
            .map(|t| t.clone() as Arc<dyn Shape>)
            .collect();
        let accel = BVHAccel::new(shapes, DEFAULT_MAX_PRIMS_IN_NODE);
        debug!(nodes = accel.nodes.len(), "built mesh BVH");
        self.accel = Some(accel);
    }
}
