// others
use tracing::instrument;
// lineart
use crate::core::error::ShapeError;
use crate::core::geometry::{Bounds3f, Paths, Point3f, Ray};
use crate::core::lineart::Float;
use crate::core::shape::{Hit, Shape};
use crate::shapes::triangle::{Mesh, Triangle};

/// Two four-sided pyramids sharing a rectangular waist in the z = 0
/// plane. The waist is *a* wide along x and *b* wide along y, the
/// apexes sit *h1* above and *h2* below the waist.
#[derive(Debug)]
pub struct Shard {
    pub p1: Point3f,
    pub p2: Point3f,
    pub p3: Point3f,
    pub p4: Point3f,
    pub ph1: Point3f,
    pub ph2: Point3f,
    pub mesh: Mesh,
}

impl Shard {
    #[instrument]
    pub fn new(a: Float, b: Float, h1: Float, h2: Float) -> Result<Self, ShapeError> {
        for &(name, value) in &[("a", a), ("b", b), ("h1", h1), ("h2", h2)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ShapeError::InvalidDimension { name, value });
            }
        }
        let (ha, hb) = (a * 0.5, b * 0.5);
        let p1 = Point3f::new(ha, -hb, 0.0);
        let p2 = Point3f::new(ha, hb, 0.0);
        let p3 = Point3f::new(-ha, hb, 0.0);
        let p4 = Point3f::new(-ha, -hb, 0.0);
        let ph1 = Point3f::new(0.0, 0.0, h1);
        let ph2 = Point3f::new(0.0, 0.0, -h2);
        // counter-clockwise seen from outside
        let triangles = vec![
            Triangle::new(p1, p2, ph1),
            Triangle::new(p2, p3, ph1),
            Triangle::new(p3, p4, ph1),
            Triangle::new(p4, p1, ph1),
            Triangle::new(p2, p1, ph2),
            Triangle::new(p3, p2, ph2),
            Triangle::new(p4, p3, ph2),
            Triangle::new(p1, p4, ph2),
        ];
        Ok(Shard {
            p1,
            p2,
            p3,
            p4,
            ph1,
            ph2,
            mesh: Mesh::new(triangles)?,
        })
    }
}

impl Shape for Shard {
    fn bounding_box(&self) -> Bounds3f {
        self.mesh.bounding_box()
    }
    // surface only, there is no inside to report
    fn contains(&self, _p: &Point3f, _tolerance: Float) -> bool {
        false
    }
    fn intersect(&self, ray: &Ray) -> Hit<'_> {
        self.mesh.intersect(ray).with_shape(self)
    }
    fn paths(&self) -> Paths {
        self.mesh.paths()
    }
    fn compile(&mut self) {
        self.mesh.compile();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::{vec3_dot_vec3f, Vector3f};
    use approx::assert_relative_eq;

    #[test]
    fn eight_faces_and_bounds() {
        let shard = Shard::new(2.0, 2.0, 1.0, 1.0).unwrap();
        assert_eq!(shard.mesh.len(), 8);
        assert_eq!(shard.paths().len(), 24);
        let bb = shard.bounding_box();
        assert_eq!(bb.p_min, Point3f::new(-1.0, -1.0, -1.0));
        assert_eq!(bb.p_max, Point3f::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn asymmetric_heights() {
        let shard = Shard::new(4.0, 1.0, 3.0, 0.5).unwrap();
        let bb = shard.bounding_box();
        assert_eq!(bb.p_min, Point3f::new(-2.0, -0.5, -0.5));
        assert_eq!(bb.p_max, Point3f::new(2.0, 0.5, 3.0));
    }

    #[test]
    fn never_contains_points() {
        let shard = Shard::new(2.0, 2.0, 1.0, 1.0).unwrap();
        assert!(!shard.contains(&Point3f::new(0.0, 0.0, 0.0), 0.0));
        assert!(!shard.contains(&Point3f::new(0.1, 0.1, 0.1), 10.0));
    }

    #[test]
    fn face_normals_point_outwards() {
        let shard = Shard::new(2.0, 3.0, 1.5, 0.5).unwrap();
        for t in shard.mesh.triangles() {
            let center = Vector3f::from((t.v1 + t.v2 + t.v3) * (1.0 / 3.0));
            assert!(vec3_dot_vec3f(&t.normal(), &center) > 0.0, "{:?}", t);
        }
    }

    #[test]
    fn hit_reports_the_shard() {
        let mut shard = Shard::new(2.0, 2.0, 1.0, 1.0).unwrap();
        let ray = Ray::new(Point3f::new(0.1, 0.05, 5.0), Vector3f::new(0.0, 0.0, -1.0));
        for _ in 0..2 {
            let hit = shard.intersect(&ray);
            assert!(hit.ok());
            // top surface is 1 - max(|x|, |y|) high
            assert_relative_eq!(hit.t, 4.1, epsilon = 1e-9);
            let reported = hit.shape.unwrap() as *const dyn Shape as *const u8;
            assert_eq!(reported, &shard as *const Shard as *const u8);
            shard.compile();
        }
        assert!(shard.mesh.is_compiled());
        shard.compile();
        assert!(shard.mesh.is_compiled());
        let up = Ray::new(Point3f::new(0.1, 0.05, -5.0), Vector3f::new(0.0, 0.0, 1.0));
        assert_relative_eq!(shard.intersect(&up).t, 4.1, epsilon = 1e-9);
        let away = Ray::new(Point3f::new(3.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0));
        assert!(!shard.intersect(&away).ok());
    }

    #[test]
    fn rejects_bad_dimensions() {
        assert_eq!(
            Shard::new(1.0, -2.0, 1.0, 1.0).unwrap_err(),
            ShapeError::InvalidDimension {
                name: "b",
                value: -2.0
            }
        );
        assert!(Shard::new(1.0, 1.0, Float::INFINITY, 1.0).is_err());
        assert!(Shard::new(1.0, 1.0, 1.0, Float::NAN).is_err());
    }
}
