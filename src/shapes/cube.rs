// others
use smallvec::smallvec;
use strum::IntoEnumIterator;
use tracing::debug;
// lineart
use crate::core::geometry::{Bounds3f, Path, Paths, Point3f, Ray, XYZEnum};
use crate::core::lineart::{Float, INFINITY, INTERSECT_EPSILON};
use crate::core::shape::{Hit, Shape};

/// Axis-aligned box. The box is its own bounding volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AxisBox {
    pub min: Point3f,
    pub max: Point3f,
    pub bounds: Bounds3f,
}

impl AxisBox {
    /// Corners may be given in any order, they are sorted per axis.
    pub fn new(min: Point3f, max: Point3f) -> Self {
        let bounds = Bounds3f::new(min, max);
        if bounds.p_min != min {
            debug!(?min, ?max, "normalized swapped box corners");
        }
        AxisBox {
            min: bounds.p_min,
            max: bounds.p_max,
            bounds,
        }
    }
    /// Parametric distances where the ray enters and leaves the box,
    /// `None` when a ray parallel to a slab lies outside of it.
    fn slabs(&self, ray: &Ray) -> Option<(Float, Float)> {
        let mut t_near: Float = -INFINITY;
        let mut t_far: Float = INFINITY;
        for i in XYZEnum::iter() {
            if ray.d[i] == 0.0 {
                // +0.0 and -0.0 alike: no constraint from this axis
                // unless the origin is outside the slab
                if ray.o[i] < self.min[i] || ray.o[i] > self.max[i] {
                    return None;
                }
                continue;
            }
            let n: Float = (self.min[i] - ray.o[i]) / ray.d[i];
            let f: Float = (self.max[i] - ray.o[i]) / ray.d[i];
            t_near = t_near.max(n.min(f));
            t_far = t_far.min(n.max(f));
        }
        Some((t_near, t_far))
    }
}

impl Shape for AxisBox {
    fn bounding_box(&self) -> Bounds3f {
        self.bounds
    }
    fn contains(&self, p: &Point3f, tolerance: Float) -> bool {
        for i in XYZEnum::iter() {
            if p[i] < self.min[i] - tolerance || p[i] > self.max[i] + tolerance {
                return false;
            }
        }
        true
    }
    fn intersect(&self, ray: &Ray) -> Hit<'_> {
        let (t0, t1) = match self.slabs(ray) {
            Some(interval) => interval,
            None => return Hit::none(),
        };
        // a zero direction never reaches a face
        if !t1.is_finite() {
            return Hit::none();
        }
        // origin inside: report the far face so the box stays opaque
        if t0 < INTERSECT_EPSILON && t1 > INTERSECT_EPSILON {
            return Hit::new(self, t1);
        }
        if t0 >= INTERSECT_EPSILON && t0 < t1 {
            return Hit::new(self, t0);
        }
        Hit::none()
    }
    fn paths(&self) -> Paths {
        let (x1, y1, z1) = (self.min.x, self.min.y, self.min.z);
        let (x2, y2, z2) = (self.max.x, self.max.y, self.max.z);
        let edge = |a: (Float, Float, Float), b: (Float, Float, Float)| -> Path {
            smallvec![Point3f::new(a.0, a.1, a.2), Point3f::new(b.0, b.1, b.2)]
        };
        vec![
            // parallel to x
            edge((x1, y1, z1), (x2, y1, z1)),
            edge((x1, y1, z2), (x2, y1, z2)),
            edge((x1, y2, z2), (x2, y2, z2)),
            edge((x1, y2, z1), (x2, y2, z1)),
            // parallel to y
            edge((x1, y1, z1), (x1, y2, z1)),
            edge((x1, y1, z2), (x1, y2, z2)),
            edge((x2, y1, z2), (x2, y2, z2)),
            edge((x2, y1, z1), (x2, y2, z1)),
            // parallel to z
            edge((x1, y1, z1), (x1, y1, z2)),
            edge((x1, y2, z1), (x1, y2, z2)),
            edge((x2, y2, z1), (x2, y2, z2)),
            edge((x2, y1, z1), (x2, y1, z2)),
        ]
    }
    fn compile(&mut self) {}
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::Vector3f;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn unit_box() -> AxisBox {
        AxisBox::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 1.0, 1.0))
    }

    fn on_face(b: &AxisBox, p: &Point3f) -> bool {
        let eps: Float = 1e-9;
        b.contains(p, eps)
            && XYZEnum::iter()
                .any(|i| (p[i] - b.min[i]).abs() < eps || (p[i] - b.max[i]).abs() < eps)
    }

    #[test]
    fn swapped_corners_are_normalized() {
        let b = AxisBox::new(Point3f::new(1.0, 0.0, 1.0), Point3f::new(0.0, 1.0, 0.0));
        assert_eq!(b.min, Point3f::new(0.0, 0.0, 0.0));
        assert_eq!(b.max, Point3f::new(1.0, 1.0, 1.0));
        assert_eq!(b.bounding_box(), b.bounds);
    }

    #[test]
    fn contains_with_tolerance() {
        let b = unit_box();
        assert!(b.contains(&b.min, 0.0));
        assert!(b.contains(&b.max, 0.0));
        assert!(!b.contains(&Point3f::new(1.1, 0.5, 0.5), 0.0));
        assert!(b.contains(&Point3f::new(1.1, 0.5, 0.5), 0.2));
        assert!(!b.contains(&Point3f::new(0.5, 0.5, -0.3), 0.2));
    }

    #[test]
    fn ray_from_outside_enters_at_near_face() {
        let b = unit_box();
        let ray = Ray::new(Point3f::new(-1.0, 0.5, 0.5), Vector3f::new(1.0, 0.0, 0.0));
        let hit = b.intersect(&ray);
        assert!(hit.ok());
        assert_relative_eq!(hit.t, 1.0);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let b = unit_box();
        let ray = Ray::new(Point3f::new(-1.0, 0.5, 0.5), Vector3f::new(-1.0, 0.0, 0.0));
        let hit = b.intersect(&ray);
        assert!(!hit.ok());
        assert!(hit.shape.is_none());
        assert_eq!(hit.t, INFINITY);
    }

    #[test]
    fn zero_direction_from_inside_misses() {
        let b = unit_box();
        for &d in &[(0.0, 0.0, 0.0), (-0.0, 0.0, -0.0)] {
            let ray = Ray::new(Point3f::new(0.5, 0.5, 0.5), Vector3f::new(d.0, d.1, d.2));
            let hit = b.intersect(&ray);
            assert!(!hit.ok());
            assert!(hit.shape.is_none());
            assert_eq!(hit.t, INFINITY);
        }
    }

    #[test]
    fn ray_from_center_reports_far_face() {
        let b = unit_box();
        let ray = Ray::new(Point3f::new(0.5, 0.5, 0.5), Vector3f::new(0.3, -0.7, 0.2));
        let hit = b.intersect(&ray);
        assert!(hit.ok());
        assert!(hit.t > INTERSECT_EPSILON);
        assert!(on_face(&b, &ray.position(hit.t)));
        // exits through y = 0 first
        assert_relative_eq!(ray.position(hit.t).y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn axis_aligned_ray_through_box() {
        let b = unit_box();
        for &(o, d, t) in &[
            ((0.5, 0.5, -2.0), (0.0, 0.0, 1.0), 2.0),
            ((0.5, -3.0, 0.5), (0.0, 2.0, 0.0), 1.5),
            ((3.0, 0.5, 0.5), (-1.0, 0.0, 0.0), 2.0),
            ((3.0, 0.5, 0.5), (-1.0, -0.0, -0.0), 2.0),
        ] {
            let ray = Ray::new(Point3f::new(o.0, o.1, o.2), Vector3f::new(d.0, d.1, d.2));
            let hit = b.intersect(&ray);
            assert!(hit.ok(), "{:?} missed", ray);
            assert_relative_eq!(hit.t, t);
        }
    }

    #[test]
    fn signed_zero_direction_outside_slab_misses() {
        let b = unit_box();
        for &dy in &[0.0, -0.0] {
            let ray = Ray::new(Point3f::new(-1.0, 2.0, 0.5), Vector3f::new(1.0, dy, 0.0));
            assert!(!b.intersect(&ray).ok());
        }
    }

    #[test]
    fn ray_on_face_plane_counts_as_hit() {
        let b = unit_box();
        let ray = Ray::new(Point3f::new(-1.0, 0.0, 0.5), Vector3f::new(1.0, 0.0, 0.0));
        let hit = b.intersect(&ray);
        assert!(hit.ok());
        assert_relative_eq!(hit.t, 1.0);
    }

    #[test]
    fn ray_leaving_from_surface_does_not_hit_itself() {
        let b = unit_box();
        // starts on the x = 1 face, heading outwards
        let ray = Ray::new(Point3f::new(1.0, 0.5, 0.5), Vector3f::new(1.0, 0.0, 0.0));
        assert!(!b.intersect(&ray).ok());
    }

    #[test]
    fn hit_reports_the_box() {
        let b = unit_box();
        let ray = Ray::new(Point3f::new(0.5, 0.5, 5.0), Vector3f::new(0.0, 0.0, -1.0));
        let hit = b.intersect(&ray);
        let shape = hit.shape.expect("hit without shape");
        assert_eq!(shape.bounding_box(), b.bounds);
    }

    #[test]
    fn twelve_axis_aligned_edges() {
        let b = AxisBox::new(Point3f::new(-1.0, 2.0, 0.0), Point3f::new(3.0, 4.0, 5.0));
        let paths = b.paths();
        assert_eq!(paths.len(), 12);
        let mut corners: Vec<(Point3f, usize)> = Vec::new();
        for (n, path) in paths.iter().enumerate() {
            assert_eq!(path.len(), 2);
            let differing = XYZEnum::iter().filter(|&i| path[0][i] != path[1][i]).count();
            assert_eq!(differing, 1);
            // grouped x, y, z
            let axis = XYZEnum::iter().find(|&i| path[0][i] != path[1][i]).unwrap();
            assert_eq!(axis as usize, n / 4);
            for p in path.iter() {
                match corners.iter_mut().find(|(c, _)| c == p) {
                    Some((_, count)) => *count += 1,
                    None => corners.push((*p, 1)),
                }
            }
        }
        assert_eq!(corners.len(), 8);
        for (corner, count) in corners {
            assert_eq!(count, 3, "corner {:?}", corner);
            assert!(b.contains(&corner, 0.0));
        }
    }

    proptest! {
        #[test]
        fn corners_inside_and_outside_points_rejected(
            x in -10.0..10.0f64, y in -10.0..10.0f64, z in -10.0..10.0f64,
            w in 0.1..5.0f64, h in 0.1..5.0f64, d in 0.1..5.0f64,
            out in 0.01..3.0f64, axis in 0usize..3,
        ) {
            let b = AxisBox::new(Point3f::new(x, y, z), Point3f::new(x + w, y + h, z + d));
            prop_assert!(b.contains(&b.min, 0.0));
            prop_assert!(b.contains(&b.max, 0.0));
            let mut p = b.bounds.centroid();
            let i = XYZEnum::iter().nth(axis).unwrap();
            p[i] = b.max[i] + out;
            prop_assert!(!b.contains(&p, out * 0.5));
            prop_assert!(b.contains(&p, out * 2.0));
        }

        #[test]
        fn rays_pointing_away_never_hit(
            dx in -1.0..1.0f64, dy in -1.0..1.0f64, dz in -1.0..1.0f64,
            dist in 1.5..20.0f64,
        ) {
            let b = unit_box();
            let dir = Vector3f::new(dx, dy, dz);
            prop_assume!(dir.length() > 1e-3);
            let dir = dir.normalize();
            // outside the box's bounding sphere, heading further out
            let o = b.bounds.centroid() + dir * dist;
            let hit = b.intersect(&Ray::new(o, dir));
            prop_assert!(!hit.ok());
        }

        #[test]
        fn rays_from_center_exit_on_a_face(
            dx in -1.0..1.0f64, dy in -1.0..1.0f64, dz in -1.0..1.0f64,
        ) {
            let b = AxisBox::new(Point3f::new(-1.0, -2.0, -3.0), Point3f::new(2.0, 1.0, 0.5));
            let dir = Vector3f::new(dx, dy, dz);
            prop_assume!(dir.length() > 1e-3);
            let ray = Ray::new(b.bounds.centroid(), dir);
            let hit = b.intersect(&ray);
            prop_assert!(hit.ok());
            let p = ray.position(hit.t);
            let eps: Float = 1e-9;
            prop_assert!(b.contains(&p, eps));
            prop_assert!(XYZEnum::iter()
                .any(|i| (p[i] - b.min[i]).abs() < eps || (p[i] - b.max[i]).abs() < eps));
        }
    }
}
