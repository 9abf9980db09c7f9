//! A box that hatches its edges.
//!
//! Besides the twelve edges of the plain box, every stripe position
//! along an axis gets four short marks, one at each box edge running
//! parallel to that axis. A mark starts a random distance away from
//! the edge on one face, runs into the edge and leaves it on the
//! neighbouring face, so the edge looks broken rather than subdivided.
//! The density of the marks suggests shading in the plotted output.

// others
use smallvec::smallvec;
use strum::IntoEnumIterator;
use tracing::instrument;
// lineart
use crate::core::error::ShapeError;
use crate::core::geometry::{Bounds3f, Paths, Point3f, Ray, Vector3f, XYZEnum};
use crate::core::lineart::{remap, Float};
use crate::core::rng::Rng;
use crate::core::shape::{Hit, Shape};
use crate::shapes::cube::AxisBox;

// (lo, lo), (lo, hi), (hi, hi), (hi, lo) around the box
const AROUND: [(bool, bool); 4] = [(false, false), (false, true), (true, true), (true, false)];

#[derive(Debug, Copy, Clone)]
pub struct StripedAxisBox {
    pub cube: AxisBox,
    /// number of intervals per axis, 0 and 1 both mean no stripes
    pub stripes: [usize; 3],
    /// how far marks may retreat from the edge, as a fraction of the
    /// box extent along the respective axis
    pub percent: Vector3f,
    /// fixed seed for `paths()`, fresh entropy per call if `None`
    pub seed: Option<u64>,
}

impl StripedAxisBox {
    #[instrument]
    pub fn new(
        min: Point3f,
        max: Point3f,
        stripes: [usize; 3],
        percent: [Float; 3],
    ) -> Result<Self, ShapeError> {
        let percent = Vector3f::new(percent[0], percent[1], percent[2]);
        for axis in XYZEnum::iter() {
            let value = percent[axis];
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ShapeError::InvalidJitter { axis, value });
            }
        }
        Ok(StripedAxisBox {
            cube: AxisBox::new(min, max),
            stripes,
            percent,
            seed: None,
        })
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    /// Stripe marks followed by the plain box edges, drawing all
    /// jitter from *rng*.
    pub fn paths_with_rng(&self, rng: &mut Rng) -> Paths {
        let min = self.cube.min;
        let max = self.cube.max;
        let len: Vector3f = max - min;
        let mut paths: Paths = Vec::new();
        for axis in XYZEnum::iter() {
            let (b, c) = axis.others();
            let n = self.stripes[axis as usize];
            for i in 1..n {
                let p: Float = remap(i as Float, 0.0, n as Float, 0.0, 1.0);
                let coord: Float = p * len[axis] + min[axis];
                for (k, &(b_hi, c_hi)) in AROUND.iter().enumerate() {
                    let rb: Float = rng.uniform_float() * len[b] * self.percent[b];
                    let rc: Float = rng.uniform_float() * len[c] * self.percent[c];
                    let mut corner = Point3f::default();
                    corner[axis] = coord;
                    corner[b] = if b_hi { max[b] } else { min[b] };
                    corner[c] = if c_hi { max[c] } else { min[c] };
                    let mut along_b = corner;
                    along_b[b] += if b_hi { -rb } else { rb };
                    let mut along_c = corner;
                    along_c[c] += if c_hi { -rc } else { rc };
                    // alternate the direction so the marks wind around
                    if k % 2 == 0 {
                        paths.push(smallvec![along_b, corner, along_c]);
                    } else {
                        paths.push(smallvec![along_c, corner, along_b]);
                    }
                }
            }
        }
        paths.extend(self.cube.paths());
        paths
    }
}

impl Shape for StripedAxisBox {
    fn bounding_box(&self) -> Bounds3f {
        self.cube.bounding_box()
    }
    fn contains(&self, p: &Point3f, tolerance: Float) -> bool {
        self.cube.contains(p, tolerance)
    }
    fn intersect(&self, ray: &Ray) -> Hit<'_> {
        self.cube.intersect(ray).with_shape(self)
    }
    fn paths(&self) -> Paths {
        let mut rng = match self.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::from_entropy(),
        };
        self.paths_with_rng(&mut rng)
    }
    fn compile(&mut self) {
        self.cube.compile();
    }
}
