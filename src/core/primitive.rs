//! The closed set of shapes a drawing is made of. Storing them in one
//! enum keeps a scene in a plain `Vec<Primitive>` without boxing, and
//! every query is answered on behalf of the primitive itself.

// lineart
use crate::core::geometry::{Bounds3f, Paths, Point3f, Ray};
use crate::core::lineart::Float;
use crate::core::shape::{Hit, Shape};
use crate::shapes::cube::AxisBox;
use crate::shapes::shard::Shard;
use crate::shapes::stripedcube::StripedAxisBox;
use crate::shapes::triangle::Mesh;

#[derive(Debug)]
pub enum Primitive {
    AxisBox(AxisBox),
    StripedAxisBox(StripedAxisBox),
    Shard(Shard),
    Mesh(Mesh),
}

impl Primitive {
    fn shape(&self) -> &dyn Shape {
        match self {
            Primitive::AxisBox(primitive) => primitive,
            Primitive::StripedAxisBox(primitive) => primitive,
            Primitive::Shard(primitive) => primitive,
            Primitive::Mesh(primitive) => primitive,
        }
    }
}

impl Shape for Primitive {
    fn bounding_box(&self) -> Bounds3f {
        self.shape().bounding_box()
    }
    fn contains(&self, p: &Point3f, tolerance: Float) -> bool {
        self.shape().contains(p, tolerance)
    }
    fn intersect(&self, ray: &Ray) -> Hit<'_> {
        self.shape().intersect(ray).with_shape(self)
    }
    fn paths(&self) -> Paths {
        self.shape().paths()
    }
    fn compile(&mut self) {
        match self {
            Primitive::AxisBox(primitive) => primitive.compile(),
            Primitive::StripedAxisBox(primitive) => primitive.compile(),
            Primitive::Shard(primitive) => primitive.compile(),
            Primitive::Mesh(primitive) => primitive.compile(),
        }
    }
}

impl From<AxisBox> for Primitive {
    fn from(primitive: AxisBox) -> Self {
        Primitive::AxisBox(primitive)
    }
}

impl From<StripedAxisBox> for Primitive {
    fn from(primitive: StripedAxisBox) -> Self {
        Primitive::StripedAxisBox(primitive)
    }
}

impl From<Shard> for Primitive {
    fn from(primitive: Shard) -> Self {
        Primitive::Shard(primitive)
    }
}

impl From<Mesh> for Primitive {
    fn from(primitive: Mesh) -> Self {
        Primitive::Mesh(primitive)
    }
}
