//! Type definition of Float, otherwise constants and functions which
//! can be used almost everywhere else in the code.

pub type Float = f64;

pub const MACHINE_EPSILON: Float = std::f64::EPSILON * 0.5;
/// Distance below which a ray hit is treated as touching its own
/// origin. Rays leaving a surface must not hit that surface again.
pub const INTERSECT_EPSILON: Float = 1e-3;
pub const INFINITY: Float = std::f64::INFINITY;

/// Error propagation.
pub fn gamma(n: i32) -> Float {
    (n as Float * MACHINE_EPSILON) / (1.0 - n as Float * MACHINE_EPSILON)
}

/// Map *value* from the range [*a*, *b*] onto the range [*c*, *d*].
pub fn remap(value: Float, a: Float, b: Float, c: Float, d: Float) -> Float {
    c + (value - a) / (b - a) * (d - c)
}
