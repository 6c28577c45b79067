//! Physics-specific vector helpers layered over [`photon_schema::Vec2`].
//!
//! The bare arithmetic (`Add`, `Sub`, `dot`, `length`, ...) lives on `Vec2`
//! itself in `photon-schema`, since the wire format needs it too. Everything
//! here is specific to how the simulator interprets a vector: a facing
//! bearing, or a toroidal wrap.

pub use photon_schema::Vec2;

use std::f32::consts::TAU;

/// Unit vector for an orientation in radians, where `0` means `+Y` and
/// angle increases clockwise (`spec.md` §3).
#[inline]
pub fn dir(theta: f32) -> Vec2 {
    Vec2::new(theta.sin(), theta.cos())
}

/// Mathematical modulo: always returns a value in `[0, modulus)`, even for
/// negative `x` (unlike Rust's `%`, which keeps the sign of `x`).
#[inline]
pub fn modulo(x: f32, modulus: f32) -> f32 {
    let r = x % modulus;
    if r < 0.0 {
        r + modulus
    } else {
        r
    }
}

/// Component-wise mathematical modulo of `v` against `modulus`, used to wrap
/// ship positions back into `[0, dimensions)` each tick.
#[inline]
pub fn wrap(v: Vec2, modulus: Vec2) -> Vec2 {
    Vec2::new(modulo(v.x, modulus.x), modulo(v.y, modulus.y))
}

/// Normalize an orientation into `[0, 2*PI)`.
#[inline]
pub fn normalize_angle(theta: f32) -> f32 {
    modulo(theta, TAU)
}

/// Whether `v` lies within `[0, bounds)` component-wise.
#[inline]
pub fn in_bounds(v: Vec2, bounds: Vec2) -> bool {
    v.x >= 0.0 && v.x < bounds.x && v.y >= 0.0 && v.y < bounds.y
}
