//! Dimensional conventions and conversions.
//!
//! Base units:
//! - Length: meter (m)
//! - Time: second (s)
//! - Angle: radian (rad)
//!
//! Part catalogs quote keycap and switch dimensions in millimeters and key
//! pitch in layout units (u); both convert to meters at the derivation
//! boundary and every derived figure downstream is metric.

/// Millimeter in meters.
pub const MM: f32 = 1.0e-3;

/// One layout unit (1u) of key pitch in meters. MX-compatible boards place
/// key centers on a 19.05 mm grid.
pub const KEY_UNIT: f32 = 0.01905;

/// Convert a catalog millimeter figure to meters.
#[inline]
pub fn mm(value: f32) -> f32 {
    value * MM
}

/// Convert meters back to millimeters for blueprint annotations.
#[inline]
pub fn to_mm(value: f32) -> f32 {
    value / MM
}
