// Small numeric helpers shared by the derivation and motion layers.

/// Clamps into `[min, max]`. An inverted band resolves to `min`, and a
/// non-finite value lands on a band edge instead of propagating.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Resets non-finite values to zero.
#[inline]
pub fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Fnv-1a hash of a key id folded into [0, 1]. Seeded by identity, not
/// time, so a key wobbles the same way in every session.
pub fn key_seed(id: &str) -> f32 {
    let mut hash: u32 = 2166136261;
    for byte in id.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(16777619);
    }
    hash as f32 / u32::MAX as f32
}
