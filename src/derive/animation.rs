// Per-key animation coefficients consumed by the motion layer.

use crate::config::{KeycapZoneConfig, RowSculpt};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationParams {
    /// Fraction of the down-stroke treated as spring preload.
    pub preload_stage_ratio: f32,
    pub preload_stage_duration: f32,
    /// Resting forward tilt from the key's sculpt row.
    pub row_curve_bias: f32,
    /// Press ratio to pitch coupling.
    pub press_tilt_factor: f32,
    /// Lateral jitter to roll coupling.
    pub jitter_tilt_factor: f32,
    /// Extra visual dip when a flex-cut plate carries an active neighbor.
    /// The consumer decides when the linkage applies; this is the magnitude.
    pub flex_drop: f32,
    /// Rest detection thresholds.
    pub travel_epsilon: f32,
    pub velocity_epsilon: f32,
}

pub fn derive_animation(
    zone_config: &KeycapZoneConfig,
    row: u32,
    plate_flex_cuts: bool,
) -> AnimationParams {
    let row_curve_bias = match zone_config.row_sculpt {
        RowSculpt::Uniform => 0.0,
        RowSculpt::Sculpted => {
            if row <= 1 {
                -0.04
            } else if row >= 4 {
                0.02
            } else {
                -0.01
            }
        }
    };

    AnimationParams {
        preload_stage_ratio: 0.58,
        preload_stage_duration: 0.025,
        row_curve_bias,
        press_tilt_factor: 0.07,
        jitter_tilt_factor: 120.0,
        flex_drop: if plate_flex_cuts { 0.00035 } else { 0.0 },
        travel_epsilon: 0.000002,
        velocity_epsilon: 0.000001,
    }
}
