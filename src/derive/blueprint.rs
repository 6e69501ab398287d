// Blueprint readouts for the 2d diagram views. Both functions reuse the
// same presets and derivations as the 3d path so printed numbers can never
// drift from the rendered geometry.

use crate::config::{InternalMods, KeycapZoneConfig, SwitchConfig};
use crate::derive::switch::derive_switch;
use crate::presets;
use crate::units::to_mm;
use crate::utils::clamp;

/// Keycap profile section figures, in mm and degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileBlueprintGeometry {
    pub height_mm: f32,
    pub dish_mm: f32,
    /// Top face width as a fraction of the base, 0..=1.
    pub top_width_scale: f32,
    pub front_slope_deg: f32,
}

/// Switch section figures, rounded the way the diagram labels print them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwitchBlueprintMetrics {
    pub total_travel_mm: f32,
    pub pre_travel_mm: f32,
    pub spring_free_length_mm: f32,
    pub spring_compressed_mm: f32,
    pub spring_coils: u32,
    pub spring_wire_dia_mm: f32,
    pub spring_outer_dia_mm: f32,
    pub oring_mm: f32,
    pub film_thickness_mm: f32,
}

fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

pub fn profile_blueprint_geometry(zone_config: &KeycapZoneConfig) -> ProfileBlueprintGeometry {
    let preset = presets::profile_preset(zone_config.profile);
    let top_scale = zone_config.thickness.top_mm / 1.5;
    ProfileBlueprintGeometry {
        height_mm: clamp(to_mm(preset.top * top_scale + preset.height_bias), 6.8, 19.8),
        dish_mm: clamp(
            to_mm(preset.dish * (0.92 + zone_config.thickness.top_mm * 0.2)),
            0.24,
            1.45,
        ),
        top_width_scale: clamp(1.0 - preset.top_inset * 36.0, 0.68, 0.9),
        front_slope_deg: preset.angle,
    }
}

/// Section metrics from a reference 1u key with a stabilizer and no holee
/// mod, so the diagram is independent of which key is selected.
pub fn switch_blueprint_metrics(switches: &SwitchConfig) -> SwitchBlueprintMetrics {
    let derived = derive_switch(
        switches,
        &InternalMods::default(),
        0.018,
        0.018,
        0.011,
        true,
    );

    SwitchBlueprintMetrics {
        total_travel_mm: round2(to_mm(derived.total_travel)),
        pre_travel_mm: round2(derived.pre_travel_mm),
        spring_free_length_mm: round1(derived.spring_free_length_mm),
        spring_compressed_mm: round1(derived.spring_compressed_length_mm),
        spring_coils: derived.spring_coils,
        spring_wire_dia_mm: round2(derived.spring_wire_dia_mm),
        spring_outer_dia_mm: round1(derived.spring_outer_dia_mm),
        oring_mm: round2(derived.oring_mm),
        film_thickness_mm: round2(derived.film_thickness_mm),
    }
}
