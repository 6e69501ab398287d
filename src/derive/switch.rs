// Switch mechanical and structural derivation. Mechanical values feed the
// motion layer; structural values only describe assembly geometry.

use palette::Srgb;

use crate::color;
use crate::config::{
    FilmType, HousingMaterial, InternalMods, LubeState, OringThickness, SpringType,
    StabilizerQuality, SwitchConfig, SwitchType,
};
use crate::presets::{self, MotionTuning, SwitchMechanicalPreset, SwitchStructuralPreset};
use crate::units::mm;
use crate::utils::clamp;

/// Derived switch mechanics and reference heights, in meters unless a field
/// name says otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchParams {
    pub mechanical: SwitchMechanicalPreset,
    /// Total travel after o-ring compression, clamped to the travel band.
    pub total_travel: f32,
    pub pre_travel_mm: f32,
    pub spring_stiffness: f32,
    pub spring_damping: f32,
    /// Tactile bump center along the travel axis.
    pub bump_center: f32,
    pub bump_width: f32,
    pub bump_strength: f32,
    /// Zero for narrow keys and perfect stabilizers.
    pub stabilizer_amplitude: f32,
    pub spring_free_length_mm: f32,
    pub spring_compressed_length_mm: f32,
    pub spring_coils: u32,
    pub spring_wire_dia_mm: f32,
    pub spring_outer_dia_mm: f32,
    pub oring_mm: f32,
    pub film_thickness_mm: f32,
    pub footprint: f32,
    /// Housing reference heights relative to the keycap center.
    pub top_y: f32,
    pub bottom_y: f32,
    pub stem_base_y: f32,
    pub top_color: Srgb<u8>,
    pub bottom_color: Srgb<u8>,
    pub stem_color: Srgb<u8>,
    pub top_is_transparent: bool,
}

/// Structural shell dimensions in meters, clamped into assembly-safe bands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwitchStructureParams {
    pub preset: SwitchStructuralPreset,
    pub housing_width: f32,
    pub housing_depth: f32,
    pub bottom_housing_height: f32,
    pub top_housing_height: f32,
    pub stem_pole_width: f32,
    pub stem_pole_depth: f32,
    pub stem_pole_height: f32,
    pub stem_cross_arm: f32,
    pub stem_cross_slot: f32,
    pub stem_cap_height: f32,
    pub metal_leaf_height: f32,
    pub pin_length: f32,
    pub pin_span: f32,
    pub mount_plate_clearance: f32,
}

pub fn derive_switch(
    switches: &SwitchConfig,
    mods: &InternalMods,
    key_width: f32,
    key_depth: f32,
    key_height: f32,
    has_stabilizer: bool,
) -> SwitchParams {
    let tuning = presets::motion_tuning();
    derive_switch_with(
        &tuning,
        switches,
        mods,
        key_width,
        key_depth,
        key_height,
        has_stabilizer,
    )
}

/// Variant with an explicit tuning preset; the self-check uses this to
/// probe candidate travel and jitter bands without installing them.
pub fn derive_switch_with(
    tuning: &MotionTuning,
    switches: &SwitchConfig,
    mods: &InternalMods,
    key_width: f32,
    key_depth: f32,
    key_height: f32,
    has_stabilizer: bool,
) -> SwitchParams {
    let mechanical = presets::mechanical_preset(switches.switch_type);

    let (oring_mm, oring_scale) = if !switches.orings.enabled {
        (0.0, 1.0)
    } else {
        match switches.orings.thickness {
            OringThickness::Thick => (0.4, 0.66),
            OringThickness::Thin => (0.2, 0.8),
        }
    };
    let total_travel = clamp(
        mm(mechanical.travel_mm) * oring_scale,
        tuning.travel_floor,
        tuning.travel_ceiling,
    );

    let footprint = clamp(key_width.min(key_depth) * 0.64, 0.0134, 0.0152);
    let top_y = -key_height / 2.0 - 0.00115;
    let bottom_y = top_y - 0.0031;
    let stem_base_y = -key_height / 2.0 - 0.0006;

    let weight_scale = clamp((switches.spring_weight_g - 35.0) / 45.0, 0.0, 1.0);
    let spring_base = 160.0 + weight_scale * 140.0;
    let spring_stiffness = match switches.spring_type {
        SpringType::Extended => spring_base * 0.84,
        SpringType::Progressive => spring_base * 1.22,
        SpringType::Single => spring_base,
    };

    let damping_base = match switches.spring_type {
        SpringType::Extended => 19.0,
        SpringType::Progressive => 27.0,
        SpringType::Single => 23.0,
    };
    let lube_bonus = match switches.lube {
        LubeState::Stock => 0.0,
        LubeState::Factory => 2.0,
        LubeState::HandLubedThin | LubeState::HandLubedThick => 4.0,
    };
    let spring_damping = damping_base + lube_bonus;

    let bump_center = total_travel * mechanical.bump_center_ratio;
    let bump_width = (total_travel * mechanical.bump_width_ratio).max(0.00045);

    let stabilizer_amplitude = if !has_stabilizer {
        0.0
    } else {
        match switches.stabilizer_quality {
            StabilizerQuality::Perfect => 0.0,
            StabilizerQuality::MinorRattle => {
                if mods.holee_mod {
                    0.00014
                } else {
                    0.00024
                }
            }
            StabilizerQuality::Rattle => {
                if mods.holee_mod {
                    0.00032
                } else {
                    0.0006
                }
            }
        }
    };

    let spring_free_length_mm = match switches.spring_type {
        SpringType::Extended => 18.0,
        SpringType::Progressive => 16.5,
        SpringType::Single => 15.5,
    };
    let spring_compressed_length_mm =
        (spring_free_length_mm - mechanical.travel_mm * oring_scale * 1.7).max(8.2);
    let spring_coils = match switches.spring_type {
        SpringType::Extended => 22,
        SpringType::Progressive => 16,
        SpringType::Single => 19,
    };
    let spring_wire_dia_mm = if switches.spring_weight_g >= 70.0 {
        0.24
    } else if switches.spring_weight_g >= 55.0 {
        0.22
    } else {
        0.2
    };
    let spring_outer_dia_mm = if switches.spring_weight_g >= 70.0 {
        5.2
    } else if switches.spring_weight_g >= 55.0 {
        5.0
    } else {
        4.8
    };
    let film_thickness_mm = match switches.film {
        FilmType::None => 0.0,
        FilmType::Pc => 0.15,
        FilmType::Pom => 0.13,
        FilmType::Pet => 0.12,
    };

    SwitchParams {
        mechanical,
        total_travel,
        pre_travel_mm: mechanical.pre_travel_mm,
        spring_stiffness,
        spring_damping,
        bump_center,
        bump_width,
        bump_strength: mechanical.bump_strength,
        stabilizer_amplitude,
        spring_free_length_mm,
        spring_compressed_length_mm,
        spring_coils,
        spring_wire_dia_mm,
        spring_outer_dia_mm,
        oring_mm,
        film_thickness_mm,
        footprint,
        top_y,
        bottom_y,
        stem_base_y,
        top_color: color::housing_color(switches.materials.top),
        bottom_color: color::housing_color(switches.materials.bottom),
        stem_color: color::stem_color(switches.materials.stem),
        top_is_transparent: switches.materials.top == HousingMaterial::Pc,
    }
}

pub fn derive_switch_structure(switch_type: SwitchType, footprint: f32) -> SwitchStructureParams {
    let preset = presets::structural_preset(switch_type);

    SwitchStructureParams {
        preset,
        housing_width: clamp(mm(preset.housing_width_mm), 0.0128, footprint),
        housing_depth: clamp(mm(preset.housing_depth_mm), 0.0128, footprint),
        bottom_housing_height: clamp(mm(preset.bottom_housing_height_mm), 0.0048, 0.0064),
        top_housing_height: clamp(mm(preset.top_housing_height_mm), 0.0024, 0.0044),
        stem_pole_width: clamp(mm(preset.stem_pole_width_mm), 0.0032, 0.0046),
        stem_pole_depth: clamp(mm(preset.stem_pole_depth_mm), 0.0032, 0.0046),
        stem_pole_height: clamp(mm(preset.stem_pole_height_mm), 0.0026, 0.0044),
        stem_cross_arm: clamp(mm(preset.stem_cross_arm_mm), 0.0032, 0.0046),
        stem_cross_slot: clamp(mm(preset.stem_cross_slot_mm), 0.00095, 0.0015),
        stem_cap_height: clamp(mm(preset.stem_cap_height_mm), 0.0009, 0.0016),
        metal_leaf_height: clamp(mm(preset.metal_leaf_height_mm), 0.0035, 0.0058),
        pin_length: clamp(mm(preset.pin_length_mm), 0.0021, 0.0038),
        pin_span: clamp(mm(preset.pin_span_mm), 0.0042, 0.0064),
        mount_plate_clearance: clamp(mm(preset.mount_plate_clearance_mm), 0.0001, 0.00032),
    }
}
