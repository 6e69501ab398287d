// Preset truth tables for keycap profiles, materials, switch mechanics and
// structure, mount geometry, and quality budgets. Derivation must read these
// through the accessor functions so runtime tuning overrides stay effective.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::config::{self, KeycapMaterial, KeycapProfile, SwitchType};
use crate::governor::QualityTier;

/// Unified keycap profile geometry, in meters and degrees. Single source for
/// every shape derivation; preview paths reuse the same rows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeycapProfilePreset {
    /// 1u cap height reference (m).
    pub top: f32,
    /// Front slope (deg).
    pub angle: f32,
    /// Top dish depth (m).
    pub dish: f32,
    /// Shell corner radius (m).
    pub radius: f32,
    /// Top plate inset (m).
    pub top_inset: f32,
    /// Depth-axis inset bias relative to the width inset.
    pub top_depth_bias: f32,
    /// Crown lift above the shell (m).
    pub crown_lift: f32,
    /// Extra height bias (m).
    pub height_bias: f32,
}

/// Material family pbr coefficients, each in 0..=1 except the color shift
/// which is an rgb channel bias.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialPbrPreset {
    pub roughness: f32,
    pub metalness: f32,
    pub clearcoat: f32,
    pub sheen: f32,
    pub color_shift: i16,
}

/// Switch mechanical behavior only; no appearance data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwitchMechanicalPreset {
    pub travel_mm: f32,
    pub pre_travel_mm: f32,
    /// Tactile bump center as a fraction of total travel.
    pub bump_center_ratio: f32,
    /// Tactile bump width as a fraction of total travel.
    pub bump_width_ratio: f32,
    pub bump_strength: f32,
}

/// Mx style switch shell dimensions in mm. Assembly semantics only, no
/// manufacturing tolerances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwitchStructuralPreset {
    pub housing_width_mm: f32,
    pub housing_depth_mm: f32,
    pub bottom_housing_height_mm: f32,
    pub top_housing_height_mm: f32,
    pub stem_pole_width_mm: f32,
    pub stem_pole_depth_mm: f32,
    pub stem_pole_height_mm: f32,
    pub stem_cross_arm_mm: f32,
    pub stem_cross_slot_mm: f32,
    pub stem_cap_height_mm: f32,
    pub metal_leaf_height_mm: f32,
    pub pin_length_mm: f32,
    pub pin_span_mm: f32,
    pub mount_plate_clearance_mm: f32,
}

/// Keycap socket to stem engagement preset in mm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeycapMountPreset {
    pub socket_outer_width_mm: f32,
    pub socket_outer_depth_mm: f32,
    pub socket_depth_mm: f32,
    pub socket_cross_slot_mm: f32,
    pub engagement_depth_mm: f32,
    pub mount_clearance_mm: f32,
    pub rib_thickness_mm: f32,
    pub rib_height_mm: f32,
}

/// Geometry and frame budgets per quality tier. Regression gates, not
/// visual tuning knobs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryBudget {
    pub keycap_top_segments_x: u32,
    pub keycap_top_segments_z: u32,
    pub max_draw_calls: u32,
    pub max_triangles: u32,
    pub cpu_frame_budget_ms: f32,
    pub gpu_frame_budget_ms: f32,
}

pub static KEYCAP_PROFILE_PRESETS: Lazy<HashMap<KeycapProfile, KeycapProfilePreset>> =
    Lazy::new(|| {
        let mut map = HashMap::new();
        map.insert(
            KeycapProfile::Cherry,
            KeycapProfilePreset {
                top: 0.0115,
                angle: 8.0,
                dish: 0.00085,
                radius: 0.0011,
                top_inset: 0.0019,
                top_depth_bias: 1.02,
                crown_lift: 0.0011,
                height_bias: 0.0001,
            },
        );
        map.insert(
            KeycapProfile::Sa,
            KeycapProfilePreset {
                top: 0.0175,
                angle: 13.0,
                dish: 0.00115,
                radius: 0.0015,
                top_inset: 0.0032,
                top_depth_bias: 1.16,
                crown_lift: 0.0018,
                height_bias: 0.0009,
            },
        );
        map.insert(
            KeycapProfile::Oem,
            KeycapProfilePreset {
                top: 0.0138,
                angle: 9.0,
                dish: 0.00095,
                radius: 0.00115,
                top_inset: 0.00225,
                top_depth_bias: 1.08,
                crown_lift: 0.0013,
                height_bias: 0.00035,
            },
        );
        map.insert(
            KeycapProfile::Xda,
            KeycapProfilePreset {
                top: 0.0084,
                angle: 2.0,
                dish: 0.00042,
                radius: 0.00095,
                top_inset: 0.0009,
                top_depth_bias: 0.96,
                crown_lift: 0.00055,
                height_bias: -0.00045,
            },
        );
        map.insert(
            KeycapProfile::Dsa,
            KeycapProfilePreset {
                top: 0.0074,
                angle: 0.0,
                dish: 0.00035,
                radius: 0.0009,
                top_inset: 0.0007,
                top_depth_bias: 0.95,
                crown_lift: 0.00045,
                height_bias: -0.00055,
            },
        );
        map.insert(
            KeycapProfile::Mt3,
            KeycapProfilePreset {
                top: 0.0162,
                angle: 12.0,
                dish: 0.0012,
                radius: 0.00145,
                top_inset: 0.003,
                top_depth_bias: 1.2,
                crown_lift: 0.00195,
                height_bias: 0.00075,
            },
        );
        map.insert(
            KeycapProfile::Kat,
            KeycapProfilePreset {
                top: 0.0108,
                angle: 6.0,
                dish: 0.00072,
                radius: 0.00105,
                top_inset: 0.00145,
                top_depth_bias: 1.02,
                crown_lift: 0.0009,
                height_bias: -0.00005,
            },
        );
        map
    });

pub static MATERIAL_PBR_PRESETS: Lazy<HashMap<KeycapMaterial, MaterialPbrPreset>> =
    Lazy::new(|| {
        let mut map = HashMap::new();
        map.insert(
            KeycapMaterial::Pbt,
            MaterialPbrPreset {
                roughness: 0.78,
                metalness: 0.02,
                clearcoat: 0.08,
                sheen: 0.06,
                color_shift: 0,
            },
        );
        map.insert(
            KeycapMaterial::Abs,
            MaterialPbrPreset {
                roughness: 0.44,
                metalness: 0.06,
                clearcoat: 0.34,
                sheen: 0.24,
                color_shift: 8,
            },
        );
        map.insert(
            KeycapMaterial::Pc,
            MaterialPbrPreset {
                roughness: 0.2,
                metalness: 0.04,
                clearcoat: 0.62,
                sheen: 0.18,
                color_shift: 16,
            },
        );
        map.insert(
            KeycapMaterial::Pom,
            MaterialPbrPreset {
                roughness: 0.58,
                metalness: 0.03,
                clearcoat: 0.18,
                sheen: 0.12,
                color_shift: 2,
            },
        );
        map.insert(
            KeycapMaterial::PbtDouble,
            MaterialPbrPreset {
                roughness: 0.62,
                metalness: 0.02,
                clearcoat: 0.12,
                sheen: 0.1,
                color_shift: 4,
            },
        );
        map.insert(
            KeycapMaterial::Resin,
            MaterialPbrPreset {
                roughness: 0.3,
                metalness: 0.12,
                clearcoat: 0.52,
                sheen: 0.34,
                color_shift: 12,
            },
        );
        map.insert(
            KeycapMaterial::Ceramic,
            MaterialPbrPreset {
                roughness: 0.2,
                metalness: 0.14,
                clearcoat: 0.72,
                sheen: 0.44,
                color_shift: 14,
            },
        );
        map.insert(
            KeycapMaterial::MetalAlu,
            MaterialPbrPreset {
                roughness: 0.28,
                metalness: 0.74,
                clearcoat: 0.24,
                sheen: 0.36,
                color_shift: -8,
            },
        );
        map.insert(
            KeycapMaterial::MetalBrass,
            MaterialPbrPreset {
                roughness: 0.22,
                metalness: 0.8,
                clearcoat: 0.2,
                sheen: 0.38,
                color_shift: 14,
            },
        );
        map
    });

pub static SWITCH_MECHANICAL_PRESETS: Lazy<HashMap<SwitchType, SwitchMechanicalPreset>> =
    Lazy::new(|| {
        let mut map = HashMap::new();
        map.insert(
            SwitchType::Linear,
            SwitchMechanicalPreset {
                travel_mm: 4.0,
                pre_travel_mm: 2.0,
                bump_center_ratio: 0.5,
                bump_width_ratio: 0.1,
                bump_strength: 0.0,
            },
        );
        map.insert(
            SwitchType::Tactile,
            SwitchMechanicalPreset {
                travel_mm: 3.8,
                pre_travel_mm: 1.9,
                bump_center_ratio: 0.43,
                bump_width_ratio: 0.16,
                bump_strength: 0.55,
            },
        );
        map.insert(
            SwitchType::Clicky,
            SwitchMechanicalPreset {
                travel_mm: 3.6,
                pre_travel_mm: 1.8,
                bump_center_ratio: 0.43,
                bump_width_ratio: 0.16,
                bump_strength: 0.9,
            },
        );
        map.insert(
            SwitchType::Silent,
            SwitchMechanicalPreset {
                travel_mm: 3.3,
                pre_travel_mm: 1.6,
                bump_center_ratio: 0.5,
                bump_width_ratio: 0.1,
                bump_strength: 0.0,
            },
        );
        map
    });

// Shell geometry is shared across switch types; only the metal leaf grows
// with tactile feedback strength.
pub static SWITCH_STRUCTURAL_PRESETS: Lazy<HashMap<SwitchType, SwitchStructuralPreset>> =
    Lazy::new(|| {
        let shared = SwitchStructuralPreset {
            housing_width_mm: 14.0,
            housing_depth_mm: 14.0,
            bottom_housing_height_mm: 6.2,
            top_housing_height_mm: 3.3,
            stem_pole_width_mm: 4.0,
            stem_pole_depth_mm: 4.0,
            stem_pole_height_mm: 3.2,
            stem_cross_arm_mm: 3.9,
            stem_cross_slot_mm: 1.2,
            stem_cap_height_mm: 1.2,
            metal_leaf_height_mm: 3.9,
            pin_length_mm: 3.2,
            pin_span_mm: 5.0,
            mount_plate_clearance_mm: 0.2,
        };
        let mut map = HashMap::new();
        map.insert(SwitchType::Linear, shared);
        map.insert(
            SwitchType::Tactile,
            SwitchStructuralPreset {
                metal_leaf_height_mm: 4.1,
                ..shared
            },
        );
        map.insert(
            SwitchType::Clicky,
            SwitchStructuralPreset {
                metal_leaf_height_mm: 4.4,
                ..shared
            },
        );
        map.insert(
            SwitchType::Silent,
            SwitchStructuralPreset {
                metal_leaf_height_mm: 3.8,
                ..shared
            },
        );
        map
    });

/// Default mx cross mount engagement.
pub const KEYCAP_MOUNT_PRESET_MX: KeycapMountPreset = KeycapMountPreset {
    socket_outer_width_mm: 5.7,
    socket_outer_depth_mm: 5.7,
    socket_depth_mm: 4.6,
    socket_cross_slot_mm: 1.26,
    engagement_depth_mm: 3.6,
    mount_clearance_mm: 0.09,
    rib_thickness_mm: 0.88,
    rib_height_mm: 2.6,
};

const DEFAULT_PROFILE_PRESET: KeycapProfilePreset = KeycapProfilePreset {
    top: 0.0115,
    angle: 8.0,
    dish: 0.00085,
    radius: 0.0011,
    top_inset: 0.0019,
    top_depth_bias: 1.02,
    crown_lift: 0.0011,
    height_bias: 0.0001,
};

const DEFAULT_MATERIAL_PRESET: MaterialPbrPreset = MaterialPbrPreset {
    roughness: 0.78,
    metalness: 0.02,
    clearcoat: 0.08,
    sheen: 0.06,
    color_shift: 0,
};

const DEFAULT_MECHANICAL_PRESET: SwitchMechanicalPreset = SwitchMechanicalPreset {
    travel_mm: 4.0,
    pre_travel_mm: 2.0,
    bump_center_ratio: 0.5,
    bump_width_ratio: 0.1,
    bump_strength: 0.0,
};

pub fn profile_preset(profile: KeycapProfile) -> KeycapProfilePreset {
    KEYCAP_PROFILE_PRESETS
        .get(&profile)
        .copied()
        .unwrap_or(DEFAULT_PROFILE_PRESET)
}

pub fn material_preset(material: KeycapMaterial) -> MaterialPbrPreset {
    MATERIAL_PBR_PRESETS
        .get(&material)
        .copied()
        .unwrap_or(DEFAULT_MATERIAL_PRESET)
}

pub fn mechanical_preset(switch_type: SwitchType) -> SwitchMechanicalPreset {
    SWITCH_MECHANICAL_PRESETS
        .get(&switch_type)
        .copied()
        .unwrap_or(DEFAULT_MECHANICAL_PRESET)
}

pub fn structural_preset(switch_type: SwitchType) -> SwitchStructuralPreset {
    SWITCH_STRUCTURAL_PRESETS
        .get(&switch_type)
        .copied()
        .unwrap_or_else(|| SWITCH_STRUCTURAL_PRESETS[&SwitchType::Linear])
}

/// Budgets are calibrated against a 60% board at the default camera
/// distance.
pub fn geometry_budget(tier: QualityTier) -> GeometryBudget {
    match tier {
        QualityTier::High => GeometryBudget {
            keycap_top_segments_x: 26,
            keycap_top_segments_z: 18,
            max_draw_calls: 450,
            max_triangles: 560_000,
            cpu_frame_budget_ms: 6.0,
            gpu_frame_budget_ms: 8.0,
        },
        QualityTier::Balanced => GeometryBudget {
            keycap_top_segments_x: 20,
            keycap_top_segments_z: 14,
            max_draw_calls: 320,
            max_triangles: 360_000,
            cpu_frame_budget_ms: 5.0,
            gpu_frame_budget_ms: 6.5,
        },
        QualityTier::Performance => GeometryBudget {
            keycap_top_segments_x: 14,
            keycap_top_segments_z: 10,
            max_draw_calls: 220,
            max_triangles: 220_000,
            cpu_frame_budget_ms: 4.0,
            gpu_frame_budget_ms: 5.5,
        },
    }
}

// ====================
// Motion Tuning
// ====================

/// Clamp bands for the motion layer. The defaults are tuned presets rather
/// than physical ground truth; tools may install an override at runtime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionTuning {
    /// Tick size cap in seconds.
    pub max_tick_dt: f32,
    /// Stroke speed band in m/s.
    pub min_linear_speed: f32,
    pub max_linear_speed: f32,
    /// Hard tilt caps in radians.
    pub max_tilt_x: f32,
    pub max_tilt_z: f32,
    /// Switch travel band in meters.
    pub travel_floor: f32,
    pub travel_ceiling: f32,
    /// Lateral jitter allowance band in meters.
    pub jitter_limit_floor: f32,
    pub jitter_limit_ceiling: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            max_tick_dt: config::MAX_TICK_DT,
            min_linear_speed: config::MIN_LINEAR_SPEED,
            max_linear_speed: config::MAX_LINEAR_SPEED,
            max_tilt_x: config::MAX_TILT_X,
            max_tilt_z: config::MAX_TILT_Z,
            travel_floor: config::TRAVEL_FLOOR,
            travel_ceiling: config::TRAVEL_CEILING,
            jitter_limit_floor: config::JITTER_LIMIT_FLOOR,
            jitter_limit_ceiling: config::JITTER_LIMIT_CEILING,
        }
    }
}

pub static MOTION_TUNING_OVERRIDE: Lazy<Mutex<Option<MotionTuning>>> =
    Lazy::new(|| Mutex::new(None));

/// Current motion tuning, override first, then the built-in defaults.
pub fn motion_tuning() -> MotionTuning {
    if let Some(tuning) = *MOTION_TUNING_OVERRIDE.lock() {
        return tuning;
    }
    MotionTuning::default()
}

pub fn set_motion_tuning(tuning: MotionTuning) {
    *MOTION_TUNING_OVERRIDE.lock() = Some(tuning);
}

pub fn clear_motion_tuning() {
    *MOTION_TUNING_OVERRIDE.lock() = None;
}
