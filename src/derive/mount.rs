// Keycap socket to switch stem engagement, and the static assembly datum.
// The lateral jitter limit computed here is the only interference bound the
// motion layer knows about, so the two can never disagree.

use crate::config;
use crate::derive::keycap::KeycapParams;
use crate::derive::switch::{SwitchParams, SwitchStructureParams};
use crate::presets::{self, KeycapMountPreset, MotionTuning};
use crate::units::mm;
use crate::utils::clamp;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeycapMountParams {
    pub preset: KeycapMountPreset,
    pub socket_outer_width: f32,
    pub socket_outer_depth: f32,
    pub socket_depth: f32,
    pub socket_cross_slot: f32,
    pub engagement_depth: f32,
    pub mount_clearance: f32,
    pub rib_thickness: f32,
    pub rib_height: f32,
    /// Socket center relative to the keycap center.
    pub socket_center_y: f32,
    pub rib_center_y: f32,
    /// Hard bound for stabilizer wobble, from the socket/stem gap.
    pub lateral_jitter_limit: f32,
    /// Fraction of keycap jitter the stem visually follows.
    pub stem_follower_jitter_ratio: f32,
}

/// Static vertical datums shared by the whole board, in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AssemblyDatum {
    pub case_top_y: f32,
    pub case_inner_floor_y: f32,
    pub plate_y: f32,
    pub switch_top_y: f32,
    pub switch_bottom_y: f32,
    pub stem_base_y: f32,
    pub keycap_rest_center_y: f32,
}

pub fn derive_keycap_mount(
    keycap: &KeycapParams,
    structure: &SwitchStructureParams,
) -> KeycapMountParams {
    let tuning = presets::motion_tuning();
    derive_keycap_mount_with(&tuning, keycap, structure)
}

/// Variant with an explicit tuning preset, for probing candidate jitter
/// bands without installing them.
pub fn derive_keycap_mount_with(
    tuning: &MotionTuning,
    keycap: &KeycapParams,
    structure: &SwitchStructureParams,
) -> KeycapMountParams {
    let preset = presets::KEYCAP_MOUNT_PRESET_MX;

    let keycap_base_scale = clamp(keycap.key_width.min(keycap.key_depth) / 0.01805, 0.9, 1.08);
    let socket_outer_width = clamp(
        mm(preset.socket_outer_width_mm) * keycap_base_scale,
        0.0048,
        0.0065,
    );
    let socket_outer_depth = clamp(
        mm(preset.socket_outer_depth_mm) * keycap_base_scale,
        0.0048,
        0.0065,
    );
    let socket_depth = clamp(mm(preset.socket_depth_mm), 0.0038, 0.0054);
    let socket_cross_slot = clamp(mm(preset.socket_cross_slot_mm), 0.00102, 0.00155);
    let mount_clearance = clamp(mm(preset.mount_clearance_mm), 0.00005, 0.00018);
    let engagement_depth = clamp(mm(preset.engagement_depth_mm), 0.0028, socket_depth - 0.0005);
    let rib_thickness = clamp(mm(preset.rib_thickness_mm), 0.0006, 0.00125);
    let rib_height = clamp(mm(preset.rib_height_mm), 0.0018, 0.0034);

    let socket_center_y = -keycap.key_height / 2.0 + socket_depth * 0.5 + 0.0002;
    let rib_center_y = socket_center_y + rib_height * 0.28;

    let available_lateral_gap = (socket_cross_slot - structure.stem_cross_slot) * 0.5
        + mount_clearance
        + structure.mount_plate_clearance * 0.2;
    let lateral_jitter_limit = clamp(
        available_lateral_gap.max(0.0) * 0.3,
        tuning.jitter_limit_floor,
        tuning.jitter_limit_ceiling,
    );

    KeycapMountParams {
        preset,
        socket_outer_width,
        socket_outer_depth,
        socket_depth,
        socket_cross_slot,
        engagement_depth,
        mount_clearance,
        rib_thickness,
        rib_height,
        socket_center_y,
        rib_center_y,
        lateral_jitter_limit,
        stem_follower_jitter_ratio: 0.24,
    }
}

pub fn derive_assembly_datum(switch: &SwitchParams) -> AssemblyDatum {
    let case_top_y = config::CASE_HEIGHT * 0.5;
    AssemblyDatum {
        case_top_y,
        case_inner_floor_y: -config::CASE_HEIGHT * 0.5 + config::CASE_BOTTOM_THICKNESS,
        plate_y: case_top_y - config::CASE_TOP_LIP_THICKNESS,
        switch_top_y: switch.top_y,
        switch_bottom_y: switch.bottom_y,
        stem_base_y: switch.stem_base_y,
        keycap_rest_center_y: 0.0,
    }
}
