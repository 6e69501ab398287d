// Keycap shape and color derivation. Everything is a continuous function of
// the resolved zone configuration so thickness sliders morph the shell
// smoothly instead of stepping between fixed shapes.

use palette::Srgb;

use crate::color::{self, SurfacePbr};
use crate::config::{
    self, BodyManufacturing, KeycapConfig, KeycapTheme, KeycapZoneConfig, LegendManufacturing,
    RowSculpt, SwitchConfig, SwitchType, ThicknessConfig, WearPattern, ZonePatch,
};
use crate::layout::{KeyContext, KeycapZone};
use crate::presets::{self, KeycapProfilePreset, MaterialPbrPreset};
use crate::utils::clamp;

/// Layout-unit span band accepted from a key context; anything outside is
/// clamped before geometry runs.
const SPAN_FLOOR: f32 = 0.25;
const SPAN_CEILING: f32 = 10.0;

/// Resolved color set for one keycap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeycapColors {
    pub base: Srgb<u8>,
    pub top: Srgb<u8>,
    pub side: Srgb<u8>,
    pub dish: Srgb<u8>,
    pub text: Srgb<u8>,
    pub legend: Srgb<u8>,
    pub stem_accent: Srgb<u8>,
}

/// Derived keycap geometry, colors, and surface coefficients, in meters.
#[derive(Clone, Debug, PartialEq)]
pub struct KeycapParams {
    /// Effective zone configuration after the per-key override patch.
    pub zone_config: KeycapZoneConfig,
    pub profile_preset: KeycapProfilePreset,
    pub material_preset: MaterialPbrPreset,
    pub key_width: f32,
    pub key_depth: f32,
    pub key_height: f32,
    /// Front slope in radians.
    pub profile_angle: f32,
    pub top_inset: f32,
    pub top_depth_inset: f32,
    pub top_plate_width: f32,
    pub top_plate_depth: f32,
    pub top_plate_height: f32,
    pub top_plate_y: f32,
    pub top_dish_depth: f32,
    pub top_surface_y: f32,
    pub cavity_width: f32,
    pub cavity_depth: f32,
    pub cavity_height: f32,
    pub shell_radius: f32,
    pub seam_opacity: f32,
    pub top_highlight_opacity: f32,
    /// Row position folded into [-1, 1]; zero when sculpting is off.
    pub row_sculpt_normalized: f32,
    pub colors: KeycapColors,
    pub wear_ratio: f32,
    pub legend_primary_opacity: f32,
    pub legend_sub_opacity: f32,
    pub top_pbr: SurfacePbr,
    pub side_pbr: SurfacePbr,
    pub dish_pbr: SurfacePbr,
}

/// Merges the zone defaults with a single key's override patch. Patch fields
/// win; thickness merges per leaf field so a patch can thin the side walls
/// without restating the top.
pub fn resolve_zone_config(
    config: &KeycapConfig,
    zone: KeycapZone,
    key_id: &str,
) -> KeycapZoneConfig {
    let base = *config.zones.get(zone);
    match config.overrides.get(key_id) {
        Some(patch) => apply_patch(base, patch),
        None => base,
    }
}

fn apply_patch(base: KeycapZoneConfig, patch: &ZonePatch) -> KeycapZoneConfig {
    let thickness = patch.thickness.unwrap_or_default();
    KeycapZoneConfig {
        profile: patch.profile.unwrap_or(base.profile),
        row_sculpt: patch.row_sculpt.unwrap_or(base.row_sculpt),
        thickness: ThicknessConfig {
            top_mm: thickness.top_mm.unwrap_or(base.thickness.top_mm),
            side_mm: thickness.side_mm.unwrap_or(base.thickness.side_mm),
        },
        material: patch.material.unwrap_or(base.material),
        body_manufacturing: patch.body_manufacturing.unwrap_or(base.body_manufacturing),
        legend_manufacturing: patch
            .legend_manufacturing
            .unwrap_or(base.legend_manufacturing),
        legend_primary: patch.legend_primary.unwrap_or(base.legend_primary),
        legend_sub: patch.legend_sub.unwrap_or(base.legend_sub),
        legend_position: patch.legend_position.unwrap_or(base.legend_position),
        legend_opacity: patch.legend_opacity.unwrap_or(base.legend_opacity),
        theme: patch.theme.unwrap_or(base.theme),
        colorway: patch.colorway.unwrap_or(base.colorway),
        wear_shine_level: patch.wear_shine_level.unwrap_or(base.wear_shine_level),
        wear_pattern: patch.wear_pattern.unwrap_or(base.wear_pattern),
        hollow_factor: patch.hollow_factor.unwrap_or(base.hollow_factor),
    }
}

fn is_wasd_key(id: &str) -> bool {
    matches!(id, "w" | "a" | "s" | "d")
}

/// Derivation from an already resolved zone config; turntable previews call
/// this directly. The stem accent defaults to the linear switch color until
/// the board-level entry overrides it.
pub fn derive_keycap_from_zone(zone_config: &KeycapZoneConfig, key: &KeyContext) -> KeycapParams {
    let profile_preset = presets::profile_preset(zone_config.profile);
    let material_preset = presets::material_preset(zone_config.material);

    let key_width = config::plan_extent(clamp(key.width, SPAN_FLOOR, SPAN_CEILING));
    let key_depth = config::plan_extent(clamp(key.depth, SPAN_FLOOR, SPAN_CEILING));
    let profile_height_scale = zone_config.thickness.top_mm / 1.5;
    let key_height = clamp(
        profile_preset.top * profile_height_scale + profile_preset.height_bias,
        0.0068,
        0.0198,
    );
    let profile_angle = profile_preset.angle.to_radians();

    let top_inset = clamp(
        profile_preset.top_inset + (zone_config.thickness.side_mm - 1.3) * 0.00028,
        0.00045,
        0.0038,
    );
    let top_depth_inset = clamp(top_inset * profile_preset.top_depth_bias, 0.00045, 0.0042);
    let top_plate_width = clamp(key_width - top_inset, key_width * 0.54, key_width - 0.0006);
    let top_plate_depth = clamp(
        key_depth - top_depth_inset,
        key_depth * 0.54,
        key_depth - 0.0006,
    );
    // Top wall stays at real keycap scale; a thick slab reads as a solid lid.
    let top_plate_height = clamp(
        0.0011 + zone_config.thickness.top_mm * 0.00045 + profile_preset.crown_lift * 0.22,
        0.0012,
        0.0032,
    );
    // The plate hugs the shell top rather than the geometric center.
    let top_plate_y =
        key_height * 0.5 - top_plate_height * 0.5 - 0.00008 + profile_preset.crown_lift * 0.08;

    let row_sculpt_normalized = match zone_config.row_sculpt {
        RowSculpt::Uniform => 0.0,
        RowSculpt::Sculpted => clamp((key.row as f32 - 2.2) / 2.0, -1.0, 1.0),
    };
    let top_dish_depth = clamp(
        profile_preset.dish * (0.92 + zone_config.thickness.top_mm * 0.2),
        0.00024,
        0.00145,
    );
    let top_surface_y = top_plate_y + top_plate_height * 0.5 + 0.00003;

    let side_wall = clamp(zone_config.thickness.side_mm / 1000.0, 0.00075, 0.0019);
    let top_wall = clamp(zone_config.thickness.top_mm / 1000.0, 0.00095, 0.0023);
    let cavity_width = clamp(key_width - side_wall * 2.0, key_width * 0.5, key_width - 0.0012);
    let cavity_depth = clamp(key_depth - side_wall * 2.0, key_depth * 0.5, key_depth - 0.0012);
    let cavity_height = clamp(key_height - top_wall - 0.00045, 0.0028, 0.014);

    let wear_base = clamp(zone_config.wear_shine_level / 100.0, 0.0, 1.0);
    let wear_boost = match zone_config.wear_pattern {
        WearPattern::WasdFocus if is_wasd_key(&key.id) => 0.22,
        WearPattern::SpaceFocus if key.id.contains("space") => 0.28,
        _ => 0.0,
    };
    let wear_ratio = clamp(wear_base + wear_boost, 0.0, 1.0);

    let tone_color = color::tone_base_color(zone_config.theme, key.tone);
    let theme_color = color::theme_color(zone_config.theme, zone_config.colorway);
    let base_mix = if zone_config.theme == KeycapTheme::Default {
        tone_color
    } else {
        theme_color
    };

    let top_color = color::apply_wear(
        color::shift_color(base_mix, material_preset.color_shift),
        wear_ratio,
    );
    let side_shift = -30 + ((zone_config.thickness.side_mm - 1.3) * 9.0).round() as i16;
    let side_color = color::shift_color(base_mix, side_shift);
    let dish_color = color::shift_color(top_color, -12);
    let text_color = if color::brightness(top_color) > 144.0 {
        color::LEGEND_DARK
    } else {
        color::LEGEND_LIGHT
    };
    let legend_color = match zone_config.legend_manufacturing {
        LegendManufacturing::Laser => color::shift_color(text_color, 14),
        LegendManufacturing::DyeSub => color::shift_color(text_color, -18),
        _ => text_color,
    };

    let legend_opacity = clamp(zone_config.legend_opacity, 0.0, 1.0);
    let (legend_primary_opacity, legend_sub_opacity) = match zone_config.legend_manufacturing {
        LegendManufacturing::DoubleShot => (legend_opacity, legend_opacity * 0.92),
        LegendManufacturing::DyeSub => (legend_opacity * 0.78, legend_opacity * 0.74),
        LegendManufacturing::Laser => (legend_opacity * 0.92, legend_opacity * 0.86),
        LegendManufacturing::Blank => (legend_opacity, legend_opacity * 0.86),
    };

    let shell_radius = match zone_config.body_manufacturing {
        BodyManufacturing::Cnc => profile_preset.radius * 0.75,
        BodyManufacturing::Injection => profile_preset.radius,
    };

    KeycapParams {
        zone_config: *zone_config,
        profile_preset,
        material_preset,
        key_width,
        key_depth,
        key_height,
        profile_angle,
        top_inset,
        top_depth_inset,
        top_plate_width,
        top_plate_depth,
        top_plate_height,
        top_plate_y,
        top_dish_depth,
        top_surface_y,
        cavity_width,
        cavity_depth,
        cavity_height,
        shell_radius,
        seam_opacity: match zone_config.body_manufacturing {
            BodyManufacturing::Injection => 0.22,
            BodyManufacturing::Cnc => 0.08,
        },
        top_highlight_opacity: match zone_config.body_manufacturing {
            BodyManufacturing::Cnc => 0.14,
            BodyManufacturing::Injection => 0.06,
        },
        row_sculpt_normalized,
        colors: KeycapColors {
            base: base_mix,
            top: top_color,
            side: side_color,
            dish: dish_color,
            text: text_color,
            legend: legend_color,
            stem_accent: color::switch_accent_color(SwitchType::Linear),
        },
        wear_ratio,
        legend_primary_opacity,
        legend_sub_opacity,
        top_pbr: color::top_surface_pbr(material_preset, wear_ratio),
        side_pbr: color::side_surface_pbr(material_preset, wear_ratio),
        dish_pbr: color::dish_surface_pbr(material_preset, wear_ratio),
    }
}

/// Board-level keycap derivation: resolves the zone override first, then
/// ties the stem accent to the configured switch type.
pub fn derive_keycap(
    keycaps: &KeycapConfig,
    switches: &SwitchConfig,
    key: &KeyContext,
) -> KeycapParams {
    let zone_config = resolve_zone_config(keycaps, key.zone, &key.id);
    let mut derived = derive_keycap_from_zone(&zone_config, key);
    derived.colors.stem_accent = color::switch_accent_color(switches.switch_type);
    derived
}
