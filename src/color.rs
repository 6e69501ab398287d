// Color resolution and surface coefficient helpers. Shapes every keycap
// color from theme base, colorway shift, material shift, and wear, and maps
// wear onto pbr coefficients for the surface materials.

use palette::{Hsluv, IntoColor, Srgb};

use crate::config::{Colorway, HousingMaterial, KeycapTheme, StemMaterial, SwitchType};
use crate::presets::MaterialPbrPreset;

/// Per-key color emphasis from the board table. Only the default theme
/// consults it; custom themes derive from theme plus colorway instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderTone {
    #[default]
    Default,
    Modifier,
    Accent,
    Dark,
}

/// Legend ink picked against bright tops.
pub const LEGEND_DARK: Srgb<u8> = Srgb::new(0x1c, 0x1d, 0x24);
/// Legend ink picked against dark tops.
pub const LEGEND_LIGHT: Srgb<u8> = Srgb::new(0xf6, 0xf7, 0xfb);

/// Adds a uniform bias to every channel, saturating at the range ends.
pub fn shift_color(color: Srgb<u8>, shift: i16) -> Srgb<u8> {
    let apply = |channel: u8| (channel as i16 + shift).clamp(0, 255) as u8;
    Srgb::new(apply(color.red), apply(color.green), apply(color.blue))
}

/// Perceived brightness in 0..=255, used to pick legend ink.
pub fn brightness(color: Srgb<u8>) -> f32 {
    (color.red as f32 * 299.0 + color.green as f32 * 587.0 + color.blue as f32 * 114.0) / 1000.0
}

pub fn theme_base_color(theme: KeycapTheme) -> Srgb<u8> {
    match theme {
        KeycapTheme::Default => Srgb::new(0xf3, 0xf4, 0xf7),
        KeycapTheme::Carbon => Srgb::new(0x32, 0x37, 0x43),
        KeycapTheme::Pastel => Srgb::new(0xff, 0xee, 0xf6),
        KeycapTheme::Cyberpunk => Srgb::new(0x2b, 0x33, 0x48),
        KeycapTheme::Ocean => Srgb::new(0xea, 0xf7, 0xff),
    }
}

pub fn colorway_shift(colorway: Colorway) -> i16 {
    match colorway {
        Colorway::Classic => 0,
        Colorway::Mod => -18,
        Colorway::Fn => 8,
        Colorway::Nav => 6,
        Colorway::Numpad => -4,
        Colorway::Cyber => 12,
        Colorway::Retro => -10,
    }
}

pub fn tone_base_color(theme: KeycapTheme, tone: RenderTone) -> Srgb<u8> {
    match theme {
        KeycapTheme::Default => match tone {
            RenderTone::Default => Srgb::new(0xf3, 0xf4, 0xf7),
            RenderTone::Modifier => Srgb::new(0xd9, 0xdd, 0xe6),
            RenderTone::Accent => Srgb::new(0x87, 0xdc, 0xff),
            RenderTone::Dark => Srgb::new(0x1f, 0x23, 0x2d),
        },
        KeycapTheme::Carbon => match tone {
            RenderTone::Default => Srgb::new(0x32, 0x37, 0x43),
            RenderTone::Modifier => Srgb::new(0x4b, 0x51, 0x61),
            RenderTone::Accent => Srgb::new(0x76, 0xdc, 0xff),
            RenderTone::Dark => Srgb::new(0x15, 0x19, 0x22),
        },
        KeycapTheme::Pastel => match tone {
            RenderTone::Default => Srgb::new(0xff, 0xee, 0xf6),
            RenderTone::Modifier => Srgb::new(0xf7, 0xdb, 0xe9),
            RenderTone::Accent => Srgb::new(0xff, 0xc9, 0xe6),
            RenderTone::Dark => Srgb::new(0x4c, 0x36, 0x51),
        },
        KeycapTheme::Cyberpunk => match tone {
            RenderTone::Default => Srgb::new(0x2b, 0x33, 0x48),
            RenderTone::Modifier => Srgb::new(0x1b, 0x21, 0x33),
            RenderTone::Accent => Srgb::new(0x4a, 0xd7, 0xff),
            RenderTone::Dark => Srgb::new(0x0d, 0x11, 0x20),
        },
        KeycapTheme::Ocean => match tone {
            RenderTone::Default => Srgb::new(0xea, 0xf7, 0xff),
            RenderTone::Modifier => Srgb::new(0xcf, 0xe8, 0xf5),
            RenderTone::Accent => Srgb::new(0x73, 0xd5, 0xff),
            RenderTone::Dark => Srgb::new(0x1f, 0x31, 0x41),
        },
    }
}

/// Theme base plus the colorway channel bias.
pub fn theme_color(theme: KeycapTheme, colorway: Colorway) -> Srgb<u8> {
    shift_color(theme_base_color(theme), colorway_shift(colorway))
}

pub fn switch_accent_color(switch_type: SwitchType) -> Srgb<u8> {
    match switch_type {
        SwitchType::Linear => Srgb::new(0x62, 0xf2, 0xcc),
        SwitchType::Tactile => Srgb::new(0x75, 0xb9, 0xff),
        SwitchType::Clicky => Srgb::new(0xff, 0xcf, 0x54),
        SwitchType::Silent => Srgb::new(0xa9, 0xb0, 0xb8),
    }
}

pub fn housing_color(material: HousingMaterial) -> Srgb<u8> {
    match material {
        HousingMaterial::Nylon => Srgb::new(0xb9, 0xb7, 0xaf),
        HousingMaterial::Pc => Srgb::new(0xb8, 0xd8, 0xf4),
        HousingMaterial::Pom => Srgb::new(0xf0, 0xf0, 0xf0),
        HousingMaterial::Upe => Srgb::new(0xd8, 0xf2, 0xe0),
    }
}

pub fn stem_color(material: StemMaterial) -> Srgb<u8> {
    match material {
        StemMaterial::Pom => Srgb::new(0xf5, 0xce, 0x4f),
        StemMaterial::Ly => Srgb::new(0xd4, 0xf2, 0x5f),
        StemMaterial::Upe => Srgb::new(0x98, 0xf2, 0xc8),
        StemMaterial::Pe => Srgb::new(0xf6, 0xa2, 0xb8),
    }
}

/// Worn plastic polishes flat and loses pigment. Saturation drops with wear
/// and lightness creeps toward the shine ceiling.
pub fn apply_wear(color: Srgb<u8>, wear_ratio: f32) -> Srgb<u8> {
    let wear = wear_ratio.clamp(0.0, 1.0);
    if wear <= 0.0 {
        return color;
    }
    let mut hsluv: Hsluv = color.into_format::<f32>().into_color();
    hsluv.saturation *= 1.0 - wear * 0.35;
    hsluv.l += (100.0 - hsluv.l) * wear * 0.18;
    let rgb: Srgb<f32> = hsluv.into_color();
    rgb.into_format::<u8>()
}

/// Wear-adjusted pbr coefficients for one keycap surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePbr {
    pub roughness: f32,
    pub metalness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
}

/// Top surface: wear polishes the contact patch, cutting roughness and
/// deepening the clearcoat.
pub fn top_surface_pbr(preset: MaterialPbrPreset, wear_ratio: f32) -> SurfacePbr {
    SurfacePbr {
        roughness: (preset.roughness * (1.0 - wear_ratio * 0.58)).clamp(0.06, 1.0),
        metalness: preset.metalness,
        clearcoat: (preset.clearcoat + wear_ratio * 0.25).clamp(0.0, 1.0),
        clearcoat_roughness: 0.22 + wear_ratio * 0.2,
    }
}

/// Side walls see little finger contact; rougher and flatter than the top.
pub fn side_surface_pbr(preset: MaterialPbrPreset, wear_ratio: f32) -> SurfacePbr {
    let top = top_surface_pbr(preset, wear_ratio);
    SurfacePbr {
        roughness: (top.roughness + 0.1).min(1.0),
        metalness: preset.metalness,
        clearcoat: (top.clearcoat * 0.38).max(0.04),
        clearcoat_roughness: 0.45,
    }
}

pub fn dish_surface_pbr(preset: MaterialPbrPreset, wear_ratio: f32) -> SurfacePbr {
    let top = top_surface_pbr(preset, wear_ratio);
    SurfacePbr {
        roughness: (top.roughness + 0.08).min(1.0),
        metalness: (preset.metalness - 0.02).max(0.0),
        clearcoat: (top.clearcoat * 0.2).max(0.02),
        clearcoat_roughness: 0.5,
    }
}
