// Centralized configuration for the simulation core: the constant bank for
// every band/budget the derivation and motion layers clamp against, plus the
// serializable keyboard configuration snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::layout::KeycapZone;
use crate::units;

// ====================
// Keyboard Plan Geometry
// ====================
/// Gap between adjacent keycaps in meters. Plan extents are key span in
/// layout units times [`units::KEY_UNIT`] minus this gap.
pub const KEY_GAP: f32 = 0.001;
/// Outer case height in meters.
pub const CASE_HEIGHT: f32 = 0.035;
/// Case bottom wall thickness in meters.
pub const CASE_BOTTOM_THICKNESS: f32 = 0.0044;
/// Case top lip thickness in meters; the plate reference sits this far
/// below the case top.
pub const CASE_TOP_LIP_THICKNESS: f32 = 0.0018;

// ====================
// Travel/Spring Bands
// ====================
/// Shortest plausible switch travel in meters (heavily o-ringed silent).
pub const TRAVEL_FLOOR: f32 = 0.0021;
/// Longest plausible switch travel in meters (full-travel linear).
pub const TRAVEL_CEILING: f32 = 0.0042;
/// Tactile bump window never narrows below this, in meters.
pub const BUMP_WIDTH_FLOOR: f32 = 0.00045;
/// Spring weight mapping: stiffness ramps over [35 g, 80 g].
pub const SPRING_WEIGHT_BASE_G: f32 = 35.0;
pub const SPRING_WEIGHT_SPAN_G: f32 = 45.0;
/// Stiffness band endpoints for the weight ramp, before spring-type scaling.
pub const SPRING_STIFFNESS_BASE: f32 = 160.0;
pub const SPRING_STIFFNESS_SPAN: f32 = 140.0;

// ====================
// Motion Integration
// ====================
/// Tick size cap in seconds; larger frame gaps integrate as this.
pub const MAX_TICK_DT: f32 = 1.0 / 30.0;
/// Stroke speed band in m/s.
pub const MAX_LINEAR_SPEED: f32 = 0.18;
pub const MIN_LINEAR_SPEED: f32 = 0.03;
/// Tilt safety caps in radians; samples are hard-clamped to these.
pub const MAX_TILT_X: f32 = 0.06;
pub const MAX_TILT_Z: f32 = 0.045;
/// Lateral jitter allowance band in meters.
pub const JITTER_LIMIT_FLOOR: f32 = 0.00002;
pub const JITTER_LIMIT_CEILING: f32 = 0.00026;
/// Number of motion slots in the arena; covers a full-size board with
/// module keys to spare.
pub const ARENA_CAPACITY: usize = 128;

// ====================
// Quality Governor
// ====================
/// Frames sampled before an evaluation is allowed.
pub const QUALITY_SAMPLE_WINDOW: u32 = 36;
/// Minimum seconds between tier changes.
pub const QUALITY_COOLDOWN_SECS: f32 = 1.2;
/// A metric this far above nominal counts as over budget.
pub const OVER_BUDGET_RATIO: f32 = 1.05;
/// Average cpu cost below this fraction of nominal counts as comfortable.
pub const UNDER_BUDGET_CPU_RATIO: f32 = 0.72;
/// Discrete counters below this fraction of their maxima count as comfortable.
pub const UNDER_BUDGET_COUNTER_RATIO: f32 = 0.66;

// ====================
// Acoustic Bands
// ====================
/// Filter cutoff clamp band in Hz.
pub const FILTER_FREQ_FLOOR_HZ: f32 = 400.0;
pub const FILTER_FREQ_CEILING_HZ: f32 = 12_000.0;
/// Envelope decay clamp band in seconds.
pub const DECAY_FLOOR_S: f32 = 0.02;
pub const DECAY_CEILING_S: f32 = 0.5;
/// Per-layer decay factor for dampening foams; layers compound
/// multiplicatively, so n layers scale decay by this to the nth power.
pub const FOAM_DECAY_FACTOR: f32 = 0.9;
/// Spacebar foam shaping, applied to space-zone presses only.
pub const SPACEBAR_FOAM_DECAY: f32 = 0.72;
pub const SPACEBAR_FOAM_FREQ: f32 = 0.86;
/// Frequency reduction per tape-mod layer.
pub const TAPE_LAYER_FREQ_DROP: f32 = 0.05;

// ====================
// Threading/Session
// ====================
pub const MIN_THREADS: usize = 3; // Minimum number of threads to use
pub const THREADS_LEAVE_FREE: usize = 2; // Number of logical cores to leave free
/// Default headless session frame rate.
pub const DEFAULT_FRAME_RATE: f32 = 120.0;
/// Supported session frame-rate band; rates outside are pulled back in.
pub const MIN_FRAME_RATE: f32 = 24.0;
pub const MAX_FRAME_RATE: f32 = 240.0;
/// Default headless session length in seconds.
pub const DEFAULT_SESSION_SECS: f32 = 12.0;
/// Default seed for the synthetic typing/metrics rng.
pub const DEFAULT_SESSION_SEED: u64 = 7;
/// Default scripted typing speed in words per minute.
pub const DEFAULT_TYPING_WPM: f32 = 72.0;
/// Spread of the per-keystroke interval as a fraction of its mean.
pub const TYPING_CADENCE_JITTER: f32 = 0.35;
/// Default key hold time in seconds.
pub const TYPING_HOLD_SECS: f32 = 0.055;

// ====================
// Configuration Snapshot
// ====================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchType {
    Linear,
    Tactile,
    Clicky,
    Silent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpringType {
    Single,
    Extended,
    Progressive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LubeState {
    Stock,
    Factory,
    HandLubedThin,
    HandLubedThick,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilmType {
    None,
    Pc,
    Pom,
    Pet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilizerQuality {
    Perfect,
    MinorRattle,
    Rattle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OringThickness {
    Thin,
    Thick,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingMaterial {
    Nylon,
    Pc,
    Pom,
    Upe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StemMaterial {
    Pom,
    Ly,
    Upe,
    Pe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseMaterial {
    Alu6063,
    Alu7075,
    Pc,
    Acrylic,
    Abs,
    Wood,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseFinish {
    Anodized,
    EWhite,
    Cerakote,
    Powdercoat,
    Polished,
    Beadblasted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountType {
    GasketPoron,
    GasketSilicone,
    Top,
    Tray,
    OringBurger,
    Plateless,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlateMaterial {
    Alu,
    Brass,
    Pc,
    Fr4,
    Pom,
    Carbon,
    Ppe,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeycapProfile {
    Cherry,
    Sa,
    Oem,
    Xda,
    Dsa,
    Mt3,
    Kat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeycapMaterial {
    Pbt,
    Abs,
    Pc,
    Pom,
    PbtDouble,
    Resin,
    Ceramic,
    MetalAlu,
    MetalBrass,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowSculpt {
    Uniform,
    Sculpted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyManufacturing {
    Injection,
    Cnc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendManufacturing {
    DoubleShot,
    DyeSub,
    Laser,
    Blank,
}

/// Legend glyph set. The scene layer picks label text from this; `None`
/// suppresses the legend entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendLanguage {
    Latin,
    Kana,
    Cyrillic,
    Hangul,
    Fantasy,
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    Center,
    TopLeft,
    FrontSide,
    SideShine,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeycapTheme {
    Default,
    Carbon,
    Pastel,
    Cyberpunk,
    Ocean,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Colorway {
    Classic,
    Mod,
    Fn,
    Nav,
    Numpad,
    Cyber,
    Retro,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WearPattern {
    Uniform,
    WasdFocus,
    SpaceFocus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormFactor {
    #[serde(rename = "40")]
    Forty,
    #[serde(rename = "60")]
    Sixty,
    #[serde(rename = "65")]
    SixtyFive,
    #[serde(rename = "75")]
    SeventyFive,
    #[serde(rename = "80")]
    Tkl,
    #[serde(rename = "980")]
    Compact1800,
    #[serde(rename = "100")]
    FullSize,
    Alice,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStandard {
    Ansi,
    Iso,
    Jis,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutVariant {
    Standard,
    Hhkb,
    ThinkpadStyle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub form_factor: FormFactor,
    pub standard: LayoutStandard,
    pub variant: LayoutVariant,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            form_factor: FormFactor::SeventyFive,
            standard: LayoutStandard::Ansi,
            variant: LayoutVariant::Standard,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseConfig {
    pub material: CaseMaterial,
    pub finish: CaseFinish,
    pub mount: MountType,
}

impl Default for CaseConfig {
    fn default() -> Self {
        Self {
            material: CaseMaterial::Alu6063,
            finish: CaseFinish::Anodized,
            mount: MountType::GasketPoron,
        }
    }
}

/// Dampening/tuning layers inside the case. Each enabled foam compounds the
/// acoustic decay reduction; the spacebar foam only shapes space-zone keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoamLayers {
    pub case_foam: bool,
    pub plate_foam: bool,
    pub pe_sheet: bool,
    pub ixpe: bool,
    pub spacebar_foam: bool,
}

impl Default for FoamLayers {
    fn default() -> Self {
        Self {
            case_foam: true,
            plate_foam: true,
            pe_sheet: true,
            ixpe: false,
            spacebar_foam: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InternalMods {
    /// Tape layers on the pcb back, 0..=3.
    pub tape_mod: u8,
    pub holee_mod: bool,
    pub pe_foam_mod: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InternalsConfig {
    pub plate_material: PlateMaterial,
    pub plate_flex_cuts: bool,
    pub foams: FoamLayers,
    pub mods: InternalMods,
}

impl Default for InternalsConfig {
    fn default() -> Self {
        Self {
            plate_material: PlateMaterial::Fr4,
            plate_flex_cuts: false,
            foams: FoamLayers::default(),
            mods: InternalMods::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchMaterials {
    pub top: HousingMaterial,
    pub stem: StemMaterial,
    pub bottom: HousingMaterial,
}

impl Default for SwitchMaterials {
    fn default() -> Self {
        Self {
            top: HousingMaterial::Nylon,
            stem: StemMaterial::Pom,
            bottom: HousingMaterial::Nylon,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OringConfig {
    pub enabled: bool,
    pub thickness: OringThickness,
}

impl Default for OringConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            thickness: OringThickness::Thin,
        }
    }
}

/// Global switch definition; one build uses one switch everywhere.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchConfig {
    pub switch_type: SwitchType,
    pub materials: SwitchMaterials,
    pub spring_weight_g: f32,
    pub spring_type: SpringType,
    pub lube: LubeState,
    pub film: FilmType,
    pub stabilizer_quality: StabilizerQuality,
    pub orings: OringConfig,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            switch_type: SwitchType::Linear,
            materials: SwitchMaterials::default(),
            spring_weight_g: 62.0,
            spring_type: SpringType::Single,
            lube: LubeState::Factory,
            film: FilmType::None,
            stabilizer_quality: StabilizerQuality::Perfect,
            orings: OringConfig::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThicknessConfig {
    pub top_mm: f32,
    pub side_mm: f32,
}

impl Default for ThicknessConfig {
    fn default() -> Self {
        Self {
            top_mm: 1.5,
            side_mm: 1.3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeycapZoneConfig {
    pub profile: KeycapProfile,
    pub row_sculpt: RowSculpt,
    pub thickness: ThicknessConfig,
    pub material: KeycapMaterial,
    pub body_manufacturing: BodyManufacturing,
    pub legend_manufacturing: LegendManufacturing,
    pub legend_primary: LegendLanguage,
    pub legend_sub: LegendLanguage,
    pub legend_position: LegendPosition,
    /// Legend opacity, 0..=1.
    pub legend_opacity: f32,
    pub theme: KeycapTheme,
    pub colorway: Colorway,
    /// Wear/shine level in percent, 0..=100.
    pub wear_shine_level: f32,
    pub wear_pattern: WearPattern,
    /// Cavity resonance factor handed to the acoustic layer, 0.5..=1.5.
    pub hollow_factor: f32,
}

impl Default for KeycapZoneConfig {
    fn default() -> Self {
        Self {
            profile: KeycapProfile::Cherry,
            row_sculpt: RowSculpt::Sculpted,
            thickness: ThicknessConfig::default(),
            material: KeycapMaterial::Pbt,
            body_manufacturing: BodyManufacturing::Injection,
            legend_manufacturing: LegendManufacturing::DoubleShot,
            legend_primary: LegendLanguage::Latin,
            legend_sub: LegendLanguage::None,
            legend_position: LegendPosition::Center,
            legend_opacity: 1.0,
            theme: KeycapTheme::Default,
            colorway: Colorway::Classic,
            wear_shine_level: 8.0,
            wear_pattern: WearPattern::Uniform,
            hollow_factor: 1.0,
        }
    }
}

/// Sparse per-key override patch. Unset fields keep the zone default;
/// thickness merges at the leaf level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ThicknessPatch {
    pub top_mm: Option<f32>,
    pub side_mm: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ZonePatch {
    pub profile: Option<KeycapProfile>,
    pub row_sculpt: Option<RowSculpt>,
    pub thickness: Option<ThicknessPatch>,
    pub material: Option<KeycapMaterial>,
    pub body_manufacturing: Option<BodyManufacturing>,
    pub legend_manufacturing: Option<LegendManufacturing>,
    pub legend_primary: Option<LegendLanguage>,
    pub legend_sub: Option<LegendLanguage>,
    pub legend_position: Option<LegendPosition>,
    pub legend_opacity: Option<f32>,
    pub theme: Option<KeycapTheme>,
    pub colorway: Option<Colorway>,
    pub wear_shine_level: Option<f32>,
    pub wear_pattern: Option<WearPattern>,
    pub hollow_factor: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTable {
    pub alpha: KeycapZoneConfig,
    pub modifier: KeycapZoneConfig,
    pub function: KeycapZoneConfig,
    pub nav: KeycapZoneConfig,
    pub numpad: KeycapZoneConfig,
    pub space: KeycapZoneConfig,
}

impl ZoneTable {
    pub fn get(&self, zone: KeycapZone) -> &KeycapZoneConfig {
        match zone {
            KeycapZone::Alpha => &self.alpha,
            KeycapZone::Modifier => &self.modifier,
            KeycapZone::Function => &self.function,
            KeycapZone::Nav => &self.nav,
            KeycapZone::Numpad => &self.numpad,
            KeycapZone::Space => &self.space,
        }
    }
}

impl Default for ZoneTable {
    fn default() -> Self {
        let base = KeycapZoneConfig::default();
        Self {
            alpha: base,
            modifier: KeycapZoneConfig {
                theme: KeycapTheme::Carbon,
                colorway: Colorway::Mod,
                ..base
            },
            function: KeycapZoneConfig {
                theme: KeycapTheme::Ocean,
                colorway: Colorway::Fn,
                ..base
            },
            nav: KeycapZoneConfig {
                theme: KeycapTheme::Pastel,
                colorway: Colorway::Nav,
                ..base
            },
            numpad: KeycapZoneConfig {
                colorway: Colorway::Numpad,
                ..base
            },
            space: KeycapZoneConfig {
                thickness: ThicknessConfig {
                    top_mm: 1.6,
                    side_mm: 1.4,
                },
                wear_pattern: WearPattern::SpaceFocus,
                ..base
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeycapConfig {
    pub zones: ZoneTable,
    /// Keyed by key id, e.g. `"enter"`.
    pub overrides: HashMap<String, ZonePatch>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingMode {
    Static,
    Wave,
    Reactive,
    Rainbow,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    pub oled_enabled: bool,
    pub knob_enabled: bool,
    pub trackpoint_enabled: bool,
    pub lighting_enabled: bool,
    pub lighting_mode: LightingMode,
    /// Reactive lighting spread radius, 0..=1.
    pub lighting_reactive_spread: f32,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            oled_enabled: false,
            knob_enabled: false,
            trackpoint_enabled: false,
            lighting_enabled: true,
            lighting_mode: LightingMode::Reactive,
            lighting_reactive_spread: 0.7,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeskmatType {
    None,
    Cloth,
    Glass,
    Leather,
    Wood,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeskSurface {
    Wood,
    Glass,
    Stone,
    Laminate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskSetupConfig {
    pub deskmat: DeskmatType,
    pub desk_surface: DeskSurface,
}

impl Default for DeskSetupConfig {
    fn default() -> Self {
        Self {
            deskmat: DeskmatType::Cloth,
            desk_surface: DeskSurface::Wood,
        }
    }
}

/// Post-derivation acoustic seasoning on top of the physical layering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcousticOverrides {
    /// High-frequency gain, 0.5..=1.5.
    pub brightness: f32,
    /// Decay gain, 0.5..=1.5; above 1 shortens the tail.
    pub dampening: f32,
    /// Reverb gain, 0..=1.
    pub reverb: f32,
}

impl Default for AcousticOverrides {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            dampening: 1.0,
            reverb: 0.2,
        }
    }
}

/// The full serializable configuration snapshot. The simulation core only
/// reads it; the owning store bumps `generation` on every edit so derived
/// caches know when to refresh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeyboardConfig {
    pub layout: LayoutConfig,
    pub case: CaseConfig,
    pub internals: InternalsConfig,
    pub switches: SwitchConfig,
    pub keycaps: KeycapConfig,
    pub modules: ModulesConfig,
    pub desk: DeskSetupConfig,
    pub acoustic_overrides: AcousticOverrides,
    #[serde(skip)]
    pub generation: u64,
}

impl KeyboardConfig {
    /// Count of active full-board foam layers for acoustic compounding.
    /// The PE foam mod acts as one more layer; the spacebar foam is
    /// zone-scoped and handled separately.
    pub fn foam_layer_count(&self) -> u32 {
        let foams = &self.internals.foams;
        [
            foams.case_foam,
            foams.plate_foam,
            foams.pe_sheet,
            foams.ixpe,
            self.internals.mods.pe_foam_mod,
        ]
        .iter()
        .filter(|&&on| on)
        .count() as u32
    }
}

/// Nominal keycap plan extent for a key spanning `span` layout units.
#[inline]
pub fn plan_extent(span: f32) -> f32 {
    span * units::KEY_UNIT - KEY_GAP
}
