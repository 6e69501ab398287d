// derive/mod.rs
// Parameter derivation pipeline: configuration snapshot + key context in,
// complete derived parameter set out. Pure and deterministic; every visual
// consumer reads the same numbers from here.

pub mod animation;
pub mod blueprint;
pub mod keycap;
pub mod mount;
pub mod switch;

pub use animation::{derive_animation, AnimationParams};
pub use blueprint::{
    profile_blueprint_geometry, switch_blueprint_metrics, ProfileBlueprintGeometry,
    SwitchBlueprintMetrics,
};
pub use keycap::{derive_keycap, derive_keycap_from_zone, resolve_zone_config, KeycapParams};
pub use mount::{derive_assembly_datum, derive_keycap_mount, AssemblyDatum, KeycapMountParams};
pub use switch::{derive_switch, derive_switch_structure, SwitchParams, SwitchStructureParams};

use crate::config::KeyboardConfig;
use crate::governor::QualityTier;
use crate::layout::KeyContext;
use crate::presets::{self, MotionTuning};
use crate::profile_scope;

/// The complete derived parameter set for one key.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedKeyParams {
    pub keycap: KeycapParams,
    pub switch: SwitchParams,
    pub structure: SwitchStructureParams,
    pub mount: KeycapMountParams,
    pub assembly: AssemblyDatum,
    pub animation: AnimationParams,
    pub quality: QualityTier,
}

/// Full derivation for one key. Pure: identical inputs produce identical
/// output, and nothing here reads clocks or frame state. Out-of-range
/// inputs are clamped, never rejected.
pub fn derive(config: &KeyboardConfig, key: &KeyContext, quality: QualityTier) -> DerivedKeyParams {
    let tuning = presets::motion_tuning();
    derive_with(&tuning, config, key, quality)
}

/// Full derivation under an explicit tuning preset. The self-check probes
/// candidate bands through this without touching the process-wide tuning.
pub fn derive_with(
    tuning: &MotionTuning,
    config: &KeyboardConfig,
    key: &KeyContext,
    quality: QualityTier,
) -> DerivedKeyParams {
    profile_scope!("derive_key");

    let keycap = derive_keycap(&config.keycaps, &config.switches, key);

    let has_stabilizer = key.width >= 2.0;
    let switch = switch::derive_switch_with(
        tuning,
        &config.switches,
        &config.internals.mods,
        keycap.key_width,
        keycap.key_depth,
        keycap.key_height,
        has_stabilizer,
    );

    let animation = derive_animation(
        &keycap.zone_config,
        key.row,
        config.internals.plate_flex_cuts,
    );
    let structure = derive_switch_structure(config.switches.switch_type, switch.footprint);
    let mount = mount::derive_keycap_mount_with(tuning, &keycap, &structure);
    let assembly = derive_assembly_datum(&switch);

    DerivedKeyParams {
        keycap,
        switch,
        structure,
        mount,
        assembly,
        animation,
        quality,
    }
}

#[cfg(test)]
#[path = "tests/zone_overrides.rs"]
mod zone_overrides;

#[cfg(test)]
#[path = "tests/switch_scenarios.rs"]
mod switch_scenarios;

#[cfg(test)]
#[path = "tests/determinism.rs"]
mod determinism;
