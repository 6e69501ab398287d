// Acoustic profile synthesis. Maps a configuration snapshot plus a key
// identity to a tone profile, then turns press/release events into voice
// requests the playback adapter renders. Synthesis is pure; each event gets
// its own voice id so overlapping presses never share or block a voice.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::{
    self, CaseMaterial, FilmType, KeyboardConfig, LubeState, OringThickness, PlateMaterial,
    SwitchType,
};
use crate::derive::keycap::resolve_zone_config;
use crate::layout::{self, KeycapZone};
use crate::profile_scope;
use crate::utils::clamp;

// ======================== ACOUSTIC PRESET TABLES =========================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwitchAcousticPreset {
    pub base_frequency: f32,
    pub attack: f32,
    pub decay: f32,
    pub thock_level: f32,
    pub clack_level: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LubeAcousticEffect {
    pub freq_mod: f32,
    pub decay_mod: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlateAcousticEffect {
    pub brightness: f32,
    pub resonance: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaseAcousticEffect {
    pub hollow: f32,
    pub dampening: f32,
}

const LINEAR_ACOUSTIC_PRESET: SwitchAcousticPreset = SwitchAcousticPreset {
    base_frequency: 800.0,
    attack: 0.005,
    decay: 0.08,
    thock_level: 0.7,
    clack_level: 0.3,
};

const STOCK_LUBE_EFFECT: LubeAcousticEffect = LubeAcousticEffect {
    freq_mod: 1.2,
    decay_mod: 1.0,
};

const FR4_PLATE_EFFECT: PlateAcousticEffect = PlateAcousticEffect {
    brightness: 1.0,
    resonance: 1.0,
};

const ALU_6063_CASE_EFFECT: CaseAcousticEffect = CaseAcousticEffect {
    hollow: 0.6,
    dampening: 0.4,
};

static SWITCH_ACOUSTIC_PRESETS: Lazy<HashMap<SwitchType, SwitchAcousticPreset>> =
    Lazy::new(|| {
        let mut table = HashMap::new();
        table.insert(SwitchType::Linear, LINEAR_ACOUSTIC_PRESET);
        table.insert(
            SwitchType::Tactile,
            SwitchAcousticPreset {
                base_frequency: 1200.0,
                attack: 0.003,
                decay: 0.1,
                thock_level: 0.5,
                clack_level: 0.5,
            },
        );
        table.insert(
            SwitchType::Clicky,
            SwitchAcousticPreset {
                base_frequency: 2500.0,
                attack: 0.001,
                decay: 0.15,
                thock_level: 0.2,
                clack_level: 0.8,
            },
        );
        table.insert(
            SwitchType::Silent,
            SwitchAcousticPreset {
                base_frequency: 400.0,
                attack: 0.01,
                decay: 0.05,
                thock_level: 0.8,
                clack_level: 0.1,
            },
        );
        table
    });

static LUBE_ACOUSTIC_EFFECTS: Lazy<HashMap<LubeState, LubeAcousticEffect>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(LubeState::Stock, STOCK_LUBE_EFFECT);
    table.insert(
        LubeState::Factory,
        LubeAcousticEffect {
            freq_mod: 1.0,
            decay_mod: 0.9,
        },
    );
    table.insert(
        LubeState::HandLubedThin,
        LubeAcousticEffect {
            freq_mod: 0.85,
            decay_mod: 0.8,
        },
    );
    table.insert(
        LubeState::HandLubedThick,
        LubeAcousticEffect {
            freq_mod: 0.7,
            decay_mod: 0.7,
        },
    );
    table
});

static PLATE_ACOUSTIC_EFFECTS: Lazy<HashMap<PlateMaterial, PlateAcousticEffect>> =
    Lazy::new(|| {
        let mut table = HashMap::new();
        table.insert(
            PlateMaterial::Alu,
            PlateAcousticEffect {
                brightness: 1.2,
                resonance: 0.8,
            },
        );
        table.insert(
            PlateMaterial::Brass,
            PlateAcousticEffect {
                brightness: 1.5,
                resonance: 1.2,
            },
        );
        table.insert(
            PlateMaterial::Pc,
            PlateAcousticEffect {
                brightness: 0.8,
                resonance: 0.6,
            },
        );
        table.insert(PlateMaterial::Fr4, FR4_PLATE_EFFECT);
        table.insert(
            PlateMaterial::Pom,
            PlateAcousticEffect {
                brightness: 0.7,
                resonance: 0.5,
            },
        );
        table.insert(
            PlateMaterial::Carbon,
            PlateAcousticEffect {
                brightness: 1.3,
                resonance: 0.9,
            },
        );
        table.insert(
            PlateMaterial::Ppe,
            PlateAcousticEffect {
                brightness: 0.9,
                resonance: 0.7,
            },
        );
        table
    });

static CASE_ACOUSTIC_EFFECTS: Lazy<HashMap<CaseMaterial, CaseAcousticEffect>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(CaseMaterial::Alu6063, ALU_6063_CASE_EFFECT);
    table.insert(
        CaseMaterial::Alu7075,
        CaseAcousticEffect {
            hollow: 0.5,
            dampening: 0.5,
        },
    );
    table.insert(
        CaseMaterial::Pc,
        CaseAcousticEffect {
            hollow: 0.3,
            dampening: 0.7,
        },
    );
    table.insert(
        CaseMaterial::Acrylic,
        CaseAcousticEffect {
            hollow: 0.4,
            dampening: 0.6,
        },
    );
    table.insert(
        CaseMaterial::Abs,
        CaseAcousticEffect {
            hollow: 0.7,
            dampening: 0.3,
        },
    );
    table.insert(
        CaseMaterial::Wood,
        CaseAcousticEffect {
            hollow: 0.2,
            dampening: 0.8,
        },
    );
    table
});

pub fn switch_acoustic_preset(switch_type: SwitchType) -> SwitchAcousticPreset {
    SWITCH_ACOUSTIC_PRESETS
        .get(&switch_type)
        .copied()
        .unwrap_or(LINEAR_ACOUSTIC_PRESET)
}

pub fn lube_acoustic_effect(lube: LubeState) -> LubeAcousticEffect {
    LUBE_ACOUSTIC_EFFECTS
        .get(&lube)
        .copied()
        .unwrap_or(STOCK_LUBE_EFFECT)
}

pub fn plate_acoustic_effect(plate: PlateMaterial) -> PlateAcousticEffect {
    PLATE_ACOUSTIC_EFFECTS
        .get(&plate)
        .copied()
        .unwrap_or(FR4_PLATE_EFFECT)
}

pub fn case_acoustic_effect(material: CaseMaterial) -> CaseAcousticEffect {
    CASE_ACOUSTIC_EFFECTS
        .get(&material)
        .copied()
        .unwrap_or(ALU_6063_CASE_EFFECT)
}

// =========================== PROFILE SYNTHESIS ===========================

/// Tone parameters for one synthesized key sound. All values are clamped
/// into audible-safe ranges before this leaves `synthesize`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AcousticProfile {
    pub base_frequency: f32,
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    pub filter_freq: f32,
    pub filter_q: f32,
    pub reverb_mix: f32,
    pub thock_level: f32,
    pub clack_level: f32,
}

/// Computes the tone profile for one key under the given configuration.
///
/// Layering order: switch base preset, lube modifier, film and o-rings,
/// foam dampening, tape mod, then the resolved zone's thickness and hollow
/// factor, with the user's acoustic overrides applied at the end. Foam
/// layers compound multiplicatively; the space-bar foam shortens and
/// darkens keys in the space zone only.
pub fn synthesize(config: &KeyboardConfig, key_id: Option<&str>) -> AcousticProfile {
    profile_scope!("synthesize");

    let switches = &config.switches;
    let internals = &config.internals;
    let overrides = &config.acoustic_overrides;

    let base = switch_acoustic_preset(switches.switch_type);
    let lube = lube_acoustic_effect(switches.lube);
    let plate = plate_acoustic_effect(internals.plate_material);
    let case_effect = case_acoustic_effect(config.case.material);

    let id = key_id.unwrap_or("");
    let zone = layout::zone_for_key(id);
    let zone_config = resolve_zone_config(&config.keycaps, zone, id);

    let mut freq_mod = lube.freq_mod;
    let mut decay_mod = lube.decay_mod;

    if switches.film != FilmType::None {
        freq_mod *= 0.9;
        decay_mod *= 0.85;
    }

    if switches.orings.enabled {
        let (freq_factor, decay_factor) = match switches.orings.thickness {
            OringThickness::Thick => (0.82, 0.62),
            OringThickness::Thin => (0.9, 0.75),
        };
        freq_mod *= freq_factor;
        decay_mod *= decay_factor;
    }

    // each active foam layer compounds the previous one's reduction
    decay_mod *= config::FOAM_DECAY_FACTOR.powi(config.foam_layer_count() as i32);

    if internals.foams.spacebar_foam && zone == KeycapZone::Space {
        decay_mod *= config::SPACEBAR_FOAM_DECAY;
        freq_mod *= config::SPACEBAR_FOAM_FREQ;
    }

    freq_mod *= 1.0 - f32::from(internals.mods.tape_mod) * config::TAPE_LAYER_FREQ_DROP;

    let thickness_avg = (zone_config.thickness.top_mm + zone_config.thickness.side_mm) / 2.0;
    let thickness_tone = clamp(1.4 - thickness_avg * 0.26, 0.82, 1.15);
    let hollow_tone = clamp(zone_config.hollow_factor, 0.5, 1.5);

    let base_frequency = base.base_frequency
        * freq_mod
        * plate.brightness
        * thickness_tone
        * (1.0 + (hollow_tone - 1.0) * 0.22)
        * overrides.brightness;

    AcousticProfile {
        base_frequency,
        attack: base.attack,
        decay: clamp(
            base.decay * decay_mod * (2.0 - overrides.dampening),
            config::DECAY_FLOOR_S,
            config::DECAY_CEILING_S,
        ),
        sustain: 0.3,
        release: 0.1,
        filter_freq: clamp(
            base_frequency * 2.0 * plate.brightness * overrides.brightness,
            config::FILTER_FREQ_FLOOR_HZ,
            config::FILTER_FREQ_CEILING_HZ,
        ),
        filter_q: 1.0 + case_effect.hollow * hollow_tone,
        reverb_mix: clamp((0.2 + case_effect.hollow * 0.3) * overrides.reverb, 0.0, 1.0),
        thock_level: base.thock_level
            * (1.0 - case_effect.dampening * 0.3)
            * if thickness_avg > 1.45 { 1.08 } else { 0.95 },
        clack_level: base.clack_level
            * plate.brightness
            * if thickness_avg < 1.35 { 1.08 } else { 0.92 },
    }
}

// ============================ VOICE REQUESTS =============================

static NEXT_VOICE_ID: AtomicU64 = AtomicU64::new(1);

/// One fire-and-forget playback request. Produced by the event handlers,
/// consumed by whatever owns the signal graph; carrying the profile by
/// value keeps in-flight voices independent of later config changes.
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceRequest {
    pub voice: u64,
    pub key: String,
    pub profile: AcousticProfile,
    pub downstroke: bool,
}

pub fn press_voice(config: &KeyboardConfig, key_id: &str) -> VoiceRequest {
    VoiceRequest {
        voice: NEXT_VOICE_ID.fetch_add(1, Ordering::Relaxed),
        key: key_id.to_string(),
        profile: synthesize(config, Some(key_id)),
        downstroke: true,
    }
}

pub fn release_voice(config: &KeyboardConfig, key_id: &str) -> VoiceRequest {
    VoiceRequest {
        voice: NEXT_VOICE_ID.fetch_add(1, Ordering::Relaxed),
        key: key_id.to_string(),
        profile: synthesize(config, Some(key_id)),
        downstroke: false,
    }
}

// =========================== PLAYBACK ADAPTER ============================

const PARTIAL_FREQ_RATIO: f32 = 1.5;
const THOCK_GAIN_SCALE: f32 = 0.6;
const CLACK_GAIN_SCALE: f32 = 0.4;
const ENVELOPE_FLOOR: f32 = 0.0001;
const ENVELOPE_TAIL: f32 = 0.01;
const VOICE_STOP_PAD_S: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OscillatorWave {
    Sine,
    Triangle,
    Square,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OscillatorPartial {
    pub wave: OscillatorWave,
    pub frequency: f32,
    pub gain: f32,
}

/// Gain envelope breakpoints, relative to voice start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopePlan {
    pub floor: f32,
    pub peak: f32,
    pub attack_s: f32,
    pub decay_s: f32,
    pub tail: f32,
}

/// Fully resolved signal-graph settings for one voice. This is the last
/// value the core produces; an audio backend maps it onto oscillator and
/// filter nodes one to one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoicePlan {
    pub voice: u64,
    pub partials: [OscillatorPartial; 2],
    pub envelope: EnvelopePlan,
    pub filter_freq: f32,
    pub filter_q: f32,
    pub reverb_mix: f32,
    pub stop_at_s: f32,
}

/// Renders a voice request into concrete playback settings. Downstrokes
/// use the softer triangle partial, upstrokes the harder square one.
pub fn voice_plan(request: &VoiceRequest) -> VoicePlan {
    let profile = &request.profile;
    let thock_gain = profile.thock_level * THOCK_GAIN_SCALE;
    let clack_gain = profile.clack_level * CLACK_GAIN_SCALE;

    VoicePlan {
        voice: request.voice,
        partials: [
            OscillatorPartial {
                wave: OscillatorWave::Sine,
                frequency: profile.base_frequency,
                gain: thock_gain,
            },
            OscillatorPartial {
                wave: if request.downstroke {
                    OscillatorWave::Triangle
                } else {
                    OscillatorWave::Square
                },
                frequency: profile.base_frequency * PARTIAL_FREQ_RATIO,
                gain: clack_gain,
            },
        ],
        envelope: EnvelopePlan {
            floor: ENVELOPE_FLOOR,
            peak: thock_gain + clack_gain,
            attack_s: profile.attack,
            decay_s: profile.decay,
            tail: ENVELOPE_TAIL,
        },
        filter_freq: profile.filter_freq,
        filter_q: profile.filter_q,
        reverb_mix: clamp(profile.reverb_mix, 0.0, 1.0),
        stop_at_s: profile.decay + VOICE_STOP_PAD_S,
    }
}
