// Determinism and input clamping for the derivation entry point.

use crate::config::{KeyboardConfig, WearPattern};
use crate::derive::derive;
use crate::governor::QualityTier;
use crate::layout::KeyContext;

#[test]
fn identical_inputs_produce_identical_output() {
    let mut config = KeyboardConfig::default();
    config.switches.spring_weight_g = 67.0;
    config.keycaps.zones.alpha.wear_shine_level = 40.0;
    let key = KeyContext::new("enter", 2, 2.25, 1.0);

    let first = derive(&config, &key, QualityTier::High);
    let second = derive(&config, &key, QualityTier::High);
    assert_eq!(first, second);
}

#[test]
fn derivation_never_reads_other_keys() {
    let config = KeyboardConfig::default();
    let key = KeyContext::new("k", 2, 1.0, 1.0);

    let alone = derive(&config, &key, QualityTier::Balanced);

    // deriving a different key in between must not perturb the next call
    let _ = derive(&config, &KeyContext::new("space", 4, 6.25, 1.0), QualityTier::Balanced);
    let again = derive(&config, &key, QualityTier::Balanced);
    assert_eq!(alone, again);
}

#[test]
fn pathological_spans_are_clamped_not_rejected() {
    let config = KeyboardConfig::default();

    let tiny = derive(&config, &KeyContext::new("q", 1, 0.01, 1.0), QualityTier::Balanced);
    assert!(tiny.keycap.key_width > 0.0);
    assert!(tiny.keycap.key_width.is_finite());

    let huge = derive(&config, &KeyContext::new("q", 1, 400.0, 1.0), QualityTier::Balanced);
    assert!(huge.keycap.key_width < 0.2);

    let broken = derive(
        &config,
        &KeyContext::new("q", 1, f32::NAN, f32::NAN),
        QualityTier::Balanced,
    );
    assert!(broken.keycap.key_width.is_finite());
    assert!(broken.keycap.key_depth.is_finite());
    assert!(broken.switch.total_travel > 0.0);
}

#[test]
fn legend_opacity_is_clamped_into_unit_range() {
    let mut config = KeyboardConfig::default();
    config.keycaps.zones.alpha.legend_opacity = 7.5;
    let derived = derive(&config, &KeyContext::new("a", 2, 1.0, 1.0), QualityTier::Balanced);
    assert!(derived.keycap.legend_primary_opacity <= 1.0);
    assert!(derived.keycap.legend_sub_opacity <= 1.0);
}

#[test]
fn wear_patterns_focus_on_their_hot_keys() {
    let mut config = KeyboardConfig::default();
    config.keycaps.zones.alpha.wear_pattern = WearPattern::WasdFocus;

    let hot = derive(&config, &KeyContext::new("w", 1, 1.0, 1.0), QualityTier::Balanced);
    let cold = derive(&config, &KeyContext::new("p", 1, 1.0, 1.0), QualityTier::Balanced);
    assert!(hot.keycap.wear_ratio > cold.keycap.wear_ratio);

    config.keycaps.zones.space.wear_pattern = WearPattern::SpaceFocus;
    let space = derive(&config, &KeyContext::new("space", 4, 6.25, 1.0), QualityTier::Balanced);
    let base = config.keycaps.zones.space.wear_shine_level / 100.0;
    assert!(space.keycap.wear_ratio > base);
}

#[test]
fn wear_ratio_saturates_at_one() {
    let mut config = KeyboardConfig::default();
    config.keycaps.zones.alpha.wear_shine_level = 95.0;
    config.keycaps.zones.alpha.wear_pattern = WearPattern::WasdFocus;
    let derived = derive(&config, &KeyContext::new("w", 1, 1.0, 1.0), QualityTier::Balanced);
    assert_eq!(derived.keycap.wear_ratio, 1.0);
}
