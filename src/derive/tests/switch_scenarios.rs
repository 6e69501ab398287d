// Switch mechanics across the catalog configurations.

use crate::config::{
    KeyboardConfig, OringThickness, SpringType, StabilizerQuality, SwitchConfig, SwitchType,
};
use crate::derive::{derive, derive_switch, switch_blueprint_metrics};
use crate::governor::QualityTier;
use crate::layout::KeyContext;

fn derive_for(config: &KeyboardConfig, id: &str, row: u32, width: f32) -> crate::derive::DerivedKeyParams {
    derive(config, &KeyContext::new(id, row, width, 1.0), QualityTier::Balanced)
}

#[test]
fn linear_62g_without_orings_travels_four_millimeters() {
    let config = KeyboardConfig::default();
    let derived = derive_for(&config, "j", 2, 1.0);

    assert!((derived.switch.total_travel - 0.004).abs() < 1.0e-6);
    assert_eq!(derived.switch.bump_strength, 0.0);
}

#[test]
fn thick_orings_compress_tactile_travel_to_two_thirds() {
    let mut config = KeyboardConfig::default();
    config.switches.switch_type = SwitchType::Tactile;

    let bare = derive_for(&config, "j", 2, 1.0);

    config.switches.orings.enabled = true;
    config.switches.orings.thickness = OringThickness::Thick;
    let ringed = derive_for(&config, "j", 2, 1.0);

    let ratio = ringed.switch.total_travel / bare.switch.total_travel;
    assert!((ratio - 0.66).abs() < 1.0e-3, "ratio was {ratio}");
    assert_eq!(ringed.switch.bump_strength, bare.switch.bump_strength);
    assert!(ringed.switch.bump_center > 0.0);
    assert!(ringed.switch.bump_center < ringed.switch.total_travel);
}

#[test]
fn housing_bottom_sits_strictly_below_housing_top() {
    for switch_type in [
        SwitchType::Linear,
        SwitchType::Tactile,
        SwitchType::Clicky,
        SwitchType::Silent,
    ] {
        let mut config = KeyboardConfig::default();
        config.switches.switch_type = switch_type;
        let derived = derive_for(&config, "j", 2, 1.0);
        assert!(
            derived.switch.bottom_y < derived.switch.top_y,
            "{switch_type:?} violated housing ordering"
        );
        assert_eq!(derived.assembly.switch_top_y, derived.switch.top_y);
    }
}

#[test]
fn spring_type_orders_stiffness() {
    let stiffness = |spring_type: SpringType| {
        let switches = SwitchConfig {
            spring_type,
            ..SwitchConfig::default()
        };
        derive_switch(&switches, &Default::default(), 0.018, 0.018, 0.011, false).spring_stiffness
    };

    let extended = stiffness(SpringType::Extended);
    let single = stiffness(SpringType::Single);
    let progressive = stiffness(SpringType::Progressive);
    assert!(progressive > single);
    assert!(single > extended);
}

#[test]
fn spring_weight_saturates_outside_the_ramp() {
    let at_weight = |weight: f32| {
        let switches = SwitchConfig {
            spring_weight_g: weight,
            ..SwitchConfig::default()
        };
        derive_switch(&switches, &Default::default(), 0.018, 0.018, 0.011, false).spring_stiffness
    };

    assert_eq!(at_weight(10.0), at_weight(35.0));
    assert_eq!(at_weight(80.0), at_weight(500.0));
    assert!(at_weight(80.0) > at_weight(35.0));
}

#[test]
fn stabilizer_amplitude_requires_width_and_rattle() {
    let mut config = KeyboardConfig::default();
    config.switches.stabilizer_quality = StabilizerQuality::Rattle;

    let wide = derive_for(&config, "space", 4, 6.25);
    assert_eq!(wide.switch.stabilizer_amplitude, 0.0006);

    let narrow = derive_for(&config, "j", 2, 1.0);
    assert_eq!(narrow.switch.stabilizer_amplitude, 0.0);

    config.internals.mods.holee_mod = true;
    let damped = derive_for(&config, "space", 4, 6.25);
    assert_eq!(damped.switch.stabilizer_amplitude, 0.00032);

    config.switches.stabilizer_quality = StabilizerQuality::Perfect;
    let perfect = derive_for(&config, "space", 4, 6.25);
    assert_eq!(perfect.switch.stabilizer_amplitude, 0.0);
}

#[test]
fn structure_fits_inside_the_switch_footprint() {
    let config = KeyboardConfig::default();
    let derived = derive_for(&config, "j", 2, 1.0);

    assert!(derived.structure.housing_width <= derived.switch.footprint);
    assert!(derived.structure.housing_depth <= derived.switch.footprint);
    assert!(derived.structure.stem_cross_slot < derived.mount.socket_cross_slot);
    assert!(derived.mount.engagement_depth <= derived.mount.socket_depth - 0.0005);
    assert!(derived.mount.mount_clearance > 0.0);
}

#[test]
fn jitter_limit_stays_inside_the_allowance_band() {
    for switch_type in [SwitchType::Linear, SwitchType::Clicky] {
        let mut config = KeyboardConfig::default();
        config.switches.switch_type = switch_type;
        let derived = derive_for(&config, "enter", 2, 2.25);
        let limit = derived.mount.lateral_jitter_limit;
        assert!((0.00002..=0.00026).contains(&limit), "limit was {limit}");
    }
}

#[test]
fn blueprint_metrics_match_the_switch_derivation() {
    let config = KeyboardConfig::default();
    let metrics = switch_blueprint_metrics(&config.switches);

    assert!((metrics.total_travel_mm - 4.0).abs() < 1.0e-3);
    assert_eq!(metrics.spring_coils, 19);
    assert!((metrics.spring_free_length_mm - 15.5).abs() < 1.0e-3);
    assert_eq!(metrics.oring_mm, 0.0);
    assert_eq!(metrics.film_thickness_mm, 0.0);
}
