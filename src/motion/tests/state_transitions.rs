use crate::config::{KeyboardConfig, SwitchType};
use crate::derive::{self, DerivedKeyParams};
use crate::governor::QualityTier;
use crate::layout::KeyContext;
use crate::motion::{KeyMotionSample, KeyMotionState, MotionInput, MotionPhase};
use crate::presets::MotionTuning;

const DT: f32 = 1.0 / 120.0;

fn derived_key(config: &KeyboardConfig, id: &str, width: f32) -> DerivedKeyParams {
    let key = KeyContext::new(id, 2, width, 1.0);
    derive::derive(config, &key, QualityTier::Balanced)
}

fn tick(
    state: &mut KeyMotionState,
    config: &KeyboardConfig,
    derived: &DerivedKeyParams,
) -> KeyMotionSample {
    let input = MotionInput::from_derived(config.switches.switch_type, derived);
    state.update_with(&MotionTuning::default(), DT, &input)
}

fn run_until_phase(
    state: &mut KeyMotionState,
    config: &KeyboardConfig,
    derived: &DerivedKeyParams,
    phase: MotionPhase,
    max_ticks: usize,
) -> usize {
    for ticks in 1..=max_ticks {
        tick(state, config, derived);
        if state.phase() == phase {
            return ticks;
        }
    }
    panic!("never reached {:?} within {} ticks", phase, max_ticks);
}

#[test]
fn press_holds_at_the_bottom() {
    let config = KeyboardConfig::default();
    let derived = derived_key(&config, "j", 1.0);
    let mut state = KeyMotionState::new("j");

    state.set_pressed(true);
    run_until_phase(&mut state, &config, &derived, MotionPhase::Bottomed, 60);
    assert_eq!(state.travel(), derived.switch.total_travel);

    for _ in 0..30 {
        let sample = tick(&mut state, &config, &derived);
        assert_eq!(state.phase(), MotionPhase::Bottomed);
        assert_eq!(sample.travel, derived.switch.total_travel);
        assert_eq!(sample.press_ratio, 1.0);
    }
}

#[test]
fn fast_tap_still_bottoms_out_before_rising() {
    let config = KeyboardConfig::default();
    let derived = derived_key(&config, "k", 1.0);
    let mut state = KeyMotionState::new("k");

    // release lands before a single tick has run
    state.set_pressed(true);
    state.set_pressed(false);

    let mut max_travel = 0.0f32;
    let mut saw_bottomed = false;
    for _ in 0..200 {
        let sample = tick(&mut state, &config, &derived);
        max_travel = max_travel.max(sample.travel);
        saw_bottomed |= state.phase() == MotionPhase::Bottomed;
        if state.phase() == MotionPhase::Rest {
            break;
        }
    }

    assert_eq!(max_travel, derived.switch.total_travel, "tap must bottom out");
    assert!(!saw_bottomed, "queued release skips the held phase");
    assert_eq!(state.phase(), MotionPhase::Rest);
    assert_eq!(state.travel(), 0.0);
}

#[test]
fn release_from_bottom_returns_to_rest() {
    let config = KeyboardConfig::default();
    let derived = derived_key(&config, "l", 1.0);
    let mut state = KeyMotionState::new("l");

    state.set_pressed(true);
    run_until_phase(&mut state, &config, &derived, MotionPhase::Bottomed, 60);

    state.set_pressed(false);
    assert_eq!(state.phase(), MotionPhase::Releasing);

    run_until_phase(&mut state, &config, &derived, MotionPhase::Rest, 200);
    assert_eq!(state.travel(), 0.0);
}

#[test]
fn repress_while_rising_turns_around_midair() {
    let config = KeyboardConfig::default();
    let derived = derived_key(&config, "h", 1.0);
    let mut state = KeyMotionState::new("h");

    state.set_pressed(true);
    run_until_phase(&mut state, &config, &derived, MotionPhase::Bottomed, 60);
    state.set_pressed(false);

    tick(&mut state, &config, &derived);
    tick(&mut state, &config, &derived);
    assert_eq!(state.phase(), MotionPhase::Releasing);
    let turnaround_travel = state.travel();
    assert!(turnaround_travel > 0.0);

    state.set_pressed(true);
    assert_eq!(state.phase(), MotionPhase::Pressing);

    let mut min_travel = turnaround_travel;
    for _ in 0..60 {
        let sample = tick(&mut state, &config, &derived);
        min_travel = min_travel.min(sample.travel);
        if state.phase() == MotionPhase::Bottomed {
            break;
        }
    }

    assert!(min_travel > 0.0, "re-press must not pass through rest");
    assert_eq!(state.phase(), MotionPhase::Bottomed);
}

#[test]
fn repress_cancels_a_queued_release() {
    let config = KeyboardConfig::default();
    let derived = derived_key(&config, "g", 1.0);
    let mut state = KeyMotionState::new("g");

    state.set_pressed(true);
    tick(&mut state, &config, &derived);
    state.set_pressed(false);
    state.set_pressed(true);

    run_until_phase(&mut state, &config, &derived, MotionPhase::Bottomed, 60);
    for _ in 0..20 {
        tick(&mut state, &config, &derived);
        assert_eq!(state.phase(), MotionPhase::Bottomed);
    }
}

#[test]
fn tactile_bump_slows_the_down_stroke() {
    let linear_config = KeyboardConfig::default();
    let mut tactile_config = KeyboardConfig::default();
    tactile_config.switches.switch_type = SwitchType::Tactile;

    let linear_derived = derived_key(&linear_config, "t", 1.0);
    let tactile_derived = derived_key(&tactile_config, "t", 1.0);

    let mut linear_state = KeyMotionState::new("t");
    linear_state.set_pressed(true);
    let linear_ticks = run_until_phase(
        &mut linear_state,
        &linear_config,
        &linear_derived,
        MotionPhase::Bottomed,
        200,
    );

    let mut tactile_state = KeyMotionState::new("t");
    tactile_state.set_pressed(true);
    let tactile_ticks = run_until_phase(
        &mut tactile_state,
        &tactile_config,
        &tactile_derived,
        MotionPhase::Bottomed,
        200,
    );

    assert!(
        tactile_ticks > linear_ticks,
        "bump resistance must lengthen the stroke ({} vs {})",
        tactile_ticks,
        linear_ticks
    );
}

#[test]
fn rebound_starts_faster_off_the_bottom() {
    let config = KeyboardConfig::default();
    let derived = derived_key(&config, "b", 1.0);
    let mut state = KeyMotionState::new("b");

    state.set_pressed(true);
    run_until_phase(&mut state, &config, &derived, MotionPhase::Bottomed, 60);
    state.set_pressed(false);

    let before = state.travel();
    tick(&mut state, &config, &derived);
    let first_step = before - state.travel();

    let mid = state.travel();
    tick(&mut state, &config, &derived);
    let second_step = mid - state.travel();

    assert!(first_step > second_step, "overshoot recovery boosts the first step");
}

#[test]
fn duplicate_press_events_are_inert() {
    let config = KeyboardConfig::default();
    let derived = derived_key(&config, "d", 1.0);
    let mut state = KeyMotionState::new("d");

    state.set_pressed(true);
    state.set_pressed(true);
    assert!(state.pressed());
    assert_eq!(state.phase(), MotionPhase::Pressing);

    tick(&mut state, &config, &derived);
    state.set_pressed(false);
    // a single release answers the single logical press
    let mut max_travel = 0.0f32;
    for _ in 0..200 {
        let sample = tick(&mut state, &config, &derived);
        max_travel = max_travel.max(sample.travel);
        if state.phase() == MotionPhase::Rest {
            break;
        }
    }
    assert_eq!(max_travel, derived.switch.total_travel);
    assert_eq!(state.phase(), MotionPhase::Rest);
}
