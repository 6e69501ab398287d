use std::collections::HashMap;

use crate::config::{KeyboardConfig, SwitchType};
use crate::derive::{self, DerivedKeyParams};
use crate::governor::QualityTier;
use crate::layout::KeyContext;
use crate::motion::{MotionArena, MotionInput};

const DT: f32 = 1.0 / 120.0;

fn derived_cache(
    config: &KeyboardConfig,
    ids: &[&str],
) -> HashMap<String, (SwitchType, DerivedKeyParams)> {
    ids.iter()
        .map(|id| {
            let key = KeyContext::new(id, 2, 1.0, 1.0);
            let derived = derive::derive(config, &key, QualityTier::Balanced);
            (id.to_string(), (config.switches.switch_type, derived))
        })
        .collect()
}

fn step(
    arena: &mut MotionArena,
    cache: &HashMap<String, (SwitchType, DerivedKeyParams)>,
    frames: usize,
) {
    for _ in 0..frames {
        arena.step_frame(DT, |id| {
            cache
                .get(id)
                .map(|(switch_type, derived)| MotionInput::from_derived(*switch_type, derived))
        });
    }
}

#[test]
fn mounting_twice_returns_the_same_handle() {
    let mut arena = MotionArena::new();
    let first = arena.mount("a").unwrap();
    let second = arena.mount("a").unwrap();
    assert_eq!(first, second);
    assert_eq!(arena.len(), 1);
    assert_eq!(arena.key_id(first), Some("a"));
}

#[test]
fn stale_handles_are_inert_after_unmount() {
    let config = KeyboardConfig::default();
    let cache = derived_cache(&config, &["a"]);

    let mut arena = MotionArena::new();
    let old = arena.mount("a").unwrap();
    arena.unmount(old);
    assert_eq!(arena.sample(old), None);

    // double unmount must not free the slot twice
    arena.unmount(old);
    assert_eq!(arena.len(), 0);

    let fresh = arena.mount("a").unwrap();
    assert_ne!(old, fresh);

    // a press through the dead handle cannot reach the remounted key
    arena.press(old);
    step(&mut arena, &cache, 30);
    let sample = arena.sample(fresh).unwrap();
    assert_eq!(sample.travel, 0.0);
    assert_eq!(arena.sample(old), None);
}

#[test]
fn capacity_exhaustion_refuses_new_keys() {
    let mut arena = MotionArena::with_capacity(2);
    let a = arena.mount("a").unwrap();
    let _s = arena.mount("s").unwrap();
    assert_eq!(arena.mount("d"), None);
    assert_eq!(arena.len(), 2);

    arena.unmount(a);
    assert!(arena.mount("d").is_some());
    assert_eq!(arena.len(), 2);
}

#[test]
fn unmount_discards_queued_events() {
    let config = KeyboardConfig::default();
    let cache = derived_cache(&config, &["a"]);

    let mut arena = MotionArena::new();
    let handle = arena.mount("a").unwrap();
    arena.press(handle);
    arena.unmount(handle);

    let fresh = arena.mount("a").unwrap();
    step(&mut arena, &cache, 30);
    let sample = arena.sample(fresh).unwrap();
    assert_eq!(sample.travel, 0.0, "events must die with the old mount");
}

#[test]
fn queued_events_drive_a_full_stroke() {
    let config = KeyboardConfig::default();
    let cache = derived_cache(&config, &["a", "s", "d"]);
    let total_travel = cache["a"].1.switch.total_travel;

    let mut arena = MotionArena::new();
    let a = arena.mount("a").unwrap();
    let s = arena.mount("s").unwrap();
    let d = arena.mount("d").unwrap();

    // tap queued entirely before the first frame runs
    arena.press(a);
    arena.release(a);

    let mut max_travel = 0.0f32;
    for _ in 0..300 {
        step(&mut arena, &cache, 1);
        let sample = arena.sample(a).unwrap();
        max_travel = max_travel.max(sample.travel);
        assert_eq!(arena.sample(s).unwrap().travel, 0.0);
        assert_eq!(arena.sample(d).unwrap().travel, 0.0);
    }

    assert_eq!(max_travel, total_travel, "the tap must fully bottom out");
    assert_eq!(arena.sample(a).unwrap().travel, 0.0);
}

#[test]
fn unresolved_keys_keep_their_last_sample() {
    let config = KeyboardConfig::default();
    let cache = derived_cache(&config, &["a"]);
    let empty: HashMap<String, (SwitchType, DerivedKeyParams)> = HashMap::new();

    let mut arena = MotionArena::new();
    let handle = arena.mount("a").unwrap();
    arena.press(handle);
    step(&mut arena, &cache, 10);
    let before = arena.sample(handle).unwrap();
    assert!(before.travel > 0.0);

    step(&mut arena, &empty, 10);
    assert_eq!(arena.sample(handle), Some(before));
}

#[test]
fn samples_iterates_live_keys_only() {
    let mut arena = MotionArena::new();
    let a = arena.mount("a").unwrap();
    let _s = arena.mount("s").unwrap();
    arena.unmount(a);

    let ids: Vec<&str> = arena.samples().map(|(id, _)| id).collect();
    assert_eq!(ids, vec!["s"]);
}
