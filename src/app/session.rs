// app/session.rs
// Headless demo session: a scripted typist feeds key events through the
// motion arena while the governor watches a synthetic render-load report,
// and every applied event fires a synthesis voice. An interactive shell
// would drive the same surfaces; here a fixed-length script does.

use std::collections::{HashMap, VecDeque};

use crossbeam::channel::{Receiver, TryRecvError};

use crate::acoustics;
use crate::app::typing::KeyEvent;
use crate::config::{KeyboardConfig, SwitchType};
use crate::derive::{self, DerivedKeyParams};
use crate::governor::{FrameMetrics, QualityGovernor, QualityTier};
use crate::layout::{self, KeyContext};
use crate::motion::{KeyHandle, MotionArena, MotionInput, MotionPhase};
use crate::profile_scope;

// Synthetic render-load model standing in for a real frame report. Keycap
// triangle counts follow the active tier's segment budget, so degrading
// actually lowers the reported load.
const CASE_DRAW_CALLS: u32 = 9;
const CASE_TRIANGLES: u32 = 24_000;
const KEY_SIDE_TRIANGLES: u32 = 180;
const TRIANGLES_PER_MS: f32 = 22_000.0;
const DRAW_CALL_MS: f32 = 0.015;
const MOVING_KEY_MS: f32 = 0.28;
/// Slow ambient swell so the load report is never flat.
const LOAD_SWELL_RATE: f32 = 0.35;
const LOAD_JITTER_MS: f32 = 0.25;

pub struct Session {
    config: KeyboardConfig,
    governor: QualityGovernor,
    arena: MotionArena,
    board: HashMap<String, KeyContext>,
    handles: HashMap<String, KeyHandle>,
    derived: HashMap<String, (SwitchType, DerivedKeyParams)>,
    /// Configuration generation and tier the cache was built against.
    derived_stamp: (u64, QualityTier),
    pending: VecDeque<KeyEvent>,
    /// Requests raised by this tick's events, voiced once the frame settles.
    voice_queue: Vec<acoustics::VoiceRequest>,
    clock: f32,
    frames: u64,
    strokes: u64,
    voices: u64,
    script_done: bool,
    rng: fastrand::Rng,
}

impl Session {
    pub fn new(config: KeyboardConfig, start_tier: QualityTier, seed: u64) -> Self {
        let board = layout::sixty_percent_board()
            .iter()
            .map(|def| (def.id.clone(), KeyContext::from_definition(def)))
            .collect();

        Self {
            derived_stamp: (config.generation, start_tier),
            config,
            governor: QualityGovernor::new(start_tier),
            arena: MotionArena::new(),
            board,
            handles: HashMap::new(),
            derived: HashMap::new(),
            pending: VecDeque::new(),
            voice_queue: Vec::new(),
            clock: 0.0,
            frames: 0,
            strokes: 0,
            voices: 0,
            script_done: false,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn config(&self) -> &KeyboardConfig {
        &self.config
    }

    pub fn tier(&self) -> QualityTier {
        self.governor.tier()
    }

    /// Runs the session to its end time at a fixed tick rate.
    pub fn run(&mut self, events: &Receiver<KeyEvent>, frame_rate: f32, duration_secs: f32) {
        let dt = 1.0 / frame_rate.max(1.0);
        tracing::info!(
            keys = self.board.len(),
            tier = ?self.governor.tier(),
            frame_rate,
            duration_secs,
            "session start"
        );

        while self.clock < duration_secs {
            self.tick(dt, events);

            #[cfg(feature = "profiling")]
            if self.frames % 240 == 0 {
                crate::PROFILER.lock().log_and_clear();
            }
        }

        let in_motion = self
            .arena
            .samples()
            .filter(|(_, sample)| sample.phase != MotionPhase::Rest)
            .count();
        tracing::info!(
            frames = self.frames,
            strokes = self.strokes,
            voices = self.voices,
            mounted = self.arena.len(),
            final_tier = ?self.governor.tier(),
            keys_in_motion = in_motion,
            "session complete"
        );
    }

    /// One fixed-dt frame: apply due input, step the arena, report load.
    pub fn tick(&mut self, dt: f32, events: &Receiver<KeyEvent>) {
        profile_scope!("session_tick");
        self.clock += dt;
        self.frames += 1;

        self.drain_events(events);
        self.apply_due_events();

        self.refresh_derived();

        {
            profile_scope!("arena_step");
            let derived = &self.derived;
            self.arena.step_frame(dt, |key| {
                derived
                    .get(key)
                    .map(|(switch_type, params)| MotionInput::from_derived(*switch_type, params))
            });
        }

        let metrics = self.sample_render_load();
        self.governor.update(dt, metrics);

        for request in std::mem::take(&mut self.voice_queue) {
            let plan = acoustics::voice_plan(&request);
            self.voices += 1;
            tracing::debug!(
                voice = plan.voice,
                key = request.key.as_str(),
                downstroke = request.downstroke,
                base_hz = request.profile.base_frequency,
                decay_s = request.profile.decay,
                "voice queued"
            );
        }
    }

    fn drain_events(&mut self, events: &Receiver<KeyEvent>) {
        loop {
            match events.try_recv() {
                Ok(event) => self.pending.push_back(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.script_done {
                        self.script_done = true;
                        tracing::debug!("typing script finished");
                    }
                    break;
                }
            }
        }
    }

    fn apply_due_events(&mut self) {
        while self
            .pending
            .front()
            .map_or(false, |event| event.at <= self.clock)
        {
            let Some(event) = self.pending.pop_front() else {
                break;
            };
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: KeyEvent) {
        if !self.board.contains_key(event.key) {
            tracing::warn!(key = event.key, "event for a key not on the board");
            return;
        }

        let handle = match self.handles.get(event.key) {
            Some(handle) => *handle,
            None => {
                // The arena logs when it is full; the key just stays still.
                let Some(handle) = self.arena.mount(event.key) else {
                    return;
                };
                self.handles.insert(event.key.to_string(), handle);
                handle
            }
        };
        self.ensure_derived(event.key);

        let request = if event.pressed {
            self.arena.press(handle);
            self.strokes += 1;
            acoustics::press_voice(&self.config, event.key)
        } else {
            self.arena.release(handle);
            acoustics::release_voice(&self.config, event.key)
        };
        self.voice_queue.push(request);
    }

    /// Clears the derived cache when the configuration or tier it was built
    /// against changes, then rebuilds entries for every mounted key so
    /// mid-stroke keys never stall on a cache miss.
    fn refresh_derived(&mut self) {
        let stamp = (self.config.generation, self.governor.tier());
        if stamp != self.derived_stamp {
            self.derived.clear();
            self.derived_stamp = stamp;
        }

        if self.derived.len() < self.handles.len() {
            let missing: Vec<String> = self
                .handles
                .keys()
                .filter(|id| !self.derived.contains_key(*id))
                .cloned()
                .collect();
            for id in missing {
                self.ensure_derived(&id);
            }
        }
    }

    fn ensure_derived(&mut self, key_id: &str) {
        if self.derived.contains_key(key_id) {
            return;
        }
        let Some(context) = self.board.get(key_id) else {
            return;
        };
        let params = derive::derive(&self.config, context, self.governor.tier());
        self.derived
            .insert(key_id.to_string(), (self.config.switches.switch_type, params));
    }

    fn sample_render_load(&mut self) -> FrameMetrics {
        let budget = self.governor.budget();
        let mounted = self.arena.len() as u32;
        let moving = self
            .arena
            .samples()
            .filter(|(_, sample)| sample.phase != MotionPhase::Rest)
            .count() as u32;

        let draw_calls = mounted + CASE_DRAW_CALLS;
        let per_key =
            budget.keycap_top_segments_x * budget.keycap_top_segments_z * 2 + KEY_SIDE_TRIANGLES;
        let triangles = mounted * per_key + CASE_TRIANGLES;

        let swell = 1.0 + 0.5 * (self.clock * LOAD_SWELL_RATE).sin().max(0.0);
        let cpu_frame_ms = (triangles as f32 / TRIANGLES_PER_MS
            + draw_calls as f32 * DRAW_CALL_MS
            + moving as f32 * MOVING_KEY_MS)
            * swell
            + self.rng.f32() * LOAD_JITTER_MS;

        FrameMetrics {
            cpu_frame_ms,
            draw_calls,
            triangles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel;

    const DT: f32 = 1.0 / 120.0;

    fn session() -> Session {
        Session::new(KeyboardConfig::default(), QualityTier::Balanced, 5)
    }

    #[test]
    fn a_scripted_tap_plays_out_and_settles() {
        let (tx, rx) = channel::unbounded();
        tx.send(KeyEvent {
            key: "q",
            pressed: true,
            at: 0.05,
        })
        .unwrap();
        tx.send(KeyEvent {
            key: "q",
            pressed: false,
            at: 0.3,
        })
        .unwrap();
        drop(tx);

        let mut session = session();
        session.run(&rx, 120.0, 1.0);

        assert_eq!(session.strokes, 1);
        assert_eq!(session.voices, 2);
        assert_eq!(session.arena.len(), 1);

        // 0.7 s after release is far longer than any stroke takes.
        let (_, sample) = session.arena.samples().next().unwrap();
        assert_eq!(sample.phase, MotionPhase::Rest);
        assert_eq!(sample.travel, 0.0);
    }

    #[test]
    fn events_for_keys_off_the_board_are_dropped() {
        let (tx, rx) = channel::unbounded();
        tx.send(KeyEvent {
            key: "num7",
            pressed: true,
            at: 0.0,
        })
        .unwrap();
        drop(tx);

        let mut session = session();
        for _ in 0..4 {
            session.tick(DT, &rx);
        }

        assert_eq!(session.arena.len(), 0);
        assert_eq!(session.voices, 0);
    }

    #[test]
    fn events_wait_for_their_timestamp() {
        let (tx, rx) = channel::unbounded();
        tx.send(KeyEvent {
            key: "a",
            pressed: true,
            at: 0.5,
        })
        .unwrap();

        let mut session = session();
        // 12 frames at 120 fps is 0.1 s, well short of the stamp.
        for _ in 0..12 {
            session.tick(DT, &rx);
        }
        assert_eq!(session.strokes, 0);
        assert_eq!(session.pending.len(), 1);

        for _ in 0..60 {
            session.tick(DT, &rx);
        }
        assert_eq!(session.strokes, 1);
        assert!(session.pending.is_empty());
    }

    #[test]
    fn cache_rebuilds_after_a_config_edit_or_tier_change() {
        let (_tx, rx) = channel::unbounded::<KeyEvent>();
        let mut session = session();
        session.ensure_derived("q");
        assert_eq!(session.derived.len(), 1);

        session.config.generation += 1;
        session.tick(DT, &rx);
        assert!(session.derived.is_empty());

        // A mounted key is re-derived in the same frame the cache clears.
        let (tx, rx) = channel::unbounded();
        tx.send(KeyEvent {
            key: "w",
            pressed: true,
            at: 0.0,
        })
        .unwrap();
        session.tick(DT, &rx);
        assert!(session.derived.contains_key("w"));

        session.governor = QualityGovernor::new(QualityTier::Performance);
        session.tick(DT, &rx);
        assert_eq!(
            session.derived_stamp,
            (session.config.generation, QualityTier::Performance)
        );
        assert!(session.derived.contains_key("w"));
        assert_eq!(
            session.derived["w"].1.quality,
            QualityTier::Performance
        );
    }

    #[test]
    fn reported_triangles_follow_the_tier_budget() {
        let press = KeyEvent {
            key: "e",
            pressed: true,
            at: 0.0,
        };

        let mut high = Session::new(KeyboardConfig::default(), QualityTier::High, 5);
        let (tx, rx) = channel::unbounded();
        tx.send(press).unwrap();
        high.tick(DT, &rx);
        let high_metrics = high.sample_render_load();

        let mut perf = Session::new(KeyboardConfig::default(), QualityTier::Performance, 5);
        let (tx, rx) = channel::unbounded();
        tx.send(press).unwrap();
        perf.tick(DT, &rx);
        let perf_metrics = perf.sample_render_load();

        assert_eq!(high_metrics.draw_calls, perf_metrics.draw_calls);
        assert!(high_metrics.triangles > perf_metrics.triangles);
    }
}
