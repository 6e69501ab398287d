// Per-key motion state machine. Travel is the only driven quantity; tilt
// and lateral jitter are subordinate reads smoothed toward targets each
// tick. A bounded step size keeps the machine stable under any event
// sequence, and sanitation at both ends of the update keeps one bad input
// from corrupting a key's record permanently.

use serde::{Deserialize, Serialize};

use crate::config::SwitchType;
use crate::derive::{AnimationParams, DerivedKeyParams, SwitchParams};
use crate::presets::{self, MotionTuning};
use crate::utils::{clamp, key_seed, sanitize};

/// Motion phases of one key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPhase {
    /// At rest, travel zero.
    #[default]
    Rest,
    /// Down-stroke in progress.
    Pressing,
    /// Held at full travel.
    Bottomed,
    /// Rebound toward rest.
    Releasing,
}

/// Pose sample handed to the scene each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyMotionSample {
    /// Displacement from rest in meters.
    pub travel: f32,
    /// Travel over total travel, 0..=1.
    pub press_ratio: f32,
    /// Pitch in radians.
    pub tilt_x: f32,
    /// Roll in radians.
    pub tilt_z: f32,
    /// Stabilizer wobble offset in meters.
    pub lateral_jitter: f32,
    pub phase: MotionPhase,
}

/// Per-step view of the derived parameters one key's update consumes.
/// Borrows from the derivation cache; nothing here is stored between ticks.
#[derive(Clone, Copy, Debug)]
pub struct MotionInput<'a> {
    pub switch_type: SwitchType,
    pub switch: &'a SwitchParams,
    pub animation: &'a AnimationParams,
    /// Keycap profile resting angle in radians.
    pub profile_angle: f32,
    /// Wobble allowance from the mount derivation.
    pub jitter_limit: f32,
}

impl<'a> MotionInput<'a> {
    pub fn from_derived(switch_type: SwitchType, derived: &'a DerivedKeyParams) -> Self {
        Self {
            switch_type,
            switch: &derived.switch,
            animation: &derived.animation,
            profile_angle: derived.keycap.profile_angle,
            jitter_limit: derived.mount.lateral_jitter_limit,
        }
    }
}

struct LinearSpeeds {
    down: f32,
    up: f32,
}

/// Stroke speeds from spring stiffness and bump strength. Stiffer springs
/// shorten both stroke durations; a stronger bump lengthens the down-stroke.
fn linear_speeds(tuning: &MotionTuning, switch: &SwitchParams, travel_limit: f32) -> LinearSpeeds {
    let stiffness_ratio = clamp(switch.spring_stiffness / 220.0, 0.72, 1.45);
    let bump_ratio = clamp(switch.bump_strength, 0.0, 1.0);

    let down_duration = clamp(
        0.05 - (stiffness_ratio - 1.0) * 0.012 + bump_ratio * 0.007,
        0.028,
        0.062,
    );
    let up_duration = clamp(0.043 - (stiffness_ratio - 1.0) * 0.01, 0.024, 0.056);

    LinearSpeeds {
        down: clamp(
            travel_limit / down_duration,
            tuning.min_linear_speed,
            tuning.max_linear_speed,
        ),
        up: clamp(
            travel_limit / up_duration,
            tuning.min_linear_speed,
            tuning.max_linear_speed,
        ),
    }
}

/// One key's complete motion record.
#[derive(Clone, Debug)]
pub struct KeyMotionState {
    pressed: bool,
    phase: MotionPhase,
    queued_release: bool,
    travel: f32,
    velocity: f32,
    tilt_x: f32,
    tilt_z: f32,
    lateral_jitter: f32,
    clock: f32,
    seed: f32,
}

impl KeyMotionState {
    pub fn new(key_id: &str) -> Self {
        Self {
            pressed: false,
            phase: MotionPhase::Rest,
            queued_release: false,
            travel: 0.0,
            velocity: 0.0,
            tilt_x: 0.0,
            tilt_z: 0.0,
            lateral_jitter: 0.0,
            clock: 0.0,
            seed: key_seed(key_id),
        }
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    pub fn pressed(&self) -> bool {
        self.pressed
    }

    pub fn travel(&self) -> f32 {
        self.travel
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Applies a press or release event. A release while still pressing is
    /// queued instead of dropped so a fast tap still plays a full
    /// down-then-up stroke; a press while rebounding turns the key around
    /// without reaching rest first.
    pub fn set_pressed(&mut self, pressed: bool) {
        if self.pressed == pressed {
            return;
        }

        self.pressed = pressed;

        if pressed {
            self.queued_release = false;
            if matches!(self.phase, MotionPhase::Rest | MotionPhase::Releasing) {
                self.phase = MotionPhase::Pressing;
            }
            return;
        }

        match self.phase {
            MotionPhase::Pressing => self.queued_release = true,
            MotionPhase::Bottomed => self.phase = MotionPhase::Releasing,
            MotionPhase::Releasing | MotionPhase::Rest => {}
        }
    }

    fn sanitize_fields(&mut self) {
        self.travel = sanitize(self.travel);
        self.velocity = sanitize(self.velocity);
        self.tilt_x = sanitize(self.tilt_x);
        self.tilt_z = sanitize(self.tilt_z);
        self.lateral_jitter = sanitize(self.lateral_jitter);
        self.clock = sanitize(self.clock);
    }

    /// Advances the key by one tick under the process-wide tuning.
    pub fn update(&mut self, dt: f32, input: &MotionInput) -> KeyMotionSample {
        let tuning = presets::motion_tuning();
        self.update_with(&tuning, dt, input)
    }

    /// Advances the key by one tick under an explicit tuning preset.
    pub fn update_with(
        &mut self,
        tuning: &MotionTuning,
        dt: f32,
        input: &MotionInput,
    ) -> KeyMotionSample {
        let dt = dt.min(tuning.max_tick_dt);
        let travel_limit = input.switch.total_travel.max(1.0e-4);
        let previous_travel = self.travel;

        self.clock += dt;
        self.sanitize_fields();

        // Events can land between ticks; normalize the phase first.
        if self.pressed && matches!(self.phase, MotionPhase::Rest | MotionPhase::Releasing) {
            self.phase = MotionPhase::Pressing;
            self.queued_release = false;
        }
        if !self.pressed && self.phase == MotionPhase::Bottomed {
            self.phase = MotionPhase::Releasing;
        }

        let speeds = linear_speeds(tuning, input.switch, travel_limit);

        match self.phase {
            MotionPhase::Pressing => {
                let mut step = speeds.down * dt;

                if matches!(input.switch_type, SwitchType::Tactile | SwitchType::Clicky)
                    && input.switch.bump_strength > 0.0
                {
                    let distance = (self.travel - input.switch.bump_center).abs();
                    if distance < input.switch.bump_width {
                        let bump_ratio = 1.0 - distance / input.switch.bump_width.max(1.0e-4);
                        step *= 1.0 - bump_ratio * clamp(input.switch.bump_strength, 0.0, 1.0) * 0.4;
                    }
                }

                self.travel += step;

                if self.travel >= travel_limit {
                    self.travel = travel_limit;
                    if self.queued_release || !self.pressed {
                        self.phase = MotionPhase::Releasing;
                        self.queued_release = false;
                    } else {
                        self.phase = MotionPhase::Bottomed;
                    }
                }
            }
            MotionPhase::Releasing => {
                let mut step = speeds.up * dt;
                // spring overshoot recovery off the bottom
                if self.travel > travel_limit * 0.8 {
                    step *= 1.14;
                }
                self.travel -= step;

                if self.travel <= 0.0 {
                    self.travel = 0.0;
                    self.queued_release = false;
                    self.phase = if self.pressed {
                        MotionPhase::Pressing
                    } else {
                        MotionPhase::Rest
                    };
                }
            }
            MotionPhase::Bottomed => self.travel = travel_limit,
            MotionPhase::Rest => self.travel = 0.0,
        }

        self.travel = clamp(self.travel, 0.0, travel_limit);
        self.velocity = (self.travel - previous_travel) / dt.max(1.0e-4);

        let press_ratio = clamp(self.travel / travel_limit, 0.0, 1.0);

        let jitter_target = if input.switch.stabilizer_amplitude > 0.0
            && self.phase != MotionPhase::Rest
        {
            (self.clock * (24.0 + self.seed * 6.0) + self.seed * 4.4).sin()
                * input.switch.stabilizer_amplitude
                * 0.22
                * (0.35 + press_ratio * 0.65)
        } else {
            0.0
        };

        let jitter_rate = if self.phase == MotionPhase::Releasing {
            28.0
        } else {
            18.0
        };
        self.lateral_jitter += (jitter_target - self.lateral_jitter) * (dt * jitter_rate).min(1.0);
        // wobble stays inside the clearance the mount derivation allows
        self.lateral_jitter = clamp(self.lateral_jitter, -input.jitter_limit, input.jitter_limit);

        // Tilt is a cosmetic follower of the travel state, never a driver.
        let base_tilt_x = input.animation.row_curve_bias - input.profile_angle * 0.08;
        let press_tilt_x = -press_ratio * (input.animation.press_tilt_factor * 0.26).min(0.018);
        let impulse_tilt_x = match self.phase {
            MotionPhase::Pressing => -0.004 * (0.4 + self.seed * 0.6) * (1.0 - press_ratio),
            MotionPhase::Releasing => 0.003 * (0.2 + self.seed * 0.5) * (1.0 - press_ratio),
            _ => 0.0,
        };

        let target_tilt_x = base_tilt_x + press_tilt_x + impulse_tilt_x;
        let target_tilt_z = self.lateral_jitter * (input.animation.jitter_tilt_factor * 0.08).min(18.0);

        self.tilt_x += (target_tilt_x - self.tilt_x) * (dt * 18.0).min(1.0);
        self.tilt_z += (target_tilt_z - self.tilt_z) * (dt * 16.0).min(1.0);

        self.tilt_x = clamp(self.tilt_x, -tuning.max_tilt_x, tuning.max_tilt_x);
        self.tilt_z = clamp(self.tilt_z, -tuning.max_tilt_z, tuning.max_tilt_z);

        if !self.pressed && self.phase == MotionPhase::Rest {
            let rest_tilt_x = input.animation.row_curve_bias - input.profile_angle * 0.08;
            self.tilt_x += (rest_tilt_x - self.tilt_x) * (dt * 22.0).min(1.0);
            if self.lateral_jitter.abs() <= input.animation.travel_epsilon {
                self.lateral_jitter = 0.0;
            }
            if self.tilt_z.abs() <= input.animation.travel_epsilon {
                self.tilt_z = 0.0;
            }
        }

        self.sanitize_fields();

        KeyMotionSample {
            travel: self.travel,
            press_ratio,
            tilt_x: self.tilt_x,
            tilt_z: self.tilt_z,
            lateral_jitter: self.lateral_jitter,
            phase: self.phase,
        }
    }
}
