// Adaptive quality governor. Watches frame cost and the scene's discrete
// counters, then steps the geometry tier up or down against the current
// tier's budget. Separate over/under thresholds plus a change cooldown keep
// borderline load from thrashing between tiers.

use serde::{Deserialize, Serialize};

use crate::config;
use crate::presets::{self, GeometryBudget};
use crate::profile_scope;

/// Ordered geometry detail levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    High,
    #[default]
    Balanced,
    Performance,
}

impl QualityTier {
    fn degraded(self) -> Option<QualityTier> {
        match self {
            QualityTier::High => Some(QualityTier::Balanced),
            QualityTier::Balanced => Some(QualityTier::Performance),
            QualityTier::Performance => None,
        }
    }

    fn upgraded(self) -> Option<QualityTier> {
        match self {
            QualityTier::Performance => Some(QualityTier::Balanced),
            QualityTier::Balanced => Some(QualityTier::High),
            QualityTier::High => None,
        }
    }

    pub fn budget(self) -> GeometryBudget {
        presets::geometry_budget(self)
    }
}

/// One frame's cost sample from the rendering runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameMetrics {
    pub cpu_frame_ms: f32,
    pub draw_calls: u32,
    pub triangles: u32,
}

/// The control loop state. One instance per process, owned by the frame
/// loop and handed in by mutable reference; it is the single writer of the
/// tier it exposes.
#[derive(Clone, Debug)]
pub struct QualityGovernor {
    tier: QualityTier,
    sample_frames: u32,
    cpu_frame_ms_accum: f32,
    clock: f32,
    last_switch_time: f32,
}

impl QualityGovernor {
    pub fn new(tier: QualityTier) -> Self {
        Self {
            tier,
            sample_frames: 0,
            cpu_frame_ms_accum: 0.0,
            clock: 0.0,
            last_switch_time: 0.0,
        }
    }

    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    /// Current tier's budget row; derivation callers read subdivision
    /// counts from here.
    pub fn budget(&self) -> GeometryBudget {
        self.tier.budget()
    }

    fn reset_window(&mut self) {
        self.sample_frames = 0;
        self.cpu_frame_ms_accum = 0.0;
    }

    /// Accumulates one frame and evaluates the window when it is full.
    /// Returns the new tier when a transition happened this frame.
    pub fn update(&mut self, dt: f32, metrics: FrameMetrics) -> Option<QualityTier> {
        profile_scope!("governor_update");

        self.clock += dt;
        self.sample_frames += 1;
        self.cpu_frame_ms_accum += metrics.cpu_frame_ms;

        if self.sample_frames < config::QUALITY_SAMPLE_WINDOW {
            return None;
        }

        if self.clock - self.last_switch_time < config::QUALITY_COOLDOWN_SECS {
            self.reset_window();
            return None;
        }

        let budget = self.tier.budget();
        let avg_cpu_frame_ms = self.cpu_frame_ms_accum / self.sample_frames as f32;

        let over_budget = avg_cpu_frame_ms
            > budget.cpu_frame_budget_ms * config::OVER_BUDGET_RATIO
            || metrics.draw_calls > budget.max_draw_calls
            || metrics.triangles > budget.max_triangles;

        let under_budget = avg_cpu_frame_ms
            < budget.cpu_frame_budget_ms * config::UNDER_BUDGET_CPU_RATIO
            && (metrics.draw_calls as f32)
                < budget.max_draw_calls as f32 * config::UNDER_BUDGET_COUNTER_RATIO
            && (metrics.triangles as f32)
                < budget.max_triangles as f32 * config::UNDER_BUDGET_COUNTER_RATIO;

        let next = if over_budget {
            self.tier.degraded()
        } else if under_budget {
            self.tier.upgraded()
        } else {
            None
        };

        let changed = next.map(|next_tier| {
            tracing::info!(
                from = ?self.tier,
                to = ?next_tier,
                avg_cpu_frame_ms,
                draw_calls = metrics.draw_calls,
                triangles = metrics.triangles,
                "quality tier change"
            );
            self.tier = next_tier;
            self.last_switch_time = self.clock;
            next_tier
        });

        self.reset_window();
        changed
    }
}

impl Default for QualityGovernor {
    fn default() -> Self {
        Self::new(QualityTier::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.05;

    fn run_frames(governor: &mut QualityGovernor, frames: u32, metrics: FrameMetrics) -> u32 {
        let mut changes = 0;
        for _ in 0..frames {
            if governor.update(DT, metrics).is_some() {
                changes += 1;
            }
        }
        changes
    }

    fn heavy() -> FrameMetrics {
        FrameMetrics {
            cpu_frame_ms: 20.0,
            draw_calls: 900,
            triangles: 1_200_000,
        }
    }

    fn light() -> FrameMetrics {
        FrameMetrics {
            cpu_frame_ms: 0.5,
            draw_calls: 40,
            triangles: 30_000,
        }
    }

    #[test]
    fn degrades_one_tier_per_window_under_load() {
        let mut governor = QualityGovernor::new(QualityTier::High);
        let changes = run_frames(&mut governor, 36, heavy());
        assert_eq!(changes, 1);
        assert_eq!(governor.tier(), QualityTier::Balanced);

        // the next full window steps down once more
        let changes = run_frames(&mut governor, 36, heavy());
        assert_eq!(changes, 1);
        assert_eq!(governor.tier(), QualityTier::Performance);
    }

    #[test]
    fn reaches_the_floor_and_stays_there() {
        let mut governor = QualityGovernor::new(QualityTier::High);
        run_frames(&mut governor, 400, heavy());
        assert_eq!(governor.tier(), QualityTier::Performance);

        let changes = run_frames(&mut governor, 400, heavy());
        assert_eq!(changes, 0, "floor tier must hold under load");
    }

    #[test]
    fn upgrades_when_comfortably_under_budget() {
        let mut governor = QualityGovernor::new(QualityTier::Performance);
        run_frames(&mut governor, 400, light());
        assert_eq!(governor.tier(), QualityTier::High);
    }

    #[test]
    fn holds_between_the_thresholds() {
        let mut governor = QualityGovernor::new(QualityTier::Balanced);
        let budget = governor.budget();
        // above the upgrade band, below the degrade band
        let steady = FrameMetrics {
            cpu_frame_ms: budget.cpu_frame_budget_ms * 0.9,
            draw_calls: (budget.max_draw_calls as f32 * 0.8) as u32,
            triangles: (budget.max_triangles as f32 * 0.8) as u32,
        };
        let changes = run_frames(&mut governor, 400, steady);
        assert_eq!(changes, 0);
        assert_eq!(governor.tier(), QualityTier::Balanced);
    }

    #[test]
    fn no_evaluation_before_the_window_fills() {
        let mut governor = QualityGovernor::new(QualityTier::High);
        let changes = run_frames(&mut governor, config::QUALITY_SAMPLE_WINDOW - 1, heavy());
        assert_eq!(changes, 0);
        assert_eq!(governor.tier(), QualityTier::High);
    }

    #[test]
    fn boundary_oscillation_changes_at_most_once_per_cooldown() {
        let mut governor = QualityGovernor::new(QualityTier::Balanced);
        let mut changes = 0;
        let mut elapsed = 0.0f32;
        let mut change_times = Vec::new();

        for frame in 0..2000 {
            // alternate windows of just-over and just-under load
            let metrics = if (frame / 36) % 2 == 0 { heavy() } else { light() };
            if governor.update(DT, metrics).is_some() {
                changes += 1;
                change_times.push(elapsed);
            }
            elapsed += DT;
        }

        assert!(changes > 0, "oscillating load should move the tier");
        for pair in change_times.windows(2) {
            assert!(
                pair[1] - pair[0] >= config::QUALITY_COOLDOWN_SECS - 1.0e-3,
                "changes at {:?} violate the cooldown",
                pair
            );
        }
    }

    #[test]
    fn budgets_tighten_as_tiers_descend() {
        let high = QualityTier::High.budget();
        let balanced = QualityTier::Balanced.budget();
        let performance = QualityTier::Performance.budget();

        assert!(high.keycap_top_segments_x > balanced.keycap_top_segments_x);
        assert!(balanced.keycap_top_segments_x > performance.keycap_top_segments_x);
        assert!(high.max_triangles > balanced.max_triangles);
        assert!(balanced.max_triangles > performance.max_triangles);
        assert!(high.cpu_frame_budget_ms > balanced.cpu_frame_budget_ms);
        assert!(balanced.cpu_frame_budget_ms > performance.cpu_frame_budget_ms);
    }
}
