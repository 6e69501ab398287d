// diagnostics.rs
// Structural self-check over a fixed sample of representative keys.
// Development-time regression gate: derivation problems surface here as
// itemized issues, never as runtime failures in the frame loop.

use serde::Serialize;

use crate::config::KeyboardConfig;
use crate::derive;
use crate::governor::QualityTier;
use crate::layout::{KeyContext, KeycapZone};
use crate::presets::{self, MotionTuning};

/// Safe band for the derived wobble allowance, in meters. Anything above
/// this reads as visual drift or mesh interpenetration.
const JITTER_LIMIT_SAFE_CEILING: f32 = 0.0003;

/// Padding between the case inner floor and the lowest keycap position.
const CASE_FLOOR_PADDING: f32 = 0.0002;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    NonFiniteValue,
    SwitchHousingOrderInvalid,
    TravelNonPositive,
    SocketStemInterference,
    JitterLimitOutOfRange,
    CaseTravelLimitInvalid,
}

#[derive(Clone, Debug, Serialize)]
pub struct ValidationIssue {
    pub code: IssueCode,
    pub key_id: String,
    pub message: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ValidationReport {
    pub passed: bool,
    pub checked_keys: usize,
    pub issues: Vec<ValidationIssue>,
}

struct SampleKey {
    id: &'static str,
    zone: KeycapZone,
    row: u32,
    width: f32,
    depth: f32,
}

/// One key per structurally distinct class: a function-row key, a plain
/// alpha, a wide stabilized modifier, and the space bar.
const SAMPLE_KEYS: [SampleKey; 4] = [
    SampleKey {
        id: "esc",
        zone: KeycapZone::Function,
        row: 0,
        width: 1.0,
        depth: 1.0,
    },
    SampleKey {
        id: "q",
        zone: KeycapZone::Alpha,
        row: 2,
        width: 1.0,
        depth: 1.0,
    },
    SampleKey {
        id: "enter",
        zone: KeycapZone::Modifier,
        row: 3,
        width: 2.25,
        depth: 1.0,
    },
    SampleKey {
        id: "space",
        zone: KeycapZone::Space,
        row: 5,
        width: 6.25,
        depth: 1.0,
    },
];

/// Runs the self-check under the process-wide motion tuning.
pub fn run_self_check(config: &KeyboardConfig) -> ValidationReport {
    let tuning = presets::motion_tuning();
    run_self_check_with(config, &tuning)
}

/// Runs the self-check under an explicit tuning preset, so candidate travel
/// and jitter bands can be vetted before being installed.
pub fn run_self_check_with(config: &KeyboardConfig, tuning: &MotionTuning) -> ValidationReport {
    let mut issues = Vec::new();

    for sample in &SAMPLE_KEYS {
        let key = KeyContext {
            zone: sample.zone,
            ..KeyContext::new(sample.id, sample.row, sample.width, sample.depth)
        };
        let derived = derive::derive_with(tuning, config, &key, QualityTier::Balanced);

        let checked = [
            derived.keycap.key_height,
            derived.keycap.top_dish_depth,
            derived.switch.total_travel,
            derived.switch.top_y,
            derived.switch.bottom_y,
            derived.switch.stem_base_y,
            derived.mount.socket_depth,
            derived.mount.socket_cross_slot,
            derived.structure.stem_cross_slot,
            derived.mount.lateral_jitter_limit,
        ];

        if !checked.iter().all(|value| value.is_finite()) {
            issues.push(ValidationIssue {
                code: IssueCode::NonFiniteValue,
                key_id: sample.id.to_string(),
                message: "derived parameters contain NaN or infinity".to_string(),
            });
        }

        if derived.switch.bottom_y >= derived.switch.top_y {
            issues.push(ValidationIssue {
                code: IssueCode::SwitchHousingOrderInvalid,
                key_id: sample.id.to_string(),
                message: "bottom housing reference is not below the top housing".to_string(),
            });
        }

        if derived.switch.total_travel <= 0.0 {
            issues.push(ValidationIssue {
                code: IssueCode::TravelNonPositive,
                key_id: sample.id.to_string(),
                message: "switch travel is not positive, the key cannot stroke".to_string(),
            });
        }

        if derived.mount.socket_cross_slot <= derived.structure.stem_cross_slot {
            issues.push(ValidationIssue {
                code: IssueCode::SocketStemInterference,
                key_id: sample.id.to_string(),
                message: "keycap socket slot does not clear the stem cross slot".to_string(),
            });
        }

        if derived.mount.lateral_jitter_limit < 0.0
            || derived.mount.lateral_jitter_limit > JITTER_LIMIT_SAFE_CEILING
        {
            issues.push(ValidationIssue {
                code: IssueCode::JitterLimitOutOfRange,
                key_id: sample.id.to_string(),
                message: "wobble allowance is outside the safe band".to_string(),
            });
        }

        let case_travel_limit = -(derived.assembly.case_inner_floor_y + CASE_FLOOR_PADDING)
            - derived.keycap.key_height * 0.5;
        if case_travel_limit <= 0.0 {
            issues.push(ValidationIssue {
                code: IssueCode::CaseTravelLimitInvalid,
                key_id: sample.id.to_string(),
                message: "case interior leaves no room for the down-stroke".to_string(),
            });
        }
    }

    ValidationReport {
        passed: issues.is_empty(),
        checked_keys: SAMPLE_KEYS.len(),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_passes() {
        let report = run_self_check(&KeyboardConfig::default());
        assert!(report.passed, "unexpected issues: {:?}", report.issues);
        assert_eq!(report.checked_keys, 4);
    }

    #[test]
    fn oversized_jitter_band_is_flagged() {
        let tuning = MotionTuning {
            jitter_limit_floor: 0.0005,
            jitter_limit_ceiling: 0.0008,
            ..MotionTuning::default()
        };

        let report = run_self_check_with(&KeyboardConfig::default(), &tuning);
        assert!(!report.passed);
        assert!(report
            .issues
            .iter()
            .all(|issue| issue.code == IssueCode::JitterLimitOutOfRange));
        assert_eq!(report.issues.len(), 4, "every sample key exceeds the band");
    }

    #[test]
    fn collapsed_travel_band_is_flagged() {
        let tuning = MotionTuning {
            travel_floor: 0.0,
            travel_ceiling: 0.0,
            ..MotionTuning::default()
        };

        let report = run_self_check_with(&KeyboardConfig::default(), &tuning);
        assert!(!report.passed);
        assert!(!report.issues.is_empty());
        assert!(report
            .issues
            .iter()
            .all(|issue| issue.code == IssueCode::TravelNonPositive));
    }

    #[test]
    fn report_serializes_for_logging() {
        let report = run_self_check(&KeyboardConfig::default());
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"passed\":true"));
    }
}
