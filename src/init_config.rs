// init_config.rs
// Handles loading and parsing the headless session setup from session.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::governor::QualityTier;

/// Fallback text for the scripted typist when `[typing] script` is omitted.
pub const DEFAULT_SCRIPT: &str = "the quick brown fox jumps over the lazy dog 1980";

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct InitConfig {
    pub session: Option<SessionConfig>,
    pub typing: Option<TypingConfig>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Optional tick rate in frames per second. Falls back to the default when omitted.
    pub frame_rate: Option<f32>,
    /// Optional session length in seconds. Falls back to the default when omitted.
    pub duration_secs: Option<f32>,
    /// Optional starting quality tier: "high", "balanced" or "performance".
    pub start_tier: Option<String>,
    /// Optional seed for the synthetic frame metrics and typing cadence.
    pub rng_seed: Option<u64>,
    /// Optional configuration snapshot to load at startup.
    pub config_path: Option<String>,
    /// Optional path the final configuration snapshot is saved to.
    pub snapshot_path: Option<String>,
}

impl SessionConfig {
    /// Return the tick rate and session length, using the global defaults
    /// when values are not provided.
    pub fn timing(&self) -> (f32, f32) {
        (
            self.frame_rate.unwrap_or(crate::config::DEFAULT_FRAME_RATE),
            self.duration_secs.unwrap_or(crate::config::DEFAULT_SESSION_SECS),
        )
    }

    pub fn rng_seed(&self) -> u64 {
        self.rng_seed.unwrap_or(crate::config::DEFAULT_SESSION_SEED)
    }

    pub fn start_tier(&self) -> Result<QualityTier> {
        match self.start_tier.as_deref() {
            None => Ok(QualityTier::default()),
            Some("high") => Ok(QualityTier::High),
            Some("balanced") => Ok(QualityTier::Balanced),
            Some("performance") => Ok(QualityTier::Performance),
            Some(other) => Err(Error::UnknownChoice {
                field: "session.start_tier",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct TypingConfig {
    /// Optional text for the scripted typist.
    pub script: Option<String>,
    /// Optional mean typing speed in words per minute.
    pub words_per_minute: Option<f32>,
    /// Optional spread of the per-keystroke interval, as a fraction of the mean.
    pub cadence_jitter: Option<f32>,
    /// Optional key hold time in seconds.
    pub hold_secs: Option<f32>,
}

impl TypingConfig {
    pub fn script(&self) -> &str {
        self.script.as_deref().unwrap_or(DEFAULT_SCRIPT)
    }

    pub fn words_per_minute(&self) -> f32 {
        self.words_per_minute.unwrap_or(crate::config::DEFAULT_TYPING_WPM)
    }

    pub fn cadence_jitter(&self) -> f32 {
        self.cadence_jitter.unwrap_or(crate::config::TYPING_CADENCE_JITTER)
    }

    pub fn hold_secs(&self) -> f32 {
        self.hold_secs.unwrap_or(crate::config::TYPING_HOLD_SECS)
    }
}

impl InitConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: InitConfig = toml::from_str(&content).map_err(|source| Error::SessionConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }

    pub fn load_default() -> Result<Self> {
        Self::load_from_file("session.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_means_all_defaults() {
        let init: InitConfig = toml::from_str("").unwrap();
        assert!(init.session.is_none());
        assert!(init.typing.is_none());

        let session = init.session.unwrap_or_default();
        let (frame_rate, duration) = session.timing();
        assert_eq!(frame_rate, crate::config::DEFAULT_FRAME_RATE);
        assert_eq!(duration, crate::config::DEFAULT_SESSION_SECS);
        assert_eq!(session.rng_seed(), crate::config::DEFAULT_SESSION_SEED);
        assert_eq!(session.start_tier().unwrap(), QualityTier::Balanced);

        let typing = init.typing.unwrap_or_default();
        assert_eq!(typing.script(), DEFAULT_SCRIPT);
        assert_eq!(typing.words_per_minute(), crate::config::DEFAULT_TYPING_WPM);
    }

    #[test]
    fn full_session_file_parses() {
        let init: InitConfig = toml::from_str(
            r#"
            [session]
            frame_rate = 60.0
            duration_secs = 3.5
            start_tier = "performance"
            rng_seed = 99
            snapshot_path = "out/build.json"

            [typing]
            script = "hello world"
            words_per_minute = 40.0
            cadence_jitter = 0.1
            hold_secs = 0.08
            "#,
        )
        .unwrap();

        let session = init.session.unwrap();
        assert_eq!(session.timing(), (60.0, 3.5));
        assert_eq!(session.start_tier().unwrap(), QualityTier::Performance);
        assert_eq!(session.rng_seed(), 99);
        assert_eq!(session.snapshot_path.as_deref(), Some("out/build.json"));
        assert!(session.config_path.is_none());

        let typing = init.typing.unwrap();
        assert_eq!(typing.script(), "hello world");
        assert_eq!(typing.hold_secs(), 0.08);
    }

    #[test]
    fn partial_session_table_keeps_other_defaults() {
        let init: InitConfig = toml::from_str("[session]\nframe_rate = 240.0\n").unwrap();
        let session = init.session.unwrap();
        let (frame_rate, duration) = session.timing();
        assert_eq!(frame_rate, 240.0);
        assert_eq!(duration, crate::config::DEFAULT_SESSION_SECS);
    }

    #[test]
    fn unknown_tier_name_is_rejected() {
        let session = SessionConfig {
            start_tier: Some("ultra".into()),
            ..SessionConfig::default()
        };
        let err = session.start_tier().unwrap_err();
        match err {
            Error::UnknownChoice { field, value } => {
                assert_eq!(field, "session.start_tier");
                assert_eq!(value, "ultra");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
