// app/mod.rs
// Process setup and the headless session runner.

use crossbeam::channel;

use crate::config::KeyboardConfig;
use crate::diagnostics;
use crate::error::Error;
use crate::governor::QualityTier;
use crate::init_config::InitConfig;
use crate::io;

pub mod session;
pub mod typing;

use session::Session;
use typing::TypistPlan;

pub fn run() {
    // Global rayon pool leaving a couple of cores for the rest of the
    // system, but never below the minimum.
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(crate::config::MIN_THREADS);
    let threads = cores
        .saturating_sub(crate::config::THREADS_LEAVE_FREE)
        .max(crate::config::MIN_THREADS);
    if let Err(err) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        tracing::warn!(%err, "global thread pool already configured");
    }

    let init = load_init();
    let session_cfg = init.session.clone().unwrap_or_default();
    let typing_cfg = init.typing.clone().unwrap_or_default();

    let start_tier = match session_cfg.start_tier() {
        Ok(tier) => tier,
        Err(err) => {
            tracing::warn!(%err, "unusable start tier, using the default");
            QualityTier::default()
        }
    };

    let mut config = match session_cfg.config_path.as_deref() {
        Some(path) => match io::load_config(path) {
            Ok(config) => {
                tracing::info!(path, "configuration snapshot loaded");
                config
            }
            Err(err) => {
                tracing::warn!(%err, "snapshot load failed, using the default build");
                KeyboardConfig::default()
            }
        },
        None => KeyboardConfig::default(),
    };
    config.generation = 1;

    let (frame_rate, duration_secs) = session_cfg.timing();
    let frame_rate = {
        let clamped = crate::utils::clamp(
            frame_rate,
            crate::config::MIN_FRAME_RATE,
            crate::config::MAX_FRAME_RATE,
        );
        if clamped != frame_rate {
            tracing::warn!(frame_rate, clamped, "frame rate outside the supported band");
        }
        clamped
    };
    let duration_secs = if duration_secs > 0.0 {
        duration_secs
    } else {
        tracing::warn!(duration_secs, "non-positive session length, using the default");
        crate::config::DEFAULT_SESSION_SECS
    };
    let plan = TypistPlan {
        script: typing_cfg.script().to_string(),
        words_per_minute: typing_cfg.words_per_minute(),
        cadence_jitter: typing_cfg.cadence_jitter(),
        hold_secs: typing_cfg.hold_secs(),
        seed: session_cfg.rng_seed(),
        duration_secs,
    };

    let (tx, rx) = channel::unbounded();
    let typist = std::thread::spawn(move || typing::run_typist(tx, plan));

    let mut session = Session::new(config, start_tier, session_cfg.rng_seed());
    session.run(&rx, frame_rate, duration_secs);

    if let Ok(strokes) = typist.join() {
        tracing::debug!(strokes, "typist joined");
    }

    let report = diagnostics::run_self_check(session.config());
    for issue in &report.issues {
        tracing::debug!(code = ?issue.code, key = issue.key_id.as_str(), message = %issue.message, "self-check issue");
    }
    tracing::info!(
        passed = report.passed,
        checked_keys = report.checked_keys,
        issues = report.issues.len(),
        "board self-check"
    );

    if let Some(path) = session_cfg.snapshot_path.as_deref() {
        match io::save_config(path, session.config()) {
            Ok(()) => tracing::info!(path, "configuration snapshot saved"),
            Err(err) => tracing::warn!(%err, "snapshot save failed"),
        }
    }

    #[cfg(feature = "profiling")]
    crate::PROFILER.lock().log_and_clear();
}

fn load_init() -> InitConfig {
    match InitConfig::load_default() {
        Ok(init) => init,
        Err(Error::Io { .. }) => {
            // Running without a session.toml is the normal case.
            tracing::debug!("no session.toml, using defaults");
            InitConfig::default()
        }
        Err(err) => {
            tracing::warn!(%err, "session.toml unusable, using defaults");
            InitConfig::default()
        }
    }
}
