pub mod acoustics;
pub mod color;
pub mod config;
pub mod derive;
pub mod diagnostics;
pub mod error;
pub mod governor;
pub mod init_config;
pub mod io;
pub mod layout;
pub mod motion;
pub mod presets;
pub mod profiler;
pub mod units;
pub mod utils;

pub mod app;

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
