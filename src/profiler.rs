use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Cumulative time and hit count for one profiled section.
#[derive(Clone, Copy, Default)]
pub struct SectionStats {
    pub total: Duration,
    pub calls: u64,
}

/// Simple scoped profiler recording cumulative time per section.
pub struct Profiler {
    pub sections: HashMap<&'static str, SectionStats>,
}

impl Profiler {
    pub fn new() -> Self {
        Self {
            sections: HashMap::new(),
        }
    }

    pub fn finish(&mut self, guard: &ProfilerGuard) {
        let elapsed = guard.start.elapsed();
        let stats = self.sections.entry(guard.name).or_default();
        stats.total += elapsed;
        stats.calls += 1;
    }

    pub fn report_sorted(&self) -> Vec<(&'static str, SectionStats)> {
        let mut v: Vec<_> = self.sections.iter().map(|(n, s)| (*n, *s)).collect();
        v.sort_by(|a, b| b.1.total.cmp(&a.1.total));
        v
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }

    pub fn log_and_clear(&mut self) {
        for (name, stats) in self.report_sorted() {
            tracing::debug!(
                section = name,
                calls = stats.calls,
                total_ms = stats.total.as_secs_f64() * 1e3,
                "section timing"
            );
        }
        self.clear();
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ProfilerGuard {
    name: &'static str,
    start: Instant,
}

/// Start a profiling section. Returns a guard that will update the global
/// profiler when dropped.
pub fn start(name: &'static str) -> ProfilerGuard {
    ProfilerGuard {
        name,
        start: Instant::now(),
    }
}

#[cfg(feature = "profiling")]
impl Drop for ProfilerGuard {
    fn drop(&mut self) {
        crate::PROFILER.lock().finish(self);
    }
}

/// Macro helper to profile a scope only when the `profiling` feature is enabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _guard = $crate::profiler::start($name);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_accumulate_across_guards() {
        let mut profiler = Profiler::new();
        for _ in 0..2 {
            let guard = start("derive");
            profiler.finish(&guard);
        }
        let guard = start("arena_step");
        profiler.finish(&guard);

        assert_eq!(profiler.sections["derive"].calls, 2);
        assert_eq!(profiler.sections["arena_step"].calls, 1);

        profiler.clear();
        assert!(profiler.sections.is_empty());
    }
}
