//! Process-wide log level and file logging switches.
//!
//! The config layer drives logging only through [`LogControl`]. The
//! shipped implementation, [`LogSwitch`], keeps its state in atomics and
//! hands out `tracing_subscriber` filters that read that state on every
//! event, so level changes apply without rebuilding the subscriber.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use tracing::{Level, Metadata};
use tracing_subscriber::filter::FilterFn;

/// Boxed per-layer predicate handed to `tracing_subscriber`.
pub type SwitchFilter = FilterFn<Box<dyn Fn(&Metadata<'_>) -> bool + Send + Sync>>;

/// Logging operations the config layer depends on. All calls are infallible.
pub trait LogControl: Send + Sync {
    fn reset_level(&self);
    fn set_debug_mode(&self);
    fn set_verbose_mode(&self);
    fn set_file_logging(&self, enabled: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Default,
    Verbose,
    Debug,
}

impl LogLevel {
    /// Most verbose `tracing` level let through.
    pub fn max_level(self) -> Level {
        match self {
            LogLevel::Default => Level::WARN,
            LogLevel::Verbose => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            LogLevel::Default => 0,
            LogLevel::Verbose => 1,
            LogLevel::Debug => 2,
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            1 => LogLevel::Verbose,
            2 => LogLevel::Debug,
            _ => LogLevel::Default,
        }
    }
}

#[derive(Debug, Default)]
struct SwitchState {
    level: AtomicU8,
    file_logging: AtomicBool,
}

/// Shared handle to the current logging state. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct LogSwitch {
    state: Arc<SwitchState>,
}

impl LogSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.state.level.load(Ordering::Relaxed))
    }

    pub fn file_logging(&self) -> bool {
        self.state.file_logging.load(Ordering::Relaxed)
    }

    pub fn enabled(&self, level: &Level) -> bool {
        *level <= self.level().max_level()
    }

    fn store_level(&self, level: LogLevel) {
        self.state.level.store(level.to_u8(), Ordering::Relaxed);
    }

    /// Per-layer filter for console output.
    pub fn console_filter(&self) -> SwitchFilter {
        let switch = self.clone();
        FilterFn::new(Box::new(move |meta: &Metadata<'_>| {
            switch.enabled(meta.level())
        }))
    }

    /// Per-layer filter for the log file; closed while file logging is off.
    pub fn file_filter(&self) -> SwitchFilter {
        let switch = self.clone();
        FilterFn::new(Box::new(move |meta: &Metadata<'_>| {
            switch.file_logging() && switch.enabled(meta.level())
        }))
    }
}

impl LogControl for LogSwitch {
    fn reset_level(&self) {
        self.store_level(LogLevel::Default);
    }

    fn set_debug_mode(&self) {
        self.store_level(LogLevel::Debug);
    }

    fn set_verbose_mode(&self) {
        self.store_level(LogLevel::Verbose);
    }

    fn set_file_logging(&self, enabled: bool) {
        self.state.file_logging.store(enabled, Ordering::Relaxed);
    }
}
