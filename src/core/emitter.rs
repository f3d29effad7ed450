use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

use super::access_key::{CodeSource, RandomCode};
use super::config::EmitterConfig;

/// Source of the `issuedAt` timestamp.
pub type Clock = fn() -> DateTime<Utc>;

/// Runs validate, key and encode for either document kind.
///
/// The NF-e and CT-e entry points (`emit_nfe`, `emit_cte`) live with their
/// document modules. An emitter holds no per-document state and can be
/// shared between threads.
///
/// ```
/// use dfe::core::{Emitter, EmitterConfig, FixedCode};
///
/// let emitter = Emitter::new(EmitterConfig::default()).with_code_source(FixedCode(42));
/// assert_eq!(emitter.code_source().next_code(), 42);
/// ```
pub struct Emitter {
    config: EmitterConfig,
    codes: Box<dyn CodeSource>,
    clock: Clock,
}

impl Emitter {
    /// Random numeric codes and the system clock.
    pub fn new(config: EmitterConfig) -> Self {
        Self {
            config,
            codes: Box::new(RandomCode),
            clock: Utc::now,
        }
    }

    /// Replace the numeric code fallback.
    pub fn with_code_source(mut self, codes: impl CodeSource + 'static) -> Self {
        self.codes = Box::new(codes);
        self
    }

    /// Replace the clock used for `issuedAt`.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn code_source(&self) -> &dyn CodeSource {
        self.codes.as_ref()
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Serialize as `2025-07-10T13:00:00.000Z`.
pub fn serialize_issued_at<S: Serializer>(
    value: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
