use serde::Deserialize;
use std::fmt;

/// Named crawl speed presets
///
/// A preset is only a lookup from a name to a rate/burst pair; the rate
/// limiter built from it carries the runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckSpeed {
    /// 1 request per second, burst 1
    Slow,
    /// 2 requests per second, burst 2
    #[default]
    Normal,
    /// 10 requests per second, burst 10
    Fast,
    /// 20 requests per second, burst 20
    Furious,
    /// 100 requests per second, burst 100
    Warp,
}

/// Rate and burst pair for the request rate limiter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedLimits {
    /// Steady refill rate in requests per second
    pub rate_per_second: f64,

    /// Maximum number of requests allowed in one instantaneous burst
    pub burst: u32,
}

impl CheckSpeed {
    /// Returns the rate/burst pair for this preset
    pub fn limits(self) -> SpeedLimits {
        let (rate, burst) = match self {
            Self::Slow => (1, 1),
            Self::Normal => (2, 2),
            Self::Fast => (10, 10),
            Self::Furious => (20, 20),
            Self::Warp => (100, 100),
        };

        SpeedLimits {
            rate_per_second: f64::from(rate),
            burst,
        }
    }

    /// Lowercase preset name, as used in config files
    pub fn name(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
            Self::Furious => "furious",
            Self::Warp => "warp",
        }
    }
}

impl fmt::Display for CheckSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
