//! Transform configuration, algorithm names and process-wide cache limits.

use core::fmt;
use core::str::FromStr;
use std::sync::OnceLock;

use crate::error::FftError;

/// Sample rate assumed when none is configured.
pub const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;

/// Default capacity of the twiddle-factor cache, in entries.
pub const DEFAULT_TWIDDLE_CAPACITY: usize = 10_000;

/// Largest transform size whose bit-reversal table is kept in the cache.
pub const DEFAULT_BITREV_MAX_CACHED: usize = 1 << 16;

/// Transform algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// Let the factory pick from the size.
    #[default]
    Auto,
    Radix2,
    Radix4,
    /// Bluestein chirp-z convolution, accepts any positive size.
    MixedRadix,
    /// Half-size complex transform for real input.
    RealOptimized,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Auto,
        Algorithm::Radix2,
        Algorithm::Radix4,
        Algorithm::MixedRadix,
        Algorithm::RealOptimized,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Auto => "auto",
            Algorithm::Radix2 => "radix2",
            Algorithm::Radix4 => "radix4",
            Algorithm::MixedRadix => "mixed-radix",
            Algorithm::RealOptimized => "real-optimized",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when parsing an unknown algorithm name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAlgorithmError(pub String);

impl fmt::Display for ParseAlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown algorithm '{}' (expected auto, radix2, radix4, mixed-radix or real-optimized)",
            self.0
        )
    }
}

impl std::error::Error for ParseAlgorithmError {}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Algorithm::Auto),
            "radix2" | "radix-2" => Ok(Algorithm::Radix2),
            "radix4" | "radix-4" => Ok(Algorithm::Radix4),
            "mixed-radix" | "mixed_radix" | "bluestein" => Ok(Algorithm::MixedRadix),
            "real-optimized" | "real_optimized" | "real" => Ok(Algorithm::RealOptimized),
            _ => Err(ParseAlgorithmError(s.to_string())),
        }
    }
}

/// Immutable description of one transform engine.
///
/// Only [`crate::FftEngine::update_config`] changes a config after the
/// engine has been built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformConfig {
    pub size: usize,
    pub algorithm: Algorithm,
    /// Divide the inverse transform by `size`. The forward transform is
    /// never scaled.
    pub normalize: bool,
    /// Sample rate in Hz used for the frequency axis of results.
    pub sample_rate: f64,
}

impl TransformConfig {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            algorithm: Algorithm::Auto,
            normalize: false,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Check the variant-independent constraints.
    pub fn validate(&self) -> Result<(), FftError> {
        if self.size == 0 {
            return Err(FftError::configuration(self.size, "size must be positive"));
        }
        validate_sample_rate(self.size, self.sample_rate)
    }
}

pub(crate) fn validate_sample_rate(size: usize, sample_rate: f64) -> Result<(), FftError> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(FftError::configuration(
            size,
            "sample rate must be finite and positive",
        ));
    }
    Ok(())
}

/// Partial update applied by [`crate::FftEngine::update_config`].
///
/// `normalize` and `sample_rate` are hot-swapped; a new `size` rebuilds all
/// derived tables.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigUpdate {
    pub size: Option<usize>,
    pub normalize: Option<bool>,
    pub sample_rate: Option<f64>,
}

impl ConfigUpdate {
    pub fn size(size: usize) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    pub fn normalize(normalize: bool) -> Self {
        Self {
            normalize: Some(normalize),
            ..Self::default()
        }
    }

    pub fn sample_rate(sample_rate: f64) -> Self {
        Self {
            sample_rate: Some(sample_rate),
            ..Self::default()
        }
    }
}

/// Process-wide cache limits, read once from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheLimits {
    pub twiddle_capacity: usize,
    pub bitrev_max_cached: usize,
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self {
            twiddle_capacity: DEFAULT_TWIDDLE_CAPACITY,
            bitrev_max_cached: DEFAULT_BITREV_MAX_CACHED,
        }
    }
}

static CACHE_LIMITS: OnceLock<CacheLimits> = OnceLock::new();

/// Limits used by the shared caches.
///
/// `SPECTRAFFT_TWIDDLE_CAPACITY` and `SPECTRAFFT_BITREV_MAX_CACHED` override
/// the defaults; values that do not parse as a positive integer are ignored.
pub fn cache_limits() -> CacheLimits {
    *CACHE_LIMITS.get_or_init(|| {
        let defaults = CacheLimits::default();
        CacheLimits {
            twiddle_capacity: env_usize("SPECTRAFFT_TWIDDLE_CAPACITY")
                .unwrap_or(defaults.twiddle_capacity),
            bitrev_max_cached: env_usize("SPECTRAFFT_BITREV_MAX_CACHED")
                .unwrap_or(defaults.bitrev_max_cached),
        }
    })
}

fn env_usize(key: &str) -> Option<usize> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(v) if v > 0 => Some(v),
        _ => {
            log::debug!("ignoring {key}={raw:?}: expected a positive integer");
            None
        }
    }
}
