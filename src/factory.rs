//! Engine selection and size contracts.
//!
//! The factory picks the cheapest variant that accepts a size, in fixed
//! priority order: radix-4 for powers of four, radix-2 for other powers of
//! two, and the Bluestein mixed-radix engine for everything else.

use crate::bluestein::BluesteinEngine;
use crate::config::{Algorithm, TransformConfig};
use crate::engine::{EngineCaches, FftEngine};
use crate::error::FftError;
use crate::radix2::Radix2Engine;
use crate::radix4::Radix4Engine;
use crate::real::RealFftEngine;
use crate::twiddle::FftNum;

#[inline]
pub fn is_power_of_four(n: usize) -> bool {
    n.is_power_of_two() && n.trailing_zeros() % 2 == 0
}

/// Whether `algorithm` can run an `size`-point transform.
///
/// Zero is never supported.
pub fn supports_size(algorithm: Algorithm, size: usize) -> bool {
    if size == 0 {
        return false;
    }
    match algorithm {
        Algorithm::Auto | Algorithm::MixedRadix => true,
        Algorithm::Radix2 | Algorithm::RealOptimized => size.is_power_of_two(),
        Algorithm::Radix4 => is_power_of_four(size),
    }
}

/// Variant chosen for `size` when no algorithm is requested.
pub fn select_algorithm(size: usize) -> Algorithm {
    if is_power_of_four(size) {
        Algorithm::Radix4
    } else if size.is_power_of_two() {
        Algorithm::Radix2
    } else {
        Algorithm::MixedRadix
    }
}

/// Set of sizes a variant accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedSizes {
    PowersOfTwo,
    PowersOfFour,
    /// Every positive integer.
    Any,
}

impl SupportedSizes {
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Radix2 | Algorithm::RealOptimized => SupportedSizes::PowersOfTwo,
            Algorithm::Radix4 => SupportedSizes::PowersOfFour,
            Algorithm::Auto | Algorithm::MixedRadix => SupportedSizes::Any,
        }
    }

    pub fn contains(self, size: usize) -> bool {
        size > 0
            && match self {
                SupportedSizes::PowersOfTwo => size.is_power_of_two(),
                SupportedSizes::PowersOfFour => is_power_of_four(size),
                SupportedSizes::Any => true,
            }
    }

    /// Accepted sizes in `1..=max`, ascending.
    ///
    /// For [`SupportedSizes::Any`] this is every integer in the range.
    pub fn up_to(self, max: usize) -> Vec<usize> {
        match self {
            SupportedSizes::Any => (1..=max).collect(),
            SupportedSizes::PowersOfTwo | SupportedSizes::PowersOfFour => {
                let step = if self == SupportedSizes::PowersOfFour { 2 } else { 1 };
                (0..usize::BITS)
                    .step_by(step)
                    .map(|shift| 1usize << shift)
                    .take_while(|&size| size <= max)
                    .collect()
            }
        }
    }
}

/// Builds engines that share one set of caches.
pub struct FftFactory<T: FftNum> {
    caches: EngineCaches<T>,
}

impl<T: FftNum> Default for FftFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FftNum> FftFactory<T> {
    /// Factory backed by the process-wide caches.
    pub fn new() -> Self {
        Self::with_caches(EngineCaches::shared())
    }

    pub fn with_caches(caches: EngineCaches<T>) -> Self {
        Self { caches }
    }

    pub fn caches(&self) -> &EngineCaches<T> {
        &self.caches
    }

    /// Build the configured variant, or pick one from the size when the
    /// config asks for [`Algorithm::Auto`].
    pub fn create(&self, config: TransformConfig) -> Result<Box<dyn FftEngine<T>>, FftError> {
        let algorithm = match config.algorithm {
            Algorithm::Auto => {
                config.validate()?;
                let chosen = select_algorithm(config.size);
                log::debug!("auto-selected {chosen} for n={}", config.size);
                chosen
            }
            explicit => explicit,
        };
        let config = config.with_algorithm(algorithm);
        let caches = self.caches.clone();
        let engine: Box<dyn FftEngine<T>> = match algorithm {
            Algorithm::Radix2 => Box::new(Radix2Engine::with_caches(config, caches)?),
            Algorithm::Radix4 => Box::new(Radix4Engine::with_caches(config, caches)?),
            Algorithm::RealOptimized => Box::new(RealFftEngine::with_caches(config, caches)?),
            Algorithm::MixedRadix | Algorithm::Auto => {
                Box::new(BluesteinEngine::with_caches(config, caches)?)
            }
        };
        Ok(engine)
    }

    /// Build the preferred variant for `size` with default settings.
    pub fn create_auto(&self, size: usize) -> Result<Box<dyn FftEngine<T>>, FftError> {
        self.create(TransformConfig::new(size))
    }

    pub fn select_algorithm(&self, size: usize) -> Algorithm {
        select_algorithm(size)
    }

    pub fn is_size_supported(&self, algorithm: Algorithm, size: usize) -> bool {
        supports_size(algorithm, size)
    }

    pub fn supported_sizes(&self, algorithm: Algorithm) -> SupportedSizes {
        SupportedSizes::for_algorithm(algorithm)
    }
}

/// Build an engine from `config` using the process-wide caches.
pub fn create<T: FftNum>(config: TransformConfig) -> Result<Box<dyn FftEngine<T>>, FftError> {
    FftFactory::new().create(config)
}

/// Build the preferred engine for `size` using the process-wide caches.
pub fn create_auto<T: FftNum>(size: usize) -> Result<Box<dyn FftEngine<T>>, FftError> {
    FftFactory::new().create_auto(size)
}
