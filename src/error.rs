//! Error type shared by configuration, validation and the transform kernels.

use core::fmt;

use crate::config::Algorithm;

/// Errors raised synchronously by engines, caches and the factory.
///
/// None of these are transient: retrying the same call with the same
/// arguments fails the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    /// The configuration cannot describe any transform (for example a zero
    /// size or a non-positive sample rate).
    Configuration {
        size: usize,
        reason: &'static str,
    },
    /// An input buffer does not have the configured length.
    InputShape { expected: usize, actual: usize },
    /// The requested size is valid in general but not for this algorithm.
    UnsupportedSize { algorithm: Algorithm, size: usize },
}

impl FftError {
    pub(crate) fn configuration(size: usize, reason: &'static str) -> Self {
        FftError::Configuration { size, reason }
    }

    pub(crate) fn unsupported(algorithm: Algorithm, size: usize) -> Self {
        FftError::UnsupportedSize { algorithm, size }
    }

    /// Fail with [`FftError::InputShape`] unless `actual == expected`.
    pub(crate) fn check_len(expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(FftError::InputShape { expected, actual })
        }
    }
}

impl fmt::Display for FftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FftError::Configuration { size, reason } => {
                write!(f, "invalid transform configuration (size {size}): {reason}")
            }
            FftError::InputShape { expected, actual } => write!(
                f,
                "input length {actual} does not match configured size {expected}"
            ),
            FftError::UnsupportedSize { algorithm, size } => {
                let requirement = match algorithm {
                    Algorithm::Radix2 | Algorithm::RealOptimized => "a power of two",
                    Algorithm::Radix4 => "a power of four",
                    Algorithm::MixedRadix | Algorithm::Auto => "a positive integer",
                };
                write!(
                    f,
                    "size {size} is not supported by the {algorithm} algorithm (requires {requirement})"
                )
            }
        }
    }
}

impl std::error::Error for FftError {}
