//! # spectrafft - FFT engines with a shared contract
//!
//! Four discrete Fourier transform engines behind one trait, a factory that
//! picks the right one from the transform size, and the caches they share.
//!
//! ## Engines
//!
//! | Algorithm | Sizes | Engine |
//! |-----------|-------|--------|
//! | `radix2` | powers of two | [`Radix2Engine`] |
//! | `radix4` | powers of four | [`Radix4Engine`] |
//! | `mixed-radix` | any positive size (Bluestein) | [`BluesteinEngine`] |
//! | `real-optimized` | powers of two, half-size kernel | [`RealFftEngine`] |
//!
//! All of them return a [`TransformResult`] holding the split real and
//! imaginary spectrum together with magnitude, phase, power and the
//! frequency of each bin.
//!
//! ## Conventions
//!
//! - The forward transform is never scaled.
//! - The inverse is scaled by `1/N` only when the config sets `normalize`,
//!   so by default `inverse(forward(x)) == N·x`.
//! - Twiddle factors are `e^{-2πik/N}`, computed in `f64` and narrowed to
//!   the sample type.
//!
//! ## Example
//!
//! ```
//! use spectrafft::{create_auto, Algorithm};
//!
//! let mut fft = create_auto::<f64>(4).unwrap();
//! assert_eq!(fft.algorithm(), Algorithm::Radix4);
//! let spectrum = fft.forward(&[1.0, 0.0, 0.0, 0.0]).unwrap();
//! assert_eq!(spectrum.magnitude, vec![1.0; 4]);
//! ```
//!
//! ## Caches
//!
//! Twiddle factors and bit-reversal tables are memoized in process-wide
//! caches guarded by mutexes. Pass [`EngineCaches::isolated`] to an
//! engine's `with_caches` constructor or to [`FftFactory::with_caches`] to
//! keep a separate set. The environment variables
//! `SPECTRAFFT_TWIDDLE_CAPACITY` and `SPECTRAFFT_BITREV_MAX_CACHED` bound
//! the shared caches; they are read once.
//!
//! ## Logging
//!
//! Engine construction, reinitialization and automatic algorithm selection
//! are reported at `debug` level through the [`log`] facade; cache fills
//! and evictions at `trace`. Install any `log` backend to see them.

pub mod bitrev;
pub mod bluestein;
/// Element-wise operations on split real/imaginary buffers.
pub mod complex_ops;
pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod num;
pub mod radix2;
pub mod radix4;
pub mod real;
/// Twiddle-factor computation and the FIFO-bounded cache.
pub mod twiddle;

pub use bluestein::BluesteinEngine;
pub use config::{Algorithm, ConfigUpdate, ParseAlgorithmError, TransformConfig};
pub use engine::{
    AccuracyReport, EngineCaches, EngineInfo, EngineState, EngineStats, FftEngine,
    OptimizationLevel, TransformResult,
};
pub use error::FftError;
pub use factory::{create, create_auto, FftFactory, SupportedSizes};
pub use num::{Complex, Complex32, Complex64, Float};
pub use radix2::Radix2Engine;
pub use radix4::Radix4Engine;
pub use real::RealFftEngine;
pub use twiddle::FftNum;
