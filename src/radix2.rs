//! Radix-2 decimation-in-time engine for power-of-two sizes.

use std::sync::Arc;

use crate::bitrev::permute;
use crate::config::{Algorithm, TransformConfig};
use crate::engine::{EngineCaches, EngineCore, FftEngine, OptimizationLevel};
use crate::error::FftError;
use crate::num::{Complex, Float};
use crate::twiddle::FftNum;

/// Iterative radix-2 butterfly network for one power-of-two size.
///
/// Shared by the radix-2 engine, the Bluestein convolution and the
/// real-input engine's half-size transform.
pub(crate) struct Radix2Kernel<T: Float> {
    n: usize,
    permutation: Arc<[usize]>,
    /// `twiddles[k] = e^{-2πik/n}` for `k in 0..n`.
    twiddles: Arc<[Complex<T>]>,
}

impl<T: FftNum> Radix2Kernel<T> {
    pub(crate) fn new(n: usize, caches: &EngineCaches<T>) -> Result<Self, FftError> {
        if !n.is_power_of_two() {
            return Err(FftError::unsupported(Algorithm::Radix2, n));
        }
        Ok(Self {
            n,
            permutation: caches.bit_reversal_table(n)?,
            twiddles: caches.twiddle_table(n),
        })
    }
}

impl<T: Float> Radix2Kernel<T> {
    pub(crate) fn len(&self) -> usize {
        self.n
    }

    /// Unnormalized forward transform in place.
    pub(crate) fn forward(&self, buf: &mut [Complex<T>]) {
        let n = self.n;
        debug_assert_eq!(buf.len(), n);
        if n <= 1 {
            return;
        }
        permute(buf, &self.permutation);
        let mut size = 2;
        while size <= n {
            let half = size / 2;
            let stride = n / size;
            for start in (0..n).step_by(size) {
                for j in 0..half {
                    let w = self.twiddles[j * stride];
                    let u = buf[start + j];
                    let t = buf[start + j + half].mul(w);
                    buf[start + j] = u.add(t);
                    buf[start + j + half] = u.sub(t);
                }
            }
            size <<= 1;
        }
    }

    /// Unnormalized inverse transform in place (conjugate, forward, conjugate).
    pub(crate) fn inverse_unscaled(&self, buf: &mut [Complex<T>]) {
        for c in buf.iter_mut() {
            *c = c.conj();
        }
        self.forward(buf);
        for c in buf.iter_mut() {
            *c = c.conj();
        }
    }
}

/// Engine running a radix-2 DIT transform of the configured size.
pub struct Radix2Engine<T: FftNum> {
    core: EngineCore<T>,
    kernel: Radix2Kernel<T>,
}

impl<T: FftNum> Radix2Engine<T> {
    pub fn new(config: TransformConfig) -> Result<Self, FftError> {
        Self::with_caches(config, EngineCaches::shared())
    }

    pub fn with_caches(config: TransformConfig, caches: EngineCaches<T>) -> Result<Self, FftError> {
        let mut core = EngineCore::new(config, Algorithm::Radix2, caches)?;
        let kernel = Radix2Kernel::new(config.size, core.caches())?;
        core.mark_ready();
        log::debug!("radix2 engine ready (n={})", config.size);
        Ok(Self { core, kernel })
    }
}

impl<T: FftNum> FftEngine<T> for Radix2Engine<T> {
    fn core(&self) -> &EngineCore<T> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EngineCore<T> {
        &mut self.core
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Radix2
    }

    fn optimization_level(&self) -> OptimizationLevel {
        OptimizationLevel::Standard
    }

    fn rebuild(&mut self, size: usize) -> Result<(), FftError> {
        self.kernel = Radix2Kernel::new(size, self.core.caches())?;
        Ok(())
    }

    fn process(&self, buffer: &mut [Complex<T>]) {
        self.kernel.forward(buffer);
    }
}
