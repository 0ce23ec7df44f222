//! Mixed-radix engine using Bluestein's chirp-z algorithm.
//!
//! An `N`-point DFT is rewritten as a linear convolution with the chirp
//! `c[k] = e^{-iπk²/N}` and evaluated with power-of-two transforms of size
//! `M >= 2N - 1`, so every positive `N` is accepted.
//!
//! Round trips through this engine accumulate more rounding error than the
//! radix engines: three length-`M` transforms and two chirp products per
//! direction. In `f32` expect relative errors around `1e-4` for sizes in
//! the low thousands; `f64` stays near `1e-10`.

use crate::config::{Algorithm, TransformConfig};
use crate::engine::{EngineCaches, EngineCore, FftEngine, OptimizationLevel};
use crate::error::FftError;
use crate::num::{Complex, Float};
use crate::radix2::Radix2Kernel;
use crate::twiddle::FftNum;

/// Chirp `e^{-iπk²/n}` for `k in 0..n`.
///
/// `k²` is reduced modulo `2n` in integer arithmetic first; the chirp has
/// that period and the reduction keeps the angle small for large `k`.
pub fn chirp<T: Float>(n: usize) -> Vec<Complex<T>> {
    let period = 2 * n as u128;
    (0..n)
        .map(|k| {
            let k = k as u128;
            let reduced = (k * k) % period;
            let angle = -core::f64::consts::PI * reduced as f64 / n as f64;
            Complex::expi(angle)
        })
        .collect()
}

/// Padded convolution length for an `n`-point transform.
pub fn padded_len(n: usize) -> usize {
    (2 * n - 1).next_power_of_two()
}

struct BluesteinPlan<T: Float> {
    chirp: Vec<Complex<T>>,
    /// Forward transform of the conjugated chirp kernel.
    kernel_spectrum: Vec<Complex<T>>,
    inner: Radix2Kernel<T>,
}

impl<T: FftNum> BluesteinPlan<T> {
    fn build(n: usize, caches: &EngineCaches<T>) -> Result<Self, FftError> {
        let m = padded_len(n);
        let inner = Radix2Kernel::new(m, caches)?;
        let chirp = chirp::<T>(n);
        let mut kernel = vec![Complex::zero(); m];
        kernel[0] = chirp[0].conj();
        for k in 1..n {
            let c = chirp[k].conj();
            kernel[k] = c;
            kernel[m - k] = c;
        }
        inner.forward(&mut kernel);
        log::trace!("bluestein plan built (n={n}, m={m})");
        Ok(Self {
            chirp,
            kernel_spectrum: kernel,
            inner,
        })
    }
}

/// Engine accepting any positive size through a chirp convolution.
pub struct BluesteinEngine<T: FftNum> {
    core: EngineCore<T>,
    plan: BluesteinPlan<T>,
}

impl<T: FftNum> BluesteinEngine<T> {
    pub fn new(config: TransformConfig) -> Result<Self, FftError> {
        Self::with_caches(config, EngineCaches::shared())
    }

    pub fn with_caches(config: TransformConfig, caches: EngineCaches<T>) -> Result<Self, FftError> {
        let mut core = EngineCore::new(config, Algorithm::MixedRadix, caches)?;
        let plan = BluesteinPlan::build(config.size, core.caches())?;
        core.mark_ready();
        log::debug!(
            "mixed-radix engine ready (n={}, padded to {})",
            config.size,
            plan.inner.len()
        );
        Ok(Self { core, plan })
    }
}

impl<T: FftNum> FftEngine<T> for BluesteinEngine<T> {
    fn core(&self) -> &EngineCore<T> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EngineCore<T> {
        &mut self.core
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::MixedRadix
    }

    fn optimization_level(&self) -> OptimizationLevel {
        OptimizationLevel::General
    }

    fn internal_size(&self) -> usize {
        self.plan.inner.len()
    }

    fn rebuild(&mut self, size: usize) -> Result<(), FftError> {
        self.plan = BluesteinPlan::build(size, self.core.caches())?;
        Ok(())
    }

    fn process(&self, buffer: &mut [Complex<T>]) {
        let plan = &self.plan;
        let n = buffer.len();
        let m = plan.inner.len();
        // Per-call working buffer; the plan itself is never written.
        let mut a = vec![Complex::zero(); m];
        for (slot, (&x, &c)) in a.iter_mut().zip(buffer.iter().zip(plan.chirp.iter())) {
            *slot = x.mul(c);
        }
        plan.inner.forward(&mut a);
        for (x, &k) in a.iter_mut().zip(plan.kernel_spectrum.iter()) {
            *x = x.mul(k);
        }
        plan.inner.inverse_unscaled(&mut a);
        let scale = T::one() / T::from_f64(m as f64);
        for k in 0..n {
            buffer[k] = a[k].mul(plan.chirp[k]).scale(scale);
        }
    }
}
