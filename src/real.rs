//! Real-input engine built on a half-size complex transform.
//!
//! A real sequence of even length `N` is packed as `z[i] = x[2i] + j·x[2i+1]`,
//! transformed at `N/2` and unpacked into the even/odd spectra. The full
//! spectrum is completed from conjugate symmetry `X[N-k] = conj(X[k])`.
//!
//! Complex input goes through the same path by linearity: `X = A + j·B`
//! where `A` and `B` are the spectra of the real and imaginary parts. The
//! inverse splits an arbitrary spectrum into two Hermitian halves and
//! inverts each with the packed half-size transform.

use std::sync::Arc;

use crate::config::{Algorithm, TransformConfig};
use crate::engine::{EngineCaches, EngineCore, FftEngine, OptimizationLevel};
use crate::error::FftError;
use crate::num::{Complex, Float};
use crate::radix2::Radix2Kernel;
use crate::twiddle::FftNum;

struct RealPlan<T: Float> {
    n: usize,
    half: Radix2Kernel<T>,
    /// `W_N^k` for the full length.
    twiddles: Arc<[Complex<T>]>,
}

impl<T: FftNum> RealPlan<T> {
    fn build(n: usize, caches: &EngineCaches<T>) -> Result<Self, FftError> {
        if !n.is_power_of_two() {
            return Err(FftError::unsupported(Algorithm::RealOptimized, n));
        }
        Ok(Self {
            n,
            half: Radix2Kernel::new((n / 2).max(1), caches)?,
            twiddles: caches.twiddle_table(n),
        })
    }
}

impl<T: Float> RealPlan<T> {
    /// Full `N`-bin spectrum of a real sequence.
    fn rfft(&self, input: &[T]) -> Vec<Complex<T>> {
        let n = self.n;
        if n == 1 {
            return vec![Complex::new(input[0], T::zero())];
        }
        let m = n / 2;
        let mut z: Vec<Complex<T>> = input
            .chunks_exact(2)
            .map(|pair| Complex::new(pair[0], pair[1]))
            .collect();
        self.half.forward(&mut z);

        let half = T::from_f64(0.5);
        let mut out = vec![Complex::zero(); n];
        out[0] = Complex::new(z[0].re + z[0].im, T::zero());
        out[m] = Complex::new(z[0].re - z[0].im, T::zero());
        for k in 1..m {
            let zk = z[k];
            let zmk = z[m - k].conj();
            let sum = zk.add(zmk);
            let diff = zk.sub(zmk);
            let x = sum.add(self.twiddles[k].mul(diff).mul_neg_j()).scale(half);
            out[k] = x;
            out[n - k] = x.conj();
        }
        out
    }

    /// Inverse of [`RealPlan::rfft`] for a Hermitian spectrum, scaled by `N`.
    ///
    /// Only bins `0..=N/2` are read.
    fn irfft_unscaled(&self, spectrum: &[Complex<T>]) -> Vec<T> {
        let n = self.n;
        if n == 1 {
            return vec![spectrum[0].re];
        }
        let m = n / 2;
        let mut z: Vec<Complex<T>> = (0..m)
            .map(|k| {
                let xk = spectrum[k];
                let xmk = spectrum[m - k].conj();
                let sum = xk.add(xmk);
                let diff = xk.sub(xmk);
                sum.add(self.twiddles[k].conj().mul(diff).mul_j())
            })
            .collect();
        self.half.inverse_unscaled(&mut z);
        let mut out = Vec::with_capacity(n);
        for c in z {
            out.push(c.re);
            out.push(c.im);
        }
        out
    }
}

/// Engine specialised for power-of-two sizes, running every transform at
/// half length.
pub struct RealFftEngine<T: FftNum> {
    core: EngineCore<T>,
    plan: RealPlan<T>,
}

impl<T: FftNum> RealFftEngine<T> {
    pub fn new(config: TransformConfig) -> Result<Self, FftError> {
        Self::with_caches(config, EngineCaches::shared())
    }

    pub fn with_caches(config: TransformConfig, caches: EngineCaches<T>) -> Result<Self, FftError> {
        let mut core = EngineCore::new(config, Algorithm::RealOptimized, caches)?;
        let plan = RealPlan::build(config.size, core.caches())?;
        core.mark_ready();
        log::debug!(
            "real-optimized engine ready (n={}, half-size {})",
            config.size,
            plan.half.len()
        );
        Ok(Self { core, plan })
    }
}

impl<T: FftNum> FftEngine<T> for RealFftEngine<T> {
    fn core(&self) -> &EngineCore<T> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EngineCore<T> {
        &mut self.core
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::RealOptimized
    }

    fn optimization_level(&self) -> OptimizationLevel {
        OptimizationLevel::High
    }

    fn internal_size(&self) -> usize {
        self.plan.half.len()
    }

    fn rebuild(&mut self, size: usize) -> Result<(), FftError> {
        self.plan = RealPlan::build(size, self.core.caches())?;
        Ok(())
    }

    fn process(&self, buffer: &mut [Complex<T>]) {
        let (re, im): (Vec<T>, Vec<T>) = buffer.iter().map(|c| (c.re, c.im)).unzip();
        let a = self.plan.rfft(&re);
        let b = self.plan.rfft(&im);
        for ((out, a), b) in buffer.iter_mut().zip(a).zip(b) {
            *out = a.add(b.mul_j());
        }
    }

    fn process_real(&self, input: &[T]) -> Vec<Complex<T>> {
        self.plan.rfft(input)
    }

    fn process_inverse(&self, buffer: &mut [Complex<T>]) {
        let n = buffer.len();
        let half = T::from_f64(0.5);
        let mut hermitian = Vec::with_capacity(n);
        let mut odd = Vec::with_capacity(n);
        for k in 0..n {
            let xk = buffer[k];
            let mirror = buffer[(n - k) % n].conj();
            hermitian.push(xk.add(mirror).scale(half));
            odd.push(xk.sub(mirror).scale(half).mul_neg_j());
        }
        let re = self.plan.irfft_unscaled(&hermitian);
        let im = self.plan.irfft_unscaled(&odd);
        for ((out, r), i) in buffer.iter_mut().zip(re).zip(im) {
            *out = Complex::new(r, i);
        }
    }
}
