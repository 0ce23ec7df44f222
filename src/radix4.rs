//! Radix-4 decimation-in-time engine for power-of-four sizes.
//!
//! Inputs are put in base-4 digit-reversed order, then `log4 N` stages each
//! combine four sub-transforms with twiddles `W^j`, `W^2j`, `W^3j` and a
//! 4-point DFT whose odd difference is rotated by `-j`.

use std::sync::Arc;

use crate::bitrev::{digit_reversal_table, permute};
use crate::config::{Algorithm, TransformConfig};
use crate::engine::{EngineCaches, EngineCore, FftEngine, OptimizationLevel};
use crate::error::FftError;
use crate::num::{Complex, Float};
use crate::twiddle::FftNum;

#[inline(always)]
fn butterfly4<T: Float>(
    a: Complex<T>,
    b: Complex<T>,
    c: Complex<T>,
    d: Complex<T>,
) -> (Complex<T>, Complex<T>, Complex<T>, Complex<T>) {
    let t0 = a.add(c);
    let t1 = a.sub(c);
    let t2 = b.add(d);
    let t3 = b.sub(d).mul_neg_j();
    (t0.add(t2), t1.add(t3), t0.sub(t2), t1.sub(t3))
}

struct Radix4Tables<T: Float> {
    digit_reversal: Arc<[usize]>,
    twiddles: Arc<[Complex<T>]>,
}

impl<T: FftNum> Radix4Tables<T> {
    fn build(n: usize, caches: &EngineCaches<T>) -> Result<Self, FftError> {
        Ok(Self {
            digit_reversal: Arc::from(digit_reversal_table(n)?),
            twiddles: caches.twiddle_table(n),
        })
    }
}

/// Engine running a radix-4 transform; rejects sizes that are powers of
/// two but not of four (8, 32, ...).
pub struct Radix4Engine<T: FftNum> {
    core: EngineCore<T>,
    tables: Radix4Tables<T>,
}

impl<T: FftNum> Radix4Engine<T> {
    pub fn new(config: TransformConfig) -> Result<Self, FftError> {
        Self::with_caches(config, EngineCaches::shared())
    }

    pub fn with_caches(config: TransformConfig, caches: EngineCaches<T>) -> Result<Self, FftError> {
        let mut core = EngineCore::new(config, Algorithm::Radix4, caches)?;
        let tables = Radix4Tables::build(config.size, core.caches())?;
        core.mark_ready();
        log::debug!("radix4 engine ready (n={})", config.size);
        Ok(Self { core, tables })
    }
}

impl<T: FftNum> FftEngine<T> for Radix4Engine<T> {
    fn core(&self) -> &EngineCore<T> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EngineCore<T> {
        &mut self.core
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Radix4
    }

    fn optimization_level(&self) -> OptimizationLevel {
        OptimizationLevel::High
    }

    fn rebuild(&mut self, size: usize) -> Result<(), FftError> {
        self.tables = Radix4Tables::build(size, self.core.caches())?;
        Ok(())
    }

    fn process(&self, buf: &mut [Complex<T>]) {
        let n = buf.len();
        if n <= 1 {
            return;
        }
        permute(buf, &self.tables.digit_reversal);
        let tw = &self.tables.twiddles;
        let mut len = 4;
        while len <= n {
            let quarter = len / 4;
            let stride = n / len;
            for start in (0..n).step_by(len) {
                for j in 0..quarter {
                    let i0 = start + j;
                    let i1 = i0 + quarter;
                    let i2 = i1 + quarter;
                    let i3 = i2 + quarter;
                    let a = buf[i0];
                    let b = buf[i1].mul(tw[j * stride]);
                    let c = buf[i2].mul(tw[2 * j * stride]);
                    let d = buf[i3].mul(tw[3 * j * stride]);
                    let (x0, x1, x2, x3) = butterfly4(a, b, c, d);
                    buf[i0] = x0;
                    buf[i1] = x1;
                    buf[i2] = x2;
                    buf[i3] = x3;
                }
            }
            len <<= 2;
        }
    }
}
