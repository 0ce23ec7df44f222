//! Shared engine contract: validation, normalization, statistics and result
//! assembly.
//!
//! Every transform variant implements [`FftEngine`] by supplying an
//! unnormalized in-place forward kernel ([`FftEngine::process`]) and the
//! table rebuild used on size changes. The public operations (`forward`,
//! `forward_complex`, `inverse`, `update_config`, `verify_accuracy`) are
//! provided methods on top of those.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::bitrev::{shared_bit_reversal, BitReversalCache, SharedBitReversal};
use crate::config::{validate_sample_rate, Algorithm, ConfigUpdate, TransformConfig};
use crate::error::FftError;
use crate::factory::supports_size;
use crate::num::{deinterleave, interleave, Complex, Float};
use crate::twiddle::{FftNum, SharedTwiddleCache, TwiddleCache};

fn lock<C>(mutex: &Mutex<C>) -> MutexGuard<'_, C> {
    // Cached values are pure functions of their keys, so a poisoned cache
    // is still consistent.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Caches an engine draws its tables from.
///
/// [`EngineCaches::shared`] hands out the process-wide singletons;
/// [`EngineCaches::isolated`] builds fresh ones, which keeps cache counters
/// independent between tests.
pub struct EngineCaches<T: FftNum> {
    pub twiddles: SharedTwiddleCache<T>,
    pub bit_reversal: SharedBitReversal,
}

impl<T: FftNum> Clone for EngineCaches<T> {
    fn clone(&self) -> Self {
        Self {
            twiddles: Arc::clone(&self.twiddles),
            bit_reversal: Arc::clone(&self.bit_reversal),
        }
    }
}

impl<T: FftNum> Default for EngineCaches<T> {
    fn default() -> Self {
        Self::shared()
    }
}

impl<T: FftNum> EngineCaches<T> {
    pub fn shared() -> Self {
        Self {
            twiddles: T::shared_twiddles(),
            bit_reversal: shared_bit_reversal(),
        }
    }

    pub fn isolated() -> Self {
        Self {
            twiddles: Arc::new(Mutex::new(TwiddleCache::default())),
            bit_reversal: Arc::new(Mutex::new(BitReversalCache::default())),
        }
    }

    /// Full length-`n` table of `e^{-2πik/n}`.
    pub fn twiddle_table(&self, n: usize) -> Arc<[Complex<T>]> {
        Arc::from(lock(&self.twiddles).precompute(n))
    }

    pub fn bit_reversal_table(&self, n: usize) -> Result<Arc<[usize]>, FftError> {
        lock(&self.bit_reversal).get(n)
    }

    pub fn twiddle_stats(&self) -> crate::twiddle::CacheStats {
        lock(&self.twiddles).stats()
    }

    /// Drop every cached table and reset the hit/miss counters.
    ///
    /// Engines already built keep the tables they hold.
    pub fn clear(&self) {
        lock(&self.twiddles).clear();
        lock(&self.bit_reversal).clear();
    }
}

/// Lifecycle of an engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Constructed,
    /// Configuration accepted, derived tables not built yet.
    Validated,
    Ready,
    Busy,
}

/// How much structure a variant exploits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum OptimizationLevel {
    /// Any size, at the cost of a padded convolution.
    General,
    /// Power-of-two butterflies.
    Standard,
    /// Fewer multiplications than radix-2 for the sizes it accepts.
    High,
}

/// Static description of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineInfo {
    pub algorithm: Algorithm,
    pub size: usize,
    /// Size of the transform actually executed internally.
    pub internal_size: usize,
    pub optimization: OptimizationLevel,
}

/// Per-instance call counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineStats {
    pub forward_calls: u64,
    pub inverse_calls: u64,
    pub total_time: Duration,
    pub last_time: Duration,
}

impl EngineStats {
    pub fn calls(&self) -> u64 {
        self.forward_calls + self.inverse_calls
    }

    pub fn average_time(&self) -> Duration {
        match u32::try_from(self.calls()) {
            Ok(0) => Duration::ZERO,
            Ok(calls) => self.total_time / calls,
            Err(_) => Duration::from_secs_f64(self.total_time.as_secs_f64() / self.calls() as f64),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Inverse,
}

/// State every engine carries: configuration, caches, counters, lifecycle.
pub struct EngineCore<T: FftNum> {
    config: TransformConfig,
    caches: EngineCaches<T>,
    stats: EngineStats,
    state: EngineState,
}

impl<T: FftNum> EngineCore<T> {
    /// Validate `config` for `algorithm` and record it.
    ///
    /// The stored config carries `algorithm`, never [`Algorithm::Auto`].
    pub fn new(
        config: TransformConfig,
        algorithm: Algorithm,
        caches: EngineCaches<T>,
    ) -> Result<Self, FftError> {
        let mut core = Self {
            config: TransformConfig {
                algorithm,
                ..config
            },
            caches,
            stats: EngineStats::default(),
            state: EngineState::Constructed,
        };
        config.validate()?;
        if !supports_size(algorithm, config.size) {
            return Err(FftError::unsupported(algorithm, config.size));
        }
        core.state = EngineState::Validated;
        Ok(core)
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn caches(&self) -> &EngineCaches<T> {
        &self.caches
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Mark derived tables as built.
    pub fn mark_ready(&mut self) {
        self.state = EngineState::Ready;
    }

    fn begin(&mut self) -> Instant {
        self.state = EngineState::Busy;
        Instant::now()
    }

    fn finish(&mut self, started: Instant, direction: Direction) {
        let elapsed = started.elapsed();
        match direction {
            Direction::Forward => self.stats.forward_calls += 1,
            Direction::Inverse => self.stats.inverse_calls += 1,
        }
        self.stats.total_time += elapsed;
        self.stats.last_time = elapsed;
        self.state = EngineState::Ready;
    }

    fn assemble(&self, spectrum: &[Complex<T>]) -> TransformResult<T> {
        TransformResult::from_spectrum(spectrum, self.config.sample_rate)
    }
}

/// Spectrum of one transform call; every field has the configured length.
///
/// Everything except `real` and `imag` is derived from those two.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult<T: Float> {
    pub real: Vec<T>,
    pub imag: Vec<T>,
    pub magnitude: Vec<T>,
    pub phase: Vec<T>,
    pub power: Vec<T>,
    /// Bin centre frequency `k · sample_rate / N` in Hz.
    pub frequency: Vec<T>,
}

impl<T: Float> TransformResult<T> {
    /// Split `spectrum` and derive magnitude, phase, power and frequency.
    pub(crate) fn from_spectrum(spectrum: &[Complex<T>], sample_rate: f64) -> Self {
        let n = spectrum.len();
        let (real, imag) = deinterleave(spectrum);
        let magnitude = spectrum.iter().map(|c| c.norm()).collect();
        let phase = spectrum.iter().map(|c| c.arg()).collect();
        let power = spectrum.iter().map(|c| c.norm_sqr()).collect();
        let frequency = (0..n)
            .map(|k| T::from_f64(k as f64 * sample_rate / n as f64))
            .collect();
        Self {
            real,
            imag,
            magnitude,
            phase,
            power,
            frequency,
        }
    }

    pub fn len(&self) -> usize {
        self.real.len()
    }

    pub fn is_empty(&self) -> bool {
        self.real.is_empty()
    }

    /// Index of the largest magnitude; the lowest index wins ties.
    pub fn peak_bin(&self) -> Option<usize> {
        let mut best: Option<(usize, T)> = None;
        for (k, &m) in self.magnitude.iter().enumerate() {
            match best {
                Some((_, b)) if !(m > b) => {}
                _ => best = Some((k, m)),
            }
        }
        best.map(|(k, _)| k)
    }

    pub fn bin_frequency(&self, k: usize) -> Option<T> {
        self.frequency.get(k).copied()
    }
}

/// Outcome of [`FftEngine::verify_accuracy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccuracyReport {
    pub dc: bool,
    pub single_tone: bool,
    pub impulse: bool,
    pub round_trip: bool,
}

impl AccuracyReport {
    pub fn all_passed(&self) -> bool {
        self.dc && self.single_tone && self.impulse && self.round_trip
    }
}

/// Common interface of every transform variant.
///
/// Engines are single-threaded: calls take `&mut self` and block until the
/// transform is complete.
pub trait FftEngine<T: FftNum> {
    fn core(&self) -> &EngineCore<T>;

    fn core_mut(&mut self) -> &mut EngineCore<T>;

    fn algorithm(&self) -> Algorithm;

    fn optimization_level(&self) -> OptimizationLevel;

    /// Size of the transform executed internally.
    fn internal_size(&self) -> usize {
        self.size()
    }

    /// Rebuild every derived table for `size`.
    ///
    /// Must leave the engine untouched when it fails.
    fn rebuild(&mut self, size: usize) -> Result<(), FftError>;

    /// Unnormalized forward DFT in place; `buffer.len()` equals the
    /// configured size.
    fn process(&self, buffer: &mut [Complex<T>]);

    /// Forward DFT of a real sequence.
    fn process_real(&self, input: &[T]) -> Vec<Complex<T>> {
        let mut buffer: Vec<Complex<T>> =
            input.iter().map(|&x| Complex::new(x, T::zero())).collect();
        self.process(&mut buffer);
        buffer
    }

    /// Unnormalized inverse DFT in place, by conjugate-forward-conjugate.
    fn process_inverse(&self, buffer: &mut [Complex<T>]) {
        for c in buffer.iter_mut() {
            *c = c.conj();
        }
        self.process(buffer);
        for c in buffer.iter_mut() {
            *c = c.conj();
        }
    }

    fn config(&self) -> &TransformConfig {
        self.core().config()
    }

    fn size(&self) -> usize {
        self.core().config().size
    }

    fn state(&self) -> EngineState {
        self.core().state()
    }

    fn stats(&self) -> EngineStats {
        *self.core().stats()
    }

    fn reset_stats(&mut self) {
        self.core_mut().stats = EngineStats::default();
    }

    fn describe(&self) -> EngineInfo {
        EngineInfo {
            algorithm: self.algorithm(),
            size: self.size(),
            internal_size: self.internal_size(),
            optimization: self.optimization_level(),
        }
    }

    /// Fail with [`FftError::InputShape`] unless `len` is the configured size.
    fn validate_input(&self, len: usize) -> Result<(), FftError> {
        FftError::check_len(self.size(), len)
    }

    /// DFT of a real sequence. `real` is never modified.
    fn forward(&mut self, real: &[T]) -> Result<TransformResult<T>, FftError> {
        self.validate_input(real.len())?;
        let started = self.core_mut().begin();
        let spectrum = self.process_real(real);
        self.core_mut().finish(started, Direction::Forward);
        Ok(self.core().assemble(&spectrum))
    }

    /// DFT of a complex sequence given as split arrays.
    fn forward_complex(&mut self, real: &[T], imag: &[T]) -> Result<TransformResult<T>, FftError> {
        self.validate_input(real.len())?;
        self.validate_input(imag.len())?;
        let mut buffer = interleave(real, imag);
        let started = self.core_mut().begin();
        self.process(&mut buffer);
        self.core_mut().finish(started, Direction::Forward);
        Ok(self.core().assemble(&buffer))
    }

    /// Inverse DFT. Scaled by `1/N` only when the config sets `normalize`.
    fn inverse(&mut self, real: &[T], imag: &[T]) -> Result<TransformResult<T>, FftError> {
        self.validate_input(real.len())?;
        self.validate_input(imag.len())?;
        let mut buffer = interleave(real, imag);
        let started = self.core_mut().begin();
        self.process_inverse(&mut buffer);
        if self.config().normalize {
            let scale = T::one() / T::from_f64(buffer.len() as f64);
            for c in buffer.iter_mut() {
                *c = c.scale(scale);
            }
        }
        self.core_mut().finish(started, Direction::Inverse);
        Ok(self.core().assemble(&buffer))
    }

    /// Apply a partial configuration update.
    ///
    /// `normalize` and `sample_rate` take effect immediately. A new `size`
    /// rebuilds all tables and fails with [`FftError::UnsupportedSize`] if
    /// this variant cannot handle it; on any error the engine is unchanged.
    fn update_config(&mut self, update: ConfigUpdate) -> Result<(), FftError> {
        let current = *self.config();
        let size = update.size.unwrap_or(current.size);
        if size == 0 {
            return Err(FftError::configuration(size, "size must be positive"));
        }
        if let Some(rate) = update.sample_rate {
            validate_sample_rate(size, rate)?;
        }
        if size != current.size {
            if !supports_size(self.algorithm(), size) {
                return Err(FftError::unsupported(self.algorithm(), size));
            }
            self.core_mut().state = EngineState::Validated;
            if let Err(err) = self.rebuild(size) {
                self.core_mut().mark_ready();
                return Err(err);
            }
            log::debug!(
                "{} engine reinitialized: size {} -> {}",
                self.algorithm(),
                current.size,
                size
            );
        }
        let core = self.core_mut();
        core.config.size = size;
        if let Some(normalize) = update.normalize {
            core.config.normalize = normalize;
        }
        if let Some(rate) = update.sample_rate {
            core.config.sample_rate = rate;
        }
        core.mark_ready();
        Ok(())
    }

    /// Run the built-in self-tests at the configured size.
    ///
    /// Checks the DC response, single-tone peak location, impulse flat
    /// spectrum and a forward/inverse round trip. The report is diagnostic
    /// only.
    fn verify_accuracy(&mut self) -> AccuracyReport {
        let n = self.size();
        let nf = n as f64;
        let tol = accuracy_tolerance::<T>(n);
        let zeros = vec![T::zero(); n];

        let dc = self
            .forward(&vec![T::one(); n])
            .map(|r| {
                r.magnitude.iter().enumerate().all(|(k, &m)| {
                    let expected = if k == 0 { nf } else { 0.0 };
                    (m.to_f64() - expected).abs() <= tol * nf
                })
            })
            .unwrap_or(false);

        let bin = if n > 1 { (n / 4).max(1) } else { 0 };
        let (tone_re, tone_im): (Vec<T>, Vec<T>) = (0..n)
            .map(|i| {
                let angle = 2.0 * core::f64::consts::PI * ((bin * i) % n) as f64 / nf;
                (T::from_f64(libm::cos(angle)), T::from_f64(libm::sin(angle)))
            })
            .unzip();
        let single_tone = self
            .forward_complex(&tone_re, &tone_im)
            .map(|r| {
                r.peak_bin() == Some(bin) && (r.magnitude[bin].to_f64() - nf).abs() <= tol * nf
            })
            .unwrap_or(false);

        let mut impulse_input = zeros.clone();
        impulse_input[0] = T::one();
        let impulse = self
            .forward(&impulse_input)
            .map(|r| r.magnitude.iter().all(|&m| (m.to_f64() - 1.0).abs() <= tol))
            .unwrap_or(false);

        let signal: Vec<T> = (0..n)
            .map(|i| T::from_f64(libm::sin(0.37 * i as f64) + 0.5 * libm::cos(1.3 * i as f64)))
            .collect();
        let round_trip = self
            .forward(&signal)
            .and_then(|spectrum| self.inverse(&spectrum.real, &spectrum.imag))
            .map(|back| {
                let scale = if self.config().normalize { 1.0 } else { 1.0 / nf };
                back.real
                    .iter()
                    .zip(signal.iter())
                    .all(|(&y, &x)| (y.to_f64() * scale - x.to_f64()).abs() <= tol * 2.0)
            })
            .unwrap_or(false);

        let report = AccuracyReport {
            dc,
            single_tone,
            impulse,
            round_trip,
        };
        if !report.all_passed() {
            log::debug!(
                "{} engine (n={n}) failed accuracy self-test: {report:?}",
                self.algorithm()
            );
        }
        report
    }
}

/// Absolute tolerance relative to unit-scale data for an `n`-point
/// transform in precision `T`.
fn accuracy_tolerance<T: Float>(n: usize) -> f64 {
    let stages = (usize::BITS - n.leading_zeros()) as f64 + 1.0;
    T::epsilon().to_f64().sqrt() * stages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_fields_are_derived() {
        let spectrum = [Complex::new(3.0f64, 4.0), Complex::new(0.0, -2.0)];
        let r = TransformResult::from_spectrum(&spectrum, 8.0);
        assert_eq!(r.real, vec![3.0, 0.0]);
        assert_eq!(r.imag, vec![4.0, -2.0]);
        assert_eq!(r.magnitude, vec![5.0, 2.0]);
        assert_eq!(r.power, vec![25.0, 4.0]);
        assert_eq!(r.frequency, vec![0.0, 4.0]);
        assert!((r.phase[1] + core::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(r.len(), 2);
        assert_eq!(r.bin_frequency(1), Some(4.0));
        assert_eq!(r.bin_frequency(2), None);
    }

    #[test]
    fn peak_bin_prefers_first_maximum() {
        let spectrum: Vec<Complex<f32>> = [1.0f32, 3.0, 3.0, 0.0]
            .iter()
            .map(|&re| Complex::new(re, 0.0))
            .collect();
        let r = TransformResult::from_spectrum(&spectrum, 4.0);
        assert_eq!(r.peak_bin(), Some(1));
        let empty = TransformResult::<f32>::from_spectrum(&[], 1.0);
        assert_eq!(empty.peak_bin(), None);
        assert!(empty.is_empty());
    }

    #[test]
    fn derived_fields_agree_with_split_buffer_ops() {
        let spectrum: Vec<Complex<f64>> = (0..7)
            .map(|k| Complex::new(k as f64 - 3.0, 0.5 * k as f64 - 1.0))
            .collect();
        let r = TransformResult::from_spectrum(&spectrum, 7.0);
        let mut expected = vec![0.0; 7];
        crate::complex_ops::magnitude(&r.real, &r.imag, &mut expected).unwrap();
        assert_eq!(r.magnitude, expected);
        crate::complex_ops::phase(&r.real, &r.imag, &mut expected).unwrap();
        assert_eq!(r.phase, expected);
        crate::complex_ops::power(&r.real, &r.imag, &mut expected).unwrap();
        assert_eq!(r.power, expected);
        assert_eq!(r.frequency, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn stats_average() {
        let stats = EngineStats {
            forward_calls: 3,
            inverse_calls: 1,
            total_time: Duration::from_millis(8),
            last_time: Duration::from_millis(1),
        };
        assert_eq!(stats.calls(), 4);
        assert_eq!(stats.average_time(), Duration::from_millis(2));
        assert_eq!(EngineStats::default().average_time(), Duration::ZERO);
    }

    #[test]
    fn core_rejects_bad_configs() {
        let caches = EngineCaches::<f32>::isolated();
        assert!(matches!(
            EngineCore::new(TransformConfig::new(0), Algorithm::Radix2, caches.clone()),
            Err(FftError::Configuration { .. })
        ));
        assert_eq!(
            EngineCore::new(TransformConfig::new(12), Algorithm::Radix2, caches.clone()).err(),
            Some(FftError::UnsupportedSize {
                algorithm: Algorithm::Radix2,
                size: 12
            })
        );
        let core = EngineCore::new(TransformConfig::new(12), Algorithm::MixedRadix, caches).unwrap();
        assert_eq!(core.state(), EngineState::Validated);
        assert_eq!(core.config().algorithm, Algorithm::MixedRadix);
    }

    #[test]
    fn tolerance_grows_with_size_and_shrinks_with_precision() {
        assert!(accuracy_tolerance::<f32>(1024) > accuracy_tolerance::<f32>(8));
        assert!(accuracy_tolerance::<f64>(1024) < accuracy_tolerance::<f32>(1024));
    }
}
