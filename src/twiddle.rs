//! Memoized twiddle factors `W_N^k = e^{-2πik/N}`.
//!
//! Entries are keyed by `(N, k)` and evicted in insertion order once the
//! cache holds more than its capacity. Hit and miss counters are kept for
//! diagnostics only.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, OnceLock};

use hashbrown::HashMap;

use crate::config::cache_limits;
use crate::num::{Complex, Float};

/// Shared handle to a twiddle cache.
pub type SharedTwiddleCache<T> = Arc<Mutex<TwiddleCache<T>>>;

/// Compute `e^{-2πik/n}` without consulting any cache.
///
/// `k` is reduced modulo `n` first so the angle stays in `(-2π, 0]`.
/// A zero-length transform has no roots of unity; `n == 0` yields `1`.
pub fn twiddle<T: Float>(n: usize, k: usize) -> Complex<T> {
    if n == 0 {
        return Complex::one();
    }
    let k = k % n;
    let angle = -2.0 * core::f64::consts::PI * (k as f64) / (n as f64);
    Complex::expi(angle)
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache, `0.0` before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// FIFO-bounded cache of twiddle factors.
pub struct TwiddleCache<T: Float> {
    entries: HashMap<(usize, usize), Complex<T>>,
    /// Insertion order, oldest first.
    order: VecDeque<(usize, usize)>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl<T: Float> Default for TwiddleCache<T> {
    fn default() -> Self {
        Self::new(cache_limits().twiddle_capacity)
    }
}

impl<T: Float> TwiddleCache<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Return `e^{-2πik/n}`, computing and storing it on a miss.
    pub fn get(&mut self, n: usize, k: usize) -> Complex<T> {
        if let Some(&w) = self.entries.get(&(n, k)) {
            self.hits += 1;
            return w;
        }
        self.misses += 1;
        let w = twiddle(n, k);
        self.insert((n, k), w);
        w
    }

    fn insert(&mut self, key: (usize, usize), w: Complex<T>) {
        self.entries.insert(key, w);
        self.order.push_back(key);
        let mut evicted = 0usize;
        while self.entries.len() > self.capacity {
            match self.order.pop_front() {
                Some(old) => {
                    self.entries.remove(&old);
                    evicted += 1;
                }
                None => break,
            }
        }
        if evicted > 0 {
            log::trace!("twiddle cache evicted {evicted} entries (capacity {})", self.capacity);
        }
    }

    /// Fill every `k in 0..n` and return the full table in index order.
    pub fn precompute(&mut self, n: usize) -> Vec<Complex<T>> {
        (0..n).map(|k| self.get(n, k)).collect()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
            capacity: self.capacity,
        }
    }

    pub fn hit_rate(&self) -> f64 {
        self.stats().hit_rate()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

/// Sample types that own a process-wide twiddle cache.
pub trait FftNum: Float {
    fn shared_twiddles() -> SharedTwiddleCache<Self>;
}

static SHARED_TWIDDLES_F32: OnceLock<SharedTwiddleCache<f32>> = OnceLock::new();
static SHARED_TWIDDLES_F64: OnceLock<SharedTwiddleCache<f64>> = OnceLock::new();

impl FftNum for f32 {
    fn shared_twiddles() -> SharedTwiddleCache<Self> {
        Arc::clone(SHARED_TWIDDLES_F32.get_or_init(|| Arc::new(Mutex::new(TwiddleCache::default()))))
    }
}

impl FftNum for f64 {
    fn shared_twiddles() -> SharedTwiddleCache<Self> {
        Arc::clone(SHARED_TWIDDLES_F64.get_or_init(|| Arc::new(Mutex::new(TwiddleCache::default()))))
    }
}
