//! Bit-reversal permutation tables for power-of-two transforms.
//!
//! [`BitReversalCache`] keeps one table per size up to a configurable limit;
//! larger sizes are recomputed on every request so a single huge transform
//! cannot pin its table in memory for the life of the process.

use std::sync::{Arc, Mutex, OnceLock};

use hashbrown::HashMap;

use crate::config::{cache_limits, Algorithm};
use crate::error::FftError;

/// Shared handle to a bit-reversal cache.
pub type SharedBitReversal = Arc<Mutex<BitReversalCache>>;

/// Reverse the lowest `bits` bits of `i`.
#[inline]
pub fn reverse_bits(i: usize, bits: u32) -> usize {
    if bits == 0 {
        0
    } else {
        i.reverse_bits() >> (usize::BITS - bits)
    }
}

/// Build `P[i] = reverse_bits(i, log2 n)` for a power-of-two `n`.
pub fn bit_reversal_table(n: usize) -> Result<Vec<usize>, FftError> {
    if !n.is_power_of_two() {
        return Err(FftError::unsupported(Algorithm::Radix2, n));
    }
    let bits = n.trailing_zeros();
    Ok((0..n).map(|i| reverse_bits(i, bits)).collect())
}

/// Build the base-4 digit-reversal table used by the radix-4 kernel.
///
/// `n` must be a power of four; entry `i` holds `i` with its base-4 digits
/// reversed over `log4 n` digits.
pub fn digit_reversal_table(n: usize) -> Result<Vec<usize>, FftError> {
    if !crate::factory::is_power_of_four(n) {
        return Err(FftError::unsupported(Algorithm::Radix4, n));
    }
    let digits = n.trailing_zeros() / 2;
    let table = (0..n)
        .map(|i| {
            let mut x = i;
            let mut rev = 0usize;
            for _ in 0..digits {
                rev = (rev << 2) | (x & 3);
                x >>= 2;
            }
            rev
        })
        .collect();
    Ok(table)
}

/// Apply an involutive permutation in place.
///
/// Elements are swapped only when `i < table[i]`, so every pair moves once.
pub fn permute<C>(buf: &mut [C], table: &[usize]) {
    debug_assert_eq!(buf.len(), table.len());
    for (i, &j) in table.iter().enumerate() {
        if i < j {
            buf.swap(i, j);
        }
    }
}

/// Lazily populated bit-reversal tables keyed by transform size.
#[derive(Debug)]
pub struct BitReversalCache {
    tables: HashMap<usize, Arc<[usize]>>,
    max_cached: usize,
}

impl Default for BitReversalCache {
    fn default() -> Self {
        Self::new(cache_limits().bitrev_max_cached)
    }
}

impl BitReversalCache {
    /// Create a cache that stores tables for sizes up to `max_cached`.
    pub fn new(max_cached: usize) -> Self {
        Self {
            tables: HashMap::new(),
            max_cached,
        }
    }

    /// Fetch the table for `n`, building it on first use.
    ///
    /// Fails with [`FftError::UnsupportedSize`] when `n` is not a power of two.
    pub fn get(&mut self, n: usize) -> Result<Arc<[usize]>, FftError> {
        if let Some(table) = self.tables.get(&n) {
            return Ok(Arc::clone(table));
        }
        let table: Arc<[usize]> = Arc::from(bit_reversal_table(n)?);
        if self.is_cacheable(n) {
            log::trace!("bit-reversal table built for n={n}");
            self.tables.insert(n, Arc::clone(&table));
        } else {
            log::trace!(
                "bit-reversal table for n={n} exceeds cache limit {}; not cached",
                self.max_cached
            );
        }
        Ok(table)
    }

    pub fn is_cacheable(&self, n: usize) -> bool {
        n <= self.max_cached
    }

    pub fn contains(&self, n: usize) -> bool {
        self.tables.contains_key(&n)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }
}

static SHARED_BIT_REVERSAL: OnceLock<SharedBitReversal> = OnceLock::new();

/// Process-wide bit-reversal cache.
pub fn shared_bit_reversal() -> SharedBitReversal {
    Arc::clone(SHARED_BIT_REVERSAL.get_or_init(|| Arc::new(Mutex::new(BitReversalCache::default()))))
}
