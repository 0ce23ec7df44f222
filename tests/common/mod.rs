#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spectrafft::{Algorithm, EngineCaches, FftEngine, FftFactory, FftNum, Float, TransformConfig};

/// Every explicit variant with sizes it accepts.
pub const CASES: [(Algorithm, &[usize]); 4] = [
    (Algorithm::Radix2, &[1, 2, 8, 64, 512]),
    (Algorithm::Radix4, &[1, 4, 64, 256, 1024]),
    (Algorithm::MixedRadix, &[1, 3, 5, 12, 100, 1000]),
    (Algorithm::RealOptimized, &[1, 2, 8, 256, 1024]),
];

pub fn engine<T: FftNum>(algorithm: Algorithm, size: usize) -> Box<dyn FftEngine<T>> {
    FftFactory::with_caches(EngineCaches::isolated())
        .create(TransformConfig::new(size).with_algorithm(algorithm))
        .unwrap()
}

pub fn random_signal<T: Float>(seed: u64, n: usize) -> Vec<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| T::from_f64(rng.gen_range(-1.0..1.0))).collect()
}

/// O(N²) reference DFT in `f64`.
pub fn naive_dft(re: &[f64], im: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = re.len();
    let mut out_re = vec![0.0; n];
    let mut out_im = vec![0.0; n];
    for k in 0..n {
        for j in 0..n {
            let angle = -2.0 * std::f64::consts::PI * ((j * k) % n) as f64 / n as f64;
            let (s, c) = angle.sin_cos();
            out_re[k] += re[j] * c - im[j] * s;
            out_im[k] += re[j] * s + im[j] * c;
        }
    }
    (out_re, out_im)
}
