mod common;

use common::{engine, naive_dft, random_signal, CASES};
use proptest::prelude::*;
use spectrafft::{create_auto, Algorithm, FftEngine};

#[test]
fn every_variant_matches_reference_dft() {
    for (algorithm, sizes) in CASES {
        for &n in sizes.iter().filter(|&&n| n <= 256) {
            let re = random_signal::<f64>(1, n);
            let im = random_signal::<f64>(2, n);
            let (er, ei) = naive_dft(&re, &im);
            let r = engine::<f64>(algorithm, n).forward_complex(&re, &im).unwrap();
            for k in 0..n {
                assert!((r.real[k] - er[k]).abs() < 1e-9, "{algorithm} n={n} k={k}");
                assert!((r.imag[k] - ei[k]).abs() < 1e-9, "{algorithm} n={n} k={k}");
            }
        }
    }
}

#[test]
fn bluestein_odd_sizes_match_reference() {
    for n in [15usize, 17, 31, 100, 243] {
        let re = random_signal::<f64>(n as u64, n);
        let zeros = vec![0.0; n];
        let (er, ei) = naive_dft(&re, &zeros);
        let r = engine::<f64>(Algorithm::MixedRadix, n).forward(&re).unwrap();
        for k in 0..n {
            assert!((r.real[k] - er[k]).abs() < 1e-9, "n={n} k={k}");
            assert!((r.imag[k] - ei[k]).abs() < 1e-9, "n={n} k={k}");
        }
    }
}

proptest! {
    #[test]
    fn prop_auto_engine_matches_reference(signal in proptest::collection::vec(-100.0f64..100.0, 1..=64)) {
        let n = signal.len();
        let zeros = vec![0.0; n];
        let (er, ei) = naive_dft(&signal, &zeros);
        let mut fft = create_auto::<f64>(n).unwrap();
        let r = fft.forward(&signal).unwrap();
        for k in 0..n {
            prop_assert!((r.real[k] - er[k]).abs() < 1e-6);
            prop_assert!((r.imag[k] - ei[k]).abs() < 1e-6);
        }
        let back = fft.inverse(&r.real, &r.imag).unwrap();
        for (y, x) in back.real.iter().zip(signal.iter()) {
            prop_assert!((y / n as f64 - x).abs() < 1e-8);
        }
    }
}
