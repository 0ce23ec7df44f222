mod common;

use common::{engine, CASES};
use spectrafft::{
    Algorithm, BluesteinEngine, ConfigUpdate, EngineCaches, EngineState, FftEngine, FftError,
    OptimizationLevel, Radix2Engine, Radix4Engine, RealFftEngine, TransformConfig,
};

#[test]
fn exact_four_point_impulse() {
    let mut fft = Radix2Engine::<f64>::new(TransformConfig::new(4).with_algorithm(Algorithm::Radix2))
        .unwrap();
    let r = fft.forward(&[1.0, 0.0, 0.0, 0.0]).unwrap();
    assert_eq!(r.real, vec![1.0, 1.0, 1.0, 1.0]);
    assert_eq!(r.imag, vec![0.0, 0.0, 0.0, 0.0]);
    assert_eq!(r.magnitude, vec![1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn sine_at_1khz_peaks_in_bin_23() {
    let n = 1024;
    let rate = 44_100.0;
    let x: Vec<f64> = (0..n)
        .map(|i| (2.0 * std::f64::consts::PI * 1000.0 * i as f64 / rate).sin())
        .collect();
    // 1024 is a power of four, so every variant accepts it.
    for (algorithm, _) in CASES {
        let mut fft = engine::<f64>(algorithm, n);
        let r = fft.forward(&x).unwrap();
        let peak = r.peak_bin().unwrap();
        // Only the first half is unambiguous for a real input.
        let half_peak = (0..n / 2)
            .max_by(|&a, &b| r.magnitude[a].total_cmp(&r.magnitude[b]))
            .unwrap();
        assert_eq!(half_peak, 23, "{algorithm}");
        assert!(peak == 23 || peak == n - 23, "{algorithm}: peak {peak}");
        assert!((r.magnitude[23] - 512.0).abs() < 0.15 * 512.0, "{}", r.magnitude[23]);
        let f = r.bin_frequency(23).unwrap();
        assert!((f - 23.0 * rate / n as f64).abs() < 1e-9);
    }
}

#[test]
fn size_contracts() {
    let radix2 = Radix2Engine::<f32>::new(TransformConfig::new(100).with_algorithm(Algorithm::Radix2));
    assert!(matches!(radix2, Err(FftError::UnsupportedSize { size: 100, .. })));

    let radix4 = Radix4Engine::<f32>::new(TransformConfig::new(8).with_algorithm(Algorithm::Radix4));
    assert!(matches!(radix4, Err(FftError::UnsupportedSize { size: 8, .. })));

    let real = RealFftEngine::<f32>::new(TransformConfig::new(12));
    assert!(matches!(real, Err(FftError::UnsupportedSize { size: 12, .. })));

    assert!(BluesteinEngine::<f32>::new(TransformConfig::new(100)).is_ok());
    assert!(BluesteinEngine::<f32>::new(TransformConfig::new(1)).is_ok());

    for (algorithm, _) in CASES {
        let zero = spectrafft::create::<f64>(TransformConfig::new(0).with_algorithm(algorithm));
        assert!(matches!(zero.err(), Some(FftError::Configuration { size: 0, .. })));
    }
}

#[test]
fn bad_sample_rate_is_a_configuration_error() {
    let cfg = TransformConfig::new(16).with_sample_rate(-1.0);
    assert!(matches!(
        Radix2Engine::<f64>::new(cfg),
        Err(FftError::Configuration { .. })
    ));
    let mut fft = engine::<f64>(Algorithm::Radix4, 16);
    assert!(matches!(
        fft.update_config(ConfigUpdate::sample_rate(f64::NAN)),
        Err(FftError::Configuration { .. })
    ));
    assert_eq!(fft.config().sample_rate, 44_100.0);
}

#[test]
fn mismatched_lengths_are_input_shape_errors() {
    for (algorithm, _) in CASES {
        let mut fft = engine::<f64>(algorithm, 16);
        assert_eq!(
            fft.forward(&[0.0; 15]).err(),
            Some(FftError::InputShape {
                expected: 16,
                actual: 15
            })
        );
        assert_eq!(
            fft.forward_complex(&[0.0; 16], &[0.0; 17]).err(),
            Some(FftError::InputShape {
                expected: 16,
                actual: 17
            })
        );
        assert!(fft.inverse(&[0.0; 8], &[0.0; 8]).is_err());
        assert_eq!(fft.stats().calls(), 0);
    }
}

#[test]
fn inputs_are_not_mutated() {
    // 16 is accepted by every variant.
    let re: Vec<f64> = (0..16).map(|i| (i as f64 * 0.75).sin() - 0.5).collect();
    let im: Vec<f64> = (0..16).map(|i| (i % 3) as f64).collect();
    let (re_copy, im_copy) = (re.clone(), im.clone());
    let mut checked = Vec::new();
    for (algorithm, _) in CASES {
        let mut fft = engine::<f64>(algorithm, 16);
        fft.forward(&re).unwrap();
        fft.forward_complex(&re, &im).unwrap();
        fft.inverse(&re, &im).unwrap();
        assert_eq!(re, re_copy, "{algorithm}");
        assert_eq!(im, im_copy, "{algorithm}");
        checked.push(algorithm);
    }
    assert_eq!(checked.len(), CASES.len());
}

#[test]
fn resizing_keeps_variant_contract() {
    let mut fft = engine::<f64>(Algorithm::Radix2, 64);
    fft.update_config(ConfigUpdate::size(128)).unwrap();
    assert_eq!(fft.size(), 128);
    assert_eq!(fft.forward(&vec![1.0; 128]).unwrap().len(), 128);
    assert!(fft.forward(&vec![1.0; 64]).is_err());
    assert_eq!(
        fft.update_config(ConfigUpdate::size(100)).err(),
        Some(FftError::UnsupportedSize {
            algorithm: Algorithm::Radix2,
            size: 100
        })
    );
    assert_eq!(fft.size(), 128);
    assert!(matches!(
        fft.update_config(ConfigUpdate::size(0)),
        Err(FftError::Configuration { .. })
    ));

    let mut fft = engine::<f64>(Algorithm::MixedRadix, 64);
    fft.update_config(ConfigUpdate::size(97)).unwrap();
    assert_eq!(fft.describe().internal_size, 256);
}

#[test]
fn hot_swapped_settings_apply_to_next_call() {
    let mut fft = engine::<f64>(Algorithm::Radix4, 16);
    let before = fft.forward(&[1.0; 16]).unwrap();
    assert_eq!(before.frequency[1], 44_100.0 / 16.0);

    fft.update_config(ConfigUpdate::sample_rate(16.0)).unwrap();
    let after = fft.forward(&[1.0; 16]).unwrap();
    assert_eq!(after.frequency[1], 1.0);
    assert_eq!(after.real, before.real);

    let raw = fft.inverse(&after.real, &after.imag).unwrap();
    fft.update_config(ConfigUpdate::normalize(true)).unwrap();
    let scaled = fft.inverse(&after.real, &after.imag).unwrap();
    for i in 0..16 {
        assert!((raw.real[i] - 16.0).abs() < 1e-9);
        assert!((scaled.real[i] - 1.0).abs() < 1e-12);
    }
}

#[test]
fn normalize_never_scales_forward() {
    let mut plain = engine::<f64>(Algorithm::Radix2, 8);
    let mut normalized = engine::<f64>(Algorithm::Radix2, 8);
    normalized.update_config(ConfigUpdate::normalize(true)).unwrap();
    let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
    assert_eq!(plain.forward(&x).unwrap(), normalized.forward(&x).unwrap());
}

#[test]
fn stats_and_state_track_calls() {
    let mut fft = engine::<f32>(Algorithm::RealOptimized, 32);
    assert_eq!(fft.state(), EngineState::Ready);
    let x = vec![0.5f32; 32];
    let s = fft.forward(&x).unwrap();
    fft.forward(&x).unwrap();
    fft.inverse(&s.real, &s.imag).unwrap();
    let stats = fft.stats();
    assert_eq!(stats.forward_calls, 2);
    assert_eq!(stats.inverse_calls, 1);
    assert!(stats.total_time >= stats.last_time);
    assert_eq!(fft.state(), EngineState::Ready);

    fft.reset_stats();
    assert_eq!(fft.stats().calls(), 0);
}

#[test]
fn describe_reports_variant_shape() {
    let caches = EngineCaches::<f64>::isolated();
    let bluestein =
        BluesteinEngine::with_caches(TransformConfig::new(100), caches.clone()).unwrap();
    let info = bluestein.describe();
    assert_eq!(info.algorithm, Algorithm::MixedRadix);
    assert_eq!((info.size, info.internal_size), (100, 256));
    assert_eq!(info.optimization, OptimizationLevel::General);

    let real = RealFftEngine::with_caches(TransformConfig::new(64), caches).unwrap();
    assert_eq!(real.describe().internal_size, 32);
    assert_eq!(real.optimization_level(), OptimizationLevel::High);
}

#[test]
fn self_tests_pass_for_every_variant() {
    for (algorithm, sizes) in CASES {
        for &n in sizes {
            let report = engine::<f64>(algorithm, n).verify_accuracy();
            assert!(report.all_passed(), "{algorithm} n={n} f64: {report:?}");
            let report = engine::<f32>(algorithm, n).verify_accuracy();
            assert!(report.all_passed(), "{algorithm} n={n} f32: {report:?}");
        }
    }
}

#[test]
fn self_tests_count_as_calls() {
    let mut fft = engine::<f64>(Algorithm::Radix2, 16);
    fft.verify_accuracy();
    let stats = fft.stats();
    assert_eq!(stats.forward_calls, 4);
    assert_eq!(stats.inverse_calls, 1);
}
