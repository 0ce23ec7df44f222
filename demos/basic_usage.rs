//! Basic usage example for spectrafft
//!
//! Builds engines through the factory, runs forward and inverse transforms
//! and reads the derived spectrum fields.

use spectrafft::{create, create_auto, Algorithm, ConfigUpdate, FftError, TransformConfig};

fn main() -> Result<(), FftError> {
    println!("=== spectrafft Basic Usage Example ===\n");

    // 1. Automatic selection
    println!("1. Automatic algorithm selection");
    for n in [256usize, 512, 1000] {
        let fft = create_auto::<f32>(n)?;
        let info = fft.describe();
        println!(
            "   n={:<5} -> {:<14} (internal size {})",
            n, info.algorithm, info.internal_size
        );
    }
    println!();

    // 2. Forward transform of a real signal
    println!("2. Forward FFT");
    let mut fft = create_auto::<f64>(4)?;
    let input = [1.0, 2.0, 3.0, 4.0];
    let spectrum = fft.forward(&input)?;
    println!("   Input: {:?}", input);
    println!(
        "   FFT: {:?}",
        spectrum
            .real
            .iter()
            .zip(spectrum.imag.iter())
            .map(|(re, im)| format!("{:.2}{:+.2}i", re, im))
            .collect::<Vec<_>>()
    );

    // The inverse is unscaled unless normalize is set.
    let back = fft.inverse(&spectrum.real, &spectrum.imag)?;
    println!("   IFFT (unscaled): {:?}", back.real);
    fft.update_config(ConfigUpdate::normalize(true))?;
    let back = fft.inverse(&spectrum.real, &spectrum.imag)?;
    println!("   IFFT (normalized): {:?}", back.real);
    println!();

    // 3. Spectrum of a tone
    println!("3. Peak detection");
    let rate = 44_100.0;
    let n = 1024;
    let tone: Vec<f64> = (0..n)
        .map(|i| (2.0 * std::f64::consts::PI * 1000.0 * i as f64 / rate).sin())
        .collect();
    let mut fft = create::<f64>(
        TransformConfig::new(n)
            .with_algorithm(Algorithm::RealOptimized)
            .with_sample_rate(rate),
    )?;
    let spectrum = fft.forward(&tone)?;
    let peak = (0..n / 2)
        .max_by(|&a, &b| spectrum.magnitude[a].total_cmp(&spectrum.magnitude[b]))
        .unwrap_or(0);
    println!(
        "   1000 Hz tone: peak bin {} ({:.1} Hz), magnitude {:.1}",
        peak, spectrum.frequency[peak], spectrum.magnitude[peak]
    );
    println!();

    // 4. Arbitrary sizes and self-tests
    println!("4. Bluestein for prime sizes");
    let mut fft = create_auto::<f32>(97)?;
    let report = fft.verify_accuracy();
    println!("   n=97 self-test: {:?}", report);
    println!("   stats: {:?}", fft.stats());

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
