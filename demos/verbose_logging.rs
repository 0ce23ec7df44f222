//! Shows the engine's debug and trace logging.
//!
//! Run with `cargo run --example verbose_logging`; set `RUST_LOG=trace` to
//! include cache activity.

use spectrafft::{create_auto, ConfigUpdate, FftError};

fn main() -> Result<(), FftError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let mut fft = create_auto::<f64>(64)?;
    fft.forward(&vec![1.0; 64])?;

    // Radix-4 cannot run 128 points; the engine stays at 64.
    if let Err(err) = fft.update_config(ConfigUpdate::size(128)) {
        log::warn!("resize rejected: {err}");
    }
    fft.update_config(ConfigUpdate::size(256))?;

    let mut odd = create_auto::<f32>(1000)?;
    let report = odd.verify_accuracy();
    log::info!("self-test for n=1000: {report:?}");
    Ok(())
}
