use std::{env, fs};

use anyhow::Result;

use thi::prelude::*;

fn print_row(name: &str, f: f64, h: f64, unit: &str) {
    println!("{:<12}{:>14.3}{:>14.3}  {}", name, f, h, unit);
}

fn main() -> Result<()> {
    let level = env::var("THI_LOG")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let option: SimulatorOption = match env::args().nth(1) {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => SimulatorOption::default(),
    };
    let frequency = 3.5 * MHz;
    let nonlinearity = 0.35;

    let mut sim = Simulator::new(option)?;
    for habitus in [Habitus::Normal, Habitus::Obese] {
        sim.set_medium(sim.medium().with_habitus(habitus));
        for pulse_inversion in [false, true] {
            sim.create_phantom()?;
            ImagingMode::ALL.iter().try_for_each(|&mode| {
                sim.run_imaging(mode, frequency, nonlinearity, pulse_inversion)
                    .map(|_| ())
            })?;
            let metrics = sim.get_metrics()?;
            let improvement = metrics.improvement();

            println!(
                "======== {} habitus, pulse inversion {} ========",
                habitus,
                if pulse_inversion { "on" } else { "off" }
            );
            println!("{:<12}{:>14}{:>14}", "", "fundamental", "harmonic");
            print_row(
                "FWHM",
                metrics.fundamental.fwhm_mm,
                metrics.harmonic.fwhm_mm,
                "mm",
            );
            print_row(
                "Side lobe",
                metrics.fundamental.side_lobe_db,
                metrics.harmonic.side_lobe_db,
                "dB",
            );
            print_row("CNR", metrics.fundamental.cnr, metrics.harmonic.cnr, "");
            print_row("SNR", metrics.fundamental.snr, metrics.harmonic.snr, "");
            println!(
                "Improvement: resolution {:.1}%, CNR {:.1}%",
                improvement.resolution_percent, improvement.cnr_percent
            );
            tracing::debug!("{}", serde_json::to_string(&metrics)?);
        }
    }

    Ok(())
}
