use std::env;

use anyhow::Result;

use thi::prelude::*;

use textplots::{Chart, Plot, Shape};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let nonlinearity = env::args()
        .nth(1)
        .map(|s| s.parse::<f64>())
        .transpose()?
        .unwrap_or(0.35);
    let frequency = env::args()
        .nth(2)
        .map(|s| s.parse::<f64>())
        .transpose()?
        .map_or(3.5 * MHz, |f| f * MHz);

    let mut sim = Simulator::new(SimulatorOption::default())?;
    let max_depth = (sim.grid().depth() / mm) as f32;

    // depth profiles
    {
        let profiles = sim.get_profiles(frequency, nonlinearity)?;
        let points = |values: &[f64]| {
            profiles
                .depth()
                .iter()
                .zip(values)
                .map(|(&z, &v)| ((z / mm) as f32, v as f32))
                .collect::<Vec<_>>()
        };
        println!(
            "Depth profiles at {:.1} MHz, nonlinearity {} (fundamental, harmonic)",
            frequency.mhz(),
            nonlinearity
        );
        Chart::new(180, 40, 0.0, max_depth)
            .lineplot(&Shape::Lines(&points(profiles.fundamental().as_slice())))
            .lineplot(&Shape::Lines(&points(profiles.harmonic().as_slice())))
            .display();
        println!(
            "Harmonic peaks at {:.1} mm",
            profiles.harmonic_peak_depth() / mm
        );
    }

    // lateral profile through the point target
    {
        sim.create_phantom()?;
        let row = sim.grid().nearest_z(sim.metrics_option().resolution_depth);
        let width = (sim.grid().width() / mm) as f32;
        let lines = ImagingMode::ALL
            .iter()
            .map(|&mode| -> Result<Vec<(f32, f32)>> {
                let image = sim.run_imaging(mode, frequency, nonlinearity, false)?;
                Ok(sim
                    .grid()
                    .x()
                    .iter()
                    .zip(image.data().row(row).iter())
                    .map(|(&x, &v)| ((x / mm) as f32, v as f32))
                    .collect::<Vec<_>>())
            })
            .collect::<Result<Vec<_>>>()?;
        println!(
            "Lateral profile at {:.1} mm [dB] (fundamental, harmonic)",
            sim.grid().z()[row] / mm
        );
        Chart::new(180, 40, -width / 2., width / 2.)
            .lineplot(&Shape::Lines(&lines[0]))
            .lineplot(&Shape::Lines(&lines[1]))
            .display();
    }

    Ok(())
}
