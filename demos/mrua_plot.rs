use std::error::Error;
use std::path::Path;

use mrua_motion::{compute, render, ChartFormat, MotionParameters};

fn main() -> Result<(), Box<dyn Error>> {
    // -----------------------
    // 1. Set up parameters
    // -----------------------
    // A ball thrown upwards at 10 m/s under earth gravity, observed for 5 s.
    let v0 = 10.0; // Initial velocity, m/s
    let a = -9.8; // Acceleration, m/s^2
    let t_max = 5.0; // Observed time span, s

    let params = MotionParameters::new(v0, a, t_max);

    // ---------------------
    // 2. Sample the motion
    // ---------------------
    let series = compute(&params);
    if series.is_empty() {
        return Err("No samples generated. Check the time span.".into());
    }

    // The ball turns around where the velocity changes sign
    if let Some(idx) = series.velocities().iter().position(|&v| v <= 0.0) {
        let (t, x, _, _) = series.sample(idx).ok_or("sample out of range")?;
        println!("Highest point near t = {:.2} s, x = {:.3} m", t, x);
    }

    // --------------
    // 3. Plot data
    // --------------
    let chart = render(&series)?;

    // The script can be replayed with `gnuplot -p mrua_plot.gp`; the SVG needs gnuplot installed.
    chart.save(Path::new("mrua_plot.gp"), ChartFormat::Script)?;
    chart.save(Path::new("mrua_plot.json"), ChartFormat::Json)?;
    match chart.save(Path::new("mrua_plot.svg"), ChartFormat::Svg) {
        Ok(()) => println!("Chart written to mrua_plot.svg"),
        Err(e) => eprintln!("Warning: {e}"),
    }

    println!("Plot generated. {} samples over {:.3} seconds.", series.len(), t_max);
    Ok(())
}
