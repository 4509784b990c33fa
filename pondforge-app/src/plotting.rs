//! Per-pond trend charts rendered from the ledger.

use anyhow::Result;
use pondforge_core::MeasurementStore;
use plotters::prelude::*;
use pondforge_schemas::{
    measurement::Measurement, parameters::Parameter, thresholds::ParameterThresholds, PondId,
};
use tracing::info;

/// Writes `pond_<id>_trends.png` for every pond with measurements.
pub fn generate_pond_charts(output_dir: &str, store: &MeasurementStore) -> Result<()> {
    println!("[Plotting] Generating pond trend charts...");

    let thresholds = store.thresholds();
    let ponds = store.pond_ids();
    if ponds.is_empty() {
        println!("[Plotting] Warning: No data to plot.");
        return Ok(());
    }

    for pond_id in ponds {
        let measurements = store.measurements_for_pond(pond_id);
        plot_pond_trends(output_dir, pond_id, &measurements, &thresholds)?;
    }

    info!(output_dir, "pond charts written");
    Ok(())
}

const CHARTED: [(Parameter, RGBColor); 3] = [
    (Parameter::Temperature, BLUE),
    (Parameter::Ph, RED),
    (Parameter::DissolvedOxygen, GREEN),
];

/// Temperature, pH and dissolved oxygen against logical time, with the
/// current bounds dashed and critical readings circled.
fn plot_pond_trends(
    output_dir: &str,
    pond_id: PondId,
    measurements: &[Measurement],
    thresholds: &ParameterThresholds,
) -> Result<()> {
    let path = format!("{}/pond_{}_trends.png", output_dir, pond_id);
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let first_at = measurements.first().map_or(0, |m| m.recorded_at);
    let last_at = measurements.last().map_or(1, |m| m.recorded_at).max(first_at + 1);

    let mut y_max: f64 = 1.0;
    for (parameter, _) in CHARTED {
        for m in measurements {
            y_max = y_max.max(m.parameters.decimal(parameter));
        }
        for bound in [thresholds.lower_bound(parameter), thresholds.upper_bound(parameter)]
            .into_iter()
            .flatten()
        {
            y_max = y_max.max(parameter.to_decimal(bound));
        }
    }
    let y_min = measurements
        .iter()
        .map(|m| m.parameters.decimal(Parameter::Temperature))
        .fold(0.0, f64::min);

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Pond {} Water Quality", pond_id),
            ("sans-serif", 50).into_font(),
        )
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(first_at..last_at, y_min..y_max * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Recorded at (logical height)")
        .y_desc("Value")
        .draw()?;

    for (parameter, color) in CHARTED {
        chart
            .draw_series(LineSeries::new(
                measurements
                    .iter()
                    .map(|m| (m.recorded_at, m.parameters.decimal(parameter))),
                color.stroke_width(3),
            ))?
            .label(format!("{} ({})", parameter.label(), parameter.unit()))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));

        for bound in [thresholds.lower_bound(parameter), thresholds.upper_bound(parameter)]
            .into_iter()
            .flatten()
        {
            let limit = parameter.to_decimal(bound);
            chart.draw_series(DashedLineSeries::new(
                vec![(first_at, limit), (last_at, limit)],
                5,
                5,
                (&color).into(),
            ))?;
        }

        chart.draw_series(measurements.iter().filter(|m| m.critical).map(|m| {
            Circle::new(
                (m.recorded_at, m.parameters.decimal(parameter)),
                5,
                BLACK.filled(),
            )
        }))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
