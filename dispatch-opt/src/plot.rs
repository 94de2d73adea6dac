use plotters::prelude::*;

use crate::report::DispatchSchedule;

/// Plots a solved schedule as parallel line series over the period index:
/// forecast cap vs curtailed production, consumption, grid exchange,
/// storage power and energy state.
pub fn plot_schedule(
    schedule: &DispatchSchedule,
    production_cap_w: &[f64],
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let series: Vec<(&str, &RGBColor, Vec<f64>)> = vec![
        (
            "Max Production",
            &BLACK,
            production_cap_w.to_vec(),
        ),
        (
            "Curtailed Production",
            &RED,
            schedule.periods.iter().map(|p| p.production_w).collect(),
        ),
        (
            "Consumption",
            &BLUE,
            schedule.periods.iter().map(|p| p.consumption_w).collect(),
        ),
        (
            "Grid",
            &GREEN,
            schedule.periods.iter().map(|p| p.grid_net_w).collect(),
        ),
        (
            "ESS",
            &MAGENTA,
            schedule.periods.iter().map(|p| p.storage_net_w).collect(),
        ),
        (
            "ESS Energy",
            &CYAN,
            schedule.periods.iter().map(|p| p.energy_wh).collect(),
        ),
    ];

    let y_min = series
        .iter()
        .flat_map(|(_, _, data)| data.iter())
        .fold(f64::INFINITY, |a, &b| a.min(b));
    let mut y_max = series
        .iter()
        .flat_map(|(_, _, data)| data.iter())
        .fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }

    let root = BitMapBackend::new(filename, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Dispatch Schedule", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..schedule.periods.len() as f64, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Period")
        .y_desc("Watt / Wh")
        .draw()?;

    for (label, color, data) in &series {
        chart
            .draw_series(LineSeries::new(
                data.iter().enumerate().map(|(i, &y)| (i as f64, y)),
                *color,
            ))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], *color));
    }

    chart.configure_series_labels().draw()?;
    root.present()?;
    println!("Plot saved as {}", filename);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{HorizonTotals, PeriodDispatch};

    #[test]
    fn writes_a_png_for_a_small_schedule() {
        let periods = (0..4)
            .map(|i| PeriodDispatch {
                label: format!("{:02}:00", i),
                production_w: 100.0 * i as f64,
                consumption_w: 250.0,
                charge_w: 0.0,
                discharge_w: 50.0,
                storage_net_w: 50.0,
                energy_wh: 1000.0 - 50.0 * i as f64,
                grid_net_w: 200.0 - 100.0 * i as f64,
                buy_w: (200.0 - 100.0 * i as f64).max(0.0),
                sell_w: (100.0 * i as f64 - 200.0).max(0.0),
            })
            .collect();
        let schedule = DispatchSchedule {
            periods,
            totals: HorizonTotals::default(),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dispatch.png");
        plot_schedule(
            &schedule,
            &[0.0, 150.0, 300.0, 450.0],
            path.to_str().unwrap(),
        )
        .unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }
}
