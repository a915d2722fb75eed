//! Dispatch trajectory plots.

use plotters::prelude::*;

use crate::core::model::Solution;

/// Plot the optimal dispatch: power flows on top, battery state of charge
/// below.
pub fn plot_dispatch(
    solution: &Solution,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let steps = solution.dispatch.len();
    let electrolyser: Vec<f64> = solution
        .dispatch
        .iter()
        .map(|s| s.electrolyser_power_mw)
        .collect();
    let grid: Vec<f64> = solution.dispatch.iter().map(|s| s.grid_power_mw).collect();
    let net_battery: Vec<f64> = solution
        .dispatch
        .iter()
        .map(|s| s.discharge_power_mw - s.charge_power_mw)
        .collect();
    let soc: Vec<f64> = solution.dispatch.iter().map(|s| s.soc_mwh).collect();

    let root = BitMapBackend::new(filename, (1000, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let areas = root.split_evenly((2, 1));
    let upper = &areas[0];
    let lower = &areas[1];

    let power_min = electrolyser
        .iter()
        .chain(grid.iter())
        .chain(net_battery.iter())
        .fold(f64::INFINITY, |a, &b| a.min(b));
    let power_max = electrolyser
        .iter()
        .chain(grid.iter())
        .chain(net_battery.iter())
        .fold(f64::NEG_INFINITY, |a, &b| a.max(b));

    let mut chart1 = ChartBuilder::on(upper)
        .caption("Optimal Dispatch", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..steps as f64, power_min..power_max.max(power_min + 1.0))?;

    chart1
        .configure_mesh()
        .x_desc("Timestep")
        .y_desc("Power [MW]")
        .draw()?;

    chart1
        .draw_series(LineSeries::new(
            electrolyser.iter().enumerate().map(|(i, &y)| (i as f64, y)),
            &BLUE,
        ))?
        .label("Electrolyser")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], &BLUE));

    chart1
        .draw_series(LineSeries::new(
            grid.iter().enumerate().map(|(i, &y)| (i as f64, y)),
            &RED,
        ))?
        .label("Grid exchange")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], &RED));

    chart1
        .draw_series(LineSeries::new(
            net_battery.iter().enumerate().map(|(i, &y)| (i as f64, y)),
            &GREEN,
        ))?
        .label("Battery (discharge +)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], &GREEN));

    chart1.configure_series_labels().draw()?;

    let soc_max = soc.iter().fold(0f64, |a, &b| a.max(b));
    let mut chart2 = ChartBuilder::on(lower)
        .caption("Battery State of Charge", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..steps as f64, 0f64..soc_max.max(1.0))?;

    chart2
        .configure_mesh()
        .x_desc("Timestep")
        .y_desc("SOC [MWh]")
        .draw()?;

    chart2
        .draw_series(LineSeries::new(
            soc.iter().enumerate().map(|(i, &y)| (i as f64, y)),
            &MAGENTA,
        ))?
        .label("SOC")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], &MAGENTA));

    chart2.configure_series_labels().draw()?;

    root.present()?;
    println!("Plot saved as {}", filename);
    Ok(())
}
