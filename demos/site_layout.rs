use anyhow::Result;

use pvlayout::sim::shading::{shading_profile, ArrayGeometry, Location};
use pvlayout::sim::soiling::optimize_cleaning_schedule;
use pvlayout::{place_modules, LayoutConfig, SitePolygon};

fn main() -> Result<()> {
    // 100 m × 100 m square site in projected meters, near Ahmedabad.
    let site = SitePolygon::new(vec![
        (0.0, 0.0),
        (100.0, 0.0),
        (100.0, 100.0),
        (0.0, 100.0),
    ])?;
    let config = LayoutConfig::new(23.0225, 2.278, 1.134, 545.0, 15.0, 5.0);

    let layout = place_modules(&site, &config)?;
    println!(
        "placed {} modules in {} rows: {:.1} kWp, GCR {:.2}, pitch {:.2} m",
        layout.total_modules, layout.rows, layout.capacity_kwp, layout.actual_gcr, layout.row_pitch
    );

    let geometry = ArrayGeometry {
        row_pitch: layout.row_pitch,
        module_length: config.module_length,
        tilt_angle: config.tilt_angle,
    };
    let location = Location {
        latitude: 23.0225,
        longitude: 72.5714,
    };
    let profile = shading_profile(&geometry, &location)?;
    println!(
        "shading loss: {:.2}% annual average, {:.2}% worst hour",
        profile.annual_average_loss, profile.worst_case_loss
    );

    let plan = optimize_cleaning_schedule(0.35, config.tilt_angle, "gujarat")?;
    println!(
        "cleaning: {} ({} events/year) -> {:.2}% soiling loss",
        plan.optimal_description, plan.optimal_frequency, plan.expected_annual_loss
    );

    Ok(())
}
