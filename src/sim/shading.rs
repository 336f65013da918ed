//! Inter-row shading and bypass-diode electrical-loss models.
//!
//! Conventions:
//! - Solar altitude: degrees above horizon (0=horizon, 90=zenith).
//! - All lengths in meters, all loss figures as fractions in [0, 1] except
//!   where a field is documented as a percentage.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::sim::solar::sun_path;

/// Number of bypass diodes in a typical crystalline module.
pub const DEFAULT_BYPASS_DIODES: u32 = 3;

/// Critical daylight window for worst-case shading review (9:00-15:00).
pub const CRITICAL_START_HOUR: u8 = 9;
pub const CRITICAL_END_HOUR: u8 = 15;

/// Year used for the fixed solstice/equinox reference dates.
const REFERENCE_YEAR: i32 = 2024;

/// Row-array geometry consumed by the shading model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrayGeometry {
    /// Row-to-row pitch [m].
    pub row_pitch: f64,
    /// Module length in the tilt direction [m].
    pub module_length: f64,
    /// Module tilt angle [degrees].
    pub tilt_angle: f64,
}

/// Shading and electrical loss for one daylight hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadingSample {
    /// Hour of day (0-23).
    pub hour: u8,
    /// Solar elevation [degrees].
    pub sun_elevation: f64,
    /// Geometric shading fraction [0, 1].
    pub shading_fraction: f64,
    /// Electrical power loss fraction [0, 1].
    pub electrical_loss: f64,
}

/// Hourly shading report for one reference date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayShading {
    pub date: NaiveDate,
    pub hourly: Vec<ShadingSample>,
    /// Average electrical loss over daylight hours [%].
    pub average_loss: f64,
}

/// Seasonal shading aggregate over the solstices and the equinox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadingProfile {
    pub winter_solstice: DayShading,
    pub summer_solstice: DayShading,
    pub equinox: DayShading,
    /// Season-weighted annual average loss [%].
    pub annual_average_loss: f64,
    /// Maximum loss across all sampled hours [%].
    pub worst_case_loss: f64,
}

/// Worst-case (winter solstice) shading report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinterSolsticeReport {
    pub date: NaiveDate,
    pub latitude: f64,
    pub hourly: Vec<ShadingSample>,
    /// Average loss across the 9:00-15:00 window [%].
    pub critical_hours_loss: f64,
    /// Peak loss across the 9:00-15:00 window [%].
    pub max_loss: f64,
    /// Average loss across all daylight hours [%].
    pub daily_average_loss: f64,
    pub total_daylight_hours: usize,
}

/// Site location in geographic degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Geometric shading fraction cast by a row on the row behind it.
///
/// The shadow of the raised module edge is compared against the clear
/// distance between rows; any excess climbs the next row's modules.
pub fn inter_row_shading(
    row_pitch: f64,
    module_length: f64,
    tilt_angle: f64,
    sun_altitude: f64,
) -> Result<f64> {
    // Sun at or below the horizon shades everything; zenith shades nothing.
    if sun_altitude <= 0.0 {
        return Ok(1.0);
    }
    if sun_altitude >= 90.0 {
        return Ok(0.0);
    }

    if row_pitch <= 0.0 || module_length <= 0.0 {
        bail!("row_pitch and module_length must be positive, got {row_pitch} and {module_length}");
    }
    if !(0.0..=90.0).contains(&tilt_angle) {
        bail!("tilt_angle must be between 0 and 90 degrees, got {tilt_angle}");
    }

    let tilt = tilt_angle.to_radians();
    let altitude = sun_altitude.to_radians();

    let module_height = module_length * tilt.sin();
    let shadow = module_height / altitude.tan();

    let module_footprint = module_length * tilt.cos();
    let clear_distance = row_pitch - module_footprint;

    if shadow > clear_distance {
        let shaded_length = shadow - clear_distance;
        return Ok((shaded_length / module_length).min(1.0));
    }
    Ok(0.0)
}

/// Length of the shadow cast by a raised edge of height `module_height`.
pub fn shadow_length(module_height: f64, sun_elevation: f64) -> Result<f64> {
    if sun_elevation <= 0.0 {
        return Ok(f64::INFINITY);
    }
    if sun_elevation >= 90.0 {
        return Ok(0.0);
    }
    if module_height < 0.0 {
        bail!("module_height must be non-negative, got {module_height}");
    }
    Ok(module_height / sun_elevation.to_radians().tan())
}

/// Maps a geometric shading fraction to electrical power loss.
///
/// Staircase bypass-diode model: below 5% shading the loss is linear; once
/// shading enters a diode band the whole band is counted as lost, and a
/// residual larger than 5% of a band width rounds the current band up too.
/// The thresholds are a pessimistic engineering policy, not an IV-curve
/// derivation. Output is monotone non-decreasing and stays in [0, 1].
pub fn electrical_loss(shading_fraction: f64, bypass_diodes: u32) -> Result<f64> {
    if !(0.0..=1.0).contains(&shading_fraction) {
        bail!("shading_fraction must be between 0 and 1, got {shading_fraction}");
    }
    if bypass_diodes == 0 {
        bail!("bypass_diodes must be positive");
    }

    let band = 1.0 / f64::from(bypass_diodes);

    // Minor shading: diodes stay inactive, loss tracks the shaded area.
    if shading_fraction < 0.05 {
        return Ok(shading_fraction);
    }

    // Non-trivial shading within the first band costs that whole band.
    if shading_fraction < band {
        return Ok(band);
    }

    let bands_crossed = (shading_fraction / band).floor() as u32;
    if bands_crossed >= bypass_diodes {
        return Ok(1.0);
    }

    let mut loss = f64::from(bands_crossed) * band;
    let residual = shading_fraction - f64::from(bands_crossed) * band;
    if residual > 0.05 * band {
        loss += band;
    }
    Ok(loss.min(1.0))
}

/// [`electrical_loss`] with the typical three-diode module.
pub fn electrical_loss_default(shading_fraction: f64) -> Result<f64> {
    electrical_loss(shading_fraction, DEFAULT_BYPASS_DIODES)
}

/// Shading and electrical loss for every daylight hour of `date`.
///
/// Night hours are skipped; the returned samples are ordered by hour.
pub fn hourly_shading(
    layout: &ArrayGeometry,
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
) -> Result<Vec<ShadingSample>> {
    let path = sun_path(latitude, longitude, date)?;

    let mut samples = Vec::new();
    for position in path {
        if position.elevation <= 0.0 {
            continue;
        }
        let shading = inter_row_shading(
            layout.row_pitch,
            layout.module_length,
            layout.tilt_angle,
            position.elevation,
        )?;
        let loss = electrical_loss_default(shading)?;
        samples.push(ShadingSample {
            hour: position.hour,
            sun_elevation: position.elevation,
            shading_fraction: shading,
            electrical_loss: loss,
        });
    }
    Ok(samples)
}

fn average_loss_percent(samples: &[ShadingSample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s.electrical_loss).sum::<f64>() / samples.len() as f64 * 100.0
}

fn reference_date(month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, day)
        .with_context(|| format!("invalid reference date {REFERENCE_YEAR}-{month:02}-{day:02}"))
}

fn day_shading(
    layout: &ArrayGeometry,
    date: NaiveDate,
    location: &Location,
) -> Result<DayShading> {
    let hourly = hourly_shading(layout, date, location.latitude, location.longitude)?;
    let average_loss = average_loss_percent(&hourly);
    Ok(DayShading {
        date,
        hourly,
        average_loss,
    })
}

/// Seasonal shading analysis over the solstices and the spring equinox.
///
/// The annual average weights the equinox at 0.5 since it stands in for the
/// two intermediate seasons; each solstice contributes 0.25.
pub fn shading_profile(layout: &ArrayGeometry, location: &Location) -> Result<ShadingProfile> {
    let winter_solstice = day_shading(layout, reference_date(12, 21)?, location)?;
    let summer_solstice = day_shading(layout, reference_date(6, 21)?, location)?;
    let equinox = day_shading(layout, reference_date(3, 21)?, location)?;

    let annual_average_loss = 0.25 * winter_solstice.average_loss
        + 0.25 * summer_solstice.average_loss
        + 0.5 * equinox.average_loss;

    let worst_case_loss = winter_solstice
        .hourly
        .iter()
        .chain(&summer_solstice.hourly)
        .chain(&equinox.hourly)
        .map(|s| s.electrical_loss * 100.0)
        .fold(0.0, f64::max);

    Ok(ShadingProfile {
        winter_solstice,
        summer_solstice,
        equinox,
        annual_average_loss,
        worst_case_loss,
    })
}

/// Worst-case shading analysis for the winter solstice, with the 9:00-15:00
/// window broken out separately.
pub fn winter_solstice_report(
    layout: &ArrayGeometry,
    latitude: f64,
    longitude: f64,
) -> Result<WinterSolsticeReport> {
    let date = reference_date(12, 21)?;
    let hourly = hourly_shading(layout, date, latitude, longitude)?;

    let critical: Vec<&ShadingSample> = hourly
        .iter()
        .filter(|s| (CRITICAL_START_HOUR..=CRITICAL_END_HOUR).contains(&s.hour))
        .collect();

    let (critical_hours_loss, max_loss) = if critical.is_empty() {
        (0.0, 0.0)
    } else {
        let average = critical.iter().map(|s| s.electrical_loss).sum::<f64>()
            / critical.len() as f64
            * 100.0;
        let peak = critical
            .iter()
            .map(|s| s.electrical_loss * 100.0)
            .fold(0.0, f64::max);
        (average, peak)
    };

    let daily_average_loss = average_loss_percent(&hourly);
    let total_daylight_hours = hourly.len();

    Ok(WinterSolsticeReport {
        date,
        latitude,
        hourly,
        critical_hours_loss,
        max_loss,
        daily_average_loss,
        total_daylight_hours,
    })
}
