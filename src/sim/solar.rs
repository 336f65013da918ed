use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Earth's axial tilt [degrees].
pub const EARTH_TILT: f64 = 23.5;

/// Reference days of year (non-leap).
pub const WINTER_SOLSTICE_DAY: u16 = 355;
pub const SUMMER_SOLSTICE_DAY: u16 = 172;
pub const SPRING_EQUINOX_DAY: u16 = 80;

/// Solar position sample for one hour of a day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarPosition {
    /// Hour of day (0-23).
    pub hour: u8,
    /// Solar elevation angle in degrees (0 = horizon or below, 90 = zenith).
    pub elevation: f64,
    /// Solar azimuth angle in degrees from north, clockwise (0=N, 90=E, 180=S, 270=W).
    pub azimuth: f64,
}

fn check_latitude(latitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        bail!("latitude must be between -90 and 90 degrees, got {latitude}");
    }
    Ok(())
}

fn check_day_and_hour(day_of_year: u16, hour: f64) -> Result<()> {
    if !(1..=366).contains(&day_of_year) {
        bail!("day_of_year must be between 1 and 366, got {day_of_year}");
    }
    if !(0.0..=24.0).contains(&hour) {
        bail!("hour must be between 0 and 24, got {hour}");
    }
    Ok(())
}

/// Solar declination in degrees (epoch day 81 ≈ spring equinox).
fn declination(day_of_year: u16) -> f64 {
    23.45 * ((360.0 / 365.0) * (day_of_year as f64 - 81.0)).to_radians().sin()
}

/// Hour angle in degrees: 15 degrees per hour from solar noon.
fn hour_angle(hour: f64) -> f64 {
    15.0 * (hour - 12.0)
}

/// Minimum yearly solar-noon elevation for a latitude, clamped to ≥ 0.
///
/// `α = 90 − |lat| − 23.5`. The absolute value selects the hemisphere's own
/// winter, so the result is the conservative worst case used to size
/// shadow-free row spacing.
pub fn winter_solstice_angle(latitude: f64) -> f64 {
    (90.0 - latitude.abs() - EARTH_TILT).max(0.0)
}

/// Solar elevation angle in degrees, clamped to [0, 90].
///
/// A clamped 0 means the sun is at or below the horizon and not usable.
pub fn solar_elevation(latitude: f64, day_of_year: u16, hour: f64) -> Result<f64> {
    check_latitude(latitude)?;
    check_day_and_hour(day_of_year, hour)?;

    let lat = latitude.to_radians();
    let dec = declination(day_of_year).to_radians();
    let ha = hour_angle(hour).to_radians();

    let sin_elevation = lat.sin() * dec.sin() + lat.cos() * dec.cos() * ha.cos();
    let elevation = sin_elevation.clamp(-1.0, 1.0).asin().to_degrees();

    Ok(elevation.clamp(0.0, 90.0))
}

/// Solar azimuth in degrees from north, clockwise.
///
/// Afternoon hours reflect the raw angle (`360 − azimuth`) to keep the
/// 0-360° clockwise-from-north convention. Returns 180 (due south) when the
/// sun is below the horizon; callers gate on elevation for daylight checks.
pub fn solar_azimuth(latitude: f64, day_of_year: u16, hour: f64) -> Result<f64> {
    check_latitude(latitude)?;
    check_day_and_hour(day_of_year, hour)?;

    let elevation = solar_elevation(latitude, day_of_year, hour)?;
    if elevation <= 0.0 {
        return Ok(180.0);
    }

    let lat = latitude.to_radians();
    let dec = declination(day_of_year).to_radians();
    let elev = elevation.to_radians();

    let cos_azimuth = (dec.sin() - lat.sin() * elev.sin()) / (lat.cos() * elev.cos());
    let mut azimuth = cos_azimuth.clamp(-1.0, 1.0).acos().to_degrees();

    if hour_angle(hour) > 0.0 {
        azimuth = 360.0 - azimuth;
    }

    Ok(azimuth)
}

/// Hourly sun path for one calendar date.
///
/// Returns 24 samples, one per whole hour. Pure function: identical inputs
/// always produce identical output, so the sequence is safely restartable.
pub fn sun_path(latitude: f64, longitude: f64, date: NaiveDate) -> Result<Vec<SolarPosition>> {
    check_latitude(latitude)?;
    let _lon = longitude; // longitude only affects solar time correction

    let day_of_year = date.ordinal() as u16;
    let mut path = Vec::with_capacity(24);
    for hour in 0..24u8 {
        let h = f64::from(hour);
        path.push(SolarPosition {
            hour,
            elevation: solar_elevation(latitude, day_of_year, h)?,
            azimuth: solar_azimuth(latitude, day_of_year, h)?,
        });
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winter_solstice_angle_equator() {
        assert!((winter_solstice_angle(0.0) - 66.5).abs() < 1e-9);
    }

    #[test]
    fn test_winter_solstice_angle_pole_clamped() {
        assert_eq!(winter_solstice_angle(90.0), 0.0);
        assert_eq!(winter_solstice_angle(-90.0), 0.0);
    }

    #[test]
    fn test_winter_solstice_angle_hemisphere_symmetry() {
        assert_eq!(winter_solstice_angle(23.0), winter_solstice_angle(-23.0));
    }

    #[test]
    fn test_noon_equator_equinox_near_zenith() {
        // At solar noon on the equinox the sun is nearly overhead at the equator.
        let elevation = solar_elevation(0.0, SPRING_EQUINOX_DAY, 12.0).unwrap();
        assert!(
            elevation > 85.0,
            "Sun should be near zenith at equator on equinox noon, got {elevation}"
        );
    }

    #[test]
    fn test_midnight_winter_is_clamped_to_zero() {
        let elevation = solar_elevation(45.0, WINTER_SOLSTICE_DAY, 0.0).unwrap();
        assert_eq!(elevation, 0.0, "Sun is below the horizon at winter midnight");
    }

    #[test]
    fn test_summer_noon_higher_than_winter_noon() {
        let summer = solar_elevation(23.0225, SUMMER_SOLSTICE_DAY, 12.0).unwrap();
        let winter = solar_elevation(23.0225, WINTER_SOLSTICE_DAY, 12.0).unwrap();
        assert!(summer > winter);
    }

    #[test]
    fn test_azimuth_morning_east_afternoon_west() {
        let morning = solar_azimuth(23.0225, SPRING_EQUINOX_DAY, 8.0).unwrap();
        let afternoon = solar_azimuth(23.0225, SPRING_EQUINOX_DAY, 16.0).unwrap();
        assert!(morning < 180.0, "Morning sun is in the east, got {morning}");
        assert!(afternoon > 180.0, "Afternoon sun is in the west, got {afternoon}");
    }

    #[test]
    fn test_azimuth_below_horizon_defaults_south() {
        let azimuth = solar_azimuth(45.0, WINTER_SOLSTICE_DAY, 0.0).unwrap();
        assert_eq!(azimuth, 180.0);
    }

    #[test]
    fn test_out_of_range_parameters_rejected() {
        assert!(solar_elevation(0.0, 0, 12.0).is_err());
        assert!(solar_elevation(0.0, 367, 12.0).is_err());
        assert!(solar_elevation(0.0, 100, -1.0).is_err());
        assert!(solar_elevation(0.0, 100, 25.0).is_err());
        assert!(solar_elevation(91.0, 100, 12.0).is_err());
    }

    #[test]
    fn test_sun_path_has_24_hours_and_is_restartable() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let first = sun_path(23.0225, 72.5714, date).unwrap();
        let second = sun_path(23.0225, 72.5714, date).unwrap();
        assert_eq!(first.len(), 24);
        assert_eq!(first, second, "Identical inputs must yield identical paths");
        assert!(first.iter().any(|p| p.elevation > 0.0), "Some daylight expected");
        assert!(first[0].elevation >= 0.0 && first[0].elevation <= 90.0);
    }
}
