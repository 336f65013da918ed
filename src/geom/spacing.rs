use anyhow::{bail, Result};

/// Row-to-row spacing that keeps the next row out of this row's shadow.
///
/// `R = L·cos(β) + L·sin(β)/tan(α)` where `L` is the module length in the
/// tilt direction, `β` the tilt angle and `α` the reference solar elevation
/// (both in degrees): the horizontal footprint of the tilted module plus the
/// shadow its raised edge casts at the reference sun angle.
pub fn row_pitch(module_length: f64, tilt_angle: f64, solar_elevation: f64) -> Result<f64> {
    if solar_elevation <= 0.0 || solar_elevation >= 90.0 {
        bail!("solar elevation angle must be between 0 and 90 degrees, got {solar_elevation}");
    }

    let beta = tilt_angle.to_radians();
    let alpha = solar_elevation.to_radians();

    let horizontal_projection = module_length * beta.cos();
    let shadow_length = module_length * beta.sin() / alpha.tan();

    Ok(horizontal_projection + shadow_length)
}

/// Ground Coverage Ratio: module length over row pitch.
pub fn gcr(module_length: f64, row_pitch: f64) -> Result<f64> {
    if row_pitch <= 0.0 {
        bail!("row pitch must be positive, got {row_pitch}");
    }
    Ok(module_length / row_pitch)
}
