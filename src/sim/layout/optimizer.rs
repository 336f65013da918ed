use anyhow::{bail, Result};

use crate::geom::spacing;
use crate::sim::solar;

use super::config::ModuleDims;
use super::result::SizingEstimate;

/// Valid Ground Coverage Ratio band for utility-scale layouts.
pub const GCR_RANGE: (f64, f64) = (0.2, 0.7);

/// Module count from plain area arithmetic: total covered area over the
/// footprint of one module.
fn estimate_module_count(site_area: f64, module_area: f64, gcr: f64) -> Result<usize> {
    if site_area <= 0.0 || module_area <= 0.0 {
        return Ok(0);
    }
    if gcr <= 0.0 || gcr > 1.0 {
        bail!("GCR must be between 0 and 1, got {gcr}");
    }
    Ok((site_area * gcr / module_area).floor() as usize)
}

/// Fast what-if sizing for a site of known area, without polygon geometry.
///
/// The pitch implied by `target_gcr` is floored by the shadow-free pitch,
/// so a caller asking for an unrealistically dense layout still gets one
/// that never self-shades at winter-solstice noon. The achieved GCR is
/// recomputed from the chosen pitch.
pub fn optimize_layout(
    site_area: f64,
    dims: &ModuleDims,
    target_gcr: f64,
    latitude: f64,
    tilt_angle: f64,
) -> Result<SizingEstimate> {
    if !(GCR_RANGE.0..=GCR_RANGE.1).contains(&target_gcr) {
        bail!(
            "target GCR must be between {} and {}, got {target_gcr}",
            GCR_RANGE.0,
            GCR_RANGE.1
        );
    }
    if dims.length <= 0.0 || dims.width <= 0.0 {
        bail!(
            "module dimensions must be positive, got {} x {}",
            dims.length,
            dims.width
        );
    }
    if dims.power <= 0.0 {
        bail!("module power must be positive, got {}", dims.power);
    }
    if !(0.0..=90.0).contains(&tilt_angle) {
        bail!("tilt_angle must be between 0 and 90 degrees, got {tilt_angle}");
    }

    let solar_elevation = solar::winter_solstice_angle(latitude);
    if solar_elevation <= 0.0 {
        bail!("invalid solar elevation angle: {solar_elevation}° at latitude {latitude}");
    }

    let pitch_no_shading = spacing::row_pitch(dims.length, tilt_angle, solar_elevation)?;
    let pitch_target = dims.length / target_gcr;
    let row_pitch = pitch_no_shading.max(pitch_target);

    let gcr = spacing::gcr(dims.length, row_pitch)?;
    let module_area = dims.area();
    let recommended_modules = estimate_module_count(site_area, module_area, gcr)?;
    let capacity_kwp = recommended_modules as f64 * dims.power / 1000.0;

    Ok(SizingEstimate {
        recommended_modules,
        row_pitch,
        gcr,
        capacity_kwp,
        module_area,
        total_module_area: recommended_modules as f64 * module_area,
        solar_elevation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_dims() -> ModuleDims {
        ModuleDims {
            length: 2.278,
            width: 1.134,
            power: 545.0,
        }
    }

    #[test]
    fn test_estimate_on_one_hectare() {
        let estimate = optimize_layout(10_000.0, &reference_dims(), 0.4, 23.0225, 15.0).unwrap();
        assert!(estimate.recommended_modules > 0);
        assert!(estimate.gcr <= 0.4 + 1e-12, "Achieved GCR cannot exceed the target");
        assert!(estimate.row_pitch >= reference_dims().length / 0.4 - 1e-12);
        let expected_kwp = estimate.recommended_modules as f64 * 545.0 / 1000.0;
        assert_eq!(estimate.capacity_kwp, expected_kwp);
    }

    #[test]
    fn test_shading_floor_overrides_dense_target() {
        // At high latitude the winter sun is low, so the shadow-free pitch
        // is much wider than a dense GCR target would allow.
        let dims = reference_dims();
        let estimate = optimize_layout(10_000.0, &dims, 0.7, 55.0, 30.0).unwrap();
        let pitch_target = dims.length / 0.7;
        assert!(
            estimate.row_pitch > pitch_target,
            "Shadow-free pitch must win: {} vs {}",
            estimate.row_pitch,
            pitch_target
        );
        assert!(estimate.gcr < 0.7);
    }

    #[test]
    fn test_estimate_scales_with_area() {
        let small = optimize_layout(5_000.0, &reference_dims(), 0.4, 23.0225, 15.0).unwrap();
        let large = optimize_layout(50_000.0, &reference_dims(), 0.4, 23.0225, 15.0).unwrap();
        assert!(large.recommended_modules > 9 * small.recommended_modules);
    }

    #[test]
    fn test_zero_area_estimates_zero_modules() {
        let estimate = optimize_layout(0.0, &reference_dims(), 0.4, 23.0225, 15.0).unwrap();
        assert_eq!(estimate.recommended_modules, 0);
        assert_eq!(estimate.capacity_kwp, 0.0);
    }

    #[test]
    fn test_gcr_band_enforced() {
        assert!(optimize_layout(10_000.0, &reference_dims(), 0.1, 23.0225, 15.0).is_err());
        assert!(optimize_layout(10_000.0, &reference_dims(), 0.8, 23.0225, 15.0).is_err());
    }

    #[test]
    fn test_polar_latitude_is_a_hard_error() {
        assert!(optimize_layout(10_000.0, &reference_dims(), 0.4, 80.0, 15.0).is_err());
    }

    #[test]
    fn test_invalid_dims_rejected() {
        let mut dims = reference_dims();
        dims.length = 0.0;
        assert!(optimize_layout(10_000.0, &dims, 0.4, 23.0225, 15.0).is_err());

        let mut dims = reference_dims();
        dims.power = -5.0;
        assert!(optimize_layout(10_000.0, &dims, 0.4, 23.0225, 15.0).is_err());
    }
}
