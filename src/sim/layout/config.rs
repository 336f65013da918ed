use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Default walkway width between arrays [m].
pub const DEFAULT_WALKWAY_WIDTH: f64 = 3.0;

/// Module mounting orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Placement configuration for one PV array field.
///
/// All lengths are in meters, angles in degrees, power in watts. Module
/// length runs in the tilt direction, width perpendicular to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Site latitude [degrees, positive north].
    pub latitude: f64,
    /// Module length in the tilt direction [m].
    pub module_length: f64,
    /// Module width perpendicular to the tilt direction [m].
    pub module_width: f64,
    /// Module power rating [W].
    pub module_power: f64,
    /// Module tilt angle [degrees].
    pub tilt_angle: f64,
    /// Mounting orientation of the modules.
    #[serde(default)]
    pub orientation: Orientation,
    /// Walkway width added to the row pitch [m].
    #[serde(default = "default_walkway_width")]
    pub walkway_width: f64,
    /// Perimeter setback eroded off the site boundary [m].
    pub margin: f64,
}

fn default_walkway_width() -> f64 {
    DEFAULT_WALKWAY_WIDTH
}

impl LayoutConfig {
    pub fn new(
        latitude: f64,
        module_length: f64,
        module_width: f64,
        module_power: f64,
        tilt_angle: f64,
        margin: f64,
    ) -> Self {
        Self {
            latitude,
            module_length,
            module_width,
            module_power,
            tilt_angle,
            orientation: Orientation::Portrait,
            walkway_width: DEFAULT_WALKWAY_WIDTH,
            margin,
        }
    }

    /// Validates every field once at the placement boundary.
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            bail!("latitude must be between -90 and 90 degrees, got {}", self.latitude);
        }
        if self.module_length <= 0.0 {
            bail!("module_length must be positive, got {}", self.module_length);
        }
        if self.module_width <= 0.0 {
            bail!("module_width must be positive, got {}", self.module_width);
        }
        if self.module_power <= 0.0 {
            bail!("module_power must be positive, got {}", self.module_power);
        }
        if !(0.0..=90.0).contains(&self.tilt_angle) {
            bail!("tilt_angle must be between 0 and 90 degrees, got {}", self.tilt_angle);
        }
        if self.walkway_width < 0.0 {
            bail!("walkway_width must be non-negative, got {}", self.walkway_width);
        }
        if self.margin < 0.0 {
            bail!("margin must be non-negative, got {}", self.margin);
        }
        Ok(())
    }

    /// Footprint area of a single module [m²].
    pub fn module_area(&self) -> f64 {
        self.module_length * self.module_width
    }
}

/// Module dimensions and rating used by the sizing estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModuleDims {
    /// Length in the tilt direction [m].
    pub length: f64,
    /// Width perpendicular to the tilt direction [m].
    pub width: f64,
    /// Power rating [W].
    pub power: f64,
}

impl ModuleDims {
    /// Footprint area [m²].
    pub fn area(&self) -> f64 {
        self.length * self.width
    }
}
