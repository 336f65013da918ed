use anyhow::{bail, Result};
use geo::{Area, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};

use super::EPS;

/// Site boundary in a local projected coordinate system (meters).
///
/// Vertices form a simple (non-self-intersecting) ring in drawing order.
/// The ring is closed implicitly, so the first vertex does not need to be
/// repeated at the end. Callers are responsible for projecting lat/lon
/// coordinates to planar meters before constructing the polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitePolygon {
    vertices: Vec<(f64, f64)>,
}

impl SitePolygon {
    /// Creates a site polygon from projected (x, y) vertices in meters.
    pub fn new(vertices: Vec<(f64, f64)>) -> Result<Self> {
        if vertices.len() < 3 {
            bail!(
                "site polygon must have at least 3 vertices, got {}",
                vertices.len()
            );
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Converts to a `geo` polygon (exterior ring only, no holes).
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::from(self.vertices.clone()), vec![])
    }

    /// Site area in square meters.
    pub fn area(&self) -> f64 {
        self.to_polygon().unsigned_area()
    }
}

/// Result of eroding a site polygon by its perimeter margin.
///
/// `Empty` is a normal domain outcome (margin too large for the site), not
/// an error: placement reports it as a zero-module layout with a reason.
#[derive(Debug, Clone)]
pub enum UsableArea {
    /// Eroded area; may consist of several parts if the erosion split the site.
    Area(MultiPolygon<f64>),
    Empty,
}

impl UsableArea {
    pub fn is_empty(&self) -> bool {
        matches!(self, UsableArea::Empty)
    }

    /// Usable area in square meters (0 when empty).
    pub fn area(&self) -> f64 {
        match self {
            UsableArea::Area(mp) => mp.unsigned_area(),
            UsableArea::Empty => 0.0,
        }
    }
}

/// Erodes the site polygon inward by `margin` meters.
///
/// The erosion is a negative buffer. A margin larger than the site can
/// absorb collapses the polygon and yields [`UsableArea::Empty`].
pub fn resolve_usable_area(site: &SitePolygon, margin: f64) -> Result<UsableArea> {
    if margin < 0.0 {
        bail!("margin must be non-negative, got {margin}");
    }

    let polygon = site.to_polygon();
    let eroded = if margin == 0.0 {
        MultiPolygon::new(vec![polygon])
    } else {
        geo_buffer::buffer_polygon(&polygon, -margin)
    };

    if eroded.0.is_empty() || eroded.unsigned_area() <= EPS {
        return Ok(UsableArea::Empty);
    }
    Ok(UsableArea::Area(eroded))
}

/// Area of a polygon given as raw projected coordinates.
pub fn polygon_area(coordinates: &[(f64, f64)]) -> Result<f64> {
    if coordinates.len() < 3 {
        bail!(
            "polygon must have at least 3 vertices, got {}",
            coordinates.len()
        );
    }
    let polygon = Polygon::new(LineString::from(coordinates.to_vec()), vec![]);
    Ok(polygon.unsigned_area())
}

/// Euclidean distance between two projected points.
pub fn distance(p1: (f64, f64), p2: (f64, f64)) -> f64 {
    ((p2.0 - p1.0).powi(2) + (p2.1 - p1.1).powi(2)).sqrt()
}
