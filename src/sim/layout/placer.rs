use anyhow::Result;
use geo::{coord, Area, BooleanOps, BoundingRect, Contains, MultiPolygon, Point, Rect};

use crate::geom::site::{resolve_usable_area, SitePolygon, UsableArea};
use crate::geom::spacing;
use crate::sim::solar;

use super::config::LayoutConfig;
use super::result::{LayoutResult, PlacedModule};

/// Minimum fraction of a module footprint that must fall inside the usable
/// area for the module to be kept. Rejects boundary slivers while accepting
/// near-complete overlaps on irregular edges.
const MIN_OVERLAP_FRACTION: f64 = 0.8;

/// Places modules over the site in south-to-north rows.
///
/// Row pitch is sized so that no row shades the next at winter-solstice
/// noon; a walkway is added on top. Rows sweep from the usable area's
/// southern edge northward and columns west to east, so identical inputs
/// always produce an identical, identically-ordered module list.
pub fn place_modules(site: &SitePolygon, config: &LayoutConfig) -> Result<LayoutResult> {
    config.validate()?;

    let usable = resolve_usable_area(site, config.margin)?;
    let usable_polygon = match usable {
        UsableArea::Area(mp) => mp,
        UsableArea::Empty => {
            return Ok(LayoutResult::degenerate(
                0.0,
                "usable area is zero after applying margins",
            ));
        }
    };
    let usable_area = usable_polygon.unsigned_area();

    // Winter-solstice noon is the worst case for inter-row shading.
    let solar_elevation = solar::winter_solstice_angle(config.latitude);
    if solar_elevation <= 0.0 {
        return Ok(LayoutResult::degenerate(
            usable_area,
            format!("invalid solar elevation angle: {solar_elevation}°"),
        ));
    }

    let row_pitch = spacing::row_pitch(config.module_length, config.tilt_angle, solar_elevation)?;
    let total_row_spacing = row_pitch + config.walkway_width;
    let actual_gcr = spacing::gcr(config.module_length, row_pitch)?;

    let bounds = match usable_polygon.bounding_rect() {
        Some(rect) => rect,
        None => {
            return Ok(LayoutResult::degenerate(
                0.0,
                "usable area is zero after applying margins",
            ));
        }
    };
    let (min_x, min_y) = (bounds.min().x, bounds.min().y);
    let (max_x, max_y) = (bounds.max().x, bounds.max().y);

    let mut modules: Vec<PlacedModule> = Vec::new();
    let mut rows = 0usize;

    let mut current_y = min_y;
    while current_y + config.module_length <= max_y {
        let mut placed_in_row = 0usize;
        let mut current_x = min_x;

        while current_x + config.module_width <= max_x {
            let center = (
                current_x + config.module_width / 2.0,
                current_y + config.module_length / 2.0,
            );

            if usable_polygon.contains(&Point::new(center.0, center.1)) {
                let footprint = module_footprint(current_x, current_y, config);
                let overlap = usable_polygon.intersection(&footprint).unsigned_area();
                if overlap >= footprint.unsigned_area() * MIN_OVERLAP_FRACTION {
                    modules.push(PlacedModule {
                        position: (current_x, current_y),
                        center,
                        row: rows,
                        orientation: config.orientation,
                        rotation: 0.0,
                    });
                    placed_in_row += 1;
                }
            }

            current_x += config.module_width;
        }

        if placed_in_row > 0 {
            rows += 1;
        }
        current_y += total_row_spacing;
    }

    let total_modules = modules.len();
    let capacity_kwp = total_modules as f64 * config.module_power / 1000.0;
    let modules_per_row = if rows > 0 {
        total_modules as f64 / rows as f64
    } else {
        0.0
    };

    Ok(LayoutResult {
        modules,
        rows,
        modules_per_row,
        total_modules,
        capacity_kwp,
        actual_gcr,
        usable_area,
        row_pitch,
        row_spacing: total_row_spacing,
        module_area: config.module_area(),
        solar_elevation,
        error: None,
    })
}

/// Axis-aligned module footprint as a one-part multipolygon, so it can be
/// intersected with the (possibly multi-part) usable area.
fn module_footprint(x: f64, y: f64, config: &LayoutConfig) -> MultiPolygon<f64> {
    let rect = Rect::new(
        coord! { x: x, y: y },
        coord! { x: x + config.module_width, y: y + config.module_length },
    );
    MultiPolygon::new(vec![rect.to_polygon()])
}
