pub mod geom;
pub mod sim;

// Prelude
pub use geom::site::{resolve_usable_area, SitePolygon, UsableArea};
pub use sim::layout::config::{LayoutConfig, ModuleDims, Orientation};
pub use sim::layout::optimizer::optimize_layout;
pub use sim::layout::placer::place_modules;
pub use sim::layout::result::{LayoutResult, PlacedModule, SizingEstimate};
pub use sim::solar::SolarPosition;
