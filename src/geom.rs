pub mod site;
pub mod spacing;

/// Geometric precision for area emptiness checks
const EPS: f64 = 1e-9;
