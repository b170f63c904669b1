//! Feature-effect analyses for fitted regression models

pub mod grid;
pub mod hull;
pub mod importance;
pub mod pdp;

pub use grid::{build_grid, GridValue};
pub use hull::ConvexHull;
pub use importance::{ImportanceResult, PermutationImportance};
pub use pdp::{IceResult, PartialDependence, Pdp2dCell, Pdp2dResult, PdpResult};
