//! Problem model: layers, option menus and the global budget

pub mod factored;
pub mod fixture;
pub mod presets;
pub mod types;

pub use factored::FactoredLayer;
pub use fixture::{LayerSpec, ProblemSpec};
pub use presets::{LayerUpdate, SparseUpdateProblem, SparseUpdateSpec};
pub use types::{within_budget, Layer, Problem, ProblemDefect, UpdateOption, COST_TOLERANCE};
