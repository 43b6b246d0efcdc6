//! Pre-solve validation and feasibility reporting
//! Provides O(layers) bounds and fast rejection of infeasible problems

pub mod types;
pub mod validator;

pub use types::FeasibilityReport;
pub use validator::assess;
