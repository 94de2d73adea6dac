pub mod energy;
pub mod scenario;

// Re-export the scenario entry points for convenience
pub use scenario::{HorizonSpec, ScenarioSpec};
