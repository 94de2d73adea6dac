pub mod error;
pub mod model;
pub mod plot;
pub mod report;
pub mod solve;

// Re-export commonly used items for convenience
pub use error::{ModelError, SolveError};
pub use model::horizon::{DispatchOutcome, Horizon, HorizonBuilder, SolveOptions};
pub use report::DispatchSchedule;
pub use solve::{Direction, SolveStatus};
