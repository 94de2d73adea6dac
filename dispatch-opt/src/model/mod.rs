pub mod flow;
pub mod grid;
pub mod horizon;
pub mod period;
pub mod storage;

pub use flow::{Flow, FlowRole};
pub use grid::GridModel;
pub use horizon::{DispatchOutcome, Horizon, HorizonBuilder, Objective, SolveOptions};
pub use period::Period;
pub use storage::StorageModel;
