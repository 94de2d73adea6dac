pub mod grid;
pub mod storage;
pub mod tariff;

pub use grid::GridSpec;
pub use storage::StorageSpec;
pub use tariff::TariffSchedule;
