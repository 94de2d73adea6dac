use serde::{Deserialize, Serialize};

use crate::energy::{GridSpec, StorageSpec, TariffSchedule};

/// Shape of the planning horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonSpec {
    /// Number of periods in the horizon
    pub periods: usize,
    /// Length of one period in minutes
    pub period_minutes: u32,
}

impl HorizonSpec {
    /// Length of one period in hours, the factor between W and Wh
    pub fn hours_per_period(&self) -> f64 {
        f64::from(self.period_minutes) / 60.0
    }
}

/// Complete description of one dispatch planning problem
///
/// A scenario is self-contained: several independent scenarios can be
/// built and solved in the same process without shared state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Horizon shape
    pub horizon: HorizonSpec,
    /// Forecast upper bound on renewable production per period in W;
    /// actual production may be curtailed below the cap
    pub production_cap_w: Vec<f64>,
    /// Fixed household consumption per period in W
    pub consumption_w: Vec<f64>,
    /// Storage system limits
    pub storage: StorageSpec,
    /// Grid connection limits
    pub grid: GridSpec,
    /// Optional prices for the revenue objective
    pub tariff: Option<TariffSchedule>,
}
