use serde::{Deserialize, Serialize};

/// Per-period electricity prices
///
/// Tariffs only feed objective expressions; they never constrain
/// feasibility. Prices are per kWh and may be negative (negative
/// electricity prices make curtailment profitable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffSchedule {
    /// Cost per kWh bought from the grid, one entry per period
    pub buy_cost_per_kwh: Vec<f64>,
    /// Price per kWh sold to the grid, one entry per period
    pub sell_price_per_kwh: Vec<f64>,
}

impl TariffSchedule {
    /// A flat tariff with the same buy cost and sell price in every period
    pub fn flat(periods: usize, buy_cost_per_kwh: f64, sell_price_per_kwh: f64) -> Self {
        Self {
            buy_cost_per_kwh: vec![buy_cost_per_kwh; periods],
            sell_price_per_kwh: vec![sell_price_per_kwh; periods],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_tariff_repeats_prices() {
        let tariff = TariffSchedule::flat(4, 0.30, 0.10);
        assert_eq!(tariff.buy_cost_per_kwh, vec![0.30; 4]);
        assert_eq!(tariff.sell_price_per_kwh, vec![0.10; 4]);
    }
}
