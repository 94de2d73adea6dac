use serde::{Deserialize, Serialize};

/// Connection limits towards the external grid
///
/// Grid net power is import-positive. Both limits are non-negative
/// magnitudes in W: `max_sell_w` is the feed-in (export) cap, e.g. a
/// regulatory 70 % rule, and `max_sell_w == 0.0` bans export entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Maximum power bought from the grid in W (contractual/physical cap)
    pub max_buy_w: f64,
    /// Maximum power sold to the grid in W (feed-in limit)
    pub max_sell_w: f64,
}

impl GridSpec {
    /// A connection that allows buying up to `max_buy_w` but no export
    pub fn import_only(max_buy_w: f64) -> Self {
        Self {
            max_buy_w,
            max_sell_w: 0.0,
        }
    }
}
