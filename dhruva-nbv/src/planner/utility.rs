//! Gain/cost trade-off policies.

use super::config::UtilityConfig;
use crate::view::MovementCost;

/// Combines a view's gain and movement cost into a selection score.
pub trait UtilityPolicy: Send + Sync {
    fn name(&self) -> &'static str;

    fn utility(&self, gain: f64, cost: &MovementCost) -> f64;
}

/// `gain / max(cost, epsilon)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GainPerCost {
    pub epsilon: f64,
}

impl UtilityPolicy for GainPerCost {
    fn name(&self) -> &'static str {
        "gain_per_cost"
    }

    fn utility(&self, gain: f64, cost: &MovementCost) -> f64 {
        gain / cost.cost().max(self.epsilon)
    }
}

/// `gain - cost_weight * cost`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedLinear {
    pub cost_weight: f64,
}

impl UtilityPolicy for WeightedLinear {
    fn name(&self) -> &'static str {
        "weighted_linear"
    }

    fn utility(&self, gain: f64, cost: &MovementCost) -> f64 {
        gain - self.cost_weight * cost.cost()
    }
}

impl UtilityConfig {
    pub fn build(&self, cost_epsilon: f64) -> Box<dyn UtilityPolicy> {
        match *self {
            UtilityConfig::GainPerCost => Box::new(GainPerCost {
                epsilon: cost_epsilon,
            }),
            UtilityConfig::WeightedLinear { cost_weight } => {
                Box::new(WeightedLinear { cost_weight })
            }
        }
    }
}
