//! Movement cost value type.

use serde::{Deserialize, Serialize};

use crate::error::InvalidCost;

/// Decomposition of a movement cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Straight-line translation (meters)
    pub translation: f64,
    /// Rotation angle (radians)
    pub rotation: f64,
    /// Estimated travel time (seconds)
    pub duration_secs: f64,
}

/// Non-negative cost of moving between two views.
///
/// Costs are only comparable when produced by the same cost model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementCost {
    cost: f64,
    breakdown: Option<CostBreakdown>,
}

impl MovementCost {
    pub fn new(cost: f64) -> Result<Self, InvalidCost> {
        if !cost.is_finite() || cost < 0.0 {
            return Err(InvalidCost(cost));
        }
        Ok(Self {
            cost,
            breakdown: None,
        })
    }

    pub fn zero() -> Self {
        Self {
            cost: 0.0,
            breakdown: None,
        }
    }

    pub fn with_breakdown(mut self, breakdown: CostBreakdown) -> Self {
        self.breakdown = Some(breakdown);
        self
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Only present when the caller asked for it.
    pub fn breakdown(&self) -> Option<&CostBreakdown> {
        self.breakdown.as_ref()
    }
}
