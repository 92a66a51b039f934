//! Planner configuration.

use serde::{Deserialize, Serialize};
use vastu_ig::{IgRetrievalCommand, Pose};

use crate::error::{NbvError, Result};

/// What to do when data retrieval fails after a successful move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrieveFailurePolicy {
    /// Log the failure and start the next round
    #[default]
    Replan,
    /// End the episode with `RetrieveAborted`
    Abort,
}

/// Score function selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UtilityConfig {
    /// `gain / max(cost, cost_epsilon)`
    #[default]
    GainPerCost,
    /// `gain - cost_weight * cost`
    WeightedLinear { cost_weight: f64 },
}

/// One information gain metric and its weight in the view gain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricWeight {
    pub name: String,
    #[serde(default = "default_metric_weight")]
    pub weight: f64,
}

impl MetricWeight {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// View planner configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Maximum select-move-sense rounds per episode (default: 10)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Episode converges when the best utility falls below this (default: 1e-3)
    #[serde(default = "default_min_utility")]
    pub min_utility: f64,

    /// Lower bound on the cost divisor (default: 1e-6)
    #[serde(default = "default_cost_epsilon")]
    pub cost_epsilon: f64,

    /// Move attempts per selected view before giving up (default: 3)
    #[serde(default = "default_max_move_attempts")]
    pub max_move_attempts: usize,

    /// Translation tolerance when re-validating a failed move (meters)
    #[serde(default = "default_pose_tolerance_m")]
    pub pose_tolerance_m: f64,

    /// Rotation tolerance when re-validating a failed move (radians)
    #[serde(default = "default_pose_tolerance_rad")]
    pub pose_tolerance_rad: f64,

    #[serde(default)]
    pub retrieve_failure: RetrieveFailurePolicy,

    /// Re-fetch the planning space every round (default: true)
    #[serde(default = "default_refresh_view_space")]
    pub refresh_view_space: bool,

    /// Allow selecting a view already visited this episode (default: false)
    #[serde(default)]
    pub revisit_views: bool,

    /// Candidate evaluation workers, 0 = available parallelism
    #[serde(default)]
    pub worker_threads: usize,

    #[serde(default)]
    pub utility: UtilityConfig,

    /// Metrics combined into the view gain
    #[serde(default = "default_metrics")]
    pub metrics: Vec<MetricWeight>,

    /// Ray casting parameters; path and metric names are filled per view
    #[serde(default)]
    pub ig: IgRetrievalCommand,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            min_utility: default_min_utility(),
            cost_epsilon: default_cost_epsilon(),
            max_move_attempts: default_max_move_attempts(),
            pose_tolerance_m: default_pose_tolerance_m(),
            pose_tolerance_rad: default_pose_tolerance_rad(),
            retrieve_failure: RetrieveFailurePolicy::default(),
            refresh_view_space: default_refresh_view_space(),
            revisit_views: false,
            worker_threads: 0,
            utility: UtilityConfig::default(),
            metrics: default_metrics(),
            ig: IgRetrievalCommand::default(),
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_move_attempts == 0 {
            return Err(NbvError::Config(
                "max_move_attempts must be at least 1".to_string(),
            ));
        }
        if !(self.cost_epsilon.is_finite() && self.cost_epsilon > 0.0) {
            return Err(NbvError::Config(format!(
                "cost_epsilon must be positive, got {}",
                self.cost_epsilon
            )));
        }
        if !self.min_utility.is_finite() {
            return Err(NbvError::Config("min_utility must be finite".to_string()));
        }
        if self.pose_tolerance_m < 0.0 || self.pose_tolerance_rad < 0.0 {
            return Err(NbvError::Config(
                "pose tolerances must not be negative".to_string(),
            ));
        }
        if let UtilityConfig::WeightedLinear { cost_weight } = self.utility
            && !(cost_weight.is_finite() && cost_weight >= 0.0)
        {
            return Err(NbvError::Config(format!(
                "cost_weight must be non-negative, got {}",
                cost_weight
            )));
        }
        if let Some(bad) = self.metrics.iter().find(|m| !m.weight.is_finite()) {
            return Err(NbvError::Config(format!(
                "metric '{}' has a non-finite weight",
                bad.name
            )));
        }
        // Catches empty metric lists and bad ray parameters up front
        self.command_for(&Pose::identity()).validate()?;
        Ok(())
    }

    /// Information gain command for one candidate pose.
    pub fn command_for(&self, pose: &Pose) -> IgRetrievalCommand {
        IgRetrievalCommand {
            path: vec![*pose],
            metric_names: self.metrics.iter().map(|m| m.name.clone()).collect(),
            ..self.ig.clone()
        }
    }
}

fn default_max_iterations() -> usize {
    10
}
fn default_min_utility() -> f64 {
    1e-3
}
fn default_cost_epsilon() -> f64 {
    1e-6
}
fn default_max_move_attempts() -> usize {
    3
}
fn default_pose_tolerance_m() -> f64 {
    0.01
}
fn default_pose_tolerance_rad() -> f64 {
    0.01
}
fn default_refresh_view_space() -> bool {
    true
}
fn default_metric_weight() -> f64 {
    1.0
}
fn default_metrics() -> Vec<MetricWeight> {
    vec![MetricWeight::new("occlusion_aware_total_ig", 1.0)]
}
