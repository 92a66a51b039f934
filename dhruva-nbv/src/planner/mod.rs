//! Next-best-view selection loop.
//!
//! - [`ViewPlanner`]: the INIT → EVALUATE → SELECT → MOVE → RETRIEVE cycle
//! - [`UtilityPolicy`]: gain/cost trade-off, replaceable
//! - [`spawn_planner`]: run an episode on a background thread

mod config;
mod episode;
mod evaluate;
mod select;
mod thread;
mod utility;

pub use config::{MetricWeight, PlannerConfig, RetrieveFailurePolicy, UtilityConfig};
pub use episode::{EpisodeOutcome, EpisodeReport, RoundRecord, ViewPlanner};
pub use evaluate::{Candidate, Exclusion, ExclusionReason, RoundEvaluation};
pub use select::select_best;
pub use thread::{PlannerHandle, spawn_planner};
pub use utility::{GainPerCost, UtilityPolicy, WeightedLinear};
