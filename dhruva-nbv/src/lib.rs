//! DhruvaNBV - Next-best-view planning for VacuumTiger
//!
//! Chooses where the sensor should go next by trading predicted information
//! gain against movement cost.
//!
//! ## Boundaries
//!
//! - **Robot**: [`robot::RobotChannel`] (pose, reachable views, cost, motion,
//!   data retrieval)
//! - **World model**: [`vastu_ig::WorldModelChannel`] (information gain queries)
//!
//! Both can be wrapped in [`bounded`] adapters so no call blocks forever.
//!
//! ## Example
//!
//! ```rust,ignore
//! use dhruva_nbv::planner::{PlannerConfig, ViewPlanner};
//!
//! let planner = ViewPlanner::new(robot, world, PlannerConfig::default())?;
//! let report = planner.run_episode();
//! println!("{} after {} rounds", report.outcome.label(), report.rounds.len());
//! ```

pub mod bounded;
pub mod config;
pub mod error;
pub mod planner;
pub mod robot;
pub mod simulation;
pub mod view;

pub use bounded::{BoundedRobot, BoundedWorldModel};
pub use config::{ChannelConfig, NbvConfig};
pub use error::{ChannelError, NbvError, Result};
pub use planner::{EpisodeOutcome, EpisodeReport, PlannerConfig, ViewPlanner, spawn_planner};
pub use robot::{ReceptionInfo, RobotChannel};
pub use view::{MovementCost, View, ViewId, ViewSpace};
