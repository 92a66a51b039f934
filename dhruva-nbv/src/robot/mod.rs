//! Robot boundary consumed by the view planner.
//!
//! A [`RobotChannel`] wraps whatever actually moves the sensor: a simulated
//! robot, a remote service client, or a test double. All calls block and the
//! robot executes at most one of them at a time.

mod sensor;
mod sim;

pub use sensor::SimulatedSensor;
pub use sim::{CostModel, SimulatedRobot};

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ChannelError;
use crate::view::{MovementCost, View, ViewSpace};

/// Outcome of a data retrieval command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceptionInfo {
    Succeeded,
    Failed,
}

impl ReceptionInfo {
    pub fn is_success(self) -> bool {
        self == ReceptionInfo::Succeeded
    }
}

/// Motion, pose and sensing interface of the robot.
pub trait RobotChannel: Send + Sync {
    /// View the robot currently occupies.
    ///
    /// Two calls without an intervening move return the same view.
    fn current_view(&self) -> Result<View, ChannelError>;

    /// Views the robot can reach right now.
    fn planning_space(&self) -> Result<ViewSpace, ChannelError>;

    /// Take a measurement at the current view and hand it to the world model.
    fn retrieve_data(&self) -> ReceptionInfo;

    /// Cost of moving from the current view to `target`.
    fn movement_cost(&self, target: &View) -> Result<MovementCost, ChannelError> {
        let current = self.current_view()?;
        self.movement_cost_between(&current, target, false)
    }

    /// Cost of moving from `start` to `target`.
    ///
    /// The breakdown is populated only when `fill_breakdown` is set.
    fn movement_cost_between(
        &self,
        start: &View,
        target: &View,
        fill_breakdown: bool,
    ) -> Result<MovementCost, ChannelError>;

    /// Move to `target`.
    ///
    /// After a failure the robot pose is unknown until the next
    /// [`current_view`](Self::current_view) call.
    fn move_to(&self, target: &View) -> Result<(), ChannelError>;
}

impl<T: RobotChannel + ?Sized> RobotChannel for Arc<T> {
    fn current_view(&self) -> Result<View, ChannelError> {
        (**self).current_view()
    }

    fn planning_space(&self) -> Result<ViewSpace, ChannelError> {
        (**self).planning_space()
    }

    fn retrieve_data(&self) -> ReceptionInfo {
        (**self).retrieve_data()
    }

    fn movement_cost(&self, target: &View) -> Result<MovementCost, ChannelError> {
        (**self).movement_cost(target)
    }

    fn movement_cost_between(
        &self,
        start: &View,
        target: &View,
        fill_breakdown: bool,
    ) -> Result<MovementCost, ChannelError> {
        (**self).movement_cost_between(start, target, fill_breakdown)
    }

    fn move_to(&self, target: &View) -> Result<(), ChannelError> {
        (**self).move_to(target)
    }
}
