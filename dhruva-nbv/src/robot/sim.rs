//! In-process simulated robot.

use std::collections::HashSet;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use vastu_ig::{rotation_distance, translation_distance};

use super::{ReceptionInfo, RobotChannel, SimulatedSensor};
use crate::error::ChannelError;
use crate::view::{CostBreakdown, MovementCost, View, ViewId, ViewSpace};

/// Linear cost model: `translation_weight * meters + rotation_weight * radians`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// Cost per meter of translation (default: 1.0)
    pub translation_weight: f64,
    /// Cost per radian of rotation (default: 0.5)
    pub rotation_weight: f64,
    /// Travel speed used for the duration estimate in m/s (default: 0.3)
    pub linear_speed: f64,
    /// Turn rate used for the duration estimate in rad/s (default: 0.8)
    pub angular_speed: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            translation_weight: 1.0,
            rotation_weight: 0.5,
            linear_speed: 0.3,
            angular_speed: 0.8,
        }
    }
}

impl CostModel {
    pub fn cost(&self, start: &View, target: &View, fill_breakdown: bool) -> Result<MovementCost, ChannelError> {
        let translation = translation_distance(start.pose(), target.pose());
        let rotation = rotation_distance(start.pose(), target.pose());
        let value = self.translation_weight * translation + self.rotation_weight * rotation;

        let cost = MovementCost::new(value).map_err(|e| ChannelError::Computation(e.to_string()))?;
        if !fill_breakdown {
            return Ok(cost);
        }

        let duration_secs = (translation / self.linear_speed).max(rotation / self.angular_speed);
        Ok(cost.with_breakdown(CostBreakdown {
            translation,
            rotation,
            duration_secs,
        }))
    }
}

struct SimState {
    current: View,
    planning_unavailable: bool,
    refused: HashSet<ViewId>,
    moves: usize,
    retrievals: usize,
}

/// Robot that teleports between the views of a fixed [`ViewSpace`].
///
/// Moves are instantaneous. Failures can be injected to exercise planner
/// recovery: an unavailable planning space, or views that refuse moves.
pub struct SimulatedRobot {
    space: ViewSpace,
    cost_model: CostModel,
    sensor: Option<SimulatedSensor>,
    state: Mutex<SimState>,
}

impl SimulatedRobot {
    pub fn new(space: ViewSpace, start: View, cost_model: CostModel) -> Self {
        Self {
            space,
            cost_model,
            sensor: None,
            state: Mutex::new(SimState {
                current: start,
                planning_unavailable: false,
                refused: HashSet::new(),
                moves: 0,
                retrievals: 0,
            }),
        }
    }

    /// Reveal ground truth into a belief map on every retrieval.
    pub fn with_sensor(mut self, sensor: SimulatedSensor) -> Self {
        self.sensor = Some(sensor);
        self
    }

    pub fn set_planning_unavailable(&self, unavailable: bool) {
        self.state.lock().planning_unavailable = unavailable;
    }

    /// Make every move to `id` fail.
    pub fn refuse_moves_to(&self, id: ViewId) {
        self.state.lock().refused.insert(id);
    }

    /// Successful moves so far.
    pub fn move_count(&self) -> usize {
        self.state.lock().moves
    }

    /// Retrievals so far, successful or not.
    pub fn retrieval_count(&self) -> usize {
        self.state.lock().retrievals
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }
}

impl RobotChannel for SimulatedRobot {
    fn current_view(&self) -> Result<View, ChannelError> {
        Ok(self.state.lock().current.clone())
    }

    fn planning_space(&self) -> Result<ViewSpace, ChannelError> {
        if self.state.lock().planning_unavailable {
            return Err(ChannelError::Unavailable);
        }
        Ok(self.space.clone())
    }

    fn retrieve_data(&self) -> ReceptionInfo {
        let pose = {
            let mut state = self.state.lock();
            state.retrievals += 1;
            *state.current.pose()
        };

        let Some(sensor) = &self.sensor else {
            return ReceptionInfo::Succeeded;
        };
        match sensor.observe(&pose) {
            Ok(revealed) => {
                tracing::debug!("Simulated measurement revealed {} voxels", revealed);
                ReceptionInfo::Succeeded
            }
            Err(e) => {
                tracing::warn!("Simulated measurement failed: {}", e);
                ReceptionInfo::Failed
            }
        }
    }

    fn movement_cost_between(
        &self,
        start: &View,
        target: &View,
        fill_breakdown: bool,
    ) -> Result<MovementCost, ChannelError> {
        self.cost_model.cost(start, target, fill_breakdown)
    }

    fn move_to(&self, target: &View) -> Result<(), ChannelError> {
        let mut state = self.state.lock();
        if state.refused.contains(&target.id()) {
            return Err(ChannelError::Communication(format!(
                "view {} refused the move",
                target.id()
            )));
        }
        let Some(known) = self.space.get(target.id()) else {
            return Err(ChannelError::Communication(format!(
                "view {} is not in the planning space",
                target.id()
            )));
        };
        if !known.is_candidate() {
            return Err(ChannelError::Communication(format!(
                "view {} is not reachable",
                target.id()
            )));
        }
        state.current = known.clone();
        state.moves += 1;
        Ok(())
    }
}
