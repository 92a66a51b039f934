//! Scripted robot and world model for planner tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use dhruva_nbv::planner::{MetricWeight, PlannerConfig};
use dhruva_nbv::{ChannelError, MovementCost, ReceptionInfo, RobotChannel, View, ViewId, ViewSpace};
use nalgebra::Isometry3;
use parking_lot::Mutex;
use vastu_ig::{IgError, IgResponse, IgRetrievalCommand, IgRetrievalResult, WorldModelChannel};

/// Metric name understood by [`ScriptedWorld`].
pub const GAIN_METRIC: &str = "scripted_gain";

/// View `id` sits at x = `id` so the world model can recover it from the pose.
pub fn view(id: u32) -> View {
    View::new(ViewId(id), Isometry3::translation(f64::from(id), 0.0, 0.0))
}

/// Planner config using only [`GAIN_METRIC`].
pub fn planner_config() -> PlannerConfig {
    PlannerConfig {
        metrics: vec![MetricWeight::new(GAIN_METRIC, 1.0)],
        worker_threads: 2,
        ..Default::default()
    }
}

#[derive(Default)]
struct RobotState {
    current: Option<View>,
    always_fail: HashSet<ViewId>,
    fail_once: HashSet<ViewId>,
    arrive_despite_failure: HashSet<ViewId>,
    planning_unavailable: bool,
    reception: Option<ReceptionInfo>,
    move_attempts: Vec<ViewId>,
    retrievals: usize,
}

/// Robot with table-driven costs and injectable failures.
pub struct ScriptedRobot {
    views: Vec<View>,
    costs: HashMap<ViewId, f64>,
    failing_costs: HashSet<ViewId>,
    planning_delay: Duration,
    state: Mutex<RobotState>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl ScriptedRobot {
    /// Robot at a start view (id 100) with the given `(id, cost)` table.
    pub fn new(costs: &[(u32, f64)]) -> Self {
        Self {
            views: costs.iter().map(|&(id, _)| view(id)).collect(),
            costs: costs.iter().map(|&(id, c)| (ViewId(id), c)).collect(),
            failing_costs: HashSet::new(),
            planning_delay: Duration::ZERO,
            state: Mutex::new(RobotState {
                current: Some(view(100)),
                ..Default::default()
            }),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    pub fn with_failing_cost(mut self, id: u32) -> Self {
        self.failing_costs.insert(ViewId(id));
        self
    }

    pub fn with_planning_delay(mut self, delay: Duration) -> Self {
        self.planning_delay = delay;
        self
    }

    /// Place the robot at view `id` of its table.
    pub fn start_at(self, id: u32) -> Self {
        self.state.lock().current = Some(view(id));
        self
    }

    pub fn always_fail_moves_to(&self, id: u32) {
        self.state.lock().always_fail.insert(ViewId(id));
    }

    pub fn fail_first_move_to(&self, id: u32) {
        self.state.lock().fail_once.insert(ViewId(id));
    }

    /// Moves to `id` reach the target but still report failure.
    pub fn arrive_despite_failure(&self, id: u32) {
        let mut state = self.state.lock();
        state.always_fail.insert(ViewId(id));
        state.arrive_despite_failure.insert(ViewId(id));
    }

    pub fn set_planning_unavailable(&self) {
        self.state.lock().planning_unavailable = true;
    }

    pub fn set_reception(&self, reception: ReceptionInfo) {
        self.state.lock().reception = Some(reception);
    }

    pub fn move_attempts(&self) -> Vec<ViewId> {
        self.state.lock().move_attempts.clone()
    }

    pub fn retrievals(&self) -> usize {
        self.state.lock().retrievals
    }

    /// Largest number of exclusive robot calls seen running at once.
    pub fn max_concurrent_calls(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    fn exclusive<T>(&self, f: impl FnOnce() -> T) -> T {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(1));
        let result = f();
        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

impl RobotChannel for ScriptedRobot {
    fn current_view(&self) -> Result<View, ChannelError> {
        self.state
            .lock()
            .current
            .clone()
            .ok_or_else(|| ChannelError::Communication("pose unknown".to_string()))
    }

    fn planning_space(&self) -> Result<ViewSpace, ChannelError> {
        thread::sleep(self.planning_delay);
        if self.state.lock().planning_unavailable {
            return Err(ChannelError::Unavailable);
        }
        ViewSpace::from_views(self.views.clone())
            .map_err(|e| ChannelError::Computation(e.to_string()))
    }

    fn retrieve_data(&self) -> ReceptionInfo {
        self.exclusive(|| {
            let mut state = self.state.lock();
            state.retrievals += 1;
            state.reception.unwrap_or(ReceptionInfo::Succeeded)
        })
    }

    fn movement_cost_between(
        &self,
        _start: &View,
        target: &View,
        _fill_breakdown: bool,
    ) -> Result<MovementCost, ChannelError> {
        self.exclusive(|| {
            if self.failing_costs.contains(&target.id()) {
                return Err(ChannelError::Computation("no path".to_string()));
            }
            let cost = self.costs.get(&target.id()).copied().unwrap_or(1.0);
            MovementCost::new(cost).map_err(|e| ChannelError::Computation(e.to_string()))
        })
    }

    fn move_to(&self, target: &View) -> Result<(), ChannelError> {
        self.exclusive(|| {
            let mut state = self.state.lock();
            state.move_attempts.push(target.id());
            if state.fail_once.remove(&target.id()) || state.always_fail.contains(&target.id()) {
                state.current = if state.arrive_despite_failure.contains(&target.id()) {
                    Some(target.clone())
                } else {
                    Some(view(100))
                };
                return Err(ChannelError::Communication("motion aborted".to_string()));
            }
            state.current = Some(target.clone());
            Ok(())
        })
    }
}

/// World model returning scripted gains keyed by view id.
pub struct ScriptedWorld {
    gains: HashMap<ViewId, f64>,
    overrides: HashMap<ViewId, IgRetrievalResult>,
    slow: HashSet<ViewId>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedWorld {
    pub fn new(gains: &[(u32, f64)]) -> Self {
        Self {
            gains: gains.iter().map(|&(id, g)| (ViewId(id), g)).collect(),
            overrides: HashMap::new(),
            slow: HashSet::new(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer every query about `id` with `result`.
    pub fn with_result(mut self, id: u32, result: IgRetrievalResult) -> Self {
        self.overrides.insert(ViewId(id), result);
        self
    }

    /// Delay queries about `id`.
    pub fn with_slow_view(mut self, id: u32, delay: Duration) -> Self {
        self.slow.insert(ViewId(id));
        self.delay = delay;
        self
    }

    /// Delay every query.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.slow = self.gains.keys().copied().collect();
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl WorldModelChannel for ScriptedWorld {
    fn view_information_gain(&self, command: &IgRetrievalCommand) -> Result<IgResponse, IgError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let pose = command
            .path
            .first()
            .ok_or_else(|| IgError::ConfigurationInvalid("empty path".to_string()))?;
        let id = ViewId(pose.translation.vector.x.round() as u32);
        if self.slow.contains(&id) {
            thread::sleep(self.delay);
        }

        let results = command
            .metric_names
            .iter()
            .map(|name| {
                if name != GAIN_METRIC {
                    return IgRetrievalResult::UnknownMetric;
                }
                if let Some(result) = self.overrides.get(&id) {
                    return *result;
                }
                match self.gains.get(&id) {
                    Some(&gain) => IgRetrievalResult::Succeeded {
                        predicted_gain: gain,
                    },
                    None => IgRetrievalResult::Failed,
                }
            })
            .collect();
        Ok(IgResponse::from_results(results))
    }
}
