//! Background planner thread.

use std::thread::{self, JoinHandle};

use vastu_ig::{CancelToken, WorldModelChannel};

use super::episode::{EpisodeReport, ViewPlanner};
use crate::error::{NbvError, Result};
use crate::robot::RobotChannel;

/// Handle to an episode running on its own thread.
pub struct PlannerHandle {
    cancel: CancelToken,
    handle: JoinHandle<EpisodeReport>,
}

impl PlannerHandle {
    /// Request cooperative cancellation; in-flight ray casts stop at the
    /// next ray if the world model shares the planner's token.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the episode to end.
    pub fn join(self) -> Result<EpisodeReport> {
        self.handle
            .join()
            .map_err(|_| NbvError::Thread("planner thread panicked".to_string()))
    }
}

/// Run one episode of `planner` on a named background thread.
pub fn spawn_planner<R, W>(planner: ViewPlanner<R, W>) -> Result<PlannerHandle>
where
    R: RobotChannel + 'static,
    W: WorldModelChannel + 'static,
{
    let cancel = planner.cancel_token().clone();
    let handle = thread::Builder::new()
        .name("planner".into())
        .spawn(move || planner.run_episode())?;
    Ok(PlannerHandle { cancel, handle })
}
