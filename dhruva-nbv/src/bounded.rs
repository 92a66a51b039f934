//! Timeout-bounded channel wrappers.
//!
//! The caller waits on a `crossbeam_channel` with `recv_timeout`; a call that
//! does not answer in time surfaces as `Timeout`.
//!
//! Robot calls run one at a time on a single long-lived worker thread. A
//! timed-out move keeps the worker busy until it completes, and requests
//! queued behind it are dropped once their own deadline has passed.
//! World model queries each run on a short-lived thread since the planner
//! evaluates views in parallel.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use vastu_ig::{IgError, IgResponse, IgRetrievalCommand, WorldModelChannel};

use crate::error::ChannelError;
use crate::robot::{ReceptionInfo, RobotChannel};
use crate::view::{MovementCost, View, ViewSpace};

enum CallError {
    Spawn(std::io::Error),
    Timeout,
    Disconnected,
}

fn call_with_timeout<T, F>(name: &str, timeout: Duration, f: F) -> Result<T, CallError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = crossbeam_channel::bounded(1);
    thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            // Receiver may be gone after a timeout
            let _ = tx.send(f());
        })
        .map_err(CallError::Spawn)?;

    match rx.recv_timeout(timeout) {
        Ok(value) => Ok(value),
        Err(RecvTimeoutError::Timeout) => {
            tracing::warn!("{} did not answer within {:?}", name, timeout);
            Err(CallError::Timeout)
        }
        Err(RecvTimeoutError::Disconnected) => {
            tracing::error!("{} worker exited without answering", name);
            Err(CallError::Disconnected)
        }
    }
}

/// One robot request queued for the worker.
struct RobotJob<R> {
    op: &'static str,
    deadline: Instant,
    run: Box<dyn FnOnce(&R) + Send>,
}

fn robot_worker<R: RobotChannel>(robot: Arc<R>, jobs: Receiver<RobotJob<R>>) {
    tracing::debug!("Robot worker started");
    for job in jobs.iter() {
        if Instant::now() > job.deadline {
            tracing::warn!("Dropping expired robot {} request", job.op);
            continue;
        }
        (job.run)(robot.as_ref());
    }
    tracing::debug!("Robot worker stopped");
}

/// [`RobotChannel`] whose every call completes within a timeout.
///
/// The worker thread starts on the first call and exits once the wrapper is
/// dropped and its current request returns.
pub struct BoundedRobot<R> {
    inner: Arc<R>,
    worker: Mutex<Option<Sender<RobotJob<R>>>>,
    timeout: Duration,
}

impl<R: RobotChannel + 'static> BoundedRobot<R> {
    pub fn new(inner: Arc<R>, timeout: Duration) -> Self {
        Self {
            inner,
            worker: Mutex::new(None),
            timeout,
        }
    }

    pub fn inner(&self) -> &Arc<R> {
        &self.inner
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn submit(&self, job: RobotJob<R>) -> Result<(), ChannelError> {
        let mut worker = self.worker.lock();
        if worker.is_none() {
            let (tx, rx) = crossbeam_channel::unbounded();
            let robot = Arc::clone(&self.inner);
            thread::Builder::new()
                .name("robot-worker".to_string())
                .spawn(move || robot_worker(robot, rx))
                .map_err(|e| {
                    ChannelError::Communication(format!("failed to spawn robot worker: {}", e))
                })?;
            *worker = Some(tx);
        }

        let sent = worker.as_ref().is_some_and(|tx| tx.send(job).is_ok());
        if !sent {
            // Worker is gone; spawn a fresh one on the next call
            *worker = None;
            return Err(ChannelError::Communication(
                "robot worker stopped".to_string(),
            ));
        }
        Ok(())
    }

    fn call<T, F>(&self, op: &'static str, f: F) -> Result<T, ChannelError>
    where
        T: Send + 'static,
        F: FnOnce(&R) -> T + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::bounded(1);
        self.submit(RobotJob {
            op,
            deadline: Instant::now() + self.timeout,
            run: Box::new(move |robot: &R| {
                // Receiver may be gone after a timeout
                let _ = tx.send(f(robot));
            }),
        })?;

        match rx.recv_timeout(self.timeout) {
            Ok(value) => Ok(value),
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!("Robot {} did not answer within {:?}", op, self.timeout);
                Err(ChannelError::Timeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                tracing::error!("Robot {} request dropped without an answer", op);
                Err(ChannelError::Communication(format!(
                    "robot {} request dropped",
                    op
                )))
            }
        }
    }
}

impl<R: RobotChannel + 'static> RobotChannel for BoundedRobot<R> {
    fn current_view(&self) -> Result<View, ChannelError> {
        self.call("current-view", |r| r.current_view())?
    }

    fn planning_space(&self) -> Result<ViewSpace, ChannelError> {
        self.call("planning-space", |r| r.planning_space())?
    }

    fn retrieve_data(&self) -> ReceptionInfo {
        match self.call("retrieve", |r| r.retrieve_data()) {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!("Data retrieval failed: {}", e);
                ReceptionInfo::Failed
            }
        }
    }

    fn movement_cost(&self, target: &View) -> Result<MovementCost, ChannelError> {
        let target = target.clone();
        self.call("movement-cost", move |r| r.movement_cost(&target))?
    }

    fn movement_cost_between(
        &self,
        start: &View,
        target: &View,
        fill_breakdown: bool,
    ) -> Result<MovementCost, ChannelError> {
        let start = start.clone();
        let target = target.clone();
        self.call("movement-cost", move |r| {
            r.movement_cost_between(&start, &target, fill_breakdown)
        })?
    }

    fn move_to(&self, target: &View) -> Result<(), ChannelError> {
        let target = target.clone();
        self.call("move", move |r| r.move_to(&target))?
    }
}

/// [`WorldModelChannel`] whose queries complete within a timeout.
pub struct BoundedWorldModel<W> {
    inner: Arc<W>,
    timeout: Duration,
}

impl<W: WorldModelChannel + 'static> BoundedWorldModel<W> {
    pub fn new(inner: Arc<W>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &Arc<W> {
        &self.inner
    }
}

impl<W: WorldModelChannel + 'static> WorldModelChannel for BoundedWorldModel<W> {
    fn view_information_gain(&self, command: &IgRetrievalCommand) -> Result<IgResponse, IgError> {
        let inner = Arc::clone(&self.inner);
        let command = command.clone();
        call_with_timeout("world-model-ig", self.timeout, move || {
            inner.view_information_gain(&command)
        })
        .map_err(|e| match e {
            CallError::Timeout => IgError::Timeout(self.timeout),
            CallError::Spawn(e) => {
                IgError::Communication(format!("failed to spawn world-model-ig: {}", e))
            }
            CallError::Disconnected => {
                IgError::Communication("world-model-ig worker panicked".to_string())
            }
        })?
    }
}
