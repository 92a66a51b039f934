//! View planner state machine.
//!
//! One episode runs rounds of:
//!
//! ```text
//! INIT ──► EVALUATE ──► SELECT ──► MOVE ──► RETRIEVE ──► CHECK ──┐
//!  ▲                                                             │
//!  └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! until the iteration budget runs out, the best utility drops below
//! `min_utility`, or a terminal failure occurs.

use std::collections::HashSet;

use parking_lot::Mutex;
use rayon::{ThreadPool, ThreadPoolBuilder};
use vastu_ig::{CancelToken, WorldModelChannel, rotation_distance, translation_distance};

use super::config::{PlannerConfig, RetrieveFailurePolicy};
use super::evaluate::{CandidateEvaluator, Exclusion};
use super::select::select_best;
use super::utility::UtilityPolicy;
use crate::error::{ChannelError, NbvError, Result};
use crate::robot::{ReceptionInfo, RobotChannel};
use crate::view::{MovementCost, View, ViewId, ViewSpace};

/// How an episode ended.
#[derive(Clone, Debug, PartialEq)]
pub enum EpisodeOutcome {
    /// The robot could not provide a planning space
    PlanningUnavailable(ChannelError),
    /// No view survived evaluation; `excluded` lists why each one failed
    NoViableView { excluded: Vec<Exclusion> },
    /// Every move attempt to `target` failed
    MoveFailed {
        target: ViewId,
        attempts: Vec<ChannelError>,
    },
    /// All configured rounds ran
    BudgetExhausted,
    /// The best utility fell below `min_utility`
    Converged { best_utility: f64 },
    /// Data retrieval failed under [`RetrieveFailurePolicy::Abort`]
    RetrieveAborted { view: ViewId },
    /// The episode was cancelled from outside
    Cancelled,
}

impl EpisodeOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            EpisodeOutcome::PlanningUnavailable(_) => "PLANNING_UNAVAILABLE",
            EpisodeOutcome::NoViableView { .. } => "NO_VIABLE_VIEW",
            EpisodeOutcome::MoveFailed { .. } => "MOVE_FAILED",
            EpisodeOutcome::BudgetExhausted => "BUDGET_EXHAUSTED",
            EpisodeOutcome::Converged { .. } => "CONVERGED",
            EpisodeOutcome::RetrieveAborted { .. } => "RETRIEVE_ABORTED",
            EpisodeOutcome::Cancelled => "CANCELLED",
        }
    }
}

/// One completed select-move-sense round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundRecord {
    pub iteration: usize,
    pub view: ViewId,
    pub gain: f64,
    pub cost: MovementCost,
    pub utility: f64,
    /// Viable candidates this round
    pub candidates: usize,
    pub excluded: Vec<Exclusion>,
    pub move_attempts: usize,
    pub reception: ReceptionInfo,
}

/// Outcome of an episode plus the rounds it executed.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeReport {
    pub outcome: EpisodeOutcome,
    pub rounds: Vec<RoundRecord>,
}

impl EpisodeReport {
    /// Views moved to, in order.
    pub fn visited(&self) -> Vec<ViewId> {
        self.rounds.iter().map(|r| r.view).collect()
    }

    pub fn total_gain(&self) -> f64 {
        self.rounds.iter().map(|r| r.gain).sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.rounds.iter().map(|r| r.cost.cost()).sum()
    }
}

enum MoveResult {
    Reached { attempts: usize },
    Failed(Vec<ChannelError>),
    Cancelled,
}

/// Next-best-view planner over a robot and a world model.
pub struct ViewPlanner<R, W> {
    robot: R,
    world: W,
    config: PlannerConfig,
    utility: Box<dyn UtilityPolicy>,
    pool: ThreadPool,
    robot_lock: Mutex<()>,
    cancel: CancelToken,
}

impl<R: RobotChannel, W: WorldModelChannel> ViewPlanner<R, W> {
    pub fn new(robot: R, world: W, config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("nbv-eval-{}", i))
            .build()
            .map_err(|e| NbvError::Thread(format!("Failed to build worker pool: {}", e)))?;
        let utility = config.utility.build(config.cost_epsilon);

        Ok(Self {
            robot,
            world,
            config,
            utility,
            pool,
            robot_lock: Mutex::new(()),
            cancel: CancelToken::new(),
        })
    }

    /// Replace the configured utility policy.
    pub fn with_utility(mut self, utility: Box<dyn UtilityPolicy>) -> Self {
        self.utility = utility;
        self
    }

    /// Share a cancel token, e.g. with a [`vastu_ig::LocalWorldModel`].
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn robot(&self) -> &R {
        &self.robot
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    /// Run one episode to a terminal state.
    pub fn run_episode(&self) -> EpisodeReport {
        tracing::info!(
            "Starting episode: {} iterations, utility '{}', {} metrics",
            self.config.max_iterations,
            self.utility.name(),
            self.config.metrics.len()
        );

        let mut rounds = Vec::new();
        let outcome = self.run_rounds(&mut rounds);

        match &outcome {
            EpisodeOutcome::BudgetExhausted | EpisodeOutcome::Converged { .. } => {
                tracing::info!(
                    "Episode finished: {} after {} rounds",
                    outcome.label(),
                    rounds.len()
                )
            }
            _ => tracing::warn!(
                "Episode ended: {} after {} rounds",
                outcome.label(),
                rounds.len()
            ),
        }
        EpisodeReport { outcome, rounds }
    }

    fn run_rounds(&self, rounds: &mut Vec<RoundRecord>) -> EpisodeOutcome {
        let mut space: Option<ViewSpace> = None;
        let mut visited: HashSet<ViewId> = HashSet::new();

        if self.cancel.is_cancelled() {
            return EpisodeOutcome::Cancelled;
        }
        // The start view counts as visited
        match self.with_robot(|r| r.current_view()) {
            Ok(current) => {
                tracing::debug!("Episode starts at view {}", current.id());
                visited.insert(current.id());
            }
            Err(e) => tracing::warn!("Current view unknown at episode start: {}", e),
        }

        for iteration in 0..self.config.max_iterations {
            if self.cancel.is_cancelled() {
                return EpisodeOutcome::Cancelled;
            }

            // INIT
            if space.is_none() || self.config.refresh_view_space {
                match self.with_robot(|r| r.planning_space()) {
                    Ok(fresh) => space = Some(fresh),
                    Err(e) => {
                        tracing::error!("Planning space unavailable: {}", e);
                        return EpisodeOutcome::PlanningUnavailable(e);
                    }
                }
            }
            let Some(space) = space.as_ref() else {
                return EpisodeOutcome::PlanningUnavailable(ChannelError::Unavailable);
            };

            let views: Vec<View> = space
                .candidates()
                .filter(|v| self.config.revisit_views || !visited.contains(&v.id()))
                .cloned()
                .collect();
            if views.is_empty() {
                tracing::warn!(
                    "Round {}: no candidate views left ({} in planning space, {} visited)",
                    iteration,
                    space.len(),
                    visited.len()
                );
                return EpisodeOutcome::NoViableView {
                    excluded: Vec::new(),
                };
            }

            // EVALUATE
            let evaluator = CandidateEvaluator {
                robot: &self.robot,
                world: &self.world,
                robot_lock: &self.robot_lock,
                config: &self.config,
                utility: self.utility.as_ref(),
                cancel: &self.cancel,
            };
            let Ok(evaluation) = evaluator.evaluate(&self.pool, &views) else {
                return EpisodeOutcome::Cancelled;
            };
            for exclusion in &evaluation.excluded {
                tracing::warn!("View {} excluded: {}", exclusion.view, exclusion.reason);
            }
            tracing::debug!(
                "Round {}: {} of {} views viable",
                iteration,
                evaluation.candidates.len(),
                views.len()
            );

            // SELECT
            let Some(best) = select_best(&evaluation.candidates) else {
                return EpisodeOutcome::NoViableView {
                    excluded: evaluation.excluded,
                };
            };
            if best.utility < self.config.min_utility {
                tracing::info!(
                    "Best utility {:.6} below threshold {:.6}",
                    best.utility,
                    self.config.min_utility
                );
                return EpisodeOutcome::Converged {
                    best_utility: best.utility,
                };
            }
            tracing::info!(
                "Round {}: selected view {} (gain {:.4}, cost {:.4}, utility {:.4})",
                iteration,
                best.view.id(),
                best.gain,
                best.cost.cost(),
                best.utility
            );

            // MOVE
            let move_attempts = match self.move_to(&best.view) {
                MoveResult::Reached { attempts } => attempts,
                MoveResult::Failed(attempts) => {
                    return EpisodeOutcome::MoveFailed {
                        target: best.view.id(),
                        attempts,
                    };
                }
                MoveResult::Cancelled => return EpisodeOutcome::Cancelled,
            };
            visited.insert(best.view.id());

            // RETRIEVE
            let reception = self.with_robot(|r| r.retrieve_data());
            rounds.push(RoundRecord {
                iteration,
                view: best.view.id(),
                gain: best.gain,
                cost: best.cost,
                utility: best.utility,
                candidates: evaluation.candidates.len(),
                excluded: evaluation.excluded.clone(),
                move_attempts,
                reception,
            });

            if !reception.is_success() {
                match self.config.retrieve_failure {
                    RetrieveFailurePolicy::Abort => {
                        tracing::error!("Data retrieval failed at view {}", best.view.id());
                        return EpisodeOutcome::RetrieveAborted {
                            view: best.view.id(),
                        };
                    }
                    RetrieveFailurePolicy::Replan => {
                        tracing::warn!(
                            "Data retrieval failed at view {}, replanning",
                            best.view.id()
                        );
                    }
                }
            }
        }

        EpisodeOutcome::BudgetExhausted
    }

    /// MOVE with bounded retries.
    ///
    /// After each failure the current view is re-queried; a robot that
    /// reached the target despite reporting failure counts as arrived.
    fn move_to(&self, target: &View) -> MoveResult {
        let mut failures = Vec::new();

        for attempt in 1..=self.config.max_move_attempts {
            if self.cancel.is_cancelled() {
                return MoveResult::Cancelled;
            }
            let error = match self.with_robot(|r| r.move_to(target)) {
                Ok(()) => return MoveResult::Reached { attempts: attempt },
                Err(e) => e,
            };
            tracing::warn!(
                "Move to view {} failed (attempt {}/{}): {}",
                target.id(),
                attempt,
                self.config.max_move_attempts,
                error
            );
            failures.push(error);

            match self.with_robot(|r| r.current_view()) {
                Ok(current) if self.at_pose(&current, target) => {
                    tracing::info!("Robot reached view {} despite failure report", target.id());
                    return MoveResult::Reached { attempts: attempt };
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Could not re-validate pose: {}", e),
            }
        }

        MoveResult::Failed(failures)
    }

    fn at_pose(&self, current: &View, target: &View) -> bool {
        translation_distance(current.pose(), target.pose()) <= self.config.pose_tolerance_m
            && rotation_distance(current.pose(), target.pose()) <= self.config.pose_tolerance_rad
    }

    fn with_robot<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        let _guard = self.robot_lock.lock();
        f(&self.robot)
    }
}
