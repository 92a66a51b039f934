//! Candidate evaluation (EVALUATE step).
//!
//! Gains are computed in parallel on the planner's worker pool. Movement
//! costs go through the robot and are serialized by the planner's robot lock.

use std::fmt;

use parking_lot::Mutex;
use rayon::ThreadPool;
use rayon::prelude::*;
use vastu_ig::{CancelToken, IgError, IgRetrievalStatus, WorldModelChannel};

use super::config::PlannerConfig;
use super::utility::UtilityPolicy;
use crate::error::ChannelError;
use crate::robot::RobotChannel;
use crate::view::{MovementCost, View, ViewId};

/// A fully evaluated, selectable view.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Position in the round's enumeration order
    pub order: usize,
    pub view: View,
    /// Weighted sum of the configured metrics
    pub gain: f64,
    pub cost: MovementCost,
    pub utility: f64,
}

/// Why a view left the candidate pool.
#[derive(Clone, Debug, PartialEq)]
pub enum ExclusionReason {
    /// The information gain query itself failed
    Gain(ChannelError),
    /// A metric did not succeed
    MetricStatus {
        metric: String,
        status: IgRetrievalStatus,
    },
    /// The movement cost query failed
    Cost(ChannelError),
    /// Gain and cost combined into NaN or infinity
    NonFiniteUtility(f64),
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::Gain(e) => write!(f, "gain query failed: {}", e),
            ExclusionReason::MetricStatus { metric, status } => {
                write!(f, "metric '{}' returned {:?}", metric, status)
            }
            ExclusionReason::Cost(e) => write!(f, "cost query failed: {}", e),
            ExclusionReason::NonFiniteUtility(u) => write!(f, "non-finite utility {}", u),
        }
    }
}

/// A view excluded from this round, with the reason.
#[derive(Clone, Debug, PartialEq)]
pub struct Exclusion {
    pub view: ViewId,
    pub reason: ExclusionReason,
}

/// Result of evaluating one round's views.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoundEvaluation {
    /// Viable candidates in enumeration order
    pub candidates: Vec<Candidate>,
    pub excluded: Vec<Exclusion>,
}

enum ViewOutcome {
    Viable(Candidate),
    Excluded(Exclusion),
    Cancelled,
}

pub(crate) struct CandidateEvaluator<'a, R: ?Sized, W: ?Sized> {
    pub robot: &'a R,
    pub world: &'a W,
    pub robot_lock: &'a Mutex<()>,
    pub config: &'a PlannerConfig,
    pub utility: &'a dyn UtilityPolicy,
    pub cancel: &'a CancelToken,
}

impl<R, W> CandidateEvaluator<'_, R, W>
where
    R: RobotChannel + ?Sized,
    W: WorldModelChannel + ?Sized,
{
    /// Evaluate all `views`, returning `Err(Cancelled)` if the episode was
    /// cancelled while the batch was running.
    pub fn evaluate(
        &self,
        pool: &ThreadPool,
        views: &[View],
    ) -> Result<RoundEvaluation, ChannelError> {
        let outcomes: Vec<ViewOutcome> = pool.install(|| {
            views
                .par_iter()
                .enumerate()
                .map(|(order, view)| self.evaluate_view(order, view))
                .collect()
        });

        let mut evaluation = RoundEvaluation::default();
        for outcome in outcomes {
            match outcome {
                ViewOutcome::Viable(candidate) => evaluation.candidates.push(candidate),
                ViewOutcome::Excluded(exclusion) => evaluation.excluded.push(exclusion),
                ViewOutcome::Cancelled => return Err(ChannelError::Cancelled),
            }
        }
        Ok(evaluation)
    }

    fn evaluate_view(&self, order: usize, view: &View) -> ViewOutcome {
        if self.cancel.is_cancelled() {
            return ViewOutcome::Cancelled;
        }
        let excluded = |reason| {
            ViewOutcome::Excluded(Exclusion {
                view: view.id(),
                reason,
            })
        };

        let command = self.config.command_for(view.pose());
        let response = match self.world.view_information_gain(&command) {
            Ok(response) => response,
            Err(IgError::Cancelled) => return ViewOutcome::Cancelled,
            Err(e) => return excluded(ExclusionReason::Gain(e.into())),
        };
        if response.results.len() != self.config.metrics.len() {
            return excluded(ExclusionReason::Gain(ChannelError::Computation(format!(
                "expected {} metric results, got {}",
                self.config.metrics.len(),
                response.results.len()
            ))));
        }

        let mut gain = 0.0;
        for (metric, result) in self.config.metrics.iter().zip(&response.results) {
            match result.predicted_gain() {
                Some(g) => gain += metric.weight * g,
                None => {
                    return excluded(ExclusionReason::MetricStatus {
                        metric: metric.name.clone(),
                        status: result.status(),
                    });
                }
            }
        }

        let cost = {
            let _guard = self.robot_lock.lock();
            if self.cancel.is_cancelled() {
                return ViewOutcome::Cancelled;
            }
            self.robot.movement_cost(view)
        };
        let cost = match cost {
            Ok(cost) => cost,
            Err(ChannelError::Cancelled) => return ViewOutcome::Cancelled,
            Err(e) => return excluded(ExclusionReason::Cost(e)),
        };

        let utility = self.utility.utility(gain, &cost);
        if !utility.is_finite() {
            return excluded(ExclusionReason::NonFiniteUtility(utility));
        }

        ViewOutcome::Viable(Candidate {
            order,
            view: view.clone(),
            gain,
            cost,
            utility,
        })
    }
}
