//! World-model boundary consumed by view planners.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::command::IgRetrievalCommand;
use crate::core::CancelToken;
use crate::error::IgError;
use crate::estimator::InformationGainEstimator;
use crate::map::OccupancyModel;
use crate::response::IgResponse;

/// Answers information gain queries about the current world model.
pub trait WorldModelChannel: Send + Sync {
    /// Compute the requested metrics for `command.path[0]`.
    ///
    /// The returned results are aligned with `command.metric_names`.
    fn view_information_gain(&self, command: &IgRetrievalCommand) -> Result<IgResponse, IgError>;
}

impl<T: WorldModelChannel + ?Sized> WorldModelChannel for Arc<T> {
    fn view_information_gain(&self, command: &IgRetrievalCommand) -> Result<IgResponse, IgError> {
        (**self).view_information_gain(command)
    }
}

/// In-process world model backed by a shared map and an estimator.
///
/// Each query holds a read lock on the map for its whole duration, so all
/// rays of one query see the same snapshot and writers wait until it ends.
pub struct LocalWorldModel<M: OccupancyModel> {
    map: Arc<RwLock<M>>,
    estimator: InformationGainEstimator,
    cancel: CancelToken,
}

impl<M: OccupancyModel> LocalWorldModel<M> {
    /// Create a world model over a shared map.
    pub fn new(map: Arc<RwLock<M>>, estimator: InformationGainEstimator) -> Self {
        Self {
            map,
            estimator,
            cancel: CancelToken::new(),
        }
    }

    /// Use an externally owned cancel token (e.g. the planner's).
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Shared map handle.
    pub fn map(&self) -> Arc<RwLock<M>> {
        Arc::clone(&self.map)
    }

    /// Token checked between rays.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Estimator in use.
    pub fn estimator(&self) -> &InformationGainEstimator {
        &self.estimator
    }
}

impl<M: OccupancyModel> WorldModelChannel for LocalWorldModel<M> {
    fn view_information_gain(&self, command: &IgRetrievalCommand) -> Result<IgResponse, IgError> {
        let map = self.map.read();
        self.estimator.estimate(&*map, command, &self.cancel)
    }
}
