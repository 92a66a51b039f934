//! Ray-casting information gain estimator.
//!
//! For one pose and a batch of metric names:
//!
//! 1. Validate and normalize the command (inverted windows, empty metric
//!    lists etc. fail the whole call before any ray is cast)
//! 2. Resolve metric names; unknown names get `UnknownMetric` and no ray work
//! 3. Cast one ray per window sample through the map:
//!    - skip voxels closer than `min_ray_depth`, keep every `ray_step_size`-th
//!    - unknown / free / below-threshold voxels feed `include_ray_sample`
//!    - a confident occupied voxel feeds `include_endpoint` and stops the ray
//!    - leaving the map or passing `max_ray_depth` stops the ray silently
//! 4. Reduce every metric to a gain; non-finite gains fail only that metric

use nalgebra::Point3;

use crate::command::{IgRetrievalCommand, ValidatedCommand};
use crate::config::EstimatorConfig;
use crate::core::CancelToken;
use crate::error::IgError;
use crate::map::OccupancyModel;
use crate::metrics::{IgMetric, MetricRegistry, VoxelSample};
use crate::raycast::{Ray, VoxelTraversal};
use crate::response::{IgResponse, IgRetrievalResult};

/// Per-call ray statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CastStats {
    /// Rays cast
    pub rays: usize,
    /// Rays stopped by a confident occupied voxel
    pub hits: usize,
    /// Samples handed to the metrics (endpoints included)
    pub samples: usize,
}

/// Computes predicted information gain for candidate sensor poses.
#[derive(Clone, Debug)]
pub struct InformationGainEstimator {
    config: EstimatorConfig,
    registry: MetricRegistry,
}

struct ActiveMetric {
    slot: usize,
    metric: Box<dyn IgMetric>,
}

impl InformationGainEstimator {
    /// Create an estimator with the built-in metrics.
    pub fn new(config: EstimatorConfig) -> Result<Self, IgError> {
        config.validate()?;
        Ok(Self {
            config,
            registry: MetricRegistry::with_defaults(),
        })
    }

    /// Replace the metric registry.
    pub fn with_registry(mut self, registry: MetricRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Metric registry in use.
    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    /// Configuration in use.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Compute all requested metrics for `command.path[0]`.
    ///
    /// Returns one result per metric name, in request order. The call fails
    /// as a whole only for invalid commands or cancellation.
    pub fn estimate(
        &self,
        map: &dyn OccupancyModel,
        command: &IgRetrievalCommand,
        cancel: &CancelToken,
    ) -> Result<IgResponse, IgError> {
        self.estimate_with_stats(map, command, cancel)
            .map(|(response, _)| response)
    }

    /// Like [`Self::estimate`], also returning ray statistics.
    pub fn estimate_with_stats(
        &self,
        map: &dyn OccupancyModel,
        command: &IgRetrievalCommand,
        cancel: &CancelToken,
    ) -> Result<(IgResponse, CastStats), IgError> {
        let plan = command.validate().inspect_err(|e| {
            tracing::debug!("Rejected information gain command: {}", e);
        })?;
        self.check_ray_budget(&plan)?;

        let mut results = vec![IgRetrievalResult::UnknownMetric; plan.metric_names.len()];
        let mut active: Vec<ActiveMetric> = Vec::with_capacity(plan.metric_names.len());
        for (slot, name) in plan.metric_names.iter().enumerate() {
            match self.registry.create(name, &self.config.metrics) {
                Some(metric) => active.push(ActiveMetric { slot, metric }),
                None => tracing::debug!("Unknown information gain metric '{}'", name),
            }
        }

        let mut stats = CastStats::default();
        if active.is_empty() {
            return Ok((IgResponse::from_results(results), stats));
        }

        let origin = Point3::from(plan.pose.translation.vector);
        if !map.contains_point(&origin) {
            tracing::warn!(
                "Pose ({:.2}, {:.2}, {:.2}) lies outside the mapped volume",
                origin.x,
                origin.y,
                origin.z
            );
            for entry in &active {
                results[entry.slot] = IgRetrievalResult::Failed;
            }
            return Ok((IgResponse::from_results(results), stats));
        }

        let rays = self.config.camera.rays(
            &plan.pose,
            &plan.ray_window,
            plan.ray_resolution_x,
            plan.ray_resolution_y,
        );

        for ray in &rays {
            if cancel.is_cancelled() {
                return Err(IgError::Cancelled);
            }
            self.cast_ray(map, ray, &plan, &mut active, &mut stats);
        }

        tracing::debug!(
            "Cast {} rays ({} hits, {} samples) for {} metrics",
            stats.rays,
            stats.hits,
            stats.samples,
            active.len()
        );

        for entry in &active {
            let gain = entry.metric.information_gain();
            results[entry.slot] = if gain.is_finite() {
                IgRetrievalResult::Succeeded {
                    predicted_gain: gain,
                }
            } else {
                tracing::warn!(
                    "Metric '{}' produced a non-finite gain ({})",
                    entry.metric.name(),
                    gain
                );
                IgRetrievalResult::Failed
            };
        }

        Ok((IgResponse::from_results(results), stats))
    }

    /// Reject commands whose ray count overflows or exceeds `max_rays`.
    fn check_ray_budget(&self, plan: &ValidatedCommand) -> Result<(), IgError> {
        let count = self.config.camera.ray_count(
            &plan.ray_window,
            plan.ray_resolution_x,
            plan.ray_resolution_y,
        );
        match count {
            Some(n) if n <= self.config.max_rays => Ok(()),
            Some(n) => Err(IgError::ConfigurationInvalid(format!(
                "command needs {} rays, limit is {}",
                n, self.config.max_rays
            ))),
            None => Err(IgError::ConfigurationInvalid(format!(
                "ray count overflows at resolution {} x {}",
                plan.ray_resolution_x, plan.ray_resolution_y
            ))),
        }
        .inspect_err(|e| tracing::debug!("Rejected information gain command: {}", e))
    }

    fn cast_ray(
        &self,
        map: &dyn OccupancyModel,
        ray: &Ray,
        plan: &ValidatedCommand,
        active: &mut [ActiveMetric],
        stats: &mut CastStats,
    ) {
        stats.rays += 1;
        for entry in active.iter_mut() {
            entry.metric.begin_ray();
        }

        let bounds = map.bounds();
        let occupied_threshold = map.occupied_threshold();
        let unknown_prior = self.config.metrics.unknown_prior;
        let step = plan.ray_step_size as usize;

        let mut visibility = 1.0;
        let mut in_range = 0usize;

        let traversal =
            VoxelTraversal::new(&ray.origin, &ray.direction, &map.origin(), map.resolution());
        for (coord, depth) in traversal {
            if depth > plan.max_ray_depth || !bounds.contains(coord) {
                break;
            }
            if depth < plan.min_ray_depth {
                continue;
            }
            let index = in_range;
            in_range += 1;
            if index % step != 0 {
                continue;
            }

            let occupancy = map.occupancy(coord);
            let probability = occupancy.unwrap_or(unknown_prior);
            let sample = VoxelSample {
                coord,
                occupancy,
                probability,
                depth,
                visibility,
            };
            stats.samples += 1;

            let endpoint = occupancy
                .is_some_and(|p| p > occupied_threshold && p > plan.occupied_passthrough_threshold);
            if endpoint {
                for entry in active.iter_mut() {
                    entry.metric.include_endpoint(&sample, map);
                }
                stats.hits += 1;
                break;
            }

            for entry in active.iter_mut() {
                entry.metric.include_ray_sample(&sample, map);
            }
            visibility *= 1.0 - probability;
        }

        for entry in active.iter_mut() {
            entry.metric.end_ray();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{VoxelBounds, VoxelCoord};
    use crate::map::VoxelMap;
    use crate::raycast::CameraModel;
    use crate::response::IgRetrievalStatus;
    use nalgebra::Isometry3;

    fn single_ray_estimator() -> InformationGainEstimator {
        InformationGainEstimator::new(EstimatorConfig {
            camera: CameraModel::centered(1, 1, 1.0, 1.0),
            ..Default::default()
        })
        .unwrap()
    }

    fn column_map() -> VoxelMap {
        VoxelMap::new(
            1.0,
            VoxelBounds::new(VoxelCoord::new(-2, -2, 0), VoxelCoord::new(2, 2, 20)),
        )
        .unwrap()
    }

    fn command(metrics: &[&str]) -> IgRetrievalCommand {
        IgRetrievalCommand::for_pose(
            Isometry3::translation(0.5, 0.5, 0.5),
            metrics.iter().copied(),
        )
    }

    #[test]
    fn test_no_ray_work_for_unknown_only() {
        let estimator = single_ray_estimator();
        let (response, stats) = estimator
            .estimate_with_stats(&column_map(), &command(&["bogus"]), &CancelToken::new())
            .unwrap();
        assert_eq!(response.status, IgRetrievalStatus::UnknownMetric);
        assert_eq!(stats.rays, 0);
    }

    #[test]
    fn test_stats_count_hit() {
        let estimator = single_ray_estimator();
        let mut map = column_map();
        map.set_occupancy(VoxelCoord::new(0, 0, 4), 0.95).unwrap();
        let (_, stats) = estimator
            .estimate_with_stats(&map, &command(&["unobserved_voxel_ig"]), &CancelToken::new())
            .unwrap();
        assert_eq!(stats.rays, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.samples, 5);
    }

    struct NanMetric;

    impl IgMetric for NanMetric {
        fn name(&self) -> &str {
            "nan"
        }
        fn include_ray_sample(&mut self, _: &VoxelSample, _: &dyn OccupancyModel) {}
        fn include_endpoint(&mut self, _: &VoxelSample, _: &dyn OccupancyModel) {}
        fn information_gain(&self) -> f64 {
            f64::NAN
        }
    }

    #[test]
    fn test_non_finite_gain_fails_only_that_metric() {
        let mut registry = MetricRegistry::with_defaults();
        registry.register("nan", |_| -> Box<dyn IgMetric> { Box::new(NanMetric) });
        let estimator = single_ray_estimator().with_registry(registry);

        let response = estimator
            .estimate(
                &column_map(),
                &command(&["nan", "unobserved_voxel_ig"]),
                &CancelToken::new(),
            )
            .unwrap();
        assert_eq!(response.status, IgRetrievalStatus::Failed);
        assert_eq!(response.results[0], IgRetrievalResult::Failed);
        assert_eq!(response.results[1].predicted_gain(), Some(11.0));
    }
}
