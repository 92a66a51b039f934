//! Simulated scenario: a closed room with box obstacles and a ring of
//! candidate views looking at its center.

use std::f64::consts::TAU;
use std::sync::Arc;

use nalgebra::{Point3, Vector3};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use vastu_ig::{CameraModel, VoxelBounds, VoxelCoord, VoxelMap, look_at};

use crate::error::{NbvError, Result};
use crate::robot::{CostModel, SimulatedRobot, SimulatedSensor};
use crate::view::{View, ViewId, ViewSpace};

/// Occupancy written for walls, floor and ceiling.
const WALL_OCCUPANCY: f64 = 0.95;

/// Upper bound on simulated sensor rays per pixel.
const MAX_SENSOR_RAYS_PER_PIXEL: f64 = 4.0;

/// Axis-aligned occupied box in world coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxObstacle {
    pub min: [f64; 3],
    pub max: [f64; 3],
    #[serde(default = "default_obstacle_occupancy")]
    pub occupancy: f64,
}

fn default_obstacle_occupancy() -> f64 {
    0.9
}

/// Simulated world configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Voxel edge length in meters (default: 0.1)
    pub resolution: f64,
    /// Room interior lower corner (meters)
    pub room_min: [f64; 3],
    /// Room interior upper corner (meters)
    pub room_max: [f64; 3],
    pub obstacles: Vec<BoxObstacle>,
    /// Number of candidate views on the ring (default: 8)
    pub view_count: usize,
    /// Ring radius around the room center (default: 1.5)
    pub view_radius: f64,
    /// Sensor height of ring views (default: 1.0)
    pub view_height: f64,
    /// Height of the point all ring views look at (default: 0.5)
    pub target_height: f64,
    /// Index of the ring view the robot starts at
    pub start_view: usize,
    pub cost: CostModel,
    /// Simulated sensor range in meters (default: 4.0)
    pub sensor_range: f64,
    /// Simulated sensor rays per pixel (default: 0.05)
    pub sensor_ray_resolution: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            resolution: 0.1,
            room_min: [-2.0, -2.0, 0.0],
            room_max: [2.0, 2.0, 2.0],
            obstacles: vec![
                BoxObstacle {
                    min: [-0.3, -0.3, 0.0],
                    max: [0.3, 0.3, 0.8],
                    occupancy: default_obstacle_occupancy(),
                },
                BoxObstacle {
                    min: [0.6, -0.9, 0.0],
                    max: [1.0, -0.5, 1.2],
                    occupancy: default_obstacle_occupancy(),
                },
            ],
            view_count: 8,
            view_radius: 1.5,
            view_height: 1.0,
            target_height: 0.5,
            start_view: 0,
            cost: CostModel::default(),
            sensor_range: 4.0,
            sensor_ray_resolution: 0.05,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(NbvError::Config(format!(
                "simulation resolution must be positive, got {}",
                self.resolution
            )));
        }
        if (0..3).any(|i| self.room_max[i] - self.room_min[i] < self.resolution) {
            return Err(NbvError::Config(
                "room must span at least one voxel on every axis".to_string(),
            ));
        }
        if self.view_count == 0 || self.start_view >= self.view_count {
            return Err(NbvError::Config(format!(
                "start_view {} must index one of {} ring views",
                self.start_view, self.view_count
            )));
        }
        if !(self.sensor_range > 0.0 && self.sensor_ray_resolution > 0.0) {
            return Err(NbvError::Config(
                "sensor range and ray resolution must be positive".to_string(),
            ));
        }
        if self.sensor_ray_resolution > MAX_SENSOR_RAYS_PER_PIXEL {
            return Err(NbvError::Config(format!(
                "sensor ray resolution must be at most {}, got {}",
                MAX_SENSOR_RAYS_PER_PIXEL, self.sensor_ray_resolution
            )));
        }
        Ok(())
    }

    fn voxel_box(&self, min: [f64; 3], max: [f64; 3]) -> VoxelBounds {
        let origin = Point3::origin();
        let half = self.resolution * 0.5;
        VoxelBounds::new(
            VoxelCoord::from_world(&Point3::from(min), &origin, self.resolution),
            VoxelCoord::from_world(
                &(Point3::from(max) - Vector3::repeat(half)),
                &origin,
                self.resolution,
            ),
        )
    }
}

/// Ground truth, belief map and candidate views built from a
/// [`SimulationConfig`].
pub struct Scenario {
    pub ground_truth: Arc<VoxelMap>,
    pub belief: Arc<RwLock<VoxelMap>>,
    pub views: ViewSpace,
    pub start: View,
}

impl Scenario {
    pub fn build(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;

        let interior = config.voxel_box(config.room_min, config.room_max);
        // One voxel of wall around the interior
        let bounds = VoxelBounds::new(
            interior.min - VoxelCoord::new(1, 1, 1),
            interior.max + VoxelCoord::new(1, 1, 1),
        );

        let mut truth = VoxelMap::new(config.resolution, bounds)?;
        let (lo, hi) = (bounds.min, bounds.max);
        let shells = [
            VoxelBounds::new(lo, VoxelCoord::new(hi.x, hi.y, lo.z)),
            VoxelBounds::new(VoxelCoord::new(lo.x, lo.y, hi.z), hi),
            VoxelBounds::new(lo, VoxelCoord::new(lo.x, hi.y, hi.z)),
            VoxelBounds::new(VoxelCoord::new(hi.x, lo.y, lo.z), hi),
            VoxelBounds::new(lo, VoxelCoord::new(hi.x, lo.y, hi.z)),
            VoxelBounds::new(VoxelCoord::new(lo.x, hi.y, lo.z), hi),
        ];
        for shell in shells {
            truth.fill_box(shell, WALL_OCCUPANCY)?;
        }
        for obstacle in &config.obstacles {
            truth.fill_box(config.voxel_box(obstacle.min, obstacle.max), obstacle.occupancy)?;
        }
        tracing::info!(
            "Ground truth: {} occupied voxels in {:?} at {:.2}m",
            truth.occupied_count(),
            bounds.extent(),
            config.resolution
        );

        let belief = VoxelMap::new(config.resolution, bounds)?;
        let views = ring_views(config)?;
        let start = views
            .iter()
            .nth(config.start_view)
            .cloned()
            .ok_or_else(|| NbvError::Config("start view out of range".to_string()))?;

        Ok(Self {
            ground_truth: Arc::new(truth),
            belief: Arc::new(RwLock::new(belief)),
            views,
            start,
        })
    }

    /// Simulated robot over the ring views, with a sensor writing the belief map.
    pub fn robot(&self, config: &SimulationConfig, camera: &CameraModel) -> SimulatedRobot {
        let sensor = SimulatedSensor::new(
            Arc::clone(&self.ground_truth),
            Arc::clone(&self.belief),
            camera.clone(),
            config.sensor_range,
            config.sensor_ray_resolution,
        );
        SimulatedRobot::new(self.views.clone(), self.start.clone(), config.cost.clone())
            .with_sensor(sensor)
    }
}

fn ring_views(config: &SimulationConfig) -> Result<ViewSpace> {
    let center_x = (config.room_min[0] + config.room_max[0]) / 2.0;
    let center_y = (config.room_min[1] + config.room_max[1]) / 2.0;
    let target = Point3::new(center_x, center_y, config.target_height);

    let views = (0..config.view_count).map(|i| {
        let angle = TAU * i as f64 / config.view_count as f64;
        let eye = Point3::new(
            center_x + config.view_radius * angle.cos(),
            center_y + config.view_radius * angle.sin(),
            config.view_height,
        );
        View::new(ViewId(i as u32), look_at(&eye, &target, &Vector3::z()))
            .with_field("ring_angle", angle)
    });
    Ok(ViewSpace::from_views(views)?)
}
