//! Sparse voxel map storing occupancy probabilities.

use std::collections::HashMap;

use nalgebra::Point3;

use crate::core::{VoxelBounds, VoxelCoord};
use crate::error::MapError;

use super::{DEFAULT_OCCUPIED_THRESHOLD, OccupancyModel};

/// Sparse occupancy map over a bounded voxel volume.
///
/// Voxels without an entry are unknown. The map stores probabilities as
/// given and performs no Bayesian updates of its own.
///
/// ```rust,ignore
/// use vastu_ig::{VoxelBounds, VoxelCoord, VoxelMap};
///
/// let bounds = VoxelBounds::new(VoxelCoord::new(-10, -10, 0), VoxelCoord::new(10, 10, 5));
/// let mut map = VoxelMap::new(0.1, bounds)?;
/// map.set_occupancy(VoxelCoord::new(3, 0, 1), 0.9)?;
/// assert!(map.is_occupied(VoxelCoord::new(3, 0, 1)));
/// ```
#[derive(Clone, Debug)]
pub struct VoxelMap {
    resolution: f64,
    origin: Point3<f64>,
    bounds: VoxelBounds,
    occupied_threshold: f64,
    data: HashMap<VoxelCoord, f64>,
}

impl VoxelMap {
    /// Create an empty (all unknown) map with origin at the world origin.
    pub fn new(resolution: f64, bounds: VoxelBounds) -> Result<Self, MapError> {
        Self::with_origin(resolution, Point3::origin(), bounds)
    }

    /// Create an empty map whose voxel (0, 0, 0) corner sits at `origin`.
    pub fn with_origin(
        resolution: f64,
        origin: Point3<f64>,
        bounds: VoxelBounds,
    ) -> Result<Self, MapError> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(MapError::InvalidResolution(resolution));
        }
        Ok(Self {
            resolution,
            origin,
            bounds,
            occupied_threshold: DEFAULT_OCCUPIED_THRESHOLD,
            data: HashMap::new(),
        })
    }

    /// Override the occupied classification threshold.
    pub fn with_occupied_threshold(mut self, threshold: f64) -> Result<Self, MapError> {
        check_probability(threshold)?;
        self.occupied_threshold = threshold;
        Ok(self)
    }

    /// Set the occupancy probability of a voxel.
    pub fn set_occupancy(&mut self, coord: VoxelCoord, probability: f64) -> Result<(), MapError> {
        if !self.bounds.contains(coord) {
            return Err(MapError::OutOfBounds { coord });
        }
        check_probability(probability)?;
        self.data.insert(coord, probability);
        Ok(())
    }

    /// Set the occupancy of the voxel containing a world point.
    pub fn set_occupancy_at(&mut self, point: &Point3<f64>, probability: f64) -> Result<(), MapError> {
        let coord = self.voxel_of(point);
        self.set_occupancy(coord, probability)
    }

    /// Set every voxel in `region` (clipped to the map bounds) to `probability`.
    ///
    /// Returns the number of voxels written.
    pub fn fill_box(&mut self, region: VoxelBounds, probability: f64) -> Result<usize, MapError> {
        check_probability(probability)?;
        let clipped = VoxelBounds {
            min: VoxelCoord::new(
                region.min.x.max(self.bounds.min.x),
                region.min.y.max(self.bounds.min.y),
                region.min.z.max(self.bounds.min.z),
            ),
            max: VoxelCoord::new(
                region.max.x.min(self.bounds.max.x),
                region.max.y.min(self.bounds.max.y),
                region.max.z.min(self.bounds.max.z),
            ),
        };
        if clipped.min.x > clipped.max.x
            || clipped.min.y > clipped.max.y
            || clipped.min.z > clipped.max.z
        {
            return Ok(0);
        }
        let mut written = 0;
        for coord in clipped.iter() {
            self.data.insert(coord, probability);
            written += 1;
        }
        Ok(written)
    }

    /// Forget a voxel, making it unknown again.
    pub fn clear(&mut self, coord: VoxelCoord) -> Option<f64> {
        self.data.remove(&coord)
    }

    /// Number of voxels with a stored value.
    pub fn known_count(&self) -> usize {
        self.data.len()
    }

    /// Number of known voxels classified as occupied.
    pub fn occupied_count(&self) -> usize {
        self.data
            .values()
            .filter(|&&p| p > self.occupied_threshold)
            .count()
    }

    /// Iterate over all known voxels.
    pub fn iter_known(&self) -> impl Iterator<Item = (VoxelCoord, f64)> + '_ {
        self.data.iter().map(|(c, p)| (*c, *p))
    }
}

impl OccupancyModel for VoxelMap {
    fn resolution(&self) -> f64 {
        self.resolution
    }

    fn origin(&self) -> Point3<f64> {
        self.origin
    }

    fn bounds(&self) -> VoxelBounds {
        self.bounds
    }

    #[inline]
    fn occupancy(&self, coord: VoxelCoord) -> Option<f64> {
        self.data.get(&coord).copied()
    }

    fn occupied_threshold(&self) -> f64 {
        self.occupied_threshold
    }
}

fn check_probability(p: f64) -> Result<(), MapError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(MapError::InvalidProbability(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_bounds() -> VoxelBounds {
        VoxelBounds::new(VoxelCoord::new(-5, -5, -5), VoxelCoord::new(5, 5, 5))
    }

    #[test]
    fn test_unknown_by_default() {
        let map = VoxelMap::new(0.1, test_bounds()).unwrap();
        assert_eq!(map.occupancy(VoxelCoord::new(0, 0, 0)), None);
        assert_eq!(map.known_count(), 0);
    }

    #[test]
    fn test_set_and_classify() {
        let mut map = VoxelMap::new(0.1, test_bounds()).unwrap();
        map.set_occupancy(VoxelCoord::new(1, 2, 3), 0.75).unwrap();
        map.set_occupancy(VoxelCoord::new(1, 2, 4), 0.25).unwrap();

        assert!(map.is_occupied(VoxelCoord::new(1, 2, 3)));
        assert!(!map.is_occupied(VoxelCoord::new(1, 2, 4)));
        assert_eq!(map.occupied_count(), 1);
        assert_eq!(map.clear(VoxelCoord::new(1, 2, 4)), Some(0.25));
        assert_eq!(map.known_count(), 1);
    }

    #[test]
    fn test_rejects_out_of_bounds_and_bad_probability() {
        let mut map = VoxelMap::new(0.1, test_bounds()).unwrap();
        assert_eq!(
            map.set_occupancy(VoxelCoord::new(6, 0, 0), 0.5),
            Err(MapError::OutOfBounds {
                coord: VoxelCoord::new(6, 0, 0)
            })
        );
        assert_eq!(
            map.set_occupancy(VoxelCoord::new(0, 0, 0), 1.5),
            Err(MapError::InvalidProbability(1.5))
        );
        assert!(VoxelMap::new(0.0, test_bounds()).is_err());
    }

    #[test]
    fn test_fill_box_clips_to_bounds() {
        let mut map = VoxelMap::new(1.0, test_bounds()).unwrap();
        let region = VoxelBounds::new(VoxelCoord::new(4, 4, 4), VoxelCoord::new(8, 8, 8));
        let written = map.fill_box(region, 0.9).unwrap();
        assert_eq!(written, 8);
        assert_eq!(map.occupied_count(), 8);
    }

    #[test]
    fn test_contains_point() {
        let map = VoxelMap::new(1.0, test_bounds()).unwrap();
        assert!(map.contains_point(&Point3::new(0.5, 0.5, 0.5)));
        assert!(!map.contains_point(&Point3::new(6.5, 0.5, 0.5)));
    }
}
