//! Candidate sensing poses and the cost of reaching them.
//!
//! - [`View`]: an identified 6-DoF sensor pose plus robot metadata
//! - [`ViewSpace`]: the reachable set of views for one planning round
//! - [`MovementCost`]: non-negative travel cost with an optional breakdown

mod cost;
mod space;

pub use cost::{CostBreakdown, MovementCost};
pub use space::ViewSpace;

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use vastu_ig::Pose;

/// Identifier of a view, unique within a [`ViewSpace`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId(pub u32);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A candidate sensor pose.
///
/// Views are built once and never mutated; the `with_*` methods consume the
/// view and return a modified copy.
#[derive(Clone, Debug, PartialEq)]
pub struct View {
    id: ViewId,
    pose: Pose,
    source_frame: String,
    reachable: bool,
    bad: bool,
    additional_fields: BTreeMap<String, f64>,
}

impl View {
    /// Reachable view in the `world` frame.
    pub fn new(id: ViewId, pose: Pose) -> Self {
        Self {
            id,
            pose,
            source_frame: "world".to_string(),
            reachable: true,
            bad: false,
            additional_fields: BTreeMap::new(),
        }
    }

    pub fn with_source_frame(mut self, frame: impl Into<String>) -> Self {
        self.source_frame = frame.into();
        self
    }

    pub fn with_reachable(mut self, reachable: bool) -> Self {
        self.reachable = reachable;
        self
    }

    pub fn with_bad(mut self, bad: bool) -> Self {
        self.bad = bad;
        self
    }

    /// Attach opaque robot metadata (e.g. joint values needed to reach the pose).
    pub fn with_field(mut self, name: impl Into<String>, value: f64) -> Self {
        self.additional_fields.insert(name.into(), value);
        self
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    /// World-from-sensor pose.
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn position(&self) -> Point3<f64> {
        Point3::from(self.pose.translation.vector)
    }

    pub fn source_frame(&self) -> &str {
        &self.source_frame
    }

    pub fn is_reachable(&self) -> bool {
        self.reachable
    }

    pub fn is_bad(&self) -> bool {
        self.bad
    }

    /// Eligible for selection (reachable and not flagged bad).
    pub fn is_candidate(&self) -> bool {
        self.reachable && !self.bad
    }

    pub fn field(&self, name: &str) -> Option<f64> {
        self.additional_fields.get(name).copied()
    }

    pub fn additional_fields(&self) -> &BTreeMap<String, f64> {
        &self.additional_fields
    }
}
