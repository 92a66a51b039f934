//! Reachable view set for one planning round.

use std::collections::HashMap;

use nalgebra::Point3;

use super::{View, ViewId};
use crate::error::ViewSpaceError;

/// Ordered collection of views with unique ids.
///
/// Enumeration order is insertion order; the planner uses it as the final
/// tie-breaker so selection stays deterministic.
#[derive(Clone, Debug, Default)]
pub struct ViewSpace {
    views: Vec<View>,
    index: HashMap<ViewId, usize>,
}

impl ViewSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from views, rejecting duplicate ids.
    pub fn from_views(views: impl IntoIterator<Item = View>) -> Result<Self, ViewSpaceError> {
        let mut space = Self::new();
        for view in views {
            space.push(view)?;
        }
        Ok(space)
    }

    pub fn push(&mut self, view: View) -> Result<(), ViewSpaceError> {
        if self.index.contains_key(&view.id()) {
            return Err(ViewSpaceError::DuplicateId(view.id()));
        }
        self.index.insert(view.id(), self.views.len());
        self.views.push(view);
        Ok(())
    }

    pub fn get(&self, id: ViewId) -> Option<&View> {
        self.index.get(&id).map(|&i| &self.views[i])
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &View> {
        self.views.iter()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn ids(&self) -> Vec<ViewId> {
        self.views.iter().map(View::id).collect()
    }

    /// Views that may be selected (reachable, not bad), in enumeration order.
    pub fn candidates(&self) -> impl Iterator<Item = &View> {
        self.views.iter().filter(|v| v.is_candidate())
    }

    /// Views whose position lies within `distance` of `center`.
    pub fn views_within(&self, center: &Point3<f64>, distance: f64) -> Vec<&View> {
        self.views
            .iter()
            .filter(|v| (v.position() - center).norm() <= distance)
            .collect()
    }
}

impl<'a> IntoIterator for &'a ViewSpace {
    type Item = &'a View;
    type IntoIter = std::slice::Iter<'a, View>;

    fn into_iter(self) -> Self::IntoIter {
        self.views.iter()
    }
}
