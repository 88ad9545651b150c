//! The seam between village generation and a host scene graph.
//!
//! The engine only ever talks to a [`SceneBuilder`]: it creates one root,
//! named groups under it, and primitives or lights under those groups.
//! Handles are opaque to the engine and threaded back to the builder.

use std::fmt::Debug;

use thiserror::Error;

use village_logic::dressing::LightPlacement;
use village_logic::geometry::Transform;
use village_logic::palette::{Color, ColorScheme};
use village_logic::structure::{Part, Shape};

/// Failures reported by a scene builder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("parent node {0} does not exist")]
    MissingParent(String),
    #[error("scene backend failed: {0}")]
    Backend(String),
}

impl SceneError {
    pub fn missing_parent(handle: impl Debug) -> Self {
        SceneError::MissingParent(format!("{handle:?}"))
    }
}

/// A primitive with its color already resolved against a scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    pub name: &'static str,
    pub shape: Shape,
    /// Relative to the parent node.
    pub transform: Transform,
    pub color: Color,
    pub solid: bool,
}

impl Primitive {
    pub fn from_part(part: &Part, scheme: &ColorScheme) -> Self {
        Self {
            name: part.name,
            shape: part.shape,
            transform: part.transform,
            color: part.material.color(scheme),
            solid: part.solid,
        }
    }
}

/// Host scene graph operations used by the build pipeline.
///
/// A box at unit scale is a 1×1×1 cube. A cylinder at unit scale has
/// diameter 1 and height 2. Builders that use other unit meshes must
/// convert.
pub trait SceneBuilder {
    type Handle: Copy + Debug;

    /// Remove every root named `root_name`. No-op when there is none.
    fn clear_existing(&mut self, root_name: &str) -> Result<(), SceneError>;

    /// A live root named `root_name`, if any.
    fn find_root(&self, root_name: &str) -> Option<Self::Handle>;

    /// Remove a node and everything under it. No-op for a stale handle.
    fn remove(&mut self, handle: Self::Handle) -> Result<(), SceneError>;

    fn create_root(&mut self, name: &str) -> Result<Self::Handle, SceneError>;

    fn create_group(
        &mut self,
        parent: Self::Handle,
        name: &str,
        transform: &Transform,
    ) -> Result<Self::Handle, SceneError>;

    fn instantiate_primitive(
        &mut self,
        parent: Self::Handle,
        primitive: &Primitive,
    ) -> Result<Self::Handle, SceneError>;

    fn instantiate_light(
        &mut self,
        parent: Self::Handle,
        light: &LightPlacement,
    ) -> Result<Self::Handle, SceneError>;
}

/// Advisory progress notifications during a build.
pub trait ProgressReporter {
    fn report(&mut self, label: &str, fraction: f32);
}

/// Reporter that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _label: &str, _fraction: f32) {}
}

impl<F> ProgressReporter for F
where
    F: FnMut(&str, f32),
{
    fn report(&mut self, label: &str, fraction: f32) {
        (self)(label, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use village_logic::config::VillageStyle;
    use village_logic::geometry::Vec3;
    use village_logic::palette::colors_for;
    use village_logic::structure::MaterialRef;

    #[test]
    fn primitive_resolves_style_color() {
        let scheme = colors_for(VillageStyle::Oriental);
        let part = Part::new("Body", Shape::Box, Vec3::ZERO, Vec3::ONE, MaterialRef::Trim);
        let primitive = Primitive::from_part(&part, &scheme);
        assert_eq!(primitive.color, scheme.trim);
        assert!(primitive.solid);
    }

    #[test]
    fn closures_report_progress() {
        let mut seen = Vec::new();
        {
            let mut reporter = |label: &str, fraction: f32| {
                seen.push((label.to_string(), fraction));
            };
            reporter.report("Adding well...", 0.6);
        }
        assert_eq!(seen, vec![("Adding well...".to_string(), 0.6)]);
    }

    #[test]
    fn missing_parent_message_names_handle() {
        let err = SceneError::missing_parent(42u32);
        assert_eq!(err.to_string(), "parent node 42 does not exist");
    }
}
