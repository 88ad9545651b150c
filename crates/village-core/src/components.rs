//! Components stored by the headless scene.
//!
//! Components are pure data attached to scene nodes. The hierarchy is a
//! [`ParentNode`] link from child to parent; roots carry [`SceneRoot`].

use hecs::Entity;

use village_logic::geometry::Transform;
use village_logic::palette::Color;
use village_logic::structure::Shape;

/// Node name as shown in the scene hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneName(pub String);

/// Marks a top-level node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneRoot;

/// Link from a child node to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentNode(pub Entity);

/// Creation sequence number. Entity ids are recycled after despawn, so
/// sibling order comes from this instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpawnOrder(pub u64);

/// Placement relative to the parent node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform(pub Transform);

/// Renderable primitive with a resolved color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveMesh {
    pub shape: Shape,
    pub color: Color,
    /// Whether the host scene should give it a collider.
    pub solid: bool,
}

/// Point light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLightSource {
    pub color: Color,
    pub intensity: f32,
    pub range: f32,
}
