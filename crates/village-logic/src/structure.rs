//! Houses and wells as named groups of primitive parts.
//!
//! A [`Structure`] is one group transform plus its owned [`Part`]s. Parts
//! carry a [`MaterialRef`] rather than a color: style channels resolve
//! against the village [`ColorScheme`] when the plan is materialized.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::geometry::{Rotation, Transform, Vec3};
use crate::palette::{Color, ColorScheme};

/// Primitive shape of a part.
///
/// At unit scale a `Box` is a 1×1×1 cube and a `Cylinder` has diameter 1
/// and height 2; both are centered on their position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Box,
    Cylinder,
}

/// Where a part's color comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialRef {
    // Style channels
    Wall,
    Roof,
    Trim,
    Ground,
    // Fixed materials, identical in every style
    Soot,
    Stone,
    Wood,
    Water,
    FenceWood,
    Dirt,
    CrateWood,
    BarrelWood,
}

impl MaterialRef {
    pub fn color(self, scheme: &ColorScheme) -> Color {
        match self {
            MaterialRef::Wall => scheme.wall,
            MaterialRef::Roof => scheme.roof,
            MaterialRef::Trim => scheme.trim,
            MaterialRef::Ground => scheme.ground,
            MaterialRef::Soot => Color::rgb(0.4, 0.35, 0.35),
            MaterialRef::Stone => Color::rgb(0.5, 0.5, 0.5),
            MaterialRef::Wood => Color::rgb(0.4, 0.3, 0.2),
            MaterialRef::Water => Color::rgba(0.2, 0.4, 0.6, 0.8),
            MaterialRef::FenceWood => Color::rgb(0.4, 0.3, 0.2),
            MaterialRef::Dirt => Color::rgb(0.5, 0.4, 0.3),
            MaterialRef::CrateWood => Color::rgb(0.5, 0.4, 0.25),
            MaterialRef::BarrelWood => Color::rgb(0.45, 0.35, 0.2),
        }
    }

    /// True for the four channels taken from the style's scheme.
    pub fn is_style_channel(self) -> bool {
        matches!(
            self,
            MaterialRef::Wall | MaterialRef::Roof | MaterialRef::Trim | MaterialRef::Ground
        )
    }
}

/// One primitive placed relative to its parent group.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: &'static str,
    pub shape: Shape,
    pub transform: Transform,
    pub material: MaterialRef,
    /// Non-solid parts (water, paths) get no collision in the host scene.
    pub solid: bool,
}

impl Part {
    pub fn new(
        name: &'static str,
        shape: Shape,
        position: Vec3,
        scale: Vec3,
        material: MaterialRef,
    ) -> Self {
        Self {
            name,
            shape,
            transform: Transform::at(position).with_scale(scale),
            material,
            solid: true,
        }
    }

    pub fn rotated(mut self, rotation: Rotation) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn non_solid(mut self) -> Self {
        self.solid = false;
        self
    }

    pub fn has_positive_scale(&self) -> bool {
        self.transform.scale.min_component() > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    House,
    Well,
}

/// Named group of parts sharing one transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub kind: StructureKind,
    pub name: &'static str,
    pub transform: Transform,
    pub parts: Vec<Part>,
}

impl Structure {
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.part(name).is_some()
    }

    pub fn has_chimney(&self) -> bool {
        self.has_part(names::CHIMNEY)
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }
}

/// Randomized house proportions, already multiplied by the overall scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseDimensions {
    pub scale: f32,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl HouseDimensions {
    /// Draws scale, width, depth, height, in that order.
    pub fn roll(rng: &mut impl Rng) -> Self {
        let scale = rng.gen_range(HOUSE_SCALE_RANGE.0..=HOUSE_SCALE_RANGE.1);
        let width = rng.gen_range(HOUSE_WIDTH_RANGE.0..=HOUSE_WIDTH_RANGE.1) * scale;
        let depth = rng.gen_range(HOUSE_DEPTH_RANGE.0..=HOUSE_DEPTH_RANGE.1) * scale;
        let height = rng.gen_range(HOUSE_HEIGHT_RANGE.0..=HOUSE_HEIGHT_RANGE.1) * scale;
        Self {
            scale,
            width,
            depth,
            height,
        }
    }
}

/// Compose a house at `position`, facing the village center.
///
/// The door sits on the local −z face, the side turned away from the
/// center. `chimney_odds` is the chance of a chimney; one draw is made
/// for it after the proportions.
pub fn compose_house(position: Vec3, chimney_odds: f32, rng: &mut impl Rng) -> Structure {
    let dims = HouseDimensions::roll(rng);
    let with_chimney = rng.gen::<f32>() < chimney_odds;
    house_from_dimensions(position, dims, with_chimney)
}

/// Build the house part list from already-drawn proportions.
pub fn house_from_dimensions(
    position: Vec3,
    dims: HouseDimensions,
    with_chimney: bool,
) -> Structure {
    let HouseDimensions {
        scale,
        width,
        depth,
        height,
    } = dims;

    let mut parts = vec![
        Part::new(
            names::BODY,
            Shape::Box,
            Vec3::new(0.0, height / 2.0, 0.0),
            Vec3::new(width, height, depth),
            MaterialRef::Wall,
        ),
        Part::new(
            names::ROOF,
            Shape::Box,
            Vec3::new(0.0, height + ROOF_RISE * scale, 0.0),
            Vec3::new(width + ROOF_OVERHANG, ROOF_THICKNESS * scale, depth + ROOF_OVERHANG),
            MaterialRef::Roof,
        )
        .rotated(Rotation::from_roll(ROOF_TILT_DEGREES.to_radians())),
        Part::new(
            names::DOOR,
            Shape::Box,
            Vec3::new(0.0, DOOR_SIZE.1 / 2.0, -depth / 2.0 - DOOR_SIZE.2 / 2.0),
            Vec3::new(DOOR_SIZE.0, DOOR_SIZE.1, DOOR_SIZE.2),
            MaterialRef::Trim,
        ),
    ];

    if with_chimney {
        parts.push(Part::new(
            names::CHIMNEY,
            Shape::Box,
            Vec3::new(width / 4.0, height + CHIMNEY_RISE, 0.0),
            Vec3::new(CHIMNEY_SIZE.0, CHIMNEY_SIZE.1, CHIMNEY_SIZE.2),
            MaterialRef::Soot,
        ));
    }

    Structure {
        kind: StructureKind::House,
        name: names::HOUSE,
        transform: Transform::at(position).with_rotation(Rotation::facing(position, Vec3::ZERO)),
        parts,
    }
}

/// Compose the well. Fixed silhouette and fixed stone/wood/water colors;
/// nothing is randomized but the position the caller chooses.
pub fn compose_well(position: Vec3) -> Structure {
    let mut parts = vec![
        Part::new(
            names::WELL_BASE,
            Shape::Cylinder,
            Vec3::new(0.0, 0.5, 0.0),
            Vec3::new(2.0, 1.0, 2.0),
            MaterialRef::Stone,
        ),
        Part::new(
            names::WATER,
            Shape::Cylinder,
            Vec3::new(0.0, 0.3, 0.0),
            Vec3::new(1.5, 0.1, 1.5),
            MaterialRef::Water,
        )
        .non_solid(),
    ];

    for x in [-0.8, 0.8] {
        parts.push(Part::new(
            names::WELL_POST,
            Shape::Box,
            Vec3::new(x, 1.5, 0.0),
            Vec3::new(0.15, 2.0, 0.15),
            MaterialRef::Wood,
        ));
    }

    parts.push(Part::new(
        names::ROOF,
        Shape::Box,
        Vec3::new(0.0, 2.7, 0.0),
        Vec3::new(2.5, 0.2, 1.5),
        MaterialRef::Wood,
    ));

    Structure {
        kind: StructureKind::Well,
        name: names::WELL,
        transform: Transform::at(position),
        parts,
    }
}
