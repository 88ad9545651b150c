//! Site dressing: fences, paths, props and lights.
//!
//! Everything here is derived from the already-placed anchors. Each
//! per-house selection is an independent Bernoulli draw, so the number of
//! fenced, propped or lit houses varies from run to run. Positions are in
//! village space (the dressing groups sit at the village origin).

use std::f32::consts::FRAC_PI_2;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GenerationOdds;
use crate::constants::*;
use crate::geometry::{Rotation, Vec3, DIRECTION_EPSILON};
use crate::layout::Anchor;
use crate::palette::Color;
use crate::structure::{MaterialRef, Part, Shape};

/// Four posts around one house.
#[derive(Debug, Clone, PartialEq)]
pub struct FenceGroup {
    pub house_index: usize,
    pub posts: Vec<Part>,
}

/// Straight, non-solid strip from a house to the village center.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub house_index: usize,
    pub length: f32,
    pub part: Part,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropKind {
    Crate,
    Barrel,
}

/// One prop dropped near a house.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub house_index: usize,
    pub kind: PropKind,
    pub part: Part,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightKind {
    Center,
    House,
}

/// Point light placement.
#[derive(Debug, Clone, PartialEq)]
pub struct LightPlacement {
    pub name: &'static str,
    pub kind: LightKind,
    pub house_index: Option<usize>,
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
    pub range: f32,
}

pub const CENTER_LIGHT_COLOR: Color = Color::rgb(1.0, 0.9, 0.7);
pub const HOUSE_LIGHT_COLOR: Color = Color::rgb(1.0, 0.8, 0.5);

/// Fence a random subset of houses.
///
/// Per anchor: one inclusion draw, then for included houses one jitter draw
/// per post. Post `i` sits at angle `i·90° + jitter` on a circle of radius
/// 4 around the anchor, yawed by that same angle.
pub fn place_fences(
    anchors: &[Anchor],
    odds: &GenerationOdds,
    rng: &mut impl Rng,
) -> Vec<FenceGroup> {
    let mut fences = Vec::new();
    for anchor in anchors {
        if rng.gen::<f32>() >= odds.fence {
            continue;
        }
        let posts = (0..FENCE_POSTS_PER_HOUSE)
            .map(|i| {
                let angle = i as f32 * FRAC_PI_2 + rng.gen_range(-FENCE_JITTER..=FENCE_JITTER);
                let offset = Vec3::ground(angle.cos() * FENCE_RADIUS, angle.sin() * FENCE_RADIUS);
                Part::new(
                    names::FENCE_POST,
                    Shape::Box,
                    anchor.position + offset,
                    Vec3::new(FENCE_POST_SIZE.0, FENCE_POST_SIZE.1, FENCE_POST_SIZE.2),
                    MaterialRef::FenceWood,
                )
                .rotated(Rotation::from_yaw(angle))
            })
            .collect();
        fences.push(FenceGroup {
            house_index: anchor.index,
            posts,
        });
    }
    fences
}

/// One path per house, centered halfway to the origin and facing it.
///
/// Draws nothing. An anchor on the origin has no direction to face and a
/// zero-length strip, so it gets no path.
pub fn place_paths(anchors: &[Anchor]) -> Vec<PathSegment> {
    anchors
        .iter()
        .filter_map(|anchor| {
            let length = anchor.distance_to_center();
            if length < DIRECTION_EPSILON {
                log::warn!("house {} sits on the village center; no path", anchor.index);
                return None;
            }
            let midpoint = anchor.position * 0.5;
            let part = Part::new(
                names::PATH,
                Shape::Box,
                midpoint,
                Vec3::new(PATH_WIDTH, PATH_THICKNESS, length),
                MaterialRef::Dirt,
            )
            .rotated(Rotation::facing(midpoint, Vec3::ZERO))
            .non_solid();
            Some(PathSegment {
                house_index: anchor.index,
                length,
                part,
            })
        })
        .collect()
}

/// At most one crate or barrel per house.
///
/// Per anchor: inclusion draw, then x offset, z offset, then the
/// crate/barrel coin flip.
pub fn scatter_props(anchors: &[Anchor], odds: &GenerationOdds, rng: &mut impl Rng) -> Vec<Prop> {
    let mut props = Vec::new();
    for anchor in anchors {
        if rng.gen::<f32>() >= odds.prop {
            continue;
        }
        let offset = Vec3::ground(
            rng.gen_range(-PROP_SCATTER..=PROP_SCATTER),
            rng.gen_range(-PROP_SCATTER..=PROP_SCATTER),
        );
        let base = anchor.position + offset;
        let (kind, part) = if rng.gen::<f32>() < 0.5 {
            (
                PropKind::Crate,
                Part::new(
                    names::CRATE,
                    Shape::Box,
                    base + Vec3::UP * CRATE_LIFT,
                    Vec3::splat(CRATE_SIZE),
                    MaterialRef::CrateWood,
                ),
            )
        } else {
            (
                PropKind::Barrel,
                Part::new(
                    names::BARREL,
                    Shape::Cylinder,
                    base + Vec3::UP * BARREL_LIFT,
                    Vec3::splat(BARREL_SIZE),
                    MaterialRef::BarrelWood,
                ),
            )
        };
        props.push(Prop {
            house_index: anchor.index,
            kind,
            part,
        });
    }
    props
}

/// A center light reaching the village rim, plus warm lights over a random
/// subset of houses (one inclusion draw per anchor).
pub fn place_lights(
    anchors: &[Anchor],
    radius: f32,
    odds: &GenerationOdds,
    rng: &mut impl Rng,
) -> Vec<LightPlacement> {
    let mut lights = vec![LightPlacement {
        name: names::CENTER_LIGHT,
        kind: LightKind::Center,
        house_index: None,
        position: Vec3::new(0.0, CENTER_LIGHT_HEIGHT, 0.0),
        color: CENTER_LIGHT_COLOR,
        intensity: CENTER_LIGHT_INTENSITY,
        range: radius,
    }];

    for anchor in anchors {
        if rng.gen::<f32>() >= odds.house_light {
            continue;
        }
        lights.push(LightPlacement {
            name: names::HOUSE_LIGHT,
            kind: LightKind::House,
            house_index: Some(anchor.index),
            position: anchor.position + Vec3::UP * HOUSE_LIGHT_HEIGHT,
            color: HOUSE_LIGHT_COLOR,
            intensity: HOUSE_LIGHT_INTENSITY,
            range: HOUSE_LIGHT_RANGE,
        });
    }
    lights
}
