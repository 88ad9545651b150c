//! The village plan aggregate.
//!
//! [`plan_village`] runs the planner, composer and dresser in a fixed
//! order so that one seed always yields the same village:
//!
//! 1. anchors (only the organic layout draws)
//! 2. houses, in anchor order (proportions, then chimney)
//! 3. well (no draws)
//! 4. fences (inclusion, then post jitter)
//! 5. paths (no draws)
//! 6. props (inclusion, offset, crate/barrel)
//! 7. lights (inclusion per house)
//!
//! Disabled features draw nothing, so toggling one shifts the stream for
//! every later stage.

use rand::Rng;
use serde::Serialize;

use crate::config::{VillageConfig, VillageLayout, VillageStyle};
use crate::constants::{names, GROUND_DIAMETER_FACTOR, GROUND_THICKNESS, GROUND_Y};
use crate::dressing::{
    place_fences, place_lights, place_paths, scatter_props, FenceGroup, LightKind,
    LightPlacement, PathSegment, Prop, PropKind,
};
use crate::geometry::Vec3;
use crate::layout::{plan_anchors, Anchor};
use crate::palette::{colors_for, ColorScheme};
use crate::structure::{compose_house, compose_well, MaterialRef, Part, Shape, Structure};

/// Everything one generation run produces, ready for a scene builder.
#[derive(Debug, Clone, PartialEq)]
pub struct VillagePlan {
    pub config: VillageConfig,
    pub colors: ColorScheme,
    pub ground: Part,
    pub anchors: Vec<Anchor>,
    pub houses: Vec<Structure>,
    pub well: Option<Structure>,
    pub fences: Vec<FenceGroup>,
    pub paths: Vec<PathSegment>,
    pub props: Vec<Prop>,
    pub lights: Vec<LightPlacement>,
}

/// Ground disc under the whole village.
pub fn ground_part(radius: f32) -> Part {
    let diameter = radius * GROUND_DIAMETER_FACTOR;
    Part::new(
        names::GROUND,
        Shape::Cylinder,
        Vec3::new(0.0, GROUND_Y, 0.0),
        Vec3::new(diameter, GROUND_THICKNESS, diameter),
        MaterialRef::Ground,
    )
}

/// Plan a village from `config` as given.
///
/// No clamping happens here; callers that accept user input should pass
/// [`VillageConfig::clamped`].
pub fn plan_village(config: &VillageConfig, rng: &mut impl Rng) -> VillagePlan {
    let colors = colors_for(config.style);
    let features = config.features;
    let odds = config.odds;

    let anchors = plan_anchors(config.layout, config.house_count, config.radius, rng);

    let houses = anchors
        .iter()
        .map(|anchor| compose_house(anchor.position, odds.chimney, rng))
        .collect();

    let well = features.well.then(|| compose_well(Vec3::ZERO));

    let fences = if features.fences {
        place_fences(&anchors, &odds, rng)
    } else {
        Vec::new()
    };

    let paths = if features.paths {
        place_paths(&anchors)
    } else {
        Vec::new()
    };

    let props = if features.props {
        scatter_props(&anchors, &odds, rng)
    } else {
        Vec::new()
    };

    let lights = if features.lights {
        place_lights(&anchors, config.radius, &odds, rng)
    } else {
        Vec::new()
    };

    VillagePlan {
        config: config.clone(),
        colors,
        ground: ground_part(config.radius),
        anchors,
        houses,
        well,
        fences,
        paths,
        props,
        lights,
    }
}

/// Counts describing a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub style: VillageStyle,
    pub layout: VillageLayout,
    pub houses: usize,
    pub chimneys: usize,
    pub wells: usize,
    pub fenced_houses: usize,
    pub fence_posts: usize,
    pub paths: usize,
    pub crates: usize,
    pub barrels: usize,
    pub center_lights: usize,
    pub house_lights: usize,
}

impl PlanSummary {
    pub fn props(&self) -> usize {
        self.crates + self.barrels
    }

    pub fn lights(&self) -> usize {
        self.center_lights + self.house_lights
    }
}

impl VillagePlan {
    pub fn summary(&self) -> PlanSummary {
        let count_props = |kind: PropKind| self.props.iter().filter(|p| p.kind == kind).count();
        let count_lights = |kind: LightKind| self.lights.iter().filter(|l| l.kind == kind).count();
        PlanSummary {
            style: self.config.style,
            layout: self.config.layout,
            houses: self.houses.len(),
            chimneys: self.houses.iter().filter(|h| h.has_chimney()).count(),
            wells: usize::from(self.well.is_some()),
            fenced_houses: self.fences.len(),
            fence_posts: self.fences.iter().map(|f| f.posts.len()).sum(),
            paths: self.paths.len(),
            crates: count_props(PropKind::Crate),
            barrels: count_props(PropKind::Barrel),
            center_lights: count_lights(LightKind::Center),
            house_lights: count_lights(LightKind::House),
        }
    }

    /// Total primitives a scene builder will instantiate, ground included.
    pub fn primitive_count(&self) -> usize {
        1 + self.houses.iter().map(|h| h.parts.len()).sum::<usize>()
            + self.well.as_ref().map_or(0, |w| w.parts.len())
            + self.fences.iter().map(|f| f.posts.len()).sum::<usize>()
            + self.paths.len()
            + self.props.len()
    }
}
