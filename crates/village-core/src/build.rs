//! The build pipeline: turns a [`VillagePlan`] into scene nodes.
//!
//! Hierarchy produced under the root:
//!
//! ```text
//! Village
//! ├── Ground
//! ├── House ×N      (Body, Roof, Door, Chimney?)
//! ├── Well          (Base, Water, Post ×2, Roof)
//! ├── Fences        (FencePost ×4 per fenced house)
//! ├── Paths         (Path ×N)
//! ├── Props         (Crate | Barrel)
//! └── Lights        (CenterLight, HouseLight ×k)
//! ```
//!
//! Feature groups only exist when their flag is on.

use village_logic::constants::names;
use village_logic::geometry::Transform;
use village_logic::palette::ColorScheme;
use village_logic::plan::VillagePlan;
use village_logic::structure::Structure;

use crate::scene::{Primitive, ProgressReporter, SceneBuilder, SceneError};

/// Pipeline stage, reported to the progress callback as it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStage {
    Village,
    Ground,
    Houses,
    Well,
    Fences,
    Paths,
    Props,
    Lights,
    Done,
}

impl BuildStage {
    pub const ALL: [BuildStage; 9] = [
        BuildStage::Village,
        BuildStage::Ground,
        BuildStage::Houses,
        BuildStage::Well,
        BuildStage::Fences,
        BuildStage::Paths,
        BuildStage::Props,
        BuildStage::Lights,
        BuildStage::Done,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BuildStage::Village => "Creating village...",
            BuildStage::Ground => "Creating ground...",
            BuildStage::Houses => "Building houses...",
            BuildStage::Well => "Adding well...",
            BuildStage::Fences => "Building fences...",
            BuildStage::Paths => "Creating paths...",
            BuildStage::Props => "Scattering props...",
            BuildStage::Lights => "Adding lights...",
            BuildStage::Done => "Done",
        }
    }

    pub fn fraction(self) -> f32 {
        match self {
            BuildStage::Village => 0.1,
            BuildStage::Ground => 0.2,
            BuildStage::Houses => 0.4,
            BuildStage::Well => 0.6,
            BuildStage::Fences => 0.7,
            BuildStage::Paths => 0.75,
            BuildStage::Props => 0.85,
            BuildStage::Lights => 0.9,
            BuildStage::Done => 1.0,
        }
    }

    pub fn report_to(self, progress: &mut impl ProgressReporter) {
        log::debug!("{}", self.label());
        progress.report(self.label(), self.fraction());
    }
}

/// Create a structure group under `parent` and one primitive per part.
pub fn attach_structure<B: SceneBuilder>(
    builder: &mut B,
    parent: B::Handle,
    structure: &Structure,
    colors: &ColorScheme,
) -> Result<B::Handle, SceneError> {
    let group = builder.create_group(parent, structure.name, &structure.transform)?;
    for part in &structure.parts {
        builder.instantiate_primitive(group, &Primitive::from_part(part, colors))?;
    }
    Ok(group)
}

/// Build `plan` under a new root named [`names::VILLAGE_ROOT`].
///
/// Does not clear anything first; the caller owns the previous root. Stages
/// from [`BuildStage::Ground`] to [`BuildStage::Done`] are reported. A
/// failing builder call aborts the build and leaves whatever was already
/// created in place.
pub fn build_village<B: SceneBuilder>(
    builder: &mut B,
    plan: &VillagePlan,
    progress: &mut impl ProgressReporter,
) -> Result<B::Handle, SceneError> {
    let colors = &plan.colors;
    let features = plan.config.features;
    let root = builder.create_root(names::VILLAGE_ROOT)?;

    BuildStage::Ground.report_to(progress);
    builder.instantiate_primitive(root, &Primitive::from_part(&plan.ground, colors))?;

    BuildStage::Houses.report_to(progress);
    for house in &plan.houses {
        attach_structure(builder, root, house, colors)?;
    }

    if let Some(well) = &plan.well {
        BuildStage::Well.report_to(progress);
        attach_structure(builder, root, well, colors)?;
    }

    if features.fences {
        BuildStage::Fences.report_to(progress);
        let group = builder.create_group(root, names::FENCES, &Transform::IDENTITY)?;
        for post in plan.fences.iter().flat_map(|fence| &fence.posts) {
            builder.instantiate_primitive(group, &Primitive::from_part(post, colors))?;
        }
    }

    if features.paths {
        BuildStage::Paths.report_to(progress);
        let group = builder.create_group(root, names::PATHS, &Transform::IDENTITY)?;
        for path in &plan.paths {
            builder.instantiate_primitive(group, &Primitive::from_part(&path.part, colors))?;
        }
    }

    if features.props {
        BuildStage::Props.report_to(progress);
        let group = builder.create_group(root, names::PROPS, &Transform::IDENTITY)?;
        for prop in &plan.props {
            builder.instantiate_primitive(group, &Primitive::from_part(&prop.part, colors))?;
        }
    }

    if features.lights {
        BuildStage::Lights.report_to(progress);
        let group = builder.create_group(root, names::LIGHTS, &Transform::IDENTITY)?;
        for light in &plan.lights {
            builder.instantiate_light(group, light)?;
        }
    }

    BuildStage::Done.report_to(progress);
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessScene;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use village_logic::config::{FeatureFlags, VillageConfig};
    use village_logic::plan::plan_village;

    fn plan(config: &VillageConfig) -> VillagePlan {
        plan_village(config, &mut StdRng::seed_from_u64(21))
    }

    #[test]
    fn fractions_increase_monotonically() {
        for pair in BuildStage::ALL.windows(2) {
            assert!(pair[0].fraction() < pair[1].fraction(), "{pair:?}");
        }
        assert_eq!(BuildStage::Done.fraction(), 1.0);
    }

    #[test]
    fn every_planned_primitive_is_instantiated() {
        let plan = plan(&VillageConfig::default());
        let mut scene = HeadlessScene::new();
        let root = build_village(&mut scene, &plan, &mut crate::scene::NoProgress).unwrap();
        assert_eq!(scene.primitive_count(), plan.primitive_count());
        assert_eq!(scene.light_count(), plan.lights.len());
        assert_eq!(scene.children_named(root, names::HOUSE).len(), 8);
        assert_eq!(scene.children_named(root, names::GROUND).len(), 1);
        assert_eq!(scene.children_named(root, names::WELL).len(), 1);
    }

    #[test]
    fn disabled_features_have_no_groups_or_stages() {
        let config = VillageConfig {
            features: FeatureFlags::none(),
            ..Default::default()
        };
        let plan = plan(&config);
        let mut scene = HeadlessScene::new();
        let mut stages = Vec::new();
        let root = build_village(&mut scene, &plan, &mut |label: &str, _: f32| {
            stages.push(label.to_string());
        })
        .unwrap();

        for name in [names::WELL, names::FENCES, names::PATHS, names::PROPS, names::LIGHTS] {
            assert!(scene.children_named(root, name).is_empty(), "{name}");
        }
        assert_eq!(
            stages,
            vec!["Creating ground...", "Building houses...", "Done"]
        );
    }

    #[test]
    fn house_parts_land_in_world_space() {
        let plan = plan(&VillageConfig::default());
        let mut scene = HeadlessScene::new();
        let root = build_village(&mut scene, &plan, &mut crate::scene::NoProgress).unwrap();
        let houses = scene.children_named(root, names::HOUSE);
        for (house, planned) in houses.iter().zip(&plan.houses) {
            let p = scene.world_position(*house).unwrap();
            assert!(p.distance(&planned.position()) < 1e-4);
        }
    }
}
