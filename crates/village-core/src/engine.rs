//! Village engine - main entry point for generating villages

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use village_logic::config::{GenerationOdds, VillageConfig, VillageStyle};
use village_logic::constants::names;
use village_logic::geometry::Vec3;
use village_logic::palette::colors_for;
use village_logic::plan::{plan_village, VillagePlan};
use village_logic::structure::{compose_house, compose_well};
use village_logic::validation::{validate_plan, Severity};

use crate::build::{attach_structure, build_village, BuildStage};
use crate::scene::{ProgressReporter, SceneBuilder, SceneError};

/// Owns the random stream and the handle of the live village root.
///
/// Every generation run draws a fresh seed from the engine's stream (or
/// takes the one in the config) and plans from a generator seeded with it,
/// so any run can be replayed from [`VillageEngine::last_seed`].
pub struct VillageEngine<H> {
    rng: StdRng,
    root: Option<H>,
    plan: Option<VillagePlan>,
    last_seed: Option<u64>,
}

impl<H: Copy + std::fmt::Debug> VillageEngine<H> {
    /// Engine whose run seeds derive from `seed`.
    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Engine seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            root: None,
            plan: None,
            last_seed: None,
        }
    }

    /// Handle of the live village root, if any.
    pub fn root(&self) -> Option<H> {
        self.root
    }

    /// Plan of the live village, if one was generated.
    pub fn plan(&self) -> Option<&VillagePlan> {
        self.plan.as_ref()
    }

    /// Seed of the most recent generation run.
    pub fn last_seed(&self) -> Option<u64> {
        self.last_seed
    }

    /// Replace any existing village with a new one built from `config`.
    ///
    /// The config is clamped into the editor ranges first. Plan validation
    /// findings are logged, not returned. Builder failures abort the run.
    pub fn generate<B>(
        &mut self,
        builder: &mut B,
        config: &VillageConfig,
        progress: &mut impl ProgressReporter,
    ) -> Result<H, SceneError>
    where
        B: SceneBuilder<Handle = H>,
    {
        BuildStage::Village.report_to(progress);
        self.clear(builder)?;

        let mut clamped = config.clamped();
        if clamped != *config {
            warn!(
                "Config clamped into range: {} houses, radius {:.1}",
                clamped.house_count, clamped.radius
            );
        }
        let seed = clamped.seed.unwrap_or_else(|| self.rng.gen());
        clamped.seed = Some(seed);
        let config = clamped;

        debug!("Planning {} {} village, seed {seed}", config.style, config.layout);
        let plan = plan_village(&config, &mut StdRng::seed_from_u64(seed));
        for finding in validate_plan(&plan) {
            let level = match finding.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            warn!("Plan {level} [{}]: {}", finding.category, finding.message);
        }

        let root = build_village(builder, &plan, progress)?;
        info!(
            "Village generated with {} houses ({} {}, seed {seed})",
            plan.houses.len(),
            config.style,
            config.layout
        );

        self.root = Some(root);
        self.plan = Some(plan);
        self.last_seed = Some(seed);
        Ok(root)
    }

    /// Remove the live village and any other root named `Village`.
    /// Safe to call when nothing exists.
    pub fn clear<B>(&mut self, builder: &mut B) -> Result<(), SceneError>
    where
        B: SceneBuilder<Handle = H>,
    {
        let had_village = self.root.is_some();
        if let Some(root) = self.root.take() {
            builder.remove(root)?;
        }
        builder.clear_existing(names::VILLAGE_ROOT)?;
        self.plan = None;
        if had_village {
            info!("Village cleared");
        }
        Ok(())
    }

    /// Add one house at `position` under the live root. Without one, an
    /// existing `Village` root is adopted or a new one created. Uses the
    /// engine's random stream and the chimney odds of the live plan.
    pub fn add_house<B>(
        &mut self,
        builder: &mut B,
        position: Vec3,
        style: VillageStyle,
    ) -> Result<H, SceneError>
    where
        B: SceneBuilder<Handle = H>,
    {
        let odds = self
            .plan
            .as_ref()
            .map_or_else(GenerationOdds::default, |p| p.config.odds);
        let house = compose_house(position, odds.chimney, &mut self.rng);
        let root = self.ensure_root(builder)?;
        let group = attach_structure(builder, root, &house, &colors_for(style))?;
        info!("Added house at ({:.1}, {:.1})", position.x, position.z);
        Ok(group)
    }

    /// Add a well at `position` under the live root, adopting or creating
    /// one like [`VillageEngine::add_house`].
    pub fn add_well<B>(&mut self, builder: &mut B, position: Vec3) -> Result<H, SceneError>
    where
        B: SceneBuilder<Handle = H>,
    {
        let well = compose_well(position);
        let root = self.ensure_root(builder)?;
        // The well never takes style colors; any scheme resolves the same.
        let colors = colors_for(VillageStyle::default());
        let group = attach_structure(builder, root, &well, &colors)?;
        info!("Added well at ({:.1}, {:.1})", position.x, position.z);
        Ok(group)
    }

    fn ensure_root<B>(&mut self, builder: &mut B) -> Result<H, SceneError>
    where
        B: SceneBuilder<Handle = H>,
    {
        if let Some(root) = self.root {
            return Ok(root);
        }
        // Adopt a root left by an aborted run or another session.
        let root = match builder.find_root(names::VILLAGE_ROOT) {
            Some(existing) => {
                debug!("Adopting existing {} root", names::VILLAGE_ROOT);
                existing
            }
            None => builder.create_root(names::VILLAGE_ROOT)?,
        };
        self.root = Some(root);
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessScene;
    use crate::scene::NoProgress;
    use hecs::Entity;

    #[test]
    fn test_engine_creation() {
        let engine: VillageEngine<Entity> = VillageEngine::new(1);
        assert!(engine.root().is_none());
        assert!(engine.plan().is_none());
        assert!(engine.last_seed().is_none());
    }

    #[test]
    fn test_clear_on_empty_scene() {
        let mut scene = HeadlessScene::new();
        let mut engine = VillageEngine::new(1);
        engine.clear(&mut scene).unwrap();
        engine.clear(&mut scene).unwrap();
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn test_generate_twice_leaves_one_root() {
        let mut scene = HeadlessScene::new();
        let mut engine = VillageEngine::new(2);
        engine
            .generate(&mut scene, &VillageConfig::default(), &mut NoProgress)
            .unwrap();
        let second = VillageConfig {
            house_count: 12,
            ..Default::default()
        };
        let root = engine.generate(&mut scene, &second, &mut NoProgress).unwrap();

        assert_eq!(scene.roots_named(names::VILLAGE_ROOT), vec![root]);
        assert_eq!(scene.children_named(root, names::HOUSE).len(), 12);
        assert_eq!(scene.count_named(names::HOUSE), 12);
    }

    #[test]
    fn test_generate_clamps_config() {
        let mut scene = HeadlessScene::new();
        let mut engine = VillageEngine::new(3);
        let config = VillageConfig {
            house_count: 100,
            radius: 2.0,
            ..Default::default()
        };
        engine.generate(&mut scene, &config, &mut NoProgress).unwrap();
        let plan = engine.plan().unwrap();
        assert_eq!(plan.houses.len(), 20);
        assert_eq!(plan.config.radius, 15.0);
    }

    #[test]
    fn test_replay_from_last_seed() {
        let mut scene = HeadlessScene::new();
        let mut engine = VillageEngine::new(4);
        let config = VillageConfig::default();
        engine.generate(&mut scene, &config, &mut NoProgress).unwrap();
        let first = engine.plan().unwrap().clone();

        engine.generate(&mut scene, &config, &mut NoProgress).unwrap();
        assert_ne!(engine.last_seed(), first.config.seed);

        let replay = VillageConfig {
            seed: first.config.seed,
            ..config
        };
        engine.generate(&mut scene, &replay, &mut NoProgress).unwrap();
        assert_eq!(engine.plan(), Some(&first));
    }

    #[test]
    fn test_add_house_creates_root_when_missing() {
        let mut scene = HeadlessScene::new();
        let mut engine = VillageEngine::new(5);
        let house = engine
            .add_house(&mut scene, Vec3::ZERO, VillageStyle::Viking)
            .unwrap();
        let root = engine.root().unwrap();
        assert_eq!(scene.parent_of(house), Some(root));
        assert_eq!(scene.roots_named(names::VILLAGE_ROOT).len(), 1);

        let well = engine.add_well(&mut scene, Vec3::ground(4.0, 0.0)).unwrap();
        assert_eq!(scene.parent_of(well), Some(root));
        assert_eq!(scene.children_of(well).len(), 5);
    }

    #[test]
    fn test_add_house_adopts_foreign_root() {
        let mut scene = HeadlessScene::new();
        let foreign = scene.create_root(names::VILLAGE_ROOT).unwrap();
        let mut engine = VillageEngine::new(7);
        let house = engine
            .add_house(&mut scene, Vec3::ground(3.0, 3.0), VillageStyle::Fantasy)
            .unwrap();
        assert_eq!(scene.roots_named(names::VILLAGE_ROOT), vec![foreign]);
        assert_eq!(engine.root(), Some(foreign));
        assert_eq!(scene.parent_of(house), Some(foreign));
    }

    #[test]
    fn test_clear_removes_foreign_village_roots() {
        let mut scene = HeadlessScene::new();
        scene.create_root(names::VILLAGE_ROOT).unwrap();
        let mut engine = VillageEngine::new(6);
        engine.clear(&mut scene).unwrap();
        assert!(scene.roots_named(names::VILLAGE_ROOT).is_empty());
    }
}
