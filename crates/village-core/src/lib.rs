//! Village Core - village generation engine
//!
//! Drives the pure planning logic in `village_logic` and writes the result
//! into any scene graph that implements [`scene::SceneBuilder`].
//!
//! # Architecture
//!
//! - **Engine**: owns the seeded random stream and the live village root
//! - **Build pipeline**: walks a plan stage by stage, reporting progress
//! - **Headless scene**: a `hecs` world standing in for an editor hierarchy
//!
//! # Example
//!
//! ```rust
//! use village_core::prelude::*;
//! use village_logic::config::VillageConfig;
//!
//! let mut scene = HeadlessScene::new();
//! let mut engine = VillageEngine::new(42);
//! let root = engine
//!     .generate(&mut scene, &VillageConfig::default(), &mut NoProgress)
//!     .unwrap();
//! assert_eq!(scene.roots_named("Village"), vec![root]);
//! ```

pub mod build;
pub mod components;
pub mod engine;
pub mod headless;
pub mod scene;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::build::{build_village, BuildStage};
    pub use crate::engine::VillageEngine;
    pub use crate::headless::HeadlessScene;
    pub use crate::scene::{NoProgress, Primitive, ProgressReporter, SceneBuilder, SceneError};
}
