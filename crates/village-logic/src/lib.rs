//! Pure village generation logic.
//!
//! This crate contains the procedural placement and composition algorithms
//! that are independent of any scene graph, renderer, or editor. Functions
//! take plain data plus an explicit random generator and return plans,
//! making them unit-testable and replayable from a seed.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Village styles, layout topologies, feature flags, clamping |
//! | [`constants`] | Scene names and fixed dimensions shared by all builders |
//! | [`dressing`] | Fences, paths, props and lights derived from anchors |
//! | [`geometry`] | Vec3, Euler rotation and transforms for plan parts |
//! | [`layout`] | House anchor placement for ring, grid, organic, linear |
//! | [`palette`] | Style → four-channel color scheme table |
//! | [`plan`] | The `VillagePlan` aggregate and its generation order |
//! | [`structure`] | Houses and wells as named groups of primitive parts |
//! | [`validation`] | Plan invariant checks (counts, scales, parts) |
//!
//! ```
//! use rand::SeedableRng;
//! use village_logic::config::VillageConfig;
//! use village_logic::plan::plan_village;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let plan = plan_village(&VillageConfig::default(), &mut rng);
//! assert_eq!(plan.anchors.len(), 8);
//! ```

pub mod config;
pub mod constants;
pub mod dressing;
pub mod geometry;
pub mod layout;
pub mod palette;
pub mod plan;
pub mod structure;
pub mod validation;
