//! Consistency checks for a finished [`VillagePlan`].
//!
//! Pure functions over plan data, each returning the problems it found.
//! [`validate_plan`] runs them all. An empty result means the plan is safe
//! to hand to a scene builder.

use std::collections::HashSet;

use crate::constants::names;
use crate::dressing::LightKind;
use crate::geometry::Vec3;
use crate::plan::VillagePlan;
use crate::structure::{Part, Structure};

/// A plan validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub category: &'static str,
    pub severity: Severity,
    pub message: String,
}

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl ValidationError {
    fn error(category: &'static str, message: String) -> Self {
        Self {
            category,
            severity: Severity::Error,
            message,
        }
    }

    fn warning(category: &'static str, message: String) -> Self {
        Self {
            category,
            severity: Severity::Warning,
            message,
        }
    }
}

// ── A. Anchors and houses ───────────────────────────────────────────────

/// Anchor count matches the configured house count.
pub fn check_anchor_count(plan: &VillagePlan) -> Vec<ValidationError> {
    let expected = plan.config.house_count as usize;
    if plan.anchors.len() == expected {
        return Vec::new();
    }
    vec![ValidationError::error(
        "layout",
        format!(
            "{} anchors planned for {} houses",
            plan.anchors.len(),
            expected
        ),
    )]
}

/// Every anchor carries exactly one house, at the anchor's position.
pub fn check_house_per_anchor(plan: &VillagePlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if plan.houses.len() != plan.anchors.len() {
        errors.push(ValidationError::error(
            "houses",
            format!(
                "{} houses for {} anchors",
                plan.houses.len(),
                plan.anchors.len()
            ),
        ));
    }
    for (house, anchor) in plan.houses.iter().zip(&plan.anchors) {
        if house.position().distance(&anchor.position) > 1e-4 {
            errors.push(ValidationError::error(
                "houses",
                format!("House #{} is not on its anchor", anchor.index),
            ));
        }
    }
    errors
}

/// Every house has a body, a roof and a door.
pub fn check_house_parts(plan: &VillagePlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (i, house) in plan.houses.iter().enumerate() {
        for name in [names::BODY, names::ROOF, names::DOOR] {
            if !house.has_part(name) {
                errors.push(ValidationError::error(
                    "houses",
                    format!("House #{i} is missing its {name}"),
                ));
            }
        }
    }
    errors
}

// ── B. Part geometry ────────────────────────────────────────────────────

fn check_parts<'a>(
    owner: &str,
    parts: impl IntoIterator<Item = &'a Part>,
    errors: &mut Vec<ValidationError>,
) {
    for part in parts {
        if !part.has_positive_scale() {
            let s = part.transform.scale;
            errors.push(ValidationError::error(
                "geometry",
                format!(
                    "{owner} part {} has non-positive scale {}×{}×{}",
                    part.name, s.x, s.y, s.z
                ),
            ));
        } else if !part.transform.position.is_finite() {
            errors.push(ValidationError::error(
                "geometry",
                format!("{owner} part {} has a non-finite position", part.name),
            ));
        }
    }
}

fn structure_label(structure: &Structure, index: usize) -> String {
    format!("{} #{index}", structure.name)
}

/// Every primitive in the plan has strictly positive scale on all axes.
pub fn check_positive_scale(plan: &VillagePlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check_parts("Ground", [&plan.ground], &mut errors);
    for (i, house) in plan.houses.iter().enumerate() {
        check_parts(&structure_label(house, i), &house.parts, &mut errors);
    }
    if let Some(well) = &plan.well {
        check_parts(names::WELL, &well.parts, &mut errors);
    }
    for fence in &plan.fences {
        let owner = format!("Fence of house #{}", fence.house_index);
        check_parts(&owner, &fence.posts, &mut errors);
    }
    for path in &plan.paths {
        let owner = format!("Path of house #{}", path.house_index);
        check_parts(&owner, [&path.part], &mut errors);
    }
    for prop in &plan.props {
        let owner = format!("Prop of house #{}", prop.house_index);
        check_parts(&owner, [&prop.part], &mut errors);
    }
    errors
}

// ── C. Dressing ─────────────────────────────────────────────────────────

/// Well at the village center with translucent water, when enabled.
pub fn check_well(plan: &VillagePlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    match (&plan.well, plan.config.features.well) {
        (None, true) => errors.push(ValidationError::error(
            "well",
            "well enabled but not planned".to_string(),
        )),
        (Some(_), false) => errors.push(ValidationError::error(
            "well",
            "well planned while disabled".to_string(),
        )),
        (Some(well), true) => {
            if well.position().distance(&Vec3::ZERO) > 1e-4 {
                errors.push(ValidationError::error(
                    "well",
                    format!("well is off center at {:?}", well.position()),
                ));
            }
            let water_is_clear = well
                .part(names::WATER)
                .is_some_and(|water| water.material.color(&plan.colors).is_translucent());
            if !water_is_clear {
                errors.push(ValidationError::warning(
                    "well",
                    "well water missing or opaque".to_string(),
                ));
            }
        }
        (None, false) => {}
    }
    errors
}

/// No anchor gets more than one path, and every path points at a real house.
pub fn check_paths(plan: &VillagePlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    for path in &plan.paths {
        if path.house_index >= plan.anchors.len() {
            errors.push(ValidationError::error(
                "paths",
                format!("path refers to missing house #{}", path.house_index),
            ));
        }
        if !seen.insert(path.house_index) {
            errors.push(ValidationError::error(
                "paths",
                format!("house #{} has more than one path", path.house_index),
            ));
        }
    }
    if plan.config.features.paths && plan.paths.len() < plan.anchors.len() {
        errors.push(ValidationError::warning(
            "paths",
            format!(
                "{} of {} houses have no path",
                plan.anchors.len() - plan.paths.len(),
                plan.anchors.len()
            ),
        ));
    }
    errors
}

/// Exactly one center light when lights are enabled.
pub fn check_lights(plan: &VillagePlan) -> Vec<ValidationError> {
    let centers = plan
        .lights
        .iter()
        .filter(|l| l.kind == LightKind::Center)
        .count();
    let expected = usize::from(plan.config.features.lights);
    if centers == expected {
        return Vec::new();
    }
    vec![ValidationError::error(
        "lights",
        format!("{centers} center lights, expected {expected}"),
    )]
}

/// Run every check over a plan.
pub fn validate_plan(plan: &VillagePlan) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    errors.extend(check_anchor_count(plan));
    errors.extend(check_house_per_anchor(plan));
    errors.extend(check_house_parts(plan));
    errors.extend(check_positive_scale(plan));
    errors.extend(check_well(plan));
    errors.extend(check_paths(plan));
    errors.extend(check_lights(plan));
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{VillageConfig, VillageLayout};
    use crate::plan::plan_village;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn plan(config: &VillageConfig) -> VillagePlan {
        plan_village(config, &mut StdRng::seed_from_u64(11))
    }

    #[test]
    fn generated_plans_are_clean() {
        for layout in [VillageLayout::Circle, VillageLayout::Organic, VillageLayout::Linear] {
            for house_count in 4..=20 {
                let config = VillageConfig {
                    layout,
                    house_count,
                    ..Default::default()
                };
                let errors = validate_plan(&plan(&config));
                assert!(errors.is_empty(), "{layout:?} n={house_count}: {errors:?}");
            }
        }
    }

    #[test]
    fn grid_center_house_is_only_a_warning() {
        // 3x3 lattice offsets are -1.5, -0.5, 0.5 columns: no anchor at the
        // origin. 4x4 has offsets -2..1, so anchor (2, 2) sits on it.
        let config = VillageConfig {
            layout: VillageLayout::Grid,
            house_count: 11,
            ..Default::default()
        };
        let errors = validate_plan(&plan(&config));
        assert_eq!(errors.len(), 1, "{errors:?}");
        assert_eq!(errors[0].severity, Severity::Warning);
        assert_eq!(errors[0].category, "paths");
    }

    #[test]
    fn missing_door_is_reported() {
        let mut plan = plan(&VillageConfig::default());
        plan.houses[2].parts.retain(|p| p.name != names::DOOR);
        let errors = check_house_parts(&plan);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("House #2"));
    }

    #[test]
    fn zero_scale_is_reported() {
        let mut plan = plan(&VillageConfig::default());
        plan.ground.transform.scale.y = 0.0;
        let errors = check_positive_scale(&plan);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].severity, Severity::Error);
    }

    #[test]
    fn duplicate_path_is_reported() {
        let mut plan = plan(&VillageConfig::default());
        let extra = plan.paths[0].clone();
        plan.paths.push(extra);
        let errors = check_paths(&plan);
        assert!(errors.iter().any(|e| e.message.contains("more than one path")));
    }

    #[test]
    fn wrong_house_count_is_reported() {
        let mut plan = plan(&VillageConfig::default());
        plan.anchors.pop();
        assert_eq!(check_anchor_count(&plan).len(), 1);
        assert!(!check_house_per_anchor(&plan).is_empty());
    }

    #[test]
    fn missing_center_light_is_reported() {
        let mut plan = plan(&VillageConfig::default());
        plan.lights.retain(|l| l.kind != LightKind::Center);
        assert_eq!(check_lights(&plan).len(), 1);
    }

    #[test]
    fn moved_well_is_reported() {
        let mut plan = plan(&VillageConfig::default());
        if let Some(well) = plan.well.as_mut() {
            well.transform.position = Vec3::ground(3.0, 0.0);
        }
        assert_eq!(check_well(&plan).len(), 1);
    }
}
