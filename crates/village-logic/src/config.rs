//! Village generation configuration.
//!
//! A [`VillageConfig`] is the immutable input of one generation run. The
//! editor-facing ranges (4–20 houses, radius 15–60) are enforced here, at
//! the configuration boundary: [`VillageConfig::validate`] reports
//! violations and [`VillageConfig::clamped`] pulls values back into range.
//! The layout planner itself never rejects a count.
//!
//! ```
//! use village_logic::config::{VillageConfig, VillageLayout, VillageStyle};
//!
//! let config = VillageConfig {
//!     style: VillageStyle::Viking,
//!     layout: VillageLayout::Linear,
//!     house_count: 50,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_err());
//! assert_eq!(config.clamped().house_count, 20);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_HOUSES: u32 = 4;
pub const MAX_HOUSES: u32 = 20;
pub const MIN_RADIUS: f32 = 15.0;
pub const MAX_RADIUS: f32 = 60.0;

/// Configuration problems found at the config boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("house count {0} outside {min}..={max}", min = MIN_HOUSES, max = MAX_HOUSES)]
    HouseCountOutOfRange(u32),
    #[error("village radius {0} outside {min}..={max}", min = MIN_RADIUS, max = MAX_RADIUS)]
    RadiusOutOfRange(f32),
    #[error("unknown village style `{0}`")]
    UnknownStyle(String),
    #[error("unknown village layout `{0}`")]
    UnknownLayout(String),
}

/// Architectural style; selects the color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VillageStyle {
    #[default]
    Medieval,
    Fantasy,
    Tropical,
    Oriental,
    Viking,
}

impl VillageStyle {
    pub const COUNT: usize = 5;
    pub const ALL: [VillageStyle; Self::COUNT] = [
        VillageStyle::Medieval,
        VillageStyle::Fantasy,
        VillageStyle::Tropical,
        VillageStyle::Oriental,
        VillageStyle::Viking,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            VillageStyle::Medieval => "Medieval",
            VillageStyle::Fantasy => "Fantasy",
            VillageStyle::Tropical => "Tropical",
            VillageStyle::Oriental => "Oriental",
            VillageStyle::Viking => "Viking",
        }
    }

    /// One-line preview text shown next to the style picker.
    pub fn description(self) -> &'static str {
        match self {
            VillageStyle::Medieval => "European timber-frame houses",
            VillageStyle::Fantasy => "Whimsical colorful cottages",
            VillageStyle::Tropical => "Huts with thatched roofs",
            VillageStyle::Oriental => "East Asian architecture",
            VillageStyle::Viking => "Nordic longhouses",
        }
    }

    /// Next style, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::COUNT]
    }
}

impl fmt::Display for VillageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VillageStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownStyle(s.to_string()))
    }
}

/// How house anchors are distributed around the village center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VillageLayout {
    #[default]
    Circle,
    Grid,
    Organic,
    Linear,
}

impl VillageLayout {
    pub const COUNT: usize = 4;
    pub const ALL: [VillageLayout; Self::COUNT] = [
        VillageLayout::Circle,
        VillageLayout::Grid,
        VillageLayout::Organic,
        VillageLayout::Linear,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VillageLayout::Circle => "Circle",
            VillageLayout::Grid => "Grid",
            VillageLayout::Organic => "Organic",
            VillageLayout::Linear => "Linear",
        }
    }

    /// Whether anchor placement draws from the random generator.
    pub fn is_stochastic(self) -> bool {
        matches!(self, VillageLayout::Organic)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::COUNT]
    }
}

impl fmt::Display for VillageLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VillageLayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layout| layout.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownLayout(s.to_string()))
    }
}

/// Optional village features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub well: bool,
    pub fences: bool,
    pub paths: bool,
    pub props: bool,
    pub lights: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self::all()
    }
}

impl FeatureFlags {
    pub const fn all() -> Self {
        Self {
            well: true,
            fences: true,
            paths: true,
            props: true,
            lights: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            well: false,
            fences: false,
            paths: false,
            props: false,
            lights: false,
        }
    }
}

/// Inclusion probabilities for conditional parts and per-house dressing.
/// Each is the chance an individual house gets the item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOdds {
    pub chimney: f32,
    pub fence: f32,
    pub prop: f32,
    pub house_light: f32,
}

impl Default for GenerationOdds {
    fn default() -> Self {
        Self {
            chimney: 0.6,
            fence: 0.4,
            prop: 0.5,
            house_light: 0.6,
        }
    }
}

impl GenerationOdds {
    fn clamped(self) -> Self {
        Self {
            chimney: self.chimney.clamp(0.0, 1.0),
            fence: self.fence.clamp(0.0, 1.0),
            prop: self.prop.clamp(0.0, 1.0),
            house_light: self.house_light.clamp(0.0, 1.0),
        }
    }
}

/// Input of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VillageConfig {
    pub style: VillageStyle,
    pub layout: VillageLayout,
    pub house_count: u32,
    /// Village radius in world units.
    pub radius: f32,
    pub features: FeatureFlags,
    pub odds: GenerationOdds,
    /// Replay seed (None = continue the engine's random stream).
    pub seed: Option<u64>,
}

impl Default for VillageConfig {
    fn default() -> Self {
        Self {
            style: VillageStyle::Medieval,
            layout: VillageLayout::Circle,
            house_count: 8,
            radius: 30.0,
            features: FeatureFlags::all(),
            odds: GenerationOdds::default(),
            seed: None,
        }
    }
}

impl VillageConfig {
    /// Check the editor ranges. Returns the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_HOUSES..=MAX_HOUSES).contains(&self.house_count) {
            return Err(ConfigError::HouseCountOutOfRange(self.house_count));
        }
        if !(MIN_RADIUS..=MAX_RADIUS).contains(&self.radius) {
            return Err(ConfigError::RadiusOutOfRange(self.radius));
        }
        Ok(())
    }

    /// Copy with house count, radius and odds pulled into range.
    /// A NaN radius becomes the minimum.
    pub fn clamped(&self) -> Self {
        let radius = if self.radius.is_nan() {
            MIN_RADIUS
        } else {
            self.radius.clamp(MIN_RADIUS, MAX_RADIUS)
        };
        Self {
            house_count: self.house_count.clamp(MIN_HOUSES, MAX_HOUSES),
            radius,
            odds: self.odds.clamped(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = VillageConfig::default();
        assert_eq!(config.style, VillageStyle::Medieval);
        assert_eq!(config.layout, VillageLayout::Circle);
        assert_eq!(config.house_count, 8);
        assert!((config.radius - 30.0).abs() < f32::EPSILON);
        assert_eq!(config.features, FeatureFlags::all());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let few = VillageConfig {
            house_count: 3,
            ..Default::default()
        };
        assert_eq!(few.validate(), Err(ConfigError::HouseCountOutOfRange(3)));

        let wide = VillageConfig {
            radius: 61.0,
            ..Default::default()
        };
        assert_eq!(wide.validate(), Err(ConfigError::RadiusOutOfRange(61.0)));
    }

    #[test]
    fn clamped_pulls_into_range() {
        let config = VillageConfig {
            house_count: 1,
            radius: 500.0,
            odds: GenerationOdds {
                fence: 1.5,
                ..Default::default()
            },
            ..Default::default()
        }
        .clamped();
        assert_eq!(config.house_count, MIN_HOUSES);
        assert!((config.radius - MAX_RADIUS).abs() < f32::EPSILON);
        assert!((config.odds.fence - 1.0).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn clamped_handles_nan_radius() {
        let config = VillageConfig {
            radius: f32::NAN,
            ..Default::default()
        }
        .clamped();
        assert!((config.radius - MIN_RADIUS).abs() < f32::EPSILON);
    }

    #[test]
    fn clamped_keeps_valid_config() {
        let config = VillageConfig {
            style: VillageStyle::Tropical,
            seed: Some(9),
            ..Default::default()
        };
        assert_eq!(config.clamped(), config);
    }

    #[test]
    fn style_and_layout_parse_case_insensitive() {
        assert_eq!("oriental".parse::<VillageStyle>(), Ok(VillageStyle::Oriental));
        assert_eq!(" GRID ".parse::<VillageLayout>(), Ok(VillageLayout::Grid));
        assert_eq!(
            "gothic".parse::<VillageStyle>(),
            Err(ConfigError::UnknownStyle("gothic".into()))
        );
        assert_eq!(
            "spiral".parse::<VillageLayout>(),
            Err(ConfigError::UnknownLayout("spiral".into()))
        );
    }

    #[test]
    fn next_cycles_through_all() {
        let mut style = VillageStyle::Medieval;
        for _ in 0..VillageStyle::COUNT {
            style = style.next();
        }
        assert_eq!(style, VillageStyle::Medieval);
        assert_eq!(VillageLayout::Linear.next(), VillageLayout::Circle);
    }

    #[test]
    fn only_organic_is_stochastic() {
        let stochastic: Vec<_> = VillageLayout::ALL
            .into_iter()
            .filter(|l| l.is_stochastic())
            .collect();
        assert_eq!(stochastic, vec![VillageLayout::Organic]);
    }

    #[test]
    fn style_index_round_trip() {
        for (i, style) in VillageStyle::ALL.into_iter().enumerate() {
            assert_eq!(style as usize, i);
            assert_eq!(VillageStyle::from_index(i), Some(style));
        }
        assert_eq!(VillageStyle::from_index(VillageStyle::COUNT), None);
    }
}
