//! Style palettes.
//!
//! Every [`VillageStyle`] maps to one hand-tuned [`ColorScheme`] held in a
//! single table indexed by the style. Lookups that cannot name a style
//! (raw indices, unknown names) get [`NEUTRAL_SCHEME`] instead of an error.

use serde::{Deserialize, Serialize};

use crate::config::VillageStyle;

/// Linear RGBA color, channels in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const GRAY: Self = Self::rgb(0.5, 0.5, 0.5);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Alpha strictly between 0 and 1.
    pub fn is_translucent(&self) -> bool {
        self.a > 0.0 && self.a < 1.0
    }
}

/// The four color channels of a village style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub wall: Color,
    pub roof: Color,
    pub trim: Color,
    pub ground: Color,
}

/// Fallback for lookups that do not resolve to a style.
pub const NEUTRAL_SCHEME: ColorScheme = ColorScheme {
    wall: Color::WHITE,
    roof: Color::GRAY,
    trim: Color::BLACK,
    ground: Color::GREEN,
};

const fn scheme(wall: [f32; 3], roof: [f32; 3], trim: [f32; 3], ground: [f32; 3]) -> ColorScheme {
    ColorScheme {
        wall: Color::rgb(wall[0], wall[1], wall[2]),
        roof: Color::rgb(roof[0], roof[1], roof[2]),
        trim: Color::rgb(trim[0], trim[1], trim[2]),
        ground: Color::rgb(ground[0], ground[1], ground[2]),
    }
}

/// Indexed by `VillageStyle as usize`.
const STYLE_PALETTES: [ColorScheme; VillageStyle::COUNT] = [
    // Medieval
    scheme([0.6, 0.5, 0.35], [0.4, 0.2, 0.1], [0.35, 0.25, 0.15], [0.4, 0.35, 0.25]),
    // Fantasy
    scheme([0.9, 0.85, 0.7], [0.3, 0.5, 0.6], [0.6, 0.4, 0.2], [0.3, 0.45, 0.25]),
    // Tropical
    scheme([0.7, 0.6, 0.4], [0.5, 0.45, 0.25], [0.5, 0.4, 0.3], [0.6, 0.55, 0.35]),
    // Oriental
    scheme([0.85, 0.8, 0.7], [0.2, 0.2, 0.25], [0.6, 0.15, 0.1], [0.45, 0.4, 0.3]),
    // Viking
    scheme([0.4, 0.35, 0.25], [0.35, 0.3, 0.2], [0.3, 0.25, 0.15], [0.35, 0.4, 0.3]),
];

/// Color scheme for a style.
pub fn colors_for(style: VillageStyle) -> ColorScheme {
    STYLE_PALETTES[style as usize]
}

/// Color scheme for a raw style index, neutral when out of range.
pub fn colors_for_index(index: usize) -> ColorScheme {
    STYLE_PALETTES.get(index).copied().unwrap_or(NEUTRAL_SCHEME)
}

/// Color scheme for a style name (case-insensitive), neutral when unknown.
pub fn colors_for_name(name: &str) -> ColorScheme {
    name.parse::<VillageStyle>()
        .map(colors_for)
        .unwrap_or(NEUTRAL_SCHEME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_style_has_a_stable_scheme() {
        for style in VillageStyle::ALL {
            assert_eq!(colors_for(style), colors_for(style));
            assert_ne!(colors_for(style), NEUTRAL_SCHEME, "{style:?}");
        }
    }

    #[test]
    fn medieval_scheme_values() {
        let c = colors_for(VillageStyle::Medieval);
        assert_eq!(c.wall, Color::rgb(0.6, 0.5, 0.35));
        assert_eq!(c.roof, Color::rgb(0.4, 0.2, 0.1));
        assert_eq!(c.trim, Color::rgb(0.35, 0.25, 0.15));
        assert_eq!(c.ground, Color::rgb(0.4, 0.35, 0.25));
    }

    #[test]
    fn oriental_trim_is_red_lacquer() {
        let trim = colors_for(VillageStyle::Oriental).trim;
        assert!(trim.r > trim.g && trim.r > trim.b);
    }

    #[test]
    fn styles_are_distinct() {
        for a in VillageStyle::ALL {
            for b in VillageStyle::ALL {
                if a != b {
                    assert_ne!(colors_for(a), colors_for(b), "{a:?} vs {b:?}");
                }
            }
        }
    }

    #[test]
    fn unknown_lookups_fall_back_to_neutral() {
        assert_eq!(colors_for_index(VillageStyle::COUNT), NEUTRAL_SCHEME);
        assert_eq!(colors_for_index(usize::MAX), NEUTRAL_SCHEME);
        assert_eq!(colors_for_name("steampunk"), NEUTRAL_SCHEME);
        assert_eq!(colors_for_name("viking"), colors_for(VillageStyle::Viking));
    }

    #[test]
    fn schemes_are_opaque() {
        for style in VillageStyle::ALL {
            let c = colors_for(style);
            for channel in [c.wall, c.roof, c.trim, c.ground] {
                assert!(!channel.is_translucent());
            }
        }
    }
}
