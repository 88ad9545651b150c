//! House anchor placement.
//!
//! Produces one ground-plane [`Anchor`] per house. Ordering matters: the
//! linear layout alternates sides by index, and every later stage walks
//! anchors in this order when it draws random numbers.
//!
//! ```text
//!   Circle          Grid            Organic         Linear
//!     . ' .         o  o  o           o   o          o |
//!   o       o       o  o  o         o   o  o           | o
//!   o   +   o       o  o  +            + o           o |
//!   o       o                       o     o            | o
//!     ' . '                            o             o |
//! ```

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::VillageLayout;
use crate::constants::{LINEAR_SIDE_OFFSET, ORGANIC_MIN_RADIUS_FACTOR};
use crate::geometry::Vec3;

/// Ground position assigned to one house.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Position in the planner's output order.
    pub index: usize,
    /// Always on the ground plane (y = 0).
    pub position: Vec3,
}

impl Anchor {
    pub fn new(index: usize, position: Vec3) -> Self {
        Self { index, position }
    }

    /// Planar distance to the village center.
    pub fn distance_to_center(&self) -> f32 {
        self.position.planar_length()
    }
}

/// Place `house_count` anchors for a layout topology.
///
/// Only [`VillageLayout::Organic`] draws from `rng`. Counts are not range
/// checked here; a count of zero yields no anchors.
pub fn plan_anchors(
    layout: VillageLayout,
    house_count: u32,
    radius: f32,
    rng: &mut impl Rng,
) -> Vec<Anchor> {
    let n = house_count as usize;
    let positions = match layout {
        VillageLayout::Circle => circle_positions(n, radius),
        VillageLayout::Grid => grid_positions(n, radius),
        VillageLayout::Organic => organic_positions(n, radius, rng),
        VillageLayout::Linear => linear_positions(n, radius),
    };
    debug_assert_eq!(positions.len(), n);

    positions
        .into_iter()
        .enumerate()
        .map(|(index, position)| Anchor::new(index, position))
        .collect()
}

/// Evenly spaced on the rim, first anchor at angle 0 (+x).
pub fn circle_positions(n: usize, radius: f32) -> Vec<Vec3> {
    (0..n)
        .map(|i| {
            let angle = (i as f32 / n as f32) * TAU;
            Vec3::ground(angle.cos() * radius, angle.sin() * radius)
        })
        .collect()
}

/// Number of grid columns (and maximum rows) for `n` houses.
pub fn grid_columns(n: usize) -> usize {
    (n as f32).sqrt().ceil() as usize
}

/// Square lattice filled row by row, spacing `2r / cols`.
pub fn grid_positions(n: usize, radius: f32) -> Vec<Vec3> {
    let cols = grid_columns(n);
    if cols == 0 {
        return Vec::new();
    }
    let spacing = radius * 2.0 / cols as f32;
    let half = cols as f32 / 2.0;

    (0..n)
        .map(|i| {
            let x = (i % cols) as f32;
            let z = (i / cols) as f32;
            Vec3::ground((x - half) * spacing, (z - half) * spacing)
        })
        .collect()
}

/// Random annulus between `0.4r` and `r`. Draws radius, then angle, per
/// anchor.
pub fn organic_positions(n: usize, radius: f32, rng: &mut impl Rng) -> Vec<Vec3> {
    let inner = radius * ORGANIC_MIN_RADIUS_FACTOR;
    let (lo, hi) = if inner <= radius {
        (inner, radius)
    } else {
        (radius, inner)
    };

    (0..n)
        .map(|_| {
            let r = rng.gen_range(lo..=hi);
            let angle = rng.gen_range(0.0..TAU);
            Vec3::ground(angle.cos() * r, angle.sin() * r)
        })
        .collect()
}

/// Street along z from `-r` to `+r`, houses alternating `x = +5 / -5`.
///
/// A single house has no spacing to divide; it sits at the middle of the
/// street on the `+5` side.
pub fn linear_positions(n: usize, radius: f32) -> Vec<Vec3> {
    if n == 1 {
        return vec![Vec3::ground(LINEAR_SIDE_OFFSET, 0.0)];
    }
    let step = radius * 2.0 / (n as f32 - 1.0);

    (0..n)
        .map(|i| {
            let side = if i % 2 == 0 {
                LINEAR_SIDE_OFFSET
            } else {
                -LINEAR_SIDE_OFFSET
            };
            Vec3::ground(side, -radius + i as f32 * step)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn circle_anchors_on_rim_evenly_spaced() {
        for n in 4..=20u32 {
            let anchors = plan_anchors(VillageLayout::Circle, n, 30.0, &mut rng());
            assert_eq!(anchors.len(), n as usize);
            let step = TAU / n as f32;
            for a in &anchors {
                assert!((a.distance_to_center() - 30.0).abs() < 1e-3);
                assert_eq!(a.position.y, 0.0);
                let angle = a.position.z.atan2(a.position.x).rem_euclid(TAU);
                let expected = step * a.index as f32;
                let diff = (angle - expected).abs();
                assert!(diff < 1e-3 || (TAU - diff) < 1e-3, "n={n} i={}", a.index);
            }
            assert!((anchors[0].position.x - 30.0).abs() < 1e-4);
            assert!(anchors[0].position.z.abs() < 1e-4);
        }
    }

    #[test]
    fn grid_anchors_on_lattice() {
        for n in 4..=20u32 {
            let radius = 25.0;
            let anchors = plan_anchors(VillageLayout::Grid, n, radius, &mut rng());
            assert_eq!(anchors.len(), n as usize);
            let cols = grid_columns(n as usize);
            let spacing = 2.0 * radius / cols as f32;
            let half = cols as f32 / 2.0;
            for a in &anchors {
                let gx = a.position.x / spacing + half;
                let gz = a.position.z / spacing + half;
                assert!((gx - gx.round()).abs() < 1e-3, "n={n} x={}", a.position.x);
                assert!((gz - gz.round()).abs() < 1e-3, "n={n} z={}", a.position.z);
                assert!(gx.round() >= 0.0 && (gx.round() as usize) < cols);
            }
        }
    }

    #[test]
    fn grid_nine_houses_is_three_by_three() {
        let positions = grid_positions(9, 30.0);
        assert_eq!(grid_columns(9), 3);
        // spacing 20, offsets -1.5, -0.5, 0.5 columns
        assert!((positions[0].x + 30.0).abs() < 1e-4);
        assert!((positions[0].z + 30.0).abs() < 1e-4);
        assert!((positions[8].x - 10.0).abs() < 1e-4);
        assert!((positions[8].z - 10.0).abs() < 1e-4);
    }

    #[test]
    fn linear_alternates_sides_and_spans_axis() {
        for n in 2..=20u32 {
            let radius = 40.0;
            let anchors = plan_anchors(VillageLayout::Linear, n, radius, &mut rng());
            assert_eq!(anchors.len(), n as usize);
            let step = 2.0 * radius / (n as f32 - 1.0);
            for a in &anchors {
                let expected_x = if a.index % 2 == 0 { 5.0 } else { -5.0 };
                assert_eq!(a.position.x, expected_x);
                let expected_z = -radius + a.index as f32 * step;
                assert!((a.position.z - expected_z).abs() < 1e-3);
            }
            assert!((anchors[0].position.z + radius).abs() < 1e-4);
            assert!((anchors[n as usize - 1].position.z - radius).abs() < 1e-3);
        }
    }

    #[test]
    fn linear_single_house_does_not_divide_by_zero() {
        let anchors = plan_anchors(VillageLayout::Linear, 1, 30.0, &mut rng());
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].position, Vec3::ground(5.0, 0.0));
        assert!(anchors[0].position.is_finite());
    }

    #[test]
    fn zero_houses_yields_no_anchors() {
        for layout in VillageLayout::ALL {
            assert!(plan_anchors(layout, 0, 30.0, &mut rng()).is_empty());
        }
    }

    #[test]
    fn organic_stays_in_annulus() {
        let anchors = plan_anchors(VillageLayout::Organic, 500, 50.0, &mut rng());
        assert_eq!(anchors.len(), 500);
        for a in &anchors {
            let d = a.distance_to_center();
            assert!((20.0 - 1e-3..=50.0 + 1e-3).contains(&d), "distance {d}");
        }
    }

    #[test]
    fn organic_is_reproducible_with_same_seed() {
        let a = plan_anchors(VillageLayout::Organic, 12, 30.0, &mut StdRng::seed_from_u64(5));
        let b = plan_anchors(VillageLayout::Organic, 12, 30.0, &mut StdRng::seed_from_u64(5));
        let c = plan_anchors(VillageLayout::Organic, 12, 30.0, &mut StdRng::seed_from_u64(6));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn deterministic_layouts_leave_rng_untouched() {
        for layout in [VillageLayout::Circle, VillageLayout::Grid, VillageLayout::Linear] {
            let mut used = rng();
            plan_anchors(layout, 10, 30.0, &mut used);
            let mut fresh = rng();
            assert_eq!(used.gen::<u64>(), fresh.gen::<u64>(), "{layout:?}");
        }
    }

    #[test]
    fn indices_follow_output_order() {
        let anchors = plan_anchors(VillageLayout::Grid, 7, 20.0, &mut rng());
        for (i, a) in anchors.iter().enumerate() {
            assert_eq!(a.index, i);
        }
    }
}
