//! Scene names and fixed dimensions.
//!
//! Names are what a scene builder shows in its hierarchy. Dimensions are
//! in world units; see [`crate::structure::Shape`] for the unit size of
//! each primitive.

/// Scene object names.
pub mod names {
    /// Well-known name of the single live village root.
    pub const VILLAGE_ROOT: &str = "Village";
    pub const GROUND: &str = "Ground";
    pub const HOUSE: &str = "House";
    pub const BODY: &str = "Body";
    pub const ROOF: &str = "Roof";
    pub const DOOR: &str = "Door";
    pub const CHIMNEY: &str = "Chimney";
    pub const WELL: &str = "Well";
    pub const WELL_BASE: &str = "Base";
    pub const WATER: &str = "Water";
    pub const WELL_POST: &str = "Post";
    pub const FENCES: &str = "Fences";
    pub const FENCE_POST: &str = "FencePost";
    pub const PATHS: &str = "Paths";
    pub const PATH: &str = "Path";
    pub const PROPS: &str = "Props";
    pub const CRATE: &str = "Crate";
    pub const BARREL: &str = "Barrel";
    pub const LIGHTS: &str = "Lights";
    pub const CENTER_LIGHT: &str = "CenterLight";
    pub const HOUSE_LIGHT: &str = "HouseLight";
}

/// Ground disc sits half a unit below the village plane.
pub const GROUND_Y: f32 = -0.5;
/// Ground diameter as a multiple of the village radius.
pub const GROUND_DIAMETER_FACTOR: f32 = 2.5;
pub const GROUND_THICKNESS: f32 = 0.5;

/// Linear layout: houses alternate this far either side of the z axis.
pub const LINEAR_SIDE_OFFSET: f32 = 5.0;
/// Organic layout: innermost ring as a fraction of the village radius.
pub const ORGANIC_MIN_RADIUS_FACTOR: f32 = 0.4;

// House proportions (before the per-house scale factor)
pub const HOUSE_SCALE_RANGE: (f32, f32) = (0.8, 1.2);
pub const HOUSE_WIDTH_RANGE: (f32, f32) = (4.0, 6.0);
pub const HOUSE_DEPTH_RANGE: (f32, f32) = (5.0, 7.0);
pub const HOUSE_HEIGHT_RANGE: (f32, f32) = (3.0, 4.0);
pub const ROOF_OVERHANG: f32 = 0.5;
pub const ROOF_RISE: f32 = 0.8;
pub const ROOF_THICKNESS: f32 = 1.5;
pub const ROOF_TILT_DEGREES: f32 = 5.0;
pub const DOOR_SIZE: (f32, f32, f32) = (1.0, 1.8, 0.1);
pub const CHIMNEY_SIZE: (f32, f32, f32) = (0.6, 1.5, 0.6);
pub const CHIMNEY_RISE: f32 = 2.0;

// Site dressing
pub const FENCE_RADIUS: f32 = 4.0;
pub const FENCE_POSTS_PER_HOUSE: usize = 4;
pub const FENCE_JITTER: f32 = 0.2;
pub const FENCE_POST_SIZE: (f32, f32, f32) = (0.1, 1.0, 2.0);
pub const PATH_WIDTH: f32 = 2.0;
pub const PATH_THICKNESS: f32 = 0.05;
pub const PROP_SCATTER: f32 = 2.0;
pub const CRATE_SIZE: f32 = 0.6;
pub const CRATE_LIFT: f32 = 0.3;
pub const BARREL_SIZE: f32 = 0.5;
pub const BARREL_LIFT: f32 = 0.4;
pub const CENTER_LIGHT_HEIGHT: f32 = 5.0;
pub const CENTER_LIGHT_INTENSITY: f32 = 2.0;
pub const HOUSE_LIGHT_HEIGHT: f32 = 2.0;
pub const HOUSE_LIGHT_INTENSITY: f32 = 1.0;
pub const HOUSE_LIGHT_RANGE: f32 = 6.0;
