//! Village Viewer - Bevy-based front end for the village generator

mod builder;

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use village_core::engine::VillageEngine;
use village_core::scene::SceneError;
use village_logic::config::{VillageConfig, MAX_HOUSES, MAX_RADIUS, MIN_HOUSES, MIN_RADIUS};
use village_logic::geometry::Vec3 as VillageVec3;

use builder::{BevySceneBuilder, PrimitiveMeshes, VillageRoot};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Village Generator".to_string(),
                resolution: (1280.0, 720.0).into(),
                present_mode: bevy::window::PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(EngineWrapper(VillageEngine::from_entropy()))
        .insert_resource(ViewerConfig(VillageConfig::default()))
        .insert_resource(OrbitCamera::default())
        .insert_resource(ClearColor(Color::srgb(0.55, 0.7, 0.85)))
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (config_controls, village_actions, camera_controls, update_hud).chain(),
        )
        .run();
}

#[derive(Resource)]
struct EngineWrapper(VillageEngine<Entity>);

/// Settings for the next generation run.
#[derive(Resource)]
struct ViewerConfig(VillageConfig);

#[derive(Resource)]
struct OrbitCamera {
    yaw: f32,
    pitch: f32,
    distance: f32,
    dragging: bool,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.75,
            distance: 90.0,
            dragging: false,
        }
    }
}

/// Action requested by a key press, run against the scene this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
enum VillageAction {
    Generate,
    Replay,
    AddHouse,
    AddWell,
    Clear,
}

// Marker component for the HUD text
#[derive(Component)]
struct HudText;

#[derive(Component)]
struct ViewerCamera;

fn setup(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    commands.spawn((Camera3d::default(), Transform::default(), ViewerCamera));

    commands.insert_resource(AmbientLight {
        color: Color::srgb(1.0, 0.97, 0.9),
        brightness: 400.0,
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(30.0, 60.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.insert_resource(PrimitiveMeshes::new(&mut meshes));

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));
}

/// Style, layout, size and feature keys. Changes apply on the next generate.
fn config_controls(keyboard: Res<ButtonInput<KeyCode>>, mut config: ResMut<ViewerConfig>) {
    let config = &mut config.0;

    if keyboard.just_pressed(KeyCode::KeyS) {
        config.style = config.style.next();
    }
    if keyboard.just_pressed(KeyCode::KeyL) {
        config.layout = config.layout.next();
    }
    if keyboard.just_pressed(KeyCode::Equal) || keyboard.just_pressed(KeyCode::NumpadAdd) {
        config.house_count = (config.house_count + 1).min(MAX_HOUSES);
    }
    if keyboard.just_pressed(KeyCode::Minus) || keyboard.just_pressed(KeyCode::NumpadSubtract) {
        config.house_count = config.house_count.saturating_sub(1).max(MIN_HOUSES);
    }
    if keyboard.just_pressed(KeyCode::BracketRight) {
        config.radius = (config.radius + 5.0).min(MAX_RADIUS);
    }
    if keyboard.just_pressed(KeyCode::BracketLeft) {
        config.radius = (config.radius - 5.0).max(MIN_RADIUS);
    }

    let features = &mut config.features;
    for (key, flag) in [
        (KeyCode::KeyF, &mut features.fences),
        (KeyCode::KeyP, &mut features.paths),
        (KeyCode::KeyT, &mut features.props),
        (KeyCode::KeyW, &mut features.well),
        (KeyCode::KeyK, &mut features.lights),
    ] {
        if keyboard.just_pressed(key) {
            *flag = !*flag;
        }
    }
}

fn pressed_action(keyboard: &ButtonInput<KeyCode>) -> Option<VillageAction> {
    [
        (KeyCode::KeyG, VillageAction::Generate),
        (KeyCode::KeyR, VillageAction::Replay),
        (KeyCode::KeyH, VillageAction::AddHouse),
        (KeyCode::KeyJ, VillageAction::AddWell),
        (KeyCode::KeyC, VillageAction::Clear),
    ]
    .into_iter()
    .find(|(key, _)| keyboard.just_pressed(*key))
    .map(|(_, action)| action)
}

#[allow(clippy::too_many_arguments)]
fn village_actions(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    primitive_meshes: Res<PrimitiveMeshes>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut engine: ResMut<EngineWrapper>,
    config: Res<ViewerConfig>,
    roots: Query<(Entity, &Name), With<VillageRoot>>,
    mut started: Local<bool>,
) {
    let action = if *started {
        pressed_action(&keyboard)
    } else {
        *started = true;
        Some(VillageAction::Generate)
    };
    let Some(action) = action else {
        return;
    };

    let existing = roots
        .iter()
        .map(|(entity, name)| (entity, name.as_str().to_string()))
        .collect();
    let mut scene =
        BevySceneBuilder::new(&mut commands, &primitive_meshes, &mut materials, existing);
    let engine = &mut engine.0;

    let result: Result<(), SceneError> = match action {
        VillageAction::Generate => {
            let run = VillageConfig {
                seed: None,
                ..config.0.clone()
            };
            engine.generate(&mut scene, &run, &mut progress_log).map(|_| ())
        }
        VillageAction::Replay => {
            let run = VillageConfig {
                seed: engine.last_seed(),
                ..config.0.clone()
            };
            engine.generate(&mut scene, &run, &mut progress_log).map(|_| ())
        }
        VillageAction::AddHouse => engine
            .add_house(&mut scene, VillageVec3::ZERO, config.0.style)
            .map(|_| ()),
        VillageAction::AddWell => engine.add_well(&mut scene, VillageVec3::ZERO).map(|_| ()),
        VillageAction::Clear => engine.clear(&mut scene),
    };

    if let Err(e) = result {
        error!("{action:?} failed: {e}");
    }
}

fn progress_log(label: &str, fraction: f32) {
    debug!("[{:>3.0}%] {label}", fraction * 100.0);
}

fn camera_controls(
    mut orbit: ResMut<OrbitCamera>,
    mut camera_query: Query<&mut Transform, With<ViewerCamera>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut scroll_events: EventReader<MouseWheel>,
    mut motion_events: EventReader<MouseMotion>,
    time: Res<Time>,
) {
    let turn_speed = 1.5 * time.delta_secs();

    // Keyboard orbit
    if keyboard.pressed(KeyCode::ArrowLeft) {
        orbit.yaw -= turn_speed;
    }
    if keyboard.pressed(KeyCode::ArrowRight) {
        orbit.yaw += turn_speed;
    }
    if keyboard.pressed(KeyCode::ArrowUp) {
        orbit.pitch += turn_speed;
    }
    if keyboard.pressed(KeyCode::ArrowDown) {
        orbit.pitch -= turn_speed;
    }

    // Mouse drag
    orbit.dragging =
        mouse_buttons.pressed(MouseButton::Middle) || mouse_buttons.pressed(MouseButton::Right);

    if orbit.dragging {
        for motion in motion_events.read() {
            orbit.yaw -= motion.delta.x * 0.005;
            orbit.pitch += motion.delta.y * 0.005;
        }
    } else {
        motion_events.clear();
    }
    orbit.pitch = orbit.pitch.clamp(0.1, 1.5);

    // Scroll zoom
    for scroll in scroll_events.read() {
        orbit.distance *= 1.0 - scroll.y * 0.1;
        orbit.distance = orbit.distance.clamp(10.0, 300.0);
    }

    if let Ok(mut transform) = camera_query.get_single_mut() {
        let offset = Vec3::new(
            orbit.pitch.cos() * orbit.yaw.sin(),
            orbit.pitch.sin(),
            orbit.pitch.cos() * orbit.yaw.cos(),
        ) * orbit.distance;
        *transform = Transform::from_translation(offset).looking_at(Vec3::ZERO, Vec3::Y);
    }
}

fn update_hud(
    engine: Res<EngineWrapper>,
    config: Res<ViewerConfig>,
    mut hud: Query<&mut Text, With<HudText>>,
) {
    let Ok(mut text) = hud.get_single_mut() else {
        return;
    };
    let config = &config.0;
    let on_off = |flag: bool| if flag { "on" } else { "off" };

    let mut lines = vec![
        format!("Style: {} ({})", config.style, config.style.description()),
        format!("Layout: {}", config.layout),
        format!("Houses: {}   Radius: {:.0}", config.house_count, config.radius),
        format!(
            "Well {}  Fences {}  Paths {}  Props {}  Lights {}",
            on_off(config.features.well),
            on_off(config.features.fences),
            on_off(config.features.paths),
            on_off(config.features.props),
            on_off(config.features.lights),
        ),
    ];

    if let (Some(plan), Some(seed)) = (engine.0.plan(), engine.0.last_seed()) {
        let s = plan.summary();
        lines.push(format!(
            "Last village: {} houses, {} chimneys, {} fenced, {} props, {} lights (seed {seed})",
            s.houses,
            s.chimneys,
            s.fenced_houses,
            s.props(),
            s.lights(),
        ));
    }

    lines.push(String::new());
    lines.push("G generate  R replay seed  C clear  H add house  J add well".to_string());
    lines.push("S style  L layout  +/- houses  [/] radius".to_string());
    lines.push("F fences  P paths  T props  W well  K lights".to_string());
    lines.push("Arrows / right-drag orbit, wheel zoom".to_string());

    **text = lines.join("\n");
}
