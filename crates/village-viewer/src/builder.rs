//! Bevy implementation of the village scene builder.
//!
//! Every node is spawned through `Commands`, so nothing exists in the world
//! until the calling system finishes. The builder keeps its own record of
//! roots and removals to stay consistent within one system run.

use std::collections::HashSet;

use bevy::prelude::*;

use village_core::scene::{Primitive, SceneBuilder, SceneError};
use village_logic::dressing::LightPlacement;
use village_logic::geometry;
use village_logic::palette;
use village_logic::structure::Shape;

/// Bevy point lights are in lumens; village intensities are unitless.
pub const LUMENS_PER_INTENSITY: f32 = 200_000.0;

/// Marks a top-level village node.
#[derive(Component)]
pub struct VillageRoot;

/// Unit meshes shared by every primitive.
#[derive(Resource, Clone)]
pub struct PrimitiveMeshes {
    pub cuboid: Handle<Mesh>,
    pub cylinder: Handle<Mesh>,
}

impl PrimitiveMeshes {
    /// 1×1×1 cube and a cylinder of diameter 1, height 2.
    pub fn new(meshes: &mut Assets<Mesh>) -> Self {
        Self {
            cuboid: meshes.add(Cuboid::new(1.0, 1.0, 1.0)),
            cylinder: meshes.add(Cylinder::new(0.5, 2.0)),
        }
    }

    fn for_shape(&self, shape: Shape) -> Handle<Mesh> {
        match shape {
            Shape::Box => self.cuboid.clone(),
            Shape::Cylinder => self.cylinder.clone(),
        }
    }
}

pub fn to_bevy_vec3(v: geometry::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Roll, then pitch, then yaw, applied to the vector.
pub fn to_bevy_transform(t: &geometry::Transform) -> Transform {
    Transform {
        translation: to_bevy_vec3(t.position),
        rotation: Quat::from_euler(
            EulerRot::YXZ,
            t.rotation.yaw,
            t.rotation.pitch,
            t.rotation.roll,
        ),
        scale: to_bevy_vec3(t.scale),
    }
}

pub fn to_bevy_color(c: palette::Color) -> Color {
    Color::srgba(c.r, c.g, c.b, c.a)
}

pub struct BevySceneBuilder<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a PrimitiveMeshes,
    materials: &'a mut Assets<StandardMaterial>,
    roots: Vec<(Entity, String)>,
    removed: HashSet<Entity>,
}

impl<'a, 'w, 's> BevySceneBuilder<'a, 'w, 's> {
    /// `roots` are the village roots that exist in the world right now.
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        meshes: &'a PrimitiveMeshes,
        materials: &'a mut Assets<StandardMaterial>,
        roots: Vec<(Entity, String)>,
    ) -> Self {
        Self {
            commands,
            meshes,
            materials,
            roots,
            removed: HashSet::new(),
        }
    }

    fn check_parent(&mut self, parent: Entity) -> Result<(), SceneError> {
        if self.removed.contains(&parent) || self.commands.get_entity(parent).is_none() {
            return Err(SceneError::missing_parent(parent));
        }
        Ok(())
    }

    fn despawn(&mut self, entity: Entity) {
        if self.removed.insert(entity) {
            if let Some(entity_commands) = self.commands.get_entity(entity) {
                entity_commands.despawn_recursive();
            }
        }
    }

    fn material_for(&mut self, color: palette::Color) -> Handle<StandardMaterial> {
        let alpha_mode = if color.is_translucent() {
            AlphaMode::Blend
        } else {
            AlphaMode::Opaque
        };
        self.materials.add(StandardMaterial {
            base_color: to_bevy_color(color),
            perceptual_roughness: 0.9,
            alpha_mode,
            ..default()
        })
    }
}

impl SceneBuilder for BevySceneBuilder<'_, '_, '_> {
    type Handle = Entity;

    fn clear_existing(&mut self, root_name: &str) -> Result<(), SceneError> {
        let matching: Vec<Entity> = self
            .roots
            .iter()
            .filter(|(_, name)| name == root_name)
            .map(|(entity, _)| *entity)
            .collect();
        for entity in matching {
            self.despawn(entity);
        }
        self.roots.retain(|(_, name)| name != root_name);
        Ok(())
    }

    fn find_root(&self, root_name: &str) -> Option<Entity> {
        self.roots
            .iter()
            .find(|(entity, name)| name == root_name && !self.removed.contains(entity))
            .map(|(entity, _)| *entity)
    }

    fn remove(&mut self, handle: Entity) -> Result<(), SceneError> {
        self.despawn(handle);
        self.roots.retain(|(entity, _)| *entity != handle);
        Ok(())
    }

    fn create_root(&mut self, name: &str) -> Result<Entity, SceneError> {
        let root = self
            .commands
            .spawn((
                Name::new(name.to_string()),
                VillageRoot,
                Transform::IDENTITY,
                Visibility::default(),
            ))
            .id();
        self.roots.push((root, name.to_string()));
        Ok(root)
    }

    fn create_group(
        &mut self,
        parent: Entity,
        name: &str,
        transform: &geometry::Transform,
    ) -> Result<Entity, SceneError> {
        self.check_parent(parent)?;
        Ok(self
            .commands
            .spawn((
                Name::new(name.to_string()),
                to_bevy_transform(transform),
                Visibility::default(),
            ))
            .set_parent(parent)
            .id())
    }

    fn instantiate_primitive(
        &mut self,
        parent: Entity,
        primitive: &Primitive,
    ) -> Result<Entity, SceneError> {
        self.check_parent(parent)?;
        let material = self.material_for(primitive.color);
        let mesh = self.meshes.for_shape(primitive.shape);
        Ok(self
            .commands
            .spawn((
                Name::new(primitive.name),
                Mesh3d(mesh),
                MeshMaterial3d(material),
                to_bevy_transform(&primitive.transform),
            ))
            .set_parent(parent)
            .id())
    }

    fn instantiate_light(
        &mut self,
        parent: Entity,
        light: &LightPlacement,
    ) -> Result<Entity, SceneError> {
        self.check_parent(parent)?;
        Ok(self
            .commands
            .spawn((
                Name::new(light.name),
                PointLight {
                    color: to_bevy_color(light.color),
                    intensity: light.intensity * LUMENS_PER_INTENSITY,
                    range: light.range,
                    shadows_enabled: false,
                    ..default()
                },
                Transform::from_translation(to_bevy_vec3(light.position)),
            ))
            .set_parent(parent)
            .id())
    }
}
