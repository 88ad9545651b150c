//! Headless scene graph on a `hecs` world.
//!
//! [`HeadlessScene`] implements [`SceneBuilder`] without any renderer. It
//! backs the engine tests and the simulation harness, and its query helpers
//! answer the questions an editor hierarchy would (how many roots, what is
//! under this group, where is this node in world space).

use hecs::{Entity, World};

use village_logic::dressing::LightPlacement;
use village_logic::geometry::{Transform, Vec3};

use crate::components::*;
use crate::scene::{Primitive, SceneBuilder, SceneError};

/// Scene graph held entirely in an ECS world.
pub struct HeadlessScene {
    pub world: World,
    next_order: u64,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            next_order: 0,
        }
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.world.len() as usize
    }

    pub fn contains(&self, node: Entity) -> bool {
        self.world.contains(node)
    }

    pub fn name_of(&self, node: Entity) -> Option<String> {
        self.world.get::<&SceneName>(node).ok().map(|n| n.0.clone())
    }

    pub fn parent_of(&self, node: Entity) -> Option<Entity> {
        self.world.get::<&ParentNode>(node).ok().map(|p| p.0)
    }

    pub fn local_transform(&self, node: Entity) -> Option<Transform> {
        self.world.get::<&LocalTransform>(node).ok().map(|t| t.0)
    }

    pub fn primitive(&self, node: Entity) -> Option<PrimitiveMesh> {
        self.world.get::<&PrimitiveMesh>(node).ok().map(|p| *p)
    }

    pub fn light(&self, node: Entity) -> Option<PointLightSource> {
        self.world.get::<&PointLightSource>(node).ok().map(|l| *l)
    }

    /// All root nodes with the given name, oldest first.
    pub fn roots_named(&self, name: &str) -> Vec<Entity> {
        let mut roots: Vec<(SpawnOrder, Entity)> = self
            .world
            .query::<(&SceneName, &SpawnOrder, &SceneRoot)>()
            .iter()
            .filter(|(_, (n, _, _))| n.0 == name)
            .map(|(entity, (_, order, _))| (*order, entity))
            .collect();
        roots.sort_by_key(|(order, _)| *order);
        roots.into_iter().map(|(_, entity)| entity).collect()
    }

    /// Direct children of `parent`, in creation order.
    pub fn children_of(&self, parent: Entity) -> Vec<Entity> {
        let mut children: Vec<(SpawnOrder, Entity)> = self
            .world
            .query::<(&ParentNode, &SpawnOrder)>()
            .iter()
            .filter(|(_, (p, _))| p.0 == parent)
            .map(|(entity, (_, order))| (*order, entity))
            .collect();
        children.sort_by_key(|(order, _)| *order);
        children.into_iter().map(|(_, entity)| entity).collect()
    }

    /// Direct children of `parent` with the given name.
    pub fn children_named(&self, parent: Entity, name: &str) -> Vec<Entity> {
        self.children_of(parent)
            .into_iter()
            .filter(|&child| self.name_of(child).as_deref() == Some(name))
            .collect()
    }

    /// `node` and everything below it, parents before children.
    pub fn subtree(&self, node: Entity) -> Vec<Entity> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(next) = stack.pop() {
            if !self.world.contains(next) {
                continue;
            }
            out.push(next);
            stack.extend(self.children_of(next).into_iter().rev());
        }
        out
    }

    /// Nodes anywhere in the scene with the given name.
    pub fn count_named(&self, name: &str) -> usize {
        self.world
            .query::<&SceneName>()
            .iter()
            .filter(|(_, n)| n.0 == name)
            .count()
    }

    pub fn primitive_count(&self) -> usize {
        self.world.query::<&PrimitiveMesh>().iter().count()
    }

    pub fn light_count(&self) -> usize {
        self.world.query::<&PointLightSource>().iter().count()
    }

    /// Origin of `node` in world space, composed through every parent.
    pub fn world_position(&self, node: Entity) -> Option<Vec3> {
        let mut point = Vec3::ZERO;
        let mut current = Some(node);
        while let Some(entity) = current {
            let transform = self.local_transform(entity)?;
            point = transform.transform_point(point);
            current = self.parent_of(entity);
        }
        Some(point)
    }

    fn despawn_recursive(&mut self, node: Entity) -> Result<(), SceneError> {
        for entity in self.subtree(node).into_iter().rev() {
            self.world
                .despawn(entity)
                .map_err(|e| SceneError::Backend(e.to_string()))?;
        }
        Ok(())
    }

    fn take_order(&mut self) -> SpawnOrder {
        let order = SpawnOrder(self.next_order);
        self.next_order += 1;
        order
    }

    fn spawn_child(
        &mut self,
        parent: Entity,
        name: &str,
        transform: Transform,
    ) -> Result<Entity, SceneError> {
        if !self.world.contains(parent) {
            return Err(SceneError::missing_parent(parent));
        }
        let order = self.take_order();
        Ok(self.world.spawn((
            SceneName(name.to_string()),
            ParentNode(parent),
            LocalTransform(transform),
            order,
        )))
    }

    fn attach<C: hecs::Component>(
        &mut self,
        node: Entity,
        component: C,
    ) -> Result<(), SceneError> {
        self.world
            .insert_one(node, component)
            .map_err(|e| SceneError::Backend(e.to_string()))
    }
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder for HeadlessScene {
    type Handle = Entity;

    fn clear_existing(&mut self, root_name: &str) -> Result<(), SceneError> {
        for root in self.roots_named(root_name) {
            self.despawn_recursive(root)?;
        }
        Ok(())
    }

    fn find_root(&self, root_name: &str) -> Option<Entity> {
        self.roots_named(root_name).into_iter().next()
    }

    fn remove(&mut self, handle: Entity) -> Result<(), SceneError> {
        if !self.world.contains(handle) {
            return Ok(());
        }
        self.despawn_recursive(handle)
    }

    fn create_root(&mut self, name: &str) -> Result<Entity, SceneError> {
        let order = self.take_order();
        Ok(self.world.spawn((
            SceneName(name.to_string()),
            SceneRoot,
            LocalTransform(Transform::IDENTITY),
            order,
        )))
    }

    fn create_group(
        &mut self,
        parent: Entity,
        name: &str,
        transform: &Transform,
    ) -> Result<Entity, SceneError> {
        self.spawn_child(parent, name, *transform)
    }

    fn instantiate_primitive(
        &mut self,
        parent: Entity,
        primitive: &Primitive,
    ) -> Result<Entity, SceneError> {
        let node = self.spawn_child(parent, primitive.name, primitive.transform)?;
        self.attach(
            node,
            PrimitiveMesh {
                shape: primitive.shape,
                color: primitive.color,
                solid: primitive.solid,
            },
        )?;
        Ok(node)
    }

    fn instantiate_light(
        &mut self,
        parent: Entity,
        light: &LightPlacement,
    ) -> Result<Entity, SceneError> {
        let node = self.spawn_child(parent, light.name, Transform::at(light.position))?;
        self.attach(
            node,
            PointLightSource {
                color: light.color,
                intensity: light.intensity,
                range: light.range,
            },
        )?;
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use village_logic::geometry::Rotation;
    use village_logic::palette::Color;
    use village_logic::structure::Shape;

    fn cube(name: &'static str, position: Vec3) -> Primitive {
        Primitive {
            name,
            shape: Shape::Box,
            transform: Transform::at(position),
            color: Color::WHITE,
            solid: true,
        }
    }

    #[test]
    fn clear_on_empty_scene_is_noop() {
        let mut scene = HeadlessScene::new();
        scene.clear_existing("Village").unwrap();
        scene.clear_existing("Village").unwrap();
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn clear_removes_whole_subtree_and_only_matching_roots() {
        let mut scene = HeadlessScene::new();
        let root = scene.create_root("Village").unwrap();
        let group = scene
            .create_group(root, "House", &Transform::IDENTITY)
            .unwrap();
        scene.instantiate_primitive(group, &cube("Body", Vec3::ZERO)).unwrap();
        let other = scene.create_root("Terrain").unwrap();

        scene.clear_existing("Village").unwrap();
        assert!(scene.roots_named("Village").is_empty());
        assert!(scene.contains(other));
        assert_eq!(scene.node_count(), 1);
    }

    #[test]
    fn missing_parent_is_an_error() {
        let mut scene = HeadlessScene::new();
        let root = scene.create_root("Village").unwrap();
        scene.remove(root).unwrap();
        let err = scene
            .create_group(root, "House", &Transform::IDENTITY)
            .unwrap_err();
        assert!(matches!(err, SceneError::MissingParent(_)));
    }

    #[test]
    fn remove_stale_handle_is_noop() {
        let mut scene = HeadlessScene::new();
        let root = scene.create_root("Village").unwrap();
        scene.remove(root).unwrap();
        scene.remove(root).unwrap();
    }

    #[test]
    fn world_position_composes_parents() {
        let mut scene = HeadlessScene::new();
        let root = scene.create_root("Village").unwrap();
        let group_transform = Transform::at(Vec3::ground(10.0, 0.0))
            .with_rotation(Rotation::from_yaw(std::f32::consts::FRAC_PI_2));
        let group = scene.create_group(root, "House", &group_transform).unwrap();
        // local +z turns into world +x under a quarter yaw
        let door = scene
            .instantiate_primitive(group, &cube("Door", Vec3::new(0.0, 0.0, 2.0)))
            .unwrap();
        let p = scene.world_position(door).unwrap();
        assert!((p.x - 12.0).abs() < 1e-4, "{p:?}");
        assert!(p.z.abs() < 1e-4, "{p:?}");
    }

    #[test]
    fn children_are_listed_in_spawn_order() {
        let mut scene = HeadlessScene::new();
        let root = scene.create_root("Village").unwrap();
        let a = scene.instantiate_primitive(root, &cube("A", Vec3::ZERO)).unwrap();
        let b = scene.instantiate_primitive(root, &cube("B", Vec3::ZERO)).unwrap();
        assert_eq!(scene.children_of(root), vec![a, b]);
        assert_eq!(scene.children_named(root, "B"), vec![b]);
        assert_eq!(scene.subtree(root), vec![root, a, b]);
    }

    #[test]
    fn spawn_order_survives_recycled_ids() {
        let mut scene = HeadlessScene::new();
        let root = scene.create_root("Village").unwrap();
        let a = scene.instantiate_primitive(root, &cube("A", Vec3::ZERO)).unwrap();
        let b = scene.instantiate_primitive(root, &cube("B", Vec3::ZERO)).unwrap();
        scene.remove(a).unwrap();
        // c may take over a's freed id, which sorts below b's
        let c = scene.instantiate_primitive(root, &cube("C", Vec3::ZERO)).unwrap();
        assert_eq!(scene.children_of(root), vec![b, c]);
    }

    #[test]
    fn find_root_returns_oldest_match() {
        let mut scene = HeadlessScene::new();
        assert!(scene.find_root("Village").is_none());
        scene.create_root("Terrain").unwrap();
        let first = scene.create_root("Village").unwrap();
        let second = scene.create_root("Village").unwrap();
        assert_eq!(scene.find_root("Village"), Some(first));
        scene.remove(first).unwrap();
        assert_eq!(scene.find_root("Village"), Some(second));
    }
}
