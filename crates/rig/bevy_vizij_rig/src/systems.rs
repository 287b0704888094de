use bevy::prelude::*;
use std::collections::HashMap;

use vizij_rig_core::{
    retarget, HostError, MemoryRig, RetargetConfig, RetargetError, RetargetReport, RigHost,
    RigMode, RigStatus,
};

use crate::components::{RigEditMode, VizijRigRoot};
use crate::resources::{RetargetOutcome, RetargetReports, RetargetRequest};

/// [`RigHost`] over the `Name`d descendants of a rig root entity.
/// Bone order is a depth-first walk from the root.
pub struct WorldRig<'w> {
    world: &'w mut World,
    root: Entity,
}

impl<'w> WorldRig<'w> {
    pub fn new(world: &'w mut World, root: Entity) -> Self {
        Self { world, root }
    }

    fn bones(&self) -> Vec<(Entity, String)> {
        fn walk(world: &World, e: Entity, out: &mut Vec<(Entity, String)>) {
            if let Some(children) = world.get::<Children>(e) {
                for &child in children.iter() {
                    if let Some(name) = world.get::<Name>(child) {
                        out.push((child, name.as_str().to_string()));
                    }
                    walk(world, child, out);
                }
            }
        }

        let mut out = Vec::new();
        walk(&*self.world, self.root, &mut out);
        out
    }

    fn find(&self, name: &str) -> Option<Entity> {
        self.bones()
            .into_iter()
            .find(|(_, n)| n == name)
            .map(|(e, _)| e)
    }
}

impl RigHost for WorldRig<'_> {
    fn status(&self) -> RigStatus {
        if self.world.get_entity(self.root).is_none() {
            RigStatus::NoActiveRig
        } else if self.world.get::<VizijRigRoot>(self.root).is_none() {
            let kind = self
                .world
                .get::<Name>(self.root)
                .map(|n| n.as_str().to_string())
                .unwrap_or_else(|| format!("{:?}", self.root));
            RigStatus::NotARig { kind }
        } else {
            RigStatus::Ready
        }
    }

    fn bone_names(&self) -> Vec<String> {
        self.bones().into_iter().map(|(_, n)| n).collect()
    }

    fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    fn children(&self, name: &str) -> Option<Vec<String>> {
        let e = self.find(name)?;
        let names: Vec<String> = self
            .world
            .get::<Children>(e)
            .map(|children| {
                children
                    .iter()
                    .filter_map(|&c| self.world.get::<Name>(c))
                    .map(|n| n.as_str().to_string())
                    .collect()
            })
            .unwrap_or_default();
        Some(names)
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), HostError> {
        let e = self
            .find(from)
            .ok_or_else(|| HostError::MissingBone(from.to_string()))?;
        if from == to {
            return Ok(());
        }
        if self.find(to).is_some() {
            return Err(HostError::NameTaken(to.to_string()));
        }
        self.world.entity_mut(e).insert(Name::new(to.to_string()));
        Ok(())
    }

    /// Children move to the removed bone's parent, at its position.
    fn remove(&mut self, name: &str) -> Result<(), HostError> {
        let e = self
            .find(name)
            .ok_or_else(|| HostError::MissingBone(name.to_string()))?;
        let kids: Vec<Entity> = self
            .world
            .get::<Children>(e)
            .map(|c| c.to_vec())
            .unwrap_or_default();
        // Bones are found by walking down from the root, so each has a parent.
        let parent = self.world.get::<Parent>(e).map(|p| p.get());
        if let Some(parent) = parent.filter(|_| !kids.is_empty()) {
            let slot = self
                .world
                .get::<Children>(parent)
                .and_then(|c| c.iter().position(|&c| c == e))
                .unwrap_or(0);
            self.world.entity_mut(parent).insert_children(slot, &kids);
        }
        self.world.entity_mut(e).despawn_recursive();
        Ok(())
    }

    fn mode(&self) -> RigMode {
        self.world
            .get::<RigEditMode>(self.root)
            .map(|m| m.0)
            .unwrap_or_default()
    }

    fn set_mode(&mut self, mode: RigMode) {
        if let Some(mut root) = self.world.get_entity_mut(self.root) {
            root.insert(RigEditMode(mode));
        }
    }
}

/// Run a retarget pass on the hierarchy under `root`.
pub fn retarget_entity(
    world: &mut World,
    root: Entity,
    config: &RetargetConfig,
) -> Result<RetargetReport, RetargetError> {
    let mut rig = WorldRig::new(world, root);
    retarget(&mut rig, config)
}

/// Spawn a [`MemoryRig`] as an entity hierarchy and return the marked root.
pub fn spawn_rig(world: &mut World, rig: &MemoryRig) -> Entity {
    let root = world
        .spawn((Name::new(rig.name().to_string()), VizijRigRoot))
        .id();
    let mut entities: HashMap<&str, Entity> = HashMap::new();
    for bone in rig.bones() {
        let e = world.spawn(Name::new(bone.name.clone())).id();
        entities.insert(bone.name.as_str(), e);
    }
    for bone in rig.bones() {
        let parent = bone
            .parent
            .as_deref()
            .and_then(|p| entities.get(p).copied())
            .unwrap_or(root);
        let e = entities[bone.name.as_str()];
        world.entity_mut(e).set_parent(parent);
    }
    root
}

/// Exclusive system: drain pending [`RetargetRequest`]s and record outcomes in
/// [`RetargetReports`].
pub fn process_retarget_requests(world: &mut World) {
    let requests: Vec<RetargetRequest> = match world.get_resource_mut::<Events<RetargetRequest>>()
    {
        Some(mut events) => events.drain().collect(),
        None => return,
    };
    if requests.is_empty() {
        return;
    }

    for request in requests {
        let result = retarget_entity(world, request.root, &request.config);
        if let Err(err) = &result {
            warn!("retarget request for {:?} failed: {err}", request.root);
        }
        world
            .get_resource_or_insert_with(RetargetReports::default)
            .entries
            .push(RetargetOutcome {
                root: request.root,
                result,
            });
    }
}
