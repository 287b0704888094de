use bevy::prelude::*;
use vizij_rig_core::RigMode;

/// Marker component designating the armature entity whose descendants are bones.
/// The marked entity itself is not a bone; every `Name`d descendant is.
#[derive(Component, Debug, Default)]
pub struct VizijRigRoot;

/// Structural edit state of a rig root. Missing means [`RigMode::Object`].
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RigEditMode(pub RigMode);
