//! Bevy integration for the Vizij rig renamer.
//!
//! A rig is any entity tagged with [`VizijRigRoot`]; every `Name`d descendant
//! is treated as a bone. Send a [`RetargetRequest`] and the plugin renames
//! the hierarchy in place during `Update`, recording the outcome in
//! [`RetargetReports`].

use bevy::prelude::*;

mod components;
mod resources;
mod systems;

pub use components::{RigEditMode, VizijRigRoot};
pub use resources::{RetargetOutcome, RetargetReports, RetargetRequest};
pub use systems::{process_retarget_requests, retarget_entity, spawn_rig, WorldRig};

pub struct VizijRigPlugin;

impl Plugin for VizijRigPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RetargetRequest>()
            .init_resource::<RetargetReports>()
            .add_systems(Update, process_retarget_requests);
    }
}
