use bevy::prelude::*;
use vizij_rig_core::{RetargetConfig, RetargetError, RetargetReport};

/// Ask for a retarget pass on the hierarchy under `root`.
#[derive(Event, Debug, Clone)]
pub struct RetargetRequest {
    pub root: Entity,
    pub config: RetargetConfig,
}

impl RetargetRequest {
    pub fn new(root: Entity) -> Self {
        Self {
            root,
            config: RetargetConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RetargetConfig) -> Self {
        self.config = config;
        self
    }
}

/// Result of one processed [`RetargetRequest`].
#[derive(Debug, Clone)]
pub struct RetargetOutcome {
    pub root: Entity,
    pub result: Result<RetargetReport, RetargetError>,
}

/// Outcomes of processed requests, oldest first. Consumers drain it as needed.
#[derive(Resource, Debug, Default)]
pub struct RetargetReports {
    pub entries: Vec<RetargetOutcome>,
}

impl RetargetReports {
    /// Most recent outcome for `root`, if any.
    pub fn latest(&self, root: Entity) -> Option<&RetargetOutcome> {
        self.entries.iter().rev().find(|o| o.root == root)
    }
}
