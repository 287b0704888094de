//! Vizij Rig Core (engine-agnostic)
//!
//! Renames skeleton bones to the engine naming convention (`pelvis`, `spine_01`,
//! `upperarm_l`, `thumb_01_l`, ...). A pass classifies the rig as one of the known
//! source conventions, builds a name map from static tables plus per-rig resolvers,
//! normalizes whatever is left over and applies the result through a [`RigHost`].
//!
//! Hosts (Bevy, editors, the in-memory [`MemoryRig`]) only need to implement the
//! small [`RigHost`] capability trait.

pub mod config;
pub mod convention;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod memory;
pub mod normalize;
pub mod plan;
pub mod resolve;
pub mod retarget;
pub mod tables;

// Re-exports for consumers (adapters)
pub use config::RetargetConfig;
pub use convention::{classify, ConventionKind};
pub use diagnostics::{Diagnostic, DiagnosticKind, RetargetReport, Severity};
pub use error::{HostError, RetargetError, RigError};
pub use host::{EditModeGuard, RigHost, RigMode, RigStatus};
pub use memory::{BoneRecord, MemoryRig};
pub use normalize::normalize_bone_name;
pub use plan::{PlannedRename, RetargetPlan};
pub use resolve::{build_name_map, NameMap};
pub use retarget::{plan, retarget};
