use thiserror::Error;

/// Fatal failures of a retarget invocation. Everything after the precondition
/// check is reported through diagnostics instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetargetError {
    #[error("no active rig selected")]
    NoActiveRig,
    #[error("selected object is not a rig (found '{kind}')")]
    NotARig { kind: String },
}

/// Rejections reported by a [`crate::RigHost`] for a single mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("bone '{0}' does not exist")]
    MissingBone(String),
    #[error("bone name '{0}' is already taken")]
    NameTaken(String),
    #[error("host rejected operation: {0}")]
    Rejected(String),
}

/// Errors produced while building an in-memory rig.
#[derive(Debug, Error)]
pub enum RigError {
    #[error("duplicate bone name '{0}'")]
    DuplicateBone(String),
    #[error("bone '{bone}' references unknown parent '{parent}'")]
    UnknownParent { bone: String, parent: String },
    #[error("bone '{0}' is its own ancestor")]
    Cycle(String),
    #[error("rig json: {0}")]
    Json(#[from] serde_json::Error),
}
