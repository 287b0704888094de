//! Capability trait for the application that owns the rig.
//!
//! Adapters (Bevy, editors, [`crate::MemoryRig`]) implement [`RigHost`]; the
//! retarget pass only ever reads names/children and issues rename/remove calls.

use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

use crate::error::{HostError, RetargetError};

/// Structural state of the rig. Renames and removals need [`RigMode::Edit`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RigMode {
    #[default]
    Object,
    Edit,
}

/// Whether the host currently exposes a rig to operate on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RigStatus {
    Ready,
    NoActiveRig,
    NotARig { kind: String },
}

impl RigStatus {
    pub fn into_result(self) -> Result<(), RetargetError> {
        match self {
            RigStatus::Ready => Ok(()),
            RigStatus::NoActiveRig => Err(RetargetError::NoActiveRig),
            RigStatus::NotARig { kind } => Err(RetargetError::NotARig { kind }),
        }
    }
}

pub trait RigHost {
    fn status(&self) -> RigStatus {
        RigStatus::Ready
    }

    /// All bone names in rig order.
    fn bone_names(&self) -> Vec<String>;

    fn contains(&self, name: &str) -> bool {
        self.bone_names().iter().any(|n| n == name)
    }

    /// Child bone names, or `None` when `name` is not a bone of the rig.
    fn children(&self, name: &str) -> Option<Vec<String>>;

    fn is_leaf(&self, name: &str) -> bool {
        self.children(name).is_some_and(|c| c.is_empty())
    }

    /// Rename a bone. Must fail with [`HostError::NameTaken`] rather than
    /// replace an existing bone.
    fn rename(&mut self, from: &str, to: &str) -> Result<(), HostError>;

    /// Remove a bone, detaching it from its parent.
    fn remove(&mut self, name: &str) -> Result<(), HostError>;

    fn mode(&self) -> RigMode;
    fn set_mode(&mut self, mode: RigMode);
}

/// Holds the host in [`RigMode::Edit`] and puts the previous mode back when
/// dropped, including on early return or unwinding.
pub struct EditModeGuard<'a, H: RigHost + ?Sized> {
    host: &'a mut H,
    prior: RigMode,
}

impl<'a, H: RigHost + ?Sized> EditModeGuard<'a, H> {
    pub fn enter(host: &'a mut H) -> Self {
        let prior = host.mode();
        if prior != RigMode::Edit {
            host.set_mode(RigMode::Edit);
        }
        Self { host, prior }
    }

    /// Mode that will be restored on drop.
    pub fn prior(&self) -> RigMode {
        self.prior
    }
}

impl<H: RigHost + ?Sized> Deref for EditModeGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        &*self.host
    }
}

impl<H: RigHost + ?Sized> DerefMut for EditModeGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        &mut *self.host
    }
}

impl<H: RigHost + ?Sized> Drop for EditModeGuard<'_, H> {
    fn drop(&mut self) {
        if self.host.mode() != self.prior {
            self.host.set_mode(self.prior);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRig;

    #[test]
    fn guard_enters_edit_and_restores_object_mode() {
        let mut rig = MemoryRig::from_names(["root"]);
        assert_eq!(rig.mode(), RigMode::Object);
        {
            let guard = EditModeGuard::enter(&mut rig);
            assert_eq!(guard.mode(), RigMode::Edit);
            assert_eq!(guard.prior(), RigMode::Object);
        }
        assert_eq!(rig.mode(), RigMode::Object);
    }

    #[test]
    fn guard_keeps_edit_mode_when_already_editing() {
        let mut rig = MemoryRig::from_names(["root"]);
        rig.set_mode(RigMode::Edit);
        {
            let _guard = EditModeGuard::enter(&mut rig);
        }
        assert_eq!(rig.mode(), RigMode::Edit);
    }

    #[test]
    fn guard_restores_mode_on_unwind() {
        let mut rig = MemoryRig::from_names(["root"]);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = EditModeGuard::enter(&mut rig);
            panic!("host failure mid-pass");
        }));
        assert!(result.is_err());
        assert_eq!(rig.mode(), RigMode::Object);
    }

    #[test]
    fn status_maps_to_errors() {
        assert!(RigStatus::Ready.into_result().is_ok());
        assert_eq!(
            RigStatus::NoActiveRig.into_result(),
            Err(RetargetError::NoActiveRig)
        );
        assert_eq!(
            RigStatus::NotARig {
                kind: "mesh".into()
            }
            .into_result(),
            Err(RetargetError::NotARig {
                kind: "mesh".into()
            })
        );
    }
}
