//! Source naming conventions and the classifier that picks one for a rig.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tables::MOTION_CAPTURE_PREFIX;

/// Naming scheme a rig was authored with. Decided once per pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConventionKind {
    /// Humanoid avatar standard (`hips`, `upper_arm.L`, `thumb_proximal.L`, ...).
    /// Also used for rigs nothing else recognizes.
    AvatarStandard,
    /// Auto-rigging tool output (`spine.001`, `forearm.L`, `f_index.01.L`, ...).
    AutoRig,
    /// Motion-capture service output (`mixamorig:LeftForeArm`, ...).
    MotionCapture,
    /// No table; only the normalizer runs. Selected through configuration.
    Generic,
}

impl ConventionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConventionKind::AvatarStandard => "avatar_standard",
            ConventionKind::AutoRig => "auto_rig",
            ConventionKind::MotionCapture => "motion_capture",
            ConventionKind::Generic => "generic",
        }
    }
}

impl fmt::Display for ConventionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const AUTO_RIG_LIMB_BONES: [&str; 4] = ["forearm.L", "forearm.R", "shin.L", "shin.R"];

fn is_auto_rig_indicator(name: &str) -> bool {
    name.starts_with("spine.")
        || name.starts_with("palm.")
        || name.starts_with("f_")
        || AUTO_RIG_LIMB_BONES.contains(&name)
}

/// Classify a rig from the full set of its bone names.
///
/// Precedence: the motion-capture namespace prefix wins over everything, then any
/// auto-rig structural indicator, and everything else is treated as the avatar
/// standard. Never returns [`ConventionKind::Generic`].
pub fn classify<I, S>(names: I) -> ConventionKind
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut auto_rig = false;
    for name in names {
        let name = name.as_ref();
        if name.starts_with(MOTION_CAPTURE_PREFIX) {
            return ConventionKind::MotionCapture;
        }
        auto_rig |= is_auto_rig_indicator(name);
    }
    if auto_rig {
        ConventionKind::AutoRig
    } else {
        ConventionKind::AvatarStandard
    }
}
