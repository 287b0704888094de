//! Static bone name tables for the known source conventions.
//!
//! Tables store side-independent stems; the left/right marker of each source
//! convention is applied when the entries are expanded. Finger chains are
//! generated per pass from the finger alias lists.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::convention::ConventionKind;

/// Namespace prefix emitted by the motion-capture service.
pub const MOTION_CAPTURE_PREFIX: &str = "mixamorig:";

/// Suffix of the placeholder leaf bones the motion-capture service emits
/// (`HeadTop_End`, `LeftHandThumb4_End`, ...).
pub const TERMINAL_SUFFIX: &str = "End";

/// Number of finger joints that receive a target name.
pub const FINGER_JOINTS: u32 = 3;

/// Target finger names, thumb first.
pub const TARGET_FINGERS: [&str; 5] = ["thumb", "index", "middle", "ring", "pinky"];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Target-convention suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            Side::Left => "_l",
            Side::Right => "_r",
        }
    }

    /// `.L` / `.R` marker used by the avatar standard and the auto-rig tool.
    pub fn dot_marker(self) -> &'static str {
        match self {
            Side::Left => ".L",
            Side::Right => ".R",
        }
    }

    /// `Left` / `Right` word prefix used by the motion-capture service.
    pub fn word(self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

const AVATAR_CENTER: &[(&str, &str)] = &[
    ("hips", "pelvis"),
    ("spine", "spine_01"),
    ("neck", "neck_01"),
    ("head", "head"),
];

const AVATAR_SIDED: &[(&str, &str)] = &[
    ("shoulder", "clavicle"),
    ("upper_arm", "upperarm"),
    ("lower_arm", "lowerarm"),
    ("hand", "hand"),
    ("upper_leg", "thigh"),
    ("lower_leg", "calf"),
    ("foot", "foot"),
    ("toes", "ball"),
];

const AVATAR_FINGERS: [&str; 5] = ["thumb", "index", "middle", "ring", "little"];
const AVATAR_JOINTS: [&str; FINGER_JOINTS as usize] = ["_proximal", "_intermediate", "_distal"];

const AUTO_RIG_CENTER: &[(&str, &str)] = &[
    ("spine", "spine_01"),
    ("neck", "neck_01"),
    ("head", "head"),
];

const AUTO_RIG_SIDED: &[(&str, &str)] = &[
    ("pelvis", "pelvis"),
    ("shoulder", "clavicle"),
    ("upper_arm", "upperarm"),
    ("forearm", "lowerarm"),
    ("hand", "hand"),
    ("thigh", "thigh"),
    ("shin", "calf"),
    ("foot", "foot"),
    ("toe", "ball"),
    ("palm.01", "index_metacarpal"),
    ("palm.02", "middle_metacarpal"),
    ("palm.03", "ring_metacarpal"),
    ("palm.04", "pinky_metacarpal"),
];

const AUTO_RIG_FINGERS: [&str; 5] = ["thumb", "f_index", "f_middle", "f_ring", "f_pinky"];

const MOTION_CAPTURE_CENTER: &[(&str, &str)] = &[
    ("Hips", "pelvis"),
    ("Spine", "spine_01"),
    ("Spine1", "spine_02"),
    ("Spine2", "spine_03"),
    ("Neck", "neck_01"),
    ("Head", "head"),
];

const MOTION_CAPTURE_SIDED: &[(&str, &str)] = &[
    ("Shoulder", "clavicle"),
    ("Arm", "upperarm"),
    ("ForeArm", "lowerarm"),
    ("Hand", "hand"),
    ("UpLeg", "thigh"),
    ("Leg", "calf"),
    ("Foot", "foot"),
    ("ToeBase", "ball"),
];

const MOTION_CAPTURE_FINGERS: [&str; 5] = ["Thumb", "Index", "Middle", "Ring", "Pinky"];

static MOTION_CAPTURE_FINGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:mixamorig:)?(?:Left|Right)Hand[A-Za-z]+(\d+)$")
        .expect("motion-capture finger pattern should compile")
});

/// `<finger>_<joint:02>_<side>`, e.g. `pinky_03_r`.
pub fn finger_target(finger: &str, joint: u32, side: Side) -> String {
    format!("{finger}_{joint:02}{}", side.suffix())
}

/// Expand the static table (trunk, limbs, fingers) for a convention, in table
/// order with the left entry before the right one. `Generic` has no table.
pub fn static_entries(kind: ConventionKind) -> Vec<(String, String)> {
    match kind {
        ConventionKind::AvatarStandard => dotted_entries(AVATAR_CENTER, AVATAR_SIDED)
            .chain(avatar_fingers())
            .collect(),
        ConventionKind::AutoRig => dotted_entries(AUTO_RIG_CENTER, AUTO_RIG_SIDED)
            .chain(auto_rig_fingers())
            .collect(),
        ConventionKind::MotionCapture => motion_capture_entries(),
        ConventionKind::Generic => Vec::new(),
    }
}

fn dotted_entries(
    center: &'static [(&'static str, &'static str)],
    sided: &'static [(&'static str, &'static str)],
) -> impl Iterator<Item = (String, String)> {
    let center = center
        .iter()
        .map(|(src, dst)| (src.to_string(), dst.to_string()));
    let sided = sided.iter().flat_map(|(src, dst)| {
        Side::BOTH.into_iter().map(move |side| {
            (
                format!("{src}{}", side.dot_marker()),
                format!("{dst}{}", side.suffix()),
            )
        })
    });
    center.chain(sided)
}

fn avatar_fingers() -> impl Iterator<Item = (String, String)> {
    AVATAR_FINGERS
        .into_iter()
        .zip(TARGET_FINGERS)
        .flat_map(|(finger, target)| {
            (1..=FINGER_JOINTS).flat_map(move |joint| {
                let part = AVATAR_JOINTS[(joint - 1) as usize];
                Side::BOTH.into_iter().map(move |side| {
                    (
                        format!("{finger}{part}{}", side.dot_marker()),
                        finger_target(target, joint, side),
                    )
                })
            })
        })
}

fn auto_rig_fingers() -> impl Iterator<Item = (String, String)> {
    AUTO_RIG_FINGERS
        .into_iter()
        .zip(TARGET_FINGERS)
        .flat_map(|(finger, target)| {
            (1..=FINGER_JOINTS).flat_map(move |joint| {
                Side::BOTH.into_iter().map(move |side| {
                    (
                        format!("{finger}.{joint:02}{}", side.dot_marker()),
                        finger_target(target, joint, side),
                    )
                })
            })
        })
}

/// Motion-capture entries are emitted namespaced and bare, since some exports
/// strip the namespace from part of the skeleton.
fn motion_capture_entries() -> Vec<(String, String)> {
    let center = MOTION_CAPTURE_CENTER
        .iter()
        .map(|(src, dst)| (src.to_string(), dst.to_string()));
    let sided = MOTION_CAPTURE_SIDED.iter().flat_map(|(src, dst)| {
        Side::BOTH.into_iter().map(move |side| {
            (
                format!("{}{src}", side.word()),
                format!("{dst}{}", side.suffix()),
            )
        })
    });
    let fingers = MOTION_CAPTURE_FINGERS
        .into_iter()
        .zip(TARGET_FINGERS)
        .flat_map(|(finger, target)| {
            (1..=FINGER_JOINTS).flat_map(move |joint| {
                Side::BOTH.into_iter().map(move |side| {
                    (
                        format!("{}Hand{finger}{joint}", side.word()),
                        finger_target(target, joint, side),
                    )
                })
            })
        });

    let bare: Vec<(String, String)> = center.chain(sided).chain(fingers).collect();
    let mut entries = Vec::with_capacity(bare.len() * 2);
    for (src, dst) in &bare {
        entries.push((format!("{MOTION_CAPTURE_PREFIX}{src}"), dst.clone()));
    }
    entries.extend(bare);
    entries
}

/// Fourth (tip) finger joint of a motion-capture hand, namespaced or bare.
/// The whole trailing digit run is the joint number, so `Index14` is not a tip.
pub fn is_motion_capture_fourth_joint(name: &str) -> bool {
    MOTION_CAPTURE_FINGER
        .captures(name)
        .and_then(|caps| caps.get(1))
        .is_some_and(|joint| joint.as_str() == "4")
}

/// Name of a motion-capture placeholder leaf. Leaf status is checked by the caller.
pub fn is_terminal_placeholder(name: &str) -> bool {
    name.ends_with(TERMINAL_SUFFIX)
}
