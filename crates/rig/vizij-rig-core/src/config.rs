//! Retarget pass configuration.

use serde::{Deserialize, Serialize};

use crate::convention::ConventionKind;

/// Options for a single retarget pass.
/// Every field has a default, so partial JSON documents are accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetConfig {
    /// Skip classification and use this convention. `Generic` disables the
    /// mapping tables and only normalizes.
    pub convention: Option<ConventionKind>,

    /// Run the name normalizer over bones the mapping does not cover.
    pub normalize_unmapped: bool,

    /// Delete motion-capture fourth finger joints and `End` leaf placeholders.
    pub delete_motion_capture_ends: bool,

    /// Upper bound for the `spine.NNN` scan on auto-rig skeletons.
    pub max_auto_rig_spine_segments: u32,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            convention: None,
            normalize_unmapped: true,
            delete_motion_capture_ends: true,
            max_auto_rig_spine_segments: 9,
        }
    }
}

impl RetargetConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_convention(mut self, convention: ConventionKind) -> Self {
        self.convention = Some(convention);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = RetargetConfig::from_json(r#"{ "normalize_unmapped": false }"#).unwrap();
        assert!(!cfg.normalize_unmapped);
        assert!(cfg.delete_motion_capture_ends);
        assert_eq!(cfg.max_auto_rig_spine_segments, 9);
        assert_eq!(cfg.convention, None);
    }

    #[test]
    fn convention_override_parses_snake_case() {
        let cfg = RetargetConfig::from_json(r#"{ "convention": "auto_rig" }"#).unwrap();
        assert_eq!(cfg.convention, Some(ConventionKind::AutoRig));
    }
}
