//! Best-effort normalization for bones no table covers (props, twist bones, ...).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static DOT_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(\d+)").expect("dot-digit pattern should compile"));
static UNDERSCORE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_{2,}").expect("underscore pattern should compile"));

/// Bring an ad hoc bone name closer to the engine convention:
/// `.L`/`.R` become `_l`/`_r`, `.NNN` becomes `_N` (zero padding dropped),
/// everything is lowercased and underscore runs collapse to one.
///
/// The output is a fixpoint: normalizing it again returns it unchanged.
pub fn normalize_bone_name(name: &str) -> String {
    let sided = name.replace(".L", "_l").replace(".R", "_r");
    let numbered = DOT_DIGITS.replace_all(&sided, |caps: &Captures| {
        let digits = caps[1].trim_start_matches('0');
        if digits.is_empty() {
            "_0".to_string()
        } else {
            format!("_{digits}")
        }
    });
    let lowered = numbered.to_lowercase();
    UNDERSCORE_RUN.replace_all(&lowered, "_").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_digits_drop_padding() {
        assert_eq!(normalize_bone_name("Prop.002"), "prop_2");
        assert_eq!(normalize_bone_name("Bone.010"), "bone_10");
        assert_eq!(normalize_bone_name("Bone.000"), "bone_0");
    }

    #[test]
    fn side_markers_become_suffixes() {
        assert_eq!(normalize_bone_name("Twist.L"), "twist_l");
        assert_eq!(normalize_bone_name("breast.R.001"), "breast_r_1");
        assert_eq!(normalize_bone_name("ear.L.002"), "ear_l_2");
    }

    #[test]
    fn collapses_underscore_runs() {
        assert_eq!(normalize_bone_name("Hair__Front___01"), "hair_front_01");
        assert_eq!(normalize_bone_name("Skirt_.003"), "skirt_3");
    }

    #[test]
    fn lowercase_without_separators_is_a_fixpoint() {
        for name in ["spine_01", "thumb_02_l", "prop_2", "root"] {
            assert_eq!(normalize_bone_name(name), name);
        }
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        for name in ["Prop.002", "ear.L.002", "Hair__Front", "mixamorig:HeadTop_End"] {
            let once = normalize_bone_name(name);
            assert_eq!(normalize_bone_name(&once), once);
        }
    }
}
