//! Final name map assembly: static table plus per-rig resolvers.

use hashbrown::HashSet;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::RetargetConfig;
use crate::convention::ConventionKind;
use crate::tables;

/// Source bone name -> target bone name, in scheduling order.
pub type NameMap = IndexMap<String, String>;

static SPINE_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^spine_(\d+)").expect("spine segment pattern should compile"));

/// Build the map for `kind` against the names currently in the rig.
/// Resolver entries override static entries with the same source name.
pub fn build_name_map(
    kind: ConventionKind,
    existing: &HashSet<String>,
    cfg: &RetargetConfig,
) -> NameMap {
    let mut map: NameMap = tables::static_entries(kind).into_iter().collect();
    match kind {
        ConventionKind::AvatarStandard => {
            for (src, dst) in resolve_avatar_trunk(&map, existing) {
                map.insert(src, dst);
            }
        }
        ConventionKind::AutoRig => {
            map.extend(resolve_auto_rig_spine(
                existing,
                cfg.max_auto_rig_spine_segments,
            ));
        }
        ConventionKind::MotionCapture | ConventionKind::Generic => {}
    }
    map
}

fn spine_segment(name: &str) -> Option<u32> {
    SPINE_SEGMENT
        .captures(name)
        .and_then(|caps| caps[1].parse().ok())
}

/// Highest `spine_NN` among mapped targets and existing rig names.
/// An existing `spine_00` does not count.
pub fn highest_spine_segment(map: &NameMap, existing: &HashSet<String>) -> Option<u32> {
    let mapped = map.values().filter_map(|name| spine_segment(name));
    let present = existing
        .iter()
        .filter(|name| name.as_str() != "spine_00")
        .filter_map(|name| spine_segment(name));
    mapped.chain(present).max()
}

/// `None` when the highest segment is already `u32::MAX`.
fn next_spine_target(map: &NameMap, existing: &HashSet<String>) -> Option<String> {
    match highest_spine_segment(map, existing) {
        Some(last) => last.checked_add(1).map(|next| format!("spine_{next:02}")),
        None => Some("spine_02".to_string()),
    }
}

/// Optional avatar trunk bones (`chest`, then `upper_chest`) appended after
/// the highest spine segment so the numbered sequence keeps increasing.
/// A bone with no segment left above the highest one is left out of the map.
pub fn resolve_avatar_trunk(map: &NameMap, existing: &HashSet<String>) -> NameMap {
    let mut merged = map.clone();
    let mut resolved = NameMap::new();
    for optional in ["chest", "upper_chest"] {
        if !existing.contains(optional) {
            continue;
        }
        let Some(target) = next_spine_target(&merged, existing) else {
            continue;
        };
        merged.insert(optional.to_string(), target.clone());
        resolved.insert(optional.to_string(), target);
    }
    resolved
}

/// `spine.001`, `spine.002`, ... map to `spine_02`, `spine_03`, ... up to the
/// first missing segment.
pub fn resolve_auto_rig_spine(existing: &HashSet<String>, max_segments: u32) -> NameMap {
    let mut resolved = NameMap::new();
    for i in 1..=max_segments {
        let src = format!("spine.{i:03}");
        if !existing.contains(&src) {
            break;
        }
        let Some(target) = i.checked_add(1) else {
            break;
        };
        resolved.insert(src, format!("spine_{target:02}"));
    }
    resolved
}
