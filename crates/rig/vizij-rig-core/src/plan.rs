//! Partitioned work of a retarget pass and its application.
//!
//! Buckets are applied in a fixed order: mapped renames, normalizer renames,
//! then deletions. Every operation re-checks the rig right before it runs,
//! since earlier operations in the same batch may already have changed it.

use hashbrown::HashSet;

use crate::config::RetargetConfig;
use crate::convention::ConventionKind;
use crate::diagnostics::{Diagnostic, DiagnosticKind, RetargetReport};
use crate::host::RigHost;
use crate::normalize::normalize_bone_name;
use crate::resolve::NameMap;
use crate::tables;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedRename {
    pub from: String,
    pub to: String,
}

impl PlannedRename {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Result of classification, mapping and partitioning. Building it never
/// mutates the rig, so it doubles as a dry run.
#[derive(Clone, Debug)]
pub struct RetargetPlan {
    pub convention: ConventionKind,
    pub mapping: NameMap,
    pub renames: Vec<PlannedRename>,
    pub normalizations: Vec<PlannedRename>,
    pub deletions: Vec<String>,
    report: RetargetReport,
}

impl RetargetPlan {
    /// Partition the rig's bones into rename / delete / normalize buckets.
    /// `names` is the rig's bone list in rig order.
    pub(crate) fn partition<H: RigHost + ?Sized>(
        host: &H,
        names: &[String],
        mapping: NameMap,
        cfg: &RetargetConfig,
        mut report: RetargetReport,
    ) -> Self {
        let convention = report.convention;
        let existing: HashSet<&str> = names.iter().map(String::as_str).collect();

        let mut renames = Vec::new();
        for (from, to) in &mapping {
            if !existing.contains(from.as_str()) {
                report.push(Diagnostic::pair(
                    DiagnosticKind::MissingSource,
                    from,
                    to,
                    format!("{convention} bone not present, skipped"),
                ));
            } else if from == to {
                report.push(Diagnostic::pair(
                    DiagnosticKind::AlreadyNamed,
                    from,
                    to,
                    "already uses the target name",
                ));
            } else {
                renames.push(PlannedRename::new(from, to));
            }
        }

        let mut deletions = Vec::new();
        if convention == ConventionKind::MotionCapture && cfg.delete_motion_capture_ends {
            for name in names {
                let tip = tables::is_motion_capture_fourth_joint(name);
                if tip || (tables::is_terminal_placeholder(name) && host.is_leaf(name)) {
                    deletions.push(name.clone());
                }
            }
        }

        let mut normalizations = Vec::new();
        if cfg.normalize_unmapped {
            let doomed: HashSet<&str> = deletions.iter().map(String::as_str).collect();
            for name in names {
                if mapping.contains_key(name) || doomed.contains(name.as_str()) {
                    continue;
                }
                let normalized = normalize_bone_name(name);
                if normalized == *name {
                    continue;
                }
                if existing.contains(normalized.as_str()) {
                    report.push(Diagnostic::pair(
                        DiagnosticKind::NormalizeCollision,
                        name,
                        &normalized,
                        "normalized name already exists, skipped",
                    ));
                    continue;
                }
                normalizations.push(PlannedRename::new(name.as_str(), normalized));
            }
        }

        Self {
            convention,
            mapping,
            renames,
            normalizations,
            deletions,
            report,
        }
    }

    /// Diagnostics gathered while planning (classification, missing sources,
    /// normalization collisions).
    pub fn report(&self) -> &RetargetReport {
        &self.report
    }

    /// True when applying the plan would not touch the rig.
    pub fn is_empty(&self) -> bool {
        self.renames.is_empty() && self.normalizations.is_empty() && self.deletions.is_empty()
    }

    /// Apply the buckets to `host`. Individual failures are recorded and skipped.
    /// The host should already be in edit mode; see [`crate::retarget`].
    pub fn apply<H: RigHost + ?Sized>(self, host: &mut H) -> RetargetReport {
        let mut report = self.report;
        for rename in &self.renames {
            apply_rename(
                host,
                rename,
                DiagnosticKind::Renamed,
                DiagnosticKind::RenameCollision,
                &mut report,
            );
        }
        for rename in &self.normalizations {
            apply_rename(
                host,
                rename,
                DiagnosticKind::Normalized,
                DiagnosticKind::NormalizeCollision,
                &mut report,
            );
        }
        for name in &self.deletions {
            if !host.contains(name) {
                report.push(Diagnostic::new(
                    DiagnosticKind::DeleteMissing,
                    Some(name),
                    None,
                    "already gone",
                ));
                continue;
            }
            match host.remove(name) {
                Ok(()) => report.push(Diagnostic::new(
                    DiagnosticKind::Deleted,
                    Some(name),
                    None,
                    "motion-capture end bone removed",
                )),
                Err(err) => report.push(Diagnostic::new(
                    DiagnosticKind::HostRejected,
                    Some(name),
                    None,
                    err.to_string(),
                )),
            }
        }
        report
    }
}

fn apply_rename<H: RigHost + ?Sized>(
    host: &mut H,
    rename: &PlannedRename,
    done: DiagnosticKind,
    collision: DiagnosticKind,
    report: &mut RetargetReport,
) {
    let PlannedRename { from, to } = rename;
    if !host.contains(from) {
        report.push(Diagnostic::pair(
            DiagnosticKind::MissingSource,
            from,
            to,
            "bone changed earlier in the pass, skipped",
        ));
        return;
    }
    if host.contains(to) {
        report.push(Diagnostic::pair(
            collision,
            from,
            to,
            "target name already exists, skipped",
        ));
        return;
    }
    match host.rename(from, to) {
        Ok(()) => report.push(Diagnostic::pair(done, from, to, "renamed")),
        Err(err) => report.push(Diagnostic::pair(
            DiagnosticKind::HostRejected,
            from,
            to,
            err.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRig;
    use crate::resolve::build_name_map;

    fn plan_for(rig: &MemoryRig, convention: ConventionKind) -> RetargetPlan {
        let cfg = RetargetConfig::default();
        let names = rig.bone_names();
        let existing = names.iter().cloned().collect();
        let mapping = build_name_map(convention, &existing, &cfg);
        RetargetPlan::partition(rig, &names, mapping, &cfg, RetargetReport::new(convention))
    }

    #[test]
    fn terminal_bones_with_children_are_kept() {
        let rig = MemoryRig::new("m")
            .with_bone("mixamorig:Head", None)
            .and_then(|r| r.with_bone("mixamorig:HeadTop_End", Some("mixamorig:Head")))
            .and_then(|r| r.with_bone("mixamorig:LeftEnd", None))
            .and_then(|r| r.with_bone("Ornament", Some("mixamorig:LeftEnd")))
            .unwrap();
        let plan = plan_for(&rig, ConventionKind::MotionCapture);
        assert_eq!(plan.deletions, vec!["mixamorig:HeadTop_End".to_string()]);
    }

    #[test]
    fn deletion_candidates_are_not_normalized() {
        let rig = MemoryRig::from_names(["mixamorig:Hips", "mixamorig:LeftHandIndex4"]);
        let plan = plan_for(&rig, ConventionKind::MotionCapture);
        assert_eq!(plan.deletions, vec!["mixamorig:LeftHandIndex4".to_string()]);
        assert!(plan.normalizations.is_empty());
    }

    #[test]
    fn other_conventions_never_delete() {
        let rig = MemoryRig::from_names(["hips", "HeadTop_End", "mixamo_LeftHandThumb4"]);
        let plan = plan_for(&rig, ConventionKind::AvatarStandard);
        assert!(plan.deletions.is_empty());
    }

    #[test]
    fn identity_entries_are_not_scheduled() {
        let rig = MemoryRig::from_names(["head", "neck"]);
        let plan = plan_for(&rig, ConventionKind::AvatarStandard);
        assert_eq!(plan.renames, vec![PlannedRename::new("neck", "neck_01")]);
        assert_eq!(plan.report().count(DiagnosticKind::AlreadyNamed), 1);
    }

    #[test]
    fn normalizer_collision_is_reported_at_plan_time() {
        let rig = MemoryRig::from_names(["Prop.002", "prop_2"]);
        let plan = plan_for(&rig, ConventionKind::AvatarStandard);
        assert!(plan.normalizations.is_empty());
        assert_eq!(plan.report().count(DiagnosticKind::NormalizeCollision), 1);
    }

    #[test]
    fn names_taken_earlier_in_the_pass_are_skipped_at_apply_time() {
        let mut rig = MemoryRig::from_names(["Prop.2", "Prop.002", "spine", "Spine_01"]);
        let plan = plan_for(&rig, ConventionKind::AvatarStandard);
        assert_eq!(plan.report().count(DiagnosticKind::NormalizeCollision), 0);
        assert_eq!(plan.normalizations.len(), 3);

        let report = plan.apply(&mut rig);
        let collisions: Vec<_> = report
            .of_kind(DiagnosticKind::NormalizeCollision)
            .map(|d| (d.source.as_deref(), d.target.as_deref()))
            .collect();
        assert_eq!(
            collisions,
            vec![
                (Some("Prop.002"), Some("prop_2")),
                (Some("Spine_01"), Some("spine_01")),
            ]
        );
        assert_eq!(
            rig.bone_names(),
            vec!["prop_2", "Prop.002", "spine_01", "Spine_01"]
        );
    }

    #[test]
    fn planning_leaves_the_rig_alone() {
        let rig = MemoryRig::from_names(["hips", "spine", "Prop.002"]);
        let before = rig.clone();
        let plan = plan_for(&rig, ConventionKind::AvatarStandard);
        assert!(!plan.is_empty());
        assert_eq!(rig, before);
    }
}
