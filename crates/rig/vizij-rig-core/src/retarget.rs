//! Retarget pass entry points.
//!
//! Idle -> Classified -> MappingBuilt -> Partitioned -> Applied, once per call.
//! Nothing is retried and nothing persists between calls.

use hashbrown::HashSet;

use crate::config::RetargetConfig;
use crate::convention::classify;
use crate::diagnostics::{Diagnostic, DiagnosticKind, RetargetReport};
use crate::error::RetargetError;
use crate::host::{EditModeGuard, RigHost};
use crate::plan::RetargetPlan;
use crate::resolve::build_name_map;

fn check_ready<H: RigHost + ?Sized>(host: &H) -> Result<(), RetargetError> {
    host.status().into_result().map_err(|err| {
        log::error!(target: "vizij_rig", "retarget aborted: {err}");
        err
    })
}

fn build_plan<H: RigHost + ?Sized>(host: &H, cfg: &RetargetConfig) -> RetargetPlan {
    let names = host.bone_names();
    let (convention, origin) = match cfg.convention {
        Some(kind) => (kind, "configured"),
        None => (classify(&names), "detected"),
    };
    let mut report = RetargetReport::new(convention);
    report.push(Diagnostic::new(
        DiagnosticKind::Classified,
        None,
        None,
        format!("{origin} {convention} rig with {} bones", names.len()),
    ));

    let existing: HashSet<String> = names.iter().cloned().collect();
    let mapping = build_name_map(convention, &existing, cfg);
    RetargetPlan::partition(host, &names, mapping, cfg, report)
}

/// Classify, map and partition without touching the rig.
pub fn plan<H: RigHost + ?Sized>(
    host: &H,
    cfg: &RetargetConfig,
) -> Result<RetargetPlan, RetargetError> {
    check_ready(host)?;
    Ok(build_plan(host, cfg))
}

/// Run a full pass on `host`.
///
/// Fails only when the host has no usable rig; in that case nothing is touched.
/// Otherwise the rig is put in edit mode for the duration of the pass and its
/// previous mode is restored afterwards, and every per-bone outcome is in the
/// returned report.
pub fn retarget<H: RigHost + ?Sized>(
    host: &mut H,
    cfg: &RetargetConfig,
) -> Result<RetargetReport, RetargetError> {
    check_ready(host)?;
    let mut guard = EditModeGuard::enter(host);
    let plan = build_plan(&*guard, cfg);
    Ok(plan.apply(&mut *guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convention::ConventionKind;
    use crate::error::HostError;
    use crate::host::{RigMode, RigStatus};
    use crate::memory::MemoryRig;

    struct NothingSelected {
        mode: RigMode,
        touched: bool,
    }

    impl RigHost for NothingSelected {
        fn status(&self) -> RigStatus {
            RigStatus::NoActiveRig
        }
        fn bone_names(&self) -> Vec<String> {
            Vec::new()
        }
        fn children(&self, _name: &str) -> Option<Vec<String>> {
            None
        }
        fn rename(&mut self, _from: &str, _to: &str) -> Result<(), HostError> {
            self.touched = true;
            Ok(())
        }
        fn remove(&mut self, _name: &str) -> Result<(), HostError> {
            self.touched = true;
            Ok(())
        }
        fn mode(&self) -> RigMode {
            self.mode
        }
        fn set_mode(&mut self, mode: RigMode) {
            self.touched = true;
            self.mode = mode;
        }
    }

    /// Rejects every rename of one particular bone.
    struct Stubborn {
        rig: MemoryRig,
        locked: &'static str,
    }

    impl RigHost for Stubborn {
        fn bone_names(&self) -> Vec<String> {
            self.rig.bone_names()
        }
        fn contains(&self, name: &str) -> bool {
            self.rig.contains(name)
        }
        fn children(&self, name: &str) -> Option<Vec<String>> {
            self.rig.children(name)
        }
        fn rename(&mut self, from: &str, to: &str) -> Result<(), HostError> {
            if from == self.locked {
                return Err(HostError::Rejected(format!("'{from}' is locked")));
            }
            self.rig.rename(from, to)
        }
        fn remove(&mut self, name: &str) -> Result<(), HostError> {
            self.rig.remove(name)
        }
        fn mode(&self) -> RigMode {
            self.rig.mode()
        }
        fn set_mode(&mut self, mode: RigMode) {
            self.rig.set_mode(mode)
        }
    }

    #[test]
    fn missing_rig_is_fatal_and_untouched() {
        let mut host = NothingSelected {
            mode: RigMode::Object,
            touched: false,
        };
        let err = retarget(&mut host, &RetargetConfig::default()).unwrap_err();
        assert_eq!(err, RetargetError::NoActiveRig);
        assert!(!host.touched);
        assert!(plan(&host, &RetargetConfig::default()).is_err());
    }

    #[test]
    fn host_rejection_is_local_and_mode_is_restored() {
        let mut host = Stubborn {
            rig: MemoryRig::from_names(["hips", "spine", "neck"]),
            locked: "spine",
        };
        let report = retarget(&mut host, &RetargetConfig::default()).unwrap();
        assert_eq!(report.count(DiagnosticKind::HostRejected), 1);
        assert!(host.rig.contains("pelvis"));
        assert!(host.rig.contains("neck_01"));
        assert!(host.rig.contains("spine"));
        assert_eq!(host.rig.mode(), RigMode::Object);
    }

    #[test]
    fn configured_convention_skips_classification() {
        let mut rig = MemoryRig::from_names(["mixamorig:Hips", "Prop.002"]);
        let cfg = RetargetConfig::default().with_convention(ConventionKind::Generic);
        let report = retarget(&mut rig, &cfg).unwrap();
        assert_eq!(report.convention, ConventionKind::Generic);
        assert!(rig.contains("mixamorig:hips"));
        assert!(rig.contains("prop_2"));
    }

    #[test]
    fn dry_run_reports_classification_first() {
        let rig = MemoryRig::from_names(["spine", "spine.001"]);
        let plan = plan(&rig, &RetargetConfig::default()).unwrap();
        assert_eq!(plan.convention, ConventionKind::AutoRig);
        let first = &plan.report().diagnostics[0];
        assert_eq!(first.kind, DiagnosticKind::Classified);
        assert!(first.reason.starts_with("detected auto_rig"));
        assert_eq!(rig.mode(), RigMode::Object);
    }
}
