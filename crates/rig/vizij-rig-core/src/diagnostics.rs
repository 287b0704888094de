//! Structured per-item outcomes of a retarget pass.
//!
//! Every record is also forwarded to the `log` facade as it is pushed, so hosts
//! that install a logger get the same trail without reading the report.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::convention::ConventionKind;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Convention chosen for the pass.
    Classified,
    /// Mapping source not present in the rig (or gone by apply time).
    MissingSource,
    /// Mapping source already carries its target name.
    AlreadyNamed,
    Renamed,
    /// Mapped rename skipped because the target name exists.
    RenameCollision,
    Normalized,
    /// Normalized rename skipped because the target name exists.
    NormalizeCollision,
    Deleted,
    /// Scheduled deletion whose bone no longer exists.
    DeleteMissing,
    /// Host refused a single rename or removal.
    HostRejected,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Info,
    Warning,
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::MissingSource
            | DiagnosticKind::AlreadyNamed
            | DiagnosticKind::DeleteMissing => Severity::Debug,
            DiagnosticKind::Classified
            | DiagnosticKind::Renamed
            | DiagnosticKind::Normalized
            | DiagnosticKind::Deleted => Severity::Info,
            DiagnosticKind::RenameCollision
            | DiagnosticKind::NormalizeCollision
            | DiagnosticKind::HostRejected => Severity::Warning,
        }
    }

    fn log_level(&self) -> log::Level {
        match self.severity() {
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub reason: String,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        source: Option<&str>,
        target: Option<&str>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            source: source.map(str::to_string),
            target: target.map(str::to_string),
            reason: reason.into(),
        }
    }

    /// Diagnostic about a `source -> target` pair.
    pub fn pair(kind: DiagnosticKind, source: &str, target: &str, reason: impl Into<String>) -> Self {
        Self::new(kind, Some(source), Some(target), reason)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        match (&self.source, &self.target) {
            (Some(s), Some(t)) => write!(f, " '{s}' -> '{t}'")?,
            (Some(s), None) => write!(f, " '{s}'")?,
            (None, Some(t)) => write!(f, " -> '{t}'")?,
            (None, None) => {}
        }
        write!(f, ": {}", self.reason)
    }
}

/// Outcome of one pass: the convention used and the ordered diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetargetReport {
    pub convention: ConventionKind,
    pub diagnostics: Vec<Diagnostic>,
}

impl RetargetReport {
    pub fn new(convention: ConventionKind) -> Self {
        Self {
            convention,
            diagnostics: Vec::new(),
        }
    }

    /// Record a diagnostic and mirror it to the log.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::log!(target: "vizij_rig", diagnostic.kind.log_level(), "{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.of_kind(kind).count()
    }

    /// `(from, to)` pairs actually applied, mapped renames first.
    pub fn renames(&self) -> Vec<(&str, &str)> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.kind, DiagnosticKind::Renamed | DiagnosticKind::Normalized))
            .filter_map(|d| Some((d.source.as_deref()?, d.target.as_deref()?)))
            .collect()
    }

    pub fn deleted(&self) -> Vec<&str> {
        self.of_kind(DiagnosticKind::Deleted)
            .filter_map(|d| d.source.as_deref())
            .collect()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind.severity() == Severity::Warning)
    }

    /// True when the pass changed the rig.
    pub fn changed_rig(&self) -> bool {
        self.diagnostics.iter().any(|d| {
            matches!(
                d.kind,
                DiagnosticKind::Renamed | DiagnosticKind::Normalized | DiagnosticKind::Deleted
            )
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_pair_and_reason() {
        let d = Diagnostic::pair(
            DiagnosticKind::RenameCollision,
            "spine",
            "spine_01",
            "target already exists",
        );
        assert_eq!(
            d.to_string(),
            "RenameCollision 'spine' -> 'spine_01': target already exists"
        );
    }

    #[test]
    fn report_filters_and_serializes() {
        let mut report = RetargetReport::new(ConventionKind::AutoRig);
        report.push(Diagnostic::new(
            DiagnosticKind::Classified,
            None,
            None,
            "detected auto_rig",
        ));
        report.push(Diagnostic::pair(DiagnosticKind::Renamed, "shin.L", "calf_l", "mapped"));
        report.push(Diagnostic::new(
            DiagnosticKind::Deleted,
            Some("HeadTop_End"),
            None,
            "terminal placeholder",
        ));
        assert_eq!(report.renames(), vec![("shin.L", "calf_l")]);
        assert_eq!(report.deleted(), vec!["HeadTop_End"]);
        assert_eq!(report.warnings().count(), 0);
        assert!(report.changed_rig());

        let json = report.to_json().unwrap();
        assert!(json.contains("\"convention\": \"auto_rig\""));
        let back: RetargetReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn collisions_are_warnings() {
        assert_eq!(
            DiagnosticKind::NormalizeCollision.severity(),
            Severity::Warning
        );
        assert_eq!(DiagnosticKind::MissingSource.severity(), Severity::Debug);
    }
}
