use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    rigs: HashMap<String, RigEntry>,
    #[serde(default)]
    configs: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RigEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        convention: Option<String>,
    },
}

impl RigEntry {
    fn as_path(&self) -> &str {
        match self {
            RigEntry::Path(path) => path,
            RigEntry::Detailed { path, .. } => path,
        }
    }

    fn convention(&self) -> Option<&str> {
        match self {
            RigEntry::Path(_) => None,
            RigEntry::Detailed { convention, .. } => convention.as_deref(),
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
    let text = read_to_string(rel)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod rigs {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.rigs.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.rigs, "rig", name)?;
        read_to_string(entry.as_path())
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let entry = lookup(&MANIFEST.rigs, "rig", name)?;
        super::load_json(entry.as_path())
    }

    /// Convention the rig is expected to classify as (snake_case), if recorded.
    pub fn expected_convention(name: &str) -> Result<Option<String>> {
        let entry = lookup(&MANIFEST.rigs, "rig", name)?;
        Ok(entry.convention().map(str::to_string))
    }
}

pub mod configs {
    use super::*;

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let rel = lookup(&MANIFEST.configs, "config", name)?;
        super::load_json(rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_manifest_rig_is_readable_json() {
        for key in rigs::keys() {
            let value: serde_json::Value =
                rigs::load(&key).unwrap_or_else(|e| panic!("{key}: {e:#}"));
            assert!(value.get("bones").is_some(), "{key} has no bones");
        }
    }

    #[test]
    fn unknown_rig_is_an_error() {
        assert!(rigs::json("does-not-exist").is_err());
    }

    #[test]
    fn configs_load_as_json_objects() {
        let value: serde_json::Value = configs::load("keep-unmapped").unwrap();
        assert!(value.is_object());
        assert!(configs::load::<serde_json::Value>("does-not-exist").is_err());
    }
}
