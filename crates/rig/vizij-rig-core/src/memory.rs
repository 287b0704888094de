//! In-memory rig used by tests, fixtures and JSON tooling.
//!
//! JSON shape:
//!   { "name": "armature", "mode": "object",
//!     "bones": [ { "name": "Hips", "parent": null }, { "name": "Spine", "parent": "Hips" } ] }
//! Bones may be listed before their parent; child order follows listing order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{HostError, RigError};
use crate::host::{RigHost, RigMode};

/// One bone of a [`MemoryRig`]. Parent and children are names within the same rig.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoneRecord {
    pub name: String,
    pub parent: Option<String>,
    pub children: Vec<String>,
}

impl BoneRecord {
    fn new(name: impl Into<String>, parent: Option<String>) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct BoneDoc {
    name: String,
    #[serde(default)]
    parent: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct RigDoc {
    #[serde(default)]
    name: String,
    #[serde(default)]
    mode: RigMode,
    bones: Vec<BoneDoc>,
}

/// Insertion-ordered bone hierarchy keyed by unique bone name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RigDoc", into = "RigDoc")]
pub struct MemoryRig {
    name: String,
    mode: RigMode,
    bones: IndexMap<String, BoneRecord>,
}

impl MemoryRig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: RigMode::Object,
            bones: IndexMap::new(),
        }
    }

    /// Flat rig: every bone is a root. Later duplicates are ignored.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rig = Self::new("rig");
        for name in names {
            let name = name.into();
            if !rig.bones.contains_key(&name) {
                rig.bones.insert(name.clone(), BoneRecord::new(name, None));
            }
        }
        rig
    }

    pub fn from_json(text: &str) -> Result<Self, RigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, RigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Append a bone under an existing parent (or as a root).
    pub fn add_bone(&mut self, name: &str, parent: Option<&str>) -> Result<(), RigError> {
        if self.bones.contains_key(name) {
            return Err(RigError::DuplicateBone(name.to_string()));
        }
        if let Some(parent) = parent {
            let Some(record) = self.bones.get_mut(parent) else {
                return Err(RigError::UnknownParent {
                    bone: name.to_string(),
                    parent: parent.to_string(),
                });
            };
            record.children.push(name.to_string());
        }
        self.bones.insert(
            name.to_string(),
            BoneRecord::new(name, parent.map(str::to_string)),
        );
        Ok(())
    }

    /// Builder form of [`MemoryRig::add_bone`].
    pub fn with_bone(mut self, name: &str, parent: Option<&str>) -> Result<Self, RigError> {
        self.add_bone(name, parent)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&BoneRecord> {
        self.bones.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bones.keys().map(|k| k.as_str())
    }

    pub fn bones(&self) -> impl Iterator<Item = &BoneRecord> {
        self.bones.values()
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    fn rename_refs(&mut self, from: &str, to: &str) {
        let record = &self.bones[to];
        let parent = record.parent.clone();
        let children = record.children.clone();
        if let Some(parent) = parent {
            if let Some(p) = self.bones.get_mut(&parent) {
                for child in p.children.iter_mut().filter(|c| c.as_str() == from) {
                    *child = to.to_string();
                }
            }
        }
        for child in children {
            if let Some(c) = self.bones.get_mut(&child) {
                c.parent = Some(to.to_string());
            }
        }
    }
}

impl TryFrom<RigDoc> for MemoryRig {
    type Error = RigError;

    fn try_from(doc: RigDoc) -> Result<Self, Self::Error> {
        let mut rig = MemoryRig::new(doc.name);
        rig.mode = doc.mode;
        for bone in &doc.bones {
            if rig.bones.contains_key(&bone.name) {
                return Err(RigError::DuplicateBone(bone.name.clone()));
            }
            rig.bones.insert(
                bone.name.clone(),
                BoneRecord::new(bone.name.clone(), bone.parent.clone()),
            );
        }
        for bone in &doc.bones {
            let Some(parent) = &bone.parent else {
                continue;
            };
            let Some(record) = rig.bones.get_mut(parent) else {
                return Err(RigError::UnknownParent {
                    bone: bone.name.clone(),
                    parent: parent.clone(),
                });
            };
            record.children.push(bone.name.clone());
        }
        for bone in &doc.bones {
            let mut steps = 0;
            let mut cursor = bone.parent.as_deref();
            while let Some(current) = cursor {
                steps += 1;
                if current == bone.name || steps > rig.bones.len() {
                    return Err(RigError::Cycle(bone.name.clone()));
                }
                cursor = rig.bones[current].parent.as_deref();
            }
        }
        Ok(rig)
    }
}

impl From<MemoryRig> for RigDoc {
    fn from(rig: MemoryRig) -> Self {
        RigDoc {
            name: rig.name,
            mode: rig.mode,
            bones: rig
                .bones
                .into_values()
                .map(|b| BoneDoc {
                    name: b.name,
                    parent: b.parent,
                })
                .collect(),
        }
    }
}

impl RigHost for MemoryRig {
    fn bone_names(&self) -> Vec<String> {
        self.bones.keys().cloned().collect()
    }

    fn contains(&self, name: &str) -> bool {
        self.bones.contains_key(name)
    }

    fn children(&self, name: &str) -> Option<Vec<String>> {
        self.bones.get(name).map(|b| b.children.clone())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), HostError> {
        if !self.bones.contains_key(from) {
            return Err(HostError::MissingBone(from.to_string()));
        }
        if from == to {
            return Ok(());
        }
        if self.bones.contains_key(to) {
            return Err(HostError::NameTaken(to.to_string()));
        }
        // Rebuild to keep the renamed bone at its original position.
        self.bones = std::mem::take(&mut self.bones)
            .into_iter()
            .map(|(key, mut record)| {
                if key == from {
                    record.name = to.to_string();
                    (to.to_string(), record)
                } else {
                    (key, record)
                }
            })
            .collect();
        self.rename_refs(from, to);
        Ok(())
    }

    /// Children of the removed bone are re-attached to its parent at its slot.
    fn remove(&mut self, name: &str) -> Result<(), HostError> {
        let Some(record) = self.bones.shift_remove(name) else {
            return Err(HostError::MissingBone(name.to_string()));
        };
        for child in &record.children {
            if let Some(c) = self.bones.get_mut(child) {
                c.parent = record.parent.clone();
            }
        }
        if let Some(parent) = &record.parent {
            if let Some(p) = self.bones.get_mut(parent) {
                if let Some(slot) = p.children.iter().position(|c| c == name) {
                    p.children.remove(slot);
                    for (offset, child) in record.children.iter().enumerate() {
                        p.children.insert(slot + offset, child.clone());
                    }
                }
            }
        }
        Ok(())
    }

    fn mode(&self) -> RigMode {
        self.mode
    }

    fn set_mode(&mut self, mode: RigMode) {
        self.mode = mode;
    }
}
