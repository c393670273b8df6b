//! Bone-mapping table: target bone name -> (source bone name, twist).
//!
//! At most one entry per target bone. Entries keep insertion order so a saved
//! table round-trips unchanged.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data::Skeleton;
use crate::error::{AnimationError, Result};
use crate::interp::{quat_inverse, IDENTITY_QUAT};

/// One correspondence between a target bone and a source bone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneMapping {
    target: String,
    source: String,
    twist: [f32; 4],
}

impl BoneMapping {
    pub fn new(target: impl Into<String>, source: impl Into<String>, twist: [f32; 4]) -> Self {
        Self {
            target: target.into(),
            source: source.into(),
            twist,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Correction applied after the user rotation (`user × twist`).
    pub fn twist(&self) -> [f32; 4] {
        self.twist
    }

    /// Entry with roles swapped and the twist inverted.
    pub fn inverse(&self) -> Self {
        Self {
            target: self.source.clone(),
            source: self.target.clone(),
            twist: quat_inverse(self.twist),
        }
    }
}

/// Serialized as a list of entries so keys can never disagree with
/// [`BoneMapping::target`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<BoneMapping>", into = "Vec<BoneMapping>")]
pub struct SkeletonMapping {
    entries: IndexMap<String, BoneMapping>,
}

impl SkeletonMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_mappings(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Map `target` to `source`, replacing any entry for `target`.
    /// Returns the replaced entry.
    pub fn map(
        &mut self,
        target: impl Into<String>,
        source: impl Into<String>,
        twist: [f32; 4],
    ) -> Option<BoneMapping> {
        let entry = BoneMapping::new(target, source, twist);
        self.entries.insert(entry.target.clone(), entry)
    }

    /// Map with an identity twist.
    pub fn map_direct(
        &mut self,
        target: impl Into<String>,
        source: impl Into<String>,
    ) -> Option<BoneMapping> {
        self.map(target, source, IDENTITY_QUAT)
    }

    pub fn unmap(&mut self, target: &str) -> Option<BoneMapping> {
        self.entries.shift_remove(target)
    }

    /// Remove every entry whose source bone is `source`, returning them in
    /// table order.
    pub fn unmap_source(&mut self, source: &str) -> Vec<BoneMapping> {
        let targets: Vec<String> = self
            .entries
            .values()
            .filter(|e| e.source == source)
            .map(|e| e.target.clone())
            .collect();
        targets
            .iter()
            .filter_map(|target| self.entries.shift_remove(target))
            .collect()
    }

    pub fn get(&self, target: &str) -> Option<&BoneMapping> {
        self.entries.get(target)
    }

    /// First entry whose source bone is `source`.
    pub fn find_by_source(&self, source: &str) -> Option<&BoneMapping> {
        self.entries.values().find(|e| e.source == source)
    }

    /// Replace the twist of the entry for `target`. Returns false when there
    /// is no such entry.
    pub fn set_twist(&mut self, target: &str, twist: [f32; 4]) -> bool {
        match self.entries.get_mut(target) {
            Some(entry) => {
                entry.twist = twist;
                true
            }
            None => false,
        }
    }

    /// Rename a target bone in the table, keeping the entry's position.
    /// Returns false if `old` is unmapped or `new` already has an entry.
    pub fn rename_target(&mut self, old: &str, new: &str) -> bool {
        if old == new {
            return self.entries.contains_key(old);
        }
        if self.entries.contains_key(new) {
            return false;
        }
        let Some(index) = self.entries.get_index_of(old) else {
            return false;
        };
        let Some(mut entry) = self.entries.shift_remove(old) else {
            return false;
        };
        entry.target = new.to_string();
        self.entries.shift_insert(index, new.to_string(), entry);
        true
    }

    /// Rename a source bone in every entry that uses it. Returns how many
    /// entries changed.
    pub fn rename_source(&mut self, old: &str, new: &str) -> usize {
        let mut changed = 0;
        for entry in self.entries.values_mut() {
            if entry.source == old {
                entry.source = new.to_string();
                changed += 1;
            }
        }
        changed
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoneMapping> {
        self.entries.values()
    }

    /// Sorted target bone names.
    pub fn list_target_bones(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Sorted, de-duplicated source bone names.
    pub fn list_source_bones(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.values().map(|e| e.source.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// How many entries name a target bone present in `skeleton`.
    pub fn count_matched_targets(&self, skeleton: &Skeleton) -> usize {
        self.entries
            .keys()
            .filter(|name| skeleton.bone_index(name).is_some())
            .count()
    }

    /// How many entries name a source bone present in `skeleton`.
    pub fn count_matched_sources(&self, skeleton: &Skeleton) -> usize {
        self.entries
            .values()
            .filter(|e| skeleton.bone_index(&e.source).is_some())
            .count()
    }

    /// New table with source and target swapped and every twist inverted.
    pub fn inverse(&self) -> Result<SkeletonMapping> {
        let mut out = SkeletonMapping::new();
        for entry in self.entries.values() {
            let inv = entry.inverse();
            if out.entries.contains_key(&inv.target) {
                return Err(AnimationError::MappingConflict { bone: inv.target });
            }
            out.entries.insert(inv.target.clone(), inv);
        }
        Ok(out)
    }

    /// The table as used for one retargeting call: borrowed unchanged, or an
    /// inverted copy. The stored table is never modified.
    pub fn effective(&self, invert: bool) -> Result<Cow<'_, SkeletonMapping>> {
        if invert {
            Ok(Cow::Owned(self.inverse()?))
        } else {
            Ok(Cow::Borrowed(self))
        }
    }
}

impl FromIterator<BoneMapping> for SkeletonMapping {
    fn from_iter<I: IntoIterator<Item = BoneMapping>>(iter: I) -> Self {
        let mut out = SkeletonMapping::new();
        for entry in iter {
            out.entries.insert(entry.target.clone(), entry);
        }
        out
    }
}

impl From<Vec<BoneMapping>> for SkeletonMapping {
    fn from(entries: Vec<BoneMapping>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<SkeletonMapping> for Vec<BoneMapping> {
    fn from(mapping: SkeletonMapping) -> Self {
        mapping.entries.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_replaces_existing_target() {
        let mut m = SkeletonMapping::new();
        assert!(m.map_direct("Hips", "pelvis").is_none());
        let old = m.map_direct("Hips", "hip").expect("replaced entry");
        assert_eq!(old.source(), "pelvis");
        assert_eq!(m.count_mappings(), 1);
        assert_eq!(m.get("Hips").map(|e| e.source()), Some("hip"));
    }

    #[test]
    fn unmap_source_removes_every_entry_for_that_source() {
        let mut m = SkeletonMapping::new();
        m.map_direct("a", "x");
        m.map_direct("b", "y");
        m.map_direct("c", "x");
        let removed = m.unmap_source("x");
        let targets: Vec<&str> = removed.iter().map(|e| e.target()).collect();
        assert_eq!(targets, vec!["a", "c"]);
        assert!(m.find_by_source("x").is_none());
        assert_eq!(m.get("b").map(|e| e.source()), Some("y"));
        assert!(m.unmap_source("x").is_empty());
    }

    #[test]
    fn rename_target_keeps_position() {
        let mut m = SkeletonMapping::new();
        m.map_direct("a", "x");
        m.map_direct("b", "y");
        m.map_direct("c", "z");
        assert!(m.rename_target("b", "B"));
        let order: Vec<&str> = m.iter().map(|e| e.target()).collect();
        assert_eq!(order, vec!["a", "B", "c"]);
        assert!(!m.rename_target("a", "c"));
        assert!(!m.rename_target("missing", "q"));
    }
}
