//! Leveled item lists and their index

use crate::records::{FormKey, ModKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One slot of a leveled list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeveledListEntry {
    /// Referenced item (or nested list)
    pub reference: FormKey,
    #[serde(default = "default_count")]
    pub count: u16,
    #[serde(default = "default_level")]
    pub level: u16,
}

fn default_count() -> u16 {
    1
}

fn default_level() -> u16 {
    1
}

impl LeveledListEntry {
    pub fn new(reference: FormKey, count: u16, level: u16) -> Self {
        Self {
            reference,
            count,
            level,
        }
    }

    /// Same structural slot: identical count and level
    pub fn same_slot(&self, other: &LeveledListEntry) -> bool {
        self.count == other.count && self.level == other.level
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeveledList {
    pub key: FormKey,
    pub editor_id: String,
    /// Module holding this copy of the list when it overrides a list from
    /// another module; absent for the original definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_in: Option<ModKey>,
    #[serde(default)]
    pub entries: Vec<LeveledListEntry>,
}

impl LeveledList {
    pub fn new(key: FormKey, editor_id: impl Into<String>, entries: Vec<LeveledListEntry>) -> Self {
        Self {
            key,
            editor_id: editor_id.into(),
            defined_in: None,
            entries,
        }
    }

    pub fn with_defined_in(mut self, module: impl Into<ModKey>) -> Self {
        self.defined_in = Some(module.into());
        self
    }

    /// Module this copy of the list belongs to: the overriding module, or
    /// the originating one
    pub fn defining_module(&self) -> &ModKey {
        self.defined_in.as_ref().unwrap_or(&self.key.module)
    }
}

/// Leveled lists in first-seen order, indexed by key.
///
/// A later list with an already-seen key replaces the earlier one in place,
/// so the winning override keeps the position of the first definition.
#[derive(Debug, Default, Clone)]
pub struct LeveledListIndex {
    lists: Vec<LeveledList>,
    /// Index: list key → position
    by_key: HashMap<FormKey, usize>,
}

impl LeveledListIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lists(lists: impl IntoIterator<Item = LeveledList>) -> Self {
        let mut ordered: Vec<LeveledList> = Vec::new();
        let mut by_key: HashMap<FormKey, usize> = HashMap::new();

        for list in lists {
            match by_key.get(&list.key) {
                Some(&i) => ordered[i] = list,
                None => {
                    by_key.insert(list.key.clone(), ordered.len());
                    ordered.push(list);
                }
            }
        }

        Self {
            lists: ordered,
            by_key,
        }
    }

    pub fn get(&self, key: &FormKey) -> Option<&LeveledList> {
        self.by_key.get(key).map(|&i| &self.lists[i])
    }

    pub fn lists(&self) -> &[LeveledList] {
        &self.lists
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LeveledList> {
        self.lists.iter()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

impl FromIterator<LeveledList> for LeveledListIndex {
    fn from_iter<T: IntoIterator<Item = LeveledList>>(iter: T) -> Self {
        Self::from_lists(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(id: u32) -> FormKey {
        FormKey::new(id, "Lists.esp")
    }

    #[test]
    fn test_override_keeps_first_position() {
        let index = LeveledListIndex::from_lists([
            LeveledList::new(key(1), "LItemA", vec![]),
            LeveledList::new(key(2), "LItemB", vec![]),
            LeveledList::new(key(1), "LItemA", vec![LeveledListEntry::new(key(9), 1, 1)]),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.lists()[0].key, key(1));
        assert_eq!(index.lists()[0].entries.len(), 1);
        assert_eq!(index.get(&key(2)).unwrap().editor_id, "LItemB");
    }

    #[test]
    fn test_defining_module() {
        let original = LeveledList::new(FormKey::new(1, "Skyrim.esm"), "LItemA", vec![]);
        assert_eq!(original.defining_module(), &ModKey::new("Skyrim.esm"));

        let overridden: LeveledList = serde_json::from_str(
            r#"{"key": "000001:Skyrim.esm", "editor_id": "LItemA", "defined_in": "Patch.esp"}"#,
        )
        .unwrap();
        assert_eq!(overridden.defining_module(), &ModKey::new("Patch.esp"));
        assert_eq!(overridden, original.with_defined_in("Patch.esp"));

        // the override replaces the original and carries its defining module
        let index = LeveledListIndex::from_lists([
            LeveledList::new(FormKey::new(1, "Skyrim.esm"), "LItemA", vec![]),
            overridden,
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lists()[0].defining_module(), &ModKey::new("Patch.esp"));
    }

    #[test]
    fn test_entry_defaults() {
        let entry: LeveledListEntry =
            serde_json::from_str(r#"{"reference": "000009:Lists.esp"}"#).unwrap();
        assert_eq!((entry.count, entry.level), (1, 1));
        assert!(entry.same_slot(&LeveledListEntry::new(key(3), 1, 1)));
        assert!(!entry.same_slot(&LeveledListEntry::new(key(3), 2, 1)));
    }
}
