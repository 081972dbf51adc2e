//! Record identifiers and the normalized item view.
//!
//! Concrete record kinds (armor, weapon, ammunition, ingredient, ...) are
//! normalized into one tagged [`Item`] at the resolver boundary, so the
//! classifier and the binding engine only ever see a single shape.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid form key '{0}': expected <hex id>:<module>")]
    InvalidFormKey(String),

    #[error("Invalid item kind: {0}")]
    InvalidItemKind(String),

    #[error("Unknown catalog domain: {0}")]
    UnknownDomain(String),

    #[error("Unknown exclusion target: {0}")]
    UnknownExclusionTarget(String),
}

/// Originating content module (plugin file name, e.g. `Skyrim.esm`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModKey(String);

impl ModKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Stable record identifier: local id within its originating module.
///
/// Text form is `XXXXXX:Module.esp` with the local id in hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormKey {
    pub id: u32,
    pub module: ModKey,
}

impl FormKey {
    pub fn new(id: u32, module: impl Into<String>) -> Self {
        Self {
            id,
            module: ModKey::new(module),
        }
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06X}:{}", self.id, self.module)
    }
}

impl FromStr for FormKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidFormKey(s.to_string());
        let (id, module) = s.trim().split_once(':').ok_or_else(invalid)?;
        if module.is_empty() {
            return Err(invalid());
        }
        let id = u32::from_str_radix(id, 16).map_err(|_| invalid())?;
        Ok(Self::new(id, module))
    }
}

impl Serialize for FormKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FormKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Concrete record kind an item was normalized from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Armor,
    Weapon,
    Ammunition,
    Ingredient,
    Ingestible,
    Book,
    Misc,
}

impl ItemKind {
    pub const ALL: &'static [ItemKind] = &[
        Self::Armor,
        Self::Weapon,
        Self::Ammunition,
        Self::Ingredient,
        Self::Ingestible,
        Self::Book,
        Self::Misc,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Armor => "armor",
            Self::Weapon => "weapon",
            Self::Ammunition => "ammunition",
            Self::Ingredient => "ingredient",
            Self::Ingestible => "ingestible",
            Self::Book => "book",
            Self::Misc => "misc",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseError::InvalidItemKind(s.to_string()))
    }
}

/// An item record as seen by classification and binding inference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub key: FormKey,
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_id: Option<String>,
    /// Display name (English)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enchantment: Option<FormKey>,
    /// Module holding this copy of the record when it is an override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_in: Option<ModKey>,
}

impl Item {
    pub fn new(key: FormKey, kind: ItemKind) -> Self {
        Self {
            key,
            kind,
            editor_id: None,
            name: None,
            keywords: Vec::new(),
            enchantment: None,
            defined_in: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_enchantment(mut self, enchantment: FormKey) -> Self {
        self.enchantment = Some(enchantment);
        self
    }

    pub fn with_defined_in(mut self, module: impl Into<ModKey>) -> Self {
        self.defined_in = Some(module.into());
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Display name, or `""` when the record has none
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    pub fn source_module(&self) -> &ModKey {
        &self.key.module
    }

    /// Overriding module if any, else the originating one
    pub fn defining_module(&self) -> &ModKey {
        self.defined_in.as_ref().unwrap_or(&self.key.module)
    }

    pub fn is_enchanted(&self) -> bool {
        self.enchantment.is_some()
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k == keyword)
    }

    pub fn has_any_keyword(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.has_keyword(k))
    }
}

/// An enchantment (object effect) record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enchantment {
    pub key: FormKey,
    pub editor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Enchantment {
    pub fn new(key: FormKey, editor_id: impl Into<String>) -> Self {
        Self {
            key,
            editor_id: editor_id.into(),
            name: None,
        }
    }

    pub fn source_module(&self) -> &ModKey {
        &self.key.module
    }
}

/// Reference resolution capability supplied by the caller.
///
/// Lookups that fail return `None`; callers treat that as an expected
/// absence, never as an error.
pub trait Resolver {
    fn resolve_item(&self, key: &FormKey) -> Option<&Item>;
    fn resolve_enchantment(&self, key: &FormKey) -> Option<&Enchantment>;
}

/// In-memory resolver over already-normalized records.
///
/// Inserting a record whose key already exists replaces it, so feeding
/// records in load order leaves the winning override in place.
#[derive(Debug, Default, Clone)]
pub struct RecordIndex {
    items: HashMap<FormKey, Item>,
    enchantments: HashMap<FormKey, Enchantment>,
}

impl RecordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(
        items: impl IntoIterator<Item = Item>,
        enchantments: impl IntoIterator<Item = Enchantment>,
    ) -> Self {
        let mut index = Self::new();
        for item in items {
            index.insert_item(item);
        }
        for enchantment in enchantments {
            index.insert_enchantment(enchantment);
        }
        index
    }

    pub fn insert_item(&mut self, item: Item) {
        self.items.insert(item.key.clone(), item);
    }

    pub fn insert_enchantment(&mut self, enchantment: Enchantment) {
        self.enchantments.insert(enchantment.key.clone(), enchantment);
    }

    /// All items, sorted by key for reproducible iteration
    pub fn items(&self) -> Vec<&Item> {
        let mut items: Vec<&Item> = self.items.values().collect();
        items.sort_by(|a, b| a.key.cmp(&b.key));
        items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn enchantment_count(&self) -> usize {
        self.enchantments.len()
    }
}

impl Resolver for RecordIndex {
    fn resolve_item(&self, key: &FormKey) -> Option<&Item> {
        self.items.get(key)
    }

    fn resolve_enchantment(&self, key: &FormKey) -> Option<&Enchantment> {
        self.enchantments.get(key)
    }
}
