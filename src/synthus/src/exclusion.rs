//! Exclusion sets in three tiers.
//!
//! - simple: membership of an item key
//! - record scope: membership of a key of another record kind (leveled
//!   lists, NPCs, races) than the item being processed
//! - complex: `(subject, optional qualifier)` pairs, where an absent
//!   qualifier excludes the subject under any qualifier
//!
//! Absence of a match, or of a whole set, means "not excluded".

use crate::records::{FormKey, ParseError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExclusionError {
    #[error("Exclusion target {target} expects a {expected} set, got {actual}")]
    TierMismatch {
        target: ExclusionTarget,
        expected: Tier,
        actual: Tier,
    },
}

/// Exclusion tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Simple,
    RecordScope,
    Complex,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Simple => write!(f, "simple"),
            Tier::RecordScope => write!(f, "record-scope"),
            Tier::Complex => write!(f, "complex"),
        }
    }
}

/// A `(subject, qualifier)` exclusion pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComplexExclusion {
    pub subject: FormKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<FormKey>,
}

impl ComplexExclusion {
    pub fn new(subject: FormKey, qualifier: Option<FormKey>) -> Self {
        Self { subject, qualifier }
    }

    pub fn matches(&self, subject: &FormKey, qualifier: Option<&FormKey>) -> bool {
        if &self.subject != subject {
            return false;
        }
        match &self.qualifier {
            None => true,
            Some(q) => qualifier == Some(q),
        }
    }
}

/// One exclusion set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionSet {
    /// Item keys
    Items(HashSet<FormKey>),
    /// Keys of a different record kind (e.g. leveled lists)
    Records(HashSet<FormKey>),
    Complex(Vec<ComplexExclusion>),
}

impl ExclusionSet {
    pub fn items(keys: impl IntoIterator<Item = FormKey>) -> Self {
        Self::Items(keys.into_iter().collect())
    }

    pub fn records(keys: impl IntoIterator<Item = FormKey>) -> Self {
        Self::Records(keys.into_iter().collect())
    }

    pub fn complex(entries: impl IntoIterator<Item = ComplexExclusion>) -> Self {
        Self::Complex(entries.into_iter().collect())
    }

    pub fn tier(&self) -> Tier {
        match self {
            Self::Items(_) => Tier::Simple,
            Self::Records(_) => Tier::RecordScope,
            Self::Complex(_) => Tier::Complex,
        }
    }

    /// Whether `subject` (optionally qualified) is excluded.
    ///
    /// The qualifier is ignored by the simple and record-scope tiers.
    pub fn is_excluded(&self, subject: &FormKey, qualifier: Option<&FormKey>) -> bool {
        match self {
            Self::Items(keys) | Self::Records(keys) => keys.contains(subject),
            Self::Complex(entries) => entries.iter().any(|e| e.matches(subject, qualifier)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Items(keys) | Self::Records(keys) => keys.len(),
            Self::Complex(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Named exclusion sets consumed by classification and rule propagation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionTarget {
    ArmorReforge,
    WeaponReforge,
    EnchantmentArmor,
    EnchantmentWeapon,
    DistributionArmor,
    DistributionWeaponRegular,
    DistributionWeaponListRegular,
    DistributionWeaponsEnchanted,
    EnchantingSimilarityArmor,
    EnchantingSimilarityWeapon,
    Potion,
    Ingredient,
    AmmunitionMultiplication,
    Npc,
    Race,
    ScrollCrafting,
    StaffCrafting,
    StaffCraftingDisableCrafting,
    SpellDistribution,
}

impl ExclusionTarget {
    pub const ALL: &'static [ExclusionTarget] = &[
        Self::ArmorReforge,
        Self::WeaponReforge,
        Self::EnchantmentArmor,
        Self::EnchantmentWeapon,
        Self::DistributionArmor,
        Self::DistributionWeaponRegular,
        Self::DistributionWeaponListRegular,
        Self::DistributionWeaponsEnchanted,
        Self::EnchantingSimilarityArmor,
        Self::EnchantingSimilarityWeapon,
        Self::Potion,
        Self::Ingredient,
        Self::AmmunitionMultiplication,
        Self::Npc,
        Self::Race,
        Self::ScrollCrafting,
        Self::StaffCrafting,
        Self::StaffCraftingDisableCrafting,
        Self::SpellDistribution,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ArmorReforge => "armor_reforge",
            Self::WeaponReforge => "weapon_reforge",
            Self::EnchantmentArmor => "enchantment_armor",
            Self::EnchantmentWeapon => "enchantment_weapon",
            Self::DistributionArmor => "distribution_armor",
            Self::DistributionWeaponRegular => "distribution_weapon_regular",
            Self::DistributionWeaponListRegular => "distribution_weapon_list_regular",
            Self::DistributionWeaponsEnchanted => "distribution_weapons_enchanted",
            Self::EnchantingSimilarityArmor => "enchanting_similarity_armor",
            Self::EnchantingSimilarityWeapon => "enchanting_similarity_weapon",
            Self::Potion => "potion",
            Self::Ingredient => "ingredient",
            Self::AmmunitionMultiplication => "ammunition_multiplication",
            Self::Npc => "npc",
            Self::Race => "race",
            Self::ScrollCrafting => "scroll_crafting",
            Self::StaffCrafting => "staff_crafting",
            Self::StaffCraftingDisableCrafting => "staff_crafting_disable_crafting",
            Self::SpellDistribution => "spell_distribution",
        }
    }

    /// Tier a set registered under this target must have
    pub fn tier(self) -> Tier {
        match self {
            Self::DistributionArmor
            | Self::DistributionWeaponListRegular
            | Self::DistributionWeaponsEnchanted => Tier::RecordScope,
            Self::EnchantingSimilarityArmor | Self::EnchantingSimilarityWeapon => Tier::Complex,
            _ => Tier::Simple,
        }
    }
}

impl fmt::Display for ExclusionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExclusionTarget {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| ParseError::UnknownExclusionTarget(s.to_string()))
    }
}

/// All exclusion sets for a run, keyed by target
#[derive(Debug, Clone, Default)]
pub struct ExclusionRegistry {
    sets: HashMap<ExclusionTarget, ExclusionSet>,
}

impl ExclusionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `set` under `target`, replacing any previous set.
    ///
    /// Fails when the set's tier is not the one the target requires.
    pub fn insert(
        &mut self,
        target: ExclusionTarget,
        set: ExclusionSet,
    ) -> Result<(), ExclusionError> {
        if set.tier() != target.tier() {
            return Err(ExclusionError::TierMismatch {
                target,
                expected: target.tier(),
                actual: set.tier(),
            });
        }
        self.sets.insert(target, set);
        Ok(())
    }

    pub fn get(&self, target: ExclusionTarget) -> Option<&ExclusionSet> {
        self.sets.get(&target)
    }

    pub fn is_excluded(
        &self,
        target: ExclusionTarget,
        subject: &FormKey,
        qualifier: Option<&FormKey>,
    ) -> bool {
        self.sets
            .get(&target)
            .is_some_and(|set| set.is_excluded(subject, qualifier))
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(id: u32) -> FormKey {
        FormKey::new(id, "Test.esp")
    }

    #[test]
    fn test_simple_membership() {
        let set = ExclusionSet::items([key(1), key(2)]);
        assert!(set.is_excluded(&key(1), None));
        assert!(set.is_excluded(&key(2), Some(&key(9))));
        assert!(!set.is_excluded(&key(3), None));
    }

    #[test]
    fn test_complex_qualifier_must_match() {
        let item_x = key(0x10);
        let item_w = key(0x11);
        let ench_y = key(0x20);
        let ench_z = key(0x21);
        let set = ExclusionSet::complex([ComplexExclusion::new(item_x.clone(), Some(ench_y.clone()))]);

        assert!(set.is_excluded(&item_x, Some(&ench_y)));
        assert!(!set.is_excluded(&item_x, Some(&ench_z)));
        assert!(!set.is_excluded(&item_w, Some(&ench_y)));
        assert!(!set.is_excluded(&item_x, None));
    }

    #[test]
    fn test_complex_without_qualifier_matches_any() {
        let set = ExclusionSet::complex([ComplexExclusion::new(key(1), None)]);
        assert!(set.is_excluded(&key(1), None));
        assert!(set.is_excluded(&key(1), Some(&key(42))));
        assert!(!set.is_excluded(&key(2), None));
    }

    #[test]
    fn test_registry_missing_set_is_not_excluded() {
        let registry = ExclusionRegistry::new();
        assert!(!registry.is_excluded(ExclusionTarget::WeaponReforge, &key(1), None));
    }

    #[test]
    fn test_registry_rejects_tier_mismatch() {
        let mut registry = ExclusionRegistry::new();
        let err = registry
            .insert(ExclusionTarget::DistributionArmor, ExclusionSet::items([key(1)]))
            .unwrap_err();
        assert_eq!(
            err,
            ExclusionError::TierMismatch {
                target: ExclusionTarget::DistributionArmor,
                expected: Tier::RecordScope,
                actual: Tier::Simple,
            }
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_record_scope() {
        let mut registry = ExclusionRegistry::new();
        registry
            .insert(
                ExclusionTarget::DistributionWeaponListRegular,
                ExclusionSet::records([key(0x500)]),
            )
            .unwrap();
        assert!(registry.is_excluded(ExclusionTarget::DistributionWeaponListRegular, &key(0x500), None));
        assert!(!registry.is_excluded(ExclusionTarget::DistributionWeaponRegular, &key(0x500), None));
    }

    #[test]
    fn test_set_deserializes_by_tier_tag() {
        let json = r#"{"complex": [{"subject": "000010:Test.esp", "qualifier": "000020:Test.esp"}]}"#;
        let set: ExclusionSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.tier(), Tier::Complex);
        assert!(set.is_excluded(&key(0x10), Some(&key(0x20))));
    }

    #[test]
    fn test_target_names_parse() {
        for target in ExclusionTarget::ALL {
            assert_eq!(target.name().parse::<ExclusionTarget>().unwrap(), *target);
        }
        assert!("armour_reforge".parse::<ExclusionTarget>().is_err());
    }
}
