//! Substring catalogs, one per classification domain.
//!
//! A catalog is plain ordered data: categories in declaration order, each
//! with its ordered substrings. Declaration order is significant because
//! single-winner classification keeps the earlier category on length ties.

use crate::exclusion::ExclusionTarget;
use crate::records::{ItemKind, ParseError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate category '{id}' in {domain} catalog")]
    DuplicateCategory { domain: Domain, id: String },

    #[error("Category '{id}' in {domain} catalog has an empty substring")]
    EmptySubstring { domain: Domain, id: String },
}

/// Classification domain a catalog belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    ArmorMaterial,
    ArmorModifier,
    ArmorMasquerade,
    WeaponType,
    WeaponMaterial,
    WeaponModifier,
    AlchemyEffect,
    PotionMultiplier,
    IngredientVariation,
    AmmunitionType,
    AmmunitionMaterial,
    AmmunitionModifier,
}

impl Domain {
    pub const ALL: &'static [Domain] = &[
        Self::ArmorMaterial,
        Self::ArmorModifier,
        Self::ArmorMasquerade,
        Self::WeaponType,
        Self::WeaponMaterial,
        Self::WeaponModifier,
        Self::AlchemyEffect,
        Self::PotionMultiplier,
        Self::IngredientVariation,
        Self::AmmunitionType,
        Self::AmmunitionMaterial,
        Self::AmmunitionModifier,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ArmorMaterial => "armor_material",
            Self::ArmorModifier => "armor_modifier",
            Self::ArmorMasquerade => "armor_masquerade",
            Self::WeaponType => "weapon_type",
            Self::WeaponMaterial => "weapon_material",
            Self::WeaponModifier => "weapon_modifier",
            Self::AlchemyEffect => "alchemy_effect",
            Self::PotionMultiplier => "potion_multiplier",
            Self::IngredientVariation => "ingredient_variation",
            Self::AmmunitionType => "ammunition_type",
            Self::AmmunitionMaterial => "ammunition_material",
            Self::AmmunitionModifier => "ammunition_modifier",
        }
    }

    /// Additive domains report every matching category instead of one winner
    pub fn is_additive(self) -> bool {
        matches!(
            self,
            Self::ArmorModifier
                | Self::ArmorMasquerade
                | Self::WeaponModifier
                | Self::AmmunitionModifier
        )
    }

    /// Item kind the domain applies to. Alchemy effects classify magic
    /// effect names rather than items, so they have none.
    pub fn item_kind(self) -> Option<ItemKind> {
        match self {
            Self::ArmorMaterial | Self::ArmorModifier | Self::ArmorMasquerade => {
                Some(ItemKind::Armor)
            }
            Self::WeaponType | Self::WeaponMaterial | Self::WeaponModifier => {
                Some(ItemKind::Weapon)
            }
            Self::AmmunitionType | Self::AmmunitionMaterial | Self::AmmunitionModifier => {
                Some(ItemKind::Ammunition)
            }
            Self::PotionMultiplier => Some(ItemKind::Ingestible),
            Self::IngredientVariation => Some(ItemKind::Ingredient),
            Self::AlchemyEffect => None,
        }
    }

    /// Exclusion set that suppresses classification in this domain
    pub fn gate(self) -> Option<ExclusionTarget> {
        match self {
            Self::ArmorModifier => Some(ExclusionTarget::ArmorReforge),
            Self::WeaponModifier => Some(ExclusionTarget::WeaponReforge),
            Self::PotionMultiplier => Some(ExclusionTarget::Potion),
            Self::IngredientVariation => Some(ExclusionTarget::Ingredient),
            Self::AmmunitionType | Self::AmmunitionMaterial | Self::AmmunitionModifier => {
                Some(ExclusionTarget::AmmunitionMultiplication)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Domain {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| ParseError::UnknownDomain(s.to_string()))
    }
}

/// A named category and the name substrings that select it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(alias = "nameSubstrings", alias = "subStrings")]
    pub substrings: Vec<String>,
}

impl Category {
    pub fn new<I, S>(id: impl Into<String>, substrings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            substrings: substrings.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered categories for one domain. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    domain: Domain,
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(domain: Domain, categories: Vec<Category>) -> Self {
        Self { domain, categories }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Load-time check for duplicate ids and empty substrings.
    ///
    /// Classification never calls this; it assumes a validated catalog.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.id.as_str()) {
                return Err(CatalogError::DuplicateCategory {
                    domain: self.domain,
                    id: category.id.clone(),
                });
            }
            if category.substrings.iter().any(String::is_empty) {
                return Err(CatalogError::EmptySubstring {
                    domain: self.domain,
                    id: category.id.clone(),
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}
