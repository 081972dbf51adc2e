//! Per-run bundle of catalogs, exclusions and name templates.
//!
//! Single-winner domains get a memoizing [`Classifier`], additive domains a
//! [`MultiMatcher`]. Item queries apply the domain's item-kind gate and its
//! exclusion gate before matching.

use crate::catalog::{Catalog, Category, Domain};
use crate::classify::Classifier;
use crate::exclusion::{ExclusionRegistry, ExclusionTarget};
use crate::matcher::MultiMatcher;
use crate::names::EnchantmentNames;
use crate::records::{FormKey, Item};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct DataStore {
    classifiers: HashMap<Domain, Classifier>,
    matchers: HashMap<Domain, MultiMatcher>,
    exclusions: ExclusionRegistry,
    enchantment_names: EnchantmentNames,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog under its own domain, replacing any earlier one
    pub fn insert_catalog(&mut self, catalog: Catalog) {
        let domain = catalog.domain();
        if domain.is_additive() {
            self.matchers.insert(domain, MultiMatcher::new(catalog));
        } else {
            self.classifiers.insert(domain, Classifier::new(catalog));
        }
    }

    pub fn with_catalogs(mut self, catalogs: impl IntoIterator<Item = Catalog>) -> Self {
        for catalog in catalogs {
            self.insert_catalog(catalog);
        }
        self
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionRegistry) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_enchantment_names(mut self, names: EnchantmentNames) -> Self {
        self.enchantment_names = names;
        self
    }

    pub fn exclusions(&self) -> &ExclusionRegistry {
        &self.exclusions
    }

    pub fn enchantment_names(&self) -> &EnchantmentNames {
        &self.enchantment_names
    }

    pub fn catalog(&self, domain: Domain) -> Option<&Catalog> {
        if domain.is_additive() {
            self.matchers.get(&domain).map(MultiMatcher::catalog)
        } else {
            self.classifiers.get(&domain).map(Classifier::catalog)
        }
    }

    /// Loaded domains in canonical domain order
    pub fn domains(&self) -> Vec<Domain> {
        Domain::ALL
            .iter()
            .copied()
            .filter(|d| self.catalog(*d).is_some())
            .collect()
    }

    /// Classify a bare name in a single-winner domain, without gates
    pub fn classify_name(&self, domain: Domain, name: &str) -> Option<&Category> {
        self.classifiers.get(&domain)?.classify(name)
    }

    /// All categories of an additive domain matching a bare name, without gates
    pub fn match_name(&self, domain: Domain, name: &str) -> Vec<&Category> {
        self.matchers
            .get(&domain)
            .map(|m| m.match_all(name))
            .unwrap_or_default()
    }

    /// Single-winner classification of `item`; `None` for additive domains,
    /// for items of another kind, and for items excluded by the domain gate
    pub fn classify_item(&self, domain: Domain, item: &Item) -> Option<&Category> {
        if !self.admits(domain, item) {
            return None;
        }
        self.classifiers.get(&domain)?.classify_item(item)
    }

    /// Every matching category of an additive domain for `item`
    pub fn modifiers(&self, domain: Domain, item: &Item) -> Vec<&Category> {
        if !self.admits(domain, item) {
            return Vec::new();
        }
        self.matchers
            .get(&domain)
            .map(|m| m.match_item(item))
            .unwrap_or_default()
    }

    pub fn is_excluded(
        &self,
        target: ExclusionTarget,
        subject: &FormKey,
        qualifier: Option<&FormKey>,
    ) -> bool {
        self.exclusions.is_excluded(target, subject, qualifier)
    }

    fn admits(&self, domain: Domain, item: &Item) -> bool {
        if domain.item_kind().is_some_and(|kind| kind != item.kind) {
            return false;
        }
        match domain.gate() {
            Some(target) => !self.exclusions.is_excluded(target, &item.key, None),
            None => true,
        }
    }

    pub fn armor_material(&self, item: &Item) -> Option<&Category> {
        self.classify_item(Domain::ArmorMaterial, item)
    }

    pub fn armor_modifiers(&self, item: &Item) -> Vec<&Category> {
        self.modifiers(Domain::ArmorModifier, item)
    }

    pub fn armor_masquerades(&self, item: &Item) -> Vec<&Category> {
        self.modifiers(Domain::ArmorMasquerade, item)
    }

    pub fn weapon_type(&self, item: &Item) -> Option<&Category> {
        self.classify_item(Domain::WeaponType, item)
    }

    pub fn weapon_material(&self, item: &Item) -> Option<&Category> {
        self.classify_item(Domain::WeaponMaterial, item)
    }

    pub fn weapon_modifiers(&self, item: &Item) -> Vec<&Category> {
        self.modifiers(Domain::WeaponModifier, item)
    }

    /// Alchemy effects classify magic effect names, not items
    pub fn alchemy_effect(&self, effect_name: &str) -> Option<&Category> {
        self.classify_name(Domain::AlchemyEffect, effect_name)
    }

    pub fn potion_multiplier(&self, item: &Item) -> Option<&Category> {
        self.classify_item(Domain::PotionMultiplier, item)
    }

    pub fn ingredient_variation(&self, item: &Item) -> Option<&Category> {
        self.classify_item(Domain::IngredientVariation, item)
    }

    pub fn ammunition_type(&self, item: &Item) -> Option<&Category> {
        self.classify_item(Domain::AmmunitionType, item)
    }

    pub fn ammunition_material(&self, item: &Item) -> Option<&Category> {
        self.classify_item(Domain::AmmunitionMaterial, item)
    }

    pub fn ammunition_modifiers(&self, item: &Item) -> Vec<&Category> {
        self.modifiers(Domain::AmmunitionModifier, item)
    }

    /// Display name of `item` with its enchantment's name template applied
    pub fn enchanted_name(&self, item: &Item) -> String {
        match &item.enchantment {
            Some(enchantment) => self
                .enchantment_names
                .localized_name(item.name_or_empty(), enchantment),
            None => item.name_or_empty().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusion::ExclusionSet;
    use crate::names::EnchantmentNameBinding;
    use crate::records::ItemKind;

    fn store() -> DataStore {
        let mut exclusions = ExclusionRegistry::new();
        exclusions
            .insert(
                ExclusionTarget::WeaponReforge,
                ExclusionSet::items([FormKey::new(0x3, "Skyrim.esm")]),
            )
            .unwrap();

        DataStore::new()
            .with_catalogs([
                Catalog::new(
                    Domain::WeaponMaterial,
                    vec![
                        Category::new("Iron", ["Iron"]),
                        Category::new("Steel", ["Steel"]),
                    ],
                ),
                Catalog::new(
                    Domain::WeaponModifier,
                    vec![
                        Category::new("Refined", ["Refined"]),
                        Category::new("Warforged", ["Warforged"]),
                    ],
                ),
                Catalog::new(
                    Domain::AlchemyEffect,
                    vec![Category::new("RestoreHealth", ["Restore Health"])],
                ),
            ])
            .with_exclusions(exclusions)
            .with_enchantment_names(EnchantmentNames::from_bindings([
                EnchantmentNameBinding {
                    enchantment: FormKey::new(0x9, "Skyrim.esm"),
                    name_template: "{0} of Frost".to_string(),
                },
            ]))
    }

    fn weapon(id: u32, name: &str) -> Item {
        Item::new(FormKey::new(id, "Skyrim.esm"), ItemKind::Weapon).with_name(name)
    }

    #[test]
    fn test_domains_route_by_additivity() {
        let store = store();
        assert_eq!(
            store.domains(),
            vec![Domain::WeaponMaterial, Domain::WeaponModifier, Domain::AlchemyEffect]
        );
        assert!(store.classify_name(Domain::WeaponModifier, "Refined Iron Sword").is_none());
        assert_eq!(store.match_name(Domain::WeaponModifier, "Refined Iron Sword").len(), 1);
    }

    #[test]
    fn test_item_kind_gate() {
        let store = store();
        let sword = weapon(1, "Steel Sword");
        assert_eq!(store.weapon_material(&sword).unwrap().id, "Steel");

        let helmet =
            Item::new(FormKey::new(2, "Skyrim.esm"), ItemKind::Armor).with_name("Steel Helmet");
        assert!(store.weapon_material(&helmet).is_none());
        assert!(store.armor_material(&helmet).is_none());
    }

    #[test]
    fn test_reforge_exclusion_gates_modifiers() {
        let store = store();
        let kept = weapon(1, "Refined Warforged Iron Sword");
        let excluded = weapon(3, "Refined Warforged Iron Sword");

        let ids: Vec<&str> = store.weapon_modifiers(&kept).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["Refined", "Warforged"]);
        assert!(store.weapon_modifiers(&excluded).is_empty());
        // material has no gate
        assert_eq!(store.weapon_material(&excluded).unwrap().id, "Iron");
    }

    #[test]
    fn test_empty_name_classifies_to_nothing() {
        let store = store();
        let unnamed = Item::new(FormKey::new(5, "Skyrim.esm"), ItemKind::Weapon);
        assert!(store.weapon_material(&unnamed).is_none());
        assert!(store.weapon_modifiers(&unnamed).is_empty());
    }

    #[test]
    fn test_alchemy_effect_and_enchanted_name() {
        let store = store();
        assert_eq!(
            store.alchemy_effect("Restore Health").unwrap().id,
            "RestoreHealth"
        );

        let frost = weapon(6, "Iron Dagger").with_enchantment(FormKey::new(0x9, "Skyrim.esm"));
        assert_eq!(store.enchanted_name(&frost), "Iron Dagger of Frost");
        assert_eq!(store.enchanted_name(&weapon(7, "Iron Dagger")), "Iron Dagger");
    }
}
