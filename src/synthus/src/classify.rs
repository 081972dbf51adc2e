//! Longest-substring, single-winner classification.
//!
//! For every category in catalog order, every substring contained in the
//! name is a candidate; the longest one wins. On equal length the category
//! seen first in the catalog is kept, so a catalog's declaration order is
//! part of its meaning.

use crate::catalog::{Catalog, Category};
use crate::records::Item;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Index of the best-matching category, or `None` when nothing matches.
pub fn best_match_index(catalog: &Catalog, name: &str) -> Option<usize> {
    if name.is_empty() {
        return None;
    }

    let mut best = None;
    let mut best_len = 0;

    for (index, category) in catalog.iter().enumerate() {
        for substring in &category.substrings {
            let len = substring.chars().count();
            // strict `>` keeps the earlier category on ties
            if len > best_len && name.contains(substring.as_str()) {
                best_len = len;
                best = Some(index);
            }
        }
    }

    best
}

/// Best-matching category for `name`. Pure: no caching.
pub fn classify<'c>(catalog: &'c Catalog, name: &str) -> Option<&'c Category> {
    best_match_index(catalog, name).and_then(|i| catalog.get(i))
}

/// Memoizing classifier over one immutable catalog.
///
/// The cache maps exact name strings to the winning category index in the
/// owned catalog. It is `Sync`: concurrent callers share the cache through
/// a read-write lock. Two threads racing on the same uncached name
/// may both compute it; the result is identical either way.
#[derive(Debug)]
pub struct Classifier {
    catalog: Catalog,
    cache: RwLock<HashMap<String, Option<usize>>>,
}

impl Classifier {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn classify(&self, name: &str) -> Option<&Category> {
        if name.is_empty() {
            return None;
        }

        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied();

        let index = match cached {
            Some(index) => index,
            None => {
                let index = best_match_index(&self.catalog, name);
                self.cache
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(name.to_string(), index);
                index
            }
        };

        index.and_then(|i| self.catalog.get(i))
    }

    pub fn classify_item(&self, item: &Item) -> Option<&Category> {
        self.classify(item.name_or_empty())
    }

    /// Number of distinct names memoized so far
    pub fn cached_names(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Domain;

    fn weapon_types() -> Catalog {
        Catalog::new(
            Domain::WeaponType,
            vec![
                Category::new("Sword", ["Sword", "Blade"]),
                Category::new("Greatsword", ["Greatsword"]),
                Category::new("Dagger", ["Dagger", "Knife"]),
                Category::new("Shortsword", ["Shortsword"]),
            ],
        )
    }

    #[test]
    fn test_longest_substring_wins() {
        let catalog = weapon_types();
        assert_eq!(classify(&catalog, "Iron Greatsword").unwrap().id, "Greatsword");
        assert_eq!(classify(&catalog, "Steel Sword").unwrap().id, "Sword");
        assert_eq!(classify(&catalog, "Elven Dagger").unwrap().id, "Dagger");
    }

    #[test]
    fn test_no_match_and_empty_name() {
        let catalog = weapon_types();
        assert!(classify(&catalog, "Hunting Bow").is_none());
        assert!(classify(&catalog, "").is_none());
    }

    #[test]
    fn test_equal_length_tie_keeps_first_category() {
        // "Greatsword" and "Shortsword" are both 10 characters
        let catalog = weapon_types();
        let name = "Greatsword of the Shortsword Guild";
        assert_eq!(classify(&catalog, name).unwrap().id, "Greatsword");

        let reordered = Catalog::new(
            Domain::WeaponType,
            vec![
                Category::new("Shortsword", ["Shortsword"]),
                Category::new("Greatsword", ["Greatsword"]),
            ],
        );
        assert_eq!(classify(&reordered, name).unwrap().id, "Shortsword");
    }

    #[test]
    fn test_tie_within_one_category_list() {
        let catalog = Catalog::new(
            Domain::WeaponMaterial,
            vec![
                Category::new("Iron", ["Iron"]),
                Category::new("Dwarven", ["Dwar", "Dwarven"]),
            ],
        );
        assert_eq!(classify(&catalog, "Dwarven Iron Mace").unwrap().id, "Dwarven");
    }

    #[test]
    fn test_classifier_caches_by_exact_name() {
        let classifier = Classifier::new(weapon_types());
        assert_eq!(classifier.classify("Iron Sword").unwrap().id, "Sword");
        assert_eq!(classifier.classify("Iron Sword").unwrap().id, "Sword");
        assert!(classifier.classify("Hunting Bow").is_none());
        assert!(classifier.classify("").is_none());
        assert_eq!(classifier.cached_names(), 2);
    }

    #[test]
    fn test_classifier_matches_pure_function() {
        let catalog = weapon_types();
        let classifier = Classifier::new(catalog.clone());
        for name in ["Blade of Woe", "Orcish Knife", "Greatsword", "Staff", ""] {
            assert_eq!(
                classifier.classify(name).map(|c| c.id.clone()),
                classify(&catalog, name).map(|c| c.id.clone()),
            );
        }
    }

    #[test]
    fn test_classifier_shared_across_threads() {
        let classifier = Classifier::new(weapon_types());
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    assert_eq!(classifier.classify("Ebony Dagger").unwrap().id, "Dagger");
                });
            }
        });
        assert_eq!(classifier.cached_names(), 1);
    }
}
