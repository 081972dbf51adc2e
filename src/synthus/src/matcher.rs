//! All-matches lookup for additive domains (modifiers, masquerades).

use crate::catalog::{Catalog, Category};
use crate::records::Item;

/// Every category with at least one substring contained in `name`, in
/// catalog order. No length comparison, no caching.
pub fn match_all<'c>(catalog: &'c Catalog, name: &str) -> Vec<&'c Category> {
    if name.is_empty() {
        return Vec::new();
    }
    catalog
        .iter()
        .filter(|category| {
            category
                .substrings
                .iter()
                .any(|s| !s.is_empty() && name.contains(s.as_str()))
        })
        .collect()
}

/// Matcher owning an additive catalog
#[derive(Debug, Clone)]
pub struct MultiMatcher {
    catalog: Catalog,
}

impl MultiMatcher {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn match_all(&self, name: &str) -> Vec<&Category> {
        match_all(&self.catalog, name)
    }

    pub fn match_item(&self, item: &Item) -> Vec<&Category> {
        self.match_all(item.name_or_empty())
    }
}
