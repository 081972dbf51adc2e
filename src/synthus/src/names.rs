//! Enchantment name templates

use crate::records::FormKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name template for items carrying `enchantment`; `{0}` is replaced with
/// the base item name, `{{` and `}}` stand for literal braces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnchantmentNameBinding {
    pub enchantment: FormKey,
    pub name_template: String,
}

/// Name templates keyed by enchantment
#[derive(Debug, Clone, Default)]
pub struct EnchantmentNames {
    by_enchantment: HashMap<FormKey, String>,
}

impl EnchantmentNames {
    /// Later bindings for the same enchantment replace earlier ones
    pub fn from_bindings(bindings: impl IntoIterator<Item = EnchantmentNameBinding>) -> Self {
        let by_enchantment = bindings
            .into_iter()
            .map(|b| (b.enchantment, b.name_template))
            .collect();
        Self { by_enchantment }
    }

    pub fn template(&self, enchantment: &FormKey) -> Option<&str> {
        self.by_enchantment.get(enchantment).map(String::as_str)
    }

    /// Enchanted display name, or `item_name` unchanged when no template
    /// exists for `enchantment`
    pub fn localized_name(&self, item_name: &str, enchantment: &FormKey) -> String {
        match self.template(enchantment) {
            Some(template) => format_template(template, item_name),
            None => item_name.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_enchantment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_enchantment.is_empty()
    }
}

/// Substitute `{0}` and unescape doubled braces. Any other brace is kept
/// as written.
fn format_template(template: &str, item_name: &str) -> String {
    let mut out = String::with_capacity(template.len() + item_name.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("{{").or_else(|| tail.strip_prefix("}}")) {
            out.push_str(&tail[..1]);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{0}") {
            out.push_str(item_name);
            rest = after;
        } else {
            out.push_str(&tail[..1]);
            rest = &tail[1..];
        }
    }
    out.push_str(rest);

    out
}
