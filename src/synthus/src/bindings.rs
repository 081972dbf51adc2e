//! Enchantment binding inference from leveled lists.
//!
//! Two enchanted items that fill the same slot of a list (same count, same
//! level) are treated as author-intended substitutes when their enchantments
//! come from different modules. For every enchanted entry `E1` and every
//! other same-slot entry `E2`, a candidate `{base: E2's enchantment, new:
//! E1's enchantment}` is emitted. Candidates are then reduced per list
//! editor id (lists sharing an editor id form one group):
//!
//! - the first candidate per new enchantment decides the group, later ones
//!   are dropped
//! - if that first candidate is the exact reverse of an already kept rule it
//!   is dropped too, so a reciprocal pair yields one rule
//!
//! Candidate generation runs per list and may run in parallel; the
//! reduction always runs single-threaded over lists and candidates in input
//! order, so "first" is well defined.

use crate::exclusion::ExclusionSet;
use crate::leveled::{LeveledList, LeveledListIndex};
use crate::records::{Enchantment, FormKey, Item, ItemKind, ModKey, Resolver};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, trace};

/// One substitution: items enchanted with `base_id` may also appear with
/// `new_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnchantmentReplacer {
    /// Module the base enchantment originates from
    pub base_module: ModKey,
    /// Editor id of the base enchantment
    pub base_id: String,
    /// Editor id of the substitute enchantment
    pub new_id: String,
}

/// Rules scoped to one leveled list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEnchantmentBinding {
    /// Editor id of the list
    pub list_id: String,
    /// Always set by inference
    pub fill_similar: bool,
    pub rules: Vec<EnchantmentReplacer>,
}

/// Scope restrictions for an inference pass
#[derive(Debug, Clone, Default)]
pub struct BindingOptions {
    /// Only scan lists defined in this module (its own lists and its
    /// overrides), and only take the substitute side (`E1`) from items it
    /// defines or overrides.
    pub module: Option<ModKey>,
    /// Item kinds allowed on both sides of a pair. Empty allows all.
    pub kinds: Vec<ItemKind>,
}

impl BindingOptions {
    fn accepts(&self, item: &Item) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&item.kind)
    }
}

/// Counters for one inference pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferenceStats {
    pub lists_scanned: usize,
    pub lists_excluded: usize,
    /// Item or enchantment lookups that failed (counted per lookup)
    pub unresolved: usize,
    pub candidates: usize,
    pub duplicates_dropped: usize,
    pub reciprocal_suppressed: usize,
    pub rules: usize,
}

/// Raw candidates of one list, before reduction
#[derive(Debug)]
struct ListScan<'l> {
    list: &'l LeveledList,
    candidates: Vec<EnchantmentReplacer>,
    unresolved: usize,
}

/// Mines leveled lists for cross-module enchantment substitutions
#[derive(Debug)]
pub struct BindingInferenceEngine<'a, R> {
    resolver: &'a R,
    options: BindingOptions,
    list_exclusions: Option<&'a ExclusionSet>,
    parallel: bool,
}

impl<'a, R: Resolver + Sync> BindingInferenceEngine<'a, R> {
    pub fn new(resolver: &'a R) -> Self {
        Self {
            resolver,
            options: BindingOptions::default(),
            list_exclusions: None,
            parallel: true,
        }
    }

    pub fn with_options(mut self, options: BindingOptions) -> Self {
        self.options = options;
        self
    }

    /// Skip every list whose key is in `exclusions`
    pub fn with_list_exclusions(mut self, exclusions: &'a ExclusionSet) -> Self {
        self.list_exclusions = Some(exclusions);
        self
    }

    /// Toggle parallel candidate generation. Output is identical either way.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn infer(&self, lists: &LeveledListIndex) -> Vec<ListEnchantmentBinding> {
        self.infer_with_stats(lists).0
    }

    pub fn infer_with_stats(
        &self,
        lists: &LeveledListIndex,
    ) -> (Vec<ListEnchantmentBinding>, InferenceStats) {
        let mut stats = InferenceStats::default();
        let mut eligible: Vec<&LeveledList> = Vec::with_capacity(lists.len());

        for list in lists.iter() {
            if self
                .list_exclusions
                .is_some_and(|set| set.is_excluded(&list.key, None))
            {
                debug!(list = %list.editor_id, "list excluded from binding inference");
                stats.lists_excluded += 1;
                continue;
            }
            if let Some(module) = &self.options.module {
                if list.defining_module() != module {
                    continue;
                }
            }
            eligible.push(list);
        }

        let scans = self.scan_all(&eligible);
        let bindings = reduce(scans, &mut stats);

        info!(
            lists = stats.lists_scanned,
            excluded = stats.lists_excluded,
            candidates = stats.candidates,
            rules = stats.rules,
            unresolved = stats.unresolved,
            "enchantment binding inference finished"
        );

        (bindings, stats)
    }

    #[cfg(feature = "parallel")]
    fn scan_all<'l>(&self, lists: &[&'l LeveledList]) -> Vec<ListScan<'l>> {
        if self.parallel {
            // collect() on an indexed parallel iterator keeps input order
            lists.par_iter().map(|&list| self.scan_list(list)).collect()
        } else {
            lists.iter().map(|&list| self.scan_list(list)).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn scan_all<'l>(&self, lists: &[&'l LeveledList]) -> Vec<ListScan<'l>> {
        lists.iter().map(|&list| self.scan_list(list)).collect()
    }

    fn scan_list<'l>(&self, list: &'l LeveledList) -> ListScan<'l> {
        let mut scan = ListScan {
            list,
            candidates: Vec::new(),
            unresolved: 0,
        };

        for (i, this_entry) in list.entries.iter().enumerate() {
            let Some((this_item, this_ench)) =
                self.resolve_enchanted(&this_entry.reference, &mut scan.unresolved)
            else {
                continue;
            };
            if let Some(module) = &self.options.module {
                if this_item.defining_module() != module {
                    continue;
                }
            }

            for (j, other_entry) in list.entries.iter().enumerate() {
                if i == j || !other_entry.same_slot(this_entry) {
                    continue;
                }
                let Some((_, other_ench)) =
                    self.resolve_enchanted(&other_entry.reference, &mut scan.unresolved)
                else {
                    continue;
                };
                if other_ench.source_module() == this_ench.source_module() {
                    continue;
                }
                if other_ench.editor_id == this_ench.editor_id {
                    continue;
                }
                scan.candidates.push(EnchantmentReplacer {
                    base_module: other_ench.source_module().clone(),
                    base_id: other_ench.editor_id.clone(),
                    new_id: this_ench.editor_id.clone(),
                });
            }
        }

        scan
    }

    /// Resolve an entry to an accepted, enchanted item and its enchantment
    fn resolve_enchanted(
        &self,
        reference: &FormKey,
        unresolved: &mut usize,
    ) -> Option<(&'a Item, &'a Enchantment)> {
        let resolver: &'a R = self.resolver;

        let Some(item) = resolver.resolve_item(reference) else {
            trace!(%reference, "unresolved item reference");
            *unresolved += 1;
            return None;
        };
        if !self.options.accepts(item) {
            return None;
        }
        let enchantment_key = item.enchantment.as_ref()?;
        let Some(enchantment) = resolver.resolve_enchantment(enchantment_key) else {
            trace!(item = %reference, enchantment = %enchantment_key, "unresolved enchantment");
            *unresolved += 1;
            return None;
        };
        Some((item, enchantment))
    }
}

/// Rules accumulated for one list editor id
struct Group {
    list_id: String,
    seen_new: HashSet<String>,
    rules: Vec<EnchantmentReplacer>,
}

/// Order-preserving reduction of per-list candidates into rule groups,
/// one per editor id in first-seen order
fn reduce(scans: Vec<ListScan<'_>>, stats: &mut InferenceStats) -> Vec<ListEnchantmentBinding> {
    let mut groups: Vec<Group> = Vec::new();
    let mut by_list_id: HashMap<String, usize> = HashMap::new();

    for scan in scans {
        stats.lists_scanned += 1;
        stats.unresolved += scan.unresolved;
        stats.candidates += scan.candidates.len();

        let list_id = &scan.list.editor_id;
        let index = match by_list_id.get(list_id) {
            Some(&index) => index,
            None => {
                by_list_id.insert(list_id.clone(), groups.len());
                groups.push(Group {
                    list_id: list_id.clone(),
                    seen_new: HashSet::new(),
                    rules: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[index];

        for candidate in scan.candidates {
            // the first candidate closes its new id even when suppressed below
            if !group.seen_new.insert(candidate.new_id.clone()) {
                stats.duplicates_dropped += 1;
                continue;
            }
            if group
                .rules
                .iter()
                .any(|r| r.base_id == candidate.new_id && r.new_id == candidate.base_id)
            {
                stats.reciprocal_suppressed += 1;
                continue;
            }
            group.rules.push(candidate);
        }
    }

    let mut bindings = Vec::new();
    for group in groups {
        if group.rules.is_empty() {
            continue;
        }
        debug!(list = %group.list_id, rules = group.rules.len(), "list bindings");
        stats.rules += group.rules.len();
        bindings.push(ListEnchantmentBinding {
            list_id: group.list_id,
            fill_similar: true,
            rules: group.rules,
        });
    }

    bindings
}

/// Run inference with default options
pub fn infer_bindings<R: Resolver + Sync>(
    lists: &LeveledListIndex,
    resolver: &R,
) -> Vec<ListEnchantmentBinding> {
    BindingInferenceEngine::new(resolver).infer(lists)
}
