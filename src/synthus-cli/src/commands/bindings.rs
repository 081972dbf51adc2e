//! Enchantment binding generation
//!
//! Loads records and leveled lists, runs inference and writes the rule set
//! as JSON for the patcher to consume.

use crate::config::Config;
use crate::loader::{self, LISTS_FILE, RECORDS_FILE};
use anyhow::{Context, Result};
use std::path::PathBuf;
use synthus::{
    BindingInferenceEngine, BindingOptions, ExclusionRegistry, ExclusionSet, ExclusionTarget,
    ItemKind, ModKey,
};
use tracing::info;

/// Record-scope exclusion targets that suppress whole lists
const LIST_EXCLUSION_TARGETS: &[ExclusionTarget] = &[
    ExclusionTarget::DistributionArmor,
    ExclusionTarget::DistributionWeaponListRegular,
    ExclusionTarget::DistributionWeaponsEnchanted,
];

#[derive(Debug, Default)]
pub struct GenerateArgs {
    pub records: Option<PathBuf>,
    pub lists: Option<PathBuf>,
    pub module: Option<String>,
    pub all_modules: bool,
    pub kinds: Vec<ItemKind>,
    pub exclusions: Option<PathBuf>,
    pub sequential: bool,
    pub output: Option<PathBuf>,
}

/// Handle the bindings command
pub fn generate(args: GenerateArgs, config: &Config) -> Result<()> {
    let records_path = config
        .data_file(args.records.as_deref(), RECORDS_FILE)
        .context("No records file given and no data directory configured")?;
    let lists_path = config
        .data_file(args.lists.as_deref(), LISTS_FILE)
        .context("No leveled list file given and no data directory configured")?;

    let records = loader::load_records(&records_path)?;
    let lists = loader::load_lists(&lists_path)?;

    let module = scope_module(&args, config);
    if let Some(module) = &module {
        info!(%module, "restricting inference to module");
    }

    let list_exclusions = match &args.exclusions {
        Some(path) => Some(merge_list_exclusions(&loader::load_exclusions(path)?)),
        None => None,
    };

    let mut engine = BindingInferenceEngine::new(&records)
        .with_options(BindingOptions {
            module,
            kinds: args.kinds,
        })
        .parallel(!args.sequential);
    if let Some(set) = &list_exclusions {
        engine = engine.with_list_exclusions(set);
    }

    let (bindings, stats) = engine.infer_with_stats(&lists);
    info!(
        groups = bindings.len(),
        rules = stats.rules,
        duplicates = stats.duplicates_dropped,
        reciprocal = stats.reciprocal_suppressed,
        "generated enchantment bindings"
    );

    loader::write_json(&bindings, args.output.as_deref())
}

/// Explicit module, else configured export module, unless all modules requested
fn scope_module(args: &GenerateArgs, config: &Config) -> Option<ModKey> {
    if args.all_modules {
        return None;
    }
    args.module
        .clone()
        .or_else(|| config.export_module.clone())
        .map(ModKey::new)
}

/// Union of every list-scoped distribution exclusion set
fn merge_list_exclusions(registry: &ExclusionRegistry) -> ExclusionSet {
    let keys = LIST_EXCLUSION_TARGETS
        .iter()
        .filter_map(|&target| registry.get(target))
        .filter_map(|set| match set {
            ExclusionSet::Records(keys) => Some(keys.iter().cloned()),
            _ => None,
        })
        .flatten();
    ExclusionSet::records(keys)
}
