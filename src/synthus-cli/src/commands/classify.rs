//! Classification command handlers

use crate::config::Config;
use crate::loader::{self, CATALOG_DIR, EXCLUSIONS_FILE, NAME_BINDINGS_FILE, RECORDS_FILE};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use synthus::{Classifier, DataStore, Domain, Item, ItemKind, MultiMatcher};

fn catalog_dir(config: &Config, explicit: Option<&Path>) -> Result<PathBuf> {
    config
        .data_file(explicit, CATALOG_DIR)
        .context("No catalog directory given and no data directory configured")
}

/// Explicit path, else the default file under the data directory if present
fn optional_data_file(config: &Config, explicit: Option<PathBuf>, name: &str) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path),
        None => config
            .data_file(None, name)
            .filter(|path| path.is_file()),
    }
}

/// Handle the classify command
pub fn classify(
    domain: Domain,
    catalogs: Option<PathBuf>,
    names: &[String],
    config: &Config,
) -> Result<()> {
    if domain.is_additive() {
        bail!(
            "{} is an additive domain; use 'synthus match -d {}' instead",
            domain,
            domain
        );
    }

    let dir = catalog_dir(config, catalogs.as_deref())?;
    let classifier = Classifier::new(loader::load_domain_catalog(&dir, domain)?);

    for name in names {
        let id = classifier.classify(name).map(|c| c.id.as_str());
        println!("{:<40} {}", name, id.unwrap_or("-"));
    }

    Ok(())
}

/// Handle the match command
pub fn match_names(
    domain: Domain,
    catalogs: Option<PathBuf>,
    names: &[String],
    config: &Config,
) -> Result<()> {
    let dir = catalog_dir(config, catalogs.as_deref())?;
    let matcher = MultiMatcher::new(loader::load_domain_catalog(&dir, domain)?);

    for name in names {
        let ids: Vec<&str> = matcher
            .match_all(name)
            .into_iter()
            .map(|c| c.id.as_str())
            .collect();
        let joined = if ids.is_empty() {
            "-".to_string()
        } else {
            ids.join(", ")
        };
        println!("{:<40} {}", name, joined);
    }

    Ok(())
}

#[derive(Debug, Default)]
pub struct ItemsArgs {
    pub records: Option<PathBuf>,
    pub catalogs: Option<PathBuf>,
    pub exclusions: Option<PathBuf>,
    pub names: Option<PathBuf>,
    pub kind: Option<ItemKind>,
    pub json: bool,
}

/// Classification of one item across every loaded domain
#[derive(Debug, Serialize)]
struct ItemReport {
    key: String,
    kind: ItemKind,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    enchanted_name: Option<String>,
    categories: BTreeMap<Domain, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    modifiers: BTreeMap<Domain, Vec<String>>,
}

fn report(store: &DataStore, item: &Item) -> ItemReport {
    let mut categories = BTreeMap::new();
    let mut modifiers = BTreeMap::new();

    // Alchemy effects classify effect names, not items
    for domain in store
        .domains()
        .into_iter()
        .filter(|d| *d != Domain::AlchemyEffect)
    {
        if domain.is_additive() {
            let ids: Vec<String> = store
                .modifiers(domain, item)
                .into_iter()
                .map(|c| c.id.clone())
                .collect();
            if !ids.is_empty() {
                modifiers.insert(domain, ids);
            }
        } else if let Some(category) = store.classify_item(domain, item) {
            categories.insert(domain, category.id.clone());
        }
    }

    ItemReport {
        key: item.key.to_string(),
        kind: item.kind,
        name: item.name_or_empty().to_string(),
        enchanted_name: item
            .is_enchanted()
            .then(|| store.enchanted_name(item))
            .filter(|n| n != item.name_or_empty()),
        categories,
        modifiers,
    }
}

/// Handle the items command
pub fn items(args: ItemsArgs, config: &Config) -> Result<()> {
    let records_path = config
        .data_file(args.records.as_deref(), RECORDS_FILE)
        .context("No records file given and no data directory configured")?;
    let records = loader::load_records(&records_path)?;

    let dir = catalog_dir(config, args.catalogs.as_deref())?;
    let mut store = DataStore::new().with_catalogs(loader::load_catalog_dir(&dir)?);

    if let Some(path) = optional_data_file(config, args.exclusions, EXCLUSIONS_FILE) {
        store = store.with_exclusions(loader::load_exclusions(&path)?);
    }
    if let Some(path) = optional_data_file(config, args.names, NAME_BINDINGS_FILE) {
        store = store.with_enchantment_names(loader::load_name_bindings(&path)?);
    }

    let reports: Vec<ItemReport> = records
        .items()
        .into_iter()
        .filter(|item| args.kind.map_or(true, |kind| item.kind == kind))
        .map(|item| report(&store, item))
        .collect();

    if args.json {
        return loader::write_json(&reports, None);
    }

    if reports.is_empty() {
        println!("No items found");
        return Ok(());
    }

    println!("{:<24} {:<11} {:<36} Categories", "Key", "Kind", "Name");
    println!("{}", "-".repeat(100));
    for r in &reports {
        let mut tags: Vec<String> = r
            .categories
            .iter()
            .map(|(domain, id)| format!("{}={}", domain, id))
            .collect();
        tags.extend(
            r.modifiers
                .iter()
                .map(|(domain, ids)| format!("{}=[{}]", domain, ids.join(","))),
        );

        let name = r.enchanted_name.as_deref().unwrap_or(&r.name);
        println!(
            "{:<24} {:<11} {:<36} {}",
            r.key,
            r.kind.name(),
            name,
            if tags.is_empty() { "-".to_string() } else { tags.join(" ") }
        );
    }
    println!("\n{} items", reports.len());

    Ok(())
}
