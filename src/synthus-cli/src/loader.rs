//! Loading data files into core types, and writing results.
//!
//! Every file may be JSON or YAML, chosen by extension. Catalogs are
//! validated here, at load time; the core assumes validated input.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use synthus::{
    Catalog, Category, Domain, Enchantment, EnchantmentNameBinding, EnchantmentNames,
    ExclusionRegistry, ExclusionSet, ExclusionTarget, Item, LeveledList, LeveledListIndex,
    RecordIndex,
};
use tracing::{debug, info};

pub const CATALOG_DIR: &str = "catalogs";
pub const EXCLUSIONS_FILE: &str = "exclusions.json";
pub const RECORDS_FILE: &str = "records.json";
pub const LISTS_FILE: &str = "leveled_lists.json";
pub const NAME_BINDINGS_FILE: &str = "name_bindings.json";

const STRUCTURED_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

fn format_of(path: &Path) -> Result<Format> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("json") => Ok(Format::Json),
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        _ => bail!(
            "Unsupported data file {} (expected .json, .yaml or .yml)",
            path.display()
        ),
    }
}

/// Read a JSON or YAML file into `T`
pub fn read_structured<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = format_of(path)?;
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    match format {
        Format::Json => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON in {}", path.display())),
        Format::Yaml => serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML in {}", path.display())),
    }
}

/// Load and validate one catalog file
pub fn load_catalog(path: &Path, domain: Domain) -> Result<Catalog> {
    let categories: Vec<Category> = read_structured(path)?;
    let catalog = Catalog::new(domain, categories);
    catalog
        .validate()
        .with_context(|| format!("Invalid catalog {}", path.display()))?;
    debug!(domain = %domain, categories = catalog.len(), "loaded catalog");
    Ok(catalog)
}

/// Catalog file for `domain` in `dir`, trying each supported extension
pub fn catalog_file(dir: &Path, domain: Domain) -> Option<PathBuf> {
    STRUCTURED_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", domain.name(), ext)))
        .find(|p| p.is_file())
}

/// Load the catalog for one domain from `dir`
pub fn load_domain_catalog(dir: &Path, domain: Domain) -> Result<Catalog> {
    match catalog_file(dir, domain) {
        Some(path) => load_catalog(&path, domain),
        None => bail!("No {} catalog found in {}", domain, dir.display()),
    }
}

/// Load every domain catalog present in `dir`; missing domains are skipped
pub fn load_catalog_dir(dir: &Path) -> Result<Vec<Catalog>> {
    if !dir.is_dir() {
        bail!("Catalog directory {} does not exist", dir.display());
    }

    let mut catalogs = Vec::new();
    for &domain in Domain::ALL {
        match catalog_file(dir, domain) {
            Some(path) => catalogs.push(load_catalog(&path, domain)?),
            None => debug!(domain = %domain, "no catalog file"),
        }
    }

    info!(count = catalogs.len(), dir = %dir.display(), "loaded catalogs");
    Ok(catalogs)
}

/// Exclusion file: map of target name to tier-tagged set
pub fn load_exclusions(path: &Path) -> Result<ExclusionRegistry> {
    let raw: BTreeMap<String, ExclusionSet> = read_structured(path)?;
    let mut registry = ExclusionRegistry::new();

    for (name, set) in raw {
        let target: ExclusionTarget = name
            .parse()
            .with_context(|| format!("In exclusion file {}", path.display()))?;
        debug!(target = %target, entries = set.len(), "loaded exclusion set");
        registry
            .insert(target, set)
            .with_context(|| format!("In exclusion file {}", path.display()))?;
    }

    Ok(registry)
}

/// Records dump produced by the record reader
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RecordDump {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub enchantments: Vec<Enchantment>,
}

/// Load a records dump; records appear in load order, later ones override
pub fn load_records(path: &Path) -> Result<RecordIndex> {
    let dump: RecordDump = read_structured(path)?;
    let index = RecordIndex::from_records(dump.items, dump.enchantments);
    info!(
        items = index.item_count(),
        enchantments = index.enchantment_count(),
        "loaded records"
    );
    Ok(index)
}

pub fn load_lists(path: &Path) -> Result<LeveledListIndex> {
    let lists: Vec<LeveledList> = read_structured(path)?;
    let index = LeveledListIndex::from_lists(lists);
    info!(lists = index.len(), "loaded leveled lists");
    Ok(index)
}

pub fn load_name_bindings(path: &Path) -> Result<EnchantmentNames> {
    let bindings: Vec<EnchantmentNameBinding> = read_structured(path)?;
    Ok(EnchantmentNames::from_bindings(bindings))
}

/// Write `value` as pretty JSON to `output`, or stdout when `None`
pub fn write_json<T: Serialize + ?Sized>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote output");
        }
        None => println!("{}", json),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthus::{FormKey, Resolver};

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_catalog_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "weapon_type.json",
            r#"[{"id": "Sword", "substrings": ["Sword"]}, {"id": "Dagger", "nameSubstrings": ["Dagger"]}]"#,
        );
        write(
            dir.path(),
            "armor_material.yaml",
            "- id: Iron\n  substrings: [Iron]\n- id: Steel\n  substrings: [Steel, Imperial]\n",
        );

        let catalogs = load_catalog_dir(dir.path()).unwrap();
        let domains: Vec<Domain> = catalogs.iter().map(|c| c.domain()).collect();
        assert_eq!(domains, vec![Domain::ArmorMaterial, Domain::WeaponType]);
        assert_eq!(catalogs[0].find("Steel").unwrap().substrings.len(), 2);
    }

    #[test]
    fn test_duplicate_category_rejected_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "weapon_material.json",
            r#"[{"id": "Iron", "substrings": ["Iron"]}, {"id": "Iron", "substrings": ["Rusty"]}]"#,
        );
        let err = load_catalog(&path, Domain::WeaponMaterial).unwrap_err();
        assert!(format!("{:#}", err).contains("Duplicate category 'Iron'"));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "weapon_type.txt", "Sword");
        assert!(load_catalog(&path, Domain::WeaponType).is_err());
    }

    #[test]
    fn test_missing_domain_catalog() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_domain_catalog(dir.path(), Domain::AlchemyEffect).is_err());
    }

    #[test]
    fn test_load_exclusions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "exclusions.json",
            r#"{
                "weapon_reforge": {"items": ["000001:Skyrim.esm"]},
                "distribution_weapon_list_regular": {"records": ["000100:Skyrim.esm"]},
                "enchanting_similarity_armor": {"complex": [{"subject": "000002:Skyrim.esm"}]}
            }"#,
        );
        let registry = load_exclusions(&path).unwrap();
        assert_eq!(registry.len(), 3);
        assert!(registry.is_excluded(
            ExclusionTarget::WeaponReforge,
            &FormKey::new(1, "Skyrim.esm"),
            None
        ));
        assert!(registry.is_excluded(
            ExclusionTarget::EnchantingSimilarityArmor,
            &FormKey::new(2, "Skyrim.esm"),
            Some(&FormKey::new(0x99, "Skyrim.esm"))
        ));
    }

    #[test]
    fn test_exclusion_tier_mismatch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "exclusions.json",
            r#"{"distribution_armor": {"items": ["000001:Skyrim.esm"]}}"#,
        );
        assert!(load_exclusions(&path).is_err());

        let unknown = write(dir.path(), "unknown.json", r#"{"shouts": {"items": []}}"#);
        assert!(load_exclusions(&unknown).is_err());
    }

    #[test]
    fn test_load_records_and_lists() {
        let dir = tempfile::tempdir().unwrap();
        let records = write(
            dir.path(),
            RECORDS_FILE,
            r#"{
                "items": [
                    {"key": "000A00:Skyrim.esm", "kind": "armor", "name": "Iron Helmet of Health",
                     "enchantment": "000E00:Skyrim.esm"}
                ],
                "enchantments": [{"key": "000E00:Skyrim.esm", "editor_id": "EnchArmorFortifyHealth01"}]
            }"#,
        );
        let lists = write(
            dir.path(),
            LISTS_FILE,
            r#"[{"key": "000100:Skyrim.esm", "editor_id": "LItemEnchArmorIronHelmet",
                 "entries": [{"reference": "000A00:Skyrim.esm", "count": 1, "level": 1}]}]"#,
        );

        let index = load_records(&records).unwrap();
        let item = index.resolve_item(&FormKey::new(0xA00, "Skyrim.esm")).unwrap();
        assert_eq!(item.name_or_empty(), "Iron Helmet of Health");

        let lists = load_lists(&lists).unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists.lists()[0].entries.len(), 1);
    }

    #[test]
    fn test_write_json_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enchanting").join("listEnchantmentBindings.json");
        write_json(&vec!["a", "b"], Some(&path)).unwrap();
        let back: Vec<String> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, vec!["a", "b"]);
    }
}
