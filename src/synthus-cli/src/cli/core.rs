//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use synthus::{Domain, ExclusionTarget, FormKey, ItemKind};

#[derive(Parser)]
#[command(name = "synthus")]
#[command(about = "Item classification and enchantment binding generator", long_about = None)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Infer enchantment bindings from leveled lists
    #[command(visible_alias = "b")]
    Bindings {
        /// Records dump (defaults to <data_dir>/records.json)
        #[arg(long)]
        records: Option<PathBuf>,

        /// Leveled lists (defaults to <data_dir>/leveled_lists.json)
        #[arg(long)]
        lists: Option<PathBuf>,

        /// Only scan lists and substitute items from this module
        /// (defaults to the configured export module)
        #[arg(short, long)]
        module: Option<String>,

        /// Scan every module even if an export module is configured
        #[arg(long, conflicts_with = "module")]
        all_modules: bool,

        /// Restrict pairs to this item kind (repeatable)
        #[arg(short, long = "kind")]
        kinds: Vec<ItemKind>,

        /// Exclusion file; its distribution list sets skip whole lists
        #[arg(long)]
        exclusions: Option<PathBuf>,

        /// Generate candidates on one thread
        #[arg(long)]
        sequential: bool,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Classify names against a single-winner catalog
    #[command(visible_alias = "c")]
    Classify {
        /// Catalog domain (e.g. weapon_type, armor_material)
        #[arg(short, long)]
        domain: Domain,

        /// Catalog directory (defaults to <data_dir>/catalogs)
        #[arg(long)]
        catalogs: Option<PathBuf>,

        /// Names to classify
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// List every category of a catalog matching each name
    #[command(name = "match", visible_alias = "m")]
    Match {
        /// Catalog domain (e.g. weapon_modifier)
        #[arg(short, long)]
        domain: Domain,

        /// Catalog directory (defaults to <data_dir>/catalogs)
        #[arg(long)]
        catalogs: Option<PathBuf>,

        /// Names to match
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Classify every item in a records dump across all loaded catalogs
    #[command(visible_alias = "i")]
    Items {
        /// Records dump (defaults to <data_dir>/records.json)
        #[arg(long)]
        records: Option<PathBuf>,

        /// Catalog directory (defaults to <data_dir>/catalogs)
        #[arg(long)]
        catalogs: Option<PathBuf>,

        /// Exclusion file (defaults to <data_dir>/exclusions.json if present)
        #[arg(long)]
        exclusions: Option<PathBuf>,

        /// Enchantment name templates (defaults to <data_dir>/name_bindings.json if present)
        #[arg(long)]
        names: Option<PathBuf>,

        /// Only show items of this kind
        #[arg(short, long)]
        kind: Option<ItemKind>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Check whether a record is excluded under a target
    #[command(visible_alias = "x")]
    Exclusions {
        /// Exclusion file (defaults to <data_dir>/exclusions.json)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Exclusion target (e.g. weapon_reforge)
        #[arg(short, long)]
        target: ExclusionTarget,

        /// Subject record key (e.g. 012EB7:Skyrim.esm)
        subject: FormKey,

        /// Qualifier record key for complex sets
        qualifier: Option<FormKey>,
    },

    /// Configure default settings
    Configure {
        /// Set the data directory
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Set the export module used by binding inference
        #[arg(long)]
        export_module: Option<String>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bindings_kinds() {
        let cli = Cli::try_parse_from([
            "synthus", "bindings", "--kind", "armor", "--kind", "weapon", "--sequential",
        ])
        .unwrap();
        match cli.command {
            Commands::Bindings {
                kinds, sequential, ..
            } => {
                assert_eq!(kinds, vec![ItemKind::Armor, ItemKind::Weapon]);
                assert!(sequential);
            }
            _ => panic!("expected bindings command"),
        }
    }

    #[test]
    fn test_parse_exclusion_query() {
        let cli = Cli::try_parse_from([
            "synthus",
            "exclusions",
            "--target",
            "enchanting_similarity_armor",
            "000010:Skyrim.esm",
            "000020:Skyrim.esm",
        ])
        .unwrap();
        match cli.command {
            Commands::Exclusions {
                target,
                subject,
                qualifier,
                ..
            } => {
                assert_eq!(target, ExclusionTarget::EnchantingSimilarityArmor);
                assert_eq!(subject, FormKey::new(0x10, "Skyrim.esm"));
                assert_eq!(qualifier, Some(FormKey::new(0x20, "Skyrim.esm")));
            }
            _ => panic!("expected exclusions command"),
        }
    }

    #[test]
    fn test_unknown_domain_rejected() {
        assert!(Cli::try_parse_from(["synthus", "classify", "-d", "spells", "Fireball"]).is_err());
    }
}
