//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting synthus defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Handle the configure command
pub fn handle(data_dir: Option<PathBuf>, export_module: Option<String>, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if data_dir.is_none() && export_module.is_none() {
        show_usage();
        return Ok(());
    }

    apply(&mut config, data_dir, export_module);
    config.save()?;

    show_config(&config);
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

fn apply(config: &mut Config, data_dir: Option<PathBuf>, export_module: Option<String>) {
    if let Some(dir) = data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(module) = export_module {
        config.export_module = Some(module);
    }
}

fn show_config(config: &Config) {
    match &config.data_dir {
        Some(dir) => println!("Data directory: {}", dir.display()),
        None => println!("No data directory configured"),
    }

    match &config.export_module {
        Some(module) => println!("Export module: {}", module),
        None => println!("No export module configured (all modules are scanned)"),
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

fn show_usage() {
    println!("Usage: synthus configure --data-dir DIR");
    println!("   or: synthus configure --export-module MODULE.esp");
    println!("   or: synthus configure --show");
    println!();
    println!("The data directory holds catalogs/, exclusions.json, records.json,");
    println!("leveled_lists.json and name_bindings.json.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_unset_fields() {
        let mut config = Config {
            data_dir: Some(PathBuf::from("old")),
            export_module: Some("Old.esp".to_string()),
        };

        apply(&mut config, None, Some("New.esp".to_string()));
        assert_eq!(config.data_dir, Some(PathBuf::from("old")));
        assert_eq!(config.export_module.as_deref(), Some("New.esp"));

        apply(&mut config, Some(PathBuf::from("new")), None);
        assert_eq!(config.data_dir, Some(PathBuf::from("new")));
        assert_eq!(config.export_module.as_deref(), Some("New.esp"));
    }

    #[test]
    fn test_show_usage_does_not_panic() {
        show_usage();
        show_config(&Config::default());
    }
}
