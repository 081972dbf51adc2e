//! Exclusion query command

use crate::config::Config;
use crate::loader::{self, EXCLUSIONS_FILE};
use anyhow::{Context, Result};
use std::path::PathBuf;
use synthus::{ExclusionRegistry, ExclusionTarget, FormKey};

pub fn check(
    file: Option<PathBuf>,
    target: ExclusionTarget,
    subject: &FormKey,
    qualifier: Option<&FormKey>,
    config: &Config,
) -> Result<()> {
    let path = config
        .data_file(file.as_deref(), EXCLUSIONS_FILE)
        .context("No exclusion file given and no data directory configured")?;
    let registry = loader::load_exclusions(&path)?;

    println!("{}", describe(&registry, target, subject, qualifier));
    Ok(())
}

fn describe(
    registry: &ExclusionRegistry,
    target: ExclusionTarget,
    subject: &FormKey,
    qualifier: Option<&FormKey>,
) -> String {
    let Some(set) = registry.get(target) else {
        return format!("{} is not excluded ({} has no exclusion set)", subject, target);
    };

    let verdict = if set.is_excluded(subject, qualifier) {
        "is excluded"
    } else {
        "is not excluded"
    };

    let tier = set.tier();
    match qualifier {
        Some(q) => format!("{} {} from {} with {} ({} tier)", subject, verdict, target, q, tier),
        None => format!("{} {} from {} ({} tier)", subject, verdict, target, tier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthus::{ComplexExclusion, ExclusionSet};

    fn key(id: u32) -> FormKey {
        FormKey::new(id, "Skyrim.esm")
    }

    #[test]
    fn test_describe() {
        let mut registry = ExclusionRegistry::new();
        registry
            .insert(ExclusionTarget::Potion, ExclusionSet::items([key(1)]))
            .unwrap();
        registry
            .insert(
                ExclusionTarget::EnchantingSimilarityWeapon,
                ExclusionSet::complex([ComplexExclusion::new(key(2), Some(key(3)))]),
            )
            .unwrap();

        assert_eq!(
            describe(&registry, ExclusionTarget::Potion, &key(1), None),
            "000001:Skyrim.esm is excluded from potion (simple tier)"
        );
        let missing = describe(&registry, ExclusionTarget::Npc, &key(1), None);
        assert!(missing.contains("no exclusion set"));

        let hit = describe(
            &registry,
            ExclusionTarget::EnchantingSimilarityWeapon,
            &key(2),
            Some(&key(3)),
        );
        assert!(hit.contains("is excluded"));

        let miss = describe(
            &registry,
            ExclusionTarget::EnchantingSimilarityWeapon,
            &key(2),
            Some(&key(4)),
        );
        assert!(miss.contains("is not excluded"));
    }
}
