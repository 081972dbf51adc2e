//! # synthus
//!
//! Name-based item classification and enchantment binding inference for
//! leveled-list patching.
//!
//! This library provides:
//! - Longest-substring classification of item names against domain catalogs
//!   (materials, types, alchemy effects), with a per-name memoizing cache
//! - All-matches lookup for additive domains (weapon, armor and ammunition
//!   modifiers)
//! - Three-tier exclusion sets gating classification and rule propagation
//! - Inference of cross-module enchantment substitution rules from
//!   leveled lists
//!
//! No file or network I/O happens here; records, catalogs and lists are
//! supplied by the caller.
//!
//! ## Example
//!
//! ```
//! use synthus::{Catalog, Category, Classifier, Domain};
//!
//! let catalog = Catalog::new(
//!     Domain::WeaponType,
//!     vec![
//!         Category::new("Sword", ["Sword"]),
//!         Category::new("Greatsword", ["Greatsword"]),
//!     ],
//! );
//! let classifier = Classifier::new(catalog);
//! assert_eq!(classifier.classify("Steel Greatsword").map(|c| c.id.as_str()), Some("Greatsword"));
//! assert!(classifier.classify("").is_none());
//! ```

pub mod bindings;
pub mod catalog;
pub mod classify;
pub mod exclusion;
pub mod leveled;
pub mod matcher;
pub mod names;
pub mod records;
pub mod store;

#[doc(inline)]
pub use bindings::{
    infer_bindings, BindingInferenceEngine, BindingOptions, EnchantmentReplacer, InferenceStats,
    ListEnchantmentBinding,
};
#[doc(inline)]
pub use catalog::{Catalog, CatalogError, Category, Domain};
#[doc(inline)]
pub use classify::{classify, Classifier};
#[doc(inline)]
pub use exclusion::{
    ComplexExclusion, ExclusionError, ExclusionRegistry, ExclusionSet, ExclusionTarget, Tier,
};
#[doc(inline)]
pub use leveled::{LeveledList, LeveledListEntry, LeveledListIndex};
#[doc(inline)]
pub use matcher::{match_all, MultiMatcher};
#[doc(inline)]
pub use names::{EnchantmentNameBinding, EnchantmentNames};
#[doc(inline)]
pub use records::{Enchantment, FormKey, Item, ItemKind, ModKey, ParseError, RecordIndex, Resolver};
#[doc(inline)]
pub use store::DataStore;
