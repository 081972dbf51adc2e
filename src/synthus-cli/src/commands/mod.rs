//! Command handlers for the synthus CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod bindings;
pub mod classify;
pub mod configure;
pub mod exclusions;
