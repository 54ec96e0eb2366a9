//! Configuration loading and merging
//!
//! Loads JSON config files, deep-merges override layers, and reads the
//! binary's own settings.

pub mod loader;
pub mod merge;
pub mod settings;

pub use loader::{load_config, load_snapshot};
pub use merge::{deep_merge, merge_maps};
pub use settings::{load_settings, ToolSettings};
