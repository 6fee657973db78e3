//! Shared types, error model, and configuration for gitingester.
//!
//! This crate is the foundation depended on by all other gitingester crates.
//! It provides:
//! - [`IngesterError`] — the unified error type
//! - Domain types ([`PatternSet`], [`IngestDigest`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_MAX_FILE_SIZE, DEFAULT_OUTPUT_DIR, DefaultsConfig, LimitsConfig,
    config_dir, config_file_path, load_config, load_config_from,
};
pub use error::{IngesterError, Result};
pub use types::{IngestDigest, PatternSet, format_pattern_set, pattern_set};
