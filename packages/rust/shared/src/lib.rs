//! Shared types, error model, and configuration for gradio-md.
//!
//! This crate is the foundation depended on by all other gradio-md crates.
//! It provides:
//! - [`GradioMdError`]: the unified error type
//! - Domain types ([`FileDescriptor`], [`FileRecord`], [`RepoSnapshot`])
//! - Configuration ([`AppConfig`] and its sections, config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_ENV_VAR, FetchConfig, OrderingConfig, OutputConfig, RepositoryConfig,
    config_dir, config_file_path, load_config, load_config_from,
};
pub use error::{GradioMdError, Result};
pub use types::{FileDescriptor, FileRecord, RepoSnapshot};
