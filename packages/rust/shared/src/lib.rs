//! Shared types, error model, and configuration for mdnotes.
//!
//! This crate is the foundation depended on by all other mdnotes crates.
//! It provides:
//! - [`MdNotesError`], the unified error type
//! - Domain types ([`DocumentDescriptor`], [`Origin`])
//! - Configuration ([`AppConfig`], [`DiscoveryOptions`], config loading)
//! - Text helpers shared by discovery and rendering ([`escape_html`], [`describe`])

pub mod config;
pub mod describe;
pub mod error;
pub mod escape;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DiscoveryConfig, DiscoveryOptions, HostApiConfig, RenderConfig, RenderEngine,
    SiteConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use describe::describe;
pub use error::{MdNotesError, Result};
pub use escape::escape_html;
pub use types::{DOCUMENT_EXTENSION, DocumentDescriptor, Origin};
