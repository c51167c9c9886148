//! Application configuration for mdnotes.
//!
//! User config lives at `~/.mdnotes/mdnotes.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{MdNotesError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "mdnotes.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".mdnotes";

// ---------------------------------------------------------------------------
// Config structs (matching mdnotes.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the documents are served from.
    #[serde(default)]
    pub site: SiteConfig,

    /// Discovery cascade settings.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Hosting-provider API tier settings.
    #[serde(default)]
    pub host_api: HostApiConfig,

    /// Markdown rendering settings.
    #[serde(default)]
    pub render: RenderConfig,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base URL that relative document paths resolve against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// URL the viewer itself is hosted at, used to recognize the hosting
    /// provider. Falls back to `base_url` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_url: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/".into()
}

/// `[discovery]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Canonical documents directory (no trailing slash).
    #[serde(default = "default_documents_dir")]
    pub documents_dir: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Directories probed by the brute-force tier, in order. `""` is the site root.
    #[serde(default = "default_probe_directories")]
    pub probe_directories: Vec<String>,

    /// File names probed in every directory, case-sensitive, in order.
    #[serde(default = "default_probe_files")]
    pub probe_files: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            documents_dir: default_documents_dir(),
            timeout_secs: default_timeout_secs(),
            probe_directories: default_probe_directories(),
            probe_files: default_probe_files(),
        }
    }
}

fn default_documents_dir() -> String {
    "docs".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_probe_directories() -> Vec<String> {
    ["docs/", "notes/", "markdown/", ""]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_probe_files() -> Vec<String> {
    [
        "README.md",
        "readme.md",
        "index.md",
        "demo.md",
        "aliases.md",
        "functions.md",
        "zshrc.md",
        "AceMagic1.md",
        "test.md",
        "example.md",
        "guide.md",
        "tutorial.md",
        "notes.md",
        "cheatsheet.md",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// `[host_api]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostApiConfig {
    /// Host suffix that enables the API tier (e.g. `github.io`).
    #[serde(default = "default_hosting_suffix")]
    pub hosting_suffix: String,

    /// Base URL of the contents API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Repository name queried under the owner.
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Owner used when none can be read from the page URL.
    #[serde(default = "default_owner")]
    pub default_owner: String,
}

impl Default for HostApiConfig {
    fn default() -> Self {
        Self {
            hosting_suffix: default_hosting_suffix(),
            api_base: default_api_base(),
            repository: default_repository(),
            default_owner: default_owner(),
        }
    }
}

fn default_hosting_suffix() -> String {
    "github.io".into()
}
fn default_api_base() -> String {
    "https://api.github.com".into()
}
fn default_repository() -> String {
    "md_notes".into()
}
fn default_owner() -> String {
    "nali-v1".into()
}

/// Which Markdown engine renders documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderEngine {
    /// Conformant pulldown-cmark renderer, with the built-in converter as fallback.
    #[default]
    Pulldown,
    /// Built-in converter only.
    Builtin,
}

/// `[render]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub engine: RenderEngine,
}

// ---------------------------------------------------------------------------
// Discovery options (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime discovery configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Base URL documents are fetched relative to (always ends in `/`).
    pub base_url: Url,
    /// URL the viewer is hosted at.
    pub page_url: Url,
    /// Canonical documents directory.
    pub documents_dir: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Brute-force probe directories.
    pub probe_directories: Vec<String>,
    /// Brute-force probe file names.
    pub probe_files: Vec<String>,
    /// Host-API tier settings.
    pub host_api: HostApiConfig,
}

impl DiscoveryOptions {
    /// Build options for a site rooted at `base_url`, with every other
    /// setting at its default.
    pub fn for_site(base_url: &str) -> Result<Self> {
        let mut config = AppConfig::default();
        config.site.base_url = base_url.to_string();
        Self::try_from(&config)
    }

    /// Replace the hosting page URL (used for host detection only).
    pub fn with_page_url(mut self, page_url: Url) -> Self {
        self.page_url = page_url;
        self
    }
}

impl TryFrom<&AppConfig> for DiscoveryOptions {
    type Error = MdNotesError;

    fn try_from(config: &AppConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.site.base_url)?;
        let page_url = match &config.site.page_url {
            Some(raw) => Url::parse(raw)
                .map_err(|e| MdNotesError::config(format!("invalid page_url '{raw}': {e}")))?,
            None => base_url.clone(),
        };

        Ok(Self {
            base_url,
            page_url,
            documents_dir: config
                .discovery
                .documents_dir
                .trim_matches('/')
                .to_string(),
            timeout: Duration::from_secs(config.discovery.timeout_secs),
            probe_directories: config.discovery.probe_directories.clone(),
            probe_files: config.discovery.probe_files.clone(),
            host_api: config.host_api.clone(),
        })
    }
}

/// Parse a base URL, forcing a trailing slash so relative joins stay inside it.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url =
        Url::parse(raw).map_err(|e| MdNotesError::config(format!("invalid base_url '{raw}': {e}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.mdnotes/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| MdNotesError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.mdnotes/mdnotes.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| MdNotesError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| MdNotesError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| MdNotesError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| MdNotesError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| MdNotesError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("AceMagic1.md"));
        assert!(toml_str.contains("engine = \"pulldown\""));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.discovery.documents_dir, "docs");
        assert_eq!(parsed.discovery.probe_files.len(), 14);
        assert_eq!(parsed.discovery.probe_directories.len(), 4);
        assert_eq!(parsed.host_api.repository, "md_notes");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[site]
base_url = "https://notes.example.com/viewer"

[render]
engine = "builtin"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.render.engine, RenderEngine::Builtin);
        assert_eq!(config.discovery.timeout_secs, 10);
        assert_eq!(config.host_api.hosting_suffix, "github.io");
    }

    #[test]
    fn discovery_options_from_app_config() {
        let mut app = AppConfig::default();
        app.site.base_url = "https://notes.example.com/viewer".into();
        app.discovery.documents_dir = "/docs/".into();

        let opts = DiscoveryOptions::try_from(&app).expect("options");
        assert_eq!(opts.base_url.as_str(), "https://notes.example.com/viewer/");
        assert_eq!(opts.page_url, opts.base_url);
        assert_eq!(opts.documents_dir, "docs");
        assert_eq!(opts.timeout, Duration::from_secs(10));
    }

    #[test]
    fn discovery_options_reject_bad_url() {
        let err = DiscoveryOptions::for_site("not a url").unwrap_err();
        assert!(err.to_string().contains("invalid base_url"));
    }

    #[test]
    fn explicit_page_url_is_kept() {
        let mut app = AppConfig::default();
        app.site.page_url = Some("https://alice.github.io/md_notes/".into());
        let opts = DiscoveryOptions::try_from(&app).expect("options");
        assert_eq!(opts.page_url.host_str(), Some("alice.github.io"));
        assert_eq!(opts.base_url.as_str(), "http://localhost:8000/");
    }
}
