//! Application configuration for gradio-md.
//!
//! Built once at startup and passed by reference everywhere. Values come from
//! the built-in defaults, optionally overridden by a TOML file located via
//! `$GRADIO_MD_CONFIG` or `~/.gradio-md/gradio-md.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{GradioMdError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "gradio-md.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".gradio-md";

/// Env var naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "GRADIO_MD_CONFIG";

// ---------------------------------------------------------------------------
// Config structs (matching gradio-md.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Which repository and directory to aggregate.
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Download behaviour.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Shape of the assembled document.
    #[serde(default)]
    pub output: OutputConfig,

    /// Order resolution.
    #[serde(default)]
    pub ordering: OrderingConfig,
}

/// `[repository]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Repository owner (user or organisation).
    #[serde(default = "default_owner")]
    pub owner: String,

    /// Repository name.
    #[serde(default = "default_repo_name")]
    pub name: String,

    /// Directory (relative to the repository root) holding the guides.
    #[serde(default = "default_guides_path")]
    pub guides_path: String,

    /// File suffixes treated as markdown.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// REST API root.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Raw file content root.
    #[serde(default = "default_raw_base_url")]
    pub raw_base_url: String,

    /// Env vars checked, in order, for a bearer token.
    #[serde(default = "default_token_env_vars")]
    pub token_env_vars: Vec<String>,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            name: default_repo_name(),
            guides_path: default_guides_path(),
            extensions: default_extensions(),
            api_base_url: default_api_base_url(),
            raw_base_url: default_raw_base_url(),
            token_env_vars: default_token_env_vars(),
        }
    }
}

fn default_owner() -> String {
    "gradio-app".into()
}
fn default_repo_name() -> String {
    "gradio".into()
}
fn default_guides_path() -> String {
    "guides".into()
}
fn default_extensions() -> Vec<String> {
    vec![".md".into(), ".mdx".into()]
}
fn default_api_base_url() -> String {
    "https://api.github.com".into()
}
fn default_raw_base_url() -> String {
    "https://raw.githubusercontent.com".into()
}
fn default_token_env_vars() -> Vec<String> {
    vec!["GITHUB_TOKEN".into(), "GH_TOKEN".into()]
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum number of files downloaded at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Redirect hops followed before a request is abandoned.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_concurrency() -> usize {
    6
}
fn default_max_redirects() -> usize {
    5
}
fn default_user_agent() -> String {
    "gradio-guides-aggregator".into()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File name used when the output argument is omitted or is a directory.
    #[serde(default = "default_filename")]
    pub default_filename: String,

    /// Prefix each section with a `<!-- Source: path -->` line.
    #[serde(default = "default_true")]
    pub include_source_notes: bool,

    /// Drop each file's frontmatter block from the output.
    #[serde(default = "default_true")]
    pub strip_frontmatter: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_filename: default_filename(),
            include_source_notes: true,
            strip_frontmatter: true,
        }
    }
}

fn default_filename() -> String {
    "gradio.md".into()
}
fn default_true() -> bool {
    true
}

/// `[ordering]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderingConfig {
    /// Frontmatter keys consulted for an order value, highest priority first.
    #[serde(default = "default_order_keys")]
    pub order_keys: Vec<String>,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            order_keys: default_order_keys(),
        }
    }
}

fn default_order_keys() -> Vec<String> {
    vec![
        "order".into(),
        "weight".into(),
        "sidebar_position".into(),
        "position".into(),
    ]
}

// ---------------------------------------------------------------------------
// Accessors and validation
// ---------------------------------------------------------------------------

impl RepositoryConfig {
    /// Parsed REST API root.
    pub fn api_base(&self) -> Result<Url> {
        parse_base_url("api_base_url", &self.api_base_url)
    }

    /// Parsed raw content root.
    pub fn raw_base(&self) -> Result<Url> {
        parse_base_url("raw_base_url", &self.raw_base_url)
    }

    /// Guides directory without leading/trailing slashes.
    pub fn guides_dir(&self) -> &str {
        self.guides_path.trim_matches('/')
    }

    /// Look up a bearer token from the process environment.
    pub fn resolve_token(&self) -> Option<String> {
        self.resolve_token_with(|name| std::env::var(name).ok())
    }

    /// Look up a bearer token through `lookup`; the first non-empty value wins.
    pub fn resolve_token_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.token_env_vars
            .iter()
            .filter_map(|name| lookup(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }
}

fn parse_base_url(field: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| GradioMdError::config(format!("invalid {field} '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(GradioMdError::config(format!(
            "{field} '{raw}' cannot be used as a base URL"
        )));
    }
    Ok(url)
}

impl AppConfig {
    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.concurrency == 0 {
            return Err(GradioMdError::config("fetch.concurrency must be at least 1"));
        }
        if self.ordering.order_keys.is_empty() {
            return Err(GradioMdError::config("ordering.order_keys must not be empty"));
        }
        if self.repository.extensions.is_empty() {
            return Err(GradioMdError::config("repository.extensions must not be empty"));
        }
        if self.output.default_filename.trim().is_empty() {
            return Err(GradioMdError::config("output.default_filename must not be empty"));
        }
        if self.repository.guides_dir().is_empty() {
            return Err(GradioMdError::config("repository.guides_path must not be empty"));
        }
        self.repository.api_base()?;
        self.repository.raw_base()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.gradio-md/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| GradioMdError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the default config file (`~/.gradio-md/gradio-md.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load and validate the application config.
///
/// An explicit `$GRADIO_MD_CONFIG` must exist; the home-directory file is
/// optional and defaults are used when it is missing.
pub fn load_config() -> Result<AppConfig> {
    let explicit = std::env::var_os(CONFIG_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    load_config_with(explicit.as_deref(), config_file_path().ok().as_deref())
}

/// Resolve and validate the config from an explicit path or the default file.
fn load_config_with(explicit: Option<&Path>, default_path: Option<&Path>) -> Result<AppConfig> {
    let config = match (explicit, default_path) {
        (Some(path), _) => load_config_from(path)?,
        (None, Some(path)) if path.exists() => load_config_from(path)?,
        _ => {
            tracing::debug!("config file not found, using defaults");
            AppConfig::default()
        }
    };

    config.validate()?;
    Ok(config)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| GradioMdError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        GradioMdError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}
