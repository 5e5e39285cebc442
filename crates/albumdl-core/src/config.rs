use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Catalog service endpoint, credentials and request limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Scheme and host of the catalog service, without trailing path.
    pub base_url: String,
    pub user_agent: String,
    /// Raw `Cookie` header value carrying the session, if the catalog needs one.
    pub cookie: Option<String>,
    /// Tracks requested per list page.
    pub page_size: u32,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Extra request headers sent to the catalog (e.g. `Referer`).
    pub headers: HashMap<String, String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.ximalaya.com".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) albumdl/0.1".to_string(),
            cookie: None,
            page_size: 100,
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            headers: HashMap::new(),
        }
    }
}

impl CatalogConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Audio streaming limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Extension used when the audio URL does not carry a usable one.
    pub default_extension: String,
    pub connect_timeout_secs: u64,
    /// Abort when throughput stays below this many bytes/s ...
    pub low_speed_limit_bytes: u32,
    /// ... for this many seconds.
    pub low_speed_time_secs: u64,
    /// Upper bound on a single track transfer.
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            default_extension: "m4a".to_string(),
            connect_timeout_secs: 30,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            timeout_secs: 3600,
        }
    }
}

/// Global configuration loaded from `~/.config/albumdl/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumdlConfig {
    /// Root directory for album folders (None = current directory).
    pub output_dir: Option<PathBuf>,
    pub catalog: CatalogConfig,
    pub download: DownloadConfig,
}

/// Environment variables consulted after the config file.
pub const ENV_BASE_URL: &str = "ALBUMDL_BASE_URL";
pub const ENV_COOKIE: &str = "ALBUMDL_COOKIE";
pub const ENV_OUTPUT_DIR: &str = "ALBUMDL_OUTPUT_DIR";

impl AlbumdlConfig {
    /// Overlay non-empty values from `lookup` (normally `std::env::var`).
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_BASE_URL) {
            self.catalog.base_url = v;
        }
        if let Some(v) = get(ENV_COOKIE) {
            self.catalog.cookie = Some(v);
        }
        if let Some(v) = get(ENV_OUTPUT_DIR) {
            self.output_dir = Some(PathBuf::from(v));
        }
    }

    /// Output root: explicit override, then configured value, then `cwd`.
    pub fn output_root(&self, override_dir: Option<&Path>, cwd: &Path) -> PathBuf {
        override_dir
            .map(Path::to_path_buf)
            .or_else(|| self.output_dir.clone())
            .unwrap_or_else(|| cwd.to_path_buf())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("albumdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AlbumdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AlbumdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit path; the file must exist.
pub fn load_from_path(path: &Path) -> Result<AlbumdlConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: AlbumdlConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
