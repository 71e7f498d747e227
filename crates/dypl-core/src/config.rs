use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Desktop browser user agent sent on every outbound request and by the browser context.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";

/// Playback endpoint; the content locator is appended as `video_id`.
pub const DEFAULT_VIDEO_ENDPOINT: &str = "https://www.douyin.com/aweme/v1/play/";

/// Path fragment identifying the detail API response during interception.
pub const DEFAULT_DETAIL_API_FRAGMENT: &str = "aweme/v1/web/aweme/detail/";

/// Headless browser parameters (optional `[browser]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run Chrome without a window.
    pub headless: bool,
    /// Explicit Chrome/Chromium binary; autodetected when missing.
    #[serde(default)]
    pub chrome_path: Option<PathBuf>,
    /// Budget for loading the share page.
    pub navigation_timeout_secs: u64,
    /// Extra wait after the page settles, for detail requests issued late.
    pub grace_period_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_path: None,
            navigation_timeout_secs: 30,
            grace_period_secs: 3,
        }
    }
}

impl BrowserConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }
}

/// Global configuration loaded from `~/.config/dypl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DyplConfig {
    /// Folder holding `MP4/`, `albumArt/` and `playlist.json`. None = current directory.
    #[serde(default)]
    pub library_dir: Option<PathBuf>,
    pub user_agent: String,
    pub video_endpoint: String,
    pub detail_api_fragment: String,
    /// Overall timeout for one video transfer.
    pub video_timeout_secs: u64,
    /// Overall timeout for one cover transfer.
    pub cover_timeout_secs: u64,
    #[serde(default)]
    pub browser: BrowserConfig,
}

impl Default for DyplConfig {
    fn default() -> Self {
        Self {
            library_dir: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            video_endpoint: DEFAULT_VIDEO_ENDPOINT.to_string(),
            detail_api_fragment: DEFAULT_DETAIL_API_FRAGMENT.to_string(),
            video_timeout_secs: 60,
            cover_timeout_secs: 30,
            browser: BrowserConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dypl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DyplConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DyplConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: DyplConfig = toml::from_str(&data)?;
    Ok(cfg)
}
