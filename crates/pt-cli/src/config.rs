//! Configuration loading and management.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use pt_core::DEFAULT_HISTORY_WINDOW;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the entity directory and presence logs.
    pub data_dir: PathBuf,
    /// Timezone that stored civil timestamps are interpreted and shown in.
    pub timezone: Tz,
    /// Number of most recent sessions shown in reports.
    pub history_window: usize,
    /// Address the liveness endpoint binds to.
    pub bind: IpAddr,
    /// Port the liveness endpoint listens on.
    pub port: u16,
    /// Where `serve` delivers exported reports.
    pub export_dir: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &self.data_dir)
            .field("timezone", &self.timezone.name())
            .field("history_window", &self.history_window)
            .field("bind", &self.bind)
            .field("port", &self.port)
            .field("export_dir", &self.export_dir)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs_data_path().unwrap_or_else(|| PathBuf::from(".")),
            timezone: chrono_tz::Asia::Kolkata,
            history_window: DEFAULT_HISTORY_WINDOW,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 10_000,
            export_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Hosting platforms announce the port to listen on as PORT
        figment = figment.merge(Env::raw().only(&["PORT"]));

        // Load from environment variables (PT_*)
        figment = figment.merge(Env::prefixed("PT_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for pt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pt"))
}

/// Returns the platform-specific data directory for pt.
///
/// On Linux: `~/.local/share/pt`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("pt"))
}
