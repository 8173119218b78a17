use std::path::{Path, PathBuf};

use crate::{
    app::favorites::{FAVORITES_FILE, FavoritesStore},
    cli::Cli,
    domain::weather::Units,
    ui::theme::color_enabled,
};


const CONFIG_DIR_NAME: &str = "weather-now";

/// Runtime configuration resolved from flags and the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub geo_url: String,
    pub units: Units,
    pub color: bool,
    pub favorites_path: Option<PathBuf>,
}

impl AppConfig {
    /// With `enable_disk` off, favorites stay in memory.
    pub fn from_cli(cli: &Cli, enable_disk: bool) -> Self {
        let favorites_path = if enable_disk && !cli.no_persist {
            let home = std::env::var_os("HOME").map(PathBuf::from);
            config_dir_from(cli.config_dir.as_deref(), home.as_deref())
                .map(|dir| dir.join(FAVORITES_FILE))
        } else {
            None
        };

        Self {
            api_key: cli
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string),
            api_url: cli.api_url.clone(),
            geo_url: cli.geo_url.clone(),
            units: cli.units.into(),
            color: color_enabled(cli.effective_color_mode()),
            favorites_path,
        }
    }

    #[must_use]
    pub fn favorites_store(&self) -> FavoritesStore {
        match &self.favorites_path {
            Some(path) => FavoritesStore::open(path),
            None => FavoritesStore::in_memory(),
        }
    }
}

/// Explicit directory wins; otherwise `$HOME/.config/weather-now`.
#[must_use]
pub fn config_dir_from(explicit: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = explicit.filter(|dir| !dir.as_os_str().is_empty()) {
        return Some(dir.to_path_buf());
    }
    home.map(|home| home.join(".config").join(CONFIG_DIR_NAME))
}
