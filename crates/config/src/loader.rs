use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::schema::ShoalConfig;

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["shoal.toml", "shoal.json"];

/// Load config from the given path (TOML or JSON, by extension).
pub fn load_config(path: &Path) -> anyhow::Result<ShoalConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    parse_config(&raw, path)
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<ShoalConfig> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(raw)
            .map_err(|e| anyhow::anyhow!("invalid JSON in {}: {e}", path.display()))
    } else {
        toml::from_str(raw).map_err(|e| anyhow::anyhow!("invalid TOML in {}: {e}", path.display()))
    }
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./shoal.{toml,json}` (project-local)
/// 2. `~/.config/shoal/shoal.{toml,json}` (user-global)
///
/// Returns `ShoalConfig::default()` if no config file is found or the file
/// fails to parse.
pub fn discover_and_load() -> ShoalConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    ShoalConfig::default()
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "shoal") {
        let config_dir = dirs.config_dir();
        for name in CONFIG_FILENAMES {
            let p = config_dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

/// Returns the user-global config directory (`~/.config/shoal/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "shoal").map(|d| d.config_dir().to_path_buf())
}
