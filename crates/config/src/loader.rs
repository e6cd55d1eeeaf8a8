use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::DarkroomConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "darkroom.toml",
    "darkroom.yaml",
    "darkroom.yml",
    "darkroom.json",
];

/// Override for the config directory, set via `set_config_dir()`.
static CONFIG_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

fn override_guard() -> MutexGuard<'static, Option<PathBuf>> {
    CONFIG_DIR_OVERRIDE
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Set a custom config directory. When set, config discovery only looks in
/// this directory (project-local and user-global paths are skipped).
pub fn set_config_dir(path: PathBuf) {
    *override_guard() = Some(path);
}

/// Clear the config directory override, restoring default discovery.
pub fn clear_config_dir() {
    *override_guard() = None;
}

fn config_dir_override() -> Option<PathBuf> {
    override_guard().clone()
}

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<DarkroomConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./darkroom.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/darkroom/darkroom.{toml,yaml,yml,json}` (user-global)
///
/// Returns `DarkroomConfig::default()` if no config file is found or the
/// file fails to parse.
pub fn discover_and_load() -> DarkroomConfig {
    let Some(path) = find_config_file() else {
        debug!("no config file found, using defaults");
        return DarkroomConfig::default();
    };

    debug!(path = %path.display(), "loading config");
    match load_config(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            DarkroomConfig::default()
        },
    }
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    if let Some(dir) = config_dir_override() {
        // Override is set, don't fall through to other locations.
        return first_existing(&dir);
    }

    first_existing(Path::new(".")).or_else(|| config_dir().and_then(|d| first_existing(&d)))
}

fn first_existing(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Returns the config directory: override, or `~/.config/darkroom/`.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = config_dir_override() {
        return Some(dir);
    }
    directories::BaseDirs::new().map(|d| d.home_dir().join(".config").join("darkroom"))
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<DarkroomConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn loads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("darkroom.yaml");
        std::fs::write(
            &path,
            "analysis:\n  provider: clarifai\n  max_suggestions: 3\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.analysis.provider, "clarifai");
        assert_eq!(config.analysis.max_suggestions, 3);
    }

    #[test]
    fn loads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("darkroom.json");
        std::fs::write(&path, r#"{"database": {"url": "sqlite::memory:"}}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("darkroom.ini");
        std::fs::write(&path, "provider=google").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn discovery_respects_override_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("darkroom.toml"),
            "[analysis]\nprovider = \"azure\"\n",
        )
        .unwrap();

        set_config_dir(dir.path().to_path_buf());
        let config = discover_and_load();
        assert_eq!(config_dir(), Some(dir.path().to_path_buf()));
        clear_config_dir();

        assert_eq!(config.analysis.provider, "azure");
    }
}
