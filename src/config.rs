use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{MenuError, MenuResult};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub menu: MenuConfig,
    pub strategies: BTreeMap<String, String>,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MenuConfig {
    pub separator_only_is_empty: bool,
    pub catch_panics: bool,
    pub max_submenu_depth: usize,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            separator_only_is_empty: false,
            catch_panics: true,
            max_submenu_depth: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> MenuResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> MenuResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(MenuError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            MenuError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        Self::parse(&raw).map_err(|err| match err {
            MenuError::InvalidArgument(message) => MenuError::invalid_argument(format!(
                "{message} ({})",
                path.display()
            )),
            other => other,
        })
    }

    pub fn parse(raw: &str) -> MenuResult<Self> {
        let parsed = toml::from_str::<Self>(raw).map_err(|source| {
            MenuError::invalid_argument(format!("failed to parse config: {source}"))
        })?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.menu.max_submenu_depth = self.menu.max_submenu_depth.max(1);
        if self.log.filter.trim().is_empty() {
            self.log.filter = LogConfig::default().filter;
        }
        self.strategies
            .retain(|capability, id| !capability.trim().is_empty() && !id.trim().is_empty());
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("CTXMENU_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("ctxmenu").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("ctxmenu")
                .join("config.toml"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("ctxmenu").join("config.toml"));
    }
    None
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::Config;
    use crate::error::MenuError;

    fn unique_temp_path(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("ctxmenu_config_{suffix}_{}_{}", process::id(), nanos));
        path
    }

    #[test]
    fn load_from_path_returns_defaults_for_missing_file() {
        let missing = unique_temp_path("missing.toml");
        let config = Config::load_from_path(&missing).expect("missing config should fallback");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_from_path_applies_partial_overrides_and_sanitizes() {
        let path = unique_temp_path("custom.toml");
        fs::write(
            &path,
            r#"
            [menu]
            separator_only_is_empty = true
            max_submenu_depth = 0

            [strategies]
            search-url = "wikipedia"
            blank = ""

            [log]
            filter = "  "
            "#,
        )
        .expect("config file should be written");

        let config = Config::load_from_path(&path).expect("config should parse");
        assert!(config.menu.separator_only_is_empty);
        assert!(config.menu.catch_panics);
        assert_eq!(config.menu.max_submenu_depth, 1);
        assert_eq!(
            config.strategies.get("search-url").map(String::as_str),
            Some("wikipedia")
        );
        assert!(!config.strategies.contains_key("blank"));
        assert_eq!(config.log.filter, "info");

        fs::remove_file(&path).expect("config file should be removed");
    }

    #[test]
    fn parse_reports_malformed_toml() {
        let err = Config::parse("[menu\nseparator_only_is_empty = 1").expect_err("should fail");
        assert!(matches!(err, MenuError::InvalidArgument(_)));
    }
}
