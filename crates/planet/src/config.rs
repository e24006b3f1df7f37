use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use planetctl::geometry::{self, Wheel};
use planetctl::protocol::SOCKET_PATH;
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::path::PathBuf;
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

/// How items are arranged around the center.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Pie slices filling the whole circle.
    #[default]
    #[strum(to_string = "wedge", serialize = "pie")]
    Wedge,
    /// Round buttons on a small ring.
    #[strum(to_string = "fan", serialize = "buttons")]
    Fan,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MenuConfig {
    pub layout: Layout,
    pub radius: f64,
    pub icon_radius_factor: f64,
    pub icon_size: f64,
    pub font_size: f64,
    pub close_on_select: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            radius: geometry::RADIUS,
            icon_radius_factor: geometry::ICON_RADIUS_FACTOR,
            icon_size: geometry::ICON_SIZE,
            font_size: 16.0,
            close_on_select: true,
        }
    }
}

impl MenuConfig {
    pub fn wheel(&self) -> Wheel {
        Wheel::new(self.radius, self.icon_radius_factor)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &'static str, value: f64| {
            (value.is_finite() && value > 0.0)
                .then_some(())
                .ok_or(ConfigError::Invalid(name, value))
        };
        positive("menu.radius", self.radius)?;
        positive("menu.icon_radius_factor", self.icon_radius_factor)?;
        positive("menu.icon_size", self.icon_size)?;
        positive("menu.font_size", self.font_size)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub socket: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            socket: PathBuf::from(SOCKET_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("{0} must be a positive number, got {1}")]
    Invalid(&'static str, f64),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "planet", "planet").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("PLANET")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.menu.validate()?;
    Ok(config)
}

/// Loads the user config, writing the commented default on first start.
/// Any failure falls back to the defaults.
pub fn load_or_setup() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        match write_default_config() {
            Ok(path) => log::info!("Wrote default config to {}", path.display()),
            Err(e) => log::warn!("Could not write default config: {}", e),
        }
    }

    load_config().unwrap_or_else(|e| {
        log::error!("Failed to load config, using defaults: {}", e);
        Config::default()
    })
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_layout_deserialization() {
        let cases = vec![
            ("\"wedge\"", Layout::Wedge),
            ("\"Wedge\"", Layout::Wedge),
            ("\"PIE\"", Layout::Wedge),
            ("\"fan\"", Layout::Fan),
            ("\"Buttons\"", Layout::Fan),
        ];

        for (json, expected) in cases {
            let deserialized: Layout = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn layout_names_parse_back() {
        for layout in Layout::iter() {
            assert_eq!(layout.to_string().parse::<Layout>().unwrap(), layout);
        }
    }

    #[test]
    fn default_config_file_matches_defaults() {
        let parsed: Config = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn partial_menu_section_keeps_other_defaults() {
        let parsed: Config = serde_json::from_str(r#"{"menu": {"layout": "fan"}}"#).unwrap();
        assert_eq!(parsed.menu.layout, Layout::Fan);
        assert_eq!(parsed.menu.radius, geometry::RADIUS);
        assert_eq!(parsed.server, ServerConfig::default());
    }

    #[test]
    fn non_positive_sizes_are_rejected() {
        let menu = MenuConfig {
            radius: 0.0,
            ..MenuConfig::default()
        };
        assert!(matches!(
            menu.validate(),
            Err(ConfigError::Invalid("menu.radius", _))
        ));
        assert!(MenuConfig::default().validate().is_ok());
    }
}
