use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;
use crate::surface::{PlaneAlignment, PlaneTarget};
use crate::theme::AppTheme;

const CONFIG_FILE: &str = "config.toml";

#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub measurement: MeasurementConfig,
    pub camera: CameraConfig,
    pub theme: ThemeConfig,
    /// Planes available for measuring, standing in for plane detection.
    pub surfaces: Vec<SurfaceConfig>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MeasurementConfig {
    /// Marker sphere radius in meters.
    pub marker_radius: f32,
    /// Side of the connector's square cross-section in meters.
    pub connector_thickness: f32,
    pub plane_target: PlaneTarget,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub distance: f32,
    pub pitch_degrees: f32,
    pub yaw_degrees: f32,
    pub focus: [f32; 3],
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ThemeConfig {
    pub flavor: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SurfaceConfig {
    pub name: String,
    pub center: [f32; 3],
    /// Width and depth in meters.
    pub size: [f32; 2],
    pub alignment: PlaneAlignment,
    #[serde(default)]
    pub yaw_degrees: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            measurement: MeasurementConfig {
                marker_radius: 0.01,
                connector_thickness: 0.003,
                plane_target: PlaneTarget::Estimated,
            },
            camera: CameraConfig {
                distance: 2.5,
                pitch_degrees: 35.0,
                yaw_degrees: 0.0,
                focus: [0.0, 0.5, -0.5],
            },
            theme: ThemeConfig {
                flavor: "mocha".to_string(),
            },
            surfaces: vec![
                SurfaceConfig {
                    name: "Floor".to_string(),
                    center: [0.0, 0.0, 0.0],
                    size: [6.0, 6.0],
                    alignment: PlaneAlignment::Horizontal,
                    yaw_degrees: 0.0,
                },
                SurfaceConfig {
                    name: "Table".to_string(),
                    center: [0.0, 0.75, -1.0],
                    size: [1.2, 0.8],
                    alignment: PlaneAlignment::Horizontal,
                    yaw_degrees: 15.0,
                },
                SurfaceConfig {
                    name: "Wall".to_string(),
                    center: [0.0, 1.5, -3.0],
                    size: [6.0, 3.0],
                    alignment: PlaneAlignment::Vertical,
                    yaw_degrees: 0.0,
                },
            ],
        }
    }
}

fn config_path() -> PathBuf {
    paths::ensure_dir(&paths::config_dir()).join(CONFIG_FILE)
}

pub fn load_config() -> AppConfig {
    load_config_from(&config_path())
}

/// Read config from `path`, writing defaults there if the file is missing.
/// A file that can't be read or parsed is left alone and defaults are used.
pub fn load_config_from(path: &Path) -> AppConfig {
    if path.exists() {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {:?}", path);
                    return config;
                }
                Err(e) => {
                    warn!("Failed to parse config: {}, using defaults", e);
                    return AppConfig::default();
                }
            },
            Err(e) => {
                warn!("Failed to read config: {}, using defaults", e);
                return AppConfig::default();
            }
        }
    }

    let config = AppConfig::default();
    save_config_to(&config, path);
    config
}

pub fn save_config_to(config: &AppConfig, path: &Path) {
    match toml::to_string_pretty(config) {
        Ok(contents) => {
            if let Err(e) = fs::write(path, contents) {
                error!("Failed to write config: {}", e);
            } else {
                info!("Saved config to {:?}", path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Loads `config.toml` and inserts [`AppConfig`] and the configured
/// [`AppTheme`].
pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        let config = load_config();
        app.insert_resource(AppTheme::from_name(&config.theme.flavor))
            .insert_resource(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("plane_measure_tests")
            .join(format!("{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn default_visual_sizes() {
        let config = AppConfig::default();
        assert_eq!(config.measurement.marker_radius, 0.01);
        assert_eq!(config.measurement.connector_thickness, 0.003);
        assert_eq!(config.measurement.plane_target, PlaneTarget::Estimated);
    }

    #[test]
    fn missing_file_writes_defaults() {
        let dir = scratch_dir("missing");
        let path = dir.join(CONFIG_FILE);

        let config = load_config_from(&path);

        assert_eq!(config, AppConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn unparseable_file_falls_back_without_overwriting() {
        let dir = scratch_dir("broken");
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, "measurement = [not toml").unwrap();

        let config = load_config_from(&path);

        assert_eq!(config, AppConfig::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "measurement = [not toml");
    }

    #[test]
    fn reads_surfaces_and_lowercase_enums() {
        let dir = scratch_dir("custom");
        let path = dir.join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
[measurement]
marker_radius = 0.02
connector_thickness = 0.005
plane_target = "existing"

[camera]
distance = 4.0
pitch_degrees = 20.0
yaw_degrees = 90.0
focus = [0.0, 0.0, 0.0]

[theme]
flavor = "latte"

[[surfaces]]
name = "Desk"
center = [1.0, 0.7, 0.0]
size = [1.5, 0.7]
alignment = "horizontal"
"#,
        )
        .unwrap();

        let config = load_config_from(&path);

        assert_eq!(config.measurement.plane_target, PlaneTarget::Existing);
        assert_eq!(config.theme.flavor, "latte");
        assert_eq!(config.surfaces.len(), 1);
        assert_eq!(config.surfaces[0].alignment, PlaneAlignment::Horizontal);
        assert_eq!(config.surfaces[0].yaw_degrees, 0.0);
    }
}
