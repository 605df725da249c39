use serde::Deserialize;
use std::fs;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub raycast: RaycastConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default = "default_window_title")]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct MapConfig {
    /// Cells per side of the square map.
    #[serde(default = "default_map_size")]
    pub size: i32,
    /// Scale of the map when minimized to the corner in play mode.
    #[serde(default = "default_map_scale")]
    pub scale: f32,
    #[serde(default = "default_show_grid")]
    pub show_grid: bool,
    #[serde(default = "default_save_path")]
    pub save_path: String,
}

#[derive(Debug, Deserialize)]
pub struct RaycastConfig {
    /// Field of view in degrees, between 1 and 360.
    #[serde(default = "default_fov")]
    pub fov: f32,
    /// Width of rendered screen columns in pixels.
    #[serde(default = "default_column_width")]
    pub column_width: i32,
    /// Maximum rendering distance in cells.
    #[serde(default = "default_visible_distance")]
    pub visible_distance: f32,
    /// Display rays as connected points on the map (debug).
    #[serde(default)]
    pub ray_points_mode: bool,
    /// Show vertical dividers between screen columns.
    #[serde(default)]
    pub divide_columns: bool,
}

#[derive(Debug, Deserialize)]
pub struct PlayerConfig {
    /// Player size compared to cell size.
    #[serde(default = "default_radius_scale")]
    pub radius_scale: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default = "default_turn_speed")]
    pub turn_speed: f32,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_enable_edit_log")]
    pub enable_edit_log: bool,
    #[serde(default = "default_edit_log_path")]
    pub edit_log_path: String,
}

// Default values
fn default_width() -> i32 { 1366 }
fn default_height() -> i32 { 768 }
fn default_window_title() -> String { "Raybox - Raycasting Sandbox".to_string() }
fn default_map_size() -> i32 { 20 }
fn default_map_scale() -> f32 { 0.25 }
fn default_show_grid() -> bool { true }
fn default_save_path() -> String { "map_save.json".to_string() }
fn default_fov() -> f32 { 70.0 }
fn default_column_width() -> i32 { 10 }
fn default_visible_distance() -> f32 { 20.0 }
fn default_radius_scale() -> f32 { 0.5 }
fn default_speed() -> f32 { 160.0 }
fn default_turn_speed() -> f32 { 120.0 }
fn default_enable_edit_log() -> bool { false }
fn default_edit_log_path() -> String { "edit_log.json".to_string() }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_window_title(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            size: default_map_size(),
            scale: default_map_scale(),
            show_grid: default_show_grid(),
            save_path: default_save_path(),
        }
    }
}

impl Default for RaycastConfig {
    fn default() -> Self {
        Self {
            fov: default_fov(),
            column_width: default_column_width(),
            visible_distance: default_visible_distance(),
            ray_points_mode: false,
            divide_columns: false,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius_scale: default_radius_scale(),
            speed: default_speed(),
            turn_speed: default_turn_speed(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_edit_log: default_enable_edit_log(),
            edit_log_path: default_edit_log_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            map: MapConfig::default(),
            raycast: RaycastConfig::default(),
            player: PlayerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Self {
        match fs::read_to_string("config.toml") {
            Ok(contents) => {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        println!("Loaded configuration from config.toml");
                        config
                    }
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config.toml: {}", e);
                        eprintln!("Using default configuration");
                        Config::default()
                    }
                }
            }
            Err(_) => {
                println!("No config.toml found, using default configuration");
                Config::default()
            }
        }
    }
}
