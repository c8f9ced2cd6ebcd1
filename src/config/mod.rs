//! Configuration file management
//!
//! Loads TOML configuration files and provides visual settings.
//! Default config path: ~/.config/glyphgrid/config.toml

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    CAMERA_DISTANCE, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, DEFAULT_CELL_SIZE,
    DEFAULT_CHAR_WIDTH, DEFAULT_FONT_FAMILY, DEFAULT_GLYPH_COLOR, DEFAULT_GRID_COLS,
    DEFAULT_NUM_CHARS, DEFAULT_TEXT, DEFAULT_WIREFRAME_COLOR,
};
use crate::font::FontRequest;
use crate::scene::PerspectiveCamera;
use crate::utils::color::parse_hex_color_to_rgba8;
use crate::visual::Material;

/// Environment variable selecting the config file
pub const CONFIG_ENV: &str = "GLYPHGRID_CONFIG";

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mesh and atlas grid
    pub grid: GridConfig,
    /// Text and font
    pub text: TextConfig,
    /// Colors
    pub appearance: AppearanceConfig,
    /// Camera
    pub camera: CameraConfig,
    /// Output files
    pub output: OutputConfig,
}

/// Mesh and atlas grid settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of character quads
    pub num_chars: u32,
    /// Quad width in world units
    pub char_width: f32,
    /// Atlas cells per row
    pub grid_cols: u32,
    /// Atlas cell size in pixels
    pub cell_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            num_chars: DEFAULT_NUM_CHARS,
            char_width: DEFAULT_CHAR_WIDTH,
            grid_cols: DEFAULT_GRID_COLS,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

/// Text settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Characters baked into the atlas
    pub content: String,
    /// Font family name
    pub family: String,
    /// Font file for the family (searches font directories if empty)
    pub font_path: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            content: DEFAULT_TEXT.to_string(),
            family: DEFAULT_FONT_FAMILY.to_string(),
            font_path: String::new(),
        }
    }
}

impl TextConfig {
    /// Load request for the configured family
    pub fn font_request(&self) -> FontRequest {
        let request = FontRequest::family(self.family.clone());
        if self.font_path.is_empty() {
            request
        } else {
            request.with_path(expand_path(&self.font_path))
        }
    }
}

/// Color settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Mesh color (RRGGBB or RRGGBBAA)
    pub wireframe_color: String,
    /// Draw mesh edges only
    pub wireframe: bool,
    /// Glyph fill color in the atlas (RRGGBB)
    pub glyph_color: String,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            wireframe_color: DEFAULT_WIREFRAME_COLOR.to_string(),
            wireframe: true,
            glyph_color: DEFAULT_GLYPH_COLOR.to_string(),
        }
    }
}

impl AppearanceConfig {
    pub fn material(&self) -> Material {
        Material::from_hex(&self.wireframe_color, self.wireframe)
    }

    /// Glyph fill as RGBA8 (white on invalid input)
    pub fn glyph_rgba(&self) -> [u8; 4] {
        parse_hex_color_to_rgba8(&self.glyph_color)
    }
}

/// Camera settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the origin along +Z
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: CAMERA_FOV_DEG,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            distance: CAMERA_DISTANCE,
        }
    }
}

impl CameraConfig {
    pub fn camera(&self) -> PerspectiveCamera {
        PerspectiveCamera {
            fov_deg: self.fov,
            near: self.near,
            far: self.far,
            position: [0.0, 0.0, self.distance],
            ..PerspectiveCamera::default()
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for baked atlas images
    pub atlas_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            atlas_dir: ".".to_string(),
        }
    }
}

impl OutputConfig {
    /// Timestamped atlas file path inside `atlas_dir`
    pub fn atlas_path(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        expand_path(&self.atlas_dir).join(format!("glyphgrid_atlas_{}.png", timestamp))
    }
}

impl Config {
    /// System-wide config path
    const SYSTEM_CONFIG_PATH: &'static str = "/etc/glyphgrid/config.toml";

    /// Get the path that would be used for loading config
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. GLYPHGRID_CONFIG environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        // 2. User config: ~/.config/glyphgrid/config.toml
        if let Some(config_path) = default_config_path() {
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // 3. System config: /etc/glyphgrid/config.toml
        let system_config = Path::new(Self::SYSTEM_CONFIG_PATH);
        if system_config.exists() {
            return Some(system_config.to_path_buf());
        }

        None
    }

    /// Load configuration with priority:
    /// 1. GLYPHGRID_CONFIG environment variable
    /// 2. ~/.config/glyphgrid/config.toml (user config)
    /// 3. /etc/glyphgrid/config.toml (system config)
    /// 4. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {:#}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Commented TOML template with every setting at its default
    pub fn template() -> Result<String> {
        let body = toml::to_string_pretty(&Self::default())?;
        Ok(format!(
            "# glyphgrid configuration\n\
             #\n\
             # [grid]       quad count, quad width, atlas columns and cell size (px)\n\
             # [text]       baked characters and font family (font_path overrides search)\n\
             # [appearance] wireframe and glyph colors (RRGGBB or RRGGBBAA)\n\
             # [camera]     perspective camera\n\
             # [output]     directory for baked atlas images\n\n{}",
            body
        ))
    }

    /// Write the template to `path` (parent directories are created)
    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, Self::template()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Config template written: {}", path.display());
        Ok(())
    }
}

/// Get default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("glyphgrid").join("config.toml"))
}

/// Expand a leading `~` to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
