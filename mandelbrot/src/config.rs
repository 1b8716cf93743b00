//! Configuration module for the renderer
//!
//! Supports loading configuration from a TOML file.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::frames::DEFAULT_GROWTH;
use crate::region::Region;
use crate::render::Palette;

/// Renderer configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Sampled region and resolution
    #[serde(default)]
    pub region: Region,

    /// Output settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Still image and animation settings
#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    /// Iteration cap for the still image (default: 100)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Number of animation frames (default: 30)
    #[serde(default = "default_frames")]
    pub frames: u32,

    /// Delay between animation frames in milliseconds (default: 100)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u32,

    /// Per-frame growth of the iteration cap (default: 1.15)
    #[serde(default = "default_growth")]
    pub growth: f64,

    /// Still image output path (default: Mandelbrot.png)
    #[serde(default = "default_image_path")]
    pub image_path: String,

    /// Animation output path (default: Mandelbrot.gif)
    #[serde(default = "default_animation_path")]
    pub animation_path: String,

    /// Colour map for the still image (default: hot)
    #[serde(default = "default_image_palette")]
    pub image_palette: Palette,

    /// Colour map for the animation (default: magma)
    #[serde(default = "default_animation_palette")]
    pub animation_palette: Palette,

    /// Worker threads per grid, 0 for one per CPU (default: 0)
    #[serde(default)]
    pub threads: usize,

    /// Abort the run after this many seconds, 0 for no limit (default: 0)
    #[serde(default)]
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level filter (default: "mandelbrot=info")
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_max_iterations() -> u32 {
    100
}

fn default_frames() -> u32 {
    30
}

fn default_interval_ms() -> u32 {
    100
}

fn default_growth() -> f64 {
    DEFAULT_GROWTH
}

fn default_image_path() -> String {
    "Mandelbrot.png".to_string()
}

fn default_animation_path() -> String {
    "Mandelbrot.gif".to_string()
}

fn default_image_palette() -> Palette {
    Palette::Hot
}

fn default_animation_palette() -> Palette {
    Palette::Magma
}

fn default_log_level() -> String {
    "mandelbrot=info".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            frames: default_frames(),
            interval_ms: default_interval_ms(),
            growth: default_growth(),
            image_path: default_image_path(),
            animation_path: default_animation_path(),
            image_palette: default_image_palette(),
            animation_palette: default_animation_palette(),
            threads: 0,
            timeout_secs: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.display().to_string(), e.to_string()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.display().to_string(), e.to_string()))
    }
}

impl RenderConfig {
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    ReadError(String, String),

    #[error("Failed to parse config file '{0}': {1}")]
    ParseError(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.region, Region::default());
        assert_eq!(config.render.max_iterations, 100);
        assert_eq!(config.render.frames, 30);
        assert_eq!(config.render.interval_ms, 100);
        assert_eq!(config.render.growth, 1.15);
        assert_eq!(config.render.image_path, "Mandelbrot.png");
        assert_eq!(config.render.animation_path, "Mandelbrot.gif");
        assert_eq!(config.render.image_palette, Palette::Hot);
        assert_eq!(config.render.animation_palette, Palette::Magma);
        assert_eq!(config.render.timeout(), None);
        assert_eq!(config.logging.level, "mandelbrot=info");
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
            [render]
            frames = 10
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.render.frames, 10);
        assert_eq!(config.render.max_iterations, 100); // default
        assert_eq!(config.region.width, 1000); // default
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [region]
            x_min = -0.75
            x_max = -0.73
            y_min = 0.1
            y_max = 0.12
            width = 640
            height = 480

            [render]
            max_iterations = 500
            frames = 40
            interval_ms = 50
            growth = 1.2
            image_path = "out/still.png"
            animation_path = "out/zoom.gif"
            image_palette = "gray"
            animation_palette = "hot"
            threads = 4
            timeout_secs = 30

            [logging]
            level = "debug"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.region.x_min, -0.75);
        assert_eq!(config.region.width, 640);
        assert_eq!(config.region.height, 480);
        assert_eq!(config.render.max_iterations, 500);
        assert_eq!(config.render.growth, 1.2);
        assert_eq!(config.render.animation_path, "out/zoom.gif");
        assert_eq!(config.render.image_palette, Palette::Gray);
        assert_eq!(config.render.animation_palette, Palette::Hot);
        assert_eq!(config.render.threads, 4);
        assert_eq!(config.render.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("definitely/not/here/config.toml").unwrap();
        assert_eq!(config.render.frames, 30);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let path = std::env::temp_dir().join(format!("mandelbrot-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[render]\nframes = \"many\"\n").unwrap();
        let result = Config::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ConfigError::ParseError(_, _))));
    }
}
