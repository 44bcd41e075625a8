//! Configuration system
//!
//! Every section has defaults, so a config file only needs the values it
//! changes. Files are TOML or RON, chosen by extension.

pub use serde::{Deserialize, Serialize};

use crate::render::{Camera, DirectionalLight, MaterialConstants};
use crate::scene::{Category, CategoryStyles, Rgba};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Process-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Frames per second of the frame ticker
    pub target_fps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            target_fps: 60,
        }
    }
}

/// Endpoint paths, relative to the service base URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Initialize
    pub init: String,
    /// Agent snapshot
    pub agents: String,
    /// Obstacle snapshot
    pub obstacles: String,
    /// Destination snapshot
    pub destinations: String,
    /// Signal snapshot
    pub signals: String,
    /// Advance
    pub advance: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            init: "init".to_string(),
            agents: "getAgents".to_string(),
            obstacles: "getObstacles".to_string(),
            destinations: "getDestinations".to_string(),
            signals: "getTraffic_Light".to_string(),
            advance: "update".to_string(),
        }
    }
}

impl EndpointConfig {
    /// Snapshot endpoint for `category`
    pub fn snapshot(&self, category: Category) -> &str {
        match category {
            Category::Agents => &self.agents,
            Category::Obstacles => &self.obstacles,
            Category::Destinations => &self.destinations,
            Category::Signals => &self.signals,
        }
    }
}

/// Simulation service connection and session parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the service
    pub base_url: String,
    /// Endpoint paths
    pub endpoints: EndpointConfig,
    /// Agents requested at initialize
    pub agent_count: u32,
    /// Requested area width; the service's answer replaces it
    pub width: f32,
    /// Requested area height (depth); the service's answer replaces it
    pub height: f32,
    /// Step the simulation before each poll
    pub advance_on_poll: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8585/".to_string(),
            endpoints: EndpointConfig::default(),
            agent_count: 500,
            width: 100.0,
            height: 100.0,
            advance_on_poll: true,
        }
    }
}

/// Render loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Frames between poll cycles
    pub poll_every_frames: u64,
    /// Background color
    pub clear_color: Rgba,
    /// Surface width for display-less backends
    pub display_width: u32,
    /// Surface height for display-less backends
    pub display_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            poll_every_frames: 30,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            display_width: 1280,
            display_height: 720,
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Process settings
    pub engine: EngineConfig,
    /// Service settings
    pub service: ServiceConfig,
    /// Render loop settings
    pub render: RenderConfig,
    /// Camera placement and projection
    pub camera: Camera,
    /// Scene light
    pub light: DirectionalLight,
    /// Shared material terms
    pub material: MaterialConstants,
    /// Per-category styles
    pub categories: CategoryStyles,
}

impl Config for ViewerConfig {}

impl ViewerConfig {
    /// Reject values the viewer cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.poll_every_frames == 0 {
            return Err(ConfigError::Invalid("render.poll_every_frames must be positive".into()));
        }
        if self.engine.target_fps == 0 {
            return Err(ConfigError::Invalid("engine.target_fps must be positive".into()));
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return Err(ConfigError::Invalid(format!(
                "camera planes must satisfy 0 < near < far (near = {}, far = {})",
                self.camera.near, self.camera.far
            )));
        }
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                self.camera.fov_degrees
            )));
        }
        if self.camera.up.iter().all(|c| *c == 0.0) {
            return Err(ConfigError::Invalid("camera.up must not be the zero vector".into()));
        }
        if !(self.service.width > 0.0 && self.service.height > 0.0) {
            return Err(ConfigError::Invalid("service width and height must be positive".into()));
        }
        Ok(())
    }
}
