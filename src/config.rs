//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`NEBULA_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use nebula_core::{CoreParams, EnergyParams, OuterParams, SimParams, StarParams};
use serde::{Serialize, Deserialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Simulation configuration
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`NEBULA_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // NEBULA_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("NEBULA_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Nebula".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance from the viewpoint to the origin
    pub distance: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Simulation configuration
///
/// Mirrors the core's parameter set plus the knobs that only matter at
/// startup (seed and noise source selection).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// RNG seed for field generation; omit for a fresh field per run
    pub seed: Option<u64>,
    /// Noise source: "perlin" (smooth, deterministic) or "jitter"
    /// (uniform random fallback)
    pub noise: String,
    /// Clock increment per frame
    pub time_step: f32,
    /// How fast the noise field scrolls through time
    pub noise_speed: f32,
    /// Amplitude of the noise displacement
    pub noise_scale: f32,
    /// Hover phase increment per frame
    pub hover_speed: f32,
    /// Peak vertical hover offset
    pub hover_range: f32,
    /// Pointer influence radius
    pub repulsion_radius: f32,
    /// Peak pointer push strength
    pub repulsion_strength: f32,
    /// Base swirl rate of the energy field
    pub swirl_rate: f32,
    #[serde(default)]
    pub outer: OuterConfig,
    #[serde(default)]
    pub core: CoreConfig,
    #[serde(default)]
    pub stars: StarConfig,
    #[serde(default)]
    pub energy: EnergyConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            noise: "perlin".to_string(),
            time_step: 0.005,
            noise_speed: 0.1,
            noise_scale: 0.2,
            hover_speed: 0.01,
            hover_range: 0.5,
            repulsion_radius: 1.0,
            repulsion_strength: 0.5,
            swirl_rate: 0.2,
            outer: OuterConfig::default(),
            core: CoreConfig::default(),
            stars: StarConfig::default(),
            energy: EnergyConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Convert to the core's parameter struct
    pub fn to_sim_params(&self) -> SimParams {
        SimParams {
            time_step: self.time_step,
            noise_speed: self.noise_speed,
            noise_scale: self.noise_scale,
            hover_speed: self.hover_speed,
            hover_range: self.hover_range,
            repulsion_radius: self.repulsion_radius,
            repulsion_strength: self.repulsion_strength,
            swirl_rate: self.swirl_rate,
            outer: OuterParams {
                count: self.outer.count,
                radius: self.outer.radius,
                jitter: self.outer.jitter,
            },
            core: CoreParams {
                count: self.core.count,
                radius: self.core.radius,
            },
            stars: StarParams {
                count: self.stars.count,
                half_width: self.stars.half_width,
                tint_fraction: self.stars.tint_fraction,
            },
            energy: EnergyParams {
                count: self.energy.count,
                inner_radius: self.energy.inner_radius,
                shell_depth: self.energy.shell_depth,
                hue_base: self.energy.hue_base,
                hue_span: self.energy.hue_span,
                lightness: self.energy.lightness,
            },
        }
    }
}

/// Outer shell population
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OuterConfig {
    pub count: usize,
    pub radius: f32,
    pub jitter: f32,
}

impl Default for OuterConfig {
    fn default() -> Self {
        Self {
            count: 7000,
            radius: 1.5,
            jitter: 0.25,
        }
    }
}

/// Inner core population
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub count: usize,
    pub radius: f32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            radius: 0.5,
        }
    }
}

/// Background starfield population
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub count: usize,
    pub half_width: f32,
    pub tint_fraction: f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 10_000,
            half_width: 50.0,
            tint_fraction: 0.2,
        }
    }
}

/// Energy field population
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    pub count: usize,
    pub inner_radius: f32,
    pub shell_depth: f32,
    pub hue_base: f32,
    pub hue_span: f32,
    pub lightness: f32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            count: 5000,
            inner_radius: 1.0,
            shell_depth: 0.6,
            hue_base: 0.5,
            hue_span: 0.3,
            lightness: 0.6,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Background color [r, g, b, a]
    pub background_color: [f32; 4],
    #[serde(default = "SpriteConfig::outer")]
    pub outer: SpriteConfig,
    #[serde(default = "SpriteConfig::core")]
    pub core: SpriteConfig,
    #[serde(default = "SpriteConfig::stars")]
    pub stars: SpriteConfig,
    #[serde(default = "SpriteConfig::energy")]
    pub energy: SpriteConfig,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            background_color: [0.0, 0.0, 0.0, 1.0],
            outer: SpriteConfig::outer(),
            core: SpriteConfig::core(),
            stars: SpriteConfig::stars(),
            energy: SpriteConfig::energy(),
        }
    }
}

/// Per-cloud sprite appearance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteConfig {
    /// World-space sprite diameter
    pub point_size: f32,
    /// Sprite opacity before additive blending
    pub opacity: f32,
}

impl SpriteConfig {
    fn outer() -> Self {
        Self { point_size: 0.05, opacity: 1.0 }
    }

    fn core() -> Self {
        Self { point_size: 0.03, opacity: 1.0 }
    }

    fn stars() -> Self {
        Self { point_size: 0.02, opacity: 0.8 }
    }

    fn energy() -> Self {
        Self { point_size: 0.015, opacity: 0.5 }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.camera.distance, 5.0);
        assert_eq!(config.simulation.outer.count, 7000);
        assert_eq!(config.simulation.noise, "perlin");
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("repulsion_radius"));
    }

    #[test]
    fn test_to_sim_params_matches_core_defaults() {
        let params = SimulationConfig::default().to_sim_params();
        assert_eq!(params, SimParams::default());
    }
}
