use std::path::PathBuf;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::environment::{clamp_parameter, AZIMUTH_RANGE, ELEVATION_RANGE};
use crate::scene::OrbitSettings;
use crate::sky::SkyParameters;
use crate::water::{WaterSettings, DISTORTION_SCALE_RANGE, SIZE_RANGE};

pub const SETTINGS_FILE: &str = "ocean.json";

/// Everything tunable about the scene, read once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OceanSettings {
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub sun: SunSettings,
    #[serde(default)]
    pub sky: SkyParameters,
    #[serde(default)]
    pub water: WaterSettings,
    #[serde(default)]
    pub camera: OrbitSettings,
    #[serde(default)]
    pub assets: AssetSettings,
}

impl OceanSettings {
    pub fn load() -> Self {
        Self::load_from_path(SETTINGS_FILE)
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Self {
        use std::fs;

        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<OceanSettings>(&contents) {
                Ok(settings) => {
                    info!("Loaded ocean settings from {:?}", path);
                    settings.validate()
                }
                Err(err) => {
                    warn!(
                        "Failed to parse {:?} ({}). Falling back to default settings.",
                        path, err
                    );
                    OceanSettings::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("Settings file {:?} not found. Using default settings.", path);
                OceanSettings::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default settings.",
                    path, err
                );
                OceanSettings::default()
            }
        }
    }

    pub(crate) fn validate(mut self) -> Self {
        self.render = self.render.validate();

        let sun = SunSettings::default();
        self.sun.elevation =
            clamp_parameter("sun elevation", self.sun.elevation, &ELEVATION_RANGE, sun.elevation);
        self.sun.azimuth =
            clamp_parameter("sun azimuth", self.sun.azimuth, &AZIMUTH_RANGE, sun.azimuth);

        let water = WaterSettings::default();
        self.water.distortion_scale = clamp_parameter(
            "water distortion scale",
            self.water.distortion_scale,
            &DISTORTION_SCALE_RANGE,
            water.distortion_scale,
        );
        self.water.size = clamp_parameter("water size", self.water.size, &SIZE_RANGE, water.size);

        let camera = OrbitSettings::default();
        if !(self.camera.min_distance > 0.0 && self.camera.min_distance <= self.camera.max_distance) {
            warn!("Camera distance range is invalid. Using default range.");
            self.camera.min_distance = camera.min_distance;
            self.camera.max_distance = camera.max_distance;
        }

        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SunSettings {
    #[serde(default = "SunSettings::default_elevation")]
    pub elevation: f32,
    #[serde(default = "SunSettings::default_azimuth")]
    pub azimuth: f32,
}

impl SunSettings {
    fn default_elevation() -> f32 {
        2.0
    }
    fn default_azimuth() -> f32 {
        180.0
    }
}

impl Default for SunSettings {
    fn default() -> Self {
        Self {
            elevation: Self::default_elevation(),
            azimuth: Self::default_azimuth(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetSettings {
    #[serde(default = "AssetSettings::default_root")]
    pub root: PathBuf,
    #[serde(default = "AssetSettings::default_water_normals")]
    pub water_normals: PathBuf,
}

impl AssetSettings {
    fn default_root() -> PathBuf {
        PathBuf::from("model")
    }
    fn default_water_normals() -> PathBuf {
        PathBuf::from("textures/waternormals.jpg")
    }
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
            water_normals: Self::default_water_normals(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default)]
    pub present_mode: PresentModeSetting,
    #[serde(default = "RenderSettings::default_environment_resolution")]
    pub environment_resolution: u32,
    #[serde(default = "RenderSettings::default_exposure")]
    pub exposure: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            present_mode: PresentModeSetting::default(),
            environment_resolution: Self::default_environment_resolution(),
            exposure: Self::default_exposure(),
        }
    }
}

impl RenderSettings {
    fn validate(mut self) -> Self {
        if self.resolution.width == 0 || self.resolution.height == 0 {
            warn!("Resolution must be greater than zero. Using default resolution.");
            self.resolution = Resolution::default();
        }

        if !(16..=4096).contains(&self.environment_resolution) {
            warn!(
                "Environment resolution {} out of range. Using default value.",
                self.environment_resolution
            );
            self.environment_resolution = Self::default_environment_resolution();
        }

        if !(self.exposure.is_finite() && self.exposure > 0.0) {
            warn!("Exposure must be positive. Using default value.");
            self.exposure = Self::default_exposure();
        }

        self
    }

    pub fn present_mode(&self, available: &[wgpu::PresentMode]) -> wgpu::PresentMode {
        let desired = self.present_mode.to_wgpu();
        if available.contains(&desired) {
            return desired;
        }

        warn!(
            "Requested present mode {:?} is not supported. Falling back to FIFO.",
            desired
        );

        if available.contains(&wgpu::PresentMode::Fifo) {
            wgpu::PresentMode::Fifo
        } else {
            available
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo)
        }
    }

    const fn default_environment_resolution() -> u32 {
        256
    }

    const fn default_exposure() -> f32 {
        0.5
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentModeSetting {
    #[default]
    Fifo,
    FifoRelaxed,
    Immediate,
    Mailbox,
    AutoVsync,
    AutoNoVsync,
}

impl PresentModeSetting {
    fn to_wgpu(&self) -> wgpu::PresentMode {
        match self {
            PresentModeSetting::Fifo => wgpu::PresentMode::Fifo,
            PresentModeSetting::FifoRelaxed => wgpu::PresentMode::FifoRelaxed,
            PresentModeSetting::Immediate => wgpu::PresentMode::Immediate,
            PresentModeSetting::Mailbox => wgpu::PresentMode::Mailbox,
            PresentModeSetting::AutoVsync => wgpu::PresentMode::AutoVsync,
            PresentModeSetting::AutoNoVsync => wgpu::PresentMode::AutoNoVsync,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_scene_defaults() {
        let settings: OceanSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.sun.elevation, 2.0);
        assert_eq!(settings.sun.azimuth, 180.0);
        assert_eq!(settings.sky.turbidity, 10.0);
        assert_eq!(settings.sky.rayleigh, 2.0);
        assert!((settings.water.distortion_scale - 3.7).abs() < 1e-6);
        assert_eq!(settings.water.water_color, 0x7ac5d8);
        assert_eq!(settings.camera.min_distance, 40.0);
        assert_eq!(settings.render.exposure, 0.5);
    }

    #[test]
    fn validate_clamps_out_of_range_scene_values() {
        let json = r#"{
            "sun": { "elevation": 120.0, "azimuth": -400.0 },
            "water": { "distortion_scale": 20.0, "size": 0.0 },
            "render": { "environment_resolution": 0, "exposure": -1.0 }
        }"#;
        let settings = serde_json::from_str::<OceanSettings>(json).unwrap().validate();

        assert_eq!(settings.sun.elevation, 90.0);
        assert_eq!(settings.sun.azimuth, -180.0);
        assert_eq!(settings.water.distortion_scale, 8.0);
        assert_eq!(settings.water.size, 0.1);
        assert_eq!(settings.render.environment_resolution, 256);
        assert_eq!(settings.render.exposure, 0.5);
    }

    #[test]
    fn water_clock_parses_from_snake_case() {
        let json = r#"{ "water": { "clock": "measured_delta" } }"#;
        let settings: OceanSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.water.clock, crate::water::WaterClock::MeasuredDelta);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = OceanSettings::load_from_path("does/not/exist/ocean.json");
        assert_eq!(settings.sun.elevation, 2.0);
    }

    #[test]
    fn present_mode_returns_desired_when_available() {
        let settings = RenderSettings {
            present_mode: PresentModeSetting::Mailbox,
            ..RenderSettings::default()
        };

        let available = [
            wgpu::PresentMode::Fifo,
            wgpu::PresentMode::Mailbox,
            wgpu::PresentMode::Immediate,
        ];

        assert_eq!(
            settings.present_mode(&available),
            wgpu::PresentMode::Mailbox
        );
    }

    #[test]
    fn present_mode_falls_back_to_fifo_when_desired_missing() {
        let settings = RenderSettings {
            present_mode: PresentModeSetting::Mailbox,
            ..RenderSettings::default()
        };

        let available = [wgpu::PresentMode::Fifo, wgpu::PresentMode::Immediate];

        assert_eq!(settings.present_mode(&available), wgpu::PresentMode::Fifo);
    }
}
