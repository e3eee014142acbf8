use std::ops::RangeInclusive;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::environment::clamp_parameter;
use crate::renderer::uniforms::WaterUniform;

/// Time added to the water animation per render submission.
pub const WATER_TIME_STEP: f32 = 1.0 / 60.0;

pub const DISTORTION_SCALE_RANGE: RangeInclusive<f32> = 0.0..=8.0;
pub const SIZE_RANGE: RangeInclusive<f32> = 0.1..=10.0;

/// How the water time accumulator advances per submitted frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterClock {
    /// Constant `WATER_TIME_STEP` per frame; wave speed follows the refresh rate.
    #[default]
    FixedStep,
    /// Measured frame delta; wave speed is frame-rate independent.
    MeasuredDelta,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaterSettings {
    #[serde(default = "WaterSettings::default_distortion_scale")]
    pub distortion_scale: f32,
    #[serde(default = "WaterSettings::default_size")]
    pub size: f32,
    #[serde(default = "WaterSettings::default_sun_color")]
    pub sun_color: u32,
    #[serde(default = "WaterSettings::default_water_color")]
    pub water_color: u32,
    #[serde(default = "WaterSettings::default_alpha")]
    pub alpha: f32,
    #[serde(default)]
    pub clock: WaterClock,
}

impl WaterSettings {
    fn default_distortion_scale() -> f32 {
        3.7
    }
    fn default_size() -> f32 {
        1.0
    }
    fn default_sun_color() -> u32 {
        0xffffff
    }
    fn default_water_color() -> u32 {
        0x7ac5d8
    }
    fn default_alpha() -> f32 {
        1.0
    }
}

impl Default for WaterSettings {
    fn default() -> Self {
        Self {
            distortion_scale: Self::default_distortion_scale(),
            size: Self::default_size(),
            sun_color: Self::default_sun_color(),
            water_color: Self::default_water_color(),
            alpha: Self::default_alpha(),
            clock: WaterClock::default(),
        }
    }
}

/// Linear RGB from a packed sRGB `0xRRGGBB` value.
pub fn srgb_hex_to_linear(hex: u32) -> Vec3 {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c < 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(channel(16), channel(8), channel(0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaterSurfaceState {
    sun_direction: Vec3,
    distortion_scale: f32,
    size: f32,
    time: f64,
    sun_color: Vec3,
    water_color: Vec3,
    alpha: f32,
    clock: WaterClock,
}

impl WaterSurfaceState {
    pub fn new(settings: &WaterSettings) -> Self {
        let mut state = Self {
            sun_direction: Vec3::Y,
            distortion_scale: WaterSettings::default_distortion_scale(),
            size: WaterSettings::default_size(),
            time: 0.0,
            sun_color: srgb_hex_to_linear(settings.sun_color),
            water_color: srgb_hex_to_linear(settings.water_color),
            alpha: settings.alpha.clamp(0.0, 1.0),
            clock: settings.clock,
        };
        state.set_distortion_scale(settings.distortion_scale);
        state.set_size(settings.size);
        state
    }

    /// Stores a normalized copy of `direction`.
    pub fn set_sun_direction(&mut self, direction: Vec3) {
        self.sun_direction = direction.try_normalize().unwrap_or(Vec3::Y);
    }

    pub fn set_distortion_scale(&mut self, value: f32) -> f32 {
        self.distortion_scale = clamp_parameter(
            "water distortion scale",
            value,
            &DISTORTION_SCALE_RANGE,
            self.distortion_scale,
        );
        self.distortion_scale
    }

    pub fn set_size(&mut self, value: f32) -> f32 {
        self.size = clamp_parameter("water size", value, &SIZE_RANGE, self.size);
        self.size
    }

    /// Advances the time accumulator for one submitted frame.
    pub fn advance(&mut self, frame_delta: f64) {
        let step = match self.clock {
            WaterClock::FixedStep => WATER_TIME_STEP as f64,
            WaterClock::MeasuredDelta => frame_delta.max(0.0),
        };
        self.time += step;
    }

    pub fn sun_direction(&self) -> Vec3 {
        self.sun_direction
    }

    pub fn distortion_scale(&self) -> f32 {
        self.distortion_scale
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn uniform(&self) -> WaterUniform {
        WaterUniform {
            sun_direction: self.sun_direction.to_array(),
            distortion_scale: self.distortion_scale,
            sun_color: self.sun_color.to_array(),
            size: self.size,
            water_color: self.water_color.to_array(),
            time: self.time as f32,
            alpha: self.alpha,
            _padding: [0.0; 3],
        }
    }
}

impl Default for WaterSurfaceState {
    fn default() -> Self {
        Self::new(&WaterSettings::default())
    }
}
