//! Atmospheric scattering model used for the sky background and environment bake.
//!
//! This is the analytic Preetham-style model: Rayleigh and Mie extinction along
//! the view ray, in-scattered sun light, and a sun disk. The same math runs in
//! `renderer/ocean.wgsl` for the on-screen sky; the CPU version here feeds the
//! environment capture so reflections match the visible sky.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::renderer::uniforms::SkyUniform;

const UP: Vec3 = Vec3::Y;
const TOTAL_RAYLEIGH: Vec3 = Vec3::new(5.804_543e-6, 1.356_291_1e-5, 3.026_590_2e-5);
const MIE_CONST: Vec3 = Vec3::new(1.839_991_9e14, 2.779_802_4e14, 4.079_048e14);
const CUTOFF_ANGLE: f32 = 1.611_073_2;
const STEEPNESS: f32 = 1.5;
const SUN_ILLUMINANCE: f32 = 1000.0;
const RAYLEIGH_ZENITH_LENGTH: f32 = 8.4e3;
const MIE_ZENITH_LENGTH: f32 = 1.25e3;
const SUN_ANGULAR_DIAMETER_COS: f32 = 0.999_956_7;
const THREE_OVER_SIXTEEN_PI: f32 = 0.059_683_1;
const ONE_OVER_FOUR_PI: f32 = 0.079_577_47;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyParameters {
    #[serde(default = "SkyParameters::default_turbidity")]
    pub turbidity: f32,
    #[serde(default = "SkyParameters::default_rayleigh")]
    pub rayleigh: f32,
    #[serde(default = "SkyParameters::default_mie_coefficient")]
    pub mie_coefficient: f32,
    #[serde(default = "SkyParameters::default_mie_directional_g")]
    pub mie_directional_g: f32,
}

impl SkyParameters {
    fn default_turbidity() -> f32 {
        10.0
    }
    fn default_rayleigh() -> f32 {
        2.0
    }
    fn default_mie_coefficient() -> f32 {
        0.005
    }
    fn default_mie_directional_g() -> f32 {
        0.8
    }

    pub fn uniform(&self, sun_position: Vec3) -> SkyUniform {
        SkyUniform {
            sun_position: sun_position.to_array(),
            turbidity: self.turbidity,
            rayleigh: self.rayleigh,
            mie_coefficient: self.mie_coefficient,
            mie_directional_g: self.mie_directional_g,
            _padding: 0.0,
        }
    }
}

impl Default for SkyParameters {
    fn default() -> Self {
        Self {
            turbidity: Self::default_turbidity(),
            rayleigh: Self::default_rayleigh(),
            mie_coefficient: Self::default_mie_coefficient(),
            mie_directional_g: Self::default_mie_directional_g(),
        }
    }
}

fn sun_intensity(zenith_angle_cos: f32) -> f32 {
    let zenith_angle_cos = zenith_angle_cos.clamp(-1.0, 1.0);
    let falloff = -((CUTOFF_ANGLE - zenith_angle_cos.acos()) / STEEPNESS);
    SUN_ILLUMINANCE * (1.0 - falloff.exp()).max(0.0)
}

fn total_mie(turbidity: f32) -> Vec3 {
    let c = (0.2 * turbidity) * 10e-18;
    0.434 * c * MIE_CONST
}

fn rayleigh_phase(cos_theta: f32) -> f32 {
    THREE_OVER_SIXTEEN_PI * (1.0 + cos_theta * cos_theta)
}

fn hg_phase(cos_theta: f32, g: f32) -> f32 {
    let g2 = g * g;
    let denom = (1.0 - 2.0 * g * cos_theta + g2).max(1e-6).powf(1.5);
    ONE_OVER_FOUR_PI * ((1.0 - g2) / denom)
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Scene-referred sky color seen along `direction` (need not be normalized).
pub fn sky_radiance(sky: &SkyUniform, direction: Vec3) -> Vec3 {
    let direction = direction.try_normalize().unwrap_or(UP);
    let sun_position = sky.sun_position();
    let sun_direction = sun_position.try_normalize().unwrap_or(UP);

    let sun_e = sun_intensity(sun_direction.dot(UP));
    let sun_fade = 1.0 - (1.0 - (sun_position.y / 450_000.0).exp()).clamp(0.0, 1.0);
    let rayleigh_coefficient = sky.rayleigh - (1.0 - sun_fade);
    let beta_r = TOTAL_RAYLEIGH * rayleigh_coefficient;
    let beta_m = total_mie(sky.turbidity) * sky.mie_coefficient;

    // optical length along the view ray
    let zenith_angle = UP.dot(direction).max(0.0).acos();
    let inverse = 1.0
        / (zenith_angle.cos()
            + 0.15 * (93.885 - zenith_angle.to_degrees()).powf(-1.253));
    let s_r = RAYLEIGH_ZENITH_LENGTH * inverse;
    let s_m = MIE_ZENITH_LENGTH * inverse;

    let extinction = (-(beta_r * s_r + beta_m * s_m)).exp();

    let cos_theta = direction.dot(sun_direction);
    let beta_r_theta = beta_r * rayleigh_phase(cos_theta * 0.5 + 0.5);
    let beta_m_theta = beta_m * hg_phase(cos_theta, sky.mie_directional_g);
    let scatter_ratio = (beta_r_theta + beta_m_theta) / (beta_r + beta_m);

    let mut lin = (sun_e * scatter_ratio * (Vec3::ONE - extinction)).powf(1.5);
    let horizon_mix = (1.0 - UP.dot(sun_direction)).powi(5).clamp(0.0, 1.0);
    let near_horizon = (sun_e * scatter_ratio * extinction).powf(0.5);
    lin *= Vec3::ONE.lerp(near_horizon, horizon_mix);

    let mut l0 = Vec3::splat(0.1) * extinction;
    let sun_disk = smoothstep(
        SUN_ANGULAR_DIAMETER_COS,
        SUN_ANGULAR_DIAMETER_COS + 0.00002,
        cos_theta,
    );
    l0 += sun_e * 19000.0 * extinction * sun_disk;

    let color = (lin + l0) * 0.04 + Vec3::new(0.0, 0.0003, 0.00075);
    color.powf(1.0 / (1.2 + 1.2 * sun_fade))
}

/// Unit direction for an equirectangular texel center.
///
/// `u` wraps around the azimuth starting at -X, `v` runs from zenith (0) to nadir (1).
pub fn equirect_direction(u: f32, v: f32) -> Vec3 {
    let phi = (u - 0.5) * 2.0 * PI;
    let theta = v * PI;
    Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::sun_direction;

    fn sky_for(elevation: f32, azimuth: f32) -> SkyUniform {
        SkyParameters::default().uniform(sun_direction(elevation, azimuth))
    }

    #[test]
    fn radiance_is_finite_and_non_negative() {
        let sky = sky_for(2.0, 180.0);
        for i in 0..64 {
            for j in 0..32 {
                let dir = equirect_direction((i as f32 + 0.5) / 64.0, (j as f32 + 0.5) / 32.0);
                let c = sky_radiance(&sky, dir);
                assert!(c.is_finite(), "non-finite radiance {c:?} at {dir:?}");
                assert!(c.min_element() >= 0.0);
            }
        }
    }

    #[test]
    fn sun_intensity_fades_out_at_the_shader_cutoff() {
        let cutoff = 1.611_073_155_687_073_4_f64;
        for zenith in [0.0_f64, 0.8, 1.5, 1.6] {
            let expected = 1000.0 * (1.0 - (-(cutoff - zenith) / 1.5).exp());
            let actual = sun_intensity(zenith.cos() as f32) as f64;
            assert!((actual - expected).abs() < 0.01, "{}: {} vs {}", zenith, actual, expected);
        }
        // just past the horizon, still lit before the cutoff
        assert!(sun_intensity(1.6109_f64.cos() as f32) > 0.0);
        assert_eq!(sun_intensity(1.62_f64.cos() as f32), 0.0);
    }

    #[test]
    fn sky_is_brighter_toward_the_sun() {
        let sky = sky_for(30.0, 45.0);
        let sun = sky.sun_position();
        let toward = sky_radiance(&sky, sun + Vec3::new(0.0, 0.05, 0.0));
        let away = sky_radiance(&sky, Vec3::new(-sun.x, sun.y, -sun.z));
        assert!(toward.length() > away.length());
    }

    #[test]
    fn equirect_direction_covers_poles_and_wraps() {
        assert!(equirect_direction(0.3, 0.0).abs_diff_eq(Vec3::Y, 1e-6));
        assert!(equirect_direction(0.3, 1.0).abs_diff_eq(Vec3::NEG_Y, 1e-5));
        let a = equirect_direction(0.0, 0.5);
        let b = equirect_direction(1.0, 0.5);
        assert!(a.abs_diff_eq(b, 1e-5));
    }
}
