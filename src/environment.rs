use std::ops::RangeInclusive;

use glam::Vec3;

use crate::renderer::uniforms::SkyUniform;
use crate::renderer::{EnvironmentBaker, ReflectionMap};
use crate::scene::transform::spherical_to_cartesian;
use crate::sky::SkyParameters;
use crate::water::WaterSurfaceState;

pub const ELEVATION_RANGE: RangeInclusive<f32> = 0.0..=90.0;
pub const AZIMUTH_RANGE: RangeInclusive<f32> = -180.0..=180.0;

/// Unit vector toward the sun for an elevation above the horizon and an azimuth,
/// both in degrees.
pub fn sun_direction(elevation_deg: f32, azimuth_deg: f32) -> Vec3 {
    let phi = (90.0 - elevation_deg).to_radians();
    let theta = azimuth_deg.to_radians();
    spherical_to_cartesian(1.0, phi, theta)
}

/// Clamps `value` into `range`. Non-finite input yields `fallback`.
pub(crate) fn clamp_parameter(
    label: &str,
    value: f32,
    range: &RangeInclusive<f32>,
    fallback: f32,
) -> f32 {
    if !value.is_finite() {
        log::warn!("{label} {value} is not finite; keeping {fallback}");
        return fallback;
    }
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        log::warn!("{label} {value} outside {range:?}; clamped to {clamped}");
    }
    clamped
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunState {
    elevation: f32,
    azimuth: f32,
    direction: Vec3,
}

impl SunState {
    pub fn new(elevation: f32, azimuth: f32) -> Self {
        let mut sun = Self {
            elevation: 0.0,
            azimuth: 0.0,
            direction: sun_direction(0.0, 0.0),
        };
        sun.set(elevation, azimuth);
        sun
    }

    fn set(&mut self, elevation: f32, azimuth: f32) {
        self.elevation = clamp_parameter("sun elevation", elevation, &ELEVATION_RANGE, self.elevation);
        self.azimuth = clamp_parameter("sun azimuth", azimuth, &AZIMUTH_RANGE, self.azimuth);
        self.direction = sun_direction(self.elevation, self.azimuth);
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }
}

/// Keeps sun, sky uniform, water sun direction and the ambient reflection map in
/// step with each other.
pub struct EnvironmentLighting {
    sun: SunState,
    sky_parameters: SkyParameters,
    sky: SkyUniform,
    reflection: Option<ReflectionMap>,
    regenerations: u64,
}

impl EnvironmentLighting {
    /// State for the given parameters. No reflection map exists until the first
    /// `update_sun`.
    pub fn new(sky_parameters: SkyParameters, elevation: f32, azimuth: f32) -> Self {
        let sun = SunState::new(elevation, azimuth);
        Self {
            sky: sky_parameters.uniform(sun.direction()),
            sun,
            sky_parameters,
            reflection: None,
            regenerations: 0,
        }
    }

    /// Recomputes the sun and everything derived from it.
    ///
    /// This bakes a new environment map and must stay off the per-frame path.
    pub fn update_sun<B>(
        &mut self,
        elevation: f32,
        azimuth: f32,
        water: &mut WaterSurfaceState,
        baker: &mut B,
    ) -> SunState
    where
        B: EnvironmentBaker + ?Sized,
    {
        self.sun.set(elevation, azimuth);
        let direction = self.sun.direction();

        self.sky = self.sky_parameters.uniform(direction);
        water.set_sun_direction(direction);

        if let Some(previous) = self.reflection.take() {
            baker.release_environment(previous);
        }
        let map = baker.bake_environment(&self.sky);
        log::debug!(
            "Regenerated environment map {} (elevation {:.1}, azimuth {:.1})",
            map.id(),
            self.sun.elevation(),
            self.sun.azimuth()
        );
        self.reflection = Some(map);
        self.regenerations += 1;

        self.sun
    }

    /// Releases the current reflection map, if any.
    pub fn release<B>(&mut self, baker: &mut B)
    where
        B: EnvironmentBaker + ?Sized,
    {
        if let Some(map) = self.reflection.take() {
            baker.release_environment(map);
        }
    }

    pub fn sun(&self) -> &SunState {
        &self.sun
    }

    pub fn sky_uniform(&self) -> &SkyUniform {
        &self.sky
    }

    pub fn sky_parameters(&self) -> &SkyParameters {
        &self.sky_parameters
    }

    pub fn reflection_map(&self) -> Option<&ReflectionMap> {
        self.reflection.as_ref()
    }

    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zenith_and_horizon_directions() {
        assert!(sun_direction(90.0, 0.0).abs_diff_eq(Vec3::Y, 1e-6));
        assert!(sun_direction(0.0, 0.0).abs_diff_eq(Vec3::Z, 1e-6));
        assert!(sun_direction(0.0, 90.0).abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let sun = SunState::new(120.0, -270.0);
        assert_eq!(sun.elevation(), 90.0);
        assert_eq!(sun.azimuth(), -180.0);
        assert!((sun.direction().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn non_finite_values_keep_previous() {
        let mut sun = SunState::new(10.0, 20.0);
        sun.set(f32::NAN, f32::INFINITY);
        assert_eq!(sun.elevation(), 10.0);
        assert_eq!(sun.azimuth(), 20.0);
    }

    #[test]
    fn new_lighting_has_no_map_yet() {
        let lighting = EnvironmentLighting::new(SkyParameters::default(), 2.0, 180.0);
        assert!(lighting.reflection_map().is_none());
        assert_eq!(lighting.regenerations(), 0);
        assert_eq!(lighting.sky_uniform().sun_position(), lighting.sun().direction());
    }
}
