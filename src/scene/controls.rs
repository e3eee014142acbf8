use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::transform::spherical_to_cartesian;
use super::Camera;

const MIN_POLAR_EPSILON: f32 = 1e-6;
const ZOOM_SCALE: f32 = 0.95;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrbitSettings {
    #[serde(default = "OrbitSettings::default_damping")]
    pub damping_factor: f32,
    #[serde(default = "OrbitSettings::default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "OrbitSettings::default_max_distance")]
    pub max_distance: f32,
    #[serde(default = "OrbitSettings::default_max_polar")]
    pub max_polar_angle: f32,
    #[serde(default = "OrbitSettings::default_rotate_speed")]
    pub rotate_speed: f32,
}

impl OrbitSettings {
    fn default_damping() -> f32 {
        0.25
    }
    fn default_min_distance() -> f32 {
        40.0
    }
    fn default_max_distance() -> f32 {
        200.0
    }
    fn default_max_polar() -> f32 {
        PI * 0.495
    }
    fn default_rotate_speed() -> f32 {
        1.0
    }
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            damping_factor: Self::default_damping(),
            min_distance: Self::default_min_distance(),
            max_distance: Self::default_max_distance(),
            max_polar_angle: Self::default_max_polar(),
            rotate_speed: Self::default_rotate_speed(),
        }
    }
}

/// Damped orbit camera around a fixed target.
///
/// Input accumulates into a pending spherical delta; `update` consumes a
/// `damping_factor` share of it per frame so motion eases out over several ticks.
pub struct OrbitControls {
    camera: Camera,
    settings: OrbitSettings,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
}

impl OrbitControls {
    pub fn new(camera: Camera, settings: OrbitSettings) -> Self {
        let mut controls = Self {
            camera,
            settings,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        };
        controls.update();
        controls
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    /// Pointer drag in pixels over a viewport of `viewport_height` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.delta_theta -= 2.0 * PI * dx / height * self.settings.rotate_speed;
        self.delta_phi -= 2.0 * PI * dy / height * self.settings.rotate_speed;
    }

    /// Scroll steps; positive values move the camera toward the target.
    pub fn zoom(&mut self, steps: f32) {
        self.scale *= ZOOM_SCALE.powf(steps);
    }

    pub fn update(&mut self) {
        let offset = self.camera.eye - self.camera.target;
        let mut radius = offset.length().max(f32::EPSILON);
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let damping = self.settings.damping_factor.clamp(0.0, 1.0);
        theta += self.delta_theta * damping;
        phi += self.delta_phi * damping;
        phi = phi.clamp(MIN_POLAR_EPSILON, self.settings.max_polar_angle.max(MIN_POLAR_EPSILON));

        radius = (radius * self.scale).clamp(self.settings.min_distance, self.settings.max_distance);

        self.camera.eye = self.camera.target + spherical_to_cartesian(radius, phi, theta);

        self.delta_theta *= 1.0 - damping;
        self.delta_phi *= 1.0 - damping;
        self.scale = 1.0;
    }

    pub fn target(&self) -> Vec3 {
        self.camera.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_distance_is_clamped() {
        let controls = OrbitControls::new(Camera::default(), OrbitSettings::default());
        let distance = (controls.camera().eye - controls.target()).length();
        assert!(distance >= 40.0 - 1e-3 && distance <= 200.0 + 1e-3);
    }

    #[test]
    fn zoom_never_leaves_distance_range() {
        let mut controls = OrbitControls::new(Camera::default(), OrbitSettings::default());
        for _ in 0..200 {
            controls.zoom(5.0);
            controls.update();
        }
        let distance = (controls.camera().eye - controls.target()).length();
        assert!((distance - 40.0).abs() < 1e-2);
    }

    #[test]
    fn camera_stays_above_horizon() {
        let mut controls = OrbitControls::new(Camera::default(), OrbitSettings::default());
        for _ in 0..100 {
            controls.rotate(0.0, -400.0, 800.0);
            controls.update();
        }
        assert!(controls.camera().eye.y > controls.target().y);
    }

    #[test]
    fn damping_eases_out_rotation() {
        let mut controls = OrbitControls::new(Camera::default(), OrbitSettings::default());
        let start = controls.camera().eye;
        controls.rotate(100.0, 0.0, 800.0);
        controls.update();
        let first = controls.camera().eye;
        controls.update();
        let second = controls.camera().eye;
        assert!((first - start).length() > (second - first).length());
        assert!((second - first).length() > 0.0);
    }
}
