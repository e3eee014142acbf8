use glam::{Mat4, Vec3};

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_radians, self.aspect, self.near, self.far)
    }
    pub fn view_proj(&self) -> Mat4 {
        self.proj() * self.view()
    }
    pub fn position(&self) -> Vec3 {
        self.eye
    }

    /// Recomputes the aspect ratio for a new viewport. Zero-sized viewports are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(30.0, 60.0, 100.0),
            target: Vec3::new(0.0, 10.0, 0.0),
            up: Vec3::Y,
            fov_y_radians: 55f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 20000.0,
        }
    }
}
