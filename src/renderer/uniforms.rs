// renderer/uniforms.rs
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub inverse_view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub exposure: f32,
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            inverse_view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: [0.0, 0.0, 0.0],
            exposure: 1.0,
        }
    }

    pub fn from_matrix(view_proj: Mat4, camera_pos: Vec3, exposure: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            inverse_view_proj: view_proj.inverse().to_cols_array_2d(),
            camera_pos: camera_pos.to_array(),
            exposure,
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Sky scattering parameters as seen by the sky shader and the environment bake.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, PartialEq, Debug)]
pub struct SkyUniform {
    pub sun_position: [f32; 3],
    pub turbidity: f32,
    pub rayleigh: f32,
    pub mie_coefficient: f32,
    pub mie_directional_g: f32,
    pub _padding: f32,
}

impl SkyUniform {
    pub fn sun_position(&self) -> Vec3 {
        Vec3::from(self.sun_position)
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, PartialEq, Debug)]
pub struct WaterUniform {
    pub sun_direction: [f32; 3],
    pub distortion_scale: f32,
    pub sun_color: [f32; 3],
    pub size: f32,
    pub water_color: [f32; 3],
    pub time: f32,
    pub alpha: f32,
    pub _padding: [f32; 3],
}

/// Per-instance data for node proxies.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug)]
pub struct ProxyInstance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl ProxyInstance {
    pub fn new(model: Mat4, color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn camera_uniform_is_144_bytes() {
        // 2 * mat4x4<f32> = 128 bytes, vec3<f32> + f32 = 16 bytes
        assert_eq!(std::mem::size_of::<CameraUniform>(), 144);
    }

    #[test]
    fn sky_and_water_uniforms_are_16_byte_multiples() {
        assert_eq!(std::mem::size_of::<SkyUniform>(), 32);
        assert_eq!(std::mem::size_of::<WaterUniform>(), 64);
        assert_eq!(std::mem::size_of::<ProxyInstance>(), 80);
    }
}
