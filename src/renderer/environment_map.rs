//! Offscreen sky capture and its prefiltered mip chain.

use half::f16;
use rayon::prelude::*;

use crate::renderer::uniforms::SkyUniform;
use crate::sky::{equirect_direction, sky_radiance};

/// One level of an equirectangular capture, RGBA linear floats.
pub struct CaptureLevel {
    pub width: u32,
    pub height: u32,
    pub texels: Vec<[f32; 4]>,
}

/// Sky rendered into a 2:1 equirectangular image plus box-filtered mips.
pub struct EnvironmentCapture {
    pub levels: Vec<CaptureLevel>,
}

impl EnvironmentCapture {
    pub fn width(&self) -> u32 {
        self.levels.first().map(|l| l.width).unwrap_or(0)
    }

    pub fn height(&self) -> u32 {
        self.levels.first().map(|l| l.height).unwrap_or(0)
    }
}

/// Renders the sky for `resolution` x `resolution / 2` texels and prefilters it.
pub fn capture_sky(sky: &SkyUniform, resolution: u32) -> EnvironmentCapture {
    let width = resolution.max(2);
    let height = (width / 2).max(1);

    let mut texels = vec![[0.0f32; 4]; (width * height) as usize];
    texels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let v = (y as f32 + 0.5) / height as f32;
            for (x, texel) in row.iter_mut().enumerate() {
                let u = (x as f32 + 0.5) / width as f32;
                let c = sky_radiance(sky, equirect_direction(u, v));
                *texel = [c.x, c.y, c.z, 1.0];
            }
        });

    let mut levels = vec![CaptureLevel {
        width,
        height,
        texels,
    }];
    while let Some(next) = levels.last().and_then(downsample) {
        levels.push(next);
    }

    EnvironmentCapture { levels }
}

/// 2x2 box filter; `None` once the level is 1x1.
fn downsample(level: &CaptureLevel) -> Option<CaptureLevel> {
    if level.width == 1 && level.height == 1 {
        return None;
    }
    let width = (level.width / 2).max(1);
    let height = (level.height / 2).max(1);

    let fetch = |x: u32, y: u32| {
        let x = x.min(level.width - 1);
        let y = y.min(level.height - 1);
        level.texels[(y * level.width + x) as usize]
    };

    let mut texels = vec![[0.0f32; 4]; (width * height) as usize];
    texels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            for (x, texel) in row.iter_mut().enumerate() {
                let x = x as u32;
                let samples = [
                    fetch(2 * x, 2 * y),
                    fetch(2 * x + 1, 2 * y),
                    fetch(2 * x, 2 * y + 1),
                    fetch(2 * x + 1, 2 * y + 1),
                ];
                for (c, out) in texel.iter_mut().enumerate() {
                    *out = samples.iter().map(|s| s[c]).sum::<f32>() * 0.25;
                }
            }
        });

    Some(CaptureLevel {
        width,
        height,
        texels,
    })
}

pub(crate) fn to_f16_bits(texels: &[[f32; 4]]) -> Vec<u16> {
    texels
        .iter()
        .flat_map(|t| t.iter().map(|&c| f16::from_f32(c).to_bits()))
        .collect()
}

/// Uploads a capture as an `Rgba16Float` texture with every mip level filled.
pub(crate) fn upload_capture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    capture: &EnvironmentCapture,
) -> wgpu::Texture {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("EnvironmentCapture"),
        size: wgpu::Extent3d {
            width: capture.width(),
            height: capture.height(),
            depth_or_array_layers: 1,
        },
        mip_level_count: capture.levels.len() as u32,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba16Float,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (mip, level) in capture.levels.iter().enumerate() {
        let converted = to_f16_bits(&level.texels);
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: mip as u32,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&converted),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(level.width * 8),
                rows_per_image: Some(level.height),
            },
            wgpu::Extent3d {
                width: level.width,
                height: level.height,
                depth_or_array_layers: 1,
            },
        );
    }

    texture
}
