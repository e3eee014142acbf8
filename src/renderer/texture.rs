use std::path::Path;

use image::{imageops::FilterType, RgbaImage};

/// Sampled RGBA8 texture with a full mip chain and a repeating sampler.
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl Texture {
    fn calculate_mip_levels(width: u32, height: u32) -> u32 {
        let max_dimension = width.max(height).max(1);
        u32::BITS - max_dimension.leading_zeros()
    }

    /// Decodes an image file as linear data (normal maps are not color).
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
    ) -> Result<Self, image::ImageError> {
        let path = path.as_ref();
        log::info!("Loading texture: {:?}", path);
        let rgba = image::open(path)?.to_rgba8();
        Ok(Self::from_image(device, queue, &rgba, path.to_str()))
    }

    /// 1x1 normal pointing straight up in tangent space.
    pub fn flat_normal(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let pixel = RgbaImage::from_pixel(1, 1, image::Rgba([128, 128, 255, 255]));
        Self::from_image(device, queue, &pixel, Some("FlatNormal"))
    }

    fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        base: &RgbaImage,
        label: Option<&str>,
    ) -> Self {
        let (width, height) = base.dimensions();
        let mip_level_count = Self::calculate_mip_levels(width, height);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for mip in 0..mip_level_count {
            let w = (width >> mip).max(1);
            let h = (height >> mip).max(1);
            let level = if mip == 0 {
                base.clone()
            } else {
                image::imageops::resize(base, w, h, FilterType::Triangle)
            };
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                level.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * w),
                    rows_per_image: Some(h),
                },
                wgpu::Extent3d {
                    width: w,
                    height: h,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("RepeatSampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mip_level_calculation() {
        assert_eq!(Texture::calculate_mip_levels(1, 1), 1);
        assert_eq!(Texture::calculate_mip_levels(512, 512), 10);
        assert_eq!(Texture::calculate_mip_levels(1024, 256), 11);
    }

    #[test]
    fn test_mip_levels_non_power_of_two() {
        assert_eq!(Texture::calculate_mip_levels(300, 200), 9);
        assert_eq!(Texture::calculate_mip_levels(0, 0), 1);
    }
}
