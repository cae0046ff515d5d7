//! Distortion (dudv) texture upload.

use pollster::FutureExt;
use waterplane_core::RasterImage;

/// Texel used when no distortion image is available: encodes a zero offset.
const NEUTRAL_DUDV_TEXEL: [u8; 4] = [128, 128, 0, 255];

/// A 2D texture sampled with nearest filtering and mirrored repeat on both axes.
pub struct DistortionTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    width: u32,
    height: u32,
}

impl DistortionTexture {
    /// Uploads `image` as an RGBA texture.
    ///
    /// An empty image, or one larger than the device allows, is never uploaded: a 1x1
    /// neutral texel is used instead, which leaves reflections and refractions
    /// undistorted.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, image: &RasterImage) -> Self {
        let (width, height, rgba) =
            texel_data(image, device.limits().max_texture_dimension_2d);

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Distortion Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        if let Some(error) = device.pop_error_scope().block_on() {
            log::error!("distortion texture upload failed: {error}");
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Distortion Sampler"),
            address_mode_u: wgpu::AddressMode::MirrorRepeat,
            address_mode_v: wgpu::AddressMode::MirrorRepeat,
            address_mode_w: wgpu::AddressMode::MirrorRepeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        log::debug!("uploaded distortion texture ({width}x{height})");

        Self {
            texture,
            view,
            sampler,
            width,
            height,
        }
    }

    /// Size of the uploaded texture (1x1 for the neutral fallback).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn destroy(&self) {
        self.texture.destroy();
    }
}

/// Width, height and RGBA bytes to upload for `image` on a device whose 2D textures
/// are at most `max_dimension` texels per side.
fn texel_data(image: &RasterImage, max_dimension: u32) -> (u32, u32, Vec<u8>) {
    if image.is_empty() {
        log::warn!("no distortion image data, using a neutral distortion texture");
        return (1, 1, NEUTRAL_DUDV_TEXEL.to_vec());
    }
    if image.width() > max_dimension || image.height() > max_dimension {
        log::error!(
            "distortion image is {}x{} but the device allows at most {max_dimension}, \
             using a neutral distortion texture",
            image.width(),
            image.height()
        );
        return (1, 1, NEUTRAL_DUDV_TEXEL.to_vec());
    }
    (image.width(), image.height(), image.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_image_uses_neutral_texel() {
        let (width, height, rgba) = texel_data(&RasterImage::empty(), 8192);
        assert_eq!((width, height), (1, 1));
        assert_eq!(rgba, NEUTRAL_DUDV_TEXEL);
    }

    #[test]
    fn test_oversized_image_uses_neutral_texel() {
        let image = RasterImage::new(9, 1, vec![7; 9 * 3]).unwrap();
        let (width, height, rgba) = texel_data(&image, 8);
        assert_eq!((width, height), (1, 1));
        assert_eq!(rgba, NEUTRAL_DUDV_TEXEL);

        let tall = RasterImage::new(1, 9, vec![7; 9 * 3]).unwrap();
        assert_eq!(texel_data(&tall, 8).0, 1);
    }

    #[test]
    fn test_image_at_limit_is_uploaded() {
        let image = RasterImage::new(8, 2, vec![7; 8 * 2 * 3]).unwrap();
        let (width, height, rgba) = texel_data(&image, 8);
        assert_eq!((width, height), (8, 2));
        assert_eq!(rgba.len(), 8 * 2 * 4);
        assert_eq!(&rgba[0..4], &[7, 7, 7, 255]);
    }
}
