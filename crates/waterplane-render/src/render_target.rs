//! Offscreen render targets for the reflection and refraction passes.

use pollster::FutureExt;

/// Color format of reflection/refraction targets.
pub const TARGET_COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Depth format of reflection/refraction targets.
pub const TARGET_DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// A color + depth target the scene can be rendered into instead of the screen.
pub struct RenderTarget {
    label: String,
    color_texture: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    width: u32,
    height: u32,
}

impl RenderTarget {
    /// Allocates a target of the given size.
    ///
    /// Zero dimensions are clamped to one. If the device rejects the attachments the
    /// failure is logged and the target is returned anyway; drawing into it is then a
    /// no-op on most backends.
    pub fn new(device: &wgpu::Device, width: u32, height: u32, label: &str) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let color_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label} Color")),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let color_view = color_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{label} Depth")),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        if let Some(error) = device.pop_error_scope().block_on() {
            log::error!("{label} render target is incomplete: {error}");
        }

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{label} Sampler")),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        log::debug!("created {label} render target ({width}x{height})");

        Self {
            label: label.to_string(),
            color_texture,
            color_view,
            depth_texture,
            depth_view,
            sampler,
            width,
            height,
        }
    }

    /// Opens a render pass that clears and draws into this target.
    pub fn begin_pass<'a>(
        &self,
        encoder: &'a mut wgpu::CommandEncoder,
        clear_color: wgpu::Color,
    ) -> wgpu::RenderPass<'a> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(&self.label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.color_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn color_texture(&self) -> &wgpu::Texture {
        &self.color_texture
    }

    pub fn color_view(&self) -> &wgpu::TextureView {
        &self.color_view
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Linear sampler for reading the color attachment.
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Size fixed at creation; targets do not follow later viewport changes.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Frees the color and depth textures.
    pub fn destroy(&self) {
        self.color_texture.destroy();
        self.depth_texture.destroy();
        log::debug!("released {} render target", self.label);
    }
}
