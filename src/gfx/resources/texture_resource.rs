//! GPU textures: the depth buffer, the light's shadow map and colour maps.

/// Texture, default view and the sampler it is read with.
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// How a texture is filtered when sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sampling {
    /// Bilinear colour lookups.
    Color,
    /// Depth comparison for percentage-closer filtering.
    DepthCompare,
}

impl Sampling {
    fn descriptor(self, label: &str) -> wgpu::SamplerDescriptor<'_> {
        wgpu::SamplerDescriptor {
            label: Some(label),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: match self {
                Sampling::Color => None,
                Sampling::DepthCompare => Some(wgpu::CompareFunction::LessEqual),
            },
            ..Default::default()
        }
    }
}

fn extent(width: u32, height: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: width.max(1),
        height: height.max(1),
        depth_or_array_layers: 1,
    }
}

/// Row layout of tightly packed RGBA8 pixels.
fn rgba_layout(width: u32, height: u32) -> wgpu::TexelCopyBufferLayout {
    wgpu::TexelCopyBufferLayout {
        offset: 0,
        bytes_per_row: Some(4 * width),
        rows_per_image: Some(height),
    }
}

impl TextureResource {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    fn create(
        device: &wgpu::Device,
        label: &str,
        size: wgpu::Extent3d,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
        sampling: Sampling,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&sampling.descriptor(label));

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Depth buffer sized to the surface. Recreated on resize.
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        Self::create(
            device,
            label,
            extent(config.width, config.height),
            Self::DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
            Sampling::Color,
        )
    }

    /// Square depth target rendered from the light.
    pub fn create_shadow_map(device: &wgpu::Device, size: u32) -> Self {
        Self::create(
            device,
            "Shadow Map",
            extent(size, size),
            Self::DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            Sampling::DepthCompare,
        )
    }

    /// Uploads a decoded image as a material map.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &image::RgbaImage,
        label: &str,
    ) -> Self {
        let (width, height) = image.dimensions();
        Self::from_rgba(device, queue, image.as_raw(), width, height, label)
    }

    /// Bound in place of a map so every draw has the same layout.
    pub fn white_pixel(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::from_rgba(device, queue, &[255; 4], 1, 1, "White Pixel")
    }

    fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pixels: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Self {
        // Unorm, not sRGB: colours and maps share the surface's space.
        let resource = Self::create(
            device,
            label,
            extent(width, height),
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            Sampling::Color,
        );
        queue.write_texture(
            resource.texture.as_image_copy(),
            pixels,
            rgba_layout(width, height),
            extent(width, height),
        );
        resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_shadow_sampling_compares() {
        assert_eq!(Sampling::Color.descriptor("map").compare, None);
        assert_eq!(
            Sampling::DepthCompare.descriptor("shadow").compare,
            Some(wgpu::CompareFunction::LessEqual)
        );
    }

    #[test]
    fn empty_sizes_are_clamped() {
        let size = extent(0, 600);
        assert_eq!((size.width, size.height), (1, 600));
        assert_eq!(rgba_layout(256, 2).bytes_per_row, Some(1024));
    }
}
