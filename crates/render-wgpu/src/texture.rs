use lumen_assets::DecodedTexture;

/// Sampled colour texture owned by the renderer.
///
/// GPU memory is freed by [`GpuTexture::release`]; dropping without
/// releasing leaves cleanup to wgpu's own reference counting.
#[derive(Debug)]
pub struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    label: String,
}

impl GpuTexture {
    /// Upload every mip level of a decoded image.
    pub fn from_decoded(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DecodedTexture,
        label: &str,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: image.mip_level_count(),
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, mip) in image.mips.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &mip.rgba,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * mip.width),
                    rows_per_image: Some(mip.height),
                },
                wgpu::Extent3d {
                    width: mip.width,
                    height: mip.height,
                    depth_or_array_layers: 1,
                },
            );
        }

        tracing::debug!(
            label,
            width = image.width,
            height = image.height,
            mips = image.mip_level_count(),
            "uploaded texture"
        );
        Self::wrap(device, texture, label)
    }

    /// 1x1 texture of a single colour, used when an image fails to load.
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [u8; 4], label: &str) -> Self {
        let image = DecodedTexture {
            width: 1,
            height: 1,
            source_channels: 4,
            mips: vec![lumen_assets::MipLevel {
                width: 1,
                height: 1,
                rgba: rgba.to_vec(),
            }],
        };
        Self::from_decoded(device, queue, &image, label)
    }

    fn wrap(device: &wgpu::Device, texture: wgpu::Texture, label: &str) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&sampler_descriptor(label));
        Self {
            texture,
            view,
            sampler,
            label: label.to_owned(),
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Destroy the GPU texture now.
    pub fn release(self) {
        tracing::debug!(label = %self.label, "releasing texture");
        self.texture.destroy();
    }
}

/// Repeat wrapping with trilinear filtering.
fn sampler_descriptor(label: &str) -> wgpu::SamplerDescriptor<'_> {
    wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampler_repeats_with_trilinear_filtering() {
        let desc = sampler_descriptor("diffuse");
        assert_eq!(desc.label, Some("diffuse"));
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(desc.address_mode_v, wgpu::AddressMode::Repeat);
        assert_eq!(desc.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.mipmap_filter, wgpu::FilterMode::Linear);
    }
}
