/// Samples per pixel when the adapter allows it. Outline shells are thin
/// enough to shimmer without it.
pub const PREFERRED_SAMPLE_COUNT: u32 = 4;

/// Picks [`PREFERRED_SAMPLE_COUNT`] if both attachments can be multisampled
/// that much and the color one can be resolved, otherwise a single sample.
pub fn sample_count(
    color: wgpu::TextureFormatFeatureFlags,
    depth: wgpu::TextureFormatFeatureFlags,
) -> u32 {
    let supported = color.sample_count_supported(PREFERRED_SAMPLE_COUNT)
        && color.contains(wgpu::TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE)
        && depth.sample_count_supported(PREFERRED_SAMPLE_COUNT);
    if supported {
        PREFERRED_SAMPLE_COUNT
    } else {
        1
    }
}

/// Multisampled color texture that resolves into the surface texture.
/// Absent when rendering with a single sample.
pub struct MsaaTarget {
    view: Option<wgpu::TextureView>,
    format: wgpu::TextureFormat,
    sample_count: u32,
}

impl MsaaTarget {
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let view = (sample_count > 1).then(|| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some("Color MSAA Texture"),
                    size: wgpu::Extent3d {
                        width: width.max(1),
                        height: height.max(1),
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        });
        Self {
            view,
            format,
            sample_count,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        *self = Self::new(device, width, height, self.format, self.sample_count);
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// The `(view, resolve_target)` pair for a color attachment that ends up
    /// in `output`.
    pub fn attachment<'a>(
        &'a self,
        output: &'a wgpu::TextureView,
    ) -> (&'a wgpu::TextureView, Option<&'a wgpu::TextureView>) {
        match &self.view {
            Some(view) => (view, Some(output)),
            None => (output, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormatFeatureFlags as Flags;

    #[test]
    fn multisamples_when_everything_allows_it() {
        let color = Flags::MULTISAMPLE_X4 | Flags::MULTISAMPLE_RESOLVE;
        assert_eq!(4, sample_count(color, Flags::MULTISAMPLE_X4));
    }

    #[test]
    fn falls_back_to_a_single_sample() {
        let resolvable = Flags::MULTISAMPLE_X4 | Flags::MULTISAMPLE_RESOLVE;
        assert_eq!(1, sample_count(Flags::empty(), Flags::MULTISAMPLE_X4));
        assert_eq!(1, sample_count(Flags::MULTISAMPLE_X4, Flags::MULTISAMPLE_X4));
        assert_eq!(1, sample_count(resolvable, Flags::empty()));
    }
}
