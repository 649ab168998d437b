use std::path::PathBuf;

use crate::scene::Color;
use crate::SetupError;

/// Where a demo's surface texture comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    /// Image file decoded with the `image` crate (PNG, JPEG, BMP).
    File(PathBuf),
    /// Raw RGBA8 pixels, row-major, top row first.
    Rgba {
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    },
    /// Generated checkerboard of `cells` x `cells` squares.
    Checkerboard {
        size: u32,
        cells: u32,
        a: Color,
        b: Color,
    },
}

/// CPU-side RGBA8 image ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureSource {
    /// Decodes the source into RGBA8 pixels.
    ///
    /// Setup must not proceed past this point until it succeeds: a texture that
    /// fails to load is reported, never drawn half-initialized.
    pub fn decode(&self) -> Result<DecodedImage, SetupError> {
        match self {
            TextureSource::File(path) => {
                let name = path.display().to_string();
                let img = image::open(path).map_err(|e| SetupError::asset(&name, e))?;
                let rgba = img.to_rgba8();
                let (width, height) = rgba.dimensions();
                log::debug!("decoded texture {name}: {width}x{height}");
                checked(&name, width, height, rgba.into_raw())
            }
            TextureSource::Rgba {
                width,
                height,
                pixels,
            } => checked("rgba pixels", *width, *height, pixels.clone()),
            TextureSource::Checkerboard { size, cells, a, b } => {
                let max = wgpu::Limits::default().max_texture_dimension_2d;
                if *size > max {
                    return Err(SetupError::asset(
                        "checkerboard",
                        format!("size {size} exceeds the {max} texel texture limit"),
                    ));
                }
                let cells = (*cells).max(1);
                let cell = (*size / cells).max(1);
                let (a, b) = (a.to_rgba8(), b.to_rgba8());
                let mut pixels = Vec::with_capacity((*size as usize).pow(2) * 4);
                for y in 0..*size {
                    for x in 0..*size {
                        let even = ((x / cell) + (y / cell)) % 2 == 0;
                        pixels.extend_from_slice(if even { &a } else { &b });
                    }
                }
                checked("checkerboard", *size, *size, pixels)
            }
        }
    }
}

fn checked(name: &str, width: u32, height: u32, pixels: Vec<u8>) -> Result<DecodedImage, SetupError> {
    if width == 0 || height == 0 {
        return Err(SetupError::asset(name, "image has zero size"));
    }
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(SetupError::asset(
            name,
            format!("expected {expected} bytes of RGBA data, got {}", pixels.len()),
        ));
    }
    Ok(DecodedImage {
        width,
        height,
        pixels,
    })
}

/// Uploaded texture with its view and sampler.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl GpuTexture {
    /// Single mip level, clamped to edge, linear filtering.
    ///
    /// Texels are decoded from sRGB only when `target` re-encodes on write.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DecodedImage,
        target: wgpu::TextureFormat,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("rotor scene texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format_for(target),
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
            &image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("rotor scene sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }
}

pub(crate) fn texture_format_for(target: wgpu::TextureFormat) -> wgpu::TextureFormat {
    if target.is_srgb() {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates_cells() {
        let src = TextureSource::Checkerboard {
            size: 4,
            cells: 2,
            a: Color::rgb(1.0, 1.0, 1.0),
            b: Color::rgb(0.0, 0.0, 0.0),
        };
        let img = src.decode().unwrap();
        assert_eq!((img.width, img.height), (4, 4));
        assert_eq!(img.pixels.len(), 64);
        let px = |x: usize, y: usize| &img.pixels[(y * 4 + x) * 4..(y * 4 + x) * 4 + 4];
        assert_eq!(px(0, 0), &[255, 255, 255, 255]);
        assert_eq!(px(1, 1), &[255, 255, 255, 255]);
        assert_eq!(px(2, 0), &[0, 0, 0, 255]);
        assert_eq!(px(2, 2), &[255, 255, 255, 255]);
    }

    #[test]
    fn oversized_checkerboard_is_rejected_before_allocating() {
        let src = TextureSource::Checkerboard {
            size: 40_000,
            cells: 8,
            a: Color::rgb(1.0, 1.0, 1.0),
            b: Color::rgb(0.0, 0.0, 0.0),
        };
        match src.decode() {
            Err(SetupError::AssetUnavailable { asset, reason }) => {
                assert_eq!(asset, "checkerboard");
                assert!(reason.contains("40000"), "{reason}");
            }
            other => panic!("expected asset error, got {other:?}"),
        }
    }

    #[test]
    fn texture_format_follows_render_target() {
        use wgpu::TextureFormat as F;
        assert_eq!(texture_format_for(F::Bgra8Unorm), F::Rgba8Unorm);
        assert_eq!(texture_format_for(F::Bgra8UnormSrgb), F::Rgba8UnormSrgb);
    }

    #[test]
    fn rgba_length_is_checked() {
        let src = TextureSource::Rgba {
            width: 2,
            height: 2,
            pixels: vec![0; 15],
        };
        assert!(matches!(src.decode(), Err(SetupError::AssetUnavailable { .. })));
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        let src = TextureSource::Rgba {
            width: 0,
            height: 2,
            pixels: Vec::new(),
        };
        assert!(src.decode().is_err());
    }

    #[test]
    fn missing_file_is_asset_unavailable() {
        let src = TextureSource::File(PathBuf::from("/definitely/not/here.png"));
        match src.decode() {
            Err(SetupError::AssetUnavailable { asset, .. }) => assert!(asset.contains("here.png")),
            other => panic!("expected asset error, got {other:?}"),
        }
    }
}
