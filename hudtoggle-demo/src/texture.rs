// ABOUTME: Cube texture sources: a decoded image file or a generated badge tile.
// ABOUTME: Checks the size against device limits and uploads into an sRGB texture.

use std::path::PathBuf;

use anyhow::Context;

/// Side length of the generated tile.
pub const BUILTIN_SIZE: u32 = 256;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextureSource {
    #[default]
    Builtin,
    File(PathBuf),
}

/// Tightly packed RGBA8 pixels, row-major from the top-left.
#[derive(Debug, Clone)]
pub struct TexturePixels {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureSource {
    pub fn load(&self) -> anyhow::Result<TexturePixels> {
        match self {
            TextureSource::Builtin => Ok(builtin_badge(BUILTIN_SIZE)),
            TextureSource::File(path) => {
                let img = image::open(path)
                    .with_context(|| format!("load cube texture {}", path.display()))?
                    .to_rgba8();
                let (width, height) = img.dimensions();
                anyhow::ensure!(
                    width > 0 && height > 0,
                    "cube texture {} is empty",
                    path.display()
                );
                tracing::info!("cube texture: {} ({width}x{height})", path.display());
                Ok(TexturePixels {
                    width,
                    height,
                    rgba: img.into_raw(),
                })
            }
        }
    }
}

/// Pink rounded badge with a diagonal stripe and dark border, so cube
/// orientation is readable on every face.
pub fn builtin_badge(size: u32) -> TexturePixels {
    let size = size.max(8);
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    let border = size / 16;
    let stripe = size / 10;
    for y in 0..size {
        for x in 0..size {
            let on_border = x < border || y < border || x >= size - border || y >= size - border;
            let on_stripe = x.abs_diff(y) < stripe;
            let px: [u8; 4] = if on_border {
                [40, 10, 60, 255]
            } else if on_stripe {
                [250, 250, 255, 255]
            } else {
                let t = (x + y) as f32 / (2 * size) as f32;
                [
                    (235.0 - 60.0 * t) as u8,
                    (70.0 + 20.0 * t) as u8,
                    (150.0 + 80.0 * t) as u8,
                    255,
                ]
            };
            rgba.extend_from_slice(&px);
        }
    }
    TexturePixels {
        width: size,
        height: size,
        rgba,
    }
}

/// Fail unless both sides fit the device's 2D texture limit.
pub fn check_texture_fits(pixels: &TexturePixels, max_dim: u32) -> anyhow::Result<()> {
    anyhow::ensure!(
        pixels.width <= max_dim && pixels.height <= max_dim,
        "cube texture is {}x{}, device allows at most {max_dim}x{max_dim}",
        pixels.width,
        pixels.height
    );
    Ok(())
}

/// Upload pixels into a sampled sRGB texture.
pub fn upload(device: &wgpu::Device, queue: &wgpu::Queue, pixels: &TexturePixels) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: pixels.width,
        height: pixels.height,
        depth_or_array_layers: 1,
    };
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("cube-texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &tex,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &pixels.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * pixels.width),
            rows_per_image: Some(pixels.height),
        },
        size,
    );
    tex.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_expected_size_and_is_opaque() {
        let px = TextureSource::Builtin.load().unwrap();
        assert_eq!(px.width, BUILTIN_SIZE);
        assert_eq!(px.height, BUILTIN_SIZE);
        assert_eq!(px.rgba.len(), (BUILTIN_SIZE * BUILTIN_SIZE * 4) as usize);
        assert!(px.rgba.chunks(4).all(|p| p[3] == 255));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let src = TextureSource::File(dir.path().join("sppico.png"));
        let err = src.load().unwrap_err();
        assert!(format!("{err:#}").contains("sppico.png"));
    }

    #[test]
    fn file_texture_is_decoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]));
        img.save(&path).unwrap();

        let px = TextureSource::File(path).load().unwrap();
        assert_eq!((px.width, px.height), (3, 2));
        assert_eq!(&px.rgba[..4], &[1, 2, 3, 255]);
    }

    #[test]
    fn oversized_texture_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbaImage::from_pixel(33, 8, image::Rgba([0, 0, 0, 255]))
            .save(&path)
            .unwrap();
        let px = TextureSource::File(path).load().unwrap();

        let err = check_texture_fits(&px, 32).unwrap_err();
        assert!(err.to_string().contains("33x8"), "{err}");
        check_texture_fits(&px, 33).unwrap();
    }

    #[test]
    fn builtin_fits_downlevel_limits() {
        let px = TextureSource::Builtin.load().unwrap();
        let max_dim = wgpu::Limits::downlevel_defaults().max_texture_dimension_2d;
        check_texture_fits(&px, max_dim).unwrap();
    }
}
