//! Startup asset loading.
//!
//! Assets are read once from fixed paths under a resource root. Texture
//! decoding reports failure explicitly; the caller decides what to draw
//! instead.
//!
//! # Layout
//! ```text
//! <root>/shaders/basic.wgsl
//! <root>/shaders/outline.wgsl
//! <root>/shaders/light.wgsl
//! <root>/textures/container.png
//! <root>/textures/container_specular.png
//! ```

use image::imageops::FilterType;
use std::path::{Path, PathBuf};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image {} has zero size", path.display())]
    EmptyImage { path: PathBuf },
}

/// Fixed asset locations relative to a resource root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    root: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::new("res")
    }
}

impl AssetPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn shader(&self, name: &str) -> PathBuf {
        self.root.join("shaders").join(format!("{name}.wgsl"))
    }

    pub fn diffuse_texture(&self) -> PathBuf {
        self.root.join("textures").join("container.png")
    }

    pub fn specular_texture(&self) -> PathBuf {
        self.root.join("textures").join("container_specular.png")
    }
}

/// One level of a texture's mip chain, tightly packed RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// A decoded image ready for upload.
#[derive(Debug, Clone)]
pub struct DecodedTexture {
    pub width: u32,
    pub height: u32,
    /// Channel count of the source file (1, 2, 3 or 4). Pixels are always
    /// expanded to RGBA8.
    pub source_channels: u8,
    /// Level 0 is the full-size image; the last level is 1x1.
    pub mips: Vec<MipLevel>,
}

impl DecodedTexture {
    pub fn mip_level_count(&self) -> u32 {
        self.mips.len() as u32
    }
}

/// Read a shader source file.
pub fn load_shader_source(path: impl AsRef<Path>) -> Result<String, AssetError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "loaded shader source");
    Ok(source)
}

/// Read and decode an image file, building its full mip chain.
pub fn decode_texture(path: impl AsRef<Path>) -> Result<DecodedTexture, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_texture_bytes(&bytes, path)
}

/// Decode in-memory image bytes. `path` is only used for diagnostics.
pub fn decode_texture_bytes(bytes: &[u8], path: &Path) -> Result<DecodedTexture, AssetError> {
    let image = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let source_channels = image.color().channel_count();
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(AssetError::EmptyImage {
            path: path.to_path_buf(),
        });
    }

    let levels = mip_level_count(width, height);
    let mut mips = Vec::with_capacity(levels as usize);
    mips.push(MipLevel {
        width,
        height,
        rgba: rgba.as_raw().clone(),
    });
    let (mut w, mut h) = (width, height);
    for _ in 1..levels {
        w = (w / 2).max(1);
        h = (h / 2).max(1);
        let level = image::imageops::resize(&rgba, w, h, FilterType::Triangle);
        mips.push(MipLevel {
            width: w,
            height: h,
            rgba: level.into_raw(),
        });
    }

    tracing::info!(
        path = %path.display(),
        width,
        height,
        channels = source_channels,
        mips = levels,
        "decoded texture"
    );

    Ok(DecodedTexture {
        width,
        height,
        source_channels,
        mips,
    })
}

/// Number of levels in a full mip chain down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

pub fn crate_info() -> &'static str {
    "lumen-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x * 30) as u8, (y * 60) as u8, 200])
        });
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn mip_counts() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(8, 4), 4);
        assert_eq!(mip_level_count(512, 512), 10);
        assert_eq!(mip_level_count(500, 3), 9);
        assert_eq!(mip_level_count(0, 0), 1);
    }

    #[test]
    fn decode_png_builds_mip_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "rgb.png", 8, 4);

        let tex = decode_texture(&path).unwrap();
        assert_eq!((tex.width, tex.height), (8, 4));
        assert_eq!(tex.source_channels, 3);
        assert_eq!(tex.mip_level_count(), 4);
        assert_eq!(tex.mips[0].rgba.len(), 8 * 4 * 4);
        let last = tex.mips.last().unwrap();
        assert_eq!((last.width, last.height), (1, 1));
        assert_eq!(last.rgba.len(), 4);
        // Alpha is filled in for RGB sources.
        assert!(tex.mips[0].rgba.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let err = decode_texture(&path).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
        assert!(err.to_string().contains("broken.png"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode_texture(dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn shader_source_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AssetPaths::new(dir.path());
        std::fs::create_dir_all(paths.shader("basic").parent().unwrap()).unwrap();
        std::fs::write(paths.shader("basic"), "@vertex fn vs_main() {}").unwrap();

        let src = load_shader_source(paths.shader("basic")).unwrap();
        assert!(src.contains("vs_main"));
        assert!(matches!(
            load_shader_source(paths.shader("missing")),
            Err(AssetError::Io { .. })
        ));
    }

    #[test]
    fn default_paths_live_under_res() {
        let paths = AssetPaths::default();
        assert_eq!(paths.root(), Path::new("res"));
        assert!(paths.diffuse_texture().ends_with("textures/container.png"));
        assert!(paths.shader("outline").ends_with("shaders/outline.wgsl"));
    }
}
