use crate::error::TextureError;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8,
    Bgra8,
}

impl TextureFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgba8 | Self::Bgra8 => 4,
        }
    }
}

/// Decoded pixel data, ready to hand to a GPU backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub label: String,
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

impl Texture {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let rgba_image = image.to_rgba8();
        let (width, height) = rgba_image.dimensions();
        tracing::debug!(path = %path.display(), width, height, "decoded texture");

        let mut texture = Self::from_rgba8(width, height, rgba_image.into_raw())?;
        texture.label = path.display().to_string();
        Ok(texture)
    }

    pub fn create_from_data(
        label: impl Into<String>,
        data: &[u8],
        width: u32,
        height: u32,
        format: TextureFormat,
    ) -> Result<Self, TextureError> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(TextureError::InvalidDataSize {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            label: label.into(),
            pixels: data.to_vec(),
            width,
            height,
            format,
        })
    }

    /// Takes ownership of already decoded RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TextureError> {
        let expected = width as usize * height as usize * TextureFormat::Rgba8.bytes_per_pixel();
        if pixels.len() != expected {
            return Err(TextureError::InvalidDataSize {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            label: format!("rgba8 {width}x{height}"),
            pixels,
            width,
            height,
            format: TextureFormat::Rgba8,
        })
    }

    #[must_use]
    pub fn bytes_per_row(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }
}
