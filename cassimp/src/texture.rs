//! Embedded textures
//!
//! Some formats store images inside the model file. Assimp hands them over
//! either as a compressed payload (`height == 0`, PNG/JPEG/... bytes in
//! `width` bytes) or as raw BGRA texels.

use crate::{
    ffi,
    sys,
    types::{Vector4D, ai_string_to_string},
};

/// One texel of an uncompressed texture, in Assimp's BGRA order.
///
/// Layout-compatible with `aiTexel`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Texel {
    /// Blue component
    pub b: u8,
    /// Green component
    pub g: u8,
    /// Red component
    pub r: u8,
    /// Alpha component
    pub a: u8,
}

const _: () = assert!(std::mem::size_of::<Texel>() == std::mem::size_of::<sys::aiTexel>());

impl Texel {
    /// Components as `[r, g, b, a]`
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Components normalized to `0.0..=1.0`, as `(r, g, b, a)`
    pub fn to_vec4(self) -> Vector4D {
        Vector4D::from_array(self.to_rgba().map(f32::from)) / 255.0
    }
}

/// An embedded texture of a scene
#[derive(Clone, Copy)]
pub struct Texture<'a> {
    raw: &'a sys::aiTexture,
}

impl<'a> Texture<'a> {
    pub(crate) fn new(raw: &'a sys::aiTexture) -> Self {
        Self { raw }
    }

    /// The underlying `aiTexture`
    pub fn as_raw(&self) -> *const sys::aiTexture {
        self.raw
    }

    /// Original file name, when the format recorded one
    pub fn filename(&self) -> String {
        ai_string_to_string(&self.raw.mFilename)
    }

    /// Format hint of a compressed texture, such as `"png"` or `"jpg"`;
    /// for raw data, the channel layout such as `"rgba8888"`. Empty if unset.
    pub fn format_hint(&self) -> String {
        let hint = &self.raw.achFormatHint;
        let bytes: Vec<u8> = hint
            .iter()
            .take_while(|&&c| c != 0)
            .map(|&c| c as u8)
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Width in texels, or the payload size in bytes when compressed
    pub fn width(&self) -> u32 {
        self.raw.mWidth
    }

    /// Height in texels; 0 for compressed textures
    pub fn height(&self) -> u32 {
        self.raw.mHeight
    }

    /// Whether the data is an encoded image file rather than raw texels
    pub fn is_compressed(&self) -> bool {
        self.raw.mHeight == 0
    }

    /// Number of `aiTexel`-sized units behind the data pointer
    pub fn num_pixels(&self) -> usize {
        if self.is_compressed() {
            self.raw.mWidth as usize / 4
        } else {
            self.raw.mWidth as usize * self.raw.mHeight as usize
        }
    }

    /// Texels of an uncompressed texture, row by row; `None` when compressed
    pub fn texels(&self) -> Option<&'a [Texel]> {
        if self.is_compressed() {
            return None;
        }
        let raw = unsafe { ffi::slice_opt(self.raw.pcData, self.num_pixels()) }?;
        Some(unsafe { ffi::cast_slice(raw) })
    }

    /// The texture data as bytes: BGRA texels, or the complete encoded file
    /// when compressed
    pub fn data_bytes(&self) -> &'a [u8] {
        let len = if self.is_compressed() {
            self.raw.mWidth as usize
        } else {
            self.num_pixels() * std::mem::size_of::<Texel>()
        };
        unsafe { ffi::slice(self.raw.pcData.cast::<u8>(), len) }
    }
}

impl std::fmt::Debug for Texture<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("filename", &self.filename())
            .field("format_hint", &self.format_hint())
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_texture(width: u32, height: u32, data: &mut [sys::aiTexel], hint: &str) -> sys::aiTexture {
        let mut raw = sys::aiTexture {
            mWidth: width,
            mHeight: height,
            pcData: data.as_mut_ptr(),
            mFilename: crate::types::ai_string_from_str("albedo.png").unwrap(),
            ..Default::default()
        };
        for (dst, src) in raw.achFormatHint.iter_mut().zip(hint.bytes()) {
            *dst = src as _;
        }
        raw
    }

    #[test]
    fn uncompressed_texels_are_borrowed() {
        let mut data = [sys::aiTexel {
            b: 10,
            g: 20,
            r: 30,
            a: 255,
        }; 6];
        let raw = raw_texture(3, 2, &mut data, "rgba8888");
        let texture = Texture::new(&raw);
        assert!(!texture.is_compressed());
        assert_eq!(texture.num_pixels(), 6);
        let texels = texture.texels().unwrap();
        assert_eq!(texels.len(), 6);
        assert_eq!(texels[0].to_rgba(), [30, 20, 10, 255]);
        assert_eq!(texture.data_bytes().len(), 24);
        assert_eq!(texture.format_hint(), "rgba8888");
        assert_eq!(texture.filename(), "albedo.png");
    }

    #[test]
    fn compressed_payload_keeps_every_byte() {
        // 10 payload bytes live inside 3 texels of storage.
        let mut data = [sys::aiTexel::default(); 3];
        let raw = raw_texture(10, 0, &mut data, "png");
        let texture = Texture::new(&raw);
        assert!(texture.is_compressed());
        assert_eq!(texture.num_pixels(), 2);
        assert!(texture.texels().is_none());
        assert_eq!(texture.data_bytes().len(), 10);
        assert_eq!(texture.format_hint(), "png");
    }

    #[test]
    fn texel_normalizes() {
        let t = Texel {
            b: 0,
            g: 0,
            r: 255,
            a: 255,
        };
        assert_eq!(t.to_vec4(), Vector4D::new(1.0, 0.0, 0.0, 1.0));
    }
}
