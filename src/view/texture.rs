//! Texture files on disk, decoded to RGBA8 and handed to whatever owns GPU memory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::TextureError;

/// Opaque texture id. `INVALID` draws as plain white.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    pub const INVALID: TextureHandle = TextureHandle(0);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

#[derive(Debug, Clone)]
pub struct DecodedTexture {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Receives decoded pixels and hands back a handle for later binds.
pub trait TextureSink {
    fn upload(&mut self, texture: &DecodedTexture) -> TextureHandle;
}

pub fn decode_texture(path: &Path) -> Result<DecodedTexture, TextureError> {
    let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&bytes).map_err(|source| TextureError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureError::Empty { path: path.to_path_buf() });
    }

    Ok(DecodedTexture {
        path: path.to_path_buf(),
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// Decode and upload. Failures are logged and yield [`TextureHandle::INVALID`].
pub fn load_texture<S: TextureSink + ?Sized>(sink: &mut S, path: &Path) -> TextureHandle {
    match decode_texture(path) {
        Ok(texture) => {
            debug!(path = %path.display(), texture.width, texture.height, "texture loaded");
            sink.upload(&texture)
        }
        Err(err) => {
            warn!(%err, "texture failed to load");
            TextureHandle::INVALID
        }
    }
}

/// Every texture the scene draws with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneTextures {
    pub handle: TextureHandle,
    pub sky: TextureHandle,
    pub bars: TextureHandle,
    pub dirt: TextureHandle,
    pub bloody_dirt: TextureHandle,
    pub sven_body: TextureHandle,
    pub sven_head: TextureHandle,
    pub sheep_body: TextureHandle,
    pub sheep_head: TextureHandle,
    pub sheep_face: TextureHandle,
    pub wood: TextureHandle,
    pub obsidian: TextureHandle,
    pub leaf: TextureHandle,
    pub netherrack: TextureHandle,
    pub zombie_body: TextureHandle,
    pub zombie_head: TextureHandle,
    pub denim: TextureHandle,
    pub podzol: TextureHandle,
    pub game_over: TextureHandle,
    pub game_won: TextureHandle,
    pub glowstone: TextureHandle,
    pub portal: TextureHandle,
}

impl SceneTextures {
    pub fn load<S: TextureSink + ?Sized>(dir: &Path, sink: &mut S) -> Self {
        let mut load = |file: &str| load_texture(sink, &dir.join(file));
        let textures = Self {
            handle: load("handle.jpg"),
            sky: load("sky.jpg"),
            bars: load("bars.png"),
            dirt: load("dirt.jpg"),
            bloody_dirt: load("bloody.png"),
            sven_body: load("svenBody.jpg"),
            sven_head: load("svenHead.png"),
            sheep_body: load("waterSheepBody.jpg"),
            sheep_head: load("sheepHead.jpg"),
            sheep_face: load("waterSheepFace.png"),
            wood: load("wood.jpg"),
            obsidian: load("obsidian.png"),
            leaf: load("leaf.png"),
            netherrack: load("netherack.png"),
            zombie_body: load("zombieBody.jpg"),
            zombie_head: load("zombieHead.jpg"),
            denim: load("denim.jpeg"),
            podzol: load("podzol.jpg"),
            game_over: load("gameover.png"),
            game_won: load("gamewin.jpg"),
            glowstone: load("glowstone.jpeg"),
            portal: load("portal.jpeg"),
        };
        tracing::info!(dir = %dir.display(), "scene textures loaded");
        textures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingSink {
        uploads: Vec<(u32, u32)>,
    }

    impl TextureSink for CountingSink {
        fn upload(&mut self, texture: &DecodedTexture) -> TextureHandle {
            self.uploads.push((texture.width, texture.height));
            TextureHandle(self.uploads.len() as u32)
        }
    }

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn decodes_png_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "red.png", 3, 2);
        let texture = decode_texture(&path).unwrap();
        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(texture.rgba.len(), 3 * 2 * 4);
        assert_eq!(&texture.rgba[..4], &[200, 10, 10, 255]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode_texture(&dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, TextureError::Io { .. }));
        assert!(err.to_string().contains("nope.png"));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(decode_texture(&path), Err(TextureError::Decode { .. })));
    }

    #[test]
    fn failed_load_yields_invalid_handle_without_upload() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CountingSink::default();
        let handle = load_texture(&mut sink, &dir.path().join("missing.jpg"));
        assert_eq!(handle, TextureHandle::INVALID);
        assert!(!handle.is_valid());
        assert!(sink.uploads.is_empty());
    }

    #[test]
    fn scene_textures_load_what_exists() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "bars.png", 4, 4);
        write_png(dir.path(), "leaf.png", 2, 2);

        let mut sink = CountingSink::default();
        let textures = SceneTextures::load(dir.path(), &mut sink);

        assert_eq!(sink.uploads.len(), 2);
        assert!(textures.bars.is_valid());
        assert!(textures.leaf.is_valid());
        assert_ne!(textures.bars, textures.leaf);
        assert!(!textures.sky.is_valid());
        assert!(!textures.portal.is_valid());
    }
}
