use image::DynamicImage;
use image::imageops::FilterType;

use crate::*;

#[cfg(not(target_arch = "wasm32"))]
pub use fs::FsAssetStore;

pub const CARD_BACK_FILE: &str = "card_back.png";
pub const CARD_BACK_URL: &str = "https://img.icons8.com/ios11/512/F25081/monster-energy.png";

/// Where image bytes come from: files under the asset root first, remote references otherwise.
pub trait AssetStore {
    /// Bytes of `name` under the asset root, `None` when there is no such file.
    fn read_local(&self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Bytes behind a remote reference, any non-success response is an error.
    fn fetch_remote(&self, url: &str) -> Result<Vec<u8>>;
}

impl<S: AssetStore + ?Sized> AssetStore for &S {
    fn read_local(&self, name: &str) -> Result<Option<Vec<u8>>> {
        (**self).read_local(name)
    }

    fn fetch_remote(&self, url: &str) -> Result<Vec<u8>> {
        (**self).fetch_remote(url)
    }
}

/// Decoded RGBA image ready to blit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Sprite {
    /// Scales `image` to a `size` by `size` square.
    pub fn from_image(image: &DynamicImage, size: u32) -> Self {
        let scaled = image.resize_exact(size, size, FilterType::Triangle).to_rgba8();
        Self {
            width: scaled.width(),
            height: scaled.height(),
            rgba: scaled.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA bytes, four per pixel.
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }
}

/// Resolves card identifiers to decoded images.
#[derive(Clone, Debug)]
pub struct AssetLoader<S> {
    store: S,
}

impl<S: AssetStore> AssetLoader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load_image(&self, id: &CardId) -> Result<DynamicImage> {
        let id = id.as_str();
        let bytes = match self.store.read_local(id)? {
            Some(bytes) => bytes,
            None => {
                log::debug!("{} is not a local asset, fetching", id);
                self.store.fetch_remote(id)?
            }
        };
        decode(id, &bytes)
    }

    pub fn load_card_back(&self) -> Result<DynamicImage> {
        if let Some(bytes) = self.store.read_local(CARD_BACK_FILE)? {
            return decode(CARD_BACK_FILE, &bytes);
        }
        log::debug!("no local {}, using {}", CARD_BACK_FILE, CARD_BACK_URL);
        let bytes = self.store.fetch_remote(CARD_BACK_URL)?;
        decode(CARD_BACK_URL, &bytes)
    }
}

fn decode(id: &str, bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|source| MemoryError::Decode {
        id: id.to_string(),
        source,
    })
}

#[cfg(not(target_arch = "wasm32"))]
mod fs {
    use std::path::{Path, PathBuf};

    use crate::*;

    /// Asset root on disk, remote references fetched with a blocking HTTP request.
    #[derive(Clone, Debug)]
    pub struct FsAssetStore {
        root: PathBuf,
    }

    impl FsAssetStore {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        pub fn root(&self) -> &Path {
            &self.root
        }
    }

    impl AssetStore for FsAssetStore {
        fn read_local(&self, name: &str) -> Result<Option<Vec<u8>>> {
            let path = self.root.join(name);
            if !path.is_file() {
                return Ok(None);
            }
            Ok(Some(std::fs::read(path)?))
        }

        fn fetch_remote(&self, url: &str) -> Result<Vec<u8>> {
            let fetch_failed = |err: reqwest::Error| MemoryError::FetchFailed {
                url: url.to_string(),
                reason: err.to_string(),
            };
            let bytes = reqwest::blocking::get(url)
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.bytes())
                .map_err(fetch_failed)?;
            Ok(bytes.to_vec())
        }
    }
}
