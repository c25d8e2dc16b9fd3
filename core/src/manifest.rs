use serde::{Deserialize, Serialize};

use crate::*;

/// Path of the manifest relative to the asset root.
pub const MANIFEST_PATH: &str = "images/images.json";

/// The card identifier source: `{"images": ["...", ...]}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardManifest {
    pub images: Vec<CardId>,
}

impl CardManifest {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses raw manifest bytes, which must be UTF-8 JSON.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Reads the manifest from disk, a missing file is reported as such rather than as an I/O error.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MemoryError::MissingManifest(path.display().to_string()));
        }
        let manifest = Self::from_slice(&std::fs::read(path)?)?;
        log::debug!(
            "loaded {} card images from {}",
            manifest.images.len(),
            path.display()
        );
        Ok(manifest)
    }

    /// The first `pairs` identifiers, one per pair on the board.
    pub fn card_faces(&self, pairs: usize) -> Result<Vec<CardId>> {
        if self.images.len() < pairs {
            return Err(MemoryError::NotEnoughCards {
                found: self.images.len(),
                needed: pairs,
            });
        }
        if self.images.len() > pairs {
            log::warn!(
                "Card manifest lists {} images, only the first {} are used",
                self.images.len(),
                pairs
            );
        }
        Ok(self.images[..pairs].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_image_list() {
        let manifest = CardManifest::from_json(r#"{"images": ["a.png", "https://x/b.png"]}"#).unwrap();

        assert_eq!(
            manifest.images,
            vec![CardId::new("a.png"), CardId::new("https://x/b.png")]
        );
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = CardManifest::from_slice(b"{\"images\": [\"a\xff.png\"]}").unwrap_err();

        assert!(matches!(err, MemoryError::MalformedManifest(_)));
        assert_eq!(
            CardManifest::from_slice(br#"{"images": ["a.png"]}"#).unwrap().images,
            vec![CardId::new("a.png")]
        );
    }

    #[test]
    fn rejects_document_without_images() {
        let err = CardManifest::from_json(r#"{"cards": []}"#).unwrap_err();

        assert!(matches!(err, MemoryError::MalformedManifest(_)));
    }

    #[test]
    fn card_faces_requires_one_image_per_pair() {
        let manifest = CardManifest::from_json(r#"{"images": ["a", "b", "c"]}"#).unwrap();

        let err = manifest.card_faces(4).unwrap_err();
        assert!(matches!(
            err,
            MemoryError::NotEnoughCards {
                found: 3,
                needed: 4
            }
        ));
        assert_eq!(
            manifest.card_faces(2).unwrap(),
            vec![CardId::new("a"), CardId::new("b")]
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn load_reports_missing_manifest() {
        let path = std::env::temp_dir().join("memory-core-no-such-manifest.json");

        let err = CardManifest::load(&path).unwrap_err();

        assert!(matches!(err, MemoryError::MissingManifest(_)));
    }
}
