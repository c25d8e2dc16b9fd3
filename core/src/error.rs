use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Missing card manifest at {0}")]
    MissingManifest(String),
    #[error("Malformed card manifest: {0}")]
    MalformedManifest(#[from] serde_json::Error),
    #[error("Card manifest lists {found} images but the board needs {needed}")]
    NotEnoughCards { found: usize, needed: usize },
    #[error("Could not read asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },
    #[error("Could not decode image {id}: {source}")]
    Decode {
        id: String,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = core::result::Result<T, MemoryError>;
