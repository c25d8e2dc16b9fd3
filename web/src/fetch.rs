use hashbrown::HashMap;
use memory_core::{
    AssetStore, CARD_BACK_FILE, CARD_BACK_URL, CardId, CardManifest, MANIFEST_PATH, MemoryError,
    Result,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::utils::js_reason;

/// Directory the page serves its local assets from.
pub(crate) const ASSET_ROOT: &str = "assets";

pub(crate) fn local_url(name: &str) -> String {
    format!("{ASSET_ROOT}/{name}")
}

async fn fetch_bytes(url: &str) -> core::result::Result<Vec<u8>, String> {
    let window = gloo::utils::window();
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_reason)?
        .dyn_into()
        .map_err(js_reason)?;
    if !response.ok() {
        return Err(format!("{} {}", response.status(), response.status_text()));
    }
    let buffer = JsFuture::from(response.array_buffer().map_err(js_reason)?)
        .await
        .map_err(js_reason)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

pub(crate) async fn load_manifest() -> Result<CardManifest> {
    let url = local_url(MANIFEST_PATH);
    let bytes = fetch_bytes(&url).await.map_err(|reason| {
        log::error!("manifest request failed: {}", reason);
        MemoryError::MissingManifest(url.clone())
    })?;
    CardManifest::from_slice(&bytes)
}

/// Image bytes fetched before the first frame.
///
/// The browser cannot block on a request, so every candidate source is requested up front: the file under
/// [`ASSET_ROOT`] and, when that is missing, the remote reference. Remote failures are kept and reported when the
/// image is first resolved.
#[derive(Debug, Default)]
pub(crate) struct BrowserAssets {
    local: HashMap<String, Vec<u8>>,
    remote: HashMap<String, core::result::Result<Vec<u8>, String>>,
}

impl BrowserAssets {
    pub(crate) async fn prefetch(faces: &[CardId]) -> Self {
        let mut assets = Self::default();
        let sources = faces
            .iter()
            .map(|id| (id.as_str(), id.as_str()))
            .chain([(CARD_BACK_FILE, CARD_BACK_URL)]);

        for (name, remote) in sources {
            if assets.local.contains_key(name) || assets.remote.contains_key(remote) {
                continue;
            }
            match fetch_bytes(&local_url(name)).await {
                Ok(bytes) => {
                    assets.local.insert(name.to_string(), bytes);
                }
                Err(_) => {
                    log::debug!("{} is not a local asset, fetching {}", name, remote);
                    let fetched = fetch_bytes(remote).await;
                    if let Err(reason) = &fetched {
                        log::warn!("fetching {} failed: {}", remote, reason);
                    }
                    assets.remote.insert(remote.to_string(), fetched);
                }
            }
        }
        assets
    }
}

impl AssetStore for BrowserAssets {
    fn read_local(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.local.get(name).cloned())
    }

    fn fetch_remote(&self, url: &str) -> Result<Vec<u8>> {
        match self.remote.get(url) {
            Some(Ok(bytes)) => Ok(bytes.clone()),
            Some(Err(reason)) => Err(MemoryError::FetchFailed {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            None => Err(MemoryError::FetchFailed {
                url: url.to_string(),
                reason: "not requested before the game started".to_string(),
            }),
        }
    }
}
