#![cfg(not(target_arch = "wasm32"))]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;

use memory_core::*;
use web_time::Instant;

fn asset_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../web/assets")
}

#[derive(Default)]
struct NullSurface {
    frames: usize,
}

impl Surface for NullSurface {
    fn clear(&mut self, _color: Color) {}
    fn fill_rect(&mut self, _rect: Rect, _color: Color) {}
    fn stroke_rect(&mut self, _rect: Rect, _color: Color, _width: Px) {}
    fn draw_text(&mut self, _text: &str, _pos: Px2, _anchor: TextAnchor, _color: Color) {}
    fn blit(&mut self, sprite: &Sprite, _pos: Px2) {
        assert_eq!((sprite.width(), sprite.height()), (90, 90));
    }
    fn present(&mut self) {
        self.frames += 1;
    }
}

/// Serves the bundled assets over HTTP for `requests` connections, answering unknown paths with 404.
fn serve_assets(requests: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    thread::spawn(move || {
        for stream in listener.incoming().take(requests) {
            let mut stream = stream.unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                    break;
                }
            }

            let path = request_line.split_whitespace().nth(1).unwrap_or("/");
            let file = asset_root().join(path.trim_start_matches('/'));
            let (status, body) = match std::fs::read(&file) {
                Ok(body) if file.is_file() => ("200 OK", body),
                _ => ("404 Not Found", Vec::new()),
            };
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .unwrap();
            stream.write_all(&body).unwrap();
        }
    });
    base
}

#[test]
fn remote_assets_fetched_over_http() {
    let base = serve_assets(2);
    let empty_root = std::env::temp_dir().join(format!("memory-core-remote-{}", std::process::id()));
    let loader = AssetLoader::new(FsAssetStore::new(&empty_root));

    let image = loader.load_image(&CardId::new(format!("{base}/cards/red.png"))).unwrap();
    assert_eq!((image.width(), image.height()), (90, 90));

    let missing = format!("{base}/cards/missing.png");
    let err = loader.load_image(&CardId::new(missing.clone())).unwrap_err();
    assert!(matches!(
        err,
        MemoryError::FetchFailed { ref url, ref reason } if *url == missing && reason.contains("404")
    ));
}

#[test]
fn bundled_manifest_has_one_face_per_pair() {
    let manifest = CardManifest::load(asset_root().join(MANIFEST_PATH)).unwrap();

    let faces = manifest.card_faces(MemoryConfig::default().pair_count()).unwrap();

    assert_eq!(faces.len(), 8);
}

#[test]
fn bundled_assets_resolve_from_disk() {
    let root = asset_root();
    let manifest = CardManifest::load(root.join(MANIFEST_PATH)).unwrap();
    let loader = AssetLoader::new(FsAssetStore::new(&root));

    for id in &manifest.images {
        let image = loader.load_image(id).unwrap();
        assert_eq!((image.width(), image.height()), (90, 90), "{id}");
    }
    assert!(loader.load_card_back().is_ok());
}

#[test]
fn session_plays_on_bundled_assets() {
    let root = asset_root();
    let manifest = CardManifest::load(root.join(MANIFEST_PATH)).unwrap();
    let now = Instant::now();
    let mut controller = MemoryController::start(
        MemoryConfig::default(),
        &manifest,
        AssetLoader::new(FsAssetStore::new(&root)),
        2024,
        now,
    )
    .unwrap();
    let mut surface = NullSurface::default();

    let presses: Vec<InputEvent> = [(50, 100), (150, 100)]
        .into_iter()
        .map(|(x, y)| InputEvent::PointerPress { x, y })
        .collect();
    let outcome = controller.tick(presses, now, &mut surface).unwrap();

    assert_eq!(outcome, TickOutcome::Running);
    assert_eq!(controller.game().moves(), 2);
    assert_eq!(controller.view().cached_faces(), {
        let game = controller.game();
        if game.card_at(0) == game.card_at(1) { 1 } else { 2 }
    });
    assert_eq!(surface.frames, 1);
}
