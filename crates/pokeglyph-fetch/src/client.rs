//! Blocking HTTP sprite source

use crate::{FetchError, Result};
use image::{ImageFormat, RgbaImage};
use pokeglyph_core::{Catalog, CoreError, SpriteSource};
use reqwest::blocking::Client;
use std::time::{Duration, Instant};

/// HTTP client settings
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// User agent sent with every request
    pub user_agent: String,
    /// Overall request timeout (None = reqwest default)
    pub timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            user_agent: format!("pokeglyph/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
        }
    }
}

/// Catalog and sprites over HTTP
pub struct HttpSource {
    client: Client,
    manifest_url: String,
}

impl HttpSource {
    pub fn new(manifest_url: impl Into<String>, options: ClientOptions) -> Result<Self> {
        let mut builder = Client::builder().user_agent(options.user_agent);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FetchError::Client)?;

        Ok(Self {
            client,
            manifest_url: manifest_url.into(),
        })
    }

    /// GET a URL and return the body of a successful response
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        let start = Instant::now();
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().map_err(transport)?;
        tracing::debug!(
            "GET {} -> {} ({} bytes, {}ms)",
            url,
            status,
            body.len(),
            start.elapsed().as_millis()
        );
        Ok(body.to_vec())
    }

    /// Fetch the raw manifest document
    pub fn fetch_manifest(&self) -> Result<String> {
        let body = self.get(&self.manifest_url)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Fetch and decode one sprite
    pub fn fetch_sprite(&self, url: &str) -> Result<RgbaImage> {
        let body = self.get(url)?;
        let img = image::load_from_memory_with_format(&body, ImageFormat::Png).map_err(
            |source| FetchError::Decode {
                url: url.to_string(),
                source,
            },
        )?;
        Ok(img.to_rgba8())
    }
}

impl SpriteSource for HttpSource {
    fn catalog(&self) -> pokeglyph_core::Result<Catalog> {
        let json = self
            .fetch_manifest()
            .map_err(|e| CoreError::Catalog(e.to_string()))?;
        let catalog = Catalog::from_json(&json)?;
        tracing::info!(
            "Loaded {} catalog entries from {}",
            catalog.len(),
            self.manifest_url
        );
        Ok(catalog)
    }

    fn sprite(&self, url: &str) -> pokeglyph_core::Result<RgbaImage> {
        Ok(self.fetch_sprite(url)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pokeglyph_core::{
        IconStore, IconTarget, Pipeline, PipelineOptions, Progress, RunSummary, Slug,
        SpriteUrls, Variant,
    };
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use std::path::PathBuf;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MANIFEST: &str = r#"{
        "001": { "name": { "eng": "Bulbasaur" } },
        "122": { "name": { "eng": "Mr. Mime" } },
        "029": { "name": { "eng": "Nidoran♀" } }
    }"#;

    fn png(color: Rgba<u8>) -> Vec<u8> {
        let img = RgbaImage::from_pixel(4, 4, color);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    async fn mount_sprite(server: &MockServer, route: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png(Rgba([9, 8, 7, 255]))))
            .mount(server)
            .await;
    }

    async fn sprite_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/pokemon.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MANIFEST))
            .mount(&server)
            .await;
        for slug in ["bulbasaur", "mr-mime", "nidoran-f"] {
            for variant in ["regular", "shiny"] {
                mount_sprite(&server, &format!("/gen8/{variant}/{slug}.png")).await;
            }
        }
        mount_sprite(&server, "/gen8/unknown.png").await;
        server
    }

    fn run_blocking(uri: String, root: PathBuf) -> pokeglyph_core::Result<RunSummary> {
        let source = HttpSource::new(
            format!("{uri}/data/pokemon.json"),
            ClientOptions::default(),
        )
        .unwrap();
        let urls = SpriteUrls::new(format!("{uri}/gen8"), format!("{uri}/gen8/unknown.png"));
        Pipeline::new(urls, PipelineOptions::default()).run(
            &source,
            &IconStore::new(root),
            &mut Progress::hidden(Vec::new()),
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fetch_sprite_decodes_png() {
        let server = sprite_server().await;
        let src = format!("{}/gen8/regular/bulbasaur.png", server.uri());
        let uri = server.uri();

        let img = tokio::task::spawn_blocking(move || {
            let source = HttpSource::new(format!("{uri}/data/pokemon.json"), ClientOptions::default())
                .unwrap();
            source.fetch_sprite(&src)
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(img.dimensions(), (4, 4));
        assert_eq!(*img.get_pixel(0, 0), Rgba([9, 8, 7, 255]));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_not_found_is_status_error() {
        let server = MockServer::start().await;
        let url = format!("{}/gen8/shiny/missingno.png", server.uri());
        let uri = server.uri();

        let err = tokio::task::spawn_blocking(move || {
            let source = HttpSource::new(format!("{uri}/data/pokemon.json"), ClientOptions::default())
                .unwrap();
            source.fetch_sprite(&url)
        })
        .await
        .unwrap()
        .unwrap_err();

        assert!(matches!(err, FetchError::Status { status, .. } if status == 404));
        assert!(err.url().unwrap().ends_with("/gen8/shiny/missingno.png"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_corrupt_png_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gen8/regular/glitch.png"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not a png"))
            .mount(&server)
            .await;
        let url = format!("{}/gen8/regular/glitch.png", server.uri());
        let uri = server.uri();

        let err = tokio::task::spawn_blocking(move || {
            let source = HttpSource::new(format!("{uri}/data/pokemon.json"), ClientOptions::default())
                .unwrap();
            source.fetch_sprite(&url)
        })
        .await
        .unwrap()
        .unwrap_err();

        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_catalog_over_http() {
        let server = sprite_server().await;
        let source_server = server.uri();

        let catalog = tokio::task::spawn_blocking(move || {
            let source = HttpSource::new(
                format!("{source_server}/data/pokemon.json"),
                ClientOptions::default(),
            )
            .unwrap();
            source.catalog()
        })
        .await
        .unwrap()
        .unwrap();

        let slugs: Vec<&str> = catalog.entries().iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["bulbasaur", "mr-mime", "nidoran-f"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_manifest_failure_is_catalog_error() {
        let server = MockServer::start().await;
        let uri = server.uri();

        let result =
            tokio::task::spawn_blocking(move || run_blocking(uri, PathBuf::from("unused")))
                .await
                .unwrap();

        assert!(matches!(result, Err(CoreError::Catalog(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_full_run_and_resume() {
        let server = sprite_server().await;
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();

        let first = tokio::task::spawn_blocking({
            let (uri, root) = (server.uri(), root.clone());
            move || run_blocking(uri, root)
        })
        .await
        .unwrap()
        .unwrap();
        assert_eq!(first.to_string(), "7/7");
        assert_eq!(server.received_requests().await.unwrap().len(), 8);

        let store = IconStore::new(&root);
        let target = IconTarget::sprite(Variant::Regular, &Slug::from_name("Mr. Mime"));
        let before = std::fs::read(store.path(&target)).unwrap();

        let second = tokio::task::spawn_blocking({
            let (uri, root) = (server.uri(), root.clone());
            move || run_blocking(uri, root)
        })
        .await
        .unwrap()
        .unwrap();
        assert_eq!(second.present, 7);
        // Only the manifest is requested again
        assert_eq!(server.received_requests().await.unwrap().len(), 9);
        assert_eq!(std::fs::read(store.path(&target)).unwrap(), before);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_one_missing_sprite_does_not_abort() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/pokemon.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(MANIFEST))
            .mount(&server)
            .await;
        for route in [
            "/gen8/regular/bulbasaur.png",
            "/gen8/shiny/bulbasaur.png",
            "/gen8/regular/mr-mime.png",
            "/gen8/regular/nidoran-f.png",
            "/gen8/shiny/nidoran-f.png",
            "/gen8/unknown.png",
        ] {
            mount_sprite(&server, route).await;
        }
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_path_buf();

        let summary = tokio::task::spawn_blocking({
            let (uri, root) = (server.uri(), root.clone());
            move || run_blocking(uri, root)
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(summary.produced(), 6);
        assert_eq!(summary.failed, 1);
        let store = IconStore::new(&root);
        assert!(store.exists(&IconTarget::sprite(
            Variant::Shiny,
            &Slug::from_name("Nidoran♀")
        )));
        assert!(store.exists(&IconTarget::Unknown));
    }
}
