//! HTTP surface
//!
//! Routes:
//! - `/module/*path`: package entry files as AMD modules, falling back to
//!   files under the public directory
//! - `/fonts/*path`: font files looked up by name
//! - `/`: the index page with the assembled bundle injected
//! - anything else: static files from the public directory

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{debug, error, info};

use crate::bundler::{BundleAssembler, BundleResult};
use crate::cli::ServerOptions;
use crate::config::Config;
use crate::fonts::FontMap;
use crate::module::{ModuleServer, ServeOutcome};
use crate::resolver::PackageMap;
use crate::utils::content_type;

/// Shared server state
struct ServerState {
    /// Project configuration
    config: Arc<Config>,

    /// Package module lookup
    modules: ModuleServer,

    /// Font lookup
    fonts: FontMap,

    /// Page bundle builder
    assembler: BundleAssembler,
}

/// Module and asset server
pub struct Server {
    /// Project configuration
    config: Arc<Config>,

    /// Packages resolved at startup
    packages: Arc<PackageMap>,

    /// Server options
    options: ServerOptions,
}

impl Server {
    /// Create a new server over an already resolved package map
    pub fn new(config: Arc<Config>, packages: Arc<PackageMap>, options: ServerOptions) -> Self {
        Self { config, packages, options }
    }

    /// Build the router
    pub fn router(&self) -> Router {
        let state = Arc::new(ServerState {
            config: self.config.clone(),
            modules: ModuleServer::new(self.packages.clone(), self.config.public_dir()),
            fonts: FontMap::scan(&self.config.font_dirs()),
            assembler: BundleAssembler::from_config(&self.config),
        });

        Router::new()
            .route("/", get(serve_index))
            .route("/module/*path", get(serve_module))
            .route("/fonts/*path", get(serve_font))
            .fallback_service(ServeDir::new(self.config.public_dir()))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Start serving
    pub async fn start(&self) -> Result<()> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind((self.options.host.as_str(), self.options.port)).await?;
        info!("Server listening on http://{}", listener.local_addr()?);

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Serve a package as an AMD module
async fn serve_module(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
    request: Request,
) -> Response {
    let request_path = format!("/{}", path);

    match state.modules.serve(&request_path).await {
        Ok(ServeOutcome::Generated(text)) => {
            ([(header::CONTENT_TYPE, "application/javascript; charset=utf-8")], text).into_response()
        }
        Ok(ServeOutcome::File(file)) | Ok(ServeOutcome::Static(file)) => send_file(file, request).await,
        Ok(ServeOutcome::NotFound) => {
            (StatusCode::NOT_FOUND, format!("Module not found: {}", path)).into_response()
        }
        Err(e) => {
            error!("Failed to load module {}: {:#}", request_path, anyhow::Error::from(e));
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load module").into_response()
        }
    }
}

/// Serve a font by file name
async fn serve_font(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
    request: Request,
) -> Response {
    match state.fonts.get(&path) {
        Some(font) => {
            debug!("Font {} -> {}", path, font.display());
            let font = font.to_path_buf();
            let mime = content_type(&font);
            let mut response = send_file(font, request).await;
            if response.status() == StatusCode::OK {
                response.headers_mut().insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
            }
            response
        }
        None => (StatusCode::NOT_FOUND, format!("Font not found: {}", path)).into_response(),
    }
}

/// Serve the index page with the bundle injected
async fn serve_index(State(state): State<Arc<ServerState>>) -> Response {
    let specs = state.config.bundle_paths();
    let task_state = state.clone();

    let bundle = match tokio::task::spawn_blocking(move || task_state.assembler.assemble_paths(&specs)).await {
        Ok(Ok(bundle)) => bundle,
        Ok(Err(e)) => {
            error!("Failed to assemble bundle: {:#}", anyhow::Error::from(e));
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to assemble bundle").into_response();
        }
        Err(e) => {
            error!("Bundle task failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to assemble bundle").into_response();
        }
    };

    let index_path = state.config.public_dir().join("index.html");
    let page = if index_path.exists() {
        match tokio::fs::read_to_string(&index_path).await {
            Ok(content) => content,
            Err(e) => {
                error!("Failed to read index.html: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read index.html").into_response();
            }
        }
    } else {
        default_page(&state.config.project.name)
    };

    Html(render_page(&page, &bundle)).into_response()
}

async fn send_file(path: PathBuf, request: Request) -> Response {
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Inject bundle styles before `</head>` and scripts before `</body>`
fn render_page(html: &str, bundle: &BundleResult) -> String {
    let mut page = html.to_string();

    if !bundle.styles.is_empty() {
        let styles = format!("<style>\n{}</style>\n", bundle.styles);
        match page.find("</head>") {
            Some(pos) => page.insert_str(pos, &styles),
            None => page.insert_str(0, &styles),
        }
    }

    if !bundle.scripts.is_empty() {
        match page.rfind("</body>") {
            Some(pos) => page.insert_str(pos, &bundle.scripts),
            None => page.push_str(&bundle.scripts),
        }
    }

    page
}

/// Page used when the public directory has no index.html
fn default_page(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{}</title>
  </head>
  <body>
    <div id="app"></div>
  </body>
</html>
"#,
        title
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    use crate::resolver::{PackageResolver, ResolverOptions};

    fn project() -> (TempDir, Server) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("node_modules/foo/lib")).unwrap();
        fs::write(root.join("node_modules/foo/package.json"), r#"{"main": "./lib/foo.js"}"#).unwrap();
        fs::write(root.join("node_modules/foo/lib/foo.js"), "module.exports = 1;").unwrap();
        fs::create_dir_all(root.join("wwwroot/styles/fonts")).unwrap();
        fs::write(root.join("wwwroot/app.js"), "define([], function () {});").unwrap();
        fs::write(root.join("wwwroot/styles/site.css"), "body { margin: 0; }").unwrap();
        fs::write(root.join("wwwroot/styles/fonts/icons.woff"), "woff").unwrap();

        let mut config = Config::default();
        config.root = root.to_path_buf();
        config.bundle.paths = vec!["wwwroot/styles/*.css".to_string(), "wwwroot/app.js".to_string()];

        let packages = PackageResolver::new(ResolverOptions::from(&config))
            .resolve(&config.packages_root())
            .unwrap();
        let options = ServerOptions { host: "127.0.0.1".to_string(), port: 0 };
        let server = Server::new(Arc::new(config), Arc::new(packages), options);
        (dir, server)
    }

    async fn get(server: &Server, uri: &str) -> (StatusCode, String) {
        let response = server
            .router()
            .oneshot(axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_module_route_wraps_package() {
        let (_dir, server) = project();
        let (status, body) = get(&server, "/module/foo.js").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "define(function (require, exports, module) {\nmodule.exports = 1;\n});");
    }

    #[tokio::test]
    async fn test_module_route_falls_back_to_public_dir() {
        let (_dir, server) = project();

        let (status, body) = get(&server, "/module/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "define([], function () {});");

        let (status, _) = get(&server, "/module/nothing.js").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_font_route() {
        let (_dir, server) = project();

        let (status, body) = get(&server, "/fonts/icons.woff").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "woff");

        let (status, _) = get(&server, "/fonts/missing.woff").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_font_type_only_on_full_response() {
        let (_dir, server) = project();

        let response = server
            .router()
            .oneshot(axum::http::Request::builder().uri("/fonts/icons.woff").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "font/woff");

        let response = server
            .router()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/fonts/icons.woff")
                    .header(header::IF_MODIFIED_SINCE, "Fri, 01 Jan 2100 00:00:00 GMT")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn test_index_embeds_bundle() {
        let (_dir, server) = project();
        let (status, body) = get(&server, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<style>\nbody { margin: 0; }\n</style>\n</head>"));
        assert!(body.contains("<script>define([], function () {});</script>\n</body>"));
    }

    #[test]
    fn test_render_page_without_markers() {
        let bundle = BundleResult { scripts: "<script>a</script>\n".to_string(), styles: "p{}\n".to_string() };

        assert_eq!(render_page("<p>x</p>", &bundle), "<style>\np{}\n</style>\n<p>x</p><script>a</script>\n");
    }
}
