//! Serve command: build once, then serve the output directory.

use super::build::build_site_with_index;
use anyhow::{Context, Result};
use axum::{response::Redirect, routing::get, Router};
use std::path::Path;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Build the site and serve it on localhost until interrupted
pub async fn serve_site(config_path: &Path, port: u16) -> Result<()> {
    let config_path_buf = config_path.to_path_buf();
    let (config, _site_index) =
        tokio::task::spawn_blocking(move || build_site_with_index(&config_path_buf))
            .await
            .context("Build task failed")??;

    let output_dir = config.output_dir();
    let base_url = config.normalized_base_url();
    let main_page_url = format!("{}{}", base_url, config.main_page_href());

    let app = router(&base_url, &main_page_url, ServeDir::new(&output_dir));

    tracing::info!("Starting server on http://localhost:{}", port);
    println!("\nServing {:?} at http://localhost:{}{}", output_dir, port, base_url);
    println!("   Press Ctrl+C to stop\n");

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Mount the output directory under the base URL; `/` redirects to the main page
fn router(base_url: &str, main_page_url: &str, files: ServeDir) -> Router {
    let target = main_page_url.to_string();
    let redirect = get(move || async move { Redirect::temporary(&target) });

    let router = Router::new().route("/", redirect);
    let router = if base_url == "/" {
        router.fallback_service(files)
    } else {
        router.nest_service(base_url.trim_end_matches('/'), files)
    };

    router.layer(TraceLayer::new_for_http())
}
