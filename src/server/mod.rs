//! Preview server for the generated site

use anyhow::Result;
use axum::Router;
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::Blog;

/// Router serving `public_dir`; unknown paths are 404
pub fn router(public_dir: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
}

/// Start the preview server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let listener = TcpListener::bind(addr).await?;
    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    serve(listener, &blog.public_dir).await
}

async fn serve(listener: TcpListener, public_dir: &Path) -> Result<()> {
    axum::serve(listener, router(public_dir)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_serves_public_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("posts")).unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Home</h1>").unwrap();
        std::fs::write(dir.path().join("posts/a.html"), "<p>A</p>").unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let public_dir = dir.path().to_path_buf();
        tokio::spawn(async move { serve(listener, &public_dir).await });

        let base = format!("http://{}", addr);
        let home = reqwest::get(format!("{}/", base)).await.unwrap();
        assert_eq!(home.status(), 200);
        assert_eq!(home.text().await.unwrap(), "<h1>Home</h1>");

        let post = reqwest::get(format!("{}/posts/a.html", base)).await.unwrap();
        assert_eq!(post.text().await.unwrap(), "<p>A</p>");

        let missing = reqwest::get(format!("{}/nope.html", base)).await.unwrap();
        assert_eq!(missing.status(), 404);
    }
}
