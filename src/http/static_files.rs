//! Landing page and static assets.
//!
//! `/` serves the configured index file and `/static/<path>` serves the
//! asset directory. Both are plain file serving; nothing is rendered.

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::WebConfig;

/// Routes for the browser-facing part of the site.
pub fn web_routes<S>(config: &WebConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route_service("/", ServeFile::new(&config.index_file))
        .nest_service("/static", ServeDir::new(&config.static_dir))
}
