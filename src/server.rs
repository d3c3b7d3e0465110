//! Single-page HTTP host for the rendered figure.
//!
//! The page is rendered once up front and shared read-only by every request.
//! Only `GET /` is routed; everything else is a 404.

use axum::{Router, extract::State, response::Html, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::PipelineError;
use crate::figure::Figure;

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Renders the HTML document embedding `figure`.
pub fn render_page(figure: &Figure, title: &str) -> Result<String, serde_json::Error> {
    // Keep `</script>` inside string values from closing the inline script.
    let json = serde_json::to_string(figure)?.replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_JS}"></script>
</head>
<body>
<div id="map" style="width:100%;height:95vh;"></div>
<script>
const figure = {json};
Plotly.newPlot("map", figure.data, figure.layout).then(function () {{
  Plotly.addFrames("map", figure.frames);
}});
</script>
</body>
</html>
"#
    ))
}

pub fn router(page: String) -> Router {
    let page: Arc<str> = page.into();
    Router::new()
        .route("/", get(index))
        .layer(TraceLayer::new_for_http())
        .with_state(page)
}

async fn index(State(page): State<Arc<str>>) -> Html<String> {
    Html(page.to_string())
}

/// Binds the page server's listener.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, PipelineError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| PipelineError::RenderStartup {
            addr: addr.to_string(),
            source,
        })
}

/// Serves `page` on `listener` until the process is stopped.
pub async fn serve(listener: TcpListener, page: String) -> Result<(), PipelineError> {
    let addr = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown address".to_string());

    info!(%addr, "Dashboard available at http://{addr}/");

    axum::serve(listener, router(page))
        .await
        .map_err(|source| PipelineError::RenderStartup { addr, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::FigureOptions;
    use crate::frames::AnimationSequence;

    fn empty_figure() -> Figure {
        let sequence = AnimationSequence {
            frames: vec![],
            steps: vec![],
            initial: vec![],
        };
        Figure::from_sequence(&sequence, &FigureOptions::default())
    }

    #[test]
    fn test_render_page_embeds_figure() {
        let page = render_page(&empty_figure(), "COVID-19 Total Cases").unwrap();

        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains(PLOTLY_JS));
        assert!(page.contains("\"frames\":[]"));
        assert!(page.contains("Plotly.addFrames(\"map\", figure.frames);"));
    }

    #[test]
    fn test_render_page_escapes_closing_tags() {
        let mut figure = empty_figure();
        figure.layout.title.text = "</script><b>x</b>".to_string();

        let page = render_page(&figure, "t").unwrap();
        assert!(!page.contains("</script><b>"));
        assert!(page.contains(r"<\/script><b>x<\/b>"));
    }

    #[tokio::test]
    async fn test_bind_conflict_is_render_startup() {
        let first = bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let taken = first.local_addr().unwrap();

        let err = bind(taken).await.unwrap_err();
        assert!(matches!(err, PipelineError::RenderStartup { .. }));
    }
}
