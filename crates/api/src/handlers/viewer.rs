use crate::state::AppState;
use axum::extract::{ws::WebSocketUpgrade, State};
use axum::response::Response;
use dns_feed_infrastructure::viewer::ViewerSession;
use futures::StreamExt;
use tracing::warn;

/// Upgrades `GET /ws` and hands the socket to a connection actor.
pub async fn viewer_socket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let id = state.ids.next_id();
    let hub = state.hub.clone();
    let settings = state.viewer.clone();

    ws.max_message_size(settings.max_message_size)
        .on_failed_upgrade(|e| warn!(error = %e, "Viewer upgrade failed"))
        .on_upgrade(move |socket| {
            let (sink, stream) = socket.split();
            ViewerSession::run(id, sink, stream, hub, settings)
        })
}
