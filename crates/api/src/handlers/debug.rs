use crate::state::AppState;
use axum::{extract::State, Json};
use dns_feed_application::HubSnapshot;

pub async fn hub_metrics(State(state): State<AppState>) -> Json<HubSnapshot> {
    Json(state.hub.metrics().snapshot())
}
