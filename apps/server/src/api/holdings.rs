use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use stockdesk_core::holdings::EnrichedHoldings;

use crate::main_lib::AppState;

async fn get_broker_holdings(State(state): State<Arc<AppState>>) -> Json<EnrichedHoldings> {
    Json(state.holdings_service.get_enriched_holdings().await)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/broker/holdings", get(get_broker_holdings))
}
