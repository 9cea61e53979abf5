use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use stockdesk_core::market::{MarketIndices, MarketOverview, StockLookup, TrendingStocks};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
struct LookupQuery {
    query: Option<String>,
}

async fn get_trending_stocks(State(state): State<Arc<AppState>>) -> Json<TrendingStocks> {
    Json(state.market_service.get_trending_stocks().await)
}

async fn get_market_indices(State(state): State<Arc<AppState>>) -> Json<MarketIndices> {
    Json(state.market_service.get_market_indices().await)
}

async fn get_market_overview(State(state): State<Arc<AppState>>) -> Json<MarketOverview> {
    Json(state.market_service.get_market_overview().await)
}

/// Look a company up by ticker or name. A miss is a 200 with an `error` field.
async fn search_stock(
    Query(query): Query<LookupQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StockLookup>> {
    let query = query.query.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(ApiError::Validation("Search query must not be empty".to_string()));
    }
    Ok(Json(state.market_service.search_stock(query.trim()).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/market/trending", get(get_trending_stocks))
        .route("/market/indices", get(get_market_indices))
        .route("/market/overview", get(get_market_overview))
        .route("/market/search", get(search_stock))
}
