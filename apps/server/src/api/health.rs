use std::sync::Arc;

use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use crate::main_lib::AppState;

const APP_NAME: &str = "Stockdesk";
const VERSION: &str = env!("CARGO_PKG_VERSION");

async fn root() -> Json<Value> {
    Json(json!({
        "message": format!("Welcome to {}", APP_NAME),
        "version": VERSION,
        "status": "active",
        "timestamp": Utc::now().to_rfc3339(),
        "endpoints": {
            "stock_data": [
                "/stock/{symbol}/price",
                "/stock/{symbol}/info",
                "/stock/{symbol}/history",
                "/stock/{symbol}/financials",
                "/stock/{symbol}/dividends",
                "/stock/{symbol}/splits",
                "/stock/{symbol}/recommendations",
                "/stock/multiple_stocks",
                "/stock/multiple_info",
                "/stock/search"
            ],
            "market_data": [
                "/market/trending",
                "/market/indices",
                "/market/overview",
                "/market/search"
            ],
            "broker": ["/broker/holdings"],
            "auth": ["/auth/token"]
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": VERSION,
        "uptime": "active"
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
