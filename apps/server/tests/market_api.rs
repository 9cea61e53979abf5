mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{build_router, get};
use stockdesk_core::holdings::{HoldingRow, HoldingsSourceTrait};

struct OneRowBroker;

#[async_trait]
impl HoldingsSourceTrait for OneRowBroker {
    fn broker_name(&self) -> &'static str {
        "dhan"
    }

    async fn fetch_holdings(&self) -> stockdesk_core::Result<Vec<HoldingRow>> {
        let mut row = HoldingRow::empty("dhan");
        row.exchange = "NSE".to_string();
        row.trading_symbol = "RELIANCE".to_string();
        row.total_qty = 5.0;
        row.available_qty = 5.0;
        Ok(vec![row])
    }
}

#[tokio::test]
async fn root_and_health() {
    let app = build_router(Vec::new(), None);

    let (status, _, body) = get(&app, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to Stockdesk");
    assert!(body["version"].is_string());

    let (status, _, body) = get(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["uptime"], "active");
}

#[tokio::test]
async fn trending_tolerates_unknown_symbols() {
    let app = build_router(Vec::new(), None);
    let (status, _, body) = get(&app, "/market/trending", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_requested"], 15);
    assert_eq!(body["successful_requests"], 2);
    assert_eq!(body["failed_requests"], 13);
}

#[tokio::test]
async fn reference_search_found_and_missing() {
    let app = build_router(Vec::new(), None);

    let (status, _, body) = get(&app, "/market/search?query=reliance", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "RELIANCE.NS");
    assert_eq!(body["name"], "Reliance Industries Limited");

    let (status, _, body) = get(&app, "/market/search?query=tata", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "Stock not found.");

    let (status, _, body) = get(&app, "/market/search?query=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn broker_holdings_are_enriched() {
    let app = build_router(vec![Arc::new(OneRowBroker)], None);
    let (status, _, body) = get(&app, "/broker/holdings", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_holdings"], 1);
    let holding = &body["holdings"][0];
    assert_eq!(holding["tradingSymbol"], "RELIANCE");
    assert_eq!(holding["quote"], "RELIANCE.NS");
    assert_eq!(holding["price"]["current_price"], 2950.0);
    assert_eq!(holding["info"]["name"], "Reliance Industries Limited");
    assert_eq!(body["brokers"][0]["name"], "dhan");
}
