use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use stockdesk_core::{
    stocks::{
        BatchResult, CompanyInfo, DividendHistory, Financials, HistoricalData, Recommendations,
        SearchResults, SplitHistory, StockPrice, StockSnapshot,
    },
    symbols::split_symbol_list,
};
use stockdesk_market_data::{Interval, Period};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
struct HistoryQuery {
    period: Option<String>,
    interval: Option<String>,
}

#[derive(Deserialize)]
struct SymbolsQuery {
    symbols: Option<String>,
}

#[derive(Deserialize)]
struct SearchQuery {
    query: Option<String>,
}

fn symbol_list(query: SymbolsQuery) -> ApiResult<Vec<String>> {
    let symbols = split_symbol_list(query.symbols.as_deref().unwrap_or_default());
    if symbols.is_empty() {
        return Err(ApiError::Validation("No valid symbols provided".to_string()));
    }
    Ok(symbols)
}

async fn get_stock_price(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StockPrice>> {
    Ok(Json(state.stock_service.get_stock_price(&symbol).await?))
}

async fn get_company_info(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CompanyInfo>> {
    Ok(Json(state.stock_service.get_company_info(&symbol).await?))
}

async fn get_historical_data(
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<HistoricalData>> {
    let period = match query.period.as_deref() {
        Some(raw) => raw
            .parse::<Period>()
            .map_err(|e| ApiError::Validation(e.to_string()))?,
        None => Period::default(),
    };
    let interval = match query.interval.as_deref() {
        Some(raw) => raw
            .parse::<Interval>()
            .map_err(|e| ApiError::Validation(e.to_string()))?,
        None => Interval::OneDay,
    };
    let history = state
        .stock_service
        .get_historical_data(&symbol, period, interval)
        .await?;
    Ok(Json(history))
}

async fn get_financials(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Financials>> {
    Ok(Json(state.stock_service.get_financials(&symbol).await?))
}

async fn get_dividends(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DividendHistory>> {
    Ok(Json(state.stock_service.get_dividends(&symbol).await?))
}

async fn get_splits(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SplitHistory>> {
    Ok(Json(state.stock_service.get_splits(&symbol).await?))
}

async fn get_recommendations(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Recommendations>> {
    Ok(Json(state.stock_service.get_recommendations(&symbol).await?))
}

async fn get_multiple_stocks(
    Query(query): Query<SymbolsQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BatchResult<StockSnapshot>>> {
    let symbols = symbol_list(query)?;
    Ok(Json(state.stock_service.get_multiple_stocks(&symbols).await))
}

async fn get_multiple_info(
    Query(query): Query<SymbolsQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BatchResult<CompanyInfo>>> {
    let symbols = symbol_list(query)?;
    Ok(Json(
        state.stock_service.get_multiple_company_info(&symbols).await,
    ))
}

async fn search_stocks(
    Query(query): Query<SearchQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SearchResults>> {
    let query = query.query.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(ApiError::Validation("Search query must not be empty".to_string()));
    }
    Ok(Json(state.stock_service.search_stocks(&query)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stock/multiple_stocks", get(get_multiple_stocks))
        .route("/stock/multiple_info", get(get_multiple_info))
        .route("/stock/search", get(search_stocks))
        .route("/stock/{symbol}/price", get(get_stock_price))
        .route("/stock/{symbol}/info", get(get_company_info))
        .route("/stock/{symbol}/history", get(get_historical_data))
        .route("/stock/{symbol}/financials", get(get_financials))
        .route("/stock/{symbol}/dividends", get(get_dividends))
        .route("/stock/{symbol}/splits", get(get_splits))
        .route("/stock/{symbol}/recommendations", get(get_recommendations))
}
