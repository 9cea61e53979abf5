use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use stockdesk_connect::HoldingsSourceFactory;
use stockdesk_core::{
    cache::ExpiringCache,
    executor::BoundedExecutor,
    holdings::{HoldingsService, HoldingsServiceTrait, HoldingsSourceTrait},
    market::{MarketService, MarketServiceTrait},
    reference::ReferenceTable,
    stocks::{StockService, StockServiceTrait},
    ServiceSettings,
};
use stockdesk_market_data::{QuoteSource, YahooProvider};

use crate::{auth::AuthManager, config::Config};

pub struct AppState {
    pub stock_service: Arc<dyn StockServiceTrait>,
    pub market_service: Arc<dyn MarketServiceTrait>,
    pub holdings_service: Arc<dyn HoldingsServiceTrait>,
    pub auth: Option<Arc<AuthManager>>,
}

pub fn init_tracing() {
    let log_format = std::env::var("SD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Wire the services around an already-built quote source and holdings sources.
///
/// One cache and one executor are shared by every service.
pub fn assemble_state(
    source: Arc<dyn QuoteSource>,
    holdings_sources: Vec<Arc<dyn HoldingsSourceTrait>>,
    reference: ReferenceTable,
    settings: &ServiceSettings,
    auth: Option<Arc<AuthManager>>,
) -> Arc<AppState> {
    let cache = Arc::new(ExpiringCache::new(settings.cache_ttl));
    let executor = Arc::new(BoundedExecutor::new(settings.max_workers, settings.timeout));

    let stock_service: Arc<dyn StockServiceTrait> = Arc::new(StockService::new(
        source.clone(),
        cache,
        executor.clone(),
    ));
    let market_service: Arc<dyn MarketServiceTrait> = Arc::new(MarketService::new(
        stock_service.clone(),
        source,
        executor,
        Arc::new(reference),
    ));
    let holdings_service: Arc<dyn HoldingsServiceTrait> = Arc::new(HoldingsService::new(
        holdings_sources,
        stock_service.clone(),
    ));

    Arc::new(AppState {
        stock_service,
        market_service,
        holdings_service,
        auth,
    })
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let source: Arc<dyn QuoteSource> =
        Arc::new(YahooProvider::new(tokio::runtime::Handle::current())?);
    tracing::info!(
        "Quote source {} with {} workers, {:?} timeout, {:?} cache TTL",
        source.id(),
        config.service.max_workers,
        config.service.timeout,
        config.service.cache_ttl
    );

    let reference = match &config.reference_csv {
        Some(location) => match ReferenceTable::load(location).await {
            Ok(table) => {
                tracing::info!("Loaded {} reference entries from {}", table.len(), location);
                table
            }
            Err(e) => {
                tracing::error!("Reference list unavailable, name search disabled: {}", e);
                ReferenceTable::empty()
            }
        },
        None => {
            tracing::warn!("SD_REFERENCE_CSV not set, name search disabled");
            ReferenceTable::empty()
        }
    };

    let holdings_sources = HoldingsSourceFactory::from_credentials(config.brokers.clone());

    let auth = match &config.auth {
        Some(auth_config) => {
            tracing::info!("Bearer authentication enabled");
            Some(Arc::new(AuthManager::new(auth_config.clone())?))
        }
        None => {
            tracing::warn!("Authentication is not configured; all routes are open");
            None
        }
    };

    Ok(assemble_state(
        source,
        holdings_sources,
        reference,
        &config.service,
        auth,
    ))
}
