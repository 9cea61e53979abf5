//! Fan-out of one provider call per symbol across the bounded executor.

use std::sync::Arc;

use futures::future::join_all;
use log::warn;
use stockdesk_market_data::QuoteSource;

use crate::errors::{Error, Result};
use crate::executor::{BoundedExecutor, TaskHandle};
use crate::symbols::Symbol;

/// Per-symbol result of a fan-out.
pub(crate) struct Outcome<T> {
    /// Normalized symbol, or the trimmed raw input when it failed validation
    pub symbol: String,
    pub result: Result<T>,
    /// `true` when the value came from the provider rather than the cache
    pub fetched: bool,
}

enum Slot<T> {
    Rejected(Error),
    Cached(T),
    Pending(TaskHandle<Result<T>>),
}

/// Validate every symbol, serve what `lookup` already has, submit the rest,
/// then wait for all of them. Outcomes come back in input order.
pub(crate) async fn fan_out<T, P, F>(
    executor: &BoundedExecutor,
    source: &Arc<dyn QuoteSource>,
    symbols: &[String],
    lookup: P,
    fetch: F,
) -> Vec<Outcome<T>>
where
    T: Send + 'static,
    P: Fn(&Symbol) -> Option<T>,
    F: Fn(&dyn QuoteSource, &str) -> Result<T> + Clone + Send + 'static,
{
    let slots: Vec<(String, Slot<T>)> = symbols
        .iter()
        .map(|raw| match Symbol::parse(raw) {
            Err(e) => (raw.trim().to_string(), Slot::Rejected(e)),
            Ok(symbol) => match lookup(&symbol) {
                Some(hit) => (symbol.to_string(), Slot::Cached(hit)),
                None => {
                    let source = source.clone();
                    let fetch = fetch.clone();
                    let name = symbol.to_string();
                    let handle = executor.submit(move || fetch(source.as_ref(), &name));
                    (symbol.to_string(), Slot::Pending(handle))
                }
            },
        })
        .collect();

    join_all(slots.into_iter().map(|(symbol, slot)| async move {
        match slot {
            Slot::Rejected(e) => Outcome {
                symbol,
                result: Err(e),
                fetched: false,
            },
            Slot::Cached(value) => Outcome {
                symbol,
                result: Ok(value),
                fetched: false,
            },
            Slot::Pending(handle) => {
                let result = handle.wait().await.map_err(Error::from).and_then(|r| r);
                if let Err(e) = &result {
                    warn!("Batch item {} failed: {}", symbol, e);
                }
                Outcome {
                    symbol,
                    result,
                    fetched: true,
                }
            }
        }
    }))
    .await
}
