//! Stockdesk Core - aggregation services over a blocking quote source.
//!
//! Provider calls run on a shared [`executor::BoundedExecutor`] and their
//! results are kept in a shared [`cache::ExpiringCache`]. Services are
//! defined behind traits so the HTTP layer and tests can swap them out.

mod batch;
pub mod cache;
pub mod constants;
pub mod errors;
pub mod executor;
pub mod holdings;
pub mod market;
pub mod reference;
pub mod settings;
pub mod stocks;
pub mod symbols;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use settings::ServiceSettings;
pub use symbols::Symbol;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
