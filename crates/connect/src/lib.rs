//! Stockdesk Connect - brokerage holdings sources.
//!
//! Each brokerage implements [`HoldingsSourceTrait`] and maps its own
//! position format onto the shared [`HoldingRow`].
//!
//! [`HoldingsSourceTrait`]: stockdesk_core::holdings::HoldingsSourceTrait
//! [`HoldingRow`]: stockdesk_core::holdings::HoldingRow

pub mod dhan;
pub mod errors;
pub mod factory;
pub mod shoonya;
pub mod totp;

pub use dhan::{DhanConfig, DhanSource, DEFAULT_DHAN_URL};
pub use errors::BrokerError;
pub use factory::{BrokerCredentials, HoldingsSourceFactory};
pub use shoonya::{ShoonyaConfig, ShoonyaSource, DEFAULT_SHOONYA_URL};
