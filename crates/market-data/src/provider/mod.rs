//! Quote source abstraction and implementations.
//!
//! This module contains:
//! - The `QuoteSource` trait that all providers implement
//! - The Yahoo Finance implementation

mod traits;

pub mod yahoo;

pub use traits::QuoteSource;
