//! Reference module - company name to ticker lookup.

mod reference_table;

pub use reference_table::{ReferenceEntry, ReferenceTable};
