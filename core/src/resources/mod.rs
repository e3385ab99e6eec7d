//! Typed façades over `Client::dispatch`, one module per resource family.
//!
//! Each module defines its endpoint templates as constants and adds an
//! `impl Client` block; decoding into records happens once, on the payload.

pub mod bulk_data;
pub mod cards;
pub mod catalogs;
pub mod rulings;
pub mod sets;
pub mod symbology;

pub use bulk_data::BulkDataLookup;
pub use cards::{CardIdentifier, CardLookup, CardQuery, NameMatch};
pub use catalogs::CatalogKind;
pub use rulings::RulingsLookup;
