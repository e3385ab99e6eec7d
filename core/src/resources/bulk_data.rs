//! Bulk data export metadata.

use std::fmt;

use uuid::Uuid;

use crate::client::{ApiRequest, Client};
use crate::error::Result;
use crate::path::Endpoint;
use crate::types::BulkData;

pub const BULK_DATA: Endpoint = Endpoint::get("bulk-data");
/// Takes either an export id or its type (`"oracle_cards"`, ...).
pub const BULK_DATA_ITEM: Endpoint = Endpoint::get("bulk-data/:id");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkDataLookup {
    Id(Uuid),
    Type(String),
}

impl fmt::Display for BulkDataLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulkDataLookup::Id(id) => write!(f, "{id}"),
            BulkDataLookup::Type(kind) => f.write_str(kind),
        }
    }
}

impl Client {
    pub fn bulk_data(&self) -> Result<Vec<BulkData>> {
        self.dispatch(&ApiRequest::new(BULK_DATA), &self.default_options())?
            .into_list()?
            .decode_items()
    }

    pub fn bulk_data_item(&self, lookup: &BulkDataLookup) -> Result<BulkData> {
        let request = ApiRequest::new(BULK_DATA_ITEM).path_param("id", lookup);
        self.dispatch(&request, &self.default_options())?.decode()
    }
}
