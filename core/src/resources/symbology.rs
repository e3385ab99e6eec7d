//! Card symbols and mana-cost parsing.

use crate::client::{ApiRequest, Client};
use crate::error::Result;
use crate::path::Endpoint;
use crate::types::{CardSymbol, ManaCost};

pub const SYMBOLOGY: Endpoint = Endpoint::get("symbology");
pub const PARSE_MANA: Endpoint = Endpoint::get("symbology/parse-mana");

impl Client {
    pub fn symbols(&self) -> Result<Vec<CardSymbol>> {
        self.dispatch(&ApiRequest::new(SYMBOLOGY), &self.default_options())?
            .into_list()?
            .decode_items()
    }

    /// Normalize a shorthand cost like `"2WW"` into `{2}{W}{W}`.
    pub fn parse_mana(&self, cost: &str) -> Result<ManaCost> {
        let request = ApiRequest::new(PARSE_MANA).query_param("cost", cost);
        self.dispatch(&request, &self.default_options())?.decode()
    }
}
