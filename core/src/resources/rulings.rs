//! Ruling endpoints.

use uuid::Uuid;

use crate::client::{ApiRequest, Client};
use crate::error::Result;
use crate::path::Endpoint;
use crate::types::Ruling;

pub const RULINGS_BY_ID: Endpoint = Endpoint::get("cards/:id/rulings");
pub const RULINGS_BY_MULTIVERSE_ID: Endpoint = Endpoint::get("cards/multiverse/:id/rulings");
pub const RULINGS_BY_MTGO_ID: Endpoint = Endpoint::get("cards/mtgo/:id/rulings");
pub const RULINGS_BY_ARENA_ID: Endpoint = Endpoint::get("cards/arena/:id/rulings");
pub const RULINGS_BY_CODE_NUMBER: Endpoint = Endpoint::get("cards/:code/:number/rulings");

/// Which card to fetch rulings for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulingsLookup {
    Id(Uuid),
    Multiverse(u64),
    Mtgo(u64),
    Arena(u64),
    CodeNumber { code: String, number: String },
}

impl RulingsLookup {
    pub fn to_request(&self) -> ApiRequest {
        match self {
            RulingsLookup::Id(id) => ApiRequest::new(RULINGS_BY_ID).path_param("id", id),
            RulingsLookup::Multiverse(id) => {
                ApiRequest::new(RULINGS_BY_MULTIVERSE_ID).path_param("id", id)
            }
            RulingsLookup::Mtgo(id) => ApiRequest::new(RULINGS_BY_MTGO_ID).path_param("id", id),
            RulingsLookup::Arena(id) => ApiRequest::new(RULINGS_BY_ARENA_ID).path_param("id", id),
            RulingsLookup::CodeNumber { code, number } => ApiRequest::new(RULINGS_BY_CODE_NUMBER)
                .path_param("code", code)
                .path_param("number", number),
        }
    }
}

impl Client {
    pub fn rulings(&self, lookup: &RulingsLookup) -> Result<Vec<Ruling>> {
        self.dispatch(&lookup.to_request(), &self.default_options())?
            .into_list()?
            .decode_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_number_rulings_path() {
        let request = RulingsLookup::CodeNumber {
            code: "ima".to_string(),
            number: "65".to_string(),
        }
        .to_request();
        assert_eq!(
            request.endpoint.resolve(&request.path_params).unwrap(),
            "cards/ima/65/rulings"
        );
    }

    #[test]
    fn arena_rulings_path() {
        let request = RulingsLookup::Arena(67462).to_request();
        assert_eq!(
            request.endpoint.resolve(&request.path_params).unwrap(),
            "cards/arena/67462/rulings"
        );
    }
}
