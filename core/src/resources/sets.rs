//! Set endpoints.

use crate::client::{ApiRequest, Client};
use crate::error::Result;
use crate::path::Endpoint;
use crate::types::Set;

pub const SETS: Endpoint = Endpoint::get("sets");
/// Accepts either a set code or a set id.
pub const SET_BY_CODE: Endpoint = Endpoint::get("sets/:code");
pub const SET_BY_TCGPLAYER_ID: Endpoint = Endpoint::get("sets/tcgplayer/:id");

impl Client {
    /// Every set, newest first.
    pub fn sets(&self) -> Result<Vec<Set>> {
        self.dispatch(&ApiRequest::new(SETS), &self.default_options())?
            .into_list()?
            .decode_items()
    }

    /// A set by code (`"m21"`) or id.
    pub fn set(&self, code: &str) -> Result<Set> {
        let request = ApiRequest::new(SET_BY_CODE).path_param("code", code);
        self.dispatch(&request, &self.default_options())?.decode()
    }

    pub fn set_by_tcgplayer_id(&self, id: u64) -> Result<Set> {
        let request = ApiRequest::new(SET_BY_TCGPLAYER_ID).path_param("id", id);
        self.dispatch(&request, &self.default_options())?.decode()
    }
}
