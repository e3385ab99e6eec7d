//! Card endpoints.
//!
//! # Design
//! A caller may fill in several selectors on one `CardQuery` at once (say a
//! search string and a fuzzy name). `CardLookup::from_query` resolves that
//! by walking `PRECEDENCE` top to bottom and taking the first rule that
//! matches, so the winner is fixed and documented:
//!
//! search > fuzzy > exact > random > autocomplete > id > code/number >
//! multiverse > mtgo > arena > tcgplayer > cardmarket

use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::client::{ApiRequest, CallOptions, Client};
use crate::envelope::{Catalog, ListPage, Payload};
use crate::error::{Result, ScryfallError};
use crate::params::Params;
use crate::path::Endpoint;
use crate::types::Card;

pub const CARDS_SEARCH: Endpoint = Endpoint::get("cards/search");
pub const CARDS_NAMED: Endpoint = Endpoint::get("cards/named");
pub const CARDS_AUTOCOMPLETE: Endpoint = Endpoint::get("cards/autocomplete");
pub const CARDS_RANDOM: Endpoint = Endpoint::get("cards/random");
pub const CARDS_COLLECTION: Endpoint = Endpoint::post("cards/collection");
pub const CARD_BY_CODE_NUMBER: Endpoint = Endpoint::get("cards/:code/:number/:lang?");
pub const CARD_BY_MULTIVERSE_ID: Endpoint = Endpoint::get("cards/multiverse/:id");
pub const CARD_BY_MTGO_ID: Endpoint = Endpoint::get("cards/mtgo/:id");
pub const CARD_BY_ARENA_ID: Endpoint = Endpoint::get("cards/arena/:id");
pub const CARD_BY_TCGPLAYER_ID: Endpoint = Endpoint::get("cards/tcgplayer/:id");
pub const CARD_BY_CARDMARKET_ID: Endpoint = Endpoint::get("cards/cardmarket/:id");
pub const CARD_BY_ID: Endpoint = Endpoint::get("cards/:id");

/// Upstream limit on identifiers per collection request.
pub const MAX_COLLECTION_IDENTIFIERS: usize = 75;

/// Loose input for `CardLookup::from_query`. Every selector is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardQuery {
    pub search: Option<String>,
    pub fuzzy: Option<String>,
    pub exact: Option<String>,
    pub random: bool,
    pub autocomplete: Option<String>,
    pub id: Option<Uuid>,
    pub code: Option<String>,
    pub number: Option<String>,
    pub lang: Option<String>,
    pub multiverse_id: Option<u64>,
    pub mtgo_id: Option<u64>,
    pub arena_id: Option<u64>,
    pub tcgplayer_id: Option<u64>,
    pub cardmarket_id: Option<u64>,
}

/// Whether `Named` matches loosely or exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    Fuzzy,
    Exact,
}

/// One way of asking for cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardLookup {
    Search { query: String },
    Named { name: String, mode: NameMatch },
    Random { query: Option<String> },
    Autocomplete { query: String },
    Id(Uuid),
    CodeNumber {
        code: String,
        number: String,
        lang: Option<String>,
    },
    Multiverse(u64),
    Mtgo(u64),
    Arena(u64),
    Tcgplayer(u64),
    Cardmarket(u64),
}

type Rule = fn(&CardQuery) -> Option<CardLookup>;

const PRECEDENCE: &[Rule] = &[
    by_search,
    by_fuzzy_name,
    by_exact_name,
    by_random,
    by_autocomplete,
    by_id,
    by_code_number,
    by_multiverse_id,
    by_mtgo_id,
    by_arena_id,
    by_tcgplayer_id,
    by_cardmarket_id,
];

fn by_search(q: &CardQuery) -> Option<CardLookup> {
    q.search.clone().map(|query| CardLookup::Search { query })
}

fn by_fuzzy_name(q: &CardQuery) -> Option<CardLookup> {
    q.fuzzy.clone().map(|name| CardLookup::Named {
        name,
        mode: NameMatch::Fuzzy,
    })
}

fn by_exact_name(q: &CardQuery) -> Option<CardLookup> {
    q.exact.clone().map(|name| CardLookup::Named {
        name,
        mode: NameMatch::Exact,
    })
}

fn by_random(q: &CardQuery) -> Option<CardLookup> {
    q.random.then_some(CardLookup::Random { query: None })
}

fn by_autocomplete(q: &CardQuery) -> Option<CardLookup> {
    q.autocomplete.clone().map(|query| CardLookup::Autocomplete { query })
}

fn by_id(q: &CardQuery) -> Option<CardLookup> {
    q.id.map(CardLookup::Id)
}

fn by_code_number(q: &CardQuery) -> Option<CardLookup> {
    match (&q.code, &q.number) {
        (Some(code), Some(number)) => Some(CardLookup::CodeNumber {
            code: code.clone(),
            number: number.clone(),
            lang: q.lang.clone(),
        }),
        _ => None,
    }
}

fn by_multiverse_id(q: &CardQuery) -> Option<CardLookup> {
    q.multiverse_id.map(CardLookup::Multiverse)
}

fn by_mtgo_id(q: &CardQuery) -> Option<CardLookup> {
    q.mtgo_id.map(CardLookup::Mtgo)
}

fn by_arena_id(q: &CardQuery) -> Option<CardLookup> {
    q.arena_id.map(CardLookup::Arena)
}

fn by_tcgplayer_id(q: &CardQuery) -> Option<CardLookup> {
    q.tcgplayer_id.map(CardLookup::Tcgplayer)
}

fn by_cardmarket_id(q: &CardQuery) -> Option<CardLookup> {
    q.cardmarket_id.map(CardLookup::Cardmarket)
}

impl CardLookup {
    /// Pick the highest-precedence selector present in `query`.
    pub fn from_query(query: &CardQuery) -> Result<Self> {
        PRECEDENCE
            .iter()
            .find_map(|rule| rule(query))
            .ok_or_else(|| {
                ScryfallError::InvalidLookup("card query has no usable selector".to_string())
            })
    }

    /// The request for this lookup, with `extras` (order, unique, set, page,
    /// ...) appended to the query string.
    pub fn to_request(&self, extras: &Params) -> ApiRequest {
        let request = match self {
            CardLookup::Search { query } => ApiRequest::new(CARDS_SEARCH).query_param("q", query),
            CardLookup::Named { name, mode } => {
                let key = match mode {
                    NameMatch::Fuzzy => "fuzzy",
                    NameMatch::Exact => "exact",
                };
                ApiRequest::new(CARDS_NAMED).query_param(key, name)
            }
            CardLookup::Random { query } => {
                let mut request = ApiRequest::new(CARDS_RANDOM);
                if let Some(query) = query {
                    request = request.query_param("q", query);
                }
                request
            }
            CardLookup::Autocomplete { query } => {
                ApiRequest::new(CARDS_AUTOCOMPLETE).query_param("q", query)
            }
            CardLookup::Id(id) => ApiRequest::new(CARD_BY_ID).path_param("id", id),
            CardLookup::CodeNumber { code, number, lang } => {
                let mut request = ApiRequest::new(CARD_BY_CODE_NUMBER)
                    .path_param("code", code)
                    .path_param("number", number);
                if let Some(lang) = lang {
                    request = request.path_param("lang", lang);
                }
                request
            }
            CardLookup::Multiverse(id) => ApiRequest::new(CARD_BY_MULTIVERSE_ID).path_param("id", id),
            CardLookup::Mtgo(id) => ApiRequest::new(CARD_BY_MTGO_ID).path_param("id", id),
            CardLookup::Arena(id) => ApiRequest::new(CARD_BY_ARENA_ID).path_param("id", id),
            CardLookup::Tcgplayer(id) => ApiRequest::new(CARD_BY_TCGPLAYER_ID).path_param("id", id),
            CardLookup::Cardmarket(id) => {
                ApiRequest::new(CARD_BY_CARDMARKET_ID).path_param("id", id)
            }
        };
        request.query_params(extras)
    }
}

/// One entry of a `cards/collection` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CardIdentifier {
    Id { id: Uuid },
    MtgoId { mtgo_id: u64 },
    MultiverseId { multiverse_id: u64 },
    OracleId { oracle_id: Uuid },
    IllustrationId { illustration_id: Uuid },
    NameSet { name: String, set: String },
    Name { name: String },
    CollectorNumberSet { collector_number: String, set: String },
}

impl Client {
    /// Run any card lookup; the payload is a card, a list or a catalog
    /// depending on the lookup.
    pub fn lookup_cards(
        &self,
        lookup: &CardLookup,
        extras: &Params,
        options: &CallOptions,
    ) -> Result<Payload> {
        self.dispatch(&lookup.to_request(extras), options)
    }

    /// A single card. Fails with `Decode` for lookups that return lists.
    pub fn card(&self, lookup: &CardLookup) -> Result<Card> {
        self.lookup_cards(lookup, &Params::new(), &self.default_options())?
            .decode()
    }

    /// First page of a full-text search.
    pub fn search_cards(&self, query: &str, extras: &Params) -> Result<ListPage> {
        let lookup = CardLookup::Search {
            query: query.to_string(),
        };
        self.lookup_cards(&lookup, extras, &self.default_options())?
            .into_list()
    }

    /// Every card matching `query`, across all pages.
    pub fn search_all_cards(&self, query: &str, extras: &Params) -> Result<Vec<Card>> {
        let first = self.search_cards(query, extras)?;
        let mut cards = Vec::new();
        for page in self.pages(first, self.default_options()) {
            cards.extend(page?.decode_items::<Card>()?);
        }
        Ok(cards)
    }

    pub fn named_card(&self, name: &str, mode: NameMatch) -> Result<Card> {
        self.card(&CardLookup::Named {
            name: name.to_string(),
            mode,
        })
    }

    pub fn random_card(&self, query: Option<&str>) -> Result<Card> {
        self.card(&CardLookup::Random {
            query: query.map(str::to_string),
        })
    }

    /// Up to 20 card names starting with `prefix`.
    pub fn autocomplete(&self, prefix: &str) -> Result<Catalog> {
        let lookup = CardLookup::Autocomplete {
            query: prefix.to_string(),
        };
        self.lookup_cards(&lookup, &Params::new(), &self.default_options())?
            .into_catalog()
    }

    /// Batch lookup by identifiers; at most `MAX_COLLECTION_IDENTIFIERS`.
    pub fn card_collection(&self, identifiers: &[CardIdentifier]) -> Result<ListPage> {
        if identifiers.is_empty() || identifiers.len() > MAX_COLLECTION_IDENTIFIERS {
            return Err(ScryfallError::InvalidLookup(format!(
                "collection needs 1..={MAX_COLLECTION_IDENTIFIERS} identifiers, got {}",
                identifiers.len()
            )));
        }
        let request = ApiRequest::new(CARDS_COLLECTION).body(json!({ "identifiers": identifiers }));
        self.dispatch(&request, &self.default_options())?.into_list()
    }
}
