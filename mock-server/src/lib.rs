//! In-process stand-in for the Scryfall API.
//!
//! Serves a handful of fixed cards and sets using the real envelope shapes
//! (`card`, `list`, `catalog`, `error`) and counts every request it receives,
//! so client tests can assert how many calls actually reached the network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;

/// Cards per search page; small so pagination is easy to exercise.
pub const PAGE_SIZE: usize = 2;

pub const BLACK_LOTUS_ID: &str = "bd8fa327-dd41-4737-8f19-2cf5eb1f7cdd";
pub const LIGHTNING_BOLT_ID: &str = "e3285e6b-3e79-4d7c-bf96-d920f973b122";
pub const OPT_ID: &str = "0d8d6a1e-3d4f-4b1c-9c0a-2f5f3c8e6a11";
pub const SHOCK_ID: &str = "59e3a4e1-8a4b-4a0e-9d63-8f2b4f1c0b22";

#[derive(Clone)]
pub struct MockState {
    cards: Arc<Vec<Value>>,
    sets: Arc<Vec<Value>>,
    hits: Arc<AtomicUsize>,
}

impl Default for MockState {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    pub fn new() -> Self {
        Self {
            cards: Arc::new(seed_cards()),
            sets: Arc::new(seed_sets()),
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn card_by(&self, field: &str, value: &str) -> Option<&Value> {
        self.cards
            .iter()
            .find(|card| card[field].as_str().is_some_and(|v| v.eq_ignore_ascii_case(value)))
    }
}

fn card(id: &str, name: &str, mana_cost: &str, cmc: f64, type_line: &str, set: &str, number: &str) -> Value {
    json!({
        "object": "card",
        "id": id,
        "name": name,
        "lang": "en",
        "uri": format!("https://api.scryfall.com/cards/{id}"),
        "mana_cost": mana_cost,
        "cmc": cmc,
        "type_line": type_line,
        "colors": [],
        "legalities": {"vintage": "legal", "legacy": "legal"},
        "set": set,
        "collector_number": number,
        "rarity": "common",
        "prices": {"usd": "1.00", "eur": null, "tix": null}
    })
}

fn seed_cards() -> Vec<Value> {
    vec![
        card(BLACK_LOTUS_ID, "Black Lotus", "{0}", 0.0, "Artifact", "lea", "232"),
        card(LIGHTNING_BOLT_ID, "Lightning Bolt", "{R}", 1.0, "Instant", "lea", "161"),
        card(OPT_ID, "Opt", "{U}", 1.0, "Instant", "xln", "65"),
        card(SHOCK_ID, "Shock", "{R}", 1.0, "Instant", "m21", "159"),
    ]
}

fn seed_sets() -> Vec<Value> {
    vec![
        json!({
            "object": "set",
            "id": "288bd996-960e-448b-a187-9504c1ffb4c5",
            "code": "lea",
            "name": "Limited Edition Alpha",
            "set_type": "core",
            "card_count": 295,
            "digital": false
        }),
        json!({
            "object": "set",
            "id": "fc0bdf03-5b34-4fa5-8e9c-3e2e1b1d6d2b",
            "code": "m21",
            "name": "Core Set 2021",
            "set_type": "core",
            "card_count": 397,
            "digital": false
        }),
    ]
}

fn api_error(status: StatusCode, code: &str, details: &str, error_type: Option<&str>) -> Response {
    let mut body = json!({
        "object": "error",
        "status": status.as_u16(),
        "code": code,
        "details": details,
    });
    if let Some(error_type) = error_type {
        body["type"] = json!(error_type);
    }
    (status, Json(body)).into_response()
}

fn not_found(details: &str) -> Response {
    api_error(StatusCode::NOT_FOUND, "not_found", details, None)
}

fn list(data: Vec<Value>, has_more: bool, next_page: Option<String>, total: usize) -> Response {
    let mut body = json!({
        "object": "list",
        "has_more": has_more,
        "total_cards": total,
        "data": data,
    });
    if let Some(next_page) = next_page {
        body["next_page"] = json!(next_page);
    }
    Json(body).into_response()
}

pub fn app() -> Router {
    app_with_state(MockState::new())
}

pub fn app_with_state(state: MockState) -> Router {
    Router::new()
        .route("/cards/search", get(search_cards))
        .route("/cards/named", get(named_card))
        .route("/cards/random", get(random_card))
        .route("/cards/autocomplete", get(autocomplete))
        .route("/cards/collection", post(card_collection))
        // `key` is a card id on its own, a set code when followed by a number.
        .route("/cards/{key}", get(card_by_id))
        .route("/cards/{key}/{number}", get(card_by_code_number))
        .route("/cards/{key}/{number}/{lang}", get(card_by_code_number_lang))
        .route("/sets", get(list_sets))
        .route("/sets/{code}", get(set_by_code))
        .route("/catalog/{name}", get(catalog))
        .route("/symbology/parse-mana", get(parse_mana))
        .route("/malformed", get(malformed))
        .fallback(|| async { not_found("No such endpoint") })
        .layer(middleware::from_fn_with_state(state.clone(), count_hits))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, MockState::new()).await
}

pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn count_hits(State(state): State<MockState>, request: Request, next: Next) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    debug!(method = %request.method(), uri = %request.uri(), "mock request");
    next.run(request).await
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    page: Option<usize>,
}

async fn search_cards(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let Some(q) = params.q.filter(|q| !q.is_empty()) else {
        return api_error(StatusCode::BAD_REQUEST, "bad_request", "You didn't provide a search query", None);
    };
    let needle = q.trim_start_matches("t:").to_lowercase();
    let matches: Vec<Value> = state
        .cards
        .iter()
        .filter(|card| {
            ["name", "type_line"].iter().any(|field| {
                card[*field]
                    .as_str()
                    .is_some_and(|v| v.to_lowercase().contains(&needle))
            })
        })
        .cloned()
        .collect();
    if matches.is_empty() {
        return not_found("Your query didn't match any cards");
    }

    let page = params.page.unwrap_or(1).max(1);
    let total = matches.len();
    let start = (page - 1) * PAGE_SIZE;
    let data: Vec<Value> = matches.into_iter().skip(start).take(PAGE_SIZE).collect();
    let has_more = start + PAGE_SIZE < total;
    let next_page = has_more.then(|| {
        let host = headers
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("localhost");
        format!("http://{host}/cards/search?format=json&q={}&page={}", encode(&q), page + 1)
    });
    list(data, has_more, next_page, total)
}

fn encode(raw: &str) -> String {
    raw.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => (b as char).to_string(),
            _ => format!("%{b:02X}"),
        })
        .collect()
}

async fn named_card(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Some(exact) = params.get("exact") {
        return match state.card_by("name", exact) {
            Some(card) => Json(card.clone()).into_response(),
            None => not_found("No cards found matching that name"),
        };
    }
    let Some(fuzzy) = params.get("fuzzy") else {
        return api_error(StatusCode::BAD_REQUEST, "bad_request", "Provide exact or fuzzy", None);
    };
    let needle = fuzzy.to_lowercase();
    let matches: Vec<&Value> = state
        .cards
        .iter()
        .filter(|card| card["name"].as_str().is_some_and(|n| n.to_lowercase().contains(&needle)))
        .collect();
    match matches.as_slice() {
        [card] => Json((*card).clone()).into_response(),
        [] => not_found("No cards found matching that name"),
        _ => api_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "Too many cards match ambiguous name",
            Some("ambiguous"),
        ),
    }
}

async fn random_card(State(state): State<MockState>) -> Response {
    match state.cards.first() {
        Some(card) => Json(card.clone()).into_response(),
        None => not_found("No cards"),
    }
}

async fn autocomplete(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let prefix = params.get("q").map(|q| q.to_lowercase()).unwrap_or_default();
    let names: Vec<&str> = state
        .cards
        .iter()
        .filter_map(|card| card["name"].as_str())
        .filter(|name| name.to_lowercase().starts_with(&prefix))
        .collect();
    Json(json!({
        "object": "catalog",
        "uri": "https://api.scryfall.com/cards/autocomplete",
        "total_values": names.len(),
        "data": names,
    }))
    .into_response()
}

async fn card_collection(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let Some(identifiers) = body["identifiers"].as_array() else {
        return api_error(StatusCode::BAD_REQUEST, "bad_request", "Missing identifiers", None);
    };
    let mut found = Vec::new();
    let mut not_found = Vec::new();
    for identifier in identifiers {
        let hit = ["id", "name"].iter().find_map(|field| {
            identifier[*field].as_str().and_then(|value| state.card_by(field, value))
        });
        match hit {
            Some(card) => found.push(card.clone()),
            None => not_found.push(identifier.clone()),
        }
    }
    Json(json!({
        "object": "list",
        "has_more": false,
        "not_found": not_found,
        "data": found,
    }))
    .into_response()
}

async fn card_by_id(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    if uuid::Uuid::parse_str(&id).is_err() {
        return api_error(StatusCode::BAD_REQUEST, "bad_request", "Invalid card id", None);
    }
    match state.card_by("id", &id) {
        Some(card) => Json(card.clone()).into_response(),
        None => not_found("No card found with the given ID"),
    }
}

fn by_code_number(state: &MockState, code: &str, number: &str, lang: &str) -> Response {
    let hit = state.cards.iter().find(|card| {
        card["set"] == code && card["collector_number"] == number && card["lang"] == lang
    });
    match hit {
        Some(card) => Json(card.clone()).into_response(),
        None => not_found("No card found with the given set code and collector number"),
    }
}

async fn card_by_code_number(
    State(state): State<MockState>,
    Path((code, number)): Path<(String, String)>,
) -> Response {
    by_code_number(&state, &code, &number, "en")
}

async fn card_by_code_number_lang(
    State(state): State<MockState>,
    Path((code, number, lang)): Path<(String, String, String)>,
) -> Response {
    by_code_number(&state, &code, &number, &lang)
}

async fn list_sets(State(state): State<MockState>) -> Response {
    list(state.sets.to_vec(), false, None, state.sets.len())
}

async fn set_by_code(State(state): State<MockState>, Path(code): Path<String>) -> Response {
    match state.sets.iter().find(|set| set["code"] == code.as_str()) {
        Some(set) => Json(set.clone()).into_response(),
        None => not_found("No set found with that code"),
    }
}

async fn catalog(State(state): State<MockState>, Path(name): Path<String>) -> Response {
    if name != "card-names" {
        return not_found("No such catalog");
    }
    let names: Vec<&str> = state.cards.iter().filter_map(|card| card["name"].as_str()).collect();
    Json(json!({
        "object": "catalog",
        "uri": "https://api.scryfall.com/catalog/card-names",
        "total_values": names.len(),
        "data": names,
    }))
    .into_response()
}

async fn parse_mana(Query(params): Query<HashMap<String, String>>) -> Response {
    let Some(cost) = params.get("cost").filter(|c| !c.is_empty()) else {
        return api_error(StatusCode::BAD_REQUEST, "bad_request", "Missing cost", None);
    };
    let mut normalized = String::new();
    let mut cmc = 0.0;
    let mut colors = Vec::new();
    for symbol in cost.chars().filter(|c| !matches!(c, '{' | '}')) {
        normalized.push_str(&format!("{{{symbol}}}"));
        match symbol.to_digit(10) {
            Some(generic) => cmc += f64::from(generic),
            None => {
                cmc += 1.0;
                let color = symbol.to_ascii_uppercase().to_string();
                if !colors.contains(&color) {
                    colors.push(color);
                }
            }
        }
    }
    Json(json!({
        "object": "mana_cost",
        "cost": normalized,
        "cmc": cmc,
        "colors": colors,
        "colorless": colors.is_empty(),
        "monocolored": colors.len() == 1,
        "multicolored": colors.len() > 1,
    }))
    .into_response()
}

async fn malformed() -> Response {
    (StatusCode::OK, "this is not json").into_response()
}
