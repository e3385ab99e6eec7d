//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts its own mock server on a random port and drives a
//! `Client` over real HTTP with the default `UreqTransport`. Every client gets
//! a private cache and no rate limiting so tests stay independent and fast.

use std::sync::Arc;

use mock_server::{MockState, BLACK_LOTUS_ID, LIGHTNING_BOLT_ID};
use scryfall_core::{
    CallOptions, CardIdentifier, CardLookup, Client, MemoryCache, NameMatch, Params, RateLimit,
    ScryfallError,
};
use uuid::Uuid;

/// Start the mock server on a background thread; returns its base URL.
fn start_server(state: MockState) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_state(listener, state).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn client(base_url: &str) -> Client {
    Client::builder()
        .base_url(base_url)
        .cache(Arc::new(MemoryCache::new()))
        .rate_limit(RateLimit::Disabled)
        .build()
}

#[test]
fn named_card_decodes_into_card() {
    let base = start_server(MockState::new());
    let client = client(&base);

    let card = client.named_card("lightning", NameMatch::Fuzzy).unwrap();
    assert_eq!(card.name, "Lightning Bolt");
    assert_eq!(card.id, Uuid::parse_str(LIGHTNING_BOLT_ID).unwrap());

    let card = client
        .card(&CardLookup::CodeNumber {
            code: "lea".to_string(),
            number: "232".to_string(),
            lang: None,
        })
        .unwrap();
    assert_eq!(card.name, "Black Lotus");
}

#[test]
fn search_follows_next_page_to_the_end() {
    let base = start_server(MockState::new());
    let client = client(&base);

    let first = client.search_cards("instant", &Params::new()).unwrap();
    assert!(first.has_more);
    assert_eq!(first.total_count, Some(3));

    let all = client.search_all_cards("instant", &Params::new()).unwrap();
    let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Lightning Bolt", "Opt", "Shock"]);
}

#[test]
fn error_envelope_becomes_api_error_and_is_not_cached() {
    let state = MockState::new();
    let base = start_server(state.clone());
    let client = client(&base);
    let options = CallOptions::cached();
    let lookup = CardLookup::Named {
        name: "Mox Pearl".to_string(),
        mode: NameMatch::Exact,
    };

    for _ in 0..2 {
        let err = client.lookup_cards(&lookup, &Params::new(), &options).unwrap_err();
        let body = err.api_error().expect("error envelope");
        assert_eq!(body.status, 404);
        assert_eq!(body.code, "not_found");
    }
    assert!(client.cache().is_empty());
    assert_eq!(state.hits(), 2);
}

#[test]
fn cached_call_reaches_the_server_once() {
    let state = MockState::new();
    let base = start_server(state.clone());
    let client = client(&base);
    let lookup = CardLookup::Id(Uuid::parse_str(BLACK_LOTUS_ID).unwrap());

    let first = client
        .lookup_cards(&lookup, &Params::new(), &CallOptions::cached())
        .unwrap();
    let second = client
        .lookup_cards(&lookup, &Params::new(), &CallOptions::cached())
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(state.hits(), 1);

    client
        .lookup_cards(&lookup, &Params::new(), &CallOptions::uncached())
        .unwrap();
    assert_eq!(state.hits(), 2);
}

#[test]
fn collection_posts_identifiers() {
    let base = start_server(MockState::new());
    let client = client(&base);

    let page = client
        .card_collection(&[
            CardIdentifier::Id {
                id: Uuid::parse_str(BLACK_LOTUS_ID).unwrap(),
            },
            CardIdentifier::Name {
                name: "Opt".to_string(),
            },
            CardIdentifier::Name {
                name: "Mox Pearl".to_string(),
            },
        ])
        .unwrap();

    assert_eq!(page.len(), 2);
    assert!(!page.has_more);
}

#[test]
fn catalog_and_set_facades() {
    let base = start_server(MockState::new());
    let client = client(&base);

    let names = client.catalog(scryfall_core::CatalogKind::CardNames).unwrap();
    assert_eq!(names.total_values, 4);
    assert!(names.data.iter().any(|n| n == "Opt"));

    let set = client.set("m21").unwrap();
    assert_eq!(set.name, "Core Set 2021");

    let cost = client.parse_mana("{1}{U}").unwrap();
    assert_eq!(cost.cmc, 2.0);
}

#[test]
fn non_json_success_is_malformed() {
    let base = start_server(MockState::new());
    let client = client(&base);
    let request = scryfall_core::ApiRequest::new(scryfall_core::Endpoint::get("malformed"));

    let err = client.dispatch(&request, &CallOptions::uncached()).unwrap_err();
    assert!(matches!(err, ScryfallError::MalformedResponse { .. }));
    assert!(err.is_transport());
}

#[test]
fn unreachable_server_is_transport_error() {
    let client = client("http://127.0.0.1:1");

    let err = client.random_card(None).unwrap_err();
    assert!(matches!(err, ScryfallError::Transport { .. }));
}
