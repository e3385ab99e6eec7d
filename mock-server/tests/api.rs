use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_state, MockState, BLACK_LOTUS_ID, PAGE_SIZE};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::HOST, "mock.test")
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- cards ---

#[tokio::test]
async fn named_exact_returns_card_envelope() {
    let resp = app().oneshot(get("/cards/named?exact=black%20lotus")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let card = body_json(resp).await;
    assert_eq!(card["object"], "card");
    assert_eq!(card["id"], BLACK_LOTUS_ID);
}

#[tokio::test]
async fn named_fuzzy_ambiguous_is_error_envelope() {
    // "o" appears in Black Lotus, Lightning Bolt, Opt and Shock.
    let resp = app().oneshot(get("/cards/named?fuzzy=o")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let error = body_json(resp).await;
    assert_eq!(error["object"], "error");
    assert_eq!(error["status"], 404);
    assert_eq!(error["type"], "ambiguous");
}

#[tokio::test]
async fn search_paginates_with_absolute_next_page() {
    let resp = app().oneshot(get("/cards/search?q=instant")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_json(resp).await;
    assert_eq!(page["object"], "list");
    assert_eq!(page["total_cards"], 3);
    assert_eq!(page["data"].as_array().unwrap().len(), PAGE_SIZE);
    assert_eq!(page["has_more"], true);
    assert_eq!(
        page["next_page"],
        "http://mock.test/cards/search?format=json&q=instant&page=2"
    );

    let resp = app().oneshot(get("/cards/search?q=instant&page=2")).await.unwrap();
    let last = body_json(resp).await;
    assert_eq!(last["has_more"], false);
    assert!(last.get("next_page").is_none());
    assert_eq!(last["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn search_without_matches_is_not_found() {
    let resp = app().oneshot(get("/cards/search?q=planeswalker")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["code"], "not_found");
}

#[tokio::test]
async fn card_by_bad_uuid_returns_400() {
    let resp = app().oneshot(get("/cards/not-a-uuid")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["object"], "error");
}

#[tokio::test]
async fn code_number_with_and_without_lang() {
    let resp = app().oneshot(get("/cards/lea/232")).await.unwrap();
    assert_eq!(body_json(resp).await["name"], "Black Lotus");

    let resp = app().oneshot(get("/cards/lea/232/ja")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn collection_splits_found_and_not_found() {
    let body = format!(r#"{{"identifiers":[{{"id":"{BLACK_LOTUS_ID}"}},{{"name":"Mox Pearl"}}]}}"#);
    let resp = app()
        .oneshot(json_request("POST", "/cards/collection", &body))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let list = body_json(resp).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
    assert_eq!(list["not_found"][0]["name"], "Mox Pearl");
}

#[tokio::test]
async fn autocomplete_is_catalog() {
    let resp = app().oneshot(get("/cards/autocomplete?q=li")).await.unwrap();

    let catalog = body_json(resp).await;
    assert_eq!(catalog["object"], "catalog");
    assert_eq!(catalog["data"], serde_json::json!(["Lightning Bolt"]));
}

// --- other resources ---

#[tokio::test]
async fn set_by_code_and_unknown_set() {
    let resp = app().oneshot(get("/sets/m21")).await.unwrap();
    assert_eq!(body_json(resp).await["name"], "Core Set 2021");

    let resp = app().oneshot(get("/sets/zzz")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn parse_mana_counts_colors() {
    let resp = app().oneshot(get("/symbology/parse-mana?cost=2RG")).await.unwrap();

    let cost = body_json(resp).await;
    assert_eq!(cost["object"], "mana_cost");
    assert_eq!(cost["cost"], "{2}{R}{G}");
    assert_eq!(cost["cmc"], 4.0);
    assert_eq!(cost["multicolored"], true);
}

#[tokio::test]
async fn unknown_route_is_error_envelope() {
    let resp = app().oneshot(get("/nope")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["object"], "error");
}

#[tokio::test]
async fn malformed_route_is_not_json() {
    let resp = app().oneshot(get("/malformed")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(serde_json::from_slice::<Value>(&body_bytes(resp).await).is_err());
}

#[tokio::test]
async fn every_request_is_counted() {
    let state = MockState::new();
    let router = app_with_state(state.clone());

    router.clone().oneshot(get("/sets")).await.unwrap();
    router.oneshot(get("/nope")).await.unwrap();

    assert_eq!(state.hits(), 2);
}
