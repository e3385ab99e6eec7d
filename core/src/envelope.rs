//! Response envelope classification.
//!
//! # Design
//! Every response body carries an `"object"` discriminant. The kind is read
//! from that field alone, never from the endpoint that was called, so one
//! classifier serves every resource. `"list"`, `"catalog"` and `"error"` have
//! fixed shapes and get typed structs; anything else is a single object kept
//! as raw JSON until a façade decodes it into its record type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiErrorBody, Result, ScryfallError};

const DISCRIMINANT: &str = "object";

/// One page of a paginated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPage {
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
    #[serde(default, alias = "total_cards", skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ListPage {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.data.iter()
    }

    /// URL of the following page, if the service says there is one.
    pub fn next_page_url(&self) -> Option<&str> {
        if self.has_more {
            self.next_page.as_deref()
        } else {
            None
        }
    }

    /// Decode every element into `T`.
    pub fn decode_items<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.data
            .iter()
            .map(|item| decode_value(item.clone()))
            .collect()
    }
}

/// A flat list of strings, e.g. every known card name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub total_values: u64,
    #[serde(default)]
    pub data: Vec<String>,
}

/// Classified response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Any single resource: card, set, ruling, bulk data, ...
    Object { kind: String, body: Value },
    List(ListPage),
    Catalog(Catalog),
    Error(ApiErrorBody),
}

/// A classified, non-error payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Object { kind: String, body: Value },
    List(ListPage),
    Catalog(Catalog),
}

impl Payload {
    /// The discriminant this payload was classified under.
    pub fn kind(&self) -> &str {
        match self {
            Payload::Object { kind, .. } => kind,
            Payload::List(_) => "list",
            Payload::Catalog(_) => "catalog",
        }
    }

    /// Decode a single-object payload into its typed record.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            Payload::Object { body, .. } => decode_value(body),
            other => Err(ScryfallError::Decode(format!(
                "expected a single object, got `{}`",
                other.kind()
            ))),
        }
    }

    pub fn into_list(self) -> Result<ListPage> {
        match self {
            Payload::List(page) => Ok(page),
            other => Err(ScryfallError::Decode(format!(
                "expected a list, got `{}`",
                other.kind()
            ))),
        }
    }

    pub fn into_catalog(self) -> Result<Catalog> {
        match self {
            Payload::Catalog(catalog) => Ok(catalog),
            other => Err(ScryfallError::Decode(format!(
                "expected a catalog, got `{}`",
                other.kind()
            ))),
        }
    }

    /// Raw JSON form; this is what the cache stores.
    pub fn to_value(&self) -> Value {
        match self {
            Payload::Object { body, .. } => body.clone(),
            Payload::List(page) => {
                let mut value = serde_json::to_value(page).unwrap_or(Value::Null);
                value[DISCRIMINANT] = Value::from("list");
                value
            }
            Payload::Catalog(catalog) => {
                let mut value = serde_json::to_value(catalog).unwrap_or(Value::Null);
                value[DISCRIMINANT] = Value::from("catalog");
                value
            }
        }
    }
}

impl Envelope {
    /// Split off the error case.
    pub fn into_result(self) -> Result<Payload> {
        match self {
            Envelope::Object { kind, body } => Ok(Payload::Object { kind, body }),
            Envelope::List(page) => Ok(Payload::List(page)),
            Envelope::Catalog(catalog) => Ok(Payload::Catalog(catalog)),
            Envelope::Error(body) => Err(ScryfallError::Api(body)),
        }
    }
}

/// Why a JSON value could not be classified. The dispatcher attaches the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyError(pub String);

/// Classify a decoded body by its `"object"` field.
pub fn classify(body: Value) -> std::result::Result<Envelope, ClassifyError> {
    let kind = match body.get(DISCRIMINANT) {
        Some(Value::String(kind)) => kind.clone(),
        Some(_) => return Err(ClassifyError("`object` field is not a string".to_string())),
        None => return Err(ClassifyError("missing `object` field".to_string())),
    };
    let envelope = match kind.as_str() {
        "list" => serde_json::from_value(body).map(Envelope::List),
        "catalog" => serde_json::from_value(body).map(Envelope::Catalog),
        "error" => serde_json::from_value(body).map(Envelope::Error),
        _ => return Ok(Envelope::Object { kind, body }),
    };
    envelope.map_err(|e| ClassifyError(format!("invalid `{kind}` envelope: {e}")))
}

fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ScryfallError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn single_object_keeps_body() {
        let body = json!({"object": "card", "name": "Black Lotus", "id": "abc"});
        match classify(body.clone()).unwrap() {
            Envelope::Object { kind, body: kept } => {
                assert_eq!(kind, "card");
                assert_eq!(kept, body);
            }
            other => panic!("unexpected envelope: {other:?}"),
        }
    }

    #[test]
    fn list_reads_pagination_fields() {
        let body = json!({
            "object": "list",
            "total_cards": 3,
            "has_more": true,
            "next_page": "https://api.scryfall.com/cards/search?page=2",
            "data": [{"object": "card"}]
        });
        let Envelope::List(page) = classify(body).unwrap() else {
            panic!("expected list");
        };
        assert_eq!(page.total_count, Some(3));
        assert_eq!(page.next_page_url(), Some("https://api.scryfall.com/cards/search?page=2"));
        assert_eq!(page.len(), 1);
    }

    #[test]
    fn next_page_ignored_without_has_more() {
        let page = ListPage {
            data: Vec::new(),
            has_more: false,
            next_page: Some("https://example.test/next".to_string()),
            total_count: None,
            warnings: Vec::new(),
        };
        assert_eq!(page.next_page_url(), None);
    }

    #[test]
    fn catalog_is_typed() {
        let body = json!({"object": "catalog", "uri": "u", "total_values": 2, "data": ["a", "b"]});
        assert_eq!(
            classify(body).unwrap(),
            Envelope::Catalog(Catalog {
                uri: "u".to_string(),
                total_values: 2,
                data: vec!["a".to_string(), "b".to_string()],
            })
        );
    }

    #[test]
    fn error_envelope_becomes_api_error() {
        let body = json!({"object": "error", "status": 404, "code": "not_found", "details": "No cards found"});
        let err = classify(body).unwrap().into_result().unwrap_err();
        assert_eq!(err.api_error().map(|b| b.status), Some(404));
    }

    #[test]
    fn missing_discriminant_is_rejected() {
        assert!(classify(json!({"name": "Opt"})).is_err());
        assert!(classify(json!({"object": 7})).is_err());
    }

    #[test]
    fn malformed_error_envelope_is_rejected() {
        assert!(classify(json!({"object": "error", "status": "nope"})).is_err());
    }

    #[test]
    fn payload_value_round_trips_through_classifier() {
        let payload = Payload::Catalog(Catalog {
            uri: "u".to_string(),
            total_values: 1,
            data: vec!["Opt".to_string()],
        });
        let reclassified = classify(payload.to_value()).unwrap().into_result().unwrap();
        assert_eq!(reclassified, payload);
    }

    #[test]
    fn decode_rejects_wrong_shape() {
        let payload = Payload::List(ListPage {
            data: Vec::new(),
            has_more: false,
            next_page: None,
            total_count: None,
            warnings: Vec::new(),
        });
        assert!(matches!(
            payload.decode::<serde_json::Value>(),
            Err(ScryfallError::Decode(_))
        ));
    }
}
