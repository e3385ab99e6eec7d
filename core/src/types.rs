//! Typed records decoded from classified payloads.
//!
//! # Design
//! Each record is decoded once, straight from the envelope body, with serde.
//! Nullable upstream fields are `Option`; list-like fields default to empty.
//! Card behavior is split into three capability traits (`CoreFields`,
//! `GameplayFields`, `PrintFields`) so code that only cares about, say,
//! rules text can accept any `impl GameplayFields`, whether a whole card or
//! one face of it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of any top-level API object.
pub trait CoreFields {
    fn object(&self) -> &str;
    fn id(&self) -> Uuid;
    fn name(&self) -> &str;
    fn lang(&self) -> &str;
    fn uri(&self) -> &str;
}

/// Rules-relevant characteristics.
pub trait GameplayFields {
    fn mana_cost(&self) -> Option<&str>;
    fn type_line(&self) -> Option<&str>;
    fn oracle_text(&self) -> Option<&str>;
    fn colors(&self) -> &[String];

    /// Mana value, when known.
    fn cmc(&self) -> Option<f64> {
        None
    }

    /// `"legal"`, `"not_legal"`, `"banned"` or `"restricted"`.
    fn legality(&self, _format: &str) -> Option<&str> {
        None
    }

    fn is_legal_in(&self, format: &str) -> bool {
        self.legality(format) == Some("legal")
    }
}

/// Attributes of one specific printing.
pub trait PrintFields {
    fn set_code(&self) -> &str;
    fn set_name(&self) -> &str;
    fn collector_number(&self) -> &str;
    fn rarity(&self) -> &str;
    fn artist(&self) -> Option<&str>;
    fn prices(&self) -> &Prices;
}

/// Market prices as returned upstream: decimal strings, `None` when unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prices {
    #[serde(default)]
    pub usd: Option<String>,
    #[serde(default)]
    pub usd_foil: Option<String>,
    #[serde(default)]
    pub eur: Option<String>,
    #[serde(default)]
    pub tix: Option<String>,
}

/// One face of a multi-faced card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardFace {
    pub name: String,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default = "default_card_object")]
    pub object: String,
    pub id: Uuid,
    #[serde(default)]
    pub oracle_id: Option<Uuid>,
    pub name: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub scryfall_uri: Option<String>,
    #[serde(default)]
    pub layout: Option<String>,

    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub cmc: Option<f64>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub loyalty: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub color_identity: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub legalities: BTreeMap<String, String>,
    #[serde(default)]
    pub card_faces: Vec<CardFace>,

    #[serde(default)]
    pub set: String,
    #[serde(default)]
    pub set_name: String,
    #[serde(default)]
    pub collector_number: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub released_at: Option<String>,
    #[serde(default)]
    pub prices: Prices,

    #[serde(default)]
    pub multiverse_ids: Vec<u64>,
    #[serde(default)]
    pub mtgo_id: Option<u64>,
    #[serde(default)]
    pub arena_id: Option<u64>,
    #[serde(default)]
    pub tcgplayer_id: Option<u64>,
    #[serde(default)]
    pub cardmarket_id: Option<u64>,
}

fn default_card_object() -> String {
    "card".to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

impl CoreFields for Card {
    fn object(&self) -> &str {
        &self.object
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn lang(&self) -> &str {
        &self.lang
    }

    fn uri(&self) -> &str {
        &self.uri
    }
}

impl GameplayFields for Card {
    fn mana_cost(&self) -> Option<&str> {
        self.mana_cost.as_deref()
    }

    fn type_line(&self) -> Option<&str> {
        self.type_line.as_deref()
    }

    fn oracle_text(&self) -> Option<&str> {
        self.oracle_text.as_deref()
    }

    fn colors(&self) -> &[String] {
        &self.colors
    }

    fn cmc(&self) -> Option<f64> {
        self.cmc
    }

    fn legality(&self, format: &str) -> Option<&str> {
        self.legalities.get(format).map(String::as_str)
    }
}

impl PrintFields for Card {
    fn set_code(&self) -> &str {
        &self.set
    }

    fn set_name(&self) -> &str {
        &self.set_name
    }

    fn collector_number(&self) -> &str {
        &self.collector_number
    }

    fn rarity(&self) -> &str {
        &self.rarity
    }

    fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    fn prices(&self) -> &Prices {
        &self.prices
    }
}

impl GameplayFields for CardFace {
    fn mana_cost(&self) -> Option<&str> {
        self.mana_cost.as_deref()
    }

    fn type_line(&self) -> Option<&str> {
        self.type_line.as_deref()
    }

    fn oracle_text(&self) -> Option<&str> {
        self.oracle_text.as_deref()
    }

    fn colors(&self) -> &[String] {
        &self.colors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Set {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub set_type: String,
    #[serde(default)]
    pub released_at: Option<String>,
    #[serde(default)]
    pub card_count: u32,
    #[serde(default)]
    pub digital: bool,
    #[serde(default)]
    pub parent_set_code: Option<String>,
    #[serde(default)]
    pub tcgplayer_id: Option<u64>,
    #[serde(default)]
    pub icon_svg_uri: Option<String>,
    #[serde(default)]
    pub search_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruling {
    #[serde(default)]
    pub oracle_id: Option<Uuid>,
    /// `"wotc"` or `"scryfall"`.
    pub source: String,
    pub published_at: String,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSymbol {
    pub symbol: String,
    pub english: String,
    #[serde(default)]
    pub svg_uri: Option<String>,
    #[serde(default)]
    pub represents_mana: bool,
    #[serde(default)]
    pub mana_value: Option<f64>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub funny: bool,
}

/// Result of parsing a mana cost string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManaCost {
    pub cost: String,
    pub cmc: f64,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub colorless: bool,
    #[serde(default)]
    pub monocolored: bool,
    #[serde(default)]
    pub multicolored: bool,
}

/// A downloadable bulk export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkData {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub bulk_type: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub download_uri: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub content_encoding: Option<String>,
}
