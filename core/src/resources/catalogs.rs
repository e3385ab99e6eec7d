//! Catalog endpoints: flat lists of names and types.

use crate::client::{ApiRequest, Client};
use crate::envelope::Catalog;
use crate::error::Result;
use crate::path::Endpoint;

pub const CATALOG: Endpoint = Endpoint::get("catalog/:name");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    CardNames,
    ArtistNames,
    WordBank,
    CreatureTypes,
    PlaneswalkerTypes,
    LandTypes,
    ArtifactTypes,
    EnchantmentTypes,
    SpellTypes,
    Powers,
    Toughnesses,
    Loyalties,
    Watermarks,
    KeywordAbilities,
    KeywordActions,
    AbilityWords,
    Supertypes,
    CardTypes,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 18] = [
        CatalogKind::CardNames,
        CatalogKind::ArtistNames,
        CatalogKind::WordBank,
        CatalogKind::CreatureTypes,
        CatalogKind::PlaneswalkerTypes,
        CatalogKind::LandTypes,
        CatalogKind::ArtifactTypes,
        CatalogKind::EnchantmentTypes,
        CatalogKind::SpellTypes,
        CatalogKind::Powers,
        CatalogKind::Toughnesses,
        CatalogKind::Loyalties,
        CatalogKind::Watermarks,
        CatalogKind::KeywordAbilities,
        CatalogKind::KeywordActions,
        CatalogKind::AbilityWords,
        CatalogKind::Supertypes,
        CatalogKind::CardTypes,
    ];

    /// The path segment under `catalog/`.
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogKind::CardNames => "card-names",
            CatalogKind::ArtistNames => "artist-names",
            CatalogKind::WordBank => "word-bank",
            CatalogKind::CreatureTypes => "creature-types",
            CatalogKind::PlaneswalkerTypes => "planeswalker-types",
            CatalogKind::LandTypes => "land-types",
            CatalogKind::ArtifactTypes => "artifact-types",
            CatalogKind::EnchantmentTypes => "enchantment-types",
            CatalogKind::SpellTypes => "spell-types",
            CatalogKind::Powers => "powers",
            CatalogKind::Toughnesses => "toughnesses",
            CatalogKind::Loyalties => "loyalties",
            CatalogKind::Watermarks => "watermarks",
            CatalogKind::KeywordAbilities => "keyword-abilities",
            CatalogKind::KeywordActions => "keyword-actions",
            CatalogKind::AbilityWords => "ability-words",
            CatalogKind::Supertypes => "supertypes",
            CatalogKind::CardTypes => "card-types",
        }
    }
}

impl Client {
    pub fn catalog(&self, kind: CatalogKind) -> Result<Catalog> {
        let request = ApiRequest::new(CATALOG).path_param("name", kind.as_str());
        self.dispatch(&request, &self.default_options())?
            .into_catalog()
    }
}
