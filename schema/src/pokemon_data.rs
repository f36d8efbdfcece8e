use crate::PokemonType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sprite host used when a record carries no `front_default` sprite.
pub const SPRITE_FALLBACK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

/// Sprite variant shown in lists and detail views.
pub const DEFAULT_SPRITE_VARIANT: &str = "front_default";

/// Stat names as the external API spells them, in display order.
pub const STAT_NAMES: [&str; 6] = [
    "hp",
    "attack",
    "defense",
    "special-attack",
    "special-defense",
    "speed",
];

/// A Pokemon as mirrored from the external API. Records are immutable once
/// seeded; nothing in the query path mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonRecord {
    pub pokemon_id: u32,
    pub name: String,
    /// One or two types; the first is the primary type.
    pub types: Vec<PokemonType>,
    /// Decimeters.
    pub height: u32,
    /// Hectograms.
    pub weight: u32,
    #[serde(default)]
    pub base_experience: Option<u32>,
    /// Stat name -> base value, keyed by the names in [`STAT_NAMES`].
    #[serde(default)]
    pub stats: BTreeMap<String, u16>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub sprites: Option<BTreeMap<String, String>>,
}

impl PokemonRecord {
    pub fn primary_type(&self) -> Option<PokemonType> {
        self.types.first().copied()
    }

    /// Membership test over all of the record's types, not just the primary one.
    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }

    /// The default sprite, or a URL built from the Pokemon's ID when the
    /// record has none.
    pub fn sprite_url(&self) -> String {
        self.sprites
            .as_ref()
            .and_then(|sprites| sprites.get(DEFAULT_SPRITE_VARIANT))
            .filter(|url| !url.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("{}/{}.png", SPRITE_FALLBACK_BASE, self.pokemon_id))
    }

    /// A base stat by name; zero when the record does not carry it.
    pub fn stat(&self, name: &str) -> u16 {
        self.stats.get(name).copied().unwrap_or(0)
    }

    pub fn stat_total(&self) -> u32 {
        self.stats.values().map(|&value| u32::from(value)).sum()
    }

    /// Height in meters.
    pub fn height_m(&self) -> f32 {
        self.height as f32 / 10.0
    }

    /// Weight in kilograms.
    pub fn weight_kg(&self) -> f32 {
        self.weight as f32 / 10.0
    }
}
