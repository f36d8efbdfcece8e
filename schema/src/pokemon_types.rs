use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// The fixed type vocabulary, in the order the external API lists it.
///
/// Parsing is case-insensitive and serialization uses the lowercase names the
/// external API emits (`"poison"`, `"fire"`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

impl PokemonType {
    /// Every type in vocabulary order.
    pub fn all() -> Vec<PokemonType> {
        PokemonType::iter().collect()
    }

    /// Parses a type name, tolerating surrounding whitespace and any casing.
    pub fn parse_name(name: &str) -> Option<PokemonType> {
        name.trim().parse().ok()
    }
}
