use crate::errors::PokedexResult;
use crate::generations::GenerationTable;
use crate::pokedex::Pokedex;
use crate::query::QueryResult;
use crate::store::MemoryStore;
use schema::{PokemonRecord, PokemonType, STAT_NAMES};
use std::sync::Arc;

/// A builder for creating test records with common defaults.
///
/// # Example
/// ```ignore
/// let record = RecordBuilder::new(1, "bulbasaur")
///     .types(&[PokemonType::Grass, PokemonType::Poison])
///     .build();
/// ```
pub struct RecordBuilder {
    pokemon_id: u32,
    name: String,
    types: Vec<PokemonType>,
    abilities: Vec<String>,
}

impl RecordBuilder {
    /// Creates a new builder for a given ID and name. Defaults to a single
    /// normal type.
    pub fn new(pokemon_id: u32, name: &str) -> Self {
        Self {
            pokemon_id,
            name: name.to_string(),
            types: vec![PokemonType::Normal],
            abilities: Vec::new(),
        }
    }

    /// Sets the types, primary first.
    pub fn types(mut self, types: &[PokemonType]) -> Self {
        self.types = types.to_vec();
        self
    }

    pub fn ability(mut self, ability: &str) -> Self {
        self.abilities.push(ability.to_string());
        self
    }

    /// Builds the `PokemonRecord`.
    pub fn build(self) -> PokemonRecord {
        PokemonRecord {
            pokemon_id: self.pokemon_id,
            name: self.name,
            types: self.types,
            height: 10,
            weight: 100,
            base_experience: Some(64),
            stats: STAT_NAMES
                .iter()
                .map(|name| (name.to_string(), 50))
                .collect(),
            abilities: self.abilities,
            sprites: None,
        }
    }
}

/// Nine Kanto records and two Johto records; nothing from Hoenn.
pub fn sample_collection() -> Vec<PokemonRecord> {
    use PokemonType::*;

    vec![
        RecordBuilder::new(1, "bulbasaur").types(&[Grass, Poison]).ability("overgrow").build(),
        RecordBuilder::new(2, "ivysaur").types(&[Grass, Poison]).build(),
        RecordBuilder::new(3, "venusaur").types(&[Grass, Poison]).build(),
        RecordBuilder::new(4, "charmander").types(&[Fire]).ability("blaze").build(),
        RecordBuilder::new(5, "charmeleon").types(&[Fire]).build(),
        RecordBuilder::new(6, "charizard").types(&[Fire, Flying]).build(),
        RecordBuilder::new(7, "squirtle").types(&[Water]).ability("torrent").build(),
        RecordBuilder::new(25, "pikachu").types(&[Electric]).build(),
        RecordBuilder::new(43, "oddish").types(&[Grass, Poison]).build(),
        RecordBuilder::new(152, "chikorita").types(&[Grass]).build(),
        RecordBuilder::new(172, "pichu").types(&[Electric]).build(),
    ]
}

pub fn pokedex_with(records: Vec<PokemonRecord>) -> Pokedex {
    let store = match MemoryStore::new(records) {
        Ok(store) => store,
        Err(err) => panic!("Failed to build test store: {}", err),
    };
    Pokedex::new(Arc::new(store), GenerationTable::default())
}

pub fn sample_pokedex() -> Pokedex {
    pokedex_with(sample_collection())
}

/// IDs of a result page, in order.
pub fn ids(result: &QueryResult) -> Vec<u32> {
    result.results.iter().map(|record| record.pokemon_id).collect()
}

/// Helper function to assert that a Result is Ok and return the value.
/// Provides clear error messages in tests when a query unexpectedly fails.
pub fn assert_ok<T>(result: PokedexResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
