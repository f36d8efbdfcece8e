// In: src/lib.rs

//! Pokedex Query Core
//!
//! Generation classification and combined search/type/generation filtering
//! over a read-only collection of Pokemon records, with pagination.

// --- MODULE DECLARATIONS ---
pub mod config;
pub mod debounce;
pub mod errors;
pub mod filter_state;
pub mod generations;
pub mod mcp_interface;
pub mod pokedex;
pub mod query;
pub mod store;

#[cfg(test)]
mod tests;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{GenerationDescriptor, IdRange, PokemonRecord, PokemonType};

// --- From this crate's modules (`src/`) ---

// Query service and its results.
pub use pokedex::{GenerationOverview, GenerationSummary, Pokedex};
pub use query::{FilterRequest, PaginationInfo, QueryLimits, QueryResult, RawFilterParams};

// Classification and storage.
pub use generations::GenerationTable;
pub use store::{MemoryStore, PokemonStore, StorePage};

// Client-side helpers.
pub use debounce::debounce;
pub use filter_state::{reduce, FilterAction, FilterState};

// Crate-specific error and result types.
pub use errors::{
    ConfigError, ConfigResult, PokedexError, PokedexResult, QueryError, StorageError,
    StorageResult,
};
