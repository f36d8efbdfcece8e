// Pokedex Schema - Shared type definitions
// This crate holds the record, type and generation definitions shared by the
// query core, its loaders and the binaries that expose it.

pub use generation_data::*;
pub use pokemon_data::*;
pub use pokemon_types::*;

pub mod generation_data;
pub mod pokemon_data;
pub mod pokemon_types;
