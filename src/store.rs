//! Record storage.
//!
//! [`PokemonStore`] is the contract the query engine needs from a record
//! collection. [`MemoryStore`] is the bundled implementation: the seeded
//! collection loaded once from RON or JSON files and held in memory.

use crate::errors::{StorageError, StorageResult};
use crate::query::{CompiledFilter, GenerationFilter};
use schema::{IdRange, PokemonRecord, PokemonType};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// One window of matching records, in ascending `pokemon_id` order, plus the
/// number of records matching overall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePage {
    pub records: Vec<PokemonRecord>,
    pub total: usize,
}

/// A read-only collection of Pokemon records.
pub trait PokemonStore: Send + Sync {
    /// Evaluates `filter`, orders matches by `pokemon_id` and returns
    /// `limit` of them starting at `offset`.
    fn find(&self, filter: &CompiledFilter, offset: usize, limit: usize) -> StorageResult<StorePage>;

    /// Number of records whose ID falls within `range`.
    fn count_in_range(&self, range: IdRange) -> StorageResult<usize>;

    fn get(&self, pokemon_id: u32) -> StorageResult<Option<PokemonRecord>>;

    /// Types present in the collection, in vocabulary order.
    fn distinct_types(&self) -> StorageResult<Vec<PokemonType>>;

    fn len(&self) -> StorageResult<usize>;
}

/// Immutable in-memory collection keyed by `pokemon_id`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<u32, PokemonRecord>,
}

impl MemoryStore {
    pub fn new(records: impl IntoIterator<Item = PokemonRecord>) -> StorageResult<Self> {
        let mut map = BTreeMap::new();
        for record in records {
            let id = record.pokemon_id;
            if map.insert(id, record).is_some() {
                return Err(StorageError::DuplicateId(id));
            }
        }
        Ok(Self { records: map })
    }

    /// Loads every `.ron` file in `<data_path>/pokemon`, one record per file
    /// (`001-bulbasaur.ron`).
    pub fn load_dir(data_path: &Path) -> StorageResult<Self> {
        let pokemon_dir = data_path.join("pokemon");
        let io_error = |source| StorageError::Io {
            path: pokemon_dir.clone(),
            source,
        };

        let mut records = Vec::new();
        for entry in fs::read_dir(&pokemon_dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("ron") {
                continue;
            }
            let content = fs::read_to_string(&path).map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;
            let record: PokemonRecord =
                ron::from_str(&content).map_err(|e| StorageError::Parse {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            records.push(record);
        }

        let store = Self::new(records)?;
        info!(
            path = %pokemon_dir.display(),
            records = store.records.len(),
            "Loaded Pokemon collection"
        );
        Ok(store)
    }

    /// Loads a JSON array of records, as mirrored from the external API.
    pub fn load_json(path: &Path) -> StorageResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<PokemonRecord> =
            serde_json::from_str(&content).map_err(|e| StorageError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let store = Self::new(records)?;
        info!(path = %path.display(), records = store.records.len(), "Loaded Pokemon collection");
        Ok(store)
    }

    /// Picks the loader from the path: a JSON file, or a data directory of
    /// RON records.
    pub fn load(path: &Path) -> StorageResult<Self> {
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            Self::load_json(path)
        } else {
            Self::load_dir(path)
        }
    }
}

impl PokemonStore for MemoryStore {
    fn find(&self, filter: &CompiledFilter, offset: usize, limit: usize) -> StorageResult<StorePage> {
        if filter.is_unsatisfiable() {
            return Ok(StorePage {
                records: Vec::new(),
                total: 0,
            });
        }

        // Narrow to the generation's ID range before evaluating the rest.
        let candidates: Box<dyn Iterator<Item = &PokemonRecord>> = match &filter.generation {
            GenerationFilter::Range { range, .. } => {
                Box::new(self.records.range(range.start_id..=range.end_id).map(|(_, r)| r))
            }
            _ => Box::new(self.records.values()),
        };

        let mut total = 0;
        let mut records = Vec::new();
        for record in candidates.filter(|record| filter.matches(record)) {
            if total >= offset && records.len() < limit {
                records.push(record.clone());
            }
            total += 1;
        }

        debug!(%filter, offset, limit, total, returned = records.len(), "Scanned collection");
        Ok(StorePage { records, total })
    }

    fn count_in_range(&self, range: IdRange) -> StorageResult<usize> {
        if range.start_id > range.end_id {
            return Ok(0);
        }
        Ok(self.records.range(range.start_id..=range.end_id).count())
    }

    fn get(&self, pokemon_id: u32) -> StorageResult<Option<PokemonRecord>> {
        Ok(self.records.get(&pokemon_id).cloned())
    }

    fn distinct_types(&self) -> StorageResult<Vec<PokemonType>> {
        let types: BTreeSet<PokemonType> = self
            .records
            .values()
            .flat_map(|record| record.types.iter().copied())
            .collect();
        Ok(types.into_iter().collect())
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.records.len())
    }
}
