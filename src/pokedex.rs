//! The query service: a record store paired with a generation table.

use crate::errors::{PokedexError, PokedexResult};
use crate::generations::GenerationTable;
use crate::query::{
    CompiledQuery, FilterRequest, PaginationInfo, QueryLimits, QueryResult, RawFilterParams,
};
use crate::store::PokemonStore;
use schema::{GenerationDescriptor, PokemonRecord, PokemonType};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// A generation plus the number of its Pokemon currently in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    #[serde(flatten)]
    pub descriptor: GenerationDescriptor,
    /// Span of the generation's ID range.
    pub pokemon_count: u32,
    /// Records actually present, counted at call time.
    pub seeded_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationOverview {
    pub generations: Vec<GenerationSummary>,
    pub total_generations: usize,
    pub total_pokemon: u32,
    pub total_seeded: usize,
    pub available_generations: Vec<u32>,
}

/// Read-only query service. Cheap to clone and safe to share across threads;
/// nothing it holds is mutated after construction.
#[derive(Clone)]
pub struct Pokedex {
    store: Arc<dyn PokemonStore>,
    generations: Arc<GenerationTable>,
    limits: QueryLimits,
}

impl fmt::Debug for Pokedex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pokedex")
            .field("generations", &self.generations.generation_numbers())
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl Pokedex {
    pub fn new(store: Arc<dyn PokemonStore>, generations: GenerationTable) -> Self {
        Self {
            store,
            generations: Arc::new(generations),
            limits: QueryLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: QueryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn generations(&self) -> &GenerationTable {
        &self.generations
    }

    pub fn limits(&self) -> QueryLimits {
        self.limits
    }

    /// Runs a filter request. Malformed pagination is the only failure a
    /// caller can cause; filters that match nothing return an empty page.
    pub fn query(&self, request: &FilterRequest) -> PokedexResult<QueryResult> {
        let compiled = request
            .compile(&self.generations, self.limits)
            .inspect_err(|e| warn!(error = %e, "Rejected filter request"))?;
        self.execute(compiled)
    }

    /// Runs a query given as raw string parameters.
    pub fn query_params(&self, params: RawFilterParams) -> PokedexResult<QueryResult> {
        let compiled = params
            .into_request(self.limits)
            .and_then(|raw| raw.compile(&self.generations, self.limits))
            .inspect_err(|e| warn!(error = %e, "Rejected filter request"))?;
        self.execute(compiled)
    }

    fn execute(&self, compiled: CompiledQuery) -> PokedexResult<QueryResult> {
        let CompiledQuery { filter, window } = compiled;
        let page = self
            .store
            .find(&filter, window.offset(), window.limit())?;

        debug!(
            %filter,
            page = window.page,
            per_page = window.per_page,
            total = page.total,
            "Query executed"
        );

        Ok(QueryResult {
            pagination: PaginationInfo::new(window, page.total),
            total_count: page.total,
            results: page.records,
        })
    }

    /// All generations in ascending order, each with a live record count.
    pub fn list_generations(&self) -> PokedexResult<Vec<GenerationSummary>> {
        self.generations
            .iter()
            .map(|descriptor| {
                let seeded_count = self.store.count_in_range(descriptor.range())?;
                Ok(GenerationSummary {
                    pokemon_count: descriptor.span(),
                    seeded_count,
                    descriptor: descriptor.clone(),
                })
            })
            .collect()
    }

    pub fn generation_summary(&self) -> PokedexResult<GenerationOverview> {
        let generations = self.list_generations()?;
        Ok(GenerationOverview {
            total_generations: generations.len(),
            total_pokemon: self.generations.total_span(),
            total_seeded: generations.iter().map(|g| g.seeded_count).sum(),
            available_generations: self.generations.generation_numbers(),
            generations,
        })
    }

    pub fn get_pokemon(&self, pokemon_id: u32) -> PokedexResult<Option<PokemonRecord>> {
        Ok(self.store.get(pokemon_id)?)
    }

    /// Looks a Pokemon up by exact (case-insensitive) name.
    pub fn find_by_name(&self, name: &str) -> PokedexResult<Option<PokemonRecord>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let request = FilterRequest::new()
            .search(name)
            .per_page(i64::from(self.limits.max_per_page));
        let mut page = 1;
        loop {
            let result = self.query(&request.clone().page(page))?;
            if let Some(record) = result
                .results
                .iter()
                .find(|record| record.name.eq_ignore_ascii_case(name))
            {
                return Ok(Some(record.clone()));
            }
            if !result.pagination.has_next {
                return Ok(None);
            }
            page += 1;
        }
    }

    pub fn list_types(&self) -> PokedexResult<Vec<PokemonType>> {
        Ok(self.store.distinct_types()?)
    }

    pub fn generation_of(&self, pokemon_id: u32) -> Option<&GenerationDescriptor> {
        self.generations
            .generation_for_id(pokemon_id)
            .and_then(|generation| self.generations.get(generation))
    }

    pub fn collection_size(&self) -> PokedexResult<usize> {
        self.store.len().map_err(PokedexError::from)
    }
}
