//! Generation classification.
//!
//! Maps Pokemon IDs to generations through a table of contiguous, inclusive ID
//! ranges. The table is built once at startup, either from the built-in
//! definitions or from a RON file, and is never mutated afterwards. Adding a
//! generation means appending an entry to that file.

use crate::errors::{ConfigError, ConfigResult};
use schema::{GenerationDescriptor, IdRange};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::info;

// Built-in table used when no generations file is configured
static DEFAULT_GENERATIONS: LazyLock<GenerationTable> = LazyLock::new(|| {
    GenerationTable {
        entries: builtin_generations(),
    }
});

fn builtin_generations() -> Vec<GenerationDescriptor> {
    #[allow(clippy::too_many_arguments)]
    fn descriptor(
        generation: u32,
        name: &str,
        start_id: u32,
        end_id: u32,
        year: u16,
        games: [&str; 3],
        color: &str,
        description: &str,
        icon: &str,
    ) -> GenerationDescriptor {
        GenerationDescriptor {
            generation,
            name: name.to_string(),
            region: name.to_string(),
            start_id,
            end_id,
            year,
            games: games.iter().map(|game| game.to_string()).collect(),
            color: color.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
        }
    }

    vec![
        descriptor(
            1,
            "Kanto",
            1,
            151,
            1996,
            ["Red", "Blue", "Yellow"],
            "#ff6b6b",
            "The original Pokemon region where it all began",
            "kanto-icon.png",
        ),
        descriptor(
            2,
            "Johto",
            152,
            251,
            1999,
            ["Gold", "Silver", "Crystal"],
            "#4ecdc4",
            "The second region, home to new Pokemon and the Johto League",
            "johto-icon.png",
        ),
        descriptor(
            3,
            "Hoenn",
            252,
            386,
            2002,
            ["Ruby", "Sapphire", "Emerald"],
            "#45b7d1",
            "A tropical region with diverse landscapes and weather",
            "hoenn-icon.png",
        ),
    ]
}

/// An immutable, validated set of generation descriptors, kept in ascending
/// generation-number order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTable {
    entries: Vec<GenerationDescriptor>,
}

impl Default for GenerationTable {
    fn default() -> Self {
        DEFAULT_GENERATIONS.clone()
    }
}

impl GenerationTable {
    /// Builds a table, rejecting inverted ranges, repeated generation numbers
    /// and overlapping ranges.
    pub fn new(mut entries: Vec<GenerationDescriptor>) -> ConfigResult<Self> {
        for entry in &entries {
            if entry.start_id > entry.end_id {
                return Err(ConfigError::InvalidRange {
                    generation: entry.generation,
                    start_id: entry.start_id,
                    end_id: entry.end_id,
                });
            }
        }

        entries.sort_by_key(|entry| entry.generation);

        for pair in entries.windows(2) {
            if pair[0].generation == pair[1].generation {
                return Err(ConfigError::DuplicateGeneration(pair[0].generation));
            }
        }

        for (i, first) in entries.iter().enumerate() {
            for second in &entries[i + 1..] {
                if first.range().overlaps(&second.range()) {
                    return Err(ConfigError::OverlappingRanges {
                        first: first.generation,
                        second: second.generation,
                    });
                }
            }
        }

        Ok(Self { entries })
    }

    /// Loads a table from a RON file containing a list of descriptors.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<GenerationDescriptor> =
            ron::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let table = Self::new(entries)?;
        info!(
            path = %path.display(),
            generations = table.len(),
            "Loaded generation table"
        );
        Ok(table)
    }

    /// The generation whose range contains `pokemon_id`, or `None` for IDs
    /// beyond every configured generation.
    pub fn generation_for_id(&self, pokemon_id: u32) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.contains(pokemon_id))
            .map(|entry| entry.generation)
    }

    pub fn range_for_generation(&self, generation: u32) -> Option<IdRange> {
        self.get(generation).map(GenerationDescriptor::range)
    }

    pub fn get(&self, generation: u32) -> Option<&GenerationDescriptor> {
        self.entries
            .binary_search_by_key(&generation, |entry| entry.generation)
            .ok()
            .map(|index| &self.entries[index])
    }

    /// Case-insensitive lookup by generation name (e.g. "kanto").
    pub fn by_name(&self, name: &str) -> Option<u32> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.generation)
    }

    /// Case-insensitive lookup by region name.
    pub fn by_region(&self, region: &str) -> Option<u32> {
        let region = region.trim();
        self.entries
            .iter()
            .find(|entry| entry.region.eq_ignore_ascii_case(region))
            .map(|entry| entry.generation)
    }

    pub fn contains(&self, generation: u32) -> bool {
        self.get(generation).is_some()
    }

    /// Descriptors in ascending generation order.
    pub fn iter(&self) -> impl Iterator<Item = &GenerationDescriptor> {
        self.entries.iter()
    }

    pub fn generation_numbers(&self) -> Vec<u32> {
        self.entries.iter().map(|entry| entry.generation).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of Pokemon the configured ranges cover.
    pub fn total_span(&self) -> u32 {
        self.entries.iter().map(GenerationDescriptor::span).sum()
    }

    pub fn next_generation_number(&self) -> u32 {
        self.entries
            .last()
            .map(|entry| entry.generation + 1)
            .unwrap_or(1)
    }

    /// Returns a new table with `descriptor` appended; existing ranges are
    /// left untouched.
    pub fn with_generation(&self, descriptor: GenerationDescriptor) -> ConfigResult<Self> {
        let mut entries = self.entries.clone();
        entries.push(descriptor);
        Self::new(entries)
    }
}
