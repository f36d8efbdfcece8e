//! Text rendering and command handling shared by the CLI and the MCP server.
//!
//! Every handler returns display text; failures a caller can fix are
//! rendered as messages rather than returned as errors.

use crate::pokedex::{GenerationOverview, GenerationSummary, Pokedex};
use crate::query::{QueryResult, RawFilterParams};
use schema::{PokemonRecord, PokemonType, STAT_NAMES};

/// One line per record: `#001 Bulbasaur [grass/poison]`.
pub fn format_record_line(record: &PokemonRecord) -> String {
    format!(
        "#{:03} {} [{}]",
        record.pokemon_id,
        display_name(&record.name),
        type_list(&record.types)
    )
}

/// Full details for a single record.
pub fn format_record_details(record: &PokemonRecord, pokedex: &Pokedex) -> String {
    const LABEL_WIDTH: usize = 16;

    let mut output = format!("{} (#{:03})\n", display_name(&record.name), record.pokemon_id);
    output.push_str("--------------------\n");
    output.push_str(&format!(
        "Type(s): {}\n",
        type_list(&record.types).replace('/', " / ")
    ));
    match pokedex.generation_of(record.pokemon_id) {
        Some(generation) => output.push_str(&format!(
            "Generation: {} ({}, {})\n",
            generation.generation, generation.name, generation.year
        )),
        None => output.push_str("Generation: unknown\n"),
    }
    output.push_str(&format!(
        "Height: {:.1} m   Weight: {:.1} kg\n",
        record.height_m(),
        record.weight_kg()
    ));
    if !record.abilities.is_empty() {
        output.push_str(&format!("Abilities: {}\n", record.abilities.join(", ")));
    }
    output.push_str("--------------------\n");
    output.push_str("Base Stats:\n");
    for name in STAT_NAMES {
        output.push_str(&format!("{:<LABEL_WIDTH$} : {}\n", name, record.stat(name)));
    }
    output.push_str(&format!("{:<LABEL_WIDTH$} : {}\n", "total", record.stat_total()));
    output.push_str(&format!("Sprite: {}", record.sprite_url()));
    output
}

pub fn format_query_result(result: &QueryResult) -> String {
    if result.results.is_empty() {
        return if result.total_count == 0 {
            "No Pokemon matched those filters.".to_string()
        } else {
            format!(
                "Page {} is past the end of the results ({} matches over {} pages).",
                result.pagination.page, result.total_count, result.pagination.pages
            )
        };
    }

    let mut output = format!(
        "Found {} Pokemon (page {} of {}, {} per page):\n",
        result.total_count,
        result.pagination.page,
        result.pagination.pages,
        result.pagination.per_page
    );
    for record in &result.results {
        output.push_str("  ");
        output.push_str(&format_record_line(record));
        output.push('\n');
    }
    if result.pagination.has_next {
        output.push_str(&format!("More results on page {}.\n", result.pagination.page + 1));
    }
    output
}

pub fn format_generation_line(summary: &GenerationSummary) -> String {
    let descriptor = &summary.descriptor;
    format!(
        "Gen {} - {} ({}) #{:03}-#{:03}, {}/{} seeded, {}",
        descriptor.generation,
        descriptor.name,
        descriptor.year,
        descriptor.start_id,
        descriptor.end_id,
        summary.seeded_count,
        summary.pokemon_count,
        descriptor.games.join("/")
    )
}

pub fn format_generation_overview(overview: &GenerationOverview) -> String {
    let mut output = String::from("Generations:\n");
    for summary in &overview.generations {
        output.push_str("  ");
        output.push_str(&format_generation_line(summary));
        output.push('\n');
    }
    output.push_str(&format!(
        "{} generations, {} Pokemon defined, {} seeded\n",
        overview.total_generations, overview.total_pokemon, overview.total_seeded
    ));
    output
}

pub fn format_types(types: &[PokemonType]) -> String {
    if types.is_empty() {
        return "No types present in the collection.".to_string();
    }
    format!("Available types: {}", type_list(types).replace('/', ", "))
}

/// Runs a search from raw parameters and renders the outcome.
pub fn handle_search_command(pokedex: &Pokedex, params: RawFilterParams) -> String {
    match pokedex.query_params(params) {
        Ok(result) => format_query_result(&result),
        Err(e) if e.is_client_error() => format!("Invalid search: {}", e),
        Err(e) => format!("Search failed: {}", e),
    }
}

/// Looks a Pokemon up by ID or by exact name.
pub fn handle_lookup_pokemon_command(pokedex: &Pokedex, target: &str) -> String {
    let target = target.trim().trim_start_matches('#');
    if target.is_empty() {
        return "Which Pokemon do you want to look up? (e.g., '25' or 'pikachu')".to_string();
    }

    let lookup = match target.parse::<u32>() {
        Ok(pokemon_id) => pokedex.get_pokemon(pokemon_id),
        Err(_) => pokedex.find_by_name(target),
    };

    match lookup {
        Ok(Some(record)) => format!("--- Pokemon Details ---\n{}", format_record_details(&record, pokedex)),
        Ok(None) => format!("The Pokemon '{}' was not found.", target),
        Err(e) => format!("Lookup failed: {}", e),
    }
}

pub fn handle_generations_command(pokedex: &Pokedex) -> String {
    match pokedex.generation_summary() {
        Ok(overview) => format_generation_overview(&overview),
        Err(e) => format!("Could not list generations: {}", e),
    }
}

pub fn handle_types_command(pokedex: &Pokedex) -> String {
    match pokedex.list_types() {
        Ok(types) => format_types(&types),
        Err(e) => format!("Could not list types: {}", e),
    }
}

fn display_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}

fn type_list(types: &[PokemonType]) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::common::{sample_pokedex, RecordBuilder};

    #[test]
    fn record_line_shows_all_types() {
        let record = RecordBuilder::new(1, "bulbasaur")
            .types(&[PokemonType::Grass, PokemonType::Poison])
            .build();
        assert_eq!(format_record_line(&record), "#001 Bulbasaur [grass/poison]");
    }

    #[test]
    fn hyphenated_names_are_capitalised_per_part() {
        assert_eq!(display_name("mr-mime"), "Mr-Mime");
        assert_eq!(display_name("porygon-z"), "Porygon-Z");
    }

    #[test]
    fn search_command_reports_invalid_pagination() {
        let pokedex = sample_pokedex();
        let text = handle_search_command(
            &pokedex,
            RawFilterParams {
                page: Some("0".to_string()),
                ..Default::default()
            },
        );
        assert!(text.starts_with("Invalid search:"), "{}", text);
    }

    #[test]
    fn search_command_distinguishes_empty_from_past_the_end() {
        let pokedex = sample_pokedex();
        let none = handle_search_command(
            &pokedex,
            RawFilterParams {
                search: Some("xyz".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(none, "No Pokemon matched those filters.");

        let past_end = handle_search_command(
            &pokedex,
            RawFilterParams {
                page: Some("50".to_string()),
                ..Default::default()
            },
        );
        assert!(past_end.starts_with("Page 50 is past the end"), "{}", past_end);
    }

    #[test]
    fn lookup_by_id_and_name() {
        let pokedex = sample_pokedex();
        let by_id = handle_lookup_pokemon_command(&pokedex, "#4");
        assert!(by_id.contains("Charmander (#004)"), "{}", by_id);
        assert!(by_id.contains("Generation: 1 (Kanto, 1996)"), "{}", by_id);

        let by_name = handle_lookup_pokemon_command(&pokedex, "Squirtle");
        assert!(by_name.contains("Squirtle (#007)"), "{}", by_name);

        let missing = handle_lookup_pokemon_command(&pokedex, "missingno");
        assert_eq!(missing, "The Pokemon 'missingno' was not found.");
    }

    #[test]
    fn record_details_list_every_stat_and_the_sprite() {
        let pokedex = sample_pokedex();
        let record = RecordBuilder::new(1, "bulbasaur")
            .types(&[PokemonType::Grass, PokemonType::Poison])
            .ability("overgrow")
            .build();
        let text = format_record_details(&record, &pokedex);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Bulbasaur (#001)");
        assert_eq!(lines[2], "Type(s): grass / poison");
        assert!(lines.contains(&"Abilities: overgrow"), "{}", text);
        assert!(lines.contains(&"special-attack   : 50"), "{}", text);
        assert!(lines.contains(&"total            : 300"), "{}", text);
        assert_eq!(
            lines.last().copied(),
            Some("Sprite: https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/1.png")
        );
    }

    #[test]
    fn record_details_for_unclassified_ids() {
        let record = RecordBuilder::new(999, "mystery").build();
        let text = format_record_details(&record, &sample_pokedex());
        assert!(text.contains("Generation: unknown"), "{}", text);
        assert!(!text.contains("Abilities:"), "{}", text);
    }

    #[test]
    fn generations_command_lists_live_counts() {
        let text = handle_generations_command(&sample_pokedex());
        assert!(text.contains("Gen 1 - Kanto (1996) #001-#151, 9/151 seeded"), "{}", text);
        assert!(text.contains("3 generations, 386 Pokemon defined, 11 seeded"), "{}", text);
    }
}
