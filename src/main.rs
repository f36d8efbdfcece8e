//! Pokedex command-line interface.

use clap::{Parser, Subcommand};
use pokedex::config::{init_logging, PokedexConfig};
use pokedex::mcp_interface::{
    handle_generations_command, handle_lookup_pokemon_command, handle_search_command,
    handle_types_command,
};
use pokedex::RawFilterParams;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "pokedex")]
#[command(about = "Search the Pokedex by name, type and generation")]
struct Cli {
    #[command(flatten)]
    config: PokedexConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search with any combination of filters.
    Query {
        /// Case-insensitive name fragment.
        #[arg(long)]
        search: Option<String>,
        /// Type name, or "all".
        #[arg(long = "type")]
        type_filter: Option<String>,
        /// Generation number.
        #[arg(long)]
        generation: Option<String>,
        #[arg(long)]
        page: Option<String>,
        #[arg(long)]
        per_page: Option<String>,
    },
    /// List generations with live record counts.
    Generations,
    /// Show one Pokemon by ID or name.
    Show { target: String },
    /// List the types present in the collection.
    Types,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.config.log_level);

    if let Err(errors) = cli.config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let pokedex = cli.config.build_pokedex()?;
    info!(
        records = pokedex.collection_size()?,
        generations = pokedex.generations().len(),
        "Pokedex ready"
    );

    let output = match cli.command {
        Command::Query {
            search,
            type_filter,
            generation,
            page,
            per_page,
        } => handle_search_command(
            &pokedex,
            RawFilterParams {
                search,
                type_filter,
                generation,
                page,
                per_page,
            },
        ),
        Command::Generations => handle_generations_command(&pokedex),
        Command::Show { target } => handle_lookup_pokemon_command(&pokedex, &target),
        Command::Types => handle_types_command(&pokedex),
    };

    println!("{}", output.trim_end());
    Ok(())
}
