//! Pokedex MCP Server
//!
//! A Model Context Protocol server using the Rust SDK (rmcp) that exposes
//! Pokedex search and generation lookups as tools over stdio.

use std::future::Future;

use clap::Parser;
use pokedex::config::{init_logging, PokedexConfig};
use pokedex::mcp_interface::*;
use pokedex::query::text_or_number;
use pokedex::{Pokedex, RawFilterParams};
use rmcp::{
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::io::{stdin, stdout};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "pokedex-mcp")]
#[command(about = "Pokedex MCP server (stdio transport)")]
struct Cli {
    #[command(flatten)]
    config: PokedexConfig,
}

#[derive(Debug, Clone)]
pub struct PokedexService {
    tool_router: ToolRouter<PokedexService>,
    pokedex: Pokedex,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchPokemonRequest {
    #[schemars(description = "Case-insensitive name fragment, e.g. 'char'")]
    pub search: Option<String>,
    #[schemars(description = "Type to filter by, e.g. 'poison', or 'all'")]
    #[serde(rename = "type")]
    pub type_filter: Option<String>,
    #[schemars(description = "Generation number, e.g. 1 for Kanto", with = "Option<i64>")]
    #[serde(default, deserialize_with = "text_or_number")]
    pub generation: Option<String>,
    #[schemars(description = "Page number, starting at 1", with = "Option<i64>")]
    #[serde(default, deserialize_with = "text_or_number")]
    pub page: Option<String>,
    #[schemars(description = "Results per page (at most 100)", with = "Option<i64>")]
    #[serde(default, deserialize_with = "text_or_number")]
    pub per_page: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupPokemonRequest {
    #[schemars(description = "Pokemon ID or exact name, e.g. '25' or 'pikachu'")]
    pub target: String,
}

#[tool_router]
impl PokedexService {
    pub fn new(pokedex: Pokedex) -> Self {
        Self {
            tool_router: Self::tool_router(),
            pokedex,
        }
    }

    #[tool(description = "Search Pokemon by name, type and generation, one page at a time")]
    async fn search_pokemon(
        &self,
        Parameters(request): Parameters<SearchPokemonRequest>,
    ) -> Result<CallToolResult, McpError> {
        let params = RawFilterParams {
            search: request.search,
            type_filter: request.type_filter,
            generation: request.generation,
            page: request.page,
            per_page: request.per_page,
        };
        match self.pokedex.query_params(params) {
            Ok(result) => Ok(CallToolResult::success(vec![Content::text(
                format_query_result(&result),
            )])),
            Err(e) if e.is_client_error() => Err(McpError::invalid_params(e.to_string(), None)),
            Err(e) => Err(McpError::internal_error(e.to_string(), None)),
        }
    }

    #[tool(description = "List Pokemon generations with their ID ranges and seeded counts")]
    async fn list_generations(&self) -> Result<CallToolResult, McpError> {
        let text = handle_generations_command(&self.pokedex);
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Look up detailed information about a single Pokemon")]
    async fn lookup_pokemon(
        &self,
        Parameters(request): Parameters<LookupPokemonRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = handle_lookup_pokemon_command(&self.pokedex, &request.target);
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "List the Pokemon types present in the collection")]
    async fn list_types(&self) -> Result<CallToolResult, McpError> {
        let text = handle_types_command(&self.pokedex);
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

#[tool_handler]
impl ServerHandler for PokedexService {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.config.log_level);

    if let Err(errors) = cli.config.validate() {
        for error in &errors {
            error!(%error, "Configuration error");
        }
        std::process::exit(1);
    }

    let pokedex = cli.config.build_pokedex()?;
    info!(
        records = pokedex.collection_size()?,
        generations = pokedex.generations().len(),
        "Pokedex MCP server starting"
    );

    let service = PokedexService::new(pokedex);
    let transport = (stdin(), stdout());

    let server = service.serve(transport).await?;
    info!("Server running, waiting for shutdown");
    let quit_reason = server.waiting().await?;

    info!(?quit_reason, "Pokedex MCP server exiting");
    Ok(())
}
