//! Location suggestions for typed text

use crate::context::AppContext;
use crate::output::{print_json, Status};
use anyhow::Result;
use owo_colors::OwoColorize;
use savemate_geocoding::SearchStatus;

pub async fn run(ctx: &AppContext, query: &str) -> Result<()> {
    let resolver = ctx.resolver()?;
    let id = resolver.search(query);
    let state = resolver.settled(id).await;

    if ctx.format.is_json() {
        return print_json(&state);
    }

    match state.status {
        SearchStatus::Degraded => {
            Status::warning("Location search is unavailable right now");
            return Ok(());
        }
        _ if state.query.chars().count() < resolver.config().min_query_chars => {
            Status::info(&format!(
                "Type at least {} characters to search",
                resolver.config().min_query_chars
            ));
            return Ok(());
        }
        _ => {}
    }

    if state.suggestions.is_empty() {
        Status::info(&format!("No places match '{}'", state.query));
        return Ok(());
    }

    for (i, suggestion) in state.suggestions.iter().enumerate() {
        println!(
            "{:>2}. {}  {}",
            i + 1,
            suggestion.label,
            suggestion.coordinate.to_string().dimmed()
        );
    }
    Ok(())
}
