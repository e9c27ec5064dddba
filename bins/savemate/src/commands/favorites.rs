//! Favorite deal management

use crate::context::AppContext;
use crate::output::{print_json, Status};
use anyhow::Result;
use clap::Subcommand;
use savemate_deals::Favorites;

#[derive(Subcommand)]
pub enum FavoritesAction {
    /// Mark a deal as favorite
    Add {
        /// Deal id
        id: String,
    },
    /// Unmark a deal
    Remove {
        /// Deal id
        id: String,
    },
    /// Flip a deal's favorite state
    Toggle {
        /// Deal id
        id: String,
    },
    /// List favorite deal ids
    List,
}

pub fn run(ctx: &AppContext, action: FavoritesAction) -> Result<()> {
    let store = ctx.store()?;
    let favorites = Favorites::new(&store);

    match action {
        FavoritesAction::Add { id } => {
            let added = favorites.add(&id)?;
            report(ctx, &id, true, added, "Added", "already a favorite")
        }
        FavoritesAction::Remove { id } => {
            let removed = favorites.remove(&id)?;
            report(ctx, &id, false, removed, "Removed", "not a favorite")
        }
        FavoritesAction::Toggle { id } => {
            let now_favorite = favorites.toggle(&id)?;
            let verb = if now_favorite { "Added" } else { "Removed" };
            report(ctx, &id, now_favorite, true, verb, "")
        }
        FavoritesAction::List => {
            let ids = favorites.list()?;
            if ctx.format.is_json() {
                return print_json(&ids);
            }
            if ids.is_empty() {
                Status::info("No favorite deals yet");
            }
            for id in ids {
                println!("{id}");
            }
            Ok(())
        }
    }
}

fn report(
    ctx: &AppContext,
    id: &str,
    favorite: bool,
    changed: bool,
    verb: &str,
    unchanged_note: &str,
) -> Result<()> {
    if ctx.format.is_json() {
        return print_json(&serde_json::json!({
            "id": id,
            "favorite": favorite,
            "changed": changed,
        }));
    }
    if changed {
        Status::success(&format!("{verb} {id}"));
    } else {
        Status::info(&format!("{id} is {unchanged_note}"));
    }
    Ok(())
}
