//! Reverse lookup of a position

use crate::context::AppContext;
use crate::output::{print_json, Status};
use anyhow::Result;
use owo_colors::OwoColorize;
use savemate_geo::Coordinate;
use savemate_geocoding::StaticPosition;

pub async fn run(ctx: &AppContext, lat: f64, lng: f64) -> Result<()> {
    let position = StaticPosition::at(Coordinate::new(lat, lng)?);
    let resolver = ctx.resolver()?;
    let location = resolver.resolve_current_position(&position).await?;

    if ctx.format.is_json() {
        return print_json(&location);
    }

    if location.label_is_fallback {
        Status::warning("No place name found for this position");
        println!("{}", location.label);
    } else {
        println!("{}  {}", location.label.bold(), location.coordinate.to_string().dimmed());
    }
    Ok(())
}
