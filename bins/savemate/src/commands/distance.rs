//! Distance between two points

use crate::context::AppContext;
use crate::output::print_json;
use anyhow::Result;
use owo_colors::OwoColorize;
use savemate_geo::{format_distance, haversine_distance, Coordinate};

pub fn run(ctx: &AppContext, from: (f64, f64), to: (f64, f64)) -> Result<()> {
    let from = Coordinate::try_from(from)?;
    let to = Coordinate::try_from(to)?;
    let km = haversine_distance(&from, &to);

    if ctx.format.is_json() {
        return print_json(&serde_json::json!({
            "from": from,
            "to": to,
            "distance_km": km,
            "label": format_distance(km),
        }));
    }

    println!(
        "{} {} {}  {}",
        from.to_string().dimmed(),
        "→".dimmed(),
        to.to_string().dimmed(),
        format_distance(km).bold()
    );
    Ok(())
}
