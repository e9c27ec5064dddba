//! Deals near a point

use crate::context::AppContext;
use crate::output::{print_json, Status};
use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use savemate_deals::{load_deals, Deal, NearbyQuery};
use savemate_geo::{format_distance, Coordinate};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Where to search from
pub enum Origin {
    /// Explicit coordinates
    Point(f64, f64),
    /// Free text resolved through the geocoder
    Place(String),
    /// No origin; every deal is listed
    Anywhere,
}

/// How far from the origin to look
pub enum Radius {
    /// `search.default_radius_km`
    Default,
    /// Explicit radius in kilometers
    Km(f64),
    /// No cut; every located deal is annotated
    Unbounded,
}

#[derive(Serialize)]
struct NearbyEntry<'a> {
    #[serde(flatten)]
    deal: &'a Deal,
    distance_km: Option<f64>,
    discount_percent: Option<u32>,
}

pub async fn run(
    ctx: &AppContext,
    deals_path: &Path,
    origin: Origin,
    radius: Radius,
    no_sort: bool,
) -> Result<()> {
    let deals = load_deals(deals_path)?;

    let (origin, origin_label) = match origin {
        Origin::Point(lat, lng) => {
            let point = Coordinate::new(lat, lng)?;
            (Some(point), point.to_string())
        }
        Origin::Place(text) => {
            let resolver = ctx.resolver()?;
            let Some(best) = resolver.resolve_query(&text).await? else {
                bail!("No location found for '{}'", text);
            };
            info!(place = %best.label, coordinate = %best.coordinate, "Resolved search origin");
            (Some(best.coordinate), best.label)
        }
        Origin::Anywhere => (None, String::new()),
    };

    let search = &ctx.config.schema.search;
    let query = NearbyQuery {
        origin,
        radius_km: match radius {
            Radius::Default => Some(search.default_radius_km),
            Radius::Km(km) => Some(km),
            Radius::Unbounded => None,
        },
        sort_by_distance: search.sort_by_distance && !no_sort,
    };
    let results = query.run(&deals);

    if ctx.format.is_json() {
        let entries: Vec<NearbyEntry<'_>> = results
            .iter()
            .map(|r| NearbyEntry {
                deal: r.entity,
                distance_km: r.distance_km,
                discount_percent: r.entity.discount_percent(),
            })
            .collect();
        return print_json(&entries);
    }

    match (query.origin, query.radius_km) {
        (Some(_), Some(radius)) => Status::header(&format!(
            "{} of {} deals within {} of {}",
            results.len(),
            deals.len(),
            format_distance(radius),
            origin_label
        )),
        (Some(_), None) => Status::header(&format!(
            "{} deals by distance from {}",
            results.len(),
            origin_label
        )),
        _ => Status::header(&format!("{} deals", results.len())),
    }

    if results.is_empty() {
        Status::info("No deals in range; try a larger --radius");
        return Ok(());
    }

    for result in &results {
        let deal = result.entity;
        let distance = result
            .distance_km
            .map_or_else(|| "-".to_string(), format_distance);
        let badge = deal
            .discount_percent()
            .map(|p| format!(" -{p}%"))
            .unwrap_or_default();
        let business = deal
            .business_name
            .as_deref()
            .map(|b| format!(" ({b})"))
            .unwrap_or_default();

        println!(
            "  {:>8}  {}{}{}",
            distance.cyan(),
            deal.title,
            business.dimmed(),
            badge.green().bold()
        );
    }
    Ok(())
}
