//! Radius filtering of located records.
//!
//! This is the engine behind the deals map and the "near me" list: annotate
//! every locatable record with its distance from the user, keep the ones
//! inside the radius, and optionally order them nearest-first.

use crate::{haversine_distance, Coordinate};
use serde::Serialize;
use std::cmp::Ordering;

/// A record that may carry a geographic position.
pub trait Located {
    /// The record's coordinate, or `None` when it cannot be placed on a map.
    fn coordinate(&self) -> Option<Coordinate>;
}

impl Located for Coordinate {
    fn coordinate(&self) -> Option<Coordinate> {
        Some(*self)
    }
}

impl<T: Located> Located for &T {
    fn coordinate(&self) -> Option<Coordinate> {
        (**self).coordinate()
    }
}

/// A record that survived filtering, with its distance from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterResult<'a, T> {
    /// The filtered record
    pub entity: &'a T,
    /// Distance in kilometers, `None` when no origin was given
    pub distance_km: Option<f64>,
}

/// Filter records by distance from an optional origin.
///
/// - Records without a coordinate are always excluded.
/// - Without an origin every located record passes, in input order, with
///   `distance_km = None`.
/// - With an origin and a radius a record is kept iff its distance is
///   `<= radius_km`.
/// - With an origin and no radius every located record is kept and annotated.
///
/// The output keeps input order; see [`sort_by_distance`].
///
/// # Example
/// ```
/// use savemate_geo::{filter_by_radius, Coordinate};
///
/// let warsaw = Coordinate::new(52.2297, 21.0122).unwrap();
/// let places = vec![
///     Coordinate::new(52.2297, 21.0122).unwrap(),
///     Coordinate::new(50.0647, 19.9450).unwrap(), // Krakow
/// ];
///
/// let nearby = filter_by_radius(&places, Some(&warsaw), Some(5.0));
/// assert_eq!(nearby.len(), 1);
/// assert_eq!(nearby[0].distance_km, Some(0.0));
/// ```
pub fn filter_by_radius<'a, T>(
    entities: &'a [T],
    origin: Option<&Coordinate>,
    radius_km: Option<f64>,
) -> Vec<FilterResult<'a, T>>
where
    T: Located + Sync,
{
    let Some(origin) = origin else {
        return entities
            .iter()
            .filter(|entity| entity.coordinate().is_some())
            .map(|entity| FilterResult { entity, distance_km: None })
            .collect();
    };

    let annotate = |entity: &'a T| -> Option<FilterResult<'a, T>> {
        let distance = haversine_distance(origin, &entity.coordinate()?);
        radius_km
            .map_or(true, |radius| distance <= radius)
            .then_some(FilterResult { entity, distance_km: Some(distance) })
    };

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        entities.par_iter().filter_map(annotate).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        entities.iter().filter_map(annotate).collect()
    }
}

/// Order results nearest-first.
///
/// Results without a distance go last. The sort is stable, so ties and
/// unannotated results keep their relative order.
pub fn sort_by_distance<T>(results: &mut [FilterResult<'_, T>]) {
    results.sort_by(|a, b| compare_distance(a.distance_km, b.distance_km));
}

/// [`filter_by_radius`] followed by [`sort_by_distance`].
pub fn filter_by_radius_sorted<'a, T>(
    entities: &'a [T],
    origin: Option<&Coordinate>,
    radius_km: Option<f64>,
) -> Vec<FilterResult<'a, T>>
where
    T: Located + Sync,
{
    let mut results = filter_by_radius(entities, origin, radius_km);
    sort_by_distance(&mut results);
    results
}

fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, PartialEq)]
    struct Place {
        name: &'static str,
        lat: Option<f64>,
        lng: Option<f64>,
    }

    impl Located for Place {
        fn coordinate(&self) -> Option<Coordinate> {
            Coordinate::from_parts(self.lat, self.lng)
        }
    }

    fn place(name: &'static str, lat: f64, lng: f64) -> Place {
        Place { name, lat: Some(lat), lng: Some(lng) }
    }

    fn warsaw() -> Coordinate {
        Coordinate::new(52.2297, 21.0122).unwrap()
    }

    fn create_test_places() -> Vec<Place> {
        vec![
            place("krakow", 50.0647, 19.9450),
            Place { name: "nowhere", lat: None, lng: Some(21.0) },
            place("warsaw", 52.2297, 21.0122),
            Place { name: "half", lat: Some(52.0), lng: None },
            place("lodz", 51.7592, 19.4560),
        ]
    }

    fn names<T>(results: &[FilterResult<'_, T>], name: impl Fn(&T) -> &'static str) -> Vec<&'static str> {
        results.iter().map(|r| name(r.entity)).collect()
    }

    #[test]
    fn test_no_origin_passes_located_in_order() {
        let places = create_test_places();
        let results = filter_by_radius(&places, None, Some(1.0));

        assert_eq!(names(&results, |p| p.name), vec!["krakow", "warsaw", "lodz"]);
        assert!(results.iter().all(|r| r.distance_km.is_none()));
    }

    #[test]
    fn test_warsaw_fixture() {
        let places = create_test_places();

        let near = filter_by_radius(&places, Some(&warsaw()), Some(5.0));
        assert_eq!(names(&near, |p| p.name), vec!["warsaw"]);
        assert_eq!(near[0].distance_km, Some(0.0));

        let wide = filter_by_radius(&places, Some(&warsaw()), Some(300.0));
        assert_eq!(names(&wide, |p| p.name), vec!["krakow", "warsaw", "lodz"]);
        let krakow = wide[0].distance_km.unwrap();
        assert!((krakow - 252.0).abs() < 2.0, "Krakow: {}", krakow);
    }

    #[test]
    fn test_origin_without_radius_annotates_all() {
        let places = create_test_places();
        let results = filter_by_radius(&places, Some(&warsaw()), None);

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.distance_km.is_some()));
    }

    #[test]
    fn test_zero_radius_keeps_coincident_only() {
        let places = create_test_places();
        let results = filter_by_radius(&places, Some(&warsaw()), Some(0.0));
        assert_eq!(names(&results, |p| p.name), vec!["warsaw"]);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let places = create_test_places();
        let exact = haversine_distance(&warsaw(), &places[0].coordinate().unwrap());

        let results = filter_by_radius(&places[..1], Some(&warsaw()), Some(exact));
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_nan_or_negative_radius_keeps_nothing() {
        let places = create_test_places();
        assert!(filter_by_radius(&places, Some(&warsaw()), Some(f64::NAN)).is_empty());
        assert!(filter_by_radius(&places, Some(&warsaw()), Some(-1.0)).is_empty());
    }

    #[test]
    fn test_sorted_nearest_first() {
        let places = create_test_places();
        let results = filter_by_radius_sorted(&places, Some(&warsaw()), None);

        assert_eq!(names(&results, |p| p.name), vec!["warsaw", "lodz", "krakow"]);
    }

    #[test]
    fn test_sort_puts_unannotated_last_and_is_stable() {
        let a = place("a", 0.0, 0.0);
        let b = place("b", 0.0, 0.0);
        let c = place("c", 0.0, 0.0);
        let d = place("d", 0.0, 0.0);
        let mut results = vec![
            FilterResult { entity: &a, distance_km: None },
            FilterResult { entity: &b, distance_km: Some(3.0) },
            FilterResult { entity: &c, distance_km: None },
            FilterResult { entity: &d, distance_km: Some(3.0) },
        ];

        sort_by_distance(&mut results);
        assert_eq!(names(&results, |p| p.name), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_empty_input() {
        let places: Vec<Place> = Vec::new();
        assert!(filter_by_radius(&places, Some(&warsaw()), Some(10.0)).is_empty());
    }

    proptest! {
        #[test]
        fn prop_radius_subset_is_exact(
            points in prop::collection::vec((-90.0f64..=90.0, -180.0f64..=180.0), 0..40),
            radius in 0.0f64..20_000.0,
        ) {
            let coords: Vec<Coordinate> = points
                .iter()
                .map(|&(lat, lng)| Coordinate::new(lat, lng).unwrap())
                .collect();
            let origin = warsaw();

            let kept = filter_by_radius(&coords, Some(&origin), Some(radius));
            let expected: Vec<&Coordinate> = coords
                .iter()
                .filter(|c| haversine_distance(&origin, c) <= radius)
                .collect();

            prop_assert_eq!(kept.len(), expected.len());
            for (result, want) in kept.iter().zip(expected) {
                prop_assert_eq!(result.entity, want);
                prop_assert!(result.distance_km.unwrap() <= radius);
            }
        }
    }
}
