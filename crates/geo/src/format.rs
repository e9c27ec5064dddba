//! Distance labels for deal cards and map popups.

/// Render a distance for display.
///
/// Below 1 km the value is shown in whole meters, below 10 km with one
/// decimal, otherwise in whole kilometers.
///
/// ```
/// use savemate_geo::format_distance;
///
/// assert_eq!(format_distance(0.35), "350 m");
/// assert_eq!(format_distance(2.44), "2.4 km");
/// assert_eq!(format_distance(252.3), "252 km");
/// ```
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else if km < 10.0 {
        format!("{km:.1} km")
    } else {
        format!("{km:.0} km")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meters() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(0.0994), "99 m");
    }

    #[test]
    fn test_kilometers() {
        assert_eq!(format_distance(1.0), "1.0 km");
        assert_eq!(format_distance(9.94), "9.9 km");
        assert_eq!(format_distance(10.0), "10 km");
        assert_eq!(format_distance(1234.6), "1235 km");
    }
}
