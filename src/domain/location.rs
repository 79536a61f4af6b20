// Location registries - static region districts and city sub-areas
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Tamil Nadu districts shown by default.
pub const REGION_DISTRICTS: [Location; 15] = [
    Location::new("Chennai", 13.0827, 80.2707),
    Location::new("Coimbatore", 11.0168, 76.9558),
    Location::new("Madurai", 9.9252, 78.1198),
    Location::new("Tiruchirappalli", 10.7905, 78.7047),
    Location::new("Salem", 11.6643, 78.1460),
    Location::new("Tirunelveli", 8.7139, 77.7567),
    Location::new("Tiruppur", 11.1085, 77.3411),
    Location::new("Vellore", 12.9165, 79.1325),
    Location::new("Erode", 11.3410, 77.7172),
    Location::new("Thanjavur", 10.7870, 79.1378),
    Location::new("Dindigul", 10.3673, 77.9803),
    Location::new("Kanchipuram", 12.8342, 79.7036),
    Location::new("Cuddalore", 11.7480, 79.7714),
    Location::new("Karur", 10.9601, 78.0766),
    Location::new("Namakkal", 11.2189, 78.1677),
];

/// Vellore sub-areas, merged in when extended areas are enabled.
pub const CITY_AREAS: [Location; 15] = [
    Location::new("Sathuvachari", 12.9465, 79.1525),
    Location::new("Katpadi", 12.9698, 79.1452),
    Location::new("Gandhi Nagar", 12.9265, 79.1425),
    Location::new("Thottapalayam", 12.9065, 79.1125),
    Location::new("Kosapet", 12.9365, 79.1625),
    Location::new("Sripuram", 12.9465, 79.0925),
    Location::new("CMC Vellore", 12.9165, 79.1325),
    Location::new("Bagayam", 12.9265, 79.1225),
    Location::new("Green Circle", 12.9165, 79.1425),
    Location::new("New Bus Stand", 12.9365, 79.1525),
    Location::new("BHEL", 12.9865, 79.1825),
    Location::new("Ranipet", 12.9224, 79.3329),
    Location::new("Arcot", 12.9059, 79.3188),
    Location::new("Walajapet", 12.9257, 79.3668),
    Location::new("Gudiyatham", 12.9459, 78.8739),
];

pub const MAJOR_LOCATIONS: [&str; 4] = ["Chennai", "Coimbatore", "Madurai", "Vellore"];

/// The city the live dashboard and distribution view focus on.
pub const FOCUS_CITY: &str = "Vellore";

pub fn is_major(name: &str) -> bool {
    MAJOR_LOCATIONS.contains(&name)
}

/// Locations in the active registry, region districts first.
pub fn active_locations(include_extended: bool) -> Vec<&'static Location> {
    let mut locations: Vec<&'static Location> = REGION_DISTRICTS.iter().collect();
    if include_extended {
        locations.extend(CITY_AREAS.iter());
    }
    locations
}

/// Resolve a name against both registries, regardless of the extended flag.
pub fn find_location(name: &str) -> Option<&'static Location> {
    REGION_DISTRICTS
        .iter()
        .chain(CITY_AREAS.iter())
        .find(|location| location.name == name)
}

/// A district entry of the state-wide choropleth table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DistrictAqi {
    pub district: &'static str,
    pub aqi: i64,
    pub centroid: GeoPoint,
}

const fn district(district: &'static str, aqi: i64, lat: f64, lon: f64) -> DistrictAqi {
    DistrictAqi {
        district,
        aqi,
        centroid: GeoPoint::new(lat, lon),
    }
}

/// Fixed AQI readings for all 38 districts with approximate centroids.
pub const DISTRICT_AQI: [DistrictAqi; 38] = [
    district("Ariyalur", 82, 11.14, 79.08),
    district("Chengalpattu", 95, 12.69, 79.97),
    district("Chennai", 110, 13.08, 80.27),
    district("Coimbatore", 78, 11.02, 76.96),
    district("Cuddalore", 85, 11.74, 79.77),
    district("Dharmapuri", 80, 12.13, 78.16),
    district("Dindigul", 90, 10.36, 77.97),
    district("Erode", 87, 11.34, 77.72),
    district("Kallakurichi", 75, 11.94, 78.97),
    district("Kanchipuram", 84, 12.83, 79.70),
    district("Kanyakumari", 72, 8.08, 77.55),
    district("Karur", 88, 10.96, 78.08),
    district("Krishnagiri", 79, 12.52, 78.21),
    district("Madurai", 100, 9.93, 78.12),
    district("Mayiladuthurai", 83, 11.10, 79.65),
    district("Nagapattinam", 77, 10.77, 79.84),
    district("Namakkal", 92, 11.22, 78.17),
    district("Nilgiris", 70, 11.41, 76.69),
    district("Perambalur", 81, 11.23, 78.88),
    district("Pudukkottai", 86, 10.38, 78.82),
    district("Ramanathapuram", 74, 9.37, 78.83),
    district("Ranipet", 89, 12.93, 79.33),
    district("Salem", 120, 11.65, 78.16),
    district("Sivaganga", 76, 9.85, 78.48),
    district("Tenkasi", 71, 8.96, 77.31),
    district("Thanjavur", 99, 10.78, 79.13),
    district("Theni", 93, 10.01, 77.48),
    district("Thoothukudi", 80, 8.79, 78.13),
    district("Tiruchirappalli", 91, 10.79, 78.70),
    district("Tirunelveli", 102, 8.73, 77.69),
    district("Tirupathur", 85, 12.49, 78.56),
    district("Tiruppur", 88, 11.11, 77.35),
    district("Tiruvallur", 94, 13.14, 79.91),
    district("Tiruvannamalai", 83, 12.23, 79.07),
    district("Tiruvarur", 78, 10.77, 79.64),
    district("Vellore", 135, 12.91, 79.13),
    district("Viluppuram", 72, 11.94, 79.49),
    district("Virudhunagar", 96, 9.58, 77.95),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registries_are_disjoint() {
        let region: HashSet<&str> = REGION_DISTRICTS.iter().map(|l| l.name).collect();
        assert!(CITY_AREAS.iter().all(|l| !region.contains(l.name)));
    }

    #[test]
    fn test_active_locations_respects_extended_flag() {
        assert_eq!(active_locations(false).len(), 15);

        let extended = active_locations(true);
        assert_eq!(extended.len(), 30);
        assert_eq!(extended[0].name, "Chennai");
        assert_eq!(extended[15].name, "Sathuvachari");
    }

    #[test]
    fn test_find_location_searches_both_registries() {
        assert_eq!(find_location("Madurai").map(|l| l.lat), Some(9.9252));
        assert_eq!(find_location("Katpadi").map(|l| l.lon), Some(79.1452));
        assert!(find_location("Atlantis").is_none());
    }

    #[test]
    fn test_major_locations() {
        assert!(is_major("Vellore"));
        assert!(!is_major("Karur"));
        assert!(!is_major("CMC Vellore"));
    }
}
