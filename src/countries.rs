//! Static reference list of countries shown on the globe.

use crate::types::Country;

/// (code, name, latitude, longitude) of every country marker.
const REFERENCE_COUNTRIES: &[(&str, &str, f64, f64)] = &[
    ("US", "United States", 39.8283, -98.5795),
    ("CA", "Canada", 56.1304, -106.3468),
    ("MX", "Mexico", 23.6345, -102.5528),
    ("BR", "Brazil", -14.2350, -51.9253),
    ("AR", "Argentina", -38.4161, -63.6167),
    ("PE", "Peru", -9.1900, -75.0152),
    ("CL", "Chile", -35.6751, -71.5430),
    ("CO", "Colombia", 4.5709, -74.2973),
    ("GB", "United Kingdom", 55.3781, -3.4360),
    ("IE", "Ireland", 53.4129, -8.2439),
    ("FR", "France", 46.2276, 2.2137),
    ("ES", "Spain", 40.4637, -3.7492),
    ("PT", "Portugal", 39.3999, -8.2245),
    ("DE", "Germany", 51.1657, 10.4515),
    ("IT", "Italy", 41.8719, 12.5674),
    ("NL", "Netherlands", 52.1326, 5.2913),
    ("CH", "Switzerland", 46.8182, 8.2275),
    ("AT", "Austria", 47.5162, 14.5501),
    ("GR", "Greece", 39.0742, 21.8243),
    ("NO", "Norway", 60.4720, 8.4689),
    ("SE", "Sweden", 60.1282, 18.6435),
    ("IS", "Iceland", 64.9631, -19.0208),
    ("PL", "Poland", 51.9194, 19.1451),
    ("TR", "Turkey", 38.9637, 35.2433),
    ("EG", "Egypt", 26.8206, 30.8025),
    ("MA", "Morocco", 31.7917, -7.0926),
    ("ZA", "South Africa", -30.5595, 22.9375),
    ("KE", "Kenya", -0.0236, 37.9062),
    ("TZ", "Tanzania", -6.3690, 34.8888),
    ("AE", "United Arab Emirates", 23.4241, 53.8478),
    ("IN", "India", 20.5937, 78.9629),
    ("CN", "China", 35.8617, 104.1954),
    ("JP", "Japan", 36.2048, 138.2529),
    ("KR", "South Korea", 35.9078, 127.7669),
    ("TH", "Thailand", 15.8700, 100.9925),
    ("VN", "Vietnam", 14.0583, 108.2772),
    ("ID", "Indonesia", -0.7893, 113.9213),
    ("PH", "Philippines", 12.8797, 121.7740),
    ("AU", "Australia", -25.2744, 133.7751),
    ("NZ", "New Zealand", -40.9006, 174.8860),
];

/// Builds the ordered reference list with every `planned` flag cleared.
pub fn reference_countries() -> Vec<Country> {
    REFERENCE_COUNTRIES
        .iter()
        .map(|&(code, name, lat, lng)| Country::new(code, name, lat, lng))
        .collect()
}
