//! Downtown San Jose landmarks used as realistic stop lists.
//!
//! Coordinates are approximate; tests resolve them through a lookup geocoder
//! rather than a live provider.

/// A named stop with its street address and position.
#[derive(Debug, Clone, Copy)]
pub struct Landmark {
    pub name: &'static str,
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Landmark {
    pub const fn new(name: &'static str, address: &'static str, lat: f64, lng: f64) -> Self {
        Self {
            name,
            address,
            lat,
            lng,
        }
    }
}

/// Fixed start used by the single-origin variant of the planner.
pub const FIXED_START: Landmark = Landmark::new(
    "Office",
    "4 N 2nd St Suite 150, San Jose, CA 95113",
    37.3365,
    -121.8893,
);

pub const LANDMARKS: &[Landmark] = &[
    Landmark::new("San Jose City Hall", "200 E Santa Clara St, San Jose, CA 95113", 37.3377, -121.8853),
    Landmark::new("SAP Center at San Jose", "525 W Santa Clara St, San Jose, CA 95113", 37.3327, -121.9010),
    Landmark::new("The Tech Interactive", "201 S Market St, San Jose, CA 95113", 37.3316, -121.8901),
    Landmark::new("Santana Row", "377 Santana Row, San Jose, CA 95128", 37.3209, -121.9478),
    Landmark::new("San Jose Museum of Art", "110 S Market St, San Jose, CA 95113", 37.3334, -121.8897),
    Landmark::new("San Jose State University", "1 Washington Square, San Jose, CA 95192", 37.3352, -121.8811),
    Landmark::new("Winchester Mystery House", "525 S Winchester Blvd, San Jose, CA 95128", 37.3184, -121.9511),
    Landmark::new("Rosicrucian Egyptian Museum", "1660 Park Ave, San Jose, CA 95191", 37.3337, -121.9234),
    Landmark::new("Happy Hollow Park & Zoo", "748 Story Rd, San Jose, CA 95112", 37.3257, -121.8611),
];

/// Addresses of the first `n` landmarks.
pub fn addresses(n: usize) -> Vec<String> {
    LANDMARKS
        .iter()
        .take(n)
        .map(|landmark| landmark.address.to_string())
        .collect()
}
