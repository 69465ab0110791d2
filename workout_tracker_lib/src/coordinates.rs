use serde::{Deserialize, Serialize};

/// A latitude/longitude pair. Stored as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([latitude, longitude]: [f64; 2]) -> Self {
        Self::new(latitude, longitude)
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(coords: Coordinates) -> Self {
        [coords.latitude, coords.longitude]
    }
}

#[test]
fn test_coordinates_as_pair() {
    let coords = Coordinates::new(51.5, -0.12);
    let json = serde_json::to_string(&coords).unwrap();
    assert_eq!(json, "[51.5,-0.12]");
    assert_eq!(serde_json::from_str::<Coordinates>(&json).unwrap(), coords);
}
