use std::time::Duration;

pub const STORAGE_KEY: &str = "workouts";
pub const DEFAULT_ZOOM: f64 = 13.;
pub const TILE_URL: &str = "https://tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";
pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);
pub const PAN_DURATION: Duration = Duration::from_secs(1);

/// Knobs of a tracking session. `Default` gives the values the widget ships with.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub storage_key: String,
    pub default_zoom: f64,
    pub tile_url: String,
    pub tile_attribution: String,
    pub geolocation_timeout: Duration,
    pub pan_duration: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_owned(),
            default_zoom: DEFAULT_ZOOM,
            tile_url: TILE_URL.to_owned(),
            tile_attribution: TILE_ATTRIBUTION.to_owned(),
            geolocation_timeout: GEOLOCATION_TIMEOUT,
            pan_duration: PAN_DURATION,
        }
    }
}
