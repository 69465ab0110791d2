use std::time::Duration;

use crate::{coordinates::Coordinates, render::PopupSpec, GeolocationError};

/// The interactive map the session draws on.
pub trait MapView {
    type Marker: MarkerHandle;

    fn init_view(&mut self, center: Coordinates, zoom: f64);

    fn add_tile_layer(&mut self, url: &str, attribution: &str);

    fn add_marker(&mut self, at: Coordinates) -> Self::Marker;

    fn pan_to(&mut self, at: Coordinates, zoom: f64, animate: bool);
}

pub trait MarkerHandle {
    fn bind_popup(&mut self, options: &PopupSpec);

    fn set_popup_content(&mut self, html: &str);

    fn open_popup(&mut self);
}

pub type PositionCallback = Box<dyn FnOnce(Result<Coordinates, GeolocationError>)>;

/// One-shot position lookup. `on_result` is called exactly once.
pub trait Geolocation {
    fn request_position(&self, timeout: Duration, on_result: PositionCallback);
}
