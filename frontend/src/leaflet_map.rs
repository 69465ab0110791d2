use std::time::Duration;

use gloo_console::error;
use gloo_utils::document;
use leaflet::{LatLng, Map, MapOptions, Marker, Popup, PopupOptions, TileLayer, TileLayerOptions};
use wasm_bindgen::{prelude::*, JsCast, JsValue};
use web_sys::{
    js_sys::{Object, Reflect},
    HtmlElement,
};
use workout_tracker_lib::{
    coordinates::Coordinates,
    map::{MapView, MarkerHandle},
    render::PopupSpec,
};
use yew::Callback;

// Bits of the Leaflet API the bindings do not expose
#[wasm_bindgen]
extern "C" {
    type MapExt;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view_with_options(this: &MapExt, center: &LatLng, zoom: f64, options: &JsValue);

    #[wasm_bindgen(method)]
    fn on(this: &MapExt, kind: &str, handler: &JsValue);

    type LayerExt;

    #[wasm_bindgen(method, js_name = openPopup)]
    fn open_popup(this: &LayerExt);
}

/// Leaflet map living in its own detached `div`, mounted by `MapComponent`.
pub struct LeafletMap {
    map: Map,
    container: HtmlElement,
    pan_duration: Duration,
    click_handler: Option<Closure<dyn Fn(JsValue)>>,
}

impl LeafletMap {
    pub fn new(pan_duration: Duration) -> Self {
        let container: HtmlElement = document()
            .create_element("div")
            .expect_throw("failed to create map container")
            .unchecked_into();
        container.set_class_name("map");

        let map = Map::new_with_element(&container, &MapOptions::default());
        map.set_max_zoom(25.);

        Self {
            map,
            container,
            pan_duration,
            click_handler: None,
        }
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Reports the coordinates of every click on the map.
    pub fn on_click(&mut self, callback: Callback<Coordinates>) {
        let handler = Closure::<dyn Fn(JsValue)>::new(move |event: JsValue| {
            let lat_lng = Reflect::get(&event, &"latlng".into()).unwrap_or(JsValue::UNDEFINED);
            match (number(&lat_lng, "lat"), number(&lat_lng, "lng")) {
                (Some(lat), Some(lng)) => callback.emit(Coordinates::new(lat, lng)),
                _ => error!("Map click without coordinates"),
            }
        });

        self.map.unchecked_ref::<MapExt>().on("click", handler.as_ref());
        self.click_handler = Some(handler);
    }
}

impl MapView for LeafletMap {
    type Marker = LeafletMarker;

    fn init_view(&mut self, center: Coordinates, zoom: f64) {
        self.map.set_view(&lat_lng(center), zoom);
        self.map.invalidate_size(false);
    }

    fn add_tile_layer(&mut self, url: &str, attribution: &str) {
        let opts = TileLayerOptions::new();
        opts.set_update_when_idle(true);
        set_option(&opts, "attribution", attribution.into());
        TileLayer::new_options(url, &opts).add_to(&self.map);
    }

    fn add_marker(&mut self, at: Coordinates) -> Self::Marker {
        let marker = Marker::new(&lat_lng(at));
        marker.add_to(&self.map);
        LeafletMarker { marker, popup: None }
    }

    fn pan_to(&mut self, at: Coordinates, zoom: f64, animate: bool) {
        let pan = Object::new();
        set_option(&pan, "duration", self.pan_duration.as_secs_f64().into());
        let options = Object::new();
        set_option(&options, "animate", animate.into());
        set_option(&options, "pan", pan.into());

        self.map
            .unchecked_ref::<MapExt>()
            .set_view_with_options(&lat_lng(at), zoom, &options);
    }
}

pub struct LeafletMarker {
    marker: Marker,
    popup: Option<Popup>,
}

impl MarkerHandle for LeafletMarker {
    fn bind_popup(&mut self, options: &PopupSpec) {
        let opts = PopupOptions::default();
        set_option(&opts, "maxWidth", options.max_width.into());
        set_option(&opts, "minWidth", options.min_width.into());
        set_option(&opts, "autoClose", options.auto_close.into());
        set_option(&opts, "closeOnClick", options.close_on_click.into());
        set_option(&opts, "className", options.class_name.as_str().into());

        let popup = Popup::new(&opts, None);
        self.marker.bind_popup(&popup);
        self.popup = Some(popup);
    }

    fn set_popup_content(&mut self, html: &str) {
        match &self.popup {
            Some(popup) => {
                popup.set_content(&html.into());
            }
            None => error!("Popup content set before binding a popup"),
        }
    }

    fn open_popup(&mut self) {
        self.marker.unchecked_ref::<LayerExt>().open_popup();
    }
}

fn lat_lng(coords: Coordinates) -> LatLng {
    LatLng::new(coords.latitude, coords.longitude)
}

fn number(target: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(target, &key.into()).ok()?.as_f64()
}

fn set_option(target: &impl AsRef<JsValue>, key: &str, value: JsValue) {
    if Reflect::set(target.as_ref(), &key.into(), &value).is_err() {
        error!(format!("Failed to set option {key}"));
    }
}
