use std::{cell::RefCell, rc::Rc, time::Duration};

use gloo_utils::window;
use wasm_bindgen::{prelude::*, JsCast, JsValue};
use web_sys::{
    js_sys::{Function, Reflect},
    PositionOptions, Storage,
};
use workout_tracker_lib::{
    coordinates::Coordinates,
    map::{Geolocation, PositionCallback},
    storage::KeyValueStore,
    GeolocationError, StorageError,
};

/// `window.localStorage`.
pub struct BrowserStorage {
    storage: Option<Storage>,
}

impl BrowserStorage {
    pub fn local() -> Self {
        Self {
            storage: window().local_storage().ok().flatten(),
        }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".into()))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get_item(key).map_err(|e| StorageError::Read {
            key: key.to_owned(),
            reason: format!("{e:?}"),
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(|e| StorageError::Write {
            key: key.to_owned(),
            reason: format!("{e:?}"),
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?.remove_item(key).map_err(|e| StorageError::Write {
            key: key.to_owned(),
            reason: format!("{e:?}"),
        })
    }
}

/// `navigator.geolocation`, one position per request.
pub struct BrowserGeolocation;

impl Geolocation for BrowserGeolocation {
    fn request_position(&self, timeout: Duration, on_result: PositionCallback) {
        let geolocation = match window().navigator().geolocation() {
            Ok(geolocation) => geolocation,
            Err(e) => return on_result(Err(GeolocationError::Unsupported(format!("{e:?}")))),
        };

        // Whichever callback fires first gets to answer
        let slot = Rc::new(RefCell::new(Some(on_result)));
        let respond = move |result: Result<Coordinates, GeolocationError>| {
            let on_result = slot.borrow_mut().take();
            if let Some(on_result) = on_result {
                on_result(result);
            }
        };

        let on_success = {
            let respond = respond.clone();
            Closure::once_into_js(move |position: JsValue| respond(read_position(&position)))
        };
        let on_error = {
            let respond = respond.clone();
            Closure::once_into_js(move |error: JsValue| respond(Err(read_error(&error))))
        };

        let options = PositionOptions::new();
        options.set_timeout(u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX));

        if let Err(e) = geolocation.get_current_position_with_error_callback_and_options(
            on_success.unchecked_ref::<Function>(),
            Some(on_error.unchecked_ref::<Function>()),
            &options,
        ) {
            respond(Err(GeolocationError::Unsupported(format!("{e:?}"))));
        }
    }
}

fn read_position(position: &JsValue) -> Result<Coordinates, GeolocationError> {
    let coords = Reflect::get(position, &"coords".into()).map_err(|_| GeolocationError::PositionUnavailable)?;
    let field = |key: &str| {
        Reflect::get(&coords, &key.into())
            .ok()
            .and_then(|value| value.as_f64())
            .ok_or(GeolocationError::PositionUnavailable)
    };

    Ok(Coordinates::new(field("latitude")?, field("longitude")?))
}

fn read_error(error: &JsValue) -> GeolocationError {
    let code = Reflect::get(error, &"code".into())
        .ok()
        .and_then(|code| code.as_f64())
        .map(|code| code as u32);
    match code {
        Some(1) => GeolocationError::PermissionDenied,
        Some(3) => GeolocationError::Timeout,
        _ => GeolocationError::PositionUnavailable,
    }
}
