use chrono::{DateTime, FixedOffset, Local};
use tracing::{debug, info, warn};

use crate::{
    coordinates::Coordinates,
    form::{Field, FormState, FormValues, ValidInput},
    map::{Geolocation, MapView, MarkerHandle, PositionCallback},
    render::{popup_content, PopupSpec},
    storage::{load_json, save_json, KeyValueStore},
    workout::{Workout, WorkoutId},
    GeolocationError, SessionConfig, SessionError, StorageError,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionState {
    /// Waiting for a position, no map yet.
    Uninitialized,
    MapReady,
    /// The user picked a spot on the map and the form is showing.
    FormOpen { target: Coordinates },
    /// No position could be obtained. The map never shows up.
    Degraded,
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submitted {
    pub id: WorkoutId,
    /// Set when the workout was recorded but the snapshot could not be written.
    pub persist_warning: Option<StorageError>,
}

pub type Clock = Box<dyn Fn() -> DateTime<FixedOffset>>;

/// Owns the workouts, the map and the storage of one tracking session, and
/// drives them from UI events.
pub struct SessionController<M: MapView, S: KeyValueStore> {
    config: SessionConfig,
    state: SessionState,
    location_requested: bool,
    map: M,
    markers: Vec<M::Marker>,
    store: S,
    workouts: Vec<Workout>,
    form: FormState,
    last_id: u64,
    clock: Clock,
}

impl<M: MapView, S: KeyValueStore> SessionController<M, S> {
    pub fn new(map: M, store: S, config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::Uninitialized,
            location_requested: false,
            map,
            markers: Vec::new(),
            store,
            workouts: Vec::new(),
            form: FormState::default(),
            last_id: 0,
            clock: Box::new(|| Local::now().fixed_offset()),
        }
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<FixedOffset> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn markers(&self) -> &[M::Marker] {
        &self.markers
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.values.set(field, value);
    }

    fn map_initialized(&self) -> bool {
        matches!(self.state, SessionState::MapReady | SessionState::FormOpen { .. })
    }

    /// Reads the stored snapshot and appends its workouts. Meant to run once at
    /// startup. A missing snapshot is not an error; a broken one leaves the
    /// session with no restored workouts and is reported.
    pub fn restore_snapshot(&mut self) -> Result<usize, SessionError> {
        let restored: Vec<Workout> = match load_json(&self.store, &self.config.storage_key) {
            Ok(Some(workouts)) => workouts,
            Ok(None) => {
                debug!("No stored workouts");
                return Ok(0);
            }
            Err(err) => {
                warn!("Ignoring stored workouts: {err}");
                return Err(err);
            }
        };

        let count = restored.len();
        for workout in restored {
            if let Some(millis) = workout.id().as_millis() {
                self.last_id = self.last_id.max(millis);
            }
            if self.map_initialized() {
                self.markers.push(place_marker(&mut self.map, &workout));
            }
            self.workouts.push(workout);
        }

        info!("Restored {count} workouts");
        Ok(count)
    }

    /// Asks for the device position. The answer must be handed back through
    /// [`Self::location_resolved`]. Only the first call does anything.
    pub fn acquire_location(&mut self, geolocation: &impl Geolocation, on_result: PositionCallback) {
        if self.location_requested || self.state != SessionState::Uninitialized {
            debug!("Position already requested");
            return;
        }

        self.location_requested = true;
        geolocation.request_position(self.config.geolocation_timeout, on_result);
    }

    pub fn location_resolved(&mut self, result: Result<Coordinates, GeolocationError>) -> Result<(), SessionError> {
        if self.state != SessionState::Uninitialized {
            return Ok(());
        }

        let center = match result {
            Ok(center) => center,
            Err(err) => {
                warn!("No position, map disabled: {err}");
                self.state = SessionState::Degraded;
                return Err(SessionError::GeolocationUnavailable(err));
            }
        };

        info!("Loading map at {}, {}", center.latitude, center.longitude);
        self.map.init_view(center, self.config.default_zoom);
        self.map.add_tile_layer(&self.config.tile_url, &self.config.tile_attribution);

        for workout in &self.workouts {
            self.markers.push(place_marker(&mut self.map, workout));
        }

        self.state = SessionState::MapReady;
        Ok(())
    }

    /// Opens the form for a workout at `at`. Returns false when the click is
    /// ignored, true when the distance input should get focus.
    pub fn on_map_clicked(&mut self, at: Coordinates) -> bool {
        match self.state {
            SessionState::MapReady => {
                self.state = SessionState::FormOpen { target: at };
                self.form.visible = true;
                true
            }
            _ => false,
        }
    }

    pub fn on_input_type_changed(&mut self) {
        self.form.toggle_type();
    }

    pub fn submit_workout(&mut self, values: &FormValues) -> Result<Submitted, SessionError> {
        let SessionState::FormOpen { target } = self.state else {
            return Err(SessionError::MissingMapEventContext);
        };

        let input = values.validate()?;

        let created_at = (self.clock)();
        let id = self.next_id(created_at);
        let workout = match input {
            ValidInput::Running { distance, duration, cadence } => {
                Workout::running(id.clone(), created_at, target, distance, duration, cadence)
            }
            ValidInput::Cycling { distance, duration, elevation } => {
                Workout::cycling(id.clone(), created_at, target, distance, duration, elevation)
            }
        };

        info!("New workout {}: {}", id, workout.description());

        self.markers.push(place_marker(&mut self.map, &workout));
        self.workouts.push(workout);

        self.form.values.clear();
        self.form.visible = false;
        self.state = SessionState::MapReady;

        let persist_warning = self.persist_snapshot().err();

        Ok(Submitted { id, persist_warning })
    }

    /// Moves the map to the workout of a clicked list row. Unknown ids and
    /// clicks without a map are ignored.
    pub fn on_workout_row_clicked(&mut self, id: &WorkoutId) -> bool {
        if !self.map_initialized() {
            return false;
        }

        let Some(workout) = self.workouts.iter().find(|w| w.id() == id) else {
            warn!("Clicked row {id} has no workout");
            return false;
        };

        self.map.pan_to(workout.coords(), self.config.default_zoom, true);
        true
    }

    /// Writes every workout under the storage key, replacing the old snapshot.
    pub fn persist_snapshot(&self) -> Result<(), StorageError> {
        save_json(&self.store, &self.config.storage_key, &self.workouts)
            .inspect(|_| debug!("Saved {} workouts", self.workouts.len()))
            .inspect_err(|err| warn!("Failed to save workouts: {err}"))
    }

    /// Drops the stored snapshot. The caller is expected to reload the app.
    pub fn clear_snapshot(&mut self) -> Result<(), StorageError> {
        info!("Clearing stored workouts");
        self.store.remove(&self.config.storage_key)
    }

    fn next_id(&mut self, created_at: DateTime<FixedOffset>) -> WorkoutId {
        let millis = created_at.timestamp_millis().max(0) as u64;
        if let Some(next) = self.last_id.checked_add(1) {
            self.last_id = millis.max(next);
            return WorkoutId::from_millis(self.last_id);
        }

        // Numeric ids are used up, suffix the timestamp until it is free
        warn!("Workout ids exhausted, falling back to suffixed ids");
        (self.workouts.len()..)
            .map(|n| WorkoutId::new(format!("{millis}-{n}")))
            .find(|id| self.workouts.iter().all(|w| w.id() != id))
            .unwrap_or_else(|| WorkoutId::new(format!("{millis}-{}", self.workouts.len())))
    }
}

fn place_marker<M: MapView>(map: &mut M, workout: &Workout) -> M::Marker {
    let mut marker = map.add_marker(workout.coords());
    marker.bind_popup(&PopupSpec::for_type(workout.workout_type()));
    marker.set_popup_content(&popup_content(workout));
    marker.open_popup();
    marker
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        rc::Rc,
        time::Duration,
    };

    use chrono::TimeZone;

    use super::*;
    use crate::{storage::MemoryStore, workout::WorkoutType, STORAGE_KEY};

    #[derive(Debug, Clone, PartialEq)]
    enum MapCall {
        InitView(Coordinates, f64),
        TileLayer(String),
        Marker(Coordinates),
        Popup(String),
        Content(String),
        Open,
        PanTo(Coordinates, f64, bool),
    }

    type CallLog = Rc<RefCell<Vec<MapCall>>>;

    #[derive(Default)]
    struct RecordingMap {
        calls: CallLog,
    }

    struct RecordingMarker {
        calls: CallLog,
    }

    impl MapView for RecordingMap {
        type Marker = RecordingMarker;

        fn init_view(&mut self, center: Coordinates, zoom: f64) {
            self.calls.borrow_mut().push(MapCall::InitView(center, zoom));
        }

        fn add_tile_layer(&mut self, url: &str, _attribution: &str) {
            self.calls.borrow_mut().push(MapCall::TileLayer(url.to_owned()));
        }

        fn add_marker(&mut self, at: Coordinates) -> Self::Marker {
            self.calls.borrow_mut().push(MapCall::Marker(at));
            RecordingMarker { calls: self.calls.clone() }
        }

        fn pan_to(&mut self, at: Coordinates, zoom: f64, animate: bool) {
            self.calls.borrow_mut().push(MapCall::PanTo(at, zoom, animate));
        }
    }

    impl MarkerHandle for RecordingMarker {
        fn bind_popup(&mut self, options: &PopupSpec) {
            self.calls.borrow_mut().push(MapCall::Popup(options.class_name.clone()));
        }

        fn set_popup_content(&mut self, html: &str) {
            self.calls.borrow_mut().push(MapCall::Content(html.to_owned()));
        }

        fn open_popup(&mut self) {
            self.calls.borrow_mut().push(MapCall::Open);
        }
    }

    impl RecordingMap {
        fn calls(&self) -> Vec<MapCall> {
            self.calls.borrow().clone()
        }

        fn markers(&self) -> Vec<Coordinates> {
            self.calls()
                .into_iter()
                .filter_map(|call| match call {
                    MapCall::Marker(at) => Some(at),
                    _ => None,
                })
                .collect()
        }
    }

    /// Memory store that counts writes and can be told to fail them.
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: Cell<usize>,
        fail_writes: Cell<bool>,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.set(self.writes.get() + 1);
            if self.fail_writes.get() {
                return Err(StorageError::Write {
                    key: key.to_owned(),
                    reason: "quota exceeded".into(),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    struct FixedGeolocation {
        result: Result<Coordinates, GeolocationError>,
        requests: Cell<usize>,
        timeout: Cell<Option<Duration>>,
    }

    impl FixedGeolocation {
        fn new(result: Result<Coordinates, GeolocationError>) -> Self {
            Self {
                result,
                requests: Cell::new(0),
                timeout: Cell::new(None),
            }
        }
    }

    impl Geolocation for FixedGeolocation {
        fn request_position(&self, timeout: Duration, on_result: PositionCallback) {
            self.requests.set(self.requests.get() + 1);
            self.timeout.set(Some(timeout));
            on_result(self.result.clone());
        }
    }

    type Controller = SessionController<RecordingMap, CountingStore>;

    const HOME: Coordinates = Coordinates { latitude: 56.17, longitude: 10.19 };

    /// Each reading is one second after the previous one.
    fn ticking_clock() -> impl Fn() -> DateTime<FixedOffset> {
        let start = FixedOffset::east_opt(3600).unwrap().with_ymd_and_hms(2025, 4, 14, 10, 0, 0).unwrap();
        let ticks = Cell::new(0);
        move || {
            ticks.set(ticks.get() + 1);
            start + chrono::Duration::seconds(ticks.get())
        }
    }

    fn controller() -> Controller {
        SessionController::new(RecordingMap::default(), CountingStore::default(), SessionConfig::default())
            .with_clock(ticking_clock())
    }

    fn ready_controller() -> Controller {
        let mut controller = controller();
        controller.location_resolved(Ok(HOME)).unwrap();
        controller
    }

    fn running(distance: &str, duration: &str, cadence: &str) -> FormValues {
        FormValues {
            workout_type: WorkoutType::Running,
            distance: distance.into(),
            duration: duration.into(),
            cadence: cadence.into(),
            elevation: String::new(),
        }
    }

    fn cycling(distance: &str, duration: &str, elevation: &str) -> FormValues {
        FormValues {
            workout_type: WorkoutType::Cycling,
            distance: distance.into(),
            duration: duration.into(),
            cadence: String::new(),
            elevation: elevation.into(),
        }
    }

    fn submit_at<S: KeyValueStore>(controller: &mut SessionController<RecordingMap, S>, at: Coordinates, values: FormValues) -> Submitted {
        assert!(controller.on_map_clicked(at));
        controller.submit_workout(&values).unwrap()
    }

    fn stored(controller: &Controller) -> Vec<serde_json::Value> {
        let json = controller.store().get(STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn location_success_initializes_map() {
        let geolocation = FixedGeolocation::new(Ok(HOME));
        let resolved = Rc::new(RefCell::new(None));

        let mut controller = controller();
        let slot = resolved.clone();
        controller.acquire_location(&geolocation, Box::new(move |result| *slot.borrow_mut() = Some(result)));
        controller.acquire_location(&geolocation, Box::new(|_| unreachable!()));

        assert_eq!(geolocation.requests.get(), 1);
        assert_eq!(geolocation.timeout.get(), Some(Duration::from_secs(10)));
        assert_eq!(controller.state(), SessionState::Uninitialized);

        let result = resolved.borrow_mut().take().unwrap();
        controller.location_resolved(result).unwrap();

        assert_eq!(controller.state(), SessionState::MapReady);
        assert_eq!(controller.map().calls(), vec![
            MapCall::InitView(HOME, 13.),
            MapCall::TileLayer("https://tile.openstreetmap.fr/hot/{z}/{x}/{y}.png".into()),
        ]);
    }

    #[test]
    fn location_failure_degrades_session() {
        let mut controller = controller();
        let err = controller.location_resolved(Err(GeolocationError::PermissionDenied)).unwrap_err();

        assert_eq!(err, SessionError::GeolocationUnavailable(GeolocationError::PermissionDenied));
        assert_eq!(controller.state(), SessionState::Degraded);
        assert!(controller.map().calls().is_empty());

        // Nothing map related works from here on
        assert!(!controller.on_map_clicked(HOME));
        assert_eq!(controller.submit_workout(&running("5", "20", "170")), Err(SessionError::MissingMapEventContext));
        assert!(controller.location_resolved(Ok(HOME)).is_ok());
        assert_eq!(controller.state(), SessionState::Degraded);
    }

    #[test]
    fn map_clicks_only_open_the_form_when_ready() {
        let mut controller = controller();
        assert!(!controller.on_map_clicked(HOME));
        assert!(!controller.form().visible);

        controller.location_resolved(Ok(HOME)).unwrap();
        let target = Coordinates::new(56.2, 10.2);
        assert!(controller.on_map_clicked(target));
        assert!(controller.form().visible);
        assert_eq!(controller.state(), SessionState::FormOpen { target });

        // A second click while the form is open is ignored
        assert!(!controller.on_map_clicked(HOME));
        assert_eq!(controller.state(), SessionState::FormOpen { target });
    }

    #[test]
    fn submitting_without_a_map_click_is_rejected() {
        let mut controller = ready_controller();
        let result = controller.submit_workout(&running("5", "20", "170"));

        assert_eq!(result, Err(SessionError::MissingMapEventContext));
        assert!(controller.workouts().is_empty());
        assert_eq!(controller.store().writes.get(), 0);
    }

    #[test]
    fn running_submission_is_recorded_drawn_and_saved() {
        let mut controller = ready_controller();
        let target = Coordinates::new(51.5, -0.12);
        controller.set_field(Field::Distance, "5.2");

        let submitted = submit_at(&mut controller, target, running("5.2", "24", "178"));

        assert_eq!(submitted.persist_warning, None);
        let last = controller.workouts().last().unwrap();
        assert_eq!(last.id(), &submitted.id);
        assert_eq!(last.pace(), Some(4.62));
        assert_eq!(last.coords(), target);
        assert_eq!(last.workout_type(), WorkoutType::Running);

        assert_eq!(controller.map().calls()[2..].to_vec(), vec![
            MapCall::Marker(target),
            MapCall::Popup("running-popup".into()),
            MapCall::Content("🏃‍♂️ Running on April 14".into()),
            MapCall::Open,
        ]);

        assert_eq!(controller.state(), SessionState::MapReady);
        assert!(!controller.form().visible);
        assert_eq!(controller.form().values.distance, "");

        let snapshot = stored(&controller);
        let last_stored = snapshot.last().unwrap();
        assert_eq!(last_stored["id"], submitted.id.as_str());
        assert_eq!(last_stored["type"], "running");
        assert_eq!(last_stored["pace"], 4.62);
        assert_eq!(last_stored["cadence"], 178);
        assert_eq!(last_stored["coords"], serde_json::json!([51.5, -0.12]));
    }

    #[test]
    fn cycling_submission_computes_speed() {
        let mut controller = ready_controller();
        submit_at(&mut controller, HOME, cycling("27", "95", "456"));

        let workout = &controller.workouts()[0];
        assert_eq!(workout.speed(), Some(17.05));
        assert!(controller.map().calls().contains(&MapCall::Popup("cycling-popup".into())));
    }

    #[test]
    fn invalid_input_changes_nothing() {
        let mut controller = ready_controller();
        assert!(controller.on_map_clicked(HOME));
        controller.set_field(Field::Distance, "0");

        let attempts = [
            running("0", "24", "178"),
            running("-5", "24", "178"),
            running("5", "abc", "178"),
            running("5", "24", "NaN"),
        ];

        for values in attempts {
            let err = controller.submit_workout(&values).unwrap_err();
            assert!(matches!(err, SessionError::InvalidWorkoutInput(_)), "{values:?}");
        }

        assert!(controller.workouts().is_empty());
        assert_eq!(controller.store().writes.get(), 0);
        assert_eq!(controller.state(), SessionState::FormOpen { target: HOME });
        assert!(controller.form().visible);
        assert_eq!(controller.form().values.distance, "0");

        // Still recoverable
        controller.submit_workout(&running("5", "24", "178")).unwrap();
        assert_eq!(controller.workouts().len(), 1);
    }

    #[test]
    fn consecutive_submissions_get_distinct_ids_in_order() {
        let start = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 4, 14, 10, 0, 0).unwrap();
        let mut controller = controller().with_clock(move || start);
        controller.location_resolved(Ok(HOME)).unwrap();

        let first = submit_at(&mut controller, HOME, running("5", "25", "170"));
        let second = submit_at(&mut controller, HOME, cycling("20", "60", "100"));

        assert_ne!(first.id, second.id);
        let ids: Vec<&WorkoutId> = controller.workouts().iter().map(|w| w.id()).collect();
        assert_eq!(ids, vec![&first.id, &second.id]);
        assert_eq!(stored(&controller).len(), 2);
    }

    #[test]
    fn row_click_pans_to_stored_coordinates() {
        let mut controller = ready_controller();
        let spots = [Coordinates::new(1., 2.), Coordinates::new(3., 4.), Coordinates::new(5.123456, -6.654321)];
        for spot in spots {
            submit_at(&mut controller, spot, running("5", "25", "170"));
        }

        let third = controller.workouts()[2].id().clone();
        assert!(controller.on_workout_row_clicked(&third));
        assert_eq!(controller.map().calls().last(), Some(&MapCall::PanTo(spots[2], 13., true)));

        let calls = controller.map().calls().len();
        assert!(!controller.on_workout_row_clicked(&WorkoutId::new("missing")));
        assert_eq!(controller.map().calls().len(), calls);
    }

    #[test]
    fn snapshot_round_trip_keeps_order_fields_and_variants() {
        let store = CountingStore::default();
        let before: Vec<Workout> = {
            let mut controller = SessionController::new(RecordingMap::default(), &store, SessionConfig::default())
                .with_clock(ticking_clock());
            controller.location_resolved(Ok(HOME)).unwrap();
            for values in [running("5.2", "24", "178"), cycling("27", "95", "456"), running("10", "55", "165")] {
                assert!(controller.on_map_clicked(HOME));
                controller.submit_workout(&values).unwrap();
            }
            controller.workouts().to_vec()
        };

        let mut restored = SessionController::new(RecordingMap::default(), &store, SessionConfig::default());
        assert_eq!(restored.restore_snapshot(), Ok(3));

        let after = restored.workouts();
        assert_eq!(after.len(), before.len());
        for (a, b) in before.iter().zip(after) {
            assert_eq!(serde_json::to_value(a).unwrap(), serde_json::to_value(b).unwrap());
            assert_eq!(a.kind(), b.kind());
            assert_eq!(a.created_at(), b.created_at());
        }
        assert_eq!(after[1].speed(), Some(17.05));
        assert_eq!(after[1].pace(), None);
    }

    #[test]
    fn restored_markers_wait_for_the_map() {
        let store = MemoryStore::new();
        let at = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 4, 14, 8, 0, 0).unwrap();
        let spot = Coordinates::new(48.85, 2.35);
        let workouts = [Workout::cycling(WorkoutId::new("500"), at, spot, 20., 60., 100.)];
        save_json(&store, STORAGE_KEY, &workouts).unwrap();

        let mut controller = SessionController::new(RecordingMap::default(), &store, SessionConfig::default());
        controller.restore_snapshot().unwrap();
        assert!(controller.map().markers().is_empty());

        controller.location_resolved(Ok(HOME)).unwrap();
        assert_eq!(controller.map().markers(), vec![spot]);
        assert_eq!(controller.markers().len(), 1);
    }

    #[test]
    fn negative_elevation_survives_a_restore() {
        let store = MemoryStore::new();
        let at = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 4, 14, 8, 0, 0).unwrap();
        let workouts = [Workout::cycling(WorkoutId::new("600"), at, HOME, 27., 95., -456.)];
        save_json(&store, STORAGE_KEY, &workouts).unwrap();

        let mut controller = SessionController::new(RecordingMap::default(), &store, SessionConfig::default());
        assert_eq!(controller.restore_snapshot(), Ok(1));
        assert_eq!(controller.workouts()[0].kind(), workouts[0].kind());
        assert_eq!(controller.workouts()[0].speed(), Some(17.05));
    }

    #[test]
    fn largest_possible_restored_id_does_not_overflow() {
        let store = MemoryStore::new();
        let at = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2025, 4, 14, 8, 0, 0).unwrap();
        let workouts = [Workout::running(WorkoutId::from_millis(u64::MAX), at, HOME, 5., 25., 170)];
        save_json(&store, STORAGE_KEY, &workouts).unwrap();

        let mut controller = SessionController::new(RecordingMap::default(), &store, SessionConfig::default())
            .with_clock(ticking_clock());
        controller.restore_snapshot().unwrap();
        controller.location_resolved(Ok(HOME)).unwrap();

        let first = submit_at(&mut controller, HOME, running("5", "25", "170"));
        let second = submit_at(&mut controller, HOME, running("6", "30", "172"));
        assert_ne!(first.id, WorkoutId::from_millis(u64::MAX));
        assert_ne!(first.id, second.id);
        assert_eq!(controller.workouts().len(), 3);
    }

    #[test]
    fn new_ids_never_collide_with_restored_ones() {
        let store = MemoryStore::new();
        let at = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let future_id = at.timestamp_millis() as u64;
        let workouts = [Workout::running(WorkoutId::from_millis(future_id), at, HOME, 5., 25., 170)];
        save_json(&store, STORAGE_KEY, &workouts).unwrap();

        let mut controller = SessionController::new(RecordingMap::default(), &store, SessionConfig::default())
            .with_clock(ticking_clock());
        controller.restore_snapshot().unwrap();
        controller.location_resolved(Ok(HOME)).unwrap();

        assert!(controller.on_map_clicked(HOME));
        let submitted = controller.submit_workout(&running("5", "25", "170")).unwrap();
        assert_eq!(submitted.id, WorkoutId::from_millis(future_id + 1));
    }

    #[test]
    fn missing_or_corrupt_snapshot_means_no_workouts() {
        let mut controller = controller();
        assert_eq!(controller.restore_snapshot(), Ok(0));

        let store = MemoryStore::new();
        store.set(STORAGE_KEY, "{ not json").unwrap();
        let mut controller = SessionController::new(RecordingMap::default(), &store, SessionConfig::default());
        assert!(matches!(controller.restore_snapshot(), Err(SessionError::SnapshotCorrupt(_))));
        assert!(controller.workouts().is_empty());

        store.set(STORAGE_KEY, r#"[{"id":"1","type":"swimming"}]"#).unwrap();
        let mut controller = SessionController::new(RecordingMap::default(), &store, SessionConfig::default());
        assert!(matches!(controller.restore_snapshot(), Err(SessionError::SnapshotCorrupt(_))));
        assert!(controller.workouts().is_empty());
    }

    #[test]
    fn failed_save_is_a_warning_and_keeps_the_workout() {
        let mut controller = ready_controller();
        controller.store().fail_writes.set(true);

        let submitted = submit_at(&mut controller, HOME, running("5", "25", "170"));

        assert!(matches!(submitted.persist_warning, Some(StorageError::Write { .. })));
        assert_eq!(controller.workouts().len(), 1);
        assert_eq!(controller.state(), SessionState::MapReady);
    }

    #[test]
    fn persist_replaces_the_whole_snapshot() {
        let mut controller = ready_controller();
        submit_at(&mut controller, HOME, running("5", "25", "170"));
        submit_at(&mut controller, HOME, running("6", "30", "170"));

        controller.persist_snapshot().unwrap();
        assert_eq!(stored(&controller).len(), 2);
        assert_eq!(controller.store().writes.get(), 3);
    }

    #[test]
    fn clear_snapshot_removes_stored_workouts() {
        let mut controller = ready_controller();
        submit_at(&mut controller, HOME, running("5", "25", "170"));
        assert!(controller.store().get(STORAGE_KEY).unwrap().is_some());

        controller.clear_snapshot().unwrap();
        assert_eq!(controller.store().get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn type_change_swaps_the_metric_input() {
        let mut controller = controller();
        assert_eq!(controller.form().visible_metric(), Field::Cadence);
        controller.on_input_type_changed();
        assert_eq!(controller.form().visible_metric(), Field::Elevation);
        assert_eq!(controller.state(), SessionState::Uninitialized);
    }
}
