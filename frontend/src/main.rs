use crate::{
    browser::{BrowserGeolocation, BrowserStorage},
    components::{
        map_component::MapComponent,
        notice::{Notice, NoticeBanner},
        workout_form::WorkoutForm,
        workout_list::WorkoutList,
    },
    leaflet_map::LeafletMap,
};
use gloo_console::{error, info, warn};
use gloo_timers::callback::Timeout;
use gloo_utils::window;
use web_sys::HtmlInputElement;
use workout_tracker_lib::{
    coordinates::Coordinates,
    form::Field,
    render::SummaryRow,
    session::SessionController,
    workout::WorkoutId,
    GeolocationError, SessionConfig,
};
use yew::prelude::*;
use yew_router::{
    history::{BrowserHistory, History},
    Routable,
};

mod browser;
mod components;
mod leaflet_map;

/// How long the form stays out of the layout after a submission.
const FORM_SETTLE_MS: u32 = 1000;

#[derive(Clone, Debug, PartialEq, Routable)]
enum Route {
    #[at("/")]
    Default,
    #[at("/reset")]
    Reset,
    #[not_found]
    #[at("/404")]
    Invalid,
}

type Session = SessionController<LeafletMap, BrowserStorage>;

enum MainMsg {
    LocationResolved(Result<Coordinates, GeolocationError>),
    MapClicked(Coordinates),
    TypeChanged,
    Input(Field, String),
    Submit,
    FormSettled,
    RowClicked(WorkoutId),
    Reset,
    DismissNotice,
}

struct Model {
    session: Session,
    notice: Option<Notice>,
    distance_input: NodeRef,
    focus_distance: bool,
    settle_timer: Option<Timeout>,
}

impl Model {
    /// Drops the stored workouts and starts over from a fresh page load.
    fn reset(&mut self) {
        match self.session.clear_snapshot() {
            Ok(()) => {
                if let Err(e) = window().location().replace("/") {
                    error!(format!("Reload failed: {e:?}"));
                }
            }
            Err(err) => self.notice = Some(Notice::Error(err.to_string())),
        }
    }
}

impl Component for Model {
    type Message = MainMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        let config = SessionConfig::default();

        let map = LeafletMap::new(config.pan_duration);
        let mut model = Self {
            session: SessionController::new(map, BrowserStorage::local(), config),
            notice: None,
            distance_input: NodeRef::default(),
            focus_distance: false,
            settle_timer: None,
        };

        let location = BrowserHistory::new().location();
        match Route::recognize(location.path()).unwrap_or(Route::Invalid) {
            Route::Default => {}
            Route::Reset => {
                info!("Reset route");
                model.reset();
                return model;
            }
            Route::Invalid => {
                error!("Invalid route");
            }
        }

        if let Err(err) = model.session.restore_snapshot() {
            warn!(format!("Stored workouts ignored: {err}"));
            model.notice = Some(Notice::Warning(err.to_string()));
        }

        let on_position = link.clone();
        model.session.acquire_location(
            &BrowserGeolocation,
            Box::new(move |result| on_position.send_message(MainMsg::LocationResolved(result))),
        );

        model.session.map_mut().on_click(link.callback(MainMsg::MapClicked));

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            MainMsg::LocationResolved(result) => {
                if let Err(err) = self.session.location_resolved(result) {
                    error!(format!("{err}"));
                    self.notice = Some(Notice::Error(err.to_string()));
                }
            }
            MainMsg::MapClicked(at) => {
                if !self.session.on_map_clicked(at) {
                    return false;
                }
                self.focus_distance = true;
            }
            MainMsg::TypeChanged => self.session.on_input_type_changed(),
            MainMsg::Input(field, value) => self.session.set_field(field, value),
            MainMsg::Submit => {
                let values = self.session.form().values.clone();
                match self.session.submit_workout(&values) {
                    Ok(submitted) => {
                        info!(format!("Recorded workout {}", submitted.id));
                        self.notice = submitted.persist_warning.map(|warning| {
                            Notice::Warning(format!("Workout kept for this visit only: {warning}"))
                        });

                        let link = ctx.link().clone();
                        self.settle_timer = Some(Timeout::new(FORM_SETTLE_MS, move || {
                            link.send_message(MainMsg::FormSettled)
                        }));
                    }
                    Err(err) => self.notice = Some(Notice::Error(err.to_string())),
                }
            }
            MainMsg::FormSettled => self.settle_timer = None,
            MainMsg::RowClicked(id) => {
                // The map moves by itself, nothing to redraw
                self.session.on_workout_row_clicked(&id);
                return false;
            }
            MainMsg::Reset => self.reset(),
            MainMsg::DismissNotice => self.notice = None,
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let rows: Vec<SummaryRow> = self.session.workouts().iter().map(SummaryRow::from).collect();

        html! {
            <>
                <div class="sidebar">
                    <h1 class="logo">{"Mapty"}</h1>
                    if let Some(notice) = &self.notice {
                        <NoticeBanner
                            notice={notice.clone()}
                            on_dismiss={link.callback(|()| MainMsg::DismissNotice)}
                        />
                    }
                    <WorkoutForm
                        form={self.session.form().clone()}
                        settling={self.settle_timer.is_some()}
                        distance_ref={self.distance_input.clone()}
                        on_input={link.callback(|(field, value)| MainMsg::Input(field, value))}
                        on_type_change={link.callback(|()| MainMsg::TypeChanged)}
                        on_submit={link.callback(|()| MainMsg::Submit)}
                    />
                    <WorkoutList rows={rows} on_select={link.callback(MainMsg::RowClicked)} />
                    <button class="reset-btn" onclick={link.callback(|_| MainMsg::Reset)}>
                        {"Reset"}
                    </button>
                </div>
                <MapComponent container={self.session.map().container().clone()} />
            </>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if self.focus_distance {
            self.focus_distance = false;
            if let Some(input) = self.distance_input.cast::<HtmlInputElement>() {
                if let Err(e) = input.focus() {
                    warn!(format!("Could not focus distance input: {e:?}"));
                }
            }
        }
    }
}

fn main() {
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let mut builder = tracing_wasm::WASMLayerConfigBuilder::new();
        builder.set_max_level(if cfg!(debug_assertions) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        });
        let _ = tracing_subscriber::registry()
            .with(tracing_wasm::WASMLayer::new(builder.build()))
            .try_init();
    }
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    yew::Renderer::<Model>::new().render();
}
