use web_sys::HtmlInputElement;
use workout_tracker_lib::{
    form::{Field, FormState},
    workout::WorkoutType,
};
use yew::prelude::*;

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    pub form: FormState,
    /// Right after a submission the form is taken out of the layout so it
    /// does not slide away.
    pub settling: bool,
    pub distance_ref: NodeRef,
    pub on_input: Callback<(Field, String)>,
    pub on_type_change: Callback<()>,
    pub on_submit: Callback<()>,
}

#[function_component]
pub fn WorkoutForm(props: &Props) -> Html {
    let on_submit = props.on_submit.clone();
    let onsubmit = Callback::from(move |e: SubmitEvent| {
        e.prevent_default();
        on_submit.emit(());
    });

    let on_type_change = props.on_type_change.clone();
    let onchange = Callback::from(move |_: Event| on_type_change.emit(()));

    let selected = props.form.values.workout_type;
    let class = classes!("form", (!props.form.visible).then_some("hidden"));
    let style = if props.settling { "display: none" } else { "" };

    html! {
        <form {class} {style} {onsubmit}>
            <div class="form__row">
                <label class="form__label">{"Type"}</label>
                <select class="form__input form__input--type" {onchange}>
                    <option value={WorkoutType::Running.as_str()} selected={selected == WorkoutType::Running}>
                        {WorkoutType::Running.label()}
                    </option>
                    <option value={WorkoutType::Cycling.as_str()} selected={selected == WorkoutType::Cycling}>
                        {WorkoutType::Cycling.label()}
                    </option>
                </select>
            </div>
            {numeric_row(props, Field::Distance, "Distance", "km", props.distance_ref.clone())}
            {numeric_row(props, Field::Duration, "Duration", "min", NodeRef::default())}
            {numeric_row(props, Field::Cadence, "Cadence", "step/min", NodeRef::default())}
            {numeric_row(props, Field::Elevation, "Elev Gain", "meters", NodeRef::default())}
            <button class="form__btn">{"OK"}</button>
        </form>
    }
}

fn numeric_row(props: &Props, field: Field, label: &'static str, placeholder: &'static str, node_ref: NodeRef) -> Html {
    let on_input = props.on_input.clone();
    let oninput = Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        on_input.emit((field, input.value()));
    });

    let row_class = classes!("form__row", props.form.is_field_hidden(field).then_some("form__row--hidden"));
    let input_class = classes!("form__input", format!("form__input--{}", field.name()));

    html! {
        <div class={row_class}>
            <label class="form__label">{label}</label>
            <input
                class={input_class}
                {placeholder}
                value={props.form.values.get(field).to_owned()}
                ref={node_ref}
                {oninput}
            />
        </div>
    }
}
