use workout_tracker_lib::{render::SummaryRow, workout::WorkoutId};
use yew::prelude::*;

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    pub rows: Vec<SummaryRow>,
    pub on_select: Callback<WorkoutId>,
}

#[function_component]
pub fn WorkoutList(props: &Props) -> Html {
    html! {
        <ul class="workouts">
            { for props.rows.iter().map(|row| workout_row(row, props.on_select.clone())) }
        </ul>
    }
}

fn workout_row(row: &SummaryRow, on_select: Callback<WorkoutId>) -> Html {
    let id = row.id.clone();
    let onclick = Callback::from(move |_: MouseEvent| on_select.emit(id.clone()));

    html! {
        <li key={row.id.to_string()} class={row.class.clone()} data-id={row.id.to_string()} {onclick}>
            <h2 class="workout__title">{row.title.clone()}</h2>
            { for row.details.iter().map(|detail| html! {
                <div class="workout__details">
                    <span class="workout__icon">{detail.icon}</span>
                    <span class="workout__value">{detail.value.clone()}</span>
                    <span class="workout__unit">{detail.unit}</span>
                </div>
            }) }
        </li>
    }
}
