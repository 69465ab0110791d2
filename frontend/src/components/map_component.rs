use web_sys::{HtmlElement, Node};
use yew::prelude::*;

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    /// The element Leaflet draws into. Created once and owned by the map.
    pub container: HtmlElement,
}

#[function_component]
pub fn MapComponent(props: &Props) -> Html {
    let node: Node = props.container.clone().into();

    html! {
        <div id="map" class="map">
            {Html::VRef(node)}
        </div>
    }
}
