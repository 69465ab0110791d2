use yew::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Error(String),
    Warning(String),
}

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    pub notice: Notice,
    pub on_dismiss: Callback<()>,
}

#[function_component]
pub fn NoticeBanner(props: &Props) -> Html {
    let (class, message) = match &props.notice {
        Notice::Error(message) => ("notice notice--error", message.clone()),
        Notice::Warning(message) => ("notice notice--warning", message.clone()),
    };

    let on_dismiss = props.on_dismiss.clone();
    let onclick = Callback::from(move |_| on_dismiss.emit(()));

    html! {
        <div class={class} role="alert">
            <span class="notice__message">{message}</span>
            <button class="notice__close" {onclick}>{"✕"}</button>
        </div>
    }
}
