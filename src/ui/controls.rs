/// Toolbar above the tree: search box, window actions and the incognito toggle

use patternfly_yew::prelude::{Button, ButtonVariant};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ToolbarProps {
    pub query: AttrValue,
    pub on_search: Callback<String>,
    pub on_sort: Callback<()>,
    pub on_dedupe: Callback<()>,
    pub on_ungroup: Callback<()>,
    pub show_incognito: bool,
    pub on_toggle_incognito: Callback<()>,
    #[prop_or(false)]
    pub disabled: bool,
}

#[function_component(Toolbar)]
pub fn toolbar(props: &ToolbarProps) -> Html {
    let on_search_input = {
        let on_search = props.on_search.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                on_search.emit(input.value());
            }
        })
    };

    let on_incognito_change = {
        let on_toggle = props.on_toggle_incognito.clone();
        Callback::from(move |_: Event| on_toggle.emit(()))
    };

    let clicked = |callback: &Callback<()>| {
        let callback = callback.clone();
        Callback::from(move |_: MouseEvent| callback.emit(()))
    };

    html! {
        <div class="toolbar">
            <div class="search-container">
                <input
                    type="text"
                    placeholder="Search tabs by title or URL..."
                    value={props.query.clone()}
                    oninput={on_search_input}
                    class="search-input"
                />
            </div>

            <div class="toolbar-actions">
                <Button
                    onclick={clicked(&props.on_sort)}
                    disabled={props.disabled}
                    variant={ButtonVariant::Secondary}
                >
                    {"Sort by URL"}
                </Button>
                <Button
                    onclick={clicked(&props.on_dedupe)}
                    disabled={props.disabled}
                    variant={ButtonVariant::Secondary}
                >
                    {"Close duplicates"}
                </Button>
                <Button
                    onclick={clicked(&props.on_ungroup)}
                    disabled={props.disabled}
                    variant={ButtonVariant::Secondary}
                >
                    {"Ungroup window"}
                </Button>
            </div>

            <label class="incognito-toggle">
                <input
                    type="checkbox"
                    checked={props.show_incognito}
                    onchange={on_incognito_change}
                />
                {"Show incognito windows"}
            </label>
        </div>
    }
}
