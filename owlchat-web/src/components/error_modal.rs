use yew::{Callback, Html, function_component, html};
use yewdux::prelude::use_store;

use crate::models::app_state::AppState;
use crate::session;

#[function_component(ErrorModal)]
pub fn error_modal() -> Html {
    let (state, dispatch) = use_store::<AppState>();
    let Some(message) = state.error.clone() else {
        return html! {};
    };
    let on_ok = Callback::from(move |_| session::dismiss_error(&dispatch));

    html! {
        <div class="modal modal-open" role="alertdialog">
            <div class="modal-box">
                <h3 class="text-lg font-bold">{"Error"}</h3>
                <p class="py-4">{ message }</p>
                <div class="modal-action">
                    <button class="btn btn-primary" type="button" onclick={on_ok}>{"Ok"}</button>
                </div>
            </div>
        </div>
    }
}
