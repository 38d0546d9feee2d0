use yew::{Callback, Html, function_component, html};
use yewdux::prelude::use_store;

use crate::models::app_state::AppState;
use crate::session;

#[function_component(Header)]
pub fn header() -> Html {
    let (state, dispatch) = use_store::<AppState>();
    let on_logout = Callback::from(move |_| session::logout(dispatch.clone()));

    html! {
        <div class="navbar bg-base-100 shadow-sm">
            <div class="flex-1">
                <span class="btn btn-ghost text-xl">{"OwlChat"}</span>
            </div>
            if let Some(username) = state.username.clone() {
                <div class="flex-none items-center gap-2">
                    <span class="text-sm">{ format!("Logged in as {username}") }</span>
                    <button class="btn btn-outline btn-sm" type="button" onclick={on_logout}>
                        {"Logout"}
                    </button>
                </div>
            }
        </div>
    }
}
