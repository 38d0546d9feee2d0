use web_sys::HtmlInputElement;
use yew::{Callback, Html, TargetCast, function_component, html, use_state};
use yewdux::prelude::use_store;

use crate::models::app_state::AppState;
use crate::session;

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let (_, dispatch) = use_store::<AppState>();
    let username = use_state(String::new);

    let onsubmit = {
        let username = username.clone();
        Callback::from(move |event: yew::events::SubmitEvent| {
            event.prevent_default();
            session::login(dispatch.clone(), (*username).clone());
        })
    };

    let on_username_change = {
        let username = username.clone();
        Callback::from(move |event: yew::events::InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                username.set(input.value());
            }
        })
    };

    html! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-lg bg-base-100">
                <form class="card-body" onsubmit={onsubmit}>
                    <h2 class="card-title text-2xl">{"Sign in to OwlChat"}</h2>
                    <div class="form-control">
                        <label class="label" for="username">
                            <span class="label-text">{"Username"}</span>
                        </label>
                        <input
                            id="username"
                            class="input input-bordered"
                            type="text"
                            autocomplete="username"
                            value={(*username).clone()}
                            oninput={on_username_change}
                        />
                    </div>
                    <div class="form-control mt-6">
                        <button class="btn btn-primary" type="submit">{"Sign in"}</button>
                    </div>
                </form>
            </div>
        </div>
    }
}
