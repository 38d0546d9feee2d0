use yew::{Html, function_component, html};
use yewdux::prelude::use_store;

use crate::components::error_modal::ErrorModal;
use crate::models::app_state::AppState;
use crate::pages::{home::HomePage, login::LoginPage};

#[function_component(App)]
pub fn app() -> Html {
    let (state, _) = use_store::<AppState>();

    html! {
        <>
            if state.username.is_some() {
                <HomePage />
            } else {
                <LoginPage />
            }
            <ErrorModal />
        </>
    }
}
