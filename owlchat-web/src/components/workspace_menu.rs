use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::{Callback, Html, TargetCast, function_component, html, use_state};
use yewdux::prelude::use_store;

use crate::models::app_state::AppState;
use crate::session;

/// Workspace dropdown with refresh, create, and delete actions.
#[function_component(WorkspaceMenu)]
pub fn workspace_menu() -> Html {
    let (state, dispatch) = use_store::<AppState>();
    let creating = use_state(|| false);
    let deleting = use_state(|| false);
    let draft = use_state(String::new);
    let draft_error = use_state(|| None::<String>);

    let on_select = {
        let dispatch = dispatch.clone();
        Callback::from(move |event: yew::events::Event| {
            let target: HtmlSelectElement = event.target_unchecked_into();
            let value = target.value();
            if !value.is_empty() {
                session::select_workspace(dispatch.clone(), value);
            }
        })
    };

    let on_refresh = {
        let dispatch = dispatch.clone();
        Callback::from(move |_| session::refresh_workspaces(dispatch.clone()))
    };

    let open_create = {
        let creating = creating.clone();
        let draft = draft.clone();
        let draft_error = draft_error.clone();
        Callback::from(move |_| {
            draft.set(String::new());
            draft_error.set(None);
            creating.set(true);
        })
    };

    let open_delete = {
        let deleting = deleting.clone();
        Callback::from(move |_| deleting.set(true))
    };

    let on_draft = {
        let draft = draft.clone();
        Callback::from(move |event: yew::events::InputEvent| {
            let target: HtmlInputElement = event.target_unchecked_into();
            draft.set(target.value());
        })
    };

    let on_create = {
        let dispatch = dispatch.clone();
        let creating = creating.clone();
        let draft = draft.clone();
        let draft_error = draft_error.clone();
        Callback::from(move |event: yew::events::SubmitEvent| {
            event.prevent_default();
            match session::check_workspace_name(&dispatch, &draft) {
                Ok(name) => {
                    creating.set(false);
                    session::create_workspace(dispatch.clone(), name);
                }
                Err(err) => draft_error.set(Some(err.user_message())),
            }
        })
    };

    let on_delete = {
        let dispatch = dispatch.clone();
        let deleting = deleting.clone();
        Callback::from(move |_| {
            deleting.set(false);
            session::delete_workspace(dispatch.clone());
        })
    };

    let close = {
        let creating = creating.clone();
        let deleting = deleting.clone();
        Callback::from(move |_| {
            creating.set(false);
            deleting.set(false);
        })
    };

    let current = state.workspace.clone().unwrap_or_default();

    html! {
        <div class="space-y-2">
            <div class="flex items-center justify-between">
                <h2 class="text-sm font-semibold uppercase tracking-wide">{"Workspaces"}</h2>
                <button class="btn btn-ghost btn-xs" type="button" onclick={on_refresh}>{"Refresh"}</button>
            </div>
            <select class="select select-bordered select-sm w-full" onchange={on_select}>
                <option value="" disabled=true selected={current.is_empty()}>{"Select a workspace"}</option>
                { for state.workspaces.iter().map(|name| html! {
                    <option value={name.clone()} selected={*name == current}>{ name.clone() }</option>
                }) }
            </select>
            <div class="flex gap-2">
                <button class="btn btn-primary btn-xs" type="button" onclick={open_create}>{"New"}</button>
                <button
                    class="btn btn-error btn-xs"
                    type="button"
                    disabled={state.workspace.is_none()}
                    onclick={open_delete}
                >
                    {"Delete"}
                </button>
            </div>

            if *creating {
                <div class="modal modal-open">
                    <form class="modal-box space-y-3" onsubmit={on_create}>
                        <h3 class="text-lg font-bold">{"Create workspace"}</h3>
                        if let Some(message) = (*draft_error).clone() {
                            <div class="alert alert-error"><span>{ message }</span></div>
                        }
                        <input
                            class="input input-bordered w-full"
                            placeholder="Workspace name"
                            value={(*draft).clone()}
                            oninput={on_draft}
                        />
                        <div class="modal-action">
                            <button class="btn btn-ghost" type="button" onclick={close.clone()}>{"Cancel"}</button>
                            <button class="btn btn-primary" type="submit">{"Create"}</button>
                        </div>
                    </form>
                </div>
            }

            if *deleting {
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class="text-lg font-bold">{"Delete workspace"}</h3>
                        <p class="py-4">{ format!("Delete workspace \"{current}\" and all of its channels?") }</p>
                        <div class="modal-action">
                            <button class="btn btn-ghost" type="button" onclick={close}>{"Cancel"}</button>
                            <button class="btn btn-error" type="button" onclick={on_delete}>{"Delete"}</button>
                        </div>
                    </div>
                </div>
            }
        </div>
    }
}
