use chrono::{DateTime, Local};
use shared::scheduler::parse_schedule;
use web_sys::HtmlInputElement;
use yew::{Callback, Html, Properties, TargetCast, function_component, html, use_state};

#[derive(Properties, PartialEq, Clone)]
pub struct SchedulePickerProps {
    /// `None` means send now
    pub on_pick: Callback<Option<DateTime<Local>>>,
    pub on_close: Callback<()>,
}

/// Modal for choosing when the next post is sent.
#[function_component(SchedulePicker)]
pub fn schedule_picker(props: &SchedulePickerProps) -> Html {
    let date = use_state(String::new);
    let time = use_state(String::new);
    let error = use_state(|| None::<String>);

    let on_date = {
        let date = date.clone();
        Callback::from(move |event: yew::events::InputEvent| {
            let target: HtmlInputElement = event.target_unchecked_into();
            date.set(target.value());
        })
    };

    let on_time = {
        let time = time.clone();
        Callback::from(move |event: yew::events::InputEvent| {
            let target: HtmlInputElement = event.target_unchecked_into();
            time.set(target.value());
        })
    };

    let on_confirm = {
        let date = date.clone();
        let time = time.clone();
        let error = error.clone();
        let on_pick = props.on_pick.clone();
        Callback::from(move |event: yew::events::SubmitEvent| {
            event.prevent_default();
            event.stop_propagation();
            match parse_schedule(&date, &time, Local::now()) {
                Ok(at) => {
                    error.set(None);
                    on_pick.emit(Some(at));
                }
                Err(err) => error.set(Some(err.user_message())),
            }
        })
    };

    let on_now = {
        let on_pick = props.on_pick.clone();
        Callback::from(move |_| on_pick.emit(None))
    };

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };

    html! {
        <div class="modal modal-open">
            <form class="modal-box space-y-3" onsubmit={on_confirm}>
                <h3 class="text-lg font-bold">{"Schedule post"}</h3>
                if let Some(message) = (*error).clone() {
                    <div class="alert alert-error"><span>{ message }</span></div>
                }
                <div class="flex gap-2">
                    <input
                        class="input input-bordered flex-1"
                        type="date"
                        value={(*date).clone()}
                        oninput={on_date}
                    />
                    <input
                        class="input input-bordered flex-1"
                        type="time"
                        value={(*time).clone()}
                        oninput={on_time}
                    />
                </div>
                <div class="modal-action">
                    <button class="btn btn-ghost" type="button" onclick={on_cancel}>{"Cancel"}</button>
                    <button class="btn btn-outline" type="button" onclick={on_now}>{"Send now"}</button>
                    <button class="btn btn-primary" type="submit">{"Schedule"}</button>
                </div>
            </form>
        </div>
    }
}
