use yew::{Html, function_component, html};

use crate::components::{
    channel_feed::ChannelFeedView, channel_list::ChannelList, header::Header,
    message_box::MessageBox, workspace_menu::WorkspaceMenu,
};

#[function_component(HomePage)]
pub fn home_page() -> Html {
    html! {
        <div class="flex h-screen flex-col bg-base-200">
            <Header />
            <div class="flex min-h-0 flex-1">
                <aside class="w-72 space-y-6 overflow-y-auto border-r border-base-300 bg-base-100 p-4">
                    <WorkspaceMenu />
                    <ChannelList />
                </aside>
                <main class="flex min-w-0 flex-1 flex-col bg-base-100">
                    <ChannelFeedView />
                    <MessageBox />
                </main>
            </div>
        </div>
    }
}
