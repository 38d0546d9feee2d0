pub mod channel_feed;
pub mod channel_list;
pub mod error_modal;
pub mod header;
pub mod markup_view;
pub mod message_box;
pub mod post_node;
pub mod reaction_bar;
pub mod schedule_picker;
pub mod workspace_menu;
