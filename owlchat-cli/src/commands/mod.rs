pub mod channels;
pub mod completion;
pub mod config;
pub mod database;
pub mod posts;
pub mod session;
pub mod watch;
pub mod workspaces;
