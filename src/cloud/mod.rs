mod hub;
pub mod messages;
mod store;
mod ws_handler;

pub use hub::CloudHub;
pub use ws_handler::handle_connection;
