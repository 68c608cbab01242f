// Handlers module

pub mod list_users;
pub mod stream_messages;

pub use list_users::list_users_handler;
pub use stream_messages::stream_messages_handler;
