pub mod client;
pub mod drive_handler;
