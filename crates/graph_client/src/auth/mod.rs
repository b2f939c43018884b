pub mod auth_handler;
pub mod token_cache;
