pub mod api;
pub mod auth;
pub mod config;
pub mod error;

pub use api::client::GraphClient;
pub use api::drive_handler::DriveHandler;
pub use auth::auth_handler::{AccessToken, GraphAuthHandler, TokenSource};
pub use auth::token_cache::TokenCache;
pub use config::GraphConfig;
pub use error::{AuthError, FetchError, GraphError};
