//! intake_core - shared pieces of the stability-protocol intake tool:
//! - `config` - file-then-env layered settings
//! - `paths` - well-known locations under the app directory
//! - `form` - per-site field model, option lists, and the replacements mapping

pub mod config;
pub mod form;
pub mod paths;

pub use config::Config;
pub use form::submission::{FormSubmission, MultiSelect, Replacements};
pub use form::Site;
