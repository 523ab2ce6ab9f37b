//! GitHub Repository Explorer
//!
//! A small web server for looking up a GitHub user and browsing their public
//! repositories:
//! - Search by username with an existence check
//! - Repository list with language filter, sorting and paged "load more"
//!   over a list fetched once per view
//! - Single repository details
//! - English/Korean UI and light/dark theme kept in cookies

pub mod cli;
pub mod error;
pub mod github;
pub mod health;
pub mod i18n;
pub mod pipeline;
pub mod routes;
pub mod server;
pub mod session;
pub mod settings;
pub mod templates;
pub mod types;
pub mod view;

pub use error::{ExplorerError, Result, WebError};
pub use routes::AppState;
pub use server::{build_router, ServerConfig};
