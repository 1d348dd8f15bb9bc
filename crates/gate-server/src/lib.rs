//! Gate server
//!
//! warp front end for the gate flow: a signed session cookie, HTML pages
//! for each view, and a background sweep of idle sessions.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod cookie;
pub mod render;
pub mod routes;
pub mod sweeper;
pub mod telemetry;

pub use config::{ConfigError, ServerConfig};
pub use cookie::{CookieSigner, COOKIE_NAME};
pub use render::HtmlRenderer;
pub use routes::{routes, security_headers, App};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
