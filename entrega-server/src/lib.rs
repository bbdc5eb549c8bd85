//! REST API boundary for the Entrega delivery platform.
//!
//! Thin request/response mapping over `entrega-core`: payload types with
//! their snake/camel alias tables, the response envelope adapter, the
//! bearer-token gate, and the router.

pub mod auth;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use infra::config::Config;
pub use routes::build_router;
