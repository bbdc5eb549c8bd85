//! Core library for the Entrega delivery platform.
//!
//! Owns the order lifecycle (creation, status transitions, courier
//! assignment), location persistence including the per-courier live
//! tracking channel, and the Postgres access layer behind store traits.
//! The HTTP boundary lives in `entrega-server`.

pub mod api_types;
pub mod database;
pub mod error;
pub mod locations;
pub mod orders;
pub mod policy;
pub mod tracking;
pub mod validate;

pub use api_types::ApiResponse;
pub use database::ports::{LocationStore, OrderStore};
pub use database::PostgresDatabase;
pub use error::{DeliveryError, Result};
pub use locations::LocationService;
pub use orders::{OrderService, SHIPPING_SURCHARGE};
pub use policy::OrderPolicy;
pub use tracking::TrackingService;
