//! Core data model definitions shared across Entrega crates.
#![allow(missing_docs)]

pub mod location;
pub mod order;
pub mod status;

pub use location::{LivePosition, Location, LIVE_TRACKING};
pub use order::{
    CourierStats, LineItem, LineItemDetail, Order, OrderDetail, OrderFilter,
};
pub use status::OrderStatus;
