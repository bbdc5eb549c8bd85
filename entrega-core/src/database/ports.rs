//! Store traits the services depend on. The Postgres implementations live
//! in [`super::postgres`]; an in-memory backend for tests and demos lives
//! in [`super::memory`].

use async_trait::async_trait;
use rust_decimal::Decimal;

use entrega_model::{
    CourierStats, LineItem, Location, Order, OrderDetail, OrderFilter,
};

use crate::error::Result;

/// Order row about to be inserted; ids and timestamps are generated by
/// the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub id_cliente: i32,
    pub id_delivery: Option<i32>,
    pub id_ubicacion: Option<i32>,
    pub estado: String,
    pub total: Decimal,
    pub direccion_entrega: Option<String>,
    pub metodo_pago: Option<String>,
    pub notas: Option<String>,
}

/// Line item about to be inserted alongside its parent order.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLineItem {
    pub id_producto: i32,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub subtotal: Decimal,
}

/// Normalized address-style location ready for the `(user, descriptor)`
/// upsert. Normalization happens in the service layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationUpsert {
    pub id_usuario: i32,
    pub latitud: f64,
    pub longitud: f64,
    pub direccion: Option<String>,
    pub descripcion: String,
    pub activa: bool,
}

/// Persistence for orders and their line items. Single source of truth
/// for order state.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists the order row and all line items as one atomic unit.
    /// Either everything is visible afterwards or nothing is.
    async fn create_order(
        &self,
        order: &NewOrder,
        items: &[NewLineItem],
    ) -> Result<(Order, Vec<LineItem>)>;

    async fn get_order(&self, id_pedido: i32) -> Result<Option<Order>>;

    /// Order joined with its line items and product display fields.
    async fn get_order_detail(&self, id_pedido: i32) -> Result<Option<OrderDetail>>;

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>>;

    /// Writes the status verbatim; returns whether a row matched.
    /// Reaching `entregado` stamps `fecha_entrega`.
    async fn update_status(&self, id_pedido: i32, estado: &str) -> Result<bool>;

    /// Sets the courier; returns whether a row matched.
    async fn assign_courier(&self, id_pedido: i32, id_delivery: i32) -> Result<bool>;

    /// Aggregates for a single courier; zeros when nothing matches.
    async fn courier_stats(&self, id_delivery: i32) -> Result<CourierStats>;
}

/// Persistence for location records, including the live upsert channel.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Create-or-update keyed on `(id_usuario, descripcion)`.
    async fn upsert(&self, location: &LocationUpsert) -> Result<Location>;

    /// Overwrites the courier's single `LIVE_TRACKING` row, inserting it
    /// on first use. Last write wins.
    async fn upsert_live(
        &self,
        id_usuario: i32,
        latitud: f64,
        longitud: f64,
    ) -> Result<Location>;

    /// Most recent `LIVE_TRACKING` row for a user, if any.
    async fn latest_live_for_user(&self, id_usuario: i32) -> Result<Option<Location>>;

    async fn list_active(&self) -> Result<Vec<Location>>;

    async fn for_user(&self, id_usuario: i32) -> Result<Vec<Location>>;

    /// Returns whether a row matched.
    async fn delete(&self, id_ubicacion: i32) -> Result<bool>;
}
