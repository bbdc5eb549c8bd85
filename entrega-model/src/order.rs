use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// An order header as stored in `pedidos`.
///
/// `total` is always computed server-side; the status stays free text at
/// this layer (see [`crate::OrderStatus`] for the typed view).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id_pedido: i32,
    pub id_cliente: i32,
    pub id_delivery: Option<i32>,
    pub id_ubicacion: Option<i32>,
    pub estado: String,
    pub total: Decimal,
    pub direccion_entrega: Option<String>,
    pub metodo_pago: Option<String>,
    pub notas: Option<String>,
    pub fecha_pedido: DateTime<Utc>,
    pub fecha_entrega: Option<DateTime<Utc>>,
}

/// One product line within an order, price frozen at creation time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LineItem {
    pub id_detalle: i32,
    pub id_pedido: i32,
    pub id_producto: i32,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub subtotal: Decimal,
}

/// Line item joined with product display fields for presentation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LineItemDetail {
    pub id_producto: i32,
    pub nombre_producto: Option<String>,
    pub imagen_url: Option<String>,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
    pub subtotal: Decimal,
}

/// Order header together with its presentation-ready line items.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderDetail {
    pub pedido: Order,
    pub detalles: Vec<LineItemDetail>,
}

/// Selection criteria for order listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderFilter {
    All,
    /// Orders placed by one customer, newest first.
    ByCustomer(i32),
    /// Orders in a given (free-text) status, oldest first.
    ByStatus(String),
    /// Pending orders with no assigned courier, oldest first.
    Available,
    /// Orders assigned to one courier, oldest first.
    ByCourier(i32),
}

/// Per-courier delivery aggregates; zeroed when no rows match.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CourierStats {
    pub pedidos_completados_hoy: i64,
    pub total_generado_hoy: Decimal,
    pub tiempo_promedio_min: f64,
}
