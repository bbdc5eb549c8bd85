//! Order lifecycle: creation invariants, status transitions, courier
//! assignment, and per-courier aggregates.

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use entrega_model::{
    CourierStats, LineItem, Order, OrderDetail, OrderFilter, OrderStatus,
};

use crate::database::ports::{NewLineItem, NewOrder, OrderStore};
use crate::error::{DeliveryError, Result};
use crate::policy::OrderPolicy;

/// Flat fee added to every order total on top of the line-item subtotals.
pub const SHIPPING_SURCHARGE: Decimal = dec!(2.00);

/// Creation request, already free of wire-format aliases. Client-supplied
/// totals never reach this type; pricing is recomputed here.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateOrder {
    pub id_cliente: i32,
    pub id_delivery: Option<i32>,
    pub id_ubicacion: Option<i32>,
    pub direccion_entrega: Option<String>,
    pub metodo_pago: Option<String>,
    pub estado: Option<String>,
    pub notas: Option<String>,
    pub items: Vec<CreateLineItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateLineItem {
    pub id_producto: i32,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
}

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    policy: OrderPolicy,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, policy: OrderPolicy) -> Self {
        Self { store, policy }
    }

    /// Validates the request, recomputes pricing server-side, and persists
    /// the order plus line items as one atomic unit.
    pub async fn create_order(
        &self,
        req: CreateOrder,
    ) -> Result<(Order, Vec<LineItem>)> {
        if req.id_cliente <= 0 {
            return Err(DeliveryError::Validation(
                "Datos del pedido incompletos o inválidos".to_string(),
            ));
        }
        if req.items.is_empty() {
            return Err(DeliveryError::Validation(
                "El pedido no contiene productos".to_string(),
            ));
        }

        let estado = req
            .estado
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(OrderStatus::Pendiente.as_str())
            .to_string();
        if self.policy.strict_transitions {
            estado.parse::<OrderStatus>().map_err(|e| {
                DeliveryError::Validation(format!("Estado inválido: {e}"))
            })?;
        }

        let mut items = Vec::with_capacity(req.items.len());
        let mut total = Decimal::ZERO;
        for item in &req.items {
            if item.cantidad <= 0 || item.precio_unitario <= Decimal::ZERO {
                return Err(DeliveryError::Validation(
                    "Cantidad y precio unitario deben ser positivos".to_string(),
                ));
            }
            // Frozen at creation time; never recomputed afterwards.
            let subtotal = Decimal::from(item.cantidad) * item.precio_unitario;
            total += subtotal;
            items.push(NewLineItem {
                id_producto: item.id_producto,
                cantidad: item.cantidad,
                precio_unitario: item.precio_unitario,
                subtotal,
            });
        }
        total += self.policy.shipping_surcharge;

        let order = NewOrder {
            id_cliente: req.id_cliente,
            id_delivery: req.id_delivery,
            id_ubicacion: req.id_ubicacion,
            estado,
            total,
            direccion_entrega: req.direccion_entrega,
            metodo_pago: req.metodo_pago,
            notas: req.notas,
        };

        self.store.create_order(&order, &items).await
    }

    pub async fn get_order(&self, id_pedido: i32) -> Result<Order> {
        self.store
            .get_order(id_pedido)
            .await?
            .ok_or_else(|| DeliveryError::NotFound("Pedido no encontrado".to_string()))
    }

    pub async fn get_order_detail(&self, id_pedido: i32) -> Result<OrderDetail> {
        self.store
            .get_order_detail(id_pedido)
            .await?
            .ok_or_else(|| DeliveryError::NotFound("Pedido no encontrado".to_string()))
    }

    pub async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>> {
        self.store.list_orders(&filter).await
    }

    /// Writes a new status. By default any non-empty string is accepted;
    /// with `strict_transitions` the value must parse and the move must be
    /// legal per the transition table.
    pub async fn update_status(&self, id_pedido: i32, estado: &str) -> Result<()> {
        let estado = estado.trim();
        if estado.is_empty() {
            return Err(DeliveryError::Validation(
                "Debe especificar el estado".to_string(),
            ));
        }

        if self.policy.strict_transitions {
            let next: OrderStatus = estado.parse().map_err(|e| {
                DeliveryError::Validation(format!("Estado inválido: {e}"))
            })?;
            let current = self.get_order(id_pedido).await?;
            match current.estado.parse::<OrderStatus>() {
                Ok(from) if !from.can_transition_to(next) => {
                    return Err(DeliveryError::Validation(format!(
                        "Transición de estado ilegal: {from} → {next}"
                    )));
                }
                Ok(_) => {}
                // Legacy free-text rows predate the transition table.
                Err(_) => warn!(
                    id_pedido,
                    estado = %current.estado,
                    "status not in transition table, allowing update"
                ),
            }
        }

        if self.store.update_status(id_pedido, estado).await? {
            Ok(())
        } else {
            Err(DeliveryError::NotFound("Pedido no encontrado".to_string()))
        }
    }

    /// Assignment and status are independent axes: this never touches
    /// `estado`.
    pub async fn assign_courier(&self, id_pedido: i32, id_delivery: i32) -> Result<()> {
        if id_delivery <= 0 {
            return Err(DeliveryError::Validation(
                "Debe especificar el repartidor".to_string(),
            ));
        }
        if self.store.assign_courier(id_pedido, id_delivery).await? {
            Ok(())
        } else {
            Err(DeliveryError::NotFound("Pedido no encontrado".to_string()))
        }
    }

    pub async fn courier_stats(&self, id_delivery: i32) -> Result<CourierStats> {
        self.store.courier_stats(id_delivery).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    fn service(policy: OrderPolicy) -> (Arc<MemoryStore>, OrderService) {
        let store = Arc::new(MemoryStore::new());
        let service = OrderService::new(store.clone(), policy);
        (store, service)
    }

    fn basic_request() -> CreateOrder {
        CreateOrder {
            id_cliente: 5,
            id_delivery: None,
            id_ubicacion: None,
            direccion_entrega: Some("Av. Siempre Viva 742".to_string()),
            metodo_pago: Some("efectivo".to_string()),
            estado: None,
            notas: None,
            items: vec![CreateLineItem {
                id_producto: 1,
                cantidad: 2,
                precio_unitario: dec!(3.00),
            }],
        }
    }

    #[tokio::test]
    async fn total_is_subtotals_plus_surcharge() {
        let (_, service) = service(OrderPolicy::default());
        let (order, items) = service.create_order(basic_request()).await.unwrap();

        assert_eq!(order.total, dec!(8.00));
        assert_eq!(order.estado, "pendiente");
        assert_eq!(order.id_delivery, None);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].subtotal, dec!(6.00));
    }

    #[tokio::test]
    async fn subtotals_are_recomputed_per_line() {
        let (_, service) = service(OrderPolicy::default());
        let mut req = basic_request();
        req.items = vec![
            CreateLineItem {
                id_producto: 1,
                cantidad: 3,
                precio_unitario: dec!(1.50),
            },
            CreateLineItem {
                id_producto: 2,
                cantidad: 1,
                precio_unitario: dec!(10.25),
            },
        ];
        let (order, items) = service.create_order(req).await.unwrap();

        assert_eq!(items[0].subtotal, dec!(4.50));
        assert_eq!(items[1].subtotal, dec!(10.25));
        assert_eq!(order.total, dec!(16.75));
    }

    #[tokio::test]
    async fn empty_line_items_rejected_and_nothing_persisted() {
        let (store, service) = service(OrderPolicy::default());
        let mut req = basic_request();
        req.items.clear();

        let err = service.create_order(req).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Validation(_)));

        let all = store.list_orders(&OrderFilter::All).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn non_positive_quantity_or_price_rejected() {
        let (_, service) = service(OrderPolicy::default());

        let mut req = basic_request();
        req.items[0].cantidad = 0;
        assert!(matches!(
            service.create_order(req).await,
            Err(DeliveryError::Validation(_))
        ));

        let mut req = basic_request();
        req.items[0].precio_unitario = dec!(-1.00);
        assert!(matches!(
            service.create_order(req).await,
            Err(DeliveryError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn failed_line_item_insert_leaves_no_order_visible() {
        let (store, service) = service(OrderPolicy::default());
        store.fail_next_line_item_insert();

        let err = service.create_order(basic_request()).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Storage(_)));

        let all = store.list_orders(&OrderFilter::All).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn assignment_keeps_status_pendiente() {
        let (_, service) = service(OrderPolicy::default());
        let (order, _) = service.create_order(basic_request()).await.unwrap();

        service.assign_courier(order.id_pedido, 9).await.unwrap();

        let by_courier = service
            .list_orders(OrderFilter::ByCourier(9))
            .await
            .unwrap();
        assert_eq!(by_courier.len(), 1);
        assert_eq!(by_courier[0].id_pedido, order.id_pedido);
        assert_eq!(by_courier[0].estado, "pendiente");
    }

    #[tokio::test]
    async fn assigned_orders_leave_the_available_pool() {
        let (_, service) = service(OrderPolicy::default());
        let (order, _) = service.create_order(basic_request()).await.unwrap();

        assert_eq!(
            service.list_orders(OrderFilter::Available).await.unwrap().len(),
            1
        );
        service.assign_courier(order.id_pedido, 9).await.unwrap();
        assert!(service
            .list_orders(OrderFilter::Available)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn update_status_unknown_order_is_not_found() {
        let (_, service) = service(OrderPolicy::default());
        let err = service.update_status(999, "en camino").await.unwrap_err();
        assert!(matches!(err, DeliveryError::NotFound(_)));

        let err = service.assign_courier(999, 9).await.unwrap_err();
        assert!(matches!(err, DeliveryError::NotFound(_)));
    }

    #[tokio::test]
    async fn permissive_mode_accepts_any_non_empty_status() {
        let (_, service) = service(OrderPolicy::default());
        let (order, _) = service.create_order(basic_request()).await.unwrap();

        service
            .update_status(order.id_pedido, "en revisión")
            .await
            .unwrap();
        let stored = service.get_order(order.id_pedido).await.unwrap();
        assert_eq!(stored.estado, "en revisión");

        let err = service.update_status(order.id_pedido, "  ").await.unwrap_err();
        assert!(matches!(err, DeliveryError::Validation(_)));
    }

    #[tokio::test]
    async fn strict_mode_enforces_transition_table() {
        let policy = OrderPolicy {
            strict_transitions: true,
            ..OrderPolicy::default()
        };
        let (_, service) = service(policy);
        let (order, _) = service.create_order(basic_request()).await.unwrap();

        // pendiente → entregado skips a state
        let err = service
            .update_status(order.id_pedido, "entregado")
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Validation(_)));

        // unknown status string
        let err = service
            .update_status(order.id_pedido, "despachado")
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Validation(_)));

        // legal path works
        service
            .update_status(order.id_pedido, "en camino")
            .await
            .unwrap();
        service
            .update_status(order.id_pedido, "entregado")
            .await
            .unwrap();

        // terminal state admits nothing
        let err = service
            .update_status(order.id_pedido, "cancelado")
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::Validation(_)));
    }

    #[tokio::test]
    async fn courier_stats_zero_when_no_rows() {
        let (_, service) = service(OrderPolicy::default());
        let stats = service.courier_stats(42).await.unwrap();
        assert_eq!(stats.pedidos_completados_hoy, 0);
        assert_eq!(stats.total_generado_hoy, Decimal::ZERO);
        assert_eq!(stats.tiempo_promedio_min, 0.0);
    }

    #[tokio::test]
    async fn courier_stats_count_todays_deliveries() {
        let (_, service) = service(OrderPolicy::default());
        let (order, _) = service.create_order(basic_request()).await.unwrap();
        service.assign_courier(order.id_pedido, 9).await.unwrap();
        service
            .update_status(order.id_pedido, "entregado")
            .await
            .unwrap();

        let stats = service.courier_stats(9).await.unwrap();
        assert_eq!(stats.pedidos_completados_hoy, 1);
        assert_eq!(stats.total_generado_hoy, dec!(8.00));
    }
}
