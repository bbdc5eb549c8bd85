//! In-memory store backend for tests and demo setups. Mirrors the
//! observable behavior of the Postgres repositories, including the
//! `(id_usuario, descripcion)` upsert key and zeroed courier stats.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use entrega_model::{
    CourierStats, LineItem, LineItemDetail, Location, Order, OrderDetail,
    OrderFilter, LIVE_TRACKING,
};

use crate::database::ports::{
    LocationStore, LocationUpsert, NewLineItem, NewOrder, OrderStore,
};
use crate::error::{DeliveryError, Result};

#[derive(Debug, Default)]
struct State {
    orders: Vec<Order>,
    items: Vec<LineItem>,
    locations: Vec<Location>,
    products: HashMap<i32, (String, Option<String>)>,
    next_order_id: i32,
    next_item_id: i32,
    next_location_id: i32,
}

/// Shared in-memory backend implementing both store traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    fail_line_items: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register product display fields used by the detail join.
    pub fn insert_product(&self, id_producto: i32, nombre: &str, imagen_url: Option<&str>) {
        let mut state = self.state.lock().expect("memory store poisoned");
        state.products.insert(
            id_producto,
            (nombre.to_string(), imagen_url.map(str::to_string)),
        );
    }

    /// Makes the next line-item batch insert fail, to exercise the
    /// create-order rollback path.
    pub fn fail_next_line_item_insert(&self) {
        self.fail_line_items.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(
        &self,
        order: &NewOrder,
        items: &[NewLineItem],
    ) -> Result<(Order, Vec<LineItem>)> {
        if self.fail_line_items.swap(false, Ordering::SeqCst) {
            // Simulated mid-transaction failure: nothing becomes visible.
            return Err(DeliveryError::Storage(
                "failed to insert line item: simulated failure".to_string(),
            ));
        }

        let mut state = self.state.lock().expect("memory store poisoned");
        state.next_order_id += 1;
        let id_pedido = state.next_order_id;

        let created = Order {
            id_pedido,
            id_cliente: order.id_cliente,
            id_delivery: order.id_delivery,
            id_ubicacion: order.id_ubicacion,
            estado: order.estado.clone(),
            total: order.total,
            direccion_entrega: order.direccion_entrega.clone(),
            metodo_pago: order.metodo_pago.clone(),
            notas: order.notas.clone(),
            fecha_pedido: Utc::now(),
            fecha_entrega: None,
        };

        let mut created_items = Vec::with_capacity(items.len());
        for item in items {
            state.next_item_id += 1;
            let line = LineItem {
                id_detalle: state.next_item_id,
                id_pedido,
                id_producto: item.id_producto,
                cantidad: item.cantidad,
                precio_unitario: item.precio_unitario,
                subtotal: item.subtotal,
            };
            state.items.push(line.clone());
            created_items.push(line);
        }
        state.orders.push(created.clone());

        Ok((created, created_items))
    }

    async fn get_order(&self, id_pedido: i32) -> Result<Option<Order>> {
        let state = self.state.lock().expect("memory store poisoned");
        Ok(state
            .orders
            .iter()
            .find(|o| o.id_pedido == id_pedido)
            .cloned())
    }

    async fn get_order_detail(&self, id_pedido: i32) -> Result<Option<OrderDetail>> {
        let state = self.state.lock().expect("memory store poisoned");
        let Some(pedido) = state
            .orders
            .iter()
            .find(|o| o.id_pedido == id_pedido)
            .cloned()
        else {
            return Ok(None);
        };

        let detalles = state
            .items
            .iter()
            .filter(|i| i.id_pedido == id_pedido)
            .map(|i| {
                let product = state.products.get(&i.id_producto);
                LineItemDetail {
                    id_producto: i.id_producto,
                    nombre_producto: product.map(|(n, _)| n.clone()),
                    imagen_url: product.and_then(|(_, img)| img.clone()),
                    cantidad: i.cantidad,
                    precio_unitario: i.precio_unitario,
                    subtotal: i.subtotal,
                }
            })
            .collect();

        Ok(Some(OrderDetail { pedido, detalles }))
    }

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let state = self.state.lock().expect("memory store poisoned");
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .filter(|o| match filter {
                OrderFilter::All => true,
                OrderFilter::ByCustomer(id) => o.id_cliente == *id,
                OrderFilter::ByStatus(estado) => o.estado == *estado,
                OrderFilter::Available => {
                    o.estado == "pendiente" && o.id_delivery.is_none()
                }
                OrderFilter::ByCourier(id) => o.id_delivery == Some(*id),
            })
            .cloned()
            .collect();

        match filter {
            OrderFilter::All | OrderFilter::ByCustomer(_) => {
                orders.sort_by(|a, b| b.fecha_pedido.cmp(&a.fecha_pedido));
            }
            _ => orders.sort_by(|a, b| a.fecha_pedido.cmp(&b.fecha_pedido)),
        }

        Ok(orders)
    }

    async fn update_status(&self, id_pedido: i32, estado: &str) -> Result<bool> {
        let mut state = self.state.lock().expect("memory store poisoned");
        let Some(order) = state
            .orders
            .iter_mut()
            .find(|o| o.id_pedido == id_pedido)
        else {
            return Ok(false);
        };
        order.estado = estado.to_string();
        if estado == "entregado" {
            order.fecha_entrega = Some(Utc::now());
        }
        Ok(true)
    }

    async fn assign_courier(&self, id_pedido: i32, id_delivery: i32) -> Result<bool> {
        let mut state = self.state.lock().expect("memory store poisoned");
        let Some(order) = state
            .orders
            .iter_mut()
            .find(|o| o.id_pedido == id_pedido)
        else {
            return Ok(false);
        };
        order.id_delivery = Some(id_delivery);
        Ok(true)
    }

    async fn courier_stats(&self, id_delivery: i32) -> Result<CourierStats> {
        let state = self.state.lock().expect("memory store poisoned");
        let today = Utc::now().date_naive();

        let mut stats = CourierStats::default();
        let mut minutes = Vec::new();

        for order in state
            .orders
            .iter()
            .filter(|o| o.id_delivery == Some(id_delivery))
        {
            let Some(delivered_at) = order.fecha_entrega else {
                continue;
            };
            if order.estado != "entregado" {
                continue;
            }
            if delivered_at.date_naive() == today {
                stats.pedidos_completados_hoy += 1;
                stats.total_generado_hoy += order.total;
            }
            let elapsed = delivered_at - order.fecha_pedido;
            minutes.push(elapsed.num_seconds() as f64 / 60.0);
        }

        if !minutes.is_empty() {
            stats.tiempo_promedio_min =
                minutes.iter().sum::<f64>() / minutes.len() as f64;
        }

        Ok(stats)
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn upsert(&self, location: &LocationUpsert) -> Result<Location> {
        let mut state = self.state.lock().expect("memory store poisoned");
        if let Some(existing) = state.locations.iter_mut().find(|l| {
            l.id_usuario == location.id_usuario
                && l.descripcion == location.descripcion
        }) {
            existing.latitud = location.latitud;
            existing.longitud = location.longitud;
            existing.direccion = location.direccion.clone();
            existing.activa = location.activa;
            existing.fecha_registro = Utc::now();
            return Ok(existing.clone());
        }

        state.next_location_id += 1;
        let created = Location {
            id_ubicacion: state.next_location_id,
            id_usuario: location.id_usuario,
            latitud: location.latitud,
            longitud: location.longitud,
            direccion: location.direccion.clone(),
            descripcion: location.descripcion.clone(),
            activa: location.activa,
            fecha_registro: Utc::now(),
        };
        state.locations.push(created.clone());
        Ok(created)
    }

    async fn upsert_live(
        &self,
        id_usuario: i32,
        latitud: f64,
        longitud: f64,
    ) -> Result<Location> {
        self.upsert(&LocationUpsert {
            id_usuario,
            latitud,
            longitud,
            direccion: None,
            descripcion: LIVE_TRACKING.to_string(),
            activa: true,
        })
        .await
    }

    async fn latest_live_for_user(&self, id_usuario: i32) -> Result<Option<Location>> {
        let state = self.state.lock().expect("memory store poisoned");
        Ok(state
            .locations
            .iter()
            .filter(|l| l.id_usuario == id_usuario && l.is_live())
            .max_by_key(|l| l.fecha_registro)
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<Location>> {
        let state = self.state.lock().expect("memory store poisoned");
        Ok(state
            .locations
            .iter()
            .filter(|l| l.activa)
            .cloned()
            .collect())
    }

    async fn for_user(&self, id_usuario: i32) -> Result<Vec<Location>> {
        let state = self.state.lock().expect("memory store poisoned");
        let mut locations: Vec<Location> = state
            .locations
            .iter()
            .filter(|l| l.id_usuario == id_usuario)
            .cloned()
            .collect();
        locations.sort_by(|a, b| b.id_ubicacion.cmp(&a.id_ubicacion));
        Ok(locations)
    }

    async fn delete(&self, id_ubicacion: i32) -> Result<bool> {
        let mut state = self.state.lock().expect("memory store poisoned");
        let before = state.locations.len();
        state.locations.retain(|l| l.id_ubicacion != id_ubicacion);
        Ok(state.locations.len() < before)
    }
}
