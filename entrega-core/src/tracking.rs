//! Live-location tracking: the courier-side upsert channel and the
//! customer-side read that joins order → courier → latest live row.
//!
//! Tracking is pull-based; reads are point-in-time snapshots and clients
//! re-poll for updates.

use std::sync::Arc;

use entrega_model::{LivePosition, Location, OrderStatus};

use crate::database::ports::{LocationStore, OrderStore};
use crate::error::{DeliveryError, Result};
use crate::validate;

#[derive(Clone)]
pub struct TrackingService {
    orders: Arc<dyn OrderStore>,
    locations: Arc<dyn LocationStore>,
    /// When set, only orders currently `en camino` expose tracking.
    require_in_transit: bool,
}

impl TrackingService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        locations: Arc<dyn LocationStore>,
        require_in_transit: bool,
    ) -> Self {
        Self {
            orders,
            locations,
            require_in_transit,
        }
    }

    /// Overwrites the courier's single live row. Overlapping calls from
    /// the same courier are last-write-wins at the storage layer.
    pub async fn upsert_live_location(
        &self,
        id_delivery: i32,
        latitud: f64,
        longitud: f64,
    ) -> Result<Location> {
        if id_delivery <= 0 {
            return Err(DeliveryError::Validation(
                "El identificador del repartidor es inválido".to_string(),
            ));
        }
        validate::require_valid_coordinates(latitud, longitud)?;
        self.locations
            .upsert_live(id_delivery, latitud, longitud)
            .await
    }

    /// Resolves the current live position for an order.
    pub async fn for_order(&self, id_pedido: i32) -> Result<LivePosition> {
        let order = self
            .orders
            .get_order(id_pedido)
            .await?
            .ok_or_else(|| DeliveryError::NotFound("Pedido no encontrado".to_string()))?;

        let id_delivery = order.id_delivery.ok_or_else(|| {
            DeliveryError::NotFound("No hay tracking activo para el pedido".to_string())
        })?;

        if self.require_in_transit && order.estado != OrderStatus::EnCamino.as_str() {
            return Err(DeliveryError::NotFound(
                "No hay tracking activo para el pedido".to_string(),
            ));
        }

        let live = self
            .locations
            .latest_live_for_user(id_delivery)
            .await?
            .ok_or_else(|| {
                DeliveryError::NotFound(
                    "No hay tracking activo para el pedido".to_string(),
                )
            })?;

        Ok(LivePosition {
            latitud: live.latitud,
            longitud: live.longitud,
        })
    }
}
