use std::fmt;
use std::sync::Arc;

use entrega_core::{
    LocationService, LocationStore, OrderPolicy, OrderService, OrderStore,
    TrackingService,
};

use crate::auth::TokenValidator;

/// Services and collaborators shared by every handler. Constructed once
/// at process start and passed explicitly; no process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<OrderService>,
    pub locations: Arc<LocationService>,
    pub tracking: Arc<TrackingService>,
    pub tokens: Arc<dyn TokenValidator>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires the services over any pair of store implementations.
    pub fn new(
        order_store: Arc<dyn OrderStore>,
        location_store: Arc<dyn LocationStore>,
        tokens: Arc<dyn TokenValidator>,
        policy: OrderPolicy,
    ) -> Self {
        let require_in_transit = policy.require_in_transit;
        Self {
            orders: Arc::new(OrderService::new(order_store.clone(), policy)),
            locations: Arc::new(LocationService::new(location_store.clone())),
            tracking: Arc::new(TrackingService::new(
                order_store,
                location_store,
                require_in_transit,
            )),
            tokens,
        }
    }
}
