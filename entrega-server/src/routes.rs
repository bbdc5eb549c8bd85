use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{locations, orders, tracking};
use crate::AppState;

/// Full route table. `/pedidos/disponibles` registers alongside
/// `/pedidos/{id}`; static segments take priority during matching.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/pedidos", post(orders::create_pedido).get(orders::list_pedidos))
        .route("/pedidos/disponibles", get(orders::list_pedidos_disponibles))
        .route("/pedidos/cliente/{id}", get(orders::list_pedidos_por_cliente))
        .route("/pedidos/estado/{estado}", get(orders::list_pedidos_por_estado))
        .route("/pedidos/delivery/{id}", get(orders::list_pedidos_por_delivery))
        .route("/pedidos/{id}", get(orders::get_pedido))
        .route("/pedidos/{id}/estado", put(orders::update_estado))
        .route("/pedidos/{id}/asignar", put(orders::asignar_pedido))
        .route("/pedidos/{id}/tracking", get(tracking::get_pedido_tracking))
        .route("/delivery/{id}/ubicacion", put(tracking::update_delivery_ubicacion))
        .route("/delivery/stats/{id}", get(orders::delivery_stats))
        .route("/ubicaciones", post(locations::save_ubicacion))
        .route("/ubicaciones/activas", get(locations::list_ubicaciones_activas))
        .route(
            "/ubicaciones/usuario/{id}",
            get(locations::list_ubicaciones_por_usuario),
        )
        .route("/ubicaciones/{id}", delete(locations::delete_ubicacion))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
