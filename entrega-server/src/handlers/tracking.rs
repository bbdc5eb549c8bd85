use axum::{extract::State, Json};
use serde::Deserialize;

use entrega_core::ApiResponse;
use entrega_model::{LivePosition, Location};

use crate::errors::{ApiError, ApiResult};
use crate::extract::Path;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TrackingPayload {
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
}

/// Courier heartbeat. Replaces the courier's single live row.
pub async fn update_delivery_ubicacion(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<TrackingPayload>,
) -> ApiResult<Json<ApiResponse<Location>>> {
    let (latitud, longitud) = match (body.latitud, body.longitud) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(ApiError::bad_request("Coordenadas obligatorias")),
    };

    let live = state
        .tracking
        .upsert_live_location(id, latitud, longitud)
        .await?;
    Ok(Json(ApiResponse::ok("Ubicación en vivo", live)))
}

/// Customer poll: latest known courier position for the order.
pub async fn get_pedido_tracking(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<LivePosition>>> {
    let position = state.tracking.for_order(id).await?;
    Ok(Json(ApiResponse::ok("Tracking del pedido", position)))
}
