use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use entrega_core::locations::SaveLocation;
use entrega_core::ApiResponse;
use entrega_model::Location;

use crate::errors::{ApiError, ApiResult};
use crate::extract::Path;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UbicacionRequest {
    #[serde(default, alias = "idUsuario")]
    pub id_usuario: Option<i32>,
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub activa: Option<bool>,
}

pub async fn save_ubicacion(
    State(state): State<AppState>,
    Json(body): Json<UbicacionRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Location>>)> {
    let id_usuario = body
        .id_usuario
        .ok_or_else(|| ApiError::bad_request("El idUsuario es obligatorio"))?;
    let (latitud, longitud) = match (body.latitud, body.longitud) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return Err(ApiError::bad_request("Coordenadas obligatorias")),
    };

    let saved = state
        .locations
        .save_location(SaveLocation {
            id_usuario,
            latitud,
            longitud,
            direccion: body.direccion,
            descripcion: body.descripcion,
            activa: body.activa,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created("Ubicación guardada correctamente", saved)),
    ))
}

pub async fn list_ubicaciones_activas(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Location>>>> {
    let ubicaciones = state.locations.list_active().await?;
    Ok(Json(ApiResponse::ok("Ubicaciones activas", ubicaciones)))
}

pub async fn list_ubicaciones_por_usuario(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<Vec<Location>>>> {
    let ubicaciones = state.locations.for_user(id).await?;
    Ok(Json(ApiResponse::ok("Ubicaciones del usuario", ubicaciones)))
}

pub async fn delete_ubicacion(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.locations.delete(id).await?;
    Ok(Json(ApiResponse::message("Ubicación eliminada correctamente")))
}
