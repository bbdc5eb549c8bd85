//! Address-style location management: create-or-update, enumeration,
//! and deletion. The live tracking channel lives in [`crate::tracking`].

use std::sync::Arc;

use entrega_model::Location;

use crate::database::ports::{LocationStore, LocationUpsert};
use crate::error::{DeliveryError, Result};
use crate::validate;

/// Unnormalized save request as it arrives from the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveLocation {
    pub id_usuario: i32,
    pub latitud: f64,
    pub longitud: f64,
    pub direccion: Option<String>,
    pub descripcion: Option<String>,
    pub activa: Option<bool>,
}

#[derive(Clone)]
pub struct LocationService {
    store: Arc<dyn LocationStore>,
}

impl LocationService {
    pub fn new(store: Arc<dyn LocationStore>) -> Self {
        Self { store }
    }

    /// Validates and normalizes the request, then upserts on
    /// `(id_usuario, descripcion)`.
    pub async fn save_location(&self, req: SaveLocation) -> Result<Location> {
        if req.id_usuario <= 0 {
            return Err(DeliveryError::Validation(
                "El idUsuario es obligatorio y debe ser mayor a cero".to_string(),
            ));
        }
        validate::require_valid_coordinates(req.latitud, req.longitud)?;
        let direccion = validate::require_non_blank(
            req.direccion.as_deref(),
            "La dirección es obligatoria",
        )?;

        self.store
            .upsert(&LocationUpsert {
                id_usuario: req.id_usuario,
                latitud: req.latitud,
                longitud: req.longitud,
                direccion: Some(direccion),
                descripcion: validate::normalize_descripcion(req.descripcion.as_deref()),
                activa: validate::normalize_activa(req.activa),
            })
            .await
    }

    pub async fn list_active(&self) -> Result<Vec<Location>> {
        self.store.list_active().await
    }

    pub async fn for_user(&self, id_usuario: i32) -> Result<Vec<Location>> {
        if id_usuario <= 0 {
            return Err(DeliveryError::Validation(
                "ID de usuario inválido".to_string(),
            ));
        }
        self.store.for_user(id_usuario).await
    }

    pub async fn delete(&self, id_ubicacion: i32) -> Result<()> {
        if id_ubicacion <= 0 {
            return Err(DeliveryError::Validation(
                "ID de ubicación inválido".to_string(),
            ));
        }
        if self.store.delete(id_ubicacion).await? {
            Ok(())
        } else {
            Err(DeliveryError::NotFound(
                "Ubicación no encontrada".to_string(),
            ))
        }
    }
}
