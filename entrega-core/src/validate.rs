//! Pure validation of coordinates and required textual fields.

use crate::error::{DeliveryError, Result};

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Default label applied when a location arrives without a description.
pub const DEFAULT_LABEL: &str = "Ubicación";

pub fn has_valid_coordinates(latitud: f64, longitud: f64) -> bool {
    latitud.is_finite()
        && longitud.is_finite()
        && (MIN_LATITUDE..=MAX_LATITUDE).contains(&latitud)
        && (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitud)
}

pub fn require_valid_coordinates(latitud: f64, longitud: f64) -> Result<()> {
    if has_valid_coordinates(latitud, longitud) {
        Ok(())
    } else {
        Err(DeliveryError::Validation(
            "Las coordenadas proporcionadas son inválidas".to_string(),
        ))
    }
}

/// Trims and returns the value, rejecting missing or blank input.
pub fn require_non_blank(valor: Option<&str>, mensaje: &str) -> Result<String> {
    match valor.map(str::trim) {
        Some(limpio) if !limpio.is_empty() => Ok(limpio.to_string()),
        _ => Err(DeliveryError::Validation(mensaje.to_string())),
    }
}

/// Blank descriptions normalize to the default label.
pub fn normalize_descripcion(descripcion: Option<&str>) -> String {
    match descripcion.map(str::trim) {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => DEFAULT_LABEL.to_string(),
    }
}

/// A missing active flag means the location is active.
pub fn normalize_activa(activa: Option<bool>) -> bool {
    activa.unwrap_or(true)
}
