use chrono::{DateTime, Utc};

/// Reserved descriptor marking a courier's continuously overwritten
/// live position. At most one row per user carries this label.
pub const LIVE_TRACKING: &str = "LIVE_TRACKING";

/// A stored location row from `ubicaciones`.
///
/// Ordinary rows are address labels a user may hold several of (home,
/// office, ...); the row labelled [`LIVE_TRACKING`] is the courier's live
/// position channel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Location {
    pub id_ubicacion: i32,
    pub id_usuario: i32,
    pub latitud: f64,
    pub longitud: f64,
    pub direccion: Option<String>,
    pub descripcion: String,
    pub activa: bool,
    pub fecha_registro: DateTime<Utc>,
}

impl Location {
    pub fn is_live(&self) -> bool {
        self.descripcion == LIVE_TRACKING
    }
}

/// Point-in-time snapshot returned by the tracking read path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LivePosition {
    pub latitud: f64,
    pub longitud: f64,
}
