use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use entrega_model::{Location, LIVE_TRACKING};

use crate::database::ports::{LocationStore, LocationUpsert};
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct PostgresLocationRepository {
    pool: PgPool,
}

impl PostgresLocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LocationStore for PostgresLocationRepository {
    async fn upsert(&self, location: &LocationUpsert) -> Result<Location> {
        let saved = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO ubicaciones (
                id_usuario, latitud, longitud, direccion, descripcion,
                activa, fecha_registro
            )
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (id_usuario, descripcion) DO UPDATE
            SET latitud = EXCLUDED.latitud,
                longitud = EXCLUDED.longitud,
                direccion = EXCLUDED.direccion,
                activa = EXCLUDED.activa,
                fecha_registro = EXCLUDED.fecha_registro
            RETURNING *
            "#,
        )
        .bind(location.id_usuario)
        .bind(location.latitud)
        .bind(location.longitud)
        .bind(&location.direccion)
        .bind(&location.descripcion)
        .bind(location.activa)
        .fetch_one(self.pool())
        .await?;
        Ok(saved)
    }

    async fn upsert_live(
        &self,
        id_usuario: i32,
        latitud: f64,
        longitud: f64,
    ) -> Result<Location> {
        // The (id_usuario, descripcion) conflict target is the
        // compare-and-swap that keeps exactly one live row per courier.
        let saved = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO ubicaciones (
                id_usuario, latitud, longitud, descripcion, activa,
                fecha_registro
            )
            VALUES ($1, $2, $3, $4, TRUE, NOW())
            ON CONFLICT (id_usuario, descripcion) DO UPDATE
            SET latitud = EXCLUDED.latitud,
                longitud = EXCLUDED.longitud,
                fecha_registro = EXCLUDED.fecha_registro
            RETURNING *
            "#,
        )
        .bind(id_usuario)
        .bind(latitud)
        .bind(longitud)
        .bind(LIVE_TRACKING)
        .fetch_one(self.pool())
        .await?;

        debug!(id_usuario, latitud, longitud, "live location updated");
        Ok(saved)
    }

    async fn latest_live_for_user(&self, id_usuario: i32) -> Result<Option<Location>> {
        let location = sqlx::query_as::<_, Location>(
            r#"
            SELECT * FROM ubicaciones
            WHERE id_usuario = $1 AND descripcion = $2
            ORDER BY fecha_registro DESC
            LIMIT 1
            "#,
        )
        .bind(id_usuario)
        .bind(LIVE_TRACKING)
        .fetch_optional(self.pool())
        .await?;
        Ok(location)
    }

    async fn list_active(&self) -> Result<Vec<Location>> {
        let locations = sqlx::query_as::<_, Location>(
            "SELECT * FROM ubicaciones WHERE activa = TRUE",
        )
        .fetch_all(self.pool())
        .await?;
        Ok(locations)
    }

    async fn for_user(&self, id_usuario: i32) -> Result<Vec<Location>> {
        let locations = sqlx::query_as::<_, Location>(
            "SELECT * FROM ubicaciones WHERE id_usuario = $1 \
             ORDER BY id_ubicacion DESC",
        )
        .bind(id_usuario)
        .fetch_all(self.pool())
        .await?;
        Ok(locations)
    }

    async fn delete(&self, id_ubicacion: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM ubicaciones WHERE id_ubicacion = $1")
            .bind(id_ubicacion)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
