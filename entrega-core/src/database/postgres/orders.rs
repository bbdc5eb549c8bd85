use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use entrega_model::{
    CourierStats, LineItem, LineItemDetail, Order, OrderDetail, OrderFilter,
};

use crate::database::ports::{NewLineItem, NewOrder, OrderStore};
use crate::error::{DeliveryError, Result};

#[derive(Clone, Debug)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    pedidos_completados_hoy: Option<i64>,
    total_generado_hoy: Option<Decimal>,
    tiempo_promedio_min: Option<f64>,
}

#[async_trait]
impl OrderStore for PostgresOrderRepository {
    async fn create_order(
        &self,
        order: &NewOrder,
        items: &[NewLineItem],
    ) -> Result<(Order, Vec<LineItem>)> {
        let mut tx = self.pool().begin().await.map_err(|e| {
            DeliveryError::Storage(format!("failed to start transaction: {e}"))
        })?;

        let created: Order = sqlx::query_as(
            r#"
            INSERT INTO pedidos (
                id_cliente, id_delivery, id_ubicacion, estado, total,
                direccion_entrega, metodo_pago, notas
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(order.id_cliente)
        .bind(order.id_delivery)
        .bind(order.id_ubicacion)
        .bind(&order.estado)
        .bind(order.total)
        .bind(&order.direccion_entrega)
        .bind(&order.metodo_pago)
        .bind(&order.notas)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| DeliveryError::Storage(format!("failed to insert order: {e}")))?;

        let mut created_items = Vec::with_capacity(items.len());
        for item in items {
            let line: LineItem = sqlx::query_as(
                r#"
                INSERT INTO detalle_pedido (
                    id_pedido, id_producto, cantidad, precio_unitario, subtotal
                )
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(created.id_pedido)
            .bind(item.id_producto)
            .bind(item.cantidad)
            .bind(item.precio_unitario)
            .bind(item.subtotal)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                DeliveryError::Storage(format!("failed to insert line item: {e}"))
            })?;
            created_items.push(line);
        }

        tx.commit().await.map_err(|e| {
            DeliveryError::Storage(format!("failed to commit transaction: {e}"))
        })?;

        info!(
            id_pedido = created.id_pedido,
            items = created_items.len(),
            "order created"
        );

        Ok((created, created_items))
    }

    async fn get_order(&self, id_pedido: i32) -> Result<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT * FROM pedidos WHERE id_pedido = $1",
        )
        .bind(id_pedido)
        .fetch_optional(self.pool())
        .await?;
        Ok(order)
    }

    async fn get_order_detail(&self, id_pedido: i32) -> Result<Option<OrderDetail>> {
        let Some(pedido) = self.get_order(id_pedido).await? else {
            return Ok(None);
        };

        let detalles = sqlx::query_as::<_, LineItemDetail>(
            r#"
            SELECT dp.id_producto, p.nombre AS nombre_producto, p.imagen_url,
                   dp.cantidad, dp.precio_unitario, dp.subtotal
            FROM detalle_pedido dp
            LEFT JOIN productos p ON dp.id_producto = p.id_producto
            WHERE dp.id_pedido = $1
            ORDER BY dp.id_detalle
            "#,
        )
        .bind(id_pedido)
        .fetch_all(self.pool())
        .await?;

        Ok(Some(OrderDetail { pedido, detalles }))
    }

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let orders = match filter {
            OrderFilter::All => {
                sqlx::query_as::<_, Order>(
                    "SELECT * FROM pedidos ORDER BY fecha_pedido DESC",
                )
                .fetch_all(self.pool())
                .await?
            }
            OrderFilter::ByCustomer(id_cliente) => {
                sqlx::query_as::<_, Order>(
                    "SELECT * FROM pedidos WHERE id_cliente = $1 \
                     ORDER BY fecha_pedido DESC",
                )
                .bind(id_cliente)
                .fetch_all(self.pool())
                .await?
            }
            OrderFilter::ByStatus(estado) => {
                sqlx::query_as::<_, Order>(
                    "SELECT * FROM pedidos WHERE estado = $1 \
                     ORDER BY fecha_pedido ASC",
                )
                .bind(estado)
                .fetch_all(self.pool())
                .await?
            }
            OrderFilter::Available => {
                sqlx::query_as::<_, Order>(
                    "SELECT * FROM pedidos \
                     WHERE estado = 'pendiente' AND id_delivery IS NULL \
                     ORDER BY fecha_pedido ASC",
                )
                .fetch_all(self.pool())
                .await?
            }
            OrderFilter::ByCourier(id_delivery) => {
                sqlx::query_as::<_, Order>(
                    "SELECT * FROM pedidos WHERE id_delivery = $1 \
                     ORDER BY fecha_pedido ASC",
                )
                .bind(id_delivery)
                .fetch_all(self.pool())
                .await?
            }
        };
        Ok(orders)
    }

    async fn update_status(&self, id_pedido: i32, estado: &str) -> Result<bool> {
        // Reaching 'entregado' stamps the delivery time the stats read from.
        let result = sqlx::query(
            r#"
            UPDATE pedidos
            SET estado = $2,
                fecha_entrega = CASE
                    WHEN $2 = 'entregado' THEN NOW()
                    ELSE fecha_entrega
                END
            WHERE id_pedido = $1
            "#,
        )
        .bind(id_pedido)
        .bind(estado)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn assign_courier(&self, id_pedido: i32, id_delivery: i32) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE pedidos SET id_delivery = $2 WHERE id_pedido = $1",
        )
        .bind(id_pedido)
        .bind(id_delivery)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn courier_stats(&self, id_delivery: i32) -> Result<CourierStats> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT
                COUNT(*) FILTER (
                    WHERE estado = 'entregado'
                      AND fecha_entrega::date = CURRENT_DATE
                ) AS pedidos_completados_hoy,
                COALESCE(SUM(total) FILTER (
                    WHERE estado = 'entregado'
                      AND fecha_entrega::date = CURRENT_DATE
                ), 0) AS total_generado_hoy,
                (AVG(
                    EXTRACT(EPOCH FROM (fecha_entrega - fecha_pedido)) / 60.0
                ) FILTER (
                    WHERE estado = 'entregado'
                      AND fecha_entrega IS NOT NULL
                ))::double precision AS tiempo_promedio_min
            FROM pedidos
            WHERE id_delivery = $1
            "#,
        )
        .bind(id_delivery)
        .fetch_one(self.pool())
        .await?;

        // Zeros instead of nulls so clients never branch on absence.
        Ok(CourierStats {
            pedidos_completados_hoy: row.pedidos_completados_hoy.unwrap_or(0),
            total_generado_hoy: row.total_generado_hoy.unwrap_or_default(),
            tiempo_promedio_min: row.tiempo_promedio_min.unwrap_or(0.0),
        })
    }
}
