use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use entrega_core::orders::{CreateLineItem, CreateOrder};
use entrega_core::ApiResponse;
use entrega_model::{CourierStats, LineItem, Order, OrderDetail, OrderFilter};

use crate::auth::bearer_token;
use crate::errors::{ApiError, ApiResult};
use crate::extract::Path;
use crate::AppState;

/// Create-order request. Accepts both snake_case and camelCase field
/// names; the domain model stays alias-free. `total` and per-line
/// `subtotal` are accepted for wire compatibility and ignored — pricing
/// is recomputed server-side.
#[derive(Debug, Deserialize)]
pub struct PedidoPayload {
    #[serde(alias = "idCliente")]
    pub id_cliente: i32,
    #[serde(default, alias = "idDelivery")]
    pub id_delivery: Option<i32>,
    #[serde(default, alias = "idUbicacion")]
    pub id_ubicacion: Option<i32>,
    #[serde(default, alias = "direccionEntrega")]
    pub direccion_entrega: Option<String>,
    #[serde(default, alias = "metodoPago")]
    pub metodo_pago: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub notas: Option<String>,
    #[serde(default, alias = "monto_total", alias = "montoTotal")]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub productos: Vec<PedidoDetallePayload>,
}

#[derive(Debug, Deserialize)]
pub struct PedidoDetallePayload {
    #[serde(alias = "idProducto")]
    pub id_producto: i32,
    pub cantidad: i32,
    #[serde(alias = "precioUnitario")]
    pub precio_unitario: Decimal,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct EstadoUpdateRequest {
    pub estado: String,
}

#[derive(Debug, Deserialize)]
pub struct AsignarPedidoRequest {
    #[serde(default, alias = "idDelivery")]
    pub id_delivery: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CreatedOrder {
    pub pedido: Order,
    pub detalles: Vec<LineItem>,
}

pub async fn create_pedido(
    State(state): State<AppState>,
    Json(body): Json<PedidoPayload>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CreatedOrder>>)> {
    let request = CreateOrder {
        id_cliente: body.id_cliente,
        id_delivery: body.id_delivery,
        id_ubicacion: body.id_ubicacion,
        direccion_entrega: body.direccion_entrega,
        metodo_pago: body.metodo_pago,
        estado: body.estado,
        notas: body.notas,
        items: body
            .productos
            .into_iter()
            .map(|p| CreateLineItem {
                id_producto: p.id_producto,
                cantidad: p.cantidad,
                precio_unitario: p.precio_unitario,
            })
            .collect(),
    };

    let (pedido, detalles) = state.orders.create_order(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(
            "Pedido creado correctamente",
            CreatedOrder { pedido, detalles },
        )),
    ))
}

pub async fn get_pedido(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<OrderDetail>>> {
    let detail = state.orders.get_order_detail(id).await?;
    Ok(Json(ApiResponse::ok("Pedido obtenido correctamente", detail)))
}

pub async fn list_pedidos(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Order>>>> {
    let pedidos = state.orders.list_orders(OrderFilter::All).await?;
    Ok(Json(ApiResponse::ok("Pedidos obtenidos correctamente", pedidos)))
}

pub async fn list_pedidos_por_cliente(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<Vec<Order>>>> {
    let pedidos = state
        .orders
        .list_orders(OrderFilter::ByCustomer(id))
        .await?;
    Ok(Json(ApiResponse::ok("Pedidos por cliente obtenidos", pedidos)))
}

pub async fn list_pedidos_por_estado(
    State(state): State<AppState>,
    Path(estado): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<Order>>>> {
    let pedidos = state
        .orders
        .list_orders(OrderFilter::ByStatus(estado))
        .await?;
    Ok(Json(ApiResponse::ok("Pedidos por estado obtenidos", pedidos)))
}

/// Couriers browsing work: pending orders with no assigned courier.
/// Gated on a courier-role bearer token.
pub async fn list_pedidos_disponibles(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ApiResponse<Vec<Order>>>> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Token requerido"))?;
    let user = state
        .tokens
        .validate(token)
        .await
        .ok_or_else(|| ApiError::unauthorized("Token inválido"))?;
    if !user.is_courier() {
        return Err(ApiError::forbidden("Solo repartidores pueden ver pedidos disponibles"));
    }

    let pedidos = state.orders.list_orders(OrderFilter::Available).await?;
    Ok(Json(ApiResponse::ok("Pedidos disponibles", pedidos)))
}

pub async fn list_pedidos_por_delivery(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<Vec<Order>>>> {
    let pedidos = state
        .orders
        .list_orders(OrderFilter::ByCourier(id))
        .await?;
    Ok(Json(ApiResponse::ok("Pedidos por delivery", pedidos)))
}

pub async fn update_estado(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<EstadoUpdateRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    state.orders.update_status(id, &body.estado).await?;
    Ok(Json(ApiResponse::message("Estado actualizado correctamente")))
}

pub async fn asignar_pedido(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<AsignarPedidoRequest>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let id_delivery = body
        .id_delivery
        .ok_or_else(|| ApiError::bad_request("Debe especificar el repartidor"))?;
    state.orders.assign_courier(id, id_delivery).await?;
    Ok(Json(ApiResponse::message("Pedido asignado correctamente")))
}

pub async fn delivery_stats(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ApiResponse<CourierStats>>> {
    let stats = state.orders.courier_stats(id).await?;
    Ok(Json(ApiResponse::ok("Estadísticas delivery", stats)))
}
