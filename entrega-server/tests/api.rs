//! End-to-end HTTP tests over the full router with an in-memory store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use entrega_core::database::memory::MemoryStore;
use entrega_core::OrderPolicy;
use entrega_server::auth::{AuthUser, TokenValidator};
use entrega_server::{build_router, AppState};

struct StaticTokens(HashMap<&'static str, AuthUser>);

#[async_trait]
impl TokenValidator for StaticTokens {
    async fn validate(&self, token: &str) -> Option<AuthUser> {
        self.0.get(token).cloned()
    }
}

fn tokens() -> Arc<StaticTokens> {
    let mut map = HashMap::new();
    map.insert(
        "courier-token",
        AuthUser {
            id_usuario: 9,
            rol: "delivery".to_string(),
        },
    );
    map.insert(
        "client-token",
        AuthUser {
            id_usuario: 5,
            rol: "cliente".to_string(),
        },
    );
    Arc::new(StaticTokens(map))
}

fn server_with(policy: OrderPolicy) -> (Arc<MemoryStore>, TestServer) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), store.clone(), tokens(), policy);
    let server = TestServer::new(build_router(state)).unwrap();
    (store, server)
}

fn server() -> (Arc<MemoryStore>, TestServer) {
    server_with(OrderPolicy::default())
}

fn pedido_body() -> Value {
    json!({
        "id_cliente": 5,
        "direccion_entrega": "Av. Siempre Viva 742",
        "metodo_pago": "efectivo",
        "productos": [
            { "id_producto": 1, "cantidad": 2, "precio_unitario": 3.00, "subtotal": 6.00 }
        ]
    })
}

async fn create_pedido(server: &TestServer) -> i32 {
    let response = server.post("/pedidos").json(&pedido_body()).await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    body["data"]["pedido"]["id_pedido"].as_i64().unwrap() as i32
}

#[tokio::test]
async fn create_order_recomputes_total_server_side() {
    let (_, server) = server();

    let mut body = pedido_body();
    // Client-supplied totals are ignored.
    body["total"] = json!(999.99);

    let response = server.post("/pedidos").json(&body).await;
    response.assert_status(StatusCode::CREATED);

    let envelope: Value = response.json();
    assert_eq!(envelope["status"], 201);
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["message"], "Pedido creado correctamente");

    let pedido = &envelope["data"]["pedido"];
    assert_eq!(pedido["estado"], "pendiente");
    assert_eq!(pedido["total"], json!(8.0)); // 2 × 3.00 + 2.00 surcharge
    assert!(pedido["id_delivery"].is_null());
    assert!(pedido["fecha_entrega"].is_null());

    let detalles = envelope["data"]["detalles"].as_array().unwrap();
    assert_eq!(detalles.len(), 1);
    assert_eq!(detalles[0]["subtotal"], json!(6.0));
}

#[tokio::test]
async fn create_order_accepts_camel_case_aliases() {
    let (_, server) = server();

    let response = server
        .post("/pedidos")
        .json(&json!({
            "idCliente": 5,
            "direccionEntrega": "Av. Siempre Viva 742",
            "metodoPago": "tarjeta",
            "productos": [
                { "idProducto": 1, "cantidad": 1, "precioUnitario": 4.50 }
            ]
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let envelope: Value = response.json();
    assert_eq!(envelope["data"]["pedido"]["total"], json!(6.5));
}

#[tokio::test]
async fn create_order_without_products_is_rejected() {
    let (_, server) = server();

    let mut body = pedido_body();
    body["productos"] = json!([]);

    let response = server.post("/pedidos").json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let envelope: Value = response.json();
    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["message"], "El pedido no contiene productos");
    assert!(envelope.get("data").is_none());
}

#[tokio::test]
async fn order_detail_includes_line_items() {
    let (store, server) = server();
    store.insert_product(1, "Empanada", None);
    let id = create_pedido(&server).await;

    let response = server.get(&format!("/pedidos/{id}")).await;
    response.assert_status_ok();

    let envelope: Value = response.json();
    let detalles = envelope["data"]["detalles"].as_array().unwrap();
    assert_eq!(detalles.len(), 1);
    assert_eq!(detalles[0]["nombre_producto"], "Empanada");
}

#[tokio::test]
async fn non_numeric_path_params_answer_with_the_envelope() {
    let (_, server) = server();

    let response = server.get("/pedidos/abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let envelope: Value = response.json();
    assert_eq!(envelope["status"], 400);
    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["message"], "Identificador de ruta inválido");

    let response = server.get("/pedidos/abc/tracking").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let envelope: Value = response.json();
    assert_eq!(envelope["success"], false);
}

#[tokio::test]
async fn missing_order_is_not_found() {
    let (_, server) = server();

    let response = server.get("/pedidos/404").await;
    response.assert_status(StatusCode::NOT_FOUND);

    let envelope: Value = response.json();
    assert_eq!(envelope["status"], 404);
    assert_eq!(envelope["message"], "Pedido no encontrado");
}

#[tokio::test]
async fn assigned_order_appears_under_courier_still_pending() {
    let (_, server) = server();
    let id = create_pedido(&server).await;

    let response = server
        .put(&format!("/pedidos/{id}/asignar"))
        .json(&json!({ "id_delivery": 9 }))
        .await;
    response.assert_status_ok();

    let response = server.get("/pedidos/delivery/9").await;
    response.assert_status_ok();
    let envelope: Value = response.json();
    let pedidos = envelope["data"].as_array().unwrap();
    assert_eq!(pedidos.len(), 1);
    assert_eq!(pedidos[0]["id_pedido"], json!(id));
    assert_eq!(pedidos[0]["estado"], "pendiente");
}

#[tokio::test]
async fn status_update_reflects_in_listing() {
    let (_, server) = server();
    let id = create_pedido(&server).await;

    let response = server
        .put(&format!("/pedidos/{id}/estado"))
        .json(&json!({ "estado": "en camino" }))
        .await;
    response.assert_status_ok();

    let response = server.get("/pedidos/estado/en%20camino").await;
    response.assert_status_ok();
    let envelope: Value = response.json();
    assert_eq!(envelope["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn tracking_returns_latest_live_position() {
    let (_, server) = server();
    let id = create_pedido(&server).await;

    server
        .put(&format!("/pedidos/{id}/asignar"))
        .json(&json!({ "idDelivery": 9 }))
        .await
        .assert_status_ok();

    server
        .put("/delivery/9/ubicacion")
        .json(&json!({ "latitud": 10.0, "longitud": -70.0 }))
        .await
        .assert_status_ok();
    server
        .put("/delivery/9/ubicacion")
        .json(&json!({ "latitud": 10.1, "longitud": -70.1 }))
        .await
        .assert_status_ok();

    let response = server.get(&format!("/pedidos/{id}/tracking")).await;
    response.assert_status_ok();

    let envelope: Value = response.json();
    assert_eq!(envelope["data"]["latitud"], json!(10.1));
    assert_eq!(envelope["data"]["longitud"], json!(-70.1));
}

#[tokio::test]
async fn tracking_without_courier_is_not_found() {
    let (_, server) = server();
    let id = create_pedido(&server).await;

    let response = server.get(&format!("/pedidos/{id}/tracking")).await;
    response.assert_status(StatusCode::NOT_FOUND);

    let envelope: Value = response.json();
    assert_eq!(envelope["message"], "No hay tracking activo para el pedido");
}

#[tokio::test]
async fn live_location_rejects_missing_or_invalid_coordinates() {
    let (_, server) = server();

    let response = server
        .put("/delivery/9/ubicacion")
        .json(&json!({ "latitud": 10.0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let envelope: Value = response.json();
    assert_eq!(envelope["message"], "Coordenadas obligatorias");

    let response = server
        .put("/delivery/9/ubicacion")
        .json(&json!({ "latitud": 95.0, "longitud": 0.0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn saved_location_rejects_out_of_range_coordinates() {
    let (_, server) = server();

    let response = server
        .post("/ubicaciones")
        .json(&json!({
            "idUsuario": 5,
            "latitud": 10.0,
            "longitud": 181.0,
            "direccion": "Calle Falsa 123"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn saved_location_upserts_on_user_and_label() {
    let (_, server) = server();

    let body = json!({
        "id_usuario": 5,
        "latitud": 10.0,
        "longitud": -70.0,
        "direccion": "Calle Falsa 123",
        "descripcion": "Casa"
    });
    server.post("/ubicaciones").json(&body).await.assert_status(StatusCode::CREATED);

    let mut moved = body.clone();
    moved["latitud"] = json!(11.0);
    server
        .post("/ubicaciones")
        .json(&moved)
        .await
        .assert_status(StatusCode::CREATED);

    let response = server.get("/ubicaciones/usuario/5").await;
    response.assert_status_ok();
    let envelope: Value = response.json();
    let ubicaciones = envelope["data"].as_array().unwrap();
    assert_eq!(ubicaciones.len(), 1);
    assert_eq!(ubicaciones[0]["latitud"], json!(11.0));
}

#[tokio::test]
async fn available_orders_require_a_courier_token() {
    let (_, server) = server();
    create_pedido(&server).await;

    // no token
    let response = server.get("/pedidos/disponibles").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // unknown token
    let response = server
        .get("/pedidos/disponibles")
        .authorization_bearer("bogus")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // valid token, wrong role
    let response = server
        .get("/pedidos/disponibles")
        .authorization_bearer("client-token")
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    // courier sees the unassigned pending order
    let response = server
        .get("/pedidos/disponibles")
        .authorization_bearer("courier-token")
        .await;
    response.assert_status_ok();
    let envelope: Value = response.json();
    assert_eq!(envelope["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn assigned_orders_leave_the_available_pool() {
    let (_, server) = server();
    let id = create_pedido(&server).await;

    server
        .put(&format!("/pedidos/{id}/asignar"))
        .json(&json!({ "id_delivery": 9 }))
        .await
        .assert_status_ok();

    let response = server
        .get("/pedidos/disponibles")
        .authorization_bearer("courier-token")
        .await;
    response.assert_status_ok();
    let envelope: Value = response.json();
    assert_eq!(envelope["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn strict_transitions_reject_backward_moves() {
    let (_, server) = server_with(OrderPolicy {
        strict_transitions: true,
        ..OrderPolicy::default()
    });
    let id = create_pedido(&server).await;

    server
        .put(&format!("/pedidos/{id}/estado"))
        .json(&json!({ "estado": "en camino" }))
        .await
        .assert_status_ok();

    let response = server
        .put(&format!("/pedidos/{id}/estado"))
        .json(&json!({ "estado": "pendiente" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_location_then_listing_shrinks() {
    let (_, server) = server();

    let response = server
        .post("/ubicaciones")
        .json(&json!({
            "id_usuario": 5,
            "latitud": 10.0,
            "longitud": -70.0,
            "direccion": "Calle Falsa 123"
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let envelope: Value = response.json();
    let id = envelope["data"]["id_ubicacion"].as_i64().unwrap();

    server
        .delete(&format!("/ubicaciones/{id}"))
        .await
        .assert_status_ok();

    let response = server.get("/ubicaciones/usuario/5").await;
    let envelope: Value = response.json();
    assert_eq!(envelope["data"].as_array().unwrap().len(), 0);

    let response = server.delete(&format!("/ubicaciones/{id}")).await;
    response.assert_status(StatusCode::NOT_FOUND);
}
