//! End-to-end tests driving the router in-process against an in-memory store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use caja_api::{router, AppState};
use caja_db::{Database, DbConfig};

// =============================================================================
// Helpers
// =============================================================================

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    router(Arc::new(AppState::new(db)))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_sale(app: &Router, valor: f64, estado: &str) -> Value {
    let (status, sale) = send(
        app,
        "POST",
        "/api/ventas",
        Some(json!({ "nombre": "Ivan", "valor": valor, "estado": estado })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    sale
}

async fn pay(app: &Router, id: &str, monto: Value) -> (StatusCode, Value) {
    send(
        app,
        "PUT",
        &format!("/api/ventas/{id}/pago"),
        Some(json!({ "monto": monto })),
    )
    .await
}

async fn get_sale(app: &Router, id: &str) -> Value {
    let (status, sale) = send(app, "GET", &format!("/api/ventas/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    sale
}

fn sale_id(sale: &Value) -> String {
    sale["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Payment application
// =============================================================================

#[tokio::test]
async fn test_two_payments_settle_sale() {
    let app = app().await;
    let sale = create_sale(&app, 100.0, "Pendiente").await;
    let id = sale_id(&sale);

    let (status, after_first) = pay(&app, &id, json!(30)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after_first["estado"], "Pendiente");
    assert_eq!(after_first["montoPagado"], 30.0);
    assert_eq!(after_first["saldoPendiente"], 70.0);

    let (status, settled) = pay(&app, &id, json!(70)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settled["estado"], "Pagado");
    assert_eq!(settled["montoPagado"], 100.0);
    assert_eq!(settled["saldoPendiente"], 0.0);

    let history = settled["historialPagos"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["monto"], 30.0);
    assert_eq!(history[1]["monto"], 70.0);
}

#[tokio::test]
async fn test_payments_below_total_stay_pending() {
    let app = app().await;
    let id = sale_id(&create_sale(&app, 50.0, "Pendiente").await);

    for monto in [10.25, 20.5, 19.24] {
        let (status, _) = pay(&app, &id, json!(monto)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let sale = get_sale(&app, &id).await;
    assert_eq!(sale["estado"], "Pendiente");
    assert_eq!(sale["montoPagado"], 49.99);
    assert_eq!(sale["saldoPendiente"], 0.01);
}

#[tokio::test]
async fn test_overpayment_is_clamped() {
    let app = app().await;
    let id = sale_id(&create_sale(&app, 200.0, "Pendiente").await);

    let (status, sale) = pay(&app, &id, json!(250)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sale["estado"], "Pagado");
    assert_eq!(sale["montoPagado"], 200.0);
    assert_eq!(sale["historialPagos"][0]["monto"], 200.0);
}

#[tokio::test]
async fn test_paid_sale_rejects_payment() {
    let app = app().await;
    let sale = create_sale(&app, 50.0, "Pagado").await;
    let id = sale_id(&sale);

    assert_eq!(sale["montoPagado"], 50.0);
    assert!(sale["historialPagos"].as_array().unwrap().is_empty());

    let (status, error) = pay(&app, &id, json!(10)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "ALREADY_SETTLED");

    let stored = get_sale(&app, &id).await;
    assert_eq!(stored["montoPagado"], 50.0);
    assert!(stored["historialPagos"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cancelled_sale_rejects_payment() {
    let app = app().await;
    let id = sale_id(&create_sale(&app, 80.0, "Pendiente").await);
    pay(&app, &id, json!(20)).await;

    let (status, cancelled) = send(
        &app,
        "PUT",
        &format!("/api/ventas/{id}"),
        Some(json!({ "estado": "Cancelado" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["estado"], "Cancelado");

    let (status, error) = pay(&app, &id, json!(10)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_STATE");
    assert!(error["message"].as_str().unwrap().contains("Cancelado"));

    let stored = get_sale(&app, &id).await;
    assert_eq!(stored["montoPagado"], 20.0);
    assert_eq!(stored["historialPagos"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_amounts_are_rejected() {
    let app = app().await;
    let id = sale_id(&create_sale(&app, 80.0, "Pendiente").await);

    for monto in [json!(0), json!(-5), json!("30"), json!(null), json!(0.001)] {
        let (status, error) = pay(&app, &id, monto).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "INVALID_AMOUNT");
    }

    let stored = get_sale(&app, &id).await;
    assert_eq!(stored["montoPagado"], 0.0);
    assert!(stored["historialPagos"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_one_cent_pending_sale_opens_settled() {
    let app = app().await;
    let sale = create_sale(&app, 0.01, "Pendiente").await;
    let id = sale_id(&sale);

    assert_eq!(sale["estado"], "Pagado");
    assert_eq!(sale["montoPagado"], 0.01);
    assert_eq!(sale["saldoPendiente"], 0.0);

    let (status, error) = pay(&app, &id, json!(0.01)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "ALREADY_SETTLED");

    let stored = get_sale(&app, &id).await;
    assert_eq!(stored["estado"], "Pagado");
    assert!(stored["historialPagos"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_payment_on_unknown_sale() {
    let app = app().await;

    let (status, error) = pay(&app, "no-such-sale", json!(10)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");

    // The amount is checked first
    let (status, error) = pay(&app, "no-such-sale", json!(-1)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_AMOUNT");
}

// =============================================================================
// Sale CRUD
// =============================================================================

#[tokio::test]
async fn test_create_sale_validation() {
    let app = app().await;

    let bodies = [
        json!({ "valor": 10 }),
        json!({ "nombre": "  ", "valor": 10 }),
        json!({ "nombre": "Ivan", "valor": 0 }),
        json!({ "nombre": "Ivan", "valor": 10, "estado": "Cancelado" }),
        json!({ "nombre": "Ivan", "valor": 10, "estado": "Vendido" }),
    ];
    for body in bodies {
        let (status, error) = send(&app, "POST", "/api/ventas", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["message"].is_string());
    }

    let (_, sales) = send(&app, "GET", "/api/ventas", None).await;
    assert!(sales.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_sale_defaults() {
    let app = app().await;
    let (status, sale) = send(
        &app,
        "POST",
        "/api/ventas",
        Some(json!({ "nombre": "Ivan", "valor": 12.5, "producto": "Producto A ($10.50)" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sale["estado"], "Pendiente");
    assert_eq!(sale["cliente"], "Anónimo");
    assert_eq!(sale["saldoPendiente"], 12.5);
    assert_eq!(sale["producto"], "Producto A ($10.50)");
    assert!(sale["descripcion"].is_null());
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_error() {
    let app = app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/ventas")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let error: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_sales_newest_first() {
    let app = app().await;
    let first = sale_id(&create_sale(&app, 10.0, "Pendiente").await);
    let second = sale_id(&create_sale(&app, 20.0, "Pagado").await);

    let (status, sales) = send(&app, "GET", "/api/ventas", None).await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<&str> = sales
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);
}

#[tokio::test]
async fn test_update_sale() {
    let app = app().await;
    let id = sale_id(&create_sale(&app, 40.0, "Pendiente").await);
    let uri = format!("/api/ventas/{id}");

    let (status, updated) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "cliente": "Marta", "descripcion": "2 x Producto A", "valor": 40 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["cliente"], "Marta");
    assert_eq!(updated["descripcion"], "2 x Producto A");

    // A blank customer resets to the placeholder, as on create
    let (status, reset) = send(&app, "PUT", &uri, Some(json!({ "cliente": " " }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reset["cliente"], "Anónimo");

    // The total is fixed at creation
    let (status, error) = send(&app, "PUT", &uri, Some(json!({ "valor": 45 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");

    // Manual settlement, then no way back
    let (status, settled) = send(&app, "PUT", &uri, Some(json!({ "estado": "Pagado" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settled["montoPagado"], 40.0);
    assert!(settled["historialPagos"].as_array().unwrap().is_empty());

    let (status, error) = send(&app, "PUT", &uri, Some(json!({ "estado": "Pendiente" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_STATE");

    let (status, _) = send(
        &app,
        "PUT",
        "/api/ventas/no-such-sale",
        Some(json!({ "cliente": "Marta" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_sale() {
    let app = app().await;
    let id = sale_id(&create_sale(&app, 40.0, "Pendiente").await);
    let uri = format!("/api/ventas/{id}");

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Withdrawals, groups, members, maintenance
// =============================================================================

#[tokio::test]
async fn test_withdrawals() {
    let app = app().await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/retiros",
        Some(json!({ "cantidad": 15.75, "descripcion": " Cambio " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["cantidad"], 15.75);
    assert_eq!(created["descripcion"], "Cambio");

    for body in [
        json!({ "cantidad": 0, "descripcion": "Nada" }),
        json!({ "cantidad": 10, "descripcion": "  " }),
        json!({ "descripcion": "Sin cantidad" }),
    ] {
        let (status, _) = send(&app, "POST", "/api/retiros", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, listed) = send(&app, "GET", "/api/retiros", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let uri = format!("/api/retiros/{}", created["id"].as_str().unwrap());
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_groups_and_members() {
    let app = app().await;

    let (status, tarde) = send(&app, "POST", "/api/grupos", Some(json!({ "nombre": "Tarde" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, manana) = send(&app, "POST", "/api/grupos", Some(json!({ "nombre": "Mañana" }))).await;

    let (status, error) = send(&app, "POST", "/api/grupos", Some(json!({ "nombre": "Tarde" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "CONFLICT");

    let (_, groups) = send(&app, "GET", "/api/grupos", None).await;
    let names: Vec<&str> = groups
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["nombre"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Mañana", "Tarde"]);

    let tarde_id = tarde["id"].as_str().unwrap();
    let manana_id = manana["id"].as_str().unwrap();

    let (status, member) = send(
        &app,
        "POST",
        "/api/integrantes",
        Some(json!({ "nombre": "Ivan", "grupoId": tarde_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(member["grupoId"], tarde_id);

    send(
        &app,
        "POST",
        "/api/integrantes",
        Some(json!({ "nombre": "Ana", "grupoId": manana_id })),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/integrantes",
        Some(json!({ "nombre": "Luis", "grupoId": "no-such-group" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, all) = send(&app, "GET", "/api/integrantes", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, filtered) = send(&app, "GET", &format!("/api/integrantes?grupoId={tarde_id}"), None).await;
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["nombre"], "Ivan");

    // A group with members can't be deleted
    let (status, error) = send(&app, "DELETE", &format!("/api/grupos/{tarde_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "CONFLICT");

    let member_uri = format!("/api/integrantes/{}", member["id"].as_str().unwrap());
    let (status, _) = send(&app, "DELETE", &member_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", &format!("/api/grupos/{tarde_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &format!("/api/grupos/{tarde_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wipe_all() {
    let app = app().await;
    let id = sale_id(&create_sale(&app, 40.0, "Pendiente").await);
    pay(&app, &id, json!(10)).await;
    send(
        &app,
        "POST",
        "/api/retiros",
        Some(json!({ "cantidad": 5, "descripcion": "Cambio" })),
    )
    .await;
    let (_, group) = send(&app, "POST", "/api/grupos", Some(json!({ "nombre": "Tarde" }))).await;
    send(
        &app,
        "POST",
        "/api/integrantes",
        Some(json!({ "nombre": "Ivan", "grupoId": group["id"] })),
    )
    .await;

    let (status, _) = send(&app, "DELETE", "/api/datos-completos", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for uri in ["/api/ventas", "/api/retiros", "/api/grupos", "/api/integrantes"] {
        let (status, listed) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(listed.as_array().unwrap().is_empty(), "{uri} not empty");
    }
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");
}
