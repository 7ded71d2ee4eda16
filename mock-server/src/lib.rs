use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

/// One accepted POST, kept for inspection through `GET /__requests`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub id: Uuid,
    pub path: String,
    pub body: Value,
}

#[derive(Deserialize)]
pub struct OrdersEnvelope {
    pub orders: Vec<Map<String, Value>>,
}

#[derive(Deserialize)]
pub struct BatchesEnvelope {
    pub batches: Vec<OrdersEnvelope>,
}

#[derive(Deserialize)]
pub struct RefundsEnvelope {
    pub refunds: Vec<Map<String, Value>>,
}

pub type Db = Arc<RwLock<Vec<RecordedRequest>>>;

pub fn app() -> Router {
    app_with_db(Db::default())
}

pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/v2/{account_id}/orders", post(create_orders))
        .route("/v2/{account_id}/orders/batches", post(create_batches))
        .route("/v2/{account_id}/orders/{order_id}/refunds", post(create_refunds))
        .route("/__requests", get(list_requests))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_db(listener, Db::default()).await
}

pub async fn run_with_db(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(db)).await
}

type ApiResult = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

fn require_auth(headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    if headers.contains_key(axum::http::header::AUTHORIZATION) {
        return Ok(());
    }
    Err((
        StatusCode::UNAUTHORIZED,
        Json(json!({"errors": [{"code": "authentication_error", "message": "missing credentials"}]})),
    ))
}

async fn record(db: &Db, path: String, body: Value) -> (StatusCode, Json<Value>) {
    let id = Uuid::new_v4();
    info!(%id, %path, "accepted");
    db.write().await.push(RecordedRequest { id, path, body });
    (StatusCode::ACCEPTED, Json(json!({})))
}

async fn create_orders(
    State(db): State<Db>,
    Path(account_id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<OrdersEnvelope>,
) -> ApiResult {
    require_auth(&headers)?;
    let body = json!({"orders": input.orders});
    Ok(record(&db, format!("{account_id}/orders"), body).await)
}

async fn create_batches(
    State(db): State<Db>,
    Path(account_id): Path<String>,
    headers: HeaderMap,
    Json(input): Json<BatchesEnvelope>,
) -> ApiResult {
    require_auth(&headers)?;
    let batches: Vec<Value> = input
        .batches
        .into_iter()
        .map(|batch| json!({"orders": batch.orders}))
        .collect();
    let body = json!({"batches": batches});
    Ok(record(&db, format!("{account_id}/orders/batches"), body).await)
}

async fn create_refunds(
    State(db): State<Db>,
    Path((account_id, order_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(input): Json<RefundsEnvelope>,
) -> ApiResult {
    require_auth(&headers)?;
    let body = json!({"refunds": input.refunds});
    Ok(record(&db, format!("{account_id}/orders/{order_id}/refunds"), body).await)
}

async fn list_requests(State(db): State<Db>) -> Json<Vec<RecordedRequest>> {
    Json(db.read().await.clone())
}
