//! Product HTTP Routes
//!
//! Thin translation between HTTP and the [`ProductStore`]:
//!
//! - `GET    /product-types` - distinct product types
//! - `GET    /products`      - every product
//! - `GET    /products/:id`  - one product
//! - `POST   /product`       - create
//! - `PUT    /:id`           - partial update
//! - `DELETE /product/:id`   - delete

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

use super::validation::{validate_create, validate_update};
use crate::catalog::{CatalogError, CatalogResult, Product, ProductStore};
use crate::observability::{Event, Logger};

pub const CREATED_MESSAGE: &str = "Product added successfully";
pub const UPDATED_MESSAGE: &str = "Product updated successfully";
pub const DELETED_MESSAGE: &str = "Product deleted successfully";

// ==================
// Shared State
// ==================

/// Catalog state shared across handlers
pub struct CatalogState {
    pub store: ProductStore,
}

impl CatalogState {
    pub fn new(store: ProductStore) -> Self {
        Self { store }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ProductTypesResponse {
    #[serde(rename = "productTypes")]
    pub product_types: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

type ApiFailure = (StatusCode, Json<ErrorResponse>);

// ==================
// Product Routes
// ==================

/// Create product routes
pub fn product_routes(state: Arc<CatalogState>) -> Router {
    Router::new()
        .route("/product-types", get(list_product_types_handler))
        .route("/products", get(list_products_handler))
        .route("/products/:id", get(get_product_handler))
        .route("/product", post(create_product_handler))
        .route("/product/:id", delete(delete_product_handler))
        .route("/:id", put(update_product_handler))
        .with_state(state)
}

// ==================
// Query Handlers
// ==================

async fn list_product_types_handler(
    State(state): State<Arc<CatalogState>>,
) -> Result<Json<ProductTypesResponse>, ApiFailure> {
    let product_types = run_store(&state, "list_product_types", |store| {
        store.distinct_types()
    })
    .await?;

    Ok(Json(ProductTypesResponse { product_types }))
}

async fn list_products_handler(
    State(state): State<Arc<CatalogState>>,
) -> Result<Json<ProductsResponse>, ApiFailure> {
    let products = run_store(&state, "list_products", |store| store.list_all()).await?;

    Ok(Json(ProductsResponse { products }))
}

async fn get_product_handler(
    State(state): State<Arc<CatalogState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiFailure> {
    let product = run_store(&state, "get_product", move |store| store.get_by_id(&id)).await?;

    Ok(Json(product))
}

// ==================
// Mutation Handlers
// ==================

async fn create_product_handler(
    State(state): State<Arc<CatalogState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiFailure> {
    let Json(body) = payload.map_err(|rejection| invalid_json("create_product", &rejection))?;
    let product = validate_create(&body)
        .map_err(|details| invalid_payload("create_product", details))?;

    let id = product.id.clone();
    run_store(&state, "create_product", move |store| store.create(product)).await?;

    Logger::event(Event::ProductCreated, &[("id", id.as_str())]);
    Ok((StatusCode::CREATED, MessageResponse::new(CREATED_MESSAGE)))
}

async fn update_product_handler(
    State(state): State<Arc<CatalogState>>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiFailure> {
    let Json(body) = payload.map_err(|rejection| invalid_json("update_product", &rejection))?;
    let update = validate_update(&body)
        .map_err(|details| invalid_payload("update_product", details))?;

    let target = id.clone();
    let applied = run_store(&state, "update_product", move |store| {
        store.update(&target, &update)
    })
    .await?;

    // A missing id still reports success
    if applied {
        Logger::event(Event::ProductUpdated, &[("id", id.as_str())]);
    } else {
        Logger::event(Event::ProductUpdateSkipped, &[("id", id.as_str())]);
    }
    Ok(MessageResponse::new(UPDATED_MESSAGE))
}

async fn delete_product_handler(
    State(state): State<Arc<CatalogState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiFailure> {
    let target = id.clone();
    run_store(&state, "delete_product", move |store| store.delete(&target)).await?;

    Logger::event(Event::ProductDeleted, &[("id", id.as_str())]);
    Ok(MessageResponse::new(DELETED_MESSAGE))
}

// ==================
// Helpers
// ==================

/// Run a store operation on the blocking pool.
async fn run_store<T, F>(
    state: &Arc<CatalogState>,
    route: &'static str,
    op: F,
) -> Result<T, ApiFailure>
where
    T: Send + 'static,
    F: FnOnce(&ProductStore) -> CatalogResult<T> + Send + 'static,
{
    let store = state.store.clone();
    let joined = tokio::task::spawn_blocking(move || op(&store)).await;

    match joined {
        Ok(result) => result.map_err(|err| catalog_failure(route, err)),
        Err(err) => {
            let reason = err.to_string();
            Logger::event(
                Event::StoreFailure,
                &[("reason", reason.as_str()), ("route", route)],
            );
            Err(failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Vec::new(),
            ))
        }
    }
}

fn catalog_failure(route: &str, err: CatalogError) -> ApiFailure {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let reason = err.to_string();
    if err.is_fatal() {
        Logger::event(
            Event::StoreFailure,
            &[("reason", reason.as_str()), ("route", route)],
        );
        return failure(status, "Internal server error".to_string(), Vec::new());
    }

    Logger::event(
        Event::RequestRejected,
        &[("reason", reason.as_str()), ("route", route)],
    );
    failure(status, reason, Vec::new())
}

fn invalid_json(route: &str, rejection: &JsonRejection) -> ApiFailure {
    let reason = rejection.body_text();
    Logger::event(Event::RequestRejected, &[("reason", reason.as_str()), ("route", route)]);
    failure(StatusCode::BAD_REQUEST, reason, Vec::new())
}

fn invalid_payload(route: &str, details: Vec<String>) -> ApiFailure {
    let reason = details.join("; ");
    Logger::event(
        Event::RequestRejected,
        &[("reason", reason.as_str()), ("route", route)],
    );
    failure(
        StatusCode::BAD_REQUEST,
        "Validation failed".to_string(),
        details,
    )
}

fn failure(status: StatusCode, error: String, details: Vec<String>) -> ApiFailure {
    (
        status,
        Json(ErrorResponse {
            error,
            code: status.as_u16(),
            details,
        }),
    )
}
