//! Product catalog routes
//!
//! Plain CRUD passthrough over the products table. Access control happens
//! entirely in the auth middleware; these handlers apply no domain logic.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    extract::ValidJson,
    state::AppState,
};

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    quantity: i32,
}

impl From<ProductRow> for ProductResponse {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            quantity: row.quantity,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidJson(req): ValidJson<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    if req.name.trim().is_empty() {
        return Err(ApiError::MissingField("name is required".to_string()));
    }

    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO products (name, description, price, quantity) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(req.name.trim())
    .bind(&req.description)
    .bind(req.price)
    .bind(req.quantity)
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(product_id = id, username = %user.username, "product created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Product created successfully".to_string(),
            id,
        }),
    ))
}

/// List all products
pub async fn list_products(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
) -> ApiResult<Json<ProductListResponse>> {
    let rows: Vec<ProductRow> = sqlx::query_as(
        "SELECT id, name, description, price, quantity FROM products ORDER BY id",
    )
    .fetch_all(&state.pool)
    .await?;

    Ok(Json(ProductListResponse {
        products: rows.into_iter().map(ProductResponse::from).collect(),
    }))
}

/// Get a single product by id
pub async fn get_product(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
    Path(product_id): Path<i64>,
) -> ApiResult<Json<ProductResponse>> {
    let row: ProductRow = sqlx::query_as(
        "SELECT id, name, description, price, quantity FROM products WHERE id = $1",
    )
    .bind(product_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or(ApiError::NotFound)?;

    Ok(Json(row.into()))
}

/// Replace a product
pub async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(product_id): Path<i64>,
    ValidJson(req): ValidJson<UpdateProductRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let result = sqlx::query(
        "UPDATE products SET name = $1, description = $2, price = $3, quantity = $4 WHERE id = $5",
    )
    .bind(req.name.trim())
    .bind(&req.description)
    .bind(req.price)
    .bind(req.quantity)
    .bind(product_id)
    .execute(&state.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }

    tracing::info!(product_id, username = %user.username, "product updated");

    Ok(Json(MessageResponse {
        message: "Product updated successfully".to_string(),
    }))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(product_id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(product_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }

    tracing::info!(product_id, username = %user.username, "product deleted");

    Ok(Json(MessageResponse {
        message: "Product deleted successfully".to_string(),
    }))
}
