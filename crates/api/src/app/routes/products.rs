use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    handler::Handler,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{MethodRouter, get},
};

use shopfront_core::{Entity, ProductId};
use shopfront_infra::ProductRepository;
use shopfront_products::Product;
use shopfront_products::validation::rules;

use crate::app::dto::{CreateProductRequest, DataResponse, UpdateProductRequest};
use crate::app::errors::ApiError;
use crate::context::AppContext;
use crate::middleware::validate_request;

pub const PRODUCT_DELETED: &str = "Product deleted";

type ApiResult<T> = Result<T, ApiError>;

/// `/api/products` routes, each behind its own rule table.
///
/// Paths match with or without a trailing slash.
pub fn router() -> Router<AppContext> {
    Router::new()
        .route("/api/products", collection())
        .route("/api/products/", collection())
        .route("/api/products/:id", member())
        .route("/api/products/:id/", member())
}

fn collection() -> MethodRouter<AppContext> {
    get(list_products).post(create_product.layer(from_fn_with_state(rules::CREATE_PRODUCT, validate_request)))
}

fn member() -> MethodRouter<AppContext> {
    get(get_product.layer(from_fn_with_state(rules::PRODUCT_ID, validate_request)))
        .put(update_product.layer(from_fn_with_state(rules::UPDATE_PRODUCT, validate_request)))
        .patch(toggle_availability.layer(from_fn_with_state(rules::PRODUCT_ID, validate_request)))
        .delete(delete_product.layer(from_fn_with_state(rules::PRODUCT_ID, validate_request)))
}

/// Resolve a raw `:id` segment to a stored product.
///
/// The id rule has already accepted the text; an integer too large for an
/// `i64` reads as not found.
async fn find_product(products: &dyn ProductRepository, raw_id: &str) -> ApiResult<Product> {
    let id: ProductId = raw_id.parse()?;
    products.find_by_id(id).await?.ok_or(ApiError::NotFound)
}

pub async fn list_products(State(ctx): State<AppContext>) -> ApiResult<Json<DataResponse<Vec<Product>>>> {
    let products = ctx.products().find_all().await?;
    Ok(Json(DataResponse::new(products)))
}

pub async fn get_product(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<Product>>> {
    let product = find_product(ctx.products(), &id).await?;
    Ok(Json(DataResponse::new(product)))
}

pub async fn create_product(
    State(ctx): State<AppContext>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataResponse<Product>>)> {
    let Json(body) = payload?;
    let product = ctx.products().create(body.into_new_product()?).await?;

    tracing::info!(product_id = %product.id(), "product created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(product))))
}

pub async fn update_product(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> ApiResult<Json<DataResponse<Product>>> {
    let mut product = find_product(ctx.products(), &id).await?;

    let Json(body) = payload?;
    product.replace(body.into_changes()?);
    let saved = ctx.products().save(&product).await?;

    tracing::info!(product_id = %saved.id(), "product updated");
    Ok(Json(DataResponse::new(saved)))
}

pub async fn toggle_availability(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<Product>>> {
    let mut product = find_product(ctx.products(), &id).await?;

    product.toggle_availability();
    let saved = ctx.products().save(&product).await?;

    tracing::info!(product_id = %saved.id(), availability = saved.availability(), "product availability toggled");
    Ok(Json(DataResponse::new(saved)))
}

pub async fn delete_product(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<&'static str>>> {
    let product = find_product(ctx.products(), &id).await?;
    ctx.products().destroy(&product).await?;

    tracing::info!(product_id = %product.id(), "product deleted");
    Ok(Json(DataResponse::new(PRODUCT_DELETED)))
}
