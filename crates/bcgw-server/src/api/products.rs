use axum::{
    extract::{Multipart, Path, Query, State},
    response::Response,
    Extension, Json,
};
use serde::Deserialize;

use bcgw_core::types::{NewProduct, ProductPatch};
use bcgw_core::upload::ImageUpload;

use crate::middleware::RequestId;

use super::{map_catalog_error, normalize_limit, outcome_response, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let outcome = state
        .products
        .list_products(query.page, Some(normalize_limit(query.limit)))
        .await
        .map_err(|e| map_catalog_error(req_id.0, &e))?;
    Ok(outcome_response(outcome))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
) -> Result<Response, ApiError> {
    let outcome = state
        .products
        .get_product(product_id)
        .await
        .map_err(|e| map_catalog_error(req_id.0, &e))?;
    Ok(outcome_response(outcome))
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(product): Json<NewProduct>,
) -> Result<Response, ApiError> {
    let outcome = state
        .products
        .create_product(&product)
        .await
        .map_err(|e| map_catalog_error(req_id.0, &e))?;
    Ok(outcome_response(outcome))
}

pub(super) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
    Json(patch): Json<ProductPatch>,
) -> Result<Response, ApiError> {
    let outcome = state
        .products
        .update_product(product_id, &patch)
        .await
        .map_err(|e| map_catalog_error(req_id.0, &e))?;
    Ok(outcome_response(outcome))
}

pub(super) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
) -> Result<Response, ApiError> {
    let outcome = state
        .products
        .delete_product(product_id)
        .await
        .map_err(|e| map_catalog_error(req_id.0, &e))?;
    Ok(outcome_response(outcome))
}

pub(super) async fn list_product_images(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let outcome = state
        .products
        .list_product_images(product_id, query.page, Some(normalize_limit(query.limit)))
        .await
        .map_err(|e| map_catalog_error(req_id.0, &e))?;
    Ok(outcome_response(outcome))
}

pub(super) async fn create_product_image(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_id): Path<i64>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let upload = read_image_part(multipart, &req_id.0).await?;
    let outcome = state
        .products
        .create_product_image(product_id, &upload)
        .await
        .map_err(|e| map_catalog_error(req_id.0, &e))?;
    Ok(outcome_response(outcome))
}

pub(super) async fn delete_product_image(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((product_id, image_id)): Path<(i64, i64)>,
) -> Result<Response, ApiError> {
    let outcome = state
        .products
        .delete_product_image(product_id, image_id)
        .await
        .map_err(|e| map_catalog_error(req_id.0, &e))?;
    Ok(outcome_response(outcome))
}

/// Pulls the first file part out of the multipart body. Size and
/// extension policy live in the adapter; this only handles transport.
async fn read_image_part(mut multipart: Multipart, request_id: &str) -> Result<ImageUpload, ApiError> {
    loop {
        let field = multipart.next_field().await.map_err(|e| {
            tracing::debug!(error = %e, "malformed multipart body");
            ApiError::new(request_id, "bad_request", "malformed multipart body")
        })?;
        let Some(field) = field else {
            return Err(ApiError::new(
                request_id,
                "bad_request",
                "an image file part is required",
            ));
        };

        let Some(file_name) = field.file_name().map(ToOwned::to_owned) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = field.bytes().await.map_err(|e| {
            tracing::debug!(error = %e, "failed reading multipart file part");
            ApiError::new(request_id, "bad_request", "failed to read the image part")
        })?;

        return Ok(ImageUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
}
