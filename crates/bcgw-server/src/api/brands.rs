use axum::{
    extract::{Path, Query, State},
    response::Response,
    Extension, Json,
};

use bcgw_core::types::NewBrand;

use crate::middleware::RequestId;

use super::products::PageQuery;
use super::{map_catalog_error, normalize_limit, outcome_response, ApiError, AppState};

pub(super) async fn list_brands(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let outcome = state
        .brands
        .list_brands(query.page, Some(normalize_limit(query.limit)))
        .await
        .map_err(|e| map_catalog_error(req_id.0, &e))?;
    Ok(outcome_response(outcome))
}

pub(super) async fn get_brand(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(brand_id): Path<i64>,
) -> Result<Response, ApiError> {
    let outcome = state
        .brands
        .get_brand(brand_id)
        .await
        .map_err(|e| map_catalog_error(req_id.0, &e))?;
    Ok(outcome_response(outcome))
}

pub(super) async fn create_brand(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(brand): Json<NewBrand>,
) -> Result<Response, ApiError> {
    let outcome = state
        .brands
        .create_brand(&brand)
        .await
        .map_err(|e| map_catalog_error(req_id.0, &e))?;
    Ok(outcome_response(outcome))
}
