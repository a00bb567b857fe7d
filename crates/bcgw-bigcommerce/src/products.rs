//! Product catalog adapter.
//!
//! Each operation issues 0–3 strictly sequential upstream calls, then
//! classifies the final response into an [`Outcome`]. The destructive and
//! read-merge-write operations are gated by explicit precondition helpers
//! that either pass (`Ok(None)`) or terminate the pipeline with the
//! short-circuit result (`Ok(Some(stop))`), keeping the sequential
//! contract auditable and testable on its own.

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use rust_decimal::Decimal;

use bcgw_core::types::{Envelope, Image, NewProduct, Product, ProductPatch, ProductSummary};
use bcgw_core::upload::{validate_image_upload, ImageUpload};
use bcgw_core::Outcome;

use crate::client::{decode_json, read_error_detail, UpstreamClient};
use crate::error::CatalogError;

const REQUIRED_FIELDS_MESSAGE: &str =
    "Product name, type, brand, SKU, weight, price and inventory are required fields.";

/// Adapter for `/catalog/products` and the nested image resources.
#[derive(Clone)]
pub struct ProductCatalog {
    client: UpstreamClient,
}

impl ProductCatalog {
    #[must_use]
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    /// Creates a product.
    ///
    /// Missing or zero required fields reject locally with 400 and no
    /// upstream call. Otherwise the single POST is classified: 2xx fully
    /// created, 207 partial (entity written, a secondary attribute
    /// failed), 409 duplicate SKU, anything else 422.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport failure or a 2xx body that
    /// doesn't match the product schema.
    pub async fn create_product(
        &self,
        product: &NewProduct,
    ) -> Result<Outcome<Envelope<Product>>, CatalogError> {
        if product.name.trim().is_empty()
            || product.product_type.trim().is_empty()
            || product.brand_name.trim().is_empty()
            || product.sku.trim().is_empty()
            || product.weight == Decimal::ZERO
            || product.price == Decimal::ZERO
            || product.inventory_level == 0
        {
            return Ok(Outcome::rejected(REQUIRED_FIELDS_MESSAGE));
        }

        let response = self.client.post_json("/catalog/products", product).await?;
        let status = response.status();

        if status == StatusCode::MULTI_STATUS {
            let body = response.text().await?;
            return Ok(Outcome::partial(serde_json::from_str(&body).ok()));
        }
        if status.is_success() {
            let envelope = decode_json(response, "create_product").await?;
            return Ok(Outcome::ok("Product created successfully", envelope));
        }

        let detail = read_error_detail(response).await?;
        if status == StatusCode::CONFLICT {
            Ok(Outcome::upstream_error(409, detail))
        } else {
            Ok(Outcome::upstream_error(422, detail))
        }
    }

    /// Fetches a product and projects it to the gateway's narrowed view.
    ///
    /// Any non-2xx classifies as 404 with the upstream title forwarded.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport failure or schema mismatch.
    pub async fn get_product(
        &self,
        product_id: i64,
    ) -> Result<Outcome<Envelope<ProductSummary>>, CatalogError> {
        let outcome = self.fetch_full_product(product_id).await?;
        Ok(outcome.map_data(|envelope| Envelope {
            data: ProductSummary::from(&envelope.data),
            meta: envelope.meta,
        }))
    }

    /// Lists products, projected to [`ProductSummary`].
    ///
    /// The brand name is deliberately not resolved per item — the upstream
    /// list response omits it and resolving would cost one call per item.
    /// A non-2xx here is classified into the envelope as a defensive 422
    /// rather than escaping as a hard error, even though the upstream docs
    /// claim this endpoint only returns 200.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport failure or schema mismatch.
    pub async fn list_products(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Outcome<Envelope<Vec<ProductSummary>>>, CatalogError> {
        let response = self
            .client
            .get("/catalog/products", &page_query(page, limit))
            .await?;
        let status = response.status();

        if status.is_success() {
            let envelope: Envelope<Vec<Product>> = decode_json(response, "list_products").await?;
            let data = envelope.data.iter().map(ProductSummary::from).collect();
            return Ok(Outcome::ok(
                "Products retrieved successfully",
                Envelope {
                    data,
                    meta: envelope.meta,
                },
            ));
        }

        tracing::warn!(status = %status, "product list returned a non-2xx status");
        let detail = read_error_detail(response).await?;
        Ok(Outcome::upstream_error(422, detail))
    }

    /// Updates a product via read-merge-write (the upstream has no PATCH).
    ///
    /// Pipeline: GET by id (404 short-circuits, nothing written) → overlay
    /// the supplied fields onto the fetched full record → reject locally
    /// with 400 when nothing changed → PUT the merged record. The merged
    /// record's id always equals `product_id`. Two concurrent updates to
    /// the same product race: last writer wins.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport failure or schema mismatch.
    pub async fn update_product(
        &self,
        product_id: i64,
        patch: &ProductPatch,
    ) -> Result<Outcome<Envelope<Product>>, CatalogError> {
        let existing = self.fetch_full_product(product_id).await?;
        if existing.status_code == 404 {
            return Ok(Outcome::not_found("Product not found"));
        }

        let Some(envelope) = existing.data else {
            // Non-404 failure on the read leg; forward it unchanged.
            return Ok(existing);
        };
        let mut record = envelope.data;

        if !patch.apply_to(&mut record) {
            return Ok(Outcome::rejected(
                "No changes were provided to update the product",
            ));
        }

        let response = self
            .client
            .put_json(&format!("/catalog/products/{product_id}"), &record)
            .await?;
        let status = response.status();

        if status == StatusCode::CREATED {
            // Upstream answers 201 with an empty body on some writes.
            return Ok(Outcome::created("Product created successfully"));
        }
        if status == StatusCode::MULTI_STATUS {
            let body = response.text().await?;
            return Ok(Outcome::partial(serde_json::from_str(&body).ok()));
        }
        if status.is_success() {
            let envelope = decode_json(response, "update_product").await?;
            return Ok(Outcome::ok("Product updated successfully", envelope));
        }

        let detail = read_error_detail(response).await?;
        match status {
            StatusCode::NOT_FOUND => Ok(Outcome::upstream_error(404, detail)),
            StatusCode::CONFLICT => Ok(Outcome::upstream_error(409, detail)),
            _ => Ok(Outcome::upstream_error(422, detail)),
        }
    }

    /// Deletes a product after confirming it exists.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport failure.
    pub async fn delete_product(&self, product_id: i64) -> Result<Outcome<bool>, CatalogError> {
        if let Some(stop) = self.require_product(product_id).await? {
            return Ok(stop);
        }

        let response = self
            .client
            .delete(&format!("/catalog/products/{product_id}"))
            .await?;

        if response.status().is_success() {
            Ok(Outcome::ok("Product deleted successfully", true))
        } else {
            Ok(Outcome::failed("Something went wrong"))
        }
    }

    /// Lists a product's images.
    ///
    /// The upstream docs say an empty collection answers 204, but in
    /// practice it also answers 200 with zero elements — both are
    /// re-labeled as the distinguished 204 outcome. Other non-2xx
    /// statuses classify as 404.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport failure or schema mismatch.
    pub async fn list_product_images(
        &self,
        product_id: i64,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Outcome<Envelope<Vec<Image>>>, CatalogError> {
        let response = self
            .client
            .get(
                &format!("/catalog/products/{product_id}/images"),
                &page_query(page, limit),
            )
            .await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(Outcome::no_content(
                "This product does not have any images",
            ));
        }
        if status.is_success() {
            let envelope: Envelope<Vec<Image>> =
                decode_json(response, "list_product_images").await?;
            if envelope.data.is_empty() {
                return Ok(Outcome::no_content(
                    "This product does not have any images",
                ));
            }
            return Ok(Outcome::ok("Images found", envelope));
        }

        let detail = read_error_detail(response).await?;
        Ok(Outcome {
            success: false,
            message: "The product ID does not exist".to_owned(),
            status_code: 404,
            data: None,
            errors: Some(detail),
        })
    }

    /// Uploads a product image.
    ///
    /// Size and extension are validated locally first; a rejected payload
    /// never contacts the upstream. The accepted payload is streamed as
    /// multipart form data under the `image_file` part name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport failure or schema mismatch.
    pub async fn create_product_image(
        &self,
        product_id: i64,
        upload: &ImageUpload,
    ) -> Result<Outcome<Envelope<Image>>, CatalogError> {
        if let Err(rejection) = validate_image_upload(&upload.file_name, upload.bytes.len()) {
            return Ok(Outcome::rejected(rejection.to_string()));
        }

        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)?;
        let form = Form::new().part("image_file", part);

        let response = self
            .client
            .post_multipart(&format!("/catalog/products/{product_id}/images"), form)
            .await?;
        let status = response.status();

        if status.is_success() {
            let envelope = decode_json(response, "create_product_image").await?;
            return Ok(Outcome::ok("Image uploaded successfully", envelope));
        }
        if status == StatusCode::NOT_FOUND {
            let detail = read_error_detail(response).await?;
            return Ok(Outcome::upstream_error(404, detail));
        }
        if status == StatusCode::BAD_REQUEST {
            // No structured body on this path; author the message locally.
            return Ok(Outcome {
                success: false,
                message: "Something went wrong".to_owned(),
                status_code: 400,
                data: None,
                errors: Some(bcgw_core::ErrorDetail::local("Bad Request")),
            });
        }

        let detail = read_error_detail(response).await?;
        Ok(Outcome::upstream_error(422, detail))
    }

    /// Deletes one image of a product.
    ///
    /// Precondition cascade, worst case three calls: the product must
    /// exist, and its image collection must be non-empty (a product
    /// without images short-circuits with the 204 outcome). Only when both
    /// reads pass is the DELETE issued.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport failure.
    pub async fn delete_product_image(
        &self,
        product_id: i64,
        image_id: i64,
    ) -> Result<Outcome<bool>, CatalogError> {
        if let Some(stop) = self.require_product(product_id).await? {
            return Ok(stop);
        }
        if let Some(stop) = self.require_images(product_id).await? {
            return Ok(stop);
        }

        let response = self
            .client
            .delete(&format!("/catalog/products/{product_id}/images/{image_id}"))
            .await?;

        if response.status().is_success() {
            Ok(Outcome::ok("Image deleted successfully", true))
        } else {
            Ok(Outcome::failed("Something went wrong"))
        }
    }

    /// GET the full product record; any non-2xx classifies as 404 with
    /// the upstream title forwarded. Shared by the read path and the
    /// merge/precondition legs.
    async fn fetch_full_product(
        &self,
        product_id: i64,
    ) -> Result<Outcome<Envelope<Product>>, CatalogError> {
        let response = self
            .client
            .get(&format!("/catalog/products/{product_id}"), &[])
            .await?;

        if response.status().is_success() {
            let envelope = decode_json(response, "get_product").await?;
            return Ok(Outcome::ok("Product retrieved successfully", envelope));
        }

        let detail = read_error_detail(response).await?;
        Ok(Outcome::upstream_error(404, detail))
    }

    /// Existence precondition. `Ok(None)` means continue; `Ok(Some(stop))`
    /// terminates the calling pipeline with the short-circuit result.
    async fn require_product<T>(
        &self,
        product_id: i64,
    ) -> Result<Option<Outcome<T>>, CatalogError> {
        let existing = self.fetch_full_product(product_id).await?;
        if existing.status_code == 404 {
            tracing::debug!(product_id, "precondition failed: product not found");
            return Ok(Some(Outcome::not_found("Product not found")));
        }
        Ok(None)
    }

    /// Non-empty image collection precondition, same contract as
    /// [`Self::require_product`].
    async fn require_images<T>(&self, product_id: i64) -> Result<Option<Outcome<T>>, CatalogError> {
        let images = self
            .list_product_images(product_id, Some(1), Some(50))
            .await?;
        if images.status_code == 204 {
            tracing::debug!(product_id, "precondition failed: product has no images");
            return Ok(Some(Outcome::no_content(
                "This product does not have any images",
            )));
        }
        Ok(None)
    }
}

/// Pagination pairs for list endpoints; absent parameters are omitted
/// from the query string entirely.
pub(crate) fn page_query(page: Option<i64>, limit: Option<i64>) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(page) = page {
        query.push(("page", page.to_string()));
    }
    if let Some(limit) = limit {
        query.push(("limit", limit.to_string()));
    }
    query
}
