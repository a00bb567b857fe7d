//! Brand catalog adapter: create, list, and single-brand read.
//!
//! Same classification pattern as the product adapter, smaller surface.
//! The reverse join from brand id to brand name on product reads is never
//! resolved here — see `ProductCatalog::list_products`.

use reqwest::StatusCode;

use bcgw_core::types::{Brand, BrandSummary, Envelope, NewBrand};
use bcgw_core::Outcome;

use crate::client::{decode_json, read_error_detail, UpstreamClient};
use crate::error::CatalogError;
use crate::products::page_query;

/// Adapter for `/catalog/brands`.
#[derive(Clone)]
pub struct BrandCatalog {
    client: UpstreamClient,
}

impl BrandCatalog {
    #[must_use]
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    /// Creates a brand. A blank name rejects locally with 400 and no
    /// upstream call; the POST classifies as 2xx created, 207 partial,
    /// 409 duplicate name, anything else 422.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport failure or schema mismatch.
    pub async fn create_brand(
        &self,
        brand: &NewBrand,
    ) -> Result<Outcome<Envelope<Brand>>, CatalogError> {
        if brand.name.trim().is_empty() {
            return Ok(Outcome::rejected("Brand name is required"));
        }

        let response = self.client.post_json("/catalog/brands", brand).await?;
        let status = response.status();

        if status == StatusCode::MULTI_STATUS {
            let body = response.text().await?;
            return Ok(Outcome::partial(serde_json::from_str(&body).ok()));
        }
        if status.is_success() {
            let envelope = decode_json(response, "create_brand").await?;
            return Ok(Outcome::ok("Brand created successfully", envelope));
        }

        let detail = read_error_detail(response).await?;
        if status == StatusCode::CONFLICT {
            Ok(Outcome::upstream_error(409, detail))
        } else {
            Ok(Outcome::upstream_error(422, detail))
        }
    }

    /// Fetches one brand, narrowed to the name the gateway exposes.
    /// Any non-2xx classifies as 404 with the upstream title forwarded.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport failure or schema mismatch.
    pub async fn get_brand(&self, brand_id: i64) -> Result<Outcome<BrandSummary>, CatalogError> {
        let response = self
            .client
            .get(&format!("/catalog/brands/{brand_id}"), &[])
            .await?;

        if response.status().is_success() {
            let envelope: Envelope<Brand> = decode_json(response, "get_brand").await?;
            return Ok(Outcome::ok(
                "Brand retrieved successfully",
                BrandSummary {
                    name: envelope.data.name,
                },
            ));
        }

        let detail = read_error_detail(response).await?;
        Ok(Outcome::upstream_error(404, detail))
    }

    /// Lists brands with pagination metadata.
    ///
    /// A non-2xx is classified into the envelope as a defensive 422
    /// instead of the original behavior of silently returning an empty
    /// body.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] on transport failure or schema mismatch.
    pub async fn list_brands(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Outcome<Envelope<Vec<Brand>>>, CatalogError> {
        let response = self
            .client
            .get("/catalog/brands", &page_query(page, limit))
            .await?;
        let status = response.status();

        if status.is_success() {
            let envelope = decode_json(response, "list_brands").await?;
            return Ok(Outcome::ok("Brands retrieved successfully", envelope));
        }

        tracing::warn!(status = %status, "brand list returned a non-2xx status");
        let detail = read_error_detail(response).await?;
        Ok(Outcome::upstream_error(422, detail))
    }
}
