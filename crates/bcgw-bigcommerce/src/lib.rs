//! Adapter layer for the BigCommerce v3 catalog API.
//!
//! All persistent product/brand/image state lives upstream; this crate
//! translates the gateway's simplified operations into BigCommerce calls
//! and normalizes the upstream's status-code quirks into the
//! [`bcgw_core::Outcome`] envelope. Transport failures stay out of the
//! envelope and surface as [`CatalogError`].

mod brands;
mod client;
mod error;
mod products;

pub use brands::BrandCatalog;
pub use client::UpstreamClient;
pub use error::CatalogError;
pub use products::ProductCatalog;
