//! The uniform result envelope returned by every adapter operation.
//!
//! BigCommerce's catalog endpoints are inconsistent about status-code
//! semantics (207 partial writes, 200 list responses that mean "no
//! content", error bodies that sometimes aren't there). [`Outcome`]
//! decouples callers from those quirks: `status_code` always reflects the
//! semantic result chosen by the adapter, which may differ from the literal
//! upstream status line.

use serde::{Deserialize, Serialize};

/// Semantic result of one adapter operation.
///
/// Invariant: `success == true` implies `errors.is_none()`. The
/// constructors below are the only way the adapters build these, so the
/// invariant holds by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome<T> {
    pub success: bool,
    pub message: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorDetail>,
}

/// Error body passed through from BigCommerce untouched.
///
/// The adapter never interprets the inner `errors` shape; it only lifts
/// `title` into [`Outcome::message`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default)]
    pub instance: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

impl ErrorDetail {
    /// Builds a synthetic detail for rejections the adapter authors itself
    /// (local validation, upstream responses without a structured body).
    #[must_use]
    pub fn local(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// The upstream `title`, or `fallback` when the body carried none.
    #[must_use]
    pub fn title_or(&self, fallback: &str) -> String {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(fallback)
            .to_owned()
    }
}

impl<T> Outcome<T> {
    /// Fully successful operation (200).
    #[must_use]
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            status_code: 200,
            data: Some(data),
            errors: None,
        }
    }

    /// Successful write where the upstream returned 201 with an empty body.
    #[must_use]
    pub fn created(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            status_code: 201,
            data: None,
            errors: None,
        }
    }

    /// The distinguished "no content" result (204), e.g. a product with an
    /// empty image collection.
    #[must_use]
    pub fn no_content(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            status_code: 204,
            data: None,
            errors: None,
        }
    }

    /// Partial success (207): the entity was written but a secondary
    /// attribute failed. `data` is still populated when the upstream
    /// returned a body.
    #[must_use]
    pub fn partial(data: Option<T>) -> Self {
        Self {
            success: false,
            message: "The request was partially successful. Some operations may have failed."
                .to_owned(),
            status_code: 207,
            data,
            errors: None,
        }
    }

    /// Local pre-flight rejection (400). Never follows an upstream call.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            errors: Some(ErrorDetail::local(message.clone())),
            success: false,
            message,
            status_code: 400,
            data: None,
        }
    }

    /// Short-circuit result for a failed existence precondition (404).
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            status_code: 404,
            data: None,
            errors: None,
        }
    }

    /// Boolean-flavored failure (400) for delete operations where the
    /// upstream gave a non-2xx without a useful body.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            status_code: 400,
            data: None,
            errors: None,
        }
    }

    /// Upstream semantic error: forwards the error body and lifts its
    /// `title` into the message.
    #[must_use]
    pub fn upstream_error(status_code: u16, detail: ErrorDetail) -> Self {
        Self {
            success: false,
            message: detail.title_or("The request could not be processed"),
            status_code,
            data: None,
            errors: Some(detail),
        }
    }

    /// Maps the payload type while preserving the rest of the envelope.
    #[must_use]
    pub fn map_data<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            success: self.success,
            message: self.message,
            status_code: self.status_code,
            data: self.data.map(f),
            errors: self.errors,
        }
    }
}
