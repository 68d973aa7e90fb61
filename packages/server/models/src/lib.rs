#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the UNICO order extractor server.
//!
//! Field names and messages match what the existing web frontend reads,
//! so they are part of the API contract.

use serde::{Deserialize, Serialize};

/// Message returned with every successful upload.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Trích xuất thành công!";

/// Detail returned when the uploaded file is not a PDF.
pub const NOT_PDF_DETAIL: &str = "Chỉ chấp nhận file PDF";

/// Detail returned when a requested download does not exist.
pub const FILE_NOT_FOUND_DETAIL: &str = "File không tồn tại";

/// Detail returned when an upload exceeds the size limit.
pub const FILE_TOO_LARGE_DETAIL: &str = "File quá lớn";

/// Prefix of the attachment name offered for downloads.
pub const DOWNLOAD_PREFIX: &str = "UNICO_DSDH_";

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Always `healthy` while the server is answering.
    pub status: String,
    /// Service identifier.
    pub service: String,
    /// Server version.
    pub version: String,
}

impl ApiHealth {
    /// Healthy response for the running build.
    #[must_use]
    pub fn healthy(version: &str) -> Self {
        Self {
            status: "healthy".to_owned(),
            service: "unico-backend".to_owned(),
            version: version.to_owned(),
        }
    }
}

/// Successful upload response.
///
/// Fields stay `snake_case`; the frontend reads `items_count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiUploadResponse {
    /// Name of the generated spreadsheet, for `/download/{filename}`.
    pub filename: String,
    /// Number of extracted line items.
    pub items_count: usize,
    /// Human-readable status.
    pub message: String,
}

/// Error body for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable reason.
    pub detail: String,
}

impl ApiError {
    /// Error with the given user-facing detail.
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }

    /// Error for an upload that could not be processed.
    #[must_use]
    pub fn processing(reason: &impl std::fmt::Display) -> Self {
        Self::new(format!("Lỗi xử lý file: {reason}"))
    }
}
