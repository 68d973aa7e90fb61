//! HTTP handler functions for the extractor API.

use actix_multipart::{Multipart, MultipartError};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use futures::StreamExt as _;
use unico_server_models::{
    ApiError, ApiHealth, ApiUploadResponse, DOWNLOAD_PREFIX, FILE_NOT_FOUND_DETAIL,
    FILE_TOO_LARGE_DETAIL, NOT_PDF_DETAIL, UPLOAD_SUCCESS_MESSAGE,
};

use crate::AppState;

#[derive(Debug, thiserror::Error)]
enum UploadError {
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error("upload exceeds {0} bytes")]
    TooLarge(usize),
}

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth::healthy(env!("CARGO_PKG_VERSION")))
}

/// `POST /api/upload`
///
/// Expects a multipart form with a `file` field holding a PDF of at most
/// [`AppState::max_upload_bytes`]. The extraction runs on the blocking pool.
pub async fn upload(state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    let (filename, bytes) = match read_file_field(payload, state.max_upload_bytes).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            return HttpResponse::UnprocessableEntity()
                .json(ApiError::new("Thiếu trường file trong biểu mẫu"));
        }
        Err(e @ UploadError::TooLarge(_)) => {
            log::warn!("Refused upload: {e}");
            return HttpResponse::PayloadTooLarge().json(ApiError::new(FILE_TOO_LARGE_DETAIL));
        }
        Err(e) => {
            log::warn!("Malformed upload: {e}");
            return HttpResponse::BadRequest().json(ApiError::new(e.to_string()));
        }
    };

    if !is_pdf_name(&filename) {
        return HttpResponse::BadRequest().json(ApiError::new(NOT_PDF_DETAIL));
    }

    let file_id = uuid::Uuid::new_v4().to_string();
    log::info!("Processing {filename} ({} bytes) as {file_id}", bytes.len());

    let task_state = state.clone();
    let task_id = file_id.clone();
    let result = web::block(move || task_state.process_upload(&task_id, &bytes)).await;

    match result {
        Ok(Ok(items_count)) => HttpResponse::Ok().json(ApiUploadResponse {
            filename: format!("{file_id}.xlsx"),
            items_count,
            message: UPLOAD_SUCCESS_MESSAGE.to_owned(),
        }),
        Ok(Err(e)) => {
            log::error!("Failed to process {filename}: {e}");
            HttpResponse::InternalServerError().json(ApiError::processing(&e))
        }
        Err(e) => {
            log::error!("Extraction task for {filename} failed: {e}");
            HttpResponse::InternalServerError().json(ApiError::processing(&e))
        }
    }
}

/// `GET /api/download/{filename}`
///
/// Serves a rendered spreadsheet as `UNICO_DSDH_<filename>`.
pub async fn download(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let filename = path.into_inner();

    let Some(file_path) = state.output_path(&filename) else {
        return HttpResponse::BadRequest().json(ApiError::new("Tên file không hợp lệ"));
    };
    if !file_path.is_file() {
        return HttpResponse::NotFound().json(ApiError::new(FILE_NOT_FOUND_DETAIL));
    }

    match web::block(move || std::fs::read(file_path)).await {
        Ok(Ok(bytes)) => HttpResponse::Ok()
            .content_type(XLSX_CONTENT_TYPE)
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(format!(
                    "{DOWNLOAD_PREFIX}{filename}"
                ))],
            })
            .body(bytes),
        Ok(Err(e)) => {
            log::error!("Failed to read {filename}: {e}");
            HttpResponse::InternalServerError().json(ApiError::processing(&e))
        }
        Err(e) => {
            log::error!("Read task for {filename} failed: {e}");
            HttpResponse::InternalServerError().json(ApiError::processing(&e))
        }
    }
}

/// Reads the first `file` field of the form, with its client file name.
/// Stops as soon as the field grows past `limit` bytes.
async fn read_file_field(
    mut payload: Multipart,
    limit: usize,
) -> Result<Option<(String, Vec<u8>)>, UploadError> {
    while let Some(field) = payload.next().await {
        let mut field = field?;
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(ContentDisposition::get_filename)
            .unwrap_or_default()
            .to_owned();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > limit {
                return Err(UploadError::TooLarge(limit));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(Some((filename, bytes)));
    }
    Ok(None)
}

fn is_pdf_name(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use unico_extract::ExtractorConfig;
    use unico_xlsx::StyleSpec;

    use super::*;

    const BOUNDARY: &str = "unico-test-boundary";

    fn temp_state() -> (PathBuf, AppState) {
        let root = std::env::temp_dir().join(format!("unico-handlers-{}", uuid::Uuid::new_v4()));
        let state = AppState::new(
            root.join("uploads"),
            root.join("outputs"),
            ExtractorConfig::default(),
            StyleSpec::default(),
        )
        .unwrap();
        (root, state)
    }

    fn multipart_body(filename: &str, content: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(uri: &str, filename: &str, content: &[u8]) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body(filename, content))
    }

    #[::core::prelude::v1::test]
    fn pdf_names_are_case_insensitive() {
        assert!(is_pdf_name("order.pdf"));
        assert!(is_pdf_name("ORDER.PDF"));
        assert!(!is_pdf_name("order.pdf.txt"));
        assert!(!is_pdf_name(""));
    }

    #[actix_web::test]
    async fn health_is_served_with_and_without_prefix() {
        let (root, state) = temp_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        for uri in ["/api/health", "/health"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let body: ApiHealth = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body.status, "healthy");
            assert_eq!(body.service, "unico-backend");
        }

        std::fs::remove_dir_all(&root).ok();
    }

    #[actix_web::test]
    async fn upload_rejects_non_pdf_names() {
        let (root, state) = temp_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        let req = upload_request("/api/upload", "order.txt", b"hello").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ApiError = test::read_body_json(resp).await;
        assert_eq!(body.detail, NOT_PDF_DETAIL);

        std::fs::remove_dir_all(&root).ok();
    }

    #[actix_web::test]
    async fn upload_over_the_size_limit_is_refused() {
        let (root, state) = temp_state();
        let state = state.with_max_upload_bytes(16);
        let upload_dir = state.upload_dir.clone();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        let content = [b"%PDF-1.4\n".as_slice(), &[b'x'; 64]].concat();
        let req = upload_request("/api/upload", "order.pdf", &content).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body: ApiError = test::read_body_json(resp).await;
        assert_eq!(body.detail, FILE_TOO_LARGE_DETAIL);
        assert_eq!(std::fs::read_dir(&upload_dir).unwrap().count(), 0);

        std::fs::remove_dir_all(&root).ok();
    }

    #[actix_web::test]
    async fn unreadable_pdf_is_a_processing_error() {
        let (root, state) = temp_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        let req = upload_request("/upload", "order.pdf", b"not really a pdf").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ApiError = test::read_body_json(resp).await;
        assert!(body.detail.starts_with("Lỗi xử lý file: "), "{}", body.detail);

        std::fs::remove_dir_all(&root).ok();
    }

    #[actix_web::test]
    async fn download_serves_attachment() {
        let (root, state) = temp_state();
        std::fs::write(state.output_dir.join("abc.xlsx"), b"xlsx-bytes").unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/download/abc.xlsx")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned();
        assert!(disposition.contains("UNICO_DSDH_abc.xlsx"), "{disposition}");
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"xlsx-bytes");

        std::fs::remove_dir_all(&root).ok();
    }

    #[actix_web::test]
    async fn download_rejects_missing_and_unsafe_names() {
        let (root, state) = temp_state();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(crate::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/download/missing.xlsx")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: ApiError = test::read_body_json(resp).await;
        assert_eq!(body.detail, FILE_NOT_FOUND_DETAIL);

        let req = test::TestRequest::get()
            .uri("/api/download/..secret.xlsx")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        std::fs::remove_dir_all(&root).ok();
    }
}
