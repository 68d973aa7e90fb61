#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web service for the UNICO order extractor.
//!
//! Accepts purchase-order PDFs on `/api/upload`, extracts them on the
//! blocking thread pool, and serves the rendered spreadsheets from
//! `/api/download/{filename}`. Every route is also mounted without the
//! `/api` prefix for frontends that talk to the backend directly.

mod handlers;

use std::path::{Path, PathBuf};

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use unico_extract::{ExtractError, ExtractorConfig};
use unico_xlsx::{RenderError, StyleSpec};

/// Directory for uploaded PDFs unless `UNICO_UPLOAD_DIR` is set.
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// Directory for rendered spreadsheets unless `UNICO_OUTPUT_DIR` is set.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Largest accepted upload unless `UNICO_MAX_UPLOAD_BYTES` is set.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Errors that can occur while preparing or processing an upload.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Extraction failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Rendering the spreadsheet failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where uploaded PDFs are stored as `<uuid>.pdf`.
    pub upload_dir: PathBuf,
    /// Where spreadsheets are rendered as `<uuid>.xlsx`.
    pub output_dir: PathBuf,
    /// Extraction settings shared by every request.
    pub config: ExtractorConfig,
    /// Spreadsheet styling shared by every request.
    pub style: StyleSpec,
    /// Uploads larger than this are refused with 413.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Builds state with both directories created and the default upload
    /// limit.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Io`] if a directory cannot be created.
    pub fn new(
        upload_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        config: ExtractorConfig,
        style: StyleSpec,
    ) -> Result<Self, ServerError> {
        let state = Self {
            upload_dir: upload_dir.into(),
            output_dir: output_dir.into(),
            config,
            style,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        };
        std::fs::create_dir_all(&state.upload_dir)?;
        std::fs::create_dir_all(&state.output_dir)?;
        Ok(state)
    }

    /// Replaces the upload size limit.
    #[must_use]
    pub const fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Builds state from `UNICO_UPLOAD_DIR`, `UNICO_OUTPUT_DIR`,
    /// `UNICO_CONFIG`, `UNICO_STYLE`, `UNICO_MAX_UPLOAD_BYTES`, and the
    /// extractor's own environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured file cannot be loaded or a
    /// directory cannot be created.
    pub fn from_env() -> Result<Self, ServerError> {
        let config_path = std::env::var_os("UNICO_CONFIG").map(PathBuf::from);
        let config = ExtractorConfig::resolve(config_path.as_deref())?;

        let style = match std::env::var_os("UNICO_STYLE") {
            Some(path) => StyleSpec::load(path)?,
            None => StyleSpec::default(),
        };

        let max_upload_bytes = match std::env::var("UNICO_MAX_UPLOAD_BYTES") {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid UNICO_MAX_UPLOAD_BYTES {value:?}");
                DEFAULT_MAX_UPLOAD_BYTES
            }),
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self::new(
            env_dir("UNICO_UPLOAD_DIR", DEFAULT_UPLOAD_DIR),
            env_dir("UNICO_OUTPUT_DIR", DEFAULT_OUTPUT_DIR),
            config,
            style,
        )?
        .with_max_upload_bytes(max_upload_bytes))
    }

    /// Stores an uploaded PDF, extracts it, and renders the spreadsheet.
    ///
    /// Returns the number of extracted line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the PDF cannot be stored or read, or the
    /// spreadsheet cannot be written.
    pub fn process_upload(&self, file_id: &str, pdf: &[u8]) -> Result<usize, ServerError> {
        let pdf_path = self.upload_dir.join(format!("{file_id}.pdf"));
        let xlsx_path = self.output_dir.join(format!("{file_id}.xlsx"));

        std::fs::write(&pdf_path, pdf)?;

        let extraction = unico_extract::extract_pdf(&pdf_path, &self.config)?;
        unico_xlsx::write_workbook(
            &xlsx_path,
            &extraction.titles(),
            &extraction.rows,
            &self.style,
        )?;

        Ok(extraction.len())
    }

    /// Resolves a download name inside the output directory.
    ///
    /// Names that could escape the directory are `None`.
    #[must_use]
    pub fn output_path(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename.contains("..")
            || Path::new(filename).is_absolute()
        {
            return None;
        }
        Some(self.output_dir.join(filename))
    }
}

fn env_dir(key: &str, default: &str) -> PathBuf {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from(default), PathBuf::from)
}

/// Registers every route under `/api` and again at the root.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").configure(routes))
        .configure(routes);
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health))
        .route("/upload", web::post().to(handlers::upload))
        .route("/download/{filename}", web::get().to(handlers::download));
}

/// Starts the extractor API server.
///
/// Reads `BIND_ADDR` and `PORT` (default `127.0.0.1:8000`) and builds the
/// shared state with [`AppState::from_env`]. The caller provides the
/// async runtime and initializes logging.
///
/// # Errors
///
/// Returns an error if the state cannot be built or the HTTP server fails
/// to bind.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    let state = AppState::from_env().map_err(|e| std::io::Error::other(e.to_string()))?;

    log::info!(
        "Uploads in {}, outputs in {}, schema {}",
        state.upload_dir.display(),
        state.output_dir.display(),
        state.config.schema
    );

    let state = web::Data::new(state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
