#![cfg(feature = "web")]

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart},
    http::{HeaderName, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::downloader::{REPORT_FILE_NAME, XLSX_CONTENT_TYPE};
use crate::pipeline::{self, Stage};

/// Header carrying the number of absentees in a generated report.
pub const COUNT_HEADER: HeaderName = HeaderName::from_static("x-absentee-count");

/// Header listing the completed stages, comma separated.
pub const STAGES_HEADER: HeaderName = HeaderName::from_static("x-report-stages");

/// Multipart field that carries the uploaded workbook.
pub const UPLOAD_FIELD: &str = "file";

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_UPLOAD_LIMIT_MIB: usize = 200;

/// Server settings
///
/// # Default Configuration
/// * Listens on `127.0.0.1:3000`
/// * Accepts uploads of up to 200 MiB
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Socket address to bind
    pub addr: String,

    /// Largest accepted request body in bytes
    pub upload_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            upload_limit: DEFAULT_UPLOAD_LIMIT_MIB * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Build a configuration from `[program, addr, upload_limit_mib]`
    ///
    /// Missing or unparsable values keep their defaults.
    ///
    /// # Examples
    /// ```
    /// use absentee_report::app::ServerConfig;
    ///
    /// let args = vec!["absentee-report".to_string(), "0.0.0.0:8080".to_string()];
    /// let config = ServerConfig::from_args(&args);
    /// assert_eq!(config.addr, "0.0.0.0:8080");
    /// assert_eq!(config.upload_limit, ServerConfig::default().upload_limit);
    /// ```
    pub fn from_args(args: &[String]) -> Self {
        let mut config = Self::default();

        if let Some(addr) = args.get(1) {
            config.addr = addr.clone();
        }
        if let Some(limit) = args.get(2) {
            match limit.parse::<usize>() {
                Ok(mib) if mib > 0 => config.upload_limit = mib * 1024 * 1024,
                _ => log::warn!("ignoring invalid upload limit {:?}", limit),
            }
        }

        config
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    status: String,
    message: String,
}

/// Build the application router
///
/// # Routes
/// * `GET /` - Upload page
/// * `POST /api/report` - Multipart upload, answers with the report workbook
/// * `/static` - Page assets
pub fn router(config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(serve_landing))
        .route("/api/report", post(generate_report))
        .nest_service("/static", ServeDir::new("static"))
        .layer(DefaultBodyLimit::max(config.upload_limit))
}

/// Bind the configured address and serve until the process stops.
pub async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(&config);

    let listener = TcpListener::bind(&config.addr).await?;
    log::info!("Listening on http://{}", config.addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_landing() -> Html<&'static str> {
    Html(include_str!("./static/index.html"))
}

async fn generate_report(mut multipart: Multipart) -> Response {
    let (file_name, data) = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(message) => {
            log::warn!("rejected upload: {}", message);
            return error_response(StatusCode::BAD_REQUEST, message);
        }
    };
    log::info!("received {} ({} bytes)", file_name, data.len());

    let mut stages: Vec<Stage> = Vec::new();
    let result = pipeline::generate_report(&data, |stage| stages.push(stage));
    let stage_list = stages
        .iter()
        .map(Stage::key)
        .collect::<Vec<_>>()
        .join(",");

    match result {
        Ok(report) => (
            [
                (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", REPORT_FILE_NAME),
                ),
                (COUNT_HEADER, report.absentee_count().to_string()),
                (STAGES_HEADER, stage_list),
            ],
            report.workbook,
        )
            .into_response(),
        Err(e) => {
            log::warn!("report for {} failed: {}", file_name, e);
            // Stages that ran before the failure, so the page can narrate them
            (
                [(STAGES_HEADER, stage_list)],
                error_response(StatusCode::UNPROCESSABLE_ENTITY, e.user_message()),
            )
                .into_response()
        }
    }
}

// Pull the workbook out of the form; anything unusable is reported as a message
async fn read_upload(multipart: &mut Multipart) -> Result<(String, Vec<u8>), String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Invalid upload: {}", e))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if !file_name.to_lowercase().ends_with(".xlsx") {
            return Err(format!(
                "Unsupported file type {:?}: please upload an .xlsx file",
                file_name
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| format!("Invalid upload: {}", e))?;
        if data.is_empty() {
            return Err("No file data received".to_string());
        }

        return Ok((file_name, data.to_vec()));
    }

    Err("No file data received".to_string())
}

fn error_response(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ErrorResponse {
            status: "error".to_string(),
            message,
        }),
    )
        .into_response()
}
